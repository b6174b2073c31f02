//! Interactive command-line front end: set up positions, list moves,
//! search, play against the engine, and run perft counts.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tempo::board::Board;
use tempo::moves::execute::make_move;
use tempo::moves::magic::{self, MagicTables};
use tempo::moves::movegen::generate_moves;
use tempo::moves::perft::perft;
use tempo::moves::types::MoveList;
use tempo::notation::{algebraic_to_move, legal_moves_algebraic, move_to_algebraic};
use tempo::search::search::{SearchInfo, SearchParams, iterative_deepening};
use tempo::search::tt::TranspositionTable;
use tempo::status::{GameStatus, position_status};

const DEFAULT_DEPTH: u8 = 5;
const TT_SIZE_MB: usize = 64;

fn main() {
    tempo::logger::init_logging("tempo=info");

    let tables = magic::tables();
    let mut board = Board::new();
    let mut tt = TranspositionTable::new(TT_SIZE_MB);
    let mut depth = DEFAULT_DEPTH;

    println!("tempo chess engine — type 'help' for commands");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line.trim().to_string(),
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "quit" | "exit" => break,
            "help" => print_help(),
            "new" => {
                board = Board::new();
                tt.clear();
            }
            "fen" | "d" | "display" => println!("{board}"),
            "position" => {
                if let Some(new_board) = parse_position(&parts, tables) {
                    board = new_board;
                } else {
                    println!("usage: position startpos|fen <FEN> [moves <m1> <m2> ...]");
                }
            }
            "depth" => match parts.get(1).and_then(|d| d.parse::<u8>().ok()) {
                Some(d) if d > 0 => depth = d,
                _ => println!("usage: depth <1..>"),
            },
            "moves" => {
                let rendered = legal_moves_algebraic(&mut board, tables);
                println!("{}", rendered.join(" "));
            }
            "go" => {
                let go_depth = parts
                    .get(1)
                    .and_then(|d| d.parse::<u8>().ok())
                    .unwrap_or(depth);
                run_search(&mut board, tables, &mut tt, go_depth, false);
            }
            "play" => {
                if parts.len() < 2 {
                    println!("usage: play <move>");
                    continue;
                }
                play_move(&mut board, tables, &mut tt, parts[1], depth);
            }
            "perft" => {
                let perft_depth = parts
                    .get(1)
                    .and_then(|d| d.parse::<u32>().ok())
                    .unwrap_or(4);
                run_perft(&mut board, tables, perft_depth);
            }
            other => println!("unknown command: {other} (try 'help')"),
        }
        io::stdout().flush().ok();
    }
}

fn print_help() {
    println!("commands:");
    println!("  position startpos [moves ...]   set up the start position");
    println!("  position fen <FEN> [moves ...]  set up an arbitrary position");
    println!("  moves                           list legal moves");
    println!("  play <move>                     play your move (e4, Nf3, O-O, e2e4); engine replies");
    println!("  go [depth]                      search the current position");
    println!("  depth <n>                       set the default search depth");
    println!("  perft <n>                       count leaf nodes to depth n");
    println!("  fen                             print the position as FEN");
    println!("  new                             reset the game");
    println!("  quit                            leave");
}

fn parse_position(parts: &[&str], tables: &MagicTables) -> Option<Board> {
    let mut board = match parts.get(1) {
        Some(&"startpos") => Board::new(),
        Some(&"fen") => {
            let end = parts
                .iter()
                .position(|&p| p == "moves")
                .unwrap_or(parts.len());
            Board::from_str(&parts[2..end].join(" ")).ok()?
        }
        _ => return None,
    };

    if let Some(moves_at) = parts.iter().position(|&p| p == "moves") {
        for text in &parts[moves_at + 1..] {
            let mv = algebraic_to_move(&mut board, tables, text)?;
            make_move(&mut board, mv);
        }
    }

    Some(board)
}

fn run_search(
    board: &mut Board,
    tables: &MagicTables,
    tt: &mut TranspositionTable,
    depth: u8,
    quiet: bool,
) -> Option<tempo::moves::types::Move> {
    let params = SearchParams {
        max_depth: depth,
        ..SearchParams::default()
    };
    let mut info = SearchInfo::new();

    let best = iterative_deepening(board, tables, tt, &params, &mut info);
    if best.is_none() {
        println!("no move found");
        return None;
    }

    if !quiet {
        let pv: Vec<String> = info.pv.iter().map(|m| m.to_coord()).collect();
        println!(
            "best {} nodes {} qnodes {} seldepth {} pv {}",
            move_to_algebraic(board, tables, best),
            info.nodes,
            info.qnodes,
            info.selective_depth,
            pv.join(" ")
        );
    }
    Some(best)
}

fn play_move(
    board: &mut Board,
    tables: &MagicTables,
    tt: &mut TranspositionTable,
    text: &str,
    depth: u8,
) {
    let Some(mv) = algebraic_to_move(board, tables, text) else {
        println!("illegal move: {text} (try 'moves')");
        return;
    };
    make_move(board, mv);

    if report_if_over(board, tables) {
        return;
    }

    if let Some(reply) = run_search(board, tables, tt, depth, true) {
        let rendered = move_to_algebraic(board, tables, reply);
        make_move(board, reply);
        println!("engine plays {rendered}");
        report_if_over(board, tables);
    }
}

fn report_if_over(board: &mut Board, tables: &MagicTables) -> bool {
    match position_status(board, tables) {
        GameStatus::InPlay => false,
        GameStatus::Checkmate => {
            println!("checkmate");
            true
        }
        GameStatus::Stalemate => {
            println!("stalemate");
            true
        }
        status => {
            println!("draw ({status:?})");
            true
        }
    }
}

fn run_perft(board: &mut Board, tables: &MagicTables, depth: u32) {
    if depth == 0 {
        println!("total 1");
        return;
    }

    let mut list = MoveList::new();
    generate_moves(board, tables, &mut list);

    let bar = ProgressBar::new(list.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}") {
        bar.set_style(style);
    }

    let mut total = 0u64;
    for &mv in &list {
        bar.set_message(mv.to_coord());
        make_move(board, mv);
        let nodes = perft(board, tables, depth - 1);
        tempo::moves::execute::unmake_move(board);
        bar.println(format!("{}: {nodes}", mv.to_coord()));
        bar.inc(1);
        total += nodes;
    }
    bar.finish_and_clear();
    println!("total {total}");
}
