use std::str::FromStr;
use tempo::board::Board;
use tempo::moves::magic;
use tempo::moves::perft::{perft, perft_divide};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn run(fen: &str, depth: u32, expected: u64) {
    let tables = magic::tables();
    let mut board = Board::from_str(fen).expect("valid FEN");
    let before = board.clone();
    let nodes = perft(&mut board, tables, depth);
    assert_eq!(
        nodes, expected,
        "perft({depth}) mismatch for {fen}: got {nodes}"
    );
    assert_eq!(board, before, "perft must leave the position untouched");
}

#[test]
fn startpos_d1() {
    run(START_FEN, 1, 20);
}

#[test]
fn startpos_d2() {
    run(START_FEN, 2, 400);
}

#[test]
fn startpos_d3() {
    run(START_FEN, 3, 8_902);
}

#[test]
fn startpos_d4() {
    run(START_FEN, 4, 197_281);
}

#[test]
#[ignore]
fn startpos_d5() {
    run(START_FEN, 5, 4_865_609);
}

#[test]
fn kiwipete_d1() {
    run(KIWIPETE, 1, 48);
}

#[test]
fn kiwipete_d2() {
    run(KIWIPETE, 2, 2_039);
}

#[test]
fn kiwipete_d3() {
    run(KIWIPETE, 3, 97_862);
}

#[test]
fn rook_endgame_d3() {
    // Position 3 from the standard perft suite: en-passant pins and all
    run("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3, 2_812);
}

#[test]
fn rook_endgame_d4() {
    run("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4, 43_238);
}

#[test]
fn promotion_heavy_d3() {
    // Position 4: promotions, underpromotions and checks everywhere
    run(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        3,
        9_467,
    );
}

#[test]
fn divide_sums_to_perft() {
    let tables = magic::tables();
    let mut board = Board::from_str(KIWIPETE).unwrap();

    let divided = perft_divide(&mut board, tables, 2);
    assert_eq!(divided.len(), 48);
    let total: u64 = divided.iter().map(|(_, nodes)| nodes).sum();
    assert_eq!(total, 2_039);
}

#[test]
fn perft_zero_is_one() {
    run(START_FEN, 0, 1);
}
