//! Move text: coordinate form and short algebraic notation.
//!
//! A thin layer over the core interfaces — move generation, the legality
//! filter, make/unmake and check detection. Parsing works by rendering
//! every legal move and comparing, with coordinate form as a fallback.

use crate::board::{Board, Color, Piece};
use crate::moves::execute::{make_move, unmake_move};
use crate::moves::magic::MagicTables;
use crate::moves::movegen::generate_moves;
use crate::moves::square_control::in_check;
use crate::moves::types::{Move, MoveFlag, MoveList};

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

/// Coordinate form: `<from><to>[promo]`, e.g. `e2e4` or `a7a8q`.
pub fn move_to_coordinate(mv: Move) -> String {
    mv.to_coord()
}

/// Parses coordinate form against the legal moves of the position, so the
/// returned move carries the correct flag (capture, castle, en passant).
pub fn coordinate_to_move(board: &mut Board, tables: &MagicTables, text: &str) -> Option<Move> {
    let bytes = text.as_bytes();
    if bytes.len() < 4 {
        return None;
    }

    let from = text[0..2].parse().ok()?;
    let to = text[2..4].parse().ok()?;
    let promo = match bytes.get(4).map(|b| b.to_ascii_lowercase()) {
        Some(b'q') => Some(Piece::Queen),
        Some(b'r') => Some(Piece::Rook),
        Some(b'b') => Some(Piece::Bishop),
        Some(b'n') => Some(Piece::Knight),
        _ => None,
    };

    let mut list = MoveList::new();
    generate_moves(board, tables, &mut list);
    list.iter()
        .copied()
        .find(|mv| mv.from_sq() == from && mv.to_sq() == to && mv.promotion() == promo)
}

/// Short algebraic notation: piece letter, minimal disambiguation, `x`
/// for captures, promotion suffix, `+`/`#` annotation. Castling renders
/// as `O-O` / `O-O-O`.
pub fn move_to_algebraic(board: &mut Board, tables: &MagicTables, mv: Move) -> String {
    let from = mv.from_sq();
    let to = mv.to_sq();
    let mut text = String::new();

    match mv.flag() {
        MoveFlag::CastleKingside => text.push_str("O-O"),
        MoveFlag::CastleQueenside => text.push_str("O-O-O"),
        _ => {
            let piece = board
                .piece_type_at(from)
                .expect("algebraic rendering of a move with an empty from-square");

            if piece != Piece::Pawn {
                text.push(piece_letter(piece));

                // Disambiguate against sibling moves of the same piece
                // kind onto the same square.
                let mut list = MoveList::new();
                generate_moves(board, tables, &mut list);

                let mut need_file = false;
                let mut need_rank = false;
                for other in list.iter().copied() {
                    if other == mv || other.to_sq() != to {
                        continue;
                    }
                    if board.piece_type_at(other.from_sq()) != Some(piece) {
                        continue;
                    }
                    if other.from_sq().file() == from.file() {
                        need_rank = true;
                    } else {
                        need_file = true;
                    }
                }
                if need_file {
                    text.push((b'a' + from.file()) as char);
                }
                if need_rank {
                    text.push((b'1' + from.rank()) as char);
                }
            }

            if mv.is_capture() || (mv.is_promotion() && board.piece_at(to).is_some()) {
                if piece == Piece::Pawn {
                    text.push((b'a' + from.file()) as char);
                }
                text.push('x');
            }

            text.push_str(&to.to_string());

            if let Some(promo) = mv.promotion() {
                text.push('=');
                text.push(piece_letter(promo));
            }
        }
    }

    // Check / mate annotation from the opponent's reply set.
    make_move(board, mv);
    if in_check(board, board.side_to_move, tables) {
        let mut replies = MoveList::new();
        generate_moves(board, tables, &mut replies);
        text.push(if replies.is_empty() { '#' } else { '+' });
    }
    unmake_move(board);

    text
}

/// Parses short algebraic notation by rendering each legal move and
/// comparing, ignoring any trailing `+`/`#` on either side. Falls back
/// to coordinate form.
pub fn algebraic_to_move(board: &mut Board, tables: &MagicTables, text: &str) -> Option<Move> {
    let wanted = text.trim_end_matches(['+', '#']);

    let mut list = MoveList::new();
    generate_moves(board, tables, &mut list);

    for mv in list.iter().copied() {
        let rendered = move_to_algebraic(board, tables, mv);
        if rendered.trim_end_matches(['+', '#']) == wanted {
            return Some(mv);
        }
    }

    coordinate_to_move(board, tables, text)
}

/// Legal moves of the position in algebraic form, for display.
pub fn legal_moves_algebraic(board: &mut Board, tables: &MagicTables) -> Vec<String> {
    let mut list = MoveList::new();
    generate_moves(board, tables, &mut list);
    list.iter()
        .copied()
        .map(|mv| move_to_algebraic(board, tables, mv))
        .collect()
}

/// Side-aware display helper, e.g. `3. Nf3` or `3... Nc6`.
pub fn numbered_move(board: &mut Board, tables: &MagicTables, mv: Move) -> String {
    let number = board.fullmove_number;
    let dots = match board.side_to_move {
        Color::White => ".",
        Color::Black => "...",
    };
    format!("{number}{dots} {}", move_to_algebraic(board, tables, mv))
}
