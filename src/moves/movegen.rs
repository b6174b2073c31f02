//! Legal move generation.
//!
//! Every candidate passes the make/check/unmake legality filter before it
//! enters the list, so callers only ever see legal moves. The full
//! generator and the captures-only / quiets-only variants share that
//! discipline.

use crate::bitboard::{Bits, RANK_2, RANK_7};
use crate::board::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece};
use crate::moves::attacks::pawn_attacks;
use crate::moves::execute::is_legal;
use crate::moves::magic::MagicTables;
use crate::moves::square_control::{attacks_from, in_check, is_square_attacked};
use crate::moves::types::{Move, MoveFlag, MoveList};
use crate::square::Square;

const PROMO_FLAGS: [MoveFlag; 4] = [
    MoveFlag::PromoQueen,
    MoveFlag::PromoRook,
    MoveFlag::PromoBishop,
    MoveFlag::PromoKnight,
];

#[inline]
fn push_if_legal(
    board: &mut Board,
    tables: &MagicTables,
    list: &mut MoveList,
    from: u8,
    to: u8,
    flag: MoveFlag,
) {
    let mv = Move::new(Square::from_index(from), Square::from_index(to), flag);
    if is_legal(board, mv, tables) {
        list.push(mv);
    }
}

/// Classifies a pawn arrival: last-rank targets fan out into the four
/// promotions, otherwise the flag follows the target occupancy.
fn push_pawn_move(board: &mut Board, tables: &MagicTables, list: &mut MoveList, from: u8, to: u8) {
    let us = board.side_to_move;
    let to_rank = to / 8;
    let promotes = match us {
        Color::White => to_rank == 7,
        Color::Black => to_rank == 0,
    };

    if promotes {
        for flag in PROMO_FLAGS {
            push_if_legal(board, tables, list, from, to, flag);
        }
    } else if board.color_at(Square::from_index(to)) == Some(us.opposite()) {
        push_if_legal(board, tables, list, from, to, MoveFlag::Capture);
    } else {
        push_if_legal(board, tables, list, from, to, MoveFlag::Normal);
    }
}

fn generate_pawn_pushes(board: &mut Board, tables: &MagicTables, list: &mut MoveList) {
    let us = board.side_to_move;
    let pawns = board.bb(us, Piece::Pawn);
    let empty = !board.occupied();

    let single = match us {
        Color::White => (pawns << 8) & empty,
        Color::Black => (pawns >> 8) & empty,
    };
    for to in Bits(single) {
        let from = match us {
            Color::White => to - 8,
            Color::Black => to + 8,
        };
        push_pawn_move(board, tables, list, from, to);
    }

    // Double pushes carry the Normal flag; make() recognizes them by the
    // two-rank jump and sets the en-passant square.
    let double = match us {
        Color::White => ((pawns & RANK_2) << 8 & empty) << 8 & empty,
        Color::Black => ((pawns & RANK_7) >> 8 & empty) >> 8 & empty,
    };
    for to in Bits(double) {
        let from = match us {
            Color::White => to - 16,
            Color::Black => to + 16,
        };
        push_if_legal(board, tables, list, from, to, MoveFlag::Normal);
    }
}

fn generate_pawn_captures(board: &mut Board, tables: &MagicTables, list: &mut MoveList) {
    let us = board.side_to_move;
    let pawns = board.bb(us, Piece::Pawn);
    let enemy = board.opponent_occupancy(us);

    for from in Bits(pawns) {
        let targets = pawn_attacks(from, us) & enemy;
        for to in Bits(targets) {
            push_pawn_move(board, tables, list, from, to);
        }
    }

    if let Some(ep) = board.en_passant {
        for from in Bits(pawns) {
            if pawn_attacks(from, us) & ep.bb() != 0 {
                push_if_legal(board, tables, list, from, ep.index(), MoveFlag::EnPassant);
            }
        }
    }
}

/// Table-driven generation for the five non-pawn kinds; targets are the
/// piece's attack set minus own pieces, classified by enemy occupancy.
fn generate_piece_moves(
    board: &mut Board,
    tables: &MagicTables,
    list: &mut MoveList,
    piece: Piece,
    mask: u64,
) {
    let us = board.side_to_move;
    let own = board.occupancy(us);
    let occupied = board.occupied();
    let enemy = board.opponent_occupancy(us);

    for from in Bits(board.bb(us, piece)) {
        let targets = attacks_from(piece, us, from, occupied, tables) & !own & mask;
        for to in Bits(targets) {
            let flag = if enemy & (1u64 << to) != 0 {
                MoveFlag::Capture
            } else {
                MoveFlag::Normal
            };
            push_if_legal(board, tables, list, from, to, flag);
        }
    }
}

fn all_empty(board: &Board, squares: &[u8]) -> bool {
    let occupied = board.occupied();
    squares.iter().all(|&sq| occupied & (1u64 << sq) == 0)
}

fn all_safe(board: &Board, by: Color, tables: &MagicTables, squares: &[u8]) -> bool {
    squares
        .iter()
        .all(|&sq| !is_square_attacked(board, Square::from_index(sq), by, tables))
}

fn generate_castling_moves(board: &mut Board, tables: &MagicTables, list: &mut MoveList) {
    let us = board.side_to_move;
    let them = us.opposite();

    // Cannot castle out of check.
    if in_check(board, us, tables) {
        return;
    }

    // The squares between king and rook must be empty, and the squares
    // the king crosses or lands on unattacked.
    match us {
        Color::White => {
            if board.has_castling(CASTLE_WK)
                && all_empty(board, &[5, 6])
                && all_safe(board, them, tables, &[5, 6])
            {
                push_if_legal(board, tables, list, 4, 6, MoveFlag::CastleKingside);
            }
            if board.has_castling(CASTLE_WQ)
                && all_empty(board, &[1, 2, 3])
                && all_safe(board, them, tables, &[2, 3])
            {
                push_if_legal(board, tables, list, 4, 2, MoveFlag::CastleQueenside);
            }
        }
        Color::Black => {
            if board.has_castling(CASTLE_BK)
                && all_empty(board, &[61, 62])
                && all_safe(board, them, tables, &[61, 62])
            {
                push_if_legal(board, tables, list, 60, 62, MoveFlag::CastleKingside);
            }
            if board.has_castling(CASTLE_BQ)
                && all_empty(board, &[57, 58, 59])
                && all_safe(board, them, tables, &[58, 59])
            {
                push_if_legal(board, tables, list, 60, 58, MoveFlag::CastleQueenside);
            }
        }
    }
}

const NON_PAWNS: [Piece; 5] = [
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// All legal moves for the side to move.
pub fn generate_moves(board: &mut Board, tables: &MagicTables, list: &mut MoveList) {
    list.clear();
    generate_pawn_pushes(board, tables, list);
    generate_pawn_captures(board, tables, list);
    for piece in NON_PAWNS {
        generate_piece_moves(board, tables, list, piece, !0);
    }
    generate_castling_moves(board, tables, list);
}

/// Legal captures only (including en passant and capturing promotions).
pub fn generate_captures(board: &mut Board, tables: &MagicTables, list: &mut MoveList) {
    list.clear();
    generate_pawn_captures(board, tables, list);
    let enemy = board.opponent_occupancy(board.side_to_move);
    for piece in NON_PAWNS {
        generate_piece_moves(board, tables, list, piece, enemy);
    }
}

/// Legal quiet moves only (pushes, promotion pushes, piece moves to empty
/// squares, castling).
pub fn generate_quiet_moves(board: &mut Board, tables: &MagicTables, list: &mut MoveList) {
    list.clear();
    generate_pawn_pushes(board, tables, list);
    let empty = !board.occupied();
    for piece in NON_PAWNS {
        generate_piece_moves(board, tables, list, piece, empty);
    }
    generate_castling_moves(board, tables, list);
}
