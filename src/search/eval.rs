//! Static evaluation: material, tapered piece-square preferences,
//! mobility, pawn structure and king safety, all in centipawns.
//!
//! Terms accumulate from White's perspective; the final score is negated
//! when Black is to move.

use crate::bitboard::{Bits, file_mask};
use crate::board::{Board, Color, Piece};
use crate::moves::magic::MagicTables;
use crate::moves::movegen::generate_moves;
use crate::moves::types::MoveList;
use crate::search::pst;
use crate::square::Square;

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 20000;

const DOUBLED_PAWN_PENALTY: i32 = 10;
const ISOLATED_PAWN_PENALTY: i32 = 15;
const KING_OPEN_FILE_PENALTY: i32 = 20;

/// Non-pawn material of both sides at the start: 4·(N+B) + 4·R + 2·Q.
const MAX_PHASE_MATERIAL: i32 = 6400;

#[inline]
pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => KING_VALUE,
    }
}

/// Vertical mirror used to read the White-oriented tables for Black.
#[inline(always)]
pub fn mirror_square(sq: u8) -> u8 {
    sq ^ 56
}

/// Game phase in 0..=256: 256 at full non-pawn material, 0 with none.
pub fn game_phase(board: &Board) -> i32 {
    let mut material = 0;
    for color in [Color::White, Color::Black] {
        material += board.bb(color, Piece::Knight).count_ones() as i32 * KNIGHT_VALUE;
        material += board.bb(color, Piece::Bishop).count_ones() as i32 * BISHOP_VALUE;
        material += board.bb(color, Piece::Rook).count_ones() as i32 * ROOK_VALUE;
        material += board.bb(color, Piece::Queen).count_ones() as i32 * QUEEN_VALUE;
    }
    if material >= MAX_PHASE_MATERIAL {
        256
    } else {
        material * 256 / MAX_PHASE_MATERIAL
    }
}

/// Interpolates between the midgame and endgame subtotals.
#[inline]
pub fn tapered_eval(mg_score: i32, eg_score: i32, phase: i32) -> i32 {
    (mg_score * phase + eg_score * (256 - phase)) / 256
}

/// A position counts as endgame below a quarter of the starting material.
pub fn is_endgame(board: &Board) -> bool {
    game_phase(board) < 64
}

/// Material balance over the non-king piece types.
pub fn evaluate_material(board: &Board) -> i32 {
    let mut score = 0;
    for piece in [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ] {
        let white = board.bb(Color::White, piece).count_ones() as i32;
        let black = board.bb(Color::Black, piece).count_ones() as i32;
        score += (white - black) * piece_value(piece);
    }
    score
}

fn pst_for(piece: Piece) -> &'static [i32; 64] {
    match piece {
        Piece::Pawn => &pst::PAWN_PST,
        Piece::Knight => &pst::KNIGHT_PST,
        Piece::Bishop => &pst::BISHOP_PST,
        Piece::Rook => &pst::ROOK_PST,
        Piece::Queen => &pst::QUEEN_PST,
        Piece::King => &pst::KING_PST_MIDGAME,
    }
}

/// Piece-square preferences, tapered over the game phase. White reads the
/// tables directly, Black through the vertical mirror.
pub fn evaluate_piece_square(board: &Board) -> i32 {
    let mut mg_score = 0;
    let mut eg_score = 0;

    for piece in Piece::ALL {
        for sq in Bits(board.bb(Color::White, piece)) {
            if piece == Piece::King {
                mg_score += pst::KING_PST_MIDGAME[sq as usize];
                eg_score += pst::KING_PST_ENDGAME[sq as usize];
            } else {
                let value = pst_for(piece)[sq as usize];
                mg_score += value;
                eg_score += value;
            }
        }

        for sq in Bits(board.bb(Color::Black, piece)) {
            let mirrored = mirror_square(sq) as usize;
            if piece == Piece::King {
                mg_score -= pst::KING_PST_MIDGAME[mirrored];
                eg_score -= pst::KING_PST_ENDGAME[mirrored];
            } else {
                let value = pst_for(piece)[mirrored];
                mg_score -= value;
                eg_score -= value;
            }
        }
    }

    tapered_eval(mg_score, eg_score, game_phase(board))
}

/// Legal move count for White minus Black. Each side is counted from a
/// scratch copy with the side to move forced (and its hash re-derived so
/// the make/unmake parity checks hold); only the count is read.
pub fn evaluate_mobility(board: &Board, tables: &MagicTables) -> i32 {
    let mut list = MoveList::new();

    let mut scratch = board.clone();
    scratch.side_to_move = Color::White;
    scratch.refresh_zobrist();
    generate_moves(&mut scratch, tables, &mut list);
    let white_moves = list.len() as i32;

    scratch.side_to_move = Color::Black;
    scratch.refresh_zobrist();
    generate_moves(&mut scratch, tables, &mut list);
    let black_moves = list.len() as i32;

    white_moves - black_moves
}

/// Doubled and isolated pawn penalties, white-positive.
pub fn evaluate_pawn_structure(board: &Board) -> i32 {
    let white_pawns = board.bb(Color::White, Piece::Pawn);
    let black_pawns = board.bb(Color::Black, Piece::Pawn);
    let mut score = 0;

    for file in 0..8 {
        let mask = file_mask(file);
        let on_file_white = (white_pawns & mask).count_ones() as i32;
        let on_file_black = (black_pawns & mask).count_ones() as i32;

        if on_file_white > 1 {
            score -= (on_file_white - 1) * DOUBLED_PAWN_PENALTY;
        }
        if on_file_black > 1 {
            score += (on_file_black - 1) * DOUBLED_PAWN_PENALTY;
        }

        let mut adjacent = 0u64;
        if file > 0 {
            adjacent |= file_mask(file - 1);
        }
        if file < 7 {
            adjacent |= file_mask(file + 1);
        }

        if white_pawns & mask != 0 && white_pawns & adjacent == 0 {
            score -= ISOLATED_PAWN_PENALTY;
        }
        if black_pawns & mask != 0 && black_pawns & adjacent == 0 {
            score += ISOLATED_PAWN_PENALTY;
        }
    }

    score
}

/// Penalty for a king standing on a fully open file (no pawns of either
/// color).
pub fn evaluate_king_safety(board: &Board) -> i32 {
    let all_pawns = board.bb(Color::White, Piece::Pawn) | board.bb(Color::Black, Piece::Pawn);
    let open_file_penalty = |king_sq: Option<Square>| match king_sq {
        Some(sq) if all_pawns & file_mask(sq.file()) == 0 => KING_OPEN_FILE_PENALTY,
        _ => 0,
    };

    let mut score = 0;
    score -= open_file_penalty(board.king_square(Color::White));
    score += open_file_penalty(board.king_square(Color::Black));
    score
}

/// Full static evaluation from the side to move's perspective.
pub fn evaluate(board: &Board, tables: &MagicTables) -> i32 {
    let mut score = 0;
    score += evaluate_material(board);
    score += evaluate_piece_square(board);
    score += evaluate_mobility(board, tables) / 2;
    score += evaluate_pawn_structure(board);
    score += evaluate_king_safety(board);

    match board.side_to_move {
        Color::White => score,
        Color::Black => -score,
    }
}
