//! Perft: exhaustive legal-move tree walks used to validate the generator.

use crate::board::Board;
use crate::moves::execute::{make_move, unmake_move};
use crate::moves::magic::MagicTables;
use crate::moves::movegen::generate_moves;
use crate::moves::types::{Move, MoveList};

/// Number of leaf nodes at the given depth.
pub fn perft(board: &mut Board, tables: &MagicTables, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut list = MoveList::new();
    generate_moves(board, tables, &mut list);

    if depth == 1 {
        return list.len() as u64;
    }

    let mut nodes = 0;
    for &mv in &list {
        make_move(board, mv);
        nodes += perft(board, tables, depth - 1);
        unmake_move(board);
    }
    nodes
}

/// Per-root-move node counts, in generation order.
pub fn perft_divide(board: &mut Board, tables: &MagicTables, depth: u32) -> Vec<(Move, u64)> {
    let mut list = MoveList::new();
    generate_moves(board, tables, &mut list);

    let mut counts = Vec::with_capacity(list.len());
    for &mv in &list {
        make_move(board, mv);
        let nodes = if depth > 1 {
            perft(board, tables, depth - 1)
        } else {
            1
        };
        unmake_move(board);
        counts.push((mv, nodes));
    }
    counts
}
