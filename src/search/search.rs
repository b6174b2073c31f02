//! Negamax alpha-beta search with quiescence, a transposition table,
//! killer/history move ordering, PV extraction and iterative deepening
//! with aspiration windows.

use crate::board::Board;
use crate::moves::execute::{is_legal, make_move, unmake_move};
use crate::moves::magic::MagicTables;
use crate::moves::movegen::{generate_captures, generate_moves};
use crate::moves::square_control::in_check;
use crate::moves::types::{Move, MoveList};
use crate::search::context::SearchContext;
use crate::search::eval::evaluate;
use crate::search::ordering::order_moves;
use crate::search::tt::{
    TTFlag, TranspositionTable, adjust_mate_score, tt_cutoff, unadjust_mate_score,
};
use crate::search::{DRAW_SCORE, INFINITE, MATE_SCORE, MAX_PLY};
use crate::status::is_draw;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Search configuration. The transposition table travels separately as a
/// mutable borrow.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub max_depth: u8,
    pub aspiration_window: i32,
    pub use_aspiration: bool,
    pub use_quiescence: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            max_depth: 5,
            aspiration_window: 50,
            use_aspiration: true,
            use_quiescence: true,
        }
    }
}

/// Statistics and outputs of one search, plus the cancellation flag.
#[derive(Debug, Default)]
pub struct SearchInfo {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub best_move: Move,
    pub pv: Vec<Move>,
    pub selective_depth: usize,
    /// Observed between iterative-deepening iterations; the inner search
    /// does not poll it.
    pub time_up: bool,
    /// Optional external stop signal mirrored into `time_up`.
    pub stop: Option<Arc<AtomicBool>>,
}

impl SearchInfo {
    pub fn new() -> Self {
        SearchInfo {
            best_move: Move::NONE,
            ..Default::default()
        }
    }

    fn reset(&mut self) {
        self.nodes = 0;
        self.qnodes = 0;
        self.tt_hits = 0;
        self.tt_cutoffs = 0;
        self.best_move = Move::NONE;
        self.pv.clear();
        self.selective_depth = 0;
        self.time_up = false;
    }

    fn poll_stop(&mut self) {
        if let Some(stop) = &self.stop
            && stop.load(Ordering::Relaxed)
        {
            self.time_up = true;
        }
    }
}

/// Score for a position with no legal moves: mated (distance-adjusted) or
/// stalemate.
fn evaluate_terminal(board: &Board, tables: &MagicTables, ply: usize) -> i32 {
    if in_check(board, board.side_to_move, tables) {
        -MATE_SCORE + ply as i32
    } else {
        DRAW_SCORE
    }
}

/// Capture-only continuation past the horizon. Fail-hard.
pub fn quiescence(
    board: &mut Board,
    tables: &MagicTables,
    info: &mut SearchInfo,
    mut alpha: i32,
    beta: i32,
    ply: usize,
) -> i32 {
    info.qnodes += 1;

    if is_draw(board) {
        return DRAW_SCORE;
    }

    let stand_pat = evaluate(board, tables);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut list = MoveList::new();
    generate_captures(board, tables, &mut list);

    for &mv in &list {
        make_move(board, mv);
        let score = -quiescence(board, tables, info, -beta, -alpha, ply + 1);
        unmake_move(board);

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

/// Negamax with alpha-beta pruning and transposition table support.
#[allow(clippy::too_many_arguments)]
pub fn negamax(
    board: &mut Board,
    tables: &MagicTables,
    tt: &mut TranspositionTable,
    ctx: &mut SearchContext,
    info: &mut SearchInfo,
    params: &SearchParams,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    ply: usize,
) -> i32 {
    info.nodes += 1;
    if ply > info.selective_depth {
        info.selective_depth = ply;
    }

    if ply > 0 && is_draw(board) {
        return DRAW_SCORE;
    }

    if depth <= 0 {
        return if params.use_quiescence {
            quiescence(board, tables, info, alpha, beta, ply)
        } else {
            evaluate(board, tables)
        };
    }

    let mut hash_move = Move::NONE;
    if let Some(entry) = tt.probe(board.zobrist) {
        info.tt_hits += 1;
        hash_move = entry.best_move;
        if let Some(score) = tt_cutoff(entry, depth as u8, alpha, beta) {
            info.tt_cutoffs += 1;
            return unadjust_mate_score(score, ply);
        }
    }

    let mut list = MoveList::new();
    generate_moves(board, tables, &mut list);

    if list.is_empty() {
        return evaluate_terminal(board, tables, ply);
    }

    order_moves(board, ctx, &mut list, hash_move, ply);

    let mut best_score = -INFINITE;
    let mut best_move = Move::NONE;
    let mut flag = TTFlag::Upper;

    for &mv in &list {
        make_move(board, mv);
        let score = -negamax(
            board,
            tables,
            tt,
            ctx,
            info,
            params,
            depth - 1,
            -beta,
            -alpha,
            ply + 1,
        );
        unmake_move(board);

        if score > best_score {
            best_score = score;
            best_move = mv;

            if score > alpha {
                alpha = score;
                flag = TTFlag::Exact;

                if score >= beta {
                    flag = TTFlag::Lower;
                    if !mv.is_capture() {
                        ctx.update_killers(mv, ply);
                        ctx.update_history(mv, board.side_to_move, depth);
                    }
                    break;
                }
            }
        }
    }

    if !best_move.is_none() {
        tt.store(
            board.zobrist,
            adjust_mate_score(best_score, ply),
            best_move,
            depth as u8,
            flag,
        );
    }

    best_score
}

/// Walks the transposition table from the current position, collecting
/// the principal variation. Stops on a miss, a null move, an illegal
/// move, or the ply cap; the board is restored before returning.
pub fn extract_pv(board: &mut Board, tables: &MagicTables, tt: &mut TranspositionTable) -> Vec<Move> {
    let mut pv = Vec::new();

    for _ in 0..MAX_PLY {
        let mv = match tt.probe(board.zobrist) {
            Some(entry) => entry.best_move,
            None => break,
        };
        if mv.is_none() || !is_legal(board, mv, tables) {
            break;
        }
        pv.push(mv);
        make_move(board, mv);
    }

    for _ in 0..pv.len() {
        unmake_move(board);
    }

    pv
}

/// Fixed-depth search from the root with a full window; the best move is
/// the head of the extracted PV.
pub fn find_best_move(
    board: &mut Board,
    tables: &MagicTables,
    tt: &mut TranspositionTable,
    params: &SearchParams,
    info: &mut SearchInfo,
) -> Move {
    info.reset();
    tt.new_generation();
    let mut ctx = SearchContext::new();

    negamax(
        board,
        tables,
        tt,
        &mut ctx,
        info,
        params,
        params.max_depth as i32,
        -INFINITE,
        INFINITE,
        0,
    );

    info.pv = extract_pv(board, tables, tt);
    if let Some(&first) = info.pv.first() {
        info.best_move = first;
    }

    info.best_move
}

/// Iterative deepening up to `params.max_depth`, with an aspiration
/// window around the previous score after depth 3 and a full-window
/// re-search when the score falls outside it. Cancellation is observed
/// between iterations; the best move from the last completed iteration
/// is returned.
pub fn iterative_deepening(
    board: &mut Board,
    tables: &MagicTables,
    tt: &mut TranspositionTable,
    params: &SearchParams,
    info: &mut SearchInfo,
) -> Move {
    info.reset();
    tt.new_generation();
    let mut ctx = SearchContext::new();
    ctx.clear();

    let mut best_move = Move::NONE;
    let mut prev_score = 0;

    for depth in 1..=params.max_depth as i32 {
        let (mut alpha, mut beta) = (-INFINITE, INFINITE);
        if params.use_aspiration && depth > 3 {
            alpha = prev_score - params.aspiration_window;
            beta = prev_score + params.aspiration_window;
        }

        let mut score = negamax(
            board, tables, tt, &mut ctx, info, params, depth, alpha, beta, 0,
        );

        if params.use_aspiration && depth > 3 && (score <= alpha || score >= beta) {
            score = negamax(
                board, tables, tt, &mut ctx, info, params, depth, -INFINITE, INFINITE, 0,
            );
        }

        prev_score = score;

        info.pv = extract_pv(board, tables, tt);
        if let Some(&first) = info.pv.first() {
            best_move = first;
            info.best_move = first;
        }

        tracing::debug!(
            depth,
            score,
            nodes = info.nodes,
            qnodes = info.qnodes,
            seldepth = info.selective_depth,
            pv = %info.pv.iter().map(|m| m.to_coord()).collect::<Vec<_>>().join(" "),
            "iteration complete"
        );

        info.poll_stop();
        if info.time_up {
            break;
        }
    }

    best_move
}
