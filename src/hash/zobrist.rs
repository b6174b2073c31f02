//! Zobrist key tables.
//!
//! Keys are generated once from a fixed seed so two runs hash identical
//! positions to identical values. All keys are non-zero, which also lets
//! hash 0 serve as the transposition table's vacant sentinel.

use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

const ZOBRIST_SEED: u64 = 0x0010_5524;

pub struct ZobristKeys {
    /// `[color][piece][square]` with White = 0 and P,N,B,R,Q,K = 0..5.
    pub piece: [[[u64; 64]; 6]; 2],
    /// Indexed by the full 4-bit castling rights mask.
    pub castling: [u64; 16],
    /// Indexed by the en-passant target square.
    pub en_passant: [u64; 64],
    /// XORed in when Black is to move.
    pub side: u64,
}

/// Global keys, generated on first use. Read-only afterwards.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(rng: &mut StdRng) -> u64 {
        let mut v = rng.next_u64();
        while v == 0 {
            v = rng.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0; 64]; 6]; 2],
        castling: [0; 16],
        en_passant: [0; 64],
        side: 0,
    };

    for color in 0..2 {
        for piece in 0..6 {
            for sq in 0..64 {
                keys.piece[color][piece][sq] = non_zero(&mut rng);
            }
        }
    }
    for rights in 0..16 {
        keys.castling[rights] = non_zero(&mut rng);
    }
    for sq in 0..64 {
        keys.en_passant[sq] = non_zero(&mut rng);
    }
    keys.side = non_zero(&mut rng);

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_non_zero() {
        let keys = zobrist_keys();
        assert_ne!(keys.side, 0);
        for table in &keys.piece {
            for per_piece in table {
                assert!(per_piece.iter().all(|&k| k != 0));
            }
        }
        assert!(keys.castling.iter().all(|&k| k != 0));
        assert!(keys.en_passant.iter().all(|&k| k != 0));
    }

    #[test]
    fn keys_are_stable_within_a_run() {
        let a = zobrist_keys();
        let b = zobrist_keys();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.piece[0][0][0], b.piece[0][0][0]);
    }
}
