//! Builds the sliding-piece attack tables from fixed magic constants.
//!
//! For each square: compute the edge-excluded relevance mask, enumerate
//! every blocker subset of it, ray-trace the true attack set for that
//! subset, and file it at `(subset * magic) >> (64 - popcount(mask))`.
//! The constants below are a published set known to hash these masks
//! without harmful collisions.

use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};
use crate::bitboard::pop_lsb;
use crate::moves::attacks::{bishop_attacks_slow, rook_attacks_slow};

/// Rook table size per square; 12 relevant bits at the corners.
const ROOK_TABLE_SIZE: usize = 4096;
/// Bishop table size per square; at most 9 relevant bits.
const BISHOP_TABLE_SIZE: usize = 512;

#[rustfmt::skip]
const ROOK_MAGICS: [u64; 64] = [
    0x0080_0010_2040_0080, 0x0040_0010_0020_0040, 0x0080_0810_0020_0080, 0x0080_0408_0010_0080,
    0x0080_0204_0008_0080, 0x0080_0102_0004_0080, 0x0080_0080_0100_0200, 0x0080_0020_4080_0100,
    0x0000_8000_2040_0080, 0x0000_4000_2000_5000, 0x0000_8010_0020_0080, 0x0000_8008_0010_0080,
    0x0000_8004_0008_0080, 0x0000_8002_0004_0080, 0x0000_8001_0002_0080, 0x0000_8000_4080_0100,
    0x0000_2080_0040_0080, 0x0000_4040_0020_1000, 0x0000_8080_1000_0800, 0x0000_8080_0800_0400,
    0x0000_8080_0400_0200, 0x0000_8080_0200_0100, 0x0000_0101_0002_0004, 0x0000_0200_0040_8104,
    0x0000_2080_8000_4000, 0x0000_2000_4000_5000, 0x0000_1000_8020_0080, 0x0000_0800_8010_0080,
    0x0000_0400_8008_0080, 0x0000_0200_8004_0080, 0x0000_0100_8080_0200, 0x0000_8000_8000_4100,
    0x0000_2040_0080_0080, 0x0000_2000_4040_1000, 0x0000_1000_8080_2000, 0x0000_0800_8080_1000,
    0x0000_0400_8080_0800, 0x0000_0200_8080_0400, 0x0000_0200_0101_0004, 0x0000_8000_4080_0100,
    0x0000_2040_0080_8000, 0x0000_2000_4000_8080, 0x0000_1000_2000_8080, 0x0000_0800_1000_8080,
    0x0000_0400_0800_8080, 0x0000_0200_0400_8080, 0x0000_0100_0200_8080, 0x0000_0040_8102_0004,
    0x0000_2040_0080_0080, 0x0000_2000_4000_8080, 0x0000_1000_2000_8080, 0x0000_0800_1000_8080,
    0x0000_0400_0800_8080, 0x0000_0200_0400_8080, 0x0000_8001_0002_0080, 0x0000_8000_4100_0080,
    0x00FF_FCDD_FCED_714A, 0x007F_FCDD_FCED_714A, 0x003F_FFCD_FFD8_8096, 0x0000_0408_1000_2101,
    0x0001_0002_0408_0011, 0x0001_0002_0400_0801, 0x0001_0000_8200_0401, 0x0001_FFFA_ABFA_D1A2,
];

#[rustfmt::skip]
const BISHOP_MAGICS: [u64; 64] = [
    0x0002_0202_0202_0200, 0x0002_0202_0202_0000, 0x0004_0102_0200_0000, 0x0004_0400_8000_0000,
    0x0001_1040_0000_0000, 0x0000_8210_4000_0000, 0x0000_4104_1040_0000, 0x0000_1041_0410_4000,
    0x0000_0404_0404_0400, 0x0000_0202_0202_0200, 0x0000_0401_0202_0000, 0x0000_0404_0080_0000,
    0x0000_0110_4000_0000, 0x0000_0082_1040_0000, 0x0000_0041_0410_4000, 0x0000_0020_8208_2000,
    0x0004_0008_0808_0800, 0x0002_0004_0404_0400, 0x0001_0002_0202_0200, 0x0000_8008_0200_4000,
    0x0000_8004_00A0_0000, 0x0000_2001_0088_4000, 0x0000_4000_8208_2000, 0x0000_2000_4104_1000,
    0x0002_0800_1010_1000, 0x0001_0400_0808_0800, 0x0000_2080_0401_0400, 0x0000_4040_0401_0200,
    0x0000_8400_0080_2000, 0x0000_4040_0201_1000, 0x0000_8080_0104_1000, 0x0000_4040_0082_0800,
    0x0001_0410_0020_2000, 0x0000_8208_0010_1000, 0x0000_1044_0008_0800, 0x0000_0200_8008_0080,
    0x0000_4040_4004_0100, 0x0000_8081_0002_0100, 0x0001_0101_0002_0800, 0x0000_8080_8001_0400,
    0x0000_8208_2000_4000, 0x0000_4104_1000_2000, 0x0000_0820_8800_1000, 0x0000_0020_1100_0800,
    0x0000_0801_0040_0400, 0x0001_0101_0100_0200, 0x0002_0202_0200_0400, 0x0001_0101_0100_0200,
    0x0000_4104_1040_0000, 0x0000_2082_0820_0000, 0x0000_0020_8410_0000, 0x0000_0000_2088_0000,
    0x0000_0010_0202_0000, 0x0000_0404_0802_0000, 0x0004_0404_0404_0000, 0x0002_0202_0202_0000,
    0x0000_1041_0410_4000, 0x0000_0020_8208_2000, 0x0000_0000_2084_1000, 0x0000_0000_0020_8800,
    0x0000_0000_1002_0200, 0x0000_0004_0408_0200, 0x0000_0404_0404_0400, 0x0002_0202_0202_0200,
];

/// Rook relevance mask: rank and file rays, edges and origin excluded.
pub fn rook_mask(sq: usize) -> u64 {
    let (rank, file) = (sq / 8, sq % 8);
    let mut mask = 0u64;
    for r in rank + 1..7 {
        mask |= 1u64 << (r * 8 + file);
    }
    for r in 1..rank {
        mask |= 1u64 << (r * 8 + file);
    }
    for f in file + 1..7 {
        mask |= 1u64 << (rank * 8 + f);
    }
    for f in 1..file {
        mask |= 1u64 << (rank * 8 + f);
    }
    mask
}

/// Bishop relevance mask: diagonal rays, edges and origin excluded.
pub fn bishop_mask(sq: usize) -> u64 {
    let (rank, file) = ((sq / 8) as i32, (sq % 8) as i32);
    let mut mask = 0u64;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (rank + dr, file + df);
        while (1..7).contains(&r) && (1..7).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Enumerates every subset of `mask` as a blocker occupancy.
pub fn mask_subsets(mask: u64) -> Vec<u64> {
    let mut bits = Vec::with_capacity(mask.count_ones() as usize);
    let mut m = mask;
    while m != 0 {
        bits.push(pop_lsb(&mut m));
    }

    let count = 1usize << bits.len();
    let mut subsets = Vec::with_capacity(count);
    for index in 0..count {
        let mut occ = 0u64;
        for (j, &bit) in bits.iter().enumerate() {
            if index & (1 << j) != 0 {
                occ |= 1u64 << bit;
            }
        }
        subsets.push(occ);
    }
    subsets
}

fn build_entry(
    sq: usize,
    magic: u64,
    mask: u64,
    table_size: usize,
    slow: fn(usize, u64) -> u64,
) -> MagicEntry {
    let shift = 64 - mask.count_ones();
    let mut table = vec![0u64; table_size].into_boxed_slice();

    for occ in mask_subsets(mask) {
        let index = (occ.wrapping_mul(magic) >> shift) as usize;
        table[index] = slow(sq, occ);
    }

    MagicEntry {
        magic,
        shift,
        mask,
        table,
    }
}

/// Builds both tables from the fixed constants. Done once at startup.
pub fn build_magic_tables() -> MagicTables {
    let rook_entries = (0..64)
        .map(|sq| {
            build_entry(
                sq,
                ROOK_MAGICS[sq],
                rook_mask(sq),
                ROOK_TABLE_SIZE,
                rook_attacks_slow,
            )
        })
        .collect();

    let bishop_entries = (0..64)
        .map(|sq| {
            build_entry(
                sq,
                BISHOP_MAGICS[sq],
                bishop_mask(sq),
                BISHOP_TABLE_SIZE,
                bishop_attacks_slow,
            )
        })
        .collect();

    tracing::trace!("magic attack tables built");

    MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    }
}
