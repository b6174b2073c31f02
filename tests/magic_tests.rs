use rand::{Rng, SeedableRng, rngs::StdRng};
use tempo::moves::attacks::{bishop_attacks_slow, rook_attacks_slow};
use tempo::moves::magic::{self, precompute};

const SUBSETS_PER_SQUARE: usize = 64;

/// Draws a random subset of `mask` by keeping each set bit with
/// probability one half.
fn random_subset(rng: &mut StdRng, mask: u64) -> u64 {
    mask & rng.random::<u64>()
}

#[test]
fn rook_lookup_matches_ray_trace_everywhere() {
    let tables = magic::tables();
    let mut rng = StdRng::seed_from_u64(0x0DD5);

    for sq in 0..64 {
        let mask = precompute::rook_mask(sq);
        for blockers in [0, mask]
            .into_iter()
            .chain((0..SUBSETS_PER_SQUARE).map(|_| random_subset(&mut rng, mask)))
        {
            assert_eq!(
                tables.rook.get_attacks(sq, blockers),
                rook_attacks_slow(sq, blockers),
                "rook sq {sq} blockers {blockers:#018x}"
            );
        }
    }
}

#[test]
fn bishop_lookup_matches_ray_trace_everywhere() {
    let tables = magic::tables();
    let mut rng = StdRng::seed_from_u64(0xB155);

    for sq in 0..64 {
        let mask = precompute::bishop_mask(sq);
        for blockers in [0, mask]
            .into_iter()
            .chain((0..SUBSETS_PER_SQUARE).map(|_| random_subset(&mut rng, mask)))
        {
            assert_eq!(
                tables.bishop.get_attacks(sq, blockers),
                bishop_attacks_slow(sq, blockers),
                "bishop sq {sq} blockers {blockers:#018x}"
            );
        }
    }
}

#[test]
fn lookup_ignores_blockers_outside_the_mask() {
    // Pieces on the outer edge beyond the first blocker never change the
    // attack set; the mask strips them before hashing.
    let tables = magic::tables();
    let d4 = 27;
    let inside = 1u64 << 35; // d5
    let beyond = 1u64 << 59; // d8, shadowed and on the edge
    assert_eq!(
        tables.rook.get_attacks(d4, inside),
        tables.rook.get_attacks(d4, inside | beyond),
    );
}

#[test]
fn full_occupancy_still_resolves() {
    let tables = magic::tables();
    for sq in 0..64 {
        assert_eq!(
            tables.rook.get_attacks(sq, !0),
            rook_attacks_slow(sq, !0),
            "rook sq {sq} under full occupancy"
        );
        assert_eq!(
            tables.bishop.get_attacks(sq, !0),
            bishop_attacks_slow(sq, !0),
            "bishop sq {sq} under full occupancy"
        );
    }
}

#[test]
fn queen_is_the_union() {
    let tables = magic::tables();
    let mut rng = StdRng::seed_from_u64(0x0EE7);
    for _ in 0..256 {
        let sq = rng.random_range(0..64usize);
        let occupied: u64 = rng.random();
        assert_eq!(
            tables.queen_attacks(sq, occupied),
            rook_attacks_slow(sq, occupied) | bishop_attacks_slow(sq, occupied)
        );
    }
}
