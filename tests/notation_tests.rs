use std::str::FromStr;
use tempo::board::Board;
use tempo::moves::execute::make_move;
use tempo::moves::magic;
use tempo::notation::{
    algebraic_to_move, coordinate_to_move, legal_moves_algebraic, move_to_algebraic,
    move_to_coordinate,
};

fn render(fen: &str, coord: &str) -> String {
    let tables = magic::tables();
    let mut board = Board::from_str(fen).expect("valid FEN");
    let mv = coordinate_to_move(&mut board, tables, coord)
        .unwrap_or_else(|| panic!("{coord} not legal in {fen}"));
    move_to_algebraic(&mut board, tables, mv)
}

#[test]
fn coordinate_form_roundtrip() {
    let tables = magic::tables();
    let mut board = Board::new();
    let mv = coordinate_to_move(&mut board, tables, "e2e4").expect("legal");
    assert_eq!(move_to_coordinate(mv), "e2e4");

    let mut promo_board = Board::from_str("8/4P3/8/8/8/8/8/4K2k w - - 0 1").unwrap();
    let promo = coordinate_to_move(&mut promo_board, tables, "e7e8n").expect("legal");
    assert_eq!(move_to_coordinate(promo), "e7e8n");
    assert_eq!(promo.promotion(), Some(tempo::board::Piece::Knight));
}

#[test]
fn coordinate_parse_rejects_illegal_and_garbage() {
    let tables = magic::tables();
    let mut board = Board::new();
    assert!(coordinate_to_move(&mut board, tables, "e2e5").is_none());
    assert!(coordinate_to_move(&mut board, tables, "e7e5").is_none());
    assert!(coordinate_to_move(&mut board, tables, "zz").is_none());
    assert!(coordinate_to_move(&mut board, tables, "x1y2").is_none());
}

#[test]
fn basic_san_rendering() {
    let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    assert_eq!(render(start, "e2e4"), "e4");
    assert_eq!(render(start, "g1f3"), "Nf3");
}

#[test]
fn captures_get_an_x_and_pawns_their_file() {
    // 1.e4 d5 position: exd5 available
    let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
    assert_eq!(render(fen, "e4d5"), "exd5");

    // Knight takes a pawn
    let fen = "rnbqkbnr/ppp1pppp/8/3p4/8/2N5/PPPPPPPP/R1BQKBNR w KQkq - 0 2";
    assert_eq!(render(fen, "c3d5"), "Nxd5");
}

#[test]
fn castling_renders_as_o_o() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    assert_eq!(render(fen, "e1g1"), "O-O");
    assert_eq!(render(fen, "e1c1"), "O-O-O");
}

#[test]
fn promotion_renders_with_equals() {
    let fen = "8/4P3/8/8/8/8/8/4K2k w - - 0 1";
    assert_eq!(render(fen, "e7e8r"), "e8=R");
    assert_eq!(render(fen, "e7e8q"), "e8=Q");

    // Capturing promotion keeps the pawn-file prefix and the x; the new
    // queen checks along the back rank
    let fen = "k6r/6P1/8/8/8/8/8/4K3 w - - 0 1";
    assert_eq!(render(fen, "g7h8q"), "gxh8=Q+");
}

#[test]
fn disambiguation_by_file_and_rank() {
    // Two knights can reach d2: Nbd2 vs Nfd2
    let fen = "4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1";
    assert_eq!(render(fen, "b1d2"), "Nbd2");
    assert_eq!(render(fen, "f3d2"), "Nfd2");

    // Doubled rooks on a file disambiguate by rank
    let fen = "4k3/8/8/R7/8/8/R7/4K3 w - - 0 1";
    assert_eq!(render(fen, "a2a4"), "R2a4");
    assert_eq!(render(fen, "a5a4"), "R5a4");
}

#[test]
fn check_and_mate_annotations() {
    // Rook slides over for check
    let fen = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1";
    assert_eq!(render(fen, "a1a8"), "Ra8+");

    // Back-rank mate with the king boxed in by its own pawns
    let fen = "6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1";
    assert_eq!(render(fen, "a1a8"), "Ra8#");
}

#[test]
fn algebraic_parsing_roundtrips_every_legal_move() {
    let tables = magic::tables();
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/4P3/8/8/8/8/8/4K2k w - - 0 1",
    ];
    for fen in fens {
        let mut board = Board::from_str(fen).unwrap();
        for rendered in legal_moves_algebraic(&mut board, tables) {
            let parsed = algebraic_to_move(&mut board, tables, &rendered);
            assert!(parsed.is_some(), "failed to parse back {rendered} in {fen}");
        }
    }
}

#[test]
fn algebraic_parser_accepts_coordinate_fallback() {
    let tables = magic::tables();
    let mut board = Board::new();
    let mv = algebraic_to_move(&mut board, tables, "b1c3").expect("coordinate fallback");
    make_move(&mut board, mv);
    assert_eq!(board.to_fen().split(' ').next().unwrap().matches('N').count(), 2);
}
