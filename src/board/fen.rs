use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece};
use crate::square::Square;

fn piece_from_char(c: char) -> Option<(Color, Piece)> {
    let color = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let piece = match c.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return None,
    };
    Some((color, piece))
}

fn piece_to_char(color: Color, piece: Piece) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

impl Board {
    /// Loads a position from a six-field FEN string, replacing all state.
    /// The undo stack is cleared and the history seeded with the new hash.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or("FEN: missing piece placement")?;
        let side = fields.next().ok_or("FEN: missing side to move")?;
        let castling = fields.next().ok_or("FEN: missing castling rights")?;
        let en_passant = fields.next().ok_or("FEN: missing en-passant field")?;
        // Clocks default to 0/1 when absent, as in abbreviated FENs.
        let halfmove = fields.next().unwrap_or("0");
        let fullmove = fields.next().unwrap_or("1");

        let mut piece_bb = [[0u64; 6]; 2];
        let mut rank: i32 = 7;
        let mut file: i32 = 0;
        for c in placement.chars() {
            match c {
                '/' => {
                    rank -= 1;
                    file = 0;
                    if rank < 0 {
                        return Err("FEN: too many ranks".into());
                    }
                }
                '1'..='8' => {
                    file += c as i32 - '0' as i32;
                }
                _ => {
                    let (color, piece) =
                        piece_from_char(c).ok_or_else(|| format!("FEN: bad piece char {c:?}"))?;
                    if file > 7 {
                        return Err(format!("FEN: rank overflow at {c:?}"));
                    }
                    let sq = Square::make(rank as u8, file as u8);
                    piece_bb[color as usize][piece as usize] |= sq.bb();
                    file += 1;
                }
            }
            if file > 8 {
                return Err("FEN: rank overflow".into());
            }
        }

        let side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(format!("FEN: bad side to move {side:?}")),
        };

        let mut castling_rights = 0u8;
        if castling != "-" {
            for c in castling.chars() {
                castling_rights |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => return Err(format!("FEN: bad castling char {c:?}")),
                };
            }
        }

        let ep_square = if en_passant == "-" {
            None
        } else {
            Some(en_passant.parse::<Square>()?)
        };

        let halfmove_clock: u32 = halfmove
            .parse()
            .map_err(|_| format!("FEN: bad halfmove clock {halfmove:?}"))?;
        let fullmove_number: u32 = fullmove
            .parse()
            .map_err(|_| format!("FEN: bad fullmove number {fullmove:?}"))?;

        self.piece_bb = piece_bb;
        self.side_to_move = side_to_move;
        self.castling_rights = castling_rights;
        self.en_passant = ep_square;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self.rebuild_occupancies();
        self.refresh_zobrist();
        self.undo_stack.clear();
        self.history.clear();
        self.history.push(self.zobrist);

        Ok(())
    }

    /// Emits the position as a six-field FEN, exactly parseable by
    /// [`Board::set_fen`].
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::make(rank, file);
                match self.piece_at(sq) {
                    None => empty += 1,
                    Some((color, piece)) => {
                        if empty > 0 {
                            fen.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        fen.push(piece_to_char(color, piece));
                    }
                }
            }
            if empty > 0 {
                fen.push((b'0' + empty) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            if self.has_castling(CASTLE_WK) {
                fen.push('K');
            }
            if self.has_castling(CASTLE_WQ) {
                fen.push('Q');
            }
            if self.has_castling(CASTLE_BK) {
                fen.push('k');
            }
            if self.has_castling(CASTLE_BQ) {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant {
            None => fen.push('-'),
            Some(ep) => fen.push_str(&ep.to_string()),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;
    use std::str::FromStr;

    #[test]
    fn startpos_roundtrip() {
        let board = Board::new();
        assert_eq!(board.to_fen(), START_FEN);
    }

    #[test]
    fn parses_all_fields() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        let board = Board::from_str(fen).expect("valid FEN");
        assert_eq!(board.side_to_move, Color::White);
        assert_eq!(board.castling_rights, 0b1111);
        assert_eq!(board.en_passant, Some("f6".parse().unwrap()));
        assert_eq!(board.halfmove_clock, 0);
        assert_eq!(board.fullmove_number, 3);
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Board::from_str("not a fen").is_err());
        assert!(Board::from_str("8/8/8/8/8/8/8/9 w - - 0 1").is_err());
        assert!(Board::from_str("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
    }
}
