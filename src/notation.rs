//! Algebraic cell notation.
//!
//! Columns are letters `A..H` (left to right), rows are digits `1..8` with
//! row 1 at the top, so `A1` is the top-left cell. Parsing is
//! case-insensitive.

use crate::board::Move;

/// Parse algebraic input like `"A1"` or `"h8"`.
pub fn parse_square(input: &str) -> Result<Move, String> {
    let s = input.trim();
    if s.len() < 2 {
        return Err(format!("'{}' is too short, use e.g. A1", s));
    }
    let mut chars = s.chars();
    let col_char = chars.next().unwrap().to_ascii_uppercase();
    if !('A'..='H').contains(&col_char) {
        return Err(format!("column '{}' out of range A-H", col_char));
    }
    let col = col_char as u8 - b'A';
    let row: u8 = chars
        .as_str()
        .parse()
        .map_err(|_| format!("'{}' has no valid row number", s))?;
    if !(1..=8).contains(&row) {
        return Err(format!("row {} out of range 1-8", row));
    }
    Ok(Move::new(row - 1, col))
}

/// Format a cell as algebraic notation, e.g. `(0, 0)` -> `"A1"`.
pub fn format_square(mv: Move) -> String {
    format!("{}{}", (b'A' + mv.c) as char, mv.r + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_corners() {
        assert_eq!(parse_square("A1"), Ok(Move::new(0, 0)));
        assert_eq!(parse_square("H1"), Ok(Move::new(0, 7)));
        assert_eq!(parse_square("A8"), Ok(Move::new(7, 0)));
        assert_eq!(parse_square("h8"), Ok(Move::new(7, 7)));
        assert_eq!(parse_square(" d5 "), Ok(Move::new(4, 3)));
    }

    #[test]
    fn rejects_out_of_range_input() {
        assert!(parse_square("").is_err());
        assert!(parse_square("A").is_err());
        assert!(parse_square("I1").is_err());
        assert!(parse_square("A0").is_err());
        assert!(parse_square("A9").is_err());
        assert!(parse_square("AX").is_err());
    }

    #[test]
    fn round_trips_every_cell() {
        for idx in 0..64u8 {
            let mv = Move::from_index(idx);
            assert_eq!(parse_square(&format_square(mv)), Ok(mv));
        }
    }
}
