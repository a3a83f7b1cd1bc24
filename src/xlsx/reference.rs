//! A1-style cell references.

/// Rows in a worksheet (Excel 2007 and later).
pub const MAX_ROWS: usize = 1_048_576;

/// Columns in a worksheet (`A` to `XFD`).
pub const MAX_COLUMNS: usize = 16_384;

/// Zero-based position of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

/// Parse an A1 reference (`B3`, `$AA$10`) into a zero-based position.
///
/// Returns `None` when the reference is malformed or lies outside the
/// `A1:XFD1048576` sheet bounds.
pub fn parse_cell_ref(reference: &str) -> Option<CellRef> {
    let reference = reference.trim();
    let bytes = reference.as_bytes();

    let mut i = 0;
    if bytes.get(i) == Some(&b'$') {
        i += 1;
    }

    let letters_start = i;
    let mut col: usize = 0;
    while let Some(b) = bytes.get(i).filter(|b| b.is_ascii_alphabetic()) {
        col = col
            .checked_mul(26)?
            .checked_add((b.to_ascii_uppercase() - b'A') as usize + 1)?;
        i += 1;
    }
    if i == letters_start {
        return None;
    }

    if bytes.get(i) == Some(&b'$') {
        i += 1;
    }

    let row: usize = reference.get(i..)?.parse().ok()?;
    if row == 0 || row > MAX_ROWS || col > MAX_COLUMNS {
        return None;
    }

    Some(CellRef {
        row: row - 1,
        col: col - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse_cell_ref("A1"), Some(CellRef { row: 0, col: 0 }));
        assert_eq!(parse_cell_ref("B3"), Some(CellRef { row: 2, col: 1 }));
        assert_eq!(parse_cell_ref("Z10"), Some(CellRef { row: 9, col: 25 }));
    }

    #[test]
    fn test_parse_multi_letter() {
        assert_eq!(parse_cell_ref("AA1").map(|r| r.col), Some(26));
        assert_eq!(parse_cell_ref("AZ1").map(|r| r.col), Some(51));
        assert_eq!(parse_cell_ref("XFD1048576"), Some(CellRef { row: 1_048_575, col: 16_383 }));
    }

    #[test]
    fn test_parse_absolute_and_lowercase() {
        assert_eq!(parse_cell_ref("$C$4"), Some(CellRef { row: 3, col: 2 }));
        assert_eq!(parse_cell_ref("c4"), Some(CellRef { row: 3, col: 2 }));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_cell_ref(""), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("A"), None);
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("A1B"), None);
    }

    #[test]
    fn test_parse_out_of_bounds() {
        assert_eq!(parse_cell_ref("XFE1"), None);
        assert_eq!(parse_cell_ref("A1048577"), None);
        assert_eq!(parse_cell_ref("A18446744073709551615"), None);
        assert_eq!(parse_cell_ref("A4000000000"), None);
    }
}
