//! Utilities for parsing Excel-style cell references.

/// Parse the column part of a cell reference like "B12" into a 0-indexed column.
///
/// Works on raw ASCII bytes as found in XML attribute values. `$` anchors are
/// ignored. Returns `None` if there are no column letters or the reference is
/// otherwise malformed.
pub fn parse_column_bytes(ref_bytes: &[u8]) -> Option<u32> {
    let mut col: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = b.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(u32::from(upper - b'A') + 1)?;
            saw_col = true;
        } else if b.is_ascii_digit() {
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col {
        return None;
    }

    Some(col - 1)
}
