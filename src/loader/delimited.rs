//! Minimal CSV/TSV reader producing two-column records.

use crate::table::RawRecord;

/// Field delimiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// Parse CSV/TSV bytes into records, keeping the first two fields of each line.
///
/// Lines that are completely empty are skipped; a line with fewer than two
/// fields yields absent cells. Invalid UTF-8 is replaced, never rejected.
#[must_use]
pub fn parse_delimited(data: &[u8], delim: Delimiter) -> Vec<RawRecord> {
    let text = String::from_utf8_lossy(data);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    let sep = delim.as_char();

    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = split_csv_line(line, sep).into_iter();
            RawRecord {
                id: fields.next(),
                status: fields.next(),
            }
        })
        .collect()
}

/// Split a CSV line respecting quoted fields.
fn split_csv_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}
