//! Spreadsheet cell range references, as found in chart formulas (`<c:f>`).
//!
//! `Sheet1!$B$2:$B$5` is column `B` (index 1), rows 2 to 5 of `Sheet1`.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// `0` -> `"A"`, `25` -> `"Z"`, `26` -> `"AA"`
pub fn column_to_letters(column: usize) -> String {
    let mut letters = Vec::new();
    let mut n = column;
    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.reverse();
    // only ascii uppercase was pushed
    letters.into_iter().map(char::from).collect()
}

/// `"A"` -> `0`, `"AA"` -> `26`. Lowercase letters are accepted.
pub fn letters_to_column(letters: &str) -> Option<usize> {
    let mut column: Option<usize> = None;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize;
        column = Some(match column {
            None => digit,
            Some(prev) => prev.checked_add(1)?.checked_mul(26)?.checked_add(digit)?,
        });
    }
    column
}

/// One cell, `$B$2`. `column` is 0-based, `row` is 1-based as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
    pub absolute_column: bool,
    pub absolute_row: bool,
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<CellRef> {
        let invalid = || Error::InvalidRange(s.to_string());
        let (absolute_column, rest) = match s.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let split = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let column = letters_to_column(&rest[..split]).ok_or_else(invalid)?;
        let rest = &rest[split..];
        let (absolute_row, digits) = match rest.strip_prefix('$') {
            Some(digits) => (true, digits),
            None => (false, rest),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let row: usize = digits.parse().map_err(|_| invalid())?;
        Ok(CellRef {
            column,
            row,
            absolute_column,
            absolute_row,
        })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute_column {
            f.write_str("$")?;
        }
        f.write_str(&column_to_letters(self.column))?;
        if self.absolute_row {
            f.write_str("$")?;
        }
        write!(f, "{}", self.row)
    }
}

/// `[Sheet!]start[:end]`. The sheet name is kept verbatim, quotes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: Option<String>,
    pub start: CellRef,
    pub end: Option<CellRef>,
}

impl CellRange {
    /// Move the range to the column of `series` (`0` is column `A`).
    /// With `length`, the range spans `length` rows from its start row.
    ///
    /// ```
    /// use xml_modify::range::CellRange;
    ///
    /// let range: CellRange = "Sheet1!$B$2:$B$5".parse().unwrap();
    /// assert_eq!(range.with_series(3, Some(6)).unwrap().to_string(), "Sheet1!$D$2:$D$7");
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if the end row doesn't fit in a `usize`.
    pub fn with_series(&self, series: usize, length: Option<usize>) -> Result<CellRange> {
        let mut range = self.clone();
        range.start.column = series;
        if let Some(end) = range.end.as_mut() {
            end.column = series;
        }
        match length {
            Some(length) if length > 1 => {
                let mut end = range.end.unwrap_or(range.start);
                end.column = series;
                end.row = range
                    .start
                    .row
                    .checked_add(length - 1)
                    .ok_or_else(|| Error::InvalidRange(self.to_string()))?;
                range.end = Some(end);
            }
            Some(_) => range.end = None,
            None => {}
        }
        Ok(range)
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<CellRange> {
        let s = s.trim();
        let (sheet, cells) = match s.rfind('!') {
            Some(pos) => (Some(s[..pos].to_string()), &s[pos + 1..]),
            None => (None, s),
        };
        if sheet.as_deref() == Some("") {
            return Err(Error::InvalidRange(s.to_string()));
        }
        let (start, end) = match cells.split_once(':') {
            Some((start, end)) => (start.parse()?, Some(end.parse()?)),
            None => (cells.parse()?, None),
        };
        Ok(CellRange { sheet, start, end })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sheet) = &self.sheet {
            write!(f, "{}!", sheet)?;
        }
        write!(f, "{}", self.start)?;
        if let Some(end) = &self.end {
            write!(f, ":{}", end)?;
        }
        Ok(())
    }
}

/// Rewrite the range text `range` for another series column and optional length.
pub fn set_range(range: &str, series: usize, length: Option<usize>) -> Result<String> {
    let range: CellRange = range.parse()?;
    Ok(range.with_series(series, length)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        for (column, letters) in &[(0, "A"), (1, "B"), (25, "Z"), (26, "AA"), (27, "AB"), (701, "ZZ"), (702, "AAA")] {
            assert_eq!(column_to_letters(*column), *letters);
            assert_eq!(letters_to_column(letters), Some(*column));
        }
        assert_eq!(letters_to_column("b"), Some(1));
        assert_eq!(letters_to_column(""), None);
        assert_eq!(letters_to_column("A1"), None);
    }

    #[test]
    fn test_parse_range() {
        let range: CellRange = "Sheet1!$B$2:$B$5".parse().unwrap();
        assert_eq!(range.sheet.as_deref(), Some("Sheet1"));
        assert_eq!(range.start.column, 1);
        assert_eq!(range.start.row, 2);
        assert_eq!(range.end.unwrap().row, 5);
        assert_eq!(range.to_string(), "Sheet1!$B$2:$B$5");

        let quoted: CellRange = "'My Data'!C1".parse().unwrap();
        assert_eq!(quoted.sheet.as_deref(), Some("'My Data'"));
        assert!(!quoted.start.absolute_column);
        assert_eq!(quoted.to_string(), "'My Data'!C1");
    }

    #[test]
    fn test_parse_invalid() {
        for text in &["", "Sheet1!", "!$A$1", "Sheet1!$1$A", "Sheet1!$A$", "Sheet1!$A$1:"] {
            assert!(
                matches!(text.parse::<CellRange>(), Err(Error::InvalidRange(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn test_set_range() {
        assert_eq!(
            set_range("Sheet1!$B$2:$B$5", 2, None).unwrap(),
            "Sheet1!$C$2:$C$5"
        );
        assert_eq!(
            set_range("Sheet1!$B$2:$B$5", 1, Some(2)).unwrap(),
            "Sheet1!$B$2:$B$3"
        );
        // series name cell
        assert_eq!(set_range("Sheet1!$B$1", 4, None).unwrap(), "Sheet1!$E$1");
        assert_eq!(
            set_range("Sheet1!$A$2", 0, Some(3)).unwrap(),
            "Sheet1!$A$2:$A$4"
        );
        assert_eq!(set_range("Sheet1!$A$2:$A$9", 0, Some(1)).unwrap(), "Sheet1!$A$2");
        assert!(set_range("not a range", 1, None).is_err());
    }

    #[test]
    fn test_huge_series_and_length() {
        let letters = column_to_letters(usize::MAX);
        assert_eq!(letters_to_column(&letters), Some(usize::MAX));
        assert_eq!(letters_to_column(&format!("{}A", letters)), None);
        assert_eq!(
            set_range("Sheet1!$A$1", usize::MAX, None).unwrap(),
            format!("Sheet1!${}$1", column_to_letters(usize::MAX))
        );
        assert!(matches!(
            set_range("Sheet1!$A$2", 0, Some(usize::MAX)),
            Err(Error::InvalidRange(_))
        ));
    }
}
