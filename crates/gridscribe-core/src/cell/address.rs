//! Cell address type
//!
//! Converts between A1-style references (column letters followed by a 1-based
//! row number) and zero-based `(row, col)` coordinates.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A zero-based cell address (e.g., "B12" is row 11, column 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// The reference must be one or more ASCII letters followed by one or more
    /// digits. Letters are case-insensitive.
    ///
    /// # Examples
    /// ```
    /// use gridscribe_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!((addr.row, addr.col), (0, 0));
    ///
    /// let addr = CellAddress::parse("aa1").unwrap();
    /// assert_eq!((addr.row, addr.col), (0, 26));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidFormat("empty address".into()));
        }

        let bytes = s.as_bytes();
        let letters_end = bytes
            .iter()
            .position(|b| !b.is_ascii_alphabetic())
            .unwrap_or(bytes.len());

        if letters_end == 0 {
            return Err(Error::InvalidFormat(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let digits = &s[letters_end..];
        if digits.is_empty() {
            return Err(Error::InvalidFormat(format!("no row number in '{}'", s)));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidFormat(format!(
                "unexpected character in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[..letters_end])?;
        let row = Self::parse_row(digits)?;

        Ok(Self { row, col })
    }

    /// Check whether a token has the shape of a cell address (`[A-Za-z]+[0-9]+`)
    ///
    /// This only checks the grammar; the row or column may still be out of range.
    pub fn is_address(token: &str) -> bool {
        let letters = token.bytes().take_while(u8::is_ascii_alphabetic).count();
        let rest = &token.as_bytes()[letters..];
        letters > 0 && !rest.is_empty() && rest.iter().all(u8::is_ascii_digit)
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidFormat("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidFormat(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                return Err(Error::InvalidColumn(letters.to_ascii_uppercase()));
            }
        }

        Ok((col - 1) as u16)
    }

    fn parse_row(digits: &str) -> Result<u32> {
        // All-digit input only fails to parse on overflow
        let row: u64 = digits
            .parse()
            .map_err(|_| Error::InvalidRow(digits.to_string()))?;

        if row < 1 || row > MAX_ROWS as u64 {
            return Err(Error::InvalidRow(digits.to_string()));
        }

        Ok(row as u32 - 1)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(27), "AB");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(702), "AAA");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("Z").unwrap(), 25);
        assert_eq!(CellAddress::letters_to_column("AA").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16383);

        // Case insensitive
        assert_eq!(CellAddress::letters_to_column("a").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("aB").unwrap(), 27);

        assert!(matches!(
            CellAddress::letters_to_column("XFE"),
            Err(Error::InvalidColumn(_))
        ));
    }

    #[test]
    fn test_cell_address_parse() {
        assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(CellAddress::parse("B2").unwrap(), CellAddress::new(1, 1));
        assert_eq!(CellAddress::parse("AA1").unwrap(), CellAddress::new(0, 26));
        assert_eq!(CellAddress::parse("b12").unwrap(), CellAddress::new(11, 1));
        assert_eq!(
            CellAddress::parse("XFD1048576").unwrap(),
            CellAddress::new(1_048_575, 16383)
        );
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(matches!(CellAddress::parse(""), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("A"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("12"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("1A"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("A1B"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("$A$1"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("A 1"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("A0"), Err(Error::InvalidRow(_))));
        assert!(matches!(CellAddress::parse("A1048577"), Err(Error::InvalidRow(_))));
        assert!(matches!(
            CellAddress::parse("A99999999999999999999999"),
            Err(Error::InvalidRow(_))
        ));
    }

    #[test]
    fn test_is_address() {
        assert!(CellAddress::is_address("A1"));
        assert!(CellAddress::is_address("zz900"));
        assert!(!CellAddress::is_address("10"));
        assert!(!CellAddress::is_address("Hello"));
        assert!(!CellAddress::is_address("1A"));
        assert!(!CellAddress::is_address(""));
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(0, 0).to_string(), "A1");
        assert_eq!(CellAddress::new(99, 2).to_string(), "C100");
        assert_eq!("ab7".parse::<CellAddress>().unwrap().to_string(), "AB7");
    }

    proptest! {
        #[test]
        fn column_letters_round_trip(col in 0u16..MAX_COLS) {
            let reference = format!("{}1", CellAddress::column_to_letters(col));
            let addr = CellAddress::parse(&reference).unwrap();
            prop_assert_eq!(addr.col, col);
            prop_assert_eq!(addr.row, 0);
        }
    }
}
