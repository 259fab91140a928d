//! CSV price feed parser
//!
//! The header row decides where the product name and price live; any other
//! columns are ignored. Each data row then yields either an
//! [`IngestedRecord`] or a [`SkippedRow`]:
//!
//! | Price field        | Outcome                            |
//! |--------------------|------------------------------------|
//! | `9.99`             | record                             |
//! | `0`, `0.00`, `-0`  | skipped, [`SkipReason::ZeroPrice`] |
//! | `abc`, empty       | skipped, [`SkipReason::UnparseablePrice`] |
//! | `-3`, `NaN`, `inf` | skipped, [`SkipReason::InvalidPrice`] |
//!
//! Structural problems (ragged rows, broken quoting, invalid UTF-8) fail the
//! whole feed with [`FeedError::Malformed`].

use catalog_common::IngestedRecord;
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::debug;

use super::{FeedError, Result};

/// Header naming the product column
pub const NAME_COLUMN: &str = "product_name";

/// Header naming the price column
pub const PRICE_COLUMN: &str = "price";

/// Why a row was left out of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnparseablePrice,
    ZeroPrice,
    InvalidPrice,
    MissingName,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnparseablePrice => write!(f, "price is not a number"),
            SkipReason::ZeroPrice => write!(f, "price is zero"),
            SkipReason::InvalidPrice => write!(f, "price is negative or not finite"),
            SkipReason::MissingName => write!(f, "product name is empty"),
        }
    }
}

/// A data row that did not produce a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the feed (the header is line 1)
    pub line: u64,
    pub reason: SkipReason,
}

/// Outcome of parsing a feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeed {
    /// Usable records, in feed order
    pub records: Vec<IngestedRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl ParsedFeed {
    /// Number of data rows seen, usable or not
    pub fn rows(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Parse a complete feed body
pub fn parse_feed(data: &[u8]) -> Result<ParsedFeed> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(FeedError::EmptyFeed);
    }

    let name_idx = column_index(&headers, NAME_COLUMN)?;
    let price_idx = column_index(&headers, PRICE_COLUMN)?;

    let mut feed = ParsedFeed::default();

    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        match parse_row(&row, name_idx, price_idx) {
            Ok(record) => feed.records.push(record),
            Err(reason) => {
                debug!(line, %reason, "Skipping feed row");
                feed.skipped.push(SkippedRow { line, reason });
            },
        }
    }

    Ok(feed)
}

fn column_index(headers: &StringRecord, column: &'static str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(column))
        .ok_or(FeedError::MissingColumn(column))
}

fn parse_row(
    row: &StringRecord,
    name_idx: usize,
    price_idx: usize,
) -> std::result::Result<IngestedRecord, SkipReason> {
    let price = parse_price(row.get(price_idx).unwrap_or_default())?;

    let name = row.get(name_idx).unwrap_or_default().trim();
    if name.is_empty() {
        return Err(SkipReason::MissingName);
    }

    Ok(IngestedRecord::new(name, price))
}

/// Apply the per-row price policy
pub(crate) fn parse_price(raw: &str) -> std::result::Result<f64, SkipReason> {
    let price: f64 = raw.trim().parse().map_err(|_| SkipReason::UnparseablePrice)?;

    if price == 0.0 {
        return Err(SkipReason::ZeroPrice);
    }
    if !price.is_finite() || price < 0.0 {
        return Err(SkipReason::InvalidPrice);
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_drops_zero_and_unparseable_prices() {
        let data = b"product_name,price\nWidget,9.99\nGadget,0\nGizmo,abc\n";

        let feed = parse_feed(data).unwrap();

        assert_eq!(feed.records, vec![IngestedRecord::new("Widget", 9.99)]);
        assert_eq!(
            feed.skipped,
            vec![
                SkippedRow { line: 3, reason: SkipReason::ZeroPrice },
                SkippedRow { line: 4, reason: SkipReason::UnparseablePrice },
            ]
        );
        assert_eq!(feed.rows(), 3);
    }

    #[test]
    fn test_parse_feed_header_is_case_insensitive() {
        let data = b"SKU,Product_Name,PRICE\n1,Widget,1.5\n2,Gadget,2\n";

        let feed = parse_feed(data).unwrap();

        assert_eq!(
            feed.records,
            vec![IngestedRecord::new("Widget", 1.5), IngestedRecord::new("Gadget", 2.0)]
        );
    }

    #[test]
    fn test_parse_feed_preserves_row_order() {
        let data = b"price,product_name\n3,c\n1,a\n2,b\n";

        let names: Vec<_> = parse_feed(data)
            .unwrap()
            .records
            .into_iter()
            .map(|r| r.name)
            .collect();

        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_parse_feed_quoted_fields() {
        let data = b"product_name,price\n\"Widget, large\",\"12.50\"\n";

        let feed = parse_feed(data).unwrap();

        assert_eq!(feed.records, vec![IngestedRecord::new("Widget, large", 12.5)]);
    }

    #[test]
    fn test_parse_feed_missing_price_column() {
        let err = parse_feed(b"product_name,cost\nWidget,1\n").unwrap_err();
        assert!(matches!(err, FeedError::MissingColumn(PRICE_COLUMN)));
    }

    #[test]
    fn test_parse_feed_missing_name_column() {
        let err = parse_feed(b"name,price\nWidget,1\n").unwrap_err();
        assert!(matches!(err, FeedError::MissingColumn(NAME_COLUMN)));
    }

    #[test]
    fn test_parse_feed_empty_body() {
        assert!(matches!(parse_feed(b"").unwrap_err(), FeedError::EmptyFeed));
    }

    #[test]
    fn test_parse_feed_header_only() {
        let feed = parse_feed(b"product_name,price\n").unwrap();
        assert!(feed.records.is_empty());
        assert!(feed.skipped.is_empty());
    }

    #[test]
    fn test_parse_feed_ragged_row_is_malformed() {
        let err = parse_feed(b"product_name,price\nWidget,1,extra\n").unwrap_err();
        assert!(matches!(err, FeedError::Malformed(_)));
    }

    #[test]
    fn test_parse_feed_skips_blank_names() {
        let feed = parse_feed(b"product_name,price\n  ,4\nWidget,5\n").unwrap();

        assert_eq!(feed.records, vec![IngestedRecord::new("Widget", 5.0)]);
        assert_eq!(feed.skipped[0].reason, SkipReason::MissingName);
    }

    #[test]
    fn test_parse_price_policy() {
        assert_eq!(parse_price("9.99"), Ok(9.99));
        assert_eq!(parse_price(" 7 "), Ok(7.0));
        assert_eq!(parse_price("1e2"), Ok(100.0));
        assert_eq!(parse_price("0"), Err(SkipReason::ZeroPrice));
        assert_eq!(parse_price("0.000"), Err(SkipReason::ZeroPrice));
        assert_eq!(parse_price("-0"), Err(SkipReason::ZeroPrice));
        assert_eq!(parse_price(""), Err(SkipReason::UnparseablePrice));
        assert_eq!(parse_price("abc"), Err(SkipReason::UnparseablePrice));
        assert_eq!(parse_price("$5"), Err(SkipReason::UnparseablePrice));
        assert_eq!(parse_price("-3"), Err(SkipReason::InvalidPrice));
        assert_eq!(parse_price("NaN"), Err(SkipReason::InvalidPrice));
        assert_eq!(parse_price("inf"), Err(SkipReason::InvalidPrice));
    }
}
