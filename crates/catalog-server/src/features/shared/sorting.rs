//! Sort options for catalog listings
//!
//! Callers name the sort field as a string; only the fields below are
//! accepted. An absent or blank field means [`SortField::Name`], and an
//! absent direction means ascending.

use catalog_common::CatalogError;
use serde::{Deserialize, Serialize};

/// Field a product listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Case-insensitive, locale-aware text order
    #[default]
    Name,
    Price,
    PriceChangeCount,
    LastUpdate,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Name,
        SortField::Price,
        SortField::PriceChangeCount,
        SortField::LastUpdate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::PriceChangeCount => "price_change_count",
            SortField::LastUpdate => "last_update",
        }
    }

    /// Resolve an optional caller-supplied field name
    pub fn from_request(raw: Option<&str>) -> Result<Self, CatalogError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(SortField::default()),
            Some(name) => name.parse(),
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "price" => Ok(SortField::Price),
            // `price_changes` is the name the field was stored under historically
            "price_change_count" | "price_changes" => Ok(SortField::PriceChangeCount),
            "last_update" => Ok(SortField::LastUpdate),
            other => Err(CatalogError::Parse(format!(
                "unknown sort field '{}', expected one of: {}",
                other,
                SortField::ALL.map(SortField::as_str).join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: Option<bool>) -> Self {
        match ascending {
            Some(false) => SortOrder::Descending,
            Some(true) | None => SortOrder::Ascending,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Resolved ordering for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_defaults_to_name() {
        assert_eq!(SortField::from_request(None).unwrap(), SortField::Name);
        assert_eq!(SortField::from_request(Some("")).unwrap(), SortField::Name);
        assert_eq!(SortField::from_request(Some("   ")).unwrap(), SortField::Name);
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!("price".parse::<SortField>().unwrap(), SortField::Price);
        assert_eq!("Last_Update".parse::<SortField>().unwrap(), SortField::LastUpdate);
        assert_eq!(
            "price_changes".parse::<SortField>().unwrap(),
            SortField::PriceChangeCount
        );
        assert_eq!(
            SortField::from_request(Some("price_change_count")).unwrap(),
            SortField::PriceChangeCount
        );
    }

    #[test]
    fn test_sort_field_rejects_unknown() {
        let err = SortField::from_request(Some("colour")).unwrap_err();
        assert!(err.to_string().contains("unknown sort field 'colour'"));
        assert!(err.to_string().contains("price_change_count"));
    }

    #[test]
    fn test_sort_order_default_is_ascending() {
        assert_eq!(SortOrder::from_ascending(None), SortOrder::Ascending);
        assert_eq!(SortOrder::from_ascending(Some(true)), SortOrder::Ascending);
        assert_eq!(SortOrder::from_ascending(Some(false)), SortOrder::Descending);
    }
}
