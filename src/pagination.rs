//! This modules defines the common functionality for paging data.

use serde::Deserialize;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for.
    ///
    /// Larger requests are clamped to this value.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// The raw paging parameters of a request.
///
/// The values are kept as strings so that junk input falls back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// The 1-based page number.
    pub page: Option<String>,
    /// The number of records per page.
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The 1-based page number.
    pub number: u64,
    /// The number of records per page, at least 1.
    pub size: u64,
}

impl Page {
    /// Resolve the raw request parameters against `config`.
    ///
    /// Missing or non-integer values use the configured defaults. A page
    /// number or size below 1 is clamped to 1 and a size above
    /// [PaginationConfig::max_page_size] is clamped to the maximum.
    pub fn resolve(query: &PageQuery, config: &PaginationConfig) -> Self {
        let number = parse_or(query.page.as_deref(), config.default_page as i64);
        let size = parse_or(query.per_page.as_deref(), config.default_page_size as i64);
        let max_size = config.max_page_size.max(1);

        Self {
            number: number.max(1) as u64,
            size: (size.max(1) as u64).min(max_size),
        }
    }

    /// The number of records to skip before this page.
    ///
    /// Saturates at the largest offset SQLite accepts.
    pub fn offset(&self) -> u64 {
        (self.number - 1)
            .saturating_mul(self.size)
            .min(i64::MAX as u64)
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::{Page, PageQuery, PaginationConfig};

    fn query(page: Option<&str>, per_page: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_owned),
            per_page: per_page.map(str::to_owned),
        }
    }

    #[test]
    fn uses_defaults_when_missing() {
        let got = Page::resolve(&query(None, None), &PaginationConfig::default());

        assert_eq!(got, Page { number: 1, size: 10 });
        assert_eq!(got.offset(), 0);
    }

    #[test]
    fn second_page_skips_first_page() {
        let got = Page::resolve(&query(Some("2"), Some("5")), &PaginationConfig::default());

        assert_eq!(got, Page { number: 2, size: 5 });
        assert_eq!(got.offset(), 5);
    }

    #[test]
    fn zero_and_negative_values_clamp_to_one() {
        let config = PaginationConfig::default();

        assert_eq!(
            Page::resolve(&query(Some("0"), Some("0")), &config),
            Page { number: 1, size: 1 }
        );
        assert_eq!(
            Page::resolve(&query(Some("-3"), Some("-10")), &config),
            Page { number: 1, size: 1 }
        );
    }

    #[test]
    fn page_size_is_capped() {
        let config = PaginationConfig {
            max_page_size: 50,
            ..Default::default()
        };

        let got = Page::resolve(&query(None, Some("100000")), &config);

        assert_eq!(got.size, 50);
    }

    #[test]
    fn junk_values_fall_back_to_defaults() {
        let got = Page::resolve(&query(Some("abc"), Some("")), &PaginationConfig::default());

        assert_eq!(got, Page { number: 1, size: 10 });
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let got = Page::resolve(
            &query(Some(&i64::MAX.to_string()), Some("100")),
            &PaginationConfig::default(),
        );

        assert_eq!(got.offset(), i64::MAX as u64);
    }
}
