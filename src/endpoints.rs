//! The API endpoint URIs.

/// The route for re-seeding the sale store from the external source.
pub const INITIALIZE: &str = "/api/transactions/initialize";
/// The route for listing and searching sales.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the monthly sale statistics.
pub const STATISTICS: &str = "/api/statistics";
/// The route for the monthly price-range histogram.
pub const BAR_CHART: &str = "/api/barchart";
/// The route for the monthly category distribution.
pub const PIE_CHART: &str = "/api/piechart";
/// The route for statistics, histogram and categories in one response.
pub const COMBINED: &str = "/api/combined";
