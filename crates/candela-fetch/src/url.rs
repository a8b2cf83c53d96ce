//! Rate service URL construction.

use candela_types::CurrencyPair;

/// Default address of the generator service.
pub const DEFAULT_GENERATOR_URL: &str = "http://localhost:8080";

/// Default address of the history service.
pub const DEFAULT_HISTORY_URL: &str = "http://localhost:8081";

/// Builds the URL serving the ticks of one currency pair.
///
/// URL format: `{base}/rates/{PAIR}`. Both the generator and the history
/// service expose this route; the history service additionally expects
/// `from` and `to` query parameters.
///
/// # Example
///
/// ```
/// use candela_fetch::url::rates_url;
///
/// let pair = "eurusd".parse().unwrap();
/// assert_eq!(rates_url("http://localhost:8080/", &pair), "http://localhost:8080/rates/EURUSD");
/// ```
#[must_use]
pub fn rates_url(base: &str, currency_pair: &CurrencyPair) -> String {
    format!("{}/rates/{}", base.trim_end_matches('/'), currency_pair)
}
