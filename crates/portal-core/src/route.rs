//! In-app routes handed to the host router.

use reqwest::Url;

/// Origin used only to borrow `Url`'s query encoder; never part of the output.
const ROUTE_ORIGIN: &str = "http://localhost";

/// Build `path?key=value&...` with every value form-encoded.
pub fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let mut url = match Url::parse(ROUTE_ORIGIN).and_then(|origin| origin.join(path)) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(path, error = %e, "Invalid route path");
            return path.to_string();
        }
    };
    url.query_pairs_mut().extend_pairs(pairs.iter().copied());

    match url.query() {
        Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
        _ => url.path().to_string(),
    }
}
