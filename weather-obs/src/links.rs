use std::sync::LazyLock;

use regex::Regex;

/// States with observation pages. There is no page for the other territories.
pub const STATES: [&str; 8] = ["ACT", "NSW", "NT", "QLD", "SA", "TAS", "VIC", "WA"];

/// Captures the target of every anchor on a page, whatever the quoting and case.
static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s[^>]*?href\s*=\s*["']([^"']+)["']"#).expect("href pattern is valid")
});
const PRODUCTS_PATH: &str = "/products/";

/// Page listing every observation product of a state.
pub fn state_page_url(base_url: &str, state: &str) -> String {
    let state = state.to_lowercase();

    format!(
        "{}/{state}/observations/{state}all.shtml",
        base_url.trim_end_matches('/')
    )
}

/// Extracts the observation product links of a state page as JSON feed URLs.
///
/// `/products/IDN60801/IDN60801.94768.shtml` becomes `{base}/fwo/IDN60801/IDN60801.94768.json`.
pub fn observation_urls(html: &str, base_url: &str) -> Vec<String> {
    let base_url = base_url.trim_end_matches('/');

    HREF.captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .filter_map(|link| link.as_str().split_once(PRODUCTS_PATH))
        .map(|(_, product)| format!("{base_url}/fwo/{product}").replace(".shtml", ".json"))
        .collect()
}
