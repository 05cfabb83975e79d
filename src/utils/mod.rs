//! Utility functions and helpers.

pub mod http;
pub mod log;
pub mod text;
pub mod url;

use ::url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://en.wikipedia.org/wiki/Deaths_in_August_2023").unwrap();
        assert_eq!(
            resolve_url(&base, "/wiki/Jane_Doe"),
            "https://en.wikipedia.org/wiki/Jane_Doe"
        );
        assert_eq!(
            resolve_url(&base, "https://other.org/x"),
            "https://other.org/x"
        );
    }
}
