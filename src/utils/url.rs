// src/utils/url.rs

//! Wiki URL manipulation utilities.

use ::url::Url;

/// Link targets that never point at an article.
const NON_ARTICLE_PREFIXES: [&str; 3] = ["#", "/wiki/Category:", "/wiki/File:"];

/// Whether an `href` points at an article rather than a fragment,
/// category page or file page.
///
/// # Examples
/// ```
/// use deathwatch::utils::url::is_article_href;
///
/// assert!(is_article_href("/wiki/Jane_Doe"));
/// assert!(!is_article_href("/wiki/Category:1950_births"));
/// assert!(!is_article_href("#cite_note-1"));
/// ```
pub fn is_article_href(href: &str) -> bool {
    !NON_ARTICLE_PREFIXES
        .iter()
        .any(|prefix| href.starts_with(prefix))
}

/// Article identifier carried by an `href`: whatever follows the last `/wiki/`.
///
/// # Examples
/// ```
/// use deathwatch::utils::url::article_id;
///
/// assert_eq!(article_id("/wiki/Jane_Doe"), "Jane_Doe");
/// ```
pub fn article_id(href: &str) -> &str {
    href.rsplit("/wiki/").next().unwrap_or(href)
}

/// Human-readable title derived from an article URL.
///
/// Takes the segment after `/wiki/`, percent-decodes it and turns
/// underscores into spaces.
pub fn title_from_url(article_url: &str) -> Option<String> {
    let parsed = Url::parse(article_url).ok()?;
    let path = parsed.path();
    let (_, segment) = path.rsplit_once("/wiki/")?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    let decoded = urlencoding::decode(segment).ok()?;
    Some(decoded.replace('_', " "))
}

/// MediaWiki API endpoint of the site an article URL belongs to.
pub fn api_endpoint(article_url: &str, api_path: &str) -> Option<String> {
    let parsed = Url::parse(article_url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}{}", origin.ascii_serialization(), api_path))
}

/// Article URL for `title` on the wiki at `site`.
///
/// # Examples
/// ```
/// use deathwatch::utils::url::article_url;
///
/// assert_eq!(
///     article_url("https://ru.wikipedia.org/", "Иван Петров"),
///     "https://ru.wikipedia.org/wiki/%D0%98%D0%B2%D0%B0%D0%BD_%D0%9F%D0%B5%D1%82%D1%80%D0%BE%D0%B2"
/// );
/// ```
pub fn article_url(site: &str, title: &str) -> String {
    let slug = title.replace(' ', "_");
    format!(
        "{}/wiki/{}",
        site.trim_end_matches('/'),
        urlencoding::encode(&slug)
    )
}
