//! DBLP author search API client.
//!
//! Resolves a free-text author name to the canonical profile URL via
//! `GET <base>/search/author/api?q=<name>&format=json`. The best match is
//! simply the first hit — no ranking or disambiguation, which is a known
//! accuracy limitation for common names.

use crate::error::{DblpError, Result};
use tracing::{debug, trace};

/// Default DBLP base URL
pub const DEFAULT_DBLP_URL: &str = "https://dblp.org";

/// Resolve an author name to their DBLP profile URL.
///
/// Returns `Ok(None)` when the search response has no usable hit. HTTP and
/// transport failures are reported as errors so callers can distinguish
/// "no such author" from "upstream unavailable".
pub async fn resolve_author(client: &reqwest::Client, name: &str) -> Result<Option<String>> {
    resolve_author_at(client, DEFAULT_DBLP_URL, name).await
}

/// Resolve against a custom base URL (mirror sites, tests).
pub async fn resolve_author_at(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
) -> Result<Option<String>> {
    let url = build_author_search_url(base_url, name);
    debug!(author = name, url = %url, "Querying author search API");

    let response = client.get(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DblpError::Upstream {
            code: status.as_u16() as i32,
            message: format!("author search returned {}", status),
        });
    }

    let body = response.text().await?;
    trace!(body = %body, "Raw author search response");

    let data: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| DblpError::MalformedResponse(e.to_string()))?;

    Ok(first_hit_url(&data))
}

/// Build the author search URL.
///
/// Whitespace in the name is substituted with `+`; other reserved
/// characters are passed through unescaped. Known limitation: names
/// containing `&` or `#` will truncate the query.
fn build_author_search_url(base_url: &str, name: &str) -> String {
    format!(
        "{}/search/author/api?q={}&format=json",
        base_url.trim_end_matches('/'),
        name.replace(' ', "+")
    )
}

/// Walk `result.hits.hit[0].info.url` out of a search response.
///
/// Any missing key, wrong type, or empty hit array along the path yields
/// `None` — shape mismatches are not distinguished from "no match".
pub fn first_hit_url(data: &serde_json::Value) -> Option<String> {
    data.get("result")?
        .get("hits")?
        .get("hit")?
        .as_array()?
        .first()?
        .get("info")?
        .get("url")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_author_search_url() {
        let url = build_author_search_url("https://dblp.org", "Donald Knuth");
        assert_eq!(
            url,
            "https://dblp.org/search/author/api?q=Donald+Knuth&format=json"
        );
    }

    #[test]
    fn test_build_author_search_url_trailing_slash() {
        let url = build_author_search_url("https://dblp.org/", "Knuth");
        assert_eq!(url, "https://dblp.org/search/author/api?q=Knuth&format=json");
    }

    #[test]
    fn test_first_hit_url_takes_first_of_two() {
        let data = json!({
            "result": {
                "hits": {
                    "hit": [
                        { "info": { "url": "https://dblp.org/pid/10/1" } },
                        { "info": { "url": "https://dblp.org/pid/20/2" } }
                    ]
                }
            }
        });
        assert_eq!(
            first_hit_url(&data).as_deref(),
            Some("https://dblp.org/pid/10/1")
        );
    }

    #[test]
    fn test_first_hit_url_missing_path() {
        assert_eq!(first_hit_url(&json!({})), None);
        assert_eq!(first_hit_url(&json!({ "result": {} })), None);
        assert_eq!(first_hit_url(&json!({ "result": { "hits": {} } })), None);
    }

    #[test]
    fn test_first_hit_url_shape_mismatch() {
        // Wrong types along the path behave exactly like missing keys.
        assert_eq!(first_hit_url(&json!({ "result": "nope" })), None);
        assert_eq!(
            first_hit_url(&json!({ "result": { "hits": { "hit": {} } } })),
            None
        );
        assert_eq!(
            first_hit_url(&json!({ "result": { "hits": { "hit": [] } } })),
            None
        );
        assert_eq!(
            first_hit_url(&json!({ "result": { "hits": { "hit": [ { "info": {} } ] } } })),
            None
        );
    }
}
