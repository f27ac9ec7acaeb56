/// Limit/offset pagination for list endpoints
///
/// `limit` and `offset` are read leniently: a value that does not parse falls
/// back to the configured default instead of failing the request. When no
/// limit applies at all the endpoint answers with a plain array.
use serde::{Deserialize, Serialize};
use url::Url;

use crate::db::PageWindow;

/// Global page sizes, overridable per request with `?limit=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request has no valid `limit`
    pub default_limit: Option<i64>,
    /// Upper bound applied to a requested `limit`
    pub max_limit: Option<i64>,
}

/// Raw query parameters; kept as strings so bad values can fall back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitOffsetQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl LimitOffsetQuery {
    /// Resolve the page window, or `None` when the list is not paginated.
    pub fn window(&self, config: &PaginationConfig) -> Option<PageWindow> {
        let requested = self
            .limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .map(|v| match config.max_limit {
                Some(max) => v.min(max),
                None => v,
            });
        let limit = requested.or(config.default_limit)?;
        let offset = self
            .offset
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(0);
        Some(PageWindow { limit, offset })
    }
}

/// `{count, next, previous, results}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(url: &Url, window: PageWindow, count: i64, results: Vec<T>) -> Self {
        Self {
            count,
            next: next_link(url, window, count),
            previous: previous_link(url, window),
            results,
        }
    }
}

fn next_link(url: &Url, window: PageWindow, count: i64) -> Option<String> {
    // Both values come from the query string; an overflowing sum is past the end.
    let next_offset = window
        .offset
        .checked_add(window.limit)
        .filter(|next| *next < count)?;
    Some(with_page_params(url, window.limit, Some(next_offset)))
}

fn previous_link(url: &Url, window: PageWindow) -> Option<String> {
    if window.offset <= 0 {
        return None;
    }
    let offset = window.offset - window.limit;
    if offset <= 0 {
        return Some(with_page_params(url, window.limit, None));
    }
    Some(with_page_params(url, window.limit, Some(offset)))
}

/// Rewrite `limit`/`offset` on the request URL, keeping other parameters.
/// Keys are sorted so links are stable.
fn with_page_params(url: &Url, limit: i64, offset: Option<i64>) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "limit" && k != "offset")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.push(("limit".to_string(), limit.to_string()));
    if let Some(offset) = offset {
        pairs.push(("offset".to_string(), offset.to_string()));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut link = url.clone();
    link.query_pairs_mut().clear().extend_pairs(pairs);
    link.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> LimitOffsetQuery {
        LimitOffsetQuery {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    fn base() -> Url {
        Url::parse("http://testserver/api/v1/posts?limit=1&offset=1").unwrap()
    }

    #[test]
    fn no_limit_and_no_default_means_unpaginated() {
        let config = PaginationConfig::default();
        assert_eq!(query(None, Some("5")).window(&config), None);
    }

    #[test]
    fn invalid_limit_falls_back_to_default() {
        let config = PaginationConfig {
            default_limit: Some(10),
            max_limit: None,
        };
        for bad in ["0", "-3", "abc"] {
            assert_eq!(
                query(Some(bad), None).window(&config),
                Some(PageWindow {
                    limit: 10,
                    offset: 0
                })
            );
        }
    }

    #[test]
    fn limit_is_capped_and_bad_offset_is_zero() {
        let config = PaginationConfig {
            default_limit: None,
            max_limit: Some(50),
        };
        assert_eq!(
            query(Some("500"), Some("-1")).window(&config),
            Some(PageWindow {
                limit: 50,
                offset: 0
            })
        );
    }

    #[test]
    fn middle_page_links_both_ways() {
        let page = Paginated::new(
            &base(),
            PageWindow {
                limit: 1,
                offset: 1,
            },
            3,
            vec![2],
        );
        assert_eq!(
            page.next.as_deref(),
            Some("http://testserver/api/v1/posts?limit=1&offset=2")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("http://testserver/api/v1/posts?limit=1")
        );
    }

    #[test]
    fn first_and_last_pages_have_no_outward_links() {
        let first = Paginated::new(
            &base(),
            PageWindow {
                limit: 2,
                offset: 0,
            },
            3,
            vec![1, 2],
        );
        assert!(first.previous.is_none());
        assert!(first.next.is_some());

        let last = Paginated::new(
            &base(),
            PageWindow {
                limit: 2,
                offset: 2,
            },
            3,
            vec![3],
        );
        assert!(last.next.is_none());
        assert_eq!(
            last.previous.as_deref(),
            Some("http://testserver/api/v1/posts?limit=2")
        );
    }

    #[test]
    fn offset_near_i64_max_has_no_next_link() {
        let page = Paginated::new(
            &base(),
            PageWindow {
                limit: 5,
                offset: i64::MAX,
            },
            3,
            Vec::<i64>::new(),
        );
        assert!(page.next.is_none());
        assert_eq!(
            page.previous.as_deref(),
            Some(format!("http://testserver/api/v1/posts?limit=5&offset={}", i64::MAX - 5).as_str())
        );
    }

    #[test]
    fn unrelated_query_parameters_survive() {
        let url = Url::parse("http://testserver/api/v1/posts?offset=4&limit=2&format=json").unwrap();
        let page = Paginated::new(
            &url,
            PageWindow {
                limit: 2,
                offset: 4,
            },
            10,
            Vec::<i64>::new(),
        );
        assert_eq!(
            page.next.as_deref(),
            Some("http://testserver/api/v1/posts?format=json&limit=2&offset=6")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("http://testserver/api/v1/posts?format=json&limit=2&offset=2")
        );
    }
}
