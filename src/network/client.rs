//! HTTP client wrapper - builds the request URL and executes dispatches.

use std::time::{Duration, Instant};

use url::form_urlencoded;

use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::messages::network::ResponseData;

/// Build the full request URL from the base URL, the path template, and
/// the collected field values.
///
/// Fields whose name matches a literal `{name}` placeholder in the
/// template are substituted into the path and never repeated as query
/// parameters. Every other non-empty field becomes a URL-encoded query
/// parameter; empty values are dropped.
pub fn build_url(base_url: &str, path: &str, params: &[(String, String)]) -> String {
    let mut full_path = format!("{}{}", base_url.trim_end_matches('/'), path);

    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut has_query = false;

    for (name, value) in params {
        let placeholder = format!("{{{name}}}");
        if full_path.contains(&placeholder) {
            full_path = full_path.replace(&placeholder, value);
        } else if !value.is_empty() {
            query.append_pair(name, value);
            has_query = true;
        }
    }

    if has_query {
        full_path.push('?');
        full_path.push_str(&query.finish());
    }

    full_path
}

/// Execute one HTTP request and collect the complete response.
///
/// Any transport failure is folded into an error string; the caller
/// receives exactly one outcome either way.
pub async fn execute_request(
    client: &reqwest::Client,
    method: &str,
    url: &str,
    body: Option<String>,
) -> Result<ResponseData, String> {
    let start = Instant::now();

    let method: reqwest::Method = method
        .parse()
        .map_err(|_| format!("invalid HTTP method: {method}"))?;

    let mut req = client
        .request(method, url)
        .header("Accept", "application/json");

    if let Some(body) = body {
        req = req
            .header("Content-Type", "application/json")
            .body(body);
    }

    let resp = req.send().await.map_err(|e| {
        if e.is_timeout() {
            format!("request timed out ({REQUEST_TIMEOUT_SECS}s)")
        } else if e.is_connect() {
            format!("connection failed: {e}")
        } else {
            format!("request failed: {e}")
        }
    })?;

    let status = resp.status();
    let mut headers: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in resp.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).to_string();
        match headers.iter_mut().find(|(n, _)| n == name.as_str()) {
            Some((_, values)) => values.push(value),
            None => headers.push((name.to_string(), vec![value])),
        }
    }

    let body = resp
        .text()
        .await
        .map_err(|e| format!("error reading body: {e}"))?;

    tracing::debug!(
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "response received"
    );

    Ok(ResponseData {
        status: status.as_u16(),
        status_text: status
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
        headers,
        body,
    })
}

/// Create the HTTP client used for all dispatches.
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn path_placeholder_substituted_without_query() {
        let url = build_url(
            "https://api.example.com",
            "/users/{id}",
            &params(&[("id", "123")]),
        );
        assert_eq!(url, "https://api.example.com/users/123");
    }

    #[test]
    fn mixed_path_and_query_parameters() {
        let url = build_url(
            "https://api.example.com",
            "/users/{id}",
            &params(&[("id", "123"), ("include", "posts")]),
        );
        assert_eq!(url, "https://api.example.com/users/123?include=posts");
    }

    #[test]
    fn empty_valued_fields_dropped() {
        let url = build_url(
            "https://api.example.com",
            "/users",
            &params(&[("filter", ""), ("page", "1")]),
        );
        assert_eq!(url, "https://api.example.com/users?page=1");
    }

    #[test]
    fn query_values_url_encoded() {
        let url = build_url(
            "https://api.example.com",
            "/search",
            &params(&[("q", "a b&c")]),
        );
        assert_eq!(url, "https://api.example.com/search?q=a+b%26c");
    }

    #[test]
    fn trailing_slash_on_base_trimmed() {
        let url = build_url("https://api.example.com/", "/health", &[]);
        assert_eq!(url, "https://api.example.com/health");
    }

    #[test]
    fn empty_base_url_leaves_bare_path() {
        let url = build_url("", "/users/{id}", &params(&[("id", "9")]));
        assert_eq!(url, "/users/9");
    }

    #[test]
    fn repeated_placeholder_fully_substituted() {
        let url = build_url(
            "",
            "/a/{x}/b/{x}",
            &params(&[("x", "1")]),
        );
        assert_eq!(url, "/a/1/b/1");
    }
}
