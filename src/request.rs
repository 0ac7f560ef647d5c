// request.rs
// URL assembly for TShock REST endpoints

use reqwest::Url;

use crate::error::RestError;

/// Builds endpoint URLs from a base address, path segments, and query
/// parameters. The stored auth token is always appended as the trailing
/// `token` query parameter, which is how TShock authenticates REST
/// calls.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base: Url,
    token: String,
}

impl RequestBuilder {
    pub fn new(base: &str) -> Result<Self, RestError> {
        let base = Url::parse(base)
            .map_err(|e| RestError::Config(format!("invalid base URL {base:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(RestError::Config(format!(
                "base URL {base} cannot carry endpoint paths"
            )));
        }
        Ok(Self {
            base,
            token: String::new(),
        })
    }

    /// Replaces the auth token used for subsequent requests.
    pub fn set_token(&mut self, token: &str) {
        self.token = token.to_string();
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Assembles `{base}/{segments...}?{params...}&token={token}`.
    /// Query values are form-encoded, so player names and command
    /// strings survive the trip.
    pub fn url(&self, segments: &[&str], params: &[(&'static str, String)]) -> Url {
        let mut url = self.base.clone();
        url.set_path(&segments.join("/"));
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("token", &self.token);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> RequestBuilder {
        RequestBuilder::new("http://127.0.0.1:7878").unwrap()
    }

    #[test]
    fn test_url_segments_only() {
        let urls = builder();
        assert_eq!(
            urls.url(&["status"], &[]).as_str(),
            "http://127.0.0.1:7878/status?token="
        );
    }

    #[test]
    fn test_url_nested_segments_and_params() {
        let urls = builder();
        let url = urls.url(
            &["v2", "users", "read"],
            &[("type", "name".to_string()), ("user", "Alice".to_string())],
        );
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:7878/v2/users/read?type=name&user=Alice&token="
        );
    }

    #[test]
    fn test_url_carries_token_last() {
        let mut urls = builder();
        urls.set_token("abc123");
        let url = urls.url(&["tokentest"], &[]);
        assert_eq!(url.as_str(), "http://127.0.0.1:7878/tokentest?token=abc123");
    }

    #[test]
    fn test_url_encodes_query_values() {
        let urls = builder();
        let url = urls.url(
            &["v3", "server", "rawcmd"],
            &[("cmd", "/who all".to_string())],
        );
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:7878/v3/server/rawcmd?cmd=%2Fwho+all&token="
        );
    }

    #[test]
    fn test_new_rejects_garbage_base() {
        assert!(matches!(
            RequestBuilder::new("not a url"),
            Err(RestError::Config(_))
        ));
    }
}
