use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::HOST, request::Parts, HeaderMap};

use crate::error::ApiError;
use crate::state::AppState;

/// `scheme://host` the client used to reach us; uploaded image URLs are built
/// from it. `PUBLIC_BASE_URL` takes precedence when configured, and forwarded
/// headers are only read with `TRUST_PROXY` on.
#[derive(Debug, Clone)]
pub struct RequestOrigin(pub String);

impl RequestOrigin {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_headers(headers: &HeaderMap, trust_proxy: bool) -> Option<Self> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                // proxies may append: take the first hop
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let forwarded = |name: &str| if trust_proxy { header(name) } else { None };

        let host = forwarded("x-forwarded-host").or_else(|| header(HOST.as_str()))?;
        let scheme = match forwarded("x-forwarded-proto") {
            Some("https") => "https",
            _ => "http",
        };
        Some(Self(format!("{scheme}://{host}")))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(base) = &state.config.server.public_base_url {
            return Ok(Self(base.clone()));
        }

        if let Some(origin) = Self::from_headers(&parts.headers, state.config.server.trust_proxy) {
            return Ok(origin);
        }

        // HTTP/2 requests carry the authority in the URI instead of a Host header
        parts
            .uri
            .authority()
            .map(|authority| Self(format!("http://{authority}")))
            .ok_or_else(|| ApiError::bad_request("Missing Host header"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn uses_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("localhost:5000"));
        assert_eq!(
            RequestOrigin::from_headers(&headers, false).unwrap().as_str(),
            "http://localhost:5000"
        );
    }

    fn forwarded() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("10.0.0.5:5000"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("www.example.com, proxy"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        headers
    }

    #[test]
    fn honours_forwarded_headers_behind_proxy() {
        assert_eq!(
            RequestOrigin::from_headers(&forwarded(), true).unwrap().as_str(),
            "https://www.example.com"
        );
    }

    #[test]
    fn ignores_forwarded_headers_by_default() {
        assert_eq!(
            RequestOrigin::from_headers(&forwarded(), false).unwrap().as_str(),
            "http://10.0.0.5:5000"
        );
    }

    #[test]
    fn no_host_no_origin() {
        assert!(RequestOrigin::from_headers(&HeaderMap::new(), true).is_none());
    }
}
