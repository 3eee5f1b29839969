//! # Request Stamping Middleware
//!
//! Gives every request an ID, available to handlers via `Extension<RequestStamp>`
//! and echoed in the `X-Request-ID` response header. A well-formed incoming
//! `X-Request-ID` is kept so IDs from an upstream proxy carry through.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest accepted upstream request ID.
const MAX_INCOMING_ID_LEN: usize = 128;

/// Request metadata for tracing and debugging.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    /// Unique request identifier
    pub id: String,
}

impl RequestStamp {
    fn from_request(req: &Request) -> Self {
        let id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|id| {
                !id.is_empty()
                    && id.len() <= MAX_INCOMING_ID_LEN
                    && id
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            })
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self { id }
    }
}

/// Request stamping middleware.
pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let stamp = RequestStamp::from_request(&req);

    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(id: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/health");
        if let Some(id) = id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_keeps_wellformed_incoming_id() {
        let stamp = RequestStamp::from_request(&request(Some("abc-123_XYZ")));
        assert_eq!(stamp.id, "abc-123_XYZ");
    }

    #[test]
    fn test_replaces_missing_or_malformed_id() {
        let too_long = "a".repeat(MAX_INCOMING_ID_LEN + 1);
        for id in [None, Some(""), Some("bad id"), Some("<script>"), Some(too_long.as_str())] {
            let stamp = RequestStamp::from_request(&request(id));
            assert!(Uuid::parse_str(&stamp.id).is_ok(), "{id:?} should get a fresh ID");
        }
    }
}
