//! Conversion of proxy-style responses into HTTP responses.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::event::OutboundResponse;

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        for (name, value) in &self.headers {
            let Ok(value) = HeaderValue::from_str(value) else {
                tracing::warn!(header = %name, "Dropping unrepresentable response header");
                continue;
            };
            if name.eq_ignore_ascii_case("content-type") {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            } else if let Ok(name) = header::HeaderName::try_from(name.as_str()) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}
