//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (record in span, echo in response)
//! 4. Security headers
//! 5. CORS
//!
//! Authentication is not a layer: protected handlers take the
//! [`RequireAdmin`] extractor.

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{AUTH_TOKEN_HEADER, RequireAdmin};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
