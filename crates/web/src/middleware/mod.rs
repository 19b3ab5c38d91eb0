//! HTTP middleware stack.
//!
//! # Middleware order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. Panic barrier (`CatchPanicLayer`) - must stay outermost of the
//!    application chain
//! 3. Access log
//! 4. Security headers
//! 5. Router
//!    - dynamic routes: session layer, then CSRF guard, then
//!      authentication resolver, then the handler
//!    - protected routes: dynamic chain plus the authorization gate
//!      (innermost), then the handler
//!    - `/static`: no inner chain

pub mod access_log;
pub mod auth;
pub mod catch_panic;
pub mod csrf;
pub mod security_headers;
pub mod session;

pub use access_log::access_log;
pub use auth::{AuthContext, authenticate, require_authentication};
pub use catch_panic::handle_panic;
pub use csrf::{CsrfToken, csrf_guard};
pub use security_headers::security_headers;
pub use session::{create_session_layer, set_flash, take_flash};
