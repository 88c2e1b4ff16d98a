//! Caller identification.
//!
//! Authentication happens upstream; the proxy forwards the acting user's id in
//! the `X-User-Id` header and this module resolves it to an active user.

mod extractor;

pub use extractor::{AuthError, CurrentUser};
