//! Rolling-window rate accounting and a self-tuning invocation limiter for
//! calls against the Riot Games API.
//!
//! [`window::Window`] is the low-level quota counter: acquire, cancel,
//! scheduled refund, and reconciliation against a server's reported usage.
//! [`limiter::Limiter`] composes windows per call-site, growing and
//! shrinking them from response headers and honoring server-imposed
//! cooldowns.

pub mod error;
pub mod headers;
pub mod invocation;
pub mod limiter;
pub mod state;
pub mod window;

pub use error::RateLimitError;
pub use headers::ResponseHeaders;
pub use invocation::Invocation;
pub use limiter::{Limiter, Reservation};
pub use window::Window;
