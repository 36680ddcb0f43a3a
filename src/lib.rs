//! Client library for the Cursor REST APIs.
//!
//! [`CursorClient`] sends single requests and maps failures onto the
//! typed [`CursorError`]; retries are opt-in by wrapping any call in
//! [`with_retry`] with a [`RetryPolicy`].
//!
//! ```no_run
//! use cursor_sdk::{CursorClient, RetryPolicy, with_retry};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), cursor_sdk::CursorError> {
//! let client = CursorClient::new("your-api-key")?;
//! let policy = RetryPolicy::default();
//!
//! let me = with_retry(&policy, "get_v0_me", || client.get_v0_me()).await?;
//! println!("authenticated as {}", me["userEmail"]);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoints;
pub mod errors;
pub mod retry;

pub use client::{AuthScheme, ClientBuilder, CursorClient, DEFAULT_BASE_URL};
pub use endpoints::{ENDPOINT_SPECS, EndpointSpec};
pub use errors::{ApiError, CursorError, ErrorKind};
pub use retry::{RetryPolicy, with_retry};
