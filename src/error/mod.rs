//! Error types for the chat client.
//!
//! - **Error Categories**: high-level classification for handling decisions
//! - [`StreamError`]: ends or refuses a streaming session
//! - [`ApiError`]: failures of the auxiliary REST endpoints
//!
//! Parse failures inside a stream ([`crate::sse::SseParseError`]) are
//! recovered locally and never reach these types.
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout, broken body | Yes |
//! | Server | Backend errors (5xx) | Yes |
//! | Client | Rejected request or misuse | No |
//! | User | Invalid input | No |
//! | System | Filesystem errors | No |
//! | Configuration | Invalid settings | No |

mod api;
mod category;
mod stream;

pub use api::ApiError;
pub use category::ErrorCategory;
pub use stream::StreamError;
