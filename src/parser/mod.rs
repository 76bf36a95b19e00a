//! HTTP request line parser.
//!
//! Turns the first line of a request buffer into an [`HttpRequest`]. The
//! tokenizing steps are pure functions so they can be tested on their own.

mod request;
mod method;
mod error;
mod tokenizer;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use error::Error;
pub use tokenizer::{has_line_terminator, split_line, split_tokens};

// Re-export the parse_request function
pub use request::parse_request;
