//! Persistence for the drawn shapes.
//!
//! The drawing manager hands its JSON document to a [`SaveHandler`] and asks a
//! [`LoadHandler`] for one at startup. Each handler is either a caller
//! supplied closure or the built-in cookie store.

mod cookie;
mod handler;

pub use cookie::{
    escape, find_cookie, unescape, CookieJar, CookieStore, MemoryCookieJar, COOKIE_NAME,
};
pub use handler::{LoadHandler, SaveHandler};

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// The stored cookie value could not be unescaped.
    Cookie(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cookie(msg) => write!(f, "Cookie error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}
