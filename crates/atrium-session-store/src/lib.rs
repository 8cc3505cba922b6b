//! Operator session state for the Atrium console client.
//!
//! This crate provides:
//! - The [`Session`] model (email, tokens, cached profile)
//! - The [`SessionStore`] trait plus file-backed and in-memory stores
//! - Token expiry inspection without signature verification
//!
//! The session gates every authenticated request made by the API client;
//! it is created on sign-in, read on each call and destroyed on sign-out
//! or when the backend rejects the credentials.

mod error;
mod session;
mod store;
mod token;

pub use error::{SessionError, SessionResult};
pub use session::Session;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use token::is_token_expired;
