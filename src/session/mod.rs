//! Session repository module
//!
//! Login sessions (access/refresh token pair plus the user profile) are
//! kept in an explicit repository injected into the API client, replacing
//! ambient storage lookups. The repository tracks one record per login and
//! a separate active-session pointer, so several concurrent logins can
//! coexist with exactly one active at a time.

pub mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionRecord, SessionStore};
