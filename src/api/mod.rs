//! Platform API client module
//!
//! This module wraps HTTP access to the event-management backend:
//! bearer-token attachment, the one-shot refresh-and-replay on 401, and
//! normalization of error payloads.

pub mod client;

pub use client::ApiClient;
