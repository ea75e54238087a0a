//! Terminal client for a remote expense-tracking API.
//!
//! The remote collection is the source of truth; this crate renders it,
//! issues CRUD requests, and keeps a local cache in sync.

pub mod cli;
