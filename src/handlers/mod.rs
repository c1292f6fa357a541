//! Operation handlers module
//!
//! Every mutating operation validates first, mutates the in-memory store,
//! and commits (persist + changed kinds) as its final step, before any
//! redirect or re-render the shell performs afterwards.

pub mod accounts;
pub mod auth;
pub mod departments;
pub mod employees;
pub mod requests;
