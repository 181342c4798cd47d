//! Router Module Index
//!
//! Splits routing by access level so the gate is attached explicitly at the module
//! boundary and no admin page can be mounted without it.

/// Routes accessible to everyone (health checks).
pub mod public;

/// Admin dashboard pages, each behind its own access gate.
pub mod admin;
