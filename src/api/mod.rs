//! API entry points
//!
//! HTTP handlers for the users resource and health probes, plus the
//! command adapter used by the directly invoked Lambda.

pub mod command;
pub mod health;
pub mod users;
