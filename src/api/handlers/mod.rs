//! API handlers for the session gate.

pub mod auth;
pub mod health;
pub mod restricted;
pub mod users;
