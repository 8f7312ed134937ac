//! handlers/mod.rs
pub mod checkin_handler;
