//! tests/mod.rs
mod checkin_tests;
pub mod support;
