//! Database-backed tests for registration, login and profiles.
//!
//! Ignored by default. Run with `cargo test -p pha-integration-tests -- --ignored`
//! against the PostgreSQL named by `TEST_DATABASE_URL` or `DATABASE_URL`.

#![allow(dead_code)]

mod accounts;
mod common;
