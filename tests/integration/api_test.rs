//! HTTP tests for the chat API and shared routes.
//!
//! The full router runs over an in-memory chat store and a mock model, so
//! these need neither a database nor network access.

#![allow(dead_code)]

mod chat;
mod common;
mod infrastructure;
mod sessions;
