//! Domain logic for Conversations

pub mod context;
pub mod entities;
pub mod fallback;
pub mod manager;
