//! Domain logic for Accounts

pub mod entities;
