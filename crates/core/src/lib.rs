//! Core business logic for Sekolah.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `access` - Branch-scoped access control resolution
//! - `auth` - Password hashing
//! - `fees` - Fee dues ledger: balances, payment allocation, waivers, aging

pub mod access;
pub mod auth;
pub mod fees;
