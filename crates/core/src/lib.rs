//! Food en K Core - Shared domain library.
//!
//! This crate provides the domain types used across the Food en K components:
//! - `storefront` - Public-facing food truck site
//! - `cli` - Command-line tools for migrations and content checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Persistence of the cart and delivery of order
//! messages are the storefront's job.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, phone numbers
//! - [`entity`] - Records mirroring the content backend schema
//! - [`cart`] - The shopping cart and its derived totals
//! - [`order`] - Order message composition and order actions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod entity;
pub mod order;
pub mod types;

pub use types::*;
