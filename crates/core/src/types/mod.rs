//! Core types for Food en K.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneError, PhoneNumber, format_french_phone};
pub use price::{CurrencyCode, Price};
pub use status::*;
