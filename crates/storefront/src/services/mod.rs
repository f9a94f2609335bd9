//! Business logic behind the pages.
//!
//! # Services
//!
//! - Content: `menu`, `featured`, `events`, `locations`, `partners`, `hero`,
//!   `info`, `footer` load CMS data through [`crate::cms::ContentApi`] and
//!   fall back to built-in content where the site needs something to show
//! - Static content: `alerts`, `banner`, `gallery`
//! - Forms: `contact`, `newsletter`, `validation`
//! - Visitor state kept in the session: `cart_store`, `preferences`,
//!   `notifications`, and dismissed alerts in `alerts`
//! - Presentation helpers: `formatting`, `seo`

pub mod alerts;
pub mod banner;
pub mod cart_store;
pub mod contact;
pub mod events;
pub mod featured;
pub mod footer;
pub mod formatting;
pub mod gallery;
pub mod hero;
pub mod info;
pub mod locations;
pub mod menu;
pub mod newsletter;
pub mod notifications;
pub mod partners;
pub mod preferences;
pub mod seo;
pub mod validation;
