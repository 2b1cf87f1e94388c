//! MomosMart Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront:
//! - `storefront` - Server-rendered shop talking to the product backend
//! - `integration-tests` - End-to-end checks against a fake backend
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
