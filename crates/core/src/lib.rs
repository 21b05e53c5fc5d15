//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the domain types used by every RocketShoes component:
//! - `cart` - Cart store, catalog client, and persistence adapters
//! - `cli` - Command-line front end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. Anything that talks to the catalog or the key-value store lives in
//! `rocketshoes-cart`.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, cart line items, and stock levels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
