//! Customizer Admin library.
//!
//! This crate provides the admin app as a library so handlers and the
//! Shopify client can be tested without a running server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod shopify;
pub mod state;
