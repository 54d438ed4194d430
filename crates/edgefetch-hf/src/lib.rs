//! Model hub manifest client for edgefetch.
//!
//! Builds hub URLs and fetches repository file listings. Consumers use the
//! client through the `HubClientPort` trait from `edgefetch-core`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultHfClient is meant to be used through the HubClientPort trait, not its
// internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod parsing;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultHfClient;

// Configuration
pub use config::HfClientConfig;

// URL construction
pub use crate::url::EndpointResolver;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
