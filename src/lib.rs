//! ipgeo - IP geolocation lookup service
//!
//! Resolves client or arbitrary IP addresses to country/continent metadata
//! using an offline GeoLite2-Country database, and keeps a refreshable
//! key-value cache of IP records sourced from an external list.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: One-shot commands (update-db, refresh, lookup, config-gen)
//!
//! # Architecture
//! - `services`: GeoIP resolver, lookup and batch refresh, upstream fetchers
//! - `storage`: Key-value store abstraction and backends
//! - `api`: HTTP handlers and middleware
//! - `interfaces`: Command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
