//! Service layer for business logic
//!
//! Shared between the HTTP handlers and the CLI commands.

pub mod geoip;
mod lookup_service;
mod refresh_service;
pub mod retry;
pub mod upstream;

pub use geoip::{GeoIpLookup, GeoResolver};
pub use lookup_service::*;
pub use refresh_service::*;
pub use retry::{RetryPolicy, with_retry_timeout};
pub use upstream::{HttpUpstream, IpListSource, PublicIpSource, parse_ip_list};
