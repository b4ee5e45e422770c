//! System-level modules
//!
//! - Logging initialisation

pub mod logging;
