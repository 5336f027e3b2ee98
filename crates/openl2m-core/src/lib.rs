//! # openl2m-core
//!
//! Core types and utilities shared by OpenL2M REST clients.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and HTTP status code mapping
//! - [`ids`] - Strongly-typed identifiers for devices, groups and interfaces
//! - [`config`] - Validated connection settings (URL, token, TLS, timeouts)
//! - [`client`] - HTTP client settings and retry policy

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod ids;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use ids::{DeviceId, GroupId, InterfaceId};
