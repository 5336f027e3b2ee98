//! OpenL2M REST client.
//!
//! Provides typed records and an asynchronous client for the REST API of an
//! OpenL2M switch management server.
//!
//! ```no_run
//! use openl2m_client::{DeviceFilter, Server};
//!
//! # async fn run() -> openl2m_client::Result<()> {
//! let server = Server::new("https://openl2m.example.com/", "my-token")?;
//! for device in &server.list_devices(&DeviceFilter::all()).await? {
//!     let detail = device.handle(&server).get().await?;
//!     println!("{}: {} interfaces", device.name, detail.interface_count());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod api;
pub mod client;
pub mod device;
pub mod models;

pub use api::OpenL2mApi;
pub use client::{Server, ServerBuilder};
pub use device::DeviceHandle;
pub use models::{
    CommandResult, Device, DeviceDetail, DeviceFilter, DeviceGroup, DeviceList, Interface,
    InterfaceCommand, ServerEnvironment, ServerStats, SwitchInfo, Vlan,
};
pub use openl2m_core::client::{ClientConfig, RetryPolicy};
pub use openl2m_core::{DeviceId, Error, GroupId, InterfaceId, ServerConfig};

/// Convenient result alias that reuses the shared OpenL2M error type.
pub type Result<T> = openl2m_core::Result<T>;
