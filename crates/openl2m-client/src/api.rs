//! The operations an OpenL2M server offers, as a trait.
//!
//! [`Server`](crate::Server) is the HTTP implementation. Device handles are
//! generic over this trait so device-scoped logic works against any
//! implementation, including test doubles.

use crate::models::{
    CommandResult, DeviceDetail, DeviceFilter, DeviceList, InterfaceCommand, ServerEnvironment,
    ServerStats,
};
use crate::Result;
use async_trait::async_trait;
use openl2m_core::InterfaceId;

/// OpenL2M REST operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OpenL2mApi: Send + Sync {
    /// List devices visible to the token, filtered client-side.
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<DeviceList>;

    /// Read the basic (interface) view of a device.
    async fn get_device(&self, device_url: &str) -> Result<DeviceDetail>;

    /// Read the details view of a device (adds Ethernet, ARP and LLDP data).
    async fn get_device_details(&self, device_url: &str) -> Result<DeviceDetail>;

    /// Apply a command to one interface of a device.
    async fn run_command(
        &self,
        device_url: &str,
        interface: &InterfaceId,
        command: &InterfaceCommand,
    ) -> Result<CommandResult>;

    /// Server usage statistics.
    async fn stats(&self) -> Result<ServerStats>;

    /// Server runtime environment.
    async fn environment(&self) -> Result<ServerEnvironment>;
}
