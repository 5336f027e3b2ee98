//! Device-scoped convenience calls.

use crate::api::OpenL2mApi;
use crate::models::{CommandResult, Device, DeviceDetail, InterfaceCommand};
use crate::Result;
use openl2m_core::InterfaceId;
use tracing::debug;

/// A device bound to the API it was obtained from.
///
/// Every call forwards to the API with this device's URL.
#[derive(Debug)]
pub struct DeviceHandle<'a, A: OpenL2mApi + ?Sized> {
    api: &'a A,
    url: String,
}

impl<'a, A: OpenL2mApi + ?Sized> DeviceHandle<'a, A> {
    /// Bind a device URL to an API.
    pub fn new(api: &'a A, url: impl Into<String>) -> Self {
        Self {
            api,
            url: url.into(),
        }
    }

    /// The device URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Read the basic view: device attributes, interfaces and VLANs.
    pub async fn get(&self) -> Result<DeviceDetail> {
        self.api.get_device(&self.url).await
    }

    /// Read the details view, which adds Ethernet, ARP and LLDP data.
    pub async fn details(&self) -> Result<DeviceDetail> {
        self.api.get_device_details(&self.url).await
    }

    /// Apply an arbitrary interface command.
    pub async fn run_command(
        &self,
        interface: impl Into<InterfaceId>,
        command: &InterfaceCommand,
    ) -> Result<CommandResult> {
        let interface = interface.into();
        debug!(device = %self.url, %interface, command = command.segment(), "device command");
        self.api.run_command(&self.url, &interface, command).await
    }

    /// Enable or disable an interface.
    pub async fn set_interface_state(
        &self,
        interface: impl Into<InterfaceId>,
        enabled: bool,
    ) -> Result<CommandResult> {
        self.run_command(interface, &InterfaceCommand::State(enabled))
            .await
    }

    /// Enable or disable PoE on an interface.
    pub async fn set_interface_poe_state(
        &self,
        interface: impl Into<InterfaceId>,
        enabled: bool,
    ) -> Result<CommandResult> {
        self.run_command(interface, &InterfaceCommand::PoeState(enabled))
            .await
    }

    /// Change an interface description.
    pub async fn set_interface_description(
        &self,
        interface: impl Into<InterfaceId>,
        description: impl Into<String>,
    ) -> Result<CommandResult> {
        self.run_command(interface, &InterfaceCommand::Description(description.into()))
            .await
    }

    /// Change the untagged VLAN of an interface.
    pub async fn set_interface_vlan(
        &self,
        interface: impl Into<InterfaceId>,
        vlan: u16,
    ) -> Result<CommandResult> {
        self.run_command(interface, &InterfaceCommand::Vlan(vlan))
            .await
    }
}

impl Device {
    /// Bind this device to the API it came from.
    pub fn handle<'a, A: OpenL2mApi + ?Sized>(&self, api: &'a A) -> DeviceHandle<'a, A> {
        DeviceHandle::new(api, self.url.clone())
    }
}
