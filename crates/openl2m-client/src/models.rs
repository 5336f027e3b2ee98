//! OpenL2M data models: devices, device listings, per-device views and
//! interface commands.

use openl2m_core::{DeviceId, Error, GroupId, InterfaceId, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A managed device (switch) as published by the server.
///
/// This is a snapshot taken when the listing was fetched; nothing ties it to
/// the live device afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    /// Device id.
    pub id: DeviceId,
    /// Display name.
    pub name: String,
    /// API address of this device; every device-scoped call goes here.
    pub url: String,
    /// Hostname reported by the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Management IPv4 address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_ip4: Option<String>,
    /// Whether the token only grants read access to this device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// Group the device was listed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Name of that group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Any further attributes the server sent.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Device {
    /// Build a device from one JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolError`] if `id`, `name` or `url` is missing, or
    /// any known field has the wrong type.
    pub fn from_json(record: &Value) -> Result<Self> {
        Self::deserialize(record)
            .map_err(|err| Error::ProtocolError(format!("invalid device record: {err}")))
    }

    /// Serialize back into a JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolError`] if serialization fails.
    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }
}

/// A device group and the ids of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceGroup {
    /// Group id.
    pub id: GroupId,
    /// Short name.
    pub name: String,
    /// Name shown to users; falls back to `name`.
    pub display_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Member device ids, ascending.
    pub members: Vec<DeviceId>,
}

#[derive(Debug, Deserialize)]
struct GroupRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    members: Map<String, Value>,
}

/// Client-side filters for [`DeviceList`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeviceFilter {
    /// Keep only devices listed under this group.
    pub group: Option<GroupId>,
    /// Keep only devices whose name or hostname contains this text (case-insensitive).
    pub name_contains: Option<String>,
}

impl DeviceFilter {
    /// Filter matching every device.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one group.
    #[must_use]
    pub fn in_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Restrict to names containing `text`.
    #[must_use]
    pub fn name_contains(mut self, text: impl Into<String>) -> Self {
        self.name_contains = Some(text.into());
        self
    }

    /// Whether `device` passes the filter.
    #[must_use]
    pub fn matches(&self, device: &Device) -> bool {
        if let Some(group) = self.group {
            if device.group_id != Some(group) {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            let needle = needle.to_lowercase();
            let in_name = device.name.to_lowercase().contains(&needle);
            let in_hostname = device
                .hostname
                .as_deref()
                .is_some_and(|h| h.to_lowercase().contains(&needle));
            if !in_name && !in_hostname {
                return false;
            }
        }
        true
    }
}

/// Devices returned by a listing call.
///
/// Iterating borrows the list, so it can be walked any number of times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceList {
    devices: Vec<Device>,
    groups: Vec<DeviceGroup>,
}

impl DeviceList {
    /// Parse a listing body.
    ///
    /// Accepts either the grouped form
    /// `{"groups": {"<gid>": {"members": {"<did>": {...}}}}}` or a flat array
    /// of device records. In the grouped form the map keys supply `id` and
    /// `group_id` when the records do not carry them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolError`] for any other shape or for a member
    /// record that fails [`Device::from_json`].
    pub fn from_json(body: &Value) -> Result<Self> {
        match body {
            Value::Array(records) => {
                let devices = records
                    .iter()
                    .map(Device::from_json)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self {
                    devices,
                    groups: Vec::new(),
                })
            }
            Value::Object(map) => match map.get("groups") {
                Some(Value::Object(groups)) => Self::from_groups(groups),
                Some(other) => Err(Error::ProtocolError(format!(
                    "`groups` must be an object, got {}",
                    json_kind(other)
                ))),
                None => Err(Error::ProtocolError(
                    "device listing has no `groups` field".to_string(),
                )),
            },
            other => Err(Error::ProtocolError(format!(
                "expected a device listing, got {}",
                json_kind(other)
            ))),
        }
    }

    fn from_groups(groups: &Map<String, Value>) -> Result<Self> {
        let mut parsed = Vec::with_capacity(groups.len());
        for (group_key, group_value) in groups {
            let group_id = GroupId::parse_str(group_key)?;
            let record = GroupRecord::deserialize(group_value).map_err(|err| {
                Error::ProtocolError(format!("invalid group `{group_key}`: {err}"))
            })?;
            parsed.push((group_id, record));
        }
        parsed.sort_by_key(|(id, _)| *id);

        let mut devices = Vec::new();
        let mut out_groups = Vec::with_capacity(parsed.len());

        for (group_id, record) in parsed {
            let name = record.name.unwrap_or_default();
            let display_name = record.display_name.unwrap_or_else(|| name.clone());

            let mut members = Vec::with_capacity(record.members.len());
            for (device_key, device_value) in &record.members {
                let device_id = DeviceId::parse_str(device_key)?;
                let Value::Object(fields) = device_value else {
                    return Err(Error::ProtocolError(format!(
                        "member `{device_key}` of group `{group_id}` is {}, not an object",
                        json_kind(device_value)
                    )));
                };

                let mut fields = fields.clone();
                fields
                    .entry("id")
                    .or_insert_with(|| Value::from(device_id.get()));
                fields
                    .entry("group_id")
                    .or_insert_with(|| Value::from(group_id.get()));
                if !display_name.is_empty() {
                    fields
                        .entry("group_name")
                        .or_insert_with(|| Value::String(display_name.clone()));
                }
                members.push(Device::from_json(&Value::Object(fields))?);
            }
            members.sort_by_key(|device| device.id);

            out_groups.push(DeviceGroup {
                id: group_id,
                name,
                display_name,
                description: record.description,
                members: members.iter().map(|device| device.id).collect(),
            });
            devices.extend(members);
        }

        Ok(Self {
            devices,
            groups: out_groups,
        })
    }

    /// Keep only devices matching `filter`.
    ///
    /// Group member lists are pruned to the remaining devices and groups left
    /// without members are dropped.
    #[must_use]
    pub fn filter(mut self, filter: &DeviceFilter) -> Self {
        self.devices.retain(|device| filter.matches(device));

        let kept: BTreeSet<DeviceId> = self.devices.iter().map(|device| device.id).collect();
        for group in &mut self.groups {
            group.members.retain(|id| kept.contains(id));
        }
        self.groups.retain(|group| !group.members.is_empty());
        self
    }

    /// Iterate over the devices.
    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.devices.iter()
    }

    /// Number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// True when the listing holds no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Groups in ascending id order. Empty for flat listings.
    #[must_use]
    pub fn groups(&self) -> &[DeviceGroup] {
        &self.groups
    }

    /// First device with the given id.
    #[must_use]
    pub fn find(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == id)
    }

    /// Devices listed under `group`.
    pub fn in_group(&self, group: GroupId) -> impl Iterator<Item = &Device> + '_ {
        self.devices
            .iter()
            .filter(move |device| device.group_id == Some(group))
    }

    /// Take the devices out of the list.
    #[must_use]
    pub fn into_vec(self) -> Vec<Device> {
        self.devices
    }
}

impl IntoIterator for DeviceList {
    type Item = Device;
    type IntoIter = std::vec::IntoIter<Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeviceList {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

/// Device-level attributes from the per-device view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwitchInfo {
    /// Hostname as learned from the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Name configured in OpenL2M.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining attributes.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One interface (port) on a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interface {
    /// Interface key used in interface command endpoints.
    pub id: InterfaceId,
    /// Interface name, e.g. `GigabitEthernet1/0/15`.
    pub name: String,
    /// Interface description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Remaining attributes (status, vlan, PoE, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Interface {
    /// Raw value of an attribute not modelled as a field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// A VLAN known on a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vlan {
    /// VLAN id.
    pub id: u16,
    /// VLAN name.
    #[serde(default)]
    pub name: String,
    /// Remaining attributes.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Per-device view returned by a device read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceDetail {
    /// Device attributes.
    pub switch: SwitchInfo,
    /// Interfaces in server order.
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    /// VLANs keyed by id as text.
    #[serde(default)]
    pub vlans: BTreeMap<String, Vlan>,
    /// Further sections; the `details` view adds Ethernet, ARP and LLDP data here.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DeviceDetail {
    /// Parse a device view body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolError`] if `switch` is missing or a known
    /// field has the wrong type.
    pub fn from_json(body: &Value) -> Result<Self> {
        Self::deserialize(body)
            .map_err(|err| Error::ProtocolError(format!("invalid device view: {err}")))
    }

    /// Number of interfaces reported.
    #[must_use]
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// Interface with the given id.
    #[must_use]
    pub fn interface(&self, id: &InterfaceId) -> Option<&Interface> {
        self.interfaces.iter().find(|interface| &interface.id == id)
    }

    /// Hostname, if the device reported one.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.switch.hostname.as_deref()
    }

    /// A section not modelled as a field, e.g. LLDP neighbours in the details view.
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Server usage statistics (`api/stats/`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ServerStats(BTreeMap<String, Value>);

/// Server runtime environment (`api/environment/`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ServerEnvironment(BTreeMap<String, Value>);

macro_rules! key_value_accessors {
    ($name:ident) => {
        impl $name {
            /// Value stored under `key`.
            #[must_use]
            pub fn get(&self, key: &str) -> Option<&Value> {
                self.0.get(key)
            }

            /// Iterate over all entries in key order.
            pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
                self.0.iter()
            }

            /// Number of entries.
            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// True when there are no entries.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }
    };
}

key_value_accessors!(ServerStats);
key_value_accessors!(ServerEnvironment);

/// A change applied to one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceCommand {
    /// Administratively enable (`true`) or disable the interface.
    State(bool),
    /// Enable or disable PoE.
    PoeState(bool),
    /// Set the description.
    Description(String),
    /// Set the untagged VLAN.
    Vlan(u16),
}

impl InterfaceCommand {
    /// Endpoint segment under `interface/{id}/`.
    #[must_use]
    pub const fn segment(&self) -> &'static str {
        match self {
            Self::State(_) => "state",
            Self::PoeState(_) => "poe_state",
            Self::Description(_) => "description",
            Self::Vlan(_) => "vlan",
        }
    }

    /// JSON body posted to the endpoint.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::State(enabled) => {
                let state = if *enabled { "on" } else { "off" };
                serde_json::json!({ "state": state })
            }
            Self::PoeState(enabled) => serde_json::json!({ "poe_state": enabled }),
            Self::Description(text) => serde_json::json!({ "description": text }),
            Self::Vlan(vlan) => serde_json::json!({ "vlan": vlan }),
        }
    }
}

/// Outcome of an interface command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// HTTP status of the response.
    pub status: u16,
    /// The `result` message from the response body, if any.
    pub message: Option<String>,
    /// Full response body (`Null` when empty).
    pub body: Value,
}

impl CommandResult {
    /// Build from a response status and body.
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        let message = body.get("result").map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        });
        Self {
            status,
            message,
            body,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
