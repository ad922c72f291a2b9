//! Device inventory tools
//!
//! Three read-only lookups against the device registry:
//! - `ListDevicesTool` - every registered thing with its type
//! - `ListThingTypesTool` - thing type definitions
//! - `ConnectedDevicesTool` - fleet index search for connected things

use std::sync::Arc;

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::json;

use super::error::{FleetToolError, log_tool_error};
use super::registry::{ConnectedDevice, Device, DeviceRegistry, ThingType};

/// Arguments for tools that take no input
#[derive(Debug, Default, Deserialize)]
pub struct NoArgs {}

// ============================================================================
// List Devices Tool
// ============================================================================

pub struct ListDevicesTool<R> {
    registry: Arc<R>,
}

impl<R: DeviceRegistry> ListDevicesTool<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }
}

impl<R: DeviceRegistry + 'static> Tool for ListDevicesTool<R> {
    const NAME: &'static str = "get_all_iot_devices";

    type Error = FleetToolError;
    type Args = NoArgs;
    type Output = Vec<Device>;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Retrieves all IoT Things from AWS IoT Core. Returns a list of objects with the thing name and thing type."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let devices = self.registry.list_things().await.map_err(|e| {
            let err = FleetToolError::Devices(e);
            log_tool_error(Self::NAME, &err);
            err
        })?;
        log::debug!("[{}] {} things", Self::NAME, devices.len());
        Ok(devices)
    }
}

// ============================================================================
// List Thing Types Tool
// ============================================================================

pub struct ListThingTypesTool<R> {
    registry: Arc<R>,
}

impl<R: DeviceRegistry> ListThingTypesTool<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }
}

impl<R: DeviceRegistry + 'static> Tool for ListThingTypesTool<R> {
    const NAME: &'static str = "get_all_iot_thing_types";

    type Error = FleetToolError;
    type Args = NoArgs;
    type Output = Vec<ThingType>;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Retrieves all IoT Thing Types from AWS IoT Core. Returns each type's name, description and attributes."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.registry.list_thing_types().await.map_err(|e| {
            let err = FleetToolError::ThingTypes(e);
            log_tool_error(Self::NAME, &err);
            err
        })
    }
}

// ============================================================================
// Connected Devices Tool
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ConnectedDevicesArgs {
    /// Optional thing type to filter by
    #[serde(default)]
    pub thing_type_name: Option<String>,
}

pub struct ConnectedDevicesTool<R> {
    registry: Arc<R>,
}

impl<R: DeviceRegistry> ConnectedDevicesTool<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }
}

/// Fleet indexing query for connected things, optionally of one type.
///
/// The type name is checked against the thing type name charset, so a filter
/// can only narrow the query and never drop the connectivity clause.
pub fn connected_devices_query(thing_type_name: Option<&str>) -> Result<String, FleetToolError> {
    let mut query = String::from("connectivity.connected:true");
    if let Some(name) = thing_type_name.map(str::trim).filter(|n| !n.is_empty()) {
        if !is_thing_type_name(name) {
            return Err(FleetToolError::InvalidThingTypeName(name.to_string()));
        }
        query.push_str(" AND thingTypeName:");
        query.push_str(name);
    }
    Ok(query)
}

fn is_thing_type_name(name: &str) -> bool {
    name.len() <= 128
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-'))
}

impl<R: DeviceRegistry + 'static> Tool for ConnectedDevicesTool<R> {
    const NAME: &'static str = "get_connected_devices";

    type Error = FleetToolError;
    type Args = ConnectedDevicesArgs;
    type Output = Vec<ConnectedDevice>;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: r#"Retrieves connected IoT devices using Fleet Indexing.

Returns each connected device with its type, connectivity status, last-seen time and attributes.
Optionally filter by thing type (e.g. 'VehicleDevice', 'SuitDevice', 'HouseDevice')."#
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "thing_type_name": {
                        "type": "string",
                        "description": "Optional thing type to filter by"
                    }
                }
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = connected_devices_query(args.thing_type_name.as_deref())
            .inspect_err(|err| log_tool_error(Self::NAME, err))?;
        log::debug!("[{}] searching index: {}", Self::NAME, query);
        self.registry.search_index(&query).await.map_err(|e| {
            let err = FleetToolError::ConnectedDevices(e);
            log_tool_error(Self::NAME, &err);
            err
        })
    }
}
