//! Device registry access
//!
//! `DeviceRegistry` is the seam between the tools and AWS IoT Core. The tools
//! only see plain records; `IotRegistry` does the SDK calls and the mapping.

use std::collections::HashMap;
use std::future::Future;

use aws_sdk_iot::error::DisplayErrorContext;
use aws_sdk_iot::types::{ThingAttribute, ThingDocument, ThingTypeDefinition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered thing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    #[serde(rename = "type")]
    pub thing_type: Option<String>,
}

/// A thing type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThingType {
    pub name: String,
    pub description: String,
    pub attributes: Vec<String>,
}

/// A thing returned by a fleet index search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub thing_type: Option<String>,
    pub connected: bool,
    pub last_seen: Option<DateTime<Utc>>,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct RegistryError(String);

impl RegistryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Read access to the device registry
pub trait DeviceRegistry: Send + Sync {
    fn list_things(&self) -> impl Future<Output = Result<Vec<Device>, RegistryError>> + Send;

    fn list_thing_types(&self)
    -> impl Future<Output = Result<Vec<ThingType>, RegistryError>> + Send;

    /// Run a fleet indexing query such as `connectivity.connected:true`
    fn search_index(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<ConnectedDevice>, RegistryError>> + Send;
}

/// `DeviceRegistry` backed by AWS IoT Core
#[derive(Debug, Clone)]
pub struct IotRegistry {
    client: aws_sdk_iot::Client,
}

impl IotRegistry {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_iot::Client::new(sdk_config),
        }
    }
}

impl DeviceRegistry for IotRegistry {
    async fn list_things(&self) -> Result<Vec<Device>, RegistryError> {
        let mut devices = Vec::new();
        let mut next_token = None;
        loop {
            let page = self
                .client
                .list_things()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| RegistryError::new(DisplayErrorContext(&e).to_string()))?;
            devices.extend(page.things().iter().map(device_from_attribute));
            match page.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }
        Ok(devices)
    }

    async fn list_thing_types(&self) -> Result<Vec<ThingType>, RegistryError> {
        let mut types = Vec::new();
        let mut next_token = None;
        loop {
            let page = self
                .client
                .list_thing_types()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| RegistryError::new(DisplayErrorContext(&e).to_string()))?;
            types.extend(page.thing_types().iter().map(thing_type_from_definition));
            match page.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }
        Ok(types)
    }

    async fn search_index(&self, query: &str) -> Result<Vec<ConnectedDevice>, RegistryError> {
        let mut devices = Vec::new();
        let mut next_token = None;
        loop {
            let page = self
                .client
                .search_index()
                .query_string(query)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| RegistryError::new(DisplayErrorContext(&e).to_string()))?;
            devices.extend(page.things().iter().map(connected_device_from_document));
            match page.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }
        Ok(devices)
    }
}

fn device_from_attribute(thing: &ThingAttribute) -> Device {
    Device {
        name: thing.thing_name().unwrap_or_default().to_string(),
        thing_type: thing.thing_type_name().map(str::to_string),
    }
}

fn thing_type_from_definition(definition: &ThingTypeDefinition) -> ThingType {
    let properties = definition.thing_type_properties();
    ThingType {
        name: definition.thing_type_name().unwrap_or_default().to_string(),
        description: properties
            .and_then(|p| p.thing_type_description())
            .unwrap_or_default()
            .to_string(),
        attributes: properties
            .map(|p| p.searchable_attributes().to_vec())
            .unwrap_or_default(),
    }
}

fn connected_device_from_document(doc: &ThingDocument) -> ConnectedDevice {
    let connectivity = doc.connectivity();
    ConnectedDevice {
        name: doc.thing_name().unwrap_or_default().to_string(),
        thing_type: doc.thing_type_name().map(str::to_string),
        connected: connectivity.and_then(|c| c.connected()).unwrap_or(false),
        // Fleet indexing reports milliseconds since the epoch
        last_seen: connectivity
            .and_then(|c| c.timestamp())
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        attributes: doc.attributes().cloned().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_iot::types::{ThingConnectivity, ThingTypeProperties};

    #[test]
    fn test_device_from_attribute_without_type() {
        let thing = ThingAttribute::builder().thing_name("sensor-1").build();
        let device = device_from_attribute(&thing);
        assert_eq!(device.name, "sensor-1");
        assert_eq!(device.thing_type, None);
    }

    #[test]
    fn test_device_serializes_type_key() {
        let device = Device {
            name: "truck-7".to_string(),
            thing_type: Some("VehicleDevice".to_string()),
        };
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["type"], "VehicleDevice");
        assert!(json.get("thing_type").is_none());
    }

    #[test]
    fn test_thing_type_defaults_when_properties_missing() {
        let definition = ThingTypeDefinition::builder()
            .thing_type_name("HouseDevice")
            .build();
        let thing_type = thing_type_from_definition(&definition);
        assert_eq!(thing_type.name, "HouseDevice");
        assert_eq!(thing_type.description, "");
        assert!(thing_type.attributes.is_empty());
    }

    #[test]
    fn test_thing_type_reads_properties() {
        let definition = ThingTypeDefinition::builder()
            .thing_type_name("VehicleDevice")
            .thing_type_properties(
                ThingTypeProperties::builder()
                    .thing_type_description("Connected vehicles")
                    .searchable_attributes("vin")
                    .searchable_attributes("fleet")
                    .build(),
            )
            .build();
        let thing_type = thing_type_from_definition(&definition);
        assert_eq!(thing_type.description, "Connected vehicles");
        assert_eq!(thing_type.attributes, vec!["vin", "fleet"]);
    }

    #[test]
    fn test_connected_device_from_document() {
        let doc = ThingDocument::builder()
            .thing_name("suit-3")
            .thing_type_name("SuitDevice")
            .attributes("owner", "ops")
            .connectivity(
                ThingConnectivity::builder()
                    .connected(true)
                    .timestamp(1_700_000_000_000)
                    .build(),
            )
            .build();
        let device = connected_device_from_document(&doc);
        assert_eq!(device.name, "suit-3");
        assert_eq!(device.thing_type.as_deref(), Some("SuitDevice"));
        assert!(device.connected);
        assert_eq!(
            device.last_seen.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert_eq!(device.attributes.get("owner").map(String::as_str), Some("ops"));
    }

    #[test]
    fn test_connected_device_without_connectivity() {
        let doc = ThingDocument::builder().thing_name("orphan").build();
        let device = connected_device_from_document(&doc);
        assert!(!device.connected);
        assert!(device.last_seen.is_none());
        assert!(device.attributes.is_empty());
    }
}
