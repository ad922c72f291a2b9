//! Agent tools using Rig's Tool trait
//!
//! ## Available Tools
//!
//! ### Device registry (AWS IoT Core)
//! - `ListDevicesTool` (`get_all_iot_devices`) - List all registered things
//! - `ListThingTypesTool` (`get_all_iot_thing_types`) - List thing type definitions
//! - `ConnectedDevicesTool` (`get_connected_devices`) - Fleet index search for connected things
//!
//! ### Analytics (Amazon Athena)
//! - `VehicleLocationTool` (`get_vehicle_gps_coordinates`) - Latest GPS fix for a vehicle
//!
//! ## Error Handling Pattern
//!
//! Every tool returns `Result<_, FleetToolError>`. A failed AWS call becomes
//! the error variant for that tool and is logged with its `ErrorCategory`;
//! nothing is smuggled into the data output. See `error.rs`.
//!
//! ## Service seams
//!
//! Tools are generic over `DeviceRegistry` (`registry.rs`) and `QueryService`
//! (`analytics.rs`). Production code plugs in `IotRegistry` and
//! `AthenaQueryService`; tests plug in scripted fakes.

pub mod analytics;
mod devices;
pub mod error;
mod location;
pub mod registry;

pub use analytics::{AthenaQueryService, QueryError, QueryService, QueryState, QueryStatus, Row};
pub use devices::{
    ConnectedDevicesArgs, ConnectedDevicesTool, ListDevicesTool, ListThingTypesTool, NoArgs,
    connected_devices_query,
};
pub use error::{ErrorCategory, FleetToolError};
pub use location::{GpsFix, VehicleLocationArgs, VehicleLocationTool, wait_for_completion};
pub use registry::{ConnectedDevice, Device, DeviceRegistry, IotRegistry, RegistryError, ThingType};
