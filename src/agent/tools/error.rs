//! Common error utilities for fleet tools
//!
//! Every tool returns `Result<Output, FleetToolError>`. Rig renders the error
//! through `Display` when handing it back to the model, so the messages below
//! are what the model sees. A failed lookup is therefore never shaped like a
//! data record.
//!
//! `ErrorCategory` classifies failures for logging and lets callers decide
//! whether asking again could help.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::analytics::QueryError;
use super::registry::RegistryError;

/// Common error categories for tool errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A call to an AWS service failed
    ServiceError,
    /// The query ran but returned nothing usable
    NoData,
    /// The service returned a value we could not interpret
    MalformedResponse,
    /// Input validation failed
    ValidationFailed,
    /// Operation timed out
    Timeout,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::ServiceError => "An AWS service call failed",
            Self::NoData => "No matching data was found",
            Self::MalformedResponse => "The service returned data that could not be interpreted",
            Self::ValidationFailed => "Input validation failed",
            Self::Timeout => "The operation timed out",
        }
    }

    /// Returns whether this error is potentially recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ServiceError | Self::ValidationFailed | Self::Timeout)
    }

    /// Returns the error code string for this category
    pub fn code(&self) -> &'static str {
        match self {
            Self::ServiceError => "SERVICE_ERROR",
            Self::NoData => "NO_DATA",
            Self::MalformedResponse => "MALFORMED_RESPONSE",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors returned by the fleet tools
#[derive(Debug, Error)]
pub enum FleetToolError {
    #[error("Error retrieving IoT things: {0}")]
    Devices(#[source] RegistryError),

    #[error("Error retrieving IoT thing types: {0}")]
    ThingTypes(#[source] RegistryError),

    #[error("Error retrieving connected devices: {0}")]
    ConnectedDevices(#[source] RegistryError),

    #[error("thing_name must not be empty")]
    MissingThingName,

    #[error("Invalid thing type name '{0}': only letters, digits, ':', '_' and '-' are allowed")]
    InvalidThingTypeName(String),

    /// The query finished without a data row, or ended FAILED/CANCELLED.
    #[error("No GPS data found for thing: {thing_name}")]
    NoGpsData { thing_name: String },

    #[error(
        "Error retrieving GPS coordinates: query {query_id} still running after {attempts} status checks"
    )]
    GpsQueryTimeout { query_id: String, attempts: u32 },

    #[error("Error retrieving GPS coordinates: {0}")]
    GpsQuery(#[source] QueryError),

    #[error("Error retrieving GPS coordinates: {0}")]
    MalformedGpsRow(String),
}

impl FleetToolError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Devices(_) | Self::ThingTypes(_) | Self::ConnectedDevices(_) => {
                ErrorCategory::ServiceError
            }
            Self::GpsQuery(_) => ErrorCategory::ServiceError,
            Self::MissingThingName | Self::InvalidThingTypeName(_) => {
                ErrorCategory::ValidationFailed
            }
            Self::NoGpsData { .. } => ErrorCategory::NoData,
            Self::GpsQueryTimeout { .. } => ErrorCategory::Timeout,
            Self::MalformedGpsRow(_) => ErrorCategory::MalformedResponse,
        }
    }
}

/// Log a tool failure with its category before it is handed to the agent.
pub(crate) fn log_tool_error(tool_name: &str, err: &FleetToolError) {
    let category = err.category();
    log::warn!(
        "[{}] {} ({}, recoverable: {}): {}",
        tool_name,
        category.description(),
        category,
        category.is_recoverable(),
        err
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_codes() {
        assert_eq!(ErrorCategory::ServiceError.code(), "SERVICE_ERROR");
        assert_eq!(ErrorCategory::NoData.code(), "NO_DATA");
        assert_eq!(ErrorCategory::Timeout.to_string(), "TIMEOUT");
    }

    #[test]
    fn test_error_category_recoverable() {
        assert!(ErrorCategory::Timeout.is_recoverable());
        assert!(ErrorCategory::ServiceError.is_recoverable());
        assert!(!ErrorCategory::NoData.is_recoverable());
        assert!(!ErrorCategory::MalformedResponse.is_recoverable());
    }

    #[test]
    fn test_registry_failures_keep_cause_in_message() {
        let err = FleetToolError::Devices(RegistryError::new("AccessDenied"));
        assert_eq!(err.to_string(), "Error retrieving IoT things: AccessDenied");
        assert_eq!(err.category(), ErrorCategory::ServiceError);

        let err = FleetToolError::ThingTypes(RegistryError::new("throttled"));
        assert_eq!(err.to_string(), "Error retrieving IoT thing types: throttled");

        let err = FleetToolError::ConnectedDevices(RegistryError::new("index not enabled"));
        assert_eq!(
            err.to_string(),
            "Error retrieving connected devices: index not enabled"
        );
    }

    #[test]
    fn test_gps_messages() {
        let err = FleetToolError::NoGpsData {
            thing_name: "truck-7".to_string(),
        };
        assert_eq!(err.to_string(), "No GPS data found for thing: truck-7");
        assert_eq!(err.category(), ErrorCategory::NoData);

        let err = FleetToolError::GpsQueryTimeout {
            query_id: "q-1".to_string(),
            attempts: 3,
        };
        assert!(err.to_string().starts_with("Error retrieving GPS coordinates:"));
        assert_eq!(err.category(), ErrorCategory::Timeout);
    }
}
