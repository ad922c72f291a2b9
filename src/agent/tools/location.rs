//! Vehicle GPS lookup backed by Athena
//!
//! Submits a query for the latest location row of one thing, polls until the
//! query reaches a terminal state, then parses the single data row.
//!
//! Polling is bounded: `poll_interval` between status checks and at most
//! `max_poll_attempts` checks. FAILED and CANCELLED queries are reported as
//! "no GPS data"; the service's reason only goes to the log.

use std::sync::Arc;
use std::time::Duration;

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::analytics::{QueryService, QueryState, QueryStatus, Row};
use super::error::{FleetToolError, log_tool_error};
use crate::config::types::LocationQueryConfig;

/// Latest known position of a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct VehicleLocationArgs {
    /// The IoT thing name to look up
    pub thing_name: String,
}

pub struct VehicleLocationTool<Q> {
    service: Arc<Q>,
    config: LocationQueryConfig,
}

impl<Q: QueryService> VehicleLocationTool<Q> {
    pub fn new(service: Arc<Q>, config: LocationQueryConfig) -> Self {
        Self { service, config }
    }

    /// Build the latest-location query for one thing.
    pub fn build_query(&self, thing_name: &str) -> String {
        format!(
            "SELECT latitude, longitude, altitude, timestamp\n\
             FROM {}.{}\n\
             WHERE {} = '{}'\n\
             ORDER BY timestamp DESC\n\
             LIMIT 1",
            self.config.database,
            self.config.table,
            self.config.partition_key,
            escape_sql_literal(thing_name)
        )
    }

    pub async fn lookup(&self, thing_name: &str) -> Result<GpsFix, FleetToolError> {
        if thing_name.trim().is_empty() {
            return Err(FleetToolError::MissingThingName);
        }

        let sql = self.build_query(thing_name);
        let query_id = self
            .service
            .start_query(&sql, &self.config.output_location)
            .await
            .map_err(FleetToolError::GpsQuery)?;
        log::debug!("Submitted GPS query {} for {}", query_id, thing_name);

        let status = wait_for_completion(
            self.service.as_ref(),
            &query_id,
            self.config.poll_interval(),
            self.config.max_poll_attempts,
        )
        .await?;

        if status.state != QueryState::Succeeded {
            log::warn!(
                "GPS query {} for {} ended {:?}: {}",
                query_id,
                thing_name,
                status.state,
                status.reason.as_deref().unwrap_or("no reason given")
            );
            return Err(FleetToolError::NoGpsData {
                thing_name: thing_name.to_string(),
            });
        }

        let rows = self
            .service
            .query_rows(&query_id)
            .await
            .map_err(FleetToolError::GpsQuery)?;

        // The first row holds the column headers
        match rows.get(1) {
            Some(row) => parse_gps_row(row),
            None => Err(FleetToolError::NoGpsData {
                thing_name: thing_name.to_string(),
            }),
        }
    }
}

/// Poll `query_id` until it reaches a terminal state.
///
/// Sleeps `interval` between checks, never before the first one. Gives up
/// with `GpsQueryTimeout` after `max_attempts` non-terminal answers.
pub async fn wait_for_completion<Q: QueryService>(
    service: &Q,
    query_id: &str,
    interval: Duration,
    max_attempts: u32,
) -> Result<QueryStatus, FleetToolError> {
    for attempt in 1..=max_attempts {
        let status = service
            .query_status(query_id)
            .await
            .map_err(FleetToolError::GpsQuery)?;
        if status.state.is_terminal() {
            return Ok(status);
        }
        log::trace!(
            "GPS query {} is {:?} (check {}/{})",
            query_id,
            status.state,
            attempt,
            max_attempts
        );
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Err(FleetToolError::GpsQueryTimeout {
        query_id: query_id.to_string(),
        attempts: max_attempts,
    })
}

fn escape_sql_literal(value: &str) -> String {
    value.replace('\'', "''")
}

fn gps_column<'a>(row: &'a Row, index: usize, name: &str) -> Result<&'a str, FleetToolError> {
    row.get(index)
        .and_then(|value| value.as_deref())
        .ok_or_else(|| FleetToolError::MalformedGpsRow(format!("missing {} column", name)))
}

fn gps_number(row: &Row, index: usize, name: &str) -> Result<f64, FleetToolError> {
    let raw = gps_column(row, index, name)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|e| FleetToolError::MalformedGpsRow(format!("invalid {} '{}': {}", name, raw, e)))
}

fn parse_gps_row(row: &Row) -> Result<GpsFix, FleetToolError> {
    Ok(GpsFix {
        latitude: gps_number(row, 0, "latitude")?,
        longitude: gps_number(row, 1, "longitude")?,
        altitude: gps_number(row, 2, "altitude")?,
        timestamp: gps_column(row, 3, "timestamp")?.to_string(),
    })
}

impl<Q: QueryService + 'static> Tool for VehicleLocationTool<Q> {
    const NAME: &'static str = "get_vehicle_gps_coordinates";

    type Error = FleetToolError;
    type Args = VehicleLocationArgs;
    type Output = GpsFix;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: r#"Retrieves the latest GPS coordinates for an IoT thing of thing type 'VehicleDevice'.

Returns latitude, longitude, altitude and the timestamp of the reading."#
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "thing_name": {
                        "type": "string",
                        "description": "The IoT thing name to query GPS coordinates for"
                    }
                },
                "required": ["thing_name"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.lookup(&args.thing_name).await.inspect_err(|err| {
            log_tool_error(Self::NAME, err);
        })
    }
}
