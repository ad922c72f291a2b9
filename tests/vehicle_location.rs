use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use iot_fleet_agent::agent::tools::{
    FleetToolError, QueryError, QueryService, QueryState, QueryStatus, Row, VehicleLocationTool,
};
use iot_fleet_agent::config::types::LocationQueryConfig;
use rig::tool::Tool;

/// Athena stand-in that replays a fixed sequence of states
struct ScriptedQueries {
    states: Mutex<VecDeque<QueryState>>,
    rows: Vec<Row>,
    status_checks: AtomicU32,
    submitted_sql: Mutex<Option<String>>,
}

impl ScriptedQueries {
    fn new(states: &[QueryState], rows: Vec<Row>) -> Arc<Self> {
        Arc::new(Self {
            states: Mutex::new(states.iter().copied().collect()),
            rows,
            status_checks: AtomicU32::new(0),
            submitted_sql: Mutex::new(None),
        })
    }
}

impl QueryService for ScriptedQueries {
    async fn start_query(&self, sql: &str, output_location: &str) -> Result<String, QueryError> {
        assert!(output_location.starts_with("s3://"));
        *self.submitted_sql.lock().unwrap() = Some(sql.to_string());
        Ok("exec-1".to_string())
    }

    async fn query_status(&self, _execution_id: &str) -> Result<QueryStatus, QueryError> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        let mut states = self.states.lock().unwrap();
        // The last scripted state repeats forever
        let state = if states.len() > 1 {
            states.pop_front().unwrap()
        } else {
            *states.front().unwrap()
        };
        Ok(QueryStatus {
            state,
            reason: Some(format!("{:?} by script", state)),
        })
    }

    async fn query_rows(&self, _execution_id: &str) -> Result<Vec<Row>, QueryError> {
        Ok(self.rows.clone())
    }
}

struct UnreachableAthena;

impl QueryService for UnreachableAthena {
    async fn start_query(&self, _sql: &str, _output_location: &str) -> Result<String, QueryError> {
        Err(QueryError::new("dispatch failure: connection refused"))
    }

    async fn query_status(&self, _execution_id: &str) -> Result<QueryStatus, QueryError> {
        unreachable!("query was never submitted")
    }

    async fn query_rows(&self, _execution_id: &str) -> Result<Vec<Row>, QueryError> {
        unreachable!("query was never submitted")
    }
}

fn fast_config() -> LocationQueryConfig {
    LocationQueryConfig {
        poll_interval_ms: 0,
        max_poll_attempts: 5,
        ..LocationQueryConfig::default()
    }
}

fn header() -> Row {
    ["latitude", "longitude", "altitude", "timestamp"]
        .iter()
        .map(|v| Some(v.to_string()))
        .collect()
}

fn data_row() -> Row {
    ["37.7749", "-122.4194", "16.0", "2024-06-01 08:30:00.000"]
        .iter()
        .map(|v| Some(v.to_string()))
        .collect()
}

#[tokio::test]
async fn succeeded_query_returns_parsed_fix() {
    let service = ScriptedQueries::new(
        &[QueryState::Submitted, QueryState::Running, QueryState::Succeeded],
        vec![header(), data_row()],
    );
    let tool = VehicleLocationTool::new(Arc::clone(&service), fast_config());

    let fix = tool.lookup("truck-7").await.unwrap();
    assert_eq!(fix.latitude, 37.7749);
    assert_eq!(fix.longitude, -122.4194);
    assert_eq!(fix.altitude, 16.0);
    assert_eq!(fix.timestamp, "2024-06-01 08:30:00.000");
    assert_eq!(service.status_checks.load(Ordering::SeqCst), 3);

    let json = serde_json::to_value(&fix).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 4);
    assert!(json["latitude"].is_f64());
}

#[tokio::test]
async fn submitted_query_uses_configured_table() {
    let service = ScriptedQueries::new(&[QueryState::Succeeded], vec![header(), data_row()]);
    let config = LocationQueryConfig {
        database: "telemetry".to_string(),
        table: "positions".to_string(),
        partition_key: "device_id".to_string(),
        ..fast_config()
    };
    let tool = VehicleLocationTool::new(Arc::clone(&service), config);

    tool.lookup("van-2").await.unwrap();
    let sql = service.submitted_sql.lock().unwrap().clone().unwrap();
    assert!(sql.contains("FROM telemetry.positions"));
    assert!(sql.contains("WHERE device_id = 'van-2'"));
    assert!(sql.contains("ORDER BY timestamp DESC"));
    assert!(sql.ends_with("LIMIT 1"));
}

#[tokio::test]
async fn failed_query_reports_no_data() {
    let service = ScriptedQueries::new(&[QueryState::Running, QueryState::Failed], vec![]);
    let tool = VehicleLocationTool::new(service, fast_config());

    let err = tool.lookup("truck-7").await.unwrap_err();
    assert!(matches!(err, FleetToolError::NoGpsData { .. }));
    assert_eq!(err.to_string(), "No GPS data found for thing: truck-7");
}

#[tokio::test]
async fn cancelled_query_reports_no_data() {
    let service = ScriptedQueries::new(&[QueryState::Cancelled], vec![header(), data_row()]);
    let tool = VehicleLocationTool::new(service, fast_config());

    let err = tool.lookup("truck-7").await.unwrap_err();
    assert_eq!(err.to_string(), "No GPS data found for thing: truck-7");
}

#[tokio::test]
async fn header_only_result_reports_no_data() {
    let service = ScriptedQueries::new(&[QueryState::Succeeded], vec![header()]);
    let tool = VehicleLocationTool::new(service, fast_config());

    let err = tool.lookup("ghost").await.unwrap_err();
    assert!(matches!(err, FleetToolError::NoGpsData { ref thing_name } if thing_name == "ghost"));
}

#[tokio::test]
async fn stuck_query_times_out_after_max_attempts() {
    let service = ScriptedQueries::new(&[QueryState::Running], vec![]);
    let tool = VehicleLocationTool::new(Arc::clone(&service), fast_config());

    let err = tool.lookup("truck-7").await.unwrap_err();
    assert!(matches!(
        err,
        FleetToolError::GpsQueryTimeout { attempts: 5, .. }
    ));
    assert_eq!(service.status_checks.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn submit_failure_is_error_variant() {
    let tool = VehicleLocationTool::new(Arc::new(UnreachableAthena), fast_config());

    let err = tool.lookup("truck-7").await.unwrap_err();
    assert!(matches!(err, FleetToolError::GpsQuery(_)));
    assert_eq!(
        err.to_string(),
        "Error retrieving GPS coordinates: dispatch failure: connection refused"
    );
}

#[tokio::test]
async fn empty_thing_name_rejected_before_query() {
    let tool = VehicleLocationTool::new(Arc::new(UnreachableAthena), fast_config());
    let err = tool.lookup("  ").await.unwrap_err();
    assert!(matches!(err, FleetToolError::MissingThingName));
}

#[tokio::test]
async fn tool_call_deserializes_arguments() {
    let service = ScriptedQueries::new(&[QueryState::Succeeded], vec![header(), data_row()]);
    let tool = VehicleLocationTool::new(service, fast_config());

    let args = serde_json::from_str(r#"{"thing_name": "truck-7"}"#).unwrap();
    let fix = tool.call(args).await.unwrap();
    assert_eq!(fix.latitude, 37.7749);
}
