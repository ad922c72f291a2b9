//! Analytics query service access (Athena)
//!
//! Queries are asynchronous: submit, poll the execution state, then fetch the
//! result rows. `QueryService` covers those three calls so the GPS tool can be
//! driven by a scripted service in tests.

use std::future::Future;

use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::types::{QueryExecutionState, ResultConfiguration, ResultSet};

/// Lifecycle of a submitted query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    /// Accepted and waiting for capacity
    Submitted,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl QueryState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

/// Current state of a query plus the reason the service gave for it
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStatus {
    pub state: QueryState,
    pub reason: Option<String>,
}

impl QueryStatus {
    pub fn new(state: QueryState) -> Self {
        Self { state, reason: None }
    }
}

/// One result row, one optional string per column
pub type Row = Vec<Option<String>>;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct QueryError(String);

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub trait QueryService: Send + Sync {
    /// Submit `sql`, writing results under `output_location`. Returns the execution id.
    fn start_query(
        &self,
        sql: &str,
        output_location: &str,
    ) -> impl Future<Output = Result<String, QueryError>> + Send;

    fn query_status(
        &self,
        execution_id: &str,
    ) -> impl Future<Output = Result<QueryStatus, QueryError>> + Send;

    /// Result rows including the header row
    fn query_rows(
        &self,
        execution_id: &str,
    ) -> impl Future<Output = Result<Vec<Row>, QueryError>> + Send;
}

/// `QueryService` backed by Amazon Athena
#[derive(Debug, Clone)]
pub struct AthenaQueryService {
    client: aws_sdk_athena::Client,
}

impl AthenaQueryService {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_athena::Client::new(sdk_config),
        }
    }
}

impl QueryService for AthenaQueryService {
    async fn start_query(&self, sql: &str, output_location: &str) -> Result<String, QueryError> {
        let output = self
            .client
            .start_query_execution()
            .query_string(sql)
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(output_location)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| QueryError::new(DisplayErrorContext(&e).to_string()))?;

        output
            .query_execution_id()
            .map(str::to_string)
            .ok_or_else(|| QueryError::new("Athena did not return a query execution id"))
    }

    async fn query_status(&self, execution_id: &str) -> Result<QueryStatus, QueryError> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| QueryError::new(DisplayErrorContext(&e).to_string()))?;

        let status = output
            .query_execution()
            .and_then(|execution| execution.status())
            .ok_or_else(|| QueryError::new(format!("No status for query {}", execution_id)))?;

        let state = query_state_from(status.state(), execution_id)?;

        Ok(QueryStatus {
            state,
            reason: status.state_change_reason().map(str::to_string),
        })
    }

    async fn query_rows(&self, execution_id: &str) -> Result<Vec<Row>, QueryError> {
        let output = self
            .client
            .get_query_results()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| QueryError::new(DisplayErrorContext(&e).to_string()))?;

        Ok(rows_from_result_set(output.result_set()))
    }
}

/// Athena reports no state for executions it has only just accepted.
fn query_state_from(
    state: Option<&QueryExecutionState>,
    execution_id: &str,
) -> Result<QueryState, QueryError> {
    match state {
        Some(QueryExecutionState::Queued) | None => Ok(QueryState::Submitted),
        Some(QueryExecutionState::Running) => Ok(QueryState::Running),
        Some(QueryExecutionState::Succeeded) => Ok(QueryState::Succeeded),
        Some(QueryExecutionState::Failed) => Ok(QueryState::Failed),
        Some(QueryExecutionState::Cancelled) => Ok(QueryState::Cancelled),
        Some(other) => Err(QueryError::new(format!(
            "Unknown query state '{}' for {}",
            other.as_str(),
            execution_id
        ))),
    }
}

fn rows_from_result_set(result_set: Option<&ResultSet>) -> Vec<Row> {
    result_set
        .map(|set| {
            set.rows()
                .iter()
                .map(|row| {
                    row.data()
                        .iter()
                        .map(|datum| datum.var_char_value().map(str::to_string))
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default()
}
