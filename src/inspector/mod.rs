//! API Gateway profile inspector
//!
//! For each named AWS profile, finds the first REST API and the first API key
//! and reports the invoke URL and key value. Every failure is turned into an
//! `InspectError` for that profile; the run always continues with the next
//! profile.

use std::fmt::Debug;
use std::future::Future;

use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_apigateway::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// What the inspector found for one profile
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayInfo {
    pub api_id: String,
    pub api_name: String,
    pub url: String,
    pub api_key: Option<String>,
}

/// A REST API as listed by API Gateway
#[derive(Debug, Clone, PartialEq)]
pub struct RestApiSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InspectError {
    #[error("No credentials found for profile: {0}")]
    NoCredentials(String),

    #[error("No REST APIs found")]
    NoRestApis,

    #[error("AWS error: {0}")]
    Aws(String),

    #[error("{0}")]
    Other(String),
}

/// Read access to API Gateway for one session
pub trait GatewayCatalog: Send + Sync {
    fn first_rest_api(
        &self,
    ) -> impl Future<Output = Result<Option<RestApiSummary>, InspectError>> + Send;

    /// Value of the first API key, if any key exists
    fn first_api_key_value(
        &self,
    ) -> impl Future<Output = Result<Option<String>, InspectError>> + Send;
}

/// `GatewayCatalog` backed by the API Gateway SDK client
#[derive(Debug, Clone)]
pub struct ApiGatewayCatalog {
    client: aws_sdk_apigateway::Client,
}

impl ApiGatewayCatalog {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_apigateway::Client::new(sdk_config),
        }
    }
}

impl GatewayCatalog for ApiGatewayCatalog {
    async fn first_rest_api(&self) -> Result<Option<RestApiSummary>, InspectError> {
        let output = self.client.get_rest_apis().send().await.map_err(classify)?;
        Ok(output.items().first().map(|api| RestApiSummary {
            id: api.id().unwrap_or_default().to_string(),
            name: api.name().unwrap_or_default().to_string(),
        }))
    }

    async fn first_api_key_value(&self) -> Result<Option<String>, InspectError> {
        let keys = self.client.get_api_keys().send().await.map_err(classify)?;
        let Some(key_id) = keys.items().first().and_then(|key| key.id()) else {
            return Ok(None);
        };

        let key = self
            .client
            .get_api_key()
            .api_key(key_id)
            .include_value(true)
            .send()
            .await
            .map_err(classify)?;
        Ok(key.value().map(str::to_string))
    }
}

/// Service errors keep the service's own message; everything else is described in full.
fn classify<E, R>(err: SdkError<E, R>) -> InspectError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    if let Some(message) = err.as_service_error().and_then(|e| e.message()) {
        return InspectError::Aws(message.to_string());
    }
    InspectError::Other(DisplayErrorContext(&err).to_string())
}

pub fn invoke_url(api_id: &str, region: &str) -> String {
    format!("https://{}.execute-api.{}.amazonaws.com", api_id, region)
}

/// Look up gateway details through an already opened session.
pub async fn inspect_with<C: GatewayCatalog>(
    catalog: &C,
    region: &str,
) -> Result<GatewayInfo, InspectError> {
    let api = catalog
        .first_rest_api()
        .await?
        .ok_or(InspectError::NoRestApis)?;
    let url = invoke_url(&api.id, region);
    let api_key = catalog.first_api_key_value().await?;

    Ok(GatewayInfo {
        api_id: api.id,
        api_name: api.name,
        url,
        api_key,
    })
}

/// Open a session for `profile` and inspect its API Gateway.
pub async fn inspect_profile(profile: &str, default_region: &str) -> Result<GatewayInfo, InspectError> {
    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .profile_name(profile)
        .load()
        .await;

    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| InspectError::NoCredentials(profile.to_string()))?;
    if let Err(e) = provider.provide_credentials().await {
        log::debug!("Credential resolution failed for {}: {}", profile, e);
        return Err(InspectError::NoCredentials(profile.to_string()));
    }

    let region = sdk_config
        .region()
        .map(|r| r.to_string())
        .unwrap_or_else(|| default_region.to_string());
    log::info!("Inspecting profile {} in {}", profile, region);

    inspect_with(&ApiGatewayCatalog::new(&sdk_config), &region).await
}

/// Human-readable report block for one profile
pub fn render_report(profile: &str, result: &Result<GatewayInfo, InspectError>) -> String {
    let mut out = format!("\n=== Profile: {} ===\n", profile);
    match result {
        Err(e) => out.push_str(&format!("Error: {}\n", e)),
        Ok(info) => {
            out.push_str(&format!("API Gateway URL: {}\n", info.url));
            out.push_str(&format!(
                "API Key: {}\n",
                info.api_key.as_deref().unwrap_or("No API key found")
            ));
        }
    }
    out
}
