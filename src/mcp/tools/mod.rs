//! MCP Tools Implementation
//!
//! The AgentLink tool catalog. Every tool is a [`ProviderTool`]: it turns its
//! validated arguments into a [`ToolRequest`], forwards it to one provider
//! capability and relays the resulting envelope as pretty-printed JSON.


pub mod business;
pub mod disaster;
pub mod legal;
pub mod public_data;
pub mod schema;
pub mod tax;

pub use business::register_business_tools;
pub use disaster::register_disaster_tools;
pub use legal::register_legal_tools;
pub use public_data::register_public_data_tools;
pub use tax::register_tax_tools;

use crate::envelope::{AgentLinkResponse, ResponseError};
use crate::mcp::protocol::{CallToolParams, CallToolResult, ToolContent};
use crate::mcp::server::ToolHandler;
use crate::provider::{Capability, DataProvider, ProviderError, ToolRequest, dispatch};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error};

/// Envelope error code used when a provider fails instead of answering
pub const PROVIDER_ERROR_CODE: &str = "PROVIDER_ERROR";

/// Forwards one named tool to one provider capability
///
/// `A` is the typed argument set of the tool; it decides which fields reach
/// the provider.
pub struct ProviderTool<A> {
    name: &'static str,
    capability: Capability,
    provider: Arc<dyn DataProvider>,
    _args: PhantomData<fn() -> A>,
}

impl<A> ProviderTool<A> {
    #[inline]
    pub fn new(name: &'static str, capability: Capability, provider: Arc<dyn DataProvider>) -> Self {
        Self {
            name,
            capability,
            provider,
            _args: PhantomData,
        }
    }
}

#[async_trait]
impl<A> ToolHandler for ProviderTool<A>
where
    A: DeserializeOwned + Serialize + Send + Sync,
{
    #[inline]
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
        let arguments = Value::Object(params.arguments.unwrap_or_default());
        let args: A = serde_json::from_value(arguments)
            .with_context(|| format!("Invalid arguments for {}", self.name))?;
        let request = ToolRequest::new(self.name, &args)?;

        debug!("Forwarding {} to {} provider", self.name, self.capability);

        match dispatch(self.provider.as_ref(), self.capability, request).await {
            Ok(envelope) => envelope_result(&envelope),
            Err(e) => {
                error!("{} provider failed for {}: {}", self.capability, self.name, e);
                let mut result = envelope_result(&provider_failure(&e))?;
                result.is_error = Some(true);
                Ok(result)
            }
        }
    }
}

/// Integer tool argument
///
/// JSON Schema `integer` admits integral floats such as `2024.0` and values
/// wider than any fixed Rust width, so the number is kept as JSON. Integral
/// floats that fit in an `i64` are normalized to integers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WholeNumber(Number);

impl From<i64> for WholeNumber {
    #[inline]
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

impl<'de> Deserialize<'de> for WholeNumber {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = Number::deserialize(deserializer)?;
        if number.is_i64() || number.is_u64() {
            return Ok(Self(number));
        }

        match number.as_f64() {
            Some(value) if value.fract() == 0.0 => {
                if value >= i64::MIN as f64 && value < i64::MAX as f64 {
                    Ok(Self::from(value as i64))
                } else {
                    Ok(Self(number))
                }
            }
            _ => Err(de::Error::custom(format!("expected an integer, got {}", number))),
        }
    }
}

/// Failure envelope standing in for a provider that errored out
#[inline]
pub fn provider_failure(error: &ProviderError) -> AgentLinkResponse {
    AgentLinkResponse::fail(
        ResponseError::new(
            PROVIDER_ERROR_CODE,
            format!("Data provider failed: {}", error),
        )
        .with_korean("데이터 제공자 처리 중 오류가 발생했습니다."),
    )
}

/// Wrap an envelope as the single text content item of a tool result
///
/// `isError` stays unset; a `success: false` envelope is an ordinary answer.
#[inline]
pub fn envelope_result<T: Serialize>(envelope: &AgentLinkResponse<T>) -> Result<CallToolResult> {
    Ok(CallToolResult {
        content: vec![ToolContent::text(serde_json::to_string_pretty(envelope)?)],
        is_error: None,
    })
}
