//! Data Provider Interface
//!
//! Tools never talk to upstream systems themselves. Each call is forwarded to
//! a [`DataProvider`], grouped into five capabilities. The real provider lives
//! outside this crate; [`StubDataProvider`] answers until one is plugged in.


pub mod stub;

pub use stub::StubDataProvider;

use crate::envelope::AgentLinkResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Unexpected provider failures
///
/// Business-level failures belong in the envelope (`success: false`); these
/// are for everything the provider could not turn into an envelope.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream {upstream} unavailable: {message}")]
    Unavailable { upstream: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The five capability groups a provider serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Tax,
    Business,
    PublicData,
    Legal,
    Disaster,
}

impl Capability {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tax => "tax",
            Self::Business => "business",
            Self::PublicData => "public-data",
            Self::Legal => "legal",
            Self::Disaster => "disaster",
        }
    }
}

impl fmt::Display for Capability {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters forwarded to a provider
///
/// Always carries a `tool` entry naming the operation; the provider uses it to
/// dispatch internally. Optional inputs the caller left out are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolRequest(Map<String, Value>);

impl ToolRequest {
    /// Key holding the operation name
    pub const TOOL_KEY: &'static str = "tool";

    /// Merge the tool discriminator with the fields of `args`
    ///
    /// `args` must serialize to a JSON object.
    #[inline]
    pub fn new<A>(tool: &str, args: &A) -> Result<Self, ProviderError>
    where
        A: Serialize + ?Sized,
    {
        let mut params = match serde_json::to_value(args)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ProviderError::InvalidRequest(format!(
                    "arguments for {} must be an object, got {}",
                    tool, other
                )));
            }
        };
        params.insert(Self::TOOL_KEY.to_string(), Value::String(tool.to_string()));
        Ok(Self(params))
    }

    #[inline]
    pub fn tool(&self) -> Option<&str> {
        self.0.get(Self::TOOL_KEY).and_then(Value::as_str)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[inline]
    pub fn params(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Capability contract fulfilled by the backing data engine
///
/// Implementations report business failures as `success: false` envelopes and
/// reserve `Err` for failures they cannot express that way. One instance is
/// shared by every tool for the life of the process.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// HomeTax data: VAT filings, e-tax invoices, income tax summaries
    async fn fetch_tax_data(&self, request: ToolRequest) -> Result<AgentLinkResponse, ProviderError>;

    /// Business registration status and details
    async fn fetch_business_data(
        &self,
        request: ToolRequest,
    ) -> Result<AgentLinkResponse, ProviderError>;

    /// Government notices and KONEPS procurement data
    async fn fetch_public_data(
        &self,
        request: ToolRequest,
    ) -> Result<AgentLinkResponse, ProviderError>;

    /// Court precedents
    async fn fetch_legal_data(
        &self,
        request: ToolRequest,
    ) -> Result<AgentLinkResponse, ProviderError>;

    /// MOIS disaster alerts
    async fn fetch_disaster_data(
        &self,
        request: ToolRequest,
    ) -> Result<AgentLinkResponse, ProviderError>;
}

/// Route a request to the provider method serving `capability`
#[inline]
pub async fn dispatch(
    provider: &dyn DataProvider,
    capability: Capability,
    request: ToolRequest,
) -> Result<AgentLinkResponse, ProviderError> {
    match capability {
        Capability::Tax => provider.fetch_tax_data(request).await,
        Capability::Business => provider.fetch_business_data(request).await,
        Capability::PublicData => provider.fetch_public_data(request).await,
        Capability::Legal => provider.fetch_legal_data(request).await,
        Capability::Disaster => provider.fetch_disaster_data(request).await,
    }
}
