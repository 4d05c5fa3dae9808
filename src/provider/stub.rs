//! Placeholder provider used until the core engine is connected

use crate::envelope::{AgentLinkResponse, ResponseMetadata};
use crate::provider::{Capability, DataProvider, ProviderError, ToolRequest};
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

pub const STUB_STATUS: &str = "stub";
pub const STUB_MESSAGE: &str =
    "Core engine not connected. This is a placeholder response for development.";
pub const STUB_MESSAGE_KO: &str = "코어 엔진 미연결 상태입니다. 개발용 플레이스홀더 응답입니다.";

/// Answers every capability with a fixed "not connected" envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct StubDataProvider;

impl StubDataProvider {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Upstream source tag reported for each capability
    #[inline]
    pub const fn source_for(capability: Capability) -> &'static str {
        match capability {
            Capability::Tax => "hometax",
            Capability::Business => "business-registry",
            Capability::PublicData => "public-data-portal",
            Capability::Legal => "supreme-court",
            Capability::Disaster => "mois-disaster",
        }
    }

    fn stub_response(capability: Capability, request: &ToolRequest) -> AgentLinkResponse {
        debug!(
            "Stub provider answering {} for tool {:?}",
            capability,
            request.tool()
        );

        AgentLinkResponse::ok(json!({
            "status": STUB_STATUS,
            "message": STUB_MESSAGE,
            "message_ko": STUB_MESSAGE_KO,
        }))
        .with_metadata(ResponseMetadata::now(Self::source_for(capability), false))
    }
}

#[async_trait]
impl DataProvider for StubDataProvider {
    async fn fetch_tax_data(&self, request: ToolRequest) -> Result<AgentLinkResponse, ProviderError> {
        Ok(Self::stub_response(Capability::Tax, &request))
    }

    async fn fetch_business_data(
        &self,
        request: ToolRequest,
    ) -> Result<AgentLinkResponse, ProviderError> {
        Ok(Self::stub_response(Capability::Business, &request))
    }

    async fn fetch_public_data(
        &self,
        request: ToolRequest,
    ) -> Result<AgentLinkResponse, ProviderError> {
        Ok(Self::stub_response(Capability::PublicData, &request))
    }

    async fn fetch_legal_data(
        &self,
        request: ToolRequest,
    ) -> Result<AgentLinkResponse, ProviderError> {
        Ok(Self::stub_response(Capability::Legal, &request))
    }

    async fn fetch_disaster_data(
        &self,
        request: ToolRequest,
    ) -> Result<AgentLinkResponse, ProviderError> {
        Ok(Self::stub_response(Capability::Disaster, &request))
    }
}
