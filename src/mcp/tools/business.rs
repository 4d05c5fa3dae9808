//! Business registration tools (사업자 정보 도구)
//!
//! Verification and lookup of Korean business registrations, sourced from the
//! National Tax Service business registry.

use crate::mcp::McpServer;
use crate::mcp::protocol::Tool;
use crate::mcp::tools::ProviderTool;
use crate::mcp::tools::schema::{boolean, business_number, object};
use crate::provider::{Capability, DataProvider};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const VERIFY_BUSINESS_REGISTRATION: &str = "verify_business_registration";
pub const GET_BUSINESS_INFO: &str = "get_business_info";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyBusinessRegistrationArgs {
    pub business_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBusinessInfoArgs {
    pub business_number: String,
    #[serde(default)]
    pub include_financial: bool,
}

/// 사업자등록번호 진위 확인
#[inline]
pub fn verify_business_registration_tool() -> Tool {
    Tool {
        name: VERIFY_BUSINESS_REGISTRATION.to_string(),
        description: Some(
            "Verify the validity of a Korean business registration number (사업자등록번호 진위 확인)"
                .to_string(),
        ),
        input_schema: object(
            json!({
                "business_number": business_number(
                    "Business registration number to verify (사업자등록번호)"
                )
            }),
            &["business_number"],
        ),
    }
}

/// 사업자 상세 정보 조회
#[inline]
pub fn get_business_info_tool() -> Tool {
    Tool {
        name: GET_BUSINESS_INFO.to_string(),
        description: Some(
            "Retrieve detailed info about a registered Korean business entity (사업자 상세 정보 조회)"
                .to_string(),
        ),
        input_schema: object(
            json!({
                "business_number": business_number("Business registration number (사업자등록번호)"),
                "include_financial": boolean(
                    "Include basic financial summary if available (재무 요약 포함 여부)",
                    false
                )
            }),
            &["business_number"],
        ),
    }
}

/// Register the business registration tools
#[inline]
pub async fn register_business_tools(server: &McpServer, provider: Arc<dyn DataProvider>) -> Result<()> {
    server
        .register_tool(
            verify_business_registration_tool(),
            ProviderTool::<VerifyBusinessRegistrationArgs>::new(
                VERIFY_BUSINESS_REGISTRATION,
                Capability::Business,
                Arc::clone(&provider),
            ),
        )
        .await?;

    server
        .register_tool(
            get_business_info_tool(),
            ProviderTool::<GetBusinessInfoArgs>::new(GET_BUSINESS_INFO, Capability::Business, provider),
        )
        .await
}
