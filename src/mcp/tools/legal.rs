//! Legal data tools (법률 데이터 도구)
//!
//! Court precedent search against the Supreme Court of Korea (대법원) case
//! database.

use crate::mcp::McpServer;
use crate::mcp::protocol::Tool;
use crate::mcp::tools::{ProviderTool, WholeNumber};
use crate::mcp::tools::schema::{date, integer, object, string_enum, string_length};
use crate::provider::{Capability, DataProvider};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const SEARCH_COURT_PRECEDENTS: &str = "search_court_precedents";

pub const COURT_TYPES: [&str; 6] = ["all", "supreme", "high", "district", "patent", "family"];
pub const CASE_TYPES: [&str; 7] = [
    "all",
    "civil",
    "criminal",
    "administrative",
    "tax",
    "labor",
    "commercial",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCourtPrecedentsArgs {
    pub keyword: String,
    pub court_type: String,
    pub case_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    pub page: WholeNumber,
    pub page_size: WholeNumber,
}

/// 대법원 판례 검색
#[inline]
pub fn search_court_precedents_tool() -> Tool {
    Tool {
        name: SEARCH_COURT_PRECEDENTS.to_string(),
        description: Some(
            "Search Korean court precedents and judicial decisions (대법원 판례 검색)".to_string(),
        ),
        input_schema: object(
            json!({
                "keyword": string_length(
                    "Search keyword or legal term (검색 키워드 또는 법률 용어)",
                    1,
                    300
                ),
                "court_type": string_enum(
                    "Court type: supreme (대법원), high (고등법원), district (지방법원), patent (특허법원), family (가정법원)",
                    &COURT_TYPES,
                    Some("all")
                ),
                "case_type": string_enum(
                    "Case type: civil (민사), criminal (형사), administrative (행정), tax (세무), labor (노동), commercial (상사)",
                    &CASE_TYPES,
                    Some("all")
                ),
                "date_from": date("Judgment date start (판결일 시작)"),
                "date_to": date("Judgment date end (판결일 종료)"),
                "page": integer("Page number (페이지 번호)", 1, None, Some(1)),
                "page_size": integer("Results per page (페이지당 결과 수)", 1, Some(50), Some(10))
            }),
            &["keyword"],
        ),
    }
}

/// Register the court precedent tools
#[inline]
pub async fn register_legal_tools(server: &McpServer, provider: Arc<dyn DataProvider>) -> Result<()> {
    server
        .register_tool(
            search_court_precedents_tool(),
            ProviderTool::<SearchCourtPrecedentsArgs>::new(
                SEARCH_COURT_PRECEDENTS,
                Capability::Legal,
                provider,
            ),
        )
        .await
}
