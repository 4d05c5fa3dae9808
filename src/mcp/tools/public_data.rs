//! Public data tools (공공 데이터 도구)
//!
//! Government notices from the Public Data Portal (공공데이터포털) and bidding
//! data from KONEPS (조달청 나라장터).

use crate::mcp::McpServer;
use crate::mcp::protocol::Tool;
use crate::mcp::tools::{ProviderTool, WholeNumber};
use crate::mcp::tools::schema::{date, integer, object, string_enum, string_length};
use crate::provider::{Capability, DataProvider};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const SEARCH_PUBLIC_NOTICES: &str = "search_public_notices";
pub const GET_PROCUREMENT_DATA: &str = "get_procurement_data";

pub const MAX_KEYWORD_LENGTH: u32 = 200;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

pub const NOTICE_CATEGORIES: [&str; 8] = [
    "all",
    "policy",
    "budget",
    "regulation",
    "environment",
    "construction",
    "welfare",
    "education",
];
pub const BID_TYPES: [&str; 5] = ["all", "open", "restricted", "negotiated", "emergency"];
pub const BID_STATUSES: [&str; 5] = ["all", "announced", "in_progress", "closed", "awarded"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPublicNoticesArgs {
    pub keyword: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    pub page: WholeNumber,
    pub page_size: WholeNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProcurementDataArgs {
    pub keyword: String,
    pub bid_type: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    pub page: WholeNumber,
    pub page_size: WholeNumber,
}

/// 공공 고시/공고 검색
#[inline]
pub fn search_public_notices_tool() -> Tool {
    Tool {
        name: SEARCH_PUBLIC_NOTICES.to_string(),
        description: Some(
            "Search Korean government public notices and announcements (공공 고시/공고 검색)"
                .to_string(),
        ),
        input_schema: object(
            json!({
                "keyword": string_length("Search keyword (검색 키워드)", 1, MAX_KEYWORD_LENGTH),
                "category": string_enum(
                    "Notice category (공고 분류): policy (정책), budget (예산), regulation (규제), etc.",
                    &NOTICE_CATEGORIES,
                    Some("all")
                ),
                "date_from": date("Start date filter (검색 시작일)"),
                "date_to": date("End date filter (검색 종료일)"),
                "page": integer("Page number for pagination (페이지 번호)", 1, None, Some(1)),
                "page_size": integer(
                    "Number of results per page (페이지당 결과 수)",
                    1,
                    Some(MAX_PAGE_SIZE),
                    Some(DEFAULT_PAGE_SIZE)
                )
            }),
            &["keyword"],
        ),
    }
}

/// 조달청 나라장터 입찰/계약 데이터 조회
#[inline]
pub fn get_procurement_data_tool() -> Tool {
    Tool {
        name: GET_PROCUREMENT_DATA.to_string(),
        description: Some(
            "Retrieve procurement and bidding data from KONEPS (조달청 나라장터 입찰/계약 데이터 조회)"
                .to_string(),
        ),
        input_schema: object(
            json!({
                "keyword": string_length(
                    "Search keyword for procurement items (검색 키워드)",
                    1,
                    MAX_KEYWORD_LENGTH
                ),
                "bid_type": string_enum(
                    "Bid type: open (일반경쟁), restricted (제한경쟁), negotiated (수의계약), emergency (긴급)",
                    &BID_TYPES,
                    Some("all")
                ),
                "status": string_enum(
                    "Bid status: announced (공고), in_progress (진행중), closed (마감), awarded (낙찰)",
                    &BID_STATUSES,
                    Some("all")
                ),
                "date_from": date("Start date filter (검색 시작일)"),
                "date_to": date("End date filter (검색 종료일)"),
                "page": integer("Page number (페이지 번호)", 1, None, Some(1)),
                "page_size": integer(
                    "Results per page (페이지당 결과 수)",
                    1,
                    Some(MAX_PAGE_SIZE),
                    Some(DEFAULT_PAGE_SIZE)
                )
            }),
            &["keyword"],
        ),
    }
}

/// Register the public notice and procurement tools
#[inline]
pub async fn register_public_data_tools(
    server: &McpServer,
    provider: Arc<dyn DataProvider>,
) -> Result<()> {
    server
        .register_tool(
            search_public_notices_tool(),
            ProviderTool::<SearchPublicNoticesArgs>::new(
                SEARCH_PUBLIC_NOTICES,
                Capability::PublicData,
                Arc::clone(&provider),
            ),
        )
        .await?;

    server
        .register_tool(
            get_procurement_data_tool(),
            ProviderTool::<GetProcurementDataArgs>::new(
                GET_PROCUREMENT_DATA,
                Capability::PublicData,
                provider,
            ),
        )
        .await
}
