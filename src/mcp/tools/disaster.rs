//! Disaster and safety tools (재난 안전 도구)
//!
//! Alerts from the Ministry of the Interior and Safety (행정안전부).

use crate::mcp::McpServer;
use crate::mcp::protocol::Tool;
use crate::mcp::tools::ProviderTool;
use crate::mcp::tools::schema::{boolean, object, string_enum};
use crate::provider::{Capability, DataProvider};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const GET_DISASTER_ALERTS: &str = "get_disaster_alerts";

/// Metropolitan cities and provinces, plus `all`
pub const REGIONS: [&str; 18] = [
    "all",
    "seoul",
    "busan",
    "daegu",
    "incheon",
    "gwangju",
    "daejeon",
    "ulsan",
    "sejong",
    "gyeonggi",
    "gangwon",
    "chungbuk",
    "chungnam",
    "jeonbuk",
    "jeonnam",
    "gyeongbuk",
    "gyeongnam",
    "jeju",
];

pub const ALERT_TYPES: [&str; 11] = [
    "all",
    "earthquake",
    "typhoon",
    "flood",
    "heavy_rain",
    "heavy_snow",
    "heat_wave",
    "cold_wave",
    "fine_dust",
    "infectious_disease",
    "industrial_accident",
];

pub const SEVERITIES: [&str; 6] = ["all", "emergency", "critical", "warning", "watch", "advisory"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDisasterAlertsArgs {
    pub region: String,
    pub alert_type: String,
    pub severity: String,
    #[serde(default)]
    pub include_expired: bool,
}

/// 행정안전부 재난 알림 조회
#[inline]
pub fn get_disaster_alerts_tool() -> Tool {
    Tool {
        name: GET_DISASTER_ALERTS.to_string(),
        description: Some(
            "Retrieve current disaster alerts and safety notifications in Korea (행정안전부 재난 알림 조회)"
                .to_string(),
        ),
        input_schema: object(
            json!({
                "region": string_enum(
                    "Region filter (지역 필터): Korean metropolitan cities and provinces",
                    &REGIONS,
                    Some("all")
                ),
                "alert_type": string_enum(
                    "Alert type (재난 유형): earthquake (지진), typhoon (태풍), flood (홍수), etc.",
                    &ALERT_TYPES,
                    Some("all")
                ),
                "severity": string_enum(
                    "Severity level (심각도): emergency (긴급), critical (위험), warning (경보), watch (주의보), advisory (예비)",
                    &SEVERITIES,
                    Some("all")
                ),
                "include_expired": boolean(
                    "Include expired/resolved alerts (해제된 알림 포함 여부)",
                    false
                )
            }),
            &[],
        ),
    }
}

/// Register the disaster alert tools
#[inline]
pub async fn register_disaster_tools(
    server: &McpServer,
    provider: Arc<dyn DataProvider>,
) -> Result<()> {
    server
        .register_tool(
            get_disaster_alerts_tool(),
            ProviderTool::<GetDisasterAlertsArgs>::new(
                GET_DISASTER_ALERTS,
                Capability::Disaster,
                provider,
            ),
        )
        .await
}
