//! Tax data tools (세무 데이터 도구)
//!
//! VAT filings, electronic tax invoices and income tax summaries from HomeTax
//! (홈택스).

use crate::mcp::McpServer;
use crate::mcp::protocol::Tool;
use crate::mcp::tools::{ProviderTool, WholeNumber};
use crate::mcp::tools::schema::{business_number, date, integer, object, string_enum};
use crate::provider::{Capability, DataProvider};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const GET_VAT_DATA: &str = "get_vat_data";
pub const GET_TAX_INVOICE: &str = "get_tax_invoice";
pub const GET_INCOME_TAX_SUMMARY: &str = "get_income_tax_summary";

pub const MIN_TAX_YEAR: i64 = 2000;
pub const MAX_TAX_YEAR: i64 = 2030;

pub const INVOICE_DIRECTIONS: [&str; 3] = ["sales", "purchases", "both"];
pub const INCOME_TAX_TYPES: [&str; 4] = ["comprehensive", "global", "retirement", "capital_gains"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVatDataArgs {
    pub business_number: String,
    pub year: WholeNumber,
    pub quarter: WholeNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTaxInvoiceArgs {
    pub business_number: String,
    pub date_from: String,
    pub date_to: String,
    pub direction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetIncomeTaxSummaryArgs {
    pub business_number: String,
    pub tax_year: WholeNumber,
    pub tax_type: String,
}

/// 부가가치세 신고/납부 데이터 조회
#[inline]
pub fn get_vat_data_tool() -> Tool {
    Tool {
        name: GET_VAT_DATA.to_string(),
        description: Some(
            "Retrieve VAT (Value-Added Tax) data for a Korean business entity (부가가치세 신고/납부 데이터 조회)"
                .to_string(),
        ),
        input_schema: object(
            json!({
                "business_number": business_number(
                    "Business registration number (사업자등록번호, format: 000-00-00000)"
                ),
                "year": integer("Tax year (과세연도)", MIN_TAX_YEAR, Some(MAX_TAX_YEAR), None),
                "quarter": integer("Quarter of the year, 1-4 (분기)", 1, Some(4), None)
            }),
            &["business_number", "year", "quarter"],
        ),
    }
}

/// 전자세금계산서 조회
#[inline]
pub fn get_tax_invoice_tool() -> Tool {
    Tool {
        name: GET_TAX_INVOICE.to_string(),
        description: Some(
            "Look up electronic tax invoices for a Korean business (전자세금계산서 조회)".to_string(),
        ),
        input_schema: object(
            json!({
                "business_number": business_number("Business registration number (사업자등록번호)"),
                "date_from": date("Start date for the search range (조회 시작일)"),
                "date_to": date("End date for the search range (조회 종료일)"),
                "direction": string_enum(
                    "Invoice direction: 'sales' (매출), 'purchases' (매입), or 'both' (전체)",
                    &INVOICE_DIRECTIONS,
                    Some("both")
                )
            }),
            &["business_number", "date_from", "date_to"],
        ),
    }
}

/// 소득세 신고 요약 조회
#[inline]
pub fn get_income_tax_summary_tool() -> Tool {
    Tool {
        name: GET_INCOME_TAX_SUMMARY.to_string(),
        description: Some(
            "Retrieve income tax summary for a Korean taxpayer (소득세 신고 요약 조회)".to_string(),
        ),
        input_schema: object(
            json!({
                "business_number": business_number("Business registration number (사업자등록번호)"),
                "tax_year": integer("Tax year to query (과세연도)", MIN_TAX_YEAR, Some(MAX_TAX_YEAR), None),
                "tax_type": string_enum(
                    "Type of income tax: comprehensive (종합소득세), global (양도소득세), retirement (퇴직소득세), capital_gains (금융투자소득세)",
                    &INCOME_TAX_TYPES,
                    Some("comprehensive")
                )
            }),
            &["business_number", "tax_year"],
        ),
    }
}

/// Register the HomeTax tools
#[inline]
pub async fn register_tax_tools(server: &McpServer, provider: Arc<dyn DataProvider>) -> Result<()> {
    server
        .register_tool(
            get_vat_data_tool(),
            ProviderTool::<GetVatDataArgs>::new(GET_VAT_DATA, Capability::Tax, Arc::clone(&provider)),
        )
        .await?;

    server
        .register_tool(
            get_tax_invoice_tool(),
            ProviderTool::<GetTaxInvoiceArgs>::new(
                GET_TAX_INVOICE,
                Capability::Tax,
                Arc::clone(&provider),
            ),
        )
        .await?;

    server
        .register_tool(
            get_income_tax_summary_tool(),
            ProviderTool::<GetIncomeTaxSummaryArgs>::new(
                GET_INCOME_TAX_SUMMARY,
                Capability::Tax,
                provider,
            ),
        )
        .await
}
