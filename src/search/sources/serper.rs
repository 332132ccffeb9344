//! Serper.dev Google检索代理客户端

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{SearchSource, SourceError};
use crate::types::paper::{PaperRecord, SourceKind};

const SERPER_API: &str = "https://google.serper.dev/search";

/// Serper.dev检索客户端（Google Scholar类结果的第三方代理）
///
/// 必须配置API KEY，未配置时该来源整体跳过。
pub struct SerperSource {
    http: reqwest::Client,
    api_key: String,
}

impl SerperSource {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    /// 把查询限定到学术站点与PDF
    fn academic_query(query: &str) -> String {
        format!(
            "{} site:arxiv.org OR site:scholar.google.com OR site:researchgate.net OR site:ieee.org OR site:acm.org OR filetype:pdf",
            query
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct SerperResponse {
    pub organic: Option<Vec<SerperItem>>,
    pub scholar: Option<Vec<SerperScholarItem>>,
}

#[derive(Debug, Deserialize)]
pub struct SerperItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SerperScholarItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    #[serde(rename = "publicationInfo")]
    pub publication_info: Option<SerperPublicationInfo>,
}

#[derive(Debug, Deserialize)]
pub struct SerperPublicationInfo {
    pub summary: Option<String>,
}

/// 把Serper响应归一化为论文记录
pub fn convert_response(response: SerperResponse) -> Vec<PaperRecord> {
    let mut papers = Vec::new();

    for item in response.organic.unwrap_or_default() {
        let title = item.title.unwrap_or_default();
        if title.trim().is_empty() {
            continue;
        }
        let mut paper =
            PaperRecord::new(SourceKind::Serper, title, item.link.unwrap_or_default());
        paper.abstract_text = item.snippet.unwrap_or_default();
        paper.published = item.date.unwrap_or_default();
        papers.push(paper);
    }

    for item in response.scholar.unwrap_or_default() {
        let title = item.title.unwrap_or_default();
        if title.trim().is_empty() {
            continue;
        }
        let mut paper =
            PaperRecord::new(SourceKind::Serper, title, item.link.unwrap_or_default());
        paper.abstract_text = item.snippet.unwrap_or_default();
        paper.published = item
            .publication_info
            .and_then(|info| info.summary)
            .unwrap_or_default();
        papers.push(paper);
    }

    papers
}

#[async_trait]
impl SearchSource for SerperSource {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        let payload = json!({
            "q": Self::academic_query(query),
            "num": limit,
            "gl": "us",
            "hl": "en",
        });

        let response = self
            .http
            .post(SERPER_API)
            .header("X-API-KEY", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "serper search failed: HTTP {}",
                response.status().as_u16()
            )));
        }

        let parsed: SerperResponse = response.json().await?;
        Ok(convert_response(parsed))
    }
}
