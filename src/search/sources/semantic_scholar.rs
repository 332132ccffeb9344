//! Semantic Scholar Graph API客户端

use async_trait::async_trait;
use serde::Deserialize;

use super::{SearchSource, SourceError};
use crate::types::paper::{PaperRecord, SourceKind};

const SEMANTIC_SCHOLAR_API: &str = "https://api.semanticscholar.org/graph/v1/paper/search";

/// 摘要截断长度，和其他来源保持接近的上下文体量
const ABSTRACT_TRUNCATE_LEN: usize = 500;

/// Semantic Scholar检索客户端
///
/// API KEY可选，仅影响配额。
pub struct SemanticScholarSource {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl SemanticScholarSource {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub data: Option<Vec<ScholarPaper>>,
}

#[derive(Debug, Deserialize)]
pub struct ScholarPaper {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub year: Option<i32>,
    pub url: Option<String>,
    pub venue: Option<String>,
    pub authors: Option<Vec<ScholarAuthor>>,
}

#[derive(Debug, Deserialize)]
pub struct ScholarAuthor {
    pub name: Option<String>,
}

/// 把Graph API响应归一化为论文记录
pub fn convert_response(response: SearchResponse) -> Vec<PaperRecord> {
    let mut papers = Vec::new();

    for item in response.data.unwrap_or_default() {
        let title = item.title.unwrap_or_default();
        if title.trim().is_empty() {
            continue;
        }

        let mut paper =
            PaperRecord::new(SourceKind::SemanticScholar, title, item.url.unwrap_or_default());
        paper.abstract_text = item
            .abstract_text
            .map(|a| truncate_abstract(&a))
            .unwrap_or_default();
        paper.authors = item
            .authors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| a.name)
            .collect();
        paper.published = item.year.map(|y| y.to_string()).unwrap_or_default();
        if let Some(venue) = item.venue
            && !venue.is_empty()
        {
            paper.categories.push(venue);
        }
        papers.push(paper);
    }

    papers
}

fn truncate_abstract(text: &str) -> String {
    if text.chars().count() > ABSTRACT_TRUNCATE_LEN {
        let truncated: String = text.chars().take(ABSTRACT_TRUNCATE_LEN).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

#[async_trait]
impl SearchSource for SemanticScholarSource {
    fn name(&self) -> &'static str {
        "semantic_scholar"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        let mut request = self
            .http
            .get(SEMANTIC_SCHOLAR_API)
            .query(&[
                ("query", query),
                ("limit", &limit.to_string()),
                ("fields", "title,abstract,authors,year,url,venue,citationCount"),
            ]);

        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "semantic scholar search failed: HTTP {}",
                response.status().as_u16()
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(convert_response(parsed))
    }
}
