//! CrossRef works API客户端

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use super::{SearchSource, SourceError};
use crate::types::paper::{PaperRecord, SourceKind};

const CROSSREF_API: &str = "https://api.crossref.org/works";

/// CrossRef摘要里混杂的JATS XML标签
static JATS_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid regex"));

/// CrossRef检索客户端，无需API KEY
pub struct CrossRefSource {
    http: reqwest::Client,
}

impl CrossRefSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[derive(Debug, Deserialize)]
pub struct WorksResponse {
    pub message: Option<WorksMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WorksMessage {
    pub items: Option<Vec<WorkItem>>,
}

#[derive(Debug, Deserialize)]
pub struct WorkItem {
    pub title: Option<Vec<String>>,
    pub author: Option<Vec<WorkAuthor>>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(rename = "published-print")]
    pub published_print: Option<WorkDate>,
    #[serde(rename = "URL")]
    pub url: Option<String>,
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WorkAuthor {
    pub given: Option<String>,
    pub family: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WorkDate {
    #[serde(rename = "date-parts")]
    pub date_parts: Option<Vec<Vec<i32>>>,
}

/// 把works响应归一化为论文记录
pub fn convert_response(response: WorksResponse) -> Vec<PaperRecord> {
    let items = response
        .message
        .and_then(|m| m.items)
        .unwrap_or_default();

    let mut papers = Vec::new();
    for item in items {
        let title = item
            .title
            .unwrap_or_default()
            .join(" ")
            .trim()
            .to_string();
        if title.is_empty() {
            continue;
        }

        let url = item
            .url
            .or_else(|| item.doi.map(|doi| format!("https://doi.org/{}", doi)))
            .unwrap_or_default();

        let mut paper = PaperRecord::new(SourceKind::CrossRef, title, url);
        paper.abstract_text = item
            .abstract_text
            .map(|a| strip_jats_tags(&a))
            .unwrap_or_default();
        paper.authors = item
            .author
            .unwrap_or_default()
            .into_iter()
            .map(|a| {
                format!(
                    "{} {}",
                    a.given.unwrap_or_default(),
                    a.family.unwrap_or_default()
                )
                .trim()
                .to_string()
            })
            .filter(|name| !name.is_empty())
            .collect();
        paper.published = item
            .published_print
            .and_then(|d| d.date_parts)
            .and_then(|parts| parts.into_iter().next())
            .and_then(|parts| parts.into_iter().next())
            .map(|year| year.to_string())
            .unwrap_or_default();
        papers.push(paper);
    }

    papers
}

/// 去掉JATS标签并压缩空白
pub fn strip_jats_tags(text: &str) -> String {
    let stripped = JATS_TAG.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl SearchSource for CrossRefSource {
    fn name(&self) -> &'static str {
        "crossref"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        let response = self
            .http
            .get(CROSSREF_API)
            .query(&[
                ("query", query),
                ("rows", &limit.to_string()),
                ("select", "title,author,abstract,published-print,URL,DOI"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "crossref search failed: HTTP {}",
                response.status().as_u16()
            )));
        }

        let parsed: WorksResponse = response.json().await?;
        Ok(convert_response(parsed))
    }
}
