//! ArXiv Atom API客户端

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;

use super::{SearchSource, SourceError};
use crate::types::paper::{PaperRecord, SourceKind};

const ARXIV_API_BASE: &str = "http://export.arxiv.org/api/query";

/// ArXiv检索客户端
///
/// 对同一查询并行使用多种检索策略（全文、标题、摘要、CS分类限定），
/// 合并各策略的返回结果。策略之间保持限速间隔。
pub struct ArxivSource {
    http: reqwest::Client,
    rate_limit_delay_ms: u64,
}

impl ArxivSource {
    pub fn new(http: reqwest::Client, rate_limit_delay_ms: u64) -> Self {
        Self {
            http,
            rate_limit_delay_ms,
        }
    }

    /// 单个查询展开出的检索策略
    fn strategies(query: &str) -> Vec<String> {
        let clean_query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        vec![
            format!("all:\"{}\"", clean_query),
            format!("ti:({})", clean_query),
            format!("abs:({})", clean_query),
            format!("cat:cs.* AND all:{}", query),
            format!("all:{} AND cat:cs.LG", query),
            format!("all:{} AND cat:cs.CV", query),
        ]
    }

    async fn fetch_strategy(
        &self,
        strategy: &str,
        limit: usize,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        let mut url =
            reqwest::Url::parse(ARXIV_API_BASE).map_err(|e| SourceError::Parse(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("search_query", strategy)
            .append_pair("start", "0")
            .append_pair("max_results", &limit.to_string())
            .append_pair("sortBy", "relevance")
            .append_pair("sortOrder", "descending");

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "arxiv search failed: HTTP {}",
                response.status().as_u16()
            )));
        }

        let body = response.text().await?;
        parse_atom_feed(&body)
    }
}

#[async_trait]
impl SearchSource for ArxivSource {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        let strategies = Self::strategies(query);
        let strategy_limit = std::cmp::max(1, limit / strategies.len());

        let mut papers = Vec::new();
        for strategy in &strategies {
            match self.fetch_strategy(strategy, strategy_limit).await {
                Ok(found) => papers.extend(found),
                Err(e) => {
                    // 单个策略失败不影响其余策略
                    eprintln!("⚠️ ArXiv策略 '{}' 检索失败: {}", strategy, e);
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(self.rate_limit_delay_ms)).await;
        }

        Ok(papers)
    }
}

/// Atom条目解析累加器
#[derive(Default)]
struct EntryAccum {
    id: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    categories: Vec<String>,
}

impl EntryAccum {
    fn clear(&mut self) {
        self.id.clear();
        self.title.clear();
        self.summary.clear();
        self.published.clear();
        self.authors.clear();
        self.categories.clear();
    }

    fn push_text(&mut self, tag: &str, text: &str, in_author: bool) {
        match tag {
            "id" => self.id.push_str(text),
            "title" => self.title.push_str(text),
            "summary" => self.summary.push_str(text),
            "published" => self.published.push_str(text),
            "name" if in_author => self.authors.push(text.to_string()),
            _ => {}
        }
    }

    fn finish_entry(&mut self) -> Option<PaperRecord> {
        let title = normalize_whitespace(&self.title);
        let summary = normalize_whitespace(&self.summary);
        if title.is_empty() || summary.is_empty() {
            self.clear();
            return None;
        }

        let mut paper = PaperRecord::new(SourceKind::Arxiv, title, self.id.trim().to_string());
        paper.abstract_text = summary;
        paper.authors = std::mem::take(&mut self.authors);
        paper.categories = std::mem::take(&mut self.categories);
        paper.published = self.published.trim().to_string();
        self.clear();
        Some(paper)
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 解析ArXiv Atom响应
pub fn parse_atom_feed(xml: &str) -> Result<Vec<PaperRecord>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut papers = Vec::new();
    let mut accum = EntryAccum::default();
    let mut current_tag = String::new();
    let mut in_entry = false;
    let mut in_author = false;

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "entry" => {
                        in_entry = true;
                        accum.clear();
                    }
                    "author" => in_author = true,
                    _ => {}
                }
                current_tag = tag;
            }
            Ok(Event::Empty(e)) => {
                if in_entry && e.name().as_ref() == b"category" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"term" {
                            accum
                                .categories
                                .push(String::from_utf8_lossy(&attr.value).to_string());
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if in_entry {
                    let text = t
                        .unescape()
                        .map_err(|e| SourceError::Parse(e.to_string()))?
                        .to_string();
                    accum.push_text(&current_tag, &text, in_author);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"entry" => {
                    in_entry = false;
                    if let Some(paper) = accum.finish_entry() {
                        papers.push(paper);
                    }
                }
                b"author" => in_author = false,
                _ => current_tag.clear(),
            },
            Ok(_) => {}
            Err(e) => return Err(SourceError::Parse(e.to_string())),
        }
    }

    Ok(papers)
}
