//! 学术检索来源客户端
//!
//! 每个客户端把文本查询翻译成对应API的请求格式，并把响应归一化为
//! `PaperRecord`。单个来源的失败（网络、配额、响应格式）不会中断整体
//! 检索，由聚合器捕获并记录后按空结果处理。

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SearchConfig;
use crate::types::paper::PaperRecord;

pub mod arxiv;
pub mod crossref;
pub mod semantic_scholar;
pub mod serper;

pub use arxiv::ArxivSource;
pub use crossref::CrossRefSource;
pub use semantic_scholar::SemanticScholarSource;
pub use serper::SerperSource;

/// 检索请求统一使用的User-Agent
pub const USER_AGENT: &str = "deepscholar-rs/0.3 (academic research agent)";

/// 来源客户端错误
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("API error: {0}")]
    Api(String),
}

/// 检索来源客户端统一接口
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// 来源名称，用于日志与去重tie-break
    fn name(&self) -> &'static str;

    /// 检索论文，最多返回`limit`条记录
    async fn search(&self, query: &str, limit: usize)
    -> Result<Vec<PaperRecord>, SourceError>;
}

/// 构建共享的HTTP客户端
pub fn build_http_client(config: &SearchConfig) -> Result<reqwest::Client, SourceError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .build()?;
    Ok(client)
}

/// 按配置实例化所有可用的来源客户端
///
/// 返回顺序固定（arxiv、serper、semantic_scholar、crossref），聚合排序的
/// tie-break依赖这一顺序。需要API KEY的可选来源在未配置时直接跳过。
pub fn configured_sources(
    config: &SearchConfig,
    http: &reqwest::Client,
) -> Vec<Box<dyn SearchSource>> {
    let mut sources: Vec<Box<dyn SearchSource>> = Vec::new();

    sources.push(Box::new(ArxivSource::new(
        http.clone(),
        config.rate_limit_delay_ms,
    )));

    if let Some(api_key) = &config.serper_api_key {
        sources.push(Box::new(SerperSource::new(http.clone(), api_key.clone())));
    }

    sources.push(Box::new(SemanticScholarSource::new(
        http.clone(),
        config.semantic_scholar_api_key.clone(),
    )));

    sources.push(Box::new(CrossRefSource::new(http.clone())));

    sources
}

// Include tests
#[cfg(test)]
mod tests;
