//! 多源检索聚合器
//!
//! 对所有已配置的来源客户端做fan-out检索，合并结果后统一评分、排序、
//! 按标题相似度去重并截断到结果预算。

use futures::future::join_all;

use crate::config::SearchConfig;
use crate::search::ranking::score_papers;
use crate::search::sources::{SearchSource, SourceError, build_http_client, configured_sources};
use crate::search::text::{clean_query, title_similarity};
use crate::types::paper::PaperRecord;

/// 聚合器
pub struct Aggregator {
    sources: Vec<Box<dyn SearchSource>>,
    dedup_threshold: f64,
}

impl Aggregator {
    /// 按配置构建聚合器及其来源客户端
    pub fn from_config(config: &SearchConfig) -> Result<Self, SourceError> {
        let http = build_http_client(config)?;
        Ok(Self {
            sources: configured_sources(config, &http),
            dedup_threshold: config.dedup_threshold,
        })
    }

    /// 使用给定的来源客户端构建聚合器
    pub fn with_sources(sources: Vec<Box<dyn SearchSource>>, dedup_threshold: f64) -> Self {
        Self {
            sources,
            dedup_threshold,
        }
    }

    /// 聚合检索
    ///
    /// 返回`(截断后的论文, 去重后的总数)`。单个来源失败只记录日志并按
    /// 空结果处理，所有来源都失败时返回空列表而不报错。同分记录保持
    /// 来源注册顺序，结果完全确定。
    pub async fn aggregate(
        &self,
        query: &str,
        per_source_limit: usize,
        total_limit: usize,
    ) -> (Vec<PaperRecord>, usize) {
        let cleaned_query = clean_query(query);

        let searches = self.sources.iter().map(|source| {
            let cleaned = cleaned_query.clone();
            async move {
                match source.search(&cleaned, per_source_limit).await {
                    Ok(papers) => {
                        println!("   🔍 {} 返回 {} 条结果", source.name(), papers.len());
                        papers
                    }
                    Err(e) => {
                        eprintln!("⚠️ 来源 {} 检索失败: {}", source.name(), e);
                        Vec::new()
                    }
                }
            }
        });

        // 各来源并发执行；结果按来源注册顺序拼接，保证tie-break确定性
        let mut papers: Vec<PaperRecord> = join_all(searches).await.into_iter().flatten().collect();

        // 先评分再排序，去重时保留高分记录
        score_papers(&mut papers, query);
        papers.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let unique = self.deduplicate(papers);
        let total = unique.len();
        let top: Vec<PaperRecord> = unique.into_iter().take(total_limit).collect();
        (top, total)
    }

    /// 按归一化标题相似度去重
    ///
    /// 输入已按评分降序排列，每个近重复簇只保留最先出现（评分最高）的
    /// 记录。
    fn deduplicate(&self, papers: Vec<PaperRecord>) -> Vec<PaperRecord> {
        let mut unique: Vec<PaperRecord> = Vec::new();

        for paper in papers {
            if paper.title.trim().is_empty() {
                continue;
            }
            let is_duplicate = unique
                .iter()
                .any(|kept| title_similarity(&kept.title, &paper.title) > self.dedup_threshold);
            if !is_duplicate {
                unique.push(paper);
            }
        }

        unique
    }
}

// Include tests
#[cfg(test)]
mod tests;
