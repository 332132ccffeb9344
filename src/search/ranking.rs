//! 基于TF-IDF余弦相似度的相关性评分

use std::collections::{HashMap, HashSet};

use crate::search::text::content_tokens;
use crate::types::paper::PaperRecord;

/// 计算每篇论文与查询的相关性评分并写回`relevance_score`
///
/// 文档为`标题 + 摘要`，查询作为额外文档参与IDF统计，评分为查询向量与
/// 文档向量的余弦相似度。语料退化（查询与文档无公共词汇）时回退到
/// 关键词重合率。
pub fn score_papers(papers: &mut [PaperRecord], query: &str) {
    if papers.is_empty() {
        return;
    }

    let doc_tokens: Vec<Vec<String>> = papers
        .iter()
        .map(|p| content_tokens(&format!("{} {}", p.title, p.abstract_text)))
        .collect();
    let query_tokens = content_tokens(query);

    if query_tokens.is_empty() {
        fallback_keyword_overlap(papers, query);
        return;
    }

    // 文档频率统计，查询本身也计入语料
    let corpus_size = doc_tokens.len() + 1;
    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for tokens in doc_tokens.iter().chain(std::iter::once(&query_tokens)) {
        let unique: HashSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
        for term in unique {
            *document_frequency.entry(term).or_insert(0) += 1;
        }
    }

    let idf = |term: &str| -> f64 {
        let df = document_frequency.get(term).copied().unwrap_or(0);
        (((corpus_size + 1) as f64) / ((df + 1) as f64)).ln() + 1.0
    };

    let query_vector = tfidf_vector(&query_tokens, &idf);
    let mut any_nonzero = false;

    for (paper, tokens) in papers.iter_mut().zip(doc_tokens.iter()) {
        let doc_vector = tfidf_vector(tokens, &idf);
        let score = cosine_similarity(&query_vector, &doc_vector);
        if score > 0.0 {
            any_nonzero = true;
        }
        paper.relevance_score = score;
    }

    if !any_nonzero {
        fallback_keyword_overlap(papers, query);
    }
}

/// 稀疏TF-IDF向量，TF使用次线性缩放
fn tfidf_vector(tokens: &[String], idf: impl Fn(&str) -> f64) -> HashMap<String, f64> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(term, count)| {
            let tf = 1.0 + (count as f64).ln();
            (term.to_string(), tf * idf(term))
        })
        .collect()
}

fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let norm_a: f64 = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(term, weight)| b.get(term).map(|other| weight * other))
        .sum();
    dot / (norm_a * norm_b)
}

/// 简单关键词重合率兜底评分
fn fallback_keyword_overlap(papers: &mut [PaperRecord], query: &str) {
    let query_keywords: HashSet<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();
    if query_keywords.is_empty() {
        return;
    }

    for paper in papers.iter_mut() {
        let text = format!("{} {}", paper.title, paper.abstract_text).to_lowercase();
        let matches = query_keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .count();
        paper.relevance_score = matches as f64 / query_keywords.len() as f64;
    }
}
