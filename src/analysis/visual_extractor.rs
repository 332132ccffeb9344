//! 论文PDF可视化内容提取
//!
//! 下载论文PDF，用`pdf-extract`取出全文文本，再用行级启发式找出
//! 表格状区块与图注。PDF解析本身完全委托给外部库。

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::LazyLock;

use crate::types::paper::{VisualData, VisualKind};

/// 判断表格行用的数字模式
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid regex"));
/// 连续大空白（对齐列）模式
static WIDE_GAP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{3,}").expect("valid regex"));
/// 管道分隔值模式
static PIPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*\w+\s*\|").expect("valid regex"));

/// 图注行的提示词
const CAPTION_KEYWORDS: &[&str] = &["figure", "fig.", "fig ", "table", "chart", "graph"];

/// 有效表格的最小文本长度
const MIN_TABLE_LEN: usize = 50;

/// 可视化内容提取器
pub struct VisualExtractor {
    http: reqwest::Client,
    download_timeout_secs: u64,
}

impl VisualExtractor {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            download_timeout_secs: 30,
        }
    }

    /// 从论文PDF中提取表格与图注
    ///
    /// 返回最多`max_visuals`条记录，表格优先。下载或解析失败向上返回
    /// 错误，由调用方决定是否忽略。
    pub async fn extract_from_paper(
        &self,
        paper_url: &str,
        max_visuals: usize,
    ) -> Result<Vec<VisualData>> {
        let pdf_url = to_pdf_url(paper_url);

        let response = self
            .http
            .get(&pdf_url)
            .timeout(std::time::Duration::from_secs(self.download_timeout_secs))
            .send()
            .await
            .context(format!("Failed to download PDF from {}", pdf_url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to download PDF from {}: HTTP {}",
                pdf_url,
                response.status().as_u16()
            );
        }

        let bytes = response.bytes().await?;
        let text = pdf_extract::extract_text_from_mem(&bytes)
            .context(format!("Failed to parse PDF from {}", pdf_url))?;

        Ok(extract_visuals_from_text(&text, max_visuals))
    }
}

/// 把论文页面URL转换为PDF下载URL
pub fn to_pdf_url(paper_url: &str) -> String {
    if paper_url.contains("arxiv.org") && paper_url.contains("/abs/") {
        return format!("{}.pdf", paper_url.replace("/abs/", "/pdf/"));
    }
    paper_url.to_string()
}

/// 从PDF全文文本中提取表格与图注
pub fn extract_visuals_from_text(text: &str, max_visuals: usize) -> Vec<VisualData> {
    let mut visuals = Vec::new();

    for (i, table_text) in find_table_candidates(text).into_iter().enumerate() {
        if visuals.len() >= max_visuals {
            return visuals;
        }
        visuals.push(VisualData {
            kind: VisualKind::Table,
            description: format!("Table candidate {}", i + 1),
            text_content: table_text,
        });
    }

    for caption in find_caption_lines(text) {
        if visuals.len() >= max_visuals {
            break;
        }
        visuals.push(VisualData {
            kind: VisualKind::FigureCaption,
            description: "Figure or table caption".to_string(),
            text_content: caption,
        });
    }

    visuals
}

/// 行级启发式判断是否是表格内容行
fn is_table_line(line: &str) -> bool {
    NUMBER_PATTERN.find_iter(line).count() > 2
        || line.matches('\t').count() > 1
        || WIDE_GAP_PATTERN.find_iter(line).count() > 1
        || PIPE_PATTERN.is_match(line)
}

/// 在文本中寻找候选表格区块
///
/// 连续的表格状行（多个数字、制表符、对齐空白或管道分隔）组成一个
/// 候选，至少3行且文本量达到下限才保留。
pub fn find_table_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut current_table: Vec<&str> = Vec::new();

    let mut flush = |current_table: &mut Vec<&str>| {
        if current_table.len() > 2 {
            let table_text = current_table.join("\n");
            if table_text.trim().len() > MIN_TABLE_LEN {
                candidates.push(table_text);
            }
        }
        current_table.clear();
    };

    for raw_line in text.lines() {
        let line = raw_line.trim_end();
        if line.trim().is_empty() {
            flush(&mut current_table);
            continue;
        }

        if is_table_line(line) {
            current_table.push(line);
        } else {
            flush(&mut current_table);
        }
    }
    flush(&mut current_table);

    candidates
}

/// 找出疑似图注/表注的行
pub fn find_caption_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| {
            let lower = line.to_lowercase();
            !line.is_empty()
                && line.len() < 300
                && CAPTION_KEYWORDS
                    .iter()
                    .any(|keyword| lower.starts_with(keyword))
        })
        .map(|line| line.to_string())
        .collect()
}
