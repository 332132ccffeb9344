use serde::{Deserialize, Serialize};

/// 检索来源类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    #[serde(rename = "arxiv")]
    Arxiv,
    #[serde(rename = "serper")]
    Serper,
    #[serde(rename = "semantic_scholar")]
    SemanticScholar,
    #[serde(rename = "crossref")]
    CrossRef,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Arxiv => "arxiv",
            SourceKind::Serper => "serper",
            SourceKind::SemanticScholar => "semantic_scholar",
            SourceKind::CrossRef => "crossref",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 从论文PDF中提取的可视化内容类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    #[serde(rename = "table")]
    Table,
    #[serde(rename = "figure_caption")]
    FigureCaption,
}

impl std::fmt::Display for VisualKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisualKind::Table => write!(f, "Table"),
            VisualKind::FigureCaption => write!(f, "Figure caption"),
        }
    }
}

/// 从论文PDF中提取的可视化内容（表格、图注）
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VisualData {
    pub kind: VisualKind,
    /// 简短说明，例如 "Table candidate 2"
    pub description: String,
    /// 提取出的文本内容
    pub text_content: String,
}

/// 跨来源统一的论文记录
///
/// 由各Source Client构造，经聚合器去重排序后供下游分析使用。
/// 构造完成后除相关性评分与可视化附件外不再修改。
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaperRecord {
    pub title: String,
    /// 作者，保持来源返回的顺序
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub url: String,
    pub published: String,
    /// 学科分类（ArXiv category等），其他来源为空
    pub categories: Vec<String>,
    /// 提供该记录的检索来源
    pub source: SourceKind,
    /// 与查询的相关性评分，由聚合器计算
    pub relevance_score: f64,
    /// 提取出的表格与图注
    pub visuals: Vec<VisualData>,
}

impl PaperRecord {
    pub fn new(source: SourceKind, title: String, url: String) -> Self {
        Self {
            title,
            authors: Vec::new(),
            abstract_text: String::new(),
            url,
            published: String::new(),
            categories: Vec::new(),
            source,
            relevance_score: 0.0,
            visuals: Vec::new(),
        }
    }
}
