use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 查询意图类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryIntent {
    #[serde(rename = "search")]
    #[default]
    Search,
    #[serde(rename = "analyze")]
    Analyze,
    #[serde(rename = "compare")]
    Compare,
    #[serde(rename = "follow_up")]
    FollowUp,
}

impl std::fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryIntent::Search => write!(f, "search"),
            QueryIntent::Analyze => write!(f, "analyze"),
            QueryIntent::Compare => write!(f, "compare"),
            QueryIntent::FollowUp => write!(f, "follow_up"),
        }
    }
}

/// 查询复杂度级别，按查询长度与结构估算
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryComplexity {
    #[serde(rename = "simple")]
    Simple,
    #[serde(rename = "medium")]
    #[default]
    Medium,
    #[serde(rename = "complex")]
    Complex,
}

impl std::fmt::Display for QueryComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryComplexity::Simple => write!(f, "simple"),
            QueryComplexity::Medium => write!(f, "medium"),
            QueryComplexity::Complex => write!(f, "complex"),
        }
    }
}

/// 查询分析结果
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QueryAnalysis {
    pub intent: QueryIntent,
    pub complexity: QueryComplexity,
    pub keywords: Vec<String>,
    /// 是否需要对比多个研究方向
    pub needs_comparison: bool,
}

/// 对话历史中的一轮交互
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConversationTurn {
    pub query: String,
    /// 该轮研究结论的摘要（截断保存）
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(query: String, summary: String) -> Self {
        Self {
            query,
            summary,
            timestamp: Utc::now(),
        }
    }
}
