//! 查询意图分析
//!
//! 用轻量的关键词与长度启发式判断查询意图和复杂度，并识别追问类查询、
//! 从对话历史补充上下文。分析结果决定编排器实际执行哪些环节。

use crate::types::query::{ConversationTurn, QueryAnalysis, QueryComplexity, QueryIntent};

/// 检索类意图关键词
const SEARCH_KEYWORDS: &[&str] = &[
    "find", "search", "papers", "research", "literature", "look", "seek", "locate", "discover",
    "explore", "investigate", "study", "review", "survey", "publications", "articles", "documents",
];

/// 分析类意图关键词
const ANALYZE_KEYWORDS: &[&str] = &[
    "analyze", "explain", "understand", "insights", "examine", "evaluate", "assess", "interpret",
    "breakdown", "dissect", "clarify", "describe", "elaborate", "detail",
];

/// 对比类意图关键词
const COMPARE_KEYWORDS: &[&str] = &[
    "compare", "difference", "versus", "vs", "contrast", "distinguish", "differentiate",
    "between", "relative", "similarities", "differences", "comparison", "relate", "correlation",
    "against",
];

/// 追问类查询的提示词
const FOLLOWUP_INDICATORS: &[&str] = &[
    // 直接引用
    "tell me more",
    "give me more",
    "explain further",
    "more details",
    "elaborate",
    "what about",
    "how about",
    // 指代词
    "this",
    "that",
    "these",
    "those",
    " it ",
    "they",
    "them",
    "above",
    "previous",
    "mentioned",
    "discussed",
    "earlier",
    // 承接词
    "additionally",
    "furthermore",
    "besides",
    "in addition",
    "however",
    "still",
    "yet",
    "then",
    "next",
];

const QUESTION_STARTERS: &[&str] = &[
    "what", "how", "why", "which", "when", "where", "is", "are", "can", "could", "would",
];

/// 查询分析器
#[derive(Default)]
pub struct QueryAnalyzer;

impl QueryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 分析查询的意图与复杂度
    ///
    /// 追问意图依赖对话历史判定，首轮查询不会被判为追问。
    pub fn analyze(&self, query: &str, history: &[ConversationTurn]) -> QueryAnalysis {
        let query_lower = query.to_lowercase();

        let needs_comparison = COMPARE_KEYWORDS
            .iter()
            .any(|word| query_lower.contains(word));

        // 意图判定优先级：follow-up > analyze > compare > search
        let intent = if self.is_followup(query, history) {
            QueryIntent::FollowUp
        } else if ANALYZE_KEYWORDS.iter().any(|word| query_lower.contains(word)) {
            QueryIntent::Analyze
        } else if needs_comparison {
            QueryIntent::Compare
        } else {
            QueryIntent::Search
        };

        // 按查询长度估算复杂度
        let word_count = query.split_whitespace().count();
        let complexity = if word_count < 5 {
            QueryComplexity::Simple
        } else if word_count > 15 {
            QueryComplexity::Complex
        } else {
            QueryComplexity::Medium
        };

        let keywords = query.split_whitespace().map(|w| w.to_string()).collect();

        QueryAnalysis {
            intent,
            complexity,
            keywords,
            needs_comparison,
        }
    }

    /// 判断当前查询是否是对先前对话的追问
    pub fn is_followup(&self, query: &str, history: &[ConversationTurn]) -> bool {
        if history.is_empty() {
            return false;
        }

        let query_lower = format!(" {} ", query.to_lowercase().trim());
        let matches = FOLLOWUP_INDICATORS
            .iter()
            .filter(|indicator| query_lower.contains(*indicator))
            .count();

        let word_count = query.split_whitespace().count();
        let is_short_query = word_count < 3;

        let starts_with_question = QUESTION_STARTERS
            .iter()
            .any(|starter| query_lower.trim_start().starts_with(starter));

        matches >= 1 || is_short_query || (starts_with_question && word_count < 5)
    }

    /// 为追问类查询补充最近的对话上下文
    pub fn contextualize(&self, query: &str, history: &[ConversationTurn]) -> String {
        if !self.is_followup(query, history) {
            return query.to_string();
        }

        let recent_queries: Vec<String> = history
            .iter()
            .rev()
            .take(2)
            .rev()
            .map(|turn| turn.query.to_lowercase())
            .collect();

        if recent_queries.is_empty() {
            return query.to_string();
        }

        format!(
            "Context: {} \nCurrent question: {}",
            recent_queries.join(" "),
            query
        )
    }
}
