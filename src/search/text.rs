//! 查询清洗、标题归一化与相似度计算

use std::collections::HashSet;

/// 常见英文停用词，查询清洗与TF-IDF分词共用
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "get", "give", "had", "has", "have", "having", "he", "her", "here",
    "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "me", "more",
    "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours",
];

/// 学术查询中需要保留的关键词，即使命中停用词过滤规则也不丢弃
const ACADEMIC_KEYWORDS: &[&str] = &[
    "research", "study", "analysis", "method", "approach", "technique", "algorithm", "model",
    "learning", "neural", "network", "deep", "machine", "artificial", "intelligence", "data",
    "science", "computer", "vision", "processing", "natural", "language", "quantum", "computing",
    "robotics", "optimization", "classification", "regression", "clustering", "supervised",
    "unsupervised", "reinforcement", "transformer", "attention", "convolution", "graph",
    "embedding", "feature", "detection", "recognition", "segmentation", "generation",
    "prediction", "evaluation", "performance", "accuracy", "precision", "recall", "framework",
    "architecture", "implementation", "application", "development", "latest", "recent", "new",
    "novel", "advanced", "state-of-the-art", "compared", "comparison", "survey", "review",
    "comprehensive",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

fn is_academic_keyword(word: &str) -> bool {
    ACADEMIC_KEYWORDS.contains(&word)
}

/// 小写、按非字母数字切分的分词
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1)
        .map(|w| w.to_string())
        .collect()
}

/// 去除停用词后的内容分词，供相关性评分使用
pub fn content_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// 清洗并优化学术检索查询
///
/// 去掉停用词但保留学术关键词；若清洗后剩余词数过少，返回原始查询。
pub fn clean_query(query: &str) -> String {
    let text = query.to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .collect();

    let filtered_words: Vec<&str> = words
        .into_iter()
        .filter(|word| word.len() > 2 && (!is_stop_word(word) || is_academic_keyword(word)))
        .collect();

    if filtered_words.len() < 2 {
        return query.to_string();
    }

    filtered_words.join(" ")
}

/// 标题归一化：小写、去标点、压缩空白
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else {
                ' '
            }
        })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 归一化标题间的相似度，取值[0.0, 1.0]
///
/// 基于字符二元组的Dice系数。完全相同的归一化标题返回1.0。
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let na = normalize_title(a);
    let nb = normalize_title(b);

    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }

    let bigrams_a = char_bigrams(&na);
    let bigrams_b = char_bigrams(&nb);
    if bigrams_a.is_empty() || bigrams_b.is_empty() {
        return 0.0;
    }

    let shared = bigrams_a.intersection(&bigrams_b).count();
    (2.0 * shared as f64) / (bigrams_a.len() + bigrams_b.len()) as f64
}

fn char_bigrams(text: &str) -> HashSet<(char, char)> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let tokens = tokenize("Deep Learning, for NLP!");
        assert_eq!(tokens, vec!["deep", "learning", "for", "nlp"]);
    }

    #[test]
    fn test_clean_query_drops_stop_words() {
        let cleaned = clean_query("what are the latest developments in transformer architectures");
        assert!(!cleaned.contains("what"));
        assert!(!cleaned.contains("the"));
        assert!(cleaned.contains("latest"));
        assert!(cleaned.contains("transformer"));
    }

    #[test]
    fn test_clean_query_preserves_academic_keywords() {
        // "new" is short and common, but it is on the academic keyword list
        let cleaned = clean_query("survey of new reinforcement learning methods");
        assert!(cleaned.contains("new"));
        assert!(cleaned.contains("survey"));
        assert!(cleaned.contains("reinforcement"));
    }

    #[test]
    fn test_clean_query_falls_back_on_short_queries() {
        assert_eq!(clean_query("the of"), "the of");
        assert_eq!(clean_query("transformers"), "transformers");
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(
            normalize_title("Attention Is All You Need!"),
            "attention is all you need"
        );
        assert_eq!(
            normalize_title("  BERT:   Pre-training of Deep  Bidirectional Transformers "),
            "bert pre training of deep bidirectional transformers"
        );
    }

    #[test]
    fn test_title_similarity_identical() {
        let sim = title_similarity("Attention Is All You Need", "attention is all you need.");
        assert_eq!(sim, 1.0);
    }

    #[test]
    fn test_title_similarity_near_duplicate() {
        let sim = title_similarity(
            "Attention Is All You Need",
            "Attention is all you need (extended version)",
        );
        assert!(sim > 0.7, "expected near-duplicate similarity, got {}", sim);
    }

    #[test]
    fn test_title_similarity_unrelated() {
        let sim = title_similarity(
            "Attention Is All You Need",
            "A Study of Protein Folding Dynamics",
        );
        assert!(sim < 0.5, "expected low similarity, got {}", sim);
    }

    #[test]
    fn test_title_similarity_symmetric() {
        let a = "Graph Neural Networks for Drug Discovery";
        let b = "Drug Discovery with Graph Neural Networks";
        let ab = title_similarity(a, b);
        let ba = title_similarity(b, a);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_title_similarity_empty() {
        assert_eq!(title_similarity("", "anything"), 0.0);
        assert_eq!(title_similarity("!!!", "anything"), 0.0);
    }
}
