//! 论文分析的提示词构建

use crate::i18n::TargetLanguage;
use crate::types::paper::PaperRecord;

/// 论文分析的系统提示词
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a research assistant specialized in analyzing scientific papers. Focus on extracting concrete findings, methodologies, and quantitative results. Provide detailed technical insights.";

/// 单篇论文摘要在提示词中的截断长度
const ABSTRACT_PROMPT_LIMIT: usize = 3000;
/// 单条可视化内容在提示词中的截断长度
const VISUAL_PROMPT_LIMIT: usize = 1500;

/// 构建带语言指令的系统提示词
pub fn analysis_system_prompt(answer_language: &TargetLanguage) -> String {
    format!(
        "{}\n\n{}",
        ANALYSIS_SYSTEM_PROMPT,
        answer_language.prompt_instruction()
    )
}

/// 构建论文分析的用户提示词
///
/// 把入选论文的元数据、摘要与提取出的表格/图注拼装成调研材料。
pub fn build_analysis_prompt(query: &str, papers: &[PaperRecord], max_papers: usize) -> String {
    let mut paper_summaries = Vec::new();

    for (i, paper) in papers.iter().take(max_papers).enumerate() {
        let mut summary = format!("Paper {}: {}\n", i + 1, paper.title);
        summary.push_str(&format!("URL: {}\n", paper.url));
        summary.push_str(&format!("Published: {}\n", paper.published));
        summary.push_str(&format!("Categories: {}\n", paper.categories.join(", ")));
        summary.push_str(&format!(
            "Authors: {}\n",
            paper.authors.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
        ));
        summary.push_str(&format!(
            "Abstract: {}\n",
            truncate_chars(&paper.abstract_text, ABSTRACT_PROMPT_LIMIT)
        ));

        if !paper.visuals.is_empty() {
            summary.push_str("\nVisual Data Found:\n");
            for (j, visual) in paper.visuals.iter().enumerate() {
                summary.push_str(&format!("- {} {}: {}\n", visual.kind, j + 1, visual.description));
                if !visual.text_content.is_empty() {
                    summary.push_str(&format!(
                        "  Content: {}\n",
                        truncate_chars(&visual.text_content, VISUAL_PROMPT_LIMIT)
                    ));
                }
            }
        }

        paper_summaries.push(summary);
    }

    format!(
        r#"Analyze these research papers for the query: "{}"

Papers with extracted visuals:
{}

Provide the following:
1. Answer the question with clear, well-researched and structured technical information
2. Reference relevant research areas or methodologies that support your explanation
3. Offer actionable insights or next steps where appropriate

Along with the above, provide comprehensive analysis including:
1. Key findings and quantitative results
2. Methodological approaches used
3. Notable contributions and innovations
4. Research trends and patterns
5. Limitations and future work mentioned

Focus on specific results, numbers, and concrete findings from the papers."#,
        query,
        paper_summaries.join("\n")
    )
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let truncated: String = text.chars().take(limit).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
