//! 研究流水线
//!
//! 每个用户查询重新进入一次的线性流水线：查询分析 → 论文检索 → 可视化
//! 提取 → LLM论文分析 → 结论合成。每个阶段完成后通过channel推送
//! (消息, 步骤板)进度更新，合成结束后推送最终报告并终止。

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, anyhow};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::agent::context::AgentContext;
use crate::agent::prompts;
use crate::analysis::{QueryAnalyzer, VisualExtractor};
use crate::memory::{Memory, MemoryScope, ScopedKeys};
use crate::search::Aggregator;
use crate::search::sources::build_http_client;
use crate::types::paper::PaperRecord;
use crate::types::query::{ConversationTurn, QueryAnalysis, QueryComplexity, QueryIntent};
use crate::types::steps::{AgentStep, PipelineUpdate, StepStatus, TaskType};

/// 对话历史里保存的结论摘要长度
const TURN_SUMMARY_LIMIT: usize = 500;

/// 研究流水线
#[derive(Clone)]
pub struct ResearchPipeline {
    context: AgentContext,
    analyzer: Arc<QueryAnalyzer>,
    aggregator: Arc<Aggregator>,
    extractor: Arc<VisualExtractor>,
}

impl ResearchPipeline {
    pub fn new(context: AgentContext) -> Result<Self> {
        let http = build_http_client(&context.config.search)?;
        let aggregator = Arc::new(Aggregator::from_config(&context.config.search)?);
        let extractor = Arc::new(VisualExtractor::new(http));

        Ok(Self {
            context,
            analyzer: Arc::new(QueryAnalyzer::new()),
            aggregator,
            extractor,
        })
    }

    /// 规划执行步骤
    pub fn plan_steps(analysis: &QueryAnalysis) -> Vec<AgentStep> {
        vec![
            AgentStep::new(
                1,
                "Query Analysis",
                "Analyze user query to understand research intent",
                TaskType::AnalyzeQuery,
                "First step to understand what the user is looking for",
            ),
            AgentStep::new(
                2,
                "Search Papers",
                "Search multiple sources (ArXiv, Serper.dev, Semantic Scholar, CrossRef) for relevant research papers",
                TaskType::SearchPapers,
                "Find papers related to the research query",
            ),
            AgentStep::new(
                3,
                "Extract Visual Data",
                "Extract tables and figure captions from top papers",
                TaskType::ExtractVisuals,
                if Self::should_extract_visuals(analysis) {
                    "Extract visual information to provide richer context"
                } else {
                    "Plain search query, PDF extraction will be skipped"
                },
            ),
            AgentStep::new(
                4,
                "Analyze Papers",
                "Analyze found papers for key insights using extracted content",
                TaskType::AnalyzePapers,
                "Extract meaningful insights from the research papers with their content",
            ),
            AgentStep::new(
                5,
                "Synthesize Response",
                "Create comprehensive response for the user",
                TaskType::Synthesize,
                "Combine all findings into a coherent response",
            ),
        ]
    }

    /// 可视化提取的触发条件
    ///
    /// 纯检索类的简单查询不下载PDF，分析/对比类或复杂查询才提取。
    pub fn should_extract_visuals(analysis: &QueryAnalysis) -> bool {
        matches!(
            analysis.intent,
            QueryIntent::Analyze | QueryIntent::Compare | QueryIntent::FollowUp
        ) || analysis.complexity == QueryComplexity::Complex
    }

    /// 流式处理研究查询
    ///
    /// 返回惰性的进度更新流；接收端提前断开时流水线任务随之结束。
    pub fn process_query(&self, query: String) -> ReceiverStream<PipelineUpdate> {
        let (tx, rx) = mpsc::channel(32);
        let pipeline = self.clone();

        tokio::spawn(async move {
            pipeline.run(query, tx).await;
        });

        ReceiverStream::new(rx)
    }

    async fn run(&self, query: String, tx: mpsc::Sender<PipelineUpdate>) {
        if query.trim().is_empty() {
            let _ = tx
                .send(PipelineUpdate::finished(
                    "Please enter a research query.",
                    "No steps to execute.",
                ))
                .await;
            return;
        }

        // 查询分析先于规划执行，规划需要依赖意图做环节取舍
        let history = self.context.history_snapshot().await;
        let contextualized = self.analyzer.contextualize(&query, &history);
        let analysis = self.analyzer.analyze(&contextualized, &history);

        let mut memory = Memory::new();
        let mut steps = Self::plan_steps(&analysis);

        if tx
            .send(PipelineUpdate::progress(
                "🚀 Starting research with content extraction...",
                render_step_board(&steps),
            ))
            .await
            .is_err()
        {
            return;
        }

        for index in 0..steps.len() {
            steps[index].status = StepStatus::Running;
            let running_update = PipelineUpdate::progress(
                format!("🔄 Executing: {}", steps[index].name),
                render_step_board(&steps),
            );
            if tx.send(running_update).await.is_err() {
                return;
            }

            let task_type = steps[index].task_type;
            let start_time = Instant::now();
            let outcome = self
                .execute_step(task_type, &query, &contextualized, &analysis, &mut memory)
                .await;
            steps[index].execution_time = start_time.elapsed().as_secs_f64();

            let message = match outcome {
                Ok(result) => {
                    steps[index].status = StepStatus::Completed;
                    steps[index].result = result;
                    format!("✅ Completed: {}", steps[index].name)
                }
                Err(e) => {
                    steps[index].status = StepStatus::Failed;
                    steps[index].result = format!("Error: {}", e);
                    eprintln!("❌ 步骤 {} 执行失败: {}", steps[index].name, e);
                    format!("❌ Failed: {}", steps[index].name)
                }
            };

            if tx
                .send(PipelineUpdate::progress(message, render_step_board(&steps)))
                .await
                .is_err()
            {
                return;
            }
        }

        let final_response: String = memory
            .get(MemoryScope::PIPELINE, ScopedKeys::FINAL_RESPONSE)
            .unwrap_or_else(|| "Research completed!".to_string());

        // 保存本轮对话，供后续追问补充上下文
        let analysis_text: String = memory
            .get(MemoryScope::PIPELINE, ScopedKeys::PAPER_ANALYSIS)
            .unwrap_or_default();
        let summary = truncate_chars(&analysis_text, TURN_SUMMARY_LIMIT);
        self.context
            .push_turn(ConversationTurn::new(query.clone(), summary))
            .await;

        let _ = tx
            .send(PipelineUpdate::finished(
                final_response,
                render_step_board(&steps),
            ))
            .await;
    }

    /// 执行单个步骤并返回结果描述
    async fn execute_step(
        &self,
        task_type: TaskType,
        query: &str,
        contextualized: &str,
        analysis: &QueryAnalysis,
        memory: &mut Memory,
    ) -> Result<String> {
        match task_type {
            TaskType::AnalyzeQuery => self.execute_query_analysis(query, contextualized, analysis, memory),
            TaskType::SearchPapers => self.execute_paper_search(contextualized, memory).await,
            TaskType::ExtractVisuals => self.execute_visual_extraction(analysis, memory).await,
            TaskType::AnalyzePapers => self.execute_paper_analysis(contextualized, memory).await,
            TaskType::Synthesize => self.execute_synthesis(query, memory),
        }
    }

    fn execute_query_analysis(
        &self,
        query: &str,
        contextualized: &str,
        analysis: &QueryAnalysis,
        memory: &mut Memory,
    ) -> Result<String> {
        memory.store(MemoryScope::PIPELINE, ScopedKeys::QUERY, query)?;
        memory.store(
            MemoryScope::PIPELINE,
            ScopedKeys::CONTEXTUALIZED_QUERY,
            contextualized,
        )?;
        memory.store(MemoryScope::PIPELINE, ScopedKeys::QUERY_ANALYSIS, analysis)?;

        Ok(format!(
            "Intent: {}, Complexity: {}",
            analysis.intent, analysis.complexity
        ))
    }

    async fn execute_paper_search(
        &self,
        contextualized: &str,
        memory: &mut Memory,
    ) -> Result<String> {
        let search_config = &self.context.config.search;
        let (papers, total) = self
            .aggregator
            .aggregate(
                contextualized,
                search_config.per_source_limit,
                search_config.max_results,
            )
            .await;

        let selected = papers.len();
        memory.store(MemoryScope::PIPELINE, ScopedKeys::PAPERS, &papers)?;

        Ok(format!("Found {} papers, selected top {}", total, selected))
    }

    async fn execute_visual_extraction(
        &self,
        analysis: &QueryAnalysis,
        memory: &mut Memory,
    ) -> Result<String> {
        if !Self::should_extract_visuals(analysis) {
            return Ok("Skipped for a plain search query".to_string());
        }

        let mut papers: Vec<PaperRecord> = memory
            .get(MemoryScope::PIPELINE, ScopedKeys::PAPERS)
            .unwrap_or_default();
        if papers.is_empty() {
            return Ok("No papers to extract visuals from".to_string());
        }

        let search_config = &self.context.config.search;
        let mut visual_count = 0;
        for paper in papers.iter_mut().take(search_config.max_visual_extractions) {
            match self
                .extractor
                .extract_from_paper(&paper.url, search_config.max_visuals_per_paper)
                .await
            {
                Ok(visuals) => {
                    visual_count += visuals.len();
                    paper.visuals = visuals;
                }
                Err(e) => {
                    // 单篇论文提取失败不影响其余论文
                    eprintln!("⚠️ 论文《{}》可视化提取失败: {}", paper.title, e);
                    paper.visuals = Vec::new();
                }
            }
        }

        memory.store(MemoryScope::PIPELINE, ScopedKeys::PAPERS, &papers)?;

        Ok(format!(
            "Extracted {} visual elements from top {} papers",
            visual_count,
            search_config.max_visual_extractions.min(papers.len())
        ))
    }

    async fn execute_paper_analysis(
        &self,
        contextualized: &str,
        memory: &mut Memory,
    ) -> Result<String> {
        let papers: Vec<PaperRecord> = memory
            .get(MemoryScope::PIPELINE, ScopedKeys::PAPERS)
            .unwrap_or_default();
        if papers.is_empty() {
            return Ok("No papers found to analyze".to_string());
        }

        let search_config = &self.context.config.search;
        let system_prompt = prompts::analysis_system_prompt(&self.context.config.answer_language);
        let user_prompt = prompts::build_analysis_prompt(
            contextualized,
            &papers,
            search_config.max_papers_for_analysis,
        );

        let analysis_text = self
            .context
            .cached_prompt("analysis", &system_prompt, &user_prompt)
            .await
            .map_err(|e| anyhow!("LLM analysis failed: {}", e))?;

        memory.store(MemoryScope::PIPELINE, ScopedKeys::PAPER_ANALYSIS, &analysis_text)?;

        Ok("Paper analysis with extracted content completed".to_string())
    }

    fn execute_synthesis(&self, query: &str, memory: &mut Memory) -> Result<String> {
        let papers: Vec<PaperRecord> = memory
            .get(MemoryScope::PIPELINE, ScopedKeys::PAPERS)
            .unwrap_or_default();
        let analysis: Option<String> = memory.get(MemoryScope::PIPELINE, ScopedKeys::PAPER_ANALYSIS);

        let final_response = render_final_report(query, &papers, analysis.as_deref());
        memory.store(
            MemoryScope::PIPELINE,
            ScopedKeys::FINAL_RESPONSE,
            &final_response,
        )?;

        Ok("Synthesis completed".to_string())
    }
}

/// 渲染实时步骤板
pub fn render_step_board(steps: &[AgentStep]) -> String {
    if steps.is_empty() {
        return "No steps planned yet...".to_string();
    }

    let mut output = vec!["# 🤖 Agent Execution Progress\n".to_string()];

    for step in steps {
        output.push(format!(
            "#### {} Step {}: {}\n",
            step.status.label(),
            step.id,
            step.name
        ));
        output.push(format!("**Task:** {}\n", step.description));
        output.push(format!("**Reasoning:** {}\n", step.reasoning));

        if !step.result.is_empty()
            && matches!(step.status, StepStatus::Completed | StepStatus::Failed)
        {
            output.push(format!("**Result:** {}\n", step.result));
        }

        if step.execution_time > 0.0 {
            output.push(format!("**Duration:** {:.2}s \n", step.execution_time));
        }

        output.push("---\n".to_string());
    }

    output.join("\n")
}

/// 渲染最终研究报告
///
/// 分析缺失（LLM失败或无可分析论文）时以失败说明代替洞察部分。
pub fn render_final_report(query: &str, papers: &[PaperRecord], analysis: Option<&str>) -> String {
    let mut parts = vec![format!("## Research Report: {}", query)];

    match analysis {
        Some(analysis) if !analysis.is_empty() => {
            parts.push("\n --- \n ## Key Insights \n --- \n".to_string());
            parts.push(analysis.to_string());
        }
        _ => {
            parts.push(
                "\n⚠️ Synthesis failed: AI analysis was unavailable for this query. The top papers below were still retrieved."
                    .to_string(),
            );
        }
    }

    if !papers.is_empty() {
        parts.push("\n --- \n ## Top 3 Papers \n --- \n".to_string());
        for (i, paper) in papers.iter().take(3).enumerate() {
            parts.push(format!("**{}. {}**", i + 1, paper.title));
            parts.push(format!(
                "Authors: {}",
                paper.authors.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
            ));
            parts.push(format!("[Paper Link]({})", paper.url));
            parts.push(String::new());
        }
    }

    parts.join("\n")
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let truncated: String = text.chars().take(limit).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

// Include tests
#[cfg(test)]
mod tests;
