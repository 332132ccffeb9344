#[cfg(test)]
mod tests {
    use crate::agent::pipeline::{ResearchPipeline, render_final_report, render_step_board};
    use crate::types::paper::{PaperRecord, SourceKind};
    use crate::types::query::{QueryAnalysis, QueryComplexity, QueryIntent};
    use crate::types::steps::{StepStatus, TaskType};

    fn analysis(intent: QueryIntent, complexity: QueryComplexity) -> QueryAnalysis {
        QueryAnalysis {
            intent,
            complexity,
            keywords: vec!["test".to_string()],
            needs_comparison: intent == QueryIntent::Compare,
        }
    }

    fn sample_papers(n: usize) -> Vec<PaperRecord> {
        (0..n)
            .map(|i| {
                let mut p = PaperRecord::new(
                    SourceKind::Arxiv,
                    format!("Paper number {}", i + 1),
                    format!("https://arxiv.org/abs/000{}.0000", i + 1),
                );
                p.authors = vec!["Author One".to_string()];
                p
            })
            .collect()
    }

    #[test]
    fn test_plan_steps_covers_full_pipeline() {
        let steps =
            ResearchPipeline::plan_steps(&analysis(QueryIntent::Analyze, QueryComplexity::Medium));

        assert_eq!(steps.len(), 5);
        let task_types: Vec<TaskType> = steps.iter().map(|s| s.task_type).collect();
        assert_eq!(
            task_types,
            vec![
                TaskType::AnalyzeQuery,
                TaskType::SearchPapers,
                TaskType::ExtractVisuals,
                TaskType::AnalyzePapers,
                TaskType::Synthesize,
            ]
        );
        // step ids are sequential and all steps start pending
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.id as usize, i + 1);
            assert_eq!(step.status, StepStatus::Pending);
        }
    }

    #[test]
    fn test_visual_extraction_gating() {
        // analyze/compare/follow-up intents always extract
        assert!(ResearchPipeline::should_extract_visuals(&analysis(
            QueryIntent::Analyze,
            QueryComplexity::Simple
        )));
        assert!(ResearchPipeline::should_extract_visuals(&analysis(
            QueryIntent::Compare,
            QueryComplexity::Medium
        )));
        assert!(ResearchPipeline::should_extract_visuals(&analysis(
            QueryIntent::FollowUp,
            QueryComplexity::Simple
        )));

        // plain search queries extract only when complex
        assert!(!ResearchPipeline::should_extract_visuals(&analysis(
            QueryIntent::Search,
            QueryComplexity::Simple
        )));
        assert!(!ResearchPipeline::should_extract_visuals(&analysis(
            QueryIntent::Search,
            QueryComplexity::Medium
        )));
        assert!(ResearchPipeline::should_extract_visuals(&analysis(
            QueryIntent::Search,
            QueryComplexity::Complex
        )));
    }

    #[test]
    fn test_render_step_board_empty() {
        assert_eq!(render_step_board(&[]), "No steps planned yet...");
    }

    #[test]
    fn test_render_step_board_shows_status_and_results() {
        let mut steps =
            ResearchPipeline::plan_steps(&analysis(QueryIntent::Search, QueryComplexity::Medium));
        steps[0].status = StepStatus::Completed;
        steps[0].result = "Intent: search, Complexity: medium".to_string();
        steps[0].execution_time = 0.01;
        steps[1].status = StepStatus::Running;

        let board = render_step_board(&steps);

        assert!(board.starts_with("# 🤖 Agent Execution Progress"));
        assert!(board.contains("✅ Completed Step 1: Query Analysis"));
        assert!(board.contains("**Result:** Intent: search, Complexity: medium"));
        assert!(board.contains("**Duration:** 0.01s"));
        assert!(board.contains("🔄 Running Step 2: Search Papers"));
        assert!(board.contains("⏳ Pending Step 5: Synthesize Response"));
    }

    #[test]
    fn test_render_step_board_hides_pending_results() {
        let mut steps =
            ResearchPipeline::plan_steps(&analysis(QueryIntent::Search, QueryComplexity::Medium));
        steps[2].result = "should not appear".to_string();

        let board = render_step_board(&steps);
        assert!(!board.contains("should not appear"));
    }

    #[test]
    fn test_render_final_report_with_analysis() {
        let papers = sample_papers(4);
        let report = render_final_report(
            "transformer scaling laws",
            &papers,
            Some("Scaling is predictable."),
        );

        assert!(report.starts_with("## Research Report: transformer scaling laws"));
        assert!(report.contains("## Key Insights"));
        assert!(report.contains("Scaling is predictable."));
        // only the top three papers are listed
        assert!(report.contains("**1. Paper number 1**"));
        assert!(report.contains("**3. Paper number 3**"));
        assert!(!report.contains("Paper number 4"));
    }

    #[test]
    fn test_render_final_report_without_analysis() {
        let papers = sample_papers(1);
        let report = render_final_report("q", &papers, None);

        assert!(report.contains("Synthesis failed"));
        assert!(!report.contains("## Key Insights"));
        assert!(report.contains("**1. Paper number 1**"));
    }

    #[test]
    fn test_render_final_report_without_papers() {
        let report = render_final_report("q", &[], Some("insights"));

        assert!(report.contains("## Key Insights"));
        assert!(!report.contains("Top 3 Papers"));
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits_the_stream() {
        use tokio_stream::StreamExt;

        use crate::agent::AgentContext;
        use crate::config::Config;

        let context = AgentContext::new(Config::default()).unwrap();
        let pipeline = ResearchPipeline::new(context).unwrap();

        let mut stream = pipeline.process_query("   ".to_string());
        let update = stream.next().await.unwrap();

        assert!(update.is_final);
        assert_eq!(update.message, "Please enter a research query.");
        assert_eq!(update.step_board, "No steps to execute.");
        // the stream terminates after the final update
        assert!(stream.next().await.is_none());
    }
}
