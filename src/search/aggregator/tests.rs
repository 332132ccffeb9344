#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::search::aggregator::Aggregator;
    use crate::search::sources::{SearchSource, SourceError};
    use crate::types::paper::{PaperRecord, SourceKind};

    /// Stub source returning a fixed set of papers.
    struct StubSource {
        name: &'static str,
        kind: SourceKind,
        papers: Vec<(&'static str, &'static str)>,
    }

    #[async_trait]
    impl SearchSource for StubSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn search(
            &self,
            _query: &str,
            limit: usize,
        ) -> Result<Vec<PaperRecord>, SourceError> {
            Ok(self
                .papers
                .iter()
                .take(limit)
                .map(|(title, abstract_text)| {
                    let mut p = PaperRecord::new(
                        self.kind,
                        title.to_string(),
                        format!("https://example.org/{}", title.len()),
                    );
                    p.abstract_text = abstract_text.to_string();
                    p
                })
                .collect())
        }
    }

    /// Stub source that always fails.
    struct FailingSource;

    #[async_trait]
    impl SearchSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn search(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<PaperRecord>, SourceError> {
            Err(SourceError::Api("quota exceeded".to_string()))
        }
    }

    fn arxiv_stub(papers: Vec<(&'static str, &'static str)>) -> Box<dyn SearchSource> {
        Box::new(StubSource {
            name: "arxiv",
            kind: SourceKind::Arxiv,
            papers,
        })
    }

    fn crossref_stub(papers: Vec<(&'static str, &'static str)>) -> Box<dyn SearchSource> {
        Box::new(StubSource {
            name: "crossref",
            kind: SourceKind::CrossRef,
            papers,
        })
    }

    #[tokio::test]
    async fn test_total_limit_is_respected() {
        let sources = vec![
            arxiv_stub(vec![
                ("Transformer models one", "transformers for text"),
                ("Convolutional networks two", "cnns for images"),
                ("Recurrent networks three", "rnns for sequences"),
            ]),
            crossref_stub(vec![
                ("Graph networks four", "gnns for graphs"),
                ("Diffusion models five", "diffusion for images"),
            ]),
        ];
        let aggregator = Aggregator::with_sources(sources, 0.85);

        let (papers, total) = aggregator.aggregate("neural networks", 10, 3).await;

        assert!(papers.len() <= 3);
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_near_duplicate_titles_are_deduplicated() {
        let sources = vec![
            arxiv_stub(vec![(
                "Attention Is All You Need",
                "attention mechanisms for transformers and machine translation",
            )]),
            crossref_stub(vec![
                (
                    "Attention is all you need.",
                    "short snippet",
                ),
                ("A Completely Different Paper", "about protein folding"),
            ]),
        ];
        let aggregator = Aggregator::with_sources(sources, 0.85);

        let (papers, total) = aggregator.aggregate("attention transformers", 10, 10).await;

        assert_eq!(total, 2);
        // the retained duplicate is the higher-scored (richer abstract) arxiv record
        let attention = papers
            .iter()
            .find(|p| p.title.to_lowercase().starts_with("attention"))
            .unwrap();
        assert_eq!(attention.source, SourceKind::Arxiv);
    }

    #[tokio::test]
    async fn test_dedup_invariant_holds() {
        let sources = vec![
            arxiv_stub(vec![
                ("Deep Learning for NLP", "language models"),
                ("Deep Learning for NLP!", "language models again"),
                ("Deep learning for NLP (survey)", "survey of language models"),
            ]),
        ];
        let threshold = 0.85;
        let aggregator = Aggregator::with_sources(sources, threshold);

        let (papers, _) = aggregator.aggregate("deep learning nlp", 10, 10).await;

        for (i, a) in papers.iter().enumerate() {
            for b in papers.iter().skip(i + 1) {
                let sim = crate::search::text::title_similarity(&a.title, &b.title);
                assert!(
                    sim <= threshold,
                    "retained records '{}' and '{}' exceed threshold: {}",
                    a.title,
                    b.title,
                    sim
                );
            }
        }
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty() {
        let sources: Vec<Box<dyn SearchSource>> =
            vec![Box::new(FailingSource), Box::new(FailingSource)];
        let aggregator = Aggregator::with_sources(sources, 0.85);

        let (papers, total) = aggregator.aggregate("anything", 10, 10).await;

        assert!(papers.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let sources: Vec<Box<dyn SearchSource>> = vec![
            Box::new(FailingSource),
            arxiv_stub(vec![("Quantum Computing Advances", "qubits and error correction")]),
        ];
        let aggregator = Aggregator::with_sources(sources, 0.85);

        let (papers, total) = aggregator.aggregate("quantum computing", 10, 10).await;

        assert_eq!(total, 1);
        assert_eq!(papers[0].title, "Quantum Computing Advances");
    }

    #[tokio::test]
    async fn test_deterministic_ordering() {
        let build = || {
            vec![
                arxiv_stub(vec![
                    ("Paper Alpha", "identical abstract"),
                    ("Paper Beta", "identical abstract"),
                ]),
                crossref_stub(vec![("Paper Gamma", "identical abstract")]),
            ]
        };

        let first = Aggregator::with_sources(build(), 0.85)
            .aggregate("identical abstract", 10, 10)
            .await;
        let second = Aggregator::with_sources(build(), 0.85)
            .aggregate("identical abstract", 10, 10)
            .await;

        let titles = |r: &(Vec<crate::types::paper::PaperRecord>, usize)| {
            r.0.iter().map(|p| p.title.clone()).collect::<Vec<_>>()
        };
        assert_eq!(titles(&first), titles(&second));
    }

    #[tokio::test]
    async fn test_results_sorted_by_score_descending() {
        let sources = vec![arxiv_stub(vec![
            ("Unrelated botany paper", "flowering plants in spring"),
            (
                "Reinforcement learning for robotics",
                "reinforcement learning policies for robotic control",
            ),
        ])];
        let aggregator = Aggregator::with_sources(sources, 0.85);

        let (papers, _) = aggregator
            .aggregate("reinforcement learning robotics", 10, 10)
            .await;

        for pair in papers.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
        assert_eq!(papers[0].title, "Reinforcement learning for robotics");
    }

    #[tokio::test]
    async fn test_per_source_limit_forwarded() {
        let sources = vec![arxiv_stub(vec![
            ("One", "a"),
            ("Two", "b"),
            ("Three", "c"),
        ])];
        let aggregator = Aggregator::with_sources(sources, 0.85);

        let (_, total) = aggregator.aggregate("query words", 2, 10).await;
        assert_eq!(total, 2);
    }
}
