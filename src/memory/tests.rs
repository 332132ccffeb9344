#[cfg(test)]
mod tests {
    use crate::memory::{Memory, MemoryScope, ScopedKeys};
    use crate::types::paper::{PaperRecord, SourceKind};

    #[test]
    fn test_store_and_get() {
        let mut memory = Memory::new();

        memory
            .store(MemoryScope::PIPELINE, ScopedKeys::QUERY, "transformers")
            .unwrap();

        let query: Option<String> = memory.get(MemoryScope::PIPELINE, ScopedKeys::QUERY);
        assert_eq!(query, Some("transformers".to_string()));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let memory = Memory::new();

        let value: Option<String> = memory.get(MemoryScope::PIPELINE, "missing");
        assert!(value.is_none());
    }

    #[test]
    fn test_scopes_do_not_collide() {
        let mut memory = Memory::new();

        memory.store("a", "key", 1u32).unwrap();
        memory.store("b", "key", 2u32).unwrap();

        assert_eq!(memory.get::<u32>("a", "key"), Some(1));
        assert_eq!(memory.get::<u32>("b", "key"), Some(2));
    }

    #[test]
    fn test_has_data_and_list_keys() {
        let mut memory = Memory::new();

        memory
            .store(MemoryScope::PIPELINE, ScopedKeys::QUERY, "q")
            .unwrap();
        memory
            .store(MemoryScope::PIPELINE, ScopedKeys::PAPER_ANALYSIS, "a")
            .unwrap();

        assert!(memory.has_data(MemoryScope::PIPELINE, ScopedKeys::QUERY));
        assert!(!memory.has_data(MemoryScope::PIPELINE, ScopedKeys::PAPERS));

        let mut keys = memory.list_keys(MemoryScope::PIPELINE);
        keys.sort();
        assert_eq!(keys, vec!["paper_analysis", "query"]);
    }

    #[test]
    fn test_typed_roundtrip() {
        let mut memory = Memory::new();

        let papers = vec![PaperRecord::new(
            SourceKind::Arxiv,
            "Attention Is All You Need".to_string(),
            "https://arxiv.org/abs/1706.03762".to_string(),
        )];
        memory
            .store(MemoryScope::PIPELINE, ScopedKeys::PAPERS, &papers)
            .unwrap();

        let restored: Option<Vec<PaperRecord>> =
            memory.get(MemoryScope::PIPELINE, ScopedKeys::PAPERS);
        let restored = restored.unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].title, "Attention Is All You Need");
        assert_eq!(restored[0].source, SourceKind::Arxiv);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let mut memory = Memory::new();

        memory.store("s", "k", "old").unwrap();
        memory.store("s", "k", "new").unwrap();

        assert_eq!(memory.get::<String>("s", "k"), Some("new".to_string()));
    }
}
