#[cfg(test)]
mod tests {
    use crate::config::SearchConfig;
    use crate::search::sources::{arxiv, configured_sources, crossref, semantic_scholar, serper};
    use crate::types::paper::SourceKind;

    const ARXIV_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:transformers</title>
  <id>http://arxiv.org/api/abc</id>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <updated>2023-08-02T00:41:18Z</updated>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All
 You Need</title>
    <summary>The dominant sequence transduction models are based on complex
recurrent or convolutional neural networks.</summary>
    <author>
      <name>Ashish Vaswani</name>
    </author>
    <author>
      <name>Noam Shazeer</name>
    </author>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/0000.00000v1</id>
    <published>2020-01-01T00:00:00Z</published>
    <title>Entry Without Abstract</title>
    <summary></summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_atom_feed() {
        let papers = arxiv::parse_atom_feed(ARXIV_FIXTURE).unwrap();

        // the entry without a summary is dropped
        assert_eq!(papers.len(), 1);

        let paper = &papers[0];
        assert_eq!(paper.source, SourceKind::Arxiv);
        // embedded newlines collapse to single spaces
        assert_eq!(paper.title, "Attention Is All You Need");
        assert_eq!(paper.url, "http://arxiv.org/abs/1706.03762v7");
        assert_eq!(paper.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(paper.categories, vec!["cs.CL", "cs.LG"]);
        assert_eq!(paper.published, "2017-06-12T17:57:34Z");
        assert!(paper.abstract_text.starts_with("The dominant sequence"));
    }

    #[test]
    fn test_parse_atom_feed_empty() {
        let papers = arxiv::parse_atom_feed(
            r#"<?xml version="1.0"?><feed xmlns="http://www.w3.org/2005/Atom"></feed>"#,
        )
        .unwrap();
        assert!(papers.is_empty());
    }

    #[test]
    fn test_parse_atom_feed_malformed() {
        // truncated documents just stop at EOF
        assert!(arxiv::parse_atom_feed("<feed><entry><title>oops").is_ok());
        // mismatched closing tags are reported as parse errors
        assert!(arxiv::parse_atom_feed("<feed><entry></wrong></feed>").is_err());
    }

    #[test]
    fn test_semantic_scholar_convert() {
        let fixture = r#"{
            "total": 2,
            "data": [
                {
                    "paperId": "abc",
                    "title": "BERT: Pre-training of Deep Bidirectional Transformers",
                    "abstract": "We introduce a new language representation model called BERT.",
                    "year": 2018,
                    "url": "https://www.semanticscholar.org/paper/abc",
                    "venue": "NAACL",
                    "citationCount": 90000,
                    "authors": [{"authorId": "1", "name": "Jacob Devlin"}, {"authorId": "2", "name": "Ming-Wei Chang"}]
                },
                {
                    "paperId": "def",
                    "title": "   ",
                    "abstract": null,
                    "year": null,
                    "url": null,
                    "venue": null,
                    "authors": null
                }
            ]
        }"#;

        let response: semantic_scholar::SearchResponse = serde_json::from_str(fixture).unwrap();
        let papers = semantic_scholar::convert_response(response);

        assert_eq!(papers.len(), 1);
        let paper = &papers[0];
        assert_eq!(paper.source, SourceKind::SemanticScholar);
        assert_eq!(paper.authors.len(), 2);
        assert_eq!(paper.published, "2018");
        assert_eq!(paper.categories, vec!["NAACL"]);
    }

    #[test]
    fn test_semantic_scholar_truncates_long_abstract() {
        let long_abstract = "word ".repeat(300);
        let fixture = format!(
            r#"{{"data": [{{"title": "T", "abstract": "{}", "url": "u"}}]}}"#,
            long_abstract.trim()
        );

        let response: semantic_scholar::SearchResponse =
            serde_json::from_str(&fixture).unwrap();
        let papers = semantic_scholar::convert_response(response);

        assert!(papers[0].abstract_text.ends_with("..."));
        assert!(papers[0].abstract_text.chars().count() <= 503);
    }

    #[test]
    fn test_crossref_convert() {
        let fixture = r#"{
            "message": {
                "items": [
                    {
                        "title": ["Deep Residual Learning", "for Image Recognition"],
                        "author": [
                            {"given": "Kaiming", "family": "He"},
                            {"given": null, "family": null}
                        ],
                        "abstract": "<jats:p>We present a residual learning framework.</jats:p>",
                        "published-print": {"date-parts": [[2016, 6]]},
                        "URL": "https://doi.org/10.1109/cvpr.2016.90",
                        "DOI": "10.1109/cvpr.2016.90"
                    },
                    {
                        "title": [],
                        "DOI": "10.0/untitled"
                    }
                ]
            }
        }"#;

        let response: crossref::WorksResponse = serde_json::from_str(fixture).unwrap();
        let papers = crossref::convert_response(response);

        assert_eq!(papers.len(), 1);
        let paper = &papers[0];
        assert_eq!(paper.source, SourceKind::CrossRef);
        assert_eq!(paper.title, "Deep Residual Learning for Image Recognition");
        assert_eq!(paper.authors, vec!["Kaiming He"]);
        assert_eq!(paper.published, "2016");
        assert_eq!(
            paper.abstract_text,
            "We present a residual learning framework."
        );
    }

    #[test]
    fn test_crossref_doi_fallback_url() {
        let fixture = r#"{"message": {"items": [{"title": ["T"], "DOI": "10.1/x"}]}}"#;
        let response: crossref::WorksResponse = serde_json::from_str(fixture).unwrap();
        let papers = crossref::convert_response(response);

        assert_eq!(papers[0].url, "https://doi.org/10.1/x");
    }

    #[test]
    fn test_strip_jats_tags() {
        assert_eq!(
            crossref::strip_jats_tags("<jats:p>Hello <jats:italic>world</jats:italic></jats:p>"),
            "Hello world"
        );
        assert_eq!(crossref::strip_jats_tags("plain text"), "plain text");
    }

    #[test]
    fn test_serper_convert() {
        let fixture = r#"{
            "organic": [
                {
                    "title": "GPT-4 Technical Report",
                    "link": "https://arxiv.org/abs/2303.08774",
                    "snippet": "We report the development of GPT-4.",
                    "date": "Mar 15, 2023"
                }
            ],
            "scholar": [
                {
                    "title": "Language Models are Few-Shot Learners",
                    "link": "https://arxiv.org/abs/2005.14165",
                    "snippet": "We train GPT-3.",
                    "publicationInfo": {"summary": "TB Brown - 2020 - NeurIPS"}
                }
            ]
        }"#;

        let response: serper::SerperResponse = serde_json::from_str(fixture).unwrap();
        let papers = serper::convert_response(response);

        assert_eq!(papers.len(), 2);
        assert!(papers.iter().all(|p| p.source == SourceKind::Serper));
        assert_eq!(papers[0].published, "Mar 15, 2023");
        assert_eq!(papers[1].published, "TB Brown - 2020 - NeurIPS");
    }

    #[test]
    fn test_serper_convert_empty_sections() {
        let response: serper::SerperResponse = serde_json::from_str("{}").unwrap();
        assert!(serper::convert_response(response).is_empty());
    }

    #[test]
    fn test_configured_sources_without_serper_key() {
        let config = SearchConfig {
            serper_api_key: None,
            ..Default::default()
        };
        let http = reqwest::Client::new();

        let sources = configured_sources(&config, &http);
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["arxiv", "semantic_scholar", "crossref"]);
    }

    #[test]
    fn test_configured_sources_with_serper_key() {
        let config = SearchConfig {
            serper_api_key: Some("serper-key".to_string()),
            ..Default::default()
        };
        let http = reqwest::Client::new();

        let sources = configured_sources(&config, &http);
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["arxiv", "serper", "semantic_scholar", "crossref"]
        );
    }
}
