use super::*;
use crate::testing::{INTERVIEW_GUIDE, interview_guide_indexer};

mod chunker_tests {
    use super::*;

    fn chunker(max_chars: usize, min_chars: usize) -> Chunker {
        Chunker::new(ChunkerConfig {
            max_chars,
            min_chars,
        })
    }

    #[test]
    fn test_fixture_splits_on_paragraphs() {
        let chunks = Chunker::default().split(INTERVIEW_GUIDE);
        assert_eq!(chunks.len(), 6);
        assert!(chunks[0].starts_with("Interview Guide at Google\nOverview"));
        assert!(chunks[1].starts_with("Focus Areas"));
        assert!(chunks[5].starts_with("Interview Tips"));
    }

    #[test]
    fn test_short_paragraph_merges_forward() {
        let text = "Title\n\nThis paragraph is long enough to stand on its own.";
        let chunks = chunker(1000, 20).split(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0],
            "Title\nThis paragraph is long enough to stand on its own."
        );
    }

    #[test]
    fn test_trailing_short_paragraph_joins_previous() {
        let text = "This paragraph is long enough to stand on its own.\n\nEnd";
        let chunks = chunker(1000, 20).split(text);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].ends_with("\nEnd"));
    }

    #[test]
    fn test_empty_and_blank_text() {
        assert!(Chunker::default().split("").is_empty());
        assert!(Chunker::default().split("  \n\n\t \n").is_empty());
    }

    #[test]
    fn test_single_short_document_is_one_chunk() {
        let chunks = Chunker::default().split("tiny");
        assert_eq!(chunks, ["tiny"]);
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let chunks = chunker(1000, 1).split("  alpha    beta \r\n gamma\t delta  ");
        assert_eq!(chunks, ["alpha beta\ngamma delta"]);
    }

    #[test]
    fn test_long_paragraph_packs_lines_with_overlap() {
        let lines: Vec<String> = (0..6).map(|i| format!("line number {i} of the block")).collect();
        let text = lines.join("\n");
        let chunks = chunker(80, 10).split(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 80, "oversized chunk: {chunk:?}");
        }
        for pair in chunks.windows(2) {
            let last_line = pair[0].lines().last().unwrap();
            let first_line = pair[1].lines().next().unwrap();
            assert_eq!(last_line, first_line, "windows should overlap by one line");
        }
    }

    #[test]
    fn test_overlong_line_splits_at_whitespace() {
        let text = "word ".repeat(100);
        let chunks = chunker(50, 10).split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50);
            assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
        }
    }

    #[test]
    fn test_overlong_word_is_cut() {
        let text = "x".repeat(25);
        let chunks = chunker(10, 2).split(&text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat().replace('\n', ""), text);
    }

    #[test]
    fn test_config_validation() {
        assert!(ChunkerConfig::default().validate().is_ok());
        assert!(
            ChunkerConfig {
                max_chars: 100,
                min_chars: 100
            }
            .validate()
            .is_err()
        );
        assert!(
            ChunkerConfig {
                max_chars: 1,
                min_chars: 0
            }
            .validate()
            .is_err()
        );
    }
}

mod inverted_tests {
    use super::*;
    use crate::corpus::Chunk;

    #[test]
    fn test_postings_and_statistics() {
        let mut index = InvertedIndex::new();
        index.insert(&Chunk::new(1, 1, 0, "interview tips and interview advice".into()));
        index.insert(&Chunk::new(2, 1, 1, "coding interview".into()));

        assert_eq!(index.chunk_count(), 2);
        assert_eq!(index.document_frequency("interview"), 2);
        assert_eq!(index.collection_frequency("interview"), 3);
        assert_eq!(
            index.postings("interview"),
            [
                Posting {
                    chunk_id: 1,
                    term_freq: 2
                },
                Posting {
                    chunk_id: 2,
                    term_freq: 1
                },
            ]
        );
        assert_eq!(index.chunk_length(1), 4);
        assert_eq!(index.chunk_length(2), 2);
        assert!((index.average_chunk_length() - 3.0).abs() < f32::EPSILON);
        assert!(index.postings("weather").is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = InvertedIndex::new();
        assert_eq!(index.chunk_count(), 0);
        assert_eq!(index.average_chunk_length(), 0.0);
        assert!(!index.contains("anything"));
    }
}

mod profile_tests {
    use super::*;

    #[test]
    fn test_topic_terms() {
        let indexer = interview_guide_indexer();
        let snapshot = indexer.corpus().snapshot();
        assert_eq!(
            snapshot.profile().topic_terms(),
            ["interview", "coding", "question", "algorithm", "clarifying"]
        );
        assert!(snapshot.profile().is_topic_term("interview"));
        assert!(!snapshot.profile().is_topic_term("google"));
    }

    #[test]
    fn test_entities_and_subject() {
        let indexer = interview_guide_indexer();
        let snapshot = indexer.corpus().snapshot();
        let profile = snapshot.profile();

        assert!(profile.is_entity("google"));
        assert!(profile.is_entity("java"));
        assert!(profile.is_entity("sql"));
        assert!(!profile.is_entity("microsoft"));
        assert!(!profile.is_entity("data"));
        assert_eq!(profile.subject(), Some("google"));
    }

    #[test]
    fn test_resolve_exact_and_corrected() {
        let indexer = interview_guide_indexer();
        let snapshot = indexer.corpus().snapshot();

        assert_eq!(
            snapshot.resolve("interview"),
            Some(Resolution::Exact("interview".into()))
        );
        let corrected = snapshot.resolve("interveiw").unwrap();
        assert!(corrected.is_corrected());
        assert_eq!(corrected.term(), "interview");
        assert_eq!(snapshot.resolve("focas").unwrap().term(), "focus");
        assert_eq!(snapshot.resolve("structur").unwrap().term(), "structure");
    }

    #[test]
    fn test_resolve_rejects() {
        let indexer = interview_guide_indexer();
        let snapshot = indexer.corpus().snapshot();

        assert_eq!(snapshot.resolve("weather"), None);
        assert_eq!(snapshot.resolve("microsoft"), None);
        // too short for correction
        assert_eq!(snapshot.resolve("tipz"), None);
        // first character must match
        assert_eq!(snapshot.resolve("nterview"), None);
        assert_eq!(snapshot.resolve("123456789"), None);
    }

    #[test]
    fn test_vocabulary_matches_index() {
        let indexer = interview_guide_indexer();
        let snapshot = indexer.corpus().snapshot();
        let vocabulary = snapshot.profile().vocabulary();
        assert_eq!(vocabulary.len(), snapshot.index().term_count());
        assert!(vocabulary.contains("hashtable"));
    }
}

mod indexer_tests {
    use super::*;
    use crate::corpus::NewDocument;
    use crate::testing::{INTERVIEW_GUIDE_NAME, indexer};

    #[test]
    fn test_ingest_publishes_complete_snapshot() {
        let indexer = indexer();
        let before = indexer.corpus().snapshot();
        assert!(before.is_empty());
        assert_eq!(before.generation(), 0);

        let receipt = indexer
            .ingest(NewDocument::plain_text(INTERVIEW_GUIDE_NAME, INTERVIEW_GUIDE))
            .unwrap();

        assert_eq!(receipt.document.id, 1);
        assert_eq!(receipt.chunk_ids.len(), 6);
        assert_eq!(receipt.generation, 1);

        let after = indexer.corpus().snapshot();
        assert_eq!(after.chunks().len(), 6);
        assert_eq!(after.index().chunk_count(), 6);
        for id in &receipt.chunk_ids {
            let chunk = after.chunk(*id).expect("chunk installed");
            for term in &chunk.terms {
                assert!(after.index().postings(term).iter().any(|p| p.chunk_id == *id));
            }
        }

        // a snapshot taken earlier never changes
        assert!(before.is_empty());
    }

    #[test]
    fn test_chunk_positions_follow_document_order() {
        let indexer = interview_guide_indexer();
        let snapshot = indexer.corpus().snapshot();
        let positions: Vec<_> = snapshot.chunks().iter().map(|c| c.position).collect();
        assert_eq!(positions, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_duplicate_content_is_rejected() {
        let indexer = interview_guide_indexer();
        let generation = indexer.corpus().generation();

        let err = indexer
            .ingest(NewDocument::plain_text("copy.txt", INTERVIEW_GUIDE))
            .unwrap_err();
        assert!(matches!(err, IndexError::Duplicate { existing: 1, .. }));
        assert_eq!(indexer.corpus().generation(), generation);
        assert_eq!(indexer.corpus().snapshot().documents().len(), 1);
    }

    #[test]
    fn test_duplicate_detection_ignores_whitespace_layout() {
        let indexer = indexer();
        indexer
            .ingest(NewDocument::plain_text("a.txt", "Coding & Programming\nSystem Integration"))
            .unwrap();
        let err = indexer
            .ingest(NewDocument::plain_text("b.txt", "Coding &  Programming System Integration "))
            .unwrap_err();
        assert!(matches!(err, IndexError::Duplicate { .. }));
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let indexer = indexer();
        let err = indexer
            .ingest(NewDocument::plain_text("blank.txt", " \n\n "))
            .unwrap_err();
        assert!(matches!(err, IndexError::EmptyDocument { .. }));
        assert!(indexer.corpus().is_empty());
    }

    #[test]
    fn test_ids_are_monotonic_across_documents() {
        let indexer = indexer();
        let a = indexer
            .ingest(NewDocument::plain_text("a.txt", "First document about arrays and trees."))
            .unwrap();
        let b = indexer
            .ingest(NewDocument::plain_text("b.txt", "Second document about hashing and joins."))
            .unwrap();

        assert_eq!(a.document.id, 1);
        assert_eq!(b.document.id, 2);
        assert!(b.chunk_ids[0] > *a.chunk_ids.last().unwrap());
    }

    #[test]
    fn test_remove_drops_document_and_chunks() {
        let indexer = indexer();
        let a = indexer
            .ingest(NewDocument::plain_text("a.txt", "First document about arrays and trees."))
            .unwrap();
        indexer
            .ingest(NewDocument::plain_text("b.txt", "Second document about hashing and joins."))
            .unwrap();

        let removed = indexer.remove(a.document.id).unwrap();
        assert_eq!(removed.file_name, "a.txt");

        let snapshot = indexer.corpus().snapshot();
        assert_eq!(snapshot.documents().len(), 1);
        assert!(snapshot.chunks().iter().all(|c| c.document_id != a.document.id));
        assert!(!snapshot.index().contains("array"));
        assert!(snapshot.index().contains("hashing"));

        assert!(matches!(
            indexer.remove(a.document.id),
            Err(IndexError::NotFound { .. })
        ));
    }

    #[test]
    fn test_removed_content_can_be_reingested() {
        let indexer = interview_guide_indexer();
        indexer.remove(1).unwrap();
        let receipt = indexer
            .ingest(NewDocument::plain_text(INTERVIEW_GUIDE_NAME, INTERVIEW_GUIDE))
            .unwrap();
        assert_eq!(receipt.document.id, 2);
    }

    #[test]
    fn test_failed_commit_leaves_corpus_untouched() {
        let indexer = indexer();
        let err = indexer
            .ingest_with(NewDocument::plain_text("a.txt", INTERVIEW_GUIDE), |_| {
                Err(crate::storage::StorageError::Unavailable("disk full".into()))
            })
            .unwrap_err();

        assert!(matches!(err, IndexError::Persist(_)));
        assert!(indexer.corpus().is_empty());
        assert_eq!(indexer.corpus().generation(), 0);
    }

    #[test]
    fn test_restore_keeps_id_and_timestamp() {
        let source = interview_guide_indexer();
        let original = source.corpus().snapshot().documents()[0].as_ref().clone();

        let target = indexer();
        let receipt = target.restore(original.clone()).unwrap();
        assert_eq!(receipt.document.id, original.id);
        assert_eq!(receipt.document.uploaded_at, original.uploaded_at);

        let next = target
            .ingest(NewDocument::plain_text("other.txt", "A different document entirely."))
            .unwrap();
        assert_eq!(next.document.id, original.id + 1);

        assert!(matches!(
            target.restore(original),
            Err(IndexError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_summaries_report_chunk_counts() {
        let indexer = interview_guide_indexer();
        let summaries = indexer.corpus().summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].file_name, INTERVIEW_GUIDE_NAME);
        assert_eq!(summaries[0].file_type, "text/plain");
        assert_eq!(summaries[0].chunk_count, 6);
    }
}
