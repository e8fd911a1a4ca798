use super::*;
use crate::constants::OUT_OF_SCOPE_RESPONSE;
use crate::corpus::NewDocument;
use crate::index::Indexer;
use crate::synthesis::{
    ExtractiveSynthesizer, GenerativeConfig, GenerativeSynthesizer, Provenance, ScriptedGenerator,
    Strategy,
};
use crate::testing::{indexer, interview_guide_indexer};

fn extractive_pipeline(indexer: &Indexer) -> QueryPipeline {
    QueryPipeline::new(
        Arc::clone(indexer.corpus()),
        ScopeClassifier::default(),
        Retriever::default(),
        Arc::new(ExtractiveSynthesizer::default()),
    )
}

#[tokio::test]
async fn test_count_question_is_grounded() {
    let indexer = interview_guide_indexer();
    let outcome = extractive_pipeline(&indexer)
        .answer("How many interviews are there?")
        .await;

    assert!(outcome.decision.is_in_scope());
    assert_eq!(outcome.answer.provenance, Provenance::Documents);
    assert!(outcome.answer.text.contains('5'));
    assert!(outcome.answer.text.to_lowercase().contains("interview"));
    assert!(!outcome.chunks.is_empty());
    assert_eq!(outcome.generation, 1);
}

#[tokio::test]
async fn test_refusals_use_the_literal() {
    let indexer = interview_guide_indexer();
    let pipeline = extractive_pipeline(&indexer);

    for raw in [
        "What is the weather today?",
        "How many rounds in Microsoft interview?",
        "",
        "   ",
    ] {
        let outcome = pipeline.answer(raw).await;
        assert_eq!(outcome.answer.text, OUT_OF_SCOPE_RESPONSE, "{raw:?}");
        assert_eq!(outcome.answer.provenance, Provenance::OutOfScope, "{raw:?}");
        assert!(outcome.chunks.is_empty(), "refusals skip retrieval");
    }
}

#[tokio::test]
async fn test_empty_corpus_reports_no_documents() {
    let indexer = indexer();
    let outcome = extractive_pipeline(&indexer).answer("interview").await;

    assert_eq!(outcome.answer.text, OUT_OF_SCOPE_RESPONSE);
    assert_eq!(outcome.answer.provenance, Provenance::NoDocuments);
    assert_eq!(
        outcome.decision,
        ScopeDecision::OutOfScope(RejectReason::EmptyCorpus)
    );
}

#[tokio::test]
async fn test_typo_gives_same_answer() {
    let indexer = interview_guide_indexer();
    let pipeline = extractive_pipeline(&indexer);

    let correct = pipeline.answer("How many interviews are there?").await;
    let typo = pipeline.answer("How many interveiws are there?").await;
    assert_eq!(correct.answer, typo.answer);
}

#[tokio::test]
async fn test_repeated_queries_are_identical() {
    let indexer = interview_guide_indexer();
    let pipeline = extractive_pipeline(&indexer);

    let first = pipeline.answer("What are the four focus areas?").await;
    for _ in 0..5 {
        let again = pipeline.answer("What are the four focus areas?").await;
        assert_eq!(again.answer, first.answer);
        assert_ne!(again.id, first.id);
    }
}

#[tokio::test]
async fn test_answers_follow_new_documents() {
    let indexer = indexer();
    let pipeline = extractive_pipeline(&indexer);
    assert_eq!(
        pipeline.answer("What is the onboarding schedule?").await.answer.provenance,
        Provenance::NoDocuments
    );

    indexer
        .ingest(NewDocument::plain_text(
            "onboarding.txt",
            "Onboarding Schedule\nThe onboarding schedule spans two weeks of mentoring sessions.",
        ))
        .unwrap();

    let outcome = pipeline.answer("What is the onboarding schedule?").await;
    assert_eq!(outcome.answer.provenance, Provenance::Documents);
    assert!(outcome.answer.text.contains("two weeks"));
}

#[tokio::test]
async fn test_generative_pipeline_falls_back() {
    let indexer = interview_guide_indexer();
    let generator = Arc::new(ScriptedGenerator::failing("provider down"));
    let pipeline = QueryPipeline::new(
        Arc::clone(indexer.corpus()),
        ScopeClassifier::default(),
        Retriever::default(),
        Arc::new(GenerativeSynthesizer::new(
            generator.clone(),
            ExtractiveSynthesizer::default(),
            GenerativeConfig::default(),
        )),
    );
    assert_eq!(pipeline.synthesis_mode(), SynthesisMode::Generative);

    let generative = pipeline.answer("How many interviews are there?").await;
    let extractive = extractive_pipeline(&indexer)
        .answer("How many interviews are there?")
        .await;

    assert_eq!(generative.answer.strategy, Some(Strategy::ExtractiveFallback));
    assert_eq!(generative.answer.text, extractive.answer.text);
    assert_eq!(generator.calls(), 1);

    let refused = pipeline.answer("What is the weather today?").await;
    assert_eq!(refused.answer.text, OUT_OF_SCOPE_RESPONSE);
    assert_eq!(generator.calls(), 1, "refusals never reach the generator");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_queries_during_ingestion_see_whole_documents() {
    let indexer = Arc::new(interview_guide_indexer());
    let pipeline = Arc::new(extractive_pipeline(&indexer));

    let writer = {
        let indexer = Arc::clone(&indexer);
        tokio::task::spawn_blocking(move || {
            for i in 0..20 {
                let text = format!(
                    "Meeting Notes {i}\nThe planning meeting number {i} reviewed the hiring budget.\n\
                     Action items for meeting {i} were assigned to the recruiting team."
                );
                indexer
                    .ingest(NewDocument::plain_text(format!("notes-{i}.txt"), text))
                    .unwrap();
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..4 {
        let pipeline = Arc::clone(&pipeline);
        readers.push(tokio::spawn(async move {
            for _ in 0..25 {
                let outcome = pipeline.answer("How many interviews are there?").await;
                assert_eq!(outcome.answer.provenance, Provenance::Documents);
                assert!(outcome.answer.text.contains('5'));
                for scored in &outcome.chunks {
                    assert!(scored.score > 0.0);
                }
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
    assert_eq!(indexer.corpus().snapshot().documents().len(), 21);
}
