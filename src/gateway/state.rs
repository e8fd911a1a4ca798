use std::sync::Arc;

use crate::config::Config;
use crate::corpus::Corpus;
use crate::index::Indexer;
use crate::ingest::IngestService;
use crate::pipeline::QueryPipeline;
use crate::retrieval::Retriever;
use crate::scope::ScopeClassifier;
use crate::storage::DocumentArchive;
use crate::synthesis::{
    AnswerSynthesizer, ExtractiveSynthesizer, GenaiGenerator, GenerativeSynthesizer,
    MockGenerator, SynthesisMode, TextGenerator,
};

#[derive(Clone)]
pub struct HandlerState {
    pub pipeline: Arc<QueryPipeline>,

    pub ingest: Arc<IngestService>,

    pub mock_provider: bool,
}

impl HandlerState {
    pub fn new(pipeline: Arc<QueryPipeline>, ingest: Arc<IngestService>) -> Self {
        Self::new_with_mock_provider(pipeline, ingest, false)
    }

    pub fn new_with_mock_provider(
        pipeline: Arc<QueryPipeline>,
        ingest: Arc<IngestService>,
        mock_provider: bool,
    ) -> Self {
        Self {
            pipeline,
            ingest,
            mock_provider,
        }
    }

    /// Wires a fresh corpus, its indexer and the query pipeline around `archive`.
    ///
    /// The corpus starts empty; call [`IngestService::hydrate`] to restore
    /// archived documents.
    pub fn from_config(config: &Config, archive: Arc<dyn DocumentArchive>) -> Self {
        let corpus = Arc::new(Corpus::new());
        let indexer = Arc::new(Indexer::new(Arc::clone(&corpus), config.indexer_config()));
        let ingest = Arc::new(IngestService::new(indexer, archive, config.ingest_config()));

        let pipeline = Arc::new(QueryPipeline::new(
            corpus,
            ScopeClassifier::new(config.scope_config()),
            Retriever::new(config.retriever_config()),
            build_synthesizer(config),
        ));

        Self::new_with_mock_provider(pipeline, ingest, config.mock_provider)
    }

    pub fn generator_mode(&self) -> &'static str {
        match (self.pipeline.synthesis_mode(), self.mock_provider) {
            (SynthesisMode::Extractive, _) => "none",
            (SynthesisMode::Generative, true) => "mock",
            (SynthesisMode::Generative, false) => "provider",
        }
    }
}

fn build_synthesizer(config: &Config) -> Arc<dyn AnswerSynthesizer> {
    match config.synthesis {
        SynthesisMode::Extractive => Arc::new(ExtractiveSynthesizer::default()),
        SynthesisMode::Generative => {
            let generator: Arc<dyn TextGenerator> = if config.mock_provider {
                Arc::new(MockGenerator::new())
            } else {
                Arc::new(GenaiGenerator::new(config.generation_model.clone()))
            };
            tracing::info!(
                generator = generator.name(),
                model = %config.generation_model,
                timeout_ms = config.generation_timeout.as_millis() as u64,
                "Generative synthesis enabled"
            );
            Arc::new(GenerativeSynthesizer::new(
                generator,
                ExtractiveSynthesizer::default(),
                config.generative_config(),
            ))
        }
    }
}

#[cfg(any(test, feature = "mock"))]
impl HandlerState {
    /// State over an in-memory archive with default settings.
    pub fn in_memory() -> Self {
        Self::in_memory_with(&Config::default())
    }

    pub fn in_memory_with(config: &Config) -> Self {
        Self::from_config(config, Arc::new(crate::storage::MemoryArchive::new()))
    }
}
