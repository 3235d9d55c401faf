//! Sequential generation pipeline.
//!
//! Chunks the document, drives every chunk through one generation call
//! with the instruction prefix, cleans each response, and concatenates
//! the results in chunk order. Strictly sequential: a second call is
//! never issued before the first completes, and the first failure aborts
//! the whole run with no partial output.

use tracing::{debug, info};

use crate::chunker;
use crate::error::Result;
use crate::llm::Generator;
use crate::postprocess::PostProcessor;
use crate::progress::ProgressSink;

/// Runs documents through a generation capability chunk by chunk.
pub struct Pipeline<G> {
    generator: G,
    postprocessor: PostProcessor,
    size: usize,
}

impl<G: Generator> Pipeline<G> {
    /// Create a pipeline with the default cleanup filters.
    pub fn new(generator: G, size: usize) -> Self {
        Self {
            generator,
            postprocessor: PostProcessor::default(),
            size,
        }
    }

    /// Replace the response post-processor.
    pub fn with_postprocessor(mut self, postprocessor: PostProcessor) -> Self {
        self.postprocessor = postprocessor;
        self
    }

    /// Process `document`, prefixing every chunk with `instruction`.
    ///
    /// Progress is reported to `progress` once per chunk, empty chunks
    /// included; empty chunks never reach the generator.
    pub async fn run(
        &self,
        document: &str,
        instruction: &str,
        progress: &dyn ProgressSink,
    ) -> Result<String> {
        let chunks = chunker::chunk(document, self.size)?;
        progress.begin(chunks.len() as u64);

        info!(
            chunks = chunks.len(),
            model = self.generator.model_name(),
            "Starting pipeline"
        );

        let mut result = String::new();
        for (index, chunk) in chunks.iter().enumerate() {
            progress.tick();

            let response = if chunk.is_empty() {
                String::new()
            } else {
                debug!(chunk = index, bytes = chunk.len(), "Generating");
                self.generator
                    .generate(&format!("{instruction}{chunk}"))
                    .await?
            };

            result.push_str(&self.postprocessor.apply(&response));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::error::Error;
    use crate::progress::NullProgress;

    /// Generator stub answering "ok-N" for the Nth call, optionally
    /// failing on one of them. Clones share the recorded prompts.
    #[derive(Clone)]
    struct StubGenerator {
        prompts: Arc<Mutex<Vec<String>>>,
        fail_on_call: Option<usize>,
    }

    impl StubGenerator {
        fn new() -> Self {
            Self {
                prompts: Arc::new(Mutex::new(Vec::new())),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::new()
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            let call = prompts.len();
            if self.fail_on_call == Some(call) {
                return Err(Error::Generation {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(format!("ok-{call}"))
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    #[derive(Default)]
    struct CountingSink {
        total: AtomicU64,
        ticks: AtomicU64,
    }

    impl ProgressSink for CountingSink {
        fn begin(&self, total: u64) {
            self.total.store(total, Ordering::SeqCst);
        }

        fn tick(&self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn responses_concatenate_in_chunk_order() {
        // "aa.bb.cc" at budget 3 chunks into ["aa.", "bb.", "cc"].
        let stub = StubGenerator::new();
        let sink = CountingSink::default();
        let pipeline = Pipeline::new(stub.clone(), 3);

        let result = pipeline.run("aa.bb.cc", "fix: ", &sink).await.unwrap();

        assert_eq!(result, "ok-1ok-2ok-3");
        assert_eq!(
            stub.prompts(),
            vec!["fix: aa.", "fix: bb.", "fix: cc"],
            "one call per chunk, instruction prefixed, in order"
        );
        assert_eq!(sink.total.load(Ordering::SeqCst), 3);
        assert_eq!(sink.ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failure_aborts_without_further_calls() {
        let stub = StubGenerator::failing_on(2);
        let pipeline = Pipeline::new(stub.clone(), 3);

        let err = pipeline
            .run("aa.bb.cc", "fix: ", &NullProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Generation { status: 500, .. }));
        assert_eq!(stub.prompts().len(), 2, "no call after the failure");
    }

    #[tokio::test]
    async fn empty_chunks_are_skipped_but_ticked() {
        // "aaaaaa" at budget 3 chunks into ["aaa", "aaa", ""].
        let stub = StubGenerator::new();
        let sink = CountingSink::default();
        let pipeline = Pipeline::new(stub.clone(), 3);

        let result = pipeline.run("aaaaaa", "", &sink).await.unwrap();

        assert_eq!(result, "ok-1ok-2");
        assert_eq!(stub.prompts().len(), 2);
        assert_eq!(sink.ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn responses_are_postprocessed() {
        struct Quoting;

        #[async_trait]
        impl Generator for Quoting {
            async fn generate(&self, _prompt: &str) -> Result<String> {
                Ok("\"Here is the corrected text: Hello.\"".to_string())
            }

            fn model_name(&self) -> &str {
                "quoting"
            }
        }

        let pipeline = Pipeline::new(Quoting, 1024);
        let result = pipeline.run("hi", "", &NullProgress).await.unwrap();
        assert_eq!(result, " Hello.");
    }

    #[tokio::test]
    async fn invalid_size_fails_before_any_call() {
        let stub = StubGenerator::new();
        let pipeline = Pipeline::new(stub.clone(), 0);

        let err = pipeline.run("text", "", &NullProgress).await.unwrap_err();

        assert!(matches!(err, Error::InvalidChunkSize(0)));
        assert!(stub.prompts().is_empty());
    }
}
