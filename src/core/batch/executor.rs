//! Batch execution implementation.

use super::aggregate::{BatchProgress, CancellationToken, ResultBag};
use super::report::BatchReport;
use super::types::{FailureKind, ImagePair, PairFailure, ScoredPair};
use crate::core::loader::{FastDecoder, ImageLoader, ImageResizer};
use crate::core::scorer::{PairScore, PairScorer, ScorerConfig};
use crate::error::{BatchError, SimilarityError};
use crate::events::{null_sender, BatchEvent, BatchProgressUpdate, Event, EventSender};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Configuration for the batch runner
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchConfig {
    /// Worker threads (None = one per available CPU)
    pub threads: Option<usize>,
    /// Scorer configuration shared by every pair
    pub scorer: ScorerConfig,
}

/// Builder for [`BatchRunner`]
pub struct BatchRunnerBuilder {
    config: BatchConfig,
    loader: Option<Arc<dyn ImageLoader>>,
    resizer: Option<Arc<dyn ImageResizer>>,
    cancellation: CancellationToken,
}

impl BatchRunnerBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            config: BatchConfig::default(),
            loader: None,
            resizer: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Set the number of worker threads (0 = one per available CPU)
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = if threads == 0 { None } else { Some(threads) };
        self
    }

    /// Set the scorer configuration
    pub fn scorer_config(mut self, config: ScorerConfig) -> Self {
        self.config.scorer = config;
        self
    }

    /// Include the alpha channel when scoring
    pub fn include_alpha(mut self, include: bool) -> Self {
        self.config.scorer.include_alpha = include;
        self
    }

    /// Set the image loader
    pub fn loader(mut self, loader: Arc<dyn ImageLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Set the resizer used to conform mismatched pairs
    pub fn resizer(mut self, resizer: Arc<dyn ImageResizer>) -> Self {
        self.resizer = Some(resizer);
        self
    }

    /// Share a cancellation token with the runner
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Build the runner
    pub fn build(self) -> BatchRunner {
        let scorer = match self.resizer {
            Some(resizer) => PairScorer::with_resizer(self.config.scorer, resizer),
            None => PairScorer::new(self.config.scorer),
        };

        BatchRunner {
            config: self.config,
            scorer,
            loader: self.loader.unwrap_or_else(|| Arc::new(FastDecoder)),
            progress: Arc::new(BatchProgress::new()),
            cancellation: self.cancellation,
        }
    }
}

impl Default for BatchRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scores many image pairs in parallel
pub struct BatchRunner {
    config: BatchConfig,
    scorer: PairScorer,
    loader: Arc<dyn ImageLoader>,
    progress: Arc<BatchProgress>,
    cancellation: CancellationToken,
}

impl BatchRunner {
    /// Create a new runner builder
    pub fn builder() -> BatchRunnerBuilder {
        BatchRunnerBuilder::new()
    }

    /// The runner's configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Pollable progress counter for the current batch
    pub fn progress(&self) -> Arc<BatchProgress> {
        Arc::clone(&self.progress)
    }

    /// Token that stops the batch between pairs when cancelled
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Score `paths_a[i]` against `paths_b[i]` for every `i`.
    ///
    /// Fails with [`BatchError::BatchSizeMismatch`] before any pair is
    /// loaded if the lists differ in length.
    pub fn score_batch(
        &self,
        paths_a: &[PathBuf],
        paths_b: &[PathBuf],
    ) -> Result<BatchReport, BatchError> {
        self.score_batch_with_events(paths_a, paths_b, &null_sender())
    }

    /// [`score_batch`](Self::score_batch) with event reporting
    pub fn score_batch_with_events(
        &self,
        paths_a: &[PathBuf],
        paths_b: &[PathBuf],
        events: &EventSender,
    ) -> Result<BatchReport, BatchError> {
        if paths_a.len() != paths_b.len() {
            return Err(BatchError::BatchSizeMismatch {
                left: paths_a.len(),
                right: paths_b.len(),
            });
        }

        self.run_with_events(&ImagePair::zip(paths_a, paths_b), events)
    }

    /// Run the batch without events
    pub fn run(&self, pairs: &[ImagePair]) -> Result<BatchReport, BatchError> {
        self.run_with_events(pairs, &null_sender())
    }

    /// Run the batch with event reporting.
    ///
    /// Every pair yields exactly one record: a score or a failure. Only a
    /// worker pool that cannot start fails the whole call.
    pub fn run_with_events(
        &self,
        pairs: &[ImagePair],
        events: &EventSender,
    ) -> Result<BatchReport, BatchError> {
        let start_time = Instant::now();
        let total = pairs.len();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.unwrap_or(0))
            .thread_name(|i| format!("pixel-compare-{}", i))
            .build()
            .map_err(|e| BatchError::ThreadPool(e.to_string()))?;

        tracing::info!(
            total,
            threads = pool.current_num_threads(),
            kernel = %self.scorer.kernel(),
            "batch started"
        );

        self.progress.reset(total);
        events.send(Event::Batch(BatchEvent::Started { total_pairs: total }));

        let scores = ResultBag::with_capacity(total);
        let failures = ResultBag::new();
        let cancel_reported = AtomicBool::new(false);

        pool.install(|| {
            pairs.par_iter().for_each(|pair| {
                match self.run_unit(pair) {
                    Ok(score) => {
                        events.send(Event::Batch(BatchEvent::PairScored {
                            index: pair.index,
                            similarity: score.similarity,
                        }));
                        if let Some(note) = score.note() {
                            events.send(Event::Batch(BatchEvent::PairResized {
                                index: pair.index,
                                note,
                            }));
                        }

                        scores.push(ScoredPair {
                            index: pair.index,
                            a: pair.a.clone(),
                            b: pair.b.clone(),
                            similarity: score.similarity,
                            notes: score.notes,
                        });
                    }
                    Err((kind, message)) => {
                        if kind == FailureKind::Cancelled {
                            if !cancel_reported.swap(true, Ordering::SeqCst) {
                                tracing::info!("batch cancelled, skipping remaining pairs");
                                events.send(Event::Batch(BatchEvent::Cancelled));
                            }
                        } else {
                            tracing::warn!(index = pair.index, %message, "pair failed");
                            events.send(Event::Batch(BatchEvent::PairFailed {
                                index: pair.index,
                                message: message.clone(),
                            }));
                        }

                        failures.push(PairFailure {
                            index: pair.index,
                            a: pair.a.clone(),
                            b: pair.b.clone(),
                            kind,
                            message,
                        });
                    }
                }

                let completed = self.progress.record();
                events.send(Event::Batch(BatchEvent::Progress(BatchProgressUpdate {
                    completed,
                    total,
                    current_path: pair.a.clone(),
                })));
            });
        });

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let report = BatchReport::from_parts(total, scores.into_vec(), failures.into_vec(), duration_ms);

        tracing::info!(
            successful = report.successful,
            failed = report.failed(),
            duration_ms,
            "batch finished"
        );
        events.send(Event::Batch(BatchEvent::Completed {
            summary: report.summary(),
        }));

        Ok(report)
    }

    /// Load and score one pair.
    ///
    /// Both images are dropped when this returns, on success or error.
    pub fn score_pair(&self, pair: &ImagePair) -> Result<PairScore, SimilarityError> {
        let a = self.loader.load(&pair.a)?;
        let b = self.loader.load(&pair.b)?;
        Ok(self.scorer.score(&a, &b)?)
    }

    fn run_unit(&self, pair: &ImagePair) -> Result<PairScore, (FailureKind, String)> {
        if self.cancellation.is_cancelled() {
            return Err((FailureKind::Cancelled, "skipped: batch cancelled".to_string()));
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.score_pair(pair))) {
            Ok(Ok(score)) => Ok(score),
            Ok(Err(e)) => Err((FailureKind::classify(&e), e.to_string())),
            Err(payload) => Err((
                FailureKind::Panic,
                format!("unexpected failure: {}", panic_message(payload.as_ref())),
            )),
        }
    }
}

/// Score two path lists with the default runner (all CPUs, RGB, SIMD)
pub fn score_batch(paths_a: &[PathBuf], paths_b: &[PathBuf]) -> Result<BatchReport, BatchError> {
    BatchRunner::builder().build().score_batch(paths_a, paths_b)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
