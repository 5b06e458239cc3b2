use crate::config::Config;
use crate::error::HaploError;
use crate::haplogroup::search::{RankingMethod, SearchService};
use crate::haplogroup::test_sample::TestSample;
use crossbeam_channel::bounded;
use std::thread;

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub classified: usize,
    /// Failed samples, ordered by sample id.
    pub failures: Vec<HaploError>,
}

/// Classify independent samples on `config.worker_threads` workers, clustering
/// ties with `config.tie_epsilon`.
///
/// The search service is shared read-only; a failing sample keeps its previous
/// results and does not stop the others.
pub fn classify_all(
    samples: &mut [TestSample],
    service: &dyn SearchService,
    ranking: &dyn RankingMethod,
    config: &Config,
) -> BatchOutcome {
    let num_threads = config.worker_threads.max(1);
    let tie_epsilon = config.tie_epsilon;
    let (tx, rx) = bounded::<&mut TestSample>(num_threads * 2);

    let mut outcome = thread::scope(|scope| {
        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                let rx = rx.clone();
                scope.spawn(move || {
                    let mut local = BatchOutcome::default();
                    while let Ok(sample) = rx.recv() {
                        sample.set_tie_epsilon(tie_epsilon);
                        match sample.update_results(service, ranking) {
                            Ok(()) => local.classified += 1,
                            Err(e) => {
                                tracing::warn!("Error classifying sample: {}", e);
                                local.failures.push(e);
                            }
                        }
                    }
                    local
                })
            })
            .collect();
        drop(rx);

        for sample in samples.iter_mut() {
            if tx.send(sample).is_err() {
                break;
            }
        }
        drop(tx);

        let mut outcome = BatchOutcome::default();
        for handle in handles {
            match handle.join() {
                Ok(local) => {
                    outcome.classified += local.classified;
                    outcome.failures.extend(local.failures);
                }
                Err(_) => tracing::warn!("Classification worker panicked"),
            }
        }
        outcome
    });

    outcome
        .failures
        .sort_by(|a, b| a.sample_id().cmp(&b.sample_id()));
    tracing::info!(
        "Classified {} samples ({} failed)",
        outcome.classified,
        outcome.failures.len()
    );
    outcome
}
