//! Rayon-backed resolution of history batches.

use rayon::prelude::*;
use tracing::warn;

use crate::client::{RequestContext, TwinService};
use crate::errors::TwinRefResult;
use crate::models::Query;
use crate::resolver::lookup::{log_summary, BatchOutcome, ReferenceResolver, Resolution};

impl<S: TwinService> ReferenceResolver<S> {
    /// Like `resolve_batch`, with per-batch lookups spread over at most
    /// `options.workers` threads.
    ///
    /// References and notices keep the input batch order. Falls back to
    /// sequential processing if the thread pool cannot be built.
    pub fn resolve_batch_parallel(
        &self,
        ctx: &RequestContext,
        query: &Query,
    ) -> TwinRefResult<Resolution> {
        let batches = self.fetch_history(ctx, query)?;
        if batches.is_empty() {
            log_summary(0, &Resolution::default());
            return Ok(Resolution::default());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers.max(1))
            .build();

        let outcomes: Vec<BatchOutcome> = match pool {
            Ok(pool) => pool.install(|| {
                batches
                    .par_iter()
                    .map(|batch| self.resolve_one(ctx, query, batch))
                    .collect()
            }),
            Err(e) => {
                warn!("Failed to build resolver thread pool, resolving sequentially: {e}");
                batches
                    .iter()
                    .map(|batch| self.resolve_one(ctx, query, batch))
                    .collect()
            }
        };

        let resolution = Resolution::from_outcomes(outcomes);
        log_summary(batches.len(), &resolution);
        Ok(resolution)
    }
}
