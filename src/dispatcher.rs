//! Concurrent packing of order batches.
//!
//! Orders are independent, so a batch fans out over a bounded rayon pool.
//! Every order carries its input position through the pool and the results
//! are sorted by it at the end, so the output order never depends on which
//! worker finished first.

use rayon::prelude::*;

use crate::model::{Order, PackingResponse};
use crate::optimizer::pack_order;

/// Configuration for the batch dispatcher.
#[derive(Copy, Clone, Debug)]
pub struct DispatchConfig {
    /// Upper bound for concurrently running workers (at least 1)
    pub max_workers: usize,
}

impl DispatchConfig {
    pub const DEFAULT_MAX_WORKERS: usize = 10;

    /// Creates a builder for a custom configuration.
    pub fn builder() -> DispatchConfigBuilder {
        DispatchConfigBuilder::default()
    }

    /// Number of workers for a batch of `order_count` orders.
    pub fn worker_count(&self, order_count: usize) -> usize {
        self.max_workers.max(1).min(order_count)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_workers: Self::DEFAULT_MAX_WORKERS,
        }
    }
}

/// Builder for DispatchConfig.
#[derive(Clone, Debug, Default)]
pub struct DispatchConfigBuilder {
    config: DispatchConfig,
}

impl DispatchConfigBuilder {
    /// Sets the worker cap.
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.config.max_workers = workers;
        self
    }

    pub fn build(self) -> DispatchConfig {
        self.config
    }
}

/// A packed order tagged with the position of its source order.
struct JobResult {
    index: usize,
    response: PackingResponse,
}

/// Packs every order of a batch with the default worker cap.
///
/// # Returns
/// One `PackingResponse` per order, in input order
pub fn pack_batch(orders: Vec<Order>) -> Vec<PackingResponse> {
    pack_batch_with_config(orders, DispatchConfig::default())
}

/// Packs every order of a batch.
///
/// Runs on a dedicated pool of `min(config.max_workers, orders.len())`
/// threads. The pool is joined before this returns, so every result has been
/// produced by the time the tags are sorted.
pub fn pack_batch_with_config(orders: Vec<Order>, config: DispatchConfig) -> Vec<PackingResponse> {
    let order_count = orders.len();
    if order_count == 0 {
        return Vec::new();
    }

    let worker_count = config.worker_count(order_count);
    log::debug!(
        "Dispatching {} orders to {} workers",
        order_count,
        worker_count
    );

    let mut results = match rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .thread_name(|i| format!("packer-{i}"))
        .build()
    {
        Ok(pool) => pool.install(|| {
            orders
                .into_par_iter()
                .enumerate()
                .map(pack_tagged)
                .collect::<Vec<_>>()
        }),
        Err(err) => {
            log::warn!(
                "⚠️ Could not start worker pool: {}. Packing on the calling thread.",
                err
            );
            orders.into_iter().enumerate().map(pack_tagged).collect()
        }
    };

    results.sort_by_key(|result| result.index);
    debug_assert_eq!(results.len(), order_count);

    log::debug!("Batch of {} orders packed", order_count);
    results.into_iter().map(|result| result.response).collect()
}

fn pack_tagged((index, order): (usize, Order)) -> JobResult {
    JobResult {
        index,
        response: pack_order(&order),
    }
}
