//! Data-parallel accessibility fields.
//!
//! Start vertices are independent, so they are mapped in parallel with
//! rayon. Each worker builds its own [`Explorer`] through `map_init` and
//! keeps it for every start it is handed; the mesh is only ever read.

use std::sync::atomic::{AtomicUsize, Ordering};

use lec_core::{LecError, Mesh, VertexId};
use lec_paths::{AggregatedResult, CostModel, CostStrategy, Explorer, NeighborStrategy};
use rayon::prelude::*;

use crate::config::{FailurePolicy, LecConfig};

/// Outcome of a field computation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldReport {
    /// Total leaf distance per vertex; zero where nothing was computed.
    pub values: Vec<f64>,
    /// Number of start vertices with a result in `values`.
    pub processed: usize,
    /// Start vertices skipped under [`FailurePolicy::Skip`], in start order.
    pub failures: Vec<(VertexId, LecError)>,
}

/// Vertices eligible as starting points: elevation at or above `sea_level`.
pub fn candidate_starts(mesh: &Mesh, sea_level: f64) -> Vec<VertexId> {
    mesh.vertices_at_or_above(sea_level)
}

/// Store each result's total distance at its vertex index.
///
/// # Panics
///
/// Panics if a result names a vertex outside `values`.
pub fn write_back(values: &mut [f64], results: impl IntoIterator<Item = AggregatedResult>) {
    for r in results {
        values[r.vertex] = r.total_distance;
    }
}

/// Compute the accessibility field of `mesh` with the default cost and
/// neighbor strategies configured by `config`.
pub fn compute_field(mesh: &Mesh, config: &LecConfig) -> Result<FieldReport, LecError> {
    let starts = candidate_starts(mesh, config.sea_level);
    compute_field_with(
        mesh,
        config,
        &starts,
        config.cost_strategy(),
        config.neighbor_strategy(),
    )
}

/// Compute the field for the given start vertices with custom strategies.
///
/// Every worker receives its own copy of the strategies. The results do not
/// depend on the number of threads, the chunk size or the order of
/// `starts`. Under [`FailurePolicy::Abort`] the error of the first failing
/// start in `starts` order is returned.
pub fn compute_field_with<C, N>(
    mesh: &Mesh,
    config: &LecConfig,
    starts: &[VertexId],
    cost_fn: C,
    neighbor_fn: N,
) -> Result<FieldReport, LecError>
where
    C: CostStrategy + Clone + Send + Sync,
    N: NeighborStrategy + Clone + Send + Sync,
{
    config.validate()?;
    if let Some(&bad) = starts.iter().find(|&&v| !mesh.contains(v)) {
        return Err(LecError::InvalidVertex {
            vertex: bad,
            len: mesh.len(),
        });
    }

    log::info!(
        "computing accessibility from {} of {} vertices (fuel {})",
        starts.len(),
        mesh.len(),
        config.max_fuel
    );

    let outcomes = match config.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .map_err(|e| LecError::InvalidConfig(format!("cannot build thread pool: {e}")))?
            .install(|| evaluate_all(mesh, config, starts, &cost_fn, &neighbor_fn)),
        None => evaluate_all(mesh, config, starts, &cost_fn, &neighbor_fn),
    };

    let mut report = FieldReport {
        values: vec![0.0; mesh.len()],
        processed: 0,
        failures: Vec::new(),
    };
    let mut results = Vec::with_capacity(outcomes.len());
    for (start, outcome) in outcomes {
        match outcome {
            Ok(r) => results.push(r),
            Err(e) => match config.failure_policy {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Skip => {
                    log::warn!("skipping start vertex {start}: {e}");
                    report.failures.push((start, e));
                }
            },
        }
    }
    report.processed = results.len();
    write_back(&mut report.values, results);

    log::info!(
        "accessibility done: {} computed, {} skipped",
        report.processed,
        report.failures.len()
    );
    Ok(report)
}

fn evaluate_all<C, N>(
    mesh: &Mesh,
    config: &LecConfig,
    starts: &[VertexId],
    cost_fn: &C,
    neighbor_fn: &N,
) -> Vec<(VertexId, Result<AggregatedResult, LecError>)>
where
    C: CostStrategy + Clone + Send + Sync,
    N: NeighborStrategy + Clone + Send + Sync,
{
    let capacity = config.cache_capacity(mesh);
    let done = AtomicUsize::new(0);
    let total = starts.len();

    starts
        .par_iter()
        .with_min_len(config.chunk_size)
        .map_init(
            || {
                log::debug!(
                    "creating explorer on worker {:?}",
                    rayon::current_thread_index()
                );
                CostModel::with_strategies(mesh, cost_fn.clone(), neighbor_fn.clone(), capacity)
                    .and_then(|model| Explorer::with_model(model, config.max_fuel))
                    .map(|ex| ex.with_frontier_limit(config.frontier_limit))
            },
            |explorer, &start| {
                let outcome = match explorer {
                    Ok(ex) => ex.evaluate(start),
                    Err(e) => Err(e.clone()),
                };
                report_progress(&done, total, config.progress_interval);
                (start, outcome)
            },
        )
        .collect()
}

fn report_progress(done: &AtomicUsize, total: usize, interval: usize) {
    let n = done.fetch_add(1, Ordering::Relaxed) + 1;
    if interval > 0 && (n % interval == 0 || n == total) {
        log::info!("progress: {:7.3} %", n as f64 / total as f64 * 100.0);
    }
}
