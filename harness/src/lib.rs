//! Load generator for a memcache-backed queue: fans a fixed number of timed
//! push or pop operations out over independent workers and reports the
//! aggregate throughput.

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod queue;
pub mod reporter;
pub mod run_log;
pub mod worker;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use backend::Backend;
use config::RunConfig;
use dispatcher::Dispatcher;
use reporter::Report;

/// One full run: queue setup, the timed dispatch, then the report.
///
/// `connect` builds a fresh backend for the setup step and for every worker.
/// Only the dispatch is timed.
pub async fn run<F, B>(config: Arc<RunConfig>, connect: F) -> Report
where
    F: Fn() -> B,
    B: Backend + 'static,
{
    let mut setup = connect();
    queue::prepare_queue(&mut setup, &config).await;
    drop(setup);

    tracing::info!(
        "Dispatching {} {} workers, {} operations each, {} of {} attempted",
        config.concurrency,
        config.mode,
        config.per_worker(),
        config.attempted(),
        config.count
    );
    let dispatcher = Dispatcher::new(config.clone(), connect);
    let (signalled, report) = reporter::measure(config.count, dispatcher.dispatch()).await;
    tracing::debug!("{} of {} workers signalled completion", signalled, config.concurrency);

    report
}
