use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    backend::Backend,
    config::RunConfig,
    worker::{Completion, Worker},
};

/// Fans a run out over `concurrency` workers and waits for all of them.
pub struct Dispatcher<F> {
    config: Arc<RunConfig>,
    connect: F,
}

impl<F, B> Dispatcher<F>
where
    F: Fn() -> B,
    B: Backend + 'static,
{
    /// `connect` is called once per worker; no backend is shared between workers.
    pub fn new(config: Arc<RunConfig>, connect: F) -> Self {
        Self { config, connect }
    }

    /// Launches every worker and drains one completion per worker, in
    /// whatever order they arrive. Returns the number drained, which is
    /// short of `concurrency` only when a worker died without signalling.
    pub async fn dispatch(&self) -> usize {
        let workers = self.config.concurrency;
        let per_worker = self.config.per_worker();
        let key = self.config.key();
        let verb = self.config.mode.verb();

        let (done_tx, mut done_rx) = mpsc::channel::<Completion>(workers.max(1));
        for cn in 0..workers {
            let worker = Worker::new(
                cn,
                per_worker,
                self.config.mode,
                key.clone(),
                (self.connect)(),
                done_tx.clone(),
            );
            tokio::spawn(worker.run());
        }
        drop(done_tx);

        let mut drained = 0;
        while drained < workers {
            match done_rx.recv().await {
                Some(Completion) => {
                    tracing::info!("{} single succ: {} - c{}", verb, key, drained);
                    drained += 1;
                }
                None => {
                    tracing::error!(
                        "{} of {} workers exited without signalling completion",
                        workers - drained,
                        workers
                    );
                    break;
                }
            }
        }
        drained
    }
}
