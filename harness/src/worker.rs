use std::time::{Duration, Instant};

use tokio::sync::mpsc::Sender;

use crate::{backend::Backend, config::Mode};

/// Sent once by every worker when its batch is finished. Carries nothing:
/// the dispatcher only counts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion;

/// Value written by `worker` on `iteration`. Unique per pair and stable across runs.
pub fn value_for(worker: usize, iteration: usize) -> String {
    format!("Value-c{}:{}", worker, iteration)
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// One sequential batch of timed operations against a backend the worker owns.
pub struct Worker<B> {
    index: usize,
    count: usize,
    mode: Mode,
    key: String,
    backend: B,
    done: Sender<Completion>,
}

impl<B: Backend> Worker<B> {
    pub fn new(
        index: usize,
        count: usize,
        mode: Mode,
        key: String,
        backend: B,
        done: Sender<Completion>,
    ) -> Self {
        Self {
            index,
            count,
            mode,
            key,
            backend,
            done,
        }
    }

    /// Runs the whole batch, then signals completion. Failed operations are
    /// logged and skipped; they never end the batch early.
    pub async fn run(mut self) {
        match self.mode {
            Mode::Push => self.push_batch().await,
            Mode::Pop => self.pop_batch().await,
        }

        if self.done.send(Completion).await.is_err() {
            tracing::warn!("c{} finished after the dispatcher stopped listening", self.index);
        }
    }

    async fn push_batch(&mut self) {
        for i in 0..self.count {
            let value = value_for(self.index, i);
            let start = Instant::now();
            match self.backend.set(&self.key, &value).await {
                Ok(()) => {
                    let spent = millis(start.elapsed());
                    tracing::info!("set succ: {} - {} spend: {:.3}ms", self.key, value, spent);
                }
                Err(e) => tracing::warn!("set error: c{} {}", self.index, e),
            }
        }
    }

    async fn pop_batch(&mut self) {
        for _ in 0..self.count {
            let start = Instant::now();
            match self.backend.get(&self.key).await {
                Ok(value) => {
                    let spent = millis(start.elapsed());
                    tracing::info!(
                        "get succ: {} - {} spend: {:.3}ms",
                        self.key,
                        String::from_utf8_lossy(&value),
                        spent
                    );
                }
                Err(e) => tracing::warn!("get error: c{} {}", self.index, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;
    use std::collections::HashSet;
    use tokio::sync::mpsc;

    #[test]
    fn test_value_format() {
        assert_eq!(value_for(0, 0), "Value-c0:0");
        assert_eq!(value_for(7, 123), "Value-c7:123");
    }

    #[test]
    fn test_values_unique_across_workers() {
        // c1:11 and c11:1 must not collide
        let mut seen = HashSet::new();
        for worker in 0..12 {
            for iteration in 0..12 {
                assert!(seen.insert(value_for(worker, iteration)));
            }
        }
        assert_eq!(seen.len(), 144);
    }

    #[tokio::test]
    async fn test_push_batch_sets_topic_key() {
        let recorder = Recorder::default();
        let (tx, mut rx) = mpsc::channel(1);

        let worker = Worker::new(2, 5, Mode::Push, "StressTestTool".to_string(), recorder.backend(), tx);
        worker.run().await;

        assert_eq!(rx.recv().await, Some(Completion));
        let calls = recorder.calls();
        assert_eq!(calls.len(), 5);
        for (i, call) in calls.iter().enumerate() {
            assert_eq!(call.op, "set");
            assert_eq!(call.key, "StressTestTool");
            assert_eq!(call.value.as_deref(), Some(format!("Value-c2:{}", i).as_str()));
        }
    }

    #[tokio::test]
    async fn test_pop_batch_gets_line_key() {
        let recorder = Recorder::default();
        let (tx, mut rx) = mpsc::channel(1);

        let worker = Worker::new(0, 4, Mode::Pop, "StressTestTool/Line".to_string(), recorder.backend(), tx);
        worker.run().await;

        assert_eq!(rx.recv().await, Some(Completion));
        assert_eq!(recorder.count("get"), 4);
        assert!(recorder.calls().iter().all(|c| c.key == "StressTestTool/Line"));
    }

    #[tokio::test]
    async fn test_failures_do_not_end_the_batch() {
        let recorder = Recorder::default();
        let (tx, mut rx) = mpsc::channel(1);
        let backend = recorder.backend().failing_on(&[0, 2, 3]);

        let worker = Worker::new(1, 6, Mode::Push, "StressTestTool".to_string(), backend, tx);
        worker.run().await;

        assert_eq!(rx.recv().await, Some(Completion));
        let values: Vec<_> = recorder.calls().into_iter().filter_map(|c| c.value).collect();
        let expected: Vec<_> = (0..6).map(|i| value_for(1, i)).collect();
        assert_eq!(values, expected);
    }

    #[tokio::test]
    async fn test_unreachable_backend_still_signals() {
        let recorder = Recorder::default();
        let (tx, mut rx) = mpsc::channel(1);

        let worker = Worker::new(0, 3, Mode::Pop, "t/l".to_string(), recorder.unreachable(), tx);
        worker.run().await;

        assert_eq!(rx.recv().await, Some(Completion));
        assert_eq!(recorder.count("get"), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_still_signals() {
        let recorder = Recorder::default();
        let (tx, mut rx) = mpsc::channel(1);

        Worker::new(0, 0, Mode::Push, "t".to_string(), recorder.backend(), tx)
            .run()
            .await;

        assert_eq!(rx.recv().await, Some(Completion));
        assert!(recorder.calls().is_empty());
    }
}
