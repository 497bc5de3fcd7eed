use std::{
    future::Future,
    time::{Duration, Instant},
};

/// Wall-clock result of the dispatch phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    /// Requested operation count, including any remainder the split dropped.
    pub total: usize,
    pub elapsed: Duration,
}

impl Report {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn throughput(&self) -> f64 {
        self.total as f64 / self.seconds()
    }

    pub fn summary(&self) -> String {
        format!(
            "Spend: {:.3}s Speed: {:.3} msg/s",
            self.seconds(),
            self.throughput()
        )
    }

    /// Writes the summary to stdout and to the run log.
    pub fn emit(&self) {
        let summary = self.summary();
        println!("StressTest Done!");
        println!("{}", summary);

        tracing::info!("StressTest Done!");
        tracing::info!("{}", summary);
    }
}

/// Times exactly the awaited `phase` and nothing else.
pub async fn measure<F: Future>(total: usize, phase: F) -> (F::Output, Report) {
    let start = Instant::now();
    let output = phase.await;
    let elapsed = start.elapsed();
    (output, Report { total, elapsed })
}
