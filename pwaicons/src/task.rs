use crate::{GeneratedIcon, IconBatch, Progress};
use std::time::Instant;

/// Logs one `[i/N] icon-SxS.png [Tms]` line per generated icon.
pub struct TaskRunner {
    now: Instant,
    started: Instant,
    completed: usize,
}

impl TaskRunner {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            now,
            started: now,
            completed: 0,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for TaskRunner {
    fn icon_generated(&mut self, done: usize, total: usize, icon: &GeneratedIcon) {
        let time = self.now.elapsed();
        tracing::info!(
            "[{}/{}] {} [{}ms]",
            done,
            total,
            icon.file_name(),
            time.as_millis()
        );
        self.completed = done;
        self.now = Instant::now();
    }

    fn batch_finished(&mut self, batch: &IconBatch) {
        tracing::info!(
            "generated {} icon sizes [{}ms]",
            batch.len(),
            self.started.elapsed().as_millis()
        );
    }

    fn batch_failed(&mut self, error: &anyhow::Error) {
        tracing::error!(
            "[ERROR] icon generation failed after {} icons: {:#}",
            self.completed,
            error
        );
    }
}
