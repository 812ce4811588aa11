//! Background sync worker.
//!
//! # Responsibility
//! - Run `VersionSync` jobs off the editing thread.
//! - Expose outcomes through a non-blocking drain.
//!
//! # Invariants
//! - The job queue is bounded; a full queue rejects instead of blocking.
//! - Jobs run one at a time in submission order.

use super::{SyncError, SyncReport, SyncResult, VersionSync};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Result of one background job.
#[derive(Debug)]
pub struct SyncOutcome {
    pub path: PathBuf,
    pub result: SyncResult<SyncReport>,
}

/// Single-thread worker owning a `VersionSync` implementation.
pub struct SyncWorker {
    jobs: Option<SyncSender<PathBuf>>,
    outcomes: Receiver<SyncOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl SyncWorker {
    /// Spawns the worker thread with a queue of `capacity` pending jobs.
    pub fn spawn<V>(sync: V, capacity: usize) -> SyncResult<Self>
    where
        V: VersionSync + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::sync_channel::<PathBuf>(capacity.max(1));
        let (outcome_tx, outcome_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("blogdesk-sync".to_string())
            .spawn(move || {
                for path in job_rx {
                    let result = sync.stage_and_push(&path);
                    if outcome_tx.send(SyncOutcome { path, result }).is_err() {
                        break;
                    }
                }
            })
            .map_err(SyncError::ToolUnavailable)?;

        info!("event=sync_worker_start module=sync status=ok capacity={capacity}");
        Ok(Self {
            jobs: Some(job_tx),
            outcomes: outcome_rx,
            handle: Some(handle),
        })
    }

    /// Queues a sync of `path` without blocking.
    pub fn submit(&self, path: &Path) -> SyncResult<()> {
        let Some(jobs) = self.jobs.as_ref() else {
            return Err(SyncError::WorkerStopped);
        };
        match jobs.try_send(path.to_path_buf()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!("event=sync_submit module=sync status=rejected error_code=queue_full");
                Err(SyncError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => Err(SyncError::WorkerStopped),
        }
    }

    /// Returns every outcome finished since the last call.
    pub fn try_results(&self) -> Vec<SyncOutcome> {
        self.outcomes.try_iter().collect()
    }

    /// Stops accepting jobs, waits for queued ones, and returns their outcomes.
    pub fn shutdown(mut self) -> Vec<SyncOutcome> {
        self.stop();
        self.outcomes.try_iter().collect()
    }

    fn stop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=sync_worker_stop module=sync status=error error_code=worker_panicked");
            }
        }
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::SyncWorker;
    use crate::sync::{SyncError, SyncReport, SyncResult, VersionSync};
    use std::path::{Path, PathBuf};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;

    struct RecordingSync;

    impl VersionSync for RecordingSync {
        fn stage_and_push(&self, path: &Path) -> SyncResult<SyncReport> {
            Ok(SyncReport {
                path: path.to_path_buf(),
                commit_message: "msg".to_string(),
                committed: true,
            })
        }
    }

    struct GatedSync {
        gate: Mutex<Receiver<()>>,
    }

    impl VersionSync for GatedSync {
        fn stage_and_push(&self, path: &Path) -> SyncResult<SyncReport> {
            let _ = self.gate.lock().unwrap().recv();
            Err(SyncError::NotARepository(path.to_path_buf()))
        }
    }

    fn gated() -> (GatedSync, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (
            GatedSync {
                gate: Mutex::new(rx),
            },
            tx,
        )
    }

    #[test]
    fn jobs_complete_in_submission_order() {
        let worker = SyncWorker::spawn(RecordingSync, 4).unwrap();
        worker.submit(Path::new("a.json")).unwrap();
        worker.submit(Path::new("b.json")).unwrap();

        let outcomes = worker.shutdown();
        let paths: Vec<PathBuf> = outcomes.iter().map(|o| o.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }

    #[test]
    fn full_queue_rejects_without_blocking() {
        let (sync, gate) = gated();
        let worker = SyncWorker::spawn(sync, 1).unwrap();

        // Worker blocks on the first job; one more fits the queue.
        let mut rejected = false;
        for _ in 0..4 {
            if let Err(err) = worker.submit(Path::new("blog.json")) {
                assert!(matches!(err, SyncError::QueueFull));
                rejected = true;
                break;
            }
        }
        assert!(rejected);

        for _ in 0..4 {
            let _ = gate.send(());
        }
        drop(gate);
        let outcomes = worker.shutdown();
        assert!(!outcomes.is_empty());
        assert!(outcomes
            .iter()
            .all(|o| matches!(o.result, Err(SyncError::NotARepository(_)))));
    }
}
