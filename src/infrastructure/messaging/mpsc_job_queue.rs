use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use crate::application::ports::job_queue::{JobQueue, JobQueueError};
use crate::domain::entities::IngestionJob;

/// In-process queue between the HTTP side and the worker pool. Jobs sit
/// in a pending map until a worker picks them up, which is what makes
/// queue-level removal possible before execution starts.
pub struct MpscJobQueue {
    sender: mpsc::UnboundedSender<IngestionJob>,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<IngestionJob>>>,
    pending_jobs: Arc<Mutex<HashMap<String, IngestionJob>>>,
    stats: Arc<Mutex<QueueStats>>,
}

#[derive(Debug, Clone)]
struct QueueStats {
    total_enqueued: u64,
    total_dequeued: u64,
    last_activity: Option<chrono::DateTime<chrono::Utc>>,
}

impl QueueStats {
    fn new() -> Self {
        Self {
            total_enqueued: 0,
            total_dequeued: 0,
            last_activity: None,
        }
    }
}

impl MpscJobQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            pending_jobs: Arc::new(Mutex::new(HashMap::new())),
            stats: Arc::new(Mutex::new(QueueStats::new())),
        }
    }

    /// Splits the queue into the HTTP-side sender half and the receiver
    /// half the worker pool consumes. Both halves share the pending map,
    /// so a removal on the queue side is observed by the workers.
    pub fn create_pair() -> (Self, MpscJobQueueReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending_jobs = Arc::new(Mutex::new(HashMap::new()));
        let stats = Arc::new(Mutex::new(QueueStats::new()));

        let queue = Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            pending_jobs: pending_jobs.clone(),
            stats: stats.clone(),
        };

        let worker_receiver = MpscJobQueueReceiver {
            receiver: queue.receiver.clone(),
            pending_jobs,
            stats,
        };

        (queue, worker_receiver)
    }
}

#[async_trait]
impl JobQueue for MpscJobQueue {
    async fn enqueue(&self, job: IngestionJob) -> Result<(), JobQueueError> {
        {
            let mut pending = self.pending_jobs.lock().await;
            pending.insert(job.file_id().to_string(), job.clone());
        }

        self.sender
            .send(job)
            .map_err(|_| JobQueueError::ConnectionError("Channel closed".to_string()))?;

        {
            let mut stats = self.stats.lock().await;
            stats.total_enqueued += 1;
            stats.last_activity = Some(chrono::Utc::now());
        }

        Ok(())
    }

    async fn dequeue(&self) -> Result<IngestionJob, JobQueueError> {
        loop {
            let job = {
                let mut receiver = self.receiver.lock().await;
                receiver.recv().await
            };

            match job {
                Some(job) => {
                    if !self.claim(&job).await {
                        // Removed before execution; skip it.
                        continue;
                    }
                    return Ok(job);
                }
                None => {
                    return Err(JobQueueError::ConnectionError("Channel closed".to_string()));
                }
            }
        }
    }

    async fn try_dequeue(&self) -> Result<Option<IngestionJob>, JobQueueError> {
        loop {
            let job = {
                let mut receiver = self.receiver.lock().await;
                receiver.try_recv()
            };

            match job {
                Ok(job) => {
                    if !self.claim(&job).await {
                        continue;
                    }
                    return Ok(Some(job));
                }
                Err(mpsc::error::TryRecvError::Empty) => return Ok(None),
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    return Err(JobQueueError::ConnectionError("Channel closed".to_string()));
                }
            }
        }
    }

    async fn remove(&self, file_id: &str) -> Result<bool, JobQueueError> {
        let mut pending = self.pending_jobs.lock().await;
        Ok(pending.remove(file_id).is_some())
    }

    async fn len(&self) -> Result<usize, JobQueueError> {
        let pending = self.pending_jobs.lock().await;
        Ok(pending.len())
    }
}

impl MpscJobQueue {
    async fn claim(&self, job: &IngestionJob) -> bool {
        let claimed = {
            let mut pending = self.pending_jobs.lock().await;
            pending.remove(job.file_id()).is_some()
        };

        if claimed {
            let mut stats = self.stats.lock().await;
            stats.total_dequeued += 1;
            stats.last_activity = Some(chrono::Utc::now());
        }

        claimed
    }
}

impl Default for MpscJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver half held by the worker pool.
pub struct MpscJobQueueReceiver {
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<IngestionJob>>>,
    pending_jobs: Arc<Mutex<HashMap<String, IngestionJob>>>,
    stats: Arc<Mutex<QueueStats>>,
}

impl MpscJobQueueReceiver {
    /// Next job that has not been removed, or `None` once the sender
    /// side is gone and the channel is drained.
    pub async fn recv(&self) -> Option<IngestionJob> {
        loop {
            let job = {
                let mut receiver = self.receiver.lock().await;
                receiver.recv().await?
            };

            let claimed = {
                let mut pending = self.pending_jobs.lock().await;
                pending.remove(job.file_id()).is_some()
            };

            if claimed {
                let mut stats = self.stats.lock().await;
                stats.total_dequeued += 1;
                stats.last_activity = Some(chrono::Utc::now());
                return Some(job);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_job(file_id: &str) -> IngestionJob {
        IngestionJob::Url {
            url: "https://example.com".to_string(),
            email: None,
            file_id: file_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_enqueue_then_dequeue() {
        let queue = MpscJobQueue::new();

        queue.enqueue(url_job("1700-a")).await.unwrap();
        queue.enqueue(url_job("1700-b")).await.unwrap();
        assert_eq!(queue.len().await.unwrap(), 2);

        let first = queue.dequeue().await.unwrap();
        assert_eq!(first.file_id(), "1700-a");
        assert_eq!(queue.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_try_dequeue_on_empty_queue() {
        let queue = MpscJobQueue::new();
        assert!(queue.try_dequeue().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_removed_job_is_never_delivered() {
        let queue = MpscJobQueue::new();

        queue.enqueue(url_job("1700-a")).await.unwrap();
        queue.enqueue(url_job("1700-b")).await.unwrap();

        assert!(queue.remove("1700-a").await.unwrap());
        assert!(!queue.remove("1700-a").await.unwrap());

        let delivered = queue.try_dequeue().await.unwrap().unwrap();
        assert_eq!(delivered.file_id(), "1700-b");
        assert!(queue.try_dequeue().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_worker_receiver_observes_removal() {
        let (queue, receiver) = MpscJobQueue::create_pair();

        queue.enqueue(url_job("1700-a")).await.unwrap();
        queue.enqueue(url_job("1700-b")).await.unwrap();
        assert!(queue.remove("1700-a").await.unwrap());

        let delivered = receiver.recv().await.unwrap();
        assert_eq!(delivered.file_id(), "1700-b");
    }
}
