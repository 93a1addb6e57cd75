pub mod ingestion_worker;
pub mod mpsc_job_queue;
pub mod retention_sweeper;

pub use ingestion_worker::{IngestionWorkerPool, JobRunner};
pub use mpsc_job_queue::{MpscJobQueue, MpscJobQueueReceiver};
pub use retention_sweeper::RetentionSweeper;
