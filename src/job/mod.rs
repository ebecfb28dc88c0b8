//! Form jobs - the request a form be generated, its lifecycle, and the
//! worker pool that runs it.

pub mod model;
pub mod orchestrator;
pub mod status;
pub mod worker;

pub use model::{FormJobRequest, FormKind, JobDescriptor};
pub use orchestrator::{JobError, JobOrchestrator};
pub use status::{JobStatus, JobStatusRecorder, PostgrestStatusRecorder, StatusError, StatusUpdate};
pub use worker::{JobQueue, QueueError, WorkerPool};
