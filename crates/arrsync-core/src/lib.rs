pub mod dispatch;
pub mod pipeline;
pub mod profile;
pub mod report;

pub use dispatch::ServiceDispatcher;
pub use pipeline::{Pipeline, PipelineSettings, RunObserver};
pub use profile::resolve_quality_profile;
pub use report::{EntryReport, RunReport, RunSummary};
