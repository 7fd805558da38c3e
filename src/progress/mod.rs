pub mod estimator;
pub mod reporter;

pub use estimator::{DurationEstimate, build_estimate, transcription_estimate};
pub use reporter::ProgressReporter;
