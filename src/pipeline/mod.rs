//! Detection cycle orchestration and publishing.

mod detector;
mod sink;

pub use detector::{DetectionPipeline, PipelineError};
pub use sink::{ChannelSink, LogSink, MemorySink, OccupancySink};
