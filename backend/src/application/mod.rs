pub mod attachment;
pub mod pipeline;
pub mod relay_service;
pub mod report;

pub use pipeline::{DeliveryPipeline, PipelineTimings};
pub use relay_service::{RelayResult, RelayService};
