pub mod frame_pipeline;
pub mod transport;

pub use frame_pipeline::{Artifacts, FramePipeline};
pub use transport::{HttpTransport, MemoryTransport, TransmitStatus, Transport, PIXEL_COUNT_HEADER};
