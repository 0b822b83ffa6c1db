//! Sample history storage.
//!
//! - [`HistoryBuffer`]: a fixed-capacity ring of samples with a moving average
//! - [`BufferRegistry`]: the aggregate series plus one buffer per unit

mod buffer;
mod registry;

pub use buffer::HistoryBuffer;
pub use registry::BufferRegistry;
