// Domain layer - Samples, the sliding window and its snapshots
pub mod error;
pub mod sample;
pub mod snapshot;
pub mod window;
