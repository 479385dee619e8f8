//! Repository modules implementing reads and writes for all Epoch entities.
//!
//! Each module adds methods to `EpochService` via `impl EpochService` blocks.

pub mod commentary;
pub mod company;
pub mod design_analysis;
pub mod milestone;
pub mod snapshot;
pub mod source;
pub mod timeline;
