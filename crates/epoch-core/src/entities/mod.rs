//! Entity structs for all Epoch domain objects.
//!
//! Each entity maps to a table in the libSQL database. Field names serialize
//! in camelCase, which is the JSON shape served over HTTP. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema`.

mod commentary;
mod company;
mod design_analysis;
mod milestone;
mod snapshot;
mod source;

pub use commentary::Commentary;
pub use company::{Company, CompanyCounts, CompanyDetail};
pub use design_analysis::DesignAnalysis;
pub use milestone::{MetricValue, Milestone};
pub use snapshot::Snapshot;
pub use source::Source;
