mod company;
mod snapshot;

pub use company::CompanyCommands;
pub use snapshot::SnapshotCommands;
