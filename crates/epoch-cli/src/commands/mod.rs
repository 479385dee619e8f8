pub mod company;
pub mod dispatch;
pub mod play;
pub mod seed;
pub mod serve;
pub mod shared;
pub mod snapshot;
pub mod snapshots;
pub mod timeline;
