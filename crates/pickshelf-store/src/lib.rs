mod client;
mod error;
mod types;

pub use client::StoreClient;
pub use error::StoreError;
pub use types::{ArchiveState, BackupTable, NewHomePick, ProductFilters};
