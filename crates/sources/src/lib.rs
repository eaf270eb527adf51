pub mod adapter;
pub mod divisions;
pub mod error;
pub mod export;
pub mod live;
pub mod session;
pub mod snapshot;
pub mod traits;
pub mod transformer;

#[cfg(test)]
mod testing;

pub use adapter::{LIFTER_BATCH_SIZE, ResultSourceAdapter};
pub use divisions::{DivisionSource, load_inactive_divisions};
pub use error::{Result, SourceError};
pub use export::{DETAIL_BATCH_SIZE, DetailedExporter};
pub use live::{PgLiveStore, RESULTS_PAGE_SIZE};
pub use session::{Refresh, ResultsSession};
pub use snapshot::{DirectorySnapshotStore, HttpSnapshotStore, SnapshotWriter};
pub use traits::{LiveResultStore, SnapshotStore};
