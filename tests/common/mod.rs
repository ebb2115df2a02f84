//! Common test utilities for coursedesk
//!
//! Everything here builds real objects; the only server stand-in is the
//! library's own `MemoryBatchApi`.


pub use assertions::BoardAssertions;
pub use fixtures::{BatchFactory, NewBatchFactory};

use coursedesk::{BatchBoard, LoadSource, MemoryBatchApi};
use std::sync::Arc;

/// Sample-data server plus a board that has completed its first load
pub async fn loaded_board() -> (Arc<MemoryBatchApi>, Arc<BatchBoard>) {
    loaded_board_with(MemoryBatchApi::with_sample_data()).await
}

pub async fn loaded_board_with(api: MemoryBatchApi) -> (Arc<MemoryBatchApi>, Arc<BatchBoard>) {
    let api = Arc::new(api);
    let board = Arc::new(BatchBoard::new(api.clone()));
    let source = board.load().await.expect("initial load");
    assert_eq!(source, LoadSource::Server);
    (api, board)
}
