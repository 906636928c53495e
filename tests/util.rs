#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use musaeum::{Session, StoreOptions};

pub async fn memory_session() -> Session {
    Session::open(&StoreOptions::default())
        .await
        .expect("open in-memory session")
}
