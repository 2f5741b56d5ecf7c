//!  Storage is split into two independent parts:
//!   - [record_storage::RecordStorageImpl] keeps the creation records, one JSON object per line.
//!   - [order_store::FileOrderStore] keeps small blobs by key. The only blob is the chart order
//!     produced by [persisted_order].

pub mod entities;
pub mod order_store;
pub mod persisted_order;
pub mod record_storage;
