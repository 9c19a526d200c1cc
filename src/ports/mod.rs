//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the client core and an
//! external system (the to-do server, time, filesystem).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod remote;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use remote::{
    ListQuery, NewTask, RemoteError, RemoteFuture, SortKey, StatusFilter, TaskService,
};
