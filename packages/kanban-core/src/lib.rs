//! Kanban board core: ordering engine, state machine, board stores and the
//! session runtime that ties them together.

pub mod config;
pub mod identity;
pub mod order;
pub mod search;
pub mod session;
pub mod state;
pub mod storage;
pub mod sync;
pub mod types;

pub use order::{OrderMap, OrderPatch};
pub use session::BoardSession;
pub use state::{board_view, reduce, BoardView, Intent, Snapshot, Transition};
pub use storage::{BoardStore, StoreError};
pub use types::{Card, CardId, Column, ColumnId, ColumnRecord, NodeId};
