#![forbid(unsafe_code)]

//! `touchdnd-web` adapts touch and legacy single-pointer input to a
//! host drag-and-drop manager.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding platform forwards window events and
//!   child-list observer callbacks; the backend never binds to a JS engine.
//! - **Deterministic**: every handled event returns a [`GestureDispatch`]
//!   record describing what was dispatched and why.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The central type is [`TouchBackend`]. Drag sources, previews, and drop
//! targets register their nodes with it; `setup()` attaches window listeners
//! and `teardown()` (or dropping the backend) detaches them.

pub mod backend;
pub mod candidates;
pub mod coordinates;
pub mod dispatch;
pub mod error;
mod lock;
pub mod options;
pub mod registry;
mod removal;

pub use backend::{DragPhase, TouchBackend};
pub use candidates::MoveStartCandidates;
pub use coordinates::CoordinateSource;
pub use dispatch::{
    GestureDispatch, GestureIgnoredReason, GestureLifecyclePhase, GestureLogEntry, GestureOutcome,
};
pub use error::BackendError;
pub use lock::is_backend_active;
pub use options::{DragPreviewOptions, REACT_ID_ATTRIBUTE, TouchBackendOptions};
pub use registry::{Registration, RegistrationKind, Registry, node_client_offset};
