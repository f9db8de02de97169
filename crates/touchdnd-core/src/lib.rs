#![forbid(unsafe_code)]

//! Core: geometry, normalized input events, and the host/platform boundary.
//!
//! # Role in touchdnd
//! `touchdnd-core` holds the vocabulary shared by the touch backend and the
//! platforms that embed it. It owns no state machine of its own.
//!
//! # Primary responsibilities
//! - **Geometry**: viewport offsets and closed-interval hit rectangles.
//! - **Identifiers**: opaque drag source / drop target handles.
//! - **Events**: touch and legacy single-pointer input normalized into one shape.
//! - **Host traits**: the drag-and-drop manager's action and monitor surfaces.
//! - **Platform traits**: the document queries and child-list observation the
//!   backend needs from whatever environment hosts it.
//!
//! # How it fits in the system
//! `touchdnd-web` drives a [`host::DragDropManager`] from events delivered
//! through a [`platform::Document`]. `touchdnd-harness` implements both traits
//! in memory for deterministic tests.

pub mod event;
pub mod geometry;
pub mod handler_id;
pub mod host;
pub mod logging;
pub mod platform;

pub use event::{GestureKind, InputEvent, InputMode, InputPayload, PointerInput, TouchInput, TouchPoint};
pub use geometry::{ClientOffset, ClientRect};
pub use handler_id::{SourceId, TargetId};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
