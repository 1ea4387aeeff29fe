//! ParcelDraft Core Library
//!
//! Platform-agnostic engine for the ParcelDraft survey-plot drafting tool:
//! world/screen coordinate mapping, the SSS construction kernel, the
//! document model with its undo history, and the per-tool edit operations.

pub mod document;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod sheet;
pub mod storage;
pub mod tools;
pub mod transform;

pub use document::{Document, Line, RefPoint, Selection, TextLabel, Triangle};
pub use editor::{EditError, Editor, PointerButton, Prompt, RotationTarget};
pub use geometry::{GeometryError, Handedness};
pub use history::History;
pub use sheet::SheetMode;
pub use storage::{Storage, StorageError};
pub use tools::{ToolKind, ToolState};
pub use transform::{MAX_SCALE, MIN_SCALE, ViewTransform};
