//! Change entries, their per-backend adapters, and note rendering.
//!
//! The SCM layer hands over [`ChangeEntry`] values in each backend's native
//! shape. [`ChangeSetFactory`] picks an adapter, normalises the entry into a
//! [`NormalizedChange`], and pairs it with a ticket id; the renderer turns the
//! resulting [`ChangeSet`] into note text.

pub mod adapter;
pub mod entry;
pub mod factory;
pub mod render;

pub use adapter::{AffectedPath, ChangeAdapter, DiffLink, NormalizedChange};
pub use entry::{BackendKind, ChangeEntry, EditType};
pub use factory::{BackendSupport, ChangeSet, ChangeSetFactory};
pub use render::{integrated_header, render_change_log, render_note, UNKNOWN};
