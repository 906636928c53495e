//! Artifact cataloguing record store.
//!
//! The crate mediates between a free-form entry form and a relational
//! backend with a denormalized, fixed-arity row layout: the [`codec`]
//! pads and truncates bounded sequences into per-slot columns, the
//! [`store`] addresses one table per category, and the [`render`] module
//! turns a decoded record into a static HTML page plus a QR code pointing
//! at it.

pub mod codec;
pub mod db;
pub mod entry;
mod error;
pub mod logging;
pub mod model;
pub mod render;
pub mod size;
pub mod store;

pub use error::{AppError, AppResult};
pub use model::{ArtifactRecord, SizeTriple};
pub use store::{Session, StoreOptions};
