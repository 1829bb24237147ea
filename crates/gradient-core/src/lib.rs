//! Gradient editor core.
//!
//! Owns the data side of the editor:
//! - [`Stop`] records and the identity-keyed [`StopCollection`]
//! - the geometry compiler turning a collection into a horizontal strip mesh
//! - the persisted JSON configuration format
//! - export settings and raster format selection
//!
//! Nothing in this crate touches the GPU or the window system.

pub mod collection;
pub mod color;
pub mod compile;
pub mod config;
pub mod error;
pub mod export;
pub mod stop;

pub use collection::StopCollection;
pub use color::Rgb;
pub use compile::{compile, strip_indices, CompiledGeometry, CLIP_SPACE_HALF, CLIP_SPACE_SIZE};
pub use config::{parse_config, read_config, to_json, write_config};
pub use error::ConfigError;
pub use export::{ExportFormat, ExportSettings, MAX_EXPORT_DIMENSION};
pub use stop::{Stop, StopId};
