//! Core library for building LESS sprite sheets.
//!
//! - Filter: pick image files from a list or a directory, never the output image itself
//! - Packer: stack images in one row (`Right`) or one column (`Down`) and record each offset
//! - Stylesheet: `to_less` turns the offsets into `.sprite(...)` mixins with `background-position`
//! - Specs: `SpriteSpecs::load` reads the JSON specs file into a `PackRequest`
//!
//! Quick example:
//! ```ignore
//! use less_sprites_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let req = PackRequest::builder()
//!     .source_directory("icons")
//!     .files(["home.png", "search.png"])
//!     .output_image_name("icons.png")
//!     .direction(Direction::Right)
//!     .build();
//! let out = pack(&req)?;
//! out.canvas.write_to(&out.sheet.image_path)?;
//! std::fs::write(&out.sheet.stylesheet_path, to_less(&out.sheet))?;
//! # Ok(()) }
//! ```

pub mod canvas;
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod layout;
pub mod model;
pub mod packer;
pub mod specs;
pub mod stylesheet;

pub use canvas::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use filter::{expand_candidates, filter_source_files};
pub use layout::*;
pub use model::*;
pub use packer::*;
pub use specs::*;
pub use stylesheet::*;

/// Convenience prelude for common types and functions.
/// Importing `less_sprites_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::canvas::{Canvas, HeaderInspector, ImageInspector, RgbaCanvas};
    pub use crate::config::{PackRequest, PackRequestBuilder};
    pub use crate::error::{Result, SpriteError};
    pub use crate::layout::{OffsetCursor, layout_placements, stacked_extent};
    pub use crate::model::{Direction, PackResult, Placement, SpriteSheet};
    pub use crate::specs::SpriteSpecs;
    pub use crate::{pack, pack_with, to_json, to_less};
}
