use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Axis along which images are stacked on the sprite sheet.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Each image goes below all previous ones (single column).
    #[default]
    Down,
    /// Each image goes to the right of all previous ones (single row).
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Down => "down",
            Self::Right => "right",
        })
    }
}

/// Where a single source image landed on the sheet.
///
/// Offsets are CSS `background-position` values: zero or negative, and only the
/// component along the append axis is ever non-zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub offset_x: i64,
    pub offset_y: i64,
}

/// Metadata of a finished pack. Everything the stylesheet and metadata
/// exporters need; pixel data stays with the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Sprite group name used in the generated mixins (image name without `.png`).
    pub sprite_name: String,
    /// File name of the composite image, referenced from `background-image`.
    pub image_file: String,
    pub direction: Direction,
    /// Final canvas width in pixels.
    pub width: u32,
    /// Final canvas height in pixels.
    pub height: u32,
    /// Placements in canvas composition order.
    pub placements: Vec<Placement>,
    pub image_path: PathBuf,
    pub stylesheet_path: PathBuf,
}

impl SpriteSheet {
    /// Sum of the placed image areas in pixels.
    pub fn used_area(&self) -> u64 {
        self.placements
            .iter()
            .map(|p| (p.width as u64) * (p.height as u64))
            .sum()
    }

    /// Fraction of the sheet covered by source images (0.0 to 1.0).
    pub fn occupancy(&self) -> f64 {
        let total = (self.width as u64) * (self.height as u64);
        if total > 0 {
            self.used_area() as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Output of a packing run: the composed canvas and the sheet metadata.
pub struct PackResult<C> {
    pub canvas: C,
    pub sheet: SpriteSheet,
}
