//! Image canvas capability used by the packer.
//!
//! The packer only talks to [`ImageInspector`] and [`Canvas`]; [`RgbaCanvas`]
//! and [`HeaderInspector`] are the `image`-crate backed defaults.

use crate::compositing::{blit_rgba, grow_canvas};
use crate::error::{Result, SpriteError};
use crate::model::Direction;
use image::{ImageReader, Rgba, RgbaImage};
use std::path::Path;

/// Reads pixel dimensions of an image file without compositing it.
///
/// Must be `Sync`: with feature "parallel" several files are measured at once.
pub trait ImageInspector: Sync {
    fn measure(&self, path: &Path) -> Result<(u32, u32)>;
}

/// Sequential accumulator of images along one axis.
pub trait Canvas {
    /// Appends the image at `path` after everything appended so far and
    /// returns the size that was actually drawn.
    fn append(&mut self, path: &Path, direction: Direction) -> Result<(u32, u32)>;
    /// Current pixel size of the canvas.
    fn dimensions(&self) -> (u32, u32);
    /// Area already covered by content; the next append lands right after it.
    fn extent(&self) -> (u32, u32);
    /// Hint that the canvas will grow to at least `width`x`height`.
    fn reserve(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }
    /// Encodes the canvas to `path`; format follows the file extension.
    fn write_to(&self, path: &Path) -> Result<()>;
}

/// Measures images by decoding only their headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderInspector;

impl ImageInspector for HeaderInspector {
    fn measure(&self, path: &Path) -> Result<(u32, u32)> {
        image::image_dimensions(path).map_err(|e| SpriteError::processing(path, e))
    }
}

/// In-memory RGBA canvas that grows as images are appended.
///
/// `extent` is the area covered by content. The pixel buffer is never smaller
/// than 1x1, so a fresh placeholder canvas has one background pixel and an
/// empty extent; the first append replaces that pixel rather than adding to it.
/// The buffer only ever grows, either once through [`Canvas::reserve`] or on
/// demand when an append does not fit.
#[derive(Debug, Clone)]
pub struct RgbaCanvas {
    pixels: RgbaImage,
    extent: (u32, u32),
    background: Rgba<u8>,
}

impl RgbaCanvas {
    /// Blank `width`x`height` canvas. The blank area counts as content, so
    /// appended images are placed after it.
    pub fn new(width: u32, height: u32, background: [u8; 4]) -> Self {
        let background = Rgba(background);
        Self {
            pixels: RgbaImage::from_pixel(width.max(1), height.max(1), background),
            extent: (width, height),
            background,
        }
    }

    /// 1x1 placeholder canvas with an empty extent.
    pub fn placeholder(background: [u8; 4]) -> Self {
        Self::new(0, 0, background)
    }

    /// Appends an already decoded image and returns its size.
    pub fn append_image(&mut self, img: &RgbaImage, direction: Direction) -> Result<(u32, u32)> {
        let (ew, eh) = self.extent;
        let (iw, ih) = img.dimensions();
        let grown = match direction {
            Direction::Down => eh.checked_add(ih).map(|h| (ew.max(iw), h, 0, eh)),
            Direction::Right => ew.checked_add(iw).map(|w| (w, eh.max(ih), ew, 0)),
        };
        let Some((nw, nh, dx, dy)) = grown else {
            return Err(SpriteError::Validation(format!(
                "sprite sheet exceeds {} pixels along the {direction} axis",
                u32::MAX
            )));
        };

        self.ensure_buffer(nw, nh);
        blit_rgba(img, &mut self.pixels, dx, dy);
        self.extent = (nw, nh);
        Ok((iw, ih))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    // Reallocates only when the buffer is too small in either direction.
    fn ensure_buffer(&mut self, width: u32, height: u32) {
        let (bw, bh) = self.pixels.dimensions();
        let (w, h) = (width.max(1), height.max(1));
        if w > bw || h > bh {
            self.pixels = grow_canvas(
                &self.pixels,
                w.max(bw),
                h.max(bh),
                self.extent,
                self.background,
            );
        }
    }
}

impl Canvas for RgbaCanvas {
    fn append(&mut self, path: &Path, direction: Direction) -> Result<(u32, u32)> {
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| SpriteError::processing(path, e))?;
        self.append_image(&img.to_rgba8(), direction)
    }

    fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// May be 0x0 while the buffer is 1x1.
    fn extent(&self) -> (u32, u32) {
        self.extent
    }

    fn reserve(&mut self, width: u32, height: u32) {
        self.ensure_buffer(width, height);
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        self.pixels
            .save(path)
            .map_err(|e| SpriteError::processing(path, e))
    }
}
