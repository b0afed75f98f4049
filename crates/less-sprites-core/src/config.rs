use crate::model::Direction;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the packer needs to know for one run. Built once, then handed to
/// [`crate::pack`] by reference and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRequest {
    /// Directory the candidate files are resolved against. `None` means `.`.
    #[serde(default)]
    pub source_directory: Option<PathBuf>,
    /// File names in packing order, or a single entry naming a directory.
    pub candidate_files: Vec<String>,
    /// File name of the composite image. Never packed into itself.
    pub output_image_name: String,
    #[serde(default)]
    pub direction: Direction,
    /// Extensions (without dot, matched case-insensitively) treated as images.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// RGBA colour of the initial placeholder pixel and of uncovered areas.
    #[serde(default = "default_background")]
    pub background: [u8; 4],
    /// Measure source images concurrently when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PackRequest {
    fn default() -> Self {
        Self {
            source_directory: None,
            candidate_files: Vec::new(),
            output_image_name: "sprite.png".into(),
            direction: Direction::Down,
            extensions: default_extensions(),
            background: default_background(),
            parallel: false,
        }
    }
}

impl PackRequest {
    /// Create a fluent builder for `PackRequest`.
    pub fn builder() -> PackRequestBuilder {
        PackRequestBuilder::new()
    }

    /// Checks the fields that can be rejected without touching the filesystem.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpriteError;

        if self.output_image_name.trim().is_empty() {
            return Err(SpriteError::Validation(
                "output image name must not be empty".into(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(SpriteError::Validation(
                "at least one image extension is required".into(),
            ));
        }
        Ok(())
    }
}

fn default_extensions() -> Vec<String> {
    vec!["png".into()]
}
fn default_background() -> [u8; 4] {
    [255, 255, 255, 0]
}

/// Builder for `PackRequest` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackRequestBuilder {
    req: PackRequest,
}

impl PackRequestBuilder {
    pub fn new() -> Self {
        Self {
            req: PackRequest::default(),
        }
    }
    pub fn source_directory(mut self, v: impl Into<PathBuf>) -> Self {
        self.req.source_directory = Some(v.into());
        self
    }
    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.req.candidate_files = files.into_iter().map(Into::into).collect();
        self
    }
    pub fn output_image_name(mut self, v: impl Into<String>) -> Self {
        self.req.output_image_name = v.into();
        self
    }
    pub fn direction(mut self, v: Direction) -> Self {
        self.req.direction = v;
        self
    }
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.req.extensions = exts.into_iter().map(Into::into).collect();
        self
    }
    pub fn background(mut self, v: [u8; 4]) -> Self {
        self.req.background = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.req.parallel = v;
        self
    }
    pub fn build(self) -> PackRequest {
        self.req
    }
}
