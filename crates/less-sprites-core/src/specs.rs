use crate::config::PackRequest;
use crate::error::{Result, SpriteError};
use crate::model::Direction;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Contents of a sprite specs file (`sprite-specs.json`).
///
/// ```json
/// { "dir": "icons", "sprite": "icons.png", "files": ["a.png", "b.png"],
///   "direction": true, "append": "right" }
/// ```
///
/// Empty strings, `false`, `0` and `null` count as "not set", the same as a
/// missing key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpriteSpecs {
    #[serde(default)]
    pub dir: Option<Value>,
    #[serde(default)]
    pub sprite: Option<Value>,
    #[serde(default)]
    pub files: Option<Value>,
    #[serde(default)]
    pub direction: Option<Value>,
    #[serde(default)]
    pub append: Option<Value>,
}

impl SpriteSpecs {
    /// Parses specs from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| SpriteError::Validation(format!("malformed specs file: {e}")))
    }

    /// Reads the specs file at `path` and turns it into a [`PackRequest`].
    /// No image is touched here.
    pub fn load(path: &Path) -> Result<PackRequest> {
        if !path.exists() {
            return Err(SpriteError::NotFound(path.to_path_buf()));
        }
        let specs_path = std::path::absolute(path)?;
        let text = fs::read_to_string(&specs_path)?;
        Self::from_json(&text)?.into_request(&specs_path)
    }

    /// Builds the request, resolving `dir` against the directory holding
    /// `specs_path` and deriving the sprite name from the specs file name.
    pub fn into_request(self, specs_path: &Path) -> Result<PackRequest> {
        let files = match self.files.as_ref().filter(|v| is_truthy(v)) {
            Some(v) => string_list(v)?,
            None => return Err(SpriteError::Validation("Missing \"files\" property.".into())),
        };

        let dir = self
            .dir
            .as_ref()
            .filter(|v| is_truthy(v))
            .and_then(Value::as_str)
            .unwrap_or(".");
        let base = specs_path.parent().unwrap_or_else(|| Path::new("."));
        let source_directory = base.join(dir);

        let sprite = match self.sprite.as_ref().filter(|v| is_truthy(v)).and_then(Value::as_str) {
            Some(s) => s.to_string(),
            None => {
                let stem = specs_path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("sprite");
                format!("{}.png", stem.strip_suffix(".json").unwrap_or(stem))
            }
        };

        // `append` is only consulted when `direction` is set at all.
        let direction = if self.direction.as_ref().is_some_and(is_truthy) {
            match self.append.as_ref().and_then(Value::as_str) {
                Some("right") => Direction::Right,
                _ => Direction::Down,
            }
        } else {
            Direction::Down
        };

        debug!(?source_directory, %sprite, %direction, files = files.len(), "specs loaded");
        Ok(PackRequest::builder()
            .source_directory(source_directory)
            .files(files)
            .output_image_name(sprite)
            .direction(direction)
            .build())
    }
}

fn string_list(v: &Value) -> Result<Vec<String>> {
    match v {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    SpriteError::Validation(format!("\"files\" entries must be strings, got {item}"))
                })
            })
            .collect(),
        Value::String(s) => Ok(vec![s.clone()]),
        other => Err(SpriteError::Validation(format!(
            "\"files\" must be a list of file names, got {other}"
        ))),
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
