use crate::model::SpriteSheet;
use serde_json::{json, Value};

/// Serialize the sheet as `{ frames, meta }` with frames in packing order.
/// `frame` holds the pixel rectangle on the sheet; `offset` holds the
/// `background-position` values used by the stylesheet.
pub fn to_json(sheet: &SpriteSheet) -> Value {
    let frames: Vec<Value> = sheet
        .placements
        .iter()
        .map(|p| {
            json!({
                "name": p.file_name,
                "frame": {"x": -p.offset_x, "y": -p.offset_y, "w": p.width, "h": p.height},
                "offset": {"x": p.offset_x, "y": p.offset_y},
            })
        })
        .collect();
    json!({
        "frames": frames,
        "meta": {
            "app": "less-sprites",
            "version": env!("CARGO_PKG_VERSION"),
            "image": sheet.image_file,
            "sprite": sheet.sprite_name,
            "direction": sheet.direction,
            "size": {"w": sheet.width, "h": sheet.height},
        },
    })
}
