use crate::canvas::{Canvas, HeaderInspector, ImageInspector, RgbaCanvas};
use crate::config::PackRequest;
use crate::error::{Result, SpriteError};
use crate::filter::{base_name, expand_candidates, filter_source_files};
use crate::layout::{OffsetCursor, stacked_extent};
use crate::model::{PackResult, SpriteSheet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[instrument(skip_all)]
/// Packs the request's images onto a fresh [`RgbaCanvas`] placeholder.
///
/// Notes:
/// - Images are appended strictly in the filtered list order; offsets follow the same order.
/// - Any failure aborts the whole pack; nothing is written here either way.
pub fn pack(request: &PackRequest) -> Result<PackResult<RgbaCanvas>> {
    pack_with(
        request,
        &HeaderInspector,
        RgbaCanvas::placeholder(request.background),
    )
}

#[instrument(skip_all, fields(sprite = %request.output_image_name, direction = %request.direction))]
/// Packs the request's images onto `canvas`, measuring them with `inspector`.
pub fn pack_with<I, C>(request: &PackRequest, inspector: &I, mut canvas: C) -> Result<PackResult<C>>
where
    I: ImageInspector,
    C: Canvas,
{
    request.validate()?;
    let start = Instant::now();

    let base_dir = request
        .source_directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let (source_dir, candidates) = expand_candidates(&base_dir, &request.candidate_files)?;
    let files = filter_source_files(&candidates, &request.output_image_name, &request.extensions)?;

    let paths: Vec<PathBuf> = files.iter().map(|f| source_dir.join(f)).collect();
    if let Some(missing) = paths.iter().find(|p| !p.exists()) {
        return Err(SpriteError::NotFound(missing.clone()));
    }
    let sizes = measure_all(&paths, inspector, request.parallel)?;

    // content already on the canvas comes first
    let extent = canvas.extent();
    let Some((final_w, final_h)) = stacked_extent(extent, &sizes, request.direction) else {
        return Err(SpriteError::Validation(format!(
            "sprite sheet exceeds {} pixels along the {} axis",
            u32::MAX,
            request.direction
        )));
    };
    canvas.reserve(final_w, final_h);

    let mut cursor = OffsetCursor::starting_at(request.direction, extent);
    let mut placements = Vec::with_capacity(files.len());
    for ((name, path), (w, h)) in files.iter().zip(&paths).zip(sizes) {
        let drawn = canvas.append(path, request.direction)?;
        if drawn != (w, h) {
            return Err(SpriteError::processing(
                path,
                format!("measured {w}x{h} but appended {}x{}", drawn.0, drawn.1),
            ));
        }
        debug!(file = %name, w, h, "appended");
        placements.push(cursor.place(name.as_str(), w, h));
    }

    let image_file = base_name(&request.output_image_name).to_string();
    let sprite_name = image_file
        .strip_suffix(".png")
        .unwrap_or(&image_file)
        .to_string();
    let (width, height) = canvas.dimensions();
    let sheet = SpriteSheet {
        image_path: source_dir.join(&image_file),
        stylesheet_path: source_dir.join(format!("{sprite_name}.less")),
        sprite_name,
        image_file,
        direction: request.direction,
        width,
        height,
        placements,
    };
    info!(
        images = sheet.placements.len(),
        width,
        height,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "sprite sheet packed"
    );
    Ok(PackResult { canvas, sheet })
}

fn measure_all<I: ImageInspector>(
    paths: &[PathBuf],
    inspector: &I,
    parallel: bool,
) -> Result<Vec<(u32, u32)>> {
    // Parallel path (optional); collect keeps input order
    #[cfg(feature = "parallel")]
    {
        if parallel {
            return paths
                .par_iter()
                .map(|p| measure_one(inspector, p))
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    paths.iter().map(|p| measure_one(inspector, p)).collect()
}

fn measure_one<I: ImageInspector>(inspector: &I, path: &Path) -> Result<(u32, u32)> {
    inspector.measure(path).map_err(|e| match e {
        e @ (SpriteError::Processing { .. } | SpriteError::NotFound(_)) => e,
        other => SpriteError::processing(path, other),
    })
}
