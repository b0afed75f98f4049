use image::{Rgba, RgbaImage};
use less_sprites_core::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 0]);

fn write_png(dir: &Path, name: &str, w: u32, h: u32, color: Rgba<u8>) {
    RgbaImage::from_pixel(w, h, color)
        .save(dir.join(name))
        .expect("write test png");
}

fn request(dir: &Path, files: &[&str], direction: Direction) -> PackRequest {
    PackRequest::builder()
        .source_directory(dir)
        .files(files.iter().copied())
        .output_image_name("out.png")
        .direction(direction)
        .build()
}

#[test]
fn stacks_down_with_matching_offsets() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 10, 20, RED);
    write_png(dir.path(), "b.png", 30, 5, BLUE);

    let out = pack(&request(dir.path(), &["a.png", "b.png"], Direction::Down)).expect("pack");
    let sheet = &out.sheet;

    assert_eq!(sheet.placements.len(), 2);
    assert_eq!(sheet.placements[0].file_name, "a.png");
    assert_eq!((sheet.placements[0].offset_x, sheet.placements[0].offset_y), (0, 0));
    assert_eq!(sheet.placements[1].file_name, "b.png");
    assert_eq!((sheet.placements[1].offset_x, sheet.placements[1].offset_y), (0, -20));

    assert_eq!((sheet.width, sheet.height), (30, 25));
    assert_eq!(out.canvas.dimensions(), (30, 25));

    let img = out.canvas.image();
    assert_eq!(*img.get_pixel(0, 0), RED);
    assert_eq!(*img.get_pixel(9, 19), RED);
    assert_eq!(*img.get_pixel(10, 0), BACKGROUND);
    assert_eq!(*img.get_pixel(0, 20), BLUE);
    assert_eq!(*img.get_pixel(29, 24), BLUE);

    assert_eq!(sheet.sprite_name, "out");
    assert_eq!(sheet.image_file, "out.png");
    assert_eq!(sheet.image_path, dir.path().join("out.png"));
    assert_eq!(sheet.stylesheet_path, dir.path().join("out.less"));
}

#[test]
fn stacks_right_with_matching_offsets() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 10, 20, RED);
    write_png(dir.path(), "b.png", 30, 5, BLUE);
    write_png(dir.path(), "c.png", 2, 2, GREEN);

    let out = pack(&request(dir.path(), &["a.png", "b.png", "c.png"], Direction::Right))
        .expect("pack");
    let offsets: Vec<(i64, i64)> = out
        .sheet
        .placements
        .iter()
        .map(|p| (p.offset_x, p.offset_y))
        .collect();
    assert_eq!(offsets, vec![(0, 0), (-10, 0), (-40, 0)]);
    assert_eq!(out.canvas.dimensions(), (42, 20));

    // each image starts exactly where its negated offset says
    let img = out.canvas.image();
    for (p, color) in out.sheet.placements.iter().zip([RED, BLUE, GREEN]) {
        assert_eq!(*img.get_pixel(-p.offset_x as u32, 0), color, "{}", p.file_name);
    }
    assert_eq!(*img.get_pixel(10, 5), BACKGROUND);
}

#[test]
fn single_pixel_input_packs_at_origin() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "dot.png", 1, 1, RED);

    let out = pack(&request(dir.path(), &["dot.png"], Direction::Down)).expect("pack");
    assert_eq!(out.sheet.placements.len(), 1);
    let p = &out.sheet.placements[0];
    assert_eq!((p.width, p.height, p.offset_x, p.offset_y), (1, 1, 0, 0));
    assert_eq!(out.canvas.dimensions(), (1, 1));
    assert_eq!(*out.canvas.image().get_pixel(0, 0), RED);
}

#[test]
fn directory_argument_excludes_output_image() {
    let dir = tempfile::tempdir().unwrap();
    let icons = dir.path().join("icons");
    fs::create_dir(&icons).unwrap();
    write_png(&icons, "icon1.png", 4, 4, RED);
    write_png(&icons, "icon2.png", 4, 6, BLUE);
    write_png(&icons, "out.png", 50, 50, GREEN);

    let out = pack(&request(dir.path(), &["icons"], Direction::Down)).expect("pack");
    let mut names: Vec<&str> = out
        .sheet
        .placements
        .iter()
        .map(|p| p.file_name.as_str())
        .collect();
    names.sort();
    assert_eq!(names, vec!["icon1.png", "icon2.png"]);
    assert_eq!(out.canvas.dimensions(), (4, 10));
    assert_eq!(out.sheet.image_path, icons.join("out.png"));
}

#[test]
fn missing_source_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 2, 2, RED);

    let result = pack(&request(dir.path(), &["a.png", "gone.png"], Direction::Down));
    match result {
        Err(SpriteError::NotFound(path)) => assert_eq!(path, dir.path().join("gone.png")),
        Err(e) => panic!("Expected NotFound error, got {e}"),
        Ok(_) => panic!("Expected NotFound error"),
    }
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn unreadable_image_is_a_processing_error() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 2, 2, RED);
    fs::write(dir.path().join("broken.png"), b"definitely not a png").unwrap();

    let result = pack(&request(dir.path(), &["a.png", "broken.png"], Direction::Down));
    match result {
        Err(SpriteError::Processing { path, .. }) => {
            assert_eq!(path, dir.path().join("broken.png"))
        }
        Err(e) => panic!("Expected Processing error, got {e}"),
        Ok(_) => panic!("Expected Processing error"),
    }
    assert!(!dir.path().join("out.png").exists());
    assert!(!dir.path().join("out.less").exists());
}

#[test]
fn empty_output_name_is_rejected_before_io() {
    let req = PackRequest::builder()
        .source_directory("/definitely/not/here")
        .files(["a.png"])
        .output_image_name("")
        .build();
    assert!(matches!(pack(&req), Err(SpriteError::Validation(_))));
}

/// Canvas that only records the order of appends and the reserved size.
struct RecordingCanvas {
    sizes: HashMap<String, (u32, u32)>,
    appended: Vec<PathBuf>,
    reserved: Option<(u32, u32)>,
}

impl RecordingCanvas {
    fn new(sizes: HashMap<String, (u32, u32)>) -> Self {
        Self {
            sizes,
            appended: Vec::new(),
            reserved: None,
        }
    }
}

impl Canvas for RecordingCanvas {
    fn append(&mut self, path: &Path, _direction: Direction) -> Result<(u32, u32)> {
        self.appended.push(path.to_path_buf());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        Ok(self.sizes[&name])
    }
    fn dimensions(&self) -> (u32, u32) {
        (1, 1)
    }
    fn extent(&self) -> (u32, u32) {
        (0, 0)
    }
    fn reserve(&mut self, width: u32, height: u32) {
        self.reserved = Some((width, height));
    }
    fn write_to(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

struct FixedInspector(HashMap<String, (u32, u32)>);

impl ImageInspector for FixedInspector {
    fn measure(&self, path: &Path) -> Result<(u32, u32)> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        Ok(self.0[&name])
    }
}

fn fake_sources(dir: &Path, sizes: &[(&str, u32, u32)]) -> HashMap<String, (u32, u32)> {
    let mut map = HashMap::new();
    for (name, w, h) in sizes {
        fs::write(dir.join(name), b"").unwrap();
        map.insert(name.to_string(), (*w, *h));
    }
    map
}

#[test]
fn append_order_matches_placement_order() {
    let dir = tempfile::tempdir().unwrap();
    let sizes = fake_sources(
        dir.path(),
        &[("c.png", 3, 30), ("a.png", 1, 10), ("b.png", 2, 20), ("zero.png", 0, 0)],
    );
    let files = ["c.png", "a.png", "zero.png", "b.png"];

    for parallel in [false, true] {
        let req = PackRequest::builder()
            .source_directory(dir.path())
            .files(files)
            .output_image_name("out.png")
            .parallel(parallel)
            .build();
        let canvas = RecordingCanvas::new(sizes.clone());
        let out = pack_with(&req, &FixedInspector(sizes.clone()), canvas).expect("pack");
        assert_eq!(out.canvas.reserved, Some((3, 60)));

        let appended: Vec<PathBuf> = files.iter().map(|f| dir.path().join(f)).collect();
        assert_eq!(out.canvas.appended, appended);
        let placed: Vec<(&str, i64)> = out
            .sheet
            .placements
            .iter()
            .map(|p| (p.file_name.as_str(), p.offset_y))
            .collect();
        assert_eq!(
            placed,
            vec![("c.png", 0), ("a.png", -30), ("zero.png", -40), ("b.png", -40)]
        );
    }
}

#[test]
fn size_mismatch_between_measure_and_append_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let sizes = fake_sources(dir.path(), &[("a.png", 4, 4), ("b.png", 8, 8)]);
    let mut lying = sizes.clone();
    lying.insert("b.png".into(), (8, 9));

    let req = request(dir.path(), &["a.png", "b.png"], Direction::Down);
    let canvas = RecordingCanvas::new(sizes);
    let result = pack_with(&req, &FixedInspector(lying), canvas);
    match result {
        Err(SpriteError::Processing { path, message }) => {
            assert_eq!(path, dir.path().join("b.png"));
            assert!(message.contains("8x9"), "{message}");
        }
        Err(e) => panic!("Expected Processing error, got {e}"),
        Ok(_) => panic!("Expected Processing error"),
    }
}

#[test]
fn written_sheet_has_packed_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 10, 20, RED);
    write_png(dir.path(), "b.png", 30, 5, BLUE);

    let out = pack(&request(dir.path(), &["a.png", "b.png"], Direction::Down)).expect("pack");
    out.canvas.write_to(&out.sheet.image_path).expect("write");

    let dims = image::image_dimensions(&out.sheet.image_path).expect("read back");
    assert_eq!(dims, (30, 25));
}

#[test]
fn prefilled_canvas_offsets_follow_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 4, 4, RED);
    let blank = Rgba([0, 0, 0, 0]);

    let req = request(dir.path(), &["a.png"], Direction::Down);
    let out = pack_with(&req, &HeaderInspector, RgbaCanvas::new(10, 10, [0; 4])).expect("pack");
    let p = &out.sheet.placements[0];
    assert_eq!((p.offset_x, p.offset_y), (0, -10));
    assert_eq!(out.canvas.dimensions(), (10, 14));
    let img = out.canvas.image();
    assert_eq!(*img.get_pixel(0, 0), blank);
    assert_eq!(*img.get_pixel(-p.offset_x as u32, -p.offset_y as u32), RED);

    let req = request(dir.path(), &["a.png"], Direction::Right);
    let out = pack_with(&req, &HeaderInspector, RgbaCanvas::new(10, 10, [0; 4])).expect("pack");
    let p = &out.sheet.placements[0];
    assert_eq!((p.offset_x, p.offset_y), (-10, 0));
    assert_eq!(out.canvas.dimensions(), (14, 10));
    assert_eq!(*out.canvas.image().get_pixel(10, 0), RED);
    assert_eq!(*out.canvas.image().get_pixel(9, 0), blank);
}

#[test]
fn reserved_canvas_is_allocated_once() {
    let tiles = [RED, BLUE, GREEN, RED].map(|c| RgbaImage::from_pixel(10, 8, c));

    let mut canvas = RgbaCanvas::placeholder(BACKGROUND.0);
    canvas.reserve(40, 8);
    assert_eq!(canvas.dimensions(), (40, 8));
    assert_eq!(canvas.extent(), (0, 0));
    let buffer = canvas.image().as_raw().as_ptr();
    for tile in &tiles {
        canvas.append_image(tile, Direction::Right).expect("append");
    }
    assert_eq!(canvas.image().as_raw().as_ptr(), buffer);
    assert_eq!(canvas.extent(), (40, 8));
    assert_eq!(canvas.dimensions(), (40, 8));

    // same pixels as a canvas that grows on every append
    let mut grown = RgbaCanvas::placeholder(BACKGROUND.0);
    for tile in &tiles {
        grown.append_image(tile, Direction::Right).expect("append");
    }
    assert_eq!(grown.image(), canvas.image());
}
