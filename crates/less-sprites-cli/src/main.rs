use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use handlebars::Handlebars;
use less_sprites_core::prelude::*;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "less-sprites",
    about = "Combine images into a sprite sheet and generate LESS mixins for it",
    version,
    author
)]
struct Cli {
    /// Sprite specs file (JSON: dir, sprite, files, direction, append)
    #[arg(help_heading = "Input/Output")]
    specs: Option<PathBuf>,
    /// Stylesheet flavour written next to the sprite sheet
    #[arg(long, value_enum, default_value_t = StyleFormat::Less, help_heading = "Export")]
    format: StyleFormat,
    /// External template file (handlebars), rendered instead of --format
    #[arg(long, help_heading = "Export")]
    template: Option<PathBuf>,
    /// Also export sheet metadata as <sprite>.json
    #[arg(long, default_value_t = false, help_heading = "Export")]
    json: bool,
    /// Dry run: pack and report but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
    /// Measure images in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Processing")]
    parallel: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StyleFormat {
    /// `.sprite(...)` mixins with path helpers
    Less,
    /// Plain `.sprite-icon` class rules
    Css,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let Some(specs) = cli.specs.as_deref() else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };
    run(specs, &cli)
}

fn run(specs: &Path, cli: &Cli) -> anyhow::Result<()> {
    let req = PackRequest {
        parallel: parallel_measurement(cli.parallel),
        ..SpriteSpecs::load(specs).with_context(|| format!("load specs {}", specs.display()))?
    };
    let out = pack(&req)?;
    let sheet = &out.sheet;
    info!(
        images = sheet.placements.len(),
        width = sheet.width,
        height = sheet.height,
        occupancy = format!("{:.2}%", sheet.occupancy() * 100.0),
        "stats"
    );

    // render everything before writing anything
    let outputs = render_outputs(cli, sheet)?;
    if cli.dry_run {
        println!(
            "images={} size={}x{}",
            sheet.placements.len(),
            sheet.width,
            sheet.height
        );
        for path in outputs.paths() {
            println!("would write {}", path.display());
        }
        return Ok(());
    }
    write_outputs(&out.canvas, &outputs)?;
    Ok(())
}

fn parallel_measurement(requested: bool) -> bool {
    if requested && !cfg!(feature = "parallel") {
        warn!("--parallel ignored: built without the `parallel` feature");
        return false;
    }
    requested
}

/// Files produced by one run, in write order.
struct Outputs {
    image: PathBuf,
    stylesheet: (PathBuf, String),
    json: Option<(PathBuf, String)>,
}

impl Outputs {
    fn paths(&self) -> Vec<&Path> {
        let mut paths = vec![self.image.as_path(), self.stylesheet.0.as_path()];
        paths.extend(self.json.as_ref().map(|(path, _)| path.as_path()));
        paths
    }
}

fn render_outputs(cli: &Cli, sheet: &SpriteSheet) -> anyhow::Result<Outputs> {
    let stylesheet = render_stylesheet(cli, sheet)?;
    let json = if cli.json {
        let path = sheet
            .image_path
            .with_file_name(format!("{}.json", sheet.sprite_name));
        Some((path, serde_json::to_string_pretty(&to_json(sheet))?))
    } else {
        None
    };
    Ok(Outputs {
        image: sheet.image_path.clone(),
        stylesheet,
        json,
    })
}

/// Writes every output to a temp file next to its target, then renames them
/// into place in order. Returns the written paths.
fn write_outputs<C: Canvas>(canvas: &C, outputs: &Outputs) -> anyhow::Result<Vec<PathBuf>> {
    let (style_path, stylesheet) = &outputs.stylesheet;
    let mut staged = vec![
        stage(&outputs.image, |tmp| Ok(canvas.write_to(tmp)?))?,
        stage(style_path, |tmp| Ok(fs::write(tmp, stylesheet)?))?,
    ];
    if let Some((json_path, json)) = &outputs.json {
        staged.push(stage(json_path, |tmp| Ok(fs::write(tmp, json)?))?);
    }
    commit(staged)
}

struct Staged {
    temp: NamedTempFile,
    dest: PathBuf,
}

fn stage(dest: &Path, write: impl FnOnce(&Path) -> anyhow::Result<()>) -> anyhow::Result<Staged> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // the image encoder picks its format from the extension
    let suffix = dest
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let mut builder = tempfile::Builder::new();
    builder.prefix(".less-sprites-").suffix(&suffix);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    let temp = builder
        .tempfile_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    write(temp.path()).with_context(|| format!("write {}", dest.display()))?;
    Ok(Staged {
        temp,
        dest: dest.to_path_buf(),
    })
}

fn commit(staged: Vec<Staged>) -> anyhow::Result<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for Staged { temp, dest } in staged {
        if let Err(e) = temp.persist(&dest) {
            for path in &written {
                if let Err(err) = fs::remove_file(path) {
                    warn!(?path, %err, "could not remove partial output");
                }
            }
            return Err(anyhow::Error::new(e.error).context(format!("write {}", dest.display())));
        }
        info!(path = ?dest, "written");
        written.push(dest);
    }
    Ok(written)
}

fn render_stylesheet(cli: &Cli, sheet: &SpriteSheet) -> anyhow::Result<(PathBuf, String)> {
    if let Some(path) = &cli.template {
        let tpl = fs::read_to_string(path)
            .with_context(|| format!("read template {}", path.display()))?;
        return Ok((sheet.stylesheet_path.clone(), render_template(&tpl, sheet)?));
    }
    match cli.format {
        StyleFormat::Less => Ok((sheet.stylesheet_path.clone(), to_less(sheet))),
        StyleFormat::Css => {
            let path = sheet
                .image_path
                .with_file_name(format!("{}.css", sheet.sprite_name));
            Ok((path, render_template(include_str!("templates/css.hbs"), sheet)?))
        }
    }
}

fn render_template(tpl: &str, sheet: &SpriteSheet) -> anyhow::Result<String> {
    let mut reg = Handlebars::new();
    reg.set_strict_mode(true);
    reg.register_escape_fn(handlebars::no_escape);
    reg.register_template_string("tpl", tpl)?;
    Ok(reg.render("tpl", &build_template_context(sheet))?)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Serialize)]
struct TemplateSprite {
    name: String,
    class: String,
    x: i64,
    y: i64,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TemplateContext {
    sprite: String,
    image: String,
    direction: Direction,
    width: u32,
    height: u32,
    sprites: Vec<TemplateSprite>,
}

fn build_template_context(sheet: &SpriteSheet) -> TemplateContext {
    let sprites = sheet
        .placements
        .iter()
        .map(|p| TemplateSprite {
            name: p.file_name.clone(),
            class: class_name(&p.file_name),
            x: p.offset_x,
            y: p.offset_y,
            w: p.width,
            h: p.height,
        })
        .collect();
    TemplateContext {
        sprite: class_name(&sheet.sprite_name),
        image: sheet.image_file.clone(),
        direction: sheet.direction,
        width: sheet.width,
        height: sheet.height,
        sprites,
    }
}

/// `"Home Icon.png"` -> `"home-icon"`.
fn class_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name);
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
