use anyhow::{Context, Result};
use clap::Parser;
use glint_core::{SceneDescription, PRESETS};
use glint_renderer::{render_progressive, Camera, Film, RenderConfig, Scene, DEFAULT_BUCKET_SIZE};
use std::path::PathBuf;

mod sink;

use sink::FileSink;

/// Render a sphere scene with recursive ray tracing.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(next_line_help = true)]
struct Args {
    /// Scene description file (JSON).
    #[arg(required_unless_present_any = ["builtin", "list_presets"])]
    scene: Option<PathBuf>,
    /// Output image; `.ppm` writes plain-text PPM, anything else PNG.
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
    /// Image width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Image height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Samples per pixel in each pass.
    #[arg(short, long)]
    samples: Option<u32>,
    /// Maximum recursion depth.
    #[arg(long)]
    max_depth: Option<u32>,
    /// Number of progressive passes.
    #[arg(long)]
    passes: Option<u32>,
    /// Seed of the per-pixel random streams.
    #[arg(long)]
    seed: Option<u64>,
    /// Skip recursion branches weighted below this (0 traces every branch).
    #[arg(long)]
    min_weight: Option<f32>,
    /// Shade rays leaving Phong spheres from the inside.
    #[arg(long)]
    shade_on_exit: bool,
    /// Bucket edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,
    /// Render the built-in demo scene.
    #[arg(long, conflicts_with = "scene")]
    builtin: bool,
    /// Print the material preset catalog and exit.
    #[arg(long)]
    list_presets: bool,
}

impl Args {
    fn load_description(&self) -> Result<SceneDescription> {
        match &self.scene {
            Some(path) if !self.builtin => SceneDescription::load(path)
                .with_context(|| format!("failed to load scene {}", path.display())),
            _ => {
                log::info!("Using built-in demo scene");
                Ok(SceneDescription::demo())
            }
        }
    }

    /// Command-line values take precedence over the scene file.
    fn apply(&self, description: &mut SceneDescription) {
        if let Some(width) = self.width {
            description.image.width = width;
        }
        if let Some(height) = self.height {
            description.image.height = height;
        }
        if let Some(samples) = self.samples {
            description.render.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            description.render.max_depth = max_depth;
        }
        if let Some(passes) = self.passes {
            description.render.passes = passes;
        }
        if let Some(seed) = self.seed {
            description.render.seed = seed;
        }
        if let Some(min_weight) = self.min_weight {
            description.render.min_weight = min_weight;
        }
        if self.shade_on_exit {
            description.render.shade_on_exit = true;
        }
    }
}

fn list_presets() {
    println!(
        "{:<14} {:<24} {:<24} {:<24} {:>9} {:>5}",
        "name", "ambient", "diffuse", "specular", "shininess", "ior"
    );
    for (name, preset) in PRESETS {
        let fmt = |v: [f32; 3]| format!("{:.4} {:.4} {:.4}", v[0], v[1], v[2]);
        println!(
            "{:<14} {:<24} {:<24} {:<24} {:>9.4} {:>5.2}",
            name,
            fmt(preset.ambient.to_array()),
            fmt(preset.diffuse.to_array()),
            fmt(preset.specular.to_array()),
            preset.shininess,
            preset.ior
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    if args.list_presets {
        list_presets();
        return Ok(());
    }

    let mut description = args.load_description()?;
    args.apply(&mut description);
    description.validate().context("invalid render settings")?;

    let scene = Scene::from_description(&description).context("failed to build scene")?;
    let camera = Camera::from_description(&description.camera, description.aspect_ratio())
        .context("failed to build camera")?;
    let config = RenderConfig::from(&description.render);

    let mut film = Film::new(description.image.width, description.image.height);
    let mut sink = FileSink::for_path(&args.output);

    render_progressive(
        &camera,
        &scene,
        &config,
        &mut film,
        description.render.passes,
        args.bucket_size,
        &mut sink,
    )?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}
