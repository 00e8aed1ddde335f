use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nes_quant::auto_palette::DEFAULT_COUNT;
use nes_quant::color::{hardware_label, HARDWARE_COLORS};
use nes_quant::knob::BANK_SIZE;
use pixeler::models::ProjectConfig;
use pixeler::rendering::png_io;
use pixeler::services::{auto_palette_project, ConversionService, FileWatcher};

#[derive(Parser)]
#[command(name = "pixeler")]
#[command(about = "Pixeler - convert images into NES-palette pixel art")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PNG once
    Convert {
        /// Source PNG (sides must be multiples of 8)
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Also write raw hardware indices (one byte per pixel, 0xFF = unset)
        #[arg(long)]
        indices: Option<PathBuf>,

        /// Build knobs by median cut from the input instead of the project's
        #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u8).range(1..=BANK_SIZE as i64))]
        auto: Option<u8>,

        #[command(flatten)]
        settings: Settings,
    },
    /// Propose a knob bank for an image and print it as a project file
    AutoPalette {
        /// Source PNG
        input: PathBuf,

        /// Number of knobs to create
        #[arg(short, long, default_value_t = DEFAULT_COUNT as u8, value_parser = clap::value_parser!(u8).range(1..=BANK_SIZE as i64))]
        count: u8,

        /// Target the exact bucket averages instead of the hardware colours
        #[arg(long)]
        exact: bool,

        /// Output width for the generated project
        #[arg(long, default_value_t = 256)]
        width: u32,

        /// Output height for the generated project
        #[arg(long, default_value_t = 256)]
        height: u32,

        /// Write the project here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the 64 hardware colours
    Palette {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Re-run the conversion whenever the input or project file changes
    Watch {
        /// Source PNG
        input: PathBuf,

        /// Project file
        #[arg(short, long)]
        project: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Also write raw hardware indices
        #[arg(long)]
        indices: Option<PathBuf>,
    },
}

/// Project file plus per-run overrides.
#[derive(Args, Debug, Default)]
struct Settings {
    /// YAML project file
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Output width (multiple of 8, 8-512)
    #[arg(long)]
    width: Option<u32>,

    /// Output height (multiple of 8, 8-512)
    #[arg(long)]
    height: Option<u32>,

    /// Dither style: none, waves, floyd-steinberg, horizontal, van-gogh,
    /// mask-z1, mask-cz332, mask-brix, mask-custom
    #[arg(long)]
    dither: Option<String>,

    /// Dither attenuation (0-40)
    #[arg(long)]
    scale: Option<u8>,

    /// Diffusion dead zone / mask magnification (0-48)
    #[arg(long)]
    cutoff: Option<u8>,

    /// Mask image for mask-custom
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Remove isolated pixels (`--cull-dots=false` overrides the project)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    cull_dots: Option<bool>,

    /// Remove two-pixel vertical pipes
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    cull_pipes: Option<bool>,

    /// Straighten zig-zag diagonals
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    cull_zags: Option<bool>,

    /// Smooth line patterns
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    clean_lines: Option<bool>,

    /// Number of cleanup passes
    #[arg(long)]
    passes: Option<u32>,
}

impl Settings {
    /// Load the project (or defaults) and apply command-line overrides.
    fn resolve(&self) -> anyhow::Result<ProjectConfig> {
        let mut project = match &self.project {
            Some(path) => ProjectConfig::load(path)?,
            None => ProjectConfig::default(),
        };

        if let Some(width) = self.width {
            project.width = width;
        }
        if let Some(height) = self.height {
            project.height = height;
        }
        if let Some(style) = &self.dither {
            project.dither.style = style.clone();
        }
        if let Some(scale) = self.scale {
            project.dither.scale = scale;
        }
        if let Some(cutoff) = self.cutoff {
            project.dither.cutoff = cutoff;
        }
        if let Some(mask) = &self.mask {
            project.dither.mask = Some(std::path::absolute(mask)?);
        }
        let cleanup = &mut project.cleanup;
        for (flag, value) in [
            (&mut cleanup.cull_dots, self.cull_dots),
            (&mut cleanup.cull_pipes, self.cull_pipes),
            (&mut cleanup.cull_zags, self.cull_zags),
            (&mut cleanup.clean_lines, self.clean_lines),
        ] {
            if let Some(value) = value {
                *flag = value;
            }
        }
        if let Some(passes) = self.passes {
            cleanup.passes = passes;
        }

        project.validate()?;
        Ok(project)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            input,
            output,
            indices,
            auto,
            settings,
        }) => {
            init_logging();
            run_convert_command(&input, &output, indices.as_deref(), auto, &settings)
        }
        Some(Commands::AutoPalette {
            input,
            count,
            exact,
            width,
            height,
            output,
        }) => {
            init_logging();
            run_auto_palette_command(&input, count, exact, width, height, output.as_deref())
        }
        Some(Commands::Palette { json }) => run_palette_command(json),
        Some(Commands::Watch {
            input,
            project,
            output,
            indices,
        }) => {
            init_logging();
            run_watch_command(&input, &project, &output, indices.as_deref())
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for CLI
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixeler=info,nes_quant=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn run_convert_command(
    input: &Path,
    output: &Path,
    indices: Option<&Path>,
    auto: Option<u8>,
    settings: &Settings,
) -> anyhow::Result<()> {
    let mut project = settings.resolve()?;
    if let Some(count) = auto {
        let generated = auto_palette_project(input, count as usize, false, project.width, project.height)?;
        project.knobs = generated.knobs;
    }
    if project.knobs.is_empty() {
        tracing::warn!("No knobs configured; every pixel will be left unset");
    }

    let service = ConversionService::from_project(&project)?;
    let summary = service
        .convert_file(input, output, indices)
        .with_context(|| format!("converting {}", input.display()))?;

    println!(
        "Wrote {} ({}x{}, {} colors{})",
        output.display(),
        summary.width,
        summary.height,
        summary.colors,
        if summary.unset > 0 {
            format!(", {} unset", summary.unset)
        } else {
            String::new()
        }
    );
    Ok(())
}

fn run_auto_palette_command(
    input: &Path,
    count: u8,
    exact: bool,
    width: u32,
    height: u32,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let project = auto_palette_project(input, count as usize, exact, width, height)?;
    let yaml = project.to_yaml()?;
    match output {
        Some(path) => {
            std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} ({} knobs)", path.display(), project.knobs.len());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

#[derive(Serialize)]
struct PaletteEntry {
    index: u8,
    label: String,
    hex: String,
    rgb: [u8; 3],
}

fn run_palette_command(json: bool) -> anyhow::Result<()> {
    let entries: Vec<PaletteEntry> = HARDWARE_COLORS
        .iter()
        .enumerate()
        .map(|(i, rgb)| PaletteEntry {
            index: i as u8,
            label: hardware_label(i as u8),
            hex: rgb.to_hex(),
            rgb: rgb.to_bytes(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for row in entries.chunks(16) {
        let line: Vec<String> = row
            .iter()
            .map(|e| format!("{} {}", e.label, e.hex))
            .collect();
        println!("{}", line.join("  "));
    }
    Ok(())
}

fn run_watch_command(
    input: &Path,
    project_path: &Path,
    output: &Path,
    indices: Option<&Path>,
) -> anyhow::Result<()> {
    let mut project = ProjectConfig::load(project_path)?;
    let mut service = ConversionService::from_project(&project)?;

    let mut watched = vec![input.to_path_buf(), project_path.to_path_buf()];
    watched.extend(project.mask_path());
    let watcher = FileWatcher::new(&watched)?;

    if let Err(e) = service.convert_file(input, output, indices) {
        tracing::warn!(error = %e, "Conversion failed");
    }
    println!(
        "Watching {} and {} (Ctrl-C to stop)",
        input.display(),
        project_path.display()
    );

    while let Some(event) = watcher.next_change() {
        let mask_changed = project.mask_path().is_some_and(|m| event.touches(&m));
        if event.touches(project_path) || mask_changed {
            match ProjectConfig::load(project_path)
                .map_err(anyhow::Error::from)
                .and_then(|p| Ok((ConversionService::from_project(&p)?, p)))
            {
                Ok((s, p)) => {
                    service = s;
                    project = p;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Keeping previous project");
                    continue;
                }
            }
        }
        if let Err(e) = service.convert_file(input, output, indices) {
            tracing::warn!(error = %e, "Conversion failed");
        }
    }
    Ok(())
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let rust_log = std::env::var("RUST_LOG").ok();

    println!("Pixeler v{VERSION}");
    println!("NES palette pixel art converter\n");

    println!("Environment Variables:");
    println!(
        "  RUST_LOG = {}",
        rust_log.as_deref().unwrap_or("pixeler=info (default)")
    );

    println!("\nHardware Palette:");
    println!("  {} colors, {} knobs per bank", HARDWARE_COLORS.len(), BANK_SIZE);

    println!("\nCommands:");
    println!("  pixeler convert <INPUT> -o <OUTPUT> [--project FILE]  Convert once");
    println!("  pixeler auto-palette <INPUT> [--count N] [--exact]    Propose knobs");
    println!("  pixeler palette [--json]                              List hardware colors");
    println!("  pixeler watch <INPUT> -p <FILE> -o <OUTPUT>           Convert on change");
    println!("\nRun 'pixeler --help' for all options.");
}
