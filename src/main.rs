//! `menu-designer` command line.
//!
//! | Command | Does |
//! |---------|------|
//! | `new <menu.json>` | Write a starter menu |
//! | `show <menu.json> [--keys ...]` | Print the tree and the visible window |
//! | `export <menu.json> [--out DIR]` | Generate C sources |
//! | `preview <menu.json> --png FILE [--keys ...]` | Render a PNG |
//! | `sim <menu.json>` | Interactive window (`sdl` feature) |
//!
//! Settings come from `--config` (TOML) and are overridden by command-line flags.
//! Logging follows `RUST_LOG`; `-v` / `-vv` raise the default level.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use menu_common::MenuTree;
use menu_designer::config::PREVIEW_SCALE;
use menu_designer::fonts::cjk_backend;
use menu_designer::preview::{Preview, parse_keys};
use menu_designer::sim::Simulator;
use menu_designer::{DesignerConfig, ExportJob, project};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "menu-designer")]
#[command(version)]
#[command(about = "Design hierarchical menus for small displays and export them as C", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Designer configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Display overrides shared by commands that lay out the menu.
#[derive(Args)]
struct DisplayArgs {
    /// Display profile (oled-128x64, tft-240x240, tft-320x240, lcd-160x128, custom)
    #[arg(long)]
    profile: Option<String>,

    /// Menu font size in pixels
    #[arg(long)]
    font_px: Option<u32>,

    /// Built-in font family (mono, profont)
    #[arg(long)]
    family: Option<String>,
}

/// Export overrides. Each flag takes an optional value, so `--cjk=false` turns off
/// a feature enabled in the configuration file.
#[derive(Args)]
struct ExportArgs {
    /// Destination directory (gets inc/ and src/)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Embed the printable-ASCII glyph table
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    ascii_font: Option<bool>,

    /// Emit a menu_draw() skeleton
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    draw_skeleton: Option<bool>,

    /// Embed glyphs for the CJK characters in the menu
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    cjk: Option<bool>,

    /// Emit the hardware-agnostic porting layer
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    host_independent: Option<bool>,

    /// TrueType/OpenType font for the CJK subset
    #[arg(long)]
    cjk_font: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter menu file
    New {
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the tree outline and the visible window
    Show {
        file: PathBuf,

        /// Key script to replay first, e.g. "down,enter"
        #[arg(long, default_value = "")]
        keys: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Generate C sources
    Export {
        file: PathBuf,

        #[command(flatten)]
        export: ExportArgs,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Render the menu to a PNG
    Preview {
        file: PathBuf,

        /// Output image
        #[arg(long)]
        png: PathBuf,

        /// Key script to replay first, e.g. "down,enter"
        #[arg(long, default_value = "")]
        keys: String,

        /// Pixel scale
        #[arg(long, default_value_t = PREVIEW_SCALE)]
        scale: u32,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Interactive preview window
    Sim {
        file: PathBuf,

        #[command(flatten)]
        display: DisplayArgs,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();
}

/// Fold command-line display flags into the file configuration.
fn apply_display_args(
    config: &mut DesignerConfig,
    args: DisplayArgs,
) {
    if let Some(profile) = args.profile {
        config.display.profile = profile;
    }
    if let Some(px) = args.font_px {
        config.display.font_px = Some(px);
    }
    if let Some(family) = args.family {
        config.font.family = family;
    }
}

/// Fold command-line export flags into the file configuration.
fn apply_export_args(
    config: &mut DesignerConfig,
    args: ExportArgs,
) {
    let section = &mut config.export;
    let flags = [
        (&mut section.ascii_font, args.ascii_font),
        (&mut section.draw_skeleton, args.draw_skeleton),
        (&mut section.cjk_subset, args.cjk),
        (&mut section.host_independent, args.host_independent),
    ];
    for (flag, value) in flags {
        if let Some(value) = value {
            *flag = value;
        }
    }
    if let Some(out) = args.out {
        section.out_dir = out;
    }
    if let Some(cjk_font) = args.cjk_font {
        config.font.cjk_font = Some(cjk_font);
    }
}

fn load(
    config: &DesignerConfig,
    file: &Path,
) -> Result<MenuTree> {
    project::load_tree(file, config.leaf_policy()).with_context(|| format!("loading {}", file.display()))
}

fn show(
    config: &DesignerConfig,
    file: &Path,
    keys: &str,
) -> Result<()> {
    let mut tree = load(config, file)?;
    let profile = config.profile()?;
    print!("{}", project::outline(&tree));

    let preview = Preview::run(&mut tree, profile, config.font.family.as_str(), &parse_keys(keys)?);
    let frame = preview.frame();
    println!();
    println!("[{}]  {}", profile.kind, preview.breadcrumb().join(" > "));
    for row in &frame.rows {
        let marker = if row.selected { ">" } else { " " };
        let suffix = if row.submenu { " >" } else { "" };
        println!("{marker} {}{suffix}", row.label);
    }
    if frame.rows.is_empty() {
        println!("  (empty)");
    }
    println!("page {}/{}  item {}/{}", frame.page_index + 1, frame.page_count, frame.cursor + 1, frame.total);
    if let Some(callback) = &frame.popup {
        println!("RUN {callback}");
    }
    Ok(())
}

fn export(
    config: &DesignerConfig,
    file: &Path,
) -> Result<()> {
    let tree = load(config, file)?;
    let profile = config.profile()?;
    let options = config.export_options();
    let backend = cjk_backend(config.font.cjk_font.as_deref().filter(|_| options.cjk_subset))?;

    let report = ExportJob::new(&tree, &profile, options, backend.as_ref())
        .with_font(config.font.family.as_str(), config.glyph_px(&profile))
        .run(&config.export.out_dir)?;
    for path in &report.written {
        println!("{}", path.display());
    }
    Ok(())
}

fn sim(
    config: &DesignerConfig,
    file: &Path,
) -> Result<()> {
    let tree = load(config, file)?;
    let profile = config.profile()?;
    let simulator = Simulator::new(tree, profile, config.font.family.as_str(), Some(file.to_owned()));

    #[cfg(feature = "sdl")]
    {
        menu_designer::sim::run(simulator)?;
        Ok(())
    }
    #[cfg(not(feature = "sdl"))]
    {
        let _ = simulator;
        bail!("interactive window not available: rebuild with `--features sdl`")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = DesignerConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::New { file, force } => {
            if file.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", file.display());
            }
            let tree = project::starter_tree(config.leaf_policy());
            project::save_tree(&file, &tree)?;
            println!("{}", file.display());
            Ok(())
        }
        Commands::Show { file, keys, display } => {
            apply_display_args(&mut config, display);
            show(&config, &file, &keys)
        }
        Commands::Export { file, export: args, display } => {
            apply_display_args(&mut config, display);
            apply_export_args(&mut config, args);
            export(&config, &file)
        }
        Commands::Preview {
            file,
            png,
            keys,
            scale,
            display,
        } => {
            apply_display_args(&mut config, display);
            let mut tree = load(&config, &file)?;
            let profile = config.profile()?;
            let preview = Preview::run(&mut tree, profile, config.font.family.as_str(), &parse_keys(&keys)?);
            preview.save_png(&png, scale)?;
            println!("{}", png.display());
            Ok(())
        }
        Commands::Sim { file, display } => {
            apply_display_args(&mut config, display);
            sim(&config, &file)
        }
    }
}
