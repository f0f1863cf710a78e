//! Build plate placement tool
//!
//! Loads mesh files onto a virtual build plate, optionally moves the last
//! loaded object and prints every placement in printer axes (Z up), followed
//! by a warning when anything sits outside the build volume.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bp_core::{ObjectView, Visualizer};
use bp_viewport::ViewportState;
use bp_viewport::renderer::ObjectHighlight;
use clap::Parser;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "bp")]
#[command(about = "Place mesh files on a 3D printer build plate")]
struct Cli {
    /// Mesh files (STL, OBJ, 3MF)
    files: Vec<PathBuf>,

    /// RON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Build plate width, depth and height in mm
    #[arg(long, value_delimiter = ',', value_name = "W,D,H")]
    plate: Option<Vec<f32>>,

    /// Load each mesh of a multi-mesh file as its own object
    #[arg(long)]
    separate: bool,

    /// Move the last loaded object to X,Y,Z (printer axes)
    #[arg(
        long,
        value_delimiter = ',',
        value_name = "X,Y,Z",
        allow_hyphen_values = true
    )]
    translate: Option<Vec<f32>>,

    /// Rotate the last loaded object to X,Y,Z degrees (printer axes)
    #[arg(
        long,
        value_delimiter = ',',
        value_name = "X,Y,Z",
        allow_hyphen_values = true
    )]
    rotate: Option<Vec<f32>>,

    /// Uniformly scale the last loaded object
    #[arg(long)]
    scale: Option<f32>,

    /// Print placements as RON
    #[arg(long)]
    ron: bool,

    /// Write the effective configuration to a file and exit
    #[arg(long, value_name = "FILE")]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bp_cli=info,bp_core=info,bp_viewport=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(plate) = triple("--plate", &cli.plate)? {
        config.viewer.build_plate_size = plate;
    }
    if cli.separate {
        config.viewer.combine_meshes = false;
    }

    if let Some(path) = &cli.write_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        tracing::info!("Configuration written to {}", path.display());
        return Ok(());
    }

    if cli.files.is_empty() {
        anyhow::bail!("No mesh files given");
    }

    let mut visualizer = Visualizer::new(config.viewer.clone());
    for path in &cli.files {
        let ids = visualizer
            .add_object_from_path(path, None)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        tracing::info!("Loaded {} object(s) from {}", ids.len(), path.display());
        if let Some(last) = ids.last() {
            visualizer.set_selected_object_by_id(Some(*last));
        }
    }

    place_selected(&mut visualizer, &cli)?;

    let views = visualizer.all_objects();
    if cli.ron {
        let text = ron::ser::to_string_pretty(&views, ron::ser::PrettyConfig::default())
            .context("Failed to serialize placements")?;
        println!("{text}");
    } else {
        print_table(&views);
    }

    let mut viewport = ViewportState::new(
        visualizer.store().build_plate_size(),
        1280.0,
        720.0,
        config.gizmo,
        config.drag,
    );
    let scene = viewport.scene(visualizer.store());
    let flagged = scene
        .objects
        .iter()
        .filter(|o| o.highlight == ObjectHighlight::OutOfPlate)
        .count();
    tracing::debug!(
        "Scene: {} object(s), {} marker segment(s), gizmo {}",
        scene.objects.len(),
        scene.corner_markers.len(),
        if scene.gizmo.is_some() { "shown" } else { "hidden" }
    );

    if visualizer.warning_models_out_of_plate() {
        let [w, d, h] = visualizer.build_plate_size();
        tracing::warn!(
            "{} object(s) outside the {}x{}x{} mm build volume",
            flagged,
            w,
            d,
            h
        );
    }
    Ok(())
}

/// Apply the placement flags to the selected object
fn place_selected(visualizer: &mut Visualizer, cli: &Cli) -> Result<()> {
    if let Some(scale) = cli.scale {
        visualizer.scale_uniform_selected(scale);
    }
    if let Some([x, y, z]) = triple("--rotate", &cli.rotate)? {
        visualizer.rotate_x_selected(x.to_radians());
        visualizer.rotate_y_selected(y.to_radians());
        visualizer.rotate_z_selected(z.to_radians());
    }
    if let Some([x, y, z]) = triple("--translate", &cli.translate)? {
        visualizer.translate_x_selected(x);
        visualizer.translate_y_selected(y);
        visualizer.translate_z_selected(z);
    }
    Ok(())
}

fn triple(flag: &str, values: &Option<Vec<f32>>) -> Result<Option<[f32; 3]>> {
    match values.as_deref() {
        None => Ok(None),
        Some(&[a, b, c]) => Ok(Some([a, b, c])),
        Some(other) => anyhow::bail!("{flag} takes 3 values, got {}", other.len()),
    }
}

fn print_table(views: &[ObjectView]) {
    println!(
        "{:<24} {:>6} {:>26} {:>26} {:>20} {:>26}",
        "name", "format", "position (mm)", "rotation (deg)", "scale", "size (mm)"
    );
    for view in views {
        let rotation = view.rotation * (180.0 / std::f32::consts::PI);
        println!(
            "{:<24} {:>6} {:>26} {:>26} {:>20} {:>26}",
            view.name,
            view.format.as_str(),
            format_vec(view.position.to_array(), 2),
            format_vec(rotation.to_array(), 1),
            format_vec(view.scale.to_array(), 3),
            format_vec(view.size.to_array(), 2),
        );
    }
}

fn format_vec(v: [f32; 3], precision: usize) -> String {
    format!(
        "{:.p$}, {:.p$}, {:.p$}",
        v[0],
        v[1],
        v[2],
        p = precision
    )
}
