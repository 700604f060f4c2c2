use clap::{Parser, ValueEnum};
use anyhow::{Context, Result};
use mesh_accessor::prelude::*;

#[derive(Parser)]
#[command(name = "mesh-accessor-cli")]
#[command(about = "Dumps decoded indices or vertex attributes of a packed mesh as JSON")]
struct Cli {
    /// Mesh manifest (JSON) path
    #[arg(short, long)]
    manifest: String,

    /// Name of the sub-mesh to read
    #[arg(short, long)]
    sub_mesh: String,

    /// Read the index list of the sub-mesh
    #[arg(long, conflicts_with = "attribute")]
    indices: bool,

    /// Read the attribute with this name, e.g. "Position0" or "map1"
    #[arg(short, long)]
    attribute: Option<String>,

    /// First element to read
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Number of elements to read; defaults to the rest of the sub-mesh
    #[arg(long)]
    count: Option<usize>,

    /// Half-float widening; overrides the manifest's config
    #[arg(long, value_enum)]
    half_float: Option<HalfFloatArg>,

    /// Derive component counts from name patterns instead of the canonical name table;
    /// overrides the manifest's config
    #[arg(long)]
    name_pattern: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum HalfFloatArg {
    Ieee,
    Legacy,
}

impl From<HalfFloatArg> for HalfFloatMode {
    fn from(arg: HalfFloatArg) -> Self {
        match arg {
            HalfFloatArg::Ieee => HalfFloatMode::Ieee,
            HalfFloatArg::Legacy => HalfFloatMode::Legacy,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (mesh, manifest_cfg) = load_manifest_with_config(&cli.manifest)
        .with_context(|| format!("Failed to load manifest '{}'", cli.manifest))?;
    let sub_mesh = mesh.sub_mesh(&cli.sub_mesh)
        .with_context(|| format!("No sub-mesh named '{}'", cli.sub_mesh))?;

    let mut cfg = manifest_cfg.unwrap_or_else(Config::default);
    if let Some(half_float) = cli.half_float {
        cfg.half_float = half_float.into();
    }
    if cli.name_pattern {
        cfg.component_counts = ComponentCountPolicy::NamePattern;
    }
    let accessor = VertexAccessor::new(Some(&mesh), cfg);
    log::info!("Decoding with {:?}", accessor.get_config());

    let json = if cli.indices {
        let count = remaining(cli.count, cli.start, sub_mesh.index_count);
        let indices = accessor.read_indices(cli.start, count, sub_mesh)?;
        serde_json::to_string_pretty(&indices)?
    } else if let Some(name) = &cli.attribute {
        let count = remaining(cli.count, cli.start, sub_mesh.vertex_count);
        let values = accessor.read_attribute(name, cli.start, count, sub_mesh)?;
        if values.is_empty() && count > 0 {
            log::warn!("Sub-mesh '{}' has no attribute '{}'", cli.sub_mesh, name);
        }
        serde_json::to_string_pretty(&values)?
    } else {
        anyhow::bail!("Either --indices or --attribute must be given");
    };

    println!("{}", json);
    Ok(())
}

fn remaining(count: Option<usize>, start: usize, declared: u32) -> usize {
    count.unwrap_or_else(|| (declared as usize).saturating_sub(start))
}
