//! platformer-nav - bake and query platformer navigation graphs.
//!
//! - `platformer-nav bake <LEVEL>` - classify a level and report its links
//! - `platformer-nav path <LEVEL> --from X,Y --to X,Y` - bake, then find a path
//! - `platformer-nav default-config` - print the default YAML configuration

mod config;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use platformer_nav::{
    build_basic_links, GridBuilder, JumpLinkSimulator, JumpReport, LinkKind, NavConfig, NavError,
    NodeType, PathGrid, Pathfinder, PlatformPath, TileMap, Vec2,
};

#[derive(Parser)]
#[command(name = "platformer-nav")]
#[command(about = "Platformer navigation graph baking and queries", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a level and build its links
    Bake {
        /// ASCII level file
        level: PathBuf,

        /// Also simulate jump links
        #[arg(long)]
        jumps: bool,

        /// YAML configuration (the grid is fitted to the level when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print a JSON summary instead of the node map
        #[arg(long)]
        json: bool,
    },

    /// Bake a level and find a path between two world points
    ///
    /// Prints "no path" with the reason and exits 0 when the points are not connected.
    Path {
        /// ASCII level file
        level: PathBuf,

        /// Start point as `X,Y`
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Vec2,

        /// Target point as `X,Y`
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Vec2,

        /// Skip jump simulation and search walk/drop links only
        #[arg(long)]
        no_jumps: bool,

        /// YAML configuration (the grid is fitted to the level when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the path as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as YAML
    DefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Bake {
            level,
            jumps,
            config,
            json,
        } => bake_level(&level, config.as_deref(), jumps, json),
        Commands::Path {
            level,
            from,
            to,
            no_jumps,
            config,
            json,
        } => find_path(&level, config.as_deref(), from, to, !no_jumps, json),
        Commands::DefaultConfig => {
            print!("{}", config::default_yaml()?);
            Ok(())
        }
    }
}

fn parse_point(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x {x:?}: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y {y:?}: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn load_level(path: &Path) -> Result<TileMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read level from {}", path.display()))?;
    text.parse::<TileMap>()
        .with_context(|| format!("Failed to parse level from {}", path.display()))
}

struct Baked {
    grid: PathGrid,
    jumps: Option<JumpReport>,
}

fn bake(level: &Path, config_path: Option<&Path>, jumps: bool) -> Result<Baked> {
    let map = load_level(level)?;
    let config: NavConfig = config::load_or_fit(config_path, &map)?;
    tracing::info!(
        level = %level.display(),
        width = config.grid.width,
        height = config.grid.height,
        "Baking level"
    );

    let mut grid = GridBuilder::new(&map, &config.grid).build();
    build_basic_links(&mut grid);
    let jumps = jumps.then(|| {
        JumpLinkSimulator::new(&map, &config.jump).build_jump_links(&mut grid)
    });
    Ok(Baked { grid, jumps })
}

#[derive(Serialize)]
struct BakeSummary {
    width: u32,
    height: u32,
    node_types: Vec<(NodeType, usize)>,
    links: Vec<(LinkKind, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jumps: Option<JumpReport>,
}

impl BakeSummary {
    fn new(baked: &Baked) -> Self {
        let grid = &baked.grid;
        let node_types = NodeType::ALL
            .iter()
            .map(|&t| (t, grid.nodes().iter().filter(|n| n.node_type == t).count()))
            .filter(|&(_, count)| count > 0)
            .collect();
        let links = LinkKind::ALL
            .iter()
            .map(|&k| (k, grid.link_count_by_kind(k)))
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            node_types,
            links,
            jumps: baked.jumps,
        }
    }
}

fn bake_level(level: &Path, config_path: Option<&Path>, jumps: bool, json: bool) -> Result<()> {
    let baked = bake(level, config_path, jumps)?;
    let summary = BakeSummary::new(&baked);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print!("{}", baked.grid.type_map());
    println!();
    for (kind, count) in &summary.links {
        println!("{kind} links: {count}");
    }
    if let Some(report) = &summary.jumps {
        println!(
            "jump pairs simulated: {} ({} trajectories, {} timed out)",
            report.pairs_simulated, report.trajectories, report.timeouts
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct PathOutput<'a> {
    path: Option<&'a PlatformPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    waypoints: Option<Vec<Vec2>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

fn find_path(
    level: &Path,
    config_path: Option<&Path>,
    from: Vec2,
    to: Vec2,
    jumps: bool,
    json: bool,
) -> Result<()> {
    let baked = bake(level, config_path, jumps)?;
    let search = Pathfinder::new().search(&baked.grid, from, to);
    print!("{}", render_path(&baked.grid, from, to, &search, json)?);
    Ok(())
}

/// Format a search result. A failed search is reported, not returned as an error.
fn render_path(
    grid: &PathGrid,
    from: Vec2,
    to: Vec2,
    search: &std::result::Result<PlatformPath, NavError>,
    json: bool,
) -> Result<String> {
    let path = match search {
        Ok(path) => path,
        Err(err) if json => {
            let output = PathOutput {
                path: None,
                waypoints: None,
                reason: Some(err.to_string()),
            };
            return Ok(format!("{}\n", serde_json::to_string_pretty(&output)?));
        }
        Err(err) => return Ok(format!("no path from {from:?} to {to:?}: {err}\n")),
    };

    if json {
        let output = PathOutput {
            path: Some(path),
            waypoints: Some(path.waypoints(grid)),
            reason: None,
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&output)?));
    }

    let mut out = String::new();
    for (i, &index) in path.nodes.iter().enumerate() {
        let coord = grid.coord_of(index);
        let node = &grid.nodes()[index];
        match path.links.get(i) {
            Some(link) => writeln!(
                out,
                "({:>3},{:>3}) {:?} --{}-->",
                coord.x, coord.y, node.node_type, link.kind
            )?,
            None => writeln!(out, "({:>3},{:>3}) {:?}", coord.x, coord.y, node.node_type)?,
        }
    }
    writeln!(out, "cost: {}", path.cost)?;
    Ok(out)
}
