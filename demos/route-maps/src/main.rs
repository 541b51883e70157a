//! route-maps — inspect map descriptions through the road-network cache.
//!
//! ```text
//! route-maps --maps-dir demos/route-maps/maps list
//! route-maps show romania.txt --json
//! route-maps estimate romania.txt --goal Bucharest --heuristic SLD
//! ```
//!
//! The maps directory defaults to `$RN_MAPS_DIR`, then `./maps`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rn_core::Point2D;
use rn_loader::{LoaderConfig, RoadNetworkCache};
use rn_network::{Heuristic, HeuristicKind, RoadNetwork};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect road-network map descriptions")]
struct Cli {
    /// Directory holding map descriptions.
    #[arg(long)]
    maps_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the map descriptions in the maps directory.
    List,
    /// Load a map and print its nodes and roads.
    Show {
        /// Map identifier, relative to the maps directory.
        map: String,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the heuristic estimate from every node to a goal.
    Estimate {
        /// Map identifier, relative to the maps directory.
        map: String,
        /// Goal node id.
        #[arg(long)]
        goal: String,
        /// `SLD` (straight-line distance) or `=0`.
        #[arg(long, default_value_t = HeuristicKind::StraightLine)]
        heuristic: HeuristicKind,
    },
}

// ── JSON report ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MapReport<'a> {
    identifier: &'a str,
    name:       &'a str,
    nodes:      Vec<NodeReport<'a>>,
    roads:      usize,
}

#[derive(Serialize)]
struct NodeReport<'a> {
    id:        &'a str,
    position:  Option<Point2D>,
    neighbors: Vec<NeighborReport<'a>>,
}

#[derive(Serialize)]
struct NeighborReport<'a> {
    id:     &'a str,
    weight: f64,
}

impl<'a> MapReport<'a> {
    fn new(identifier: &'a str, network: &'a RoadNetwork) -> Self {
        let nodes = network
            .all_node_ids()
            .map(|id| NodeReport {
                id,
                position: network.position(id),
                neighbors: network
                    .neighbors(id)
                    .map(|n| NeighborReport { id: n.id, weight: n.weight })
                    .collect(),
            })
            .collect();
        Self { identifier, name: network.name(), nodes, roads: network.road_count() }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = LoaderConfig::resolve(cli.maps_dir.as_deref());
    let cache = RoadNetworkCache::from_config(&config);

    match cli.command {
        Command::List => handle_list(&cache, &config),
        Command::Show { map, json } => handle_show(&cache, &map, json),
        Command::Estimate { map, goal, heuristic } => {
            handle_estimate(&cache, &map, &goal, heuristic)
        }
    }
}

fn handle_list(cache: &RoadNetworkCache, config: &LoaderConfig) -> Result<()> {
    let maps = cache
        .available()
        .with_context(|| format!("failed to list maps in {}", config.maps_dir.display()))?;
    println!("Maps in {}:", config.maps_dir.display());
    for map in maps {
        println!("- {map}");
    }
    Ok(())
}

fn handle_show(cache: &RoadNetworkCache, map: &str, json: bool) -> Result<()> {
    let network = load(cache, map)?;

    if json {
        let report = MapReport::new(map, &network);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== {} ({map}) ===", network.name());
    println!(
        "Nodes: {}  |  Roads: {}  |  Mode: {:?}",
        network.node_count(),
        network.road_count(),
        network.mode()
    );
    println!();
    println!("{:<16} {:<22} Neighbors", "Node", "Position");
    println!("{}", "-".repeat(60));
    for id in network.all_node_ids() {
        let position = network
            .position(id)
            .map_or_else(|| "-".to_owned(), |p| p.to_string());
        let neighbors: Vec<String> = network
            .neighbors(id)
            .map(|n| format!("{} ({})", n.id, n.weight))
            .collect();
        println!("{id:<16} {position:<22} {}", neighbors.join(", "));
    }
    Ok(())
}

fn handle_estimate(
    cache: &RoadNetworkCache,
    map: &str,
    goal: &str,
    kind: HeuristicKind,
) -> Result<()> {
    let network = load(cache, map)?;
    if !network.contains(goal) {
        bail!("goal {goal:?} is not a node of {map}");
    }

    let heuristic = kind.bind(goal, Arc::clone(&network));
    println!("h[{kind}] to {goal}:");
    for origin in network.origins() {
        println!("{origin:<16} {:>10.3}", heuristic.evaluate(origin));
    }
    Ok(())
}

fn load(cache: &RoadNetworkCache, map: &str) -> Result<Arc<RoadNetwork>> {
    cache
        .load(map)
        .with_context(|| format!("failed to load map {map:?}"))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
