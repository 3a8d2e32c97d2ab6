use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_core::dungeon::{
    DungeonConfig, DungeonGenerator, Host, NavGraph, NavPoint, NavSyncScheduler, PlayerAvatar,
    SyncOutcome,
};
use dungeon_core::{GridCell, RoomKind, SpawnKind};
use tools::{AsciiCanvas, ContentRegistry, DungeonConfigFile, RingWallBuilder};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about = "Generate a corridor-first dungeon", long_about = None)]
struct Args {
    /// TOML config file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    corridor_length: Option<i32>,
    #[arg(long)]
    corridor_count: Option<i32>,
    #[arg(long)]
    room_percent: Option<f32>,
    #[arg(long)]
    corridor_width: Option<i32>,
    /// Print the result as JSON instead of a map
    #[arg(long)]
    json: bool,
    /// Print the effective config as TOML and exit
    #[arg(long)]
    dump_config: bool,
    /// Save the run's config, with its resolved seed, as TOML for replaying
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

impl Args {
    fn apply_overrides(&self, config: &mut DungeonConfig) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(length) = self.corridor_length {
            config.corridor_length = length;
        }
        if let Some(count) = self.corridor_count {
            config.corridor_count = count;
        }
        if let Some(percent) = self.room_percent {
            config.room_percent = percent;
        }
        if let Some(width) = self.corridor_width {
            config.corridor_width = width;
        }
    }
}

#[derive(Default)]
struct ConsoleAvatar {
    position: Option<GridCell>,
}

impl PlayerAvatar for ConsoleAvatar {
    fn teleport(&mut self, position: GridCell) {
        tracing::info!(%position, "player placed");
        self.position = Some(position);
    }
}

struct ConsoleNavGraph;

impl NavGraph for ConsoleNavGraph {
    fn is_active(&self) -> bool {
        true
    }

    fn resize(&mut self, center: NavPoint, width: i32, height: i32) {
        tracing::info!(center_x = center.x, center_y = center.y, width, height, "nav graph resize");
    }

    fn rescan(&mut self) {
        tracing::info!("nav graph rescan");
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DungeonConfigFile::load(path)?.dungeon,
        None => DungeonConfig::default(),
    };
    args.apply_overrides(&mut config);

    if args.dump_config {
        print!("{}", DungeonConfigFile::new(config).to_toml_string()?);
        return Ok(());
    }

    let mut canvas = AsciiCanvas::default();
    let mut walls = RingWallBuilder;
    let mut content = ContentRegistry::default();
    let mut avatar = ConsoleAvatar::default();
    let result = {
        let mut host = Host {
            painter: &mut canvas,
            walls: &mut walls,
            content: &mut content,
            player: Some(&mut avatar),
        };
        DungeonGenerator::new().generate(&config, &mut host).context("dungeon generation failed")?
    };

    if let Some(path) = &args.write_config {
        DungeonConfigFile::for_replay(&config, &result).write_atomic(path)?;
        tracing::info!(path = %path.display(), "config saved");
    }

    let mut scheduler = NavSyncScheduler::default();
    scheduler.on_generation_complete(result.completion_event());
    thread::sleep(scheduler.settle_delay());
    if let SyncOutcome::Settling { remaining } =
        scheduler.advance(scheduler.settle_delay(), Some(&mut ConsoleNavGraph))
    {
        tracing::warn!(?remaining, "nav graph sync still settling");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).context("failed to encode result")?);
        return Ok(());
    }

    print!("{}", canvas.render(&result));
    println!();
    println!("Seed: {}", result.seed);
    println!("Floor cells: {}", result.floor.len());
    println!("Wall cells: {}", canvas.walls().len());
    println!("Rooms: {}", result.rooms.len());
    for kind in RoomKind::ALL {
        let count = result.rooms.iter().filter(|room| room.kind == kind).count();
        println!("  {kind}: {count}");
    }
    if let Some(boss) = result.room_of_kind(RoomKind::Boss) {
        println!("Boss room seed: {}", boss.seed);
    }
    println!("Player spawn: {}", result.player_spawn);
    if content.is_empty() {
        println!("Spawned: nothing");
    } else {
        println!(
            "Spawned: {} ({} items, {} enemies)",
            content.len(),
            content.count_of(SpawnKind::Item),
            content.count_of(SpawnKind::Enemy)
        );
        let mut prefabs: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in content.iter() {
            *prefabs.entry(entry.prefab.as_str()).or_default() += 1;
        }
        for (prefab, count) in prefabs {
            println!("  {prefab}: {count}");
        }
    }
    if result.spawns.iter().any(|spawn| content.get(spawn.handle).is_none()) {
        tracing::warn!("spawn record handle does not resolve in the content registry");
    }
    if avatar.position != Some(result.player_spawn) {
        tracing::warn!("player avatar was not placed on the reported spawn cell");
    }
    println!("Fingerprint: {:016x}", result.fingerprint());

    Ok(())
}
