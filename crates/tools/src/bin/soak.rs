use std::collections::VecDeque;

use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use dungeon_core::dungeon::{
    DungeonConfig, DungeonRng, DungeonResult, WalkParameters, floor_neighbor_count,
    generate_dungeon,
};
use dungeon_core::{FloorSet, RoomKind};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    runs: u32,
}

fn random_config(rng: &mut DungeonRng) -> DungeonConfig {
    DungeonConfig {
        corridor_length: rng.range_inclusive(0, 24) as i32,
        corridor_count: rng.range_inclusive(0, 10) as i32,
        room_percent: rng.range_inclusive(1, 10) as f32 / 10.0,
        corridor_width: rng.range_inclusive(1, 3) as i32,
        room_walk: WalkParameters {
            iterations: rng.range_inclusive(0, 12) as i32,
            walk_length: rng.range_inclusive(0, 12) as i32,
            start_randomly_each_iteration: rng.coin_flip(),
            ..WalkParameters::default()
        },
        seed: Some(rng.next_u64()),
        ..DungeonConfig::default()
    }
}

fn check(config: &DungeonConfig, result: &DungeonResult) -> Result<()> {
    let Some(&first) = result.floor.first() else {
        bail!("empty floor");
    };

    let mut reached = FloorSet::new();
    let mut queue = VecDeque::from([first]);
    while let Some(cell) = queue.pop_front() {
        if result.floor.contains(&cell) && reached.insert(cell) {
            queue.extend(cell.cardinal_neighbors());
        }
    }
    ensure!(reached.len() == result.floor.len(), "floor is disconnected");

    let room_cells: FloorSet =
        result.rooms.iter().flat_map(|room| room.tiles.iter().copied()).collect();
    for &cell in &result.floor {
        ensure!(
            floor_neighbor_count(&result.floor, cell) != 1 || room_cells.contains(&cell),
            "bare dead end at {cell}"
        );
    }

    let spawn_rooms = result.rooms.iter().filter(|room| room.kind == RoomKind::Spawn).count();
    let boss_rooms = result.rooms.iter().filter(|room| room.kind == RoomKind::Boss).count();
    ensure!(spawn_rooms == 1, "{spawn_rooms} spawn rooms");
    ensure!(boss_rooms == 1, "{boss_rooms} boss rooms");

    let boss = result.room_of_kind(RoomKind::Boss).context("no boss room")?;
    let boss_distance = boss.seed.euclidean_distance(config.start);
    ensure!(
        result.rooms.iter().all(|room| room.seed.euclidean_distance(config.start) <= boss_distance),
        "boss room at {} is not the farthest from the start",
        boss.seed
    );

    for spawn in &result.spawns {
        let room = result
            .rooms
            .iter()
            .find(|room| room.seed == spawn.room_seed && room.kind == spawn.room_kind)
            .context("spawn record points at an unknown room")?;
        ensure!(room.tiles.contains(&spawn.position), "spawn outside its room");
    }

    let rerun = generate_dungeon(config)?;
    ensure!(rerun.fingerprint() == result.fingerprint(), "rerun diverged");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting soak on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = DungeonRng::from_seed(args.seed);
    let mut floor_cells = 0_usize;
    for run in 0..args.runs {
        let config = random_config(&mut rng);
        let result = generate_dungeon(&config)
            .with_context(|| format!("run {run} rejected config {config:?}"))?;
        let seed = result.seed.value();
        check(&config, &result)
            .with_context(|| format!("run {run} failed with dungeon seed {seed}"))?;
        floor_cells += result.floor.len();
    }

    println!(
        "Soak completed successfully: {} runs, {} floor cells on average.",
        args.runs,
        floor_cells / args.runs.max(1) as usize
    );
    Ok(())
}
