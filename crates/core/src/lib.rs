pub mod dungeon;
pub mod types;

pub use dungeon::{
    DungeonConfig, DungeonError, DungeonGenerator, DungeonResult, SeedChoice, generate_dungeon,
};
pub use types::*;
