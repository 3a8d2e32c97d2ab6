pub mod ascii;
pub mod config_file;
pub mod content;

pub use ascii::{AsciiCanvas, RingWallBuilder};
pub use config_file::{CONFIG_FORMAT_VERSION, DungeonConfigFile};
pub use content::{ContentId, ContentRegistry, SpawnedContent};
