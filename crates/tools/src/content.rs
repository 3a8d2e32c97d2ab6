//! Slot-map backed content factory used by the command-line tools.

use dungeon_core::dungeon::ContentFactory;
use dungeon_core::{ContentHandle, GridCell, SpawnKind};
use slotmap::{Key, KeyData, SlotMap, new_key_type};

new_key_type! {
    pub struct ContentId;
}

impl From<ContentHandle> for ContentId {
    fn from(handle: ContentHandle) -> Self {
        KeyData::from_ffi(handle.0).into()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnedContent {
    pub kind: SpawnKind,
    pub prefab: String,
    pub position: GridCell,
}

#[derive(Debug, Default)]
pub struct ContentRegistry {
    entries: SlotMap<ContentId, SpawnedContent>,
}

impl ContentRegistry {
    pub fn get(&self, handle: ContentHandle) -> Option<&SpawnedContent> {
        self.entries.get(ContentId::from(handle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, kind: SpawnKind) -> usize {
        self.entries.values().filter(|entry| entry.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpawnedContent> {
        self.entries.values()
    }
}

impl ContentFactory for ContentRegistry {
    fn spawn_at(&mut self, kind: SpawnKind, prefab: &str, position: GridCell) -> ContentHandle {
        let id = self.entries.insert(SpawnedContent { kind, prefab: prefab.to_string(), position });
        tracing::trace!(?kind, prefab, %position, "content registered");
        ContentHandle(id.data().as_ffi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_resolve_to_spawned_content() {
        let mut registry = ContentRegistry::default();
        let coin = registry.spawn_at(SpawnKind::Item, "coin", GridCell::new(1, 2));
        let ant = registry.spawn_at(SpawnKind::Enemy, "ant", GridCell::new(3, 4));

        assert_ne!(coin, ant);
        assert_eq!(registry.get(coin).map(|entry| entry.prefab.as_str()), Some("coin"));
        assert_eq!(registry.get(ant).map(|entry| entry.position), Some(GridCell::new(3, 4)));
        assert_eq!(registry.count_of(SpawnKind::Enemy), 1);
    }

    #[test]
    fn iteration_covers_every_spawn_in_order() {
        let mut registry = ContentRegistry::default();
        assert!(registry.is_empty());
        registry.spawn_at(SpawnKind::Item, "gem", GridCell::new(0, 0));
        registry.spawn_at(SpawnKind::Enemy, "ant", GridCell::new(1, 0));
        registry.spawn_at(SpawnKind::Item, "coin", GridCell::new(2, 0));

        let prefabs: Vec<&str> = registry.iter().map(|entry| entry.prefab.as_str()).collect();
        assert_eq!(prefabs, vec!["gem", "ant", "coin"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.count_of(SpawnKind::Item), 2);
    }

    #[test]
    fn unknown_handles_resolve_to_nothing() {
        let mut registry = ContentRegistry::default();
        let known = registry.spawn_at(SpawnKind::Item, "gem", GridCell::new(0, 0));
        assert!(registry.get(known).is_some());
        assert!(registry.get(ContentHandle(0)).is_none());
    }
}
