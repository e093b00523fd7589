use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use super::model::{Exit, ObjectKind, Room, RoomId, World};
use super::registry::ObjectRegistry;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("failed to read world file: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse world file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid world: {0}")]
    Invalid(String),
}

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize)]
struct WorldFile {
    world: WorldHeader,
    #[serde(default)]
    room: Vec<RoomConfig>, // [[room]] blocks
    #[serde(default)]
    object: Vec<ObjectConfig>, // [[object]] blocks
}

#[derive(Deserialize)]
struct WorldHeader {
    name: String,
    #[serde(default)]
    desc: String,
    start_room: u16,
}

#[derive(Deserialize)]
struct RoomConfig {
    id: u16,
    name: String,
    #[serde(default)]
    desc: String,

    #[serde(default)]
    exit: Vec<ExitConfig>, // [[room.exit]]
}

#[derive(Deserialize)]
struct ExitConfig {
    direction: String,
    target: u16,
}

#[derive(Deserialize)]
struct ObjectConfig {
    keyword: String,
    name: String,

    #[serde(default)]
    desc: String,

    /// Room the object starts in; 0 puts it in the player's inventory.
    location: u16,

    #[serde(default)]
    kind: Option<String>, // "generic" (default) or "food"

    #[serde(default)]
    energy: Option<u8>,
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Public API: load a world from a .toml file on disk.
pub fn load_world_from_file(path: &Path) -> Result<World, WorldError> {
    let contents = fs::read_to_string(path)?;
    load_world_from_str(&contents)
}

/// Public API: load a world from TOML text.
///
/// Objects are registered in file order, so their ids are sequential in the
/// order they appear.
pub fn load_world_from_str(contents: &str) -> Result<World, WorldError> {
    let world_file: WorldFile = toml::from_str(contents)?;

    if world_file.world.name.trim().is_empty() {
        return Err(WorldError::Invalid("world.name may not be empty".into()));
    }

    // Build rooms map
    let mut rooms_map: BTreeMap<RoomId, Room> = BTreeMap::new();

    for room_cfg in world_file.room {
        if room_cfg.id == 0 {
            return Err(WorldError::Invalid(
                "room id 0 is reserved for the inventory".into(),
            ));
        }

        let id = RoomId(room_cfg.id);
        if rooms_map.contains_key(&id) {
            return Err(WorldError::Invalid(format!("duplicate room id: {id}")));
        }

        let exits = room_cfg
            .exit
            .into_iter()
            .map(|e| Exit {
                direction: e.direction,
                target: RoomId(e.target),
            })
            .collect();

        rooms_map.insert(
            id,
            Room {
                id,
                name: room_cfg.name,
                desc: room_cfg.desc,
                exits,
                objects: Vec::new(),
            },
        );
    }

    // Ensure start_room exists
    let start_room = RoomId(world_file.world.start_room);
    if !rooms_map.contains_key(&start_room) {
        return Err(WorldError::Invalid(format!(
            "start_room '{start_room}' not found among rooms"
        )));
    }

    // Register objects and place each in its starting container
    let mut registry = ObjectRegistry::new();
    let mut start_inventory = Vec::new();

    for oc in world_file.object {
        if oc.keyword.trim().is_empty() {
            return Err(WorldError::Invalid(format!(
                "object '{}' has an empty keyword",
                oc.name
            )));
        }
        if registry.find_by_keyword(&oc.keyword).is_some() {
            return Err(WorldError::Invalid(format!(
                "duplicate object keyword: {}",
                oc.keyword
            )));
        }

        if oc.location != 0 && !rooms_map.contains_key(&RoomId(oc.location)) {
            return Err(WorldError::Invalid(format!(
                "object '{}' location room '{}' not found",
                oc.keyword, oc.location
            )));
        }

        let kind = parse_object_kind(&oc)?;
        let location = oc.location;
        let id = registry.register(oc.name, oc.desc, oc.keyword, kind);

        if location == 0 {
            start_inventory.push(id);
        } else if let Some(room) = rooms_map.get_mut(&RoomId(location)) {
            room.objects.push(id);
        }
    }

    Ok(World {
        name: world_file.world.name,
        desc: world_file.world.desc,
        start_room,
        rooms: rooms_map,
        registry,
        start_inventory,
    })
}

fn parse_object_kind(oc: &ObjectConfig) -> Result<ObjectKind, WorldError> {
    match oc.kind.as_deref().map(|s| s.to_lowercase()) {
        Some(ref k) if k == "food" => Ok(ObjectKind::Food {
            energy: oc.energy.unwrap_or(0),
        }),
        Some(ref k) if k == "generic" => Ok(ObjectKind::Generic),
        Some(k) => Err(WorldError::Invalid(format!(
            "object '{}' has unknown kind '{}'",
            oc.keyword, k
        ))),
        None => Ok(ObjectKind::Generic),
    }
}
