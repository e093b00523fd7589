use std::collections::{HashMap, HashSet};

use super::model::{ObjectId, RoomId, World};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

/// Sanity-check a world before play. The loader already rejects malformed
/// files; this pass catches cross-reference problems, including in worlds
/// assembled in code.
pub fn validate_world(world: &World) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    if world.rooms.is_empty() {
        errors.push(ValidationError::new("world has no rooms"));
    }

    if world.rooms.contains_key(&RoomId::INVENTORY) {
        errors.push(ValidationError::new(
            "room id 0 is reserved for the inventory",
        ));
    }

    if !world.rooms.contains_key(&world.start_room) {
        errors.push(ValidationError::new(format!(
            "start_room '{}' not found among rooms",
            world.start_room
        )));
    }

    // Validate exits
    for (room_id, room) in &world.rooms {
        for exit in &room.exits {
            if !world.rooms.contains_key(&exit.target) {
                errors.push(ValidationError::new(format!(
                    "room '{}' exit '{}' targets missing room '{}'",
                    room_id, exit.direction, exit.target
                )));
            }
        }
    }

    // Keywords must be unique across the registry
    let mut keywords: HashSet<&str> = HashSet::new();
    for obj in world.registry.iter() {
        if !keywords.insert(&obj.keyword) {
            errors.push(ValidationError::new(format!(
                "duplicate object keyword '{}'",
                obj.keyword
            )));
        }
    }

    // Every placed id must resolve, and no object may start in two
    // containers.
    let mut seen: HashMap<ObjectId, String> = HashMap::new();
    let inventory_label = "inventory".to_string();

    let containers = world
        .rooms()
        .map(|r| (format!("room '{}'", r.id), &r.objects))
        .chain(std::iter::once((inventory_label, &world.start_inventory)));

    for (label, ids) in containers {
        for &id in ids {
            if world.registry.get(id).is_none() {
                errors.push(ValidationError::new(format!(
                    "{label} holds unregistered object id '{id}'"
                )));
            }
            if let Some(previous) = seen.insert(id, label.clone()) {
                errors.push(ValidationError::new(format!(
                    "object '{id}' placed in both {previous} and {label}"
                )));
            }
        }
    }

    // Objects the setup never placed anywhere
    for obj in world.registry.iter() {
        if !seen.contains_key(&obj.id) {
            errors.push(ValidationError::new(format!(
                "object '{}' is not placed in any room or the inventory",
                obj.keyword
            )));
        }
    }

    errors
}
