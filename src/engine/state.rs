use crate::engine::output::Output;
use crate::engine::render::render_room;
use crate::engine::save::{Container, LoadError, SaveData};
use crate::world::{GameObject, ObjectId, RoomId, World};

/// Where a pick or drop attempt ended up. Mirrored for both directions:
/// `AlreadyInTarget` means the object is already where the move would put
/// it, `NotInSource` means it exists somewhere else in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Moved,
    AlreadyInTarget,
    NotInSource,
    DoesNotExist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EatOutcome {
    Eaten,
    NotCarried,
    NotFood,
}

/// The player's session state: where they are, how strong they are, and
/// what they carry. Placement lives partly here (the inventory) and partly
/// in each room's object list; the operations below keep every object in
/// at most one of those containers.
pub struct State {
    current_room: RoomId,
    strength: i16,
    inventory: Vec<ObjectId>,
}

pub const MAX_STRENGTH: i16 = 100;

impl State {
    pub fn new(world: &World) -> Self {
        State {
            current_room: world.start_room,
            strength: MAX_STRENGTH,
            inventory: world.start_inventory.clone(),
        }
    }

    pub fn current_room(&self) -> RoomId {
        self.current_room
    }

    pub fn strength(&self) -> i16 {
        self.strength
    }

    pub fn inventory(&self) -> &[ObjectId] {
        &self.inventory
    }

    /// First object in the current room matching the keyword.
    pub fn search_room<'a>(&self, world: &'a World, keyword: &str) -> Option<&'a GameObject> {
        let room = world.room(self.current_room)?;
        room.objects
            .iter()
            .filter_map(|&id| world.registry.get(id))
            .find(|o| o.keyword == keyword)
    }

    /// First carried object matching the keyword.
    pub fn search_inventory<'a>(&self, world: &'a World, keyword: &str) -> Option<&'a GameObject> {
        self.inventory
            .iter()
            .filter_map(|&id| world.registry.get(id))
            .find(|o| o.keyword == keyword)
    }

    /// Move an object from the current room into the inventory.
    ///
    /// Precedence when the object is not in the room: already carried, then
    /// exists elsewhere in the world, then unknown keyword.
    pub fn pick_object(&mut self, world: &mut World, keyword: &str) -> TransferOutcome {
        if let Some(obj) = self.search_room(world, keyword) {
            let id = obj.id;
            if let Some(room) = world.room_mut(self.current_room) {
                room.objects.retain(|&o| o != id);
            }
            self.inventory.push(id);
            return TransferOutcome::Moved;
        }
        if self.search_inventory(world, keyword).is_some() {
            TransferOutcome::AlreadyInTarget
        } else if world.registry.find_by_keyword(keyword).is_some() {
            TransferOutcome::NotInSource
        } else {
            TransferOutcome::DoesNotExist
        }
    }

    /// Mirror of `pick_object`: move a carried object into the current room.
    pub fn drop_object(&mut self, world: &mut World, keyword: &str) -> TransferOutcome {
        if let Some(obj) = self.search_inventory(world, keyword) {
            let id = obj.id;
            self.inventory.retain(|&o| o != id);
            if let Some(room) = world.room_mut(self.current_room) {
                room.objects.push(id);
            }
            return TransferOutcome::Moved;
        }
        if self.search_room(world, keyword).is_some() {
            TransferOutcome::AlreadyInTarget
        } else if world.registry.find_by_keyword(keyword).is_some() {
            TransferOutcome::NotInSource
        } else {
            TransferOutcome::DoesNotExist
        }
    }

    /// Eat a carried food object: its energy feeds `change_strength` and the
    /// object leaves the inventory for good. It stays registered, so its id
    /// keeps resolving, but it no longer exists anywhere in the world.
    pub fn eat(&mut self, world: &World, keyword: &str) -> EatOutcome {
        let Some(obj) = self.search_inventory(world, keyword) else {
            return EatOutcome::NotCarried;
        };
        match obj.energy() {
            Some(energy) => {
                let id = obj.id;
                self.change_strength(i16::from(energy));
                self.inventory.retain(|&o| o != id);
                EatOutcome::Eaten
            }
            None => EatOutcome::NotFood,
        }
    }

    /// Adjust strength by a signed delta, clamped to `MAX_STRENGTH` from
    /// above. There is no lower bound; strength may go negative.
    pub fn change_strength(&mut self, delta: i16) {
        self.strength = self.strength.saturating_add(delta).min(MAX_STRENGTH);
    }

    pub fn go_to(&mut self, world: &World, target: RoomId, out: &mut Output) {
        self.current_room = target;
        self.announce_loc(world, out);
    }

    /// Describe the current room through the output channel.
    pub fn announce_loc(&self, world: &World, out: &mut Output) {
        if let Some(room) = world.room(self.current_room) {
            render_room(out, room, world);
        }
    }

    /// List what the player carries through the output channel.
    pub fn describe_inventory(&self, world: &World, out: &mut Output) {
        if self.inventory.is_empty() {
            out.say("You are carrying nothing.");
            return;
        }
        out.say("You are carrying:");
        for &id in &self.inventory {
            if let Some(obj) = world.registry.get(id) {
                out.say(format!("  {}", obj.name));
            }
        }
    }

    /// Render the inventory as its save-format line: the reserved id 0,
    /// then each carried object's id, every token followed by a space.
    pub fn export_inventory(&self) -> String {
        let mut line = String::from("0 ");
        for id in &self.inventory {
            line.push_str(&id.to_string());
            line.push(' ');
        }
        line
    }

    /// Reconcile a parsed save against the world and overwrite the live
    /// state. All-or-nothing with respect to parse and current-room
    /// resolution: nothing mutates unless the whole `SaveData` is usable.
    /// Container lines naming unknown rooms, and unknown object ids, are
    /// skipped.
    pub fn restore(&mut self, world: &mut World, save: SaveData) -> Result<(), LoadError> {
        if world.room(save.current_room).is_none() {
            return Err(LoadError::UnknownRoom(save.current_room));
        }

        self.strength = save.strength;
        self.current_room = save.current_room;

        for placement in save.placements {
            match placement.target {
                Container::Inventory => {
                    self.inventory.clear();
                    for id in placement.objects {
                        if world.registry.get(id).is_none() {
                            continue;
                        }
                        detach_everywhere(world, &mut self.inventory, id);
                        self.inventory.push(id);
                    }
                }
                Container::Room(room_id) => {
                    let Some(room) = world.room_mut(room_id) else {
                        continue;
                    };
                    room.objects.clear();
                    for id in placement.objects {
                        if world.registry.get(id).is_none() {
                            continue;
                        }
                        detach_everywhere(world, &mut self.inventory, id);
                        if let Some(room) = world.room_mut(room_id) {
                            room.objects.push(id);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Remove an object from every container, so the next insertion leaves it
/// placed exactly once even if the save lists it on several lines.
fn detach_everywhere(world: &mut World, inventory: &mut Vec<ObjectId>, id: ObjectId) {
    for room in world.rooms_mut() {
        room.objects.retain(|&o| o != id);
    }
    inventory.retain(|&o| o != id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::save::parse_save;
    use crate::world::{ObjectKind, ObjectRegistry, Room};
    use std::collections::BTreeMap;

    // Two rooms: the hallway (start) holds the lamp and the bread, the
    // kitchen holds the coin.
    fn test_world() -> World {
        let mut registry = ObjectRegistry::new();
        let lamp = registry.register("a brass lamp", "Dented but working.", "lamp", ObjectKind::Generic);
        let bread = registry.register(
            "a loaf of bread",
            "Still warm.",
            "bread",
            ObjectKind::Food { energy: 25 },
        );
        let coin = registry.register("a silver coin", "Cold to the touch.", "coin", ObjectKind::Generic);

        let mut rooms = BTreeMap::new();
        rooms.insert(
            RoomId(1),
            Room {
                id: RoomId(1),
                name: "Hallway".into(),
                desc: "A dim hallway.".into(),
                exits: Vec::new(),
                objects: vec![lamp, bread],
            },
        );
        rooms.insert(
            RoomId(2),
            Room {
                id: RoomId(2),
                name: "Kitchen".into(),
                desc: "A cold kitchen.".into(),
                exits: Vec::new(),
                objects: vec![coin],
            },
        );

        World {
            name: "Test Manor".into(),
            desc: String::new(),
            start_room: RoomId(1),
            rooms,
            registry,
            start_inventory: Vec::new(),
        }
    }

    fn placed_once(world: &World, state: &State, id: ObjectId) -> bool {
        let in_rooms = world
            .rooms()
            .filter(|r| r.objects.contains(&id))
            .count();
        let in_inventory = usize::from(state.inventory().contains(&id));
        in_rooms + in_inventory == 1
    }

    #[test]
    fn pick_moves_object_and_keeps_placement_exclusive() {
        let mut world = test_world();
        let mut state = State::new(&world);

        assert_eq!(state.pick_object(&mut world, "lamp"), TransferOutcome::Moved);
        assert!(state.search_inventory(&world, "lamp").is_some());
        assert!(state.search_room(&world, "lamp").is_none());
        assert!(placed_once(&world, &state, ObjectId(0)));

        assert_eq!(
            state.pick_object(&mut world, "lamp"),
            TransferOutcome::AlreadyInTarget
        );
    }

    #[test]
    fn pick_distinguishes_elsewhere_from_nonexistent() {
        let mut world = test_world();
        let mut state = State::new(&world);

        // The coin exists, but in the kitchen.
        assert_eq!(
            state.pick_object(&mut world, "coin"),
            TransferOutcome::NotInSource
        );
        assert_eq!(
            state.pick_object(&mut world, "unicorn"),
            TransferOutcome::DoesNotExist
        );
    }

    #[test]
    fn drop_mirrors_pick() {
        let mut world = test_world();
        let mut state = State::new(&world);

        assert_eq!(
            state.drop_object(&mut world, "lamp"),
            TransferOutcome::AlreadyInTarget
        );
        assert_eq!(
            state.drop_object(&mut world, "coin"),
            TransferOutcome::NotInSource
        );
        assert_eq!(
            state.drop_object(&mut world, "unicorn"),
            TransferOutcome::DoesNotExist
        );
    }

    #[test]
    fn pick_then_drop_restores_the_room() {
        let mut world = test_world();
        let mut state = State::new(&world);

        state.pick_object(&mut world, "lamp");
        state.drop_object(&mut world, "lamp");
        let room = world.room(RoomId(1)).unwrap();
        assert!(room.objects.contains(&ObjectId(0)));
        assert!(state.inventory().is_empty());
    }

    #[test]
    fn strength_clamps_high_but_not_low() {
        let world = test_world();
        let mut state = State::new(&world);

        state.change_strength(50);
        assert_eq!(state.strength(), 100);

        state.change_strength(-150);
        assert_eq!(state.strength(), -50);

        state.change_strength(20);
        assert_eq!(state.strength(), -30);
    }

    #[test]
    fn eating_restores_strength_and_consumes_the_object() {
        let mut world = test_world();
        let mut state = State::new(&world);

        state.pick_object(&mut world, "bread");
        state.change_strength(-40);
        assert_eq!(state.eat(&world, "bread"), EatOutcome::Eaten);
        assert_eq!(state.strength(), 85);

        // Consumed: no container holds it, but it stays registered.
        assert!(state.search_inventory(&world, "bread").is_none());
        assert!(world.rooms().all(|r| !r.objects.contains(&ObjectId(1))));
        assert!(world.registry.get(ObjectId(1)).is_some());

        // A second bite finds nothing.
        assert_eq!(state.eat(&world, "bread"), EatOutcome::NotCarried);
    }

    #[test]
    fn eat_rejects_non_food() {
        let mut world = test_world();
        let mut state = State::new(&world);

        state.pick_object(&mut world, "lamp");
        assert_eq!(state.eat(&world, "lamp"), EatOutcome::NotFood);
        assert!(state.search_inventory(&world, "lamp").is_some());
    }

    #[test]
    fn export_inventory_format() {
        let mut world = test_world();
        let mut state = State::new(&world);

        assert_eq!(state.export_inventory(), "0 ");

        state.pick_object(&mut world, "lamp");
        state.pick_object(&mut world, "bread");
        assert_eq!(state.export_inventory(), "0 0 1 ");
    }

    #[test]
    fn restore_replaces_room_contents_in_order() {
        let mut world = test_world();
        let mut state = State::new(&world);

        let save = parse_save("EDGAR VER1.3.0\n60 2\n1 \n2 1 0 \n0 2 \n").unwrap();
        state.restore(&mut world, save).unwrap();

        assert_eq!(state.strength(), 60);
        assert_eq!(state.current_room(), RoomId(2));
        assert!(world.room(RoomId(1)).unwrap().objects.is_empty());
        assert_eq!(
            world.room(RoomId(2)).unwrap().objects,
            vec![ObjectId(1), ObjectId(0)]
        );
        assert_eq!(state.inventory(), &[ObjectId(2)]);
    }

    #[test]
    fn restore_rejects_unknown_current_room_without_mutation() {
        let mut world = test_world();
        let mut state = State::new(&world);

        let save = parse_save("EDGAR VER1.3.0\n10 9\n1 2 \n").unwrap();
        assert!(matches!(
            state.restore(&mut world, save),
            Err(LoadError::UnknownRoom(_))
        ));
        assert_eq!(state.strength(), 100);
        assert_eq!(state.current_room(), RoomId(1));
        assert_eq!(
            world.room(RoomId(1)).unwrap().objects,
            vec![ObjectId(0), ObjectId(1)]
        );
    }

    #[test]
    fn restore_skips_unknown_rooms_and_objects() {
        let mut world = test_world();
        let mut state = State::new(&world);

        // Room 9 does not exist; object 40 does not exist.
        let save = parse_save("EDGAR VER1.3.0\n100 1\n9 0 \n2 40 2 \n").unwrap();
        state.restore(&mut world, save).unwrap();

        // The unknown-room line changed nothing, the known line kept only
        // the resolvable id.
        assert_eq!(
            world.room(RoomId(1)).unwrap().objects,
            vec![ObjectId(0), ObjectId(1)]
        );
        assert_eq!(world.room(RoomId(2)).unwrap().objects, vec![ObjectId(2)]);
    }

    #[test]
    fn restore_keeps_placement_exclusive_across_duplicate_listings() {
        let mut world = test_world();
        let mut state = State::new(&world);

        // The lamp (id 0) is listed in both rooms; the later line wins.
        let save = parse_save("EDGAR VER1.3.0\n100 1\n1 0 \n2 0 \n").unwrap();
        state.restore(&mut world, save).unwrap();

        assert!(placed_once(&world, &state, ObjectId(0)));
        assert_eq!(world.room(RoomId(2)).unwrap().objects, vec![ObjectId(0)]);
    }
}
