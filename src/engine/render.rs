use crate::engine::output::Output;
use crate::world::{Room, World};

pub fn render_room(out: &mut Output, room: &Room, world: &World) {
    out.title(room.name.clone());

    let mut room_desc = String::new();
    room_desc.push_str(room.desc.trim());

    for &id in &room.objects {
        if let Some(obj) = world.registry.get(id) {
            if !room_desc.is_empty() {
                room_desc.push(' ');
            }
            room_desc.push_str(&format!("There is {} here.", obj.name));
        }
    }

    out.say(room_desc);

    if room.exits.is_empty() {
        out.set_exits("Exits: (none)");
    } else {
        let mut dirs: Vec<&str> = room.exits.iter().map(|e| e.direction.as_str()).collect();
        dirs.sort();
        dirs.dedup();
        out.set_exits(format!("Exits: {}", dirs.join(", ")));
    }
}
