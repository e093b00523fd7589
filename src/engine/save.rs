use std::io::{self, BufRead};

use thiserror::Error;

use crate::engine::state::State;
use crate::world::{ObjectId, RoomId, World};

/// First line of every recognized save file. Anything else is rejected.
pub const SAVE_TAG: &str = "EDGAR VER1.3.0";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("not a recognized save file")]
    BadHeader,

    #[error("save file names unknown room '{0}' as the current room")]
    UnknownRoom(RoomId),

    #[error("malformed save file: {0}")]
    Malformed(&'static str),

    #[error("failed to read save data: {0}")]
    Read(#[from] io::Error),
}

/// One container line of a save file: a room's contents, or the inventory
/// when the line starts with the reserved id 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Inventory,
    Room(RoomId),
}

#[derive(Debug)]
pub struct SavePlacement {
    pub target: Container,
    pub objects: Vec<ObjectId>,
}

/// Fully parsed save file, not yet reconciled against a world. Applying it
/// is a separate pass (`State::restore`), so a stream that fails mid-parse
/// never mutates live state.
#[derive(Debug)]
pub struct SaveData {
    pub strength: i16,
    pub current_room: RoomId,
    pub placements: Vec<SavePlacement>,
}

/// Tokenize a save stream into `SaveData`.
///
/// Record-level noise degrades instead of failing: blank lines, lines whose
/// first token is not a number, and non-numeric object tokens are skipped.
/// A missing or wrong header, or a broken strength/room line, rejects the
/// whole stream.
pub fn read_save<R: BufRead>(reader: R) -> Result<SaveData, LoadError> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(LoadError::BadHeader),
    };
    if header != SAVE_TAG {
        return Err(LoadError::BadHeader);
    }

    let stats = lines
        .next()
        .ok_or(LoadError::Malformed("missing strength and room line"))??;
    let mut tokens = stats.split_whitespace();
    let strength = tokens
        .next()
        .ok_or(LoadError::Malformed("missing strength"))?
        .parse::<i16>()
        .map_err(|_| LoadError::Malformed("strength is not a number"))?;
    let current_room = tokens
        .next()
        .ok_or(LoadError::Malformed("missing current room id"))?
        .parse::<RoomId>()
        .map_err(|_| LoadError::Malformed("current room id is not a number"))?;

    let mut placements = Vec::new();
    for line in lines {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        let Ok(first) = first.parse::<u16>() else {
            continue;
        };

        let target = if first == 0 {
            Container::Inventory
        } else {
            Container::Room(RoomId(first))
        };
        let objects = tokens
            .filter_map(|t| t.parse::<ObjectId>().ok())
            .collect();
        placements.push(SavePlacement { target, objects });
    }

    Ok(SaveData {
        strength,
        current_room,
        placements,
    })
}

/// `read_save` over in-memory text.
pub fn parse_save(input: &str) -> Result<SaveData, LoadError> {
    read_save(input.as_bytes())
}

/// Render live state back to the save text format: the tag line, the
/// strength/current-room line, one line per room, then the inventory line.
/// Every id is followed by a space, the inventory export format included.
pub fn render_save(world: &World, state: &State) -> String {
    let mut out = String::new();
    out.push_str(SAVE_TAG);
    out.push('\n');
    out.push_str(&format!("{} {}\n", state.strength(), state.current_room()));

    for room in world.rooms() {
        out.push_str(&room.id.to_string());
        out.push(' ');
        for id in &room.objects {
            out.push_str(&id.to_string());
            out.push(' ');
        }
        out.push('\n');
    }

    out.push_str(&state.export_inventory());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_save() {
        let text = "EDGAR VER1.3.0\n80 1\n1 \n2 7 9 \n0 5 \n";
        let data = parse_save(text).unwrap();
        assert_eq!(data.strength, 80);
        assert_eq!(data.current_room, RoomId(1));
        assert_eq!(data.placements.len(), 3);

        assert_eq!(data.placements[0].target, Container::Room(RoomId(1)));
        assert!(data.placements[0].objects.is_empty());

        assert_eq!(data.placements[1].target, Container::Room(RoomId(2)));
        assert_eq!(data.placements[1].objects, vec![ObjectId(7), ObjectId(9)]);

        assert_eq!(data.placements[2].target, Container::Inventory);
        assert_eq!(data.placements[2].objects, vec![ObjectId(5)]);
    }

    #[test]
    fn last_token_of_a_line_is_placed() {
        let data = parse_save("EDGAR VER1.3.0\n100 1\n2 7 9\n").unwrap();
        assert_eq!(data.placements[0].objects, vec![ObjectId(7), ObjectId(9)]);
    }

    #[test]
    fn rejects_wrong_header() {
        assert!(matches!(
            parse_save("EDGAR VER1.2.0\n100 1\n"),
            Err(LoadError::BadHeader)
        ));
        assert!(matches!(parse_save(""), Err(LoadError::BadHeader)));
    }

    #[test]
    fn rejects_broken_stats_line() {
        assert!(matches!(
            parse_save("EDGAR VER1.3.0\n"),
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(
            parse_save("EDGAR VER1.3.0\nfull 1\n"),
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(
            parse_save("EDGAR VER1.3.0\n100\n"),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn skips_unparseable_lines_and_tokens() {
        let text = "EDGAR VER1.3.0\n100 1\n\ngarbage 7\n2 7 x 9 \n";
        let data = parse_save(text).unwrap();
        assert_eq!(data.placements.len(), 1);
        assert_eq!(data.placements[0].objects, vec![ObjectId(7), ObjectId(9)]);
    }
}
