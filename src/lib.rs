pub mod engine;
pub mod world;

use std::io::BufRead;

use engine::{EatOutcome, LoadError, Output, State, TransferOutcome, read_save, render_save};
use world::{RoomId, World};

pub use engine::{OutputBlock, SAVE_TAG};
pub use world::{
    ValidationError, WorldError, load_world_from_file, load_world_from_str, validate_world,
};

/// A running game session: the world (including placement) plus the
/// player's state, with a `step` dispatcher over the command vocabulary.
pub struct Game {
    pub world: World,
    pub state: State,
}

impl Game {
    pub fn new(world: World) -> Self {
        let state = State::new(&world);
        Game { world, state }
    }

    /// Initial room render.
    pub fn initialize(&mut self) -> Output {
        let mut out = Output::new();
        self.state.announce_loc(&self.world, &mut out);
        out
    }

    /// Process a single player input; returns (output, quit?)
    pub fn step(&mut self, input: &str) -> (Output, bool) {
        let mut out = Output::new();
        let lower = input.trim().to_lowercase();
        let mut quit = false;

        if lower.is_empty() {
            return (out, false);
        }

        if lower == "quit" || lower == "exit" {
            out.say("Goodbye.");
            quit = true;
        } else if lower == "inventory" || lower == "i" {
            self.state.describe_inventory(&self.world, &mut out);
        } else if lower == "look" || lower == "l" {
            self.state.announce_loc(&self.world, &mut out);
        } else if lower == "status" {
            out.say(format!("Strength: {}", self.state.strength()));
        } else {
            let mut parts = lower.split_whitespace();
            let verb = parts.next().unwrap_or("");
            let rest = parts.collect::<Vec<&str>>().join(" ");

            if verb == "take" || verb == "get" {
                if rest.is_empty() {
                    out.say("Take what?");
                } else {
                    self.handle_take(&rest, &mut out);
                }
            } else if verb == "drop" {
                if rest.is_empty() {
                    out.say("Drop what?");
                } else {
                    self.handle_drop(&rest, &mut out);
                }
            } else if verb == "eat" {
                if rest.is_empty() {
                    out.say("Eat what?");
                } else {
                    self.handle_eat(&rest, &mut out);
                }
            } else if verb == "examine" || verb == "x" {
                if rest.is_empty() {
                    out.say("Examine what?");
                } else {
                    self.handle_examine(&rest, &mut out);
                }
            } else if verb == "go" || verb == "walk" {
                if rest.is_empty() {
                    out.say("Go where?");
                } else if !self.try_move(&rest, &mut out) {
                    out.say(format!("You can't go {rest}."));
                }
            } else if self.try_move(&lower, &mut out) {
                // bare direction, handled
            } else {
                out.say("I don't understand that command.");
            }
        }

        (out, quit)
    }

    /// Serialize the session to the save text format.
    pub fn render_save(&self) -> String {
        render_save(&self.world, &self.state)
    }

    /// Restore the session from a save stream. Nothing changes unless the
    /// whole stream parses and reconciles.
    pub fn restore_save<R: BufRead>(&mut self, reader: R) -> Result<(), LoadError> {
        let data = read_save(reader)?;
        self.state.restore(&mut self.world, data)
    }

    fn object_name(&self, keyword: &str) -> String {
        self.world
            .registry
            .find_by_keyword(keyword)
            .map(|o| o.name.clone())
            .unwrap_or_else(|| keyword.to_string())
    }

    fn handle_take(&mut self, keyword: &str, out: &mut Output) {
        match self.state.pick_object(&mut self.world, keyword) {
            TransferOutcome::Moved => {
                out.say(format!("You take {}.", self.object_name(keyword)));
            }
            TransferOutcome::AlreadyInTarget => out.say("You are already carrying that."),
            TransferOutcome::NotInSource => out.say("You don't see that here."),
            TransferOutcome::DoesNotExist => out.say("There is no such thing."),
        }
    }

    fn handle_drop(&mut self, keyword: &str, out: &mut Output) {
        match self.state.drop_object(&mut self.world, keyword) {
            TransferOutcome::Moved => {
                out.say(format!("You drop {}.", self.object_name(keyword)));
            }
            TransferOutcome::AlreadyInTarget => out.say("It is already here."),
            TransferOutcome::NotInSource => out.say("You aren't carrying that."),
            TransferOutcome::DoesNotExist => out.say("There is no such thing."),
        }
    }

    fn handle_eat(&mut self, keyword: &str, out: &mut Output) {
        let name = self.object_name(keyword);
        match self.state.eat(&self.world, keyword) {
            EatOutcome::Eaten => out.say(format!("You eat {name}.")),
            EatOutcome::NotCarried => out.say("You aren't carrying that."),
            EatOutcome::NotFood => out.say("You can't eat that."),
        }
    }

    fn handle_examine(&mut self, keyword: &str, out: &mut Output) {
        // Carried objects first, then the room.
        let found = self
            .state
            .search_inventory(&self.world, keyword)
            .or_else(|| self.state.search_room(&self.world, keyword));

        match found {
            Some(obj) if !obj.description.trim().is_empty() => {
                out.say(obj.description.clone());
            }
            Some(obj) => out.say(format!("You see nothing special about {}.", obj.name)),
            None => out.say("You see nothing like that here."),
        }
    }

    /// Exact direction match, then single-letter abbreviation.
    fn try_move(&mut self, cmd: &str, out: &mut Output) -> bool {
        let Some(room) = self.world.room(self.state.current_room()) else {
            return false;
        };

        let mut found: Option<(String, RoomId)> = None;
        for exit in &room.exits {
            if exit.direction.eq_ignore_ascii_case(cmd) {
                found = Some((exit.direction.clone(), exit.target));
                break;
            }
        }

        if found.is_none() {
            let mut chars = cmd.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                for exit in &room.exits {
                    let hit = exit
                        .direction
                        .chars()
                        .next()
                        .map(|d| d.eq_ignore_ascii_case(&c))
                        .unwrap_or(false);
                    if hit {
                        found = Some((exit.direction.clone(), exit.target));
                        break;
                    }
                }
            }
        }

        let Some((direction, target)) = found else {
            return false;
        };

        if self.world.room(target).is_none() {
            out.say(format!(
                "You try to go {direction}, but something feels wrong (room not found)."
            ));
            return true;
        }

        out.say(format!("You go {direction}."));
        self.state.go_to(&self.world, target, out);
        true
    }
}
