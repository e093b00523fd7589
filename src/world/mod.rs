mod loader;
mod model;
mod registry;
mod validator;

pub use loader::{WorldError, load_world_from_file, load_world_from_str};

// Minimal, intentional surface area: re-export only what the game/engine uses.
pub use model::{Exit, GameObject, ObjectId, ObjectKind, Room, RoomId, World};
pub use registry::ObjectRegistry;
pub use validator::{ValidationError, validate_world};
