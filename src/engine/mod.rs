mod output;
mod render;
mod save;
mod state;

pub use output::{Output, OutputBlock};

pub use render::render_room;

pub use save::{
    Container, LoadError, SAVE_TAG, SaveData, SavePlacement, parse_save, read_save, render_save,
};

pub use state::{EatOutcome, MAX_STRENGTH, State, TransferOutcome};
