use std::env;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use textadv::engine::LoadError;
use textadv::{Game, OutputBlock, load_world_from_file, validate_world};

const SAVE_FILE: &str = "game.sav";

fn flush_output(out: textadv::engine::Output) {
    for block in out.blocks {
        match block {
            OutputBlock::Title(t) => println!("\n{}", t),
            OutputBlock::Text(line) => println!("{}", line),
            OutputBlock::Exits(exits) => println!("\n{}", exits),
        }
    }
}

fn main() -> io::Result<()> {
    let world_path: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("worlds/manor.toml"));

    let world = match load_world_from_file(&world_path) {
        Ok(w) => {
            println!("Using world file: {}", world_path.display());
            w
        }
        Err(e) => {
            eprintln!("Failed to load world file '{}': {e}", world_path.display());
            std::process::exit(1);
        }
    };

    let problems = validate_world(&world);
    if !problems.is_empty() {
        for p in &problems {
            eprintln!("world error: {}", p.message);
        }
        std::process::exit(1);
    }

    let mut game = Game::new(world);

    println!("Welcome to {}!", game.world.name);
    if !game.world.desc.trim().is_empty() {
        println!("{}", game.world.desc.trim());
    }
    println!();
    println!("Type 'look' to look around, 'quit' to exit.\n");

    flush_output(game.initialize());

    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        let bytes_read = stdin.read_line(&mut input)?;
        if bytes_read == 0 {
            println!("\nGoodbye.");
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        // save/load touch the filesystem, so they are handled here rather
        // than in the engine.
        let mut parts = input.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let arg = parts.next();

        if verb.eq_ignore_ascii_case("save") {
            let path = arg.unwrap_or(SAVE_FILE);
            match fs::write(path, game.render_save()) {
                Ok(()) => println!("Game saved to {path}."),
                Err(e) => println!("Failed to save: {e}"),
            }
            continue;
        }

        if verb.eq_ignore_ascii_case("load") {
            let path = arg.unwrap_or(SAVE_FILE);
            match File::open(path) {
                Err(e) => println!("Failed to read the saved game: {e}"),
                Ok(file) => match game.restore_save(BufReader::new(file)) {
                    Ok(()) => println!("Game loaded."),
                    Err(LoadError::Read(e)) => println!("Failed to read the saved game: {e}"),
                    Err(e) => println!("That is not a usable saved game: {e}"),
                },
            }
            continue;
        }

        let (out, quit) = game.step(input);
        flush_output(out);

        if quit {
            break;
        }
    }

    Ok(())
}
