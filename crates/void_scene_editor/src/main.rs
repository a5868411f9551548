//! Void Scene Editor
//!
//! Entry point for the interactive scene editor.
//!
//! Usage: `void_scene_editor [--config <preferences.toml>] [scene.json]`

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use void_scene_editor::{EditorPreferences, EditorState, FieldBuffer, Shell, ShellReply};

struct Args {
    config: Option<PathBuf>,
    scene: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Args { config: None, scene: None };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().ok_or("--config needs a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => return Err(format!("Unknown option: {}", flag)),
                _ => parsed.scene = Some(PathBuf::from(arg)),
            }
        }
        Ok(parsed)
    }
}

fn main() {
    env_logger::init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: void_scene_editor [--config <preferences.toml>] [scene.json]");
            std::process::exit(2);
        }
    };

    let config_path = args.config.or_else(EditorPreferences::default_path);
    let mut preferences = EditorPreferences::load_or_default(config_path.as_deref());
    if let Some(scene) = args.scene {
        preferences.scene_file = scene;
    }

    let mut state = EditorState::open(preferences, FieldBuffer::default());
    log::info!("Editing {}", state.scene_path.display());
    println!("{} - type 'help' for commands", state.status_message);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            log::warn!("Failed to flush prompt: {}", e);
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
            None => break,
        };

        match Shell::run_line(&mut state, &line) {
            ShellReply::Output(text) if text.is_empty() => {}
            ShellReply::Output(text) => println!("{}", text),
            ShellReply::Quit => break,
        }
    }

    if let Err(e) = state.shutdown() {
        log::error!("Failed to save scene: {}", e);
        std::process::exit(1);
    }
}
