//! `elixir-xref init` (spec §6).

use crate::config::Settings;

pub fn run(force: bool) -> i32 {
    match Settings::init_config_file(force) {
        Ok(path) => {
            println!("Created configuration file at: {}", path.display());
            println!("Edit this file to customize your settings.");
            0
        }
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    }
}
