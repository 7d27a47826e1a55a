//! `elixir-xref config` (spec §6): print the fully resolved settings.

use crate::config::Settings;

pub fn run(settings: &Settings) {
    match toml::to_string_pretty(settings) {
        Ok(toml_str) => println!("{toml_str}"),
        Err(err) => eprintln!("Error displaying config: {err}"),
    }
}
