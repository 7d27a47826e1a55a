//! Command dispatch (spec §6's ambient CLI surface).

pub mod args;
pub mod commands;

use crate::collaborator::ProcessCollaborator;
use crate::config::Settings;
use crate::error::IndexResult;
use crate::store::LmdbStore;
use args::{Cli, Commands};

/// Run the parsed command to completion. Returns the process exit code.
pub fn run(cli: Cli) -> i32 {
    let Cli { config, command } = cli;

    if matches!(command, Commands::Init { .. }) {
        let Commands::Init { force } = command else {
            unreachable!("just matched Commands::Init")
        };
        return commands::init::run(force);
    }

    let settings = match Settings::load(config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return 1;
        }
    };
    crate::logging::init_with_config(&settings.logging);

    let outcome = match command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Config => {
            commands::config::run(&settings);
            Ok(())
        }
        Commands::Update { project_dir, threads } => {
            let settings = settings.with_overrides(project_dir, threads);
            run_with_store(&settings, |store, collaborator| {
                commands::update::run(store, collaborator, &settings.indexing)
            })
        }
        Commands::Query { query } => {
            run_with_store(&settings, |store, collaborator| commands::query::run(store, collaborator, query))
        }
    };

    match outcome {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn run_with_store(
    settings: &Settings,
    f: impl FnOnce(&LmdbStore, &ProcessCollaborator) -> IndexResult<()>,
) -> IndexResult<()> {
    std::fs::create_dir_all(&settings.data_dir).map_err(|_| crate::error::IndexError::DataDir {
        path: settings.data_dir.clone(),
    })?;
    let store = LmdbStore::open(&settings.index_path())?;
    let timeout = std::time::Duration::from_secs(settings.indexing.blob_timeout_secs);
    let collaborator =
        ProcessCollaborator::new(&settings.collaborator.command, timeout).with_base_args(settings.collaborator.base_args.clone());
    f(&store, &collaborator)
}
