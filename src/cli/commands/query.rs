//! `elixir-xref query <subcommand>` (spec §6): thin JSON-emitting wrappers
//! over the named queries in `crate::query`.

use crate::cli::args::QueryCommand;
use crate::collaborator::Collaborator;
use crate::error::{IndexError, IndexResult};
use crate::query;
use crate::store::Store;
use crate::types::FamilySelector;

pub fn run(store: &impl Store, collaborator: &impl Collaborator, command: QueryCommand) -> IndexResult<()> {
    match command {
        QueryCommand::Latest => print_json(&query::latest(collaborator)?),
        QueryCommand::Versions => print_json(&query::versions(collaborator)?),
        QueryCommand::Type { tag, path } => print_json(&query::path_type(collaborator, &tag, &path)?.map(|t| match t {
            crate::collaborator::PathType::Tree => "tree",
            crate::collaborator::PathType::Blob => "blob",
        })),
        QueryCommand::Dir { tag, path } => print_json(&query::dir(collaborator, &tag, &path)?),
        QueryCommand::File { tag, path } => println!("{}", query::file(collaborator, &tag, &path)?),
        QueryCommand::Family { filename } => print_json(&query::family(&filename).map(|f| f.code().to_string())),
        QueryCommand::DtsComp => print_json(&query::dts_comp(collaborator)?),
        QueryCommand::Keys { table } => {
            let keys = query::keys(store, &table)?;
            let keys: Vec<String> = keys.iter().map(|k| String::from_utf8_lossy(k).into_owned()).collect();
            print_json(&keys);
        }
        QueryCommand::Ident { tag, ident, family } => {
            let selector = FamilySelector::parse(&family)
                .ok_or_else(|| IndexError::Config { reason: format!("unrecognized family selector '{family}'") })?;
            print_json(&query::ident(store, &tag, &ident, selector)?);
        }
    }
    Ok(())
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("error serializing result: {err}"),
    }
}
