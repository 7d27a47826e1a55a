//! `elixir-xref update` (spec §6): run the updater over every un-indexed tag.

use crate::collaborator::Collaborator;
use crate::config::IndexingConfig;
use crate::error::IndexResult;
use crate::store::Store;
use crate::updater;

pub fn run(store: &(impl Store + Sync), collaborator: &(impl Collaborator + Sync), config: &IndexingConfig) -> IndexResult<()> {
    let updated = updater::update_all(store, collaborator, config)?;
    if updated.is_empty() {
        println!("nothing to do, every tag is already indexed");
    } else {
        for tag in &updated {
            println!("indexed {tag}");
        }
    }
    Ok(())
}
