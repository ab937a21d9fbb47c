//! Subcommand implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod flux;
pub mod show;
pub mod walk;

use eyre::{Context, Result};
use indexmap::IndexMap;

use traitflux::config::Config;
use traitflux::definition::DefinitionSet;
use traitflux::definition::loader::DefinedWorld;
use traitflux::machine::EntityId;

/// Load definitions from a file, a directory or a name under the definitions path
pub fn load_definitions(arg: &str, config: &Config) -> Result<DefinitionSet> {
    let path = config.resolve_definition(arg);
    log::info!("Loading definitions from {}", path.display());

    if path.is_dir() {
        DefinitionSet::load_dir(&path)
    } else {
        DefinitionSet::load(&path)
    }
}

/// Load definitions and spawn them into a world
pub fn load_world(arg: &str, config: &Config) -> Result<(DefinedWorld, IndexMap<String, EntityId>)> {
    let set = load_definitions(arg, config)?;
    let built = set
        .build_world()
        .with_context(|| format!("Invalid definitions in {}", arg))?;
    Ok(built)
}

/// Look up an entity id by name, failing with a readable message
pub fn entity_id(ids: &IndexMap<String, EntityId>, name: &str) -> Result<EntityId> {
    ids.get(name).copied().ok_or_else(|| {
        let known: Vec<&str> = ids.keys().map(String::as_str).collect();
        eyre::eyre!("Entity '{}' not found (known: {})", name, known.join(", "))
    })
}
