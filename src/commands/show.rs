//! Show entities

use colored::*;
use eyre::Result;
use indexmap::IndexMap;
use serde::Serialize;

use traitflux::config::Config;
use traitflux::definition::loader::{DefinedMachine, DefinedWorld};
use traitflux::machine::EntityId;
use traitflux::token;
use traitflux::traitset::Traited;

use super::{entity_id, load_world};
use crate::cli::OutputFormat;

#[derive(Serialize)]
struct EntitySummary {
    name: String,
    state: String,
    traits: Vec<String>,
    stateless_traits: Vec<String>,
    successors: Vec<String>,
    bag: IndexMap<String, u32>,
    parent: Option<String>,
    children: Vec<String>,
}

fn summarize(world: &DefinedWorld, id: EntityId, machine: &DefinedMachine) -> EntitySummary {
    let name_of = |id: EntityId| world.get(id).map(|m| m.name().to_string());

    EntitySummary {
        name: machine.name().to_string(),
        state: token::label(machine.state()),
        traits: machine.traits().labels(),
        stateless_traits: machine.stateless_traits().labels(),
        successors: machine.successors().cloned().collect(),
        bag: machine.bag.iter().map(|(k, n)| (k.clone(), n)).collect(),
        parent: world.parent_of(id).and_then(name_of),
        children: world.children_of(id).into_iter().filter_map(name_of).collect(),
    }
}

pub fn run(file: &str, entity: Option<&str>, format: OutputFormat, config: &Config) -> Result<()> {
    let (world, ids) = load_world(file, config)?;

    let selected: Vec<EntityId> = match entity {
        Some(name) => vec![entity_id(&ids, name)?],
        None => ids.values().copied().collect(),
    };

    let summaries: Vec<EntitySummary> = selected
        .into_iter()
        .filter_map(|id| world.get(id).map(|m| summarize(&world, id, m)))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Text => {
            if summaries.is_empty() {
                println!("  {} No entities defined in {}", "(none)".dimmed(), file);
            }
            for s in &summaries {
                println!("{} {} {}", "●".green(), s.name.bold(), format!("[{}]", s.state).cyan());
                println!("    Traits: {}", s.traits.join(", ").yellow());
                if s.stateless_traits != s.traits {
                    println!("    Always: {}", s.stateless_traits.join(", ").dimmed());
                }
                if s.successors.is_empty() {
                    println!("    Next: {}", "(terminal)".dimmed());
                } else {
                    println!("    Next: {}", s.successors.join(", "));
                }
                if !s.bag.is_empty() {
                    let bag: Vec<String> = s.bag.iter().map(|(k, n)| format!("{}: {}", k, n)).collect();
                    println!("    Bag: {}", bag.join(", ").magenta());
                }
                if let Some(ref parent) = s.parent {
                    println!("    Parent: {}", parent);
                }
                if !s.children.is_empty() {
                    println!("    Children: {}", s.children.join(", "));
                }
                println!();
            }
        }
    }

    Ok(())
}
