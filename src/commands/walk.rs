//! Print a hierarchy in pre-order

use colored::*;
use eyre::Result;

use traitflux::config::Config;
use traitflux::token;
use traitflux::traitset::Traited;

use super::{entity_id, load_world};

pub fn run(file: &str, root: &str, config: &Config) -> Result<()> {
    let (world, ids) = load_world(file, config)?;
    let root = entity_id(&ids, root)?;

    if let Some(at) = world.find_cycle(root) {
        let name = world.get(at).map(|m| m.name().to_string()).unwrap_or_default();
        eyre::bail!("Cannot walk: {} is its own descendant", name);
    }

    for (id, depth) in world.walk(root).with_depth() {
        let Some(machine) = world.get(id) else {
            continue;
        };
        println!(
            "{}{} {} {}",
            "  ".repeat(depth),
            machine.name().bold(),
            format!("[{}]", token::label(machine.state())).cyan(),
            machine.traits().to_string().dimmed()
        );
    }

    Ok(())
}
