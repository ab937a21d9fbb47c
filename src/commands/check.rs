//! Validate definitions and report anomalies

use colored::*;
use eyre::{Context, Result};

use traitflux::config::Config;
use traitflux::traitset::Traited;

use super::load_definitions;

pub fn run(file: &str, quiet: bool, config: &Config) -> Result<()> {
    let set = load_definitions(file, config)?;
    let (world, ids) = set
        .build_world()
        .with_context(|| format!("Invalid definitions in {}", file))?;

    let mut warnings = 0;

    for (name, id) in &ids {
        let Some(machine) = world.get(*id) else {
            continue;
        };

        if machine.is_traitless() {
            warnings += 1;
            println!("  {} {} has no traits", "⚠".yellow(), name.bold());
        }

        if machine.is_stuck() {
            warnings += 1;
            println!(
                "  {} {} starts in {} and can never leave it",
                "⚠".yellow(),
                name.bold(),
                machine.state_label().unwrap_or_default().cyan()
            );
        }

        if let Some(at) = world.find_cycle(*id) {
            warnings += 1;
            let looped = world.get(at).map(|m| m.name().to_string()).unwrap_or_default();
            println!("  {} cycle below {} through {}", "⚠".yellow(), name.bold(), looped.bold());
        }
    }

    if !quiet {
        println!(
            "{} {} entities, {} stereotypes, {} warnings",
            "✓".green(),
            ids.len(),
            set.stereotypes.len(),
            warnings
        );
    }

    Ok(())
}
