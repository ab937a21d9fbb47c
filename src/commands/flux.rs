//! Drive an entity through a sequence of states

use colored::*;
use eyre::{Result, eyre};
use serde::Serialize;

use traitflux::config::Config;
use traitflux::token;
use traitflux::traitset::Traited;

use super::{entity_id, load_world};
use crate::cli::OutputFormat;

#[derive(Serialize)]
struct Step {
    to: String,
    moved: bool,
    state: String,
    traits: Vec<String>,
}

#[derive(Serialize)]
struct FluxReport {
    entity: String,
    from: String,
    steps: Vec<Step>,
}

pub fn run(
    file: &str,
    entity: &str,
    states: &[String],
    format: OutputFormat,
    quiet: bool,
    config: &Config,
) -> Result<()> {
    let (mut world, ids) = load_world(file, config)?;
    let id = entity_id(&ids, entity)?;
    let machine = world
        .get_mut(id)
        .ok_or_else(|| eyre!("Entity '{}' is no longer present", entity))?;

    let from = token::label(machine.state());
    let steps: Vec<Step> = states
        .iter()
        .map(|to| {
            let moved = machine.flux_to(to.clone());
            Step {
                to: to.clone(),
                moved,
                state: token::label(machine.state()),
                traits: machine.traits().labels(),
            }
        })
        .collect();

    let report = FluxReport {
        entity: entity.to_string(),
        from,
        steps,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&report)?),
        OutputFormat::Text => {
            if !quiet {
                println!("{} {} {}", "→".blue(), report.entity.bold(), format!("[{}]", report.from).cyan());
            }
            for step in &report.steps {
                if step.moved {
                    println!(
                        "  {} {} {}",
                        "✓".green(),
                        step.to.cyan(),
                        format!("{{{}}}", step.traits.join(", ")).yellow()
                    );
                } else {
                    println!(
                        "  {} {} {}",
                        "✗".red(),
                        step.to.dimmed(),
                        format!("(still {})", step.state).dimmed()
                    );
                }
            }
        }
    }

    Ok(())
}
