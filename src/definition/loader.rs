//! Definition loading and world building

use eyre::{Context, Result};
use indexmap::IndexMap;
use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::bag::Bag;
use crate::error::DefinitionError;
use crate::machine::{EntityId, TraitMachine, TransitionTable, World};
use crate::traitset::TraitSet;

/// String-token machine as stored in a definition file
pub type DefinedMachine = TraitMachine<String, String>;

/// String-token world built from definitions
pub type DefinedWorld = World<String, String>;

/// One entity declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    pub name: String,

    /// Initial state
    pub first: String,

    /// Terminal state
    #[serde(default, rename = "final")]
    pub final_state: Option<String>,

    /// State -> reachable states
    #[serde(default)]
    pub states: IndexMap<String, Vec<String>>,

    /// Names of stereotypes to compose stateless traits from
    #[serde(default)]
    pub stereotypes: Vec<String>,

    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// State -> traits that only apply in that state
    #[serde(default)]
    pub stateful: IndexMap<String, Vec<String>>,

    #[serde(default)]
    pub bag: IndexMap<String, u32>,

    /// Names of previously declared entities this one observes
    #[serde(default)]
    pub children: Vec<String>,
}

impl EntityDef {
    /// Every token this declaration mentions
    fn tokens(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.first)
            .chain(self.final_state.iter())
            .chain(self.states.iter().flat_map(|(s, next)| std::iter::once(s).chain(next)))
            .chain(self.include.iter())
            .chain(self.exclude.iter())
            .chain(self.stateful.iter().flat_map(|(s, ts)| std::iter::once(s).chain(ts)))
            .chain(self.bag.keys())
    }
}

/// A single definition file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionFile {
    #[serde(default)]
    pub stereotypes: IndexMap<String, Vec<String>>,

    #[serde(default)]
    pub entities: Vec<EntityDef>,
}

/// Definitions merged from one or more files
#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
    pub stereotypes: IndexMap<String, TraitSet<String>>,
    pub entities: Vec<EntityDef>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a single YAML definition file
    pub fn load(path: &Path) -> Result<Self> {
        let mut set = Self::new();
        set.merge(Self::load_file(path)?);
        Ok(set)
    }

    /// Load every `*.yaml` / `*.yml` below `dir`, in path order.
    ///
    /// The first file that cannot be read or parsed fails the whole load.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut set = Self::new();

        if !dir.exists() {
            return Ok(set);
        }

        let mut paths: Vec<_> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    log::debug!("Error walking directory: {}", e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().map(|e| e == "yaml" || e == "yml").unwrap_or(false))
            .collect();
        paths.sort();

        for path in paths {
            let file = Self::load_file(&path)
                .with_context(|| format!("Failed to load definitions under {}", dir.display()))?;
            set.merge(file);
        }

        Ok(set)
    }

    fn load_file(path: &Path) -> Result<DefinitionFile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read definition file: {}", path.display()))?;
        let file: DefinitionFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse definition file: {}", path.display()))?;
        log::info!(
            "Loaded {} stereotypes and {} entities from {}",
            file.stereotypes.len(),
            file.entities.len(),
            path.display()
        );
        Ok(file)
    }

    /// Add a file's declarations. Later stereotypes replace earlier ones by name.
    pub fn merge(&mut self, file: DefinitionFile) {
        for (name, traits) in file.stereotypes {
            self.stereotypes.insert(name, traits.into_iter().collect());
        }
        self.entities.extend(file.entities);
    }

    /// Check names and references without building anything
    pub fn validate(&self) -> Result<(), DefinitionError> {
        for (name, traits) in &self.stereotypes {
            check_token(name)?;
            for token in traits {
                check_token(token)?;
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        for entity in &self.entities {
            if seen.contains(&entity.name.as_str()) {
                return Err(DefinitionError::DuplicateEntity(entity.name.clone()));
            }
            for token in entity.tokens() {
                check_token(token)?;
            }
            for stereotype in &entity.stereotypes {
                if !self.stereotypes.contains_key(stereotype) {
                    return Err(DefinitionError::UnknownStereotype {
                        entity: entity.name.clone(),
                        stereotype: stereotype.clone(),
                    });
                }
            }
            for child in &entity.children {
                if !seen.contains(&child.as_str()) {
                    return Err(DefinitionError::UnknownChild {
                        entity: entity.name.clone(),
                        child: child.clone(),
                    });
                }
            }
            let table = TransitionTable::new(entity.states.clone(), entity.final_state.clone());
            if !table.contains(&entity.first) {
                return Err(DefinitionError::UnknownFirstState {
                    entity: entity.name.clone(),
                    state: entity.first.clone(),
                });
            }
            seen.push(&entity.name);
        }
        Ok(())
    }

    /// Build one machine from its declaration
    pub fn build_machine(&self, entity: &EntityDef) -> Result<DefinedMachine, DefinitionError> {
        let mut builder = TraitMachine::builder(entity.first.clone())
            .name(entity.name.clone())
            .transitions(entity.states.clone())
            .include(entity.include.iter().cloned())
            .exclude(entity.exclude.iter().cloned())
            .bag(Bag::from_counts(entity.bag.clone()));

        if let Some(last) = &entity.final_state {
            builder = builder.final_state(last.clone());
        }
        for name in &entity.stereotypes {
            let stereotype = self
                .stereotypes
                .get(name)
                .ok_or_else(|| DefinitionError::UnknownStereotype {
                    entity: entity.name.clone(),
                    stereotype: name.clone(),
                })?;
            builder = builder.stereotype(stereotype);
        }
        for (state, tokens) in &entity.stateful {
            builder = builder.stateful(state.clone(), tokens.iter().cloned());
        }

        Ok(builder.build())
    }

    /// Validate, then spawn every entity in declaration order.
    ///
    /// Returns the world and each entity's id by name.
    pub fn build_world(&self) -> Result<(DefinedWorld, IndexMap<String, EntityId>), DefinitionError> {
        self.validate()?;

        let mut world = World::new();
        let mut ids: IndexMap<String, EntityId> = IndexMap::new();

        for entity in &self.entities {
            let machine = self.build_machine(entity)?;
            let children = entity
                .children
                .iter()
                .map(|child| {
                    ids.get(child).copied().ok_or_else(|| DefinitionError::UnknownChild {
                        entity: entity.name.clone(),
                        child: child.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let id = if children.is_empty() {
                world.spawn(machine)
            } else {
                world.spawn_with_children(machine, children)
            };
            ids.insert(entity.name.clone(), id);
        }

        Ok((world, ids))
    }
}

fn check_token(token: &str) -> Result<(), DefinitionError> {
    if regex_is_match!(r"^[A-Za-z_][A-Za-z0-9_]*$", token) {
        Ok(())
    } else {
        Err(DefinitionError::InvalidToken(token.to_string()))
    }
}
