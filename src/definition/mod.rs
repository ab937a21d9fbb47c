//! Definition files: worlds of string-token machines declared in YAML
//!
//! ```yaml
//! stereotypes:
//!   tool: [selected, used]
//!
//! entities:
//!   - name: lid
//!     first: closed
//!     states:
//!       closed: [open]
//!       open: [closed]
//!     stateful:
//!       open: [pourable]
//!   - name: kettle
//!     first: ready
//!     final: destroyed
//!     states:
//!       ready: [working, destroyed]
//!       working: [ready, broken]
//!     stereotypes: [tool]
//!     exclude: [used]
//!     stateful:
//!       working: [hot]
//!     bag:
//!       water: 2
//!     children: [lid]
//! ```
//!
//! Children must be declared before the entity that lists them.

pub mod loader;

pub use loader::{DefinitionFile, DefinitionSet, EntityDef};
