//! Shared test utilities for the configmap-deployer workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`workspace`]: [`TestWorkspace`], a temporary workspace root with
//!   project helpers and file assertions
//! - [`runner`]: [`ScriptedRunner`], a `CommandRunner` that records every
//!   invocation and answers from a script instead of running skaffold or
//!   kubectl

pub mod runner;
pub mod workspace;

pub use runner::{Scripted, ScriptedRunner};
pub use workspace::TestWorkspace;
