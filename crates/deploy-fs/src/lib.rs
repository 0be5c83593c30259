//! Filesystem layer for configmap-deployer
//!
//! Validates caller-supplied names and paths before anything touches the
//! disk, resolves project directories against the workspace root, and
//! provides the bundle layout plus atomic write helpers used by the
//! renderer.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;
pub mod validate;

pub use config::ConfigStore;
pub use constants::BundlePath;
pub use error::{Error, Result};
pub use layout::{BundleLayout, TargetState};
pub use path::NormalizedPath;
pub use validate::{resolve_project_dir, validate_app_name, validate_ingress_path};
