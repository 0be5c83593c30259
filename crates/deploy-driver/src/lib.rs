//! External process drivers
//!
//! [`Driver`] applies and deletes a rendered bundle with `skaffold`;
//! [`Reporter`] runs read-only `kubectl` queries. Both go through a
//! [`CommandRunner`] so tests can script the external tools.

pub mod driver;
pub mod error;
pub mod reporter;
pub mod runner;

pub use driver::{DeployMode, Driver, DriverConfig};
pub use error::{Error, Result};
pub use reporter::{LabelSelector, NO_LOGS, NO_RESOURCES, Reporter, ReporterConfig};
pub use runner::{CommandOutput, CommandRunner, ExternalCommand, RunError, TokioRunner};
