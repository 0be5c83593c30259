//! Static content collection and manifest rendering
//!
//! The scaffold pipeline runs strictly in this order:
//!
//! ```text
//! project dir ──walk──> candidate files ──classify──> ContentSet
//!     ContentSet ──serialize──> STATIC_CONTENT
//!     TemplateBundle + TemplateVariables ──render──> RenderedBundle ──write──> bundle dir
//! ```
//!
//! Nothing here spawns processes or keeps state between calls.

pub mod asset;
pub mod bundle;
pub mod collect;
pub mod error;
pub mod scaffold;
pub mod serialize;
pub mod template;
pub mod walk;

pub use asset::{AssetKind, ContentSet, StaticAsset};
pub use bundle::{RenderedBundle, TemplateBundle, TemplateFile};
pub use collect::{Collection, SkippedFile, collect};
pub use error::{Error, Result};
pub use scaffold::{ScaffoldReport, ScaffoldRequest, scaffold};
pub use serialize::{parse_static_content, serialize_static_content};
pub use template::TemplateVariables;
pub use walk::{CandidateFile, ProjectWalk};
