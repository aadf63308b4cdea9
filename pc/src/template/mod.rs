//! Template handling
//!
//! Templates are markdown files whose `[...]` tokens are variables, with an
//! optional YAML frontmatter block declaring a title and variable metadata.

mod extract;
mod frontmatter;
mod parse;
mod render;
mod store;

pub use extract::{Autofill, Keywords, Placeholder, PlaceholderKind, extract};
pub use frontmatter::{Frontmatter, VariableMeta, split_frontmatter};
pub use parse::{Template, parse};
pub use render::{ValueMap, render};
pub use store::TemplateStore;
