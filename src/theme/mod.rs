pub(crate) mod clean;
pub(crate) mod raw;
pub(crate) mod registry;

pub(crate) use clean::*;
pub(crate) use raw::{AuthorPositioning, FooterTemplate, FooterTemplateChunk, Margin};
