//! @ai:module:intent Template resolution and prompt assembly
//! @ai:module:layer domain
//! @ai:module:public_api TemplateResolver, TemplateSet, PromptAssembler, ProjectData, PromptPair

pub mod assembler;
pub mod resolver;

pub use assembler::{ProjectData, PromptAssembler, PromptPair};
pub use resolver::{normalize_language, TemplateResolver, TemplateSet};
