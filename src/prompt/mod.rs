//! @ai:module:intent Prompt composition and task templates
//! @ai:module:layer domain
//! @ai:module:public_api PromptComposer, PromptTemplates

pub mod composer;
pub mod templates;

pub use composer::{default_system_role_base, PromptComposer, SECTION_DELIMITER};
pub use templates::PromptTemplates;
