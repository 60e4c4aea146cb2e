//! @ai:module:intent Compose the system-role content from the persona block and a task prompt
//! @ai:module:layer domain
//! @ai:module:public_api PromptComposer, default_system_role_base, SECTION_DELIMITER
//! @ai:module:stateless true

use crate::config::LlmConfig;
use crate::llm::message::MessageSequence;

/// Separator between the persona block and the task prompt.
pub const SECTION_DELIMITER: &str = "\n\n---\n\n";

/// @ai:intent Built-in persona block with the four fixed report constraints
/// @ai:effects pure
pub fn default_system_role_base(language: &str) -> String {
    format!(
        "You are a professional technical report writer. Follow these rules strictly:\n\
         - Summarize and classify only the content supplied by the user; \
         never invent or add information that does not appear in it.\n\
         - The output must be valid Markdown written in {language}.\n\
         - If an item cannot be clearly classified, \
         place it under \"Other\" with a one-line explanation.\n\
         - Keep the structure clear and never repeat an entry across sections."
    )
}

/// @ai:intent Deterministic system-content builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptComposer {
    base: String,
}

impl PromptComposer {
    /// @ai:effects pure
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// @ai:intent Use the configured override when it is non-blank, else the built-in block
    /// @ai:effects pure
    pub fn from_config(config: &LlmConfig) -> Self {
        let base = config
            .system_role_base
            .as_deref()
            .map(str::trim)
            .filter(|base| !base.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_system_role_base(&config.report_language));
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// @ai:intent Combine the persona block with a task prompt
    /// @ai:post blank task prompt returns the base block unchanged
    /// @ai:effects pure
    pub fn compose(&self, task_prompt: &str) -> String {
        let task = task_prompt.trim();
        if task.is_empty() {
            return self.base.clone();
        }
        format!("{}{}{}", self.base, SECTION_DELIMITER, task)
    }

    /// @ai:intent Build the two-message sequence sent to a backend
    /// @ai:effects pure
    pub fn messages(&self, task_prompt: &str, user_content: Option<&str>) -> MessageSequence {
        MessageSequence::new(self.compose(task_prompt), user_content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::Role;
    use pretty_assertions::assert_eq;

    fn composer() -> PromptComposer {
        PromptComposer::from_config(&LlmConfig::default())
    }

    #[test]
    fn test_blank_task_prompt_returns_base_unchanged() {
        let composer = composer();
        for blank in ["", " ", "\n\t  \n"] {
            assert_eq!(composer.compose(blank), composer.base());
        }
    }

    #[test]
    fn test_task_prompt_is_trimmed_and_appended() {
        let composer = composer();
        let composed = composer.compose("  Summarize GitHub issues \n");

        assert!(composed.starts_with(composer.base()));
        assert!(composed.ends_with("Summarize GitHub issues"));
        assert_eq!(
            composed,
            format!("{}{}Summarize GitHub issues", composer.base(), SECTION_DELIMITER)
        );
    }

    #[test]
    fn test_default_base_lists_constraints_in_order() {
        let base = default_system_role_base("English");
        let bullets: Vec<&str> = base.lines().filter(|line| line.starts_with("- ")).collect();

        assert_eq!(bullets.len(), 4);
        assert!(bullets[0].contains("never invent"));
        assert!(bullets[1].contains("valid Markdown written in English"));
        assert!(bullets[2].contains("\"Other\""));
        assert!(bullets[3].contains("never repeat"));
    }

    #[test]
    fn test_override_replaces_base_and_blank_override_is_ignored() {
        let mut config = LlmConfig::default();
        config.system_role_base = Some("  Be terse.  ".to_string());
        assert_eq!(PromptComposer::from_config(&config).base(), "Be terse.");

        config.system_role_base = Some("   ".to_string());
        assert_eq!(
            PromptComposer::from_config(&config).base(),
            default_system_role_base("English")
        );
    }

    #[test]
    fn test_messages_use_empty_user_content_when_absent() {
        let sequence = composer().messages("task", None);
        assert_eq!(sequence.user().role, Role::User);
        assert_eq!(sequence.user().content, "");
    }
}
