use anyhow::Result;
use inquire::{Select, Text};

use crate::hook::{PackageManager, VersionManager};

/// Trait for providing interactive selection functionality
/// This allows us to abstract away the interactive prompts for testing
pub trait SelectionProvider {
    /// Present a selection menu and return the user's choice
    ///
    /// # Errors
    /// Returns an error if the selection process fails or user cancels
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<String>;

    /// Get free-form text input from the user
    ///
    /// # Errors
    /// Returns an error if the input process fails or user cancels
    fn get_text_input(&self, prompt: &str, default: &str) -> Result<String>;
}

/// Real implementation using inquire for production use
pub struct RealSelectionProvider;

impl SelectionProvider for RealSelectionProvider {
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<String> {
        let selection = Select::new(prompt, options)
            .with_page_size(10)
            .with_vim_mode(true)
            .prompt()?;
        Ok(selection)
    }

    fn get_text_input(&self, prompt: &str, default: &str) -> Result<String> {
        let result = Text::new(prompt).with_default(default).prompt()?;
        Ok(result)
    }
}

/// Mock implementation for testing that answers prompts in order
pub struct MockSelectionProvider {
    responses: std::cell::RefCell<std::collections::VecDeque<String>>,
}

impl MockSelectionProvider {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: std::cell::RefCell::new(responses.into_iter().map(Into::into).collect()),
        }
    }

    fn next_response(&self) -> Result<String> {
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("Mock provider has no response left"))
    }
}

impl SelectionProvider for MockSelectionProvider {
    fn select(&self, _prompt: &str, options: Vec<String>) -> Result<String> {
        let response = self.next_response()?;
        // Validate that the response is actually in the options
        if options.contains(&response) {
            Ok(response)
        } else {
            anyhow::bail!("Mock response '{}' not found in options", response)
        }
    }

    fn get_text_input(&self, _prompt: &str, _default: &str) -> Result<String> {
        self.next_response()
    }
}

/// Answers collected by `gwt init --interactive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookAnswers {
    pub copy_files: Vec<String>,
    pub version_manager: VersionManager,
    pub package_manager: PackageManager,
}

/// Ask which files to copy and which tools the post-checkout hook should run
///
/// # Errors
/// Returns an error if a prompt fails or is cancelled
pub fn prompt_hook_options(
    provider: &dyn SelectionProvider,
    current_copy_files: &[String],
) -> Result<HookAnswers> {
    let files = provider.get_text_input(
        "Files to copy into new worktrees (space separated):",
        &current_copy_files.join(" "),
    )?;
    let copy_files = files.split_whitespace().map(str::to_string).collect();

    let version_manager = choose(provider, "Version manager:", &VersionManager::ALL)?;
    let package_manager = choose(provider, "Package manager:", &PackageManager::ALL)?;

    Ok(HookAnswers {
        copy_files,
        version_manager,
        package_manager,
    })
}

fn choose<T: Copy + std::fmt::Display>(
    provider: &dyn SelectionProvider,
    prompt: &str,
    all: &[T],
) -> Result<T> {
    let options = all.iter().map(ToString::to_string).collect();
    let selected = provider.select(prompt, options)?;

    all.iter()
        .copied()
        .find(|value| value.to_string() == selected)
        .ok_or_else(|| anyhow::anyhow!("Unknown selection: {selected}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_selection_provider_valid_response() {
        let options = vec!["option1".to_string(), "option2".to_string()];
        let provider = MockSelectionProvider::new(["option1"]);

        let result = provider.select("Test prompt", options);
        assert!(matches!(result, Ok(ref s) if s == "option1"));
    }

    #[test]
    fn test_mock_selection_provider_invalid_response() {
        let options = vec!["option1".to_string(), "option2".to_string()];
        let provider = MockSelectionProvider::new(["invalid"]);

        let result = provider.select("Test prompt", options);
        assert!(result.is_err());
    }

    #[test]
    fn test_prompt_hook_options() {
        let provider = MockSelectionProvider::new([".env  .env.local", "mise", "pnpm"]);

        let expected = HookAnswers {
            copy_files: vec![".env".to_string(), ".env.local".to_string()],
            version_manager: VersionManager::Mise,
            package_manager: PackageManager::Pnpm,
        };
        let answers = prompt_hook_options(&provider, &[]);
        assert!(matches!(answers, Ok(ref a) if *a == expected));
    }

    #[test]
    fn test_prompt_hook_options_none_selected() {
        let provider = MockSelectionProvider::new(["", "none", "none"]);

        let answers = prompt_hook_options(&provider, &[".env".to_string()]);
        assert!(matches!(
            answers,
            Ok(ref a) if a.copy_files.is_empty()
                && a.version_manager == VersionManager::None
                && a.package_manager == PackageManager::None
        ));
    }

    #[test]
    fn test_prompt_hook_options_cancelled() {
        let provider = MockSelectionProvider::new([".env"]);
        assert!(prompt_hook_options(&provider, &[]).is_err());
    }
}
