use crate::data::GenerationRequest;

/// Renders generation requests into the single text prompt sent to the tool.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    framework: String,
}

impl PromptBuilder {
    pub fn new(framework: impl Into<String>) -> Self {
        Self {
            framework: framework.into(),
        }
    }

    pub fn framework(&self) -> &str {
        &self.framework
    }

    /// Requirements used when the caller supplies none
    pub fn default_requirements(&self) -> Vec<String> {
        vec![
            format!("Use {} testing framework", self.framework),
            "Include unit tests for all functions and classes".to_string(),
            "Add tests for edge cases and error conditions".to_string(),
            "Use fixtures for setup and teardown".to_string(),
            "Include parametrized tests where appropriate".to_string(),
            "Add docstrings to test functions".to_string(),
            "Use descriptive test names following test_<function>_<scenario> pattern".to_string(),
            "Mock external dependencies".to_string(),
            "Test both positive and negative cases".to_string(),
        ]
    }

    /// Builds the prompt for `code`, embedding the file name, the itemized
    /// requirements and the verbatim source.
    ///
    /// An empty `requirements` slice selects [`PromptBuilder::default_requirements`].
    pub fn build(&self, code: &str, filename: &str, requirements: &[String]) -> String {
        let defaults;
        let requirements: &[String] = if requirements.is_empty() {
            defaults = self.default_requirements();
            &defaults
        } else {
            requirements
        };

        let items = requirements
            .iter()
            .map(|req| format!("- {}", req))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Generate comprehensive tests for the following Python file named \"{filename}\".\n\
             \n\
             Requirements:\n\
             {items}\n\
             \n\
             Code to test:\n\
             ```python\n\
             {code}\n\
             ```\n\
             \n\
             Generate only the test code, no explanations. The test code should be complete and ready to run."
        )
    }

    pub fn render(&self, request: &GenerationRequest) -> String {
        self.build(
            &request.source_content,
            &request.display_name(),
            &request.requirements,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_name_the_framework() {
        let builder = PromptBuilder::new("unittest");
        let defaults = builder.default_requirements();
        assert_eq!(defaults.len(), 9);
        assert_eq!(defaults[0], "Use unittest testing framework");
    }

    #[test]
    fn prompt_embeds_filename_requirements_and_code() {
        let builder = PromptBuilder::new("pytest");
        let code = "def add(a, b):\n    return a + b";
        let prompt = builder.build(code, "math_utils.py", &[]);

        assert!(prompt.starts_with(
            "Generate comprehensive tests for the following Python file named \"math_utils.py\".\n\nRequirements:\n- Use pytest testing framework\n"
        ));
        assert!(prompt.contains("- Test both positive and negative cases\n\nCode to test:\n```python\ndef add(a, b):\n    return a + b\n```\n"));
        assert!(prompt.ends_with("Generate only the test code, no explanations. The test code should be complete and ready to run."));
    }

    #[test]
    fn caller_requirements_replace_defaults() {
        let builder = PromptBuilder::new("pytest");
        let prompt = builder.build("x = 1", "x.py", &["Only test x".to_string()]);
        assert!(prompt.contains("Requirements:\n- Only test x\n\nCode to test:"));
        assert!(!prompt.contains("Mock external dependencies"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let builder = PromptBuilder::new("pytest");
        let request = GenerationRequest::new(
            PathBuf::from("pkg/service.py"),
            "class Service: pass".to_string(),
            Vec::new(),
        );
        assert_eq!(builder.render(&request), builder.render(&request));
        assert!(builder.render(&request).contains("named \"service.py\""));
    }
}
