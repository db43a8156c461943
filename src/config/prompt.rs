use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::sync::Arc;

#[derive(Debug)]
pub enum PromptError {
    TemplateNotFound(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::TemplateNotFound(key) => write!(f, "Prompt template '{}' not found", key),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

pub const ROUTINE_TEMPLATE_KEY: &str = "routine_request";

const DEFAULT_ROUTINE_TEMPLATE: &str = "Create a personalized usage routine for these products:
{products_json}

Please provide:
1. Morning routine (step by step)
2. Evening routine (step by step)
3. Special tips for optimal results
4. How often to use each product

Format the response in clear, easy-to-read sections.";

#[derive(Deserialize, Debug, Clone)]
pub struct PromptConfig {
    pub templates: HashMap<String, String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert(ROUTINE_TEMPLATE_KEY.to_string(), DEFAULT_ROUTINE_TEMPLATE.to_string());
        Self { templates }
    }
}

/// Loads templates from the given file, or falls back to the built-in set
/// when no path is configured.
pub fn load_prompts(path: Option<&str>) -> Result<Arc<PromptConfig>, Box<dyn Error + Send + Sync>> {
    let config = match path {
        Some(path) => {
            let file_content = fs
                ::read_to_string(path)
                .map_err(|e| format!("Failed to read prompts file '{}': {}", path, e))?;
            let config: PromptConfig = serde_json
                ::from_str(&file_content)
                .map_err(|e| format!("Failed to parse prompts file '{}': {}", path, e))?;
            if !config.templates.contains_key(ROUTINE_TEMPLATE_KEY) {
                return Err(Box::new(PromptError::TemplateNotFound(ROUTINE_TEMPLATE_KEY.to_string())));
            }
            info!("Loaded {} prompt templates from {}", config.templates.len(), path);
            config
        }
        None => PromptConfig::default(),
    };

    Ok(Arc::new(config))
}

pub fn get_routine_prompt(
    config: &PromptConfig,
    products_json: &str
) -> Result<String, PromptError> {
    let template = config.templates
        .get(ROUTINE_TEMPLATE_KEY)
        .ok_or_else(|| PromptError::TemplateNotFound(ROUTINE_TEMPLATE_KEY.to_string()))?;

    Ok(template.replace("{products_json}", products_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_routine_prompt_embeds_products() {
        let config = PromptConfig::default();
        let prompt = get_routine_prompt(&config, r#"[{"name": "Cream A"}]"#).unwrap();
        assert!(prompt.contains("Cream A"));
        assert!(prompt.contains("Morning routine"));
        assert!(!prompt.contains("{products_json}"));
    }

    #[test]
    fn missing_template_is_reported() {
        let config = PromptConfig { templates: HashMap::new() };
        assert!(matches!(
            get_routine_prompt(&config, "[]"),
            Err(PromptError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn prompts_file_must_contain_routine_template() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"templates": {{"other": "text"}}}}"#).unwrap();
        assert!(load_prompts(file.path().to_str()).is_err());
    }

    #[test]
    fn prompts_file_overrides_builtin_template() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"templates": {{"routine_request": "Routine for {{products_json}}"}}}}"#).unwrap();

        let config = load_prompts(file.path().to_str()).unwrap();
        let prompt = get_routine_prompt(&config, "[]").unwrap();
        assert_eq!(prompt, "Routine for []");
    }
}
