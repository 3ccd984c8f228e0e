use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

const SWAGGER_TO_SDK_TAG: &str = "$(swagger-to-sdk)";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SwaggerToSdkEntry {
    pub repo: String,
    #[serde(default)]
    pub after_scripts: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SwaggerToSdkBlock {
    #[serde(default, rename = "swagger-to-sdk")]
    swagger_to_sdk: Vec<SwaggerToSdkEntry>,
}

/// Collects the `swagger-to-sdk` entries of every fenced code block tagged
/// `$(swagger-to-sdk)` in an AutoRest `readme.md`.
///
/// # Errors
///
/// Returns an error if a tagged block is not valid YAML.
pub fn find_swagger_to_sdk_entries(content: &str, path: &Path) -> crate::Result<Vec<SwaggerToSdkEntry>> {
    let mut entries = Vec::new();
    for block in tagged_blocks(content) {
        if block.trim().is_empty() {
            continue;
        }
        let parsed: SwaggerToSdkBlock =
            serde_yml::from_str(&block).map_err(|source| ConfigError::ReadmeBlock {
                path: path.to_path_buf(),
                source,
            })?;
        entries.extend(parsed.swagger_to_sdk);
    }
    Ok(entries)
}

/// True when the readme lists `sdk_name` as a generation target.
///
/// # Errors
///
/// Returns an error if a tagged block is not valid YAML.
pub fn is_sdk_enabled_in_readme(content: &str, sdk_name: &str, path: &Path) -> crate::Result<bool> {
    Ok(find_swagger_to_sdk_entries(content, path)?
        .iter()
        .any(|entry| entry.repo == sdk_name))
}

fn tagged_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        match current.as_mut() {
            Some(lines) => {
                if trimmed.starts_with("```") {
                    blocks.push(lines.join("\n"));
                    current = None;
                } else {
                    lines.push(line);
                }
            }
            None => {
                let opens_tagged_block = trimmed
                    .strip_prefix("```")
                    .is_some_and(|info| info.contains(SWAGGER_TO_SDK_TAG));
                if opens_tagged_block {
                    current = Some(Vec::new());
                }
            }
        }
    }
    blocks
}
