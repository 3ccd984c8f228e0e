use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

pub const TSPCONFIG_FILE_NAME: &str = "tspconfig.yaml";

#[derive(Debug, Deserialize)]
struct TspConfig {
    #[serde(default)]
    options: Option<IndexMap<String, serde_yml::Value>>,
    #[serde(default)]
    emitters: Option<IndexMap<String, serde_yml::Value>>,
}

/// Lists the SDK repositories a `tspconfig.yaml` generates, in declaration order.
///
/// Emitter names under `options` and `emitters` are looked up in `mapping`;
/// unmapped emitters are ignored and each repository is listed once.
///
/// # Errors
///
/// Returns an error if `content` is not valid YAML.
pub fn find_sdk_to_generate_from_typespec_project(
    content: &str,
    mapping: &IndexMap<String, String>,
    path: &Path,
) -> crate::Result<Vec<String>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let config: TspConfig = serde_yml::from_str(content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    let mut sdks: Vec<String> = Vec::new();
    let emitters = config
        .options
        .iter()
        .chain(config.emitters.iter())
        .flat_map(IndexMap::keys);
    for emitter in emitters {
        match mapping.get(emitter) {
            Some(sdk) if !sdks.contains(sdk) => sdks.push(sdk.clone()),
            _ => {}
        }
    }
    Ok(sdks)
}

/// Resolves a TypeSpec project path that may name either the folder or the config file.
#[must_use]
pub fn tspconfig_file(relative: &str) -> String {
    if relative.ends_with(TSPCONFIG_FILE_NAME) {
        relative.to_string()
    } else {
        format!("{}/{TSPCONFIG_FILE_NAME}", relative.trim_end_matches('/'))
    }
}
