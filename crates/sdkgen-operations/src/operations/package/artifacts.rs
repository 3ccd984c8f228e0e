use std::path::PathBuf;

use async_trait::async_trait;
use sdkgen_core::PackageData;
use tracing::{info, warn};

use super::{PackageStage, StageProviders};
use crate::Result;
use crate::context::WorkflowContext;

pub struct DetectArtifactsStage;

#[async_trait]
impl PackageStage for DetectArtifactsStage {
    fn name(&self) -> &'static str {
        "detect_artifacts"
    }

    async fn execute(
        &self,
        providers: StageProviders<'_>,
        ctx: &mut WorkflowContext,
        package: &mut PackageData,
    ) -> Result<()> {
        let Some(search) = &ctx
            .swagger_to_sdk_config
            .artifact_options()
            .artifact_path_from_file_search
        else {
            info!("artifactPathFromFileSearch is not configured, skipping artifact search");
            return Ok(());
        };
        info!(regex = search.search_regex.as_str(), "searching for artifacts");

        let sdk_folder = ctx.sdk_folder();
        let mut roots: Vec<PathBuf> = package.folders().map(|f| sdk_folder.join(f)).collect();
        if let Some(folder) = &search.search_folder {
            let root = sdk_folder.join(folder);
            if providers.workspace.is_dir(&root) {
                roots.push(root);
            } else {
                warn!(folder = %folder, "artifact search folder does not exist, skipping it");
            }
        }

        let found = providers.workspace.find_files(&roots, &search.search_regex)?;
        info!(package = %package.name, count = found.len(), "artifacts found");
        for path in found {
            let relative = path
                .strip_prefix(sdk_folder)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            if package.artifact_paths.contains(&relative) {
                continue;
            }
            info!(package = %package.name, "\t{relative}");
            package.artifact_paths.push(relative);
        }
        Ok(())
    }
}
