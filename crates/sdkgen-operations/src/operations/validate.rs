use sdkgen_config::{
    find_sdk_to_generate_from_typespec_project, is_sdk_enabled_in_readme, tspconfig_file,
};
use sdkgen_core::{SdkAutoStatus, StatusContainer};
use tracing::{info, warn};

use crate::context::WorkflowContext;
use crate::error::OperationError;
use crate::traits::WorkspaceIo;
use crate::Result;

/// Decides whether this run generates anything and from which config.
///
/// When both sources enable the SDK the TypeSpec config wins and the run is
/// flagged as duplicated. When neither does, the status becomes
/// `notEnabled`.
///
/// # Errors
///
/// Returns an error if neither a TypeSpec config nor a readme path is given,
/// or if the config that is given cannot be read or parsed.
pub fn validate_sdk_config<W>(workspace: &W, ctx: &mut WorkflowContext) -> Result<()>
where
    W: WorkspaceIo + ?Sized,
{
    let tsp_config_path = ctx.config.tsp_config_path.clone();
    let readme_path = ctx.config.readme_path.clone();
    if tsp_config_path.is_none() && readme_path.is_none() {
        return Err(OperationError::MissingSpecConfig);
    }
    let sdk_name = ctx.config.sdk_name.clone();

    let enabled_in_typespec = match &tsp_config_path {
        Some(tsp) => {
            let path = ctx.config.spec_repo.join(tspconfig_file(tsp));
            match workspace.read_file(&path)? {
                Some(content) => {
                    let sdks = find_sdk_to_generate_from_typespec_project(
                        &content,
                        ctx.spec_repo_config.emitter_mapping(),
                        &path,
                    )?;
                    info!(path = %path.display(), sdks = ?sdks, "SDKs configured in tspconfig.yaml");
                    sdks.contains(&sdk_name)
                }
                None => {
                    warn!(path = %path.display(), "tspconfig.yaml not found");
                    false
                }
            }
        }
        None => false,
    };

    let enabled_in_readme = match &readme_path {
        Some(readme) => {
            let path = ctx.config.spec_repo.join(readme);
            match workspace.read_file(&path)? {
                Some(content) => is_sdk_enabled_in_readme(&content, &sdk_name, &path)?,
                None => {
                    warn!(path = %path.display(), "readme.md not found");
                    false
                }
            }
        }
        None => false,
    };

    match (enabled_in_typespec, enabled_in_readme) {
        (true, true) => {
            warn!(
                sdk = %sdk_name,
                "SDK is enabled in both tspconfig.yaml and readme.md, generating from tspconfig.yaml"
            );
            ctx.is_sdk_config_duplicated = true;
            ctx.spec_config_path = tsp_config_path;
        }
        (true, false) => ctx.spec_config_path = tsp_config_path,
        (false, true) => ctx.spec_config_path = readme_path,
        (false, false) => {
            warn!(
                sdk = %sdk_name,
                tsp_config = ?tsp_config_path,
                readme = ?readme_path,
                "SDK is not enabled in tspconfig.yaml or readme.md"
            );
            ctx.set_status(SdkAutoStatus::NotEnabled);
            return Ok(());
        }
    }
    info!(spec_config = ?ctx.spec_config_path, "SDK generation is enabled");
    Ok(())
}
