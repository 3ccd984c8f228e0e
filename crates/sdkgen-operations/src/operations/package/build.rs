use async_trait::async_trait;
use sdkgen_core::PackageData;
use tracing::info;

use super::{PackageStage, StageProviders};
use crate::Result;
use crate::context::WorkflowContext;
use crate::script::{CustomScript, StatusTarget, run_custom_script};

pub struct BuildStage;

#[async_trait]
impl PackageStage for BuildStage {
    fn name(&self) -> &'static str {
        "build"
    }

    async fn execute(
        &self,
        providers: StageProviders<'_>,
        ctx: &mut WorkflowContext,
        package: &mut PackageData,
    ) -> Result<()> {
        if ctx.swagger_to_sdk_config.generate_options().generate_and_build {
            info!("generate script also builds, skipping build");
            return Ok(());
        }
        let Some(script) = ctx.swagger_to_sdk_config.package_options().build_script.clone() else {
            info!("buildScript of packageOptions is not configured in swagger_to_sdk_config.json");
            return Ok(());
        };

        let args = package.folders().map(str::to_string).collect();
        run_custom_script(
            providers.runner,
            ctx,
            StatusTarget::Package(package),
            CustomScript::new(&script, "Build").with_args(args),
        )
        .await;
        Ok(())
    }
}
