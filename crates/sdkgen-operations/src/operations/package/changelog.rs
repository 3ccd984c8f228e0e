use async_trait::async_trait;
use sdkgen_core::PackageData;
use sdkgen_suppression::resolve;
use tracing::{debug, info};

use super::{PackageStage, StageProviders};
use crate::Result;
use crate::context::WorkflowContext;
use crate::script::{CustomScript, StatusTarget, run_custom_script};

/// Collects the changelog and decides whether the package breaks its API.
///
/// Without a changelog script the changelog from the generate output
/// stands. With one, the script's output replaces it and, unless the script
/// failed, any line matching `breakingChangeDetect` marks a breaking change.
pub struct ChangelogStage;

#[async_trait]
impl PackageStage for ChangelogStage {
    fn name(&self) -> &'static str {
        "changelog"
    }

    async fn execute(
        &self,
        providers: StageProviders<'_>,
        ctx: &mut WorkflowContext,
        package: &mut PackageData,
    ) -> Result<()> {
        match ctx.swagger_to_sdk_config.package_options().changelog_script.clone() {
            None => {
                info!("changelogScript is not configured");
                let lines: Vec<String> = package
                    .changelogs
                    .iter()
                    .filter(|line| !line.is_empty())
                    .map(|line| format!("[Changelog] {line}"))
                    .collect();
                for line in &lines {
                    info!(package = %package.name, "{line}");
                }
                package.messages.extend(lines);
            }
            Some(script) => {
                let args = package.folders().map(str::to_string).collect();
                let run = run_custom_script(
                    providers.runner,
                    ctx,
                    StatusTarget::Package(&mut *package),
                    CustomScript::new(&script.run, "Changelog").with_args(args),
                )
                .await;
                if let Some(outcome) = &run.outcome {
                    package.changelogs = outcome.all_lines().map(str::to_string).collect();
                }
                if !run.is_failed() {
                    let detected: Vec<String> = package
                        .changelogs
                        .iter()
                        .filter(|line| script.breaking_change_detect.matches(line))
                        .cloned()
                        .collect();
                    if !detected.is_empty() {
                        info!(package = %package.name, count = detected.len(), "breaking change detected");
                        package.has_breaking_change = true;
                        if package.breaking_change_items.is_empty() {
                            package.breaking_change_items = detected;
                        }
                    }
                }
            }
        }

        if package.has_breaking_change {
            let lines = resolve(
                ctx.suppressions.as_ref(),
                &ctx.config.sdk_name,
                &package.name,
                &package.breaking_change_items,
            );
            debug!(
                package = %package.name,
                present = lines.present.len(),
                absent = lines.absent.len(),
                "resolved breaking change suppressions"
            );
            package.present_suppression_lines = lines.present;
            package.absent_suppression_lines = lines.absent;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockScriptRunner, MockWorkspace, test_context};
    use sdkgen_config::{ChangelogScriptOptions, PackageOptions, SwaggerToSdkConfig};
    use sdkgen_core::{NO_SUPPRESSION_FILE, SdkAutoStatus};
    use sdkgen_script::{LineFilter, RunOptions};
    use sdkgen_suppression::parse_suppressions;

    fn changelog_config() -> SwaggerToSdkConfig {
        SwaggerToSdkConfig::default().with_package_options(PackageOptions {
            changelog_script: Some(ChangelogScriptOptions {
                run: RunOptions::new("eng/changelog.sh"),
                breaking_change_detect: LineFilter::pattern("BREAKING CHANGE")
                    .expect("valid pattern"),
            }),
            ..PackageOptions::default()
        })
    }

    fn breaking_runner() -> MockScriptRunner {
        MockScriptRunner::new().with_response(
            "eng/changelog.sh",
            MockResponse::exited(0)
                .with_stdout("Added method X")
                .with_stdout("BREAKING CHANGE: removed method Y"),
        )
    }

    async fn run_stage(runner: &MockScriptRunner, ctx: &mut WorkflowContext, pkg: &mut PackageData) {
        let workspace = MockWorkspace::new();
        ChangelogStage
            .execute(
                StageProviders {
                    runner,
                    workspace: &workspace,
                },
                ctx,
                pkg,
            )
            .await
            .expect("changelog stage");
    }

    #[tokio::test]
    async fn matching_line_marks_breaking_change() {
        let runner = breaking_runner();
        let mut ctx = test_context();
        ctx.swagger_to_sdk_config = changelog_config();
        let mut pkg = PackageData::new("azure-foo", "sdk/foo");

        run_stage(&runner, &mut ctx, &mut pkg).await;

        assert_eq!(
            pkg.changelogs,
            vec!["Added method X", "BREAKING CHANGE: removed method Y"]
        );
        assert!(pkg.has_breaking_change);
        assert_eq!(pkg.present_suppression_lines, vec![NO_SUPPRESSION_FILE]);
        assert_eq!(
            pkg.absent_suppression_lines,
            vec!["+\tBREAKING CHANGE: removed method Y"]
        );
        assert!(pkg.should_label_breaking_change());
    }

    #[tokio::test]
    async fn declared_suppression_is_listed_next_to_detected_change() -> anyhow::Result<()> {
        let runner = breaking_runner();
        let mut ctx = test_context();
        ctx.swagger_to_sdk_config = changelog_config();
        ctx.suppressions = Some(parse_suppressions(
            "suppressions:\n  azure-sdk-for-python:\n    - package: azure-foo\n      breaking-changes:\n        - \"BREAKING CHANGE: removed method Y\"\n",
        )?);
        let mut pkg = PackageData::new("azure-foo", "sdk/foo");

        run_stage(&runner, &mut ctx, &mut pkg).await;

        assert!(pkg.has_breaking_change);
        assert_eq!(
            pkg.present_suppression_lines,
            vec!["BREAKING CHANGE: removed method Y"]
        );
        assert_eq!(
            pkg.absent_suppression_lines,
            vec!["+\tBREAKING CHANGE: removed method Y"]
        );
        assert!(!pkg.should_label_breaking_change());
        Ok(())
    }

    #[tokio::test]
    async fn failed_script_does_not_detect_breaking_changes() {
        let runner = MockScriptRunner::new().with_response(
            "eng/changelog.sh",
            MockResponse::exited(1).with_stdout("BREAKING CHANGE: removed method Y"),
        );
        let mut ctx = test_context();
        ctx.swagger_to_sdk_config = changelog_config();
        let mut pkg = PackageData::new("azure-foo", "sdk/foo");

        run_stage(&runner, &mut ctx, &mut pkg).await;

        assert_eq!(pkg.status, SdkAutoStatus::Failed);
        assert!(!pkg.has_breaking_change);
        assert!(pkg.present_suppression_lines.is_empty());
    }

    #[tokio::test]
    async fn generated_changelog_stands_without_script() {
        let runner = MockScriptRunner::new();
        let mut ctx = test_context();
        let mut pkg = PackageData::new("azure-foo", "sdk/foo");
        pkg.changelogs = vec!["Removed operation Y".to_string()];
        pkg.has_breaking_change = true;
        pkg.breaking_change_items = vec!["Removed operation Y".to_string()];

        run_stage(&runner, &mut ctx, &mut pkg).await;

        assert!(runner.calls().is_empty());
        assert_eq!(pkg.messages, vec!["[Changelog] Removed operation Y"]);
        assert_eq!(pkg.absent_suppression_lines, vec!["+\tRemoved operation Y"]);
    }

    #[tokio::test]
    async fn generated_breaking_items_win_over_matched_lines() {
        let runner = breaking_runner();
        let mut ctx = test_context();
        ctx.swagger_to_sdk_config = changelog_config();
        let mut pkg = PackageData::new("azure-foo", "sdk/foo");
        pkg.breaking_change_items = vec!["Method Y was removed".to_string()];

        run_stage(&runner, &mut ctx, &mut pkg).await;

        assert_eq!(pkg.absent_suppression_lines, vec!["+\tMethod Y was removed"]);
    }
}
