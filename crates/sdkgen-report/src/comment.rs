//! The human-facing summary posted to the spec pull request.
//!
//! The templates lay markup out over many lines with `<BR>` standing in for
//! hard line breaks; [`collapse_markup`] then drops the layout newlines and
//! turns each `<BR>` into a real one.

use std::sync::LazyLock;

use minijinja::context;
use regex::Regex;
use sdkgen_core::{FailureType, PackageData, SdkAutoStatus};
use serde::Serialize;

use crate::error::Result;
use crate::templates;

/// Messages beyond this many are cut from non-succeeded entries.
pub const MAX_COMMENT_MESSAGES: usize = 60;

static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("tag whitespace pattern is valid"));

/// Everything the comment shows about a finished run.
#[derive(Debug, Clone, Copy)]
pub struct CommentView<'a> {
    pub sdk_name: &'a str,
    pub spec_config_path: Option<&'a str>,
    pub status: SdkAutoStatus,
    pub failure_type: Option<FailureType>,
    /// Run-level lines flagged for the comment.
    pub messages: &'a [String],
    pub packages: &'a [PackageData],
    pub breaking_change_label: &'a str,
    pub is_sdk_config_duplicated: bool,
}

impl CommentView<'_> {
    #[must_use]
    pub fn has_breaking_change(&self) -> bool {
        self.packages.iter().any(|pkg| pkg.has_breaking_change)
    }

    #[must_use]
    pub fn show_lite_install_instruction(&self) -> bool {
        self.packages
            .iter()
            .any(|pkg| pkg.lite_installation_instruction.is_some())
    }

    fn note(&self) -> Option<&'static str> {
        if self.is_sdk_config_duplicated {
            Some(
                "SDK generation is enabled in both tspconfig.yaml and readme.md. \
                 The TypeSpec configuration was used.",
            )
        } else if self.show_lite_install_instruction() {
            Some(
                "Installation instructions are abbreviated. \
                 Refer to the pipeline log for the full instructions.",
            )
        } else {
            None
        }
    }
}

#[must_use]
pub fn status_emoji(status: SdkAutoStatus) -> &'static str {
    match status {
        SdkAutoStatus::Pending => "⌛",
        SdkAutoStatus::Failed => "❌",
        SdkAutoStatus::InProgress => "🔄",
        SdkAutoStatus::Succeeded => "✔️",
        SdkAutoStatus::Warning => "⚠️",
        SdkAutoStatus::NotEnabled => "🚫",
    }
}

#[must_use]
pub fn status_name(status: SdkAutoStatus) -> &'static str {
    match status {
        SdkAutoStatus::Pending => "Pending",
        SdkAutoStatus::InProgress => "In Progress",
        SdkAutoStatus::Succeeded => "Succeeded",
        SdkAutoStatus::Warning => "Warning",
        SdkAutoStatus::Failed => "Failed",
        SdkAutoStatus::NotEnabled => "Not Enabled",
    }
}

/// Lines shown in one preformatted block, oldest first.
#[derive(Debug, Serialize)]
struct MessageBlock<'a> {
    /// Set when older lines were cut.
    limit: Option<usize>,
    lines: Vec<&'a str>,
}

impl<'a> MessageBlock<'a> {
    /// Entries that did not succeed keep only their last
    /// [`MAX_COMMENT_MESSAGES`] lines.
    fn new(messages: &'a [String], status: SdkAutoStatus) -> Self {
        let cut = messages.len() > MAX_COMMENT_MESSAGES && status != SdkAutoStatus::Succeeded;
        let shown = if cut {
            &messages[messages.len() - MAX_COMMENT_MESSAGES..]
        } else {
            messages
        };
        Self {
            limit: cut.then_some(MAX_COMMENT_MESSAGES),
            lines: trimmed(shown),
        }
    }

    fn non_empty(messages: &'a [String], status: SdkAutoStatus) -> Option<Self> {
        (!messages.is_empty()).then(|| Self::new(messages, status))
    }
}

#[derive(Debug, Serialize)]
struct SuppressionBlock<'a> {
    title: &'static str,
    lines: Vec<&'a str>,
}

impl<'a> SuppressionBlock<'a> {
    fn present(lines: &'a [String]) -> Self {
        Self {
            title: "Present SDK breaking changes suppressions",
            lines: trimmed(lines),
        }
    }

    fn absent(lines: &'a [String]) -> Self {
        Self {
            title: "Absent SDK breaking changes suppressions",
            lines: trimmed(lines),
        }
    }
}

#[derive(Debug, Serialize)]
struct PackageRow<'a> {
    name: &'a str,
    version: Option<&'a str>,
    status: SdkAutoStatus,
    required_label: Option<&'a str>,
    messages: Option<MessageBlock<'a>>,
    present_suppressions: Option<SuppressionBlock<'a>>,
    absent_suppressions: Option<SuppressionBlock<'a>>,
    instructions: Option<Vec<&'a str>>,
}

impl<'a> PackageRow<'a> {
    fn new(package: &'a PackageData, breaking_change_label: &'a str) -> Self {
        let breaking = package.has_breaking_change;
        let instructions = package
            .lite_installation_instruction
            .as_deref()
            .or(package.installation_instructions.as_deref())
            .map(|text| text.split('\n').collect());
        Self {
            name: &package.name,
            version: package.version.as_deref(),
            status: package.status,
            required_label: package
                .should_label_breaking_change()
                .then_some(breaking_change_label),
            messages: MessageBlock::non_empty(&package.messages, package.status),
            present_suppressions: (breaking && !package.present_suppression_lines.is_empty())
                .then(|| SuppressionBlock::present(&package.present_suppression_lines)),
            absent_suppressions: (breaking && !package.absent_suppression_lines.is_empty())
                .then(|| SuppressionBlock::absent(&package.absent_suppression_lines)),
            instructions,
        }
    }
}

#[derive(Debug, Serialize)]
struct CommentContext<'a> {
    note: Option<&'static str>,
    sdk: &'a str,
    status: SdkAutoStatus,
    spec_config_path: Option<&'a str>,
    failure_type: Option<&'static str>,
    messages: Option<MessageBlock<'a>>,
    packages: Vec<PackageRow<'a>>,
}

/// Renders message lines as a preformatted block.
///
/// # Errors
///
/// Returns an error if the bundled template fails to render.
pub fn render_messages(messages: &[String], status: SdkAutoStatus) -> Result<String> {
    templates::render(
        templates::MESSAGES,
        context! { entry => MessageBlock::new(messages, status) },
    )
}

/// # Errors
///
/// Returns an error if the bundled template fails to render.
pub fn render_present_suppressions(lines: &[String]) -> Result<String> {
    templates::render(
        templates::SUPPRESSIONS,
        context! { entry => SuppressionBlock::present(lines) },
    )
}

/// # Errors
///
/// Returns an error if the bundled template fails to render.
pub fn render_absent_suppressions(lines: &[String]) -> Result<String> {
    templates::render(
        templates::SUPPRESSIONS,
        context! { entry => SuppressionBlock::absent(lines) },
    )
}

/// Renders the full comment body, already collapsed.
///
/// # Errors
///
/// Returns an error if the bundled template fails to render.
pub fn render_comment(view: &CommentView<'_>) -> Result<String> {
    let ctx = CommentContext {
        note: view.note(),
        sdk: sdk_short_name(view.sdk_name),
        status: view.status,
        spec_config_path: view.spec_config_path,
        failure_type: view
            .failure_type
            .filter(|_| view.status.is_failed())
            .map(FailureType::as_str),
        messages: MessageBlock::non_empty(view.messages, view.status),
        packages: view
            .packages
            .iter()
            .map(|package| PackageRow::new(package, view.breaking_change_label))
            .collect(),
    };
    templates::render(templates::COMMENT, &ctx).map(|markup| collapse_markup(&markup))
}

/// Removes layout newlines, whitespace between tags, and expands `<BR>`.
#[must_use]
pub fn collapse_markup(markup: &str) -> String {
    let single_line = markup.replace(['\r', '\n'], "");
    BETWEEN_TAGS
        .replace_all(&single_line, "><")
        .replace("<BR>", "\n")
}

fn trimmed(lines: &[String]) -> Vec<&str> {
    lines.iter().map(|line| line.trim_end()).collect()
}

fn sdk_short_name(sdk_name: &str) -> &str {
    sdk_name.strip_prefix("azure-sdk-for-").unwrap_or(sdk_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkgen_core::{NO_SUPPRESSIONS_DEFINED, NO_SUPPRESSION_FILE};

    fn view<'a>(status: SdkAutoStatus, packages: &'a [PackageData]) -> CommentView<'a> {
        CommentView {
            sdk_name: "azure-sdk-for-python",
            spec_config_path: Some("specification/foo/resource-manager/readme.md"),
            status,
            failure_type: None,
            messages: &[],
            packages,
            breaking_change_label: "BreakingChange",
            is_sdk_config_duplicated: false,
        }
    }

    fn package(name: &str, status: SdkAutoStatus) -> PackageData {
        let mut pkg = PackageData::new(name, format!("sdk/foo/{name}"));
        pkg.status = status;
        pkg
    }

    #[test]
    fn emoji_per_status() {
        assert_eq!(status_emoji(SdkAutoStatus::Pending), "⌛");
        assert_eq!(status_emoji(SdkAutoStatus::Failed), "❌");
        assert_eq!(status_emoji(SdkAutoStatus::InProgress), "🔄");
        assert_eq!(status_emoji(SdkAutoStatus::Succeeded), "✔️");
        assert_eq!(status_emoji(SdkAutoStatus::Warning), "⚠️");
        assert_eq!(status_emoji(SdkAutoStatus::NotEnabled), "🚫");
    }

    #[test]
    fn messages_within_limit_are_all_shown() -> anyhow::Result<()> {
        let messages = vec!["msg1  ".to_string(), "msg2".to_string()];
        assert_eq!(
            render_messages(&messages, SdkAutoStatus::Failed)?,
            "<pre>msg1<BR>msg2</pre>"
        );
        assert_eq!(render_messages(&[], SdkAutoStatus::Failed)?, "<pre></pre>");
        Ok(())
    }

    #[test]
    fn long_failed_message_list_keeps_last_sixty() -> anyhow::Result<()> {
        let messages: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let rendered = render_messages(&messages, SdkAutoStatus::Failed)?;
        assert!(rendered.starts_with("Only showing 60 items here. Refer to log for details.<br><pre>"));
        assert!(rendered.contains("line 40<BR>"));
        assert!(!rendered.contains("line 39<BR>"));
        assert!(rendered.ends_with("line 99</pre>"));
        Ok(())
    }

    #[test]
    fn long_succeeded_message_list_is_not_cut() -> anyhow::Result<()> {
        let messages: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let rendered = render_messages(&messages, SdkAutoStatus::Succeeded)?;
        assert!(!rendered.contains("Only showing"));
        assert!(rendered.contains("line 0<BR>"));
        Ok(())
    }

    #[test]
    fn message_lines_are_escaped() -> anyhow::Result<()> {
        let rendered = render_messages(&["List<String> & co".to_string()], SdkAutoStatus::Failed)?;
        assert_eq!(rendered, "<pre>List&lt;String&gt; &amp; co</pre>");
        Ok(())
    }

    #[test]
    fn collapse_strips_layout_and_expands_breaks() {
        assert_eq!(
            collapse_markup("<div>Hi\n</div> <span>Test</span>"),
            "<div>Hi</div><span>Test</span>"
        );
        assert_eq!(collapse_markup("<div>Line1<BR>Line2</div>"), "<div>Line1\nLine2</div>");
        assert_eq!(collapse_markup("<div> </div> <span> </span>"), "<div></div><span></span>");
    }

    #[test]
    fn comment_has_top_line_and_one_row_per_package() -> anyhow::Result<()> {
        let packages = vec![
            package("azure-foo", SdkAutoStatus::Succeeded),
            package("azure-bar", SdkAutoStatus::Failed),
        ];
        let body = render_comment(&view(SdkAutoStatus::Failed, &packages))?;

        assert!(body.starts_with("<ul><li><code>❌</code><b>python generation Failed</b>"));
        assert_eq!(body.matches("<li>").count(), 3);
        assert!(body.contains("<b>azure-foo</b> Succeeded"));
        assert!(body.contains("<code>❌</code><b>azure-bar</b> Failed"));
        assert!(!body.contains('\n'));
        Ok(())
    }

    #[test]
    fn failure_type_is_named_on_failed_runs() -> anyhow::Result<()> {
        let mut failed = view(SdkAutoStatus::Failed, &[]);
        failed.failure_type = Some(FailureType::CodegenFailed);
        assert!(render_comment(&failed)?.contains("(Code Generator Failed)"));
        Ok(())
    }

    #[test]
    fn unsuppressed_breaking_change_is_labeled_with_blocks() -> anyhow::Result<()> {
        let mut pkg = package("azure-mgmt-foo", SdkAutoStatus::Succeeded);
        pkg.has_breaking_change = true;
        pkg.present_suppression_lines = vec![NO_SUPPRESSIONS_DEFINED.to_string()];
        pkg.absent_suppression_lines = vec!["+\tRemoved Y".to_string()];
        let packages = vec![pkg];

        let body = render_comment(&view(SdkAutoStatus::Succeeded, &packages))?;

        assert!(body.contains("Label <code>BreakingChange</code> is required."));
        assert!(body.contains(
            "<pre><strong>Present SDK breaking changes suppressions</strong>\nThis package has no defined suppressions.</pre>"
        ));
        assert!(body.contains(
            "<pre><strong>Absent SDK breaking changes suppressions</strong>\n+\tRemoved Y</pre>"
        ));
        Ok(())
    }

    #[test]
    fn suppressed_breaking_change_shows_blocks_without_label() -> anyhow::Result<()> {
        let mut pkg = package("azure-mgmt-foo", SdkAutoStatus::Succeeded);
        pkg.has_breaking_change = true;
        pkg.present_suppression_lines = vec!["Removed Y".to_string()];
        let packages = vec![pkg];

        let body = render_comment(&view(SdkAutoStatus::Succeeded, &packages))?;

        assert!(!body.contains("is required"));
        assert!(body.contains("Present SDK breaking changes suppressions</strong>\nRemoved Y"));
        Ok(())
    }

    #[test]
    fn beta_management_sdk_is_not_labeled() -> anyhow::Result<()> {
        let mut pkg = package("azure-mgmt-foo", SdkAutoStatus::Succeeded);
        pkg.has_breaking_change = true;
        pkg.is_beta_mgmt_sdk = true;
        pkg.present_suppression_lines = vec![NO_SUPPRESSION_FILE.to_string()];
        let packages = vec![pkg];

        let body = render_comment(&view(SdkAutoStatus::Succeeded, &packages))?;

        assert!(!body.contains("is required"));
        Ok(())
    }

    #[test]
    fn note_block_precedes_the_list() -> anyhow::Result<()> {
        let mut duplicated = view(SdkAutoStatus::Succeeded, &[]);
        duplicated.is_sdk_config_duplicated = true;
        let body = render_comment(&duplicated)?;
        assert!(body.starts_with("> [!NOTE]\n> SDK generation is enabled in both"));
        assert!(body.contains("\n\n<ul>"));
        Ok(())
    }

    #[test]
    fn lite_instruction_replaces_full_one() -> anyhow::Result<()> {
        let mut pkg = package("azure-foo", SdkAutoStatus::Succeeded);
        pkg.installation_instructions = Some("full\ninstructions".to_string());
        pkg.lite_installation_instruction = Some("pip install foo".to_string());
        let packages = vec![pkg];
        let comment_view = view(SdkAutoStatus::Succeeded, &packages);

        let body = render_comment(&comment_view)?;

        assert!(comment_view.show_lite_install_instruction());
        assert!(body.contains("pip install foo"));
        assert!(!body.contains("full\ninstructions"));
        assert!(body.starts_with("> [!NOTE]"));
        Ok(())
    }

    #[test]
    fn instructions_keep_their_line_breaks_and_markup() -> anyhow::Result<()> {
        let mut pkg = package("azure-foo", SdkAutoStatus::Succeeded);
        pkg.installation_instructions = Some("<b>pip</b> install\nazure-foo".to_string());
        let packages = vec![pkg];

        let body = render_comment(&view(SdkAutoStatus::Succeeded, &packages))?;

        assert!(body.contains(
            "<details><summary>Installation Instructions</summary><b>pip</b> install\nazure-foo</details>"
        ));
        Ok(())
    }

    #[test]
    fn package_names_are_escaped() -> anyhow::Result<()> {
        let packages = vec![package("azure<foo>", SdkAutoStatus::Succeeded)];

        let body = render_comment(&view(SdkAutoStatus::Succeeded, &packages))?;

        assert!(body.contains("<b>azure&lt;foo&gt;</b> Succeeded"));
        Ok(())
    }

    #[test]
    fn run_messages_follow_the_top_line() -> anyhow::Result<()> {
        let messages = vec!["generate script exited with 1".to_string()];
        let mut failed = view(SdkAutoStatus::Failed, &[]);
        failed.messages = &messages;

        let body = render_comment(&failed)?;

        assert!(body.contains("Failed</b>"));
        assert!(body.ends_with("<pre>generate script exited with 1</pre></li></ul>"));
        Ok(())
    }

    #[test]
    fn suppression_block_renders_on_its_own() -> anyhow::Result<()> {
        let lines = vec!["Removed Y  ".to_string(), "Removed Z".to_string()];
        assert_eq!(
            render_present_suppressions(&lines)?,
            "<pre><strong>Present SDK breaking changes suppressions</strong><BR>Removed Y<BR>Removed Z</pre>"
        );
        assert!(render_absent_suppressions(&lines)?.starts_with("<pre><strong>Absent"));
        Ok(())
    }
}
