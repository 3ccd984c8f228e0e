mod comment;
mod error;
mod execution;
mod filtered;
mod html;
mod markdown;
mod templates;
pub mod vso;

pub use comment::{
    CommentView, MAX_COMMENT_MESSAGES, collapse_markup, render_absent_suppressions,
    render_comment, render_messages, render_present_suppressions, status_emoji, status_name,
};
pub use error::{ReportError, Result};
pub use execution::{EXECUTION_REPORT_FILE, ExecutionReport, PackageReport, generated_from_typespec};
pub use filtered::{MessageLevel, MessageMode, MessageRecord, MessageType};
pub use html::{page_title, render_html};
pub use markdown::package_summary;
