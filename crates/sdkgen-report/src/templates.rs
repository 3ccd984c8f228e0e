//! Bundled templates for the pull request comment and the HTML page.
//!
//! Every template is HTML auto-escaped. Values that already hold markup are
//! passed through with `|safe`.

use std::sync::LazyLock;

use minijinja::{AutoEscape, Environment, Error, ErrorKind};
use sdkgen_core::SdkAutoStatus;
use serde::Serialize;

use crate::comment::{status_emoji, status_name};
use crate::error::{ReportError, Result};

pub(crate) const COMMENT: &str = "comment.html";
pub(crate) const MESSAGES: &str = "messages.html";
pub(crate) const SUPPRESSIONS: &str = "suppressions.html";
pub(crate) const PAGE: &str = "page.html";

static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("status_emoji", emoji_filter);
    env.add_filter("status_name", name_filter);
    for (name, source) in [
        (COMMENT, include_str!("../templates/comment.html")),
        (MESSAGES, include_str!("../templates/messages.html")),
        (SUPPRESSIONS, include_str!("../templates/suppressions.html")),
        (PAGE, include_str!("../templates/page.html")),
    ] {
        env.add_template(name, source).expect("bundled template is valid");
    }
    env
});

fn emoji_filter(status: &str) -> std::result::Result<String, Error> {
    parse_status(status).map(|status| status_emoji(status).to_string())
}

fn name_filter(status: &str) -> std::result::Result<String, Error> {
    parse_status(status).map(|status| status_name(status).to_string())
}

fn parse_status(status: &str) -> std::result::Result<SdkAutoStatus, Error> {
    status
        .parse::<SdkAutoStatus>()
        .map_err(|err| Error::new(ErrorKind::InvalidOperation, "not a status").with_source(err))
}

/// Renders one of the bundled templates.
pub(crate) fn render<S: Serialize>(template: &'static str, ctx: S) -> Result<String> {
    TEMPLATES
        .get_template(template)
        .and_then(|tmpl| tmpl.render(ctx))
        .map_err(|source| ReportError::Render { template, source })
}
