use sdkgen_core::{NO_SUPPRESSION_FILE, NO_SUPPRESSIONS_DEFINED};

use crate::document::SuppressionDocument;

const ABSENT_PREFIX: &str = "+\t";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionLines {
    pub present: Vec<String>,
    pub absent: Vec<String>,
}

/// Lists a package's declared suppressions next to its detected breaking changes.
///
/// The two lists are not reconciled: every detected change is reported as
/// absent, and the declared list is reported verbatim whether or not its
/// lines still occur.
#[must_use]
pub fn resolve(
    document: Option<&SuppressionDocument>,
    sdk_name: &str,
    package: &str,
    detected: &[String],
) -> SuppressionLines {
    let absent = detected
        .iter()
        .map(|change| format!("{ABSENT_PREFIX}{change}"))
        .collect();

    let present = match document {
        None => vec![NO_SUPPRESSION_FILE.to_string()],
        Some(document) => match document.entry(sdk_name, package) {
            Some(entry) if !entry.breaking_changes.is_empty() => entry.breaking_changes.clone(),
            _ => vec![NO_SUPPRESSIONS_DEFINED.to_string()],
        },
    };

    SuppressionLines { present, absent }
}
