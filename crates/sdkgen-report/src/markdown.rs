use std::fmt::Write;

use sdkgen_core::PackageData;

/// Per-package summary attached to the pipeline run of a pull request.
#[must_use]
pub fn package_summary(packages: &[PackageData]) -> String {
    let mut output = String::new();
    for pkg in packages {
        let spec_configuration = if pkg.typespec_project.is_empty() {
            pkg.readme_md.join(", ")
        } else {
            pkg.typespec_project.join(", ")
        };
        let _ = writeln!(output, "## Package Name\n{}", pkg.name);
        let _ = writeln!(output, "## Version\n{}", pkg.version.as_deref().unwrap_or(""));
        let _ = writeln!(output, "## Result\n{}", pkg.status);
        let _ = writeln!(output, "## Spec Configuration\n{spec_configuration}");
        let _ = writeln!(output, "## Has Breaking Change\n{}", pkg.has_breaking_change);
        let _ = writeln!(output, "## Is Beta Management SDK\n{}", pkg.is_beta_mgmt_sdk);
        let _ = writeln!(
            output,
            "## Has Suppressions\n{}",
            !pkg.present_suppression_lines.is_empty()
        );
        let _ = writeln!(
            output,
            "## Has Absent Suppressions\n{}\n",
            !pkg.absent_suppression_lines.is_empty()
        );
    }
    output
}
