use semver::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionKind {
    Stable,
    Beta,
    Unknown,
}

const PRERELEASE_MARKERS: [&str; 7] = ["a", "b", "rc", "alpha", "beta", "dev", "pre"];

/// Classifies a package version string reported by a language toolchain.
///
/// Semver pre-releases and `0.x` versions are beta. Versions semver rejects
/// (for example Python's `11.6.0b3` or a two-part `1.2`) are classified by
/// their leading numeric part and any trailing pre-release marker.
#[must_use]
pub fn classify_version(raw: &str) -> VersionKind {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    if let Ok(version) = Version::parse(trimmed) {
        return if version.pre.is_empty() && version.major > 0 {
            VersionKind::Stable
        } else {
            VersionKind::Beta
        };
    }

    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (numeric, suffix) = trimmed.split_at(split);
    let Some(major) = numeric
        .split('.')
        .next()
        .and_then(|part| part.parse::<u64>().ok())
    else {
        return VersionKind::Unknown;
    };

    let suffix = suffix.trim_start_matches(['-', '.']).to_ascii_lowercase();
    if PRERELEASE_MARKERS
        .iter()
        .any(|marker| suffix.starts_with(marker))
        || major == 0
    {
        VersionKind::Beta
    } else if suffix.is_empty() {
        VersionKind::Stable
    } else {
        VersionKind::Unknown
    }
}
