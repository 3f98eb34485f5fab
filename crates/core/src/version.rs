//! Release-tag normalization and version comparison for update checks.

/// A `major.minor.patch` triple; missing or unparseable patch counts as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version3 {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Strip surrounding whitespace and a leading `v`/`V` from a release tag.
///
/// ```
/// use myficdb_core::version::normalize_tag_to_version;
/// assert_eq!(normalize_tag_to_version(Some(" v1.4.0 ")), "1.4.0");
/// assert_eq!(normalize_tag_to_version(None), "");
/// ```
pub fn normalize_tag_to_version(input: Option<&str>) -> String {
    let Some(v) = input.map(str::trim).filter(|v| !v.is_empty()) else {
        return String::new();
    };
    v.strip_prefix(['v', 'V']).unwrap_or(v).to_string()
}

/// Parse `major.minor[.patch][-suffix]`. At least two components are required.
pub fn parse_version3(input: &str) -> Option<Version3> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let core = input.split('-').next().unwrap_or_default();
    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() < 2 {
        return None;
    }

    let major = parts[0].trim().parse().ok()?;
    let minor = parts[1].trim().parse().ok()?;
    let patch = parts
        .get(2)
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(0);

    Some(Version3 {
        major,
        minor,
        patch,
    })
}

/// Whether `latest` is strictly newer than `installed`.
///
/// An unparseable `latest` is never newer; an unparseable `installed`
/// version always is.
pub fn is_newer(latest: &str, installed: &str) -> bool {
    let Some(latest) = parse_version3(latest) else {
        return false;
    };
    match parse_version3(installed) {
        Some(installed) => latest > installed,
        None => true,
    }
}
