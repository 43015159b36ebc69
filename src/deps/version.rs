use semver::Version;
use std::cmp::Ordering;

/// First three digit groups of `version`, zero-padded.
///
/// Used when a version is not valid semver, e.g. `"2.0"` or `"1.0.0rc1"`.
pub fn loose_key(version: &str) -> [u64; 3] {
    let mut key = [0u64; 3];
    let groups = version
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .filter_map(|g| g.parse::<u64>().ok());
    for (slot, n) in key.iter_mut().zip(groups) {
        *slot = n;
    }
    key
}

/// Semver order when both sides parse, loose numeric order otherwise.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::parse(a.trim()), Version::parse(b.trim())) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => loose_key(a).cmp(&loose_key(b)),
    }
}

/// True when `current` is ordered strictly before `latest`. Unknown on either
/// side means not outdated.
pub fn is_outdated(current: Option<&str>, latest: Option<&str>) -> bool {
    match (current, latest) {
        (Some(current), Some(latest)) => compare_versions(latest, current) == Ordering::Greater,
        _ => false,
    }
}

pub fn is_prerelease(version: &str) -> bool {
    let lower = version.to_lowercase();
    ["a", "b", "rc", "dev"].iter().any(|tag| lower.contains(tag))
}
