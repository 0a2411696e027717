//! Filtering and sorting helpers over lists of version strings.
//!
//! All helpers return the original strings (not re-rendered versions) so
//! that callers can pass the output straight to an installer.

use indexmap::IndexSet;
use std::collections::BTreeMap;

use crate::error::{FeuError, FeuResult};
use crate::types::Version;

fn parse_all<S: AsRef<str>>(versions: &[S]) -> FeuResult<Vec<(Version, &str)>> {
    versions
        .iter()
        .map(|raw| {
            let raw = raw.as_ref();
            raw.parse().map(|version| (version, raw))
        })
        .collect()
}

fn check_positive(n: usize) -> FeuResult<()> {
    if n == 0 {
        return Err(FeuError::InvalidArgument {
            message: format!("n must be >= 1 but receive {}", n),
        });
    }
    Ok(())
}

/// Sort versions in ascending order (descending when `reverse`)
pub fn sort_versions<S: AsRef<str>>(versions: &[S], reverse: bool) -> FeuResult<Vec<String>> {
    let mut parsed = parse_all(versions)?;
    parsed.sort_by(|a, b| a.0.cmp(&b.0));
    if reverse {
        parsed.reverse();
    }
    Ok(parsed.into_iter().map(|(_, raw)| raw.to_string()).collect())
}

/// Return the highest version of a non-empty list
pub fn latest_version<S: AsRef<str>>(versions: &[S]) -> FeuResult<String> {
    parse_all(versions)?
        .into_iter()
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, raw)| raw.to_string())
        .ok_or_else(|| FeuError::InvalidArgument {
            message: "versions list must not be empty".to_string(),
        })
}

/// Remove duplicate strings, keeping the first occurrence
pub fn unique_versions<S: AsRef<str>>(versions: &[S]) -> Vec<String> {
    versions
        .iter()
        .map(|raw| raw.as_ref().to_string())
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Keep only the strings that parse as versions
pub fn filter_valid_versions<S: AsRef<str>>(versions: &[S]) -> Vec<String> {
    versions
        .iter()
        .map(AsRef::as_ref)
        .filter(|raw| raw.parse::<Version>().is_ok())
        .map(str::to_string)
        .collect()
}

/// Keep final releases (no pre, post or dev tag)
pub fn filter_stable_versions<S: AsRef<str>>(versions: &[S]) -> FeuResult<Vec<String>> {
    Ok(parse_all(versions)?
        .into_iter()
        .filter(|(version, _)| version.is_stable())
        .map(|(_, raw)| raw.to_string())
        .collect())
}

/// Keep versions in `[lower, upper)`; a missing bound is unbounded
pub fn filter_range_versions<S: AsRef<str>>(
    versions: &[S],
    lower: Option<&str>,
    upper: Option<&str>,
) -> FeuResult<Vec<String>> {
    let lower = lower.map(str::parse::<Version>).transpose()?;
    let upper = upper.map(str::parse::<Version>).transpose()?;

    Ok(parse_all(versions)?
        .into_iter()
        .filter(|(version, _)| lower.as_ref().map_or(true, |lower| version >= lower))
        .filter(|(version, _)| upper.as_ref().map_or(true, |upper| version < upper))
        .map(|(_, raw)| raw.to_string())
        .collect())
}

/// Keep every `n`-th entry starting with the first one
pub fn filter_every_n_versions<S: AsRef<str>>(versions: &[S], n: usize) -> FeuResult<Vec<String>> {
    check_positive(n)?;
    Ok(versions
        .iter()
        .step_by(n)
        .map(|raw| raw.as_ref().to_string())
        .collect())
}

/// Keep the last `n` entries
pub fn filter_last_n_versions<S: AsRef<str>>(versions: &[S], n: usize) -> FeuResult<Vec<String>> {
    check_positive(n)?;
    let start = versions.len().saturating_sub(n);
    Ok(versions[start..]
        .iter()
        .map(|raw| raw.as_ref().to_string())
        .collect())
}

/// Highest version for each major release, in ascending order
pub fn latest_major_versions<S: AsRef<str>>(versions: &[S]) -> FeuResult<Vec<String>> {
    latest_per_group(versions, |version| (version.major(), 0))
}

/// Highest version for each `major.minor` release, in ascending order
pub fn latest_minor_versions<S: AsRef<str>>(versions: &[S]) -> FeuResult<Vec<String>> {
    latest_per_group(versions, |version| (version.major(), version.minor()))
}

fn latest_per_group<S, F>(versions: &[S], key: F) -> FeuResult<Vec<String>>
where
    S: AsRef<str>,
    F: Fn(&Version) -> (u64, u64),
{
    let mut groups: BTreeMap<(u64, u64), (Version, &str)> = BTreeMap::new();
    for (version, raw) in parse_all(versions)? {
        let group = key(&version);
        let newer = groups
            .get(&group)
            .map_or(true, |(current, _)| *current < version);
        if newer {
            groups.insert(group, (version, raw));
        }
    }

    let mut latest: Vec<(Version, &str)> = groups.into_values().collect();
    latest.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(latest.into_iter().map(|(_, raw)| raw.to_string()).collect())
}
