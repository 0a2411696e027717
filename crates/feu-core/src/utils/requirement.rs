//! Helpers for `name[extra1,extra2]` requirement strings.

use once_cell::sync::Lazy;
use regex::Regex;

static PACKAGE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\-\.]+").unwrap());

static PACKAGE_EXTRAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\-\.]+\[([^\]]*)\]").unwrap());

/// Extract the base package name from a requirement string.
///
/// `requests[security]==2.32.0` gives `requests`. Returns `None` when the
/// string does not start with a valid name character.
pub fn extract_package_name(requirement: &str) -> Option<String> {
    PACKAGE_NAME
        .find(requirement.trim())
        .map(|name| name.as_str().to_string())
}

/// Extract the extras listed in square brackets after the package name
pub fn extract_package_extras(requirement: &str) -> Vec<String> {
    PACKAGE_EXTRAS
        .captures(requirement.trim())
        .and_then(|captures| captures.get(1))
        .map(|extras| {
            extras
                .as_str()
                .split(',')
                .map(str::trim)
                .filter(|extra| !extra.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Render extras as `[a,b]`, or an empty string when there are none
pub fn generate_extras_string<S: AsRef<str>>(extras: &[S]) -> String {
    if extras.is_empty() {
        return String::new();
    }
    let joined: Vec<&str> = extras.iter().map(AsRef::as_ref).collect();
    format!("[{}]", joined.join(","))
}
