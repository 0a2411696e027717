//! PEP 440 version type.
//!
//! Provides a `Version` that parses the permissive PEP 440 grammar used by
//! Python packaging tools and implements the standard total ordering
//! (epoch, zero-padded release, then dev < pre < final < post).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{FeuError, FeuResult};

/// Normalized Python package version (`[N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]`)
#[derive(Debug, Clone)]
pub struct Version {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreRelease, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    /// Local label, kept for display only
    pub local: Option<String>,
}

/// Pre-release phase, ordered alpha < beta < rc
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha, // a, alpha
    Beta,  // b, beta
    Rc,    // rc, c, pre, preview
}

impl PreRelease {
    fn as_str(&self) -> &'static str {
        match self {
            PreRelease::Alpha => "a",
            PreRelease::Beta => "b",
            PreRelease::Rc => "rc",
        }
    }
}

impl Version {
    /// Create a final release from its release segments
    pub fn new(release: Vec<u64>) -> Self {
        Self {
            epoch: 0,
            release,
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn with_pre(mut self, phase: PreRelease, number: u64) -> Self {
        self.pre = Some((phase, number));
        self
    }

    pub fn with_post(mut self, number: u64) -> Self {
        self.post = Some(number);
        self
    }

    pub fn with_dev(mut self, number: u64) -> Self {
        self.dev = Some(number);
        self
    }

    pub fn with_local(mut self, local: impl Into<String>) -> Self {
        self.local = Some(local.into());
        self
    }

    /// First release segment
    pub fn major(&self) -> u64 {
        self.segment(0)
    }

    /// Second release segment (0 when absent)
    pub fn minor(&self) -> u64 {
        self.segment(1)
    }

    /// Third release segment (0 when absent)
    pub fn micro(&self) -> u64 {
        self.segment(2)
    }

    fn segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    /// Check if this is a pre-release (alpha/beta/rc or dev)
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    pub fn is_devrelease(&self) -> bool {
        self.dev.is_some()
    }

    /// Check if this is a final release without pre, post or dev tags
    pub fn is_stable(&self) -> bool {
        self.pre.is_none() && self.post.is_none() && self.dev.is_none()
    }

    /// Render only the epoch and release segments, e.g. `1!2.0.1`
    pub fn base_version(&self) -> String {
        let mut out = String::new();
        if self.epoch != 0 {
            out.push_str(&format!("{}!", self.epoch));
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        out.push_str(&release.join("."));
        out
    }

    /// Check whether the release segments start with `prefix` (zero-padded)
    pub fn release_starts_with(&self, prefix: &[u64]) -> bool {
        prefix
            .iter()
            .enumerate()
            .all(|(index, segment)| self.segment(index) == *segment)
    }

    /// Key for the suffix part of the ordering.
    ///
    /// A dev-only release sorts below every pre-release, a missing dev number
    /// sorts above any dev number and a missing post number below any post.
    fn suffix_key(&self) -> (u8, u64, Option<u64>, (u8, u64)) {
        let dev = Self::dev_key(self.dev);
        match (self.pre, self.post) {
            (None, None) if self.dev.is_some() => (0, 0, None, dev),
            (Some((PreRelease::Alpha, n)), post) => (1, n, post, dev),
            (Some((PreRelease::Beta, n)), post) => (2, n, post, dev),
            (Some((PreRelease::Rc, n)), post) => (3, n, post, dev),
            (None, None) => (4, 0, None, dev),
            (None, Some(post)) => (5, 0, Some(post), dev),
        }
    }

    /// Dev releases form their own tier below "no dev release"
    fn dev_key(dev: Option<u64>) -> (u8, u64) {
        match dev {
            Some(number) => (0, number),
            None => (1, 0),
        }
    }

    fn cmp_release(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        (0..len)
            .map(|index| self.segment(index).cmp(&other.segment(index)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.cmp_release(other))
            .then_with(|| self.suffix_key().cmp(&other.suffix_key()))
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch.hash(state);
        // Trailing zeros do not change equality, so they must not change the hash
        let significant = self
            .release
            .iter()
            .rposition(|segment| *segment != 0)
            .map_or(0, |last| last + 1);
        self.release[..significant].hash(state);
        self.suffix_key().hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_version())?;

        if let Some((phase, number)) = self.pre {
            write!(f, "{}{}", phase.as_str(), number)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        if let Some(ref local) = self.local {
            write!(f, "+{}", local)?;
        }

        Ok(())
    }
}

impl FromStr for Version {
    type Err = FeuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let input = normalized.strip_prefix('v').unwrap_or(&normalized);

        // Split on '+' for the local label
        let (public, local) = match input.split_once('+') {
            Some((public, local)) => {
                let local = parse_local(local).ok_or_else(|| FeuError::invalid_version(s))?;
                (public, Some(local))
            },
            None => (input, None),
        };

        let mut cursor = Cursor::new(public);
        parse_public(&mut cursor, local).ok_or_else(|| FeuError::invalid_version(s))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a version string, mapping failures to `FeuError::InvalidVersion`
pub fn parse_version(input: &str) -> FeuResult<Version> {
    input.parse()
}

/// Parse everything left of the local label; `None` on any grammar violation
fn parse_public(cursor: &mut Cursor<'_>, local: Option<String>) -> Option<Version> {
    let epoch = match cursor.rest().split_once('!') {
        Some((digits, _)) => {
            let epoch = cursor.number()?;
            if cursor.position() != digits.len() || !cursor.eat("!") {
                return None;
            }
            epoch
        },
        None => 0,
    };

    let mut release = vec![cursor.number()?];
    while cursor.peek_separated_number() {
        cursor.eat(".");
        release.push(cursor.number()?);
    }

    let pre = parse_pre(cursor)?;
    let post = parse_post(cursor)?;
    let dev = parse_dev(cursor)?;

    if !cursor.is_empty() {
        return None;
    }

    Some(Version {
        epoch,
        release,
        pre,
        post,
        dev,
        local,
    })
}

/// Optional `[sep]{a|alpha|b|beta|c|rc|pre|preview}[sep][N]`
fn parse_pre(cursor: &mut Cursor<'_>) -> Option<Option<(PreRelease, u64)>> {
    const KEYWORDS: [(&str, PreRelease); 8] = [
        ("alpha", PreRelease::Alpha),
        ("beta", PreRelease::Beta),
        ("preview", PreRelease::Rc),
        ("pre", PreRelease::Rc),
        ("rc", PreRelease::Rc),
        ("a", PreRelease::Alpha),
        ("b", PreRelease::Beta),
        ("c", PreRelease::Rc),
    ];

    let start = cursor.position();
    cursor.eat_separator();
    let Some(phase) = KEYWORDS
        .iter()
        .find(|(keyword, _)| cursor.eat(keyword))
        .map(|(_, phase)| *phase)
    else {
        cursor.reset(start);
        return Some(None);
    };

    Some(Some((phase, parse_trailing_number(cursor)?)))
}

/// Optional `-N` or `[sep]{post|rev|r}[sep][N]`
fn parse_post(cursor: &mut Cursor<'_>) -> Option<Option<u64>> {
    let start = cursor.position();
    if cursor.eat("-") {
        if cursor.peek_digit() {
            return Some(Some(cursor.number()?));
        }
        cursor.reset(start);
    }

    cursor.eat_separator();
    if ["post", "rev", "r"].iter().any(|keyword| cursor.eat(keyword)) {
        return Some(Some(parse_trailing_number(cursor)?));
    }

    cursor.reset(start);
    Some(None)
}

/// Optional `[sep]dev[sep][N]`
fn parse_dev(cursor: &mut Cursor<'_>) -> Option<Option<u64>> {
    let start = cursor.position();
    cursor.eat_separator();
    if cursor.eat("dev") {
        return Some(Some(parse_trailing_number(cursor)?));
    }

    cursor.reset(start);
    Some(None)
}

/// Implicit number after a tag keyword; 0 when absent
fn parse_trailing_number(cursor: &mut Cursor<'_>) -> Option<u64> {
    let start = cursor.position();
    cursor.eat_separator();
    if cursor.peek_digit() {
        return cursor.number();
    }
    cursor.reset(start);
    Some(0)
}

fn parse_local(local: &str) -> Option<String> {
    let segments: Vec<&str> = local.split(['.', '-', '_']).collect();
    let valid = segments
        .iter()
        .all(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric()));
    valid.then(|| segments.join("."))
}

/// Byte cursor over an ASCII version string
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn eat_separator(&mut self) -> bool {
        self.eat(".") || self.eat("-") || self.eat("_")
    }

    fn peek_digit(&self) -> bool {
        self.rest().starts_with(|c: char| c.is_ascii_digit())
    }

    /// `.` followed by a digit continues the release segments
    fn peek_separated_number(&self) -> bool {
        let rest = self.rest().as_bytes();
        rest.len() >= 2 && rest[0] == b'.' && rest[1].is_ascii_digit()
    }

    fn number(&mut self) -> Option<u64> {
        let digits = self
            .rest()
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest().len());
        if digits == 0 {
            return None;
        }
        let value = self.rest()[..digits].parse().ok()?;
        self.pos += digits;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(input: &str) -> Version {
        Version::from_str(input).unwrap()
    }

    #[test]
    fn test_version_parsing() {
        let version = v("1.2.3");
        assert_eq!(version.epoch, 0);
        assert_eq!(version.release, vec![1, 2, 3]);
        assert_eq!(version.pre, None);
        assert_eq!(version.post, None);
        assert_eq!(version.dev, None);
        assert_eq!(version.local, None);
    }

    #[test]
    fn test_version_with_all_parts() {
        let version = v("2!1.0rc2.post3.dev4+ubuntu-1");
        assert_eq!(version.epoch, 2);
        assert_eq!(version.release, vec![1, 0]);
        assert_eq!(version.pre, Some((PreRelease::Rc, 2)));
        assert_eq!(version.post, Some(3));
        assert_eq!(version.dev, Some(4));
        assert_eq!(version.local, Some("ubuntu.1".to_string()));
        assert_eq!(version.to_string(), "2!1.0rc2.post3.dev4+ubuntu.1");
    }

    #[test]
    fn test_permissive_spellings() {
        assert_eq!(v("1.0-alpha.1").to_string(), "1.0a1");
        assert_eq!(v("1.0.BETA").to_string(), "1.0b0");
        assert_eq!(v("1.0c3").to_string(), "1.0rc3");
        assert_eq!(v("1.0preview2").to_string(), "1.0rc2");
        assert_eq!(v("1.0-1").to_string(), "1.0.post1");
        assert_eq!(v("1.0.rev4").to_string(), "1.0.post4");
        assert_eq!(v("1.0.post").to_string(), "1.0.post0");
        assert_eq!(v("1.0.dev").to_string(), "1.0.dev0");
        assert_eq!(v("v1.0.0").to_string(), "1.0.0");
        assert_eq!(v("  2024.07 ").to_string(), "2024.7");
    }

    #[test]
    fn test_invalid_versions() {
        for input in ["", "not-a-version", "abc", "!!", "1.", "1..0", "1.0+", "1.0+a..b", "1.0foo"] {
            let err = Version::from_str(input).unwrap_err();
            assert!(
                matches!(err, FeuError::InvalidVersion { .. }),
                "expected InvalidVersion for {input:?}"
            );
        }
    }

    #[test]
    fn test_zero_padding_equality() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
        assert_ne!(v("1.0.1"), v("1.0"));
    }

    #[test]
    fn test_local_is_ignored_for_ordering() {
        assert_eq!(v("1.0+abc"), v("1.0"));
        assert_eq!(v("1.0+abc").cmp(&v("1.0+xyz")), Ordering::Equal);
    }

    #[test]
    fn test_release_phase_ordering() {
        let ordered = [
            "1.0.dev0",
            "1.0a1.dev1",
            "1.0a1",
            "1.0a2",
            "1.0b1",
            "1.0rc1",
            "1.0",
            "1.0.post1.dev0",
            "1.0.post1",
            "1.0.1",
            "1!0.1",
        ];
        for pair in ordered.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_largest_dev_number_still_sorts_first() {
        let max = u64::MAX;
        assert!(v(&format!("1.0a1.dev{}", max)) < v("1.0a1"));
        assert_ne!(v(&format!("1.0a1.dev{}", max)), v("1.0a1"));
        assert!(v(&format!("1.0.post1.dev{}", max)) < v("1.0.post1"));
        assert!(v(&format!("1.0.dev{}", max)) < v("1.0a0"));
    }

    #[test]
    fn test_epoch_dominates() {
        assert!(v("1!0.1") > v("2.0"));
        assert!(v("2!0.1.0") > v("1!1.0.0"));
    }

    #[test]
    fn test_base_version() {
        assert_eq!(v("1.23.2rc1.post2.dev3+local").base_version(), "1.23.2");
        assert_eq!(v("3!2.0").base_version(), "3!2.0");
    }

    #[test]
    fn test_release_accessors() {
        let version = v("3");
        assert_eq!((version.major(), version.minor(), version.micro()), (3, 0, 0));
        assert!(v("1.0a1").is_prerelease());
        assert!(v("1.0.dev1").is_prerelease());
        assert!(v("1.0.dev1").is_devrelease());
        assert!(v("1.0.post1").is_postrelease());
        assert!(!v("1.0.post1").is_stable());
        assert!(v("2024.07").is_stable());
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        use std::collections::HashSet;

        let set: HashSet<Version> = ["1.0", "1.0.0", "1.0+local", "1.0.0.0"].iter().map(|s| v(s)).collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_serde_as_string() {
        let version = v("1.0rc1");
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"1.0rc1\"");

        let parsed: Version = serde_json::from_str("\"2.0.post1\"").unwrap();
        assert_eq!(parsed, Version::new(vec![2, 0]).with_post(1));
        assert!(serde_json::from_str::<Version>("\"nope\"").is_err());
    }
}
