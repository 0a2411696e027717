//! Version specifiers such as `<2.0.0`, `==1.2.*` or `~=2.2`.

use std::fmt;
use std::str::FromStr;

use super::Version;
use crate::error::FeuError;

/// Comparison operator for version specifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,        // ==1.0.0
    NotEqual,     // !=1.0.0
    Less,         // <1.0.0
    LessEqual,    // <=1.0.0
    Greater,      // >1.0.0
    GreaterEqual, // >=1.0.0
    Compatible,   // ~=1.0
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Compatible => "~=",
        }
    }

    /// Evaluate `left <op> right` with plain version ordering
    pub fn compare(&self, left: &Version, right: &Version) -> bool {
        match self {
            Operator::Equal => left == right,
            Operator::NotEqual => left != right,
            Operator::Less => left < right,
            Operator::LessEqual => left <= right,
            Operator::Greater => left > right,
            Operator::GreaterEqual => left >= right,
            Operator::Compatible => {
                let prefix_len = right.release.len().saturating_sub(1).max(1);
                left >= right && left.release_starts_with(&right.release[..prefix_len])
            },
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = FeuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" => Ok(Operator::Equal),
            "!=" => Ok(Operator::NotEqual),
            "<" => Ok(Operator::Less),
            "<=" => Ok(Operator::LessEqual),
            ">" => Ok(Operator::Greater),
            ">=" => Ok(Operator::GreaterEqual),
            "~=" => Ok(Operator::Compatible),
            other => Err(FeuError::InvalidSpecifier {
                input: other.to_string(),
            }),
        }
    }
}

/// A single version specifier (operator + version)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionSpecifier {
    pub operator: Operator,
    pub version: Version,
    /// `==X.*` / `!=X.*` prefix match
    pub wildcard: bool,
}

impl VersionSpecifier {
    pub fn new(operator: Operator, version: Version) -> Self {
        Self {
            operator,
            version,
            wildcard: false,
        }
    }

    /// Check if a version satisfies this specifier
    pub fn contains(&self, version: &Version) -> bool {
        if self.wildcard {
            let matches_prefix =
                version.epoch == self.version.epoch && version.release_starts_with(&self.version.release);
            return match self.operator {
                Operator::NotEqual => !matches_prefix,
                _ => matches_prefix,
            };
        }
        self.operator.compare(version, &self.version)
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)?;
        if self.wildcard {
            write!(f, ".*")?;
        }
        Ok(())
    }
}

impl FromStr for VersionSpecifier {
    type Err = FeuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || FeuError::InvalidSpecifier {
            input: s.to_string(),
        };

        // Two-character operators must be tried before their one-character prefixes
        let split = ["~=", "==", "!=", "<=", ">=", "<", ">"]
            .iter()
            .find_map(|op| input.strip_prefix(op).map(|rest| (*op, rest)))
            .ok_or_else(invalid)?;
        let operator: Operator = split.0.parse()?;
        let raw_version = split.1.trim();

        let (raw_version, wildcard) = match raw_version.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (raw_version, false),
        };
        if wildcard && !matches!(operator, Operator::Equal | Operator::NotEqual) {
            return Err(invalid());
        }

        let version: Version = raw_version.parse().map_err(|_| invalid())?;
        if operator == Operator::Compatible && version.release.len() < 2 {
            return Err(invalid());
        }

        Ok(Self {
            operator,
            version,
            wildcard,
        })
    }
}
