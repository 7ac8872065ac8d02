//! Revision markers and backend identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::TypeError;

/// Opaque, comparable revision marker.
///
/// [`RevisionNumber::NULL`] means "no prior revision" and is what an added
/// file carries as its base revision.
///
/// Serialized as `null`, a number, or a string. Strings are read back through
/// [`FromStr`], so `"5"` is `Numeric(5)` and `"NULL"` is the null revision
/// whether the value comes from JSON or from `parse`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "Option<RevisionRepr>")]
pub enum RevisionNumber {
    #[default]
    Null,
    Numeric(u64),
    Text(String),
}

impl RevisionNumber {
    /// The distinguished "no revision" marker.
    pub const NULL: RevisionNumber = RevisionNumber::Null;

    /// Returns `true` for [`RevisionNumber::NULL`].
    pub fn is_null(&self) -> bool {
        matches!(self, RevisionNumber::Null)
    }
}

impl fmt::Display for RevisionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionNumber::Null => f.write_str("NULL"),
            RevisionNumber::Numeric(n) => write!(f, "{n}"),
            RevisionNumber::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RevisionNumber {
    type Err = TypeError;

    /// Never fails: empty or `NULL` is the null revision, digits are numeric,
    /// anything else is kept as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_revision(s))
    }
}

fn parse_revision(s: &str) -> RevisionNumber {
    let s = s.trim();
    if s.is_empty() || s == "NULL" {
        return RevisionNumber::Null;
    }
    match s.parse::<u64>() {
        Ok(n) => RevisionNumber::Numeric(n),
        Err(_) => RevisionNumber::Text(s.to_string()),
    }
}

/// Wire form accepted when deserializing a [`RevisionNumber`].
#[derive(Deserialize)]
#[serde(untagged)]
enum RevisionRepr {
    Number(u64),
    Text(String),
}

impl From<Option<RevisionRepr>> for RevisionNumber {
    fn from(repr: Option<RevisionRepr>) -> Self {
        match repr {
            None => RevisionNumber::Null,
            Some(RevisionRepr::Number(n)) => RevisionNumber::Numeric(n),
            Some(RevisionRepr::Text(s)) => parse_revision(&s),
        }
    }
}

impl Serialize for RevisionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RevisionNumber::Null => serializer.serialize_none(),
            RevisionNumber::Numeric(n) => serializer.serialize_u64(*n),
            RevisionNumber::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<u64> for RevisionNumber {
    fn from(n: u64) -> Self {
        RevisionNumber::Numeric(n)
    }
}

impl From<&str> for RevisionNumber {
    fn from(s: &str) -> Self {
        parse_revision(s)
    }
}

/// Identifier of the version-control backend that produced a change.
///
/// Only compared for equality by the index.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VcsKey(String);

impl VcsKey {
    /// Create a key from a non-empty backend name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TypeError::InvalidVcsKey(name));
        }
        Ok(Self(name))
    }

    /// The backend name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VcsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VcsKey({})", self.0)
    }
}

impl fmt::Display for VcsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VcsKey {
    type Error = TypeError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl From<VcsKey> for String {
    fn from(key: VcsKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_default() {
        assert!(RevisionNumber::default().is_null());
        assert!(RevisionNumber::NULL.is_null());
        assert!(!RevisionNumber::from(5u64).is_null());
    }

    #[test]
    fn parse_revision_forms() {
        assert_eq!("".parse::<RevisionNumber>().unwrap(), RevisionNumber::NULL);
        assert_eq!("NULL".parse::<RevisionNumber>().unwrap(), RevisionNumber::NULL);
        assert_eq!("42".parse::<RevisionNumber>().unwrap(), RevisionNumber::Numeric(42));
        assert_eq!(
            "a1b2c3".parse::<RevisionNumber>().unwrap(),
            RevisionNumber::Text("a1b2c3".into())
        );
    }

    #[test]
    fn null_sorts_first() {
        assert!(RevisionNumber::NULL < RevisionNumber::from(0u64));
        assert!(RevisionNumber::from(5u64) < RevisionNumber::from(7u64));
    }

    #[test]
    fn display_revision() {
        assert_eq!(RevisionNumber::NULL.to_string(), "NULL");
        assert_eq!(RevisionNumber::from(7u64).to_string(), "7");
    }

    #[test]
    fn revision_serde_forms() {
        assert_eq!(serde_json::to_string(&RevisionNumber::from(7u64)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&RevisionNumber::NULL).unwrap(), "null");
        let parsed: RevisionNumber = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(parsed, RevisionNumber::Text("abc".into()));
        let parsed: RevisionNumber = serde_json::from_str("null").unwrap();
        assert!(parsed.is_null());
    }

    #[test]
    fn json_strings_read_like_parse() {
        for text in ["5", "NULL", "", " 42 ", "a1b2c3"] {
            let json = serde_json::to_string(text).unwrap();
            let from_json: RevisionNumber = serde_json::from_str(&json).unwrap();
            let parsed: RevisionNumber = text.parse().unwrap();
            assert_eq!(from_json, parsed, "input {text:?}");
        }
        let null: RevisionNumber = serde_json::from_str("\"NULL\"").unwrap();
        assert!(null.is_null());
    }

    #[test]
    fn serialized_revision_reads_back_equal() {
        for rev in [
            RevisionNumber::NULL,
            RevisionNumber::from(5u64),
            "a1b2c3".parse::<RevisionNumber>().unwrap(),
        ] {
            let json = serde_json::to_string(&rev).unwrap();
            let back: RevisionNumber = serde_json::from_str(&json).unwrap();
            assert_eq!(back, rev);
        }
    }

    #[test]
    fn vcs_key_rejects_blank() {
        assert!(VcsKey::new("git").is_ok());
        assert_eq!(VcsKey::new("  "), Err(TypeError::InvalidVcsKey("  ".into())));
        assert!(serde_json::from_str::<VcsKey>("\"\"").is_err());
    }
}
