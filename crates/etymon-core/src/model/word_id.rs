use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

/// Opaque identifier of a lexical entry.
///
/// Ids are owned by the lexicon; the etymology graph only references them.
/// The text form (used by the persistence tree) is the plain decimal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(u32);

impl WordId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for WordId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WordId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_is_decimal() {
        assert_eq!(WordId::new(42).to_string(), "42");
        assert_eq!("42".parse::<WordId>(), Ok(WordId::new(42)));
        assert_eq!(" 7 ".parse::<WordId>(), Ok(WordId::new(7)));
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!("abc".parse::<WordId>().is_err());
        assert!("-1".parse::<WordId>().is_err());
        assert!("".parse::<WordId>().is_err());
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&WordId::new(9)).expect("serialize");
        assert_eq!(json, "9");
    }
}
