use serde::Serialize;

/// A single nucleotide allele.
///
/// Only the four uppercase bases are representable, so a parsed record can never
/// carry a lowercase, ambiguous (`N`) or multi-base allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Parse an allele column value. Exactly one uppercase character is accepted.
    ///
    /// ```
    /// use allele_resolver::Base;
    ///
    /// assert_eq!(Base::parse("G"), Some(Base::G));
    /// assert_eq!(Base::parse("g"), None);
    /// assert_eq!(Base::parse("AT"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.as_bytes() {
            [b] => Self::from_byte(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(self.as_byte())
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_uppercase_bases() {
        for (s, base) in [("A", Base::A), ("C", Base::C), ("G", Base::G), ("T", Base::T)] {
            assert_eq!(Base::parse(s), Some(base));
            assert_eq!(base.to_string(), s);
        }
    }

    #[test]
    fn test_parse_rejects_other_values() {
        for s in ["", "a", "N", "-", "AC", "0", " A"] {
            assert_eq!(Base::parse(s), None, "{s:?} should not parse");
        }
    }

    #[test]
    fn test_from_byte_is_case_sensitive() {
        assert_eq!(Base::from_byte(b'T'), Some(Base::T));
        assert_eq!(Base::from_byte(b't'), None);
    }
}
