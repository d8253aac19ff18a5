//! Human-readable unique codes of the form `PREFIX-MMRRR`
//!
//! `PREFIX` is fixed per [`EntityKind`], `MM` is the two-digit month the code
//! was issued in and `RRR` is three random decimal digits. Uniqueness is not
//! a property of the format; the backend checks candidates against the store.

use rand::Rng;
use thiserror::Error;

use crate::types::EntityKind;

/// Number of distinct random suffixes per prefix and month
pub const CODE_SPACE_PER_MONTH: u16 = 1000;

/// A code split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueCode {
    pub kind: EntityKind,
    pub month: u32,
    pub serial: u16,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeFormatError {
    #[error("code must contain a '-' separator")]
    MissingSeparator,

    #[error("unknown code prefix: {0}")]
    UnknownPrefix(String),

    #[error("code suffix must be exactly five digits")]
    InvalidSuffix,

    #[error("month {0} is out of range")]
    MonthOutOfRange(u32),
}

impl UniqueCode {
    pub fn new(kind: EntityKind, month: u32, serial: u16) -> Self {
        Self {
            kind,
            month,
            serial: serial % CODE_SPACE_PER_MONTH,
        }
    }

    /// Parse and validate a code string
    pub fn parse(code: &str) -> Result<Self, CodeFormatError> {
        let (prefix, suffix) = code
            .split_once('-')
            .ok_or(CodeFormatError::MissingSeparator)?;

        let kind = EntityKind::from_prefix(prefix)
            .ok_or_else(|| CodeFormatError::UnknownPrefix(prefix.to_string()))?;

        if suffix.len() != 5 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodeFormatError::InvalidSuffix);
        }

        let month: u32 = suffix[..2]
            .parse()
            .map_err(|_| CodeFormatError::InvalidSuffix)?;
        if !(1..=12).contains(&month) {
            return Err(CodeFormatError::MonthOutOfRange(month));
        }
        let serial: u16 = suffix[2..]
            .parse()
            .map_err(|_| CodeFormatError::InvalidSuffix)?;

        Ok(Self { kind, month, serial })
    }
}

impl std::fmt::Display for UniqueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}{:03}", self.kind.prefix(), self.month, self.serial)
    }
}

/// Draw a random candidate code for `kind` issued in `month` (1-12)
pub fn candidate_code<R: Rng + ?Sized>(kind: EntityKind, month: u32, rng: &mut R) -> String {
    let serial = rng.gen_range(0..CODE_SPACE_PER_MONTH);
    UniqueCode::new(kind, month, serial).to_string()
}

/// Check whether `code` is a well-formed code for `kind`
pub fn is_valid_code_for(kind: EntityKind, code: &str) -> bool {
    matches!(UniqueCode::parse(code), Ok(parsed) if parsed.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn formats_with_zero_padding() {
        let code = UniqueCode::new(EntityKind::Vendor, 3, 7);
        assert_eq!(code.to_string(), "VND-03007");

        let code = UniqueCode::new(EntityKind::Department, 12, 999);
        assert_eq!(code.to_string(), "DEPT-12999");
    }

    #[test]
    fn parses_known_codes() {
        let parsed = UniqueCode::parse("PRD-07042").unwrap();
        assert_eq!(parsed.kind, EntityKind::Product);
        assert_eq!(parsed.month, 7);
        assert_eq!(parsed.serial, 42);
    }

    #[test]
    fn rejects_malformed_codes() {
        assert_eq!(
            UniqueCode::parse("PRD07042"),
            Err(CodeFormatError::MissingSeparator)
        );
        assert_eq!(
            UniqueCode::parse("ABC-07042"),
            Err(CodeFormatError::UnknownPrefix("ABC".to_string()))
        );
        assert_eq!(
            UniqueCode::parse("CAT-0704"),
            Err(CodeFormatError::InvalidSuffix)
        );
        assert_eq!(
            UniqueCode::parse("CAT-07a42"),
            Err(CodeFormatError::InvalidSuffix)
        );
        assert_eq!(
            UniqueCode::parse("STAT-13001"),
            Err(CodeFormatError::MonthOutOfRange(13))
        );
        assert_eq!(
            UniqueCode::parse("STAT-00001"),
            Err(CodeFormatError::MonthOutOfRange(0))
        );
    }

    #[test]
    fn code_must_match_kind() {
        assert!(is_valid_code_for(EntityKind::Category, "CAT-01123"));
        assert!(!is_valid_code_for(EntityKind::Product, "CAT-01123"));
    }

    fn kind_strategy() -> impl Strategy<Value = EntityKind> {
        prop::sample::select(EntityKind::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_candidates_are_well_formed(
            kind in kind_strategy(),
            month in 1u32..=12,
            seed in any::<u64>()
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let code = candidate_code(kind, month, &mut rng);

            let parsed = UniqueCode::parse(&code).unwrap();
            prop_assert_eq!(parsed.kind, kind);
            prop_assert_eq!(parsed.month, month);
            prop_assert!(parsed.serial < CODE_SPACE_PER_MONTH);
            prop_assert_eq!(code.len(), kind.prefix().len() + 6);
        }
    }
}
