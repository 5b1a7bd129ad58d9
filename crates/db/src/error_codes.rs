//! Provider error code translation.
//!
//! The hosted store forwards PostgreSQL SQLSTATE codes for constraint
//! violations and uses `PGRST*` codes for its own failures. This is the
//! only module that knows those strings.

use serde::Serialize;

/// What a provider error code means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    UniqueViolation,
    NotNullViolation,
    ForeignKeyViolation,
    CheckViolation,
    UndefinedTable,
    Other,
}

pub const UNIQUE_VIOLATION: &str = "23505";
pub const NOT_NULL_VIOLATION: &str = "23502";
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
pub const CHECK_VIOLATION: &str = "23514";
pub const UNDEFINED_TABLE: &str = "42P01";
/// Schema cache miss: the REST layer does not know the relation.
pub const UNKNOWN_RELATION: &str = "PGRST205";

const TABLE: &[(&str, ConstraintKind)] = &[
    (UNIQUE_VIOLATION, ConstraintKind::UniqueViolation),
    (NOT_NULL_VIOLATION, ConstraintKind::NotNullViolation),
    (FOREIGN_KEY_VIOLATION, ConstraintKind::ForeignKeyViolation),
    (CHECK_VIOLATION, ConstraintKind::CheckViolation),
    (UNDEFINED_TABLE, ConstraintKind::UndefinedTable),
    (UNKNOWN_RELATION, ConstraintKind::UndefinedTable),
];

/// Map a provider code to its [`ConstraintKind`]. Unknown or absent codes
/// are [`ConstraintKind::Other`].
pub fn classify(code: Option<&str>) -> ConstraintKind {
    let Some(code) = code else {
        return ConstraintKind::Other;
    };
    TABLE
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, kind)| *kind)
        .unwrap_or(ConstraintKind::Other)
}
