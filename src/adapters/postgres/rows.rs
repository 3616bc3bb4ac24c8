//! Shared row-mapping helpers.

use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Parses a text column into a domain enum or id, reporting corrupt rows as
/// database errors.
pub(super) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = ValidationError>,
{
    value.parse().map_err(|e: ValidationError| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value '{}': {}", column, value, e),
        )
    })
}

pub(super) fn parse_optional<T>(column: &str, value: Option<&str>) -> Result<Option<T>, DomainError>
where
    T: FromStr<Err = ValidationError>,
{
    value.map(|v| parse_column(column, v)).transpose()
}

pub(super) fn to_u32(column: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Negative {} value {}", column, value),
        )
    })
}

/// Converts for an INTEGER column; values beyond `i32::MAX` are rejected.
pub(super) fn to_i32(column: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| DomainError::validation(column, "value too large"))
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventStatus;

    #[test]
    fn known_values_parse() {
        let status: EventStatus = parse_column("status", "published").unwrap();
        assert_eq!(status, EventStatus::Published);
    }

    #[test]
    fn corrupt_values_are_database_errors() {
        let err = parse_column::<EventStatus>("status", "archived").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("archived"));
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert!(to_u32("placement", -1).is_err());
        assert_eq!(to_u32("placement", 3).unwrap(), 3);
    }
}
