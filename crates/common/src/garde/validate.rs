//! Garde validation utilities.

use crate::domain::DomainError;
use garde::{Report, Validate};

/// Field names of a validated type in declaration order.
///
/// Garde reports errors keyed by path, so messages are re-ordered with this
/// list before they reach the caller.
pub trait FieldOrder {
    const FIELDS: &'static [&'static str];
}

/// Validate a request and convert a garde report into `DomainError::ValidationError`
pub fn validate<T>(value: &T) -> Result<(), DomainError>
where
    T: Validate + FieldOrder,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| DomainError::ValidationError(collect_messages::<T>(&report)))
}

/// Collect the message of every failed rule, in field declaration order.
/// Rules failing on the same field keep their reported order.
fn collect_messages<T: FieldOrder>(report: &Report) -> Vec<String> {
    let mut failures: Vec<(usize, String)> = report
        .iter()
        .map(|(path, error)| {
            (
                field_position(T::FIELDS, &path.to_string()),
                error.message().to_string(),
            )
        })
        .collect();

    failures.sort_by_key(|(position, _)| *position);
    failures.into_iter().map(|(_, message)| message).collect()
}

/// Unknown fields sort after every declared one
fn field_position(fields: &[&str], path: &str) -> usize {
    let field = path.split(['.', '[']).next().unwrap_or_default();
    fields
        .iter()
        .position(|declared| *declared == field)
        .unwrap_or(fields.len())
}
