//! # Custom Scalars

use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};

/// Hard ceiling for any page request, independent of configuration
pub const MAX_PAGINATION_AMOUNT: i32 = 1000;

/// Number of items requested from a paginated field
///
/// Serialized as an `Int`; must be at least 1. The configured page size
/// limit is enforced by the field resolving the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationAmount(pub i32);

impl PaginationAmount {
    pub fn get(self) -> i32 {
        self.0
    }
}

#[Scalar(name = "PaginationAmount")]
impl ScalarType for PaginationAmount {
    fn parse(value: Value) -> InputValueResult<Self> {
        let Value::Number(ref n) = value else {
            return Err(InputValueError::expected_type(value));
        };

        let amount = n
            .as_i64()
            .ok_or_else(|| InputValueError::custom("PaginationAmount must be an integer"))?;

        if !(1..=i64::from(MAX_PAGINATION_AMOUNT)).contains(&amount) {
            return Err(InputValueError::custom(format!(
                "PaginationAmount must be between 1 and {MAX_PAGINATION_AMOUNT}, got {amount}"
            )));
        }

        i32::try_from(amount)
            .map(Self)
            .map_err(|_| InputValueError::custom("PaginationAmount out of range"))
    }

    fn is_valid(value: &Value) -> bool {
        matches!(value, Value::Number(n) if n.is_i64())
    }

    fn to_value(&self) -> Value {
        Value::Number(self.0.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_positive_integers() {
        let amount = PaginationAmount::parse(Value::from(25)).unwrap();
        assert_eq!(amount.get(), 25);
        assert_eq!(amount.to_value(), Value::from(25));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(PaginationAmount::parse(Value::from(0)).is_err());
        assert!(PaginationAmount::parse(Value::from(-3)).is_err());
        assert!(PaginationAmount::parse(Value::from(MAX_PAGINATION_AMOUNT + 1)).is_err());
    }

    #[test]
    fn test_parse_rejects_non_integers() {
        assert!(PaginationAmount::parse(Value::from("10")).is_err());
        assert!(PaginationAmount::parse(Value::from(2.5)).is_err());
    }
}
