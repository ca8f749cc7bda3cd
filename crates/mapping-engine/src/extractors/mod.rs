pub mod numeric;
pub mod parenthetical;

pub use numeric::{normalize_value, parse_amount, SignExceptions, ValueNormalizer};
pub use parenthetical::{resolve_parentheticals, ParentheticalFlags, ParentheticalResolver};
