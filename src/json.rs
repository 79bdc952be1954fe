//! JSON parsing without a nesting limit
//!
//! serde_json refuses documents nested deeper than 128 levels. Predicate
//! trees nest one level per combinator, so session files lift that limit
//! and let `serde_stacker` grow the stack on demand instead.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Deserialize `input` with no recursion limit
pub fn from_str_unbounded<T: DeserializeOwned>(input: &str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn nested_arrays(depth: usize) -> String {
        format!("{}{}", "[".repeat(depth), "]".repeat(depth))
    }

    #[test]
    fn test_parses_beyond_default_limit() {
        let input = nested_arrays(1_000);
        assert!(serde_json::from_str::<Value>(&input).is_err());
        assert!(from_str_unbounded::<Value>(&input).is_ok());
    }

    #[test]
    fn test_trailing_input_is_error() {
        assert!(from_str_unbounded::<Value>("{} {}").is_err());
    }
}
