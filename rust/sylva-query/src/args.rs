//! Typed accessors over a decoded argument slice.

use sylva_common::{Result, error::Error};

use crate::function::ArgValue;

/// Returns the required string argument at `index`.
pub fn get_str<'a>(args: &'a [ArgValue], index: usize, name: &str) -> Result<&'a str> {
    match args.get(index) {
        Some(ArgValue::Str(value)) => Ok(value),
        Some(other) => Err(Error::invalid_arg(
            name,
            format!("expected a string argument, found {}", other.kind_name()),
        )),
        None => Err(Error::invalid_arg(name, "missing required argument")),
    }
}

/// Returns the required integer argument at `index`.
pub fn get_int(args: &[ArgValue], index: usize, name: &str) -> Result<i64> {
    match args.get(index) {
        Some(ArgValue::Int(value)) => Ok(*value),
        Some(other) => Err(Error::invalid_arg(
            name,
            format!("expected an integer argument, found {}", other.kind_name()),
        )),
        None => Err(Error::invalid_arg(name, "missing required argument")),
    }
}

/// Returns the optional string argument at `index`; an absent slot and an
/// explicit null both read as `None`.
pub fn get_opt_str<'a>(args: &'a [ArgValue], index: usize, name: &str) -> Result<Option<&'a str>> {
    match args.get(index) {
        Some(ArgValue::Str(value)) => Ok(Some(value)),
        Some(ArgValue::Null) | None => Ok(None),
        Some(other) => Err(Error::invalid_arg(
            name,
            format!("expected a string argument, found {}", other.kind_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_decode_matching_values() {
        let args = [
            ArgValue::Str("store".into()),
            ArgValue::Int(2),
            ArgValue::Null,
        ];
        assert_eq!(get_str(&args, 0, "collection").unwrap(), "store");
        assert_eq!(get_int(&args, 1, "index-no").unwrap(), 2);
        assert_eq!(get_opt_str(&args, 2, "paths").unwrap(), None);
        assert_eq!(get_opt_str(&args, 3, "paths").unwrap(), None);
    }

    #[test]
    fn mismatches_and_missing_required_slots_fail() {
        let args = [ArgValue::Int(2)];
        assert!(get_str(&args, 0, "collection").is_err());
        assert!(get_int(&args, 1, "index-no").is_err());
        assert!(get_opt_str(&args, 0, "paths").is_err());
    }
}
