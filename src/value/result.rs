// SPDX-License-Identifier: MIT

//! Node result specifications (`approved=true,segment=prime`)

use super::{coerce, Binding};

/// Apply a comma-separated `key=value` result spec to a binding.
///
/// Keys and values are trimmed and values go through [`coerce`]. Empty
/// segments and segments without `=` are skipped silently: malformed
/// fragments are dropped, never reported.
pub fn apply_result_spec(spec: &str, binding: &mut Binding) {
    for segment in spec.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let Some((key, value)) = segment.split_once('=') else {
            log::debug!("Skipping result fragment without '=': {:?}", segment);
            continue;
        };

        binding.insert(key.trim(), coerce(value.trim()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    #[test]
    fn test_single_assignment() {
        let mut binding = Binding::new();
        apply_result_spec("approved=true", &mut binding);
        assert_eq!(binding.get("approved"), Some(&Scalar::Boolean(true)));
    }

    #[test]
    fn test_multiple_assignments_typed() {
        let mut binding = Binding::new();
        apply_result_spec("approved=true,segment=prime,limit=5000", &mut binding);

        assert_eq!(binding.get("approved"), Some(&Scalar::Boolean(true)));
        assert_eq!(binding.get("segment"), Some(&Scalar::String("prime".into())));
        assert_eq!(binding.get("limit"), Some(&Scalar::Integer(5000)));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let mut binding = Binding::new();
        apply_result_spec("  approved = false ,  tier= gold ", &mut binding);

        assert_eq!(binding.get("approved"), Some(&Scalar::Boolean(false)));
        assert_eq!(binding.get("tier"), Some(&Scalar::String("gold".into())));
    }

    #[test]
    fn test_splits_on_first_equals() {
        let mut binding = Binding::new();
        apply_result_spec("expr=a=b", &mut binding);
        assert_eq!(binding.get("expr"), Some(&Scalar::String("a=b".into())));
    }

    #[test]
    fn test_malformed_fragments_are_dropped() {
        let mut binding = Binding::new();
        apply_result_spec(",,noequals, ,ok=1,", &mut binding);

        assert_eq!(binding.len(), 1);
        assert_eq!(binding.get("ok"), Some(&Scalar::Integer(1)));
    }

    #[test]
    fn test_overwrites_existing_with_new_type() {
        let mut binding = Binding::new().with("age", 25);
        apply_result_spec("age=unknown", &mut binding);
        assert_eq!(binding.get("age"), Some(&Scalar::String("unknown".into())));
    }

    #[test]
    fn test_empty_spec_is_noop() {
        let mut binding = Binding::new().with("age", 25);
        apply_result_spec("", &mut binding);
        assert_eq!(binding, Binding::new().with("age", 25));
    }
}
