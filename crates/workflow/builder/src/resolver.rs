//! Condition/Return Resolver
//!
//! Builds edge predicates and the workflow's return binding against the
//! memory shapes recorded so far.

use crate::errors::{BuildError, BuildResult};
use crate::tracker::MemoryTypeTracker;
use std::fmt::Display;
use workflow_types::{Condition, Expression, InputValue, MemoryAccessKind, ReturnSpec, TaskId};

/// Constructs [`Condition`]s for guarded edges
pub struct ConditionBuilder;

impl ConditionBuilder {
    /// Compare `input` against `expected`, jumping to `target_if_not` when it fails
    ///
    /// `expected` is stringified, so numeric literals are accepted.
    pub fn build(
        expected: impl Display,
        expression: Expression,
        input: impl Into<InputValue>,
        target_if_not: impl Into<TaskId>,
    ) -> Condition {
        Condition {
            input: input.into(),
            expected: expected.to_string(),
            expression,
            target_if_not: target_if_not.into(),
        }
    }
}

/// Bind the workflow's return value to one or more declared output keys
///
/// One key binds the slot's default access kind and serializes as JSON only
/// for `get_all`. Several keys always produce a JSON object.
pub fn resolve_return<S: AsRef<str>>(
    keys: &[S],
    declared_outputs: &[&str],
    tracker: &MemoryTypeTracker,
) -> BuildResult<ReturnSpec> {
    let mut bindings = Vec::with_capacity(keys.len());
    for key in keys {
        let key = key.as_ref();
        if !declared_outputs.contains(&key) {
            return Err(BuildError::UnknownReturnKey(key.to_string()));
        }
        let kind = tracker
            .resolve_default_kind(key)
            .ok_or_else(|| BuildError::UnknownReturnKey(key.to_string()))?;
        bindings.push(InputValue::new(kind, key));
    }

    match bindings.len() {
        0 => Err(BuildError::NoReturnKeys),
        1 => {
            let binding = bindings.remove(0);
            let to_json = binding.kind == MemoryAccessKind::GetAll;
            Ok(ReturnSpec::single(binding, to_json))
        }
        _ => Ok(ReturnSpec::many(bindings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workflow_types::{Input, OutputKind, ReturnInput};

    fn tracker() -> MemoryTypeTracker {
        let mut tracker = MemoryTypeTracker::new();
        tracker.record_output("result", OutputKind::Write).unwrap();
        tracker.record_output("history", OutputKind::Push).unwrap();
        tracker
    }

    #[test]
    fn test_condition_builder() {
        let condition = ConditionBuilder::build(
            "Yes",
            Expression::Contains,
            Input::read("is_valid", true),
            "create_query",
        );
        assert_eq!(condition.expected, "Yes");
        assert_eq!(condition.input.key, "is_valid");
        assert_eq!(condition.input.kind, MemoryAccessKind::Read);
        assert_eq!(condition.target_if_not, "create_query");
    }

    #[test]
    fn test_condition_numeric_expected() {
        let condition = ConditionBuilder::build(
            3,
            Expression::GreaterThan,
            InputValue::new(MemoryAccessKind::Size, "history"),
            "again",
        );
        assert_eq!(condition.expected, "3");
    }

    #[test]
    fn test_single_scalar_return() {
        let spec = resolve_return(&["result"], &["result", "history"], &tracker()).unwrap();
        assert!(!spec.to_json);
        match spec.input {
            ReturnInput::Single(value) => {
                assert_eq!(value.kind, MemoryAccessKind::Read);
                assert_eq!(value.key, "result");
            }
            ReturnInput::Many(_) => panic!("expected a single binding"),
        }
    }

    #[test]
    fn test_single_collection_return_is_json() {
        let spec = resolve_return(&["history"], &["result", "history"], &tracker()).unwrap();
        assert!(spec.to_json);
    }

    #[test]
    fn test_multi_key_return() {
        let spec =
            resolve_return(&["result", "history"], &["result", "history"], &tracker()).unwrap();
        assert!(spec.to_json);
        match spec.input {
            ReturnInput::Many(values) => {
                assert_eq!(values.len(), 2);
                assert_eq!(values[1].kind, MemoryAccessKind::GetAll);
            }
            ReturnInput::Single(_) => panic!("expected several bindings"),
        }
    }

    #[test]
    fn test_unknown_return_key() {
        let err = resolve_return(&["missing_key"], &["result"], &tracker()).unwrap_err();
        assert!(matches!(err, BuildError::UnknownReturnKey(ref key) if key == "missing_key"));
    }

    #[test]
    fn test_seeded_but_never_written_key_is_unknown() {
        let mut tracker = tracker();
        tracker.seed_json("topic", serde_json::json!("x")).unwrap();
        assert!(matches!(
            resolve_return(&["topic"], &["result"], &tracker),
            Err(BuildError::UnknownReturnKey(_))
        ));
    }

    #[test]
    fn test_no_keys() {
        let keys: [&str; 0] = [];
        assert!(matches!(
            resolve_return(&keys, &["result"], &tracker()),
            Err(BuildError::NoReturnKeys)
        ));
    }
}
