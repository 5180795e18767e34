//! Memory Type Tracker
//!
//! Maps each memory key to the shape of its slot and, through the shape, to
//! the access kinds currently legal against it. One tracker belongs to one
//! builder; it is passed by reference into the task assembler and resolver.

use crate::errors::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use workflow_types::{MemoryAccessKind, MemoryValue, OutputKind, WorkflowError};

/// Shape of a memory slot, fixed once seeded or first written
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotShape {
    Scalar,
    Collection,
}

impl SlotShape {
    /// Access kinds legal against this shape; the first is the default
    pub fn legal_kinds(&self) -> &'static [MemoryAccessKind] {
        match self {
            SlotShape::Scalar => &[MemoryAccessKind::Read],
            SlotShape::Collection => &[
                MemoryAccessKind::GetAll,
                MemoryAccessKind::Peek,
                MemoryAccessKind::Pop,
                MemoryAccessKind::Size,
            ],
        }
    }

    pub fn default_kind(&self) -> MemoryAccessKind {
        match self {
            SlotShape::Scalar => MemoryAccessKind::Read,
            SlotShape::Collection => MemoryAccessKind::GetAll,
        }
    }

    /// The shape an output of `kind` produces
    pub fn of_output(kind: OutputKind) -> Self {
        if kind.is_append() {
            SlotShape::Collection
        } else {
            SlotShape::Scalar
        }
    }

    pub fn of_value(value: &MemoryValue) -> Self {
        if value.is_collection() {
            SlotShape::Collection
        } else {
            SlotShape::Scalar
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotShape::Scalar => "scalar",
            SlotShape::Collection => "collection",
        }
    }
}

impl std::fmt::Display for SlotShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol table of slot shapes for one workflow under construction
#[derive(Clone, Debug, Default)]
pub struct MemoryTypeTracker {
    slots: BTreeMap<String, SlotShape>,
}

impl MemoryTypeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the shape of an already classified seed value
    ///
    /// Seeding a key again with a value of the same shape is a no-op; a
    /// different shape fails with [`BuildError::ShapeConflict`].
    pub fn seed(&mut self, key: impl Into<String>, value: &MemoryValue) -> BuildResult<()> {
        self.fix_shape(key.into(), SlotShape::of_value(value))
    }

    /// Classify a raw JSON seed and record its shape
    pub fn seed_json(&mut self, key: &str, value: Value) -> BuildResult<MemoryValue> {
        let value = MemoryValue::from_json(key, value).map_err(|err| match err {
            WorkflowError::UnsupportedMemoryType { key, found } => {
                BuildError::UnsupportedMemoryType {
                    key,
                    reason: format!(
                        "expected a string or a list of strings and flat string maps, found {}",
                        found
                    ),
                }
            }
            other => BuildError::Workflow(other),
        })?;
        self.seed(key, &value)?;
        Ok(value)
    }

    /// Update the slot written by an output
    ///
    /// The first write fixes the shape. A later output of a different shape
    /// fails with [`BuildError::ShapeConflict`] and leaves the slot untouched.
    pub fn record_output(&mut self, key: &str, kind: OutputKind) -> BuildResult<()> {
        self.fix_shape(key.to_string(), SlotShape::of_output(kind))
    }

    fn fix_shape(&mut self, key: String, requested: SlotShape) -> BuildResult<()> {
        match self.slots.get(&key) {
            Some(current) if *current != requested => Err(BuildError::ShapeConflict {
                key,
                current: current.to_string(),
                requested: requested.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.slots.insert(key, requested);
                Ok(())
            }
        }
    }

    /// The default access kind for a bare key: `get_all` for collections, `read` for scalars
    pub fn resolve_default_kind(&self, key: &str) -> Option<MemoryAccessKind> {
        self.slots.get(key).map(SlotShape::default_kind)
    }

    pub fn legal_kinds(&self, key: &str) -> &'static [MemoryAccessKind] {
        self.slots.get(key).map(SlotShape::legal_kinds).unwrap_or(&[])
    }

    pub fn shape(&self, key: &str) -> Option<SlotShape> {
        self.slots.get(key).copied()
    }

    pub fn has(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_scalar() {
        let mut tracker = MemoryTypeTracker::new();
        tracker.seed_json("topic", json!("Linear Algebra")).unwrap();
        assert!(tracker.has("topic"));
        assert_eq!(tracker.shape("topic"), Some(SlotShape::Scalar));
        assert_eq!(tracker.legal_kinds("topic"), &[MemoryAccessKind::Read]);
        assert_eq!(
            tracker.resolve_default_kind("topic"),
            Some(MemoryAccessKind::Read)
        );
    }

    #[test]
    fn test_seed_collection() {
        let mut tracker = MemoryTypeTracker::new();
        tracker.seed_json("history", json!(["a", "b"])).unwrap();
        assert_eq!(
            tracker.legal_kinds("history"),
            &[
                MemoryAccessKind::GetAll,
                MemoryAccessKind::Peek,
                MemoryAccessKind::Pop,
                MemoryAccessKind::Size
            ]
        );
        assert_eq!(
            tracker.resolve_default_kind("history"),
            Some(MemoryAccessKind::GetAll)
        );
    }

    #[test]
    fn test_seed_unsupported() {
        let mut tracker = MemoryTypeTracker::new();
        let err = tracker.seed_json("count", json!(3)).unwrap_err();
        assert!(matches!(err, BuildError::UnsupportedMemoryType { ref key, .. } if key == "count"));
        assert!(!tracker.has("count"));
    }

    #[test]
    fn test_unknown_key() {
        let tracker = MemoryTypeTracker::new();
        assert!(!tracker.has("nope"));
        assert!(tracker.resolve_default_kind("nope").is_none());
        assert!(tracker.legal_kinds("nope").is_empty());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_record_output_shapes() {
        let mut tracker = MemoryTypeTracker::new();
        tracker.record_output("poem", OutputKind::Write).unwrap();
        tracker.record_output("history", OutputKind::Push).unwrap();
        tracker.record_output("queue", OutputKind::Insert).unwrap();
        assert_eq!(tracker.shape("poem"), Some(SlotShape::Scalar));
        assert_eq!(tracker.shape("history"), Some(SlotShape::Collection));
        assert_eq!(tracker.shape("queue"), Some(SlotShape::Collection));
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_same_shape_rewrite_is_allowed() {
        let mut tracker = MemoryTypeTracker::new();
        tracker.seed_json("history", json!([])).unwrap();
        tracker.record_output("history", OutputKind::Push).unwrap();
        tracker.record_output("history", OutputKind::Insert).unwrap();
        assert_eq!(tracker.shape("history"), Some(SlotShape::Collection));
    }

    #[test]
    fn test_shape_conflict() {
        let mut tracker = MemoryTypeTracker::new();
        tracker.seed_json("topic", json!("x")).unwrap();
        let err = tracker.record_output("topic", OutputKind::Push).unwrap_err();
        assert!(matches!(
            err,
            BuildError::ShapeConflict { ref current, ref requested, .. }
                if current == "scalar" && requested == "collection"
        ));
        assert_eq!(tracker.shape("topic"), Some(SlotShape::Scalar));

        tracker.record_output("list", OutputKind::Push).unwrap();
        assert!(matches!(
            tracker.record_output("list", OutputKind::Write),
            Err(BuildError::ShapeConflict { .. })
        ));
    }

    #[test]
    fn test_reseed_keeps_shape() {
        let mut tracker = MemoryTypeTracker::new();
        tracker.seed_json("topic", json!("x")).unwrap();
        let err = tracker.seed_json("topic", json!(["a"])).unwrap_err();
        assert!(matches!(
            err,
            BuildError::ShapeConflict { ref key, ref current, ref requested }
                if key == "topic" && current == "scalar" && requested == "collection"
        ));
        assert_eq!(tracker.shape("topic"), Some(SlotShape::Scalar));

        tracker.seed_json("topic", json!("y")).unwrap();
        assert_eq!(tracker.shape("topic"), Some(SlotShape::Scalar));
    }

    #[test]
    fn test_seed_after_output_keeps_shape() {
        let mut tracker = MemoryTypeTracker::new();
        tracker.record_output("poem", OutputKind::Write).unwrap();
        assert!(matches!(
            tracker.seed("poem", &MemoryValue::from(vec!["a"])),
            Err(BuildError::ShapeConflict { .. })
        ));
        assert_eq!(tracker.shape("poem"), Some(SlotShape::Scalar));
    }
}
