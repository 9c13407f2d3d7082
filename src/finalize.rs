//! Save-time finalization.
//!
//! Some objects are derived from authoring state and only materialize when
//! a document is saved: a visible signature field gets its appearance
//! stream here. The pass runs in two phases over all entities:
//!
//! 1. **prepare**: each entity computes what it needs (rendering happens
//!    here) against a shared, read-only view of the reference table;
//! 2. **commit**: the prepared objects are registered and wired in.
//!
//! Any failure in phase 1 aborts the pass before the object graph has been
//! touched, so a failed save leaves no partial appearance state behind.

use crate::error::Result;
use crate::object::{ObjectRef, Stream};
use crate::xref::IndirectReferenceTable;

/// Outcome of the prepare phase for one entity.
#[derive(Debug)]
pub enum Prepared {
    /// Finalized by an earlier pass; commit does nothing
    AlreadyFinalized,
    /// Nothing to render; commit only records the state change
    Invisible,
    /// A rendered appearance stream waiting to be registered
    Appearance(Stream),
}

/// An entity that takes part in the finalization pass.
pub trait PrepareForSave {
    /// Compute derived objects without mutating the graph.
    fn prepare(&self, objects: &IndirectReferenceTable) -> Result<Prepared>;

    /// Register and attach what `prepare` produced, then mark the entity
    /// finalized. Returns the identity of a newly registered object, if any.
    fn commit(
        &mut self,
        objects: &mut IndirectReferenceTable,
        prepared: Prepared,
    ) -> Result<Option<ObjectRef>>;
}

/// What a finalization pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizationReport {
    /// Appearance streams registered, in entity order
    pub appearance_streams: Vec<ObjectRef>,
    /// Entities finalized without an appearance
    pub invisible: usize,
    /// Entities skipped because an earlier pass finalized them
    pub already_finalized: usize,
}

impl FinalizationReport {
    /// Whether the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.appearance_streams.is_empty() && self.invisible == 0
    }
}

/// Two-phase finalization over a set of entities.
#[derive(Debug, Default)]
pub struct FinalizationPass;

impl FinalizationPass {
    /// Create a pass.
    pub fn new() -> Self {
        Self
    }

    /// Finalize every entity in `entities`.
    pub fn run<T: PrepareForSave>(
        &self,
        entities: &mut [T],
        objects: &mut IndirectReferenceTable,
    ) -> Result<FinalizationReport> {
        let prepared = entities
            .iter()
            .map(|entity| entity.prepare(objects))
            .collect::<Result<Vec<_>>>()?;

        let mut report = FinalizationReport::default();
        for (entity, prepared) in entities.iter_mut().zip(prepared) {
            match prepared {
                Prepared::AlreadyFinalized => report.already_finalized += 1,
                Prepared::Invisible => report.invisible += 1,
                Prepared::Appearance(_) => {},
            }
            if let Some(stream_ref) = entity.commit(objects, prepared)? {
                report.appearance_streams.push(stream_ref);
            }
        }

        log::debug!(
            "Finalization: {} appearance stream(s), {} invisible, {} already finalized",
            report.appearance_streams.len(),
            report.invisible,
            report.already_finalized
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::error::Error;
    use crate::object::DocumentId;

    /// Entity that renders an empty stream, or fails on demand.
    struct Stub {
        fail: bool,
        visible: bool,
        done: bool,
    }

    impl PrepareForSave for Stub {
        fn prepare(&self, _: &IndirectReferenceTable) -> Result<Prepared> {
            if self.done {
                return Ok(Prepared::AlreadyFinalized);
            }
            if self.fail {
                return Err(Error::MissingAppearanceHandler {
                    field: "stub".to_string(),
                });
            }
            if !self.visible {
                return Ok(Prepared::Invisible);
            }
            Ok(Prepared::Appearance(Stream::new(Dictionary::new(), Vec::new())))
        }

        fn commit(
            &mut self,
            objects: &mut IndirectReferenceTable,
            prepared: Prepared,
        ) -> Result<Option<ObjectRef>> {
            let created = match prepared {
                Prepared::Appearance(stream) => Some(objects.register_stream(stream)?),
                _ => None,
            };
            self.done = true;
            Ok(created)
        }
    }

    fn stub(visible: bool, fail: bool) -> Stub {
        Stub {
            fail,
            visible,
            done: false,
        }
    }

    #[test]
    fn test_report_counts() {
        let mut objects = IndirectReferenceTable::new(DocumentId::next());
        let mut entities = vec![stub(true, false), stub(false, false), stub(true, false)];

        let report = FinalizationPass::new().run(&mut entities, &mut objects).unwrap();
        assert_eq!(report.appearance_streams.len(), 2);
        assert_eq!(report.invisible, 1);
        assert_eq!(objects.len(), 2);

        let again = FinalizationPass::new().run(&mut entities, &mut objects).unwrap();
        assert!(again.is_noop());
        assert_eq!(again.already_finalized, 3);
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn test_failure_commits_nothing() {
        let mut objects = IndirectReferenceTable::new(DocumentId::next());
        let mut entities = vec![stub(true, false), stub(true, true)];

        assert!(FinalizationPass::new().run(&mut entities, &mut objects).is_err());
        assert!(objects.is_empty());
        assert!(entities.iter().all(|e| !e.done));
    }
}
