//! The document's indirect reference table.
//!
//! Every object that must be addressable on its own (pages, fields, the
//! signature value dictionary, appearance streams) is registered here and
//! receives a stable [`ObjectRef`]. Registration is keyed by dictionary
//! *instance*, not by value: registering the same instance again returns the
//! identity it already has. The writer emits each registered object exactly
//! once, in identity order.

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::object::{DocumentId, InstanceId, Object, ObjectRef, Stream};
use std::collections::{BTreeMap, HashMap};

/// Registry of indirect objects for one document.
#[derive(Debug)]
pub struct IndirectReferenceTable {
    document: DocumentId,
    next_obj_id: u32,
    objects: BTreeMap<ObjectRef, Object>,
    by_instance: HashMap<InstanceId, ObjectRef>,
}

impl IndirectReferenceTable {
    pub(crate) fn new(document: DocumentId) -> Self {
        Self {
            document,
            next_obj_id: 1,
            objects: BTreeMap::new(),
            by_instance: HashMap::new(),
        }
    }

    /// Document this table belongs to.
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Register a dictionary and return its identity.
    ///
    /// Idempotent per instance: a dictionary (or a clone of it) that is
    /// already registered keeps its identity and the stored object is left
    /// as is, even if the offered copy was changed since. Registering claims
    /// the instance, and all of its clones, for this document. Fails with [`Error::CrossDocumentReference`] if the dictionary
    /// was created by another document, and with [`Error::DanglingReference`]
    /// if it refers to an identity not yet in this table.
    pub fn register(&mut self, dict: Dictionary) -> Result<ObjectRef> {
        self.register_object(Object::Dictionary(dict))
    }

    /// Register a stream. Its identity is that of its dictionary.
    pub fn register_stream(&mut self, stream: Stream) -> Result<ObjectRef> {
        self.register_object(Object::Stream(stream))
    }

    fn register_object(&mut self, mut obj: Object) -> Result<ObjectRef> {
        let type_name = obj.type_name();
        let Some(dict) = obj.as_dict_mut() else {
            return Err(Error::InvalidObjectType {
                key: String::new(),
                expected: "Dictionary".to_string(),
                found: type_name.to_string(),
            });
        };
        self.check_owner(dict)?;

        if let Some(existing) = self.by_instance.get(&dict.instance()).copied() {
            if self.objects.get(&existing).and_then(Object::as_dict) != Some(&*dict) {
                log::warn!(
                    "{} offered again with different contents; keeping the registered object",
                    existing
                );
            } else {
                log::trace!("Object already registered as {}", existing);
            }
            return Ok(existing);
        }

        let mut refs = Vec::new();
        dict.values().for_each(|o| o.collect_references(&mut refs));
        if let Some(missing) = refs.into_iter().find(|r| !self.objects.contains_key(r)) {
            return Err(Error::DanglingReference {
                from: "object being registered".to_string(),
                to: missing,
            });
        }

        dict.adopt(self.document);
        let instance = dict.instance();

        let obj_ref = ObjectRef::new(self.next_obj_id, 0);
        self.next_obj_id += 1;
        log::debug!("Registered {} as {}", type_name, obj_ref);

        self.by_instance.insert(instance, obj_ref);
        self.objects.insert(obj_ref, obj);
        Ok(obj_ref)
    }

    fn check_owner(&self, dict: &Dictionary) -> Result<()> {
        match dict.owner() {
            Some(owner) if owner != self.document => Err(Error::CrossDocumentReference {
                owner: owner.get(),
                table: self.document.get(),
            }),
            _ => Ok(()),
        }
    }

    /// Identity of a registered dictionary instance, if registered.
    pub fn identity_of(&self, dict: &Dictionary) -> Option<ObjectRef> {
        self.by_instance.get(&dict.instance()).copied()
    }

    /// Whether `obj_ref` is registered.
    pub fn contains(&self, obj_ref: ObjectRef) -> bool {
        self.objects.contains_key(&obj_ref)
    }

    /// Registered object by identity.
    pub fn get(&self, obj_ref: ObjectRef) -> Option<&Object> {
        self.objects.get(&obj_ref)
    }

    /// Mutable registered object by identity.
    pub fn get_mut(&mut self, obj_ref: ObjectRef) -> Option<&mut Object> {
        self.objects.get_mut(&obj_ref)
    }

    /// Registered dictionary (or stream dictionary) by identity.
    pub fn dictionary(&self, obj_ref: ObjectRef) -> Result<&Dictionary> {
        self.get(obj_ref)
            .ok_or(Error::ObjectNotFound(obj_ref))?
            .as_dict()
            .ok_or_else(|| Error::InvalidObjectType {
                key: obj_ref.to_string(),
                expected: "Dictionary".to_string(),
                found: "Other".to_string(),
            })
    }

    /// Mutable registered dictionary by identity.
    pub fn dictionary_mut(&mut self, obj_ref: ObjectRef) -> Result<&mut Dictionary> {
        self.get_mut(obj_ref)
            .ok_or(Error::ObjectNotFound(obj_ref))?
            .as_dict_mut()
            .ok_or_else(|| Error::InvalidObjectType {
                key: obj_ref.to_string(),
                expected: "Dictionary".to_string(),
                found: "Other".to_string(),
            })
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Next object number that will be assigned (xref `Size`).
    pub fn next_id(&self) -> u32 {
        self.next_obj_id
    }

    /// Registered objects in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, &Object)> {
        self.objects.iter().map(|(r, o)| (*r, o))
    }

    /// Check that every reference held by a registered object resolves.
    ///
    /// Mutations after registration can introduce references to objects that
    /// were never registered; the writer calls this before emitting bytes.
    pub fn check_references(&self) -> Result<()> {
        for (obj_ref, obj) in &self.objects {
            let mut refs = Vec::new();
            obj.collect_references(&mut refs);
            if let Some(missing) = refs.into_iter().find(|r| !self.objects.contains_key(r)) {
                return Err(Error::DanglingReference {
                    from: obj_ref.to_string(),
                    to: missing,
                });
            }
        }
        Ok(())
    }
}
