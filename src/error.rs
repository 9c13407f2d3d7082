//! Error types for the signature field library.
//!
//! This module defines all error types that can occur while building the
//! object graph, finalizing fields and writing the document.

use crate::object::ObjectRef;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by appearance handlers.
pub type RenderError = Box<dyn std::error::Error + Send + Sync>;

/// Error types that can occur during document authoring.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required key was read before being set and has no default
    #[error("Missing required key: /{key}")]
    MissingRequiredKey {
        /// Key name (without the leading slash)
        key: String,
    },

    /// An object owned by one document was registered with another
    #[error("Cross-document reference: object belongs to document {owner}, table belongs to document {table}")]
    CrossDocumentReference {
        /// Document that created the object
        owner: u64,
        /// Document whose table the object was offered to
        table: u64,
    },

    /// A visible signature field reached finalization without a renderer
    #[error("Signature field '{field}' is visible but has no appearance handler")]
    MissingAppearanceHandler {
        /// Field name (`T`)
        field: String,
    },

    /// The appearance handler itself failed
    #[error("Appearance rendering failed: {0}")]
    RenderFailure(#[source] RenderError),

    /// Key is not part of the dictionary's schema
    #[error("Key /{key} is not declared for {dictionary}")]
    UndeclaredKey {
        /// Key that was accessed
        key: String,
        /// Schema name of the dictionary
        dictionary: &'static str,
    },

    /// Optional key is absent and its schema declares no default
    #[error("Key /{key} is absent and has no default value")]
    NoDefaultValue {
        /// Key that was accessed
        key: String,
    },

    /// Value stored under a key has the wrong type
    #[error("Invalid object type for /{key}: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Key that was accessed
        key: String,
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Referenced object not found in the reference table
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectRef),

    /// A registered object points at an identity that was never registered
    #[error("Dangling reference: {from} refers to unregistered object {to}")]
    DanglingReference {
        /// Object holding the reference (None for the object being registered)
        from: String,
        /// Identity that is not in the table
        to: ObjectRef,
    },

    /// Operation needs a page but the document has none
    #[error("Document has no pages")]
    NoPages,

    /// Mutation attempted on a field after it was finalized
    #[error("Signature field '{field}' is already finalized")]
    FieldFinalized {
        /// Field name (`T`)
        field: String,
    },

    /// Field handle does not belong to this document
    #[error("Unknown signature field: #{0}")]
    UnknownField(usize),

    /// Signature token does not fit the reserved Contents span
    #[error("Signature placeholder too small: capacity {capacity} bytes, token needs {required}")]
    PlaceholderTooSmall {
        /// Bytes reserved in the placeholder
        capacity: usize,
        /// Bytes in the token
        required: usize,
    },

    /// Malformed or inconsistent ByteRange
    #[error("Invalid ByteRange: {0}")]
    InvalidByteRange(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_key_error() {
        let err = Error::MissingRequiredKey {
            key: "Filter".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/Filter"));
    }

    #[test]
    fn test_missing_handler_error() {
        let err = Error::MissingAppearanceHandler {
            field: "Signature1".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Signature1"));
        assert!(msg.contains("appearance handler"));
    }

    #[test]
    fn test_render_failure_keeps_source() {
        let inner: RenderError = "pen ran out of ink".into();
        let err = Error::RenderFailure(inner);
        let source = std::error::Error::source(&err).expect("source is kept");
        assert_eq!(source.to_string(), "pen ran out of ink");
    }

    #[test]
    fn test_dangling_reference_error() {
        let err = Error::DanglingReference {
            from: "4 0 R".to_string(),
            to: ObjectRef::new(9, 0),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("4 0 R"));
        assert!(msg.contains("9 0 R"));
    }

    #[test]
    fn test_undeclared_key_error() {
        let err = Error::UndeclaredKey {
            key: "Bogus".to_string(),
            dictionary: "SignatureValue",
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/Bogus"));
        assert!(msg.contains("SignatureValue"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
