/*!
# Error types

This module holds the error types returned by the event methods of the
serializers in this crate.

I/O errors are deliberately absent: a failing sink never aborts a document
through the event API. See [`OutputBuffer::take_error`] for how such errors
can be observed after the fact.

   [`OutputBuffer::take_error`]: crate::buffer::OutputBuffer::take_error
*/
use std::error;
use std::fmt;
use std::result::Result as StdResult;

use smartstring::alias::String as SmartString;

/// Violation of the serializer event protocol.
///
/// These are reported synchronously from the offending call. None of them is
/// recovered from internally; the caller decides whether the document is to
/// be abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// An attribute was added while no start tag was open.
	StrayAttribute(
		/// Qualified name of the attribute
		SmartString,
	),

	/// A namespace was declared while no start tag was open.
	///
	/// Declaring the empty prefix with an empty URI outside of a start tag
	/// is silently accepted and does not produce this error.
	StrayNamespace {
		/// Prefix which was declared (empty for the default namespace)
		prefix: SmartString,
		/// Namespace URI
		uri: String,
	},

	/// An element or attribute name used a prefix which is not bound in the
	/// current scope.
	NamespacePrefixUndeclared(
		/// The unbound prefix
		SmartString,
	),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::StrayAttribute(name) => {
				write!(f, "attribute {:?} added outside of a start tag", name)
			}
			Error::StrayNamespace { prefix, uri } if prefix.len() == 0 => write!(
				f,
				"default namespace {:?} declared outside of a start tag",
				uri
			),
			Error::StrayNamespace { prefix, uri } => write!(
				f,
				"namespace prefix {:?} -> {:?} declared outside of a start tag",
				prefix, uri
			),
			Error::NamespacePrefixUndeclared(prefix) => {
				write!(f, "namespace prefix {:?} is not declared", prefix)
			}
		}
	}
}

impl error::Error for Error {}

/// Result type used by the serializer event methods.
pub type Result<T> = StdResult<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_names_the_offending_item() {
		let e = Error::StrayAttribute("id".into());
		assert_eq!(e.to_string(), "attribute \"id\" added outside of a start tag");
		let e = Error::NamespacePrefixUndeclared("p".into());
		assert_eq!(e.to_string(), "namespace prefix \"p\" is not declared");
	}

	#[test]
	fn display_distinguishes_default_namespace() {
		let e = Error::StrayNamespace {
			prefix: "".into(),
			uri: "urn:a".to_string(),
		};
		assert_eq!(
			e.to_string(),
			"default namespace \"urn:a\" declared outside of a start tag"
		);
	}
}
