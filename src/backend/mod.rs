/*!
# Serializer backends

A [`Backend`] performs the terminal action once the
[`Serializer`](crate::Serializer) has decided what is to be written: the
[`TextBackend`] appends markup to an
[`OutputBuffer`](crate::buffer::OutputBuffer), the [`EventBackend`] forwards
structured events to an [`EventConsumer`].

Backends see already-resolved names and never have to track namespaces or
CDATA state themselves.
*/
use std::io;

use crate::properties::{OutputMethod, OutputProperties};
use crate::tag::NamespaceDecl;

pub mod events;
pub mod text;

pub use events::{EventAttribute, EventBackend, EventConsumer};
pub use text::TextBackend;

/// Configuration view handed to backends with every call.
#[derive(Debug, Clone, Copy)]
pub struct Settings<'a> {
	pub method: OutputMethod,
	pub props: &'a OutputProperties,
}

impl<'a> Settings<'a> {
	pub fn new(method: OutputMethod, props: &'a OutputProperties) -> Self {
		Self { method, props }
	}

	pub fn is_html(&self) -> bool {
		self.method == OutputMethod::Html
	}

	/// Whether characters above U+00FF must be written as references.
	pub fn narrow(&self) -> bool {
		self.props.encoding.is_narrow_legacy()
	}

	/// Whether a DOCTYPE declaration is to be written before the first
	/// element.
	pub fn has_doctype(&self) -> bool {
		match self.method {
			OutputMethod::Xml => self.props.doctype.system.is_some(),
			OutputMethod::Html => !self.props.doctype.is_empty(),
		}
	}
}

/// Element or attribute name with its namespace resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedName<'a> {
	/// Name as given by the caller, including any prefix
	pub qname: &'a str,
	/// Namespace URI, empty if none
	pub uri: &'a str,
	pub local_name: &'a str,
}

/// A start tag ready to be written.
#[derive(Debug, Clone)]
pub struct ResolvedTag<'a> {
	pub name: QualifiedName<'a>,
	/// Attributes with their unescaped values, in insertion order
	pub attributes: Vec<(QualifiedName<'a>, &'a str)>,
	/// Namespace declarations made on this tag, in declaration order
	pub namespaces: &'a [NamespaceDecl],
	/// Tree depth of the element (the root element has depth 1)
	pub depth: usize,
}

/// Terminal actions of a serializer.
///
/// The [`Serializer`](crate::Serializer) guarantees that calls arrive in
/// document order, that CDATA text only arrives between `start_cdata` and
/// `end_cdata`, and that `start_tag`/`end_tag` calls are balanced (a
/// `start_tag` with `empty` set has no matching `end_tag`).
pub trait Backend {
	fn start_document(&mut self, settings: &Settings);

	fn end_document(&mut self, settings: &Settings);

	/// An element named `name` is about to be opened; `first` is set for the
	/// first element of the document.
	fn before_element(&mut self, settings: &Settings, name: &str, first: bool);

	/// Write a start tag. If `empty` is set, the element ends right away
	/// without content.
	fn start_tag(&mut self, settings: &Settings, tag: &ResolvedTag, empty: bool);

	/// Write the end tag of an element with content.
	fn end_tag(&mut self, settings: &Settings, name: &QualifiedName, depth: usize);

	/// Write character data, escaped unless `escape` is false.
	fn text(&mut self, settings: &Settings, text: &str, escape: bool);

	fn start_cdata(&mut self, settings: &Settings);

	/// Write text inside an open CDATA section. The text never contains
	/// `]]>`.
	fn cdata_text(&mut self, settings: &Settings, text: &str);

	fn end_cdata(&mut self, settings: &Settings);

	fn comment(&mut self, settings: &Settings, text: &str);

	fn processing_instruction(&mut self, settings: &Settings, target: &str, data: &str);

	/// A namespace binding was accepted for the open start tag.
	fn declare_prefix(&mut self, _prefix: &str, _uri: &str) {}

	/// A namespace binding went out of scope.
	fn undeclare_prefix(&mut self, _prefix: &str) {}

	/// Forget per-document formatting state after the output method
	/// changed.
	fn reset(&mut self) {}

	/// Release the destination.
	fn close(&mut self) -> io::Result<()> {
		Ok(())
	}

	/// Return the first swallowed I/O error, if any.
	fn take_error(&mut self) -> Option<io::Error> {
		None
	}
}
