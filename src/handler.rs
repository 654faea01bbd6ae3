/*!
# The serializer event API

Upstream tree construction drives a serializer through the
[`OutputHandler`] trait, in document order. Every method runs to completion
before the next call; there is no internal buffering of events except for
the open start tag.
*/
use std::io;

use crate::cdata::CdataRegistry;
use crate::error::Result;
use crate::properties::OutputMethod;

/**
# Receiver of document construction events

Implemented by [`Serializer`](crate::Serializer) for both text and event
backends and by the [`UnknownOutput`](crate::UnknownOutput) dispatcher.

A start tag opened by [`start_element`](Self::start_element) stays open
until the next content, child element or end event, so that
[`attribute`](Self::attribute) and [`namespace`](Self::namespace) can
amend it.

The configuration setters are meant to be called before the first element.
*/
pub trait OutputHandler {
	/// Begin the document.
	fn start_document(&mut self) -> Result<()>;

	/// Finish the document and flush all buffered output.
	fn end_document(&mut self) -> Result<()>;

	/// Open a start tag for the element with the qualified name `name`.
	fn start_element(&mut self, name: &str) -> Result<()>;

	/// Close the innermost element.
	fn end_element(&mut self, name: &str) -> Result<()>;

	/// Add or overwrite an attribute on the open start tag.
	fn attribute(&mut self, name: &str, value: &str) -> Result<()>;

	/// Declare a namespace prefix on the open start tag.
	///
	/// The empty prefix denotes the default namespace.
	fn namespace(&mut self, prefix: &str, uri: &str) -> Result<()>;

	/// Write character data.
	fn characters(&mut self, text: &str) -> Result<()>;

	/// Write `length` characters from `chars`, starting at `offset`.
	///
	/// Out-of-range parts of the window are ignored.
	fn characters_from(&mut self, chars: &[char], offset: usize, length: usize) -> Result<()> {
		let end = std::cmp::min(offset.saturating_add(length), chars.len());
		let start = std::cmp::min(offset, end);
		let text: String = chars[start..end].iter().collect();
		self.characters(&text)
	}

	fn comment(&mut self, text: &str) -> Result<()>;

	fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()>;

	/// Open a CDATA section explicitly.
	fn start_cdata(&mut self) -> Result<()>;

	/// Close a CDATA section opened with [`start_cdata`](Self::start_cdata).
	fn end_cdata(&mut self) -> Result<()>;

	/// Release the destination.
	///
	/// I/O errors are not reported here; see
	/// [`take_io_error`](Self::take_io_error).
	fn close(&mut self);

	/// Return the first I/O error swallowed while writing or closing.
	fn take_io_error(&mut self) -> Option<io::Error>;

	/// Toggle escaping of character data, returning the previous setting.
	fn set_escaping(&mut self, escape: bool) -> bool;

	fn set_doctype(&mut self, system: Option<&str>, public: Option<&str>);

	fn set_indent(&mut self, indent: bool);

	fn set_indent_number(&mut self, n: usize);

	/// Suppress the XML declaration.
	fn omit_header(&mut self, omit: bool);

	fn set_standalone(&mut self, standalone: Option<&str>);

	fn set_version(&mut self, version: &str);

	fn set_cdata_section_elements(&mut self, elements: CdataRegistry);

	fn set_media_type(&mut self, media_type: &str);

	/// Switch the output method.
	///
	/// Switching after the first element has been written resets the
	/// serializer state; output written so far is kept.
	fn set_output_method(&mut self, method: OutputMethod);

	fn output_method(&self) -> OutputMethod;
}

impl<T: OutputHandler + ?Sized> OutputHandler for Box<T> {
	fn start_document(&mut self) -> Result<()> {
		(**self).start_document()
	}

	fn end_document(&mut self) -> Result<()> {
		(**self).end_document()
	}

	fn start_element(&mut self, name: &str) -> Result<()> {
		(**self).start_element(name)
	}

	fn end_element(&mut self, name: &str) -> Result<()> {
		(**self).end_element(name)
	}

	fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
		(**self).attribute(name, value)
	}

	fn namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
		(**self).namespace(prefix, uri)
	}

	fn characters(&mut self, text: &str) -> Result<()> {
		(**self).characters(text)
	}

	fn characters_from(&mut self, chars: &[char], offset: usize, length: usize) -> Result<()> {
		(**self).characters_from(chars, offset, length)
	}

	fn comment(&mut self, text: &str) -> Result<()> {
		(**self).comment(text)
	}

	fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
		(**self).processing_instruction(target, data)
	}

	fn start_cdata(&mut self) -> Result<()> {
		(**self).start_cdata()
	}

	fn end_cdata(&mut self) -> Result<()> {
		(**self).end_cdata()
	}

	fn close(&mut self) {
		(**self).close()
	}

	fn take_io_error(&mut self) -> Option<io::Error> {
		(**self).take_io_error()
	}

	fn set_escaping(&mut self, escape: bool) -> bool {
		(**self).set_escaping(escape)
	}

	fn set_doctype(&mut self, system: Option<&str>, public: Option<&str>) {
		(**self).set_doctype(system, public)
	}

	fn set_indent(&mut self, indent: bool) {
		(**self).set_indent(indent)
	}

	fn set_indent_number(&mut self, n: usize) {
		(**self).set_indent_number(n)
	}

	fn omit_header(&mut self, omit: bool) {
		(**self).omit_header(omit)
	}

	fn set_standalone(&mut self, standalone: Option<&str>) {
		(**self).set_standalone(standalone)
	}

	fn set_version(&mut self, version: &str) {
		(**self).set_version(version)
	}

	fn set_cdata_section_elements(&mut self, elements: CdataRegistry) {
		(**self).set_cdata_section_elements(elements)
	}

	fn set_media_type(&mut self, media_type: &str) {
		(**self).set_media_type(media_type)
	}

	fn set_output_method(&mut self, method: OutputMethod) {
		(**self).set_output_method(method)
	}

	fn output_method(&self) -> OutputMethod {
		(**self).output_method()
	}
}
