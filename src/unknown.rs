/*!
# Output method detection

When no output method is configured, the method is derived from the first
element: a root element with the local name `html` (in any case) selects
HTML output, anything else selects XML.
*/
use std::io;

use crate::cdata::CdataRegistry;
use crate::error::Result;
use crate::handler::OutputHandler;
use crate::properties::OutputMethod;
use crate::tag::split_qname;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
	// start_document is held back until the method is known
	Undecided { start_document: bool },
	Resolved,
}

/**
Dispatcher which picks the output method on the first element.

Until then it serializes as XML. Comments and processing instructions
before the first element are passed through; the header is not, since it
depends on the method.

```rust
use xmlout::{OutputHandler, OutputMethod, OutputProperties, StreamSerializer, UnknownOutput};

let inner = StreamSerializer::text(OutputMethod::Xml, OutputProperties::default(), String::new());
let mut out = UnknownOutput::new(inner);
out.start_document().unwrap();
out.start_element("HTML").unwrap();
out.end_element("HTML").unwrap();
out.end_document().unwrap();
assert_eq!(out.output_method(), OutputMethod::Html);
assert_eq!(out.into_inner().into_output(), "<HTML></HTML>");
```
*/
#[derive(Debug)]
pub struct UnknownOutput<H: OutputHandler> {
	inner: H,
	state: Resolution,
}

impl<H: OutputHandler> UnknownOutput<H> {
	/// Wrap `inner`, switching it to XML output until the first element.
	pub fn new(mut inner: H) -> Self {
		if inner.output_method() != OutputMethod::Xml {
			inner.set_output_method(OutputMethod::Xml);
		}
		Self {
			inner,
			state: Resolution::Undecided {
				start_document: false,
			},
		}
	}

	/// Whether the output method has been decided.
	pub fn is_resolved(&self) -> bool {
		self.state == Resolution::Resolved
	}

	pub fn get_ref(&self) -> &H {
		&self.inner
	}

	pub fn get_mut(&mut self) -> &mut H {
		&mut self.inner
	}

	pub fn into_inner(self) -> H {
		self.inner
	}

	/// Fix the output method and replay a held back `start_document`.
	fn resolve(&mut self, method: OutputMethod) -> Result<()> {
		let pending = match self.state {
			Resolution::Undecided { start_document } => start_document,
			Resolution::Resolved => return Ok(()),
		};
		self.state = Resolution::Resolved;
		log::debug!("output method resolved to {}", method);
		if self.inner.output_method() != method {
			self.inner.set_output_method(method);
		}
		if pending {
			self.inner.start_document()?;
		}
		Ok(())
	}
}

impl<H: OutputHandler> OutputHandler for UnknownOutput<H> {
	fn start_document(&mut self) -> Result<()> {
		match self.state {
			Resolution::Undecided {
				ref mut start_document,
			} => {
				*start_document = true;
				Ok(())
			}
			Resolution::Resolved => self.inner.start_document(),
		}
	}

	fn end_document(&mut self) -> Result<()> {
		self.resolve(OutputMethod::Xml)?;
		self.inner.end_document()
	}

	fn start_element(&mut self, name: &str) -> Result<()> {
		if !self.is_resolved() {
			let (_, local_name) = split_qname(name);
			let method = if local_name.eq_ignore_ascii_case("html") {
				OutputMethod::Html
			} else {
				OutputMethod::Xml
			};
			self.resolve(method)?;
		}
		self.inner.start_element(name)
	}

	fn end_element(&mut self, name: &str) -> Result<()> {
		self.inner.end_element(name)
	}

	fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
		self.inner.attribute(name, value)
	}

	fn namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
		self.inner.namespace(prefix, uri)
	}

	fn characters(&mut self, text: &str) -> Result<()> {
		self.inner.characters(text)
	}

	fn characters_from(&mut self, chars: &[char], offset: usize, length: usize) -> Result<()> {
		self.inner.characters_from(chars, offset, length)
	}

	fn comment(&mut self, text: &str) -> Result<()> {
		self.inner.comment(text)
	}

	fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
		self.inner.processing_instruction(target, data)
	}

	fn start_cdata(&mut self) -> Result<()> {
		self.inner.start_cdata()
	}

	fn end_cdata(&mut self) -> Result<()> {
		self.inner.end_cdata()
	}

	fn close(&mut self) {
		self.inner.close()
	}

	fn take_io_error(&mut self) -> Option<io::Error> {
		self.inner.take_io_error()
	}

	fn set_escaping(&mut self, escape: bool) -> bool {
		self.inner.set_escaping(escape)
	}

	fn set_doctype(&mut self, system: Option<&str>, public: Option<&str>) {
		self.inner.set_doctype(system, public)
	}

	fn set_indent(&mut self, indent: bool) {
		self.inner.set_indent(indent)
	}

	fn set_indent_number(&mut self, n: usize) {
		self.inner.set_indent_number(n)
	}

	fn omit_header(&mut self, omit: bool) {
		self.inner.omit_header(omit)
	}

	fn set_standalone(&mut self, standalone: Option<&str>) {
		self.inner.set_standalone(standalone)
	}

	fn set_version(&mut self, version: &str) {
		self.inner.set_version(version)
	}

	fn set_cdata_section_elements(&mut self, elements: CdataRegistry) {
		self.inner.set_cdata_section_elements(elements)
	}

	fn set_media_type(&mut self, media_type: &str) {
		self.inner.set_media_type(media_type)
	}

	/// Setting the method explicitly ends detection.
	fn set_output_method(&mut self, method: OutputMethod) {
		let pending = match self.state {
			Resolution::Undecided { start_document } => start_document,
			Resolution::Resolved => false,
		};
		self.state = Resolution::Resolved;
		self.inner.set_output_method(method);
		if pending {
			if let Err(e) = self.inner.start_document() {
				log::warn!("failed to replay start of document: {}", e);
			}
		}
	}

	fn output_method(&self) -> OutputMethod {
		self.inner.output_method()
	}
}
