/*!
# The serializer state machine

[`Serializer`] implements [`OutputHandler`] once for all backends. It keeps
the open start tag, the namespace scope and the CDATA state, and decides
what has to be written; the [`Backend`] performs the actual write.
*/
use std::io;
use std::mem;

use crate::backend::{
	Backend, EventBackend, EventConsumer, QualifiedName, ResolvedTag, Settings, TextBackend,
};
use crate::buffer::OutputBuffer;
use crate::cdata::{CdataRegistry, CdataSections, CdataTracker};
use crate::error::{Error, Result};
use crate::handler::OutputHandler;
use crate::namespaces::{Declaration, NamespaceScope, PREFIX_XMLNS};
use crate::properties::{OutputMethod, OutputProperties};
use crate::tag::{split_qname, PendingStartTag};

fn resolve_name<'a>(
	ns: &'a NamespaceScope,
	method: OutputMethod,
	qname: &'a str,
	attribute: bool,
) -> Result<QualifiedName<'a>> {
	if method == OutputMethod::Html {
		return Ok(QualifiedName {
			qname,
			uri: "",
			local_name: qname,
		});
	}
	let (prefix, local_name) = split_qname(qname);
	let uri = if prefix.is_empty() {
		// unprefixed attributes are never in the default namespace
		if attribute {
			""
		} else {
			ns.lookup("").unwrap_or("")
		}
	} else {
		match ns.lookup(prefix) {
			Some(uri) => uri,
			None => return Err(Error::NamespacePrefixUndeclared(prefix.into())),
		}
	};
	Ok(QualifiedName {
		qname,
		uri,
		local_name,
	})
}

fn resolve_tag<'a>(
	ns: &'a NamespaceScope,
	method: OutputMethod,
	tag: &'a PendingStartTag,
) -> Result<ResolvedTag<'a>> {
	let name = resolve_name(ns, method, tag.name(), false)?;
	let mut attributes = Vec::with_capacity(tag.attributes().len());
	for attr in tag.attributes() {
		attributes.push((
			resolve_name(ns, method, &attr.name, true)?,
			attr.value.as_str(),
		));
	}
	Ok(ResolvedTag {
		name,
		attributes,
		namespaces: tag.namespaces(),
		depth: tag.depth(),
	})
}

/**
Document serializer.

Use [`StreamSerializer`](crate::StreamSerializer) to produce markup text and
[`EventSerializer`](crate::EventSerializer) to forward structured events.

```rust
use xmlout::{OutputHandler, OutputMethod, OutputProperties, StreamSerializer};

let props = OutputProperties::default().omit_xml_declaration(true);
let mut s = StreamSerializer::text(OutputMethod::Xml, props, String::new());
s.start_document().unwrap();
s.start_element("a").unwrap();
s.attribute("id", "1").unwrap();
s.characters("x&y").unwrap();
s.end_element("a").unwrap();
s.end_document().unwrap();
assert_eq!(s.into_output(), "<a id=\"1\">x&amp;y</a>");
```
*/
#[derive(Debug)]
pub struct Serializer<B: Backend> {
	method: OutputMethod,
	props: OutputProperties,
	ns: NamespaceScope,
	cdata: CdataTracker,
	// Some while a start tag is open
	tag: Option<PendingStartTag>,
	depth: usize,
	// a CDATA section is open in the output
	cdata_open: bool,
	// the open CDATA section was requested with start_cdata
	cdata_explicit: bool,
	first_element: bool,
	backend: B,
}

impl<B: Backend> Serializer<B> {
	pub fn new(method: OutputMethod, props: OutputProperties, backend: B) -> Self {
		Self {
			method,
			props,
			ns: NamespaceScope::new(),
			cdata: CdataTracker::new(),
			tag: None,
			depth: 0,
			cdata_open: false,
			cdata_explicit: false,
			first_element: true,
			backend,
		}
	}

	pub fn properties(&self) -> &OutputProperties {
		&self.props
	}

	pub fn properties_mut(&mut self) -> &mut OutputProperties {
		&mut self.props
	}

	/// Namespace bindings currently in scope (XML only).
	pub fn namespaces(&self) -> &NamespaceScope {
		&self.ns
	}

	/// Number of open elements.
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Whether a start tag is open and can still take attributes.
	pub fn has_open_tag(&self) -> bool {
		self.tag.is_some()
	}

	pub fn backend(&self) -> &B {
		&self.backend
	}

	pub fn backend_mut(&mut self) -> &mut B {
		&mut self.backend
	}

	pub fn into_backend(self) -> B {
		self.backend
	}

	/// Write the open start tag, if any. Returns whether a tag was open.
	fn flush_tag(&mut self, empty: bool) -> Result<bool> {
		let tag = match self.tag.take() {
			Some(tag) => tag,
			None => return Ok(false),
		};
		let resolved = resolve_tag(&self.ns, self.method, &tag)?;
		if !empty
			&& self.method == OutputMethod::Xml
			&& self
				.props
				.cdata_section_elements
				.contains(resolved.name.uri, resolved.name.local_name)
		{
			self.cdata.push(tag.depth());
		}
		let settings = Settings::new(self.method, &self.props);
		self.backend.start_tag(&settings, &resolved, empty);
		Ok(true)
	}

	fn close_cdata(&mut self) {
		if self.cdata_open {
			let settings = Settings::new(self.method, &self.props);
			self.backend.end_cdata(&settings);
			self.cdata_open = false;
			self.cdata_explicit = false;
		}
	}

	fn write_cdata(&mut self, text: &str) {
		let settings = Settings::new(self.method, &self.props);
		if !self.cdata_open {
			self.backend.start_cdata(&settings);
			self.cdata_open = true;
		}
		for (i, piece) in CdataSections::new(text).enumerate() {
			if i > 0 {
				log::debug!("splitting CDATA section at \"]]>\"");
				self.backend.end_cdata(&settings);
				self.backend.start_cdata(&settings);
			}
			self.backend.cdata_text(&settings, piece);
		}
	}

	fn reset(&mut self) {
		self.ns = NamespaceScope::new();
		self.cdata.clear();
		self.tag = None;
		self.depth = 0;
		self.cdata_open = false;
		self.cdata_explicit = false;
		self.backend.reset();
	}
}

impl<O: OutputBuffer> Serializer<TextBackend<O>> {
	/// Create a serializer writing markup into `out`.
	pub fn text(method: OutputMethod, props: OutputProperties, out: O) -> Self {
		Self::new(method, props, TextBackend::new(out))
	}

	pub fn output(&self) -> &O {
		self.backend.get_ref()
	}

	/// Release the destination, including any text still staged.
	pub fn into_output(self) -> O {
		self.backend.into_inner()
	}
}

impl<C: EventConsumer> Serializer<EventBackend<C>> {
	/// Create a serializer forwarding events to `consumer`.
	pub fn events(method: OutputMethod, props: OutputProperties, consumer: C) -> Self {
		Self::new(method, props, EventBackend::new(consumer))
	}

	pub fn consumer(&self) -> &C {
		self.backend.get_ref()
	}

	pub fn into_consumer(self) -> C {
		self.backend.into_inner()
	}
}

impl<B: Backend> OutputHandler for Serializer<B> {
	fn start_document(&mut self) -> Result<()> {
		let settings = Settings::new(self.method, &self.props);
		self.backend.start_document(&settings);
		Ok(())
	}

	fn end_document(&mut self) -> Result<()> {
		self.flush_tag(false)?;
		self.close_cdata();
		let settings = Settings::new(self.method, &self.props);
		self.backend.end_document(&settings);
		Ok(())
	}

	fn start_element(&mut self, name: &str) -> Result<()> {
		self.flush_tag(false)?;
		self.close_cdata();
		let first = mem::replace(&mut self.first_element, false);
		let settings = Settings::new(self.method, &self.props);
		self.backend.before_element(&settings, name, first);
		self.depth += 1;
		self.tag = Some(PendingStartTag::new(
			name,
			self.depth,
			self.method == OutputMethod::Html,
		));
		Ok(())
	}

	fn end_element(&mut self, name: &str) -> Result<()> {
		self.close_cdata();
		if !self.flush_tag(true)? {
			let ename = resolve_name(&self.ns, self.method, name, false)?;
			let settings = Settings::new(self.method, &self.props);
			self.backend.end_tag(&settings, &ename, self.depth);
		}
		self.cdata.pop(self.depth);
		for prefix in self.ns.close_scope(self.depth) {
			self.backend.undeclare_prefix(&prefix);
		}
		self.depth = self.depth.saturating_sub(1);
		Ok(())
	}

	fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
		if self.tag.is_none() {
			return Err(Error::StrayAttribute(name.into()));
		}
		if self.method == OutputMethod::Xml {
			if name == PREFIX_XMLNS {
				return self.namespace("", value);
			}
			if let Some(prefix) = name.strip_prefix("xmlns:") {
				return self.namespace(prefix, value);
			}
		}
		if let Some(tag) = self.tag.as_mut() {
			tag.set_attribute(name, value);
		}
		Ok(())
	}

	fn namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
		let tag = match self.tag.as_mut() {
			Some(tag) => tag,
			None if prefix.is_empty() && uri.is_empty() => return Ok(()),
			None => {
				return Err(Error::StrayNamespace {
					prefix: prefix.into(),
					uri: uri.to_string(),
				})
			}
		};
		if self.method == OutputMethod::Html {
			return Ok(());
		}
		match self.ns.declare(prefix, uri, self.depth) {
			Declaration::Unchanged => (),
			Declaration::Added => {
				tag.add_namespace(prefix, uri);
				self.backend.declare_prefix(prefix, uri);
			}
			Declaration::Replaced => {
				tag.add_namespace(prefix, uri);
				self.backend.undeclare_prefix(prefix);
				self.backend.declare_prefix(prefix, uri);
			}
		}
		Ok(())
	}

	fn characters(&mut self, text: &str) -> Result<()> {
		self.flush_tag(false)?;
		if text.is_empty() {
			return Ok(());
		}
		if self.cdata_explicit || self.cdata.is_active(self.depth) {
			self.write_cdata(text);
		} else {
			let settings = Settings::new(self.method, &self.props);
			self.backend.text(&settings, text, self.props.escaping);
		}
		Ok(())
	}

	fn comment(&mut self, text: &str) -> Result<()> {
		self.flush_tag(false)?;
		self.close_cdata();
		let settings = Settings::new(self.method, &self.props);
		self.backend.comment(&settings, text);
		Ok(())
	}

	fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
		self.flush_tag(false)?;
		self.close_cdata();
		let settings = Settings::new(self.method, &self.props);
		self.backend.processing_instruction(&settings, target, data);
		Ok(())
	}

	fn start_cdata(&mut self) -> Result<()> {
		self.flush_tag(false)?;
		if !self.cdata_open {
			let settings = Settings::new(self.method, &self.props);
			self.backend.start_cdata(&settings);
			self.cdata_open = true;
		}
		self.cdata_explicit = true;
		Ok(())
	}

	fn end_cdata(&mut self) -> Result<()> {
		self.close_cdata();
		Ok(())
	}

	fn close(&mut self) {
		if let Err(e) = self.backend.close() {
			log::warn!("ignoring error while closing output: {}", e);
		}
	}

	fn take_io_error(&mut self) -> Option<io::Error> {
		self.backend.take_error()
	}

	fn set_escaping(&mut self, escape: bool) -> bool {
		mem::replace(&mut self.props.escaping, escape)
	}

	fn set_doctype(&mut self, system: Option<&str>, public: Option<&str>) {
		self.props.doctype.system = system.map(|v| v.to_string());
		self.props.doctype.public = public.map(|v| v.to_string());
	}

	fn set_indent(&mut self, indent: bool) {
		self.props.indent = indent;
	}

	fn set_indent_number(&mut self, n: usize) {
		self.props.indent_number = n;
	}

	fn omit_header(&mut self, omit: bool) {
		self.props.omit_xml_declaration = omit;
	}

	fn set_standalone(&mut self, standalone: Option<&str>) {
		self.props.standalone = standalone.map(|v| v.to_string());
	}

	fn set_version(&mut self, version: &str) {
		self.props.version = version.to_string();
	}

	fn set_cdata_section_elements(&mut self, elements: CdataRegistry) {
		self.props.cdata_section_elements = elements;
	}

	fn set_media_type(&mut self, media_type: &str) {
		self.props.media_type = media_type.to_string();
	}

	fn set_output_method(&mut self, method: OutputMethod) {
		self.method = method;
		self.reset();
	}

	fn output_method(&self) -> OutputMethod {
		self.method
	}
}
