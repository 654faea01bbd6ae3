/*!
# Event forwarding backend

Instead of writing text, the [`EventBackend`] hands the document to an
[`EventConsumer`] as a sequence of structured events.

Attribute values are passed on escaped, the way they would appear in the
text output. Character data is passed on unescaped.
*/
use crate::backend::{Backend, QualifiedName, ResolvedTag, Settings};
use crate::escape::escape_attribute;

/// An attribute as passed to [`EventConsumer::start_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventAttribute<'a> {
	pub uri: &'a str,
	pub local_name: &'a str,
	pub qname: &'a str,
	/// Escaped value
	pub value: &'a str,
}

/// Receiver of serializer events.
///
/// All methods default to doing nothing.
#[allow(unused_variables)]
pub trait EventConsumer {
	/// Called once, before any other event.
	fn start_document(&mut self) {}

	fn end_document(&mut self) {}

	/// Called before the first element if document type identifiers are
	/// configured.
	fn doctype(&mut self, name: &str, public: Option<&str>, system: Option<&str>) {}

	/// Called before the `start_element` of the element declaring the
	/// binding.
	fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) {}

	/// Called after the `end_element` of the element which declared the
	/// binding.
	fn end_prefix_mapping(&mut self, prefix: &str) {}

	fn start_element(
		&mut self,
		uri: &str,
		local_name: &str,
		qname: &str,
		attributes: &[EventAttribute],
	) {
	}

	/// Called for every element, including HTML empty elements.
	fn end_element(&mut self, uri: &str, local_name: &str, qname: &str) {}

	fn characters(&mut self, text: &str) {}

	fn comment(&mut self, text: &str) {}

	fn processing_instruction(&mut self, target: &str, data: &str) {}

	fn start_cdata(&mut self) {}

	fn end_cdata(&mut self) {}
}

impl<T: EventConsumer + ?Sized> EventConsumer for &mut T {
	fn start_document(&mut self) {
		(**self).start_document()
	}

	fn end_document(&mut self) {
		(**self).end_document()
	}

	fn doctype(&mut self, name: &str, public: Option<&str>, system: Option<&str>) {
		(**self).doctype(name, public, system)
	}

	fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) {
		(**self).start_prefix_mapping(prefix, uri)
	}

	fn end_prefix_mapping(&mut self, prefix: &str) {
		(**self).end_prefix_mapping(prefix)
	}

	fn start_element(
		&mut self,
		uri: &str,
		local_name: &str,
		qname: &str,
		attributes: &[EventAttribute],
	) {
		(**self).start_element(uri, local_name, qname, attributes)
	}

	fn end_element(&mut self, uri: &str, local_name: &str, qname: &str) {
		(**self).end_element(uri, local_name, qname)
	}

	fn characters(&mut self, text: &str) {
		(**self).characters(text)
	}

	fn comment(&mut self, text: &str) {
		(**self).comment(text)
	}

	fn processing_instruction(&mut self, target: &str, data: &str) {
		(**self).processing_instruction(target, data)
	}

	fn start_cdata(&mut self) {
		(**self).start_cdata()
	}

	fn end_cdata(&mut self) {
		(**self).end_cdata()
	}
}

/// Backend forwarding to an [`EventConsumer`].
///
/// `start_document` is passed on lazily, right before the first other event,
/// and at most once.
#[derive(Debug)]
pub struct EventBackend<C: EventConsumer> {
	consumer: C,
	started: bool,
}

impl<C: EventConsumer> EventBackend<C> {
	pub fn new(consumer: C) -> Self {
		Self {
			consumer,
			started: false,
		}
	}

	pub fn get_ref(&self) -> &C {
		&self.consumer
	}

	pub fn get_mut(&mut self) -> &mut C {
		&mut self.consumer
	}

	pub fn into_inner(self) -> C {
		self.consumer
	}

	fn ensure_started(&mut self) -> &mut C {
		if !self.started {
			self.started = true;
			self.consumer.start_document();
		}
		&mut self.consumer
	}
}

impl<C: EventConsumer> Backend for EventBackend<C> {
	fn start_document(&mut self, _settings: &Settings) {}

	fn end_document(&mut self, _settings: &Settings) {
		self.ensure_started().end_document();
	}

	fn before_element(&mut self, settings: &Settings, name: &str, first: bool) {
		let consumer = self.ensure_started();
		if first && settings.has_doctype() {
			let doctype = &settings.props.doctype;
			consumer.doctype(name, doctype.public.as_deref(), doctype.system.as_deref());
		}
	}

	fn start_tag(&mut self, settings: &Settings, tag: &ResolvedTag, empty: bool) {
		let narrow = settings.narrow();
		let values: Vec<String> = tag
			.attributes
			.iter()
			.map(|(name, value)| {
				let mut escaped = String::with_capacity(value.len());
				escape_attribute(&mut escaped, settings.method, name.qname, value, narrow);
				escaped
			})
			.collect();
		let attributes: Vec<EventAttribute> = tag
			.attributes
			.iter()
			.zip(values.iter())
			.map(|((name, _), value)| EventAttribute {
				uri: name.uri,
				local_name: name.local_name,
				qname: name.qname,
				value: value.as_str(),
			})
			.collect();

		let consumer = self.ensure_started();
		let name = &tag.name;
		consumer.start_element(name.uri, name.local_name, name.qname, &attributes);
		if empty {
			consumer.end_element(name.uri, name.local_name, name.qname);
		}
	}

	fn end_tag(&mut self, _settings: &Settings, name: &QualifiedName, _depth: usize) {
		self.ensure_started()
			.end_element(name.uri, name.local_name, name.qname);
	}

	fn text(&mut self, _settings: &Settings, text: &str, _escape: bool) {
		self.ensure_started().characters(text);
	}

	fn start_cdata(&mut self, _settings: &Settings) {
		self.ensure_started().start_cdata();
	}

	fn cdata_text(&mut self, _settings: &Settings, text: &str) {
		self.ensure_started().characters(text);
	}

	fn end_cdata(&mut self, _settings: &Settings) {
		self.ensure_started().end_cdata();
	}

	fn comment(&mut self, _settings: &Settings, text: &str) {
		self.ensure_started().comment(text);
	}

	fn processing_instruction(&mut self, _settings: &Settings, target: &str, data: &str) {
		self.ensure_started().processing_instruction(target, data);
	}

	fn declare_prefix(&mut self, prefix: &str, uri: &str) {
		self.ensure_started().start_prefix_mapping(prefix, uri);
	}

	fn undeclare_prefix(&mut self, prefix: &str) {
		self.ensure_started().end_prefix_mapping(prefix);
	}
}
