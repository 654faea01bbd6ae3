/*!
# Streaming XML and HTML serialization

This crate writes a document which is described by a sequence of
construction events (start element, attribute, characters, ...) either as
XML or HTML markup text, or forwards it as structured events to a consumer.

## Features

* Streamed: no tree is built, each event is written right away (except for
  the open start tag, which can still take attributes)
* XML and HTML output methods, with the method optionally picked from the
  root element
* Namespace declarations with scoping and redundant declaration suppression
* CDATA section elements, with `]]>` split across sections
* Optional indentation, XML declaration, DOCTYPE and HTML `<meta>` line
* Output into a string or any [`io::Write`](std::io::Write), with I/O errors
  kept on a side channel instead of failing every event

## Example

```
use xmlout::{OutputHandler, OutputProperties};

let props = OutputProperties::default().omit_xml_declaration(true);
let mut text = String::new();
{
	let mut out = xmlout::new_output("xml", props, &mut text);
	out.start_document().unwrap();
	out.start_element("a").unwrap();
	out.attribute("id", "1").unwrap();
	out.characters("x&y").unwrap();
	out.end_element("a").unwrap();
	out.end_document().unwrap();
	out.close();
}
assert_eq!(text, "<a id=\"1\">x&amp;y</a>");
```

## High-level usage

### Text output

A [`StreamSerializer`] writes markup into an
[`OutputBuffer`](buffer::OutputBuffer): a plain [`String`], a
[`StringOutputBuffer`] or a [`WriterOutputBuffer`] which stages text in
memory before handing it to an [`io::Write`](std::io::Write).

### Event output

An [`EventSerializer`] applies the same rules (namespace scoping, CDATA
sections, attribute escaping) but hands the result to an [`EventConsumer`].

### Unknown output method

If the output method is not known up front, [`new_output`] wraps the
serializer in an [`UnknownOutput`], which selects HTML if the root element
is called `html` and XML otherwise.
*/
pub mod backend;
pub mod buffer;
pub mod cdata;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod handler;
pub mod namespaces;
pub mod properties;
pub mod serializer;
pub mod tag;
pub mod unknown;


#[doc(inline)]
pub use backend::{Backend, EventAttribute, EventBackend, EventConsumer, TextBackend};
#[doc(inline)]
pub use buffer::{OutputBuffer, StringOutputBuffer, WriterOutputBuffer};
#[doc(inline)]
pub use cdata::CdataRegistry;
#[doc(inline)]
pub use encoding::EncodingProfile;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use handler::OutputHandler;
#[doc(inline)]
pub use namespaces::NamespaceScope;
#[doc(inline)]
pub use properties::{Doctype, OutputMethod, OutputProperties};
#[doc(inline)]
pub use serializer::Serializer;
#[doc(inline)]
pub use unknown::UnknownOutput;

/// Package version
pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

/// Serializer writing markup text into an [`OutputBuffer`].
pub type StreamSerializer<O> = Serializer<TextBackend<O>>;

/// Serializer forwarding structured events to an [`EventConsumer`].
pub type EventSerializer<C> = Serializer<EventBackend<C>>;

/**
Create a text serializer for the output method called `method`.

`"xml"` and `"html"` (in any case) select the respective method; any other
name, including the empty one, defers the decision to the first element
through [`UnknownOutput`].

The returned handler owns `out`; pass `&mut String` (or another borrowed
buffer) to read the text once the handler is dropped.

```
use xmlout::{OutputHandler, OutputMethod, OutputProperties};

let out = xmlout::new_output("", OutputProperties::default(), String::new());
assert_eq!(out.output_method(), OutputMethod::Xml);
```
*/
pub fn new_output<'a, O: OutputBuffer + 'a>(
	method: &str,
	props: OutputProperties,
	out: O,
) -> Box<dyn OutputHandler + 'a> {
	match OutputMethod::from_name(method) {
		Some(method) => Box::new(StreamSerializer::text(method, props, out)),
		None => {
			log::debug!("output method {:?} not known, detecting from root element", method);
			Box::new(UnknownOutput::new(StreamSerializer::text(
				OutputMethod::Xml,
				props,
				out,
			)))
		}
	}
}
