/*!
# Markup text backend

Writes XML or HTML markup into an [`OutputBuffer`].

Output produced before the first element (comments, processing
instructions) is staged separately, so that the XML declaration, if any, is
always the first thing in the document.
*/
use std::io;

use crate::backend::{Backend, QualifiedName, ResolvedTag, Settings};
use crate::buffer::OutputBuffer;
use crate::cdata::{CDATA_END, CDATA_START};
use crate::escape::{escape_attribute, escape_text, escape_xml_attr, write_comment_text};
use crate::properties::OutputMethod;
use crate::tag::{is_html_empty_element, is_html_raw_text_element};

/// Upper bound on the number of spaces written for a single indentation.
pub const MAX_INDENT: usize = 64;

static SPACES: &'static str = "                                                                ";

#[derive(Debug, Clone, Default)]
struct Indenter {
	level: usize,
	// an element was written at the current level, so the next start tag
	// goes onto a new line
	linefeed_next_start: bool,
	// the last thing written was an end tag or a child element, so the next
	// end tag goes onto a new line
	indent_next_end: bool,
}

fn write_linefeed<O: OutputBuffer + ?Sized>(out: &mut O, level: usize, width: usize) {
	out.append_char('\n');
	let n = std::cmp::min(level.saturating_mul(width), MAX_INDENT);
	out.append_str(&SPACES[..n]);
}

/**
Backend writing markup text.

The header, DOCTYPE and HTML `<meta>` line are derived from the
[`OutputProperties`](crate::OutputProperties) at the time they are written.
*/
#[derive(Debug)]
pub struct TextBackend<O: OutputBuffer> {
	out: O,
	// Some until the first element is opened
	prolog: Option<String>,
	header_pending: bool,
	indent: Indenter,
	// depth of the innermost open HTML script or style element
	raw_text: Option<usize>,
}

impl<O: OutputBuffer> TextBackend<O> {
	pub fn new(out: O) -> Self {
		Self {
			out,
			prolog: Some(String::new()),
			header_pending: false,
			indent: Indenter::default(),
			raw_text: None,
		}
	}

	/// Access the destination.
	///
	/// Text written before the first element stays staged until that element
	/// or the end of the document.
	pub fn get_ref(&self) -> &O {
		&self.out
	}

	pub fn get_mut(&mut self) -> &mut O {
		&mut self.out
	}

	/// Release the destination, including any text still staged.
	pub fn into_inner(mut self) -> O {
		if let Some(prolog) = self.prolog.take() {
			self.out.append_str(&prolog);
		}
		self.out
	}

	fn sink(&mut self) -> &mut dyn OutputBuffer {
		match self.prolog.as_mut() {
			Some(prolog) => prolog,
			None => &mut self.out,
		}
	}

	fn write_header(&mut self, settings: &Settings) {
		let props = settings.props;
		self.out.append_str("<?xml version=\"");
		self.out.append_str(&props.version);
		self.out.append_str("\" encoding=\"");
		self.out.append_str(props.encoding.name());
		self.out.append_char('"');
		if let Some(standalone) = props.standalone.as_ref() {
			self.out.append_str(" standalone=\"");
			self.out.append_str(standalone);
			self.out.append_char('"');
		}
		self.out.append_str("?>\n");
	}

	fn release_prolog(&mut self, settings: &Settings) {
		let prolog = match self.prolog.take() {
			Some(v) => v,
			None => return,
		};
		if self.header_pending {
			self.header_pending = false;
			self.write_header(settings);
		}
		self.out.append_str(&prolog);
	}

	fn write_doctype(&mut self, settings: &Settings, name: &str) {
		if !settings.has_doctype() {
			return;
		}
		let doctype = &settings.props.doctype;
		let out = &mut self.out;
		out.append_str("<!DOCTYPE ");
		out.append_str(name);
		match (doctype.public.as_ref(), doctype.system.as_ref()) {
			(Some(public), system) => {
				out.append_str(" PUBLIC \"");
				out.append_str(public);
				out.append_char('"');
				if let Some(system) = system {
					out.append_str(" \"");
					out.append_str(system);
					out.append_char('"');
				}
			}
			(None, Some(system)) => {
				out.append_str(" SYSTEM \"");
				out.append_str(system);
				out.append_char('"');
			}
			(None, None) => (),
		}
		out.append_str(">\n");
	}

	fn write_meta(&mut self, settings: &Settings) {
		if settings.props.indent {
			write_linefeed(
				&mut self.out,
				self.indent.level,
				settings.props.indent_number,
			);
			self.indent.linefeed_next_start = true;
			self.indent.indent_next_end = true;
		}
		let out = &mut self.out;
		out.append_str("<meta http-equiv=\"Content-Type\" content=\"");
		out.append_str(&settings.props.media_type);
		out.append_str("; charset=");
		out.append_str(settings.props.encoding.name());
		out.append_str("\">");
	}

	fn end_indent(&mut self, settings: &Settings, empty: bool) {
		if !settings.props.indent {
			return;
		}
		self.indent.level = self.indent.level.saturating_sub(1);
		if !empty && self.indent.indent_next_end {
			write_linefeed(
				&mut self.out,
				self.indent.level,
				settings.props.indent_number,
			);
		}
		self.indent.indent_next_end = true;
		self.indent.linefeed_next_start = true;
	}
}

impl<O: OutputBuffer> Backend for TextBackend<O> {
	fn start_document(&mut self, settings: &Settings) {
		if settings.method == OutputMethod::Xml
			&& !settings.props.omit_xml_declaration
			&& self.prolog.is_some()
		{
			self.header_pending = true;
		}
	}

	fn end_document(&mut self, settings: &Settings) {
		self.release_prolog(settings);
		if let Err(e) = self.out.flush() {
			log::warn!("ignoring error while flushing output: {}", e);
		}
	}

	fn before_element(&mut self, settings: &Settings, name: &str, first: bool) {
		self.release_prolog(settings);
		if first {
			self.write_doctype(settings, name);
		}
		if !settings.props.indent {
			return;
		}
		if !(settings.is_html() && is_html_empty_element(name)) {
			if self.indent.linefeed_next_start {
				write_linefeed(
					&mut self.out,
					self.indent.level,
					settings.props.indent_number,
				);
			}
			self.indent.linefeed_next_start = true;
			self.indent.indent_next_end = false;
		}
		self.indent.level += 1;
	}

	fn start_tag(&mut self, settings: &Settings, tag: &ResolvedTag, empty: bool) {
		let narrow = settings.narrow();
		let name = tag.name.qname;
		let out = &mut self.out;
		out.append_char('<');
		out.append_str(name);
		for decl in tag.namespaces.iter() {
			out.append_str(" xmlns");
			if !decl.prefix.is_empty() {
				out.append_char(':');
				out.append_str(&decl.prefix);
			}
			out.append_str("=\"");
			escape_xml_attr(out, &decl.uri, narrow);
			out.append_char('"');
		}
		for (attr, value) in tag.attributes.iter() {
			out.append_char(' ');
			out.append_str(attr.qname);
			out.append_str("=\"");
			escape_attribute(out, settings.method, attr.qname, value, narrow);
			out.append_char('"');
		}

		match settings.method {
			OutputMethod::Xml if empty => {
				self.out.append_str("/>");
				self.end_indent(settings, true);
			}
			OutputMethod::Xml => self.out.append_char('>'),
			OutputMethod::Html => {
				let void = is_html_empty_element(name);
				self.out.append_char('>');
				if !void && name.eq_ignore_ascii_case("head") {
					self.write_meta(settings);
				}
				if empty {
					if !void {
						self.end_indent(settings, false);
						self.out.append_str("</");
						self.out.append_str(name);
						self.out.append_char('>');
					} else if settings.props.indent {
						self.indent.level = self.indent.level.saturating_sub(1);
					}
				} else if self.raw_text.is_none() && is_html_raw_text_element(name) {
					self.raw_text = Some(tag.depth);
				}
			}
		}
	}

	fn end_tag(&mut self, settings: &Settings, name: &QualifiedName, depth: usize) {
		if self.raw_text == Some(depth) {
			self.raw_text = None;
		}
		if settings.is_html() && is_html_empty_element(name.qname) {
			if settings.props.indent {
				self.indent.level = self.indent.level.saturating_sub(1);
			}
			return;
		}
		self.end_indent(settings, false);
		self.out.append_str("</");
		self.out.append_str(name.qname);
		self.out.append_char('>');
	}

	fn text(&mut self, settings: &Settings, text: &str, escape: bool) {
		let raw = !escape || (settings.is_html() && self.raw_text.is_some());
		let narrow = settings.narrow();
		let out = self.sink();
		if raw {
			out.append_str(text);
		} else {
			escape_text(out, settings.method, text, narrow);
		}
		self.indent.linefeed_next_start = false;
		self.indent.indent_next_end = false;
	}

	fn start_cdata(&mut self, _settings: &Settings) {
		self.sink().append_str(CDATA_START);
	}

	fn cdata_text(&mut self, _settings: &Settings, text: &str) {
		self.sink().append_str(text);
		self.indent.linefeed_next_start = false;
		self.indent.indent_next_end = false;
	}

	fn end_cdata(&mut self, _settings: &Settings) {
		self.sink().append_str(CDATA_END);
	}

	fn comment(&mut self, _settings: &Settings, text: &str) {
		let out = self.sink();
		out.append_str("<!--");
		write_comment_text(out, text);
		out.append_str("-->");
	}

	fn processing_instruction(&mut self, settings: &Settings, target: &str, data: &str) {
		let out = self.sink();
		out.append_str("<?");
		out.append_str(target);
		if !data.is_empty() {
			out.append_char(' ');
			out.append_str(data);
		}
		match settings.method {
			OutputMethod::Xml => out.append_str("?>"),
			OutputMethod::Html => out.append_char('>'),
		}
	}

	fn reset(&mut self) {
		self.indent = Indenter::default();
		self.raw_text = None;
	}

	fn close(&mut self) -> io::Result<()> {
		if let Some(prolog) = self.prolog.take() {
			self.out.append_str(&prolog);
		}
		self.out.close()
	}

	fn take_error(&mut self) -> Option<io::Error> {
		self.out.take_error()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::properties::OutputProperties;

	#[test]
	fn prolog_is_staged_behind_header() {
		let props = OutputProperties::default();
		let settings = Settings::new(OutputMethod::Xml, &props);
		let mut b = TextBackend::new(String::new());
		b.comment(&settings, "early");
		b.start_document(&settings);
		assert_eq!(b.get_ref(), "");
		b.before_element(&settings, "a", true);
		assert_eq!(
			b.get_ref(),
			"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!--early-->"
		);
	}

	#[test]
	fn header_is_not_written_after_root() {
		let props = OutputProperties::default();
		let settings = Settings::new(OutputMethod::Xml, &props);
		let mut b = TextBackend::new(String::new());
		b.before_element(&settings, "a", true);
		b.start_document(&settings);
		b.end_document(&settings);
		assert_eq!(b.get_ref(), "");
	}

	#[test]
	fn into_inner_releases_staged_text() {
		let props = OutputProperties::default();
		let settings = Settings::new(OutputMethod::Xml, &props);
		let mut b = TextBackend::new(String::new());
		b.processing_instruction(&settings, "pi", "");
		assert_eq!(b.into_inner(), "<?pi?>");
	}

	#[test]
	fn indentation_is_capped() {
		let mut out = String::new();
		write_linefeed(&mut out, 100, 4);
		assert_eq!(out.len(), MAX_INDENT + 1);
		assert!(out.starts_with('\n'));
	}

	#[test]
	fn doctype_with_public_and_system_id() {
		let props = OutputProperties::default()
			.doctype_public("-//W3C//DTD XHTML 1.0 Strict//EN")
			.doctype_system("xhtml1-strict.dtd");
		let settings = Settings::new(OutputMethod::Xml, &props);
		let mut b = TextBackend::new(String::new());
		b.before_element(&settings, "html", true);
		assert_eq!(
			b.get_ref(),
			"<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"xhtml1-strict.dtd\">\n"
		);
	}

	#[test]
	fn xml_doctype_requires_system_id() {
		let props = OutputProperties::default().doctype_public("-//X//Y");
		let settings = Settings::new(OutputMethod::Xml, &props);
		let mut b = TextBackend::new(String::new());
		b.before_element(&settings, "a", true);
		assert_eq!(b.get_ref(), "");

		let settings = Settings::new(OutputMethod::Html, &props);
		let mut b = TextBackend::new(String::new());
		b.before_element(&settings, "html", true);
		assert_eq!(b.get_ref(), "<!DOCTYPE html PUBLIC \"-//X//Y\">\n");
	}
}
