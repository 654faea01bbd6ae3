/*!
# Escaping

Pure functions which write the escaped form of text and attribute values
into an [`OutputBuffer`]. Each function makes a single pass over its input
and copies unescaped runs in one piece.

The rules depend on the output method and on whether the output encoding is
a narrow legacy encoding (see [`EncodingProfile::is_narrow_legacy`]):

* C1 control characters (U+007F up to, excluding, U+009F) are always written
  as decimal character references.
* With a narrow legacy encoding, everything above U+00FF is written as a
  decimal character reference, too.

   [`EncodingProfile::is_narrow_legacy`]: crate::EncodingProfile::is_narrow_legacy
*/
use crate::buffer::OutputBuffer;
use crate::properties::OutputMethod;

const HEX_DIGITS: &'static [u8; 16] = b"0123456789ABCDEF";

/// Characters which are percent-escaped in URL attributes in addition to
/// controls, space and non-ASCII.
const URL_SPECIALS: &'static [char] = &['{', '}', '|', '\\', '^', '~', '[', ']', '`', '"'];

/// HTML attributes whose values are URLs.
const URL_ATTRIBUTES: &'static [&'static str] = &["href", "src", "cite"];

enum Replacement {
	Str(&'static str),
	CharRef(u32),
	Percent(char),
}

#[inline]
fn needs_char_ref(ch: char, narrow: bool) -> bool {
	let cp = ch as u32;
	(cp >= 0x7f && cp < 0x9f) || (narrow && cp > 0xff)
}

fn put_char_ref<O: OutputBuffer + ?Sized>(out: &mut O, cp: u32) {
	let mut digits = [0u8; 10];
	let mut n = cp;
	let mut i = digits.len();
	loop {
		i -= 1;
		digits[i] = b'0' + (n % 10) as u8;
		n /= 10;
		if n == 0 {
			break;
		}
	}
	out.append_str("&#");
	for d in &digits[i..] {
		out.append_char(*d as char);
	}
	out.append_char(';');
}

fn put_percent<O: OutputBuffer + ?Sized>(out: &mut O, ch: char) {
	let mut tmp = [0u8; 4];
	for &b in ch.encode_utf8(&mut tmp).as_bytes() {
		out.append_char('%');
		out.append_char(HEX_DIGITS[(b >> 4) as usize] as char);
		out.append_char(HEX_DIGITS[(b & 0xf) as usize] as char);
	}
}

/// Core loop shared by all escaping functions.
///
/// `select` sees each character together with the remainder of the input
/// following it.
fn escape_with<O, F>(out: &mut O, data: &str, select: F)
where
	O: OutputBuffer + ?Sized,
	F: Fn(char, &str) -> Option<Replacement>,
{
	let mut last_index = 0;
	for (i, ch) in data.char_indices() {
		let next = i + ch.len_utf8();
		let replacement = match select(ch, &data[next..]) {
			Some(v) => v,
			None => continue,
		};
		if i > last_index {
			out.append_str(&data[last_index..i]);
		}
		match replacement {
			Replacement::Str(s) => out.append_str(s),
			Replacement::CharRef(cp) => put_char_ref(out, cp),
			Replacement::Percent(ch) => put_percent(out, ch),
		}
		last_index = next;
	}
	if last_index < data.len() {
		out.append_str(&data[last_index..]);
	}
}

/// Escape character data for the XML output method.
pub fn escape_xml_text<O: OutputBuffer + ?Sized>(out: &mut O, data: &str, narrow: bool) {
	escape_with(out, data, |ch, _| match ch {
		'&' => Some(Replacement::Str("&amp;")),
		'<' => Some(Replacement::Str("&lt;")),
		'>' => Some(Replacement::Str("&gt;")),
		ch if needs_char_ref(ch, narrow) => Some(Replacement::CharRef(ch as u32)),
		_ => None,
	})
}

/// Escape an attribute value for the XML output method.
///
/// The value is assumed to be enclosed in double quotes.
pub fn escape_xml_attr<O: OutputBuffer + ?Sized>(out: &mut O, data: &str, narrow: bool) {
	escape_with(out, data, |ch, _| match ch {
		'&' => Some(Replacement::Str("&amp;")),
		'<' => Some(Replacement::Str("&lt;")),
		'>' => Some(Replacement::Str("&gt;")),
		'"' => Some(Replacement::Str("&quot;")),
		'\n' => Some(Replacement::Str("&#xA;")),
		ch if needs_char_ref(ch, narrow) => Some(Replacement::CharRef(ch as u32)),
		_ => None,
	})
}

/// Escape character data for the HTML output method.
pub fn escape_html_text<O: OutputBuffer + ?Sized>(out: &mut O, data: &str, narrow: bool) {
	escape_with(out, data, |ch, _| match ch {
		'&' => Some(Replacement::Str("&amp;")),
		'<' => Some(Replacement::Str("&lt;")),
		'>' => Some(Replacement::Str("&gt;")),
		'\u{a0}' => Some(Replacement::Str("&nbsp;")),
		ch if needs_char_ref(ch, narrow) => Some(Replacement::CharRef(ch as u32)),
		_ => None,
	})
}

/// Escape a non-URL attribute value for the HTML output method.
///
/// `<` and `>` are kept literally. `&` is kept when it introduces a `&{`
/// script macro.
pub fn escape_html_attr<O: OutputBuffer + ?Sized>(out: &mut O, data: &str, narrow: bool) {
	escape_with(out, data, |ch, rest| match ch {
		'&' if rest.starts_with('{') => None,
		'&' => Some(Replacement::Str("&amp;")),
		'"' => Some(Replacement::Str("&quot;")),
		ch if needs_char_ref(ch, narrow) => Some(Replacement::CharRef(ch as u32)),
		_ => None,
	})
}

/// Percent-escape a URL attribute value for the HTML output method.
///
/// Controls, space, non-ASCII characters (as their UTF-8 bytes) and the
/// characters `{}|\^~[]`"` are escaped; everything else passes.
pub fn escape_url<O: OutputBuffer + ?Sized>(out: &mut O, data: &str) {
	escape_with(out, data, |ch, _| {
		let cp = ch as u32;
		if cp <= 0x20 || cp > 0x7f || URL_SPECIALS.contains(&ch) {
			Some(Replacement::Percent(ch))
		} else {
			None
		}
	})
}

/// Whether an HTML attribute carries a URL and is subject to
/// [`escape_url`].
pub fn is_url_attribute(name: &str) -> bool {
	URL_ATTRIBUTES.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// Escape character data according to the output method.
pub fn escape_text<O: OutputBuffer + ?Sized>(
	out: &mut O,
	method: OutputMethod,
	data: &str,
	narrow: bool,
) {
	match method {
		OutputMethod::Xml => escape_xml_text(out, data, narrow),
		OutputMethod::Html => escape_html_text(out, data, narrow),
	}
}

/// Escape an attribute value according to the output method and, for HTML,
/// the attribute name.
pub fn escape_attribute<O: OutputBuffer + ?Sized>(
	out: &mut O,
	method: OutputMethod,
	name: &str,
	value: &str,
	narrow: bool,
) {
	match method {
		OutputMethod::Xml => escape_xml_attr(out, value, narrow),
		OutputMethod::Html if is_url_attribute(name) => escape_url(out, value),
		OutputMethod::Html => escape_html_attr(out, value, narrow),
	}
}

/// Write comment text so that it cannot terminate the comment early.
///
/// Every `-` followed by another `-` or by the end of the text gets a space
/// appended.
pub fn write_comment_text<O: OutputBuffer + ?Sized>(out: &mut O, data: &str) {
	escape_with(out, data, |ch, rest| {
		if ch == '-' && (rest.is_empty() || rest.starts_with('-')) {
			Some(Replacement::Str("- "))
		} else {
			None
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn xml_text(s: &str) -> String {
		let mut out = String::new();
		escape_xml_text(&mut out, s, false);
		out
	}

	fn xml_attr(s: &str) -> String {
		let mut out = String::new();
		escape_xml_attr(&mut out, s, false);
		out
	}

	fn html_text(s: &str) -> String {
		let mut out = String::new();
		escape_html_text(&mut out, s, false);
		out
	}

	fn url(s: &str) -> String {
		let mut out = String::new();
		escape_url(&mut out, s);
		out
	}

	fn comment(s: &str) -> String {
		let mut out = String::new();
		write_comment_text(&mut out, s);
		out
	}

	fn xml_unescape(s: &str) -> String {
		let mut out = String::new();
		let mut rest = s;
		while let Some(pos) = rest.find('&') {
			out.push_str(&rest[..pos]);
			let end = rest[pos..].find(';').unwrap() + pos;
			let entity = &rest[pos + 1..end];
			match entity {
				"amp" => out.push('&'),
				"lt" => out.push('<'),
				"gt" => out.push('>'),
				"quot" => out.push('"'),
				"#xA" => out.push('\n'),
				other => {
					let cp: u32 = other[1..].parse().unwrap();
					out.push(std::char::from_u32(cp).unwrap());
				}
			}
			rest = &rest[end + 1..];
		}
		out.push_str(rest);
		out
	}

	#[test]
	fn xml_text_escapes_markup_characters() {
		assert_eq!(xml_text("x&y"), "x&amp;y");
		assert_eq!(xml_text("<a>"), "&lt;a&gt;");
		assert_eq!(xml_text("\"quoted\"\n"), "\"quoted\"\n");
		assert_eq!(xml_text("plain"), "plain");
		assert_eq!(xml_text(""), "");
	}

	#[test]
	fn xml_attr_escapes_quotes_and_newlines() {
		assert_eq!(xml_attr("a\"b\nc"), "a&quot;b&#xA;c");
		assert_eq!(xml_attr("<&>"), "&lt;&amp;&gt;");
	}

	#[test]
	fn c1_controls_become_decimal_references() {
		assert_eq!(xml_text("a\u{7f}b"), "a&#127;b");
		assert_eq!(xml_text("\u{85}"), "&#133;");
		// U+009F itself is outside the escaped range
		assert_eq!(xml_text("\u{9f}"), "\u{9f}");
		assert_eq!(html_text("\u{80}"), "&#128;");
	}

	#[test]
	fn narrow_encoding_escapes_above_latin1() {
		let mut out = String::new();
		escape_xml_text(&mut out, "é€", true);
		assert_eq!(out, "é&#8364;");
		let mut out = String::new();
		escape_xml_text(&mut out, "é€", false);
		assert_eq!(out, "é€");
		let mut out = String::new();
		escape_html_attr(&mut out, "\u{1f600}", true);
		assert_eq!(out, "&#128512;");
	}

	#[test]
	fn html_text_uses_nbsp_entity() {
		assert_eq!(html_text("a\u{a0}b & c"), "a&nbsp;b &amp; c");
		assert_eq!(html_text("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
	}

	#[test]
	fn html_attr_keeps_angle_brackets_and_script_macros() {
		let mut out = String::new();
		escape_html_attr(&mut out, "a<b>&c&{x}", false);
		assert_eq!(out, "a<b>&amp;c&{x}");
	}

	#[test]
	fn url_escaping() {
		assert_eq!(url("a b"), "a%20b");
		assert_eq!(url("\t"), "%09");
		assert_eq!(url("x\"y"), "x%22y");
		assert_eq!(url("{}|\\^~[]`"), "%7B%7D%7C%5C%5E%7E%5B%5D%60");
		assert_eq!(url("/path?q=1&r=2#frag"), "/path?q=1&r=2#frag");
		assert_eq!(url("é"), "%C3%A9");
		assert_eq!(url("ß"), "%C3%9F");
		assert_eq!(url("\u{20ac}"), "%E2%82%AC");
		assert_eq!(url("\u{1f600}"), "%F0%9F%98%80");
	}

	#[test]
	fn url_escaping_only_for_url_attributes() {
		let mut out = String::new();
		escape_attribute(&mut out, OutputMethod::Html, "HREF", "a b", false);
		assert_eq!(out, "a%20b");
		let mut out = String::new();
		escape_attribute(&mut out, OutputMethod::Html, "title", "a b", false);
		assert_eq!(out, "a b");
		let mut out = String::new();
		escape_attribute(&mut out, OutputMethod::Xml, "href", "a b", false);
		assert_eq!(out, "a b");
	}

	#[test]
	fn comment_text_is_kept_well_formed() {
		assert_eq!(comment("a--b"), "a- -b");
		assert_eq!(comment("trailing-"), "trailing- ");
		assert_eq!(comment("---"), "- - - ");
		assert_eq!(comment("a-b"), "a-b");
	}

	#[test]
	fn xml_escaping_roundtrips() {
		let samples = [
			"",
			"plain text",
			"a & b < c > d",
			"&amp; is already escaped",
			"quotes \" and 'apostrophes'\nnew line",
			"controls \u{7f}\u{80}\u{9e}",
			"unicode äöü € \u{1f600}",
		];
		for s in samples.iter() {
			let escaped = xml_text(s);
			assert!(!escaped.contains('<'));
			assert!(!escaped.contains('>'));
			for (i, _) in escaped.match_indices('&') {
				assert!(escaped[i..].contains(';'), "bare & in {:?}", escaped);
			}
			assert_eq!(xml_unescape(&escaped), *s);
			assert_eq!(xml_unescape(&xml_attr(s)), *s);
		}
	}
}
