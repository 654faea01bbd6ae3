/*!
# Output encodings

The serializers never transcode; they always produce UTF-8 text. The
encoding name is only used for the XML declaration and the HTML `<meta>`
line, plus one escaping decision: characters above U+00FF are written as
character references when the encoding belongs to the ISO-8859-1 family.
*/
use std::fmt;

/// Canonical encoding names and their recognised aliases.
///
/// Lookups are ASCII case-insensitive.
static ENCODINGS: &'static [(&'static str, &'static [&'static str])] = &[
	("UTF-8", &["utf-8", "utf8"]),
	("UTF-16", &["utf-16", "utf16"]),
	("US-ASCII", &["us-ascii", "ascii", "iso646-us"]),
	(
		"ISO-8859-1",
		&["iso-8859-1", "iso8859-1", "iso_8859-1", "latin1", "l1"],
	),
	("ISO-8859-2", &["iso-8859-2", "latin2", "l2"]),
	("ISO-8859-3", &["iso-8859-3", "latin3", "l3"]),
	("ISO-8859-4", &["iso-8859-4", "latin4", "l4"]),
	("ISO-8859-5", &["iso-8859-5", "cyrillic"]),
	("ISO-8859-6", &["iso-8859-6", "arabic"]),
	("ISO-8859-7", &["iso-8859-7", "greek"]),
	("ISO-8859-8", &["iso-8859-8", "hebrew"]),
	("ISO-8859-9", &["iso-8859-9", "latin5", "l5"]),
	("ISO-8859-15", &["iso-8859-15", "latin9", "latin-9"]),
	("windows-1252", &["windows-1252", "cp1252"]),
];

/// Canonical name of the ISO-8859-1 encoding.
pub const ISO_8859_1: &'static str = "ISO-8859-1";

/// Canonical name of the fallback encoding.
pub const UTF_8: &'static str = "UTF-8";

fn canonical_name(name: &str) -> Option<&'static str> {
	let name = name.trim();
	ENCODINGS
		.iter()
		.find(|(_, aliases)| aliases.iter().any(|a| a.eq_ignore_ascii_case(name)))
		.map(|(canonical, _)| *canonical)
}

/**
Resolved output encoding.

```rust
use xmlout::EncodingProfile;

let enc = EncodingProfile::resolve("latin1");
assert_eq!(enc.name(), "ISO-8859-1");
assert!(enc.is_narrow_legacy());

// unknown names fall back to UTF-8
let enc = EncodingProfile::resolve("x-klingon");
assert_eq!(enc.name(), "UTF-8");
```
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingProfile {
	name: &'static str,
	narrow_legacy: bool,
}

impl EncodingProfile {
	/// Resolve an encoding name to its canonical form.
	///
	/// Unrecognised names resolve to UTF-8.
	pub fn resolve(name: &str) -> EncodingProfile {
		let name = match canonical_name(name) {
			Some(v) => v,
			None => {
				log::warn!("unsupported output encoding {:?}, using {}", name, UTF_8);
				UTF_8
			}
		};
		EncodingProfile {
			name,
			narrow_legacy: name == ISO_8859_1,
		}
	}

	pub fn utf8() -> EncodingProfile {
		EncodingProfile {
			name: UTF_8,
			narrow_legacy: false,
		}
	}

	/// Canonical name, as written into the XML declaration.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Whether characters above U+00FF have to be written as character
	/// references.
	pub fn is_narrow_legacy(&self) -> bool {
		self.narrow_legacy
	}
}

impl Default for EncodingProfile {
	fn default() -> Self {
		Self::utf8()
	}
}

impl fmt::Display for EncodingProfile {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn canonicalises_case_insensitively() {
		assert_eq!(EncodingProfile::resolve("utf-8").name(), "UTF-8");
		assert_eq!(EncodingProfile::resolve("UTF8").name(), "UTF-8");
		assert_eq!(EncodingProfile::resolve("Iso-8859-1").name(), "ISO-8859-1");
		assert_eq!(EncodingProfile::resolve("CP1252").name(), "windows-1252");
	}

	#[test]
	fn only_latin1_family_is_narrow() {
		assert!(EncodingProfile::resolve("ISO-8859-1").is_narrow_legacy());
		assert!(EncodingProfile::resolve("l1").is_narrow_legacy());
		assert!(!EncodingProfile::resolve("iso-8859-2").is_narrow_legacy());
		assert!(!EncodingProfile::resolve("utf-8").is_narrow_legacy());
		assert!(!EncodingProfile::resolve("us-ascii").is_narrow_legacy());
	}

	#[test]
	fn falls_back_to_utf8() {
		let enc = EncodingProfile::resolve("");
		assert_eq!(enc, EncodingProfile::utf8());
		assert_eq!(enc.to_string(), "UTF-8");
	}
}
