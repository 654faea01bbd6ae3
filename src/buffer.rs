/*!
# Output buffers

The serializers assemble markup through the [`OutputBuffer`] trait. This
decouples the text assembly from the destination: an in-memory
[`StringOutputBuffer`], a [`WriterOutputBuffer`] wrapping any
[`io::Write`], or a plain [`String`].

Buffers which own an I/O destination never let write errors escape through
`append_*`. The first error is retained and can be fetched with
[`OutputBuffer::take_error`].
*/
use std::io;
use std::str;

use bytes::{Buf, BufMut, BytesMut};

/// Amount of staged bytes after which a [`WriterOutputBuffer`] hands data to
/// its writer.
pub const FLUSH_THRESHOLD: usize = 32 * 1024;

/// Maximum size of a single write call issued by a [`WriterOutputBuffer`].
pub const WRITE_CHUNK: usize = 8 * 1024;

/// Append-only sink for serialized text.
pub trait OutputBuffer {
	/// Append a string.
	fn append_str(&mut self, s: &str);

	/// Append a single character.
	fn append_char(&mut self, ch: char) {
		let mut tmp = [0u8; 4];
		self.append_str(ch.encode_utf8(&mut tmp));
	}

	/// Hand all staged content to the destination.
	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}

	/// Flush and release the destination.
	///
	/// Calling this more than once is harmless.
	fn close(&mut self) -> io::Result<()> {
		self.flush()
	}

	/// Return the first I/O error which was swallowed while appending, if
	/// any, and clear it.
	fn take_error(&mut self) -> Option<io::Error> {
		None
	}
}

impl OutputBuffer for String {
	fn append_str(&mut self, s: &str) {
		self.push_str(s);
	}

	fn append_char(&mut self, ch: char) {
		self.push(ch);
	}
}

impl<T: OutputBuffer + ?Sized> OutputBuffer for &mut T {
	fn append_str(&mut self, s: &str) {
		(**self).append_str(s)
	}

	fn append_char(&mut self, ch: char) {
		(**self).append_char(ch)
	}

	fn flush(&mut self) -> io::Result<()> {
		(**self).flush()
	}

	fn close(&mut self) -> io::Result<()> {
		(**self).close()
	}

	fn take_error(&mut self) -> Option<io::Error> {
		(**self).take_error()
	}
}

/**
In-memory output buffer.

```rust
use xmlout::buffer::{OutputBuffer, StringOutputBuffer};

let mut buf = StringOutputBuffer::new();
buf.append_str("<a>");
buf.append_char('x');
assert_eq!(buf.as_str(), "<a>x");
```
*/
#[derive(Debug, Default, Clone)]
pub struct StringOutputBuffer {
	buf: BytesMut,
}

impl StringOutputBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(cap: usize) -> Self {
		Self {
			buf: BytesMut::with_capacity(cap),
		}
	}

	/// Access the text accumulated so far.
	pub fn as_str(&self) -> &str {
		// only `str` data is ever appended, so the buffer is always valid
		// UTF-8 at call boundaries
		unsafe { str::from_utf8_unchecked(&self.buf[..]) }
	}

	pub fn len(&self) -> usize {
		self.buf.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Consume the buffer, returning the accumulated text.
	pub fn into_string(self) -> String {
		self.as_str().to_string()
	}
}

impl OutputBuffer for StringOutputBuffer {
	fn append_str(&mut self, s: &str) {
		self.buf.put_slice(s.as_bytes());
	}

	fn append_char(&mut self, ch: char) {
		if ch.is_ascii() {
			self.buf.put_u8(ch as u8);
		} else {
			let mut tmp = [0u8; 4];
			self.buf.put_slice(ch.encode_utf8(&mut tmp).as_bytes());
		}
	}
}

/**
Output buffer wrapping an [`io::Write`].

Text is staged in memory and handed to the writer once
[`FLUSH_THRESHOLD`] bytes have accumulated, on [`flush`] and on [`close`].
Each write call passes at most [`WRITE_CHUNK`] bytes.

After the first write error, staged data is discarded and further appends
are dropped; the error is kept for [`take_error`]. If the buffer is dropped
without having been closed, it closes itself and discards the result.

```rust
use xmlout::buffer::{OutputBuffer, WriterOutputBuffer};

let mut sink = Vec::new();
{
	let mut buf = WriterOutputBuffer::new(&mut sink);
	buf.append_str("<a/>");
	buf.close().unwrap();
}
assert_eq!(&sink[..], b"<a/>");
```

   [`flush`]: OutputBuffer::flush
   [`close`]: OutputBuffer::close
   [`take_error`]: OutputBuffer::take_error
*/
pub struct WriterOutputBuffer<W: io::Write> {
	inner: W,
	staged: BytesMut,
	error: Option<io::Error>,
	closed: bool,
}

impl<W: io::Write> WriterOutputBuffer<W> {
	pub fn new(inner: W) -> Self {
		Self {
			inner,
			staged: BytesMut::with_capacity(WRITE_CHUNK),
			error: None,
			closed: false,
		}
	}

	pub fn get_ref(&self) -> &W {
		&self.inner
	}

	pub fn get_mut(&mut self) -> &mut W {
		&mut self.inner
	}

	/// Number of bytes staged but not yet handed to the writer.
	pub fn staged(&self) -> usize {
		self.staged.len()
	}

	fn write_staged(&mut self) -> io::Result<()> {
		while self.staged.has_remaining() {
			let n = std::cmp::min(WRITE_CHUNK, self.staged.len());
			log::trace!("writing chunk of {} bytes", n);
			self.inner.write_all(&self.staged[..n])?;
			self.staged.advance(n);
		}
		Ok(())
	}

	fn record(&mut self, e: io::Error) {
		log::warn!("discarding output after write error: {}", e);
		self.staged.clear();
		if self.error.is_none() {
			self.error = Some(e);
		}
	}
}

impl<W: io::Write> OutputBuffer for WriterOutputBuffer<W> {
	fn append_str(&mut self, s: &str) {
		if self.error.is_some() || self.closed {
			return;
		}
		self.staged.put_slice(s.as_bytes());
		if self.staged.len() >= FLUSH_THRESHOLD {
			if let Err(e) = self.write_staged() {
				self.record(e);
			}
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		if let Some(e) = self.error.as_ref() {
			return Err(io::Error::new(e.kind(), e.to_string()));
		}
		let result = self.write_staged().and_then(|()| self.inner.flush());
		if let Err(e) = result.as_ref() {
			self.record(io::Error::new(e.kind(), e.to_string()));
		}
		result
	}

	fn close(&mut self) -> io::Result<()> {
		if self.closed {
			return Ok(());
		}
		let result = self.flush();
		self.closed = true;
		result
	}

	fn take_error(&mut self) -> Option<io::Error> {
		self.error.take()
	}
}

impl<W: io::Write> Drop for WriterOutputBuffer<W> {
	fn drop(&mut self) {
		if !self.closed {
			if let Err(e) = self.close() {
				log::warn!("ignoring error while closing output on drop: {}", e);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct FailingWriter {
		writes: usize,
	}

	impl io::Write for FailingWriter {
		fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
			self.writes += 1;
			Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	struct ChunkRecorder {
		chunks: Vec<usize>,
	}

	impl io::Write for ChunkRecorder {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			self.chunks.push(buf.len());
			Ok(buf.len())
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn string_buffer_accumulates_text() {
		let mut buf = StringOutputBuffer::new();
		buf.append_str("a");
		buf.append_char('ä');
		buf.append_char('<');
		assert_eq!(buf.as_str(), "aä<");
		assert_eq!(buf.len(), 4);
		assert_eq!(buf.into_string(), "aä<");
	}

	#[test]
	fn writer_buffer_holds_content_until_flush() {
		let mut sink = Vec::new();
		let mut buf = WriterOutputBuffer::new(&mut sink);
		buf.append_str("hello");
		assert_eq!(buf.staged(), 5);
		assert!(buf.get_ref().is_empty());
		buf.flush().unwrap();
		assert_eq!(buf.staged(), 0);
		assert_eq!(&buf.get_ref()[..], b"hello");
	}

	#[test]
	fn writer_buffer_writes_in_bounded_chunks() {
		let mut buf = WriterOutputBuffer::new(ChunkRecorder { chunks: Vec::new() });
		let text = "x".repeat(FLUSH_THRESHOLD - 1);
		buf.append_str(&text);
		assert!(buf.get_ref().chunks.is_empty());
		buf.append_str("yy");
		assert!(buf.get_ref().chunks.len() > 1);
		assert!(buf.get_ref().chunks.iter().all(|n| *n <= WRITE_CHUNK));
		let total: usize = buf.get_ref().chunks.iter().sum();
		assert_eq!(total, FLUSH_THRESHOLD + 1);
	}

	#[test]
	fn writer_buffer_close_is_idempotent() {
		let mut sink = Vec::new();
		{
			let mut buf = WriterOutputBuffer::new(&mut sink);
			buf.append_str("<a/>");
			buf.close().unwrap();
			buf.close().unwrap();
			buf.append_str("ignored");
		}
		assert_eq!(&sink[..], b"<a/>");
	}

	#[test]
	fn writer_buffer_closes_on_drop() {
		let mut sink = Vec::new();
		{
			let mut buf = WriterOutputBuffer::new(&mut sink);
			buf.append_str("text");
		}
		assert_eq!(&sink[..], b"text");
	}

	#[test]
	fn writer_buffer_keeps_first_error_on_side_channel() {
		let mut buf = WriterOutputBuffer::new(FailingWriter { writes: 0 });
		buf.append_str(&"z".repeat(FLUSH_THRESHOLD));
		assert_eq!(buf.get_ref().writes, 1);
		// dropped after the error, no further writes attempted
		buf.append_str(&"z".repeat(FLUSH_THRESHOLD));
		assert_eq!(buf.get_ref().writes, 1);
		assert!(buf.close().is_err());
		match buf.take_error() {
			Some(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
			None => panic!("error was not retained"),
		}
		assert!(buf.take_error().is_none());
	}
}
