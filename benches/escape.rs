use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use xmlout::escape::{escape_html_attr, escape_url, escape_xml_attr, escape_xml_text};
use xmlout::{OutputHandler, OutputMethod, OutputProperties, StreamSerializer, StringOutputBuffer};

static PLAIN: &'static str = "The quick brown fox jumps over the lazy dog and keeps running through the night. ";
static MARKUP: &'static str = "if (a < b && c > d) { x = \"<tag>\" & 'y'; }\n";
static NON_ASCII: &'static str = "Grüße aus Köln, naïve café, €100, \u{85}control ";

fn escaping(c: &mut Criterion) {
	let mut group = c.benchmark_group("escaping");

	for (name, sample) in &[("plain", PLAIN), ("markup", MARKUP), ("non-ascii", NON_ASCII)] {
		let data = sample.repeat(64);
		group.bench_with_input(BenchmarkId::new("xml text", name), &data, |b, data| {
			b.iter(|| {
				let mut out = StringOutputBuffer::with_capacity(data.len() * 2);
				escape_xml_text(&mut out, black_box(data), false);
				out
			});
		});
		group.bench_with_input(BenchmarkId::new("xml attribute", name), &data, |b, data| {
			let mut out = String::with_capacity(data.len() * 2);
			b.iter(|| {
				out.clear();
				escape_xml_attr(&mut out, black_box(data), true);
			});
		});
		group.bench_with_input(BenchmarkId::new("html attribute", name), &data, |b, data| {
			let mut out = String::with_capacity(data.len() * 2);
			b.iter(|| {
				out.clear();
				escape_html_attr(&mut out, black_box(data), false);
			});
		});
		group.bench_with_input(BenchmarkId::new("url", name), &data, |b, data| {
			let mut out = String::with_capacity(data.len() * 3);
			b.iter(|| {
				out.clear();
				escape_url(&mut out, black_box(data));
			});
		});
	}
}

fn document(c: &mut Criterion) {
	c.bench_function("serialize 1000 elements", |b| {
		b.iter(|| {
			let props = OutputProperties::default().indent(true);
			let mut s = StreamSerializer::text(OutputMethod::Xml, props, String::with_capacity(65536));
			s.start_document().unwrap();
			s.start_element("root").unwrap();
			s.namespace("p", "urn:example").unwrap();
			for i in 0..1000 {
				s.start_element("p:item").unwrap();
				s.attribute("n", black_box(&i.to_string())).unwrap();
				s.characters(black_box(MARKUP)).unwrap();
				s.end_element("p:item").unwrap();
			}
			s.end_element("root").unwrap();
			s.end_document().unwrap();
			s.into_output()
		});
	});
}

criterion_group!{
	name = benches;
	config = Criterion::default().sample_size(100);
	targets = escaping, document
}
criterion_main!(benches);
