#[path = "../tests/util/mod.rs"]
mod util;

use tagkit::{FileType, ParseOptions, Probe, TaggedFile};

use criterion::{criterion_group, criterion_main, Criterion};
use util::ApeItem;

use std::io::Cursor;

fn ape_data() -> Vec<u8> {
	let items = [
		ApeItem::text("Title", "Foo title"),
		ApeItem::text("Artist", "Foo\0Bar"),
		ApeItem::text("Album", "Baz"),
		ApeItem::binary("Cover Art (Front)", &[0x89; 4096]),
	];

	util::ape_file(&items, true)
}

fn content_infer_read(c: &mut Criterion) {
	let xm = util::xm_module().build();
	let ape = ape_data();

	let mut g = c.benchmark_group("File reading (Inferred from Content)");
	g.bench_function("XM", |b| {
		b.iter(|| {
			Probe::new(Cursor::new(&xm))
				.guess_file_type()
				.unwrap()
				.read(ParseOptions::new())
				.unwrap()
		})
	});
	g.bench_function("APE", |b| {
		b.iter(|| {
			Probe::new(Cursor::new(&ape))
				.guess_file_type()
				.unwrap()
				.read(ParseOptions::new())
				.unwrap()
		})
	});
}

fn save(c: &mut Criterion) {
	let xm = util::xm_module().build();
	let ape = ape_data();

	let mut g = c.benchmark_group("File saving");
	g.bench_function("XM (patch)", |b| {
		b.iter(|| {
			let stream = util::stream(&xm);
			let mut file =
				TaggedFile::open_with(stream, Some(FileType::Xm), ParseOptions::new()).unwrap();
			file.save().unwrap();
		})
	});
	g.bench_function("APE (splice)", |b| {
		b.iter(|| {
			let stream = util::stream(&ape);
			let mut file =
				TaggedFile::open_with(stream, Some(FileType::Ape), ParseOptions::new()).unwrap();
			file.tag_mut().clear();
			file.save().unwrap();
		})
	});
}

criterion_group!(benches, content_infer_read, save);
criterion_main!(benches);
