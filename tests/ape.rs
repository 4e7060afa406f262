mod util;

use tagkit::ape::ApeFile;
use tagkit::error::TagError;
use tagkit::picture::PICTURE_KEY;
use tagkit::stream::FileStream;
use tagkit::tag::ItemValue;
use tagkit::{
	Accessor, AudioFile, FileType, ParseOptions, ParsingMode, Picture, PictureType, PropertyMap,
	TagExt, TaggedFile, WriteOptions,
};

use std::io::Cursor;
use std::time::Duration;

use pretty_assertions::assert_eq;
use util::ApeItem;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

type MemoryFile = TaggedFile<FileStream<Cursor<Vec<u8>>>>;

fn open(data: &[u8]) -> MemoryFile {
	TaggedFile::open(util::stream(data)).unwrap()
}

fn read(data: &[u8], parse_options: ParseOptions) -> tagkit::Result<ApeFile> {
	ApeFile::read_from(&mut Cursor::new(data), parse_options)
}

fn cover_item() -> ApeItem {
	let mut value = b"Front cover\0".to_vec();
	value.extend_from_slice(PNG);
	ApeItem::binary("Cover Art (Front)", &value)
}

fn sample_items() -> Vec<ApeItem> {
	vec![
		ApeItem::text("Title", "Foo title"),
		ApeItem::text("Artist", "Foo\0Bar"),
		ApeItem::text("Year", "1984-05-01"),
		ApeItem::text("Track", "3/12"),
		cover_item(),
		ApeItem::text("Comment", "locked").read_only(),
	]
}

fn saved(file: MemoryFile) -> Vec<u8> {
	util::bytes(file.into_inner())
}

#[test]
fn read_items() {
	let data = util::ape_file(&sample_items(), true);
	let file = read(&data, ParseOptions::new()).unwrap();

	assert!(file.contains_id3v1());
	assert!(!file.contains_id3v2());

	let tag = file.ape_tag();
	assert_eq!(tag.items().len(), 6);
	assert!(!tag.read_only);

	assert_eq!(tag.title(), Some("Foo title"));
	assert_eq!(tag.artist(), Some("Foo"));
	assert_eq!(tag.year(), Some(1984));
	assert_eq!(tag.track(), Some(3));
	assert_eq!(tag.comment(), Some("locked"));

	let artist = tag.get("ARTIST").unwrap();
	assert_eq!(
		artist.value(),
		&ItemValue::Text(vec![String::from("Foo"), String::from("Bar")])
	);

	assert!(tag.get("comment").unwrap().read_only);
	assert!(!tag.get("title").unwrap().read_only);
}

#[test]
fn read_properties() {
	let data = util::ape_file(&sample_items(), false);
	let file = read(&data, ParseOptions::new()).unwrap();

	let properties = file.properties();
	assert_eq!(properties.version(), 3990);
	assert_eq!(properties.channels(), 2);
	assert_eq!(properties.sample_rate(), 44100);
	assert_eq!(properties.bits_per_sample(), 16);
	assert_eq!(properties.total_samples(), 44100);
	assert_eq!(properties.duration(), Duration::from_secs(1));

	// The audio data is everything between the tags
	let audio_len = util::ape_audio().len() as u64;
	assert_eq!(u64::from(properties.bitrate()), audio_len * 8 / 1000);
	assert_eq!(u64::from(properties.overall_bitrate()), data.len() as u64 * 8 / 1000);

	let file_properties = file.file_properties();
	assert_eq!(file_properties.channels(), Some(2));
	assert_eq!(file_properties.sample_rate(), Some(44100));

	let file = read(&data, ParseOptions::new().read_properties(false)).unwrap();
	assert_eq!(file.properties().sample_rate(), 0);
	assert_eq!(file.ape_tag().title(), Some("Foo title"));
}

#[test]
fn property_map() {
	let data = util::ape_file(&sample_items(), false);
	let file = open(&data);

	let properties = file.properties();
	assert_eq!(
		properties.keys().collect::<Vec<_>>(),
		vec!["ARTIST", "COMMENT", "DATE", "TITLE", "TRACKNUMBER"]
	);
	assert_eq!(properties.get("artist").unwrap().len(), 2);
	assert_eq!(properties.unsupported(), &[String::from("Cover Art (Front)")]);
}

#[test]
fn rejected_properties() {
	let data = util::ape_file(&sample_items(), false);
	let mut file = open(&data);

	let mut properties = file.properties();
	properties.insert("A_VERY_LONG_PROPERTY", vec![String::from("value")]);
	properties.insert("ALBUMARTIST", vec![String::from("Foo")]);

	let rejected = file.set_properties(&properties);
	assert_eq!(rejected.keys().collect::<Vec<_>>(), vec!["A_VERY_LONG_PROPERTY"]);

	file.save().unwrap();

	let file = read(&saved(file), ParseOptions::new()).unwrap();
	assert_eq!(
		file.ape_tag().get("album artist").unwrap().value(),
		&ItemValue::Text(vec![String::from("Foo")])
	);
}

#[test]
fn remove_unsupported_items() {
	let data = util::ape_file(&sample_items(), false);
	let mut file = open(&data);

	let unsupported = file.properties().unsupported().to_vec();
	file.remove_unsupported_properties(&unsupported);
	assert!(file.complex_property_keys().is_empty());

	file.save().unwrap();

	let file = read(&saved(file), ParseOptions::new()).unwrap();
	assert_eq!(file.ape_tag().items().len(), 5);
	assert!(file.ape_tag().pictures().is_empty());
}

#[test]
fn save_is_idempotent() {
	let data = util::ape_file(&sample_items(), true);

	let mut file = open(&data);
	file.save().unwrap();

	assert_eq!(saved(file), data);
}

#[test]
fn property_round_trip_keeps_bytes() {
	let mut items = sample_items();
	// Both would be exported as `DATE`
	items.push(ApeItem::text("Date", "1985"));
	let data = util::ape_file(&items, true);

	let mut file = open(&data);

	let properties = file.properties();
	assert_eq!(properties.get("DATE"), Some(&[String::from("1984-05-01")][..]));
	assert!(properties.unsupported().contains(&String::from("Date")));

	assert!(file.set_properties(&properties).is_empty());
	file.save().unwrap();

	assert_eq!(saved(file), data);
}

#[test]
fn save_grows_tag() {
	let data = util::ape_file(&sample_items(), true);

	let mut file = open(&data);
	file.tag_mut()
		.set_title(String::from("A much, much longer title than before"));
	file.tag_mut().set_album(String::from("Bar album"));
	file.save().unwrap();

	let saved = saved(file);
	assert!(saved.len() > data.len());
	assert!(saved.starts_with(&util::ape_audio()));
	assert!(saved.ends_with(&util::id3v1()));

	let file = read(&saved, ParseOptions::new()).unwrap();
	assert!(file.contains_id3v1());
	assert_eq!(
		file.ape_tag().title(),
		Some("A much, much longer title than before")
	);
	assert_eq!(file.ape_tag().album(), Some("Bar album"));
	assert_eq!(file.ape_tag().items().len(), 7);
}

#[test]
fn save_shrinks_tag() {
	let data = util::ape_file(&sample_items(), true);

	let mut file = open(&data);
	let mut properties = PropertyMap::new();
	properties.insert("TITLE", vec![String::from("T")]);
	file.set_properties(&properties);
	file.save().unwrap();

	let saved = saved(file);
	assert!(saved.len() < data.len());
	assert!(saved.starts_with(&util::ape_audio()));
	assert!(saved.ends_with(&util::id3v1()));

	// The picture is not a property, and the read only comment is kept from disk
	let file = read(&saved, ParseOptions::new()).unwrap();
	let keys = file
		.ape_tag()
		.items()
		.iter()
		.map(|item| item.key().to_string())
		.collect::<Vec<_>>();

	assert_eq!(keys, vec!["Title", "Cover Art (Front)", "Comment"]);
	assert_eq!(file.ape_tag().title(), Some("T"));
}

#[test]
fn empty_tag_removes_region() {
	let items = [ApeItem::text("Title", "Foo"), cover_item()];
	let data = util::ape_file(&items, true);

	let mut file = open(&data);
	file.tag_mut().clear();
	file.save().unwrap();

	let mut expected = util::ape_audio();
	expected.extend(util::id3v1());

	assert_eq!(saved(file), expected);
}

#[test]
fn empty_tag_without_region_writes_nothing() {
	let data = util::ape_file(&[], false);

	let mut file = open(&data);
	assert!(file.tag().is_empty());
	file.save().unwrap();

	assert_eq!(saved(file), data);
}

#[test]
fn tag_is_added_before_id3v1() {
	let data = util::ape_file(&[], true);

	let mut file = open(&data);
	file.tag_mut().set_title(String::from("Foo"));
	file.save().unwrap();

	let mut expected = util::ape_audio();
	expected.extend(util::ape_tag(&[ApeItem::text("TITLE", "Foo")]));
	expected.extend(util::id3v1());

	assert_eq!(saved(file), expected);
}

#[test]
fn read_only_items_are_preserved() {
	let data = util::ape_file(&sample_items(), false);

	let mut file = open(&data);
	file.tag_mut().clear();
	file.save().unwrap();

	let mut expected = util::ape_audio();
	expected.extend(util::ape_tag(&[ApeItem::text("Comment", "locked").read_only()]));

	assert_eq!(saved(file), expected);
}

#[test]
fn read_only_items_win_over_edits() {
	let data = util::ape_file(&sample_items(), false);

	let mut file = open(&data);
	file.tag_mut().set_comment(String::from("unlocked"));
	file.save().unwrap();

	let file = read(&saved(file), ParseOptions::new()).unwrap();
	assert_eq!(file.ape_tag().comment(), Some("locked"));
	assert!(file.ape_tag().get("comment").unwrap().read_only);
}

#[test]
fn read_only_items_can_be_overwritten() {
	let data = util::ape_file(&sample_items(), false);

	let mut file = open(&data);
	file.tag_mut().clear();
	file.save_with(WriteOptions::new().preserve_read_only(false))
		.unwrap();

	assert_eq!(saved(file), util::ape_audio());
}

#[test]
fn invalid_items() {
	let items = [
		ApeItem::text("Title", "Foo"),
		// Reserved key
		ApeItem::text("ID3", "Bar"),
		ApeItem::text("Artist", "Baz"),
	];
	let data = util::ape_file(&items, false);

	let file = read(&data, ParseOptions::new()).unwrap();
	assert_eq!(file.ape_tag().items().len(), 2);
	assert_eq!(file.ape_tag().artist(), Some("Baz"));

	assert!(matches!(
		read(&data, ParseOptions::new().parsing_mode(ParsingMode::Strict)),
		Err(TagError::CorruptHeader {
			format: FileType::Ape,
			..
		})
	));

	// The item is dropped on save
	let mut file = open(&data);
	file.save().unwrap();

	let mut expected = util::ape_audio();
	expected.extend(util::ape_tag(&[
		ApeItem::text("Title", "Foo"),
		ApeItem::text("Artist", "Baz"),
	]));

	assert_eq!(saved(file), expected);
}

#[test]
fn oversized_item_count() {
	let mut data = util::ape_audio();
	let mut tag = util::ape_tag(&[ApeItem::text("Title", "Foo")]);

	// Claim a second item in the footer
	let count_offset = tag.len() - 32 + 16;
	tag[count_offset] = 2;
	data.extend(tag);

	let file = read(&data, ParseOptions::new()).unwrap();
	assert_eq!(file.ape_tag().title(), Some("Foo"));

	assert!(read(&data, ParseOptions::new().parsing_mode(ParsingMode::Strict)).is_err());
}

#[test]
fn missing_mac_header() {
	let mut data = util::ape_audio();
	data[..4].copy_from_slice(b"MAX ");

	assert!(matches!(
		read(&data, ParseOptions::new()),
		Err(TagError::CorruptHeader { .. })
	));
}

#[test]
fn pictures() {
	let data = util::ape_file(&sample_items(), false);
	let mut file = open(&data);

	assert_eq!(file.complex_property_keys(), vec![String::from(PICTURE_KEY)]);

	let pictures = file.complex_properties("picture");
	assert_eq!(pictures.len(), 1);

	let front = Picture::from_complex_property(&pictures[0]).unwrap();
	assert_eq!(front.pic_type, PictureType::CoverFront);
	assert_eq!(front.description.as_deref(), Some("Front cover"));
	assert_eq!(front.data, PNG);

	let back = Picture::new(PictureType::CoverBack, None, PNG.to_vec());
	assert!(file.set_complex_properties(PICTURE_KEY, vec![back.to_complex_property()]));
	assert!(!file.set_complex_properties("LYRICS", Vec::new()));
	file.save().unwrap();

	let file = read(&saved(file), ParseOptions::new()).unwrap();
	assert_eq!(file.ape_tag().pictures(), vec![back]);
	assert!(file.ape_tag().get("Cover Art (Front)").is_none());

	let item = file.ape_tag().get("cover art (back)").unwrap();
	assert_eq!(item.key(), "Cover Art (Back)");
	assert_eq!(item.binary().unwrap()[0], 0);
}

#[test]
fn leading_id3v2_is_kept() {
	let mut data = util::id3v2();
	data.extend(util::ape_file(&[ApeItem::text("Title", "Foo")], false));

	let mut file = open(&data);
	assert_eq!(file.file_type(), FileType::Ape);

	file.tag_mut().set_artist(String::from("Bar"));
	file.save().unwrap();

	let saved = saved(file);

	let mut prefix = util::id3v2();
	prefix.extend(util::ape_audio());
	assert!(saved.starts_with(&prefix));

	let file = read(&saved, ParseOptions::new()).unwrap();
	assert!(file.contains_id3v2());
	assert_eq!(file.ape_tag().title(), Some("Foo"));
	assert_eq!(file.ape_tag().artist(), Some("Bar"));
}

#[test]
fn tag_only_file_keeps_leading_id3v2() {
	let mut data = util::id3v2();
	data.extend(util::ape_audio());

	let mut file = open(&data);
	file.tag_mut().set_title(String::from("Foo"));
	file.save().unwrap();

	let mut file = open(&saved(file));
	file.tag_mut().clear();
	file.save().unwrap();

	assert_eq!(saved(file), data);
}
