use super::ape_tag::ApeTag;
use super::ApeHeader;
use crate::ape::constants::{APE_KEY_RULES, FOOTER_SIZE};
use crate::ape::read::corrupt;
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::tag::item::{ItemValue, TagItem};

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

// An item as framed in the tag, before its key and value are checked
struct RawItem<'a> {
	flags: u32,
	key: &'a [u8],
	value: &'a [u8],
}

/// Read the items of a tag, the reader must be at the start of the items
///
/// Items that can't be represented (bad key, bad UTF-8, unknown type) are skipped with
/// [`ParsingMode::BestAttempt`], an item that doesn't fit in the tag ends the read.
pub(crate) fn read_ape_tag<R>(
	data: &mut R,
	header: ApeHeader,
	parse_options: ParseOptions,
) -> Result<ApeTag>
where
	R: Read + ?Sized,
{
	let items_len = header.size - FOOTER_SIZE;

	let mut items = Vec::new();
	Read::take(&mut *data, u64::from(items_len)).read_to_end(&mut items)?;

	if items.len() != items_len as usize {
		return Err(corrupt("Tag is shorter than its declared size"));
	}

	let strict = parse_options.parsing_mode == ParsingMode::Strict;

	let mut tag = ApeTag::new();
	tag.read_only = header.read_only();

	let mut content = &items[..];
	for index in 0..header.item_count {
		let raw = match read_raw_item(&mut content) {
			Some(raw) => raw,
			None if strict => return Err(corrupt("Tag item exceeds the tag size")),
			None => {
				log::warn!(
					"APE: Item {index} exceeds the tag size, keeping the first {} items",
					tag.items.len()
				);
				break;
			},
		};

		match parse_item(raw) {
			Ok(item) => {
				log::trace!("APE: Read item {:?} ({:?})", item.key(), item.kind());
				tag.items.insert_unchecked(item);
			},
			Err(message) if strict => return Err(corrupt(message)),
			Err(message) => log::warn!("APE: Skipping item {index}: {message}"),
		}
	}

	Ok(tag)
}

fn read_raw_item<'a>(content: &mut &'a [u8]) -> Option<RawItem<'a>> {
	let value_size = content.read_u32::<LittleEndian>().ok()? as usize;
	let flags = content.read_u32::<LittleEndian>().ok()?;

	let key_end = content.iter().position(|b| *b == 0)?;
	let (key, rest) = content.split_at(key_end);

	// The key terminator
	let rest = &rest[1..];
	if rest.len() < value_size {
		return None;
	}

	let (value, rest) = rest.split_at(value_size);
	*content = rest;

	Some(RawItem { flags, key, value })
}

fn parse_item(raw: RawItem<'_>) -> std::result::Result<TagItem, &'static str> {
	let key = std::str::from_utf8(raw.key).map_err(|_| "Tag item contains a non UTF-8 key")?;

	if !APE_KEY_RULES.is_valid_key(key) {
		return Err("Tag item contains an illegal key");
	}

	if raw.value.is_empty() {
		return Err("Tag item value has an invalid size (0)");
	}

	let text = |value: &[u8], message| {
		std::str::from_utf8(value)
			.map(|value| value.split('\0').map(String::from).collect::<Vec<_>>())
			.map_err(|_| message)
	};

	let value = match (raw.flags >> 1) & 3 {
		0 => ItemValue::Text(text(
			raw.value,
			"Expected a string value based on flags, found binary data",
		)?),
		1 => ItemValue::Binary(raw.value.to_vec()),
		2 => ItemValue::Locator(text(
			raw.value,
			"Failed to convert locator item into a UTF-8 string",
		)?),
		_ => return Err("Tag item contains an invalid item type"),
	};

	let mut item = TagItem::new(key, value);
	if raw.flags & 1 == 1 {
		item.set_read_only();
	}

	Ok(item)
}

#[cfg(test)]
mod tests {
	use super::{parse_item, read_raw_item, RawItem};
	use crate::tag::item::ItemValue;

	use pretty_assertions::assert_eq;

	fn item(flags: u32, key: &[u8], value: &[u8]) -> Vec<u8> {
		let mut item = (value.len() as u32).to_le_bytes().to_vec();
		item.extend_from_slice(&flags.to_le_bytes());
		item.extend_from_slice(key);
		item.push(0);
		item.extend_from_slice(value);
		item
	}

	#[test]
	fn framing() {
		let mut data = item(0, b"Title", b"Foo");
		data.extend(item(2, b"Cover Art (Front)", b"\0\x89PNG"));

		let content = &mut &data[..];

		let first = read_raw_item(content).unwrap();
		assert_eq!((first.flags, first.key, first.value), (0, &b"Title"[..], &b"Foo"[..]));

		let second = read_raw_item(content).unwrap();
		assert_eq!(second.key, b"Cover Art (Front)");
		assert!(content.is_empty());
		assert!(read_raw_item(content).is_none());

		// Value runs past the end
		let data = item(0, b"Title", b"Foo");
		assert!(read_raw_item(&mut &data[..data.len() - 1]).is_none());
	}

	fn raw<'a>(flags: u32, key: &'a [u8], value: &'a [u8]) -> RawItem<'a> {
		RawItem { flags, key, value }
	}

	#[test]
	fn item_values() {
		let multi = parse_item(raw(0, b"Artist", b"A\0B")).unwrap();
		assert_eq!(
			multi.value(),
			&ItemValue::Text(vec![String::from("A"), String::from("B")])
		);
		assert!(!multi.read_only);

		let locator = parse_item(raw(5, b"Related", b"http://a")).unwrap();
		assert_eq!(locator.value(), &ItemValue::Locator(vec![String::from("http://a")]));
		assert!(locator.read_only);

		assert!(parse_item(raw(0, b"ID3", b"x")).is_err());
		assert!(parse_item(raw(0, b"T", b"x")).is_err());
		assert!(parse_item(raw(0, b"Title", b"")).is_err());
		assert!(parse_item(raw(0, b"Title", b"\xFF\xFE")).is_err());
		assert!(parse_item(raw(6, b"Title", b"x")).is_err());
		assert!(parse_item(raw(2, b"Title", b"\xFF\xFE")).is_ok());
	}
}
