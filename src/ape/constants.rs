use crate::tag::store::KeyRules;

pub(crate) const APE_PREAMBLE: &[u8; 8] = b"APETAGEX";

// Header and footer share the same layout
pub(crate) const FOOTER_SIZE: u32 = 32;
pub(crate) const ID3V1_SIZE: u64 = 128;

pub(crate) const APE_VERSION_1: u32 = 1000;
pub(crate) const APE_VERSION_2: u32 = 2000;

// Tag flags
pub(crate) const FLAG_READ_ONLY: u32 = 1;
pub(crate) const FLAG_IS_HEADER: u32 = 1 << 29;
pub(crate) const FLAG_HAS_FOOTER: u32 = 1 << 30;
pub(crate) const FLAG_HAS_HEADER: u32 = 1 << 31;

pub(crate) const APE_KEY_RULES: KeyRules = KeyRules {
	min_len: 2,
	max_len: 255,
	property_max_len: 16,
	reserved: &["ID3", "TAG", "OGGS", "MP+"],
	renames: &[
		("TRACK", "TRACKNUMBER"),
		("YEAR", "DATE"),
		("ALBUM ARTIST", "ALBUMARTIST"),
		("DISC", "DISCNUMBER"),
		("REMIXER", "MIXARTIST"),
		("RELEASESTATUS", "MUSICBRAINZ_ALBUMSTATUS"),
		("RELEASETYPE", "MUSICBRAINZ_ALBUMTYPE"),
	],
};
