use crate::file::FileProperties;

/// An XM file's audio properties
///
/// These are the scalars of the module header, tracker modules have no fixed duration.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct XmProperties {
	pub(crate) version: u16,
	pub(crate) length_in_patterns: u16,
	pub(crate) restart_position: u16,
	pub(crate) channels: u16,
	pub(crate) pattern_count: u16,
	pub(crate) instrument_count: u16,
	pub(crate) sample_count: u32,
	pub(crate) flags: u16,
	pub(crate) tempo: u16,
	pub(crate) bpm_speed: u16,
	pub(crate) sample_data_length: u64,
}

impl From<&XmProperties> for FileProperties {
	fn from(input: &XmProperties) -> Self {
		Self {
			channels: u8::try_from(input.channels).ok(),
			..FileProperties::default()
		}
	}
}

impl XmProperties {
	/// Format version, `0x0104` for the current revision
	pub fn version(&self) -> u16 {
		self.version
	}

	/// Song length, in entries of the pattern order table
	pub fn length_in_patterns(&self) -> u16 {
		self.length_in_patterns
	}

	/// Order table entry to restart at
	pub fn restart_position(&self) -> u16 {
		self.restart_position
	}

	/// Channel count
	pub fn channels(&self) -> u16 {
		self.channels
	}

	/// Number of patterns
	pub fn pattern_count(&self) -> u16 {
		self.pattern_count
	}

	/// Number of instruments
	pub fn instrument_count(&self) -> u16 {
		self.instrument_count
	}

	/// Number of samples across all instruments
	pub fn sample_count(&self) -> u32 {
		self.sample_count
	}

	/// Header flags, bit 0 selects the linear frequency table
	pub fn flags(&self) -> u16 {
		self.flags
	}

	/// Default tempo
	pub fn tempo(&self) -> u16 {
		self.tempo
	}

	/// Default BPM
	pub fn bpm_speed(&self) -> u16 {
		self.bpm_speed
	}

	/// Total length of the sample data, in bytes
	pub fn sample_data_length(&self) -> u64 {
		self.sample_data_length
	}
}
