use thiserror::Error;

use super::types::Weekday;

/// Everything that can go wrong between fetching the sources and answering a hover.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
	/// A source could not be fetched or parsed. Fatal at startup.
	#[error("failed to load {source_name}: {detail}")]
	Load { source_name: String, detail: String },

	/// The hierarchy references a cell the accident table does not have.
	#[error("no accident record for speed zone {speed_zone}, year {year}, {day}")]
	DataIntegrity {
		speed_zone: String,
		year: String,
		day: Weekday,
	},

	#[error("duplicate accident record for speed zone {speed_zone}, year {year}, {day}")]
	DuplicateRecord {
		speed_zone: String,
		year: String,
		day: Weekday,
	},

	/// The hierarchy document cannot be laid out.
	#[error("malformed hierarchy: {0}")]
	Layout(String),
}

impl ChartError {
	pub(crate) fn load(source_name: &str, detail: impl ToString) -> Self {
		Self::Load {
			source_name: source_name.to_string(),
			detail: detail.to_string(),
		}
	}

	pub(crate) fn missing(speed_zone: &str, year: &str, day: Weekday) -> Self {
		Self::DataIntegrity {
			speed_zone: speed_zone.to_string(),
			year: year.to_string(),
			day,
		}
	}
}
