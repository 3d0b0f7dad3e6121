use std::fmt;

use serde::{Deserialize, Deserializer};

/// One node of the roads hierarchy document.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HierarchyDoc {
	pub name: String,
	#[serde(rename = "Year", default, deserialize_with = "year_field")]
	pub year: Option<String>,
	#[serde(default)]
	pub children: Vec<HierarchyDoc>,
}

// Years arrive as strings in the published document but some exports write numbers.
fn year_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Year {
		Text(String),
		Number(i64),
	}

	Ok(Option::<Year>::deserialize(deserializer)?.map(|year| match year {
		Year::Text(s) => s,
		Year::Number(n) => n.to_string(),
	}))
}

/// One row of the accident table.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AccidentRecord {
	#[serde(rename = "SpeedZone")]
	pub speed_zone: String,
	#[serde(rename = "Year")]
	pub year: String,
	#[serde(rename = "DayofWeek")]
	pub day: Weekday,
	#[serde(rename = "AccidentCount")]
	pub accident_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum Weekday {
	Mon,
	Tue,
	Wed,
	Thu,
	Fri,
	Sat,
	Sun,
}

impl Weekday {
	pub const ALL: [Weekday; 7] = [
		Weekday::Mon,
		Weekday::Tue,
		Weekday::Wed,
		Weekday::Thu,
		Weekday::Fri,
		Weekday::Sat,
		Weekday::Sun,
	];

	pub fn label(self) -> &'static str {
		match self {
			Weekday::Mon => "Mon",
			Weekday::Tue => "Tue",
			Weekday::Wed => "Wed",
			Weekday::Thu => "Thu",
			Weekday::Fri => "Fri",
			Weekday::Sat => "Sat",
			Weekday::Sun => "Sun",
		}
	}

	/// Zero-based position in the week, Monday first.
	pub fn index(self) -> usize {
		self as usize
	}
}

impl fmt::Display for Weekday {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}
