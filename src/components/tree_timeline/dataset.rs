use std::collections::HashMap;

use log::{info, warn};

use super::error::ChartError;
use super::layout::TreeLayout;
use super::types::{AccidentRecord, Weekday};

type CellKey = (String, String, Weekday);

/// Read-only index over the accident table, keyed by speed zone, year and day.
#[derive(Clone, Debug, Default)]
pub struct DatasetIndex {
	records: Vec<AccidentRecord>,
	by_cell: HashMap<CellKey, usize>,
	range: (u32, u32),
}

impl DatasetIndex {
	pub fn new(records: Vec<AccidentRecord>) -> Result<Self, ChartError> {
		let mut by_cell = HashMap::with_capacity(records.len());
		let mut range: Option<(u32, u32)> = None;
		for (i, record) in records.iter().enumerate() {
			let key = (record.speed_zone.clone(), record.year.clone(), record.day);
			if by_cell.insert(key, i).is_some() {
				return Err(ChartError::DuplicateRecord {
					speed_zone: record.speed_zone.clone(),
					year: record.year.clone(),
					day: record.day,
				});
			}
			let count = record.accident_count;
			range = Some(match range {
				Some((min, max)) => (min.min(count), max.max(count)),
				None => (count, count),
			});
		}
		Ok(Self {
			records,
			by_cell,
			range: range.unwrap_or((0, 0)),
		})
	}

	/// Parse the `SpeedZone,Year,DayofWeek,AccidentCount` table.
	pub fn from_csv(text: &str) -> Result<Self, ChartError> {
		let mut reader = csv::ReaderBuilder::new()
			.has_headers(true)
			.trim(csv::Trim::All)
			.from_reader(text.as_bytes());
		let records = reader
			.deserialize::<AccidentRecord>()
			.collect::<Result<Vec<_>, _>>()
			.map_err(|e| ChartError::load("accident table", e))?;
		let index = Self::new(records)?;
		if index.is_empty() {
			warn!("accident table has no rows");
		}
		info!(
			"Indexed {} accident records, counts {:?}",
			index.len(),
			index.range()
		);
		Ok(index)
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// All days recorded for one speed zone and year, Monday first.
	pub fn records_for(&self, speed_zone: &str, year: &str) -> Vec<&AccidentRecord> {
		let mut found: Vec<_> = self
			.records
			.iter()
			.filter(|r| r.speed_zone == speed_zone && r.year == year)
			.collect();
		found.sort_by_key(|r| r.day);
		found
	}

	pub fn record_for(
		&self,
		speed_zone: &str,
		year: &str,
		day: Weekday,
	) -> Result<&AccidentRecord, ChartError> {
		self.by_cell
			.get(&(speed_zone.to_string(), year.to_string(), day))
			.map(|&i| &self.records[i])
			.ok_or_else(|| ChartError::missing(speed_zone, year, day))
	}

	pub fn sum_accidents<'a>(records: impl IntoIterator<Item = &'a AccidentRecord>) -> u64 {
		records.into_iter().map(|r| u64::from(r.accident_count)).sum()
	}

	/// Smallest and largest accident count, `(0, 0)` when empty.
	pub fn range(&self) -> (u32, u32) {
		self.range
	}

	/// Every leaf must resolve to one record per weekday.
	pub fn verify_coverage(&self, layout: &TreeLayout) -> Result<(), ChartError> {
		for leaf in layout.leaves() {
			let (Some(zone), Some(year)) = (layout.speed_zone(leaf.id), leaf.year()) else {
				return Err(ChartError::Layout(format!(
					"leaf `{}` has no speed zone or year",
					leaf.name()
				)));
			};
			for day in Weekday::ALL {
				self.record_for(zone, year, day)?;
			}
		}
		Ok(())
	}
}
