use super::types::Weekday;

/// Stroke width of a day bar.
pub const DAY_BAR_WIDTH: f64 = 10.0;

/// Point-scale domain of the timeline; the empty first entry holds position 0
/// and is never drawn.
pub const DOMAIN: [&str; 8] = ["", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Segment of the week drawn next to a leaf, in leaf-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayBar {
	pub day: Weekday,
	pub x1: f64,
	pub x2: f64,
}

impl DayBar {
	/// Whether a leaf-local point falls on the stroked segment.
	pub fn contains(&self, dx: f64, dy: f64) -> bool {
		dx >= self.x1 && dx <= self.x2 && dy.abs() <= DAY_BAR_WIDTH / 2.0
	}
}

/// Weekday point scale over `[0, 7 * interval]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
	interval: f64,
}

impl Timeline {
	pub fn new(interval: f64) -> Self {
		Self { interval }
	}

	pub fn interval(&self) -> f64 {
		self.interval
	}

	pub fn length(&self) -> f64 {
		7.0 * self.interval
	}

	fn step(&self) -> f64 {
		self.length() / (DOMAIN.len() - 1) as f64
	}

	pub fn position(&self, day: Weekday) -> f64 {
		(day.index() + 1) as f64 * self.step()
	}

	pub fn bar(&self, day: Weekday) -> DayBar {
		let pos = self.position(day);
		DayBar {
			day,
			x1: pos - self.interval / 2.5,
			x2: pos + self.interval / 5.0,
		}
	}

	pub fn bars(&self) -> impl Iterator<Item = DayBar> + '_ {
		Weekday::ALL.into_iter().map(move |day| self.bar(day))
	}

	/// Tick label and position for every domain entry, sentinel included.
	pub fn ticks(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
		DOMAIN
			.iter()
			.enumerate()
			.map(move |(i, label)| (*label, i as f64 * self.step()))
	}

	/// Bar under a leaf-local point, if any.
	pub fn bar_at(&self, dx: f64, dy: f64) -> Option<DayBar> {
		self.bars().find(|bar| bar.contains(dx, dy))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn points_are_one_interval_apart_after_the_sentinel() {
		let timeline = Timeline::new(50.0);
		assert_eq!(timeline.length(), 350.0);
		assert_eq!(timeline.position(Weekday::Mon), 50.0);
		assert_eq!(timeline.position(Weekday::Sun), 350.0);
		let ticks: Vec<_> = timeline.ticks().collect();
		assert_eq!(ticks[0], ("", 0.0));
		assert_eq!(ticks[7], ("Sun", 350.0));
	}

	#[test]
	fn bars_do_not_overlap() {
		let timeline = Timeline::new(50.0);
		let mon = timeline.bar(Weekday::Mon);
		assert_eq!((mon.x1, mon.x2), (30.0, 60.0));
		let bars: Vec<_> = timeline.bars().collect();
		assert!(bars.windows(2).all(|w| w[0].x2 < w[1].x1));
	}

	#[test]
	fn hit_testing_respects_stroke_width() {
		let timeline = Timeline::new(50.0);
		assert_eq!(timeline.bar_at(100.0, 4.0).map(|b| b.day), Some(Weekday::Tue));
		assert_eq!(timeline.bar_at(100.0, 6.0), None);
		assert_eq!(timeline.bar_at(65.0, 0.0), None);
	}
}
