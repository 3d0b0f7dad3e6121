use std::f64::consts::PI;

/// Maps accident counts onto `[0, 1]` and then onto the sinebow colormap.
///
/// One instance is shared by the day bars and the legend so both agree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
	min: f64,
	max: f64,
}

impl ColorScale {
	pub fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	pub fn from_range((min, max): (u32, u32)) -> Self {
		Self::new(min.into(), max.into())
	}

	pub fn domain(&self) -> (f64, f64) {
		(self.min, self.max)
	}

	/// Linear position of `count` in the domain, clamped. A degenerate domain maps to 0.
	pub fn normalize(&self, count: f64) -> f64 {
		let span = self.max - self.min;
		if span <= 0.0 {
			return 0.0;
		}
		((count - self.min) / span).clamp(0.0, 1.0)
	}

	pub fn color_for(&self, t: f64) -> String {
		sinebow(t)
	}

	pub fn color_for_count(&self, count: u32) -> String {
		self.color_for(self.normalize(count.into()))
	}

	/// Evenly spaced `(offset, color)` stops for a legend gradient.
	pub fn legend_stops(&self, n: usize) -> Vec<(f64, String)> {
		let n = n.max(2);
		(0..n)
			.map(|i| {
				let t = i as f64 / (n - 1) as f64;
				(t, self.color_for(t))
			})
			.collect()
	}
}

fn sinebow(t: f64) -> String {
	let t = 0.5 - t;
	let channel = |phase: f64| {
		let s = (PI * (t + phase)).sin();
		(255.0 * s * s).round() as u8
	};
	format!(
		"rgb({}, {}, {})",
		channel(0.0),
		channel(1.0 / 3.0),
		channel(2.0 / 3.0)
	)
}
