pub const DEFAULT_HIERARCHY_URL: &str = "https://raw.githubusercontent.com/imdatavis/fit5147/39aca24d3e2e2d054b05945929758f524f7691e3/PE3_roads_hierarchy.json";
pub const DEFAULT_ACCIDENTS_URL: &str = "https://raw.githubusercontent.com/imdatavis/fit5147/39aca24d3e2e2d054b05945929758f524f7691e3/PE3_accident_data.csv";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
	pub left: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendConfig {
	pub title: String,
	pub width: f64,
	pub height: f64,
	pub margin_top: f64,
	pub margin_left: f64,
}

/// Geometry and data sources for one chart.
///
/// Inner sizes are the outer canvas size minus the margins; the tree gets
/// whatever is left of the inner width once the weekday timeline is reserved.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
	pub outer_width: f64,
	pub outer_height: f64,
	pub margin: Margin,
	/// Horizontal distance between two weekday ticks.
	pub interval: f64,
	/// Leaf node horizontal radius, also the axis offset.
	pub node_radius: f64,
	pub legend: LegendConfig,
	pub hierarchy_url: String,
	pub accidents_url: String,
}

impl Default for ChartConfig {
	fn default() -> Self {
		let margin = Margin {
			top: 20.0,
			right: 50.0,
			bottom: 40.0,
			left: 50.0,
		};
		Self {
			outer_width: 1150.0,
			outer_height: 800.0,
			margin,
			interval: 50.0,
			node_radius: 30.0,
			legend: LegendConfig {
				title: "Accident Count".into(),
				width: 400.0,
				height: 70.0,
				margin_top: margin.top + 20.0,
				margin_left: margin.left,
			},
			hierarchy_url: DEFAULT_HIERARCHY_URL.into(),
			accidents_url: DEFAULT_ACCIDENTS_URL.into(),
		}
	}
}

impl ChartConfig {
	/// Replace the source URLs that are given, keep the rest.
	pub fn with_sources(mut self, hierarchy: Option<String>, accidents: Option<String>) -> Self {
		if let Some(url) = hierarchy.filter(|u| !u.is_empty()) {
			self.hierarchy_url = url;
		}
		if let Some(url) = accidents.filter(|u| !u.is_empty()) {
			self.accidents_url = url;
		}
		self
	}

	pub fn inner_width(&self) -> f64 {
		self.outer_width - self.margin.left - self.margin.right
	}

	pub fn inner_height(&self) -> f64 {
		self.outer_height - self.margin.top - self.margin.bottom
	}

	pub fn timeline_length(&self) -> f64 {
		7.0 * self.interval
	}

	/// Extent of the depth axis handed to the tree layout.
	pub fn tree_width(&self) -> f64 {
		self.inner_width() - self.timeline_length()
	}
}
