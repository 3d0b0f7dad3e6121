use super::config::ChartConfig;
use super::error::ChartError;
use super::highlight::{HighlightCoordinator, HoverTarget};
use super::layout::HierarchyNode;
use super::loader::ChartData;
use super::scale::ColorScale;
use super::timeline::Timeline;

pub const ROOT_RADII: (f64, f64) = (40.0, 30.0);
pub const NODE_RADII: (f64, f64) = (30.0, 20.0);

pub struct TreeTimelineState {
	pub data: ChartData,
	pub timeline: Timeline,
	pub scale: ColorScale,
	pub coordinator: HighlightCoordinator,
	pub hover: Option<HoverTarget>,
	/// Element whose enter failed, reported once until the pointer moves on.
	pub failed: Option<HoverTarget>,
}

impl TreeTimelineState {
	pub fn new(data: ChartData) -> Self {
		let timeline = Timeline::new(data.config.interval);
		let scale = ColorScale::from_range(data.dataset.range());
		let coordinator = HighlightCoordinator::new(data.layout.clone(), data.dataset.clone());
		Self {
			data,
			timeline,
			scale,
			coordinator,
			hover: None,
			failed: None,
		}
	}

	pub fn config(&self) -> &ChartConfig {
		&self.data.config
	}

	pub fn node_radii(node: &HierarchyNode) -> (f64, f64) {
		if node.depth == 0 { ROOT_RADII } else { NODE_RADII }
	}

	/// Canvas pixel to drawing-group coordinates.
	pub fn canvas_to_chart(&self, cx: f64, cy: f64) -> (f64, f64) {
		let margin = self.config().margin;
		(cx - margin.left, cy - margin.top)
	}

	/// Interactive element under a canvas point. Day bars win over nodes.
	pub fn target_at(&self, cx: f64, cy: f64) -> Option<HoverTarget> {
		let (x, y) = self.canvas_to_chart(cx, cy);
		let layout = &self.data.layout;

		for leaf in layout.leaves() {
			if let Some(bar) = self.timeline.bar_at(x - leaf.x, y - leaf.y) {
				return Some(HoverTarget::Bar {
					leaf: leaf.id,
					day: bar.day,
				});
			}
		}

		layout
			.nodes()
			.iter()
			.find(|n| {
				let (rx, ry) = Self::node_radii(n);
				let (dx, dy) = ((x - n.x) / rx, (y - n.y) / ry);
				dx * dx + dy * dy <= 1.0
			})
			.map(|n| HoverTarget::Node(n.id))
	}

	/// Move the hover to `target`, leaving the previous element first.
	///
	/// Returns whether the hovered element changed. If entering fails the
	/// previous element has still been left, so nothing stays highlighted.
	pub fn set_hover(&mut self, target: Option<HoverTarget>) -> Result<bool, ChartError> {
		if self.hover == target && self.failed.is_none() {
			return Ok(false);
		}
		if target.is_some() && self.failed == target {
			return Ok(false);
		}
		self.failed = None;
		if let Some(previous) = self.hover.take() {
			self.coordinator.pointer_leave(previous);
		}
		if let Some(next) = target {
			if let Err(err) = self.coordinator.pointer_enter(next) {
				self.failed = Some(next);
				return Err(err);
			}
			self.hover = Some(next);
		}
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	use crate::components::tree_timeline::dataset::DatasetIndex;
	use crate::components::tree_timeline::highlight::VisualState;
	use crate::components::tree_timeline::layout::TreeLayout;
	use crate::components::tree_timeline::types::Weekday;

	fn state() -> TreeTimelineState {
		let mut table = String::from("SpeedZone,Year,DayofWeek,AccidentCount\n");
		for year in ["2015", "2016"] {
			for day in Weekday::ALL {
				table.push_str(&format!("60,{year},{day},{}\n", day.index() + 1));
			}
		}
		let data = ChartData::from_sources(
			r#"{"name":"All","children":[{"name":"60","children":[
				{"name":"60","Year":"2015"},{"name":"60","Year":"2016"}]}]}"#,
			&table,
			ChartConfig::default(),
		)
		.unwrap();
		TreeTimelineState::new(data)
	}

	fn canvas_point(s: &TreeTimelineState, x: f64, y: f64) -> (f64, f64) {
		let margin = s.config().margin;
		(x + margin.left, y + margin.top)
	}

	#[test]
	fn hit_tests_nodes_bars_and_background() {
		let s = state();
		let leaf = s.data.layout.node(2).clone();
		let zone = s.data.layout.node(1).clone();
		let root = s.data.layout.root().clone();

		let (cx, cy) = canvas_point(&s, leaf.x + 5.0, leaf.y - 5.0);
		assert_eq!(s.target_at(cx, cy), Some(HoverTarget::Node(2)));

		let sat = s.timeline.position(Weekday::Sat);
		let (cx, cy) = canvas_point(&s, leaf.x + sat, leaf.y + 2.0);
		assert_eq!(
			s.target_at(cx, cy),
			Some(HoverTarget::Bar {
				leaf: 2,
				day: Weekday::Sat
			})
		);

		let (cx, cy) = canvas_point(&s, zone.x, zone.y + 19.0);
		assert_eq!(s.target_at(cx, cy), Some(HoverTarget::Node(1)));

		let (cx, cy) = canvas_point(&s, root.x + 10.0, root.y);
		assert_eq!(s.target_at(cx, cy), Some(HoverTarget::Node(0)));

		let (cx, cy) = canvas_point(&s, 200.0, 100.0);
		assert_eq!(s.target_at(cx, cy), None);
	}

	#[test]
	fn hover_stream_is_turned_into_leave_enter_pairs() {
		let mut s = state();
		assert_eq!(s.set_hover(Some(HoverTarget::Node(2))), Ok(true));
		assert_eq!(s.set_hover(Some(HoverTarget::Node(2))), Ok(false));
		assert_eq!(s.coordinator.node_state(3), VisualState::Dimmed);

		let bar = HoverTarget::Bar {
			leaf: 3,
			day: Weekday::Mon,
		};
		assert_eq!(s.set_hover(Some(bar)), Ok(true));
		assert_eq!(s.coordinator.node_state(3), VisualState::Neutral);
		assert_eq!(s.coordinator.bar_state(3, Weekday::Mon), VisualState::Hovered);

		assert_eq!(s.set_hover(None), Ok(true));
		assert!(s.coordinator.active().is_none());
		assert!(s.hover.is_none());
	}

	#[test]
	fn scale_spans_the_dataset() {
		let s = state();
		assert_eq!(s.scale.domain(), (1.0, 7.0));
		assert_eq!(s.scale.normalize(7.0), 1.0);
	}

	#[test]
	fn failing_element_is_reported_once_per_visit() {
		let doc = serde_json::from_str(
			r#"{"name":"All","children":[{"name":"60","children":[{"name":"60","Year":"2015"}]}]}"#,
		)
		.unwrap();
		let data = ChartData {
			config: ChartConfig::default(),
			layout: Arc::new(TreeLayout::new(&doc, 700.0, 740.0).unwrap()),
			dataset: Arc::new(
				DatasetIndex::from_csv("SpeedZone,Year,DayofWeek,AccidentCount\n60,2015,Mon,12\n")
					.unwrap(),
			),
		};
		let mut s = TreeTimelineState::new(data);
		let sun = Some(HoverTarget::Bar {
			leaf: 2,
			day: Weekday::Sun,
		});

		assert!(s.set_hover(sun).is_err());
		assert_eq!(s.set_hover(sun), Ok(false));
		assert_eq!(s.failed, sun);
		assert!(s.coordinator.active().is_none());

		let mon = Some(HoverTarget::Bar {
			leaf: 2,
			day: Weekday::Mon,
		});
		assert_eq!(s.set_hover(mon), Ok(true));
		assert_eq!(s.failed, None);

		// leaving and coming back reports again
		assert_eq!(s.set_hover(None), Ok(true));
		assert!(s.set_hover(sun).is_err());
		assert_eq!(s.set_hover(None), Ok(true));
		assert_eq!(s.failed, None);
	}
}
