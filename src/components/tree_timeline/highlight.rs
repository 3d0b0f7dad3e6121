//! Hover relatedness and the highlight state machine.
//!
//! Relatedness is computed by pure functions over the laid-out tree, comparing
//! nodes by their `(name, year)` key. The coordinator then owns the single
//! active [`HighlightState`] and answers per-element visual state queries.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};

use super::dataset::DatasetIndex;
use super::error::ChartError;
use super::layout::{EdgeId, NodeId, TreeLayout};
use super::tooltip::{self, TooltipContent, TooltipPosition};
use super::types::Weekday;

/// Element under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HoverTarget {
	Node(NodeId),
	Bar { leaf: NodeId, day: Weekday },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisualState {
	#[default]
	Neutral,
	Hovered,
	Related,
	Dimmed,
}

/// Nodes and edges emphasized with a hovered element, and the leaves dimmed by it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelatedSet {
	pub nodes: HashSet<NodeId>,
	pub edges: HashSet<EdgeId>,
	pub dimmed: HashSet<NodeId>,
}

impl RelatedSet {
	fn from_edges(
		layout: &TreeLayout,
		hovered: NodeId,
		edges: HashSet<EdgeId>,
		dimmed: HashSet<NodeId>,
	) -> Self {
		let nodes = edges
			.iter()
			.flat_map(|&e| {
				let edge = layout.edges()[e];
				[edge.node, edge.parent]
			})
			.filter(|&n| n != hovered && !dimmed.contains(&n))
			.collect();
		Self {
			nodes,
			edges,
			dimmed,
		}
	}
}

/// Edges carrying the leaf's year plus the edges leaving its grandparent;
/// leaves of other years are dimmed.
pub fn leaf_related(layout: &TreeLayout, leaf: NodeId) -> RelatedSet {
	let year = layout.node(leaf).year();
	let grandparent = layout.grandparent(leaf).map(|n| n.name());

	let edges = layout
		.edges()
		.iter()
		.enumerate()
		.filter(|(_, edge)| {
			layout.node(edge.node).year() == year
				|| Some(layout.node(edge.parent).name()) == grandparent
		})
		.map(|(i, _)| i)
		.collect();
	let dimmed = layout
		.leaves()
		.filter(|n| n.year() != year)
		.map(|n| n.id)
		.collect();
	RelatedSet::from_edges(layout, leaf, edges, dimmed)
}

/// The node's own incoming edge and everything leaving it, matched by name;
/// leaves under a differently named parent are dimmed.
pub fn internal_related(layout: &TreeLayout, node: NodeId) -> RelatedSet {
	let name = layout.node(node).name();

	let edges = layout
		.edges()
		.iter()
		.enumerate()
		.filter(|(_, edge)| {
			layout.node(edge.node).name() == name || layout.node(edge.parent).name() == name
		})
		.map(|(i, _)| i)
		.collect();
	let dimmed = layout
		.leaves()
		.filter(|n| layout.parent(n.id).map(|p| p.name()) != Some(name))
		.map(|n| n.id)
		.collect();
	RelatedSet::from_edges(layout, node, edges, dimmed)
}

#[derive(Clone, Debug, PartialEq)]
pub struct HighlightState {
	pub target: HoverTarget,
	pub related: RelatedSet,
	pub tooltip: TooltipContent,
	pub position: Option<TooltipPosition>,
}

pub struct HighlightCoordinator {
	layout: Arc<TreeLayout>,
	dataset: Arc<DatasetIndex>,
	active: Option<HighlightState>,
}

impl HighlightCoordinator {
	pub fn new(layout: Arc<TreeLayout>, dataset: Arc<DatasetIndex>) -> Self {
		Self {
			layout,
			dataset,
			active: None,
		}
	}

	pub fn active(&self) -> Option<&HighlightState> {
		self.active.as_ref()
	}

	/// Enter `target`, leaving whatever was active first.
	///
	/// Returns the tooltip to show. On error the coordinator stays neutral.
	pub fn pointer_enter(&mut self, target: HoverTarget) -> Result<&TooltipContent, ChartError> {
		if let Some(current) = self.active.as_ref().map(|s| s.target) {
			if current != target {
				self.pointer_leave(current);
			}
		}
		let state = match self.active.take() {
			Some(state) => state,
			None => {
				let state = self.compute(target)?;
				debug!("hover enter {:?}: {:?}", target, state.tooltip);
				state
			}
		};
		Ok(&self.active.insert(state).tooltip)
	}

	/// Leave `target`. Returns whether anything changed; a leave for an element
	/// that is not active is ignored.
	pub fn pointer_leave(&mut self, target: HoverTarget) -> bool {
		match self.active.as_ref().map(|s| s.target) {
			Some(current) if current == target => {
				debug!("hover leave {:?}", target);
				self.active = None;
				true
			}
			Some(current) => {
				warn!("ignoring leave of {:?} while {:?} is active", target, current);
				false
			}
			None => false,
		}
	}

	/// Clamp the tooltip next to the pointer and remember where it went.
	pub fn place_tooltip(
		&mut self,
		pointer: (f64, f64),
		tooltip_box: (f64, f64),
		viewport: (f64, f64),
	) -> Option<TooltipPosition> {
		let state = self.active.as_mut()?;
		let pos = tooltip::position(
			pointer.0,
			pointer.1,
			tooltip_box.0,
			tooltip_box.1,
			viewport.0,
			viewport.1,
		);
		state.position = Some(pos);
		Some(pos)
	}

	fn compute(&self, target: HoverTarget) -> Result<HighlightState, ChartError> {
		let layout = &self.layout;
		let (related, tooltip) = match target {
			HoverTarget::Node(id) => {
				let node = layout.node(id);
				if node.is_root() {
					// child count only; nothing is related or dimmed
					let tooltip = TooltipContent::Internal {
						children: node.children.len(),
					};
					(RelatedSet::default(), tooltip)
				} else if node.is_leaf() {
					let (zone, year) = self.leaf_cell(id)?;
					let week = self.dataset.records_for(zone, year);
					let missing = Weekday::ALL
						.into_iter()
						.find(|day| !week.iter().any(|r| r.day == *day));
					if let Some(day) = missing {
						return Err(ChartError::missing(zone, year, day));
					}
					let tooltip = TooltipContent::Leaf {
						speed_zone: zone.to_string(),
						year: year.to_string(),
						total: DatasetIndex::sum_accidents(week),
					};
					(leaf_related(layout, id), tooltip)
				} else {
					let tooltip = TooltipContent::Internal {
						children: node.children.len(),
					};
					(internal_related(layout, id), tooltip)
				}
			}
			HoverTarget::Bar { leaf, day } => {
				let (zone, year) = self.leaf_cell(leaf)?;
				let record = self.dataset.record_for(zone, year, day)?;
				let tooltip = TooltipContent::Bar {
					year: year.to_string(),
					speed_zone: zone.to_string(),
					day,
					count: record.accident_count,
				};
				(RelatedSet::default(), tooltip)
			}
		};
		Ok(HighlightState {
			target,
			related,
			tooltip,
			position: None,
		})
	}

	fn leaf_cell(&self, leaf: NodeId) -> Result<(&str, &str), ChartError> {
		let node = self.layout.node(leaf);
		match (self.layout.speed_zone(leaf), node.year()) {
			(Some(zone), Some(year)) if node.is_leaf() => Ok((zone, year)),
			_ => Err(ChartError::Layout(format!("`{}` is not a leaf", node.name()))),
		}
	}

	pub fn node_state(&self, id: NodeId) -> VisualState {
		let Some(state) = &self.active else {
			return VisualState::Neutral;
		};
		if state.target == HoverTarget::Node(id) {
			VisualState::Hovered
		} else if state.related.dimmed.contains(&id) {
			VisualState::Dimmed
		} else if state.related.nodes.contains(&id) {
			VisualState::Related
		} else {
			VisualState::Neutral
		}
	}

	pub fn edge_highlighted(&self, edge: EdgeId) -> bool {
		self.active
			.as_ref()
			.is_some_and(|s| s.related.edges.contains(&edge))
	}

	/// Bars follow their leaf when it is dimmed.
	pub fn bar_state(&self, leaf: NodeId, day: Weekday) -> VisualState {
		match &self.active {
			Some(state) if state.target == (HoverTarget::Bar { leaf, day }) => VisualState::Hovered,
			Some(state) if state.related.dimmed.contains(&leaf) => VisualState::Dimmed,
			_ => VisualState::Neutral,
		}
	}

	pub fn node_states(&self) -> Vec<VisualState> {
		(0..self.layout.nodes().len())
			.map(|id| self.node_state(id))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::tree_timeline::types::HierarchyDoc;

	const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

	// All -> {60, 80} -> {2015, 2016}; ids in level order:
	// 0 All, 1 60, 2 80, 3 60/2015, 4 60/2016, 5 80/2015, 6 80/2016
	fn fixture() -> HighlightCoordinator {
		let doc: HierarchyDoc = serde_json::from_str(
			r#"{"name":"All","children":[
				{"name":"60","children":[{"name":"60","Year":"2015"},{"name":"60","Year":"2016"}]},
				{"name":"80","children":[{"name":"80","Year":"2015"},{"name":"80","Year":"2016"}]}
			]}"#,
		)
		.unwrap();
		let mut table = String::from("SpeedZone,Year,DayofWeek,AccidentCount\n");
		for (z, zone) in ["60", "80"].iter().enumerate() {
			for (y, year) in ["2015", "2016"].iter().enumerate() {
				for (d, day) in DAYS.iter().enumerate() {
					table.push_str(&format!("{zone},{year},{day},{}\n", z * 100 + y * 10 + d));
				}
			}
		}
		let layout = Arc::new(TreeLayout::new(&doc, 700.0, 740.0).unwrap());
		let dataset = Arc::new(DatasetIndex::from_csv(&table).unwrap());
		HighlightCoordinator::new(layout, dataset)
	}

	fn edge_ids(c: &HighlightCoordinator, pairs: &[(NodeId, NodeId)]) -> HashSet<EdgeId> {
		c.layout
			.edges()
			.iter()
			.enumerate()
			.filter(|(_, e)| pairs.contains(&(e.node, e.parent)))
			.map(|(i, _)| i)
			.collect()
	}

	#[test]
	fn leaf_related_follows_year_and_grandparent() {
		let c = fixture();
		let related = leaf_related(&c.layout, 3);
		assert_eq!(related.edges, edge_ids(&c, &[(3, 1), (5, 2), (1, 0), (2, 0)]));
		assert_eq!(related.dimmed, HashSet::from([4, 6]));
		assert_eq!(related.nodes, HashSet::from([0, 1, 2, 5]));
	}

	#[test]
	fn internal_related_matches_by_name() {
		let c = fixture();
		let related = internal_related(&c.layout, 1);
		assert_eq!(related.edges, edge_ids(&c, &[(1, 0), (3, 1), (4, 1)]));
		assert_eq!(related.dimmed, HashSet::from([5, 6]));
		assert_eq!(related.nodes, HashSet::from([0, 3, 4]));
	}

	#[test]
	fn leaf_hover_reports_week_total() {
		let mut c = fixture();
		let tooltip = c.pointer_enter(HoverTarget::Node(5)).unwrap().clone();
		assert_eq!(
			tooltip,
			TooltipContent::Leaf {
				speed_zone: "80".into(),
				year: "2015".into(),
				total: 7 * 100 + 21,
			}
		);
		assert_eq!(c.node_state(5), VisualState::Hovered);
		assert_eq!(c.node_state(6), VisualState::Dimmed);
		assert_eq!(c.bar_state(4, Weekday::Fri), VisualState::Dimmed);
		assert_eq!(c.node_state(3), VisualState::Related);
	}

	#[test]
	fn leaf_round_trip_restores_neutral() {
		let mut c = fixture();
		let before = c.node_states();
		c.pointer_enter(HoverTarget::Node(3)).unwrap();
		assert_ne!(c.node_states(), before);
		assert!(c.pointer_leave(HoverTarget::Node(3)));
		assert_eq!(c.node_states(), before);
		assert!((0..c.layout.edges().len()).all(|e| !c.edge_highlighted(e)));
		assert!(c.active().is_none());
	}

	#[test]
	fn internal_hover_counts_children_and_leaves_to_neutral() {
		let mut c = fixture();
		let tooltip = c.pointer_enter(HoverTarget::Node(2)).unwrap().clone();
		assert_eq!(tooltip, TooltipContent::Internal { children: 2 });
		for e in edge_ids(&c, &[(2, 0), (5, 2), (6, 2)]) {
			assert!(c.edge_highlighted(e));
		}
		assert_eq!(c.node_state(3), VisualState::Dimmed);
		assert_eq!(c.node_state(5), VisualState::Related);
		c.pointer_leave(HoverTarget::Node(2));
		assert!(c.node_states().iter().all(|s| *s == VisualState::Neutral));
	}

	#[test]
	fn bar_hover_reports_single_cell() {
		let mut c = fixture();
		let tooltip = c
			.pointer_enter(HoverTarget::Bar {
				leaf: 4,
				day: Weekday::Wed,
			})
			.unwrap()
			.clone();
		assert_eq!(
			tooltip,
			TooltipContent::Bar {
				year: "2016".into(),
				speed_zone: "60".into(),
				day: Weekday::Wed,
				count: 12,
			}
		);
		assert_eq!(c.bar_state(4, Weekday::Wed), VisualState::Hovered);
		assert_eq!(c.bar_state(4, Weekday::Thu), VisualState::Neutral);
		assert!(c.node_states().iter().all(|s| *s == VisualState::Neutral));
	}

	#[test]
	fn entering_another_element_resolves_the_pending_leave() {
		let mut c = fixture();
		c.pointer_enter(HoverTarget::Node(1)).unwrap();
		c.pointer_enter(HoverTarget::Node(6)).unwrap();
		assert_eq!(c.active().map(|s| s.target), Some(HoverTarget::Node(6)));
		assert_ne!(c.node_state(1), VisualState::Hovered);
		// the stale leave of the first element changes nothing
		assert!(!c.pointer_leave(HoverTarget::Node(1)));
		assert_eq!(c.node_state(6), VisualState::Hovered);
	}

	#[test]
	fn root_hover_counts_children_without_dimming() {
		let mut c = fixture();
		let before = c.node_states();
		let tooltip = c.pointer_enter(HoverTarget::Node(0)).unwrap().clone();
		assert_eq!(tooltip, TooltipContent::Internal { children: 2 });
		assert_eq!(tooltip.opacity(), 0.9);
		assert_eq!(c.node_state(0), VisualState::Hovered);
		assert!((1..7).all(|n| c.node_state(n) == VisualState::Neutral));
		assert!((0..c.layout.edges().len()).all(|e| !c.edge_highlighted(e)));

		assert!(c.pointer_leave(HoverTarget::Node(0)));
		assert_eq!(c.node_states(), before);
		assert!(c.active().is_none());
	}

	#[test]
	fn missing_cell_is_surfaced_and_state_stays_neutral() {
		let doc: HierarchyDoc = serde_json::from_str(
			r#"{"name":"All","children":[{"name":"60","children":[{"name":"60","Year":"2015"}]}]}"#,
		)
		.unwrap();
		let layout = Arc::new(TreeLayout::new(&doc, 700.0, 740.0).unwrap());
		let dataset = Arc::new(
			DatasetIndex::from_csv("SpeedZone,Year,DayofWeek,AccidentCount\n60,2015,Mon,12\n").unwrap(),
		);
		let mut c = HighlightCoordinator::new(layout, dataset);
		assert_eq!(
			c.pointer_enter(HoverTarget::Node(2)),
			Err(ChartError::missing("60", "2015", Weekday::Tue))
		);
		assert_eq!(
			c.pointer_enter(HoverTarget::Bar { leaf: 2, day: Weekday::Sun }),
			Err(ChartError::missing("60", "2015", Weekday::Sun))
		);
		assert!(c.active().is_none());
	}

	#[test]
	fn tooltip_placement_is_stored_on_the_active_state() {
		let mut c = fixture();
		assert_eq!(c.place_tooltip((950.0, 50.0), (200.0, 100.0), (1000.0, 800.0)), None);
		c.pointer_enter(HoverTarget::Node(1)).unwrap();
		let pos = c.place_tooltip((950.0, 50.0), (200.0, 100.0), (1000.0, 800.0));
		assert_eq!(pos, Some(TooltipPosition { top: 60.0, left: 760.0 }));
		assert_eq!(c.active().and_then(|s| s.position), pos);
	}
}
