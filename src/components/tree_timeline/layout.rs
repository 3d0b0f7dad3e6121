use std::collections::VecDeque;

use super::error::ChartError;
use super::types::HierarchyDoc;

pub type NodeId = usize;
pub type EdgeId = usize;

/// Stable identity of a hierarchy node, independent of where it is drawn.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
	pub name: String,
	pub year: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HierarchyNode {
	pub id: NodeId,
	pub key: NodeKey,
	pub depth: usize,
	pub parent: Option<NodeId>,
	pub children: Vec<NodeId>,
	/// Horizontal position, along the depth axis.
	pub x: f64,
	/// Vertical position, along the breadth axis.
	pub y: f64,
}

impl HierarchyNode {
	pub fn name(&self) -> &str {
		&self.key.name
	}

	pub fn year(&self) -> Option<&str> {
		self.key.year.as_deref()
	}

	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	pub fn is_root(&self) -> bool {
		self.parent.is_none()
	}
}

/// Link from a non-root node to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
	pub node: NodeId,
	pub parent: NodeId,
}

/// The hierarchy laid out as a tidy tree over a `width` × `height` area.
#[derive(Clone, Debug)]
pub struct TreeLayout {
	nodes: Vec<HierarchyNode>,
	edges: Vec<Edge>,
	width: f64,
	height: f64,
}

impl TreeLayout {
	pub fn new(doc: &HierarchyDoc, width: f64, height: f64) -> Result<Self, ChartError> {
		let mut nodes = flatten(doc)?;
		let edges = nodes
			.iter()
			.filter_map(|n| n.parent.map(|parent| Edge { node: n.id, parent }))
			.collect();
		assign_positions(&mut nodes, width, height);
		Ok(Self {
			nodes,
			edges,
			width,
			height,
		})
	}

	pub fn nodes(&self) -> &[HierarchyNode] {
		&self.nodes
	}

	pub fn node(&self, id: NodeId) -> &HierarchyNode {
		&self.nodes[id]
	}

	pub fn root(&self) -> &HierarchyNode {
		&self.nodes[0]
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn leaves(&self) -> impl Iterator<Item = &HierarchyNode> {
		self.nodes.iter().filter(|n| n.is_leaf())
	}

	pub fn parent(&self, id: NodeId) -> Option<&HierarchyNode> {
		self.nodes[id].parent.map(|p| &self.nodes[p])
	}

	pub fn grandparent(&self, id: NodeId) -> Option<&HierarchyNode> {
		self.parent(id).and_then(|p| self.parent(p.id))
	}

	/// Speed zone a leaf belongs to: the name of its parent.
	pub fn speed_zone(&self, id: NodeId) -> Option<&str> {
		self.parent(id).map(HierarchyNode::name)
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}
}

// Breadth-first, root first, so ids follow the document's level order.
fn flatten(doc: &HierarchyDoc) -> Result<Vec<HierarchyNode>, ChartError> {
	if doc.children.is_empty() {
		return Err(ChartError::Layout(format!(
			"root `{}` has no children, so no leaf has a speed zone",
			doc.name
		)));
	}

	let mut nodes: Vec<HierarchyNode> = Vec::new();
	let mut queue = VecDeque::from([(doc, None::<NodeId>, 0usize)]);
	while let Some((doc, parent, depth)) = queue.pop_front() {
		let id = nodes.len();
		if doc.children.is_empty() && doc.year.is_none() {
			return Err(ChartError::Layout(format!("leaf `{}` has no Year", doc.name)));
		}
		nodes.push(HierarchyNode {
			id,
			key: NodeKey {
				name: doc.name.clone(),
				year: if doc.children.is_empty() {
					doc.year.clone()
				} else {
					None
				},
			},
			depth,
			parent,
			children: Vec::with_capacity(doc.children.len()),
			x: 0.0,
			y: 0.0,
		});
		if let Some(p) = parent {
			nodes[p].children.push(id);
		}
		for child in &doc.children {
			queue.push_back((child, Some(id), depth + 1));
		}
	}
	Ok(nodes)
}

fn separation(nodes: &[HierarchyNode], a: NodeId, b: NodeId) -> f64 {
	if nodes[a].parent == nodes[b].parent {
		1.0
	} else {
		2.0
	}
}

fn assign_positions(nodes: &mut [HierarchyNode], width: f64, height: f64) {
	let mut breadth = vec![0.0; nodes.len()];
	let mut previous_leaf = None;
	place_breadth(nodes, 0, &mut breadth, &mut previous_leaf);

	// leaves at shallower depths come early in level order, so pick by position
	let first = nodes
		.iter()
		.filter(|n| n.is_leaf())
		.min_by(|a, b| breadth[a.id].total_cmp(&breadth[b.id]))
		.map(|n| n.id)
		.unwrap_or(0);
	let last = previous_leaf.unwrap_or(first);
	let s = if first == last {
		1.0
	} else {
		separation(nodes, first, last) / 2.0
	};
	let (left, right) = (breadth[first], breadth[last]);
	let kx = height / (right - left + 2.0 * s);

	let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0).max(1);
	let ky = width / max_depth as f64;

	for node in nodes.iter_mut() {
		node.y = (breadth[node.id] - left + s) * kx;
		node.x = node.depth as f64 * ky;
	}
}

// Leaves advance a cursor; parents sit midway between their outer children.
fn place_breadth(
	nodes: &[HierarchyNode],
	id: NodeId,
	breadth: &mut [f64],
	previous_leaf: &mut Option<NodeId>,
) -> f64 {
	let node = &nodes[id];
	let pos = if node.is_leaf() {
		let pos = match *previous_leaf {
			Some(prev) => breadth[prev] + separation(nodes, prev, id),
			None => 0.0,
		};
		*previous_leaf = Some(id);
		pos
	} else {
		let mut first = None;
		let mut last = 0.0;
		for &child in &node.children {
			let child_pos = place_breadth(nodes, child, breadth, previous_leaf);
			first.get_or_insert(child_pos);
			last = child_pos;
		}
		(first.unwrap_or(last) + last) / 2.0
	};
	breadth[id] = pos;
	pos
}
