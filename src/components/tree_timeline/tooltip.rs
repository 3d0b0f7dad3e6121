use super::types::Weekday;

const POINTER_OFFSET: f64 = 10.0;
const RIGHT_INSET: f64 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipPosition {
	pub top: f64,
	pub left: f64,
}

/// Place a `box_width` × `box_height` overlay next to the pointer, pulled back
/// inside the viewport when it would overflow the right or bottom edge.
pub fn position(
	pointer_x: f64,
	pointer_y: f64,
	box_width: f64,
	box_height: f64,
	viewport_width: f64,
	viewport_height: f64,
) -> TooltipPosition {
	let mut left = pointer_x + POINTER_OFFSET;
	let mut top = pointer_y + POINTER_OFFSET;
	if left + box_width > viewport_width {
		left = viewport_width - box_width - RIGHT_INSET;
	}
	if top + box_height > viewport_height {
		top = viewport_height - box_height;
	}
	TooltipPosition { top, left }
}

/// What the overlay says about the hovered element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TooltipContent {
	Leaf {
		speed_zone: String,
		year: String,
		total: u64,
	},
	Internal {
		children: usize,
	},
	Bar {
		year: String,
		speed_zone: String,
		day: Weekday,
		count: u32,
	},
}

impl TooltipContent {
	pub fn lines(&self) -> Vec<String> {
		match self {
			TooltipContent::Leaf {
				speed_zone,
				year,
				total,
			} => vec![
				format!("Speed Zone: {speed_zone}"),
				format!("Year: {year}"),
				format!("# Accidents: {total}"),
			],
			TooltipContent::Internal { children } => {
				vec![format!("Number of Children Nodes: {children}")]
			}
			TooltipContent::Bar {
				year,
				speed_zone,
				day,
				count,
			} => vec![
				format!("Year: {year}"),
				format!("Speed Zone: {speed_zone}"),
				format!("Day: {day}"),
				format!("# Accidents: {count}"),
			],
		}
	}

	pub fn opacity(&self) -> f64 {
		match self {
			TooltipContent::Internal { .. } => 0.9,
			TooltipContent::Leaf { .. } | TooltipContent::Bar { .. } => 0.7,
		}
	}
}
