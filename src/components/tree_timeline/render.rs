use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::highlight::VisualState;
use super::state::TreeTimelineState;
use super::timeline::DAY_BAR_WIDTH;

const DIMMED_ALPHA: f64 = 0.15;
const GRID_COLOR: &str = "#ccc";
const EDGE_COLOR: &str = "#bbb";
const EDGE_HIGHLIGHT: &str = "#e4572e";
const INTERNAL_FILL: &str = "#4c78a8";
const LEAF_FILL: &str = "#9ecae9";
const HOVER_FILL: &str = "#f2b701";

pub fn render(state: &TreeTimelineState, ctx: &CanvasRenderingContext2d) {
	let config = state.config();
	ctx.set_fill_style_str("white");
	ctx.fill_rect(0.0, 0.0, config.outer_width, config.outer_height);
	ctx.save();
	let _ = ctx.translate(config.margin.left, config.margin.top);
	draw_axis(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_bars(state, ctx);
	ctx.restore();
	draw_legend(state, ctx);
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: &[f64]) {
	let pattern = js_sys::Array::new();
	for d in dash {
		pattern.push(&JsValue::from_f64(*d));
	}
	let _ = ctx.set_line_dash(&pattern);
}

fn draw_axis(state: &TreeTimelineState, ctx: &CanvasRenderingContext2d) {
	let config = state.config();
	let height = state.data.layout.size().1;
	let (origin_x, origin_y) = (config.tree_width() + config.node_radius, height);

	ctx.save();
	let _ = ctx.translate(origin_x, origin_y);
	ctx.set_stroke_style_str(GRID_COLOR);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	ctx.move_to(0.0, 0.0);
	ctx.line_to(state.timeline.length(), 0.0);
	ctx.stroke();

	set_dash(ctx, &[4.0, 4.0]);
	ctx.set_fill_style_str("grey");
	ctx.set_font("10px sans-serif");
	ctx.set_text_align("center");
	for (label, pos) in state.timeline.ticks() {
		ctx.begin_path();
		ctx.move_to(pos, 0.0);
		ctx.line_to(pos, -height);
		ctx.stroke();
		if !label.is_empty() {
			let _ = ctx.fill_text(label, pos - state.timeline.interval() / 2.0, 15.0);
		}
	}
	set_dash(ctx, &[]);
	ctx.restore();
}

fn draw_edges(state: &TreeTimelineState, ctx: &CanvasRenderingContext2d) {
	let layout = &state.data.layout;
	for (i, edge) in layout.edges().iter().enumerate() {
		let (child, parent) = (layout.node(edge.node), layout.node(edge.parent));
		let highlighted = state.coordinator.edge_highlighted(i);
		let (color, width) = if highlighted {
			(EDGE_HIGHLIGHT, 3.0)
		} else {
			(EDGE_COLOR, 1.5)
		};
		let mid = (child.x + parent.x) / 2.0;

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(child.x, child.y);
		ctx.bezier_curve_to(mid, child.y, mid, parent.y, parent.x, parent.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &TreeTimelineState, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for node in state.data.layout.nodes() {
		let visual = state.coordinator.node_state(node.id);
		let (rx, ry) = TreeTimelineState::node_radii(node);
		let fill = match visual {
			VisualState::Hovered => HOVER_FILL,
			_ if node.is_leaf() => LEAF_FILL,
			_ => INTERNAL_FILL,
		};

		ctx.set_global_alpha(if visual == VisualState::Dimmed {
			DIMMED_ALPHA
		} else {
			1.0
		});
		ctx.begin_path();
		let _ = ctx.ellipse(node.x, node.y, rx, ry, 0.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		if matches!(visual, VisualState::Hovered | VisualState::Related) {
			ctx.set_stroke_style_str(EDGE_HIGHLIGHT);
			ctx.set_line_width(2.0);
			ctx.stroke();
		}

		ctx.set_fill_style_str("black");
		ctx.set_font("11px sans-serif");
		match node.year() {
			Some(year) => {
				let _ = ctx.fill_text(node.name(), node.x, node.y - 6.0);
				let _ = ctx.fill_text(year, node.x, node.y + 7.0);
			}
			None => {
				let _ = ctx.fill_text(node.name(), node.x, node.y);
			}
		}
		ctx.set_global_alpha(1.0);
	}
}

fn draw_bars(state: &TreeTimelineState, ctx: &CanvasRenderingContext2d) {
	let (layout, dataset) = (&state.data.layout, &state.data.dataset);
	ctx.set_line_cap("butt");
	for leaf in layout.leaves() {
		let (Some(zone), Some(year)) = (layout.speed_zone(leaf.id), leaf.year()) else {
			continue;
		};
		for bar in state.timeline.bars() {
			// coverage is checked at load, a gap here is simply not drawn
			let Ok(record) = dataset.record_for(zone, year, bar.day) else {
				continue;
			};
			let visual = state.coordinator.bar_state(leaf.id, bar.day);
			let (x1, x2) = (leaf.x + bar.x1, leaf.x + bar.x2);

			ctx.set_global_alpha(if visual == VisualState::Dimmed {
				DIMMED_ALPHA
			} else {
				1.0
			});
			if visual == VisualState::Hovered {
				ctx.set_stroke_style_str("black");
				ctx.set_line_width(DAY_BAR_WIDTH + 4.0);
				ctx.begin_path();
				ctx.move_to(x1 - 2.0, leaf.y);
				ctx.line_to(x2 + 2.0, leaf.y);
				ctx.stroke();
			}
			ctx.set_stroke_style_str(&state.scale.color_for_count(record.accident_count));
			ctx.set_line_width(DAY_BAR_WIDTH);
			ctx.begin_path();
			ctx.move_to(x1, leaf.y);
			ctx.line_to(x2, leaf.y);
			ctx.stroke();
		}
	}
	ctx.set_global_alpha(1.0);
}

// Same scale instance as the bars, so legend and bars agree.
fn draw_legend(state: &TreeTimelineState, ctx: &CanvasRenderingContext2d) {
	let legend = &state.config().legend;
	let (x, y) = (legend.margin_left, legend.margin_top);
	let bar_y = y + 8.0;
	let bar_height = (legend.height / 7.0).max(6.0);

	ctx.set_fill_style_str("black");
	ctx.set_font("bold 11px sans-serif");
	ctx.set_text_align("left");
	ctx.set_text_baseline("bottom");
	let _ = ctx.fill_text(&legend.title, x, y);

	let gradient = ctx.create_linear_gradient(x, 0.0, x + legend.width, 0.0);
	for (offset, color) in state.scale.legend_stops(16) {
		let _ = gradient.add_color_stop(offset as f32, &color);
	}
	ctx.set_fill_style_canvas_gradient(&gradient);
	ctx.fill_rect(x, bar_y, legend.width, bar_height);

	let (min, max) = state.scale.domain();
	ctx.set_fill_style_str("grey");
	ctx.set_font("10px sans-serif");
	ctx.set_text_baseline("top");
	let _ = ctx.fill_text(&min.to_string(), x, bar_y + bar_height + 3.0);
	ctx.set_text_align("right");
	let _ = ctx.fill_text(&max.to_string(), x + legend.width, bar_y + bar_height + 3.0);
}
