use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent};

use super::highlight::HoverTarget;
use super::loader::ChartData;
use super::render;
use super::state::TreeTimelineState;
use super::tooltip::TooltipContent;

/// Id of the single tooltip overlay shared by every hover context.
pub const TOOLTIP_ID: &str = "tooltip-container";

fn viewport_size() -> Option<(f64, f64)> {
	let window = web_sys::window()?;
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

// Clamp the overlay into the viewport once it holds the active tooltip's lines.
fn place_tooltip(state: &RefCell<TreeTimelineState>, tooltip: &HtmlElement, pointer: (f64, f64)) {
	let Ok(mut s) = state.try_borrow_mut() else {
		return;
	};
	let Some(opacity) = s.coordinator.active().map(|a| a.tooltip.opacity()) else {
		return;
	};
	let tooltip_box = (tooltip.offset_width() as f64, tooltip.offset_height() as f64);
	let Some(viewport) = viewport_size() else {
		return;
	};
	if let Some(pos) = s.coordinator.place_tooltip(pointer, tooltip_box, viewport) {
		let style = tooltip.style();
		let _ = style.set_property("left", &format!("{}px", pos.left));
		let _ = style.set_property("top", &format!("{}px", pos.top));
		let _ = style.set_property("opacity", &opacity.to_string());
	}
}

#[component]
pub fn TreeTimelineCanvas(data: ChartData) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let tooltip_ref = NodeRef::<leptos::html::Div>::new();
	let hover_error = RwSignal::new(None::<String>);
	let tooltip_content = RwSignal::new(None::<TooltipContent>);
	let (width, height) = (data.config.outer_width, data.config.outer_height);
	let state = Rc::new(RefCell::new(TreeTimelineState::new(data)));
	let context: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));

	let (state_init, context_init) = (state.clone(), context.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("2d canvas context unavailable");
			return;
		};
		render::render(&state_init.borrow(), &ctx);
		*context_init.borrow_mut() = Some(ctx);
	});

	let update_hover = {
		let (state, context) = (state.clone(), context.clone());
		move |target: Option<HoverTarget>, pointer: (f64, f64)| {
			let mut s = state.borrow_mut();
			match s.set_hover(target) {
				Ok(false) => return,
				Ok(true) => hover_error.set(None),
				Err(err) => {
					error!("hover failed: {err}");
					hover_error.set(Some(err.to_string()));
				}
			}
			let content = s.coordinator.active().map(|a| a.tooltip.clone());
			if let Some(ref ctx) = *context.borrow() {
				render::render(&s, ctx);
			}
			drop(s);

			let Some(tooltip) = tooltip_ref.get() else {
				tooltip_content.set(content);
				return;
			};
			if content.is_none() {
				let _ = HtmlElement::style(&tooltip).set_property("opacity", "0");
				tooltip_content.set(None);
				return;
			}
			tooltip_content.set(content);
			// the overlay's lines are rendered before the next frame, measure then
			let state = state.clone();
			let place = Closure::once_into_js(move || place_tooltip(&state, &tooltip, pointer));
			if let Some(window) = web_sys::window() {
				let _ = window.request_animation_frame(place.unchecked_ref());
			}
		}
	};

	let update_move = update_hover.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		// canvas pixels may be scaled by CSS
		let (sx, sy) = (
			width / rect.width().max(1.0),
			height / rect.height().max(1.0),
		);
		let (x, y) = (
			(ev.client_x() as f64 - rect.left()) * sx,
			(ev.client_y() as f64 - rect.top()) * sy,
		);
		let target = state.borrow().target_at(x, y);
		update_move(target, (ev.page_x() as f64, ev.page_y() as f64));
	};

	let on_mouseleave = move |ev: MouseEvent| {
		update_hover(None, (ev.page_x() as f64, ev.page_y() as f64));
	};

	view! {
		<div class="tree-timeline">
			<canvas
				node_ref=canvas_ref
				class="tree-timeline-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				style="display: block;"
			/>
			<div
				node_ref=tooltip_ref
				id=TOOLTIP_ID
				style="position: absolute; opacity: 0; pointer-events: none;"
				style:display=move || {
					if tooltip_content.with(Option::is_some) { "inline" } else { "none" }
				}
			>
				{move || {
					tooltip_content
						.get()
						.map(|content| {
							content
								.lines()
								.into_iter()
								.map(|line| view! { <p class="tooltip-text">{line}</p> })
								.collect_view()
						})
				}}
			</div>
			{move || {
				hover_error
					.get()
					.map(|message| view! { <p class="hover-error">{message}</p> })
			}}
		</div>
	}
}
