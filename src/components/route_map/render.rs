use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::chrome::{self, AIRPORT_LEGEND_TITLE, ROUTE_LEGEND_LABEL, ROUTE_LEGEND_TITLE};
use super::curve::PathCommand;
use super::geo::Layer;
use super::state::{FlightLayer, RouteMapState};

const AIRPORT_FILL: &str = "#888888";
const HIGHLIGHT: &str = "#e6550d";
const FLIGHT_STROKE: &str = "rgba(68, 68, 68, 0.25)";
const FLIGHT_HIGHLIGHT: &str = "rgba(230, 85, 13, 0.9)";

/// Handles every draw function works against.
pub struct DrawContext<'a> {
	pub ctx: &'a CanvasRenderingContext2d,
	pub width: f64,
	pub height: f64,
}

pub fn render(state: &RouteMapState, ctx: &CanvasRenderingContext2d) {
	let dc = DrawContext {
		ctx,
		width: state.width,
		height: state.height,
	};
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, dc.width, dc.height);

	draw_layer(&dc, &state.basemap, Some("#dddddd"), "white", 1.0);
	draw_layer(&dc, &state.nine_lines, None, "grey", 2.0);
	if let Some(flights) = &state.flights {
		draw_regions(&dc, state, flights);
		draw_flights(&dc, state, flights);
		draw_airports(&dc, state, flights);
	}
	draw_north_arrow(&dc);
	draw_scale_bar(&dc, state);
	if let Some(flights) = &state.flights {
		draw_legend(&dc, flights);
	}
	draw_tooltip(&dc, state);
}

fn trace(ctx: &CanvasRenderingContext2d, points: &[(f64, f64)], closed: bool) {
	let Some((&(x0, y0), rest)) = points.split_first() else {
		return;
	};
	ctx.move_to(x0, y0);
	for &(x, y) in rest {
		ctx.line_to(x, y);
	}
	if closed {
		ctx.close_path();
	}
}

fn draw_layer(dc: &DrawContext, layer: &Layer, fill: Option<&str>, stroke: &str, width: f64) {
	let ctx = dc.ctx;
	ctx.set_stroke_style_str(stroke);
	ctx.set_line_width(width);
	for feature in layer {
		ctx.begin_path();
		for part in &feature.parts {
			trace(ctx, part, feature.closed);
		}
		if let (Some(fill), true) = (fill, feature.closed) {
			ctx.set_fill_style_str(fill);
			ctx.fill();
		}
		ctx.stroke();
	}
}

fn draw_regions(dc: &DrawContext, state: &RouteMapState, flights: &FlightLayer) {
	let ctx = dc.ctx;
	for (i, region) in flights.regions.iter().enumerate() {
		let pinned = state.highlights.outlines.contains(&i);
		let hovered = state.interaction.hovered == Some(i);
		if !pinned && !hovered {
			continue;
		}
		ctx.begin_path();
		trace(ctx, region, true);
		if pinned {
			ctx.set_fill_style_str("rgba(230, 85, 13, 0.08)");
			ctx.fill();
		}
		let dash = if pinned {
			js_sys::Array::new()
		} else {
			js_sys::Array::of2(&JsValue::from_f64(4.0), &JsValue::from_f64(3.0))
		};
		let _ = ctx.set_line_dash(&dash);
		ctx.set_stroke_style_str(if pinned { HIGHLIGHT } else { "#bbbbbb" });
		ctx.set_line_width(1.0);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn trace_curve(ctx: &CanvasRenderingContext2d, commands: &[PathCommand]) {
	for cmd in commands {
		match *cmd {
			PathCommand::MoveTo(x, y) => ctx.move_to(x, y),
			PathCommand::LineTo(x, y) => ctx.line_to(x, y),
			PathCommand::BezierTo { c1, c2, to } => {
				ctx.bezier_curve_to(c1.0, c1.1, c2.0, c2.1, to.0, to.1)
			}
		}
	}
}

fn draw_flights(dc: &DrawContext, state: &RouteMapState, flights: &FlightLayer) {
	let ctx = dc.ctx;
	ctx.set_line_width(1.0);
	ctx.set_stroke_style_str(FLIGHT_STROKE);
	for (i, curve) in flights.curves.iter().enumerate() {
		if state.highlights.flights.contains(&i) {
			continue;
		}
		ctx.begin_path();
		trace_curve(ctx, curve);
		ctx.stroke();
	}

	// Highlighted flights are raised above the rest.
	ctx.set_line_width(1.5);
	ctx.set_stroke_style_str(FLIGHT_HIGHLIGHT);
	for &i in &state.highlights.flights {
		if let Some(curve) = flights.curves.get(i) {
			ctx.begin_path();
			trace_curve(ctx, curve);
			ctx.stroke();
		}
	}
}

fn draw_airports(dc: &DrawContext, state: &RouteMapState, flights: &FlightLayer) {
	let ctx = dc.ctx;
	ctx.set_stroke_style_str("white");
	ctx.set_line_width(0.5);
	for (i, airport) in flights.network.airports.iter().enumerate() {
		let (x, y) = airport.xy();
		let highlighted = state.highlights.bubbles.contains(&i);
		ctx.set_global_alpha(if highlighted { 1.0 } else { 0.8 });
		ctx.begin_path();
		let _ = ctx.arc(x, y, flights.bubble_radius(i), 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if highlighted { HIGHLIGHT } else { AIRPORT_FILL });
		ctx.fill();
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_north_arrow(dc: &DrawContext) {
	let ctx = dc.ctx;
	let arrow = chrome::north_arrow(dc.width);
	ctx.save();
	let _ = ctx.translate(arrow.origin.0, arrow.origin.1);

	ctx.begin_path();
	trace(ctx, &arrow.outline, true);
	ctx.set_fill_style_str("white");
	ctx.fill();
	ctx.set_stroke_style_str("black");
	ctx.set_line_width(1.5);
	ctx.stroke();

	ctx.begin_path();
	trace(ctx, &arrow.shaded, true);
	ctx.set_fill_style_str("black");
	ctx.fill();

	ctx.set_font("16px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text("N", arrow.label.0, arrow.label.1);
	ctx.restore();
}

fn draw_scale_bar(dc: &DrawContext, state: &RouteMapState) {
	let ctx = dc.ctx;
	let bar = chrome::scale_bar(&state.projection, dc.width, dc.height);
	ctx.save();
	let _ = ctx.translate(bar.origin.0, bar.origin.1);

	ctx.set_stroke_style_str("black");
	ctx.set_line_width(1.0);
	for segment in &bar.segments {
		ctx.set_fill_style_str(if segment.filled { "black" } else { "white" });
		ctx.fill_rect(segment.x, 0.0, segment.width, chrome::SCALE_BAR_HEIGHT);
		ctx.stroke_rect(segment.x, 0.0, segment.width, chrome::SCALE_BAR_HEIGHT);
	}

	ctx.set_fill_style_str("black");
	ctx.set_font("15px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	for (x, text) in &bar.labels {
		let _ = ctx.fill_text(text, *x, 25.0);
	}
	ctx.restore();
}

fn draw_legend(dc: &DrawContext, flights: &FlightLayer) {
	let ctx = dc.ctx;
	let legend = chrome::legend(&flights.bubbles, dc.height);

	ctx.set_fill_style_str("black");
	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
	ctx.set_font("bold 15px sans-serif");
	let _ = ctx.fill_text(AIRPORT_LEGEND_TITLE, legend.airport_title.0, legend.airport_title.1);
	let _ = ctx.fill_text(ROUTE_LEGEND_TITLE, legend.route_title.0, legend.route_title.1);

	ctx.set_font("14px sans-serif");
	ctx.set_text_baseline("middle");
	let text_x = legend.bubbles.iter().map(|b| b.center.0).fold(0.0, f64::max) + 45.0;
	for bubble in &legend.bubbles {
		ctx.begin_path();
		let _ = ctx.arc(bubble.center.0, bubble.center.1, bubble.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(AIRPORT_FILL);
		ctx.fill();
		ctx.set_fill_style_str("black");
		let _ = ctx.fill_text(&bubble.label, text_x, bubble.center.1);
	}

	let ((x1, y1), (x2, y2)) = legend.route_line;
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.set_stroke_style_str("#444444");
	ctx.set_line_width(2.0);
	ctx.stroke();
	let _ = ctx.fill_text(ROUTE_LEGEND_LABEL, legend.route_label.0, legend.route_label.1);
}

fn draw_tooltip(dc: &DrawContext, state: &RouteMapState) {
	let ctx = dc.ctx;
	ctx.set_font("bold 14px sans-serif");
	let measure = |text: &str| ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0);
	let Some(tooltip) = state.tooltip(measure) else {
		return;
	};

	ctx.set_text_align(tooltip.anchor.as_align());
	ctx.set_text_baseline("alphabetic");
	let (x, y) = (tooltip.x, tooltip.y + tooltip.dy);
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.9)");
	ctx.set_line_width(3.0);
	let _ = ctx.stroke_text(&tooltip.text, x, y);
	ctx.set_fill_style_str("black");
	let _ = ctx.fill_text(&tooltip.text, x, y);
}
