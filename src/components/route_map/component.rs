use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::config::MapConfig;
use super::error::{MapError, Result};
use super::fetch::{fetch_tables, fetch_text};
use super::geo::{self, Layer};
use super::loader;
use super::layout::LayoutEvent;
use super::render;
use super::state::RouteMapState;

type SharedState = Rc<RefCell<Option<RouteMapState>>>;

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
		.ok_or_else(|| MapError::Surface("canvas has no 2d context".into()))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn spawn_layer_load(state: SharedState, url: String, assign: fn(&mut RouteMapState, Layer)) {
	spawn_local(async move {
		let projection = match state.borrow().as_ref() {
			Some(s) => s.projection.clone(),
			None => return,
		};
		match fetch_text(&url).await.and_then(|json| geo::load_layer(&json, &projection)) {
			Ok(layer) => {
				if let Some(ref mut s) = *state.borrow_mut() {
					assign(s, layer);
				}
			}
			Err(e) => error!("{e}"),
		}
	});
}

#[component]
pub fn RouteMapCanvas(#[prop(default = MapConfig::default())] config: MapConfig) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let failure = RwSignal::new(None::<String>);
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());
	let (width, height) = (config.width, config.height);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);

		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				error!("{e}");
				failure.set(Some(e.to_string()));
				return;
			}
		};
		*state_init.borrow_mut() = Some(RouteMapState::new(config.clone()));

		let urls = config.urls.clone();
		spawn_layer_load(state_init.clone(), urls.basemap.clone(), |s, layer| s.basemap = layer);
		spawn_layer_load(state_init.clone(), urls.nine_lines.clone(), |s, layer| s.nine_lines = layer);

		let (state_data, top_n) = (state_init.clone(), config.top_n);
		spawn_local(async move {
			let projection = match state_data.borrow().as_ref() {
				Some(s) => s.projection.clone(),
				None => return,
			};
			let network = fetch_tables(&urls).await.and_then(|(airports, routes)| {
				loader::load_network(&airports, &routes, &projection, top_n)
			});
			match network {
				Ok(network) => {
					if let Some(ref mut s) = *state_data.borrow_mut() {
						s.set_network(network);
					}
				}
				Err(e) => {
					error!("{e}");
					failure.set(Some(e.to_string()));
				}
			}
		});

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if let Some(LayoutEvent::Finished(status)) = s.tick() {
					debug!("flight curves final ({status:?})");
				}
				render::render(s, &ctx);
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		let window: Option<Window> = web_sys::window();
		if let (Some(window), Some(cb)) = (window, animate_init.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_moved(x, y);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_left();
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.double_clicked(x, y);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="route-map-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			style="display: block;"
		/>
		{move || failure.get().map(|message| view! { <p class="map-error">{message}</p> })}
	}
}
