use leptos::prelude::*;

use crate::components::route_map::{MapConfig, RouteMapCanvas};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = MapConfig::default();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="route-map">
				<RouteMapCanvas config=config />
				<div class="map-overlay">
					<h1>"Flight Routes"</h1>
					<p class="subtitle">"Hover a region to see an airport's routes. Double-click to pin it."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
