use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::tree_timeline::{self, ChartConfig, TreeTimelineCanvas};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// `?hierarchy=<url>&accidents=<url>` points the chart at other sources
	let query = use_query_map();
	let config = query.with_untracked(|q| {
		ChartConfig::default().with_sources(q.get("hierarchy"), q.get("accidents"))
	});

	// Both sources must arrive before anything interactive exists.
	let chart = LocalResource::new(move || tree_timeline::load(config.clone()));

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

			<div class="chart-page">
				<h1>"Road accidents by speed zone, year and weekday"</h1>
				<p class="subtitle">"Hover a node or a day bar for details."</p>
				<Suspense fallback=|| view! { <p class="loading">"Loading accident data..."</p> }>
					{move || Suspend::new(async move {
						chart.await.map(|data| view! { <TreeTimelineCanvas data=data /> })
					})}
				</Suspense>
			</div>
		</ErrorBoundary>
	}
}
