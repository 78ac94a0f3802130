use gloo_net::http::Request;

use super::config::DataUrls;
use super::error::{MapError, Result};

pub async fn fetch_text(url: &str) -> Result<String> {
	let fail = |e: gloo_net::Error| MapError::Fetch {
		url: url.to_owned(),
		message: e.to_string(),
	};
	let response = Request::get(url).send().await.map_err(fail)?;
	if !response.ok() {
		return Err(MapError::Fetch {
			url: url.to_owned(),
			message: format!("HTTP {}", response.status()),
		});
	}
	response.text().await.map_err(fail)
}

/// Fetches the airport and route tables together; both must arrive.
pub async fn fetch_tables(urls: &DataUrls) -> Result<(String, String)> {
	let (airports, routes) = futures::join!(fetch_text(&urls.airports), fetch_text(&urls.routes));
	Ok((airports?, routes?))
}
