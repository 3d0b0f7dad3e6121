use std::sync::Arc;

use gloo_net::http::Request;
use log::info;

use super::config::ChartConfig;
use super::dataset::DatasetIndex;
use super::error::ChartError;
use super::layout::TreeLayout;
use super::types::HierarchyDoc;

/// Everything the chart needs, built once at startup and read-only afterwards.
#[derive(Clone, Debug)]
pub struct ChartData {
	pub config: ChartConfig,
	pub layout: Arc<TreeLayout>,
	pub dataset: Arc<DatasetIndex>,
}

impl ChartData {
	/// Build the chart from the raw hierarchy JSON and accident CSV.
	pub fn from_sources(
		hierarchy_json: &str,
		accidents_csv: &str,
		config: ChartConfig,
	) -> Result<Self, ChartError> {
		let doc: HierarchyDoc = serde_json::from_str(hierarchy_json)
			.map_err(|e| ChartError::load("roads hierarchy", e))?;
		let layout = TreeLayout::new(&doc, config.tree_width(), config.inner_height())?;
		let dataset = DatasetIndex::from_csv(accidents_csv)?;
		dataset.verify_coverage(&layout)?;
		info!(
			"Laid out {} nodes ({} leaves)",
			layout.nodes().len(),
			layout.leaves().count()
		);
		Ok(Self {
			config,
			layout: Arc::new(layout),
			dataset: Arc::new(dataset),
		})
	}
}

async fn fetch_text(source_name: &str, url: &str) -> Result<String, ChartError> {
	let response = Request::get(url)
		.send()
		.await
		.map_err(|e| ChartError::load(source_name, e))?;
	if !response.ok() {
		return Err(ChartError::load(
			source_name,
			format!("{} {} from {url}", response.status(), response.status_text()),
		));
	}
	response
		.text()
		.await
		.map_err(|e| ChartError::load(source_name, e))
}

/// Fetch both sources concurrently; nothing is built until both have arrived.
pub async fn load(config: ChartConfig) -> Result<ChartData, ChartError> {
	info!(
		"Loading hierarchy from {} and accidents from {}",
		config.hierarchy_url, config.accidents_url
	);
	let (hierarchy, accidents) = futures::join!(
		fetch_text("roads hierarchy", &config.hierarchy_url),
		fetch_text("accident table", &config.accidents_url),
	);
	ChartData::from_sources(&hierarchy?, &accidents?, config)
}
