use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub suggest: Suggest,
	pub backend: Backend,
	/// Base scoring profiles, keyed by name. `BTreeMap` keeps profile
	/// traversal in name order so merge tie-breaks are deterministic.
	pub profiles: BTreeMap<String, Profile>,
	/// Geo-context profile fragments, keyed by name.
	#[serde(default)]
	pub geo_profiles: BTreeMap<String, GeoProfile>,
}

#[derive(Debug, Deserialize)]
pub struct Suggest {
	/// Maximum input length in chars; longer terms are truncated, not
	/// rejected, to stay within backend indexing limits.
	pub max_input_length: usize,
	/// Fetch sizing fallback when the caller requests an unlimited result
	/// count (negative limit).
	pub default_limit: u32,
	/// Timeout for both backend round trips.
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Backend {
	pub url: String,
	/// Completion-suggest index.
	pub index: String,
	/// Main content index holding alternate titles.
	pub content_index: String,
	/// Source field storing each entity's alternate titles, e.g. "redirect".
	pub alternate_titles_field: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
	pub field: String,
	pub min_query_len: u32,
	pub max_query_len: Option<u32>,
	/// Over-fetch multiplier compensating for post-merge deduplication.
	pub fan_out_factor: f64,
	/// Multiplicative weight applied to raw backend scores.
	pub discount: f64,
	/// Opaque fuzzy parameters, copied verbatim into the request fragment.
	pub fuzzy: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoProfile {
	pub field_suffix: String,
	pub discount: f64,
	/// Geohash precision steps carried into the derived location context.
	pub precision: Vec<u32>,
	/// Names of the base profiles this fragment applies to.
	pub with: Vec<String>,
}
