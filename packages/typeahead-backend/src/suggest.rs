//! The batched completion-suggest round trip.
//!
//! All per-profile request fragments go out in a single `_suggest` call and
//! the response mirrors the request keys, so one backend round trip covers
//! every profile and variant.

use std::{
	collections::{BTreeMap, HashMap},
	time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

/// One completion request fragment, keyed by profile name in the batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SuggestQuery {
	pub text: String,
	pub completion: CompletionParams,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionParams {
	pub field: String,
	pub size: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fuzzy: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub context: Option<Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SuggestGroup {
	#[serde(default)]
	pub options: Vec<SuggestOption>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SuggestOption {
	/// Opaque payload stored by the indexing side; decoded by the caller.
	pub text: String,
	pub score: f64,
}

#[derive(Debug)]
pub struct SuggestResponse {
	/// Client-measured elapsed time for the round trip.
	pub took_ms: u64,
	/// Hit groups keyed by the profile name that requested them.
	pub groups: HashMap<String, Vec<SuggestGroup>>,
}

pub async fn completion_suggest(
	cfg: &typeahead_config::Backend,
	queries: &BTreeMap<String, SuggestQuery>,
	timeout: Duration,
) -> Result<SuggestResponse> {
	let client = crate::client(timeout)?;
	let url = format!("{}/{}/_suggest", cfg.url, cfg.index);
	let started = Instant::now();
	let res = client.post(url).json(queries).send().await?;
	let json: Value = res.error_for_status()?.json().await?;
	let took_ms = started.elapsed().as_millis() as u64;

	Ok(SuggestResponse { took_ms, groups: parse_suggest_response(json)? })
}

#[derive(Debug, Deserialize)]
struct RawSuggestResponse {
	#[serde(default, rename = "_shards")]
	_shards: Option<Value>,
	#[serde(flatten)]
	groups: HashMap<String, Vec<SuggestGroup>>,
}

pub fn parse_suggest_response(json: Value) -> Result<HashMap<String, Vec<SuggestGroup>>> {
	let raw: RawSuggestResponse = serde_json::from_value(json)?;

	Ok(raw.groups)
}
