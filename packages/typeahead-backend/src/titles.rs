//! Batched secondary lookup of alternate titles from the main content index.

use std::{collections::HashMap, time::Duration};

use serde_json::Value;

use crate::{Error, Result};

pub async fn fetch_alternate_titles(
	cfg: &typeahead_config::Backend,
	entity_ids: &[String],
	timeout: Duration,
) -> Result<HashMap<String, Vec<String>>> {
	let client = crate::client(timeout)?;
	let url = format!("{}/{}/_mget", cfg.url, cfg.content_index);
	let body = serde_json::json!({ "ids": entity_ids });
	let res = client
		.post(url)
		.query(&[("_source_include", cfg.alternate_titles_field.as_str())])
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_mget_response(json, &cfg.alternate_titles_field)
}

pub fn parse_mget_response(json: Value, field: &str) -> Result<HashMap<String, Vec<String>>> {
	let docs = json
		.get("docs")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Alternate-title response is missing the docs array.".to_string(),
		})?;
	let mut out = HashMap::new();

	for doc in docs {
		let Some(id) = doc.get("_id").and_then(Value::as_str) else {
			continue;
		};
		let Some(values) = doc.pointer(&format!("/_source/{field}")).and_then(Value::as_array)
		else {
			continue;
		};
		let titles: Vec<String> =
			values.iter().filter_map(Value::as_str).map(str::to_string).collect();

		if !titles.is_empty() {
			out.insert(id.to_string(), titles);
		}
	}

	Ok(out)
}
