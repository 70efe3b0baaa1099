//! Query planning: profile table -> active profile set -> request batch.
//!
//! Profiles are never mutated after derivation; geo and variant expansion
//! always copy-on-derive. The plan records the merge traversal order
//! explicitly (primary profiles in name order, then variant shadows per
//! variant), so score tie-breaks do not depend on backend response order.

use std::collections::BTreeMap;

use serde_json::Value;
use typeahead_backend::{CompletionParams, SuggestQuery};
use typeahead_config::{Config, Profile};

use super::{GeoContext, QueryKind};

/// Extra multiplicative discount applied to variant shadow profiles, divided
/// by the 1-based variant index so every variant ranks strictly below the
/// primary profiles and below earlier variants.
const VARIANT_EXTRA_DISCOUNT: f64 = 1e-4;

#[derive(Debug, Clone)]
pub(super) struct ActiveProfile {
	pub name: String,
	pub field: String,
	pub min_query_len: u32,
	pub max_query_len: Option<u32>,
	pub fan_out_factor: f64,
	pub discount: f64,
	pub fuzzy: Option<Value>,
	pub context: Option<Value>,
	pub fallback: bool,
}
impl ActiveProfile {
	fn from_base(name: &str, profile: &Profile) -> Self {
		Self {
			name: name.to_string(),
			field: profile.field.clone(),
			min_query_len: profile.min_query_len,
			max_query_len: profile.max_query_len,
			fan_out_factor: profile.fan_out_factor,
			discount: profile.discount,
			fuzzy: profile.fuzzy.clone(),
			context: None,
			fallback: false,
		}
	}
}

#[derive(Debug)]
pub(super) struct QueryPlan {
	pub kind: QueryKind,
	/// Profiles whose request fragment was accepted, in merge traversal
	/// order.
	pub profiles: Vec<ActiveProfile>,
	/// Request fragments keyed by profile name, dispatched as one batch.
	pub queries: BTreeMap<String, SuggestQuery>,
}
impl QueryPlan {
	pub fn build(
		cfg: &Config,
		term: &str,
		variants: &[String],
		geo: Option<GeoContext>,
		limit: i64,
	) -> Self {
		let kind = if geo.is_some() { QueryKind::Geo } else { QueryKind::Plain };
		let active = match geo {
			Some(geo) => derive_geo_profiles(cfg, geo),
			None => base_profiles(cfg),
		};
		// Surrounding whitespace never counts towards the length bounds.
		let query_len = term.trim().chars().count();
		let fetch_limit =
			if limit < 0 { i64::from(cfg.suggest.default_limit) } else { limit };
		let mut profiles = Vec::new();
		let mut queries = BTreeMap::new();

		for profile in &active {
			let Some(query) = build_suggest_query(profile, term, query_len, fetch_limit) else {
				continue;
			};

			queries.insert(profile.name.clone(), query);
			profiles.push(profile.clone());
		}

		for (index, variant) in variants.iter().enumerate() {
			let variant_index = index + 1;

			for profile in &active {
				let shadow = derive_variant_profile(profile, variant_index);
				// Length bounds are checked against the original term's
				// length; variants are assumed comparable in length class.
				let Some(query) = build_suggest_query(&shadow, variant, query_len, fetch_limit)
				else {
					continue;
				};

				queries.insert(shadow.name.clone(), query);
				profiles.push(shadow);
			}
		}

		Self { kind, profiles, queries }
	}
}

fn base_profiles(cfg: &Config) -> Vec<ActiveProfile> {
	cfg.profiles.iter().map(|(name, profile)| ActiveProfile::from_base(name, profile)).collect()
}

/// Derives the geo-contextual active set. Base profiles absent from a geo
/// fragment's applicability list are silently skipped, and no plain profile
/// survives into the active set.
fn derive_geo_profiles(cfg: &Config, geo: GeoContext) -> Vec<ActiveProfile> {
	let mut out = Vec::new();

	for (geo_name, geo_profile) in &cfg.geo_profiles {
		for (name, profile) in &cfg.profiles {
			if !geo_profile.with.iter().any(|with| with == name) {
				continue;
			}

			let mut derived = ActiveProfile::from_base(name, profile);

			derived.name = format!("{name}-{geo_name}");
			derived.field = format!("{}{}", profile.field, geo_profile.field_suffix);
			derived.discount = profile.discount * geo_profile.discount;
			derived.context = Some(serde_json::json!({
				"location": {
					"lat": geo.lat,
					"lon": geo.lon,
					"precision": geo_profile.precision,
				}
			}));

			out.push(derived);
		}
	}

	out
}

fn derive_variant_profile(base: &ActiveProfile, variant_index: usize) -> ActiveProfile {
	let mut shadow = base.clone();

	shadow.name = format!("{}-variant-{variant_index}", base.name);
	shadow.discount = base.discount * (VARIANT_EXTRA_DISCOUNT / variant_index as f64);
	shadow.fallback = true;

	shadow
}

fn build_suggest_query(
	profile: &ActiveProfile,
	input: &str,
	query_len: usize,
	fetch_limit: i64,
) -> Option<SuggestQuery> {
	// Keep trailing whitespace: the user may be telling us they finished a
	// word of a multi-word phrase.
	let text = input.trim_start();

	if query_len < profile.min_query_len as usize {
		return None;
	}
	if let Some(max) = profile.max_query_len
		&& query_len > max as usize
	{
		return None;
	}

	// Over-fetch: several raw hits can collapse onto one entity after the
	// merge, so requesting only the caller limit would under-fill the list.
	let size = (fetch_limit as f64 * profile.fan_out_factor).ceil() as u64;

	Some(SuggestQuery {
		text: text.to_string(),
		completion: CompletionParams {
			field: profile.field.clone(),
			size,
			fuzzy: profile.fuzzy.clone(),
			context: profile.context.clone(),
		},
	})
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use typeahead_config::{Backend, Config, GeoProfile, Profile, Suggest};

	use super::*;

	fn profile(field: &str, min: u32, max: Option<u32>, discount: f64) -> Profile {
		Profile {
			field: field.to_string(),
			min_query_len: min,
			max_query_len: max,
			fan_out_factor: 2.0,
			discount,
			fuzzy: None,
		}
	}

	fn config(profiles: BTreeMap<String, Profile>, geo: BTreeMap<String, GeoProfile>) -> Config {
		Config {
			suggest: Suggest { max_input_length: 50, default_limit: 10, timeout_ms: 500 },
			backend: Backend {
				url: "http://localhost:9200".to_string(),
				index: "titlesuggest".to_string(),
				content_index: "content".to_string(),
				alternate_titles_field: "redirect".to_string(),
			},
			profiles,
			geo_profiles: geo,
		}
	}

	fn plain_config() -> Config {
		config(
			BTreeMap::from([("plain".to_string(), profile("suggest", 0, None, 1.0))]),
			BTreeMap::new(),
		)
	}

	#[test]
	fn accepted_profile_emits_exactly_one_fragment() {
		let plan = QueryPlan::build(&plain_config(), "albert", &[], None, 5);

		assert_eq!(plan.kind, QueryKind::Plain);
		assert_eq!(plan.queries.len(), 1);

		let query = &plan.queries["plain"];

		assert_eq!(query.text, "albert");
		assert_eq!(query.completion.field, "suggest");
		assert_eq!(query.completion.size, 10);
	}

	#[test]
	fn length_bounds_reject_without_emitting_fragments() {
		let cfg = config(
			BTreeMap::from([
				("long".to_string(), profile("suggest", 10, None, 1.0)),
				("short".to_string(), profile("suggest", 0, Some(3), 1.0)),
			]),
			BTreeMap::new(),
		);
		let plan = QueryPlan::build(&cfg, "albert", &[], None, 5);

		assert!(plan.queries.is_empty());
		assert!(plan.profiles.is_empty());
	}

	#[test]
	fn leading_whitespace_is_stripped_and_trailing_kept() {
		let cfg = config(
			BTreeMap::from([("plain".to_string(), profile("suggest", 6, Some(6), 1.0))]),
			BTreeMap::new(),
		);
		let plan = QueryPlan::build(&cfg, "  albert ", &[], None, 5);

		// Trimmed length (6) passes the bounds even though the raw input is
		// longer, and the emitted text keeps its trailing space.
		assert_eq!(plan.queries["plain"].text, "albert ");
	}

	#[test]
	fn fragment_size_is_limit_times_fan_out_rounded_up() {
		let mut cfg = plain_config();

		cfg.profiles.get_mut("plain").unwrap().fan_out_factor = 1.5;

		let plan = QueryPlan::build(&cfg, "albert", &[], None, 5);

		assert_eq!(plan.queries["plain"].completion.size, 8);
	}

	#[test]
	fn unlimited_limit_sizes_fragments_from_the_default() {
		let plan = QueryPlan::build(&plain_config(), "albert", &[], None, -1);

		assert_eq!(plan.queries["plain"].completion.size, 20);
	}

	#[test]
	fn variant_shadows_follow_primaries_with_decreasing_discounts() {
		let variants = ["alberto".to_string(), "adalbert".to_string()];
		let plan = QueryPlan::build(&plain_config(), "albert", &variants, None, 5);
		let names: Vec<&str> = plan.profiles.iter().map(|p| p.name.as_str()).collect();

		assert_eq!(names, vec!["plain", "plain-variant-1", "plain-variant-2"]);
		assert!(!plan.profiles[0].fallback);
		assert!(plan.profiles[1].fallback && plan.profiles[2].fallback);
		assert_eq!(plan.profiles[1].discount, 1e-4);
		assert_eq!(plan.profiles[2].discount, 1e-4 / 2.0);
		assert_eq!(plan.queries["plain-variant-1"].text, "alberto");
		assert_eq!(plan.queries["plain-variant-2"].text, "adalbert");
	}

	#[test]
	fn variant_bounds_use_the_original_term_length() {
		let cfg = config(
			BTreeMap::from([("plain".to_string(), profile("suggest", 0, Some(6), 1.0))]),
			BTreeMap::new(),
		);
		let variants = ["a much longer alternate spelling".to_string()];
		let plan = QueryPlan::build(&cfg, "albert", &variants, None, 5);

		// The variant text exceeds max_query_len but the original term does
		// not, so the shadow fragment is still emitted.
		assert!(plan.queries.contains_key("plain-variant-1"));
	}

	#[test]
	fn geo_context_replaces_the_active_set_with_derived_profiles() {
		let cfg = config(
			BTreeMap::from([
				("plain".to_string(), profile("suggest", 0, None, 0.5)),
				("other".to_string(), profile("suggest", 0, None, 1.0)),
			]),
			BTreeMap::from([(
				"nearby".to_string(),
				GeoProfile {
					field_suffix: "-geo".to_string(),
					discount: 2.0,
					precision: vec![1, 2, 3],
					with: vec!["plain".to_string()],
				},
			)]),
		);
		let plan =
			QueryPlan::build(&cfg, "albert", &[], Some(GeoContext { lat: 1.0, lon: 1.0 }), 5);

		assert_eq!(plan.kind, QueryKind::Geo);
		assert_eq!(plan.profiles.len(), 1);
		assert_eq!(plan.profiles[0].name, "plain-nearby");
		assert_eq!(plan.profiles[0].discount, 1.0);
		assert!(!plan.queries.contains_key("plain"));
		assert!(!plan.queries.contains_key("other"));

		let query = &plan.queries["plain-nearby"];

		assert_eq!(query.completion.field, "suggest-geo");
		assert_eq!(
			query.completion.context,
			Some(serde_json::json!({
				"location": { "lat": 1.0, "lon": 1.0, "precision": [1, 2, 3] }
			}))
		);
	}
}
