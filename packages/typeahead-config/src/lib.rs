mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backend, Config, GeoProfile, Profile, Suggest};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.suggest.max_input_length == 0 {
		return Err(Error::Validation {
			message: "suggest.max_input_length must be greater than zero.".to_string(),
		});
	}
	if cfg.suggest.default_limit == 0 {
		return Err(Error::Validation {
			message: "suggest.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.suggest.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "suggest.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("backend.url", &cfg.backend.url),
		("backend.index", &cfg.backend.index),
		("backend.content_index", &cfg.backend.content_index),
		("backend.alternate_titles_field", &cfg.backend.alternate_titles_field),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.profiles.is_empty() {
		return Err(Error::Validation { message: "profiles must be non-empty.".to_string() });
	}

	for (name, profile) in &cfg.profiles {
		if profile.field.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("profiles.{name}.field must be non-empty."),
			});
		}
		if !profile.discount.is_finite() || profile.discount <= 0.0 {
			return Err(Error::Validation {
				message: format!("profiles.{name}.discount must be a finite number greater than zero."),
			});
		}
		if !profile.fan_out_factor.is_finite() || profile.fan_out_factor <= 0.0 {
			return Err(Error::Validation {
				message: format!(
					"profiles.{name}.fan_out_factor must be a finite number greater than zero."
				),
			});
		}
		if let Some(max) = profile.max_query_len
			&& profile.min_query_len > max
		{
			return Err(Error::Validation {
				message: format!(
					"profiles.{name}.min_query_len must not exceed profiles.{name}.max_query_len."
				),
			});
		}
	}

	for (name, geo) in &cfg.geo_profiles {
		if geo.field_suffix.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("geo_profiles.{name}.field_suffix must be non-empty."),
			});
		}
		if !geo.discount.is_finite() || geo.discount <= 0.0 {
			return Err(Error::Validation {
				message: format!(
					"geo_profiles.{name}.discount must be a finite number greater than zero."
				),
			});
		}
		if geo.precision.is_empty() {
			return Err(Error::Validation {
				message: format!("geo_profiles.{name}.precision must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	// A geo fragment that applies to no base profile can never derive
	// anything; drop it instead of carrying dead configuration.
	cfg.geo_profiles.retain(|_, geo| !geo.with.is_empty());
}
