mod error;
pub mod suggest;
pub mod titles;

pub use error::{Error, Result};
pub use suggest::{
	CompletionParams, SuggestGroup, SuggestOption, SuggestQuery, SuggestResponse,
	completion_suggest,
};
pub use titles::fetch_alternate_titles;

use std::time::Duration;

fn client(timeout: Duration) -> Result<reqwest::Client> {
	Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
