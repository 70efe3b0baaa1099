pub mod suggest;

use std::{
	collections::{BTreeMap, HashMap},
	future::Future,
	pin::Pin,
	sync::Arc,
	time::Duration,
};

pub use suggest::{
	GeoContext, QueryKind, SuggestItem, SuggestRequest, Suggestion, SuggestionSet,
};
pub use typeahead_backend::{SuggestQuery, SuggestResponse};

pub type SuggestResult<T> = Result<T, SuggestError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Admission-control key under which the whole suggest operation runs; the
/// gate pairs it with the requesting identity.
pub const SUGGEST_GATE_KEY: &str = "completion-suggest";

/// Fatal failures of the suggest operation. Recoverable conditions
/// (undecodable payloads, a failed secondary fetch) never reach this enum;
/// they degrade into fewer results instead.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
	#[error("Admission control rejected the suggest operation: {message}")]
	Throttled { message: String },
	#[error("Completion backend request failed: {message}")]
	Backend { message: String },
}

/// Transport collaborator issuing the two backend round trips.
pub trait CompletionBackend: Send + Sync {
	fn completion_suggest<'a>(
		&'a self,
		cfg: &'a typeahead_config::Backend,
		queries: &'a BTreeMap<String, SuggestQuery>,
		timeout: Duration,
	) -> BoxFuture<'a, typeahead_backend::Result<SuggestResponse>>;

	fn fetch_alternate_titles<'a>(
		&'a self,
		cfg: &'a typeahead_config::Backend,
		entity_ids: &'a [String],
		timeout: Duration,
	) -> BoxFuture<'a, typeahead_backend::Result<HashMap<String, Vec<String>>>>;
}

/// Admission-control collaborator limiting concurrent expensive operations
/// per (key, identity). Not reimplemented here; callers inject their own.
pub trait AdmissionGate: Send + Sync {
	fn acquire<'a>(
		&'a self,
		key: &'a str,
		identity: &'a str,
	) -> BoxFuture<'a, Result<GatePermit, GateRejected>>;
}

/// Opaque admission token. Admission lasts as long as the permit lives; the
/// gate ties release to drop.
pub struct GatePermit {
	_token: Box<dyn Send>,
}
impl GatePermit {
	pub fn new(token: impl Send + 'static) -> Self {
		Self { _token: Box::new(token) }
	}
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct GateRejected {
	pub message: String,
}

struct DefaultBackend;
impl CompletionBackend for DefaultBackend {
	fn completion_suggest<'a>(
		&'a self,
		cfg: &'a typeahead_config::Backend,
		queries: &'a BTreeMap<String, SuggestQuery>,
		timeout: Duration,
	) -> BoxFuture<'a, typeahead_backend::Result<SuggestResponse>> {
		Box::pin(typeahead_backend::completion_suggest(cfg, queries, timeout))
	}

	fn fetch_alternate_titles<'a>(
		&'a self,
		cfg: &'a typeahead_config::Backend,
		entity_ids: &'a [String],
		timeout: Duration,
	) -> BoxFuture<'a, typeahead_backend::Result<HashMap<String, Vec<String>>>> {
		Box::pin(typeahead_backend::fetch_alternate_titles(cfg, entity_ids, timeout))
	}
}

/// Admits everything; stands in when no external admission control is wired.
struct OpenGate;
impl AdmissionGate for OpenGate {
	fn acquire<'a>(
		&'a self,
		_key: &'a str,
		_identity: &'a str,
	) -> BoxFuture<'a, Result<GatePermit, GateRejected>> {
		Box::pin(async { Ok(GatePermit::new(())) })
	}
}

#[derive(Clone)]
pub struct Collaborators {
	pub backend: Arc<dyn CompletionBackend>,
	pub gate: Arc<dyn AdmissionGate>,
}
impl Collaborators {
	pub fn new(backend: Arc<dyn CompletionBackend>, gate: Arc<dyn AdmissionGate>) -> Self {
		Self { backend, gate }
	}
}
impl Default for Collaborators {
	fn default() -> Self {
		Self { backend: Arc::new(DefaultBackend), gate: Arc::new(OpenGate) }
	}
}

pub struct SuggestService {
	pub cfg: typeahead_config::Config,
	pub collaborators: Collaborators,
}
impl SuggestService {
	pub fn new(cfg: typeahead_config::Config) -> Self {
		Self { cfg, collaborators: Collaborators::default() }
	}

	pub fn with_collaborators(cfg: typeahead_config::Config, collaborators: Collaborators) -> Self {
		Self { cfg, collaborators }
	}
}
