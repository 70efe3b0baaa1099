pub mod payload;
pub mod similar;

pub use payload::{DecodedPayload, SuggestionKind, decode_payload};
pub use similar::choose_best_alternate;
