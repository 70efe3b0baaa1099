//! Decoding of the opaque suggestion payload stored in the completion index.
//!
//! The indexing side encodes each completion option as `"{id}:{kind}[:{text}]"`
//! where the kind is `t` for a title suggestion (carries its display text) or
//! `r` for a redirect suggestion (text is resolved later by the repair pass).
//! Anything that does not match this shape decodes to `None`; consumers skip
//! such hits instead of failing the whole merge.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionKind {
	Title,
	Redirect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedPayload {
	pub entity_id: String,
	pub kind: SuggestionKind,
	pub text: Option<String>,
}

pub fn decode_payload(raw: &str) -> Option<DecodedPayload> {
	let mut parts = raw.splitn(3, ':');
	let entity_id = parts.next()?;

	if entity_id.is_empty() {
		return None;
	}

	match parts.next()? {
		"t" => {
			let text = parts.next()?;

			Some(DecodedPayload {
				entity_id: entity_id.to_string(),
				kind: SuggestionKind::Title,
				text: Some(text.to_string()),
			})
		},
		"r" => Some(DecodedPayload {
			entity_id: entity_id.to_string(),
			kind: SuggestionKind::Redirect,
			text: None,
		}),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::{SuggestionKind, decode_payload};

	#[test]
	fn decodes_title_payload() {
		let decoded = decode_payload("42:t:Albert Einstein").expect("decode failed");

		assert_eq!(decoded.entity_id, "42");
		assert_eq!(decoded.kind, SuggestionKind::Title);
		assert_eq!(decoded.text.as_deref(), Some("Albert Einstein"));
	}

	#[test]
	fn title_text_keeps_embedded_separators() {
		let decoded = decode_payload("7:t:C:\\Users").expect("decode failed");

		assert_eq!(decoded.text.as_deref(), Some("C:\\Users"));
	}

	#[test]
	fn decodes_redirect_payload_without_text() {
		let decoded = decode_payload("9:r").expect("decode failed");

		assert_eq!(decoded.entity_id, "9");
		assert_eq!(decoded.kind, SuggestionKind::Redirect);
		assert_eq!(decoded.text, None);
	}

	#[test]
	fn rejects_malformed_payloads() {
		assert_eq!(decode_payload(""), None);
		assert_eq!(decode_payload("42"), None);
		assert_eq!(decode_payload(":t:text"), None);
		assert_eq!(decode_payload("42:x:text"), None);
		assert_eq!(decode_payload("42:t"), None);
	}
}
