use wasm_bindgen::JsValue;
use web_sys::KeyboardEvent;

pub const ESC_KEY_CODE: u32 = 27;
pub const D_KEY_CODE: u32 = 68;
pub const Q_KEY_CODE: u32 = 81;
pub const GREATER_THAN_KEY_IDENTIFIER: &str = "U+003E";
pub const LESS_THAN_KEY_IDENTIFIER: &str = "U+003C";

/// The parts of a key-up event the controller looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyInput {
	/// `KeyboardEvent.keyCode`.
	pub key_code: u32,
	/// `KeyboardEvent.keyIdentifier`, e.g. `U+003E`.
	pub key_identifier: Option<String>,
}

impl KeyInput {
	/// A press known only by its key code.
	pub fn code(key_code: u32) -> Self {
		Self {
			key_code,
			key_identifier: None,
		}
	}

	/// A press known only by its key identifier.
	pub fn identifier(key_identifier: &str) -> Self {
		Self {
			key_code: 0,
			key_identifier: Some(key_identifier.to_owned()),
		}
	}

	/// Reads `keyCode` and the legacy `keyIdentifier`, falling back to the
	/// angle bracket `key` values on browsers that dropped `keyIdentifier`.
	pub fn from_event(ev: &KeyboardEvent) -> Self {
		let legacy = js_sys::Reflect::get(ev, &JsValue::from_str("keyIdentifier"))
			.ok()
			.and_then(|v| v.as_string());
		let key_identifier = legacy.or_else(|| match ev.key().as_str() {
			">" => Some(GREATER_THAN_KEY_IDENTIFIER.to_owned()),
			"<" => Some(LESS_THAN_KEY_IDENTIFIER.to_owned()),
			_ => None,
		});
		Self {
			key_code: ev.key_code(),
			key_identifier,
		}
	}
}

/// What a key press asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
	/// Escape.
	HitEsc,
	/// `<` or `>`, cycling through metrics in this direction.
	LockNextMetric(i32),
	/// Q: unpin and clear the metric.
	UnlockMetric,
	/// D: show or hide the debug toolbar.
	ToggleDebugToolbar,
}

/// Looks a key press up in the dispatch table. Unknown keys map to `None`.
pub fn key_command(input: &KeyInput) -> Option<KeyCommand> {
	if input.key_code == ESC_KEY_CODE {
		return Some(KeyCommand::HitEsc);
	}
	match input.key_identifier.as_deref() {
		Some(LESS_THAN_KEY_IDENTIFIER) => return Some(KeyCommand::LockNextMetric(-1)),
		Some(GREATER_THAN_KEY_IDENTIFIER) => return Some(KeyCommand::LockNextMetric(1)),
		_ => {}
	}
	match input.key_code {
		Q_KEY_CODE => Some(KeyCommand::UnlockMetric),
		D_KEY_CODE => Some(KeyCommand::ToggleDebugToolbar),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dispatch_table() {
		assert_eq!(key_command(&KeyInput::code(27)), Some(KeyCommand::HitEsc));
		assert_eq!(
			key_command(&KeyInput::identifier("U+003E")),
			Some(KeyCommand::LockNextMetric(1))
		);
		assert_eq!(
			key_command(&KeyInput::identifier("U+003C")),
			Some(KeyCommand::LockNextMetric(-1))
		);
		assert_eq!(key_command(&KeyInput::code(81)), Some(KeyCommand::UnlockMetric));
		assert_eq!(
			key_command(&KeyInput::code(68)),
			Some(KeyCommand::ToggleDebugToolbar)
		);
	}

	#[test]
	fn unknown_keys_do_nothing() {
		assert_eq!(key_command(&KeyInput::code(65)), None);
		assert_eq!(key_command(&KeyInput::identifier("U+0041")), None);
		assert_eq!(key_command(&KeyInput::default()), None);
	}

	#[test]
	fn escape_wins_over_identifier() {
		let input = KeyInput {
			key_code: ESC_KEY_CODE,
			key_identifier: Some(LESS_THAN_KEY_IDENTIFIER.into()),
		};
		assert_eq!(key_command(&input), Some(KeyCommand::HitEsc));
	}
}
