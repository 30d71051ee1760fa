//! Developer controller surface
//!
//! Six virtual rotary encoders and sixteen momentary pads, each group with its
//! own bank selector. Encoder values are plain 7-bit integers; the encoder
//! bank only changes the CC number an encoder reports.

use crate::keys::KeyCode;
use crate::midi::{MIDI_MAX, MIDI_MIN};

/// Number of virtual encoders
pub const ENCODER_COUNT: usize = 6;

/// Number of banks for both encoders and pads
pub const BANK_COUNT: usize = 3;

/// Number of virtual pads
pub const PAD_COUNT: usize = 16;

/// Value an encoder jumps to on reset
pub const ENCODER_CENTER: u8 = 64;

/// Pad keys in row-major order
const PAD_KEYS: [char; PAD_COUNT] = [
    '1', '2', '3', '4', //
    'q', 'w', 'e', 'r', //
    'a', 's', 'd', 'f', //
    'z', 'x', 'c', 'v',
];

/// Character keys for the alternate encoder entry point, (decrease, increase)
/// per encoder.
const ENCODER_CHAR_KEYS: [(char, char); ENCODER_COUNT] = [
    ('1', '2'),
    ('3', '4'),
    ('5', '6'),
    ('7', '8'),
    ('9', '0'),
    ('-', '='),
];

/// What a key does to an encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderAction {
    Decrease,
    Increase,
    /// Jump to [`ENCODER_CENTER`]
    Reset,
}

/// Encoder index plus the action a key applies to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderKeyAction {
    pub encoder_index: usize,
    pub action: EncoderAction,
}

/// Result of turning or resetting an encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevEncoderEvent {
    pub bank: usize,
    pub encoder_index: usize,
    pub value: u8,
    pub cc: u8,
}

/// Result of hitting a pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevPadEvent {
    pub bank: usize,
    pub pad_index: usize,
}

/// Bank selection and encoder values, owned by one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevControllerState {
    pub encoder_bank: usize,
    pub pad_bank: usize,
    pub encoders: [u8; ENCODER_COUNT],
}

/// CC number reported by `encoder_index` in `bank`
pub fn encoder_cc(bank: usize, encoder_index: usize) -> u8 {
    (bank * ENCODER_COUNT + encoder_index) as u8
}

impl DevControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the encoder bank. Out-of-range indices are rejected.
    pub fn set_encoder_bank(&mut self, bank_index: usize) -> bool {
        if bank_index >= BANK_COUNT {
            return false;
        }
        self.encoder_bank = bank_index;
        true
    }

    /// Select the pad bank. Out-of-range indices are rejected.
    pub fn set_pad_bank(&mut self, bank_index: usize) -> bool {
        if bank_index >= BANK_COUNT {
            return false;
        }
        self.pad_bank = bank_index;
        true
    }

    /// Advance the encoder bank, wrapping after the last one
    pub fn cycle_encoder_bank(&mut self) -> usize {
        self.set_encoder_bank((self.encoder_bank + 1) % BANK_COUNT);
        self.encoder_bank
    }

    /// Advance the pad bank, wrapping after the last one
    pub fn cycle_pad_bank(&mut self) -> usize {
        self.set_pad_bank((self.pad_bank + 1) % BANK_COUNT);
        self.pad_bank
    }

    /// Apply `action` to one encoder and report its new value.
    pub fn handle_encoder_action(
        &mut self,
        encoder_index: usize,
        action: EncoderAction,
    ) -> Option<DevEncoderEvent> {
        let value = self.encoders.get_mut(encoder_index)?;
        *value = match action {
            EncoderAction::Decrease => value.saturating_sub(1).clamp(MIDI_MIN, MIDI_MAX),
            EncoderAction::Increase => value.saturating_add(1).clamp(MIDI_MIN, MIDI_MAX),
            EncoderAction::Reset => ENCODER_CENTER,
        };

        Some(DevEncoderEvent {
            bank: self.encoder_bank,
            encoder_index,
            value: *value,
            cc: encoder_cc(self.encoder_bank, encoder_index),
        })
    }

    /// Report a pad hit in the current pad bank. Pads hold no value.
    pub fn handle_pad_press(&self, pad_index: usize) -> Option<DevPadEvent> {
        if pad_index >= PAD_COUNT {
            return None;
        }
        Some(DevPadEvent {
            bank: self.pad_bank,
            pad_index,
        })
    }

    /// Alternate entry point: nudge an encoder from a character key pair.
    pub fn handle_encoder_key_char(&mut self, key_char: char) -> Option<DevEncoderEvent> {
        let action = map_char_to_encoder_action(key_char)?;
        self.handle_encoder_action(action.encoder_index, action.action)
    }
}

/// Route a host key code to an encoder action.
///
/// Keypad 7/8/9, 4/5/6 and 1/2/3 drive encoders 0-2 as decrease/reset/increase;
/// the Insert, Delete and arrow clusters drive encoders 3-5 the same way.
pub fn map_key_to_encoder_action(code: KeyCode) -> Option<EncoderKeyAction> {
    use EncoderAction::{Decrease, Increase, Reset};

    let (encoder_index, action) = match code {
        KeyCode::Numpad(7) => (0, Decrease),
        KeyCode::Numpad(8) => (0, Reset),
        KeyCode::Numpad(9) => (0, Increase),
        KeyCode::Numpad(4) => (1, Decrease),
        KeyCode::Numpad(5) => (1, Reset),
        KeyCode::Numpad(6) => (1, Increase),
        KeyCode::Numpad(1) => (2, Decrease),
        KeyCode::Numpad(2) => (2, Reset),
        KeyCode::Numpad(3) => (2, Increase),
        KeyCode::Insert => (3, Decrease),
        KeyCode::Home => (3, Reset),
        KeyCode::PageUp => (3, Increase),
        KeyCode::Delete => (4, Decrease),
        KeyCode::End => (4, Reset),
        KeyCode::PageDown => (4, Increase),
        KeyCode::Left => (5, Decrease),
        KeyCode::Down => (5, Reset),
        KeyCode::Right => (5, Increase),
        _ => return None,
    };
    Some(EncoderKeyAction {
        encoder_index,
        action,
    })
}

/// Pad index for a character on the 4x4 pad grid, ignoring case
pub fn map_key_char_to_pad_index(key_char: char) -> Option<usize> {
    let normalized = key_char.to_ascii_lowercase();
    PAD_KEYS.iter().position(|&key| key == normalized)
}

fn map_char_to_encoder_action(key_char: char) -> Option<EncoderKeyAction> {
    ENCODER_CHAR_KEYS
        .iter()
        .enumerate()
        .find_map(|(encoder_index, &(down, up))| {
            let action = if key_char == down {
                EncoderAction::Decrease
            } else if key_char == up {
                EncoderAction::Increase
            } else {
                return None;
            };
            Some(EncoderKeyAction {
                encoder_index,
                action,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = DevControllerState::new();
        assert_eq!(state.encoder_bank, 0);
        assert_eq!(state.pad_bank, 0);
        assert_eq!(state.encoders, [0; ENCODER_COUNT]);
    }

    #[test]
    fn test_encoder_bank_bounds() {
        let mut state = DevControllerState::new();
        assert!(state.set_encoder_bank(1));
        assert_eq!(state.encoder_bank, 1);
        assert!(!state.set_encoder_bank(3));
        assert_eq!(state.encoder_bank, 1);
    }

    #[test]
    fn test_pad_bank_bounds() {
        let mut state = DevControllerState::new();
        assert!(state.set_pad_bank(2));
        assert_eq!(state.pad_bank, 2);
        assert!(!state.set_pad_bank(BANK_COUNT));
        assert_eq!(state.pad_bank, 2);
    }

    #[test]
    fn test_bank_cycling_wraps() {
        let mut state = DevControllerState::new();
        assert_eq!(state.cycle_pad_bank(), 1);
        assert_eq!(state.cycle_pad_bank(), 2);
        assert_eq!(state.cycle_pad_bank(), 0);
        assert_eq!(state.cycle_encoder_bank(), 1);
        assert_eq!(state.pad_bank, 0);
    }

    #[test]
    fn test_encoder_actions() {
        let mut state = DevControllerState::new();
        assert!(state.set_encoder_bank(1));

        let event = state
            .handle_encoder_action(0, EncoderAction::Increase)
            .unwrap();
        assert_eq!(
            event,
            DevEncoderEvent {
                bank: 1,
                encoder_index: 0,
                value: 1,
                cc: 6,
            }
        );

        let event = state.handle_encoder_action(0, EncoderAction::Reset).unwrap();
        assert_eq!(event.value, ENCODER_CENTER);

        let event = state
            .handle_encoder_action(3, EncoderAction::Decrease)
            .unwrap();
        assert_eq!(event.encoder_index, 3);
        assert_eq!(event.value, 0);
        assert_eq!(event.cc, 9);
    }

    #[test]
    fn test_encoder_values_clamp() {
        let mut state = DevControllerState::new();
        state.encoders[2] = MIDI_MAX;
        let event = state
            .handle_encoder_action(2, EncoderAction::Increase)
            .unwrap();
        assert_eq!(event.value, MIDI_MAX);

        let event = state
            .handle_encoder_action(1, EncoderAction::Decrease)
            .unwrap();
        assert_eq!(event.value, MIDI_MIN);
    }

    #[test]
    fn test_invalid_encoder_leaves_state() {
        let mut state = DevControllerState::new();
        state.encoders = [5; ENCODER_COUNT];
        let before = state.clone();
        assert_eq!(
            state.handle_encoder_action(ENCODER_COUNT, EncoderAction::Increase),
            None
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_pad_presses() {
        let mut state = DevControllerState::new();
        assert!(state.set_pad_bank(2));

        let event = state.handle_pad_press(0).unwrap();
        assert_eq!(event, DevPadEvent { bank: 2, pad_index: 0 });

        let event = state.handle_pad_press(PAD_COUNT - 1).unwrap();
        assert_eq!(event.pad_index, PAD_COUNT - 1);

        assert_eq!(state.handle_pad_press(PAD_COUNT), None);
    }

    #[test]
    fn test_encoder_key_chars() {
        let mut state = DevControllerState::new();
        let event = state.handle_encoder_key_char('2').unwrap();
        assert_eq!((event.encoder_index, event.value), (0, 1));

        let event = state.handle_encoder_key_char('=').unwrap();
        assert_eq!((event.encoder_index, event.value), (5, 1));

        let event = state.handle_encoder_key_char('-').unwrap();
        assert_eq!((event.encoder_index, event.value), (5, 0));

        assert_eq!(state.handle_encoder_key_char('q'), None);
    }

    #[test]
    fn test_key_code_routing() {
        let action = map_key_to_encoder_action(KeyCode::Numpad(8)).unwrap();
        assert_eq!(action.encoder_index, 0);
        assert_eq!(action.action, EncoderAction::Reset);

        let action = map_key_to_encoder_action(KeyCode::PageDown).unwrap();
        assert_eq!(action.encoder_index, 4);
        assert_eq!(action.action, EncoderAction::Increase);

        let action = map_key_to_encoder_action(KeyCode::Left).unwrap();
        assert_eq!(action.encoder_index, 5);
        assert_eq!(action.action, EncoderAction::Decrease);

        assert_eq!(map_key_to_encoder_action(KeyCode::Numpad(0)), None);
        assert_eq!(map_key_to_encoder_action(KeyCode::Up), None);
    }

    #[test]
    fn test_pad_grid() {
        assert_eq!(map_key_char_to_pad_index('1'), Some(0));
        assert_eq!(map_key_char_to_pad_index('r'), Some(7));
        assert_eq!(map_key_char_to_pad_index('A'), Some(8));
        assert_eq!(map_key_char_to_pad_index('v'), Some(15));
        assert_eq!(map_key_char_to_pad_index('g'), None);
    }
}
