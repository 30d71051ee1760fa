//! Key and MIDI input dispatcher
//!
//! A [`Session`] owns all mutable controller state and routes one key press at
//! a time through a fixed priority cascade:
//!
//! 1. pad bank cycle (F1)
//! 2. encoder bank cycle (Up)
//! 3. utility keys (F2-F8)
//! 4. encoder keys (keypad, Insert/Delete clusters, arrows)
//! 5. pad keys (4x4 character grid)
//! 6. note keys (keymap + octave offset)
//!
//! The first handler that accepts the key wins. Incoming MIDI is classified
//! separately and only updates the status line.

use std::fmt;

use crate::dev_controller::{
    map_key_char_to_pad_index, map_key_to_encoder_action, DevControllerState, DevEncoderEvent,
    DevPadEvent, EncoderAction,
};
use crate::keys::{KeyCode, KeyPress};
use crate::midi::{note_name, MidiMessage, MIDI_MAX};
use crate::offset::OffsetState;


/// CC number for the modulation wheel
const CC_MODULATION: u8 = 1;

/// CC number for the sustain pedal
const CC_SUSTAIN: u8 = 64;

/// Something a consumed key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    EncoderBank(usize),
    PadBank(usize),
    ProgramSelect,
    Modulation(bool),
    Sustain(bool),
    Octave(i32),
    Pitch(i32),
    Encoder(DevEncoderEvent),
    Pad(DevPadEvent),
    Note(u8),
}

/// Whether a key press was consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled(ControlEvent),
    Unhandled,
}

impl KeyOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, KeyOutcome::Handled(_))
    }

    pub fn event(&self) -> Option<ControlEvent> {
        match *self {
            KeyOutcome::Handled(event) => Some(event),
            KeyOutcome::Unhandled => None,
        }
    }
}

impl ControlEvent {
    /// The MIDI message this event would emit on `channel` (0-15).
    ///
    /// Only encoders, notes and the modulation/sustain toggles produce one.
    pub fn to_midi(&self, channel: u8, velocity: u8) -> Option<MidiMessage> {
        let toggle_value = |on: bool| if on { MIDI_MAX } else { 0 };
        let message = match *self {
            ControlEvent::Encoder(event) => MidiMessage::ControlChange {
                channel,
                cc: event.cc,
                value: event.value,
            },
            ControlEvent::Note(note) => MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            },
            ControlEvent::Modulation(on) => MidiMessage::ControlChange {
                channel,
                cc: CC_MODULATION,
                value: toggle_value(on),
            },
            ControlEvent::Sustain(on) => MidiMessage::ControlChange {
                channel,
                cc: CC_SUSTAIN,
                value: toggle_value(on),
            },
            _ => return None,
        };
        Some(message)
    }
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |on: bool| if on { "on" } else { "off" };
        match *self {
            ControlEvent::EncoderBank(bank) => write!(f, "dev control bank {}", bank + 1),
            ControlEvent::PadBank(bank) => write!(f, "dev pad bank {}", bank_letter(bank)),
            ControlEvent::ProgramSelect => write!(f, "dev prog select"),
            ControlEvent::Modulation(on) => write!(f, "dev mod {}", on_off(on)),
            ControlEvent::Sustain(on) => write!(f, "dev sustain {}", on_off(on)),
            ControlEvent::Octave(offset) => write!(f, "dev octave {}", offset),
            ControlEvent::Pitch(offset) => write!(f, "dev pitch {}", offset),
            ControlEvent::Encoder(event) => write!(
                f,
                "dev cc {} = {} (bank {})",
                event.cc,
                event.value,
                event.bank + 1
            ),
            ControlEvent::Pad(event) => write!(
                f,
                "dev pad {} (bank {})",
                event.pad_index + 1,
                event.bank + 1
            ),
            ControlEvent::Note(note) => write!(f, "note-on {}", note_name(note)),
        }
    }
}

/// Pad banks are labelled A, B, C...
pub(crate) fn bank_letter(bank: usize) -> char {
    (b'A' + bank as u8) as char
}

/// Status line for an incoming MIDI message
pub fn describe_incoming(message: &MidiMessage) -> String {
    match *message {
        MidiMessage::NoteOn { note, .. } => format!("note-on {}", note_name(note)),
        MidiMessage::NoteOff { note, .. } => format!("note-off {}", note_name(note)),
        MidiMessage::ControlChange { cc, value, .. } => format!("cc {} = {}", cc, value),
        _ => "message".to_string(),
    }
}

/// All state behind one keyboard/controller surface
#[derive(Debug, Clone, Default)]
pub struct Session {
    dev_state: DevControllerState,
    offsets: OffsetState,
    last_message: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dev_state(&self) -> &DevControllerState {
        &self.dev_state
    }

    pub fn offsets(&self) -> &OffsetState {
        &self.offsets
    }

    /// Direct access for hosts restoring an octave offset. Notes that would
    /// leave the MIDI range after shifting are still rejected per key.
    pub fn set_octave_offset(&mut self, offset: i32) {
        self.offsets.note_octave_offset = offset;
    }

    /// Last status line, empty until something happened
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Status line as displayed: `MIDI: <last>` or `MIDI: NONE`
    pub fn status_label(&self) -> String {
        if self.last_message.is_empty() {
            "MIDI: NONE".to_string()
        } else {
            format!("MIDI: {}", self.last_message)
        }
    }

    pub fn clear_status(&mut self) {
        self.last_message.clear();
    }

    /// Route one key press through the priority cascade.
    pub fn key_pressed(&mut self, key: KeyPress) -> KeyOutcome {
        let event = self
            .handle_pad_bank_cycle(key.code)
            .or_else(|| self.handle_encoder_bank_cycle(key.code))
            .or_else(|| self.handle_utility_key(key.code))
            .or_else(|| self.handle_encoder_key(key.code))
            .or_else(|| key.text.and_then(|c| self.handle_pad_key(c)))
            .or_else(|| key.text.and_then(|c| self.handle_note_key(c)));
        self.record(event)
    }

    /// Note lookup only, skipping the controller handlers
    pub fn process_key_char(&mut self, key_char: char) -> KeyOutcome {
        let event = self.handle_note_key(key_char);
        self.record(event)
    }

    /// Apply an encoder action by index
    pub fn process_encoder_action(
        &mut self,
        encoder_index: usize,
        action: EncoderAction,
    ) -> KeyOutcome {
        let event = self
            .dev_state
            .handle_encoder_action(encoder_index, action)
            .map(ControlEvent::Encoder);
        self.record(event)
    }

    /// Hit a pad by index
    pub fn process_pad_index(&mut self, pad_index: usize) -> KeyOutcome {
        let event = self
            .dev_state
            .handle_pad_press(pad_index)
            .map(ControlEvent::Pad);
        self.record(event)
    }

    /// Nudge an encoder through the character key pairs
    pub fn process_encoder_key_char(&mut self, key_char: char) -> KeyOutcome {
        let event = self
            .dev_state
            .handle_encoder_key_char(key_char)
            .map(ControlEvent::Encoder);
        self.record(event)
    }

    /// Show an incoming MIDI message on the status line
    pub fn process_midi_message(&mut self, message: &MidiMessage) {
        self.last_message = describe_incoming(message);
    }

    /// Parse and show raw incoming MIDI bytes
    pub fn process_raw_midi(&mut self, data: &[u8]) {
        match MidiMessage::parse(data) {
            Some(message) => self.process_midi_message(&message),
            None => self.last_message = "message".to_string(),
        }
    }

    fn record(&mut self, event: Option<ControlEvent>) -> KeyOutcome {
        match event {
            Some(event) => {
                self.last_message = event.to_string();
                KeyOutcome::Handled(event)
            }
            None => KeyOutcome::Unhandled,
        }
    }

    fn handle_pad_bank_cycle(&mut self, code: KeyCode) -> Option<ControlEvent> {
        (code == KeyCode::F1).then(|| ControlEvent::PadBank(self.dev_state.cycle_pad_bank()))
    }

    fn handle_encoder_bank_cycle(&mut self, code: KeyCode) -> Option<ControlEvent> {
        (code == KeyCode::Up)
            .then(|| ControlEvent::EncoderBank(self.dev_state.cycle_encoder_bank()))
    }

    fn handle_utility_key(&mut self, code: KeyCode) -> Option<ControlEvent> {
        let offsets = &mut self.offsets;
        let event = match code {
            KeyCode::F2 => ControlEvent::ProgramSelect,
            KeyCode::F3 => ControlEvent::Modulation(offsets.toggle_mod()),
            KeyCode::F4 => ControlEvent::Sustain(offsets.toggle_sustain()),
            KeyCode::F5 => ControlEvent::Octave(offsets.octave_down()),
            KeyCode::F6 => ControlEvent::Octave(offsets.octave_up()),
            KeyCode::F7 => ControlEvent::Pitch(offsets.pitch_down()),
            KeyCode::F8 => ControlEvent::Pitch(offsets.pitch_up()),
            _ => return None,
        };
        Some(event)
    }

    fn handle_encoder_key(&mut self, code: KeyCode) -> Option<ControlEvent> {
        let action = map_key_to_encoder_action(code)?;
        self.dev_state
            .handle_encoder_action(action.encoder_index, action.action)
            .map(ControlEvent::Encoder)
    }

    fn handle_pad_key(&mut self, key_char: char) -> Option<ControlEvent> {
        let pad_index = map_key_char_to_pad_index(key_char)?;
        self.dev_state
            .handle_pad_press(pad_index)
            .map(ControlEvent::Pad)
    }

    fn handle_note_key(&mut self, key_char: char) -> Option<ControlEvent> {
        self.offsets.process_key_char(key_char).map(ControlEvent::Note)
    }
}
