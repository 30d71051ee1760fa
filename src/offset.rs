//! Octave and pitch offsets
//!
//! The octave offset transposes keymap notes in steps of 12 and is bounded so
//! every mapped key stays a valid MIDI note. The pitch offset is tracked and
//! reported but is not applied to notes.

use crate::keymap::{map_key_to_midi_note, KEYMAP_MAX_NOTE, KEYMAP_MIN_NOTE};
use crate::midi::{MIDI_MAX, MIDI_MIN, SEMITONES_PER_OCTAVE};

/// Lowest pitch offset in semitones
pub const PITCH_MIN: i32 = -12;

/// Highest pitch offset in semitones
pub const PITCH_MAX: i32 = 12;

/// Transposition and utility toggles, owned by one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetState {
    pub note_octave_offset: i32,
    pub pitch_offset: i32,
    pub mod_active: bool,
    pub sustain_active: bool,
}

/// Lowest octave offset that keeps the keymap's lowest note in range
pub fn min_octave_offset() -> i32 {
    (MIDI_MIN as i32 - KEYMAP_MIN_NOTE as i32).div_euclid(SEMITONES_PER_OCTAVE)
}

/// Highest octave offset that keeps the keymap's highest note in range
pub fn max_octave_offset() -> i32 {
    (MIDI_MAX as i32 - KEYMAP_MAX_NOTE as i32).div_euclid(SEMITONES_PER_OCTAVE)
}

impl OffsetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn octave_down(&mut self) -> i32 {
        self.note_octave_offset = (self.note_octave_offset - 1).max(min_octave_offset());
        self.note_octave_offset
    }

    pub fn octave_up(&mut self) -> i32 {
        self.note_octave_offset = (self.note_octave_offset + 1).min(max_octave_offset());
        self.note_octave_offset
    }

    pub fn pitch_down(&mut self) -> i32 {
        self.pitch_offset = (self.pitch_offset - 1).max(PITCH_MIN);
        self.pitch_offset
    }

    pub fn pitch_up(&mut self) -> i32 {
        self.pitch_offset = (self.pitch_offset + 1).min(PITCH_MAX);
        self.pitch_offset
    }

    pub fn toggle_mod(&mut self) -> bool {
        self.mod_active = !self.mod_active;
        self.mod_active
    }

    pub fn toggle_sustain(&mut self) -> bool {
        self.sustain_active = !self.sustain_active;
        self.sustain_active
    }

    /// Resolve a typed character to a transposed MIDI note.
    ///
    /// The key is lower-cased before lookup. The shifted note is checked
    /// against the MIDI range on every call, since `note_octave_offset` may
    /// have been set directly.
    pub fn process_key_char(&self, key_char: char) -> Option<u8> {
        let note = map_key_to_midi_note(key_char.to_ascii_lowercase())?;
        let shifted = note as i32 + self.note_octave_offset * SEMITONES_PER_OCTAVE;
        if !(MIDI_MIN as i32..=MIDI_MAX as i32).contains(&shifted) {
            return None;
        }
        Some(shifted as u8)
    }
}
