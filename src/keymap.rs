//! Computer keyboard to MIDI note table
//!
//! One chromatic octave laid out on the right-hand home row, starting at
//! middle C on `g`.

/// Note produced by the first key of the table
pub const KEYMAP_BASE_NOTE: u8 = 60;

/// Keys in ascending semitone order from [`KEYMAP_BASE_NOTE`]
pub const KEYMAP_KEYS: [char; 13] = [
    'g', 'y', 'h', 'u', 'j', 'k', 'o', 'l', 'p', ';', '[', '\'', '\\',
];

/// Lowest note the keymap can produce
pub const KEYMAP_MIN_NOTE: u8 = KEYMAP_BASE_NOTE;

/// Highest note the keymap can produce
pub const KEYMAP_MAX_NOTE: u8 = KEYMAP_BASE_NOTE + (KEYMAP_KEYS.len() as u8 - 1);

/// Look up the MIDI note bound to `key`.
///
/// Matching is exact; callers normalize case first.
pub fn map_key_to_midi_note(key: char) -> Option<u8> {
    KEYMAP_KEYS
        .iter()
        .position(|&mapped| mapped == key)
        .map(|index| KEYMAP_BASE_NOTE + index as u8)
}
