//! MIDI message types
//!
//! Parses raw MIDI bytes into messages, encodes computed messages back to
//! bytes, and formats note names for the status line.

/// Lowest valid 7-bit MIDI value
pub const MIDI_MIN: u8 = 0;

/// Highest valid 7-bit MIDI value
pub const MIDI_MAX: u8 = 127;

/// Semitones per octave
pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// Octave number printed for middle C (note 60)
const MIDDLE_C_OCTAVE: i32 = 3;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A parsed MIDI message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note Off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff { channel: u8, note: u8, velocity: u8 },

    /// Note On with a non-zero velocity
    NoteOn { channel: u8, note: u8, velocity: u8 },

    /// Polyphonic Key Pressure
    PolyPressure { channel: u8, note: u8, pressure: u8 },

    /// Control Change: channel (0-15), cc (0-127), value (0-127)
    ControlChange { channel: u8, cc: u8, value: u8 },

    /// Program Change
    ProgramChange { channel: u8, program: u8 },

    /// Channel Pressure
    ChannelPressure { channel: u8, pressure: u8 },

    /// Pitch Bend: 14-bit value, 8192 is center
    PitchBend { channel: u8, value: u16 },

    /// System Exclusive payload without the F0/F7 framing
    SysEx { data: Vec<u8> },

    /// Any other system common or real-time message, kept by status byte
    System { status: u8 },
}

impl MidiMessage {
    /// Parse a MIDI message from raw bytes.
    ///
    /// Returns `None` for running status, truncated messages and undefined
    /// status bytes. A Note On with velocity 0 is reported as Note Off.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let (&status, rest) = data.split_first()?;
        if status < 0x80 {
            return None;
        }

        if status >= 0xF0 {
            return Self::parse_system(status, rest);
        }

        let channel = status & 0x0F;
        let d1 = rest.first().map(|b| b & 0x7F);
        let d2 = rest.get(1).map(|b| b & 0x7F);

        let message = match (status & 0xF0, d1, d2) {
            (0x80, Some(note), Some(velocity)) => MidiMessage::NoteOff { channel, note, velocity },
            (0x90, Some(note), Some(0)) => MidiMessage::NoteOff { channel, note, velocity: 0 },
            (0x90, Some(note), Some(velocity)) => MidiMessage::NoteOn { channel, note, velocity },
            (0xA0, Some(note), Some(pressure)) => {
                MidiMessage::PolyPressure { channel, note, pressure }
            }
            (0xB0, Some(cc), Some(value)) => MidiMessage::ControlChange { channel, cc, value },
            (0xC0, Some(program), _) => MidiMessage::ProgramChange { channel, program },
            (0xD0, Some(pressure), _) => MidiMessage::ChannelPressure { channel, pressure },
            (0xE0, Some(lsb), Some(msb)) => MidiMessage::PitchBend {
                channel,
                value: ((msb as u16) << 7) | lsb as u16,
            },
            _ => return None,
        };
        Some(message)
    }

    fn parse_system(status: u8, rest: &[u8]) -> Option<Self> {
        match status {
            0xF0 => {
                let end = rest.iter().position(|&b| b == 0xF7)?;
                Some(MidiMessage::SysEx {
                    data: rest[..end].to_vec(),
                })
            }
            // Undefined system common bytes
            0xF4 | 0xF5 | 0xF7 | 0xF9 | 0xFD => None,
            _ => Some(MidiMessage::System { status }),
        }
    }

    /// Encode the message to MIDI bytes
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            MidiMessage::NoteOff { channel, note, velocity } => {
                vec![0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
            }
            MidiMessage::NoteOn { channel, note, velocity } => {
                vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
            }
            MidiMessage::PolyPressure { channel, note, pressure } => {
                vec![0xA0 | (channel & 0x0F), note & 0x7F, pressure & 0x7F]
            }
            MidiMessage::ControlChange { channel, cc, value } => {
                vec![0xB0 | (channel & 0x0F), cc & 0x7F, value & 0x7F]
            }
            MidiMessage::ProgramChange { channel, program } => {
                vec![0xC0 | (channel & 0x0F), program & 0x7F]
            }
            MidiMessage::ChannelPressure { channel, pressure } => {
                vec![0xD0 | (channel & 0x0F), pressure & 0x7F]
            }
            MidiMessage::PitchBend { channel, value } => vec![
                0xE0 | (channel & 0x0F),
                (value & 0x7F) as u8,
                ((value >> 7) & 0x7F) as u8,
            ],
            MidiMessage::SysEx { ref data } => {
                let mut bytes = Vec::with_capacity(data.len() + 2);
                bytes.push(0xF0);
                bytes.extend_from_slice(data);
                bytes.push(0xF7);
                bytes
            }
            MidiMessage::System { status } => vec![status],
        }
    }
}

/// Name a MIDI note with sharps and octave, middle C (60) being `C3`.
pub fn note_name(note: u8) -> String {
    let note = note as i32;
    let octave = note / SEMITONES_PER_OCTAVE + MIDDLE_C_OCTAVE - 5;
    let name = NOTE_NAMES[(note % SEMITONES_PER_OCTAVE) as usize];
    format!("{}{}", name, octave)
}

/// Format MIDI bytes as hex string for debugging
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_parsing() {
        let msg = MidiMessage::parse(&[0x90, 60, 100]).unwrap();
        assert_eq!(
            msg,
            MidiMessage::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100,
            }
        );
    }

    #[test]
    fn test_note_on_velocity_zero_is_note_off() {
        let msg = MidiMessage::parse(&[0x93, 61, 0]).unwrap();
        assert_eq!(
            msg,
            MidiMessage::NoteOff {
                channel: 3,
                note: 61,
                velocity: 0,
            }
        );
    }

    #[test]
    fn test_control_change() {
        let msg = MidiMessage::parse(&[0xB2, 7, 99]).unwrap();
        assert_eq!(
            msg,
            MidiMessage::ControlChange {
                channel: 2,
                cc: 7,
                value: 99,
            }
        );
    }

    #[test]
    fn test_pitch_bend_center() {
        let msg = MidiMessage::parse(&[0xE0, 0x00, 0x40]).unwrap();
        assert_eq!(msg, MidiMessage::PitchBend { channel: 0, value: 8192 });
    }

    #[test]
    fn test_rejects_running_status_and_truncation() {
        assert_eq!(MidiMessage::parse(&[]), None);
        assert_eq!(MidiMessage::parse(&[0x3C, 0x40]), None);
        assert_eq!(MidiMessage::parse(&[0x90, 60]), None);
        assert_eq!(MidiMessage::parse(&[0xF0, 0x01, 0x02]), None);
        assert_eq!(MidiMessage::parse(&[0xF9]), None);
    }

    #[test]
    fn test_system_messages() {
        assert_eq!(
            MidiMessage::parse(&[0xF0, 0x7E, 0x01, 0xF7]),
            Some(MidiMessage::SysEx { data: vec![0x7E, 0x01] })
        );
        assert_eq!(
            MidiMessage::parse(&[0xF8]),
            Some(MidiMessage::System { status: 0xF8 })
        );
    }

    #[test]
    fn test_encode_control_change() {
        let msg = MidiMessage::ControlChange {
            channel: 1,
            cc: 6,
            value: 64,
        };
        assert_eq!(msg.encode(), vec![0xB1, 6, 64]);
    }

    #[test]
    fn test_note_names() {
        assert_eq!(note_name(60), "C3");
        assert_eq!(note_name(61), "C#3");
        assert_eq!(note_name(72), "C4");
        assert_eq!(note_name(71), "B3");
        assert_eq!(note_name(0), "C-2");
        assert_eq!(note_name(127), "G8");
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0x90, 0x3C, 0x64]), "90 3C 64");
        assert_eq!(format_hex(&[]), "");
    }
}
