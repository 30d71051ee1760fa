//! Limit - computer keyboard to MIDI with a developer controller surface
//!
//! The core modules (`keymap`, `dev_controller`, `offset`, `layout`,
//! `dispatcher`) are synchronous and free of I/O. The host modules (`cli`,
//! `midi_input`, `host`) wire them to a terminal and to MIDI input ports.

pub mod cli;
pub mod config;
pub mod dev_controller;
pub mod dispatcher;
pub mod host;
pub mod keymap;
pub mod keys;
pub mod layout;
pub mod midi;
pub mod midi_input;
pub mod offset;
pub mod paths;
pub mod theme;

pub use dev_controller::{
    DevControllerState, DevEncoderEvent, DevPadEvent, EncoderAction, BANK_COUNT, ENCODER_COUNT,
    PAD_COUNT,
};
pub use dispatcher::{ControlEvent, KeyOutcome, Session};
pub use keys::{KeyCode, KeyPress};
pub use midi::MidiMessage;
