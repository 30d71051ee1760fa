//! Terminal host
//!
//! Owns the [`Session`] and applies key presses and incoming MIDI one at a
//! time from a single `select!` loop, then prints the status panel.

use anyhow::Result;
use colored::*;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::ReplCommand;
use crate::config::AppConfig;
use crate::dev_controller::DevControllerState;
use crate::dispatcher::{bank_letter, KeyOutcome, Session};
use crate::keys::KeyPress;
use crate::layout::{compute_ui_layout, UiLayout};
use crate::midi::format_hex;
use crate::midi_input::IncomingMidi;
use crate::offset::OffsetState;
use crate::theme::{rgb, UiTheme};

/// Plain text of the status panel, one entry per layout region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelText {
    pub header: String,
    pub encoder: String,
    pub secondary: String,
    pub status: String,
}

/// Build the panel text for the current session state.
///
/// The status line is cut to the columns the secondary panel can hold.
pub fn panel_text(session: &Session, theme: &UiTheme, layout: &UiLayout) -> PanelText {
    PanelText {
        header: "LIMIT".to_string(),
        encoder: encoder_summary(session.dev_state()),
        secondary: offset_summary(session.dev_state(), session.offsets()),
        status: truncate(&session.status_label(), theme.text_columns(&layout.secondary)),
    }
}

fn encoder_summary(state: &DevControllerState) -> String {
    let values = state
        .encoders
        .iter()
        .map(|v| format!("{:3}", v))
        .collect::<Vec<_>>()
        .join(" ");
    format!("enc bank {} [{}]", state.encoder_bank + 1, values)
}

fn offset_summary(state: &DevControllerState, offsets: &OffsetState) -> String {
    let on_off = |on: bool| if on { "on" } else { "off" };
    format!(
        "pad bank {}  oct {:+}  pitch {:+}  mod {}  sus {}",
        bank_letter(state.pad_bank),
        offsets.note_octave_offset,
        offsets.pitch_offset,
        on_off(offsets.mod_active),
        on_off(offsets.sustain_active),
    )
}

/// Horizontal rule spanning the text columns of the header
pub fn panel_rule(theme: &UiTheme, layout: &UiLayout) -> String {
    "-".repeat(theme.text_columns(&layout.header))
}

fn truncate(text: &str, columns: usize) -> String {
    if text.chars().count() <= columns {
        return text.to_string();
    }
    if columns < 3 {
        return text.chars().take(columns).collect();
    }
    let kept: String = text.chars().take(columns - 3).collect();
    format!("{}...", kept)
}

/// Event loop state
pub struct Host {
    session: Session,
    config: AppConfig,
    theme: UiTheme,
    layout: UiLayout,
}

impl Host {
    pub fn new(config: AppConfig) -> Self {
        let theme = config.ui.theme();
        let layout = compute_ui_layout(theme.layout_params(theme.window_width, theme.window_height));
        debug!(?layout, "Status panel layout");
        Self {
            session: Session::new(),
            config,
            theme,
            layout,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply one REPL command. Returns `false` when the session should end.
    pub fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Keys(keys) => {
                for key in keys {
                    self.handle_key(key);
                }
            }
            ReplCommand::Status => self.print_panel(),
            ReplCommand::Invalid(e) => {
                warn!("{}", e);
                println!("{}", format!("ignored line: {}", e).yellow());
            }
            ReplCommand::Quit => return false,
        }
        true
    }

    pub fn handle_key(&mut self, key: KeyPress) {
        match self.session.key_pressed(key) {
            KeyOutcome::Handled(event) => {
                let midi = event
                    .to_midi(self.config.midi.channel_index(), self.config.midi.velocity)
                    .map(|message| format_hex(&message.encode()));
                debug!(key = %key.code, status = %event, midi = ?midi, "Key consumed");
                self.print_status(midi.as_deref());
            }
            KeyOutcome::Unhandled => {
                debug!(key = %key.code, "Key not consumed");
                println!("{}", format!("  (not consumed: {})", key.code).dimmed());
            }
        }
    }

    pub fn handle_midi(&mut self, incoming: IncomingMidi) {
        self.session.process_raw_midi(&incoming.data);
        debug!(
            port = %incoming.port_name,
            data = %format_hex(&incoming.data),
            status = %self.session.last_message(),
            "MIDI received"
        );
        self.print_status(None);
    }

    /// Run until the REPL quits, input ends, or `shutdown` resolves.
    ///
    /// A closed MIDI channel only disables MIDI; the keyboard keeps working.
    pub async fn run(
        mut self,
        mut repl_rx: mpsc::Receiver<ReplCommand>,
        mut midi_rx: mpsc::Receiver<IncomingMidi>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<Session> {
        info!("Starting keyboard session");
        self.print_panel();

        tokio::pin!(shutdown);
        let mut midi_open = true;

        loop {
            // MIDI drains before keyboard lines so relayed messages are never
            // starved by a burst of typed keys
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping session");
                    break;
                }
                incoming = midi_rx.recv(), if midi_open => match incoming {
                    Some(incoming) => self.handle_midi(incoming),
                    None => {
                        debug!("MIDI input channel closed");
                        midi_open = false;
                    }
                },
                command = repl_rx.recv() => match command {
                    Some(command) => {
                        if !self.handle_command(command) {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        info!("Keyboard session ended");
        Ok(self.session)
    }

    fn print_status(&self, midi: Option<&str>) {
        let text = panel_text(&self.session, &self.theme, &self.layout);
        let (r, g, b) = rgb(self.theme.text);
        let suffix = midi
            .map(|hex| format!("  [{}]", hex).dimmed().to_string())
            .unwrap_or_default();
        println!(
            "{} {}{}",
            format!("[{}]", chrono::Local::now().format("%H:%M:%S%.3f")).dimmed(),
            text.status.truecolor(r, g, b),
            suffix
        );
    }

    fn print_panel(&self) {
        let text = panel_text(&self.session, &self.theme, &self.layout);
        let rule = panel_rule(&self.theme, &self.layout);
        let (r, g, b) = rgb(self.theme.accent_blue);
        let (br, bg, bb) = rgb(self.theme.background);
        let (lr, lg, lb) = rgb(self.theme.border);
        let (pr, pg, pb) = rgb(self.theme.panel);
        let (tr, tg, tb) = rgb(self.theme.text);

        println!(
            "{}",
            format!(" {} ", text.header)
                .truecolor(r, g, b)
                .on_truecolor(br, bg, bb)
                .bold()
        );
        println!("{}", rule.truecolor(lr, lg, lb));
        for line in [&text.encoder, &text.secondary, &text.status] {
            println!(
                "{}",
                format!("  {}", line)
                    .truecolor(tr, tg, tb)
                    .on_truecolor(pr, pg, pb)
            );
        }
        println!("{}", rule.truecolor(lr, lg, lb));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyCode;

    #[test]
    fn test_panel_text_reflects_session() {
        let mut host = Host::new(AppConfig::default());
        host.handle_key(KeyPress::new(KeyCode::F1));
        host.handle_key(KeyPress::new(KeyCode::F6));
        host.handle_key(KeyPress::new(KeyCode::Numpad(9)));

        let text = panel_text(host.session(), &host.theme, &host.layout);
        assert_eq!(text.header, "LIMIT");
        assert_eq!(text.encoder, "enc bank 1 [  1   0   0   0   0   0]");
        assert_eq!(text.secondary, "pad bank B  oct +1  pitch +0  mod off  sus off");
        assert_eq!(text.status, "MIDI: dev cc 0 = 1 (bank 1)");
    }

    #[test]
    fn test_panel_rule_spans_header() {
        let host = Host::new(AppConfig::default());
        // 720 px minus 2 * 16 px padding at 8 px per cell
        assert_eq!(panel_rule(&host.theme, &host.layout).len(), 86);
    }

    #[test]
    fn test_status_truncates_to_panel() {
        assert_eq!(truncate("MIDI: note-on C3", 40), "MIDI: note-on C3");
        assert_eq!(truncate("MIDI: note-on C3", 10), "MIDI: n...");
        assert_eq!(truncate("MIDI", 2), "MI");
    }

    #[tokio::test]
    async fn test_run_applies_events_in_order() {
        let host = Host::new(AppConfig::default());
        let (repl_tx, repl_rx) = mpsc::channel(8);
        let (midi_tx, midi_rx) = mpsc::channel(8);

        repl_tx
            .send(ReplCommand::Keys(vec![
                KeyPress::new(KeyCode::Up),
                KeyPress::from_char('g'),
            ]))
            .await
            .unwrap();
        drop(midi_tx);
        repl_tx.send(ReplCommand::Quit).await.unwrap();

        let session = host
            .run(repl_rx, midi_rx, std::future::pending())
            .await
            .unwrap();
        assert_eq!(session.dev_state().encoder_bank, 1);
        assert_eq!(session.last_message(), "note-on C3");
    }

    #[tokio::test]
    async fn test_run_relays_incoming_midi() {
        let host = Host::new(AppConfig::default());
        let (repl_tx, repl_rx) = mpsc::channel(8);
        let (midi_tx, midi_rx) = mpsc::channel(8);

        midi_tx
            .send(IncomingMidi {
                port_name: "test".to_string(),
                data: vec![0xB0, 7, 99],
            })
            .await
            .unwrap();
        repl_tx.send(ReplCommand::Quit).await.unwrap();

        let session = host
            .run(repl_rx, midi_rx, std::future::pending())
            .await
            .unwrap();
        assert_eq!(session.last_message(), "cc 7 = 99");
        drop(midi_tx);
    }

    #[tokio::test]
    async fn test_shutdown_stops_run() {
        let host = Host::new(AppConfig::default());
        let (_repl_tx, repl_rx) = mpsc::channel::<ReplCommand>(8);
        let (_midi_tx, midi_rx) = mpsc::channel::<IncomingMidi>(8);

        let session = host.run(repl_rx, midi_rx, async {}).await.unwrap();
        assert_eq!(session.status_label(), "MIDI: NONE");
    }
}
