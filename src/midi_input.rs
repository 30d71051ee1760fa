//! MIDI input ports
//!
//! Discovers input ports and forwards raw incoming bytes into a tokio channel.
//! The midir callback runs on the backend's own thread; it only copies bytes
//! and never blocks, so all parsing and state changes happen on the event loop.

use anyhow::{Context, Result};
use midir::{MidiInput, MidiInputConnection, MidiInputPort};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::midi::format_hex;

/// Client name announced to the MIDI backend
const CLIENT_NAME: &str = "Limit";

/// Information about a discovered input port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub index: usize,
    pub name: String,
}

/// Raw bytes received on an input port
#[derive(Debug, Clone)]
pub struct IncomingMidi {
    pub port_name: String,
    pub data: Vec<u8>,
}

/// An open input connection; dropping it closes the port
pub struct MidiInputHandle {
    _connection: MidiInputConnection<()>,
    pub port_name: String,
}

/// List the available MIDI input ports
pub fn discover_input_ports() -> Result<Vec<PortInfo>> {
    let midi_in = MidiInput::new(&format!("{}-Discovery", CLIENT_NAME))
        .context("Failed to create MIDI input")?;

    Ok(midi_in
        .ports()
        .iter()
        .enumerate()
        .filter_map(|(index, port)| {
            midi_in
                .port_name(port)
                .ok()
                .map(|name| PortInfo { index, name })
        })
        .collect())
}

/// Print discovered ports for the `--list-ports` flag
pub fn print_ports() -> Result<()> {
    let ports = discover_input_ports()?;
    println!("\n=== MIDI Input Ports ===");
    if ports.is_empty() {
        println!("  (none)");
    }
    for port in ports {
        println!("  {}: {}", port.index, port.name);
    }
    println!();
    Ok(())
}

/// Pick the first port whose name contains `pattern` (case-insensitive), or
/// the first port at all when no pattern is given.
pub fn select_port<'a>(ports: &'a [PortInfo], pattern: Option<&str>) -> Option<&'a PortInfo> {
    match pattern {
        Some(pattern) => {
            let pattern = pattern.to_lowercase();
            ports
                .iter()
                .find(|port| port.name.to_lowercase().contains(&pattern))
        }
        None => ports.first(),
    }
}

/// Connect to an input port and forward everything it receives to `tx`.
pub fn connect_input(
    pattern: Option<&str>,
    tx: mpsc::Sender<IncomingMidi>,
) -> Result<MidiInputHandle> {
    let mut midi_in =
        MidiInput::new(&format!("{}-Input", CLIENT_NAME)).context("Failed to create MIDI input")?;
    // Keep clock and active sensing out of the status line
    midi_in.ignore(midir::Ignore::TimeAndActiveSense);

    let ports: Vec<(MidiInputPort, PortInfo)> = midi_in
        .ports()
        .into_iter()
        .enumerate()
        .filter_map(|(index, port)| {
            let name = midi_in.port_name(&port).ok()?;
            Some((port, PortInfo { index, name }))
        })
        .collect();
    debug!("Found {} MIDI input ports", ports.len());

    let infos: Vec<PortInfo> = ports.iter().map(|(_, info)| info.clone()).collect();
    let selected = select_port(&infos, pattern).ok_or_else(|| match pattern {
        Some(pattern) => anyhow::anyhow!("No MIDI input port matching '{}'", pattern),
        None => anyhow::anyhow!("No MIDI input ports available"),
    })?;
    let (port, _) = ports
        .iter()
        .find(|(_, info)| info == selected)
        .context("Selected MIDI port disappeared")?;
    let port_name = selected.name.clone();

    info!("Connecting to MIDI input: {}", port_name);

    let callback_name = port_name.clone();
    let connection = midi_in
        .connect(
            port,
            CLIENT_NAME,
            move |_timestamp, data, _| {
                let event = IncomingMidi {
                    port_name: callback_name.clone(),
                    data: data.to_vec(),
                };
                if let Err(e) = tx.try_send(event) {
                    warn!("Dropping incoming MIDI {}: {}", format_hex(data), e);
                }
            },
            (),
        )
        .map_err(|e| anyhow::anyhow!("Failed to connect to input port: {}", e))?;

    Ok(MidiInputHandle {
        _connection: connection,
        port_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports() -> Vec<PortInfo> {
        vec![
            PortInfo {
                index: 0,
                name: "Midi Through Port-0".to_string(),
            },
            PortInfo {
                index: 1,
                name: "Launchkey Mini MK3".to_string(),
            },
        ]
    }

    #[test]
    fn test_select_by_pattern() {
        let ports = ports();
        let port = select_port(&ports, Some("LAUNCHKEY")).unwrap();
        assert_eq!(port.index, 1);
        assert!(select_port(&ports, Some("x-touch")).is_none());
    }

    #[test]
    fn test_select_first_without_pattern() {
        let ports = ports();
        assert_eq!(select_port(&ports, None).unwrap().index, 0);
        assert!(select_port(&[], None).is_none());
    }
}
