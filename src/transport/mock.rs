//! In-memory transport and port opener for tests.

use super::Transport;
use crate::discovery::PortOpener;
use crate::error::{Error, Result};
use guitar_proto::{encode, DigitalInput, GuitarState};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Simulated guitar: emits a fresh record whenever the line runs dry.
struct DeviceSim {
    state: GuitarState,
    step_micros: u64,
}

#[derive(Default)]
struct LineInner {
    rx: VecDeque<u8>,
    discards: usize,
    failed: bool,
    hung_up: bool,
    device: Option<DeviceSim>,
}

/// Receive side of a fake serial line, shared between a test and its
/// transport.
#[derive(Clone, Default)]
pub struct MockLine {
    inner: Arc<Mutex<LineInner>>,
}

impl MockLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A line with a device attached that streams records starting at
    /// `start_uptime`.
    pub fn live(start_uptime: u64, step_micros: u64) -> Self {
        let mut state = GuitarState::neutral();
        state.uptime = start_uptime;
        state.set_digital(DigitalInput::Green, true);
        state.analog = [0.5, 0.25];

        let line = Self::new();
        line.lock().device = Some(DeviceSim { state, step_micros });
        line
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LineInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `bytes` arrive on the line.
    pub fn deliver(&self, bytes: &[u8]) {
        self.lock().rx.extend(bytes.iter().copied());
    }

    pub fn pending(&self) -> usize {
        self.lock().rx.len()
    }

    pub fn discards(&self) -> usize {
        self.lock().discards
    }

    /// Every later transport call fails with an I/O error.
    pub fn fail(&self) {
        self.lock().failed = true;
    }

    /// Every later transport call reports a disconnect.
    pub fn hang_up(&self) {
        self.lock().hung_up = true;
    }
}

pub struct MockTransport {
    name: String,
    line: MockLine,
    open_ports: Option<Arc<AtomicUsize>>,
}

impl MockTransport {
    pub fn new(name: &str, line: MockLine) -> Self {
        Self {
            name: name.to_string(),
            line,
            open_ports: None,
        }
    }

    fn tracked(name: &str, line: MockLine, open_ports: Arc<AtomicUsize>) -> Self {
        open_ports.fetch_add(1, Ordering::SeqCst);
        Self {
            name: name.to_string(),
            line,
            open_ports: Some(open_ports),
        }
    }

    fn check(&self, inner: &LineInner) -> Result<()> {
        if inner.failed {
            return Err(Error::Io(std::io::Error::other("mock line failure")));
        }
        if inner.hung_up {
            return Err(Error::Disconnected(self.name.clone()));
        }
        Ok(())
    }
}

impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn bytes_available(&mut self) -> Result<usize> {
        let mut inner = self.line.lock();
        self.check(&inner)?;

        if inner.rx.is_empty() {
            if let Some(device) = inner.device.as_mut() {
                device.state.uptime += device.step_micros;
                let record = encode(&device.state);
                inner.rx.extend(record);
            }
        }
        Ok(inner.rx.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut inner = self.line.lock();
        self.check(&inner)?;

        let n = buffer.len().min(inner.rx.len());
        for (slot, byte) in buffer.iter_mut().zip(inner.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn discard_input(&mut self) -> Result<()> {
        let mut inner = self.line.lock();
        self.check(&inner)?;

        inner.rx.clear();
        inner.discards += 1;
        Ok(())
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        if let Some(open_ports) = &self.open_ports {
            open_ports.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// How a fake port behaves when probed.
#[derive(Clone, Copy, Debug)]
pub enum MockPort {
    /// Opens and streams records.
    Live,
    /// Opens but never sends anything.
    Silent,
    /// Opens and sends bytes that never contain a record.
    Garbage,
    /// Refuses to open.
    Fail,
    /// Blocks for the given time, then opens silent.
    Hang(Duration),
}

/// Port opener over a fixed set of fake ports.
pub struct MockOpener {
    ports: Vec<(String, MockPort)>,
    open_ports: Arc<AtomicUsize>,
}

impl MockOpener {
    pub fn new(ports: &[(&str, MockPort)]) -> Self {
        Self {
            ports: ports
                .iter()
                .map(|(name, kind)| (name.to_string(), *kind))
                .collect(),
            open_ports: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of transports currently open.
    pub fn open_ports(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.open_ports)
    }
}

impl PortOpener for MockOpener {
    type Port = MockTransport;

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.ports.iter().map(|(name, _)| name.clone()).collect())
    }

    fn open(&self, name: &str) -> Result<MockTransport> {
        let kind = self
            .ports
            .iter()
            .find(|(port, _)| port == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| {
                Error::Serial(serialport::Error::new(
                    serialport::ErrorKind::NoDevice,
                    format!("no such port: {name}"),
                ))
            })?;

        let line = match kind {
            MockPort::Live => MockLine::live(2_000_000, 1_000),
            MockPort::Silent => MockLine::new(),
            MockPort::Garbage => {
                let line = MockLine::new();
                line.deliver(&[0x42; 256]);
                line
            }
            MockPort::Fail => {
                return Err(Error::Serial(serialport::Error::new(
                    serialport::ErrorKind::NoDevice,
                    "access denied",
                )))
            }
            MockPort::Hang(delay) => {
                std::thread::sleep(delay);
                MockLine::new()
            }
        };

        Ok(MockTransport::tracked(name, line, Arc::clone(&self.open_ports)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_counts_open_ports() {
        let opener = MockOpener::new(&[("COM1", MockPort::Live), ("COM2", MockPort::Fail)]);
        let open_ports = opener.open_ports();

        let port = opener.open("COM1").unwrap();
        assert_eq!(port.name(), "COM1");
        assert_eq!(open_ports.load(Ordering::SeqCst), 1);
        assert!(opener.open("COM2").is_err());
        assert_eq!(open_ports.load(Ordering::SeqCst), 1);

        drop(port);
        assert_eq!(open_ports.load(Ordering::SeqCst), 0);
    }
}
