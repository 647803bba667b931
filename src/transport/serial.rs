//! Serial transport implementation

use super::Transport;
use crate::config::SerialConfig;
use crate::error::Result;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Read;

/// Serial transport for the guitar's USB-serial link
pub struct SerialTransport {
    name: String,
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open a serial port
    ///
    /// # Arguments
    /// * `name` - Serial port name (e.g., "/dev/ttyACM0", "COM3")
    /// * `config` - Line settings; DTR/RTS are asserted after opening
    pub fn open(name: &str, config: &SerialConfig) -> Result<Self> {
        let mut port = serialport::new(name, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()?;

        port.write_data_terminal_ready(config.dtr)?;
        port.write_request_to_send(config.rts)?;

        log::debug!(
            "Opened serial port: {} at {} baud (DTR={}, RTS={})",
            name,
            config.baud_rate,
            config.dtr,
            config.rts
        );

        Ok(SerialTransport {
            name: name.to_string(),
            port,
        })
    }

    /// Names of the serial ports present on this machine
    pub fn list() -> Result<Vec<String>> {
        Ok(serialport::available_ports()?
            .into_iter()
            .map(|info| info.port_name)
            .collect())
    }
}

impl Transport for SerialTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn bytes_available(&mut self) -> Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn discard_input(&mut self) -> Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        log::debug!("Closing serial port: {}", self.name);
    }
}
