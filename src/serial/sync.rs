use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, BorrowedFd};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits, TTYPort};

use crate::config::BaudRate;
use crate::{Error, Result};

use super::ByteIo;

/// How long a single read or write may wait for the hardware before the
/// attempt counts as zero progress.
pub const IO_POLL_TIMEOUT: Duration = Duration::from_millis(20);

/// An open serial device, configured for raw 8N1 byte transfer.
///
/// The descriptor is closed when the link is dropped, whichever way the
/// transfer ends.
pub struct TtyLink {
    port: TTYPort,
    device: String,
}

impl TtyLink {
    /// Open `device` at `baud` and put the line into raw byte mode.
    ///
    /// Any stale bytes already queued on the receive side are discarded, so a
    /// transfer only ever sees what the peer sends after this point.
    pub fn open(device: &str, baud: BaudRate) -> Result<Self> {
        let port = serialport::new(device, baud.as_u32())
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(IO_POLL_TIMEOUT)
            .open_native()
            .map_err(|e| Error::Open {
                target: device.to_string(),
                source: e.into(),
            })?;

        apply_input_discipline(&port).map_err(|e| Error::Open {
            target: device.to_string(),
            source: e,
        })?;

        let mut link = Self {
            port,
            device: device.to_string(),
        };
        link.discard_input()?;
        log::info!("opened {} at {} baud, raw 8N1", link.device, baud);
        Ok(link)
    }

    /// Wrap an already configured port, such as one half of `TTYPort::pair`.
    pub fn from_port(port: TTYPort) -> Self {
        let device = port.name().unwrap_or_else(|| "<pty>".to_string());
        Self { port, device }
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl ByteIo for TtyLink {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if is_transient(&e) => Ok(0),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn write_some(&mut self, buf: &[u8]) -> Result<usize> {
        match self.port.write(buf) {
            Ok(n) => Ok(n),
            Err(e) if is_transient(&e) => Ok(0),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn discard_input(&mut self) -> Result<()> {
        self.port
            .clear(ClearBuffer::Input)
            .map_err(|e| Error::Io(e.into()))
    }

    fn drain(&mut self) -> Result<()> {
        self.port.flush().map_err(Error::Io)
    }
}

/// A timed-out or interrupted call moved no bytes but the link is still fine.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Ignore break and parity errors on input while keeping parity checking on,
/// matching classic diagnostic line settings. The builder has already put the
/// line into raw 8N1.
fn apply_input_discipline(port: &TTYPort) -> io::Result<()> {
    use rustix::termios::{tcgetattr, tcsetattr, InputModes, OptionalActions};

    // The descriptor stays owned by the port for the duration of the borrow.
    let fd = unsafe { BorrowedFd::borrow_raw(port.as_raw_fd()) };
    let mut attrs = tcgetattr(fd)?;
    attrs.input_modes = InputModes::IGNBRK | InputModes::IGNPAR | InputModes::INPCK;
    tcsetattr(fd, OptionalActions::Now, &attrs)?;
    Ok(())
}
