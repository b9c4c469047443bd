//! Bounded-retry transport over any [`RegisterIo`].
//!
//! Every read and write gets up to [`MAX_ATTEMPTS`] tries before the
//! operation fails with `Exhausted`; the control loop decides what an
//! exhausted iteration means. Reconnection attempts on `open()` are spaced
//! by a short fixed delay, in-loop operation retries are immediate.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::codec;
use crate::error::{LinkError, LinkResult};
use crate::link::{FieldBus, LinkSettings, RegisterIo, RegisterKind};

/// Attempts per operation before reporting `Exhausted`.
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay between reconnection attempts on `open()`.
const RECONNECT_DELAY: Duration = Duration::from_millis(500);

/// Retrying float-oriented transport over a raw register seam.
pub struct ModbusTransport<C: RegisterIo> {
    io: C,
    encoding: bool,
}

impl ModbusTransport<FieldBus> {
    /// Production transport from connection settings.
    pub fn from_settings(settings: LinkSettings) -> Self {
        let encoding = settings.encoding;
        Self::new(FieldBus::new(settings), encoding)
    }
}

impl<C: RegisterIo> ModbusTransport<C> {
    /// Wrap a register seam. `encoding` selects packed-float transfer;
    /// without it register words pass through numerically unchanged.
    pub fn new(io: C, encoding: bool) -> Self {
        Self { io, encoding }
    }

    /// Connect to the device, retrying with a fixed delay.
    pub fn open(&mut self) -> LinkResult<()> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.io.connect() {
                Ok(()) => {
                    debug!(attempt, "transport open");
                    return Ok(());
                }
                Err(err) if attempt >= MAX_ATTEMPTS => {
                    return Err(LinkError::Exhausted {
                        operation: "open",
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
                Err(err) => {
                    warn!(attempt, %err, "connect failed, retrying");
                    thread::sleep(RECONNECT_DELAY);
                }
            }
        }
    }

    /// Drop the connection. Idempotent.
    pub fn close(&mut self) {
        self.io.disconnect();
    }

    /// Read `count` values. With encoding enabled each value is a packed
    /// float spanning two registers; otherwise one register per value.
    pub fn read(&mut self, kind: RegisterKind, address: u16, count: u16) -> LinkResult<Vec<f32>> {
        let register_count = if self.encoding { count * 2 } else { count };
        let io = &mut self.io;
        let regs = with_retry("read", || io.read_registers(kind, address, register_count))?;
        if self.encoding {
            codec::decode_f32(&regs)
        } else {
            Ok(regs.into_iter().map(f32::from).collect())
        }
    }

    /// Write values to a writable register kind.
    pub fn write(&mut self, kind: RegisterKind, address: u16, values: &[f32]) -> LinkResult<()> {
        if !kind.writable() {
            return Err(LinkError::ReadOnlyRegister { kind });
        }
        let regs: Vec<u16> = if self.encoding {
            codec::encode_f32(values)
        } else {
            values.iter().map(|v| *v as u16).collect()
        };
        let io = &mut self.io;
        with_retry("write", || io.write_registers(kind, address, &regs))
    }
}

fn with_retry<T>(operation: &'static str, mut op: impl FnMut() -> LinkResult<T>) -> LinkResult<T> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= MAX_ATTEMPTS => {
                return Err(LinkError::Exhausted {
                    operation,
                    attempts: attempt,
                    source: Box::new(err),
                });
            }
            Err(err) => warn!(operation, attempt, %err, "attempt failed, retrying"),
        }
    }
}
