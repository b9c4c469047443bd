//! Register access seam and the production MODBUS client.
//!
//! [`RegisterIo`] is the trait boundary the retry layer and the tests sit
//! on. [`FieldBus`] is the production implementation over the `tokio-modbus`
//! sync client, supporting TCP and serial RTU devices.

use std::net::SocketAddr;
use std::time::Duration;

use tokio_modbus::Slave;
use tokio_modbus::client::sync::{self, Context, Reader, Writer};
use tokio_serial::{DataBits, Parity, StopBits};
use tracing::debug;

use crate::error::{LinkError, LinkResult};

/// Addressable register classes, mapped to MODBUS function codes.
///
/// Reads use FC01/02/04/03 respectively; writes use FC15 (coils) and FC16
/// (holding registers). The control loop only exercises `Input` and
/// `Holding`; the bit kinds complete the abstraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    Coil,
    DiscreteInput,
    Input,
    Holding,
}

impl RegisterKind {
    /// Whether the kind accepts writes.
    pub fn writable(self) -> bool {
        matches!(self, RegisterKind::Coil | RegisterKind::Holding)
    }
}

impl std::fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterKind::Coil => write!(f, "coil"),
            RegisterKind::DiscreteInput => write!(f, "discrete input"),
            RegisterKind::Input => write!(f, "input register"),
            RegisterKind::Holding => write!(f, "holding register"),
        }
    }
}

/// Raw register access. One attempt per call; retry lives a layer up.
pub trait RegisterIo {
    /// Establish the connection to the device.
    fn connect(&mut self) -> LinkResult<()>;

    /// Drop the connection. Idempotent.
    fn disconnect(&mut self);

    /// Read `count` registers. Bit kinds are widened to 0/1 words.
    fn read_registers(&mut self, kind: RegisterKind, address: u16, count: u16)
    -> LinkResult<Vec<u16>>;

    /// Write registers. Coil writes interpret every non-zero word as ON.
    fn write_registers(
        &mut self,
        kind: RegisterKind,
        address: u16,
        values: &[u16],
    ) -> LinkResult<()>;
}

/// Serial line parameters for RTU devices.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub data_bits: DataBits,
}

impl SerialConfig {
    /// Build a serial configuration from plain settings values.
    ///
    /// # Errors
    ///
    /// Returns an endpoint error for parity strings other than
    /// none/even/odd, stop bits other than 1/2, or byte sizes outside 5..=8.
    pub fn with_params(
        port: impl Into<String>,
        baud_rate: u32,
        parity: &str,
        stop_bits: u8,
        byte_size: u8,
    ) -> LinkResult<Self> {
        let parity = match parity {
            "none" => Parity::None,
            "even" => Parity::Even,
            "odd" => Parity::Odd,
            other => {
                return Err(LinkError::InvalidEndpoint {
                    what: format!("unknown parity '{other}'"),
                });
            }
        };
        let stop_bits = match stop_bits {
            1 => StopBits::One,
            2 => StopBits::Two,
            other => {
                return Err(LinkError::InvalidEndpoint {
                    what: format!("unsupported stop bits {other}"),
                });
            }
        };
        let data_bits = match byte_size {
            5 => DataBits::Five,
            6 => DataBits::Six,
            7 => DataBits::Seven,
            8 => DataBits::Eight,
            other => {
                return Err(LinkError::InvalidEndpoint {
                    what: format!("unsupported byte size {other}"),
                });
            }
        };
        Ok(Self {
            port: port.into(),
            baud_rate,
            parity,
            stop_bits,
            data_bits,
        })
    }
}

/// How to reach the field device.
#[derive(Debug, Clone)]
pub enum LinkMethod {
    Tcp { ip: String, port: u16 },
    Rtu(SerialConfig),
}

/// Connection settings for [`FieldBus`].
#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub method: LinkMethod,
    /// Device unit id.
    pub slave: u8,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Whether values cross the wire as packed 32-bit floats.
    pub encoding: bool,
}

/// Production register access over the `tokio-modbus` sync client.
pub struct FieldBus {
    settings: LinkSettings,
    ctx: Option<Context>,
}

impl FieldBus {
    pub fn new(settings: LinkSettings) -> Self {
        Self {
            settings,
            ctx: None,
        }
    }

    pub fn settings(&self) -> &LinkSettings {
        &self.settings
    }
}

impl RegisterIo for FieldBus {
    fn connect(&mut self) -> LinkResult<()> {
        let slave = Slave(self.settings.slave);
        let timeout = Some(self.settings.timeout);
        let ctx = match &self.settings.method {
            LinkMethod::Tcp { ip, port } => {
                let addr: SocketAddr =
                    format!("{ip}:{port}")
                        .parse()
                        .map_err(|_| LinkError::InvalidEndpoint {
                            what: format!("'{ip}:{port}' is not a valid socket address"),
                        })?;
                debug!(%addr, "connecting modbus tcp");
                sync::tcp::connect_slave_with_timeout(addr, slave, timeout)?
            }
            LinkMethod::Rtu(serial) => {
                let builder = tokio_serial::new(serial.port.clone(), serial.baud_rate)
                    .parity(serial.parity)
                    .stop_bits(serial.stop_bits)
                    .data_bits(serial.data_bits)
                    .timeout(self.settings.timeout);
                debug!(port = %serial.port, baud = serial.baud_rate, "connecting modbus rtu");
                sync::rtu::connect_slave_with_timeout(&builder, slave, timeout)?
            }
        };
        self.ctx = Some(ctx);
        Ok(())
    }

    fn disconnect(&mut self) {
        // Dropping the context tears down the socket or serial handle.
        self.ctx = None;
    }

    fn read_registers(
        &mut self,
        kind: RegisterKind,
        address: u16,
        count: u16,
    ) -> LinkResult<Vec<u16>> {
        let ctx = self.ctx.as_mut().ok_or(LinkError::NotConnected)?;
        let words = match kind {
            RegisterKind::Coil => widen(flatten(ctx.read_coils(address, count))?),
            RegisterKind::DiscreteInput => widen(flatten(ctx.read_discrete_inputs(address, count))?),
            RegisterKind::Input => flatten(ctx.read_input_registers(address, count))?,
            RegisterKind::Holding => flatten(ctx.read_holding_registers(address, count))?,
        };
        Ok(words)
    }

    fn write_registers(
        &mut self,
        kind: RegisterKind,
        address: u16,
        values: &[u16],
    ) -> LinkResult<()> {
        let ctx = self.ctx.as_mut().ok_or(LinkError::NotConnected)?;
        match kind {
            RegisterKind::Holding => flatten(ctx.write_multiple_registers(address, values)),
            RegisterKind::Coil => {
                let coils: Vec<bool> = values.iter().map(|v| *v != 0).collect();
                flatten(ctx.write_multiple_coils(address, &coils))
            }
            RegisterKind::Input | RegisterKind::DiscreteInput => {
                Err(LinkError::ReadOnlyRegister { kind })
            }
        }
    }
}

/// Collapse the doubled client result into a `LinkError`.
fn flatten<T>(
    res: Result<Result<T, tokio_modbus::ExceptionCode>, tokio_modbus::Error>,
) -> LinkResult<T> {
    match res {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(code)) => Err(LinkError::Exception(code)),
        Err(err) => Err(LinkError::Bus(err)),
    }
}

fn widen(bits: Vec<bool>) -> Vec<u16> {
    bits.into_iter().map(u16::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_kinds() {
        assert!(RegisterKind::Coil.writable());
        assert!(RegisterKind::Holding.writable());
        assert!(!RegisterKind::Input.writable());
        assert!(!RegisterKind::DiscreteInput.writable());
    }

    #[test]
    fn serial_config_rejects_bad_params() {
        assert!(SerialConfig::with_params("/dev/ttyUSB0", 9600, "mark", 1, 8).is_err());
        assert!(SerialConfig::with_params("/dev/ttyUSB0", 9600, "none", 3, 8).is_err());
        assert!(SerialConfig::with_params("/dev/ttyUSB0", 9600, "none", 1, 9).is_err());
        assert!(SerialConfig::with_params("/dev/ttyUSB0", 9600, "even", 2, 7).is_ok());
    }

    #[test]
    fn unconnected_bus_reports_not_connected() {
        let mut bus = FieldBus::new(LinkSettings {
            method: LinkMethod::Tcp {
                ip: "127.0.0.1".to_string(),
                port: 5020,
            },
            slave: 1,
            timeout: Duration::from_secs(1),
            encoding: true,
        });
        assert!(matches!(
            bus.read_registers(RegisterKind::Holding, 0, 2),
            Err(LinkError::NotConnected)
        ));
    }

    #[test]
    fn connect_rejects_garbage_address() {
        let mut bus = FieldBus::new(LinkSettings {
            method: LinkMethod::Tcp {
                ip: "not-an-ip".to_string(),
                port: 5020,
            },
            slave: 1,
            timeout: Duration::from_secs(1),
            encoding: true,
        });
        assert!(matches!(
            bus.connect(),
            Err(LinkError::InvalidEndpoint { .. })
        ));
    }
}
