//! MODBUS field transport for pidflow.
//!
//! For avoiding confusion with the Modbus master/slave terminology, this
//! crate uses the terms "client" and "device": pidflow is always the client
//! (master) polling a single field device (slave) over TCP or serial RTU.
//!
//! The crate is not a general MODBUS stack. It exposes exactly the register
//! operations the control loop exercises, behind three layers:
//! - [`codec`]: IEEE-754 floats packed into 16-bit register pairs
//! - [`RegisterIo`]: the raw register seam, implemented by [`FieldBus`] over
//!   the `tokio-modbus` sync client and by scripted mocks in tests
//! - [`ModbusTransport`]: bounded retry plus float encode/decode on top of
//!   any `RegisterIo`

pub mod codec;
pub mod error;
pub mod link;
pub mod transport;

pub use error::{LinkError, LinkResult};
pub use link::{FieldBus, LinkMethod, LinkSettings, RegisterIo, RegisterKind, SerialConfig};
pub use transport::{MAX_ATTEMPTS, ModbusTransport};
