//! Convenience re-exports for the common case of probing and driving one
//! chip: `use spi_nor_core::prelude::*;`.

pub use crate::addr::DualTopology;
pub use crate::error::Error;
pub use crate::facade::Facade;
pub use crate::nor::Flash;
pub use crate::transport::{DataPhase, SpiTransport, Transport};
pub use crate::{BlockDevice, Read};
