//! Devices - Dispositivos embutidos
//!
//! - `stdio` - stdin/stdout/stderr (registrado pelo `DeviceManager::init`)
//! - `null`  - descarta escrita, EOF na leitura
//! - `romfs` - arquivos somente leitura gravados na imagem

pub mod null;
pub mod romfs;
pub mod stdio;

pub use null::NullDevice;
pub use romfs::{RomFile, RomFs};
pub use stdio::StdDevice;
