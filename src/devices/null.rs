//! null - Descarta tudo que é escrito, retorna EOF ao ler

use crate::devman::{Capabilities, DevResult, Device, OpenFlags};

/// Dispositivo null
pub struct NullDevice;

impl NullDevice {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for NullDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for NullDevice {
    fn capabilities(&self) -> Capabilities {
        Capabilities::STREAM
    }

    fn open(&mut self, _path: &str, _flags: OpenFlags, _mode: u32) -> DevResult<u32> {
        Ok(0)
    }

    fn close(&mut self, _handle: u32) -> DevResult<()> {
        Ok(())
    }

    fn read(&mut self, _handle: u32, _buf: &mut [u8]) -> DevResult<usize> {
        // Sempre EOF
        Ok(0)
    }

    fn write(&mut self, _handle: u32, buf: &[u8]) -> DevResult<usize> {
        Ok(buf.len())
    }
}
