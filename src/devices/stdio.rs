//! std - stdin/stdout/stderr sobre os hooks do console
//!
//! Registrado no índice 0 pelo `DeviceManager::init`, de modo que os
//! descritores crus 0, 1 e 2 são exatamente (0, handle 0/1/2).
//!
//! - escrita: `\n` vira `\r\n`
//! - leitura: uma linha, com eco, backspace e CR → LF

use crate::config::{STDERR_NUM, STDIN_NUM, STDOUT_NUM};
use crate::console;
use crate::devman::{Capabilities, DevResult, Device, DeviceError, OpenFlags};
use crate::sys::Errno;

const BACKSPACE: u8 = 0x08;
const DEL: u8 = 0x7F;

/// Dispositivo de streams padrão
pub struct StdDevice;

impl StdDevice {
    pub const fn new() -> Self {
        Self
    }

    fn check(handle: u32) -> DevResult<()> {
        if handle <= STDERR_NUM as u32 {
            Ok(())
        } else {
            Err(DeviceError::from(Errno::EBADF))
        }
    }

    /// Lê até o fim da linha ou até encher o buffer
    fn read_line(buf: &mut [u8]) -> usize {
        let mut count = 0;

        while count < buf.len() {
            let Some(byte) = console::recv() else {
                break;
            };

            match byte {
                b'\r' | b'\n' => {
                    buf[count] = b'\n';
                    count += 1;
                    console::emit_nl();
                    break;
                }
                BACKSPACE | DEL => {
                    if count > 0 {
                        count -= 1;
                        console::emit_str("\x08 \x08");
                    }
                }
                _ => {
                    buf[count] = byte;
                    count += 1;
                    console::emit(byte);
                }
            }
        }

        count
    }
}

impl Default for StdDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for StdDevice {
    fn capabilities(&self) -> Capabilities {
        Capabilities::STREAM
    }

    fn open(&mut self, path: &str, _flags: OpenFlags, _mode: u32) -> DevResult<u32> {
        let handle = match path {
            "in" => STDIN_NUM,
            "out" => STDOUT_NUM,
            "err" => STDERR_NUM,
            _ => return Err(DeviceError::from(Errno::ENOENT)),
        };
        Ok(handle as u32)
    }

    fn close(&mut self, handle: u32) -> DevResult<()> {
        Self::check(handle)
    }

    fn read(&mut self, handle: u32, buf: &mut [u8]) -> DevResult<usize> {
        Self::check(handle)?;
        if handle != STDIN_NUM as u32 {
            return Err(DeviceError::from(Errno::EBADF));
        }
        Ok(Self::read_line(buf))
    }

    fn write(&mut self, handle: u32, buf: &[u8]) -> DevResult<usize> {
        Self::check(handle)?;
        if handle == STDIN_NUM as u32 {
            return Err(DeviceError::from(Errno::EBADF));
        }

        for &byte in buf {
            if byte == b'\n' {
                console::emit_nl();
            } else {
                console::emit(byte);
            }
        }
        Ok(buf.len())
    }
}
