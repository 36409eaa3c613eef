//! Testes do Device Manager (host)
//!
//! ```bash
//! cargo test --lib devman::tests
//! cargo test --lib devman::tests::dispatch
//! ```
//!
//! # Estrutura
//!
//! - `registry.rs` - Registro, nomes, reuso de slots
//! - `path.rs`     - Resolução de caminhos
//! - `desc.rs`     - Codec de descritores
//! - `dispatch.rs` - open/close/read/write/seek/fstat
//! - `dir.rs`      - opendir/readdir/closedir
//!
//! Os dispositivos de teste registram cada chamada recebida, para verificar
//! que o dispatcher encaminha argumentos sem alterá-los.

#![cfg(test)]

pub mod dispatch;
pub mod registry;

use std::sync::{Arc, Mutex};

use super::{
    Capabilities, DevResult, Device, DeviceError, DeviceManager, DirCursor, DirEntry, OpenFlags,
    SeekWhence,
};

/// Chamada recebida por um [`MockDevice`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open(String, u32, u32),
    Close(u32),
    Read(u32, usize),
    Write(u32, Vec<u8>),
    Seek(u32, i64, SeekWhence),
    OpenDir(String),
    CloseDir(usize),
}

/// Log compartilhado entre o teste e o dispositivo registrado
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Call> {
        self.0.lock().unwrap().last().cloned()
    }
}

/// Entradas fixas devolvidas por `readdir`
pub const MOCK_ENTRIES: [(&str, u32, u32); 2] = [("a.txt", 10, 100), ("b.bin", 20, 200)];

/// Dispositivo configurável: implementa tudo, mas só anuncia `caps`
pub struct MockDevice {
    caps: Capabilities,
    handle: u32,
    sequential: bool,
    open_error: Option<i32>,
    log: CallLog,
    dir_next: usize,
}

impl MockDevice {
    pub fn new(caps: Capabilities, log: &CallLog) -> Self {
        Self {
            caps,
            handle: 5,
            sequential: false,
            open_error: None,
            log: log.clone(),
            dir_next: 0,
        }
    }

    /// Handle local retornado por `open`
    pub fn with_handle(mut self, handle: u32) -> Self {
        self.handle = handle;
        self
    }

    /// Cada `open` devolve um handle novo, a partir do atual
    pub fn sequential(mut self) -> Self {
        self.sequential = true;
        self
    }

    /// Faz `open` falhar com o código dado
    pub fn failing_open(mut self, code: i32) -> Self {
        self.open_error = Some(code);
        self
    }

    pub fn boxed(self) -> Box<dyn Device> {
        Box::new(self)
    }
}

impl Device for MockDevice {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn open(&mut self, path: &str, flags: OpenFlags, mode: u32) -> DevResult<u32> {
        self.log.push(Call::Open(path.to_string(), flags.0, mode));
        if let Some(code) = self.open_error {
            return Err(DeviceError(code));
        }
        let handle = self.handle;
        if self.sequential {
            self.handle += 1;
        }
        Ok(handle)
    }

    fn close(&mut self, handle: u32) -> DevResult<()> {
        self.log.push(Call::Close(handle));
        Ok(())
    }

    fn read(&mut self, handle: u32, buf: &mut [u8]) -> DevResult<usize> {
        self.log.push(Call::Read(handle, buf.len()));
        buf.fill(b'r');
        Ok(buf.len())
    }

    fn write(&mut self, handle: u32, buf: &[u8]) -> DevResult<usize> {
        self.log.push(Call::Write(handle, buf.to_vec()));
        Ok(buf.len())
    }

    fn seek(&mut self, handle: u32, offset: i64, whence: SeekWhence) -> DevResult<u64> {
        self.log.push(Call::Seek(handle, offset, whence));
        Ok(offset as u64)
    }

    fn opendir(&mut self, path: &str) -> DevResult<DirCursor> {
        self.log.push(Call::OpenDir(path.to_string()));
        self.dir_next = 0;
        Ok(DirCursor(7))
    }

    fn readdir(&mut self, _cursor: DirCursor) -> Option<DirEntry<'_>> {
        let (name, size, mtime) = *MOCK_ENTRIES.get(self.dir_next)?;
        self.dir_next += 1;
        Some(DirEntry { size, name, mtime })
    }

    fn closedir(&mut self, cursor: DirCursor) -> DevResult<()> {
        self.log.push(Call::CloseDir(cursor.0));
        Ok(())
    }
}

/// Gerenciador sem `init`: o índice 0 fica livre para os testes
pub fn manager_with(devices: &[(&str, Capabilities)]) -> (DeviceManager, CallLog) {
    let log = CallLog::default();
    let mut dm = DeviceManager::new();
    for (name, caps) in devices {
        dm.register(name, MockDevice::new(*caps, &log).boxed())
            .unwrap();
    }
    (dm, log)
}

/// Todas as capacidades
pub fn all_caps() -> Capabilities {
    Capabilities::all()
}

/// A suite do alvo também roda no host
#[cfg(feature = "self_test")]
#[test]
fn test_target_suite_passes() {
    let report = crate::devman::test::run_devman_tests();
    assert_eq!(report.failed, 0);
    assert_eq!(report.skipped, 0);
}
