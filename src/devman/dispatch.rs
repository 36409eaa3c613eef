//! I/O Dispatcher
//!
//! Todas as operações seguem o mesmo padrão:
//! decodificar → buscar slot → verificar capacidade → encaminhar.
//!
//! Erros do dispositivo passam sem renumeração. Capacidade ausente é sempre
//! [`DispatchError::NotSupported`].

use super::desc::Descriptor;
use super::device::{Capabilities, Device, FileStat, OpenFlags, SeekWhence};
use super::error::{DevResult, DispatchError, IoResult, Operation, PathError};
use super::path::{self, Resolved};
use super::registry::Release;
use super::DeviceManager;
use crate::config::{STDERR_NUM, STDIN_NUM};

impl DeviceManager {
    /// Abre `path` no dispositivo que atende o prefixo.
    ///
    /// Se o handle local não couber no descritor ou na tabela de handles
    /// abertos do slot, ele é fechado no dispositivo (quando há `close`) e a
    /// chamada falha com `HandleOverflow`.
    pub fn open(&mut self, path: &str, flags: OpenFlags, mode: u32) -> IoResult<Descriptor> {
        let Resolved { index, remainder } = path::resolve(&self.registry, path)?;

        let record = self
            .registry
            .get_at_mut(index)
            .ok_or(DispatchError::Resolution(PathError::NoDevice))?;
        if !record.has(Operation::Open.required()) {
            return Err(DispatchError::NotSupported(Operation::Open));
        }

        let handle = record.device_mut().open(remainder, flags, mode)?;

        let desc = Descriptor::encode(index, handle).ok();
        let desc = match desc {
            Some(desc) if self.registry.acquire(index, handle) => desc,
            _ => {
                crate::kwarn!("(DM) Handle local sem lugar no descritor=", handle);
                if let Some(record) = self.registry.get_at_mut(index) {
                    if record.has(Capabilities::CLOSE) {
                        let _ = record.device_mut().close(handle);
                    }
                }
                return Err(DispatchError::HandleOverflow);
            }
        };

        crate::ktrace!("(DM) open -> desc=", desc.as_raw());
        Ok(desc)
    }

    /// Fecha um descritor.
    ///
    /// Só handles devolvidos por `open` e ainda não fechados chegam ao
    /// dispositivo; um segundo `close` falha com `BadDescriptor`. A referência
    /// do slot é liberada mesmo se o dispositivo reportar erro: depois de
    /// `close` o descritor não é mais válido.
    pub fn close(&mut self, fd: Descriptor) -> IoResult<()> {
        let (index, handle) = fd.decode();
        crate::ktrace!("(DM) close desc=", fd.as_raw());

        let Some(record) = self.registry.get_at_mut(index) else {
            if self.registry.release(index, handle) == Release::Stale {
                crate::kdebug!("(DM) close em slot desregistrado=", index);
            }
            return Err(DispatchError::StaleDescriptor);
        };
        if !record.has(Operation::Close.required()) {
            return Err(DispatchError::NotSupported(Operation::Close));
        }
        if !record.is_open(handle) {
            return Err(DispatchError::BadDescriptor);
        }

        let result = record.device_mut().close(handle).map_err(DispatchError::from);
        self.registry.release(index, handle);
        result
    }

    pub fn read(&mut self, fd: Descriptor, buf: &mut [u8]) -> IoResult<usize> {
        self.forward(fd, Operation::Read, |dev, handle| dev.read(handle, buf))
    }

    pub fn write(&mut self, fd: Descriptor, buf: &[u8]) -> IoResult<usize> {
        self.forward(fd, Operation::Write, |dev, handle| dev.write(handle, buf))
    }

    /// Reposiciona; retorna o novo offset absoluto
    pub fn seek(&mut self, fd: Descriptor, offset: i64, whence: SeekWhence) -> IoResult<u64> {
        self.forward(fd, Operation::Seek, |dev, handle| {
            dev.seek(handle, offset, whence)
        })
    }

    /// `fstat` mínimo: só os três streams padrão são conhecidos.
    ///
    /// Recebe o inteiro cru porque não depende de nenhum dispositivo.
    pub fn fstat(&self, raw: i32) -> IoResult<FileStat> {
        if (STDIN_NUM..=STDERR_NUM).contains(&raw) {
            Ok(FileStat::char_device())
        } else {
            Err(DispatchError::NotSupported(Operation::Stat))
        }
    }

    /// Decodifica, verifica a capacidade e chama `op` no dispositivo
    fn forward<T>(
        &mut self,
        fd: Descriptor,
        op: Operation,
        call: impl FnOnce(&mut dyn Device, u32) -> DevResult<T>,
    ) -> IoResult<T> {
        let (index, handle) = fd.decode();

        let record = self
            .registry
            .get_at_mut(index)
            .ok_or(DispatchError::StaleDescriptor)?;
        if !record.has(op.required()) {
            return Err(DispatchError::NotSupported(op));
        }

        Ok(call(record.device_mut(), handle)?)
    }
}
