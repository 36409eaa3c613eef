//! Iteração de diretórios
//!
//! [`DirHandle`] não é `Clone` nem `Copy` e `closedir` o consome: usar um
//! handle depois de fechado não compila. A camada C guarda handles numa tabela
//! própria e trata o fechamento duplo lá.

use super::device::{DirCursor, DirEntry};
use super::error::{DispatchError, IoResult, Operation, PathError};
use super::path::{self, Resolved};
use super::DeviceManager;

/// Handle de diretório: índice do dispositivo + cursor opaco dele
#[derive(Debug, PartialEq, Eq)]
pub struct DirHandle {
    device: u8,
    cursor: DirCursor,
}

impl DirHandle {
    /// Índice do dispositivo dono do cursor
    pub fn device(&self) -> usize {
        self.device as usize
    }

    pub fn cursor(&self) -> DirCursor {
        self.cursor
    }
}

impl DeviceManager {
    /// Abre um diretório. Só o nome do dispositivo precisa existir no caminho.
    ///
    /// Exige o conjunto completo de capacidades de diretório.
    pub fn opendir(&mut self, path: &str) -> IoResult<DirHandle> {
        let Resolved { index, remainder } = path::resolve_dir(&self.registry, path)?;

        let record = self
            .registry
            .get_at_mut(index)
            .ok_or(DispatchError::Resolution(PathError::NoDevice))?;
        if !record.has_dir_support() {
            return Err(DispatchError::NotSupported(Operation::Directory));
        }

        let cursor = record.device_mut().opendir(remainder)?;
        self.registry.acquire_dir(index);

        crate::ktrace!("(DM) opendir no slot=", index);
        Ok(DirHandle {
            device: index as u8,
            cursor,
        })
    }

    /// Próxima entrada; None no fim ou se o dispositivo foi desregistrado
    pub fn readdir(&mut self, dir: &DirHandle) -> Option<DirEntry<'_>> {
        let record = self.registry.get_at_mut(dir.device())?;
        record.device_mut().readdir(dir.cursor)
    }

    /// Fecha o diretório e libera a referência do slot
    pub fn closedir(&mut self, dir: DirHandle) -> IoResult<()> {
        let index = dir.device();

        let result = match self.registry.get_at_mut(index) {
            Some(record) => record
                .device_mut()
                .closedir(dir.cursor)
                .map_err(DispatchError::from),
            None => Err(DispatchError::StaleDescriptor),
        };

        self.registry.release_dir(index);
        result
    }
}
