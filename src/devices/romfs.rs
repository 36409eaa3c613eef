//! romfs - Filesystem plano somente leitura sobre uma tabela estática
//!
//! Os arquivos são gravados na imagem do firmware; não há subdiretórios.
//! Registrado como `/`, atende `/arquivo.ext` pelo atalho da raiz.
//!
//! Tabelas fixas: `MAX_OPEN_FILES` arquivos abertos e `MAX_CURSORS`
//! diretórios abertos ao mesmo tempo.

use crate::config::MAX_FNAME_LENGTH;
use crate::devman::{
    Capabilities, DevResult, Device, DeviceError, DirCursor, DirEntry, OpenFlags, SeekWhence,
};
use crate::sys::Errno;

/// Arquivos abertos simultaneamente
pub const MAX_OPEN_FILES: usize = 8;
/// Diretórios abertos simultaneamente
pub const MAX_CURSORS: usize = 2;

/// Arquivo na imagem
#[derive(Debug, Clone, Copy)]
pub struct RomFile {
    pub name: &'static str,
    pub data: &'static [u8],
    pub mtime: u32,
}

impl RomFile {
    pub const fn new(name: &'static str, data: &'static [u8]) -> Self {
        Self {
            name,
            data,
            mtime: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenFile {
    file: usize,
    pos: u64,
}

/// Filesystem somente leitura
pub struct RomFs {
    files: &'static [RomFile],
    open: [Option<OpenFile>; MAX_OPEN_FILES],
    /// Próxima entrada de cada diretório aberto
    cursors: [Option<usize>; MAX_CURSORS],
}

impl RomFs {
    pub const fn new(files: &'static [RomFile]) -> Self {
        Self {
            files,
            open: [None; MAX_OPEN_FILES],
            cursors: [None; MAX_CURSORS],
        }
    }

    fn lookup(&self, name: &str) -> DevResult<usize> {
        if name.len() > MAX_FNAME_LENGTH {
            return Err(DeviceError::from(Errno::ENAMETOOLONG));
        }
        self.files
            .iter()
            .position(|file| file.name == name)
            .ok_or(DeviceError::from(Errno::ENOENT))
    }

    fn open_file(&mut self, handle: u32) -> DevResult<&mut OpenFile> {
        self.open
            .get_mut(handle as usize)
            .and_then(Option::as_mut)
            .ok_or(DeviceError::from(Errno::EBADF))
    }
}

impl Device for RomFs {
    fn capabilities(&self) -> Capabilities {
        Capabilities::FILE_READ | Capabilities::DIR
    }

    fn open(&mut self, path: &str, flags: OpenFlags, _mode: u32) -> DevResult<u32> {
        if flags.can_write() || flags.is_create() {
            return Err(DeviceError::from(Errno::EROFS));
        }

        let file = self.lookup(path)?;
        let slot = self
            .open
            .iter()
            .position(Option::is_none)
            .ok_or(DeviceError::from(Errno::ENFILE))?;

        self.open[slot] = Some(OpenFile { file, pos: 0 });
        Ok(slot as u32)
    }

    fn close(&mut self, handle: u32) -> DevResult<()> {
        self.open_file(handle)?;
        self.open[handle as usize] = None;
        Ok(())
    }

    fn read(&mut self, handle: u32, buf: &mut [u8]) -> DevResult<usize> {
        let files = self.files;
        let open = self.open_file(handle)?;
        let data = files[open.file].data;

        // Posição que não cabe em usize já está além do fim
        let start = usize::try_from(open.pos).map_or(data.len(), |pos| pos.min(data.len()));
        let count = buf.len().min(data.len() - start);
        buf[..count].copy_from_slice(&data[start..start + count]);
        open.pos += count as u64;

        Ok(count)
    }

    fn seek(&mut self, handle: u32, offset: i64, whence: SeekWhence) -> DevResult<u64> {
        let files = self.files;
        let open = self.open_file(handle)?;

        let base = match whence {
            SeekWhence::Set => 0,
            SeekWhence::Cur => open.pos as i64,
            SeekWhence::End => files[open.file].data.len() as i64,
        };
        let pos = base
            .checked_add(offset)
            .filter(|pos| *pos >= 0)
            .ok_or(DeviceError::from(Errno::EINVAL))?;

        // Além do fim é permitido; leituras retornam 0
        open.pos = pos as u64;
        Ok(open.pos)
    }

    fn opendir(&mut self, path: &str) -> DevResult<DirCursor> {
        // Sem subdiretórios
        if !path.is_empty() {
            return Err(DeviceError::from(Errno::ENOTDIR));
        }

        let slot = self
            .cursors
            .iter()
            .position(Option::is_none)
            .ok_or(DeviceError::from(Errno::ENFILE))?;
        self.cursors[slot] = Some(0);
        Ok(DirCursor(slot))
    }

    fn readdir(&mut self, cursor: DirCursor) -> Option<DirEntry<'_>> {
        let next = self.cursors.get_mut(cursor.0)?.as_mut()?;
        let file = self.files.get(*next)?;
        *next += 1;

        Some(DirEntry {
            size: file.data.len() as u32,
            name: file.name,
            mtime: file.mtime,
        })
    }

    fn closedir(&mut self, cursor: DirCursor) -> DevResult<()> {
        let slot = self
            .cursors
            .get_mut(cursor.0)
            .filter(|slot| slot.is_some())
            .ok_or(DeviceError::from(Errno::EBADF))?;
        *slot = None;
        Ok(())
    }
}
