//! Device - Trait e tipos base para dispositivos
//!
//! Um dispositivo expõe um subconjunto fixo de operações. O conjunto é
//! declarado em [`Device::capabilities`] e o dispatcher só encaminha chamadas
//! que estejam nele: os métodos fora do conjunto nunca são invocados, e suas
//! implementações padrão existem apenas para que o trait seja implementável
//! parcialmente.

use bitflags::bitflags;

use super::error::{DevResult, DeviceError};
use crate::sys::Errno;

bitflags! {
    /// Operações suportadas por um dispositivo
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const OPEN     = 1 << 0;
        const CLOSE    = 1 << 1;
        const READ     = 1 << 2;
        const WRITE    = 1 << 3;
        const SEEK     = 1 << 4;
        const OPENDIR  = 1 << 5;
        const READDIR  = 1 << 6;
        const CLOSEDIR = 1 << 7;
    }
}

impl Capabilities {
    /// Conjunto completo de diretório. Suporte parcial conta como nenhum.
    pub const DIR: Self = Self::OPENDIR.union(Self::READDIR).union(Self::CLOSEDIR);

    /// Arquivo comum somente leitura
    pub const FILE_READ: Self = Self::OPEN
        .union(Self::CLOSE)
        .union(Self::READ)
        .union(Self::SEEK);

    /// Stream de caractere (console, pipes)
    pub const STREAM: Self = Self::OPEN
        .union(Self::CLOSE)
        .union(Self::READ)
        .union(Self::WRITE);

    /// Verifica suporte completo a diretórios
    pub const fn has_dir(&self) -> bool {
        self.contains(Self::DIR)
    }
}

// =============================================================================
// OPEN FLAGS
// =============================================================================

/// Flags de `open`, na numeração da newlib (`sys/_default_fcntl.h`).
///
/// O dispatcher não interpreta as flags; elas chegam intactas ao dispositivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct OpenFlags(pub u32);

impl OpenFlags {
    /// Somente leitura
    pub const O_RDONLY: u32 = 0;
    /// Somente escrita
    pub const O_WRONLY: u32 = 1;
    /// Leitura e escrita
    pub const O_RDWR: u32 = 2;
    /// Máscara de acesso
    pub const O_ACCMODE: u32 = 3;
    /// Append mode
    pub const O_APPEND: u32 = 0x0008;
    /// Criar se não existir
    pub const O_CREAT: u32 = 0x0200;
    /// Truncar arquivo existente
    pub const O_TRUNC: u32 = 0x0400;
    /// Falhar se existir (com O_CREAT)
    pub const O_EXCL: u32 = 0x0800;

    pub const fn read_only() -> Self {
        Self(Self::O_RDONLY)
    }

    pub fn can_read(&self) -> bool {
        (self.0 & Self::O_ACCMODE) != Self::O_WRONLY
    }

    pub fn can_write(&self) -> bool {
        (self.0 & Self::O_ACCMODE) != Self::O_RDONLY
    }

    pub fn is_create(&self) -> bool {
        (self.0 & Self::O_CREAT) != 0
    }
}

// =============================================================================
// SEEK WHENCE
// =============================================================================

/// Whence para seek
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SeekWhence {
    /// Do início do arquivo
    Set = 0,
    /// Da posição atual
    Cur = 1,
    /// Do fim do arquivo
    End = 2,
}

impl SeekWhence {
    pub fn from_raw(val: i32) -> Option<Self> {
        match val {
            0 => Some(Self::Set),
            1 => Some(Self::Cur),
            2 => Some(Self::End),
            _ => None,
        }
    }
}

// =============================================================================
// DIRETÓRIOS
// =============================================================================

/// Cursor de diretório opaco, fornecido pelo `opendir` do dispositivo.
///
/// Só tem significado para o dispositivo que o criou.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct DirCursor(pub usize);

/// Entrada de diretório independente de plataforma.
///
/// Unidade e época de `mtime` são as do dispositivo; o núcleo não interpreta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry<'a> {
    /// Tamanho em bytes
    pub size: u32,
    /// Nome (sem o prefixo do dispositivo)
    pub name: &'a str,
    /// Tempo de modificação
    pub mtime: u32,
}

// =============================================================================
// FILE STAT
// =============================================================================

/// Tipo de arquivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileType {
    Unknown = 0,
    Regular = 1,
    CharDevice = 4,
}

/// Resultado de fstat (escopo mínimo: só streams padrão são conhecidos)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub file_type: FileType,
    /// `st_mode` no formato da newlib
    pub mode: u32,
}

impl FileStat {
    /// `S_IFCHR` da newlib
    pub const S_IFCHR: u32 = 0o020000;

    pub const fn char_device() -> Self {
        Self {
            file_type: FileType::CharDevice,
            mode: Self::S_IFCHR,
        }
    }
}

// =============================================================================
// DEVICE TRAIT
// =============================================================================

/// Trait para dispositivos.
///
/// Handles locais retornados por `open` devem ser não-negativos e caber em
/// `HANDLE_BITS` bits; o dispatcher recusa os que não cabem.
pub trait Device: Send {
    /// Operações implementadas. Deve ser constante durante o registro.
    fn capabilities(&self) -> Capabilities;

    /// Abre `path` (caminho já sem o prefixo do dispositivo)
    fn open(&mut self, _path: &str, _flags: OpenFlags, _mode: u32) -> DevResult<u32> {
        Err(DeviceError::from(Errno::ENOSYS))
    }

    /// Fecha um handle local
    fn close(&mut self, _handle: u32) -> DevResult<()> {
        Err(DeviceError::from(Errno::ENOSYS))
    }

    /// Lê do dispositivo
    fn read(&mut self, _handle: u32, _buf: &mut [u8]) -> DevResult<usize> {
        Err(DeviceError::from(Errno::ENOSYS))
    }

    /// Escreve no dispositivo
    fn write(&mut self, _handle: u32, _buf: &[u8]) -> DevResult<usize> {
        Err(DeviceError::from(Errno::ENOSYS))
    }

    /// Reposiciona o offset; retorna o novo offset absoluto
    fn seek(&mut self, _handle: u32, _offset: i64, _whence: SeekWhence) -> DevResult<u64> {
        Err(DeviceError::from(Errno::ENOSYS))
    }

    /// Abre um diretório
    fn opendir(&mut self, _path: &str) -> DevResult<DirCursor> {
        Err(DeviceError::from(Errno::ENOSYS))
    }

    /// Próxima entrada, ou None no fim da sequência
    fn readdir(&mut self, _cursor: DirCursor) -> Option<DirEntry<'_>> {
        None
    }

    /// Libera o cursor
    fn closedir(&mut self, _cursor: DirCursor) -> DevResult<()> {
        Err(DeviceError::from(Errno::ENOSYS))
    }
}
