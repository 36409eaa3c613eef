//! Códigos de Erro do Devman
//!
//! Duas famílias:
//! - [`DmError`]: erros do registro (códigos fixos `DM_ERR_*`).
//! - [`DispatchError`]: erros de open/close/read/write/seek/diretórios.
//!
//! Toda falha vira um único inteiro negativo em `as_code`, de modo que
//! valores não-negativos continuam exclusivos de descritores/contagens.

use super::device::Capabilities;
use crate::sys::Errno;

// =============================================================================
// REGISTRO
// =============================================================================

/// Erros do registro de dispositivos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DmError {
    /// Já existe dispositivo com o mesmo nome (sem diferenciar caixa)
    AlreadyRegistered = -1,
    /// Nenhum dispositivo com esse nome
    NotRegistered = -2,
    /// Todos os slots ocupados
    NoSpace = -3,
    /// Nome vazio, longo demais ou com '/'
    InvalidName = -4,
    /// Nenhum dispositivo atende
    NoDevice = -5,
}

impl DmError {
    /// `DM_OK`
    pub const OK: i32 = 0;

    #[inline]
    pub const fn as_code(self) -> i32 {
        self as i32
    }

    /// Converte resultado em código C (`DM_OK` ou `DM_ERR_*`)
    pub fn result_code<T>(result: &DmResult<T>) -> i32 {
        match result {
            Ok(_) => Self::OK,
            Err(e) => e.as_code(),
        }
    }
}

pub type DmResult<T> = Result<T, DmError>;

// =============================================================================
// RESOLUÇÃO DE CAMINHOS
// =============================================================================

/// Por que um caminho não resolveu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// Caminho vazio
    Empty,
    /// Não começa com '/'
    NotAbsolute,
    /// Segmento do dispositivo vazio (`//x`)
    EmptyDeviceName,
    /// Segmento do dispositivo maior que `MAX_DEV_NAME`
    NameTooLong,
    /// Nenhum dispositivo registrado com esse nome
    NoDevice,
    /// Nada depois do nome do dispositivo
    EmptyRemainder,
}

impl PathError {
    pub const fn errno(self) -> Errno {
        match self {
            Self::Empty | Self::EmptyRemainder => Errno::ENOENT,
            Self::NotAbsolute | Self::EmptyDeviceName => Errno::EINVAL,
            Self::NameTooLong => Errno::ENAMETOOLONG,
            Self::NoDevice => Errno::ENODEV,
        }
    }
}

// =============================================================================
// ERRO DO DISPOSITIVO
// =============================================================================

/// Código de erro reportado pelo próprio dispositivo.
///
/// Opaco para o núcleo e repassado sem renumeração. Por convenção é negativo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct DeviceError(pub i32);

impl DeviceError {
    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }
}

impl From<Errno> for DeviceError {
    fn from(errno: Errno) -> Self {
        Self(errno.as_code())
    }
}

pub type DevResult<T> = Result<T, DeviceError>;

// =============================================================================
// DISPATCH
// =============================================================================

/// Operação solicitada ao dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    Close,
    Read,
    Write,
    Seek,
    Directory,
    Stat,
}

impl Operation {
    /// Capacidades exigidas do dispositivo
    pub const fn required(self) -> Capabilities {
        match self {
            Self::Open => Capabilities::OPEN,
            Self::Close => Capabilities::CLOSE,
            Self::Read => Capabilities::READ,
            Self::Write => Capabilities::WRITE,
            Self::Seek => Capabilities::SEEK,
            Self::Directory => Capabilities::DIR,
            // fstat não é capacidade de dispositivo
            Self::Stat => Capabilities::empty(),
        }
    }
}

/// Erros do dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// Caminho não resolveu para nenhum dispositivo
    Resolution(PathError),
    /// Descritor negativo ou fora do formato
    BadDescriptor,
    /// Descritor aponta para slot livre ou desregistrado
    StaleDescriptor,
    /// Dispositivo não implementa a operação
    NotSupported(Operation),
    /// Handle local não cabe no campo do descritor ou na tabela de abertos
    HandleOverflow,
    /// Falha reportada pelo dispositivo
    Device(DeviceError),
}

impl DispatchError {
    /// Código negativo para a camada C.
    ///
    /// Erros de dispositivo passam intactos; os do núcleo viram `-errno`.
    /// Capacidade ausente é SEMPRE `-ENOSYS`, em todas as operações.
    pub const fn as_code(self) -> i32 {
        match self {
            Self::Resolution(e) => e.errno().as_code(),
            Self::BadDescriptor | Self::StaleDescriptor => Errno::EBADF.as_code(),
            Self::NotSupported(_) => Errno::ENOSYS.as_code(),
            Self::HandleOverflow => Errno::EMFILE.as_code(),
            // Código não-negativo seria confundido com sucesso, e i32::MIN
            // não tem errno positivo correspondente
            Self::Device(e) if e.code() >= 0 || e.code() == i32::MIN => Errno::EIO.as_code(),
            Self::Device(e) => e.code(),
        }
    }

    /// Valor para `errno` (positivo)
    pub const fn errno_value(self) -> i32 {
        // `as_code` nunca retorna i32::MIN
        -self.as_code()
    }
}

impl From<PathError> for DispatchError {
    fn from(e: PathError) -> Self {
        Self::Resolution(e)
    }
}

impl From<DeviceError> for DispatchError {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

pub type IoResult<T> = Result<T, DispatchError>;
