//! Codec de descritores
//!
//! ```text
//!  15  14         11  10                  0
//! +---+-------------+---------------------+
//! | 0 | dispositivo |    handle local     |
//! +---+-------------+---------------------+
//! ```
//!
//! O bit 15 é sempre zero: valores negativos ficam reservados para erros.

use crate::config::{HANDLE_BITS, MAX_DEVICES_BITS};

/// Máscara do handle local (11 bits)
pub const HANDLE_MASK: u32 = (1 << HANDLE_BITS) - 1;
/// Máscara do índice, já deslocada para a posição 0 (4 bits)
pub const INDEX_MASK: u32 = (1 << MAX_DEVICES_BITS) - 1;
/// Maior valor codificável
pub const MAX_RAW: i32 = ((INDEX_MASK << HANDLE_BITS) | HANDLE_MASK) as i32;

/// Falhas de codificação
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Índice não cabe no campo de 4 bits
    IndexOutOfRange,
    /// Handle não cabe no campo de 11 bits
    HandleOutOfRange,
    /// Inteiro negativo ou acima de `MAX_RAW`
    OutOfRange,
}

/// Descritor visível para o chamador: (índice do dispositivo, handle local)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Descriptor(u16);

impl Descriptor {
    /// Empacota índice e handle, validando as larguras dos campos
    pub const fn encode(index: usize, handle: u32) -> Result<Self, CodecError> {
        if index > INDEX_MASK as usize {
            return Err(CodecError::IndexOutOfRange);
        }
        if handle > HANDLE_MASK {
            return Err(CodecError::HandleOutOfRange);
        }
        Ok(Self((((index as u32) << HANDLE_BITS) | handle) as u16))
    }

    /// Desempacota em (índice, handle local)
    #[inline]
    pub const fn decode(self) -> (usize, u32) {
        (self.index(), self.handle())
    }

    #[inline]
    pub const fn index(self) -> usize {
        ((self.0 as u32 >> HANDLE_BITS) & INDEX_MASK) as usize
    }

    #[inline]
    pub const fn handle(self) -> u32 {
        self.0 as u32 & HANDLE_MASK
    }

    /// Aceita um inteiro vindo da camada C
    pub const fn from_raw(raw: i32) -> Result<Self, CodecError> {
        if raw < 0 || raw > MAX_RAW {
            return Err(CodecError::OutOfRange);
        }
        Ok(Self(raw as u16))
    }

    /// Valor para a camada C (sempre não-negativo)
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self.0 as i32
    }
}

impl From<Descriptor> for i32 {
    fn from(desc: Descriptor) -> Self {
        desc.as_raw()
    }
}
