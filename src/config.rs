//! Configuração de compilação do Devman.
//!
//! Constantes globais. Os tamanhos de campo do descritor são derivados daqui
//! e não devem ser editados isoladamente.

// =============================================================================
// REGISTRO
// =============================================================================

/// Número máximo de dispositivos no sistema
pub const MAX_DEVICES: usize = 16;

/// Bits necessários para indexar `MAX_DEVICES`
pub const MAX_DEVICES_BITS: u32 = 4;

/// Tamanho máximo do nome de um dispositivo
pub const MAX_DEV_NAME: usize = 12;

/// Tamanho máximo de nome de arquivo (em TODOS os filesystems suportados)
pub const MAX_FNAME_LENGTH: usize = 30;

// =============================================================================
// DESCRITORES
// =============================================================================
//
// A newlib trata o descritor (int) como short: tudo cabe em 16 bits.
// Na prática 15, porque descritores negativos indicam erro.
//
//   bit 15      bits 14..11      bits 10..0
//   [ sinal=0 ][ índice devid ][ handle local ]
//

/// Bits úteis do descritor (sem o bit de sinal)
pub const DESC_BITS: u32 = 15;

/// Bits do handle local do dispositivo
pub const HANDLE_BITS: u32 = DESC_BITS - MAX_DEVICES_BITS;

/// Handles locais distintos abertos ao mesmo tempo em um dispositivo
pub const MAX_OPEN_HANDLES: usize = 32;

/// Número do stdin
pub const STDIN_NUM: i32 = 0;
/// Número do stdout
pub const STDOUT_NUM: i32 = 1;
/// Número do stderr
pub const STDERR_NUM: i32 = 2;

/// Nome do dispositivo de streams padrão (registrado no índice 0 pelo init)
pub const STD_DEV_NAME: &str = "std";

/// Nome do dispositivo raiz (atalho `/arquivo.ext`)
pub const ROOT_DEV_NAME: &str = "/";

// =============================================================================
// DIRETÓRIOS / HEAP
// =============================================================================

/// Diretórios abertos simultaneamente via `dm_opendir` (camada C)
pub const MAX_OPEN_DIRS: usize = 4;

/// Granularidade de crescimento do heap via sbrk
pub const HEAP_GROW_STEP: usize = 4096;

// Garantias de compilação
const _: () = assert!(1 << MAX_DEVICES_BITS == MAX_DEVICES);
const _: () = assert!(HANDLE_BITS == 11);
const _: () = assert!(MAX_OPEN_HANDLES <= 1 << HANDLE_BITS);
