//! System Definitions (ABI).
//!
//! Constantes e tipos que definem a interface entre o Devman e a newlib.

pub mod error;

pub use error::Errno;
