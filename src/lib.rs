//! Devman - Gerenciador de Dispositivos da camada C.
//!
//! Namespace único endereçado por caminho sobre dispositivos heterogêneos
//! (consoles UART, mídias de armazenamento, pseudo-filesystems). Os stubs da
//! newlib (`_open`, `_read`, `_write`, ...) são roteados para o dispositivo que
//! atende o prefixo do caminho, sem que o chamador saiba qual dispositivo
//! concreto está por trás de um descritor.
//!
//! # Módulos
//!
//! - `devman`  - Registro, resolução de caminhos, codec de descritores e dispatcher
//! - `devices` - Dispositivos embutidos (std, null, romfs)
//! - `console` - Hooks de envio/recepção do console (saída de log e std)
//! - `mm`      - sbrk sobre regiões de RAM e heap de lista encadeada
//! - `newlib`  - Entry points `extern "C"` consumidos pela newlib
//! - `sys`     - Códigos de erro (errno da newlib)

#![cfg_attr(not(test), no_std)]

// Dispositivos são mantidos como Box<dyn Device>
extern crate alloc;

#[macro_use]
pub mod logging;

pub mod config;
pub mod console;
pub mod klib;
pub mod sys;

// --- Núcleo ---
pub mod devman;

// --- Subsistemas de suporte ---
pub mod devices;
pub mod mm;
pub mod newlib;

pub use crate::devman::{
    Capabilities, Descriptor, Device, DeviceManager, DirEntry, DirHandle, DispatchError, DmError,
};
