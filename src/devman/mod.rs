//! # Device Manager
//!
//! Namespace único endereçado por caminho sobre dispositivos heterogêneos.
//!
//! ## Fluxo
//!
//! ```text
//! open("/uart/0") → path::resolve → registro (índice) → Device::open("0")
//!                 → Descriptor::encode(índice, handle local) → chamador
//!
//! read(desc)      → Descriptor::decode → registro[índice] (sem nova busca)
//!                 → Device::read(handle local)
//! ```
//!
//! ## Ciclo de vida
//!
//! O [`DeviceManager`] é um objeto de contexto explícito: `new` é `const` para
//! caber num `static`, `init` registra o dispositivo `std` e é idempotente,
//! `shutdown` remove tudo e volta ao estado inicial.
//!
//! ## Concorrência
//!
//! Nenhum lock interno. Quem compartilha o gerenciador entre contextos deve
//! serializar o acesso (a camada C usa um `spin::Mutex`).

pub mod desc;
pub mod device;
pub mod dir;
pub mod dispatch;
pub mod error;
pub mod path;
pub mod registry;


#[cfg(test)]
mod tests;

use alloc::boxed::Box;

pub use desc::{CodecError, Descriptor};
pub use device::{
    Capabilities, Device, DirCursor, DirEntry, FileStat, FileType, OpenFlags, SeekWhence,
};
pub use dir::DirHandle;
pub use error::{
    DevResult, DeviceError, DispatchError, DmError, DmResult, IoResult, Operation, PathError,
};
pub use registry::{DeviceRecord, DeviceRegistry};

use crate::config::{STDERR_NUM, STDIN_NUM, STD_DEV_NAME};
use crate::devices::stdio::StdDevice;

/// Gerenciador de dispositivos: registro + dispatcher
pub struct DeviceManager {
    registry: DeviceRegistry,
    initialized: bool,
}

impl DeviceManager {
    pub const fn new() -> Self {
        Self {
            registry: DeviceRegistry::new(),
            initialized: false,
        }
    }

    /// Inicializa o gerenciador.
    ///
    /// Registra o dispositivo de streams padrão para que os descritores crus
    /// 0/1/2 (índice 0, handles 0/1/2) caiam nele. Chamadas repetidas não
    /// fazem nada.
    pub fn init(&mut self) -> DmResult<()> {
        if self.initialized {
            return Ok(());
        }

        crate::kinfo!("(DM) Inicializando gerenciador de dispositivos...");

        let index = self.registry.register(STD_DEV_NAME, Box::new(StdDevice::new()))?;
        if index != 0 {
            crate::kwarn!("(DM) std fora do slot 0; stdin/stdout/stderr não roteiam. slot=", index);
        }
        // Os streams padrão já nascem abertos
        for handle in STDIN_NUM..=STDERR_NUM {
            self.registry.acquire(index, handle as u32);
        }

        self.initialized = true;
        crate::kinfo!("(DM) Dispositivos registrados=", self.registry.count());
        Ok(())
    }

    /// Remove todos os dispositivos e volta ao estado não-inicializado
    pub fn shutdown(&mut self) {
        crate::kinfo!("(DM) Desligando. Dispositivos removidos=", self.registry.count());
        self.registry.clear();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Registra um dispositivo; retorna o índice atribuído
    pub fn register(&mut self, name: &str, device: Box<dyn Device>) -> DmResult<usize> {
        self.registry.register(name, device)
    }

    pub fn unregister(&mut self, name: &str) -> DmResult<()> {
        self.registry.unregister(name)
    }

    pub fn get_at(&self, index: usize) -> Option<&DeviceRecord> {
        self.registry.get_at(index)
    }

    pub fn count(&self) -> usize {
        self.registry.count()
    }

    /// Acesso somente leitura ao registro
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new()
    }
}
