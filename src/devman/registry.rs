//! Device Registry - Registro global de dispositivos
//!
//! Tabela de capacidade fixa (`MAX_DEVICES`). O índice do slot é a identidade
//! do dispositivo enquanto durar o registro, e é ele que vai nos bits altos
//! do descritor.
//!
//! # Reuso de índices
//!
//! Cada slot guarda os handles locais que `open` devolveu (com o número de
//! aberturas de cada um) e quantos diretórios estão abertos. `close` só
//! libera um handle que está na tabela, então fechar duas vezes não esvazia
//! o slot antes da hora. Ao desregistrar:
//! - sem referências vivas, o slot fica `Free` e pode ser reaproveitado;
//! - com referências vivas, o slot fica `Retired` até a última ser liberada.
//!
//! Assim um descritor antigo nunca é roteado para um dispositivo novo que
//! ocupou o mesmo índice.
//!
//! Busca por índice é O(1); busca por nome é varredura linear (16 slots).

use alloc::boxed::Box;

use super::device::{Capabilities, Device};
use super::error::{DmError, DmResult};
use crate::config::{MAX_DEVICES, MAX_DEV_NAME, MAX_OPEN_HANDLES, ROOT_DEV_NAME};

// =============================================================================
// NOME
// =============================================================================

/// Nome de dispositivo: 1..=`MAX_DEV_NAME` bytes, comparado sem diferenciar caixa.
#[derive(Clone, Copy)]
pub struct DeviceName {
    bytes: [u8; MAX_DEV_NAME],
    len: usize,
}

impl DeviceName {
    /// Valida e copia o nome.
    ///
    /// Aceita `/` (dispositivo raiz) ou um segmento sem `/`.
    pub fn new(name: &str) -> DmResult<Self> {
        let raw = name.as_bytes();
        if raw.is_empty() || raw.len() > MAX_DEV_NAME {
            return Err(DmError::InvalidName);
        }
        // Um '/' interno nunca casaria com um segmento de caminho
        if name != ROOT_DEV_NAME && raw.contains(&b'/') {
            return Err(DmError::InvalidName);
        }

        let mut bytes = [0u8; MAX_DEV_NAME];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self {
            bytes,
            len: raw.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        // Copiado de um &str válido em `new`
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }

    /// Comparação sem diferenciar caixa (ASCII)
    pub fn matches(&self, other: &str) -> bool {
        self.bytes[..self.len].eq_ignore_ascii_case(other.as_bytes())
    }
}

impl core::fmt::Debug for DeviceName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("DeviceName").field(&self.as_str()).finish()
    }
}

// =============================================================================
// REFERÊNCIAS VIVAS
// =============================================================================

/// Handle local aberto; `opens == 0` marca entrada livre
#[derive(Debug, Clone, Copy)]
struct OpenHandle {
    handle: u16,
    opens: u16,
}

/// Referências vivas de um slot: handles de arquivo e diretórios abertos
#[derive(Debug, Clone, Copy)]
struct LiveRefs {
    handles: [OpenHandle; MAX_OPEN_HANDLES],
    dirs: usize,
}

impl LiveRefs {
    const fn new() -> Self {
        Self {
            handles: [OpenHandle { handle: 0, opens: 0 }; MAX_OPEN_HANDLES],
            dirs: 0,
        }
    }

    fn find(&self, handle: u32) -> Option<usize> {
        let handle = u16::try_from(handle).ok()?;
        self.handles
            .iter()
            .position(|h| h.opens > 0 && h.handle == handle)
    }

    fn contains(&self, handle: u32) -> bool {
        self.find(handle).is_some()
    }

    /// Registra uma abertura. Falha com a tabela cheia.
    fn insert(&mut self, handle: u32) -> bool {
        if let Some(i) = self.find(handle) {
            let entry = &mut self.handles[i];
            return match entry.opens.checked_add(1) {
                Some(opens) => {
                    entry.opens = opens;
                    true
                }
                None => false,
            };
        }

        let Ok(handle) = u16::try_from(handle) else {
            return false;
        };
        match self.handles.iter_mut().find(|h| h.opens == 0) {
            Some(entry) => {
                *entry = OpenHandle { handle, opens: 1 };
                true
            }
            None => false,
        }
    }

    /// Desfaz uma abertura; false se o handle não estava aberto
    fn remove(&mut self, handle: u32) -> bool {
        match self.find(handle) {
            Some(i) => {
                self.handles[i].opens -= 1;
                true
            }
            None => false,
        }
    }

    fn remove_dir(&mut self) -> bool {
        match self.dirs.checked_sub(1) {
            Some(dirs) => {
                self.dirs = dirs;
                true
            }
            None => false,
        }
    }

    fn count(&self) -> usize {
        let files: usize = self.handles.iter().map(|h| usize::from(h.opens)).sum();
        files + self.dirs
    }

    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

// =============================================================================
// REGISTRO DE DISPOSITIVO
// =============================================================================

/// Entrada no registro de dispositivos
pub struct DeviceRecord {
    name: DeviceName,
    caps: Capabilities,
    device: Box<dyn Device>,
    /// Handles e diretórios ainda abertos
    live: LiveRefs,
}

impl DeviceRecord {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Capacidades (capturadas no registro)
    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn has(&self, caps: Capabilities) -> bool {
        self.caps.contains(caps)
    }

    /// `dm_dev_capability_dir`: só o conjunto completo conta
    pub fn has_dir_support(&self) -> bool {
        self.caps.has_dir()
    }

    /// Referências vivas (descritores + diretórios abertos)
    pub fn live(&self) -> usize {
        self.live.count()
    }

    /// Verifica se `handle` foi devolvido por um `open` ainda não fechado
    pub fn is_open(&self, handle: u32) -> bool {
        self.live.contains(handle)
    }

    pub(crate) fn device_mut(&mut self) -> &mut dyn Device {
        self.device.as_mut()
    }
}

impl core::fmt::Debug for DeviceRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeviceRecord")
            .field("name", &self.name.as_str())
            .field("caps", &self.caps)
            .field("live", &self.live.count())
            .finish()
    }
}

/// Estado de um slot
enum Slot {
    Free,
    Occupied(DeviceRecord),
    /// Desregistrado com referências ainda vivas
    Retired { live: LiveRefs },
}

/// Resultado de liberar uma referência
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Release {
    /// Dispositivo ainda registrado
    Live,
    /// Slot desregistrado; referência liberada mesmo assim
    Stale,
    /// Nada para liberar: slot livre ou handle que não estava aberto
    Vacant,
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Registro de dispositivos
pub struct DeviceRegistry {
    slots: [Slot; MAX_DEVICES],
    /// Slots em `Occupied`
    count: usize,
}

impl DeviceRegistry {
    /// Cria um novo registro
    pub const fn new() -> Self {
        const FREE: Slot = Slot::Free;
        Self {
            slots: [FREE; MAX_DEVICES],
            count: 0,
        }
    }

    /// Registra um dispositivo no primeiro slot livre.
    ///
    /// Retorna o índice atribuído.
    pub fn register(&mut self, name: &str, device: Box<dyn Device>) -> DmResult<usize> {
        let name = DeviceName::new(name)?;

        if self.find(name.as_str()).is_some() {
            return Err(DmError::AlreadyRegistered);
        }

        let index = self
            .slots
            .iter()
            .position(|slot| matches!(slot, Slot::Free))
            .ok_or(DmError::NoSpace)?;

        let caps = device.capabilities();
        self.slots[index] = Slot::Occupied(DeviceRecord {
            name,
            caps,
            device,
            live: LiveRefs::new(),
        });
        self.count += 1;

        crate::kdebug!("(DM) Dispositivo registrado no slot=", index);
        Ok(index)
    }

    /// Remove um dispositivo pelo nome (sem diferenciar caixa)
    pub fn unregister(&mut self, name: &str) -> DmResult<()> {
        let index = self.find(name).ok_or(DmError::NotRegistered)?;

        let live = match &self.slots[index] {
            Slot::Occupied(record) => record.live,
            _ => return Err(DmError::NotRegistered),
        };

        // O Box<dyn Device> é liberado aqui em ambos os casos
        self.slots[index] = if live.is_empty() {
            Slot::Free
        } else {
            crate::kwarn!("(DM) Desregistrado com handles abertos, slot aposentado=", index);
            Slot::Retired { live }
        };
        self.count -= 1;

        crate::kdebug!("(DM) Dispositivo removido do slot=", index);
        Ok(())
    }

    /// Busca um dispositivo por índice.
    ///
    /// Índice fora da faixa, livre ou aposentado retorna None; nunca entra em
    /// pânico, pois índices vêm de bits de descritores não confiáveis.
    pub fn get_at(&self, index: usize) -> Option<&DeviceRecord> {
        match self.slots.get(index)? {
            Slot::Occupied(record) => Some(record),
            _ => None,
        }
    }

    pub fn get_at_mut(&mut self, index: usize) -> Option<&mut DeviceRecord> {
        match self.slots.get_mut(index)? {
            Slot::Occupied(record) => Some(record),
            _ => None,
        }
    }

    /// Número de dispositivos registrados
    pub fn count(&self) -> usize {
        self.count
    }

    /// Busca por nome, em ordem de índice: o primeiro que casar vence
    pub fn find(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| match slot {
            Slot::Occupied(record) => record.name.matches(name),
            _ => false,
        })
    }

    /// Itera sobre (índice, registro) dos slots ocupados
    pub fn iter(&self) -> impl Iterator<Item = (usize, &DeviceRecord)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied(record) => Some((index, record)),
                _ => None,
            })
    }

    /// Verifica se o slot está aposentado (desregistrado com handles vivos)
    pub fn is_retired(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Retired { .. }))
    }

    /// Remove todos os dispositivos
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Free;
        }
        self.count = 0;
    }

    // -------------------------------------------------------------------------
    // Contagem de referências (uso do dispatcher)
    // -------------------------------------------------------------------------

    /// Registra o handle devolvido por `open`. False se o slot não está
    /// ocupado ou a tabela de handles está cheia.
    pub(crate) fn acquire(&mut self, index: usize, handle: u32) -> bool {
        self.get_at_mut(index)
            .is_some_and(|record| record.live.insert(handle))
    }

    pub(crate) fn acquire_dir(&mut self, index: usize) {
        if let Some(record) = self.get_at_mut(index) {
            record.live.dirs += 1;
        }
    }

    /// Libera um handle de arquivo. Handle que não estava aberto não mexe
    /// em nada e retorna `Vacant`.
    pub(crate) fn release(&mut self, index: usize, handle: u32) -> Release {
        self.release_with(index, |live| live.remove(handle))
    }

    pub(crate) fn release_dir(&mut self, index: usize) -> Release {
        self.release_with(index, LiveRefs::remove_dir)
    }

    fn release_with(
        &mut self,
        index: usize,
        remove: impl FnOnce(&mut LiveRefs) -> bool,
    ) -> Release {
        let Some(slot) = self.slots.get_mut(index) else {
            return Release::Vacant;
        };

        let live = match slot {
            Slot::Occupied(record) => &mut record.live,
            Slot::Retired { live } => live,
            Slot::Free => return Release::Vacant,
        };
        if !remove(live) {
            return Release::Vacant;
        }

        match slot {
            Slot::Retired { live } if live.is_empty() => {
                crate::kdebug!("(DM) Slot aposentado liberado=", index);
                *slot = Slot::Free;
                Release::Stale
            }
            Slot::Retired { .. } => Release::Stale,
            _ => Release::Live,
        }
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
