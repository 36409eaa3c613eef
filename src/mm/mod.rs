//! # Memory Management
//!
//! - `sbrk` - break sobre a lista de regiões livres da plataforma
//! - `heap` - `GlobalAlloc` de lista encadeada alimentado pelo sbrk
//!
//! A plataforma chama [`init`] com suas regiões antes da primeira alocação.
//! O `_sbrk` da newlib e o [`heap::SbrkHeap`] compartilham o mesmo [`SBRK`].

pub mod heap;
pub mod sbrk;

use spin::Mutex;

pub use heap::SbrkHeap;
pub use sbrk::{MemRegion, Sbrk};

/// Break global
pub static SBRK: Mutex<Sbrk> = Mutex::new(Sbrk::empty());

/// Configura as regiões de RAM livre. Reinicia o break.
pub fn init(regions: &'static [MemRegion]) {
    *SBRK.lock() = Sbrk::new(regions);

    let total: usize = regions.iter().map(MemRegion::size).sum();
    crate::kinfo!("(MM) Regiões de RAM livre=", regions.len());
    crate::kinfo!("(MM) Total de bytes=", total);
}
