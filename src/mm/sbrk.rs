//! sbrk sobre regiões de RAM livre
//!
//! A plataforma informa uma lista ordenada de regiões livres. O break sobe
//! dentro da região atual; quando um pedido não cabe, passa para a próxima
//! região e nunca volta. O resto da região abandonada é perdido.

use crate::sys::Errno;

/// Região de RAM livre `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemRegion {
    pub start: usize,
    pub end: usize,
}

impl MemRegion {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn size(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Estado do break
pub struct Sbrk {
    regions: &'static [MemRegion],
    /// Região atual
    index: usize,
    /// Break dentro da região atual (None = ainda não iniciada)
    brk: Option<usize>,
}

impl Sbrk {
    /// Sem regiões: todo pedido falha
    pub const fn empty() -> Self {
        Self::new(&[])
    }

    pub const fn new(regions: &'static [MemRegion]) -> Self {
        Self {
            regions,
            index: 0,
            brk: None,
        }
    }

    /// Avança o break em `incr` bytes; retorna o break anterior.
    ///
    /// Incremento negativo sempre falha (memória nunca é devolvida).
    pub fn sbrk(&mut self, incr: isize) -> Result<usize, Errno> {
        let Ok(incr) = usize::try_from(incr) else {
            return Err(Errno::ENOMEM);
        };

        while let Some(region) = self.regions.get(self.index) {
            let brk = *self.brk.get_or_insert(region.start);

            match brk.checked_add(incr) {
                Some(new_brk) if new_brk <= region.end => {
                    self.brk = Some(new_brk);
                    return Ok(brk);
                }
                _ => {
                    crate::kdebug!("(MM) sbrk: região esgotada, próxima=", self.index + 1);
                    self.index += 1;
                    self.brk = None;
                }
            }
        }

        crate::kerror!("(MM) sbrk: sem memória. pedido=", incr);
        Err(Errno::ENOMEM)
    }

    /// Break atual, se alguma região já foi usada
    pub fn current(&self) -> Option<usize> {
        self.brk
    }
}
