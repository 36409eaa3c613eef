//! Heap do firmware.
//!
//! `GlobalAlloc` sobre um `linked_list_allocator::Heap` que cresce sob demanda
//! a partir do sbrk, em blocos de `HEAP_GROW_STEP`. Permite usar `Box` (e
//! portanto registrar dispositivos) no alvo.
//!
//! O heap só cresce com blocos contíguos ao topo atual. Quando o sbrk troca de
//! região, o crescimento para e as alocações seguintes falham.
//!
//! ```ignore
//! #[global_allocator]
//! static HEAP: SbrkHeap = SbrkHeap::new(&devman::mm::SBRK);
//! ```

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::{self, NonNull};

use linked_list_allocator::Heap;
use spin::Mutex;

use super::sbrk::Sbrk;
use crate::config::HEAP_GROW_STEP;
use crate::klib::align_up;

pub struct SbrkHeap {
    heap: Mutex<Heap>,
    sbrk: &'static Mutex<Sbrk>,
}

impl SbrkHeap {
    pub const fn new(sbrk: &'static Mutex<Sbrk>) -> Self {
        Self {
            heap: Mutex::new(Heap::empty()),
            sbrk,
        }
    }

    /// Bytes sob gerência do heap
    pub fn size(&self) -> usize {
        self.heap.lock().size()
    }

    /// Pede ao sbrk pelo menos `min` bytes e entrega ao heap
    fn grow(&self, heap: &mut Heap, min: usize) -> bool {
        let size = align_up(min.max(HEAP_GROW_STEP), HEAP_GROW_STEP);
        let Ok(incr) = isize::try_from(size) else {
            return false;
        };
        let Ok(chunk) = self.sbrk.lock().sbrk(incr) else {
            return false;
        };

        if heap.size() == 0 {
            // SAFETY: o bloco veio do sbrk e não pertence a mais ninguém
            unsafe { heap.init(chunk as *mut u8, size) };
            crate::kdebug!("(MM) heap iniciado em=", chunk);
            return true;
        }

        if chunk != heap.top() as usize {
            crate::kwarn!("(MM) heap: bloco não contíguo do sbrk=", chunk);
            return false;
        }

        // SAFETY: bloco contíguo ao topo, recém-obtido do sbrk
        unsafe { heap.extend(size) };
        true
    }
}

unsafe impl GlobalAlloc for SbrkHeap {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let mut heap = self.heap.lock();

        if let Ok(block) = heap.allocate_first_fit(layout) {
            return block.as_ptr();
        }

        // Folga para alinhamento e metadados do bloco livre
        let wanted = layout.size().saturating_add(layout.align());
        if !self.grow(&mut heap, wanted) {
            return ptr::null_mut();
        }

        heap.allocate_first_fit(layout)
            .map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if let Some(block) = NonNull::new(ptr) {
            self.heap.lock().deallocate(block, layout);
        }
    }
}
