#![allow(unsafe_code)]

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::{self, NonNull};

const SLAB_ALIGN: usize = std::mem::align_of::<Slab>();
const SLAB_HEADER: usize = std::mem::size_of::<Slab>();
const INITIAL_SLAB_SIZE: usize = 1024;

const _: () = assert!(SLAB_HEADER == 16);
const _: () = assert!(SLAB_ALIGN == 8);

/// Source of the memory slabs an [`Arena`] carves allocations from.
///
/// The arena only ever asks for whole slabs, so an implementation sees a
/// handful of large requests per document rather than one per string. This
/// lets a host application route parser memory through a pool, a tracking
/// allocator or a fixed region.
pub trait Allocator {
    /// Allocates a block satisfying `layout`, or returns `None` when out of
    /// memory.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Releases a block previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this allocator with the same
    /// `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process-wide global allocator.
#[derive(Copy, Clone, Debug, Default)]
pub struct Heap;

impl Allocator for Heap {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return NonNull::new(layout.align() as *mut u8);
        }
        // Safety: layout has a non-zero size.
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

/// Header at the start of every slab, linking back to the slab filled
/// before it. The byte region follows the header.
#[repr(C)]
struct Slab {
    prev: Option<NonNull<Slab>>,
    size: usize,
}

// Safety: the only shared `Slab` is the read-only `NO_SLAB`. Real slabs are
// reached through an `Arena`, which is not `Sync`.
unsafe impl Sync for Slab {}

/// Stands in for "no slab yet" so a fresh arena needs no allocation.
static NO_SLAB: Slab = Slab {
    prev: None,
    size: 0,
};

/// Owns the key names and decoded strings of parsed documents.
///
/// A [`Table`](crate::Table) returned by [`parse`](crate::parse) borrows its
/// text from the arena, so the arena has to outlive it. Memory is handed out
/// by bumping a pointer through slabs obtained from an [`Allocator`], and all
/// of it is released together when the arena is dropped. Several documents
/// may share one arena.
pub struct Arena {
    ptr: Cell<NonNull<u8>>,
    end: Cell<NonNull<u8>>,
    slab: Cell<NonNull<Slab>>,
    backing: Box<dyn Allocator>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Creates an arena whose slabs come from the global allocator.
    pub fn new() -> Self {
        Self::with_allocator(Heap)
    }

    /// Creates an arena whose slabs come from `backing`.
    pub fn with_allocator(backing: impl Allocator + 'static) -> Self {
        // Safety: NO_SLAB is a static, its address is never null.
        let none = unsafe { NonNull::new_unchecked(&NO_SLAB as *const Slab as *mut Slab) };
        Arena {
            ptr: Cell::new(NonNull::dangling()),
            end: Cell::new(NonNull::dangling()),
            slab: Cell::new(none),
            backing: Box::new(backing),
        }
    }

    /// Hands out `layout.size()` bytes at `layout.align()`, taking a new slab
    /// when the current one is full. Aborts if the backing allocator fails.
    #[inline]
    pub(crate) fn alloc(&self, layout: Layout) -> NonNull<u8> {
        if layout.size() == 0 {
            // Safety: alignments are non-zero.
            return unsafe { NonNull::new_unchecked(layout.align() as *mut u8) };
        }
        match self.bump(layout) {
            Some(ptr) => ptr,
            None => self.alloc_in_new_slab(layout),
        }
    }

    /// Carves `layout` out of the current slab if it fits.
    #[inline]
    fn bump(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = self.ptr.get().as_ptr() as usize;
        let start = (ptr + layout.align() - 1) & !(layout.align() - 1);
        let next = start + layout.size();
        if next > self.end.get().as_ptr() as usize {
            return None;
        }
        // Safety: start..next lies inside the current slab.
        unsafe {
            self.ptr.set(NonNull::new_unchecked(next as *mut u8));
            Some(NonNull::new_unchecked(start as *mut u8))
        }
    }

    #[cold]
    #[inline(never)]
    fn alloc_in_new_slab(&self, layout: Layout) -> NonNull<u8> {
        self.grow(layout);
        match self.bump(layout) {
            Some(ptr) => ptr,
            // grow() sized the slab for this layout.
            None => std::alloc::handle_alloc_error(layout),
        }
    }

    /// Copies `s` into the arena. Key names and escape-free string values
    /// are stored this way.
    pub fn alloc_str<'a>(&'a self, s: &str) -> &'a str {
        if s.is_empty() {
            return "";
        }
        let layout = Layout::from_size_align(s.len(), 1).expect("string layout overflow");
        let dst = self.alloc(layout);
        // Safety: dst is s.len() freshly handed out bytes and the source is
        // valid UTF-8.
        unsafe {
            ptr::copy_nonoverlapping(s.as_ptr(), dst.as_ptr(), s.len());
            std::str::from_utf8_unchecked(std::slice::from_raw_parts(dst.as_ptr(), s.len()))
        }
    }

    /// Starts a [`Scratch`] at the free end of the current slab.
    ///
    /// # Safety
    ///
    /// Until the scratch is committed or dropped, nothing else may allocate
    /// from this arena: the scratch writes past the bump pointer.
    pub(crate) unsafe fn scratch(&self) -> Scratch<'_> {
        let start = self.ptr.get();
        Scratch {
            arena: self,
            start,
            len: 0,
            cap: self.end.get().as_ptr() as usize - start.as_ptr() as usize,
        }
    }

    /// Links in a slab large enough for `layout`, at least twice the size of
    /// the current one.
    fn grow(&self, layout: Layout) {
        // Safety: `slab` is NO_SLAB or a live slab written by a previous grow().
        let previous = unsafe { self.slab.get().as_ref().size };
        let needed = SLAB_HEADER
            .checked_add(layout.align() - 1)
            .and_then(|n| n.checked_add(layout.size()))
            .expect("layout overflow");
        let size = previous.saturating_mul(2).max(needed).max(INITIAL_SLAB_SIZE);

        let slab_layout = Layout::from_size_align(size, SLAB_ALIGN).expect("slab layout overflow");
        let Some(base) = self.backing.allocate(slab_layout) else {
            std::alloc::handle_alloc_error(slab_layout);
        };

        // Safety: base is `size` fresh bytes aligned for a Slab header.
        unsafe {
            let slab = base.as_ptr().cast::<Slab>();
            slab.write(Slab {
                prev: Some(self.slab.get()),
                size,
            });
            self.slab.set(NonNull::new_unchecked(slab));
            self.ptr.set(NonNull::new_unchecked(base.as_ptr().add(SLAB_HEADER)));
            self.end.set(NonNull::new_unchecked(base.as_ptr().add(size)));
        }
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let mut next = Some(self.slab.get());
        while let Some(slab) = next {
            // Safety: every slab in the chain, NO_SLAB included, is readable
            // until it is freed below.
            let Slab { prev, size } = unsafe { slab.as_ptr().read() };
            if size == 0 {
                break;
            }
            // Safety: grow() allocated this slab with exactly this layout.
            unsafe {
                let layout = Layout::from_size_align_unchecked(size, SLAB_ALIGN);
                self.backing.deallocate(slab.cast(), layout);
            }
            next = prev;
        }
    }
}

/// Write buffer for text that has to be rewritten before it is stored, such
/// as strings with escape sequences or floats with `_` separators.
///
/// Bytes go straight into the arena's free space. [`commit`](Scratch::commit)
/// keeps them; dropping the scratch leaves the arena as it was, so a failed
/// decode costs nothing.
pub(crate) struct Scratch<'a> {
    arena: &'a Arena,
    start: NonNull<u8>,
    len: usize,
    cap: usize,
}

impl<'a> Scratch<'a> {
    #[inline]
    fn reserve(&mut self, additional: usize) {
        if additional > self.cap - self.len {
            self.move_to_new_slab(additional);
        }
    }

    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.reserve(1);
        // Safety: reserve() left room for one more byte.
        unsafe { self.start.as_ptr().add(self.len).write(byte) }
        self.len += 1;
    }

    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        // Safety: reserve() left room for `bytes`.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), self.start.as_ptr().add(self.len), bytes.len());
        }
        self.len += bytes.len();
    }

    /// Appends the UTF-8 encoding of a decoded escape or source character.
    #[inline]
    pub fn push_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.extend(ch.encode_utf8(&mut buf).as_bytes());
    }

    /// Appends numeral text without its `_` separators. Returns `false` when
    /// a separator is not surrounded by ASCII digits.
    pub(crate) fn push_strip_underscores(&mut self, bytes: &[u8]) -> bool {
        let mut prev = 0u8;
        for &b in bytes {
            match b {
                b'_' if !prev.is_ascii_digit() => return false,
                b'_' => {}
                _ if prev == b'_' && !b.is_ascii_digit() => return false,
                _ => self.push(b),
            }
            prev = b;
        }
        prev != b'_'
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        if self.len == 0 {
            return &[];
        }
        // Safety: the first `len` bytes from `start` have been written.
        unsafe { std::slice::from_raw_parts(self.start.as_ptr(), self.len) }
    }

    /// Keeps the written bytes, moving the arena's bump pointer past them.
    pub fn commit(self) -> &'a [u8] {
        if self.len == 0 {
            return &[];
        }
        // Safety: `start..start + len` is written and inside the arena's
        // current slab, which lives as long as the arena.
        unsafe {
            let end = self.start.as_ptr().add(self.len);
            self.arena.ptr.set(NonNull::new_unchecked(end));
            std::slice::from_raw_parts(self.start.as_ptr(), self.len)
        }
    }

    #[cold]
    #[inline(never)]
    fn move_to_new_slab(&mut self, additional: usize) {
        let needed = self.len.checked_add(additional).expect("scratch overflow");
        let cap = self.cap.saturating_mul(2).max(needed);
        self.arena
            .grow(Layout::from_size_align(cap, 1).expect("scratch layout overflow"));

        let start = self.arena.ptr.get();
        if self.len > 0 {
            // Safety: the old slab is still alive and the new one has room
            // for at least `needed > len` bytes.
            unsafe { ptr::copy_nonoverlapping(self.start.as_ptr(), start.as_ptr(), self.len) }
        }
        self.start = start;
        self.cap = self.arena.end.get().as_ptr() as usize - start.as_ptr() as usize;
    }
}

#[cfg(test)]
#[path = "./arena_tests.rs"]
mod tests;
