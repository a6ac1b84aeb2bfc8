use std::alloc::{self, Layout};
use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::{self, null_mut, NonNull};

/// Failure to obtain storage for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The element count does not fit into a valid memory layout.
    CapacityOverflow { requested: usize },
    /// The allocator returned no memory for the layout.
    OutOfMemory { layout: Layout },
}

impl AllocError {
    /// Escalates the error the way std collections do: `handle_alloc_error`
    /// for exhausted memory, a panic for overflowing sizes.
    pub fn handle(self) -> ! {
        match self {
            AllocError::OutOfMemory { layout } => alloc::handle_alloc_error(layout),
            AllocError::CapacityOverflow { .. } => panic!("capacity overflow"),
        }
    }
}

impl Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::CapacityOverflow { requested } => write!(f, "Capacity of {} elements overflows the address space", requested),
            AllocError::OutOfMemory { layout } => write!(f, "Failed to allocate {} bytes aligned to {}", layout.size(), layout.align()),
        }
    }
}

impl std::error::Error for AllocError {}

/// Exclusively owns one heap allocation of a fixed number of initialized elements.
///
/// The buffer never resizes. It can be moved, swapped, or released, but never
/// copied: duplicating elements is left to the owner. An empty buffer holds no
/// allocation at all.
pub struct ArrayPtr<T> {
    _ptr: *mut T,
    _len: usize,
    _marker: PhantomData<T>,
}

// SAFETY: the buffer owns its elements like `Box<[T]>` does.
unsafe impl<T: Send> Send for ArrayPtr<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for ArrayPtr<T> {}

/// Allocation whose first `initialized` slots hold live values.
///
/// Dropping it before `finish` destroys those values and frees the memory, so a
/// panicking element constructor leaves nothing behind.
struct PartialInit<T> {
    ptr: *mut T,
    layout: Layout,
    initialized: usize,
}

impl<T> PartialInit<T> {
    fn finish(self) -> *mut T {
        let ptr = self.ptr;
        std::mem::forget(self);
        ptr
    }
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr, self.initialized));
            deallocate(self.ptr, self.layout);
        }
    }
}

fn layout_for<T>(len: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(len).map_err(|_| {
        debug!("capacity overflow for {} elements", len);
        AllocError::CapacityOverflow { requested: len }
    })
}

fn allocate<T>(layout: Layout) -> Result<*mut T, AllocError> {
    if layout.size() == 0 {
        return Ok(NonNull::dangling().as_ptr());
    }
    let ptr = unsafe { alloc::alloc(layout) } as *mut T;
    if ptr.is_null() {
        debug!("allocation of {} bytes failed", layout.size());
        Err(AllocError::OutOfMemory { layout })
    } else {
        Ok(ptr)
    }
}

unsafe fn deallocate<T>(ptr: *mut T, layout: Layout) {
    if layout.size() != 0 {
        alloc::dealloc(ptr as *mut u8, layout);
    }
}

impl<T> ArrayPtr<T> {
    /// A buffer with no allocation.
    pub const fn empty() -> ArrayPtr<T> {
        ArrayPtr {
            _ptr: null_mut(),
            _len: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates `len` elements, each set to `T::default()`.
    pub fn new(len: usize) -> Result<ArrayPtr<T>, AllocError> where T: Default {
        ArrayPtr::from_fn(len, |_| T::default())
    }

    /// Allocates `len` copies of `value`.
    pub fn filled(len: usize, value: &T) -> Result<ArrayPtr<T>, AllocError> where T: Clone {
        ArrayPtr::from_fn(len, |_| value.clone())
    }

    /// Allocates one element per item, moving the items in order.
    ///
    /// Panics if the iterator yields fewer items than it reported.
    pub fn from_exact_iter(mut iter: impl ExactSizeIterator<Item=T>) -> Result<ArrayPtr<T>, AllocError> {
        ArrayPtr::from_fn(iter.len(), |_| iter.next().expect("iterator shorter than its reported length"))
    }

    /// Allocates `len` elements, initializing slot `i` with `f(i)`.
    ///
    /// If `f` panics, the elements built so far are dropped and the memory is freed.
    pub fn from_fn<F>(len: usize, mut f: F) -> Result<ArrayPtr<T>, AllocError> where F: FnMut(usize) -> T {
        if len == 0 {
            return Ok(ArrayPtr::empty());
        }
        let layout = layout_for::<T>(len)?;
        let mut staged = PartialInit {
            ptr: allocate::<T>(layout)?,
            layout,
            initialized: 0,
        };
        while staged.initialized < len {
            let value = f(staged.initialized);
            unsafe { staged.ptr.add(staged.initialized).write(value) };
            staged.initialized += 1;
        }
        trace!("allocated buffer of {} elements", len);
        Ok(ArrayPtr {
            _ptr: staged.finish(),
            _len: len,
            _marker: PhantomData,
        })
    }

    /// Takes ownership of an allocation previously returned by `release`.
    ///
    /// # Safety
    ///
    /// `raw` must come from `ArrayPtr::<T>::release` and must not be used again
    /// by the caller, nor adopted twice.
    pub unsafe fn from_raw(raw: *mut [T]) -> ArrayPtr<T> {
        let ptr = raw as *mut T;
        if ptr.is_null() {
            return ArrayPtr::empty();
        }
        trace!("adopted buffer of {} elements", raw.len());
        ArrayPtr {
            _ptr: ptr,
            _len: raw.len(),
            _marker: PhantomData,
        }
    }

    /// Gives up ownership and returns the raw allocation, leaving this buffer empty.
    ///
    /// The caller becomes responsible for the memory, normally by handing it back
    /// to `from_raw`. A null pointer is returned when nothing was allocated.
    pub fn release(&mut self) -> *mut [T] {
        let raw = ptr::slice_from_raw_parts_mut(self._ptr, self._len);
        trace!("released buffer of {} elements", self._len);
        self._ptr = null_mut();
        self._len = 0;
        raw
    }

    /// Number of element slots in the allocation.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self._len
    }

    /// Returns true if an allocation is held.
    #[inline(always)]
    pub fn is_allocated(&self) -> bool {
        !self._ptr.is_null()
    }

    /// Address of the first element, null when empty.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self._ptr
    }

    pub fn as_slice(&self) -> &[T] {
        if self._ptr.is_null() {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self._ptr, self._len) }
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self._ptr.is_null() {
            &mut []
        } else {
            unsafe { std::slice::from_raw_parts_mut(self._ptr, self._len) }
        }
    }

    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        &*self._ptr.add(index)
    }

    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        &mut *self._ptr.add(index)
    }

    /// Exchanges allocations with `other` without touching any element.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut ArrayPtr<T>) {
        std::mem::swap(&mut self._ptr, &mut other._ptr);
        std::mem::swap(&mut self._len, &mut other._len);
    }
}

impl<T> Default for ArrayPtr<T> {
    fn default() -> ArrayPtr<T> {
        ArrayPtr::empty()
    }
}

impl<T> Index<usize> for ArrayPtr<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        debug_assert!(index < self._len, "buffer index {} out of {} slots", index, self._len);
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for ArrayPtr<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self._len, "buffer index {} out of {} slots", index, self._len);
        &mut self.as_mut_slice()[index]
    }
}

impl<T> fmt::Debug for ArrayPtr<T> where T: fmt::Debug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T> Drop for ArrayPtr<T> {
    fn drop(&mut self) {
        if self._ptr.is_null() {
            return;
        }
        trace!("drop buffer of {} elements", self._len);
        let raw = self.release();
        // the layout was valid when the buffer was allocated
        if let Ok(layout) = layout_for::<T>(raw.len()) {
            drop(PartialInit {
                ptr: raw as *mut T,
                layout,
                initialized: raw.len(),
            });
        }
    }
}
