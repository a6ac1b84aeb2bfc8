use crate::{AllocError, ArrayPtr};
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorError {
    OutOfRange { index: usize, size: usize },
    Alloc(AllocError),
}

impl Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::OutOfRange { index, size } => write!(f, "Index {} is out of range for vector of size {}", index, size),
            VectorError::Alloc(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for VectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VectorError::Alloc(e) => Some(e),
            VectorError::OutOfRange { .. } => None,
        }
    }
}

impl From<AllocError> for VectorError {
    fn from(e: AllocError) -> VectorError {
        VectorError::Alloc(e)
    }
}

impl VectorError {
    fn handle(self) -> ! {
        match self {
            VectorError::Alloc(e) => e.handle(),
            e => panic!("{}", e),
        }
    }
}

/// Capacity request that constructs an empty vector with storage already reserved.
///
/// Obtain it with `simple_vector::reserve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveHint {
    capacity_to_reserve: usize,
}

impl ReserveHint {
    pub fn capacity(&self) -> usize {
        self.capacity_to_reserve
    }
}

/// Returns a hint for `SimpleVector::with_reserved`.
pub fn reserve(capacity_to_reserve: usize) -> ReserveHint {
    ReserveHint { capacity_to_reserve }
}

fn grown(size: usize, factor: usize, extra: usize) -> Result<usize, AllocError> {
    size.checked_mul(factor)
        .and_then(|c| c.checked_add(extra))
        .ok_or(AllocError::CapacityOverflow { requested: size })
}

/// Growable array on top of a single `ArrayPtr`.
///
/// Elements at positions `0..len()` are live. Slots `len()..capacity()` are
/// allocated and hold default or stale values that later growth overwrites.
///
/// Positions are plain offsets: the first element is `0`, the end is `len()`.
/// Any operation that reallocates (`reserve` past capacity, `resize` upward,
/// growing `push_back`/`insert`, `erase`) or shifts elements (`insert`, `erase`)
/// invalidates positions obtained before it.
///
/// Every reallocation stages the complete replacement buffer first and only
/// then swaps it in. If staging fails, by allocation error or by a panicking
/// `Default`/`Clone`, the vector is left exactly as it was.
pub struct SimpleVector<T> {
    _data: ArrayPtr<T>,
    _size: usize,
    _capacity: usize,
}

impl<T> SimpleVector<T> {
    /// Empty vector without allocation.
    pub const fn new() -> SimpleVector<T> {
        SimpleVector {
            _data: ArrayPtr::empty(),
            _size: 0,
            _capacity: 0,
        }
    }

    /// Builds a vector whose size and capacity equal the item count, moving
    /// items in order.
    pub fn from_list<I>(items: I) -> Result<SimpleVector<T>, VectorError>
        where I: IntoIterator<Item=T>, I::IntoIter: ExactSizeIterator
    {
        let data = ArrayPtr::from_exact_iter(items.into_iter())?;
        let size = data.len();
        Ok(SimpleVector {
            _data: data,
            _size: size,
            _capacity: size,
        })
    }

    /// Builds `size` copies of `value`.
    pub fn filled(size: usize, value: &T) -> Result<SimpleVector<T>, VectorError> where T: Clone {
        Ok(SimpleVector {
            _data: ArrayPtr::filled(size, value)?,
            _size: size,
            _capacity: size,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self._size
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self._capacity
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self._size == 0
    }

    /// Checked access.
    pub fn at(&self, index: usize) -> Result<&T, VectorError> {
        if index >= self._size {
            return Err(VectorError::OutOfRange { index, size: self._size });
        }
        Ok(&self._data[index])
    }

    /// Checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, VectorError> {
        if index >= self._size {
            return Err(VectorError::OutOfRange { index, size: self._size });
        }
        Ok(&mut self._data[index])
    }

    pub fn as_slice(&self) -> &[T] {
        &self._data.as_slice()[..self._size]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let size = self._size;
        &mut self._data.as_mut_slice()[..size]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Forgets the last element. The slot keeps its value until overwritten.
    pub fn pop_back(&mut self) {
        assert!(self._size > 0, "pop_back on empty vector");
        self._size -= 1;
    }

    /// Sets the size to zero, keeping capacity and storage.
    pub fn clear(&mut self) {
        self._size = 0;
    }

    pub fn swap(&mut self, other: &mut SimpleVector<T>) {
        self._data.swap(&mut other._data);
        std::mem::swap(&mut self._size, &mut other._size);
        std::mem::swap(&mut self._capacity, &mut other._capacity);
    }

    /// Splits the vector into its storage and size.
    pub(crate) fn into_parts(self) -> (ArrayPtr<T>, usize) {
        let SimpleVector { _data, _size, .. } = self;
        (_data, _size)
    }

    /// Swaps `staged` in as the new storage.
    fn commit(&mut self, mut staged: ArrayPtr<T>) {
        self._data.swap(&mut staged);
        self._capacity = self._data.len();
        debug_assert!(self._size <= self._capacity);
    }

    /// Shifts `index..len()` one slot toward the end and places `value` at `index`.
    /// Needs one spare slot.
    fn shift_in(&mut self, index: usize, value: T) {
        debug_assert!(self._size < self._capacity);
        let size = self._size;
        let slots = self._data.as_mut_slice();
        slots[index..=size].rotate_right(1);
        slots[index] = value;
        self._size += 1;
    }
}

impl<T> SimpleVector<T> where T: Default {
    /// Builds `size` default values.
    pub fn with_size(size: usize) -> Result<SimpleVector<T>, VectorError> {
        Ok(SimpleVector {
            _data: ArrayPtr::new(size)?,
            _size: size,
            _capacity: size,
        })
    }

    /// Builds an empty vector with the hinted capacity.
    pub fn with_reserved(hint: ReserveHint) -> Result<SimpleVector<T>, VectorError> {
        let data = ArrayPtr::new(hint.capacity())?;
        Ok(SimpleVector {
            _capacity: data.len(),
            _data: data,
            _size: 0,
        })
    }

    /// Allocates `capacity` default slots and moves the live elements into them.
    /// Nothing is moved unless the allocation succeeds.
    fn relocate(&mut self, capacity: usize) -> Result<ArrayPtr<T>, VectorError> {
        let mut staged = ArrayPtr::new(capacity)?;
        trace!("relocate {} elements, capacity {} -> {}", self._size, self._capacity, capacity);
        let size = self._size;
        for (slot, item) in staged.as_mut_slice().iter_mut().zip(&mut self._data.as_mut_slice()[..size]) {
            std::mem::swap(slot, item);
        }
        Ok(staged)
    }

    /// Grows capacity to exactly `new_capacity`. Does nothing if it is not larger
    /// than the current capacity.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), VectorError> {
        if new_capacity <= self._capacity {
            return Ok(());
        }
        let staged = self.relocate(new_capacity)?;
        self.commit(staged);
        Ok(())
    }

    /// Shrinking only lowers the size. Otherwise the storage is rebuilt with
    /// exactly `new_size` slots, the new ones default-valued, and size and
    /// capacity both become `new_size`.
    pub fn resize(&mut self, new_size: usize) -> Result<(), VectorError> {
        if new_size < self._size {
            self._size = new_size;
            return Ok(());
        }
        let staged = self.relocate(new_size)?;
        self.commit(staged);
        self._size = new_size;
        Ok(())
    }

    /// Appends `value`. A full vector grows to `2 * len() + 1`.
    pub fn push_back(&mut self, value: T) -> Result<(), VectorError> {
        if self._size == self._capacity {
            self.reserve(grown(self._size, 2, 1)?)?;
        }
        self._data[self._size] = value;
        self._size += 1;
        Ok(())
    }

    /// Inserts `value` at position `index`, shifting later elements right, and
    /// returns the position of the inserted element.
    ///
    /// Inserting at `len()` is a `push_back`. A full vector otherwise grows by one slot.
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize, VectorError> {
        assert!(index <= self._size, "insert position {} is past the end {}", index, self._size);
        if index == self._size {
            self.push_back(value)?;
            return Ok(index);
        }
        if self._size == self._capacity {
            self.reserve(grown(self._size, 1, 1)?)?;
        }
        self.shift_in(index, value);
        Ok(index)
    }

    /// Removes the element at `index` and returns the position now holding its
    /// successor (`len()` if the last element was removed).
    ///
    /// The survivors are moved into a fresh buffer of the old size, which becomes
    /// the new capacity. Panics if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> Result<usize, VectorError> {
        assert!(index < self._size, "erase position {} is not before the end {}", index, self._size);
        let size = self._size;
        let mut staged = ArrayPtr::new(size)?;
        trace!("erase at {}, restage {} elements", index, size);
        let (before, after) = self._data.as_mut_slice()[..size].split_at_mut(index);
        let survivors = before.iter_mut().chain(after[1..].iter_mut());
        for (slot, item) in staged.as_mut_slice().iter_mut().zip(survivors) {
            std::mem::swap(slot, item);
        }
        self.commit(staged);
        self._size -= 1;
        Ok(index)
    }
}

impl<T> SimpleVector<T> where T: Default + Clone {
    /// Appends a copy of `value`. A full vector grows by one slot.
    pub fn push_back_cloned(&mut self, value: &T) -> Result<(), VectorError> {
        let value = value.clone();
        if self._size == self._capacity {
            self.reserve(grown(self._size, 1, 1)?)?;
        }
        self._data[self._size] = value;
        self._size += 1;
        Ok(())
    }

    /// Inserts a copy of `value` at `index`, like `insert`.
    pub fn insert_cloned(&mut self, index: usize, value: &T) -> Result<usize, VectorError> {
        assert!(index <= self._size, "insert position {} is past the end {}", index, self._size);
        if index == self._size {
            self.push_back_cloned(value)?;
            return Ok(index);
        }
        self.insert(index, value.clone())
    }

    /// Copies the vector into an independent allocation of the same capacity.
    pub fn try_clone(&self) -> Result<SimpleVector<T>, VectorError> {
        trace!("copy {} elements", self._size);
        let size = self._size;
        let data = ArrayPtr::from_fn(self._capacity, |i| {
            if i < size { self._data[i].clone() } else { T::default() }
        })?;
        Ok(SimpleVector {
            _data: data,
            _size: size,
            _capacity: self._capacity,
        })
    }
}

impl<T> Default for SimpleVector<T> {
    fn default() -> SimpleVector<T> {
        SimpleVector::new()
    }
}

impl<T> Clone for SimpleVector<T> where T: Default + Clone {
    fn clone(&self) -> SimpleVector<T> {
        self.try_clone().unwrap_or_else(|e| e.handle())
    }

    fn clone_from(&mut self, source: &SimpleVector<T>) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T> TryFrom<ReserveHint> for SimpleVector<T> where T: Default {
    type Error = VectorError;

    fn try_from(hint: ReserveHint) -> Result<SimpleVector<T>, VectorError> {
        SimpleVector::with_reserved(hint)
    }
}

impl<T> Extend<T> for SimpleVector<T> where T: Default {
    fn extend<I: IntoIterator<Item=T>>(&mut self, iter: I) {
        for item in iter {
            if let Err(e) = self.push_back(item) {
                e.handle();
            }
        }
    }
}

/// Unchecked in release builds: `index < len()` is the caller's obligation.
/// An index past the size reads a stale slot, one past the capacity panics.
impl<T> Index<usize> for SimpleVector<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        debug_assert!(index < self._size, "index {} out of size {}", index, self._size);
        &self._data[index]
    }
}

impl<T> IndexMut<usize> for SimpleVector<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self._size, "index {} out of size {}", index, self._size);
        &mut self._data[index]
    }
}

impl<'a, T> IntoIterator for &'a SimpleVector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SimpleVector<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Debug for SimpleVector<T> where T: Debug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for i in self.iter() {
            list.entry(i);
        }
        list.finish()
    }
}

impl<T> PartialEq for SimpleVector<T> where T: PartialEq {
    fn eq(&self, other: &SimpleVector<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T> Eq for SimpleVector<T> where T: Eq {}

impl<T> PartialOrd for SimpleVector<T> where T: PartialOrd {
    fn partial_cmp(&self, other: &SimpleVector<T>) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T> Ord for SimpleVector<T> where T: Ord {
    fn cmp(&self, other: &SimpleVector<T>) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T> Hash for SimpleVector<T> where T: Hash {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}
