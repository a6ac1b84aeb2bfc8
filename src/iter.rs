use crate::{ArrayPtr, SimpleVector};

/// Owning iterator over the live elements of a `SimpleVector`.
///
/// Each element is moved out and replaced by `T::default()`, and the storage is
/// released when the iterator is dropped.
pub struct IntoIter<T> {
    _data: ArrayPtr<T>,
    _front: usize,
    _back: usize,
}

impl<T> IntoIterator for SimpleVector<T> where T: Default {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let (data, size) = self.into_parts();
        IntoIter {
            _data: data,
            _front: 0,
            _back: size,
        }
    }
}

impl<T> Iterator for IntoIter<T> where T: Default {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self._front == self._back {
            return None;
        }
        let item = std::mem::take(&mut self._data[self._front]);
        self._front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self._back - self._front;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> where T: Default {
    fn next_back(&mut self) -> Option<T> {
        if self._front == self._back {
            return None;
        }
        self._back -= 1;
        Some(std::mem::take(&mut self._data[self._back]))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> where T: Default {}

#[cfg(test)]
mod iter_tests {
    use crate::SimpleVector;
    use crate::dropflag::Tracked;

    #[test]
    fn yields_live_elements_in_order() {
        let mut v = SimpleVector::from_list(vec![1, 2, 3, 4]).unwrap();
        v.pop_back();
        let items: Vec<i32> = v.into_iter().collect();
        assert_eq!(vec![1, 2, 3], items);
    }

    #[test]
    fn iterates_from_both_ends() {
        let v = SimpleVector::from_list(vec![1, 2, 3]).unwrap();
        let mut iter = v.into_iter();
        assert_eq!(3, iter.len());
        assert_eq!(Some(3), iter.next_back());
        assert_eq!(Some(1), iter.next());
        assert_eq!(Some(2), iter.next());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next_back());
    }

    #[test]
    fn partially_consumed_iterator_drops_the_rest() {
        {
            let v = SimpleVector::from_list((0..6).map(Tracked::new)).unwrap();
            let mut iter = v.into_iter();
            let first = iter.next().unwrap();
            assert_eq!(0, first.0);
        }
        assert_eq!(0, Tracked::live());
    }
}
