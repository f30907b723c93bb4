use crate::error::QueueError;

/// Fixed-capacity ring buffer. Pushing into a full queue overwrites the oldest sample.
#[derive(Debug, Clone)]
pub struct SampleQueue<T> {
    buf: Box<[T]>,
    first: usize,
    count: usize,
}

impl<T: Copy + Default> SampleQueue<T> {
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }
        Ok(Self {
            buf: vec![T::default(); capacity].into_boxed_slice(),
            first: 0,
            count: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Physical slot of the oldest sample.
    pub fn first(&self) -> usize {
        self.first
    }

    pub fn push(&mut self, value: T) {
        let cap = self.capacity();
        if self.is_full() {
            self.buf[self.first] = value;
            self.first = (self.first + 1) % cap;
        } else {
            self.buf[(self.first + self.count) % cap] = value;
            self.count += 1;
        }
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.buf[self.first];
        self.first = (self.first + 1) % self.capacity();
        self.count -= 1;
        Some(value)
    }

    pub fn reset(&mut self) {
        self.first = 0;
        self.count = 0;
    }

    /// Logical access, `0` being the oldest sample.
    pub fn get(&self, index: usize) -> Option<T> {
        (index < self.count).then(|| self.buf[(self.first + index) % self.capacity()])
    }

    pub fn newest(&self) -> Option<T> {
        self.count.checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + '_ {
        let cap = self.capacity();
        (0..self.count).map(move |i| self.buf[(self.first + i) % cap])
    }
}
