use std::collections::VecDeque;

use crate::{Bounds, CELLS, Fault, QUEUE, Word};

/// Length-prefixed word array. `words[0]` is the payload length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    words: Box<[Word]>,
}

impl Message {
    /// Zero-filled message with `length` payload words.
    pub fn new(length: Word) -> Result<Self, Fault> {
        let payload = usize::try_from(length)
            .ok()
            .filter(|&n| n <= CELLS)
            .ok_or(Fault::OutOfBounds(Bounds::MessageLength(length)))?;
        let mut words = vec![0; payload + 1].into_boxed_slice();
        words[0] = length;
        Ok(Self { words })
    }

    pub fn from_payload(payload: &[Word]) -> Self {
        let mut words = Vec::with_capacity(payload.len() + 1);
        words.push(payload.len() as Word);
        words.extend_from_slice(payload);
        Self {
            words: words.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The length prefix as stored in the message.
    #[inline]
    pub fn header(&self) -> Word {
        self.words[0]
    }

    #[inline]
    pub fn payload(&self) -> &[Word] {
        &self.words[1..]
    }

    fn slot(&self, index: Word) -> Result<usize, Fault> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.len())
            .map(|i| i + 1)
            .ok_or(Fault::OutOfBounds(Bounds::Message {
                index,
                length: self.len(),
            }))
    }

    pub fn get(&self, index: Word) -> Result<Word, Fault> {
        Ok(self.words[self.slot(index)?])
    }

    pub fn set(&mut self, index: Word, value: Word) -> Result<(), Fault> {
        let slot = self.slot(index)?;
        self.words[slot] = value;
        Ok(())
    }
}

/// Bounded FIFO of pending messages.
#[derive(Debug, Default)]
pub struct Inbox {
    queue: VecDeque<Message>,
}

impl Inbox {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(QUEUE),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.len() >= QUEUE
    }

    /// Hands the message back when the inbox is full.
    pub fn push(&mut self, message: Message) -> Result<(), Message> {
        if self.is_full() {
            return Err(message);
        }
        self.queue.push_back(message);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Message> {
        self.queue.pop_front()
    }
}
