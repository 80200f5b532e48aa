use crate::loops::PayloadSink;
use crate::transmit::TransmissionPayload;
use heapless::Deque;

/// Bounded payload queue, up to 8 entries
#[derive(Debug)]
pub struct MockSink {
    queue: Deque<TransmissionPayload, 8>,
    capacity: usize,
}

impl MockSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Deque::new(),
            capacity: capacity.min(8),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pop(&mut self) -> Option<TransmissionPayload> {
        self.queue.pop_front()
    }

    /// Take every queued payload in submission order
    pub fn drain(&mut self) -> impl Iterator<Item = TransmissionPayload> + '_ {
        core::iter::from_fn(move || self.queue.pop_front())
    }
}

impl PayloadSink for MockSink {
    fn try_submit(&mut self, payload: TransmissionPayload) -> Result<(), TransmissionPayload> {
        if self.queue.len() >= self.capacity {
            return Err(payload);
        }
        self.queue.push_back(payload)
    }
}
