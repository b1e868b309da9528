// VRAM module - deferred write queue and vertical blank flush scheduling
//
// Video memory can only be touched safely while rendering is off, so writes
// produced during the main update phase are queued here and drained during
// the vertical blank. The queue is the safety boundary between game logic
// running at its own pace and a hardware window of fixed, short duration.
//
// # Frame Model
//
// ```text
// Accepting: update phase; enqueue() appends until the queue is full.
//            A full queue rejects the NEW request (never an older one)
//            and hands it back; the game loop is never blocked.
// Flushing:  vertical blank; flush() applies requests strictly in enqueue
//            order until the queue empties or the cycle budget would be
//            exceeded by the next whole request.
// Idle:      leftover requests either carry into the next frame or are
//            retired, per the scheduler's per-kind carryover policy.
// ```
//
// The phases alternate within a single thread; the queue has one writer and
// one drainer and is never used concurrently.

pub mod constants;

mod request;
mod scheduler;

#[cfg(test)]
mod tests;

pub use request::{WriteKind, WriteRequest};
pub use scheduler::{CarryoverPolicy, CostTable, FlushScheduler};

use crate::memory::VideoMemory;
use constants::{DEFAULT_CAPACITY, PPU_ADDR_MASK};

/// Error returned when the queue is at capacity
///
/// Carries the rejected request back so the caller can retry it next frame
/// or discard it. The queue itself is unchanged: older requests are never
/// evicted in favor of newer ones, and the rejection is never silent.
#[derive(Debug)]
pub struct QueueOverflow {
    rejected: WriteRequest,
}

impl QueueOverflow {
    /// The request that did not fit
    pub fn rejected(&self) -> &WriteRequest {
        &self.rejected
    }

    /// Take the rejected request back for a later retry
    pub fn into_inner(self) -> WriteRequest {
        self.rejected
    }
}

impl std::fmt::Display for QueueOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Deferred write queue is full; rejected {} write to ${:04X}",
            self.rejected.kind(),
            self.rejected.addr()
        )
    }
}

impl std::error::Error for QueueOverflow {}

/// Running counters for queue activity
///
/// Counters increase monotonically over the queue's lifetime. They are
/// informational only and never a failure channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Requests accepted by `enqueue`
    pub enqueued: u64,
    /// Requests applied to video memory by `flush`
    pub applied: u64,
    /// Requests rejected because the queue was full
    pub rejected: u64,
    /// Requests discarded at the end of a blank by drop-on-carryover policy
    pub retired: u64,
    /// Requests held over to a following frame (counted once per flush)
    pub carried: u64,
}

/// A queued request stamped with its enqueue sequence number
#[derive(Debug, Clone)]
struct Pending {
    seq: u64,
    request: WriteRequest,
}

/// Bounded deferred write queue with budgeted in-order flushing
///
/// The queue holds at most `capacity` requests in a fixed-size ring; the
/// bound is chosen once at construction from the driver's hardware budget
/// and never grows. Within a flush, requests apply strictly in enqueue
/// order, so a later write to an overlapping destination always wins, and a
/// request is applied either whole or not at all.
///
/// # Examples
///
/// ```
/// use nes_gfx::memory::{VideoMemory, Vram};
/// use nes_gfx::vram::{WriteQueue, WriteRequest};
///
/// let mut queue = WriteQueue::new(8);
/// queue.enqueue(WriteRequest::attribute(0x23C0, 0x55)).unwrap();
///
/// let mut vram = Vram::new();
/// let applied = queue.flush(&mut vram, 2273);
/// assert_eq!(applied, 1);
/// assert_eq!(vram.read(0x23C0), 0x55);
/// ```
pub struct WriteQueue {
    /// Fixed ring storage; unoccupied slots hold None
    slots: Box<[Option<Pending>]>,
    /// Slot index of the oldest queued request
    head: usize,
    /// Number of occupied slots
    len: usize,
    /// Sequence number the next accepted request receives
    next_seq: u64,
    /// Flush cost model and carryover policy
    scheduler: FlushScheduler,
    /// Running activity counters
    stats: QueueStats,
}

impl WriteQueue {
    /// Create a queue with the given capacity and the default scheduler
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of queued requests, fixed for the
    ///   queue's lifetime
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self::with_scheduler(capacity, FlushScheduler::new())
    }

    /// Create a queue with the given capacity and scheduler
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_scheduler(capacity: usize, scheduler: FlushScheduler) -> Self {
        assert!(capacity > 0, "Queue capacity must be non-zero");

        WriteQueue {
            slots: vec![None; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
            next_seq: 0,
            scheduler,
            stats: QueueStats::default(),
        }
    }

    /// Fixed capacity of the queue
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of currently queued requests
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no requests are queued
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The scheduler in use
    pub fn scheduler(&self) -> &FlushScheduler {
        &self.scheduler
    }

    /// Mutable access to the scheduler, for policy overrides
    pub fn scheduler_mut(&mut self) -> &mut FlushScheduler {
        &mut self.scheduler
    }

    /// Snapshot of the running activity counters
    pub fn stats(&self) -> QueueStats {
        self.stats
    }

    /// Reset the activity counters to zero
    pub fn reset_stats(&mut self) {
        self.stats = QueueStats::default();
    }

    /// The oldest queued request, if any
    pub fn front(&self) -> Option<&WriteRequest> {
        self.slots[self.head].as_ref().map(|pending| &pending.request)
    }

    /// Queued requests with their sequence numbers, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (u64, &WriteRequest)> + '_ {
        let capacity = self.slots.len();
        (0..self.len).filter_map(move |i| {
            let slot = (self.head + i) % capacity;
            self.slots[slot]
                .as_ref()
                .map(|pending| (pending.seq, &pending.request))
        })
    }

    /// Append a request during the accepting phase
    ///
    /// The request is stamped with the next sequence number and placed at
    /// the tail of the ring. If the queue is full, the new request itself is
    /// rejected and handed back inside the error; nothing already queued is
    /// disturbed.
    ///
    /// # Arguments
    ///
    /// * `request` - The write to defer
    ///
    /// # Errors
    ///
    /// Returns `QueueOverflow` carrying `request` back when the queue is at
    /// capacity.
    pub fn enqueue(&mut self, request: WriteRequest) -> Result<(), QueueOverflow> {
        if self.len == self.slots.len() {
            self.stats.rejected += 1;
            return Err(QueueOverflow { rejected: request });
        }

        let slot = (self.head + self.len) % self.slots.len();
        let seq = self.next_seq;
        self.next_seq += 1;

        self.slots[slot] = Some(Pending { seq, request });
        self.len += 1;
        self.stats.enqueued += 1;

        Ok(())
    }

    /// Drain an in-order prefix of the queue during the vertical blank
    ///
    /// Requests apply strictly in enqueue order. Before each request, its
    /// whole-payload cost is estimated; if applying it would push the total
    /// past `budget_cycles`, it is left untouched and the drain stops. A
    /// budget exactly consumed is fine, one cycle over is not: the budget is
    /// a hard ceiling, and stopping early is always the safe side.
    ///
    /// Consecutive requests at contiguous addresses skip the address setup
    /// cost (the hardware address register auto-increments), which the cost
    /// estimate accounts for. The first request of every flush pays full
    /// setup; the address register cannot be trusted across frames.
    ///
    /// After the drain, requests still queued are retired or carried per the
    /// scheduler's carryover policy. Carried requests keep their order and
    /// flush ahead of anything enqueued in the following frame.
    ///
    /// # Arguments
    ///
    /// * `memory` - The video memory sink to apply requests to
    /// * `budget_cycles` - Hard CPU cycle ceiling for this blank
    ///
    /// # Returns
    ///
    /// The number of requests applied
    pub fn flush<M: VideoMemory>(&mut self, memory: &mut M, budget_cycles: u32) -> usize {
        let capacity = self.slots.len();
        let mut spent: u32 = 0;
        let mut applied = 0;
        let mut last_end: Option<u16> = None;

        while self.len > 0 {
            let head = self.head;
            let pending = match self.slots[head].take() {
                Some(pending) => pending,
                None => unreachable!("head slot is occupied while the queue is non-empty"),
            };

            let cost = self.scheduler.cost(&pending.request, last_end);
            if spent.saturating_add(cost) > budget_cycles {
                // Next whole request does not fit; leave it untouched
                self.slots[head] = Some(pending);
                break;
            }

            apply_request(&pending.request, memory);
            spent += cost;
            last_end = Some(pending.request.end_addr());

            self.head = (head + 1) % capacity;
            self.len -= 1;
            applied += 1;
            self.stats.applied += 1;
        }

        self.retire_carryover();
        applied
    }

    /// Empty the queue without applying anything
    ///
    /// Sequence numbering and activity counters keep running.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Apply the end-of-blank carryover policy to the remaining requests
    ///
    /// Requests whose kind is drop-on-carryover are retired; the rest are
    /// compacted to the front of the ring in their original order, so they
    /// precede anything enqueued afterwards.
    fn retire_carryover(&mut self) {
        if self.len == 0 {
            return;
        }

        let capacity = self.slots.len();
        let mut kept = Vec::with_capacity(self.len);

        for i in 0..self.len {
            let slot = (self.head + i) % capacity;
            if let Some(pending) = self.slots[slot].take() {
                if self.scheduler.carries_over(pending.request.kind()) {
                    kept.push(pending);
                } else {
                    self.stats.retired += 1;
                }
            }
        }

        self.head = 0;
        self.len = kept.len();
        self.stats.carried += kept.len() as u64;
        for (i, pending) in kept.into_iter().enumerate() {
            self.slots[i] = Some(pending);
        }
    }
}

impl Default for WriteQueue {
    /// Create a queue with the default capacity and scheduler
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Apply one request's whole payload to video memory
///
/// Run payloads land at consecutive addresses, wrapping within the PPU's
/// 14-bit space exactly as the hardware address register does.
fn apply_request<M: VideoMemory>(request: &WriteRequest, memory: &mut M) {
    match request {
        WriteRequest::Nametable { addr, data } => {
            for (i, &byte) in data.iter().enumerate() {
                memory.write(addr.wrapping_add(i as u16) & PPU_ADDR_MASK, byte);
            }
        }
        WriteRequest::Attribute { addr, data } => memory.write(*addr, *data),
        WriteRequest::Palette { addr, data } => memory.write(*addr, *data),
    }
}
