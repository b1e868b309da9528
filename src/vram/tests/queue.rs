//! Queue bookkeeping tests
//!
//! Tests for the bounded ring: capacity, overflow rejection, ordering, and
//! the activity counters.

use super::*;

// ========================================
// Construction Tests
// ========================================

#[test]
fn test_new_queue_is_empty() {
    let queue = WriteQueue::new(8);
    assert_eq!(queue.capacity(), 8);
    assert_eq!(queue.len(), 0);
    assert!(queue.is_empty());
    assert!(queue.front().is_none());
}

#[test]
fn test_default_queue_capacity() {
    let queue = WriteQueue::default();
    assert_eq!(queue.capacity(), constants::DEFAULT_CAPACITY);
}

#[test]
#[should_panic(expected = "non-zero")]
fn test_zero_capacity_panics() {
    let _ = WriteQueue::new(0);
}

// ========================================
// Enqueue Tests
// ========================================

#[test]
fn test_enqueue_grows_len() {
    let mut queue = WriteQueue::new(4);
    queue
        .enqueue(WriteRequest::attribute(0x23C0, 1))
        .expect("queue has room");
    queue
        .enqueue(WriteRequest::palette(0x3F00, 2))
        .expect("queue has room");

    assert_eq!(queue.len(), 2);
    assert!(!queue.is_empty());
}

#[test]
fn test_capacity_four_rejects_exactly_fifth() {
    let mut queue = WriteQueue::new(4);
    for i in 0..4 {
        queue
            .enqueue(WriteRequest::attribute(0x23C0 + i, i as u8))
            .expect("requests 1-4 must fit");
    }

    let fifth = WriteRequest::attribute(0x23C4, 0x99);
    let overflow = queue.enqueue(fifth.clone()).expect_err("queue is full");

    // The new request is the one rejected, returned intact
    assert_eq!(overflow.rejected(), &fifth);
    assert_eq!(overflow.into_inner(), fifth);
    assert_eq!(queue.len(), 4, "Occupancy never exceeds capacity");
}

#[test]
fn test_overflow_does_not_disturb_queued_requests() {
    let mut queue = WriteQueue::new(2);
    let first = WriteRequest::attribute(0x23C0, 1);
    let second = WriteRequest::palette(0x3F01, 2);
    queue.enqueue(first.clone()).expect("queue has room");
    queue.enqueue(second.clone()).expect("queue has room");

    let _ = queue.enqueue(WriteRequest::attribute(0x23C1, 3));

    let queued: Vec<&WriteRequest> = queue.iter().map(|(_, r)| r).collect();
    assert_eq!(queued, vec![&first, &second]);
}

#[test]
fn test_rejected_request_can_be_retried() {
    let mut queue = WriteQueue::new(1);
    queue
        .enqueue(WriteRequest::attribute(0x23C0, 1))
        .expect("queue has room");

    let overflow = queue
        .enqueue(WriteRequest::attribute(0x23C1, 2))
        .expect_err("queue is full");
    let held_back = overflow.into_inner();

    let mut vram = Vram::new();
    queue.flush(&mut vram, constants::NTSC_VBLANK_CPU_CYCLES);

    queue.enqueue(held_back).expect("room after the flush");
    assert_eq!(queue.len(), 1);
}

// ========================================
// Ordering Tests
// ========================================

#[test]
fn test_iter_yields_fifo_order() {
    let mut queue = WriteQueue::new(8);
    for i in 0..5u8 {
        queue
            .enqueue(WriteRequest::palette(0x3F00 + i as u16, i))
            .expect("queue has room");
    }

    let addrs: Vec<u16> = queue.iter().map(|(_, r)| r.addr()).collect();
    assert_eq!(addrs, vec![0x3F00, 0x3F01, 0x3F02, 0x3F03, 0x3F04]);
}

#[test]
fn test_sequence_numbers_are_monotonic() {
    let mut queue = WriteQueue::new(8);
    for i in 0..6 {
        queue
            .enqueue(WriteRequest::attribute(0x23C0, i))
            .expect("queue has room");
    }

    let seqs: Vec<u64> = queue.iter().map(|(seq, _)| seq).collect();
    assert_eq!(seqs, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_front_is_oldest_request() {
    let mut queue = WriteQueue::new(4);
    let first = WriteRequest::nametable(0x2000, vec![7]);
    queue.enqueue(first.clone()).expect("queue has room");
    queue
        .enqueue(WriteRequest::attribute(0x23C0, 1))
        .expect("queue has room");

    assert_eq!(queue.front(), Some(&first));
}

#[test]
fn test_ring_wraparound_preserves_order() {
    let mut queue = WriteQueue::new(4);
    let mut vram = Vram::new();

    // Advance the head partway around the ring
    for i in 0..3u8 {
        queue
            .enqueue(WriteRequest::attribute(0x23C0, i))
            .expect("queue has room");
    }
    queue.flush(&mut vram, constants::NTSC_VBLANK_CPU_CYCLES);
    assert!(queue.is_empty());

    // Refill across the physical end of the slot array
    for i in 10..14u8 {
        queue
            .enqueue(WriteRequest::palette(0x3F00, i))
            .expect("queue has room");
    }

    let values: Vec<u8> = queue
        .iter()
        .map(|(_, r)| match r {
            WriteRequest::Palette { data, .. } => *data,
            _ => panic!("unexpected request kind"),
        })
        .collect();
    assert_eq!(values, vec![10, 11, 12, 13]);
}

// ========================================
// Clear and Stats Tests
// ========================================

#[test]
fn test_clear_empties_queue() {
    let mut queue = WriteQueue::new(4);
    queue
        .enqueue(WriteRequest::attribute(0x23C0, 1))
        .expect("queue has room");
    queue
        .enqueue(WriteRequest::palette(0x3F00, 2))
        .expect("queue has room");

    queue.clear();
    assert!(queue.is_empty());
    assert!(queue.front().is_none());

    // Sequence numbering keeps running after a clear
    queue
        .enqueue(WriteRequest::attribute(0x23C0, 3))
        .expect("queue has room");
    let seqs: Vec<u64> = queue.iter().map(|(seq, _)| seq).collect();
    assert_eq!(seqs, vec![2]);
}

#[test]
fn test_stats_count_enqueues_and_rejections() {
    let mut queue = WriteQueue::new(2);
    queue
        .enqueue(WriteRequest::attribute(0x23C0, 1))
        .expect("queue has room");
    queue
        .enqueue(WriteRequest::attribute(0x23C1, 2))
        .expect("queue has room");
    let _ = queue.enqueue(WriteRequest::attribute(0x23C2, 3));
    let _ = queue.enqueue(WriteRequest::attribute(0x23C3, 4));

    let stats = queue.stats();
    assert_eq!(stats.enqueued, 2);
    assert_eq!(stats.rejected, 2);
    assert_eq!(stats.applied, 0);
}

#[test]
fn test_reset_stats() {
    let mut queue = WriteQueue::new(2);
    queue
        .enqueue(WriteRequest::attribute(0x23C0, 1))
        .expect("queue has room");
    queue.reset_stats();
    assert_eq!(queue.stats(), QueueStats::default());
}
