//! Occupancy vector consumers.
//!
//! The display side of the system is a collaborator, not part of the
//! core, so the pipeline publishes each cycle's snapshot through this
//! trait. Implementations own their transport; the pipeline never blocks
//! on a slow consumer beyond what the sink itself does.

use crate::detection::LotState;
use std::sync::mpsc;

/// Receives one occupancy snapshot per detection cycle.
pub trait OccupancySink {
    /// Publishes a completed snapshot.
    fn publish(&mut self, state: &LotState);
}

/// Sink that logs each snapshot through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink;

impl OccupancySink for LogSink {
    fn publish(&mut self, state: &LotState) {
        tracing::info!(
            sequence = state.sequence(),
            empty = state.empty_count(),
            total = state.states().len(),
            vector = %state.code_string(),
            "Occupancy snapshot"
        );
    }
}

/// Sink that forwards owned snapshots over an mpsc channel.
///
/// Gives a display thread its own copy of each vector; there is no shared
/// mutation between producer and consumer.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<LotState>,
}

impl ChannelSink {
    /// Creates a sink and the receiving end for the consumer thread.
    pub fn channel() -> (Self, mpsc::Receiver<LotState>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl OccupancySink for ChannelSink {
    fn publish(&mut self, state: &LotState) {
        if self.tx.send(state.clone()).is_err() {
            tracing::warn!("Occupancy consumer dropped its receiver");
        }
    }
}

/// Sink that retains every snapshot in memory, for tests and tooling.
#[derive(Debug, Default)]
pub struct MemorySink {
    states: Vec<LotState>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots published so far, in cycle order.
    pub fn states(&self) -> &[LotState] {
        &self.states
    }

    /// Number of snapshots published so far.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl OccupancySink for MemorySink {
    fn publish(&mut self, state: &LotState) {
        self.states.push(state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{LotState, SpotState};

    fn snapshot(sequence: u64) -> LotState {
        LotState::new(vec![SpotState::Empty, SpotState::Full], sequence)
    }

    #[test]
    fn test_memory_sink_retains_order() {
        let mut sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.publish(&snapshot(1));
        sink.publish(&snapshot(2));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.states()[0].sequence(), 1);
        assert_eq!(sink.states()[1].sequence(), 2);
    }

    #[test]
    fn test_channel_sink_delivers_clones() {
        let (mut sink, rx) = ChannelSink::channel();
        sink.publish(&snapshot(9));

        let received = rx.recv().unwrap();
        assert_eq!(received.sequence(), 9);
        assert_eq!(received.code_string(), "10");
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (mut sink, rx) = ChannelSink::channel();
        drop(rx);

        // Must not panic
        sink.publish(&snapshot(1));
    }
}
