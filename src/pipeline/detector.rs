//! The detection cycle: acquire → difference → classify → publish.
//!
//! One pipeline instance owns its camera, differencer, evaluator, and
//! sink, all injected at construction so the cycle runs against mocks in
//! tests. Cycles are strictly sequential; a new frame is never requested
//! while the previous pass is still in flight.

use super::sink::OccupancySink;
use crate::capture::{Camera, CameraError};
use crate::detection::{DetectionError, FrameDifferencer, LotState, SpotEvaluator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors surfaced by a detection cycle.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The camera failed to deliver a frame. Retried on the next tick;
    /// the previously published vector remains last-known-good.
    #[error("frame acquisition failed: {0}")]
    Acquisition(#[from] CameraError),
    /// The resolution contract is broken. The loop must stop.
    #[error(transparent)]
    Detection(#[from] DetectionError),
}

impl PipelineError {
    /// Returns true if the loop must abort rather than retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::Detection(_))
    }
}

/// Runs detection cycles over an injected camera and sink.
pub struct DetectionPipeline<C: Camera, S: OccupancySink> {
    camera: C,
    differencer: FrameDifferencer,
    evaluator: SpotEvaluator,
    sink: S,
    /// Most recent successfully published snapshot.
    last_state: Option<LotState>,
    /// Capture timestamp of the frame behind `last_state`.
    last_frame_at: Option<Instant>,
    /// Acquisition failures since the last good cycle.
    consecutive_failures: u32,
    /// Successfully completed cycles.
    cycles_completed: u64,
}

impl<C: Camera, S: OccupancySink> DetectionPipeline<C, S> {
    /// Assembles a pipeline from its collaborators. The camera must
    /// already be open.
    pub fn new(camera: C, differencer: FrameDifferencer, evaluator: SpotEvaluator, sink: S) -> Self {
        Self {
            camera,
            differencer,
            evaluator,
            sink,
            last_state: None,
            last_frame_at: None,
            consecutive_failures: 0,
            cycles_completed: 0,
        }
    }

    /// Runs one detection cycle and publishes the resulting snapshot.
    ///
    /// On acquisition failure the prior vector is retained as
    /// last-known-good and the failure is signaled, not swallowed: the
    /// error is returned and the consecutive-failure count is logged so
    /// staleness is visible to the operator.
    pub fn run_cycle(&mut self) -> Result<&LotState, PipelineError> {
        let frame = match self.camera.capture() {
            Ok(frame) => frame,
            Err(e) => {
                self.consecutive_failures += 1;
                tracing::warn!(
                    consecutive_failures = self.consecutive_failures,
                    stale_for_ms = ?self
                        .last_frame_at
                        .map(|t| t.elapsed().as_millis() as u64),
                    "Frame acquisition failed, occupancy vector is stale"
                );
                return Err(e.into());
            }
        };

        let mask = self.differencer.diff(&frame)?;
        let state = self.evaluator.evaluate(&mask)?;

        self.sink.publish(&state);
        self.last_frame_at = Some(frame.timestamp());
        self.consecutive_failures = 0;
        self.cycles_completed += 1;

        tracing::debug!(
            cycle = self.cycles_completed,
            sequence = state.sequence(),
            empty = state.empty_count(),
            "Detection cycle complete"
        );

        Ok(&*self.last_state.insert(state))
    }

    /// Runs the polling loop.
    ///
    /// Executes up to `max_cycles` cycles (or indefinitely for `None`),
    /// sleeping `interval` between ticks and stopping when `running` is
    /// cleared. Acquisition failures are retried on the next natural
    /// tick; configuration errors abort the loop.
    pub fn run(
        &mut self,
        max_cycles: Option<u64>,
        interval: Duration,
        running: &AtomicBool,
    ) -> Result<(), PipelineError> {
        let mut ticks = 0u64;
        while running.load(Ordering::SeqCst) {
            if let Some(max) = max_cycles {
                if ticks >= max {
                    break;
                }
            }
            ticks += 1;

            match self.run_cycle() {
                Ok(_) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(_) => {} // already logged; retry next tick
            }

            std::thread::sleep(interval);
        }
        Ok(())
    }

    /// The most recent successfully published snapshot.
    pub fn last_state(&self) -> Option<&LotState> {
        self.last_state.as_ref()
    }

    /// Capture timestamp of the frame behind the last published snapshot.
    /// `None` until a cycle has completed.
    pub fn last_frame_at(&self) -> Option<Instant> {
        self.last_frame_at
    }

    /// Acquisition failures since the last good cycle.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Total successfully completed cycles.
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// Access to the sink, e.g. to drain a `MemorySink` after a run.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureConfig, DetectionConfig, Frame, MockCamera};
    use crate::layout::{DividerLine, LotLayout, SpotGroup};
    use crate::pipeline::MemorySink;

    const W: u32 = 60;
    const H: u32 = 20;

    /// Three vertical divider lines across a 60x20 frame: two 20x10 spots.
    fn small_layout() -> LotLayout {
        LotLayout {
            lines: (0..3)
                .map(|i| DividerLine::new(20 * i, 5, 20 * i, 15))
                .collect(),
            groups: vec![SpotGroup::new(0, 3)],
        }
    }

    fn build_pipeline(frames: Vec<Vec<u8>>) -> DetectionPipeline<MockCamera, MemorySink> {
        let config = DetectionConfig::default();
        let mut camera = MockCamera::with_frames(frames);
        camera.open(&CaptureConfig::with_dimensions(W, H)).unwrap();

        DetectionPipeline::new(
            camera,
            FrameDifferencer::new(Frame::flat(40, W, H, 0), &config),
            SpotEvaluator::new(&small_layout(), &config),
            MemorySink::new(),
        )
    }

    #[test]
    fn test_static_scene_matches_reference_all_empty() {
        let mut pipeline = build_pipeline(vec![vec![40u8; (W * H) as usize]]);
        assert!(pipeline.last_frame_at().is_none());

        let state = pipeline.run_cycle().unwrap();
        assert_eq!(state.code_string(), "11");
        assert_eq!(pipeline.cycles_completed(), 1);
        assert!(pipeline.last_frame_at().is_some());
    }

    #[test]
    fn test_changed_scene_all_full() {
        let mut pipeline = build_pipeline(vec![vec![200u8; (W * H) as usize]]);

        let state = pipeline.run_cycle().unwrap();
        assert_eq!(state.code_string(), "00");
    }

    #[test]
    fn test_classification_stable_across_cycles() {
        // A static scene must classify identically on cycle 1 and cycle N;
        // the reference is smoothed once at load, never degraded in place.
        let scene = vec![40u8; (W * H) as usize];
        let mut pipeline = build_pipeline(vec![scene; 10]);

        let mut snapshots = Vec::new();
        for _ in 0..10 {
            snapshots.push(pipeline.run_cycle().unwrap().clone());
        }

        for later in &snapshots[1..] {
            assert_eq!(later.states(), snapshots[0].states());
        }
        assert_eq!(pipeline.sink().len(), 10);
    }

    #[test]
    fn test_acquisition_failure_keeps_last_known_good() {
        // Second queued frame has the wrong size, so capture fails.
        let good = vec![40u8; (W * H) as usize];
        let mut pipeline = build_pipeline(vec![good, vec![0u8; 3]]);

        let first = pipeline.run_cycle().unwrap().clone();

        let err = pipeline.run_cycle().unwrap_err();
        assert!(matches!(err, PipelineError::Acquisition(_)));
        assert!(!err.is_fatal());
        assert_eq!(pipeline.consecutive_failures(), 1);
        assert_eq!(pipeline.last_state(), Some(&first));
        // The good frame's capture time survives the failure, so the
        // staleness warning can report how old the vector is
        assert!(pipeline.last_frame_at().is_some());

        // Nothing new was published for the failed cycle
        assert_eq!(pipeline.sink().len(), 1);
    }

    #[test]
    fn test_run_completes_requested_cycles() {
        let mut pipeline = build_pipeline(vec![vec![40u8; (W * H) as usize]; 3]);
        let running = AtomicBool::new(true);

        pipeline
            .run(Some(3), Duration::from_millis(0), &running)
            .unwrap();

        assert_eq!(pipeline.cycles_completed(), 3);
        assert_eq!(pipeline.sink().len(), 3);
    }

    #[test]
    fn test_run_stops_on_cleared_flag() {
        let mut pipeline = build_pipeline(Vec::new());
        let running = AtomicBool::new(false);

        pipeline
            .run(None, Duration::from_millis(0), &running)
            .unwrap();

        assert_eq!(pipeline.cycles_completed(), 0);
    }

    #[test]
    fn test_fatal_detection_error_aborts_run() {
        // Evaluator built against a layout wider than the camera frame:
        // the span bounds check must abort the loop, not spin.
        let config = DetectionConfig::default();
        let mut camera = MockCamera::new();
        camera.open(&CaptureConfig::with_dimensions(W, H)).unwrap();

        let wide_layout = LotLayout {
            lines: vec![
                DividerLine::new(0, 0, 0, H),
                DividerLine::new(W + 50, 0, W + 50, H),
            ],
            groups: vec![SpotGroup::new(0, 2)],
        };

        let mut pipeline = DetectionPipeline::new(
            camera,
            FrameDifferencer::new(Frame::flat(128, W, H, 0), &config),
            SpotEvaluator::new(&wide_layout, &config),
            MemorySink::new(),
        );

        let running = AtomicBool::new(true);
        let err = pipeline
            .run(Some(5), Duration::from_millis(0), &running)
            .unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(pipeline.cycles_completed(), 0);
    }
}
