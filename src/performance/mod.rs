//! # Frame Statistics
//!
//! Frame time tracking for the viewer loop, plus per-frame draw statistics
//! reported by the render backend.
//!
//! ## Usage
//!
//! ```rust
//! use thistle::performance::FrameStats;
//!
//! let mut stats = FrameStats::new(120);
//!
//! // In your main loop
//! stats.begin_frame();
//! // ... update and render ...
//! stats.end_frame();
//!
//! stats.log_summary();
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Averaged timing and render counters
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMetrics {
    /// Frames per second implied by the mean frame time
    pub fps: f32,
    /// Mean frame time over the window, in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    /// Number of primitive sets drawn in the last frame
    pub draw_calls: u32,
    /// Number of vertices submitted in the last frame
    pub vertex_count: u32,
    /// Total frames measured since the last reset
    pub frames: u64,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            draw_calls: 0,
            vertex_count: 0,
            frames: 0,
        }
    }
}

/// Rolling frame timer
pub struct FrameStats {
    samples: VecDeque<Duration>,
    window: usize,
    started_at: Option<Instant>,
    metrics: FrameMetrics,
}

fn millis(d: Duration) -> f32 {
    d.as_secs_f32() * 1000.0
}

impl FrameStats {
    /// Average over the last `window` frames
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            started_at: None,
            metrics: FrameMetrics::default(),
        }
    }

    pub fn begin_frame(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Close the frame opened by [`begin_frame`](Self::begin_frame); no-op without one
    pub fn end_frame(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.record_frame_time(started_at.elapsed());
        }
    }

    pub fn record_frame_time(&mut self, frame_time: Duration) {
        while self.samples.len() >= self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(frame_time);
        self.metrics.frames += 1;

        let mean = self.samples.iter().sum::<Duration>() / self.samples.len() as u32;
        let m = &mut self.metrics;
        m.frame_time_ms = millis(mean);
        m.fps = if m.frame_time_ms > 0.0 { 1000.0 / m.frame_time_ms } else { 0.0 };
        m.min_frame_time_ms = self.samples.iter().copied().min().map_or(0.0, millis);
        m.max_frame_time_ms = self.samples.iter().copied().max().map_or(0.0, millis);
    }

    /// Counters reported by the render backend for the last frame
    pub fn update_render_stats(&mut self, draw_calls: u32, vertex_count: u32) {
        self.metrics.draw_calls = draw_calls;
        self.metrics.vertex_count = vertex_count;
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    /// Frame times in milliseconds, oldest first
    pub fn frame_time_history(&self) -> Vec<f32> {
        self.samples.iter().copied().map(millis).collect()
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.window);
    }

    pub fn log_summary(&self) {
        let m = &self.metrics;
        log::info!(
            "{} frames, {:.1} fps avg ({:.2}ms, min {:.2}ms, max {:.2}ms), {} draws / {} vertices last frame",
            m.frames,
            m.fps,
            m.frame_time_ms,
            if m.frames == 0 { 0.0 } else { m.min_frame_time_ms },
            m.max_frame_time_ms,
            m.draw_calls,
            m.vertex_count
        );
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}
