//! Frame-rate measurement and adaptive quality.
//!
//! The governor works on millisecond timestamps handed in by the caller. It
//! never touches the renderer itself; after any change the engine pushes
//! [`PerformanceGovernor::settings`] to the surface and physics.

use physics::DEFAULT_PHYSICS_HZ;

/// Length of one FPS measurement window.
pub const FPS_WINDOW_MS: f64 = 1000.0;
/// Minimum spacing between automatic adjustments.
pub const ADJUST_INTERVAL_MS: f64 = 1000.0;
/// Distance from the target before the governor reacts.
pub const FPS_MARGIN: u32 = 5;
pub const RENDER_SCALE_STEP: f32 = 0.25;
pub const MIN_RENDER_SCALE: f32 = 0.5;
pub const MAX_RENDER_SCALE: f32 = 1.0;
/// Render scale at or below which shadows are switched off.
pub const SHADOW_CUTOFF_SCALE: f32 = 0.75;
pub const LOW_PERF_PHYSICS_HZ: f32 = 15.0;

/// Quality knobs the governor controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySettings {
    pub render_scale: f32,
    pub shadows_enabled: bool,
    pub physics_hz: f32,
}

impl QualitySettings {
    pub fn full(physics_hz: f32) -> Self {
        Self {
            render_scale: MAX_RENDER_SCALE,
            shadows_enabled: true,
            physics_hz,
        }
    }

    fn low_perf() -> Self {
        Self {
            render_scale: MIN_RENDER_SCALE,
            shadows_enabled: false,
            physics_hz: LOW_PERF_PHYSICS_HZ,
        }
    }
}

#[derive(Debug)]
pub struct PerformanceGovernor {
    target_fps: u32,
    auto_enabled: bool,
    settings: QualitySettings,
    manual_low_perf: bool,
    /// Settings in force before manual low-performance mode was switched on.
    saved: Option<QualitySettings>,
    frame_count: u32,
    window_start_ms: f64,
    last_adjust_ms: f64,
    last_fps: Option<u32>,
}

impl PerformanceGovernor {
    pub fn new(target_fps: u32, physics_hz: f32, auto_enabled: bool) -> Self {
        Self {
            target_fps,
            auto_enabled,
            settings: QualitySettings::full(physics_hz),
            manual_low_perf: false,
            saved: None,
            frame_count: 0,
            window_start_ms: 0.0,
            last_adjust_ms: 0.0,
            last_fps: None,
        }
    }

    /// Count one frame. Returns the measured FPS whenever a window closes.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<u32> {
        self.frame_count += 1;
        let elapsed = now_ms - self.window_start_ms;
        if elapsed < FPS_WINDOW_MS {
            return None;
        }
        let fps = (self.frame_count as f64 * 1000.0 / elapsed).round() as u32;
        self.frame_count = 0;
        self.window_start_ms = now_ms;
        self.last_fps = Some(fps);
        Some(fps)
    }

    /// Step render scale toward the target frame rate. Returns true if the
    /// settings changed.
    pub fn adjust_quality(&mut self, fps: u32, now_ms: f64) -> bool {
        if now_ms - self.last_adjust_ms < ADJUST_INTERVAL_MS {
            return false;
        }
        self.last_adjust_ms = now_ms;
        if self.manual_low_perf || !self.auto_enabled {
            return false;
        }

        let scale = self.settings.render_scale;
        if fps < self.target_fps.saturating_sub(FPS_MARGIN) && scale > MIN_RENDER_SCALE {
            self.settings.render_scale = (scale - RENDER_SCALE_STEP).max(MIN_RENDER_SCALE);
            if self.settings.render_scale <= SHADOW_CUTOFF_SCALE {
                self.settings.shadows_enabled = false;
            }
            log::info!(
                "Performance: low FPS {} -> render scale {}",
                fps,
                self.settings.render_scale
            );
            true
        } else if fps > self.target_fps + FPS_MARGIN && scale < MAX_RENDER_SCALE {
            self.settings.render_scale = (scale + RENDER_SCALE_STEP).min(MAX_RENDER_SCALE);
            if self.settings.render_scale >= MAX_RENDER_SCALE {
                self.settings.shadows_enabled = true;
            }
            log::info!(
                "Performance: good FPS {} -> render scale {}",
                fps,
                self.settings.render_scale
            );
            true
        } else {
            false
        }
    }

    /// Force minimum fidelity, or restore what was in force before.
    pub fn set_manual_low_perf(&mut self, enabled: bool) {
        if enabled {
            if self.manual_low_perf {
                return;
            }
            self.saved = Some(self.settings);
            self.settings = QualitySettings::low_perf();
            log::info!(
                "Manual low-perf mode ENABLED: render scale {}, shadows off, physics {} Hz",
                MIN_RENDER_SCALE,
                LOW_PERF_PHYSICS_HZ
            );
        } else {
            self.settings = self
                .saved
                .take()
                .unwrap_or_else(|| QualitySettings::full(DEFAULT_PHYSICS_HZ));
            log::info!("Manual low-perf mode DISABLED: restored {:?}", self.settings);
        }
        self.manual_low_perf = enabled;
    }

    pub fn toggle_manual_low_perf(&mut self) {
        self.set_manual_low_perf(!self.manual_low_perf);
    }

    pub fn settings(&self) -> QualitySettings {
        self.settings
    }

    pub fn last_fps(&self) -> Option<u32> {
        self.last_fps
    }
}
