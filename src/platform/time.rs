//! Wall-clock time in milliseconds

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Frames counted per wall-clock second
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    frames: u32,
    window_start_ms: f64,
    fps: u32,
}

impl FpsCounter {
    pub fn new(now_ms: f64) -> Self {
        Self {
            window_start_ms: now_ms,
            ..Self::default()
        }
    }

    /// Count a frame; the reading updates once a full second has passed
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        self.frames += 1;
        if now_ms - self.window_start_ms >= 1000.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start_ms = now_ms;
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
