/// Fixed timestep accumulator.
/// Behaviours assume one `Update` per fixed step, so movement speed is
/// independent of the host's frame rate.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    /// Upper bound on steps returned by a single `accumulate` call.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self::with_max_steps(dt, 10)
    }

    pub fn with_max_steps(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    /// Time beyond `max_steps` worth is dropped (a stalled tab must not
    /// replay seconds of held keys on resume).
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any partial step, e.g. after loading a new level.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
