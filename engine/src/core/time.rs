use std::time::{Duration, Instant};

/// Nanoseconds per fixed step at 60 frames per second.
pub const SIXTY_FPS: u64 = 16_666_666;

/// A Time value represents a specific amount of elapsed wall time within the
/// simulation loop. Each frame captures total elapsed time as well as the
/// delta time since the last frame. New values are intended to be generated
/// from a previous one using `next()` on each iteration of the game loop; the
/// accumulator gates fixed simulation ticks at the configured step.
#[derive(Debug, Copy, Clone)]
pub struct Time {
    // The instant when this frame was created
    instant: Instant,
    pub fixed_time_step: u64,
    /// The time delta since the last frame
    pub delta: Duration,
    /// The total elapsed time since the first frame
    pub time: Duration,
    /// The total elapsed time since the first frame but incremented by the fixed time step
    pub fixed_time: Duration,
    /// An accumulator for fixed time step calculations
    accumulator: u64,
}

impl Time {
    /// Construct a new `Time` with delta and time set to `0`. Caller must
    /// provide a fixed time step in nanoseconds.
    pub fn new(fixed_time_step: u64) -> Self {
        Self {
            fixed_time_step,
            instant: Instant::now(),
            delta: Duration::ZERO,
            time: Duration::ZERO,
            fixed_time: Duration::ZERO,
            accumulator: 0,
        }
    }

    /// Consume one fixed step from the accumulator.
    pub fn increment_fixed(&mut self) {
        self.fixed_time += Duration::from_nanos(self.fixed_time_step);
        self.accumulator -= self.fixed_time_step;
    }

    /// Create the next frame time from an existing one. This captures the
    /// delta from the last frame and updates the cumulative time.
    pub fn next(self) -> Self {
        let delta = self.instant.elapsed();
        Self {
            fixed_time_step: self.fixed_time_step,
            instant: Instant::now(),
            delta,
            time: self.time + delta,
            fixed_time: self.fixed_time,
            accumulator: self.accumulator + delta.as_nanos() as u64,
        }
    }

    /// Determine whether this frame has accumulated enough delta for a fixed step.
    pub fn has_fixed(&self) -> bool {
        self.accumulator >= self.fixed_time_step
    }
}

#[test]
fn accumulates_fixed_steps() {
    // Given
    let time = Time::new(1); // 1ns step, any real delta covers it

    // When
    let mut time = time.next();

    // Then
    assert!(time.has_fixed());

    // When - consume one step
    time.increment_fixed();

    // Then
    assert_eq!(time.fixed_time, Duration::from_nanos(1));
}
