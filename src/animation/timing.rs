use crate::{animation::ease::Ease, foundation::core::FrameIndex};

/// Animated sub-frames for a step of `secs` seconds at `fps`: `max(1, round(secs * fps))`.
pub fn frames_for_secs(secs: f64, fps: f64) -> u32 {
    let n = (secs * fps).round();
    if !n.is_finite() || n < 1.0 {
        return 1;
    }
    n.min(f64::from(u32::MAX)) as u32
}

/// Hold frames for `secs` seconds at `fps`: `round(secs * fps)`, possibly zero.
pub fn hold_frames_for_secs(secs: f64, fps: f64) -> u32 {
    let n = (secs * fps).round();
    if !n.is_finite() || n <= 0.0 {
        return 0;
    }
    n.min(f64::from(u32::MAX)) as u32
}

/// Linear progress of sub-frame `i` in a step of `n` sub-frames: `i / max(1, n - 1)`.
pub fn progress(i: u32, n: u32) -> f64 {
    let denom = n.saturating_sub(1).max(1);
    (f64::from(i) / f64::from(denom)).clamp(0.0, 1.0)
}

/// Per-frame sampling context handed to overlay rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameCtx {
    /// Absolute index inside the output artifact.
    pub index: FrameIndex,
    /// Index inside the current step, hold frames included.
    pub step_frame: u32,
    /// Animated sub-frames in the current step (hold frames excluded).
    pub step_frames: u32,
    /// Linear progress in `[0, 1]`.
    pub u: f64,
    /// Eased progress in `[0, 1]`.
    pub t: f64,
    /// Whether this frame belongs to the step's trailing hold.
    pub holding: bool,
}

/// Iterates the frames of one step in display order.
#[derive(Clone, Debug)]
pub struct StepClock {
    start: u64,
    animated: u32,
    hold: u32,
    ease: Ease,
    next: u32,
}

impl StepClock {
    pub fn new(start: FrameIndex, animated: u32, hold: u32, ease: Ease) -> Self {
        Self {
            start: start.0,
            animated: animated.max(1),
            hold,
            ease,
            next: 0,
        }
    }

    pub fn total_frames(&self) -> u32 {
        self.animated.saturating_add(self.hold)
    }
}

impl Iterator for StepClock {
    type Item = FrameCtx;

    fn next(&mut self) -> Option<FrameCtx> {
        if self.next >= self.total_frames() {
            return None;
        }
        let i = self.next;
        self.next += 1;

        let holding = i >= self.animated;
        let u = if holding {
            1.0
        } else {
            progress(i, self.animated)
        };
        Some(FrameCtx {
            index: FrameIndex(self.start + u64::from(i)),
            step_frame: i,
            step_frames: self.animated,
            u,
            t: self.ease.apply(u),
            holding,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = (self.total_frames() - self.next) as usize;
        (rem, Some(rem))
    }
}

impl ExactSizeIterator for StepClock {}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
