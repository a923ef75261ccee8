use crate::{animation::timing::FrameCtx, foundation::math::lerp};

/// Periodic or progress-driven modulation source.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "wave")]
pub enum Wave {
    #[default]
    None,
    /// Follows the step's eased progress.
    Eased,
    /// `0.5 + 0.5 * sin(2*pi * frame / period)` over the absolute frame index.
    Sine { period_frames: u32 },
    /// Rises over the first half of the step and falls back over the second.
    PingPong,
    /// Toggles between 0 and 1 on every absolute frame.
    Alternate,
    /// `sin(pi * u)`: a single bump over the step's linear progress.
    Arc,
}

impl Wave {
    pub fn sample(self, ctx: &FrameCtx) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Eased => ctx.t,
            Self::Sine { period_frames } => {
                let period = f64::from(period_frames.max(1));
                let phase = (ctx.index.0 as f64) / period;
                0.5 + 0.5 * (std::f64::consts::TAU * phase).sin()
            }
            Self::PingPong => 1.0 - (2.0 * ctx.u - 1.0).abs(),
            Self::Alternate => (ctx.index.0 % 2) as f64,
            Self::Arc => (std::f64::consts::PI * ctx.u).sin().max(0.0),
        }
    }
}

/// Border/extent and opacity modulation applied by highlight-like overlays.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pulse {
    #[serde(flatten)]
    pub wave: Wave,
    /// Extra outward growth in pixels at full strength.
    #[serde(default)]
    pub expand: f64,
    /// Opacity multiplier when the wave is at 0 (1 disables opacity modulation).
    #[serde(default = "one")]
    pub alpha_floor: f64,
}

fn one() -> f64 {
    1.0
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            wave: Wave::None,
            expand: 0.0,
            alpha_floor: 1.0,
        }
    }
}

impl Pulse {
    pub fn is_none(&self) -> bool {
        self.wave == Wave::None
    }

    pub fn expand_px(&self, ctx: &FrameCtx) -> f64 {
        self.expand * self.wave.sample(ctx)
    }

    pub fn opacity(&self, ctx: &FrameCtx) -> f64 {
        if self.is_none() {
            return 1.0;
        }
        lerp(self.alpha_floor.clamp(0.0, 1.0), 1.0, self.wave.sample(ctx))
    }
}

/// Opacity ramp across a step.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fade {
    pub from: f64,
    pub to: f64,
    /// Drive by eased progress instead of linear progress.
    #[serde(default)]
    pub eased: bool,
}

impl Default for Fade {
    fn default() -> Self {
        Self::SOLID
    }
}

impl Fade {
    pub const SOLID: Self = Self {
        from: 1.0,
        to: 1.0,
        eased: false,
    };

    pub fn new(from: f64, to: f64, eased: bool) -> Self {
        Self { from, to, eased }
    }

    pub fn is_solid(&self) -> bool {
        *self == Self::SOLID
    }

    pub fn opacity(&self, ctx: &FrameCtx) -> f64 {
        let p = if self.eased { ctx.t } else { ctx.u };
        lerp(self.from, self.to, p).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/pulse.rs"]
mod tests;
