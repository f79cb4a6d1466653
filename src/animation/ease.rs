/// Easing functions used to map normalized wave progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quintic ease-in.
    InQuint,
    /// Quintic ease-out.
    OutQuint,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InQuint => t.powi(5),
            Self::OutQuint => 1.0 - (1.0 - t).powi(5),
        }
    }

    /// The ease whose curve is this one reflected through `(0.5, 0.5)`.
    ///
    /// `e.mirrored().apply(t) == 1.0 - e.apply(1.0 - t)`.
    pub fn mirrored(self) -> Self {
        match self {
            Self::InQuad => Self::OutQuad,
            Self::OutQuad => Self::InQuad,
            Self::InQuint => Self::OutQuint,
            Self::OutQuint => Self::InQuint,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
