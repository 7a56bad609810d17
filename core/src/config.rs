/// Documents scoring at or below this are dropped from vector results.
pub const MINIMUM_SCORE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub min_score: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { min_score: MINIMUM_SCORE }
    }
}

impl EngineConfig {
    pub fn with_min_score(min_score: f64) -> anyhow::Result<Self> {
        if !min_score.is_finite() || min_score < 0.0 {
            anyhow::bail!("min score must be a non-negative number, got {min_score}");
        }
        Ok(Self { min_score })
    }
}
