/// Shortlist scoring weights. All four signals carry equal weight; the
/// weighted sum is scaled by [`MAX_SCORE`] to produce the persisted score.
pub const SCOUT_WEIGHTS: Weights = Weights {
    dollars: 0.25,
    matched_skills: 0.25,
    portfolio: 0.25,
    recommended: 0.25,
};

/// Upper bound of the persisted score.
pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub dollars: f64,
    pub matched_skills: f64,
    pub portfolio: f64,
    pub recommended: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.dollars + self.matched_skills + self.portfolio + self.recommended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        assert!((SCOUT_WEIGHTS.sum() - 1.0).abs() < 1e-9);
    }
}
