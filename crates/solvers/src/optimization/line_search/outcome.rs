/// How a line search ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A step satisfied the sufficient decrease condition.
    Accepted {
        stepsize: f64,
        objective: f64,
        trials: usize,
    },

    /// No acceptable step was found and the controls were restored.
    Broken { stepsize: f64, trials: usize },
}

impl Outcome {
    /// Returns `true` if the search broke down.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        matches!(self, Self::Broken { .. })
    }

    /// Returns the step size of the last trial.
    #[must_use]
    pub fn stepsize(&self) -> f64 {
        match self {
            Self::Accepted { stepsize, .. } | Self::Broken { stepsize, .. } => *stepsize,
        }
    }
}
