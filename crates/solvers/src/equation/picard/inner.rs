/// Absolute tolerances of the inner Newton solves, one per subsystem.
///
/// Empty until the first outer iteration records them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InnerTolerances {
    atols: Option<Vec<f64>>,
}

impl InnerTolerances {
    /// Creates an empty set of tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded tolerances, if any.
    #[must_use]
    pub fn get(&self) -> Option<&[f64]> {
        self.atols.as_deref()
    }

    /// Records `norm * scale` per subsystem unless already recorded.
    ///
    /// A zero initial residual falls back to `scale` itself.
    // TODO: decide whether a zero initial residual should be reported to the
    // caller instead of silently reusing the configured tolerance.
    pub(super) fn record(&mut self, norms: &[f64], scale: f64) {
        if self.atols.is_some() {
            return;
        }
        let atols = norms
            .iter()
            .map(|&norm| if norm == 0.0 { scale } else { norm * scale })
            .collect();
        self.atols = Some(atols);
    }

    /// Returns the tolerance for subsystem `index`.
    pub(super) fn atol(&self, index: usize) -> f64 {
        self.atols
            .as_ref()
            .and_then(|atols| atols.get(index).copied())
            .unwrap_or(0.0)
    }
}
