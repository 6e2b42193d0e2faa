/// Control actions supported by the Picard solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the outer iteration early and keep the current iterates.
    StopEarly,
}
