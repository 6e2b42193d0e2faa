/// Control actions supported by gradient descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop with the current controls.
    StopEarly,
}
