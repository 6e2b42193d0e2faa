/// Control actions supported by the line search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Abandon the search and restore the original controls.
    StopEarly,
}
