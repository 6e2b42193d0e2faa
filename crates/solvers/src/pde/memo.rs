/// Tracks whether a solution is valid and how often it was computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Memo {
    has_solution: bool,
    number_of_solves: usize,
}

impl Memo {
    /// Creates an invalid memo with no solves.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the stored solution is valid.
    #[must_use]
    pub fn has_solution(&self) -> bool {
        self.has_solution
    }

    /// Returns the number of solves performed so far.
    #[must_use]
    pub fn number_of_solves(&self) -> usize {
        self.number_of_solves
    }

    /// Marks the stored solution as stale.
    pub fn invalidate(&mut self) {
        self.has_solution = false;
    }

    /// Marks a completed solve.
    pub fn mark_solved(&mut self) {
        self.has_solution = true;
        self.number_of_solves += 1;
    }
}
