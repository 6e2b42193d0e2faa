use crate::System;

/// Nodal values of one discretized function.
pub type Field = Vec<f64>;

/// The discretized functions of an optimization problem.
///
/// Each list holds one [`Field`] per control or per subsystem. Solvers mutate
/// these in place: state and adjoint solves overwrite `states` and `adjoints`,
/// line search trial steps overwrite `controls`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    pub controls: Vec<Field>,
    pub states: Vec<Field>,
    pub adjoints: Vec<Field>,
}

impl Fields {
    /// Creates a new set of fields.
    #[must_use]
    pub fn new(controls: Vec<Field>, states: Vec<Field>, adjoints: Vec<Field>) -> Self {
        Self {
            controls,
            states,
            adjoints,
        }
    }

    /// Returns the unknowns of `system`.
    #[must_use]
    pub fn system(&self, system: System) -> &[Field] {
        match system {
            System::State => &self.states,
            System::Adjoint => &self.adjoints,
        }
    }

    /// Returns the unknowns of `system` for in-place updates.
    pub fn system_mut(&mut self, system: System) -> &mut [Field] {
        match system {
            System::State => &mut self.states,
            System::Adjoint => &mut self.adjoints,
        }
    }
}
