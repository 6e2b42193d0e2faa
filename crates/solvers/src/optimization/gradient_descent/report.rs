use std::fmt;

/// Final statistics of a gradient descent run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    /// Number of completed iterations.
    pub iterations: usize,

    /// Objective at the final controls.
    pub objective: f64,

    /// Final gradient norm relative to iteration 0.
    pub relative_norm: f64,

    /// Total state solves, including line search trials.
    pub state_solves: usize,

    /// Total adjoint solves.
    pub adjoint_solves: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Statistics --- Total iterations: {:4} --- Final objective value:  {} --- Final gradient norm:  {} (rel)",
            self.iterations,
            Sci(self.objective),
            Sci(self.relative_norm),
        )?;
        write!(
            f,
            "           --- State equations solved: {} --- Adjoint equations solved: {}",
            self.state_solves, self.adjoint_solves,
        )
    }
}

/// Scientific notation with three decimals and a signed two-digit exponent.
///
/// Renders `1.23456e-5` as `1.235e-05`, where `{:.3e}` alone would give
/// `1.235e-5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sci(pub f64);

impl fmt::Display for Sci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("nan");
        }
        if value.is_infinite() {
            return f.write_str(if value > 0.0 { "inf" } else { "-inf" });
        }

        let formatted = format!("{value:.3e}");
        let Some((mantissa, exponent)) = formatted.split_once('e') else {
            return f.write_str(&formatted);
        };
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        write!(f, "{mantissa}e{sign}{digits:0>2}")
    }
}
