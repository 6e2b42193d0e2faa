//! Recording observer for solver convergence histories.
//!
//! See [`HistoryObserver`] and [`Traceable`] for usage.

use std::io;

use pdeopt_core::Observer;
use pdeopt_solvers::{
    equation::{newton, picard},
    optimization::{gradient_descent, line_search},
};

/// Extracts traced values from a solver event.
///
/// Return `None` from [`x`][Traceable::x] to skip the event entirely; return
/// `None` in a trace slot to skip that trace for the event.
///
/// Implemented for the events of every solver in `pdeopt-solvers`:
///
/// | event | x | traces |
/// |---|---|---|
/// | `newton::Event` | `iter` | residual |
/// | `picard::Event` | `iter` | residual, relative residual |
/// | `line_search::Event` | `trial` | objective, threshold |
/// | `gradient_descent::Event` | `iteration` | objective, relative gradient norm |
pub trait Traceable<const N: usize> {
    /// The x value for this event, or `None` to skip recording entirely.
    fn x(&self) -> Option<f64>;

    /// The y values for each trace.
    fn traces(&self) -> [Option<f64>; N];
}

/// An observer that collects named traces while a solver runs.
///
/// The const generic `N` is the number of traces. Record data either by
/// passing `&mut HistoryObserver` to a solver whose event implements
/// [`Traceable<N>`][Traceable], or by calling [`record`][Self::record] from a
/// closure observer.
///
/// # Example
///
/// ```ignore
/// let mut history = HistoryObserver::<2>::new(["objective", "gradient (rel)"]);
/// gradient_descent::minimize(&mut problem, &config, &mut history)?;
/// history.write_csv(std::io::stdout())?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryObserver<const N: usize> {
    names: [String; N],
    data: [Vec<[f64; 2]>; N],
}

impl<const N: usize> HistoryObserver<N> {
    /// Creates a new `HistoryObserver` with the given trace names.
    #[must_use]
    pub fn new(names: [&str; N]) -> Self {
        Self {
            names: names.map(str::to_owned),
            data: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Records a single data point across all traces.
    ///
    /// For each trace slot, `None` skips recording for that trace while
    /// leaving other traces unaffected.
    pub fn record(&mut self, x: f64, traces: [Option<f64>; N]) {
        for (i, y) in traces.into_iter().enumerate() {
            if let Some(y) = y {
                self.data[i].push([x, y]);
            }
        }
    }

    /// Returns the trace names.
    #[must_use]
    pub fn names(&self) -> &[String; N] {
        &self.names
    }

    /// Returns the `(x, y)` points of the trace called `name`.
    #[must_use]
    pub fn trace(&self, name: &str) -> Option<&[[f64; 2]]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.data[i].as_slice())
    }

    /// Returns the last recorded value of the trace called `name`.
    #[must_use]
    pub fn last(&self, name: &str) -> Option<f64> {
        self.trace(name)?.last().map(|[_, y]| *y)
    }

    /// Writes all traces as `trace,x,y` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_csv<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "trace,x,y")?;
        for (name, points) in self.names.iter().zip(&self.data) {
            for [x, y] in points {
                writeln!(writer, "{name},{x},{y:e}")?;
            }
        }
        Ok(())
    }
}

impl<const N: usize, E, A> Observer<E, A> for HistoryObserver<N>
where
    E: Traceable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if let Some(x) = event.x() {
            self.record(x, event.traces());
        }
        None
    }
}

/// Allows `&mut HistoryObserver<N>` to be passed to solvers that take an
/// observer by value, so the history can be inspected after the solve.
impl<const N: usize, E, A> Observer<E, A> for &mut HistoryObserver<N>
where
    E: Traceable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}

#[allow(clippy::cast_precision_loss)]
fn index(i: usize) -> Option<f64> {
    Some(i as f64)
}

impl Traceable<1> for newton::Event {
    fn x(&self) -> Option<f64> {
        index(self.iter)
    }

    fn traces(&self) -> [Option<f64>; 1] {
        [Some(self.residual)]
    }
}

impl Traceable<2> for picard::Event {
    fn x(&self) -> Option<f64> {
        index(self.iter)
    }

    fn traces(&self) -> [Option<f64>; 2] {
        [Some(self.residual), Some(self.relative)]
    }
}

impl Traceable<2> for line_search::Event {
    fn x(&self) -> Option<f64> {
        index(self.trial)
    }

    fn traces(&self) -> [Option<f64>; 2] {
        [Some(self.objective), Some(self.threshold)]
    }
}

impl Traceable<2> for gradient_descent::Event {
    fn x(&self) -> Option<f64> {
        index(self.iteration)
    }

    fn traces(&self) -> [Option<f64>; 2] {
        [Some(self.objective), Some(self.relative_norm)]
    }
}
