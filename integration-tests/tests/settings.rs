use approx::assert_relative_eq;
use integration_tests::PoissonControl;
use pdeopt_solvers::{
    OptimizationProblem, Settings,
    optimization::gradient_descent::{self, Status},
    pde::Strategy,
};

const NEWTON: &str = r#"
[StateEquation]
newton_damped = true

[OptimizationRoutine]
tolerance = 1e-4
maximum_iterations = 200
verbose = false
"#;

const PICARD: &str = r#"
[state_equation]
picard_iteration = true
picard_atol = 1e-9

[optimization_routine]
tolerance = 1e-4
maximum_iterations = 200
verbose = false
"#;

fn run(settings: &Settings, fixture: &PoissonControl) -> gradient_descent::Solution {
    let mut problem = OptimizationProblem::from_settings(fixture, fixture, fixture.fields(), settings)
        .expect("valid settings");
    let config = settings.descent_config().expect("valid settings");
    gradient_descent::minimize_unobserved(&mut problem, &config).expect("should converge")
}

#[test]
fn picard_and_newton_settings_reach_the_same_optimum() {
    let fixture = PoissonControl::new(16, 5.0, 0.1);

    let newton = Settings::from_toml(NEWTON).expect("valid toml");
    let picard = Settings::from_toml(PICARD).expect("valid toml");
    assert!(matches!(newton.state_strategy().unwrap(), Strategy::Newton(_)));
    assert!(matches!(picard.state_strategy().unwrap(), Strategy::Picard(_)));

    let newton_solution = run(&newton, &fixture);
    let picard_solution = run(&picard, &fixture);

    assert_eq!(newton_solution.status, Status::Converged);
    assert_eq!(picard_solution.status, Status::Converged);
    assert_relative_eq!(
        newton_solution.report.objective,
        picard_solution.report.objective,
        max_relative = 1e-6
    );
}

#[test]
fn soft_exit_from_settings_reports_iteration_limit() {
    let fixture = PoissonControl::new(16, 0.0, 0.1);
    let settings = Settings::from_toml(
        r#"
        [state_equation]
        is_linear = true

        [optimization_routine]
        tolerance = 0.0
        maximum_iterations = 3
        soft_exit = true
        verbose = false
        "#,
    )
    .expect("valid toml");

    let solution = run(&settings, &fixture);

    assert_eq!(solution.status, Status::MaxIters);
    assert_eq!(solution.report.iterations, 3);
    assert_eq!(solution.report.adjoint_solves, 3);
}
