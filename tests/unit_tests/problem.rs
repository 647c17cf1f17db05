use mechanochem::boundary::{BoundaryConditionError, BoundaryConditions};
use mechanochem::fields::{SolutionScalars, SolutionVectors};
use mechanochem::nalgebra::{Point2, Vector2, U2};
use mechanochem::parameters::{ProblemContext, ProblemSettings};
use mechanochem::problem::{ProblemDefinition, StepOutcome};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Only defines parameters and relies on every default hook.
struct Minimal;

impl ProblemDefinition<U2> for Minimal {
    fn define_parameters(&self) -> ProblemSettings {
        ProblemSettings {
            dt: 0.25,
            vector_solution_fields: vec!["u".to_string()],
            ..ProblemSettings::default()
        }
    }
}

/// Pulls the upper side along the first axis with the load scale.
struct Pull;

impl ProblemDefinition<U2> for Pull {
    fn define_parameters(&self) -> ProblemSettings {
        ProblemSettings {
            u_dirichlet: 2.0,
            vector_solution_fields: vec!["u".to_string()],
            ..ProblemSettings::default()
        }
    }

    fn boundary_conditions(
        &self,
        ctx: &ProblemContext,
        scale: f64,
        bcs: &mut BoundaryConditions,
    ) -> Result<(), BoundaryConditionError> {
        bcs.set_boundary_value(0, 0, 0, 0.0)?;
        bcs.set_boundary_value(0, 1, 0, scale * ctx.settings.u_dirichlet)
    }

    fn load_scale(&self, ctx: &ProblemContext) -> f64 {
        ctx.time / ctx.settings.total_time
    }
}

#[test]
fn default_hooks_leave_the_problem_unchanged() {
    let ctx = ProblemContext::new(Minimal.define_parameters());
    let mut bcs = BoundaryConditions::new(2, ctx.settings.dofs_per_node());
    Minimal.load_step(&ctx, &mut bcs).unwrap();
    assert!(bcs.is_empty());

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let x = Point2::new(0.5, 0.5);
    assert_eq!(Minimal.scalar_initial_condition(&x, 0, &ctx, &mut rng), 0.0);
    assert_eq!(Minimal.vector_initial_condition(&x, 0, &ctx, &mut rng), Vector2::zeros());

    let outcome = StepOutcome {
        converged: false,
        iterations: 50,
    };
    assert_eq!(Minimal.adaptive_time_step(&ctx, &outcome), 0.25);

    let projections = Minimal.project_fields(
        &x,
        &SolutionScalars::<f64, U2>::empty(),
        &SolutionVectors::<f64, U2>::empty(),
        &ctx,
    );
    assert!(projections.scalars.is_empty());
    assert!(projections.vectors.is_empty());
}

#[test]
fn load_step_is_deterministic_in_time() {
    let settings = Pull.define_parameters();
    let ctx = ProblemContext::new(settings).at_step(3, 0.5, 0.1);

    let mut first = BoundaryConditions::new(2, 2);
    Pull.load_step(&ctx, &mut first).unwrap();
    let mut second = first.clone();
    Pull.load_step(&ctx, &mut second).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.boundary_value(0, 1, 0).unwrap(), Some(1.0));

    let later = ctx.at_step(4, 1.0, 0.1);
    Pull.load_step(&later, &mut second).unwrap();
    assert_eq!(second.boundary_value(0, 1, 0).unwrap(), Some(2.0));
    assert_eq!(second.len(), 2);
}

#[test]
fn context_starts_at_restart_point() {
    let settings = ProblemSettings {
        restart_iteration: 12,
        restart_time: 1.5,
        dt: 0.3,
        ..ProblemSettings::default()
    };
    let ctx = ProblemContext::new(settings);
    assert_eq!(ctx.step, 12);
    assert_eq!(ctx.time, 1.5);
    assert_eq!(ctx.dt, 0.3);
    assert_eq!(ctx.dim(), 2);
}
