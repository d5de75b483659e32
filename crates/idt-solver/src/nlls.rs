//! Levenberg-Marquardt nonlinear least squares.
//!
//! The matrix fit needs a small, deterministic NLLS driver: residuals are
//! differentiated exactly (forward-mode dual numbers, see
//! [`idt_math::Dual`]), each trial step solves the damped least-squares
//! system through a dense QR factorisation, and damping adapts on
//! acceptance/rejection of the step.
//!
//! The default tolerances are deliberately tighter than `f64` resolution;
//! in practice the driver runs until steps stall at machine precision or
//! the iteration cap is reached, which is the intended behaviour for the
//! colour fits this crate performs.

use idt_math::{Dual, Real};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

/// Options controlling the Levenberg-Marquardt loop.
#[derive(Debug, Clone, Copy)]
pub struct NllsOptions {
    /// Relative step-size threshold for declaring convergence.
    pub parameter_tolerance: f64,
    /// Relative cost-change threshold for declaring convergence.
    pub function_tolerance: f64,
    /// Smallest accepted step norm.
    pub min_step: f64,
    /// Iteration cap (one Jacobian evaluation per iteration).
    pub max_iterations: usize,
}

impl Default for NllsOptions {
    fn default() -> Self {
        Self {
            parameter_tolerance: 1e-17,
            function_tolerance: 1e-17,
            min_step: 1e-17,
            max_iterations: 300,
        }
    }
}

/// Outcome of an NLLS solve.
#[derive(Debug, Clone, Copy)]
pub struct NllsSummary {
    /// Number of accepted steps.
    pub successful_steps: usize,
    /// Number of outer iterations performed.
    pub iterations: usize,
    /// Cost (0.5 * sum of squared residuals) at the initial point.
    pub initial_cost: f64,
    /// Cost at the final point.
    pub final_cost: f64,
    /// True if a tolerance was met (as opposed to stalling or hitting
    /// the iteration cap).
    pub converged: bool,
}

impl NllsSummary {
    /// True if the minimiser made at least one successful step.
    pub fn is_success(&self) -> bool {
        self.successful_steps > 0
    }
}

/// A residual vector function, evaluable over any [`Real`] scalar.
///
/// Implementations must return the same number of residuals for every
/// parameter value; the scalar genericity is what lets the driver extract
/// exact derivatives.
pub trait ResidualFn<const N: usize> {
    /// Evaluates the residual vector at `params`.
    fn residuals<T: Real>(&self, params: &[T; N]) -> Vec<T>;
}

fn cost_of(residuals: &[f64]) -> f64 {
    0.5 * residuals.iter().map(|r| r * r).sum::<f64>()
}

fn eval_f64<const N: usize>(f: &impl ResidualFn<N>, params: &[f64; N]) -> Vec<f64> {
    f.residuals(params)
}

/// Evaluates residuals and the Jacobian in one differentiated pass.
fn eval_jacobian<const N: usize>(
    f: &impl ResidualFn<N>,
    params: &[f64; N],
) -> (DVector<f64>, DMatrix<f64>) {
    let mut seeded = [Dual::<N>::constant(0.0); N];
    for (i, (slot, &p)) in seeded.iter_mut().zip(params.iter()).enumerate() {
        *slot = Dual::variable(p, i);
    }

    let duals = f.residuals(&seeded);
    let m = duals.len();

    let residuals = DVector::from_fn(m, |k, _| duals[k].re);
    let jacobian = DMatrix::from_fn(m, N, |k, j| duals[k].eps[j]);

    (residuals, jacobian)
}

/// Solves the damped least-squares system
/// `[J; sqrt(lambda) I] step = [-r; 0]` by dense QR.
fn damped_step(
    jacobian: &DMatrix<f64>,
    residuals: &DVector<f64>,
    lambda: f64,
) -> Option<DVector<f64>> {
    let m = jacobian.nrows();
    let n = jacobian.ncols();
    let sqrt_lambda = lambda.sqrt();

    let mut augmented = DMatrix::zeros(m + n, n);
    augmented.view_mut((0, 0), (m, n)).copy_from(jacobian);
    for i in 0..n {
        augmented[(m + i, i)] = sqrt_lambda;
    }

    let mut rhs = DVector::zeros(m + n);
    rhs.rows_mut(0, m).copy_from(&residuals.map(|v| -v));

    let qr = augmented.qr();
    let qtb = qr.q().transpose() * rhs;
    qr.r().solve_upper_triangular(&qtb)
}

/// Minimises the sum of squared residuals of `f` starting from `params`.
///
/// On return `params` holds the best point found. The fit is considered
/// successful when at least one step was accepted
/// ([`NllsSummary::is_success`]).
pub fn solve<const N: usize>(
    f: &impl ResidualFn<N>,
    params: &mut [f64; N],
    options: &NllsOptions,
) -> NllsSummary {
    let mut x = *params;
    let mut cost = cost_of(&eval_f64(f, &x));

    let mut summary = NllsSummary {
        successful_steps: 0,
        iterations: 0,
        initial_cost: cost,
        final_cost: cost,
        converged: false,
    };

    let mut lambda = 1e-4;
    const LAMBDA_MAX: f64 = 1e16;

    'outer: while summary.iterations < options.max_iterations {
        summary.iterations += 1;

        let (r, jacobian) = eval_jacobian(f, &x);

        // Retry the trial step with growing damping until it reduces the
        // cost or the damping saturates.
        loop {
            let step = match damped_step(&jacobian, &r, lambda) {
                Some(step) => step,
                None => {
                    lambda *= 10.0;
                    if lambda > LAMBDA_MAX {
                        break 'outer;
                    }
                    continue;
                }
            };

            let mut x_new = x;
            for (xi, si) in x_new.iter_mut().zip(step.iter()) {
                *xi += si;
            }

            let residuals_new = eval_f64(f, &x_new);
            let cost_new = cost_of(&residuals_new);

            if cost_new < cost {
                let step_norm = step.norm();
                let x_norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
                let cost_change = cost - cost_new;

                x = x_new;
                summary.successful_steps += 1;
                lambda = (lambda * 0.5).max(1e-12);

                trace!(
                    iteration = summary.iterations,
                    cost = cost_new,
                    step_norm,
                    "accepted step"
                );

                let converged = cost_change <= options.function_tolerance * cost
                    || step_norm <= options.parameter_tolerance * (x_norm + options.parameter_tolerance)
                    || step_norm <= options.min_step;
                cost = cost_new;

                if converged {
                    summary.converged = true;
                    break 'outer;
                }
                break;
            }

            lambda *= 10.0;
            if lambda > LAMBDA_MAX {
                // No descent direction at working precision.
                break 'outer;
            }
        }
    }

    summary.final_cost = cost;
    *params = x;

    debug!(
        iterations = summary.iterations,
        successful_steps = summary.successful_steps,
        initial_cost = summary.initial_cost,
        final_cost = summary.final_cost,
        converged = summary.converged,
        "nlls solve finished"
    );

    summary
}
