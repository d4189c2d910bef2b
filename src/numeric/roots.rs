//! Root enumeration on a bounded interval
//!
//! The CSTR steady-state balance can admit more than one physical root,
//! and a single Newton iteration from one guess would deterministically
//! miss the others. The strategy here surfaces multiplicity instead:
//!
//! 1. sample the interval at a fixed resolution,
//! 2. bracket every sign change (and catch exact zeros at samples),
//! 3. refine each bracket by bisection to an absolute tolerance.
//!
//! Bisection is used rather than Newton because it cannot leave the
//! bracket, which keeps every refined root inside the physical domain.

use super::Budget;

/// Absolute tolerance to which each bracketed root is refined.
pub const ROOT_TOLERANCE: f64 = 1e-10;

/// Hard cap on bisection iterations per bracket. At 200 halvings the
/// bracket width is far below `ROOT_TOLERANCE` for any domain the engine
/// handles; the cap only guards degenerate floating-point cases.
const MAX_BISECTIONS: usize = 200;

/// Roots found by [`bracketed_roots`].
#[derive(Debug, Clone)]
pub struct RootScan {
    /// Refined roots in ascending order
    pub roots: Vec<f64>,

    /// `true` when the budget ran out mid-scan; `roots` then covers only
    /// the portion of the interval scanned so far
    pub exhausted: bool,
}

/// Enumerate the roots of `f` on `[lo, hi]`.
///
/// The interval is sampled at `intervals + 1` evenly spaced points; each
/// sign change is refined by bisection. Tangent roots that do not change
/// sign between samples are not detected — callers choose `intervals`
/// fine enough for the physics at hand.
pub fn bracketed_roots<F>(
    f: &F,
    lo: f64,
    hi: f64,
    intervals: usize,
    budget: &mut Budget,
) -> RootScan
where
    F: Fn(f64) -> f64,
{
    debug_assert!(hi > lo, "scan interval must be non-empty");
    debug_assert!(intervals >= 1);

    let width = (hi - lo) / intervals as f64;
    let mut roots = Vec::new();

    if !budget.try_consume(1) {
        return RootScan { roots, exhausted: true };
    }
    let mut prev_x = lo;
    let mut prev_y = f(lo);

    for i in 1..=intervals {
        if !budget.try_consume(1) {
            log::warn!("root scan budget exhausted after {i} of {intervals} intervals");
            return RootScan { roots, exhausted: true };
        }

        let x = lo + width * i as f64;
        let y = f(x);

        if prev_y == 0.0 {
            push_root(&mut roots, prev_x);
        } else if prev_y * y < 0.0 {
            match bisect(f, prev_x, x, prev_y, budget) {
                Some(root) => push_root(&mut roots, root),
                None => return RootScan { roots, exhausted: true },
            }
        }

        prev_x = x;
        prev_y = y;
    }

    if prev_y == 0.0 {
        push_root(&mut roots, prev_x);
    }

    RootScan {
        roots,
        exhausted: false,
    }
}

/// Append `root` unless it duplicates the previous one within tolerance
/// (an exact zero at a sample point would otherwise be reported twice).
fn push_root(roots: &mut Vec<f64>, root: f64) {
    if roots
        .last()
        .is_none_or(|&last| (root - last).abs() > ROOT_TOLERANCE * 10.0)
    {
        roots.push(root);
    }
}

/// Bisection refinement of a sign-changing bracket `[a, b]`.
///
/// Returns `None` only on budget exhaustion.
fn bisect<F>(f: &F, mut a: f64, mut b: f64, mut fa: f64, budget: &mut Budget) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    for _ in 0..MAX_BISECTIONS {
        if (b - a).abs() <= ROOT_TOLERANCE {
            break;
        }
        if !budget.try_consume(1) {
            return None;
        }

        let mid = 0.5 * (a + b);
        let fm = f(mid);

        if fm == 0.0 {
            return Some(mid);
        }
        if fa * fm < 0.0 {
            b = mid;
        } else {
            a = mid;
            fa = fm;
        }
    }

    Some(0.5 * (a + b))
}

// =================================================================================================
// Tests
// =================================================================================================
