use crate::{
    bindings::{MutableBinding, ObjectBinding, numeric_function},
    value::Value,
};
use rand::{Rng, rngs::StdRng};
use std::sync::{Arc, Mutex};

fn arg(args: &[f64], index: usize) -> f64 {
    args.get(index).copied().unwrap_or(0.0)
}

/// Wraps an angle into the [-180, 180) degree range.
fn radify(angle: f64) -> f64 {
    (((angle + 180.0) % 360.0) + 360.0) % 360.0 - 180.0
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Shortest-path interpolation between two angles in degrees.
fn lerp_rotate(start: f64, end: f64, t: f64) -> f64 {
    let mut a = radify(start);
    let mut b = radify(end);
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    let diff = b - a;
    if diff > 180.0 {
        radify(b + t * (360.0 - diff))
    } else {
        a + t * diff
    }
}

/// Builds the read-only `math` namespace.
///
/// Trigonometry is degree-based on both ends, matching what animation
/// scripts expect. Functions that would produce NaN or an infinity
/// (square roots of negatives, `mod` by zero, out-of-range `acos`) come
/// out as plain zero through the number normalization in [`Value`].
///
/// The randomized functions draw from the engine-owned generator, so a
/// seeded engine replays the same sequence.
pub fn math_binding(rng: Arc<Mutex<StdRng>>) -> MutableBinding {
    let binding = MutableBinding::new();

    binding.set("pi", Value::Number(std::f64::consts::PI));

    binding.set("abs", numeric_function(|a| arg(a, 0).abs()));
    binding.set("ceil", numeric_function(|a| arg(a, 0).ceil()));
    binding.set("floor", numeric_function(|a| arg(a, 0).floor()));
    binding.set("exp", numeric_function(|a| arg(a, 0).exp()));
    binding.set("ln", numeric_function(|a| arg(a, 0).ln()));
    binding.set("sqrt", numeric_function(|a| arg(a, 0).sqrt()));
    binding.set("pow", numeric_function(|a| arg(a, 0).powf(arg(a, 1))));
    binding.set("max", numeric_function(|a| arg(a, 0).max(arg(a, 1))));
    binding.set("min", numeric_function(|a| arg(a, 0).min(arg(a, 1))));
    binding.set("mod", numeric_function(|a| arg(a, 0) % arg(a, 1)));
    // Java-style rounding, halves go up even for negatives
    binding.set("round", numeric_function(|a| (arg(a, 0) + 0.5).floor()));
    binding.set("trunc", numeric_function(|a| arg(a, 0) - arg(a, 0) % 1.0));
    binding.set(
        "clamp",
        numeric_function(|a| arg(a, 0).max(arg(a, 1)).min(arg(a, 2))),
    );

    binding.set("cos", numeric_function(|a| arg(a, 0).to_radians().cos()));
    binding.set("sin", numeric_function(|a| arg(a, 0).to_radians().sin()));
    binding.set("acos", numeric_function(|a| arg(a, 0).acos().to_degrees()));
    binding.set("asin", numeric_function(|a| arg(a, 0).asin().to_degrees()));
    binding.set("atan", numeric_function(|a| arg(a, 0).atan().to_degrees()));
    binding.set(
        "atan2",
        numeric_function(|a| arg(a, 0).atan2(arg(a, 1)).to_degrees()),
    );

    binding.set("min_angle", numeric_function(|a| radify(arg(a, 0))));
    binding.set(
        "hermite_blend",
        numeric_function(|a| {
            let t = arg(a, 0);
            3.0 * t * t - 2.0 * t * t * t
        }),
    );
    binding.set(
        "lerp",
        numeric_function(|a| lerp(arg(a, 0), arg(a, 1), arg(a, 2))),
    );
    binding.set(
        "lerprotate",
        numeric_function(|a| lerp_rotate(arg(a, 0), arg(a, 1), arg(a, 2))),
    );

    let r = rng.clone();
    binding.set(
        "random",
        numeric_function(move |a| {
            let mut rng = r.lock().unwrap_or_else(|e| e.into_inner());
            lerp(arg(a, 0), arg(a, 1), rng.r#gen::<f64>())
        }),
    );

    let r = rng.clone();
    binding.set(
        "random_integer",
        numeric_function(move |a| {
            let mut rng = r.lock().unwrap_or_else(|e| e.into_inner());
            let low = arg(a, 0).round() as i64;
            let high = arg(a, 1).round() as i64;
            let (low, high) = (low.min(high), low.max(high));
            rng.gen_range(low..=high) as f64
        }),
    );

    let r = rng.clone();
    binding.set(
        "die_roll",
        numeric_function(move |a| {
            let mut rng = r.lock().unwrap_or_else(|e| e.into_inner());
            let amount = arg(a, 0).round() as i64;
            let mut sum = 0.0;
            for _ in 0..amount {
                sum += lerp(arg(a, 1), arg(a, 2), rng.r#gen::<f64>());
            }
            sum
        }),
    );

    let r = rng;
    binding.set(
        "die_roll_integer",
        numeric_function(move |a| {
            let mut rng = r.lock().unwrap_or_else(|e| e.into_inner());
            let amount = arg(a, 0).round() as i64;
            let low = arg(a, 1).round() as i64;
            let high = arg(a, 2).round() as i64;
            let (low, high) = (low.min(high), low.max(high));
            let mut sum = 0;
            for _ in 0..amount {
                sum += rng.gen_range(low..=high);
            }
            sum as f64
        }),
    );

    binding.block();
    binding
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radify_wraps_into_half_open_range() {
        assert_eq!(radify(0.0), 0.0);
        assert_eq!(radify(190.0), -170.0);
        assert_eq!(radify(-190.0), 170.0);
        assert_eq!(radify(360.0), 0.0);
    }

    #[test]
    fn lerp_rotate_takes_the_short_way() {
        assert_eq!(lerp_rotate(0.0, 90.0, 0.5), 45.0);
        // 170 to -170 is 20 degrees through the seam, not 340 back
        assert_eq!(lerp_rotate(170.0, -170.0, 0.5), -180.0);
    }
}
