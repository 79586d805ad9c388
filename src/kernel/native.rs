//! Kernel backed by a platform shared library.
//!
//! The library must export:
//!
//! ```text
//! uint32_t wp_kernel_abi_version(void);                 // must return 1
//! double   wp_point_distance(int32_t x1, int32_t y1, int32_t x2, int32_t y2);
//! void     wp_calculate_probabilities(double *out, const double *pheromones,
//!                                     const double *distances, int32_t n,
//!                                     double alpha, double beta);
//! ```
//!
//! Any call whose output is unusable is answered by the reference kernel
//! instead, so the native kernel never changes a run's observable behaviour.

use super::reference::ReferenceKernel;
use super::{is_distribution, NumericKernel};
use crate::point::Point;
use libloading::{Library, Symbol};
use std::panic;
use std::path::{Path, PathBuf};

pub const ABI_VERSION: u32 = 1;

type AbiVersionFn = unsafe extern "C" fn() -> u32;
type DistanceFn = unsafe extern "C" fn(i32, i32, i32, i32) -> f64;
type ProbabilitiesFn =
    unsafe extern "C" fn(*mut f64, *const f64, *const f64, i32, f64, f64);

pub struct NativeKernel {
    distance_fn: DistanceFn,
    probabilities_fn: ProbabilitiesFn,
    source: PathBuf,
    // Keeps the function pointers above valid. `None` only for in-process tables.
    _library: Option<Library>,
}

impl NativeKernel {
    /// Load the library at `path` and check its ABI version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let library = load_module(path)?;

        let (version, distance_fn, probabilities_fn) = unsafe {
            let version: Symbol<AbiVersionFn> = library
                .get(b"wp_kernel_abi_version\0")
                .map_err(|e| e.to_string())?;
            let distance: Symbol<DistanceFn> = library
                .get(b"wp_point_distance\0")
                .map_err(|e| e.to_string())?;
            let probabilities: Symbol<ProbabilitiesFn> = library
                .get(b"wp_calculate_probabilities\0")
                .map_err(|e| e.to_string())?;
            (version(), *distance, *probabilities)
        };

        if version != ABI_VERSION {
            return Err(format!(
                "kernel ABI version {} in {:?}, expected {}",
                version, path, ABI_VERSION
            ));
        }

        Ok(NativeKernel {
            distance_fn,
            probabilities_fn,
            source: path.to_path_buf(),
            _library: Some(library),
        })
    }

    /// Kernel over in-process entry points with the library's signatures.
    #[cfg(test)]
    pub(crate) fn from_fns(distance_fn: DistanceFn, probabilities_fn: ProbabilitiesFn) -> Self {
        NativeKernel {
            distance_fn,
            probabilities_fn,
            source: PathBuf::from("<in-process>"),
            _library: None,
        }
    }

    /// Path the library was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

fn load_module(path: &Path) -> Result<Library, String> {
    let res = panic::catch_unwind(|| unsafe { Library::new(path) });

    match res {
        Ok(lib_result) => lib_result.map_err(|e| e.to_string()),
        Err(_) => Err(format!("Failed to load module {:?}", path)),
    }
}

impl NumericKernel for NativeKernel {
    fn name(&self) -> &str {
        "native"
    }

    fn distance(&self, a: Point, b: Point) -> f64 {
        let d = unsafe { (self.distance_fn)(a.x, a.y, b.x, b.y) };
        if d.is_finite() && d >= 0.0 {
            d
        } else {
            log::debug!("Native distance returned {} for {} -> {}", d, a, b);
            ReferenceKernel.distance(a, b)
        }
    }

    fn probabilities(
        &self,
        pheromones: &[f64],
        distances: &[f64],
        alpha: f64,
        beta: f64,
    ) -> Vec<f64> {
        let n = pheromones.len();
        if n == 0 || n != distances.len() {
            return ReferenceKernel.probabilities(pheromones, distances, alpha, beta);
        }
        let n_ffi = match i32::try_from(n) {
            Ok(v) => v,
            Err(_) => return ReferenceKernel.probabilities(pheromones, distances, alpha, beta),
        };

        let mut out = vec![0.0f64; n];
        unsafe {
            (self.probabilities_fn)(
                out.as_mut_ptr(),
                pheromones.as_ptr(),
                distances.as_ptr(),
                n_ffi,
                alpha,
                beta,
            );
        }

        if is_distribution(&out) {
            out
        } else {
            // Covers the zero-sum case, which the native routine leaves as NaN.
            ReferenceKernel.probabilities(pheromones, distances, alpha, beta)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::aco::{ACOConfig, AntColonyOptimization};
    use crate::kernel::EPSILON;
    use crate::problem::RouteProblem;
    use std::sync::Arc;

    unsafe extern "C" fn c_distance(x1: i32, y1: i32, x2: i32, y2: i32) -> f64 {
        let dx = x2 as i64 - x1 as i64;
        let dy = y2 as i64 - y1 as i64;
        ((dx * dx + dy * dy) as f64).sqrt()
    }

    // Same arithmetic as the shipped C routine, including the unguarded
    // division that yields NaN when every weight is zero.
    unsafe extern "C" fn c_probabilities(
        out: *mut f64,
        pheromones: *const f64,
        distances: *const f64,
        n: i32,
        alpha: f64,
        beta: f64,
    ) {
        let n = n as usize;
        let out = std::slice::from_raw_parts_mut(out, n);
        let pheromones = std::slice::from_raw_parts(pheromones, n);
        let distances = std::slice::from_raw_parts(distances, n);

        let mut total = 0.0;
        for i in 0..n {
            let eta = 1.0 / (distances[i] + EPSILON);
            out[i] = pheromones[i].powf(alpha) * eta.powf(beta);
            total += out[i];
        }
        for p in out.iter_mut() {
            *p /= total;
        }
    }

    unsafe extern "C" fn negative_distance(_: i32, _: i32, _: i32, _: i32) -> f64 {
        -1.0
    }

    unsafe extern "C" fn nan_distance(_: i32, _: i32, _: i32, _: i32) -> f64 {
        f64::NAN
    }

    fn c_kernel() -> NativeKernel {
        NativeKernel::from_fns(c_distance, c_probabilities)
    }

    #[test]
    fn test_load_missing_library() {
        let result = NativeKernel::load("/nonexistent/libwaypoint_kernels.so");
        assert!(result.is_err());
    }

    #[test]
    fn test_distance_matches_reference() {
        let kernel = c_kernel();
        let (a, b) = (Point::new(0, 0), Point::new(3, 4));
        assert_eq!(kernel.distance(a, b), 5.0);
        assert_eq!(kernel.distance(a, b), ReferenceKernel.distance(a, b));
    }

    #[test]
    fn test_invalid_distance_falls_back() {
        let (a, b) = (Point::new(1, 1), Point::new(4, 5));
        for kernel in [
            NativeKernel::from_fns(negative_distance, c_probabilities),
            NativeKernel::from_fns(nan_distance, c_probabilities),
        ] {
            assert_eq!(kernel.distance(a, b), 5.0);
        }
    }

    #[test]
    fn test_probabilities_match_reference() {
        let pheromones = [100.0, 50.0, 10.0, 1.0];
        let distances = [1.0, 2.0, 5.0, 0.0];
        let native = c_kernel().probabilities(&pheromones, &distances, 1.0, 3.0);
        let reference = ReferenceKernel.probabilities(&pheromones, &distances, 1.0, 3.0);
        assert_eq!(native.len(), reference.len());
        for (n, r) in native.iter().zip(&reference) {
            assert!((n - r).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_sum_gives_uniform() {
        let probs =
            c_kernel().probabilities(&[0.0, 0.0, 0.0, 0.0], &[1.0, 2.0, 3.0, 4.0], 1.0, 2.0);
        assert_eq!(probs, vec![0.25; 4]);
    }

    #[test]
    fn test_seeded_run_matches_reference() {
        let candidates: Vec<Point> = (1..=12)
            .map(|i| Point::new((i * 37) % 50, (i * 11) % 23))
            .collect();
        let problem = RouteProblem::new(&candidates, Point::new(0, 0), Point::new(50, 0), 6);
        let config = ACOConfig {
            num_ants: 8,
            num_iterations: 15,
            seed: 7,
            ..Default::default()
        };

        let mut native =
            AntColonyOptimization::new(problem.clone(), Arc::new(c_kernel()), config.clone())
                .unwrap();
        let mut reference =
            AntColonyOptimization::new(problem, Arc::new(ReferenceKernel), config).unwrap();
        native.run();
        reference.run();

        assert_eq!(native.best_path().points(), reference.best_path().points());
        let (a, b) = (native.best_length(), reference.best_length());
        assert!((a - b).abs() <= 1e-9 * b.max(1.0));
    }
}
