//! Lightweight instrumentation for the solver hot path, compiled to
//! passthroughs unless the `timing` feature is enabled.

#![allow(unused)]

use std::cell::RefCell;
use std::time::Duration;

#[cfg(feature = "timing")]
use std::time::Instant;

#[derive(Default, Clone)]
pub struct TimingStats {
    pub jacobian_times: Vec<Duration>,
    pub linear_solve_times: Vec<Duration>,
    pub total_time: Duration,
}

thread_local! {
    static STATS: RefCell<TimingStats> = RefCell::new(TimingStats::default());
}

pub fn reset_timing() {
    #[cfg(feature = "timing")]
    STATS.with(|s| *s.borrow_mut() = TimingStats::default());
}

/// Run `f`, attributing its wall time to Jacobian assembly.
pub fn record_jacobian<T>(f: impl FnOnce() -> T) -> T {
    #[cfg(feature = "timing")]
    {
        let start = Instant::now();
        let out = f();
        STATS.with(|s| s.borrow_mut().jacobian_times.push(start.elapsed()));
        return out;
    }
    #[cfg(not(feature = "timing"))]
    f()
}

/// Run `f`, attributing its wall time to the linear solve.
pub fn record_linear_solve<T>(f: impl FnOnce() -> T) -> T {
    #[cfg(feature = "timing")]
    {
        let start = Instant::now();
        let out = f();
        STATS.with(|s| s.borrow_mut().linear_solve_times.push(start.elapsed()));
        return out;
    }
    #[cfg(not(feature = "timing"))]
    f()
}

#[cfg(feature = "timing")]
pub fn finalize_and_print(total: Duration) {
    STATS.with(|s| {
        let mut stats = s.borrow_mut();
        stats.total_time = total;
        if stats.jacobian_times.is_empty() {
            return;
        }
        let jac: Duration = stats.jacobian_times.iter().sum();
        let lin: Duration = stats.linear_solve_times.iter().sum();
        let overhead = total.saturating_sub(jac + lin);
        println!("--- solver timing ---");
        println!(
            "  jacobian assembly: {:>9.3} ms over {} calls",
            jac.as_secs_f64() * 1e3,
            stats.jacobian_times.len()
        );
        println!(
            "  linear solve:      {:>9.3} ms over {} calls",
            lin.as_secs_f64() * 1e3,
            stats.linear_solve_times.len()
        );
        println!("  other:             {:>9.3} ms", overhead.as_secs_f64() * 1e3);
    });
}

#[cfg(not(feature = "timing"))]
pub fn finalize_and_print(_total: Duration) {}
