//! Operation telemetry for benchmarking.
//!
//! Counts the expensive curve operations that flow through the helpers in
//! [`crate::curve`]. The counters are process-wide relaxed atomics;
//! [`Stats::collect`] snapshots and resets them, so a benchmark brackets a
//! phase with two calls and reads the delta from the first.

use std::sync::atomic::{AtomicU64, Ordering};

static PAIRINGS: AtomicU64 = AtomicU64::new(0);
static MSMS_G1: AtomicU64 = AtomicU64::new(0);
static MSMS_G2: AtomicU64 = AtomicU64::new(0);
static GT_EXPONENTIATIONS: AtomicU64 = AtomicU64::new(0);
static HASH_TO_CURVE: AtomicU64 = AtomicU64::new(0);

/// Snapshot of the operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Individual pairings, counting each base pair of a multi-pairing.
    pub pairings: u64,
    /// Multi-scalar multiplications in G1.
    pub msms_g1: u64,
    /// Multi-scalar multiplications in G2.
    pub msms_g2: u64,
    /// Scalar exponentiations in Gt.
    pub gt_exponentiations: u64,
    /// Hash-to-curve invocations (either group).
    pub hash_to_curve: u64,
}

impl Stats {
    /// Read all counters and reset them to zero.
    pub fn collect() -> Self {
        Stats {
            pairings: PAIRINGS.swap(0, Ordering::Relaxed),
            msms_g1: MSMS_G1.swap(0, Ordering::Relaxed),
            msms_g2: MSMS_G2.swap(0, Ordering::Relaxed),
            gt_exponentiations: GT_EXPONENTIATIONS.swap(0, Ordering::Relaxed),
            hash_to_curve: HASH_TO_CURVE.swap(0, Ordering::Relaxed),
        }
    }
}

pub(crate) fn record_pairings(n: u64) {
    PAIRINGS.fetch_add(n, Ordering::Relaxed);
}

pub(crate) fn record_msm_g1() {
    MSMS_G1.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_msm_g2() {
    MSMS_G2.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_gt_exponentiation() {
    GT_EXPONENTIATIONS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_hash_to_curve() {
    HASH_TO_CURVE.fetch_add(1, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{g1_generator, g2_generator, pairing};

    // Counters are process-wide, so concurrent tests may also bump them;
    // only lower bounds are stable.
    #[test]
    fn counters_record_pairings() {
        let _ = Stats::collect();
        let _ = pairing(&g1_generator(), &g2_generator());
        let snapshot = Stats::collect();
        assert!(snapshot.pairings >= 1);
    }
}
