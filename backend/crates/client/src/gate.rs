//! One-shot gate
//!
//! Authorization codes are single-use. A callback page that gets mounted
//! twice, or re-run while the first exchange is in flight, must only
//! exchange its code once.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct OneShotGate(AtomicBool);

impl OneShotGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` for exactly one caller over the gate's lifetime
    pub fn claim(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_claimed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
