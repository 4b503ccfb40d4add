//! Retry backoff
//!
//! `delay(n) = min(base * 2^min(n, max_exponent), cap)`

/// Exponential backoff parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    pub base_ms: u32,
    pub cap_ms: u32,
    pub max_exponent: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_ms: 5_000,
            cap_ms: 300_000,
            max_exponent: 5,
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt that follows `n + 1` consecutive failures
    pub fn delay(&self, n: u32) -> u32 {
        let exponent = n.min(self.max_exponent).min(31);
        self.base_ms
            .saturating_mul(1u32 << exponent)
            .min(self.cap_ms)
    }
}

/// Backoff with the stock 5 s base and 5 min cap
pub fn backoff_delay(n: u32) -> u32 {
    RetryPolicy::default().delay(n)
}
