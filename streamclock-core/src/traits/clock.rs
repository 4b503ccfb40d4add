//! Monotonic millisecond clock

/// Source of the `now_ms` timestamps fed to the link logic
///
/// The counter may wrap; consumers compare timestamps with wrapping
/// subtraction.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<F> Clock for F
where
    F: Fn() -> u32,
{
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the intended wrap
        embassy_time::Instant::now().as_millis() as u32
    }
}
