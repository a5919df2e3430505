use std::time::Duration;

// 2^16 seconds is already far beyond any useful backoff.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Fixed exponential backoff without jitter: the wait after failed attempt `n` (0-based) is
/// `base_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	pub attempts: u32,
	pub base_delay: Duration,
}
impl RetryPolicy {
	pub fn new(attempts: u32, base_delay: Duration) -> Self {
		Self { attempts: attempts.max(1), base_delay }
	}

	pub fn delay_for(&self, attempt: u32) -> Duration {
		self.base_delay.saturating_mul(1 << attempt.min(MAX_BACKOFF_EXPONENT))
	}

	/// Whether another attempt follows the 0-based `attempt`.
	pub fn has_next(&self, attempt: u32) -> bool {
		attempt.saturating_add(1) < self.attempts
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new(3, Duration::from_secs(1))
	}
}
