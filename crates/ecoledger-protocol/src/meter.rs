//! Cost-accounting hook.
//!
//! The protocols charge the meter once per processed credit entry. What a
//! unit of cost means, and whether running out aborts the surrounding
//! transaction, is up to the environment.

/// Receives one charge per processed credit entry.
pub trait CostMeter {
    fn consume(&mut self, amount: u64, descriptor: &'static str);
}

/// Meter that ignores every charge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMeter;

impl CostMeter for NoopMeter {
    fn consume(&mut self, _amount: u64, _descriptor: &'static str) {}
}

/// Meter that accumulates charges.
#[derive(Debug, Clone, Default)]
pub struct GasMeter {
    consumed: u64,
    charges: usize,
}

impl GasMeter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total cost consumed so far.
    #[must_use]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Number of charges recorded.
    #[must_use]
    pub fn charges(&self) -> usize {
        self.charges
    }
}

impl CostMeter for GasMeter {
    fn consume(&mut self, amount: u64, descriptor: &'static str) {
        self.consumed = self.consumed.saturating_add(amount);
        self.charges += 1;
        tracing::trace!(amount, descriptor, total = self.consumed, "gas consumed");
    }
}
