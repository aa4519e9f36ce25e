// self
use crate::obs::{AuthPhase, PhaseOutcome};

/// Records a phase outcome via the global metrics recorder (when enabled).
pub fn record_phase_outcome(phase: AuthPhase, outcome: PhaseOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"auth0_strategy_phase_total",
			"phase" => phase.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (phase, outcome);
	}
}
