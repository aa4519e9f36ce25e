// self
use crate::{
	_prelude::*,
	obs::{self, AuthPhase, PhaseOutcome},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedPhase<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedPhase<F> = F;

/// Span covering one phase of an authentication attempt.
#[derive(Clone, Debug)]
pub struct PhaseSpan {
	phase: AuthPhase,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl PhaseSpan {
	/// Opens the span for `phase` at call site `stage` and counts the attempt.
	pub fn start(phase: AuthPhase, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		let span = Self {
			phase,
			span: tracing::info_span!(
				"auth0_strategy.authenticate",
				phase = phase.as_str(),
				stage,
				outcome = tracing::field::Empty
			),
		};
		#[cfg(not(feature = "tracing"))]
		let span = {
			let _ = stage;

			Self { phase }
		};

		obs::record_phase_outcome(phase, PhaseOutcome::Attempt);

		span
	}

	/// Phase this span covers.
	pub fn phase(&self) -> AuthPhase {
		self.phase
	}

	/// Runs a synchronous section inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedPhase<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Records the final outcome on the span and the phase counter.
	pub fn finish(&self, outcome: PhaseOutcome) {
		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());

		obs::record_phase_outcome(self.phase, outcome);
	}
}
