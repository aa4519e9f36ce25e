//! Optional observability for authentication phases.
//!
//! Every phase runs inside a [`PhaseSpan`]. [`PhaseSpan::start`] counts the attempt and
//! [`PhaseSpan::finish`] stamps the final [`PhaseOutcome`] on both layers.
//!
//! # Feature Flags
//!
//! - `tracing`: span `auth0_strategy.authenticate` with `phase`, `stage` and `outcome` fields.
//! - `metrics`: counter `auth0_strategy_phase_total`, labeled by `phase` and `outcome`.
//!
//! Neither layer records secrets, tokens, or provider error descriptions.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, strategy::AuthOutcome};

/// Phases of an authentication attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthPhase {
	/// Redirecting the user agent to the authorization endpoint.
	Authorize,
	/// Handling the provider callback (error passthrough or code exchange).
	Callback,
}
impl AuthPhase {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthPhase::Authorize => "authorize",
			AuthPhase::Callback => "callback",
		}
	}
}
impl Display for AuthPhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseOutcome {
	/// Entry to a phase.
	Attempt,
	/// Redirect issued or user authenticated.
	Success,
	/// Authentication failed (provider error or verify rejection).
	Rejected,
	/// Error propagated back to the caller.
	Failure,
}
impl PhaseOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PhaseOutcome::Attempt => "attempt",
			PhaseOutcome::Success => "success",
			PhaseOutcome::Rejected => "rejected",
			PhaseOutcome::Failure => "failure",
		}
	}

	/// Classifies the result of an [`authenticate`](crate::strategy::Auth0Strategy::authenticate)
	/// step; a `Fail` outcome is a rejection, not a failure.
	pub fn of_outcome<U>(result: &Result<AuthOutcome<U>>) -> Self {
		match result {
			Ok(AuthOutcome::Fail { .. }) => PhaseOutcome::Rejected,
			Ok(_) => PhaseOutcome::Success,
			Err(_) => PhaseOutcome::Failure,
		}
	}
}
impl Display for PhaseOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ConfigError;

	#[test]
	fn fail_outcomes_count_as_rejections() {
		let rejected: Result<AuthOutcome<()>> = Ok(AuthOutcome::Fail { challenge: None });
		let success: Result<AuthOutcome<()>> = Ok(AuthOutcome::Success { user: () });
		let failure: Result<AuthOutcome<()>> = Err(ConfigError::NotAnObject.into());

		assert_eq!(PhaseOutcome::of_outcome(&rejected), PhaseOutcome::Rejected);
		assert_eq!(PhaseOutcome::of_outcome(&success), PhaseOutcome::Success);
		assert_eq!(PhaseOutcome::of_outcome(&failure), PhaseOutcome::Failure);
	}

	#[test]
	fn labels_are_stable() {
		assert_eq!(AuthPhase::Authorize.to_string(), "authorize");
		assert_eq!(AuthPhase::Callback.to_string(), "callback");
		assert_eq!(PhaseOutcome::Rejected.to_string(), "rejected");
	}
}
