//! Callback handling: hands the authorization code to the exchange collaborator, loads
//! the profile unless `skipUserProfile` is set, and lets the verify callback decide.

// self
use crate::{
	_prelude::*,
	obs::{AuthPhase, PhaseOutcome, PhaseSpan},
	strategy::{Auth0Strategy, AuthOutcome, AuthRequest, Verified, Verify, VerifyContext},
};

impl<V> Auth0Strategy<V>
where
	V: Verify,
{
	pub(super) async fn complete_callback(
		&self,
		request: &AuthRequest,
		code: &str,
	) -> Result<AuthOutcome<V::User>> {
		let span = PhaseSpan::start(AuthPhase::Callback, "complete_callback");
		let result = span
			.instrument(async move {
				let redirect_uri = self.options().resolve_callback_url(request.origin())?;
				let tokens = self.exchange.exchange_code(code, &redirect_uri).await?;
				let profile = if self.options().skips_user_profile() {
					None
				} else {
					Some(self.exchange.fetch_profile(&tokens.access_token).await?)
				};
				let verified = self.verify.verify(VerifyContext { tokens, profile }).await?;

				Ok(match verified {
					Verified::User(user) => AuthOutcome::Success { user },
					Verified::Rejected(challenge) => AuthOutcome::Fail { challenge },
				})
			})
			.await;

		span.finish(PhaseOutcome::of_outcome(&result));

		result
	}

	/// Reports a provider-side callback error without touching the exchange.
	pub(super) fn fail_with_provider_error(&self, error: &str) -> AuthOutcome<V::User> {
		PhaseSpan::start(AuthPhase::Callback, "provider_error").finish(PhaseOutcome::Rejected);

		AuthOutcome::Fail { challenge: Some(error.to_owned()) }
	}
}
