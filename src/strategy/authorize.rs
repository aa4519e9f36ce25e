// crates.io
use oauth2::CsrfToken;
// self
use crate::{
	_prelude::*,
	config::StrategyConfig,
	error::ConfigError,
	obs::{AuthPhase, PhaseOutcome, PhaseSpan},
	params::AuthorizationParams,
	strategy::{Auth0Strategy, AuthOutcome, AuthRequest, Verify},
};

/// Authorization redirect issued when a request carries neither `code` nor `error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRedirect {
	/// Authorization endpoint URL the user agent should be sent to.
	pub url: Url,
	/// Opaque `state` included in [`url`](Self::url); the host stores it and compares it
	/// with the callback's `state` before calling back into the strategy.
	pub state: Option<String>,
}

impl<V> Auth0Strategy<V>
where
	V: Verify,
{
	/// Builds the authorization redirect for `request`, merging the allow-listed
	/// parameters from `options` into the query string.
	pub fn authorization_redirect(
		&self,
		request: &AuthRequest,
		options: Option<&JsonValue>,
	) -> Result<AuthorizationRedirect> {
		let span = PhaseSpan::start(AuthPhase::Authorize, "authorization_redirect");
		let result = span.in_scope(|| {
			let redirect_uri = self.options().resolve_callback_url(request.origin())?;

			build_redirect(self.options(), &redirect_uri, self.authorization_params(options))
		});

		span.finish(if result.is_ok() { PhaseOutcome::Success } else { PhaseOutcome::Failure });

		result
	}

	pub(super) fn begin_authorization(
		&self,
		request: &AuthRequest,
		options: Option<&JsonValue>,
	) -> Result<AuthOutcome<V::User>> {
		self.authorization_redirect(request, options).map(AuthOutcome::Redirect)
	}
}

fn build_redirect(
	config: &StrategyConfig,
	redirect_uri: &Url,
	params: AuthorizationParams,
) -> Result<AuthorizationRedirect> {
	let mut url = Url::parse(&config.authorization_url)
		.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "authorization", source })?;
	let state = config.state.then(|| CsrfToken::new_random().secret().to_owned());
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", &config.client_id);
	pairs.append_pair("redirect_uri", redirect_uri.as_str());

	if let Some(scope) = config.scope_param() {
		pairs.append_pair("scope", &scope);
	}
	if let Some(state) = &state {
		pairs.append_pair("state", state);
	}

	for (name, value) in params {
		pairs.append_pair(&name, &value);
	}

	drop(pairs);

	Ok(AuthorizationRedirect { url, state })
}
