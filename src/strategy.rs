//! The Auth0 authentication strategy.
//!
//! An [`Auth0Strategy`] is built once from [`StrategyOptions`] and a [`Verify`] callback and
//! then shared (it is `Send + Sync` and never mutated) across authentication attempts.
//! [`Auth0Strategy::authenticate`] drives one attempt:
//!
//! 1. a callback carrying `error` fails immediately with that value as the challenge;
//! 2. a callback carrying `code` is exchanged through the [`CodeExchange`] collaborator and
//!    handed to the verify callback;
//! 3. anything else is redirected to the authorization endpoint.

mod authorize;
mod callback;
mod request;
mod verify;

pub use authorize::*;
pub use request::*;
pub use verify::*;

// self
use crate::{
	_prelude::*,
	config::{StrategyConfig, StrategyOptions},
	oauth::CodeExchange,
	params::{self, AuthorizationParams},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::OAuth2Exchange};

/// Result of a single [`Auth0Strategy::authenticate`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome<U> {
	/// Send the user agent to the authorization endpoint.
	Redirect(AuthorizationRedirect),
	/// The verify callback accepted the login.
	Success {
		/// Application user returned by the verify callback.
		user: U,
	},
	/// Authentication failed; the host reports `challenge` through its failure channel.
	Fail {
		/// Provider error code or verify-supplied challenge.
		challenge: Option<String>,
	},
}

/// OAuth 2.0 authorization-code strategy for an Auth0 tenant.
pub struct Auth0Strategy<V>
where
	V: Verify,
{
	config: StrategyConfig,
	verify: V,
	exchange: Arc<dyn CodeExchange>,
}
impl<V> Auth0Strategy<V>
where
	V: Verify,
{
	/// Name under which host frameworks register the strategy.
	pub const NAME: &'static str = "auth0";

	/// Creates a strategy backed by the default reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn new(options: &StrategyOptions, verify: V) -> Result<Self> {
		Self::with_http_client(options, verify, ReqwestHttpClient::default())
	}

	/// Creates a strategy that reuses the caller-provided reqwest client.
	#[cfg(feature = "reqwest")]
	pub fn with_http_client(
		options: &StrategyOptions,
		verify: V,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let config = StrategyConfig::normalize(options)?;
		let exchange = OAuth2Exchange::from_config(&config, http_client)?;

		Ok(Self { config, verify, exchange: Arc::new(exchange) })
	}

	/// Creates a strategy that delegates code exchanges to `exchange`.
	pub fn with_exchange(
		options: &StrategyOptions,
		verify: V,
		exchange: Arc<dyn CodeExchange>,
	) -> Result<Self> {
		let config = StrategyConfig::normalize(options)?;

		Ok(Self { config, verify, exchange })
	}

	/// Normalized configuration in effect for every attempt.
	pub fn options(&self) -> &StrategyConfig {
		&self.config
	}

	/// Extra authorization parameters derived from request-time `options`.
	pub fn authorization_params(&self, options: Option<&JsonValue>) -> AuthorizationParams {
		params::map_authorization_params(options)
	}

	/// Runs one authentication step for `request`.
	///
	/// `options` are request-time authorization options; only the allow-listed keys reach
	/// the provider.
	pub async fn authenticate(
		&self,
		request: &AuthRequest,
		options: Option<&JsonValue>,
	) -> Result<AuthOutcome<V::User>> {
		if let Some(error) = request.query("error") {
			return Ok(self.fail_with_provider_error(error));
		}
		if let Some(code) = request.query("code") {
			return self.complete_callback(request, code).await;
		}

		self.begin_authorization(request, options)
	}
}
impl<V> Debug for Auth0Strategy<V>
where
	V: Verify,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Auth0Strategy").field("config", &self.config).finish()
	}
}
