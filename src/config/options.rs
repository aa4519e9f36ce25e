// crates.io
use serde::Deserializer;
// self
use crate::{_prelude::*, config::Secret, error::ConfigError};

/// Raw caller options for an [`Auth0Strategy`](crate::strategy::Auth0Strategy).
///
/// Every field is optional so a missing `domain`, `clientID`, `clientSecret`, or
/// `callbackURL` is reported by [`StrategyConfig::normalize`](crate::config::StrategyConfig::normalize)
/// instead of failing deserialization. Keys not listed here are kept in [`extra`](Self::extra).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StrategyOptions {
	/// Auth0 tenant host, e.g. `example.auth0.com`.
	pub domain: Option<String>,
	/// OAuth 2.0 client identifier.
	#[serde(rename = "clientID")]
	pub client_id: Option<String>,
	/// OAuth 2.0 client secret.
	#[serde(rename = "clientSecret")]
	pub client_secret: Option<Secret>,
	/// Redirect URI registered for the client; may be relative to the request origin.
	#[serde(rename = "callbackURL")]
	pub callback_url: Option<String>,
	/// Overrides the derived authorization endpoint.
	#[serde(rename = "authorizationURL")]
	pub authorization_url: Option<String>,
	/// Overrides the derived token endpoint.
	#[serde(rename = "tokenURL")]
	pub token_url: Option<String>,
	/// Overrides the derived userinfo endpoint.
	#[serde(rename = "userInfoURL")]
	pub user_info_url: Option<String>,
	/// Whether authorization redirects carry a `state` parameter; an explicit `null` disables it.
	#[serde(deserialize_with = "deserialize_state")]
	pub state: Option<bool>,
	/// Headers attached to every outbound provider request.
	#[serde(rename = "customHeaders")]
	pub custom_headers: Option<BTreeMap<String, String>>,
	/// Scopes requested during authorization; accepts a string or a list.
	#[serde(deserialize_with = "deserialize_scope")]
	pub scope: Option<Vec<String>>,
	/// Separator used to join [`scope`](Self::scope) entries.
	#[serde(rename = "scopeSeparator")]
	pub scope_separator: Option<String>,
	/// Skips the userinfo request after a successful code exchange.
	#[serde(rename = "skipUserProfile")]
	pub skip_user_profile: Option<bool>,
	/// Pass-through options not interpreted by the strategy.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl StrategyOptions {
	/// Creates options carrying the four required fields.
	pub fn new(
		domain: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
		callback_url: impl Into<String>,
	) -> Self {
		Self {
			domain: Some(domain.into()),
			client_id: Some(client_id.into()),
			client_secret: Some(client_secret.into()),
			callback_url: Some(callback_url.into()),
			..Default::default()
		}
	}

	/// Parses options from loosely-typed JSON, reporting the path of any mistyped field.
	pub fn from_value(value: &JsonValue) -> Result<Self, ConfigError> {
		if !value.is_object() {
			return Err(ConfigError::NotAnObject);
		}

		serde_path_to_error::deserialize(value.clone())
			.map_err(|source| ConfigError::InvalidOptions { source })
	}

	/// Sets the authorization endpoint override.
	pub fn with_authorization_url(mut self, url: impl Into<String>) -> Self {
		self.authorization_url = Some(url.into());

		self
	}

	/// Sets the token endpoint override.
	pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = Some(url.into());

		self
	}

	/// Sets the userinfo endpoint override.
	pub fn with_user_info_url(mut self, url: impl Into<String>) -> Self {
		self.user_info_url = Some(url.into());

		self
	}

	/// Sets the `state` flag explicitly.
	pub fn with_state(mut self, state: bool) -> Self {
		self.state = Some(state);

		self
	}

	/// Adds or replaces a custom header.
	pub fn with_custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.custom_headers.get_or_insert_with(BTreeMap::new).insert(name.into(), value.into());

		self
	}

	/// Sets the requested scopes.
	pub fn with_scope<I, S>(mut self, scope: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scope = Some(scope.into_iter().map(Into::into).collect());

		self
	}

	/// Sets the scope separator.
	pub fn with_scope_separator(mut self, separator: impl Into<String>) -> Self {
		self.scope_separator = Some(separator.into());

		self
	}

	/// Sets the `skipUserProfile` flag.
	pub fn with_skip_user_profile(mut self, skip: bool) -> Self {
		self.skip_user_profile = Some(skip);

		self
	}

	/// Adds a pass-through option.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}
}

fn deserialize_state<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Some(Option::<bool>::deserialize(deserializer)?.unwrap_or(false)))
}

fn deserialize_scope<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawScope {
		One(String),
		Many(Vec<String>),
	}

	Ok(Option::<RawScope>::deserialize(deserializer)?.map(|raw| match raw {
		RawScope::One(scope) => vec![scope],
		RawScope::Many(scopes) => scopes,
	}))
}
