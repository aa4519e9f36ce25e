//! Strategy options and their normalized, read-only configuration.
//!
//! [`StrategyOptions`] is what callers hand in (a builder or a JSON document using the
//! `clientID`/`callbackURL` wire names). [`StrategyConfig::normalize`] copies it into a new
//! [`StrategyConfig`], deriving the tenant endpoints from `domain`, defaulting `state`,
//! and stamping the [`TELEMETRY_HEADER`] unless the caller already set it. The caller's
//! options are only borrowed, so derived values never leak back into them.

mod options;
mod secret;
mod telemetry;

pub use options::*;
pub use secret::*;
pub use telemetry::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Path appended to `https://{domain}` for the authorization endpoint.
pub const AUTHORIZATION_PATH: &str = "/authorize";
/// Path appended to `https://{domain}` for the token endpoint.
pub const TOKEN_PATH: &str = "/oauth/token";
/// Path appended to `https://{domain}` for the userinfo endpoint.
pub const USER_INFO_PATH: &str = "/userinfo";

const DEFAULT_SCOPE_SEPARATOR: &str = " ";

/// Normalized configuration shared by every authentication attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyConfig {
	/// Auth0 tenant host.
	pub domain: String,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Redirect URI as configured; may be relative.
	pub callback_url: String,
	/// Authorization endpoint.
	pub authorization_url: String,
	/// Token endpoint.
	pub token_url: String,
	/// Userinfo endpoint.
	pub user_info_url: String,
	/// Whether authorization redirects carry a `state` parameter.
	pub state: bool,
	/// Headers attached to every outbound provider request.
	pub custom_headers: BTreeMap<String, String>,
	/// Requested scopes, as supplied.
	pub scope: Option<Vec<String>>,
	/// Scope separator, as supplied.
	pub scope_separator: Option<String>,
	/// `skipUserProfile`, as supplied.
	pub skip_user_profile: Option<bool>,
	/// Pass-through options.
	pub extra: JsonMap<String, JsonValue>,
}
impl StrategyConfig {
	/// Copies `options` into a new configuration and fills in every default.
	pub fn normalize(options: &StrategyOptions) -> Result<Self, ConfigError> {
		let domain = required(options.domain.as_deref(), "domain")?;
		let client_id = required(options.client_id.as_deref(), "clientID")?;
		let client_secret = options
			.client_secret
			.clone()
			.filter(|secret| !secret.is_empty())
			.ok_or(ConfigError::MissingField { field: "clientSecret" })?;
		let callback_url = required(options.callback_url.as_deref(), "callbackURL")?;
		let authorization_url = options
			.authorization_url
			.clone()
			.unwrap_or_else(|| tenant_endpoint(&domain, AUTHORIZATION_PATH));
		let token_url =
			options.token_url.clone().unwrap_or_else(|| tenant_endpoint(&domain, TOKEN_PATH));
		let user_info_url = options
			.user_info_url
			.clone()
			.unwrap_or_else(|| tenant_endpoint(&domain, USER_INFO_PATH));
		let mut custom_headers = options.custom_headers.clone().unwrap_or_default();

		if !custom_headers.contains_key(TELEMETRY_HEADER) {
			custom_headers.insert(TELEMETRY_HEADER.into(), ClientTelemetry::current().encode()?);
		}

		Ok(Self {
			domain,
			client_id,
			client_secret,
			callback_url,
			authorization_url,
			token_url,
			user_info_url,
			state: options.state.unwrap_or(true),
			custom_headers,
			scope: options.scope.clone(),
			scope_separator: options.scope_separator.clone(),
			skip_user_profile: options.skip_user_profile,
			extra: options.extra.clone(),
		})
	}

	/// Parses loosely-typed JSON options and normalizes them.
	pub fn from_value(value: &JsonValue) -> Result<Self, ConfigError> {
		Self::normalize(&StrategyOptions::from_value(value)?)
	}

	/// Joins the configured scopes with the configured separator (a space by default).
	pub fn scope_param(&self) -> Option<String> {
		let scope = self.scope.as_ref().filter(|scope| !scope.is_empty())?;

		Some(scope.join(self.scope_separator.as_deref().unwrap_or(DEFAULT_SCOPE_SEPARATOR)))
	}

	/// Whether the userinfo request is skipped after the code exchange.
	pub fn skips_user_profile(&self) -> bool {
		self.skip_user_profile.unwrap_or(false)
	}

	/// Resolves [`callback_url`](Self::callback_url) against the request origin when relative.
	pub fn resolve_callback_url(&self, origin: Option<&Url>) -> Result<Url, ConfigError> {
		match Url::parse(&self.callback_url) {
			Ok(url) => Ok(url),
			Err(url::ParseError::RelativeUrlWithoutBase) => origin
				.ok_or_else(|| ConfigError::RelativeCallback {
					callback_url: self.callback_url.clone(),
				})?
				.join(&self.callback_url)
				.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "callback", source }),
			Err(source) => Err(ConfigError::InvalidEndpoint { endpoint: "callback", source }),
		}
	}
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, ConfigError> {
	match value {
		Some(value) if !value.is_empty() => Ok(value.to_owned()),
		_ => Err(ConfigError::MissingField { field }),
	}
}

fn tenant_endpoint(domain: &str, path: &str) -> String {
	format!("https://{domain}{path}")
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn options() -> StrategyOptions {
		StrategyOptions::new("test.auth0.com", "testid", "testsecret", "/callback")
	}

	fn normalize(options: &StrategyOptions) -> StrategyConfig {
		StrategyConfig::normalize(options).expect("Options fixture should normalize.")
	}

	#[test]
	fn endpoints_derive_from_domain() {
		let config = normalize(&options());

		assert_eq!(config.authorization_url, "https://test.auth0.com/authorize");
		assert_eq!(config.token_url, "https://test.auth0.com/oauth/token");
		assert_eq!(config.user_info_url, "https://test.auth0.com/userinfo");
	}

	#[test]
	fn caller_endpoints_take_precedence() {
		let config = normalize(
			&options()
				.with_authorization_url("https://login.example.com/authorize")
				.with_user_info_url("https://login.example.com/me"),
		);

		assert_eq!(config.authorization_url, "https://login.example.com/authorize");
		assert_eq!(config.token_url, "https://test.auth0.com/oauth/token");
		assert_eq!(config.user_info_url, "https://login.example.com/me");
	}

	#[test]
	fn state_defaults_only_when_absent() {
		assert!(normalize(&options()).state);
		assert!(!normalize(&options().with_state(false)).state);
		assert!(normalize(&options().with_state(true)).state);

		let null_state = StrategyConfig::from_value(&json!({
			"domain": "test.auth0.com",
			"clientID": "testid",
			"clientSecret": "testsecret",
			"callbackURL": "/callback",
			"state": null,
		}))
		.expect("Null state should normalize.");

		assert!(!null_state.state);
	}

	#[test]
	fn telemetry_header_added_by_default() {
		let config = normalize(&options());
		let header =
			config.custom_headers.get(TELEMETRY_HEADER).expect("Telemetry header should be set.");
		let telemetry =
			ClientTelemetry::decode(header).expect("Telemetry header should decode successfully.");

		assert_eq!(telemetry.name, "auth0-strategy");
		assert_eq!(telemetry.version, env!("CARGO_PKG_VERSION"));
		assert!(telemetry.env.contains_key(RUNTIME));
	}

	#[test]
	fn caller_headers_are_preserved() {
		let config = normalize(
			&options()
				.with_custom_header("testCustomHeader", "Test Custom Header")
				.with_custom_header(TELEMETRY_HEADER, "caller-value"),
		);

		assert_eq!(config.custom_headers["testCustomHeader"], "Test Custom Header");
		assert_eq!(config.custom_headers[TELEMETRY_HEADER], "caller-value");
		assert_eq!(config.custom_headers.len(), 2);
	}

	#[test]
	fn normalize_leaves_options_untouched() {
		let options = options().with_custom_header("X-Trace", "on");
		let before = options.clone();
		let mut config = normalize(&options);

		assert_eq!(options, before);
		assert!(options.authorization_url.is_none());
		assert!(options.state.is_none());
		assert!(
			!options
				.custom_headers
				.as_ref()
				.expect("Caller headers should remain present.")
				.contains_key(TELEMETRY_HEADER)
		);

		config.custom_headers.insert("X-Late".into(), "1".into());

		assert_eq!(options, before);
	}

	#[test]
	fn required_fields_are_reported_by_wire_name() {
		let mut missing_domain = options();

		missing_domain.domain = None;

		let mut empty_secret = options();

		empty_secret.client_secret = Some(Secret::new(""));

		assert!(matches!(
			StrategyConfig::normalize(&missing_domain),
			Err(ConfigError::MissingField { field: "domain" })
		));
		assert!(matches!(
			StrategyConfig::normalize(&empty_secret),
			Err(ConfigError::MissingField { field: "clientSecret" })
		));
		assert!(matches!(
			StrategyConfig::from_value(&json!({ "domain": "test.auth0.com" })),
			Err(ConfigError::MissingField { field: "clientID" })
		));
		assert!(matches!(StrategyConfig::from_value(&json!(42)), Err(ConfigError::NotAnObject)));
	}

	#[test]
	fn pass_through_fields_survive() {
		let config = StrategyConfig::from_value(&json!({
			"domain": "test.auth0.com",
			"clientID": "testid",
			"clientSecret": "testsecret",
			"callbackURL": "/callback",
			"skipUserProfile": true,
			"scope": ["openid", "email"],
			"scopeSeparator": ",",
			"responseMode": "form_post",
		}))
		.expect("JSON options should normalize.");

		assert!(config.skips_user_profile());
		assert_eq!(config.scope_param().as_deref(), Some("openid,email"));
		assert_eq!(config.extra.get("responseMode"), Some(&JsonValue::from("form_post")));
	}

	#[test]
	fn debug_output_redacts_secret() {
		let rendered = format!("{:?}", normalize(&options()));

		assert!(!rendered.contains("testsecret"));
		assert!(rendered.contains("<redacted>"));
	}

	#[test]
	fn callback_resolution_handles_relative_urls() {
		let config = normalize(&options());
		let origin = Url::parse("https://app.example.com").expect("Origin fixture should parse.");

		assert_eq!(
			config
				.resolve_callback_url(Some(&origin))
				.expect("Relative callback should resolve against the origin.")
				.as_str(),
			"https://app.example.com/callback"
		);
		assert!(matches!(
			config.resolve_callback_url(None),
			Err(ConfigError::RelativeCallback { .. })
		));

		let absolute = normalize(&StrategyOptions::new(
			"test.auth0.com",
			"testid",
			"testsecret",
			"https://app.example.com/auth/cb",
		));

		assert_eq!(
			absolute
				.resolve_callback_url(None)
				.expect("Absolute callback should not need an origin.")
				.as_str(),
			"https://app.example.com/auth/cb"
		);
	}
}
