//! Auth0 strategy for OAuth 2.0 authorization-code logins: derived tenant endpoints,
//! telemetry headers, and allow-listed authorize parameters on top of a pluggable
//! code exchange.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod params;
pub mod strategy;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for unit and integration tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::StrategyOptions,
		strategy::{Auth0Strategy, AuthRequest, Verified, VerifyContext, VerifyFn, verify_fn},
	};

	/// Verify callback type used across tests; accepts every login and returns the subject.
	pub type SubjectVerify = VerifyFn<fn(VerifyContext) -> Result<Verified<String>>>;

	/// Options pointing at the canonical `test.auth0.com` tenant.
	pub fn test_options() -> StrategyOptions {
		StrategyOptions::new("test.auth0.com", "testid", "testsecret", "/callback")
	}

	/// Options whose token and userinfo endpoints point at a local mock server.
	pub fn mock_options(
		token_url: impl Into<String>,
		user_info_url: impl Into<String>,
	) -> StrategyOptions {
		test_options().with_token_url(token_url).with_user_info_url(user_info_url)
	}

	/// Origin that relative callback URLs in [`test_options`] resolve against.
	pub fn test_origin() -> Url {
		Url::parse("https://app.example.com").expect("Test origin should parse.")
	}

	/// Callback request carrying `code` from [`test_origin`].
	pub fn test_callback(code: &str) -> AuthRequest {
		AuthRequest::new().with_query("code", code).with_origin(test_origin())
	}

	/// Verify callback that resolves the profile `sub` (or `anonymous`) as the user.
	pub fn subject_verify() -> SubjectVerify {
		let verify: fn(VerifyContext) -> Result<Verified<String>> = |ctx| {
			let subject = ctx
				.profile
				.as_ref()
				.and_then(|profile| profile.get("sub"))
				.and_then(JsonValue::as_str)
				.unwrap_or("anonymous")
				.to_owned();

			Ok(Verified::User(subject))
		};

		verify_fn(verify)
	}

	/// Constructs an [`Auth0Strategy`] backed by the default reqwest exchange.
	pub fn build_test_strategy(options: &StrategyOptions) -> Auth0Strategy<SubjectVerify> {
		Auth0Strategy::new(options, subject_verify())
			.expect("Test strategy should build from valid options.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
