//! Code exchange collaborator: trades an authorization code for tokens and loads the
//! userinfo profile.
//!
//! [`CodeExchange`] is the seam the strategy delegates to; [`OAuth2Exchange`] is the
//! default implementation, built on the `oauth2` crate and [`ReqwestHttpClient`].

// std
#[cfg(feature = "reqwest")]
use std::borrow::Cow;
// crates.io
#[cfg(feature = "reqwest")]
use oauth2::{
	AuthType, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	ExtraTokenFields, HttpClientError, RedirectUrl, RequestTokenError, StandardRevocableToken,
	StandardTokenResponse, TokenResponse, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse, BasicTokenType,
	},
	http::HeaderMap,
};
// self
use crate::{_prelude::*, config::Secret};
#[cfg(feature = "reqwest")]
use crate::{
	config::StrategyConfig,
	error::{ConfigError, TransientError, TransportError},
	http::{self, ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

/// Boxed future returned by [`CodeExchange`] methods.
pub type ExchangeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Generic authorization-code exchange the strategy delegates to.
pub trait CodeExchange
where
	Self: Send + Sync,
{
	/// Exchanges `code` at the token endpoint; `redirect_uri` must match the authorize call.
	fn exchange_code<'a>(
		&'a self,
		code: &'a str,
		redirect_uri: &'a Url,
	) -> ExchangeFuture<'a, ExchangedTokens>;

	/// Loads the userinfo document for `access_token`.
	fn fetch_profile<'a>(&'a self, access_token: &'a Secret) -> ExchangeFuture<'a, Profile>;
}

/// Tokens returned by a successful code exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangedTokens {
	/// Access token.
	pub access_token: Secret,
	/// Refresh token, when `offline_access` was granted.
	pub refresh_token: Option<Secret>,
	/// OpenID Connect ID token, when `openid` was requested.
	pub id_token: Option<Secret>,
	/// Token type reported by the provider (usually `bearer`).
	pub token_type: String,
	/// Lifetime of the access token in seconds.
	pub expires_in: Option<u64>,
	/// Scopes granted, when the provider reports them.
	pub scope: Option<Vec<String>>,
}

/// Raw userinfo document; its schema belongs to the provider.
pub type Profile = JsonMap<String, JsonValue>;

/// Token response fields Auth0 adds on top of RFC 6749.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdTokenFields {
	/// OpenID Connect ID token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id_token: Option<String>,
}
#[cfg(feature = "reqwest")]
impl ExtraTokenFields for IdTokenFields {}

#[cfg(feature = "reqwest")]
type Auth0TokenResponse = StandardTokenResponse<IdTokenFields, BasicTokenType>;
#[cfg(feature = "reqwest")]
type ConfiguredClient = oauth2::Client<
	BasicErrorResponse,
	Auth0TokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;

/// Default [`CodeExchange`] backed by `oauth2` + reqwest.
///
/// Client credentials travel in the token request body and every request carries the
/// configured custom headers.
#[cfg(feature = "reqwest")]
pub struct OAuth2Exchange {
	oauth_client: ConfiguredClient,
	http_client: ReqwestHttpClient,
	headers: HeaderMap,
	user_info_url: Url,
}
#[cfg(feature = "reqwest")]
impl OAuth2Exchange {
	/// Builds the exchange from a normalized configuration.
	pub fn from_config(config: &StrategyConfig, http_client: ReqwestHttpClient) -> Result<Self> {
		let token_url = Url::parse(&config.token_url)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "token", source })?;
		let user_info_url = Url::parse(&config.user_info_url)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "userinfo", source })?;
		let headers = http::header_map(&config.custom_headers)?;
		let client_id = ClientId::new(config.client_id.clone());
		let oauth_client: ConfiguredClient = oauth2::Client::new(client_id)
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_token_uri(TokenUrl::from_url(token_url))
			.set_auth_type(AuthType::RequestBody);

		Ok(Self { oauth_client, http_client, headers, user_info_url })
	}

	/// Builds the userinfo GET; configured headers never replace the bearer credentials.
	fn user_info_request(&self, access_token: &Secret) -> Result<reqwest::Request> {
		let mut request = self
			.http_client
			.as_ref()
			.get(self.user_info_url.clone())
			.bearer_auth(access_token.expose())
			.build()
			.map_err(map_reqwest_error)?;

		http::merge_missing_headers(request.headers_mut(), &self.headers);

		Ok(request)
	}
}
#[cfg(feature = "reqwest")]
impl CodeExchange for OAuth2Exchange {
	fn exchange_code<'a>(
		&'a self,
		code: &'a str,
		redirect_uri: &'a Url,
	) -> ExchangeFuture<'a, ExchangedTokens> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let handle = self.http_client.with_headers(self.headers.clone(), meta.clone());
			let redirect_url = RedirectUrl::from_url(redirect_uri.clone());
			let response = self
				.oauth_client
				.exchange_code(AuthorizationCode::new(code.to_owned()))
				.set_redirect_uri(Cow::Owned(redirect_url))
				.request_async(&handle)
				.await
				.map_err(|err| map_request_error(meta.take(), err))?;

			Ok(map_token_response(response))
		})
	}

	fn fetch_profile<'a>(&'a self, access_token: &'a Secret) -> ExchangeFuture<'a, Profile> {
		Box::pin(async move {
			let request = self.user_info_request(access_token)?;
			let response =
				self.http_client.as_ref().execute(request).await.map_err(map_reqwest_error)?;
			let status = response.status();

			if !status.is_success() {
				return Err(Error::from(TransientError::UserInfo {
					message: format!("userinfo request failed with {status}"),
					status: Some(status.as_u16()),
				}));
			}

			let body = response.bytes().await.map_err(map_reqwest_error)?;
			let mut deserializer = serde_json::Deserializer::from_slice(&body);
			let status = Some(status.as_u16());

			serde_path_to_error::deserialize(&mut deserializer)
				.map_err(|source| Error::from(TransientError::UserInfoParse { source, status }))
		})
	}
}
#[cfg(feature = "reqwest")]
impl Debug for OAuth2Exchange {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Exchange")
			.field("client_id", &self.oauth_client.client_id().as_str())
			.field("token_url", &self.oauth_client.token_uri().as_str())
			.field("user_info_url", &self.user_info_url.as_str())
			.finish()
	}
}

#[cfg(feature = "reqwest")]
fn map_token_response(response: Auth0TokenResponse) -> ExchangedTokens {
	ExchangedTokens {
		access_token: Secret::new(response.access_token().secret().as_str()),
		refresh_token: response.refresh_token().map(|token| Secret::new(token.secret().as_str())),
		id_token: response.extra_fields().id_token.clone().map(Secret::new),
		token_type: response.token_type().as_ref().to_owned(),
		expires_in: response.expires_in().map(|lifetime| lifetime.as_secs()),
		scope: response
			.scopes()
			.map(|scopes| scopes.iter().map(|scope| scope.as_ref().to_owned()).collect()),
	}
}

#[cfg(feature = "reqwest")]
fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => {
			let code = response.error().as_ref().to_owned();
			let reason = response.error_description().cloned().unwrap_or_else(|| code.clone());

			classify_oauth_error(&code, reason, status)
		},
		RequestTokenError::Request(error) => map_transport_error(status, error),
		RequestTokenError::Parse(source, _body) =>
			TransientError::TokenResponseParse { source, status }.into(),
		RequestTokenError::Other(message) =>
			TransientError::TokenEndpoint { message, status }.into(),
	}
}

#[cfg(feature = "reqwest")]
fn classify_oauth_error(code: &str, reason: String, status: Option<u16>) -> Error {
	if code.eq_ignore_ascii_case("invalid_grant") || code.eq_ignore_ascii_case("access_denied") {
		Error::InvalidGrant { reason }
	} else if code.eq_ignore_ascii_case("invalid_client")
		|| code.eq_ignore_ascii_case("unauthorized_client")
	{
		Error::InvalidClient { reason }
	} else {
		TransientError::TokenEndpoint { message: format!("{code}: {reason}"), status }.into()
	}
}

#[cfg(feature = "reqwest")]
fn map_transport_error(status: Option<u16>, err: HttpClientError<ReqwestError>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransientError::TokenEndpoint { message, status }.into(),
		_ => TransientError::TokenEndpoint {
			message: "HTTP client error occurred while calling the token endpoint".into(),
			status,
		}
		.into(),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::TokenEndpoint {
			message: "request timed out".into(),
			status: err.status().map(|code| code.as_u16()),
		}
		.into();
	}

	TransportError::from(err).into()
}
