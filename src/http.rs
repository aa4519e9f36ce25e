//! Transport primitives for the code exchange and userinfo requests.
//!
//! [`ReqwestHttpClient`] hands the `oauth2` crate short-lived [`HeaderInjectingHandle`]s
//! that stamp the configured custom headers (the `Auth0-Client` telemetry header among
//! them) onto every request and publish the response status into a
//! [`ResponseMetadataSlot`] for error mapping.

// crates.io
#[cfg(feature = "reqwest")]
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use oauth2::http::{HeaderMap, HeaderName, HeaderValue};
// self
use crate::{_prelude::*, error::ConfigError};

/// Captures metadata from the most recent HTTP response for downstream error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the provider, if available.
	pub status: Option<u16>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
///
/// A fresh slot is created for each provider request and read right after `oauth2`
/// resolves.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Converts configured custom headers into an HTTP header map.
pub fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ConfigError> {
	let mut map = HeaderMap::with_capacity(headers.len());

	for (name, value) in headers {
		let invalid = || ConfigError::InvalidHeader { name: name.clone() };
		let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;

		map.insert(header_name, header_value);
	}

	Ok(map)
}

/// Copies `extra` into `target` without replacing headers the request already sets.
pub fn merge_missing_headers(target: &mut HeaderMap, extra: &HeaderMap) {
	for (name, value) in extra {
		if !target.contains_key(name) {
			target.insert(name.clone(), value.clone());
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects; configure any custom [`ReqwestClient`]
/// accordingly before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a handle that injects `headers` and records outcomes in `slot`.
	pub fn with_headers(
		&self,
		headers: HeaderMap,
		slot: ResponseMetadataSlot,
	) -> HeaderInjectingHandle {
		let client = HeaderInjectingClient { client: self.0.clone(), headers, slot };

		HeaderInjectingHandle(Arc::new(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}

#[cfg(feature = "reqwest")]
struct HeaderInjectingClient {
	client: ReqwestClient,
	headers: HeaderMap,
	slot: ResponseMetadataSlot,
}

/// [`AsyncHttpClient`] handle returned by [`ReqwestHttpClient::with_headers`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct HeaderInjectingHandle(Arc<HeaderInjectingClient>);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for HeaderInjectingHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, mut request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();
			merge_missing_headers(request.headers_mut(), &client.headers);

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			client.slot.store(ResponseMetadata { status: Some(status.as_u16()) });

			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn header_map_rejects_invalid_names_and_values() {
		let bad_name = BTreeMap::from([("bad header".to_owned(), "1".to_owned())]);
		let bad_value = BTreeMap::from([("X-Test".to_owned(), "line\nbreak".to_owned())]);

		assert!(matches!(
			header_map(&bad_name),
			Err(ConfigError::InvalidHeader { name }) if name == "bad header"
		));
		assert!(matches!(header_map(&bad_value), Err(ConfigError::InvalidHeader { .. })));
	}

	#[test]
	fn merge_keeps_request_headers() {
		let configured = header_map(&BTreeMap::from([
			("Auth0-Client".to_owned(), "configured".to_owned()),
			("X-Extra".to_owned(), "extra".to_owned()),
		]))
		.expect("Configured headers should be valid.");
		let mut request = HeaderMap::new();

		request.insert("auth0-client", HeaderValue::from_static("request"));
		merge_missing_headers(&mut request, &configured);

		assert_eq!(request.get("Auth0-Client").map(HeaderValue::as_bytes), Some(&b"request"[..]));
		assert_eq!(request.get("x-extra").map(HeaderValue::as_bytes), Some(&b"extra"[..]));
	}

	#[test]
	fn metadata_slot_take_consumes() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(401) });

		assert_eq!(slot.take().and_then(|meta| meta.status), Some(401));
		assert!(slot.take().is_none());
	}
}
