//! `Auth0-Client` diagnostic header describing this library and its runtime.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, error::ConfigError};

/// Header key under which the telemetry descriptor is sent.
pub const TELEMETRY_HEADER: &str = "Auth0-Client";

/// Runtime key recorded inside [`ClientTelemetry::env`].
pub const RUNTIME: &str = "rust";

/// Version of the compiler that built this crate.
pub const RUSTC_VERSION: &str = env!("AUTH0_STRATEGY_RUSTC_VERSION");

/// Client descriptor sent to the provider as base64-encoded JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTelemetry {
	/// Library name.
	pub name: String,
	/// Library release version.
	pub version: String,
	/// Host runtime identifiers mapped to their versions.
	pub env: BTreeMap<String, String>,
}
impl ClientTelemetry {
	/// Describes this build of the crate.
	pub fn current() -> Self {
		Self {
			name: env!("CARGO_PKG_NAME").into(),
			version: env!("CARGO_PKG_VERSION").into(),
			env: BTreeMap::from([(RUNTIME.into(), RUSTC_VERSION.into())]),
		}
	}

	/// Encodes the descriptor as base64 (standard alphabet, padded) JSON.
	pub fn encode(&self) -> Result<String, ConfigError> {
		let json = serde_json::to_vec(self).map_err(ConfigError::Telemetry)?;

		Ok(STANDARD.encode(json))
	}

	/// Decodes a header value produced by [`ClientTelemetry::encode`].
	pub fn decode(value: &str) -> Result<Self, ConfigError> {
		let json = STANDARD.decode(value)?;

		serde_json::from_slice(&json).map_err(ConfigError::Telemetry)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn current_descriptor_names_crate_and_runtime() {
		let telemetry = ClientTelemetry::current();

		assert_eq!(telemetry.name, "auth0-strategy");
		assert_eq!(telemetry.version, env!("CARGO_PKG_VERSION"));
		assert!(telemetry.env.contains_key(RUNTIME));
	}

	#[test]
	fn runtime_version_is_the_building_compiler() {
		let telemetry = ClientTelemetry::current();
		let rust = telemetry.env.get(RUNTIME).expect("Runtime version should be recorded.");

		assert_eq!(rust, RUSTC_VERSION);
		assert_ne!(rust, env!("CARGO_PKG_RUST_VERSION"));
		assert_eq!(
			rust.split('-').next().map(|release| release.split('.').count()),
			Some(3),
			"Expected a full `major.minor.patch` version."
		);
	}

	#[test]
	fn encoded_value_is_plain_base64_json() {
		let encoded =
			ClientTelemetry::current().encode().expect("Telemetry should encode successfully.");
		let json = STANDARD.decode(&encoded).expect("Telemetry should be standard base64.");
		let value: JsonValue =
			serde_json::from_slice(&json).expect("Telemetry payload should be JSON.");

		assert_eq!(value["name"], "auth0-strategy");
		assert!(value["env"][RUNTIME].is_string());
		assert_eq!(
			ClientTelemetry::decode(&encoded).expect("Telemetry should decode successfully."),
			ClientTelemetry::current()
		);
	}

	#[test]
	fn decode_rejects_garbage() {
		assert!(matches!(
			ClientTelemetry::decode("not base64!"),
			Err(ConfigError::TelemetryEncoding(_))
		));
		assert!(matches!(
			ClientTelemetry::decode(&STANDARD.encode("[1, 2]")),
			Err(ConfigError::Telemetry(_))
		));
	}
}
