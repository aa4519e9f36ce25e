//! Allow-listed extra parameters merged into the authorization redirect.
//!
//! Request-time options are loosely typed (`serde_json::Value`), so each rule in
//! [`AUTHORIZATION_PARAM_RULES`] decides whether a value is forwarded. Values of the
//! wrong type are dropped without an error, and nothing is coerced: `{"audience": 42}`
//! yields no `audience` parameter.

// self
use crate::_prelude::*;

/// Forwarding rule for a single authorization parameter.
#[derive(Clone, Copy, Debug)]
pub struct ParamRule {
	/// Parameter name, identical in the options and in the query string.
	pub name: &'static str,
	/// Extracts the value to forward, or `None` when the value is not acceptable.
	pub accept: fn(&JsonValue) -> Option<&str>,
	/// Parameter that must already have been accepted in the same invocation.
	pub requires: Option<&'static str>,
}

/// Rules evaluated in order; a dependency must precede its dependents.
pub const AUTHORIZATION_PARAM_RULES: [ParamRule; 6] = [
	ParamRule { name: "connection", accept: JsonValue::as_str, requires: None },
	ParamRule { name: "connection_scope", accept: JsonValue::as_str, requires: Some("connection") },
	ParamRule { name: "audience", accept: JsonValue::as_str, requires: None },
	ParamRule { name: "prompt", accept: JsonValue::as_str, requires: None },
	ParamRule { name: "login_hint", accept: JsonValue::as_str, requires: None },
	ParamRule { name: "acr_values", accept: JsonValue::as_str, requires: None },
];

/// Extra authorization parameters produced by [`map_authorization_params`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizationParams(BTreeMap<String, String>);
impl AuthorizationParams {
	/// Returns the value forwarded for `name`, if any.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Returns true when `name` is forwarded.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Number of forwarded parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when nothing is forwarded.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over forwarded name/value pairs, ordered by name.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
	}
}
impl IntoIterator for AuthorizationParams {
	type IntoIter = std::collections::btree_map::IntoIter<String, String>;
	type Item = (String, String);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// Builds the allow-listed parameter set from request-time options.
///
/// `None`, an empty object, and any non-object value all produce an empty set.
pub fn map_authorization_params(options: Option<&JsonValue>) -> AuthorizationParams {
	let mut params = BTreeMap::new();
	let Some(options) = options.and_then(JsonValue::as_object) else {
		return AuthorizationParams(params);
	};

	for rule in AUTHORIZATION_PARAM_RULES {
		if rule.requires.is_some_and(|dependency| !params.contains_key(dependency)) {
			continue;
		}
		if let Some(value) = options.get(rule.name).and_then(rule.accept) {
			params.insert(rule.name.to_owned(), value.to_owned());
		}
	}

	AuthorizationParams(params)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn map(options: JsonValue) -> AuthorizationParams {
		map_authorization_params(Some(&options))
	}

	#[test]
	fn string_values_are_forwarded() {
		let params = map(json!({
			"connection": "foo",
			"audience": "https://api.example.com",
			"prompt": "login",
			"login_hint": "test.user@auth0.com",
			"acr_values": "dummy:1",
		}));

		assert_eq!(params.get("connection"), Some("foo"));
		assert_eq!(params.get("audience"), Some("https://api.example.com"));
		assert_eq!(params.get("prompt"), Some("login"));
		assert_eq!(params.get("login_hint"), Some("test.user@auth0.com"));
		assert_eq!(params.get("acr_values"), Some("dummy:1"));
		assert_eq!(params.len(), 5);
	}

	#[test]
	fn non_string_values_are_dropped() {
		for name in ["connection", "audience", "prompt", "login_hint", "acr_values"] {
			let params = map(json!({ name: 42 }));

			assert!(!params.contains(name), "Numeric `{name}` must not be forwarded.");
		}

		assert!(map(json!({ "prompt": null, "audience": ["a"], "login_hint": true })).is_empty());
	}

	#[test]
	fn connection_scope_requires_connection() {
		assert!(!map(json!({ "connection_scope": "foo" })).contains("connection_scope"));
		assert!(
			!map(json!({ "connection": 42, "connection_scope": "foo" })).contains("connection_scope")
		);
		assert!(
			!map(json!({ "connection": "foo", "connection_scope": 42 })).contains("connection_scope")
		);

		let params = map(json!({ "connection": "foo", "connection_scope": "bar" }));

		assert_eq!(params.get("connection"), Some("foo"));
		assert_eq!(params.get("connection_scope"), Some("bar"));
	}

	#[test]
	fn unknown_keys_never_leak() {
		let params = map(json!({ "scope": "openid", "state": "abc", "connection": "foo" }));

		assert_eq!(params.iter().collect::<Vec<_>>(), vec![("connection", "foo")]);
	}

	#[test]
	fn missing_or_empty_options_yield_nothing() {
		assert!(map_authorization_params(None).is_empty());
		assert!(map(json!({})).is_empty());
		assert!(map(json!("connection")).is_empty());
	}
}
