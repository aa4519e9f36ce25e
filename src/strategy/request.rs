// self
use crate::_prelude::*;

/// Incoming request as seen by the strategy: decoded query pairs plus the origin used to
/// resolve a relative callback URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthRequest {
	query: BTreeMap<String, String>,
	origin: Option<Url>,
}
impl AuthRequest {
	/// Creates an empty request with no origin.
	pub fn new() -> Self {
		Self::default()
	}

	/// Captures the query pairs (first value wins) and the HTTP origin of `url`.
	pub fn from_url(url: &Url) -> Self {
		let mut query = BTreeMap::new();

		for (name, value) in url.query_pairs() {
			query.entry(name.into_owned()).or_insert_with(|| value.into_owned());
		}

		let origin = url.origin();
		let origin = if origin.is_tuple() {
			Url::parse(&origin.ascii_serialization()).ok()
		} else {
			None
		};

		Self { query, origin }
	}

	/// Adds or replaces a query pair.
	pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(name.into(), value.into());

		self
	}

	/// Sets the origin used to resolve relative callback URLs.
	pub fn with_origin(mut self, origin: Url) -> Self {
		self.origin = Some(origin);

		self
	}

	/// Returns the non-empty value of query parameter `name`.
	pub fn query(&self, name: &str) -> Option<&str> {
		self.query.get(name).map(String::as_str).filter(|value| !value.is_empty())
	}

	/// Returns the request origin, if known.
	pub fn origin(&self) -> Option<&Url> {
		self.origin.as_ref()
	}
}
