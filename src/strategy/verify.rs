//! Verify callback invoked once tokens (and the profile) have been retrieved.

// self
use crate::{
	_prelude::*,
	oauth::{ExchangedTokens, Profile},
};

/// Boxed future returned by [`Verify::verify`].
pub type VerifyFuture<'a, U> = Pin<Box<dyn Future<Output = Result<Verified<U>>> + 'a + Send>>;

/// Data handed to the verify callback after a successful code exchange.
#[derive(Clone, Debug)]
pub struct VerifyContext {
	/// Tokens returned by the token endpoint.
	pub tokens: ExchangedTokens,
	/// Userinfo document, absent when `skipUserProfile` is set.
	pub profile: Option<Profile>,
}

/// Decision returned by the verify callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verified<U> {
	/// Login accepted for this user.
	User(U),
	/// Login refused, with an optional challenge for the host.
	Rejected(Option<String>),
}

/// Host-supplied callback that maps tokens and profile to an application user.
pub trait Verify
where
	Self: Send + Sync,
{
	/// Application user type.
	type User: Send;

	/// Accepts or rejects the login; errors surface as [`Error::Verify`] or any other
	/// [`Error`] the host chooses.
	fn verify(&self, ctx: VerifyContext) -> VerifyFuture<'_, Self::User>;
}

/// [`Verify`] adapter for synchronous closures, built with [`verify_fn`].
#[derive(Clone, Copy)]
pub struct VerifyFn<F>(F);
impl<F, U> Verify for VerifyFn<F>
where
	F: Fn(VerifyContext) -> Result<Verified<U>> + Send + Sync,
	U: 'static + Send,
{
	type User = U;

	fn verify(&self, ctx: VerifyContext) -> VerifyFuture<'_, U> {
		let verified = (self.0)(ctx);

		Box::pin(async move { verified })
	}
}
impl<F> Debug for VerifyFn<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("VerifyFn(..)")
	}
}

/// Wraps a synchronous closure as a [`Verify`] callback.
pub fn verify_fn<F, U>(f: F) -> VerifyFn<F>
where
	F: Fn(VerifyContext) -> Result<Verified<U>> + Send + Sync,
{
	VerifyFn(f)
}
