//! Builds an Auth0 strategy, issues the authorization redirect for a login request, and
//! shows how a provider-side callback error is reported.

// crates.io
use color_eyre::Result;
use serde_json::json;
use url::Url;
// self
use auth0_strategy::{
	config::StrategyOptions,
	strategy::{Auth0Strategy, AuthOutcome, AuthRequest, Verified, VerifyContext, verify_fn},
};

fn accept(ctx: VerifyContext) -> auth0_strategy::error::Result<Verified<String>> {
	let subject = ctx
		.profile
		.as_ref()
		.and_then(|profile| profile.get("sub"))
		.and_then(|value| value.as_str())
		.unwrap_or("anonymous");

	Ok(Verified::User(subject.to_owned()))
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let options =
		StrategyOptions::new("demo.auth0.com", "demo-client", "demo-secret", "/oauth/callback")
			.with_scope(["openid", "profile", "email"]);
	let strategy = Auth0Strategy::new(&options, verify_fn(accept))?;
	let login = AuthRequest::from_url(&Url::parse("https://app.example.com/login")?);
	let request_options = json!({ "connection": "github", "prompt": "login", "audience": 42 });

	if let AuthOutcome::Redirect(redirect) =
		strategy.authenticate(&login, Some(&request_options)).await?
	{
		println!("Send your user to {}.", redirect.url);

		if let Some(state) = &redirect.state {
			println!("Store state `{state}` and compare it on the callback.");
		}
	}

	let callback = AuthRequest::from_url(&Url::parse(
		"https://app.example.com/oauth/callback?error=access_denied&state=abc",
	)?);

	if let AuthOutcome::Fail { challenge } = strategy.authenticate(&callback, None).await? {
		println!("Callback failed with {challenge:?}; no token request was made.");
	}

	Ok(())
}
