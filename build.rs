fn main() -> rustc_version::Result<()> {
	let version = rustc_version::version()?;

	println!("cargo:rustc-env=AUTH0_STRATEGY_RUSTC_VERSION={version}");
	println!("cargo:rerun-if-env-changed=RUSTC");

	Ok(())
}
