//! `sift login`: the PKCE sign-in flow

use sift_auth::{authorize_url, complete_login, PkceChallenge};
use sift_core::SiftConfig;

pub async fn run(config: &SiftConfig) -> anyhow::Result<()> {
    let client_id = config.require_client_id()?;
    let pkce = PkceChallenge::generate();
    let url = authorize_url(client_id, &config.redirect_uri(), &pkce);

    println!("Open this URL in your browser to sign in:\n");
    println!("  {url}\n");
    println!(
        "Waiting for the redirect on 127.0.0.1:{}...",
        config.redirect_port
    );

    complete_login(config, pkce).await?;
    println!("Signed in. Tokens cached under {}.", SiftConfig::config_dir().display());
    Ok(())
}
