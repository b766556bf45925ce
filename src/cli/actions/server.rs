use crate::{api, cli::actions::Action, cli::globals::GlobalArgs};
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::{debug, warn};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            jwt_secret,
            frontend_url,
            production,
        } => {
            // Fail on a malformed DSN at startup instead of on the first query.
            let parsed = Url::parse(&dsn).context("Invalid database DSN")?;

            debug!(
                host = parsed.host_str(),
                database = parsed.path().trim_start_matches('/'),
                "Connecting to database"
            );

            let mut globals = GlobalArgs::new(frontend_url, production);

            match jwt_secret {
                Some(secret) => globals.set_jwt_secret(SecretString::from(secret)),
                None => {
                    // The server still starts; login returns a configuration
                    // error until a secret is provided.
                    warn!("No signing secret configured, logins will fail");
                }
            }

            api::new(port, dsn, globals).await?;
        }
    }

    Ok(())
}
