//! Auth command implementation

use crate::cli::AuthCommand;
use crate::interactive;
use crate::output::OutputWriter;
use crate::progress::with_spinner;
use crate::workspace::Workspace;
use anyhow::Result;
use chlmon_client::IdentityExchange;
use chlmon_core::config::CliConfigOverrides;
use chlmon_core::ports::SessionStore;

pub async fn execute(
    command: AuthCommand,
    overrides: CliConfigOverrides,
    output: &OutputWriter,
) -> Result<()> {
    let workspace = Workspace::find()?;

    match command {
        AuthCommand::Signin { id_token } => {
            let credential = match id_token {
                Some(token) => token,
                None => interactive::prompt_id_token()?,
            };
            let config = workspace.load_config(overrides)?;
            let exchange = IdentityExchange::new(workspace.api_client(&config)?, workspace.sessions());

            let session =
                with_spinner("Signing in…", output.is_json(), exchange.sign_in(&credential)).await?;

            if output.is_json() {
                output.result(serde_json::json!({ "email": session.email }))?;
            } else {
                output.success(session.badge());
            }
        }
        AuthCommand::Whoami => {
            let session = workspace.sessions().load()?;
            if output.is_json() {
                output.result(serde_json::json!({ "email": session.map(|s| s.email) }))?;
            } else {
                match session {
                    Some(session) => output.info(session.badge()),
                    None => output.info("Not signed in. Run 'chlmon auth signin'"),
                }
            }
        }
        AuthCommand::Forget => {
            let config = workspace.load_config(overrides)?;
            IdentityExchange::new(workspace.api_client(&config)?, workspace.sessions()).forget()?;
            if output.is_json() {
                output.result(serde_json::json!({ "signed_in": false }))?;
            } else {
                output.success("Session cleared");
            }
        }
    }

    Ok(())
}
