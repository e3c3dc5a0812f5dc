//! Legacy Earth Engine sign-in command

use crate::cli::EeCommand;
use crate::interactive;
use crate::output::OutputWriter;
use crate::output_types::EeSigninOutput;
use crate::workspace::Workspace;
use anyhow::Result;
use chlmon_client::earthengine::{is_oauth_callback, TokenPrompt};
use chlmon_client::{LegacyBootstrap, OAuthSettings, RestEarthEngine};
use chlmon_core::config::CliConfigOverrides;
use chlmon_core::error::ChlmonError;

pub async fn execute(
    command: EeCommand,
    mut overrides: CliConfigOverrides,
    output: &OutputWriter,
) -> Result<()> {
    let workspace = Workspace::find()?;

    match command {
        EeCommand::Signin { access_token, client_id, project } => {
            overrides.ee_client_id = client_id;
            overrides.ee_project = project;
            let config = workspace.load_config(overrides)?;
            let settings = OAuthSettings::from_config(&config)?;

            let callback = access_token.as_deref().is_some_and(is_oauth_callback);
            let prompt: TokenPrompt = match access_token.clone() {
                Some(token) => {
                    Box::new(move |_: &str| -> chlmon_core::Result<String> { Ok(token.clone()) })
                }
                None => Box::new(|url: &str| {
                    interactive::prompt_redirect(url).map_err(|e| ChlmonError::Sdk {
                        stage: "OAuth".to_string(),
                        reason: e.to_string(),
                    })
                }),
            };
            let sdk = RestEarthEngine::new(config.ee_project.value.clone(), prompt)
                .with_session_file(workspace.ee_session_path());
            let mut flow = LegacyBootstrap::new(sdk, settings);

            if let Some(url) = access_token.as_deref().filter(|_| callback) {
                flow.detect_redirect(url);
                output.status(format!("Status: {}", flow.status()));
            }

            let result = flow.sign_in().await;

            if output.is_json() {
                let report = result?;
                return output.result(EeSigninOutput {
                    status: flow.status().to_string(),
                    asset_roots: report.asset_roots,
                    sample_mean: report.sample_mean,
                    log: flow.log().to_vec(),
                });
            }

            for line in flow.log() {
                output.info(line);
            }
            output.status(format!("Status: {}", flow.status()));
            result?;
            output.success("Earth Engine ready. Sign out with 'chlmon ee signout'");
        }
        EeCommand::Signout => {
            let config = workspace.load_config(overrides)?;
            let settings = OAuthSettings::new(config.ee_client_id.value.clone().unwrap_or_default());
            let prompt: TokenPrompt = Box::new(|_: &str| -> chlmon_core::Result<String> {
                Err(ChlmonError::Sdk {
                    stage: "OAuth".to_string(),
                    reason: "Sign-in is not available during sign-out".to_string(),
                })
            });
            let sdk = RestEarthEngine::new(config.ee_project.value.clone(), prompt)
                .with_session_file(workspace.ee_session_path());
            let mut flow = LegacyBootstrap::new(sdk, settings);

            flow.sign_out()?;

            if output.is_json() {
                output.result(serde_json::json!({
                    "status": flow.status(),
                    "log": flow.log(),
                }))?;
            } else {
                for line in flow.log() {
                    output.info(line);
                }
                output.success(flow.status());
            }
        }
    }

    Ok(())
}
