use anyhow::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompt for a Google ID token
pub fn prompt_id_token() -> Result<String> {
    let token = Password::new().with_prompt("Google ID token").interact()?;
    Ok(token)
}

/// Show the authorization URL and read back the redirect URL or token
pub fn prompt_redirect(authorization_url: &str) -> Result<String> {
    eprintln!("\nOpen this URL in a browser and grant access:\n\n  {}\n", authorization_url);
    let answer: String = Input::new()
        .with_prompt("Paste the redirect URL (or the access token)")
        .interact_text()?;
    Ok(answer)
}

pub fn confirm(prompt: &str) -> Result<bool> {
    let confirmed = Confirm::new().with_prompt(prompt).default(false).interact()?;
    Ok(confirmed)
}
