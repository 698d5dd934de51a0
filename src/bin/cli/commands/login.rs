use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub async fn run(app: &mut App, email: &str, password: &str, format: &OutputFormat) -> Result<()> {
    let token = app
        .store
        .repository()
        .login(email, password)
        .await
        .context("Login failed")?;
    app.store_token(token)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "email": email,
                "configPath": app.config_path.to_string_lossy(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Logged in as {}", email);
            println!("  Token saved to {}", app.config_path.display());
        }
    }
    Ok(())
}
