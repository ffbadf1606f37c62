use colored::Colorize;
use novafleet_auth::CredentialResolver;
use novafleet_config::FleetConfig;

/// Resolve credentials without contacting any service and show where they came from
pub fn handle_show(config: &FleetConfig) -> anyhow::Result<()> {
    let credentials = CredentialResolver::new(config.keystonerc_path()).resolve()?;
    let workflow = credentials.workflow_auth(config.mistral_url.as_deref());

    println!("{:<14} {}", "source:".bold(), credentials.source().to_string().cyan());
    println!("{:<14} {}", "username:".bold(), workflow.username);
    println!("{:<14} {}", "project:".bold(), workflow.project_name);
    println!("{:<14} {}", "auth_url:".bold(), workflow.auth_url);
    match workflow.mistral_url {
        Some(url) => println!("{:<14} {}", "mistral_url:".bold(), url),
        None => println!("{:<14} {}", "mistral_url:".bold(), "(not configured)".dimmed()),
    }
    Ok(())
}
