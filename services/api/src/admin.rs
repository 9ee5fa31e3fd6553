use crate::infra::connect;
use clap::Args;
use talent_hub::config::AppConfig;
use talent_hub::error::AppError;
use talent_hub::telemetry;

#[derive(Args, Debug)]
pub(crate) struct CreateAdminArgs {
    /// Login email of the administrator account
    #[arg(long)]
    pub(crate) email: String,
    /// Initial password for the account
    #[arg(long)]
    pub(crate) password: String,
}

#[derive(Args, Debug)]
pub(crate) struct ActivityArgs {
    /// Number of entries to print, newest first
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
}

pub(crate) fn run_create_admin(args: CreateAdminArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let api = connect(&config)?;
    let user = api.identity.create_admin(&args.email, &args.password)?;
    println!("Created administrator #{} <{}>", user.id, user.email);
    Ok(())
}

pub(crate) fn run_activity(args: ActivityArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let api = connect(&config)?;

    let entries = api.activity.recent(args.limit)?;
    if entries.is_empty() {
        println!("No activity recorded yet.");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{}  user #{:<5} {:<28} {}",
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.user_id,
            entry.action,
            entry.description
        );
    }
    Ok(())
}
