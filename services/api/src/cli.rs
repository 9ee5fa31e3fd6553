use crate::admin::{run_activity, run_create_admin, ActivityArgs, CreateAdminArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_hub::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Hub",
    about = "Run and operate the Talent Hub recruiting API from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Create an administrator account in the configured database
    CreateAdmin(CreateAdminArgs),
    /// Print the most recent activity log entries
    Activity(ActivityArgs),
    /// Walk through the offer, application and deletion flow on a scratch database
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::CreateAdmin(args) => run_create_admin(args),
        Command::Activity(args) => run_activity(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["talent-hub"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_admin_and_activity_flags() {
        let cli = Cli::try_parse_from([
            "talent-hub",
            "create-admin",
            "--email",
            "root@talent.test",
            "--password",
            "secret",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::CreateAdmin(args)) => assert_eq!(args.email, "root@talent.test"),
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["talent-hub", "activity", "--limit", "5"]).expect("parses");
        match cli.command {
            Some(Command::Activity(args)) => assert_eq!(args.limit, 5),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_binding_overrides() {
        let cli = Cli::try_parse_from(["talent-hub", "serve", "--host", "0.0.0.0", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(8080));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
