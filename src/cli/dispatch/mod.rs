//! Command-line argument dispatch and server initialization.
//!
//! This module maps validated CLI arguments to the appropriate action:
//! starting the API server with its full configuration state, or seeding
//! the initial admin account and service catalog.

use crate::cli::{
    actions::{seed, server, Action},
    commands::{self, auth, email},
};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let dsn = matches
        .get_one::<String>(commands::ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    if let Some(seed_matches) = matches.subcommand_matches(commands::CMD_SEED) {
        let admin_email = seed_matches
            .get_one::<String>(commands::ARG_ADMIN_EMAIL)
            .cloned()
            .context("missing required argument: --admin-email")?;
        let admin_password = seed_matches
            .get_one::<String>(commands::ARG_ADMIN_PASSWORD)
            .cloned()
            .context("missing required argument: --admin-password")?;
        let admin_name = seed_matches
            .get_one::<String>(commands::ARG_ADMIN_NAME)
            .cloned()
            .unwrap_or_else(|| "Admin User".to_string());

        return Ok(Action::Seed(seed::Args {
            dsn,
            admin_email,
            admin_password: SecretString::from(admin_password),
            admin_name,
        }));
    }

    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);

    let auth_opts = auth::Options::parse(matches)?;
    let email_opts = email::Options::parse(matches)?;

    Ok(Action::Server(server::Args {
        port,
        dsn,
        session_secret: auth_opts.session_secret,
        base_url: auth_opts.base_url,
        email_endpoint: email_opts.endpoint,
        email_from: email_opts.from,
        email_to: email_opts.to,
        email_outbox_poll_seconds: email_opts.poll_seconds,
        email_outbox_batch_size: email_opts.batch_size,
        email_outbox_max_attempts: email_opts.max_attempts,
        email_outbox_backoff_base_seconds: email_opts.backoff_base_seconds,
        email_outbox_backoff_max_seconds: email_opts.backoff_max_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::actions::Action;

    #[test]
    fn session_secret_required_for_server() {
        temp_env::with_vars(
            [
                ("VETRINA_SESSION_SECRET", None::<&str>),
                (
                    "VETRINA_DSN",
                    Some("postgres://user@localhost:5432/vetrina"),
                ),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["vetrina"]);
                let result = handler(&matches);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(err.to_string().contains("--session-secret"));
                }
            },
        );
    }

    #[test]
    fn blank_session_secret_rejected() {
        temp_env::with_vars(
            [
                ("VETRINA_SESSION_SECRET", Some("   ")),
                (
                    "VETRINA_DSN",
                    Some("postgres://user@localhost:5432/vetrina"),
                ),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["vetrina"]);
                assert!(handler(&matches).is_err());
            },
        );
    }

    #[test]
    fn server_action_carries_configuration() {
        temp_env::with_vars(
            [
                ("VETRINA_SESSION_SECRET", Some("sekret")),
                ("VETRINA_PORT", Some("9090")),
                (
                    "VETRINA_DSN",
                    Some("postgres://user@localhost:5432/vetrina"),
                ),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["vetrina"]);
                let action = handler(&matches).expect("server action");
                match action {
                    Action::Server(args) => {
                        assert_eq!(args.port, 9090);
                        assert_eq!(args.dsn, "postgres://user@localhost:5432/vetrina");
                        assert_eq!(args.email_outbox_batch_size, 10);
                    }
                    Action::Seed(_) => panic!("expected server action"),
                }
            },
        );
    }

    #[test]
    fn seed_action_does_not_need_session_secret() {
        temp_env::with_vars(
            [
                ("VETRINA_SESSION_SECRET", None::<&str>),
                (
                    "VETRINA_DSN",
                    Some("postgres://user@localhost:5432/vetrina"),
                ),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec![
                    "vetrina",
                    "seed",
                    "--admin-email",
                    "admin@example.com",
                    "--admin-password",
                    "Admin@123456",
                ]);
                let action = handler(&matches).expect("seed action");
                match action {
                    Action::Seed(args) => {
                        assert_eq!(args.admin_email, "admin@example.com");
                        assert_eq!(args.admin_name, "Admin User");
                    }
                    Action::Server(_) => panic!("expected seed action"),
                }
            },
        );
    }
}
