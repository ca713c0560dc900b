use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_BASE_URL: &str = "base-url";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long(ARG_SESSION_SECRET)
                .help("Secret used to sign session tokens")
                .long_help(
                    "Secret used to sign session tokens. There is deliberately no built-in \
                     default; the server refuses to start without one.",
                )
                .env("VETRINA_SESSION_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_BASE_URL)
                .long(ARG_BASE_URL)
                .help("Public base URL of the site; an https URL enables the Secure cookie flag")
                .default_value("http://localhost:8080")
                .env("VETRINA_BASE_URL"),
        )
}

#[derive(Debug)]
pub struct Options {
    pub session_secret: SecretString,
    pub base_url: String,
}

impl Options {
    /// Parse auth options from CLI matches.
    ///
    /// # Errors
    /// Returns an error when the session secret is missing or blank; a
    /// silently defaulted signing secret would make every deployment forge
    /// each other's cookies.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let secret = matches
            .get_one::<String>(ARG_SESSION_SECRET)
            .map(String::as_str)
            .unwrap_or("");

        if secret.trim().is_empty() {
            return Err(anyhow!(
                "missing required argument: --{ARG_SESSION_SECRET} (set VETRINA_SESSION_SECRET; refusing to start with an empty signing secret)"
            ));
        }

        let base_url = matches
            .get_one::<String>(ARG_BASE_URL)
            .cloned()
            .unwrap_or_else(|| "http://localhost:8080".to_string());

        Ok(Self {
            session_secret: SecretString::from(secret.to_string()),
            base_url,
        })
    }
}
