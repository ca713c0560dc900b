use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

pub const ARG_EMAIL_ENDPOINT: &str = "email-endpoint";
pub const ARG_EMAIL_FROM: &str = "email-from";
pub const ARG_EMAIL_TO: &str = "email-to";
pub const ARG_OUTBOX_POLL_SECONDS: &str = "email-outbox-poll-seconds";
pub const ARG_OUTBOX_BATCH_SIZE: &str = "email-outbox-batch-size";
pub const ARG_OUTBOX_MAX_ATTEMPTS: &str = "email-outbox-max-attempts";
pub const ARG_OUTBOX_BACKOFF_BASE_SECONDS: &str = "email-outbox-backoff-base-seconds";
pub const ARG_OUTBOX_BACKOFF_MAX_SECONDS: &str = "email-outbox-backoff-max-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_EMAIL_ENDPOINT)
                .long(ARG_EMAIL_ENDPOINT)
                .help("HTTP delivery endpoint for outbound email; logs instead when unset")
                .env("VETRINA_EMAIL_ENDPOINT"),
        )
        .arg(
            Arg::new(ARG_EMAIL_FROM)
                .long(ARG_EMAIL_FROM)
                .help("From address for contact-form notifications")
                .default_value("no-reply@vetrina.studio")
                .env("VETRINA_EMAIL_FROM"),
        )
        .arg(
            Arg::new(ARG_EMAIL_TO)
                .long(ARG_EMAIL_TO)
                .help("Recipient for contact-form notifications")
                .default_value("hello@vetrina.studio")
                .env("VETRINA_EMAIL_TO"),
        )
        .arg(
            Arg::new(ARG_OUTBOX_POLL_SECONDS)
                .long(ARG_OUTBOX_POLL_SECONDS)
                .help("Outbox poll interval in seconds")
                .default_value("5")
                .env("VETRINA_EMAIL_OUTBOX_POLL_SECONDS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_OUTBOX_BATCH_SIZE)
                .long(ARG_OUTBOX_BATCH_SIZE)
                .help("Maximum outbox rows processed per poll")
                .default_value("10")
                .env("VETRINA_EMAIL_OUTBOX_BATCH_SIZE")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_OUTBOX_MAX_ATTEMPTS)
                .long(ARG_OUTBOX_MAX_ATTEMPTS)
                .help("Delivery attempts before a message is marked failed")
                .default_value("5")
                .env("VETRINA_EMAIL_OUTBOX_MAX_ATTEMPTS")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_OUTBOX_BACKOFF_BASE_SECONDS)
                .long(ARG_OUTBOX_BACKOFF_BASE_SECONDS)
                .help("Base delay for delivery retry backoff")
                .default_value("5")
                .env("VETRINA_EMAIL_OUTBOX_BACKOFF_BASE_SECONDS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_OUTBOX_BACKOFF_MAX_SECONDS)
                .long(ARG_OUTBOX_BACKOFF_MAX_SECONDS)
                .help("Upper bound for delivery retry backoff")
                .default_value("300")
                .env("VETRINA_EMAIL_OUTBOX_BACKOFF_MAX_SECONDS")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub endpoint: Option<String>,
    pub from: String,
    pub to: String,
    pub poll_seconds: u64,
    pub batch_size: usize,
    pub max_attempts: u32,
    pub backoff_base_seconds: u64,
    pub backoff_max_seconds: u64,
}

impl Options {
    /// Parse email options from CLI matches.
    ///
    /// # Errors
    /// Infallible today; kept fallible to match the other option groups.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            endpoint: matches.get_one::<String>(ARG_EMAIL_ENDPOINT).cloned(),
            from: matches
                .get_one::<String>(ARG_EMAIL_FROM)
                .cloned()
                .unwrap_or_else(|| "no-reply@vetrina.studio".to_string()),
            to: matches
                .get_one::<String>(ARG_EMAIL_TO)
                .cloned()
                .unwrap_or_else(|| "hello@vetrina.studio".to_string()),
            poll_seconds: matches
                .get_one::<u64>(ARG_OUTBOX_POLL_SECONDS)
                .copied()
                .unwrap_or(5),
            batch_size: matches
                .get_one::<usize>(ARG_OUTBOX_BATCH_SIZE)
                .copied()
                .unwrap_or(10),
            max_attempts: matches
                .get_one::<u32>(ARG_OUTBOX_MAX_ATTEMPTS)
                .copied()
                .unwrap_or(5),
            backoff_base_seconds: matches
                .get_one::<u64>(ARG_OUTBOX_BACKOFF_BASE_SECONDS)
                .copied()
                .unwrap_or(5),
            backoff_max_seconds: matches
                .get_one::<u64>(ARG_OUTBOX_BACKOFF_MAX_SECONDS)
                .copied()
                .unwrap_or(300),
        })
    }
}
