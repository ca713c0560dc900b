//! Email outbox worker and delivery abstractions.
//!
//! The contact form enqueues rows in `email_outbox` with status `pending`,
//! in the same transaction that stores the message. A background task
//! periodically polls that table, locks a batch via `FOR UPDATE SKIP
//! LOCKED`, and hands each row to an [`EmailSender`]. The sender decides
//! how to deliver and returns `Ok`/`Err`; the worker then updates the
//! outbox row to `sent` or reschedules it.
//!
//! Failed rows are retried with exponential backoff and jitter until a max
//! attempt threshold is reached, then marked `failed`. Delivery problems
//! therefore never fail the original HTTP request.
//!
//! The default sender for local dev is [`LogEmailSender`], which logs and
//! returns `Ok(())`. [`HttpEmailSender`] posts the rendered message to a
//! configurable delivery endpoint; an SMTP relay can be slotted in behind
//! the same trait.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::Rng;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub const TEMPLATE_CONTACT: &str = "contact";

/// Delivery routing for contact-form notifications.
#[derive(Clone, Debug)]
pub struct EmailConfig {
    from: String,
    to: String,
    endpoint: Option<String>,
}

impl EmailConfig {
    #[must_use]
    pub fn new(from: String, to: String, endpoint: Option<String>) -> Self {
        Self { from, to, endpoint }
    }

    #[must_use]
    pub fn from_address(&self) -> &str {
        &self.from
    }

    #[must_use]
    pub fn to_address(&self) -> &str {
        &self.to
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Build the sender this configuration describes.
    #[must_use]
    pub fn sender(&self) -> Arc<dyn EmailSender> {
        match &self.endpoint {
            Some(endpoint) => Arc::new(HttpEmailSender::new(
                endpoint.clone(),
                self.from.clone(),
            )),
            None => Arc::new(LogEmailSender),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to_email: String,
    pub template: String,
    pub payload_json: String,
}

/// Email delivery abstraction used by the outbox worker.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error to schedule a retry.
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to_email = %message.to_email,
            template = %message.template,
            payload = %message.payload_json,
            "email outbox send stub"
        );
        Ok(())
    }
}

/// Sender that posts the rendered message to an HTTP delivery endpoint.
#[derive(Clone, Debug)]
pub struct HttpEmailSender {
    client: reqwest::Client,
    endpoint: String,
    from: String,
}

impl HttpEmailSender {
    #[must_use]
    pub fn new(endpoint: String, from: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint,
            from,
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let rendered = render(message)?;
        let body = serde_json::json!({
            "from": self.from,
            "to": message.to_email,
            "subject": rendered.subject,
            "html": rendered.html,
            "reply_to": rendered.reply_to,
        });

        self.client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("email delivery request failed")?
            .error_for_status()
            .context("email delivery endpoint rejected the message")?;

        Ok(())
    }
}

struct RenderedEmail {
    subject: String,
    html: String,
    reply_to: Option<String>,
}

/// Render an outbox row into a subject and HTML body.
fn render(message: &EmailMessage) -> Result<RenderedEmail> {
    if message.template != TEMPLATE_CONTACT {
        return Err(anyhow!("unknown email template: {}", message.template));
    }

    let payload: serde_json::Value =
        serde_json::from_str(&message.payload_json).context("invalid outbox payload")?;
    let field = |key: &str| -> String {
        payload
            .get(key)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let subject = format!("Contact Form: {}", field("subject"));
    let html = contact_html(
        &field("name"),
        &field("email"),
        &field("subject"),
        &field("message"),
    );
    let reply_to = {
        let email = field("email");
        if email.is_empty() { None } else { Some(email) }
    };

    Ok(RenderedEmail {
        subject,
        html,
        reply_to,
    })
}

fn contact_html(name: &str, email: &str, subject: &str, message: &str) -> String {
    let message = escape_html(message).replace('\n', "<br>");
    format!(
        "<!DOCTYPE html>\
         <html><body>\
         <h2>New Contact Form Submission</h2>\
         <p><strong>From:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Subject:</strong> {}</p>\
         <p><strong>Message:</strong><br>{}</p>\
         </body></html>",
        escape_html(name),
        escape_html(email),
        escape_html(subject),
        message,
    )
}

/// Escape user-supplied text before embedding it in the HTML body.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
        .replace('/', "&#x2F;")
}

/// Enqueue a contact notification inside the caller's transaction.
///
/// # Errors
/// Returns an error if the insert fails; the caller's transaction rolls
/// everything back together.
pub(crate) async fn enqueue_contact_notification(
    tx: &mut Transaction<'_, Postgres>,
    to_email: &str,
    payload: &serde_json::Value,
) -> Result<()> {
    let query = r"
        INSERT INTO email_outbox (to_email, template, payload_json)
        VALUES ($1, $2, $3)
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(to_email)
        .bind(TEMPLATE_CONTACT)
        .bind(payload)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("failed to enqueue contact notification")?;

    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct EmailWorkerConfig {
    poll_interval: Duration,
    batch_size: usize,
    max_attempts: u32,
    backoff_base: Duration,
    backoff_max: Duration,
}

impl EmailWorkerConfig {
    /// Default worker config: 5s poll interval, 10 messages per batch,
    /// 5 max attempts, and 5s->5m exponential backoff with jitter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            batch_size: 10,
            max_attempts: 5,
            backoff_base: Duration::from_secs(5),
            backoff_max: Duration::from_secs(300),
        }
    }

    #[must_use]
    pub fn with_poll_interval_seconds(mut self, seconds: u64) -> Self {
        self.poll_interval = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_backoff_base_seconds(mut self, seconds: u64) -> Self {
        self.backoff_base = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_backoff_max_seconds(mut self, seconds: u64) -> Self {
        self.backoff_max = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn normalize(self) -> Self {
        let poll_interval = if self.poll_interval.is_zero() {
            Duration::from_secs(1)
        } else {
            self.poll_interval
        };
        let batch_size = if self.batch_size == 0 {
            1
        } else {
            self.batch_size
        };
        let max_attempts = self.max_attempts.max(1);
        let backoff_base = if self.backoff_base.is_zero() {
            Duration::from_secs(1)
        } else {
            self.backoff_base
        };
        let backoff_max = if self.backoff_max < backoff_base {
            backoff_base
        } else {
            self.backoff_max
        };
        Self {
            poll_interval,
            batch_size,
            max_attempts,
            backoff_base,
            backoff_max,
        }
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    #[must_use]
    pub fn backoff_max(&self) -> Duration {
        self.backoff_max
    }
}

impl Default for EmailWorkerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a background task that polls and processes the email outbox.
pub fn spawn_outbox_worker(
    pool: PgPool,
    sender: Arc<dyn EmailSender>,
    config: EmailWorkerConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let config = config.normalize();
        let poll_interval = config.poll_interval();

        loop {
            // Poll the outbox table on a fixed cadence; sender handles delivery or logging.
            let batch_result = process_outbox_batch(&pool, sender.as_ref(), &config).await;
            if let Err(err) = batch_result {
                error!("email outbox batch failed: {err}");
            }

            sleep(poll_interval).await;
        }
    })
}

async fn process_outbox_batch(
    pool: &PgPool,
    sender: &dyn EmailSender,
    config: &EmailWorkerConfig,
) -> Result<usize> {
    let mut tx = pool
        .begin()
        .await
        .context("failed to start email outbox transaction")?;

    // Grab a locked batch so multiple workers can run without double-sending.
    let query = r"
        SELECT id, to_email, template, payload_json::text AS payload_json, attempts
        FROM email_outbox
        WHERE status = 'pending'
          AND next_attempt_at <= NOW()
        ORDER BY next_attempt_at ASC, created_at ASC
        LIMIT $1
        FOR UPDATE SKIP LOCKED
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(i64::try_from(config.batch_size()).unwrap_or(0))
        .fetch_all(&mut *tx)
        .instrument(span)
        .await
        .context("failed to load email outbox batch")?;

    if rows.is_empty() {
        // Commit even on empty to release locks and keep poll loop consistent.
        tx.commit()
            .await
            .context("failed to commit empty outbox batch")?;
        return Ok(0);
    }

    let row_count = rows.len();
    for row in rows {
        let id: Uuid = row.get("id");
        let attempts: i32 = row.get("attempts");
        let attempts = u32::try_from(attempts).unwrap_or(0);
        let message = EmailMessage {
            to_email: row.get("to_email"),
            template: row.get("template"),
            payload_json: row.get("payload_json"),
        };

        let send_result = sender.send(&message).await;
        update_outbox_status(&mut tx, id, attempts, send_result, config).await?;
    }

    tx.commit()
        .await
        .context("failed to commit email outbox batch")?;

    Ok(row_count)
}

async fn update_outbox_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    attempts: u32,
    send_result: Result<()>,
    config: &EmailWorkerConfig,
) -> Result<()> {
    // Retry failures with exponential backoff and jitter until max_attempts.
    let next_attempt = attempts.saturating_add(1);
    let next_attempts_i32 = i32::try_from(next_attempt).unwrap_or(i32::MAX);
    match send_result {
        Ok(()) => {
            let query = r"
                UPDATE email_outbox
                SET status = 'sent',
                    attempts = $2,
                    last_error = NULL,
                    sent_at = NOW(),
                    next_attempt_at = NOW()
                WHERE id = $1
            ";
            let span = info_span!(
                "db.query",
                db.system = "postgresql",
                db.operation = "UPDATE",
                db.statement = query
            );
            sqlx::query(query)
                .bind(id)
                .bind(next_attempts_i32)
                .execute(&mut **tx)
                .instrument(span)
                .await
                .context("failed to update outbox status to sent")?;
        }
        Err(err) => {
            let max_attempts = config.max_attempts();
            if next_attempt >= max_attempts {
                let query = r"
                    UPDATE email_outbox
                    SET status = 'failed',
                        attempts = $2,
                        last_error = $3,
                        next_attempt_at = NOW()
                    WHERE id = $1
                ";
                let span = info_span!(
                    "db.query",
                    db.system = "postgresql",
                    db.operation = "UPDATE",
                    db.statement = query
                );
                sqlx::query(query)
                    .bind(id)
                    .bind(next_attempts_i32)
                    .bind(err.to_string())
                    .execute(&mut **tx)
                    .instrument(span)
                    .await
                    .context("failed to update outbox status to failed")?;
            } else {
                let delay =
                    backoff_delay(next_attempt, config.backoff_base(), config.backoff_max());
                let delay_ms = i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);
                let query = r"
                    UPDATE email_outbox
                    SET status = 'pending',
                        attempts = $2,
                        last_error = $3,
                        next_attempt_at = NOW() + ($4 * INTERVAL '1 millisecond')
                    WHERE id = $1
                ";
                let span = info_span!(
                    "db.query",
                    db.system = "postgresql",
                    db.operation = "UPDATE",
                    db.statement = query
                );
                sqlx::query(query)
                    .bind(id)
                    .bind(next_attempts_i32)
                    .bind(err.to_string())
                    .bind(delay_ms)
                    .execute(&mut **tx)
                    .instrument(span)
                    .await
                    .context("failed to update outbox retry schedule")?;
            }
        }
    }

    Ok(())
}

fn backoff_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    let shift = attempt.saturating_sub(1).min(31);
    let factor = 1u32 << shift;
    let delay = base.checked_mul(factor).unwrap_or(max);
    let capped = if delay > max { max } else { delay };
    jitter_delay(capped)
}

fn jitter_delay(delay: Duration) -> Duration {
    let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    if delay_ms < 2 {
        return delay;
    }
    let half = delay_ms / 2;
    let jitter = rand::thread_rng().gen_range(0..=half);
    Duration::from_millis(half + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_degenerate_values() {
        let config = EmailWorkerConfig::new()
            .with_poll_interval_seconds(0)
            .with_batch_size(0)
            .with_max_attempts(0)
            .with_backoff_base_seconds(0)
            .with_backoff_max_seconds(0)
            .normalize();

        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.batch_size(), 1);
        assert_eq!(config.max_attempts(), 1);
        assert_eq!(config.backoff_base(), Duration::from_secs(1));
        assert!(config.backoff_max() >= config.backoff_base());
    }

    #[test]
    fn backoff_grows_and_caps() {
        let base = Duration::from_secs(5);
        let max = Duration::from_secs(300);

        let first = backoff_delay(1, base, max);
        assert!(first <= base);

        let late = backoff_delay(30, base, max);
        assert!(late <= max);
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        let escaped = escape_html("<script>alert('x')</script>");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(!escaped.contains('\''));
        assert_eq!(
            escaped,
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;"
        );
    }

    #[test]
    fn contact_template_renders_subject_and_reply_to() {
        let message = EmailMessage {
            to_email: "hello@vetrina.studio".to_string(),
            template: TEMPLATE_CONTACT.to_string(),
            payload_json: serde_json::json!({
                "name": "Alice",
                "email": "alice@example.com",
                "subject": "Quote request",
                "message": "Line one\nLine two",
            })
            .to_string(),
        };

        let rendered = render(&message).expect("render");
        assert_eq!(rendered.subject, "Contact Form: Quote request");
        assert_eq!(rendered.reply_to.as_deref(), Some("alice@example.com"));
        assert!(rendered.html.contains("Line one<br>Line two"));
        assert!(rendered.html.contains("Alice"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let message = EmailMessage {
            to_email: "hello@vetrina.studio".to_string(),
            template: "newsletter".to_string(),
            payload_json: "{}".to_string(),
        };
        assert!(render(&message).is_err());
    }

    #[test]
    fn sender_selection_follows_endpoint() {
        let logging = EmailConfig::new(
            "no-reply@vetrina.studio".to_string(),
            "hello@vetrina.studio".to_string(),
            None,
        );
        // Arc<dyn EmailSender> — just ensure construction succeeds for both.
        let _ = logging.sender();

        let http = EmailConfig::new(
            "no-reply@vetrina.studio".to_string(),
            "hello@vetrina.studio".to_string(),
            Some("https://mail.example.com/send".to_string()),
        );
        let _ = http.sender();
        assert_eq!(http.endpoint(), Some("https://mail.example.com/send"));
    }
}
