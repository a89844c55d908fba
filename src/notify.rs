//! Best-effort "proposal accepted" notifications: always a log event, plus an
//! email when SMTP is configured.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use time::{format_description::well_known::Rfc2822, OffsetDateTime};
use tracing::{info, warn};

use crate::config::MailConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);
const SUBJECT: &str = "💖 She Said YES! - Valentine's Day Proposal";

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_accepted(&self, name: &str, email: &str) -> anyhow::Result<()>;
}

struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

/// Logs every acceptance and mails it when a mailer is configured.
pub struct Dispatcher {
    mailer: Option<Mailer>,
}

impl Dispatcher {
    pub fn log_only() -> Self {
        Self { mailer: None }
    }

    /// Never fails: a mail setup that cannot be used degrades to log-only.
    pub fn new(config: Option<&MailConfig>) -> Self {
        let Some(cfg) = config else {
            info!("email not configured; acceptance notifications are log-only");
            return Self::log_only();
        };

        match Mailer::from_config(cfg) {
            Ok(mailer) => {
                info!(host = %cfg.host, port = cfg.port, "email notifications enabled");
                Self {
                    mailer: Some(mailer),
                }
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), host = %cfg.host, "email setup unusable; acceptance notifications are log-only");
                Self::log_only()
            }
        }
    }
}

impl Mailer {
    fn from_config(cfg: &MailConfig) -> anyhow::Result<Self> {
        let to = cfg
            .notify_to
            .parse::<Mailbox>()
            .context("NOTIFICATION_EMAIL is not an address")?;
        // SMTP logins such as "apikey" are not addresses; send as the recipient then.
        let from = match cfg.username.parse::<Mailbox>() {
            Ok(from) => from,
            Err(_) => to.clone(),
        };
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
            .with_context(|| format!("smtp relay {}", cfg.host))?
            .port(cfg.port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();
        Ok(Self {
            transport,
            from,
            to,
        })
    }
}

#[async_trait]
impl Notifier for Dispatcher {
    async fn notify_accepted(&self, name: &str, email: &str) -> anyhow::Result<()> {
        let now = OffsetDateTime::now_utc();
        info!(event = "proposal_accepted", %name, %email, at = %now, "💖 proposal accepted");

        let Some(mailer) = &self.mailer else {
            return Ok(());
        };

        let message = Message::builder()
            .from(mailer.from.clone())
            .to(mailer.to.clone())
            .subject(SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(render_email(name, email, now))
            .context("build notification email")?;
        mailer
            .transport
            .send(message)
            .await
            .context("send notification email")?;

        info!(to = %mailer.to, "notification email sent");
        Ok(())
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn render_email(name: &str, email: &str, at: OffsetDateTime) -> String {
    let name = escape_html(name);
    let email = escape_html(email);
    let at = at.format(&Rfc2822).unwrap_or_else(|_| at.to_string());
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; background: linear-gradient(135deg, #ffeef8 0%, #ffe0f0 100%);">
  <h1 style="color: #e91e63; text-align: center; font-size: 32px;">🎉 Amazing News! 🎉</h1>
  <div style="background: white; padding: 30px; border-radius: 15px; margin: 20px 0;">
    <h2 style="color: #c2185b; margin-top: 0;">💖 She Said YES! 💖</h2>
    <p style="font-size: 18px; color: #333;"><strong>{name}</strong> just accepted your Valentine's Day proposal!</p>
    <div style="background: #fff3f8; padding: 15px; border-radius: 10px; border-left: 4px solid #e91e63;">
      <p style="margin: 5px 0; color: #666;"><strong>Name:</strong> {name}</p>
      <p style="margin: 5px 0; color: #666;"><strong>Email:</strong> {email}</p>
      <p style="margin: 5px 0; color: #666;"><strong>Time:</strong> {at}</p>
    </div>
    <p style="font-size: 16px; color: #666;">Time to start planning that perfect Valentine's Day date! 🌹✨</p>
  </div>
  <p style="text-align: center; color: #999; font-size: 14px;">💕 Sent from your Valentine's Proposal System 💕</p>
</div>"#
    )
}
