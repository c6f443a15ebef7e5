//! Checks the mail configuration and sends the verification template to one address.
//!
//! ```text
//! cargo run --bin send-test-email -- you@example.com
//! ```
use std::process::ExitCode;

use clap::Parser;

use hood_backend::app::init_tracing;
use hood_backend::config::{MailConfig, MailTransportConfig};
use hood_backend::services::mail::{self, EmailSender, OutgoingEmail, templates};

const SAMPLE_LINK: &str = "https://yourdomain.com/verify?token=test-token-123";

/// Send a sample verification email through the configured SMTP transport.
#[derive(Parser, Debug)]
#[command(name = "send-test-email", version, about)]
struct Args {
    /// Recipient address
    to: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let config = match MailConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid mail configuration");
            return ExitCode::FAILURE;
        }
    };

    match &config.transport {
        MailTransportConfig::Brevo { host, port, .. } => {
            tracing::info!(%host, port, "using Brevo SMTP relay");
        }
        MailTransportConfig::Smtp { host, port, secure, .. } => {
            tracing::info!(%host, port, secure, "using SMTP server");
        }
        MailTransportConfig::Unconfigured => {
            tracing::error!("no email service configured; set BREVO_SMTP_KEY or SMTP_HOST/SMTP_USER/SMTP_PASSWORD");
            return ExitCode::FAILURE;
        }
    }

    if config.from_is_default {
        tracing::error!("EMAIL_FROM is not set");
        return ExitCode::FAILURE;
    }

    let sender = match mail::build_sender(&config) {
        Ok(sender) => sender,
        Err(err) => {
            tracing::error!(error = %err, "failed to build SMTP transport");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(to = %args.to, from = %config.from, "sending test email");
    let template = match templates::verify_email(SAMPLE_LINK, "Test User") {
        Ok(template) => template,
        Err(err) => {
            tracing::error!(error = %err, "failed to render the verification template");
            return ExitCode::FAILURE;
        }
    };
    let email = OutgoingEmail::from_template(&args.to, template);

    match sender.send(&email).await {
        Ok(()) => {
            tracing::info!("test email sent; check the inbox and spam folder");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to send test email");
            tracing::error!(
                "common causes: wrong SMTP credentials, sender not verified with the relay, SMTP port blocked"
            );
            ExitCode::FAILURE
        }
    }
}
