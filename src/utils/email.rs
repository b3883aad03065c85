use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use studyhub_config::EmailConfig;
use studyhub_core::AppError;

use crate::metrics::track_email_sent;

/// Lifetime of an email verification link, in hours.
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Lifetime of a password reset link, in minutes.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, raw_token))]
    pub async fn send_verification_email(
        &self,
        to_email: &str,
        to_name: &str,
        raw_token: &str,
    ) -> Result<(), AppError> {
        let link = self.config.verification_url(raw_token);

        let text_body = format!(
            "Hi {},\n\n\
             Welcome to {}! Please confirm your email address by opening the link below:\n\
             {}\n\n\
             This link will expire in {} hours.\n\n\
             If you did not create an account, you can ignore this email.",
            to_name, self.config.from_name, link, VERIFICATION_TOKEN_TTL_HOURS
        );
        let html_body = self.action_template(
            to_name,
            "Verify your email",
            "Thanks for signing up. Confirm your email address to start sharing resources and joining courses.",
            "Verify Email",
            &link,
            &format!("This link will expire in {} hours.", VERIFICATION_TOKEN_TTL_HOURS),
        );

        self.send_email(to_email, "Verify your email address", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, raw_token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        raw_token: &str,
    ) -> Result<(), AppError> {
        let link = self.config.reset_url(raw_token);

        let text_body = format!(
            "Hi {},\n\n\
             You requested to reset your password. Open the link below to choose a new one:\n\
             {}\n\n\
             This link will expire in {} minutes.\n\n\
             If you didn't request this, please ignore this email.",
            to_name, link, RESET_TOKEN_TTL_MINUTES
        );
        let html_body = self.action_template(
            to_name,
            "Password Reset Request",
            "We received a request to reset your password. Click the button below to choose a new password.",
            "Reset Password",
            &link,
            &format!("This link will expire in {} minutes.", RESET_TOKEN_TTL_MINUTES),
        );

        self.send_email(to_email, "Password Reset Request", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!(to = %to_email, subject, body = %text_body, "SMTP disabled, email not sent");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn action_template(
        &self,
        name: &str,
        title: &str,
        intro: &str,
        button: &str,
        link: &str,
        expiry: &str,
    ) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px;">
                    <tr>
                        <td style="background-color: #2563EB; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 26px;">{brand}</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px; color: #444444; font-size: 16px; line-height: 1.5;">
                            <h2 style="margin: 0 0 20px 0; color: #222222;">{title}</h2>
                            <p>Hi <strong>{name}</strong>,</p>
                            <p>{intro}</p>
                            <p style="text-align: center; margin: 30px 0;">
                                <a href="{link}" style="display: inline-block; padding: 14px 36px; background-color: #2563EB; color: #ffffff; text-decoration: none; border-radius: 6px; font-weight: bold;">{button}</a>
                            </p>
                            <p style="font-size: 14px;">Or copy this link into your browser:</p>
                            <p style="font-size: 14px; color: #2563EB; word-break: break-all;">{link}</p>
                            <p style="font-size: 14px;"><strong>{expiry}</strong></p>
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 20px 30px; text-align: center; color: #999999; font-size: 12px;">
                            This is an automated email from {brand}. Please do not reply.
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            brand = self.config.from_name,
        )
    }
}

/// Which email to dispatch in the background.
#[derive(Debug, Clone, Copy)]
pub enum EmailKind {
    Verification,
    PasswordReset,
}

impl EmailKind {
    fn as_str(self) -> &'static str {
        match self {
            EmailKind::Verification => "verification",
            EmailKind::PasswordReset => "password_reset",
        }
    }
}

/// Sends an email on a detached task. Failures are logged and counted, never
/// surfaced to the request that triggered them.
pub fn spawn_email(
    config: EmailConfig,
    kind: EmailKind,
    to_email: String,
    to_name: String,
    raw_token: String,
) {
    tokio::spawn(async move {
        let service = EmailService::new(config);
        let result = match kind {
            EmailKind::Verification => {
                service
                    .send_verification_email(&to_email, &to_name, &raw_token)
                    .await
            }
            EmailKind::PasswordReset => {
                service
                    .send_password_reset_email(&to_email, &to_name, &raw_token)
                    .await
            }
        };

        track_email_sent(kind.as_str(), result.is_ok());
        if let Err(err) = result {
            tracing::error!(error = ?err.error, kind = kind.as_str(), to = %to_email, "failed to send email");
        }
    });
}
