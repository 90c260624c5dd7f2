use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

/// Transactional email sender.
///
/// Wraps a single SMTP transport configuration. When SMTP is disabled
/// (`SMTP_ENABLED=false`, the development default) messages are logged
/// instead of sent, so every flow stays exercisable locally.
///
/// Callers treat every send as a fallible network call; there is no retry
/// at this layer.
#[derive(Clone, Debug)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Email with the link that marks an account's address as verified.
    #[instrument(skip(self))]
    pub async fn send_verification_email(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let verify_link = format!("{}/auth/verify?token={}", self.config.frontend_url, token);

        let html_body = self.verification_template(to_name, &verify_link);
        let text_body = format!(
            "Hi {},\n\n\
             Thanks for signing up! Please verify your email address by\n\
             opening the link below:\n\
             {}\n\n\
             This link will expire in 24 hours.\n\n\
             If you didn't create an account, you can safely ignore this email.\n\n\
             Best regards,\n\
             The Saasbase Team",
            to_name, verify_link
        );

        self.send_email(to_email, "Verify your email address", &text_body, &html_body)
            .await
    }

    /// One-time welcome email, sent after the first successful verification.
    #[instrument(skip(self))]
    pub async fn send_welcome_email(&self, to_email: &str, to_name: &str) -> Result<(), AppError> {
        let dashboard_link = self.config.frontend_url.clone();

        let html_body = self.welcome_template(to_name, &dashboard_link);
        let text_body = format!(
            "Hi {},\n\n\
             Your email is verified and your account is ready.\n\n\
             Head over to your dashboard to get started:\n\
             {}\n\n\
             Best regards,\n\
             The Saasbase Team",
            to_name, dashboard_link
        );

        self.send_email(to_email, "Welcome to Saasbase!", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let reset_link = format!(
            "{}/auth/reset-password?token={}",
            self.config.frontend_url, token
        );

        let html_body = self.password_reset_template(to_name, &reset_link);
        let text_body = format!(
            "Hi {},\n\n\
             You requested to reset your password.\n\n\
             Click the link below to choose a new one:\n\
             {}\n\n\
             This link will expire in 1 hour.\n\n\
             If you didn't request this, please ignore this email.\n\n\
             Best regards,\n\
             The Saasbase Team",
            to_name, reset_link
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
            info!(
                to = %to_email,
                subject = %subject,
                body = %text_body,
                "SMTP disabled, logging email instead of sending"
            );
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid to email: {}", e)))?)
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
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

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
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn verification_template(&self, name: &str, verify_link: &str) -> String {
        self.layout(
            "#4F46E5",
            "Verify your email address",
            &format!(
                r#"<p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                    Hi <strong>{}</strong>,
                </p>
                <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                    Thanks for signing up! Click the button below to verify your email address:
                </p>
                <table width="100%" cellpadding="0" cellspacing="0" style="margin: 30px 0;">
                    <tr>
                        <td align="center">
                            <a href="{}" style="display: inline-block; padding: 14px 40px; background-color: #4F46E5; color: #ffffff; text-decoration: none; border-radius: 6px; font-size: 16px; font-weight: bold;">Verify Email</a>
                        </td>
                    </tr>
                </table>
                <p style="margin: 0 0 10px 0; color: #666666; font-size: 14px; line-height: 1.5;">
                    Or copy and paste this link into your browser:
                </p>
                <p style="margin: 0 0 20px 0; color: #4F46E5; font-size: 14px; word-break: break-all;">
                    {}
                </p>
                <p style="margin: 0 0 20px 0; color: #666666; font-size: 14px; line-height: 1.5;">
                    <strong>This link will expire in 24 hours.</strong>
                </p>
                <p style="margin: 0; color: #666666; font-size: 14px; line-height: 1.5;">
                    If you didn't create an account, you can safely ignore this email.
                </p>"#,
                name, verify_link, verify_link
            ),
        )
    }

    fn welcome_template(&self, name: &str, dashboard_link: &str) -> String {
        self.layout(
            "#10B981",
            "Welcome aboard!",
            &format!(
                r#"<p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                    Hi <strong>{}</strong>,
                </p>
                <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                    Your email is verified and your account is ready to go.
                </p>
                <table width="100%" cellpadding="0" cellspacing="0" style="margin: 30px 0;">
                    <tr>
                        <td align="center">
                            <a href="{}" style="display: inline-block; padding: 14px 40px; background-color: #10B981; color: #ffffff; text-decoration: none; border-radius: 6px; font-size: 16px; font-weight: bold;">Go to Dashboard</a>
                        </td>
                    </tr>
                </table>
                <p style="margin: 0; color: #666666; font-size: 14px; line-height: 1.5;">
                    We're glad to have you here.
                </p>"#,
                name, dashboard_link
            ),
        )
    }

    fn password_reset_template(&self, name: &str, reset_link: &str) -> String {
        self.layout(
            "#4F46E5",
            "Password Reset Request",
            &format!(
                r#"<p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                    Hi <strong>{}</strong>,
                </p>
                <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                    We received a request to reset your password. Click the button below to choose a new one:
                </p>
                <table width="100%" cellpadding="0" cellspacing="0" style="margin: 30px 0;">
                    <tr>
                        <td align="center">
                            <a href="{}" style="display: inline-block; padding: 14px 40px; background-color: #4F46E5; color: #ffffff; text-decoration: none; border-radius: 6px; font-size: 16px; font-weight: bold;">Reset Password</a>
                        </td>
                    </tr>
                </table>
                <p style="margin: 0 0 20px 0; color: #666666; font-size: 14px; line-height: 1.5;">
                    <strong>This link will expire in 1 hour.</strong>
                </p>
                <p style="margin: 0; color: #666666; font-size: 14px; line-height: 1.5;">
                    If you didn't request this password reset, please ignore this email or contact support if you have concerns.
                </p>"#,
                name, reset_link
            ),
        )
    }

    fn layout(&self, accent: &str, heading: &str, body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{heading}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
                    <tr>
                        <td style="background-color: {accent}; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">Saasbase</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px;">
                            <h2 style="margin: 0 0 20px 0; color: #333333; font-size: 24px;">{heading}</h2>
                            {body}
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 20px 30px; text-align: center; border-top: 1px solid #e9ecef;">
                            <p style="margin: 0; color: #999999; font-size: 12px;">
                                This is an automated email from Saasbase. Please do not reply.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#
        )
    }
}
