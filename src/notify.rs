//! Notification Trigger
//!
//! After a successful order webhook the backend returns a one-time
//! authentication link; this module renders the customer email around it and
//! hands it to a [`Mailer`]. Email failure is logged and swallowed: the
//! webhook success stands regardless of the email outcome.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Placeholder substituted by the authentication link
pub const AUTH_LINK_PLACEHOLDER: &str = "{{auth_link}}";

const DEFAULT_SUBJECT: &str = "Dynamik Up Saas - Initialisation du mot de passe";

const DEFAULT_BODY: &str = "Bonjour,\n\nVotre compte Dynamik Up Saas a été créé avec succès. Pour terminer votre inscription, cliquez sur le lien ci-dessous.\n{{auth_link}}\n\nCordialement,\nDynamik Up Saas";

/// Configurable customer notification template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Email subject line
    pub subject: String,
    /// Body text with an `{{auth_link}}` placeholder
    pub body: String,
}

impl Default for EmailTemplate {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

impl EmailTemplate {
    /// Render an HTML body: the placeholder becomes a styled login button and
    /// newlines become `<br />`.
    pub fn render_html(&self, auth_url: &str) -> String {
        let button = format!(
            "<a href=\"{}\" style=\"background-color:#029de2;color:white;padding:10px 20px;\
             text-align:center;text-decoration:none;display:inline-block;\">Vous connecter</a>",
            auth_url
        );
        self.body
            .replace(AUTH_LINK_PLACEHOLDER, &button)
            .replace('\n', "<br />\n")
    }

    /// Render a plain-text body: the placeholder becomes the raw URL.
    pub fn render_plain(&self, auth_url: &str) -> String {
        self.body.replace(AUTH_LINK_PLACEHOLDER, auth_url)
    }
}

/// Outbound email seam. The hosting application decides how mail actually
/// leaves the machine (SMTP relay, CMS mail hook, API).
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send an HTML email
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

/// Mailer that only logs; the default when no transport is wired up.
#[derive(Debug, Clone, Default)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> anyhow::Result<()> {
        info!(to, subject, "Email transport not configured, logging only");
        Ok(())
    }
}

/// Renders and sends the post-order notification
#[derive(Debug, Clone)]
pub struct Notifier<M: Mailer> {
    template: EmailTemplate,
    mailer: M,
}

impl<M: Mailer> Notifier<M> {
    /// Create a notifier with the given template and transport
    pub fn new(template: EmailTemplate, mailer: M) -> Self {
        Self { template, mailer }
    }

    /// Send the authentication-link email to the customer.
    ///
    /// Failures are logged and swallowed; the caller's delivery outcome is
    /// never affected.
    pub async fn notify(&self, email: &str, auth_url: &str) {
        if email.trim().is_empty() {
            error!("No customer email resolved, skipping order notification");
            return;
        }

        let body = self.template.render_html(auth_url);
        match self.mailer.send(email, &self.template.subject, &body).await {
            Ok(()) => info!(to = email, "Order notification sent to customer"),
            Err(e) => error!(to = email, error = %e, "Failed to send order notification"),
        }
    }
}
