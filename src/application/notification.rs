//! New-listing announcements in Portuguese or English.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::domain::locale::format_currency;
use crate::domain::{Amount, Language, Property};
use crate::port::outbound::notifier::{Message, Notifier, Recipient};

/// The listing fields shown in an announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub price: Amount,
    pub location: String,
    pub image: Option<String>,
    pub link: String,
}

impl Announcement {
    /// Build an announcement for `property`, linking to `base_url`.
    #[must_use]
    pub fn for_property(property: &Property, base_url: &str) -> Self {
        let location = match property.location.address.as_deref() {
            Some(address) if !address.is_empty() => {
                format!("{address}, {}", property.location.city)
            }
            _ => property.location.city.clone(),
        };
        Self {
            title: property.title.clone(),
            price: property.price,
            location,
            image: property.images.first().cloned(),
            link: format!(
                "{}/property/{}",
                base_url.trim_end_matches('/'),
                property.id
            ),
        }
    }
}

/// Outcome of a bulk send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReport {
    pub success: bool,
    pub message: String,
    pub sent_count: usize,
}

/// Render the subject and plain-text body of an announcement.
#[must_use]
pub fn render(announcement: &Announcement, language: Language) -> Message {
    let price = format_currency(announcement.price, language);
    let (subject, greeting, intro, view, footer) = match language {
        Language::Pt => (
            format!("Nova Propriedade Disponível: {}", announcement.title),
            "Olá",
            "Temos uma nova propriedade que pode ser do seu interesse!",
            "Ver Propriedade",
            "Obrigado por usar a Luzion Imobiliária",
        ),
        Language::En => (
            format!("New Property Available: {}", announcement.title),
            "Hello",
            "We have a new property that might interest you!",
            "View Property",
            "Thank you for using Luzion Real Estate",
        ),
    };

    let mut body = format!(
        "{greeting}!\n\n{intro}\n\n{}\n{}\n{price}\n",
        announcement.title, announcement.location
    );
    if let Some(image) = &announcement.image {
        body.push_str(image);
        body.push('\n');
    }
    body.push_str(&format!("\n{view}: {}\n\n{footer}\n", announcement.link));

    Message { subject, body }
}

/// Sends announcements through a [`Notifier`].
pub struct Notifications {
    notifier: Arc<dyn Notifier>,
}

impl Notifications {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Send the announcement to every recipient.
    ///
    /// Delivery failures are logged per recipient; the report counts the
    /// messages that went out.
    pub async fn announce(
        &self,
        recipients: &[Recipient],
        announcement: &Announcement,
        language: Language,
    ) -> SendReport {
        let message = render(announcement, language);

        let mut sent_count = 0;
        for recipient in recipients {
            match self.notifier.send(recipient, &message).await {
                Ok(()) => sent_count += 1,
                Err(e) => error!(to = %recipient.email, error = %e, "Failed to send notification"),
            }
        }

        let success = sent_count == recipients.len();
        info!(
            title = %announcement.title,
            sent = sent_count,
            recipients = recipients.len(),
            "New property announced"
        );
        SendReport {
            success,
            message: summary(language, success, sent_count),
            sent_count,
        }
    }
}

fn summary(language: Language, success: bool, sent: usize) -> String {
    match (language, success) {
        (Language::Pt, true) => format!("Emails enviados com sucesso para {sent} utilizadores!"),
        (Language::En, true) => format!("Emails sent successfully to {sent} users!"),
        (Language::Pt, false) => format!("Erro ao enviar emails ({sent} enviados)"),
        (Language::En, false) => format!("Error sending emails ({sent} sent)"),
    }
}
