//! Notification emails sent on workflow transitions.

use crate::domain::event::Event;
use crate::domain::foundation::ValidationError;
use crate::domain::payment::Payment;
use crate::domain::registration::Registration;

use super::EmailMessage;

pub const EVENT_APPROVED: &str = "event_approved";
pub const EVENT_REJECTED: &str = "event_rejected";
pub const REGISTRATION_RECEIVED: &str = "registration_received";
pub const PAYMENT_RECEIVED: &str = "payment_received";
pub const ACCOUNT_APPROVED: &str = "account_approved";

pub fn event_approved(event: &Event, organizer_email: &str) -> Result<EmailMessage, ValidationError> {
    let name = escape(&event.details.name);
    EmailMessage::new(
        organizer_email,
        format!("Your event \"{}\" is live", event.details.name),
        format!(
            "<p>Good news: <strong>{}</strong> on {} has been approved and is now open for registration.</p>",
            name, event.details.start_date
        ),
    )
    .map(|m| {
        m.with_text(format!(
            "{} on {} has been approved and is now open for registration.",
            event.details.name, event.details.start_date
        ))
        .with_template(EVENT_APPROVED)
    })
}

pub fn event_rejected(
    event: &Event,
    organizer_email: &str,
    reason: &str,
) -> Result<EmailMessage, ValidationError> {
    EmailMessage::new(
        organizer_email,
        format!("Changes needed for \"{}\"", event.details.name),
        format!(
            "<p><strong>{}</strong> was returned to draft.</p><p>Reason: {}</p>",
            escape(&event.details.name),
            escape(reason)
        ),
    )
    .map(|m| {
        m.with_text(format!(
            "{} was returned to draft. Reason: {}",
            event.details.name, reason
        ))
        .with_template(EVENT_REJECTED)
    })
}

pub fn registration_received(
    event: &Event,
    registration: &Registration,
) -> Result<EmailMessage, ValidationError> {
    let next_step = if registration.amount_due_cents > 0 {
        format!(
            "Complete your payment of ${}.{:02} to confirm your spot.",
            registration.amount_due_cents / 100,
            registration.amount_due_cents % 100
        )
    } else {
        "Your spot is confirmed.".to_string()
    };
    EmailMessage::new(
        &registration.entry.email,
        format!("Registration received: {}", event.details.name),
        format!(
            "<p>Hi {},</p><p>We received your registration for <strong>{}</strong> in class {}.</p><p>{}</p>",
            escape(&registration.entry.competitor_name),
            escape(&event.details.name),
            escape(&registration.entry.category),
            next_step
        ),
    )
    .map(|m| m.with_template(REGISTRATION_RECEIVED))
}

pub fn payment_received(
    registration: &Registration,
    payment: &Payment,
) -> Result<EmailMessage, ValidationError> {
    EmailMessage::new(
        &registration.entry.email,
        "Payment received",
        format!(
            "<p>Thanks {}, we received {}.{:02} {}. Your registration is confirmed.</p>",
            escape(&registration.entry.competitor_name),
            payment.amount_cents / 100,
            payment.amount_cents % 100,
            payment.currency.to_ascii_uppercase()
        ),
    )
    .map(|m| m.with_template(PAYMENT_RECEIVED))
}

pub fn account_approved(email: &str, display_name: &str) -> Result<EmailMessage, ValidationError> {
    EmailMessage::new(
        email,
        "Your business account is approved",
        format!(
            "<p>Hi {}, your account has been approved. You can now sign in.</p>",
            escape(display_name)
        ),
    )
    .map(|m| m.with_template(ACCOUNT_APPROVED))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::sample_details;
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::registration::sample_entry;

    fn published() -> Event {
        let mut event = Event::create(UserId::new("org").unwrap(), sample_details()).unwrap();
        event.submit_for_approval().unwrap();
        event.approve().unwrap();
        event
    }

    #[test]
    fn approval_email_is_tagged() {
        let email = event_approved(&published(), "org@example.com").unwrap();
        assert_eq!(email.template.as_deref(), Some(EVENT_APPROVED));
        assert!(email.subject.contains("Summer Bass Bash"));
    }

    #[test]
    fn user_text_is_escaped() {
        let email = event_rejected(&published(), "org@example.com", "<b>no venue</b>").unwrap();
        assert!(email.html_body.contains("&lt;b&gt;no venue&lt;/b&gt;"));
    }

    #[test]
    fn registration_email_mentions_amount_due() {
        let event = published();
        let reg = Registration::create(
            &event,
            UserId::new("c1").unwrap(),
            sample_entry(),
            Timestamp::start_of(crate::domain::event::date(2026, 6, 1)),
        )
        .unwrap();
        let email = registration_received(&event, &reg).unwrap();
        assert_eq!(email.to, "dana@example.com");
        assert!(email.html_body.contains("$35.00"));
    }
}
