//! Suggestion and subscription flows.
//!
//! Both end in one mail through a [`MailDispatcher`]. Subscriptions are
//! also recorded in a local [`SubscriberStore`], which is checked first so
//! a repeat subscription sends nothing.

pub mod mail;
pub mod store;

pub use mail::{EmailJs, EmailJsConfig, MailDispatcher, MailError, MailParams};
pub use store::{normalize_email, StoreError, Subscriber, SubscriberStore};

use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Marker in `place_name` that tells subscription mails apart from suggestions.
pub const SUBSCRIPTION_MARKER: &str = "[SUBSCRIPTION]";

/// A venue proposed by a visitor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Suggestion {
    pub name: String,
    pub address: String,
    pub link: String,
}

impl Suggestion {
    fn to_params(&self) -> Option<MailParams> {
        let name = self.name.trim();
        let address = self.address.trim();
        if name.is_empty() || address.is_empty() {
            return None;
        }
        Some(MailParams {
            place_name: name.to_string(),
            place_address: address.to_string(),
            place_link: normalize_link(&self.link),
        })
    }
}

/// Prefix `https://` onto links typed as `www.…`.
pub fn normalize_link(link: &str) -> String {
    let link = link.trim();
    if link.to_lowercase().starts_with("www.") {
        format!("https://{}", link)
    } else {
        link.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("name and address are required")]
    MissingFields,
    #[error(transparent)]
    Mail(#[from] MailError),
}

impl SuggestError {
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            Self::MissingFields => lang.messages().missing_fields,
            Self::Mail(e) => e.user_message(lang),
        }
    }
}

pub fn send_suggestion(mailer: &dyn MailDispatcher, suggestion: &Suggestion) -> Result<(), SuggestError> {
    let params = suggestion.to_params().ok_or(SuggestError::MissingFields)?;
    mailer.send(&params).map_err(|e| {
        warn!(place = %params.place_name, error = %e, "suggestion not sent");
        SuggestError::from(e)
    })?;
    info!(place = %params.place_name, "suggestion sent");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
}

impl SubscribeOutcome {
    pub fn user_message(self, lang: Language) -> &'static str {
        match self {
            Self::Subscribed => lang.messages().subscribe_success,
            Self::AlreadySubscribed => lang.messages().subscribe_exists,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("name and email are required")]
    MissingFields,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

impl SubscribeError {
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            Self::MissingFields => lang.messages().missing_fields,
            Self::Store(_) | Self::Mail(_) => lang.messages().subscribe_error,
        }
    }
}

/// Record a subscriber and notify by mail.
///
/// A known email short-circuits with [`SubscribeOutcome::AlreadySubscribed`].
/// When the mail fails the new record is removed again, so a retry is possible.
pub fn subscribe(
    store: &mut SubscriberStore,
    mailer: &dyn MailDispatcher,
    name: &str,
    email: &str,
) -> Result<SubscribeOutcome, SubscribeError> {
    let name = name.trim();
    let email = normalize_email(email);
    if name.is_empty() || email.is_empty() {
        return Err(SubscribeError::MissingFields);
    }

    if !store.add(name, &email)? {
        info!(email = %email, "already subscribed");
        return Ok(SubscribeOutcome::AlreadySubscribed);
    }

    let params = MailParams {
        place_name: SUBSCRIPTION_MARKER.to_string(),
        place_address: name.to_string(),
        place_link: email.clone(),
    };
    if let Err(e) = mailer.send(&params) {
        warn!(email = %email, error = %e, "subscription mail failed, rolling back");
        if let Err(rollback) = store.remove(&email) {
            warn!(email = %email, error = %rollback, "subscriber rollback failed");
        }
        return Err(e.into());
    }

    info!(email = %email, "subscribed");
    Ok(SubscribeOutcome::Subscribed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every message; fails with `fail` when set.
    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<MailParams>>,
        fail: Option<MailError>,
    }

    impl MailDispatcher for Outbox {
        fn send(&self, params: &MailParams) -> Result<(), MailError> {
            if let Some(e) = &self.fail {
                return Err(e.clone());
            }
            self.sent.lock().unwrap().push(params.clone());
            Ok(())
        }
    }

    fn store() -> (SubscriberStore, TempDir) {
        let dir = TempDir::new().unwrap();
        (SubscriberStore::load_from(dir.path().join("subscribers.json")), dir)
    }

    #[test]
    fn test_normalize_link() {
        assert_eq!(normalize_link("www.example.com"), "https://www.example.com");
        assert_eq!(normalize_link(" WWW.Example.com "), "https://WWW.Example.com");
        assert_eq!(normalize_link("http://example.com"), "http://example.com");
        assert_eq!(normalize_link(""), "");
    }

    #[test]
    fn test_suggestion_is_sent_with_normalized_link() {
        let outbox = Outbox::default();
        let s = Suggestion {
            name: " Green Cafe ".into(),
            address: "דיזינגוף 50, תל אביב".into(),
            link: "www.green.example".into(),
        };
        send_suggestion(&outbox, &s).unwrap();

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].place_name, "Green Cafe");
        assert_eq!(sent[0].place_link, "https://www.green.example");
    }

    #[test]
    fn test_suggestion_requires_name_and_address() {
        let outbox = Outbox::default();
        let s = Suggestion { name: "X".into(), ..Suggestion::default() };
        let err = send_suggestion(&outbox, &s).unwrap_err();
        assert!(matches!(err, SuggestError::MissingFields));
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_suggestion_error_bucket_message() {
        let outbox = Outbox { fail: Some(MailError::from_status(422, "")), ..Outbox::default() };
        let s = Suggestion { name: "X".into(), address: "Y".into(), ..Suggestion::default() };
        let err = send_suggestion(&outbox, &s).unwrap_err();
        assert_eq!(err.user_message(Language::En), Language::En.messages().mail_invalid_data);
    }

    #[test]
    fn test_subscribe_then_duplicate() {
        let (mut store, _dir) = store();
        let outbox = Outbox::default();

        let first = subscribe(&mut store, &outbox, "Dana", " Dana@Example.com").unwrap();
        assert_eq!(first, SubscribeOutcome::Subscribed);
        let second = subscribe(&mut store, &outbox, "Dana", "dana@example.com ").unwrap();
        assert_eq!(second, SubscribeOutcome::AlreadySubscribed);

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].place_name, SUBSCRIPTION_MARKER);
        assert_eq!(sent[0].place_address, "Dana");
        assert_eq!(sent[0].place_link, "dana@example.com");
    }

    #[test]
    fn test_failed_mail_rolls_back_subscriber() {
        let (mut store, _dir) = store();
        let outbox = Outbox { fail: Some(MailError::Failed("down".into())), ..Outbox::default() };

        let err = subscribe(&mut store, &outbox, "Dana", "dana@example.com").unwrap_err();
        assert_eq!(err.user_message(Language::He), Language::He.messages().subscribe_error);
        assert!(!store.contains("dana@example.com"));
    }

    #[test]
    fn test_subscribe_requires_fields() {
        let (mut store, _dir) = store();
        let err = subscribe(&mut store, &Outbox::default(), " ", "a@b.c").unwrap_err();
        assert!(matches!(err, SubscribeError::MissingFields));
    }
}
