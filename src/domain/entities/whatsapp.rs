//! WhatsApp Business Cloud API webhook payloads.
//!
//! Only the fields the inbox consumes are modelled; everything else in the
//! provider callback is ignored.

use serde::Deserialize;

use crate::shared::utils::normalize_phone;

/// Value of the top-level `object` field for WhatsApp callbacks
pub const WHATSAPP_OBJECT: &str = "whatsapp_business_account";
/// Mode literal of the verification handshake
pub const SUBSCRIBE_MODE: &str = "subscribe";
/// Content stored for messages without a text body (media, location, ...)
pub const UNSUPPORTED_CONTENT: &str = "Multimedia message (not supported yet)";
/// Name given to contacts whose profile carries none
pub const UNKNOWN_CONTACT_NAME: &str = "Unknown";

/// Query of the `GET` verification handshake
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
    #[serde(default)]
    pub contacts: Vec<ProfileContact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileContact {
    #[serde(default)]
    pub wa_id: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
}

/// One inbound message flattened out of a callback
#[derive(Debug, Clone, PartialEq)]
pub struct InboundDelivery {
    pub phone_number: String,
    pub profile_name: String,
    pub content: String,
    pub wam_id: Option<String>,
}

impl WebhookPayload {
    pub fn is_whatsapp(&self) -> bool {
        self.object.as_deref() == Some(WHATSAPP_OBJECT)
    }

    fn first_value(&self) -> Option<&ChangeValue> {
        self.entry
            .first()
            .and_then(|entry| entry.changes.first())
            .and_then(|change| change.value.as_ref())
    }

    /// The provider sends one message per callback; only the first message of
    /// the first change is consumed. Messages without a sender are skipped.
    pub fn first_delivery(&self) -> Option<InboundDelivery> {
        let value = self.first_value()?;
        let message = value.messages.first()?;
        let from = message.from.as_deref()?;

        let profile_name = value
            .contacts
            .first()
            .and_then(|c| c.profile.as_ref())
            .and_then(|p| p.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_CONTACT_NAME.to_string());

        let content = message
            .text
            .as_ref()
            .map(|t| t.body.clone())
            .filter(|body| !body.is_empty())
            .unwrap_or_else(|| UNSUPPORTED_CONTENT.to_string());

        Some(InboundDelivery {
            phone_number: normalize_phone(from),
            profile_name,
            content,
            wam_id: message.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> WebhookPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_message_extraction() {
        let p = payload(json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "WABA_ID",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "contacts": [{ "profile": { "name": "Ana" }, "wa_id": "5491100000000" }],
                        "messages": [{
                            "from": "5491100000000",
                            "id": "wamid.ABC",
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": { "body": "Hola!" }
                        }]
                    }
                }]
            }]
        }));

        assert!(p.is_whatsapp());
        let delivery = p.first_delivery().unwrap();
        assert_eq!(delivery.phone_number, "+5491100000000");
        assert_eq!(delivery.profile_name, "Ana");
        assert_eq!(delivery.content, "Hola!");
        assert_eq!(delivery.wam_id.as_deref(), Some("wamid.ABC"));
    }

    #[test]
    fn test_media_message_uses_fallbacks() {
        let p = payload(json!({
            "object": "whatsapp_business_account",
            "entry": [{ "changes": [{ "value": {
                "messages": [{ "from": "15550001111", "id": "wamid.IMG", "type": "image" }]
            }}]}]
        }));

        let delivery = p.first_delivery().unwrap();
        assert_eq!(delivery.content, UNSUPPORTED_CONTENT);
        assert_eq!(delivery.profile_name, UNKNOWN_CONTACT_NAME);
    }

    #[test]
    fn test_status_callback_has_no_delivery() {
        let p = payload(json!({
            "object": "whatsapp_business_account",
            "entry": [{ "changes": [{ "value": {
                "statuses": [{ "id": "wamid.1", "status": "read" }]
            }}]}]
        }));

        assert!(p.is_whatsapp());
        assert!(p.first_delivery().is_none());
    }

    #[test]
    fn test_other_object_is_not_whatsapp() {
        assert!(!payload(json!({ "object": "page", "entry": [] })).is_whatsapp());
        assert!(!payload(json!({})).is_whatsapp());
    }
}
