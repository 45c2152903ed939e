use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::Message;

/// Labels attached to every contact created by an agent.
pub const LABEL_NEW: &str = "new";
/// Extra label for contacts first seen through the WhatsApp webhook.
pub const LABEL_WHATSAPP: &str = "whatsapp";

/// Free-form contact metadata. The well-known keys are typed; anything else
/// written by other tools is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub unread_count: i64,
    pub avatar_url: Option<String>,
    pub labels: Vec<String>,
    pub metadata: ContactMetadata,
    pub assigned_to: Option<String>,
    pub channel_id: Option<String>,
    pub updated_at: String, // ISO 8601
}

impl Contact {
    /// Dashboard path of this contact's chat
    pub fn chat_path(&self) -> String {
        format!("/dashboard/chats/{}", self.id)
    }

    pub fn summary(&self, last_message: Option<Message>) -> ContactSummary {
        ContactSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
            unread_count: self.unread_count,
            avatar_url: self.avatar_url.clone(),
            labels: self.labels.clone(),
            updated_at: self.updated_at.clone(),
            last_message,
        }
    }
}

/// Chat-list projection of a contact with its latest message as preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub unread_count: i64,
    pub avatar_url: Option<String>,
    pub labels: Vec<String>,
    pub updated_at: String,
    pub last_message: Option<Message>,
}

/// Insert payload for the contacts table
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub phone_number: String,
    pub channel_id: String,
    pub unread_count: i64,
    pub labels: Vec<String>,
    pub assigned_to: Option<String>,
}

impl NewContact {
    /// Contact created by an agent from the dashboard
    pub fn from_agent(
        name: String,
        phone_number: String,
        channel_id: String,
        assigned_to: Option<String>,
    ) -> Self {
        Self {
            name,
            phone_number,
            channel_id,
            unread_count: 0,
            labels: vec![LABEL_NEW.to_string()],
            assigned_to,
        }
    }

    /// Contact first seen through an inbound WhatsApp message; it already
    /// has that message unread.
    pub fn from_inbound(name: String, phone_number: String, channel_id: String) -> Self {
        Self {
            name,
            phone_number,
            channel_id,
            unread_count: 1,
            labels: vec![LABEL_NEW.to_string(), LABEL_WHATSAPP.to_string()],
            assigned_to: None,
        }
    }
}

/// Editable fields of a contact (detail panel)
#[derive(Debug, Clone, PartialEq)]
pub struct ContactUpdate {
    pub name: String,
    pub metadata: ContactMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_preserves_unknown_keys() {
        let raw = json!({
            "company": "Tech Solutions S.A.",
            "crm_id": 42,
            "source": "import"
        });

        let metadata: ContactMetadata = serde_json::from_value(raw).unwrap();
        assert_eq!(metadata.company.as_deref(), Some("Tech Solutions S.A."));
        assert_eq!(metadata.extra.get("crm_id"), Some(&json!(42)));

        let back = serde_json::to_value(&metadata).unwrap();
        assert_eq!(back["source"], json!("import"));
        assert!(back.get("tax_id").is_none());
    }

    #[test]
    fn test_inbound_contact_defaults() {
        let contact = NewContact::from_inbound(
            "Ana".to_string(),
            "+5491100000000".to_string(),
            "ch-1".to_string(),
        );
        assert_eq!(contact.unread_count, 1);
        assert_eq!(contact.labels, vec!["new", "whatsapp"]);
        assert!(contact.assigned_to.is_none());
    }

    #[test]
    fn test_agent_contact_defaults() {
        let contact = NewContact::from_agent(
            "Juan".to_string(),
            "+5491100000001".to_string(),
            "ch-1".to_string(),
            Some("agent-1".to_string()),
        );
        assert_eq!(contact.unread_count, 0);
        assert_eq!(contact.labels, vec!["new"]);
    }
}
