use serde::{Deserialize, Serialize};

/// Who produced the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,  // From the contact to the agent
    Outbound, // From the agent to the contact
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl From<String> for Direction {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "outbound" => Direction::Outbound,
            _ => Direction::Inbound,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery state as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,      // Outbound, accepted by the store
    Delivered, // Inbound, received through the webhook
    Read,
    Failed,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
            MessageStatus::Failed => "failed",
        }
    }
}

impl From<String> for MessageStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "delivered" => MessageStatus::Delivered,
            "read" => MessageStatus::Read,
            "failed" => MessageStatus::Failed,
            _ => MessageStatus::Sent,
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub contact_id: String,
    pub direction: Direction,
    pub content: String,
    pub status: MessageStatus,
    pub created_at: String, // ISO 8601
    pub wam_id: Option<String>,
}

impl Message {
    pub fn is_inbound(&self) -> bool {
        self.direction == Direction::Inbound
    }
}

/// Insert payload for the messages table; id and timestamp are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub contact_id: String,
    pub direction: Direction,
    pub content: String,
    pub status: MessageStatus,
    pub wam_id: Option<String>,
}

impl NewMessage {
    /// Message typed by an agent
    pub fn outbound(contact_id: String, content: String) -> Self {
        Self {
            contact_id,
            direction: Direction::Outbound,
            content,
            status: MessageStatus::Sent,
            wam_id: None,
        }
    }

    /// Message received through the WhatsApp webhook
    pub fn inbound(contact_id: String, content: String, wam_id: Option<String>) -> Self {
        Self {
            contact_id,
            direction: Direction::Inbound,
            content,
            status: MessageStatus::Delivered,
            wam_id,
        }
    }
}
