#![allow(dead_code)]
use serde_json::{json, Value};
use zyncro::domain::entities::{Channel, Contact, Message, NewContact, NewMessage};
use zyncro::domain::ports::contact_repository::ContactRepository;
use zyncro::domain::ports::message_repository::MessageRepository;
use zyncro::infrastructure::persistence::Database;

pub const TEST_CHANNEL_ID: &str = "channel-main";

pub async fn seed_channel(db: &Database) -> Channel {
    let channel = Channel::new(TEST_CHANNEL_ID);
    db.create_channel(&channel)
        .await
        .expect("Failed to create channel");
    channel
}

/// Contact created the way the dashboard creates one. Consecutive seeds get
/// distinct `updated_at` values.
pub async fn seed_contact(db: &Database, name: &str, phone: &str) -> Contact {
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    db.create_contact(&NewContact::from_agent(
        name.to_string(),
        phone.to_string(),
        TEST_CHANNEL_ID.to_string(),
        None,
    ))
    .await
    .expect("Failed to create contact")
}

pub async fn seed_unread_contact(db: &Database, name: &str, phone: &str, unread: i64) -> Contact {
    let contact = seed_contact(db, name, phone).await;
    sqlx::query("UPDATE contacts SET unread_count = ? WHERE id = ?")
        .bind(unread)
        .bind(&contact.id)
        .execute(db.pool())
        .await
        .expect("Failed to set unread count");
    db.get_contact(&contact.id)
        .await
        .expect("Failed to reload contact")
        .expect("Contact disappeared")
}

pub async fn store_inbound(db: &Database, contact_id: &str, content: &str) -> Message {
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    db.insert_message(&NewMessage::inbound(
        contact_id.to_string(),
        content.to_string(),
        None,
    ))
    .await
    .expect("Failed to insert inbound message")
}

/// Inbound message as the webhook stores it for a known sender
pub async fn store_unread_inbound(db: &Database, contact_id: &str, content: &str) -> Message {
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    db.insert_unread_message(&NewMessage::inbound(
        contact_id.to_string(),
        content.to_string(),
        None,
    ))
    .await
    .expect("Failed to insert unread inbound message")
}

pub async fn store_outbound(db: &Database, contact_id: &str, content: &str) -> Message {
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    db.insert_message(&NewMessage::outbound(
        contact_id.to_string(),
        content.to_string(),
    ))
    .await
    .expect("Failed to insert outbound message")
}

pub async fn count_rows(db: &Database, table: &str) -> i64 {
    use sqlx::Row;
    let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {}", table))
        .fetch_one(db.pool())
        .await
        .expect("Failed to count rows");
    row.try_get("n").expect("Missing count column")
}

/// WhatsApp Cloud API text message callback
pub fn text_message_payload(from: &str, profile_name: &str, body: &str, wam_id: &str) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WHATSAPP_BUSINESS_ACCOUNT_ID",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {
                        "display_phone_number": "15550000000",
                        "phone_number_id": "PHONE_NUMBER_ID"
                    },
                    "contacts": [{
                        "profile": { "name": profile_name },
                        "wa_id": from
                    }],
                    "messages": [{
                        "from": from,
                        "id": wam_id,
                        "timestamp": "1760000000",
                        "type": "text",
                        "text": { "body": body }
                    }]
                }
            }]
        }]
    })
}

/// Callback carrying an image instead of text
pub fn image_message_payload(from: &str, wam_id: &str) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "changes": [{
                "value": {
                    "contacts": [{ "profile": { "name": "" }, "wa_id": from }],
                    "messages": [{
                        "from": from,
                        "id": wam_id,
                        "type": "image",
                        "image": { "id": "MEDIA_ID", "mime_type": "image/jpeg" }
                    }]
                }
            }]
        }]
    })
}
