use crate::domain::entities::{
    InboundDelivery, Message, NewContact, NewMessage, VerifyQuery, WebhookPayload, SUBSCRIBE_MODE,
};
use crate::domain::errors::DomainResult;
use crate::domain::ports::channel_repository::ChannelRepository;
use crate::domain::ports::contact_repository::ContactRepository;
use crate::domain::ports::message_repository::MessageRepository;
use crate::domain::services::webhook_signature::verify_signature;
use std::sync::Arc;

/// What a delivery POST acknowledges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// WhatsApp payload; processing errors are logged, never surfaced
    Received,
    /// Some other object type; ignored
    NotWhatsApp,
}

/// Translates WhatsApp Cloud API callbacks into contacts and messages
#[derive(Clone)]
pub struct WhatsAppWebhookService {
    contact_repo: Arc<dyn ContactRepository>,
    message_repo: Arc<dyn MessageRepository>,
    channel_repo: Arc<dyn ChannelRepository>,
    verify_token: String,
    app_secret: Option<String>,
}

impl WhatsAppWebhookService {
    pub fn new(
        contact_repo: Arc<dyn ContactRepository>,
        message_repo: Arc<dyn MessageRepository>,
        channel_repo: Arc<dyn ChannelRepository>,
        verify_token: String,
        app_secret: Option<String>,
    ) -> Self {
        Self {
            contact_repo,
            message_repo,
            channel_repo,
            verify_token,
            app_secret,
        }
    }

    /// Subscription handshake. Returns the challenge to echo back, or `None`
    /// when the request must be refused.
    pub fn verify(&self, query: &VerifyQuery) -> Option<String> {
        let mode_ok = query.mode.as_deref() == Some(SUBSCRIBE_MODE);
        let token_ok = query.verify_token.as_deref() == Some(self.verify_token.as_str());

        if mode_ok && token_ok {
            tracing::info!("WhatsApp webhook verified");
            Some(query.challenge.clone().unwrap_or_default())
        } else {
            tracing::warn!("WhatsApp webhook verification refused");
            None
        }
    }

    /// Check the payload signature. Always passes when no app secret is
    /// configured.
    pub fn is_authentic(&self, body: &[u8], signature: Option<&str>) -> bool {
        let Some(secret) = self.app_secret.as_deref() else {
            return true;
        };
        match signature {
            Some(signature) => verify_signature(body, signature, secret),
            None => false,
        }
    }

    pub async fn handle_delivery(&self, payload: &WebhookPayload) -> DeliveryOutcome {
        if !payload.is_whatsapp() {
            tracing::debug!("Ignoring webhook for object {:?}", payload.object);
            metrics::counter!("webhook_deliveries_total", "outcome" => "ignored").increment(1);
            return DeliveryOutcome::NotWhatsApp;
        }

        let Some(delivery) = payload.first_delivery() else {
            tracing::debug!("WhatsApp callback without messages");
            metrics::counter!("webhook_deliveries_total", "outcome" => "empty").increment(1);
            return DeliveryOutcome::Received;
        };

        match self.ingest(delivery).await {
            Ok(Some(message)) => {
                tracing::info!(
                    "Stored inbound message {} for contact {}",
                    message.id,
                    message.contact_id
                );
                metrics::counter!("webhook_deliveries_total", "outcome" => "stored").increment(1);
            }
            Ok(None) => {
                metrics::counter!("webhook_deliveries_total", "outcome" => "dropped").increment(1);
            }
            Err(e) => {
                tracing::error!("Failed to process WhatsApp message: {}", e);
                metrics::counter!("webhook_deliveries_total", "outcome" => "failed").increment(1);
            }
        }

        DeliveryOutcome::Received
    }

    /// Find or create the contact, then store the message. `None` when the
    /// sender is unknown and no channel exists to attach a new contact to.
    ///
    /// A known sender's unread counter is incremented together with the
    /// insert; a contact created here already starts with one unread message.
    pub async fn ingest(&self, delivery: InboundDelivery) -> DomainResult<Option<Message>> {
        if let Some(contact) = self
            .contact_repo
            .find_contact_by_phone(&delivery.phone_number)
            .await?
        {
            let message = self
                .message_repo
                .insert_unread_message(&NewMessage::inbound(
                    contact.id,
                    delivery.content,
                    delivery.wam_id,
                ))
                .await?;
            return Ok(Some(message));
        }

        let Some(channel) = self.channel_repo.first_channel().await? else {
            tracing::warn!(
                "No channel configured, dropping message from {}",
                delivery.phone_number
            );
            return Ok(None);
        };

        let contact = self
            .contact_repo
            .create_contact(&NewContact::from_inbound(
                delivery.profile_name.clone(),
                delivery.phone_number.clone(),
                channel.id,
            ))
            .await?;
        tracing::info!(
            "Created contact {} for {}",
            contact.id,
            delivery.phone_number
        );

        let message = self
            .message_repo
            .insert_message(&NewMessage::inbound(
                contact.id,
                delivery.content,
                delivery.wam_id,
            ))
            .await?;

        Ok(Some(message))
    }
}
