use crate::application::services::message_service::MessageService;
use crate::domain::entities::{Contact, Message, Template};
use crate::domain::errors::Alert;
use crate::domain::events::{ChangeEvent, ChangeFilter};
use crate::domain::ports::change_feed::{ChangeFeed, Subscription};
use crate::domain::ports::contact_repository::ContactRepository;
use crate::domain::ports::message_repository::MessageRepository;
use crate::domain::ports::template_repository::TemplateRepository;
use std::sync::Arc;

/// Typing this character first turns the composer into a template filter
pub const TEMPLATE_TRIGGER: char = '/';

/// Realtime topic for one contact's conversation
pub fn chat_topic(contact_id: &str) -> String {
    format!("chat:{}", contact_id)
}

/// Draft text plus the template picker
#[derive(Debug, Clone, Default)]
pub struct Composer {
    draft: String,
    templates: Vec<Template>,
    suggestions: Vec<Template>,
}

impl Composer {
    pub fn new(templates: Vec<Template>) -> Self {
        Self {
            templates,
            ..Default::default()
        }
    }

    pub fn set_templates(&mut self, templates: Vec<Template>) {
        self.templates = templates;
        self.refresh_suggestions();
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.refresh_suggestions();
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = match self.draft.strip_prefix(TEMPLATE_TRIGGER) {
            Some(query) => self
                .templates
                .iter()
                .filter(|template| template.matches(query))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn suggestions(&self) -> &[Template] {
        &self.suggestions
    }

    /// The picker only shows when the filter has matches
    pub fn is_picker_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    /// Replace the draft with the template content. Returns false for an
    /// unknown template id.
    pub fn select_template(&mut self, template_id: &str) -> bool {
        let Some(template) = self.templates.iter().find(|t| t.id == template_id) else {
            return false;
        };
        self.draft = template.content.clone();
        self.suggestions.clear();
        true
    }

    pub fn clear(&mut self) {
        self.draft.clear();
        self.suggestions.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Stored; the message shows up through the realtime stream
    Sent { message_id: String },
    /// Empty draft or a send already in flight
    Skipped,
}

/// Marks a send as in flight until dropped, including when the send
/// future itself is dropped mid-await
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Store handles the chat window works against
#[derive(Clone)]
pub struct ChatWindowDeps {
    pub contacts: Arc<dyn ContactRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    pub feed: Arc<dyn ChangeFeed>,
}

/// One open conversation: ordered messages, composer and the live
/// subscription for the contact.
pub struct ChatWindow {
    deps: ChatWindowDeps,
    contact: Contact,
    messages: Vec<Message>,
    composer: Composer,
    sending: bool,
    scroll_requests: u64,
    subscription: Option<Subscription>,
}

impl ChatWindow {
    /// Open the window: mark the conversation read, subscribe to its
    /// messages and load the templates.
    pub async fn open(deps: ChatWindowDeps, contact: Contact, initial_messages: Vec<Message>) -> Self {
        let mut window = Self {
            deps,
            contact,
            messages: Vec::new(),
            composer: Composer::default(),
            sending: false,
            scroll_requests: 0,
            subscription: None,
        };

        window.attach(initial_messages).await;
        window.load_templates().await;
        window
    }

    async fn attach(&mut self, initial_messages: Vec<Message>) {
        self.messages = initial_messages;
        self.scroll_requests += 1;
        self.mark_read().await;

        let subscription = self.deps.feed.subscribe(
            &chat_topic(&self.contact.id),
            ChangeFilter::MessagesForContact(self.contact.id.clone()),
        );
        tracing::debug!(
            "Chat window for contact {} subscribed ({})",
            self.contact.id,
            subscription.id()
        );
        self.subscription = Some(subscription);
    }

    async fn load_templates(&mut self) {
        match self.deps.templates.list_templates().await {
            Ok(templates) => self.composer.set_templates(templates),
            Err(e) => {
                tracing::warn!("Failed to load templates: {}", e);
                self.composer.set_templates(Vec::new());
            }
        }
    }

    async fn mark_read(&self) {
        if let Err(e) = self.deps.contacts.reset_unread_count(&self.contact.id).await {
            tracing::warn!(
                "Failed to reset unread count for contact {}: {}",
                self.contact.id,
                e
            );
        }
    }

    /// New history from the server for the open contact
    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.scroll_requests += 1;
    }

    /// Append unless a message with the same id is already shown
    pub fn append_message(&mut self, message: Message) -> bool {
        if self.messages.iter().any(|m| m.id == message.id) {
            return false;
        }
        self.messages.push(message);
        self.scroll_requests += 1;
        true
    }

    /// Returns true when the event added a message
    pub async fn handle_event(&mut self, event: ChangeEvent) -> bool {
        match event {
            ChangeEvent::MessageInserted(message) => {
                if message.contact_id != self.contact.id {
                    return false;
                }
                let inbound = message.is_inbound();
                let appended = self.append_message(message);
                // The agent is looking at it
                if inbound {
                    self.mark_read().await;
                }
                appended
            }
        }
    }

    /// Handle every event already queued on the subscription
    pub async fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self
            .subscription
            .as_mut()
            .and_then(|subscription| subscription.try_next_event())
        {
            self.handle_event(event).await;
            handled += 1;
        }
        handled
    }

    /// Wait for the next event and handle it. Returns false once the
    /// subscription has ended.
    pub async fn next_event(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.next_event().await {
            Some(event) => {
                self.handle_event(event).await;
                true
            }
            None => false,
        }
    }

    pub async fn send(&mut self) -> Result<SendOutcome, Alert> {
        if self.composer.draft().trim().is_empty() || self.sending {
            return Ok(SendOutcome::Skipped);
        }

        let service = MessageService::new(self.deps.messages.clone());
        let result = {
            let _in_flight = InFlight::start(&mut self.sending);
            service
                .send_text(&self.contact.id, self.composer.draft())
                .await
        };

        match result? {
            Some(message) => {
                self.composer.clear();
                Ok(SendOutcome::Sent {
                    message_id: message.id,
                })
            }
            None => Ok(SendOutcome::Skipped),
        }
    }

    /// Point the window at another contact. The old subscription is released
    /// before the new one is opened.
    pub async fn switch_contact(&mut self, contact: Contact, messages: Vec<Message>) {
        self.release_subscription();
        self.contact = contact;
        self.composer.clear();
        self.attach(messages).await;
    }

    /// Reflect a saved detail edit
    pub fn apply_contact_update(&mut self, contact: Contact) {
        if contact.id == self.contact.id {
            self.contact = contact;
        }
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Bumped whenever the view should scroll to the newest message
    pub fn scroll_requests(&self) -> u64 {
        self.scroll_requests
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn close(mut self) {
        self.release_subscription();
    }

    fn release_subscription(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.deps.feed.unsubscribe(subscription.id());
        }
    }
}

impl Drop for ChatWindow {
    fn drop(&mut self) {
        self.release_subscription();
    }
}
