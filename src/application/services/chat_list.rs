//! Chat list reconciliation.
//!
//! Keeps the locally held, ordered contact list consistent with the initial
//! snapshot and the live stream of message inserts. Unknown contacts are
//! fetched in the background and prepended once they arrive; a second event
//! for the same unknown contact before that fetch completes triggers another
//! fetch, so the contact can end up listed twice.

use crate::domain::entities::{ContactSummary, Message};
use crate::domain::events::{ChangeEvent, ChangeFilter};
use crate::domain::ports::change_feed::{ChangeFeed, Subscription};
use crate::domain::ports::contact_repository::ContactRepository;
use crate::domain::ports::task_spawner::TaskSpawner;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// Topic name of the chat list subscription
pub const CHAT_LIST_TOPIC: &str = "chat_list_updates";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Unread,
}

/// Transient search toggle of the list header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    visible: bool,
    query: String,
}

impl SearchBox {
    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Focus left the field: an empty search closes itself
    pub fn blur(&mut self) {
        if self.query.is_empty() {
            self.visible = false;
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// What applying a message insert did to the list
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// Known contact, now at the front
    Moved { contact_id: String },
    /// Contact not in the list; it has to be fetched
    Missing { contact_id: String, message: Message },
}

/// Case-insensitive match on name or phone, combined (AND) with the mode
pub fn filter_contacts<'a>(
    contacts: &'a [ContactSummary],
    query: &str,
    mode: FilterMode,
) -> Vec<&'a ContactSummary> {
    let query = query.to_lowercase();

    contacts
        .iter()
        .filter(|contact| {
            let matches_search = contact.name.to_lowercase().contains(&query)
                || contact.phone_number.to_lowercase().contains(&query);
            let matches_mode = match mode {
                FilterMode::All => true,
                FilterMode::Unread => contact.unread_count > 0,
            };
            matches_search && matches_mode
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ChatListState {
    contacts: Vec<ContactSummary>,
    active_contact_id: Option<String>,
    filter_mode: FilterMode,
    search: SearchBox,
}

impl ChatListState {
    pub fn new(snapshot: Vec<ContactSummary>, active_contact_id: Option<String>) -> Self {
        Self {
            contacts: snapshot,
            active_contact_id,
            ..Default::default()
        }
    }

    /// A fresh server snapshot replaces the local list
    pub fn replace_snapshot(&mut self, snapshot: Vec<ContactSummary>) {
        self.contacts = snapshot;
    }

    pub fn set_active_contact(&mut self, contact_id: Option<String>) {
        self.active_contact_id = contact_id;
    }

    pub fn active_contact_id(&self) -> Option<&str> {
        self.active_contact_id.as_deref()
    }

    pub fn apply_message_inserted(&mut self, message: Message) -> Reconciliation {
        let Some(index) = self
            .contacts
            .iter()
            .position(|contact| contact.id == message.contact_id)
        else {
            return Reconciliation::Missing {
                contact_id: message.contact_id.clone(),
                message,
            };
        };

        let mut contact = self.contacts.remove(index);
        contact.updated_at = message.created_at.clone();
        if message.is_inbound() && self.active_contact_id.as_deref() != Some(contact.id.as_str())
        {
            contact.unread_count += 1;
        }
        contact.last_message = Some(message);

        let contact_id = contact.id.clone();
        self.contacts.insert(0, contact);

        Reconciliation::Moved { contact_id }
    }

    /// Insert a fetched contact at the front with `message` as preview
    pub fn prepend(&mut self, mut contact: ContactSummary, message: Message) {
        contact.last_message = Some(message);
        self.contacts.insert(0, contact);
    }

    pub fn contacts(&self) -> &[ContactSummary] {
        &self.contacts
    }

    pub fn visible_contacts(&self) -> Vec<&ContactSummary> {
        filter_contacts(&self.contacts, self.search.query(), self.filter_mode)
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter_mode = mode;
    }

    pub fn search(&self) -> &SearchBox {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchBox {
        &mut self.search
    }
}

/// The mounted chat list: reconciliation state plus its live subscription
pub struct ChatList {
    state: Arc<Mutex<ChatListState>>,
    contacts: Arc<dyn ContactRepository>,
    feed: Arc<dyn ChangeFeed>,
    spawner: Arc<dyn TaskSpawner>,
    subscription: Option<Subscription>,
}

fn lock_state(state: &Mutex<ChatListState>) -> MutexGuard<'_, ChatListState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ChatList {
    pub fn mount(
        snapshot: Vec<ContactSummary>,
        active_contact_id: Option<String>,
        contacts: Arc<dyn ContactRepository>,
        feed: Arc<dyn ChangeFeed>,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Self {
        let subscription = feed.subscribe(CHAT_LIST_TOPIC, ChangeFilter::AllMessages);
        tracing::debug!(
            "Chat list mounted with {} contacts (subscription {})",
            snapshot.len(),
            subscription.id()
        );

        Self {
            state: Arc::new(Mutex::new(ChatListState::new(snapshot, active_contact_id))),
            contacts,
            feed,
            spawner,
            subscription: Some(subscription),
        }
    }

    pub fn handle_event(&self, event: ChangeEvent) {
        match event {
            ChangeEvent::MessageInserted(message) => {
                let outcome = lock_state(&self.state).apply_message_inserted(message);
                if let Reconciliation::Missing {
                    contact_id,
                    message,
                } = outcome
                {
                    self.spawn_missing_contact_fetch(contact_id, message);
                }
            }
        }
    }

    fn spawn_missing_contact_fetch(&self, contact_id: String, message: Message) {
        let contacts = self.contacts.clone();
        let state = self.state.clone();

        self.spawner.spawn(Box::pin(async move {
            match contacts.get_contact_summary(&contact_id).await {
                Ok(Some(summary)) => lock_state(&state).prepend(summary, message),
                Ok(None) => {
                    tracing::debug!("Contact {} not found, dropping list update", contact_id);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch contact {}: {}", contact_id, e);
                }
            }
        }));
    }

    /// Handle every event already queued on the subscription
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self
            .subscription
            .as_mut()
            .and_then(|subscription| subscription.try_next_event())
        {
            self.handle_event(event);
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
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut ChatListState) -> R) -> R {
        f(&mut lock_state(&self.state))
    }

    /// Ordered list as held locally
    pub fn contacts(&self) -> Vec<ContactSummary> {
        lock_state(&self.state).contacts().to_vec()
    }

    /// Filtered projection for display
    pub fn visible_contacts(&self) -> Vec<ContactSummary> {
        lock_state(&self.state)
            .visible_contacts()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn replace_snapshot(&self, snapshot: Vec<ContactSummary>) {
        lock_state(&self.state).replace_snapshot(snapshot);
    }

    pub fn set_active_contact(&self, contact_id: Option<String>) {
        lock_state(&self.state).set_active_contact(contact_id);
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Release the feed subscription
    pub fn unmount(mut self) {
        self.release_subscription();
    }

    fn release_subscription(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.feed.unsubscribe(subscription.id());
        }
    }
}

impl Drop for ChatList {
    fn drop(&mut self) {
        self.release_subscription();
    }
}
