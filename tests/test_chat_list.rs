mod helpers;

use helpers::*;
use std::sync::Arc;
use zyncro::application::services::{ChatList, FilterMode};
use zyncro::domain::entities::{ContactSummary, Direction, Message, MessageStatus};
use zyncro::domain::events::ChangeEvent;
use zyncro::domain::ports::change_feed::ChangeFeed;
use zyncro::domain::ports::contact_repository::ContactRepository;
use zyncro::domain::ports::task_spawner::TaskSpawner;
use zyncro::infrastructure::persistence::Database;
use zyncro::infrastructure::realtime::LocalChangeFeed;
use zyncro::infrastructure::runtime::TokioTaskSpawner;

struct Harness {
    db: Database,
    feed: Arc<LocalChangeFeed>,
    spawner: Arc<HeldTaskSpawner>,
}

impl Harness {
    fn new(db: &Database) -> Self {
        let feed = Arc::new(LocalChangeFeed::new());
        Self {
            db: db.clone().with_change_feed(feed.clone()),
            feed,
            spawner: Arc::new(HeldTaskSpawner::new()),
        }
    }

    async fn mount(&self, active_contact_id: Option<&str>) -> ChatList {
        let snapshot = self.db.list_contact_summaries().await.unwrap();
        ChatList::mount(
            snapshot,
            active_contact_id.map(str::to_string),
            Arc::new(self.db.clone()),
            self.feed.clone(),
            self.spawner.clone() as Arc<dyn TaskSpawner>,
        )
    }
}

fn ids(contacts: &[ContactSummary]) -> Vec<String> {
    contacts.iter().map(|c| c.id.clone()).collect()
}

#[tokio::test]
async fn test_inbound_message_moves_known_contact_to_top() {
    let test_db = setup_test_db().await;
    let h = Harness::new(test_db.db());
    seed_channel(&h.db).await;
    let ana = seed_contact(&h.db, "Ana", "+5491100000001").await;
    let bruno = seed_contact(&h.db, "Bruno", "+5491100000002").await;

    let mut list = h.mount(None).await;
    assert_eq!(ids(&list.contacts()), vec![bruno.id.clone(), ana.id.clone()]);

    store_inbound(&h.db, &ana.id, "¿Tienen stock?").await;
    assert_eq!(list.pump(), 1);

    let contacts = list.contacts();
    assert_eq!(ids(&contacts), vec![ana.id.clone(), bruno.id.clone()]);
    assert_eq!(contacts[0].unread_count, 1);
    assert_eq!(
        contacts[0].last_message.as_ref().unwrap().content,
        "¿Tienen stock?"
    );

    list.unmount();
    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_active_contact_and_outbound_do_not_count_unread() {
    let test_db = setup_test_db().await;
    let h = Harness::new(test_db.db());
    seed_channel(&h.db).await;
    let ana = seed_contact(&h.db, "Ana", "+5491100000001").await;
    let bruno = seed_contact(&h.db, "Bruno", "+5491100000002").await;

    let mut list = h.mount(Some(&ana.id)).await;

    store_inbound(&h.db, &ana.id, "open chat").await;
    store_outbound(&h.db, &bruno.id, "agent reply").await;
    assert_eq!(list.pump(), 2);

    let contacts = list.contacts();
    assert_eq!(ids(&contacts), vec![bruno.id.clone(), ana.id.clone()]);
    assert!(contacts.iter().all(|c| c.unread_count == 0));

    list.set_active_contact(None);
    store_inbound(&h.db, &ana.id, "now closed").await;
    list.pump();
    assert_eq!(list.contacts()[0].unread_count, 1);

    list.unmount();
    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_unknown_contact_is_fetched_and_prepended() {
    let test_db = setup_test_db().await;
    let h = Harness::new(test_db.db());
    seed_channel(&h.db).await;
    let ana = seed_contact(&h.db, "Ana", "+5491100000001").await;

    let mut list = h.mount(None).await;

    // Created after the snapshot was taken
    let carla = seed_unread_contact(&h.db, "Carla", "+5491100000003", 1).await;
    store_inbound(&h.db, &carla.id, "primer mensaje").await;
    list.pump();

    assert_eq!(ids(&list.contacts()), vec![ana.id.clone()]);
    assert_eq!(h.spawner.pending(), 1);

    h.spawner.release_all().await;

    let contacts = list.contacts();
    assert_eq!(ids(&contacts), vec![carla.id.clone(), ana.id.clone()]);
    assert_eq!(contacts[0].unread_count, 1);
    assert_eq!(
        contacts[0].last_message.as_ref().unwrap().content,
        "primer mensaje"
    );

    list.unmount();
    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_repeated_events_before_fetch_completes_duplicate_the_contact() {
    let test_db = setup_test_db().await;
    let h = Harness::new(test_db.db());
    seed_channel(&h.db).await;

    let mut list = h.mount(None).await;
    assert!(list.contacts().is_empty());

    let carla = seed_contact(&h.db, "Carla", "+5491100000003").await;
    store_inbound(&h.db, &carla.id, "uno").await;
    store_inbound(&h.db, &carla.id, "dos").await;
    assert_eq!(list.pump(), 2);
    assert_eq!(h.spawner.pending(), 2);

    h.spawner.release_all().await;

    let contacts = list.contacts();
    assert_eq!(contacts.len(), 2);
    assert!(contacts.iter().all(|c| c.id == carla.id));

    list.unmount();
    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_failed_lookup_drops_the_event() {
    let test_db = setup_test_db().await;
    let h = Harness::new(test_db.db());
    seed_channel(&h.db).await;
    let ana = seed_contact(&h.db, "Ana", "+5491100000001").await;

    let mut list = h.mount(None).await;

    h.feed.publish(ChangeEvent::MessageInserted(Message {
        id: "orphan".to_string(),
        contact_id: "no-such-contact".to_string(),
        direction: Direction::Inbound,
        content: "lost".to_string(),
        status: MessageStatus::Delivered,
        created_at: "2026-01-12T10:00:00.000000Z".to_string(),
        wam_id: None,
    }));
    list.pump();
    h.spawner.release_all().await;

    assert_eq!(ids(&list.contacts()), vec![ana.id.clone()]);

    list.unmount();
    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_filter_and_search_project_without_reordering() {
    let test_db = setup_test_db().await;
    let h = Harness::new(test_db.db());
    seed_channel(&h.db).await;
    seed_contact(&h.db, "Ana Pérez", "+5491100000001").await;
    seed_unread_contact(&h.db, "Anabel", "+5491100000002", 2).await;
    seed_unread_contact(&h.db, "Bruno", "+15550001111", 1).await;

    let list = h.mount(None).await;
    let order_before = ids(&list.contacts());

    list.with_state(|state| state.set_filter_mode(FilterMode::Unread));
    assert_eq!(list.visible_contacts().len(), 2);

    list.with_state(|state| {
        state.search_mut().open();
        state.search_mut().set_query("ANA");
    });
    let visible = list.visible_contacts();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Anabel");

    list.with_state(|state| state.set_filter_mode(FilterMode::All));
    list.with_state(|state| state.search_mut().set_query("1555"));
    let visible = list.visible_contacts();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Bruno");

    assert_eq!(ids(&list.contacts()), order_before);

    list.unmount();
    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_unmount_removes_subscription() {
    let test_db = setup_test_db().await;
    let h = Harness::new(test_db.db());

    let list = h.mount(None).await;
    assert!(list.is_subscribed());
    assert_eq!(h.feed.subscriber_count(), 1);

    list.unmount();
    assert_eq!(h.feed.subscriber_count(), 0);

    let dropped = h.mount(None).await;
    assert_eq!(h.feed.subscriber_count(), 1);
    drop(dropped);
    assert_eq!(h.feed.subscriber_count(), 0);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_next_event_waits_for_live_insert() {
    let test_db = setup_test_db().await;
    let h = Harness::new(test_db.db());
    seed_channel(&h.db).await;
    let ana = seed_contact(&h.db, "Ana", "+5491100000001").await;

    let mut list = h.mount(None).await;

    let writer = h.db.clone();
    let contact_id = ana.id.clone();
    tokio::spawn(async move {
        store_inbound(&writer, &contact_id, "async hello").await;
    });

    assert!(list.next_event().await);
    assert_eq!(
        list.contacts()[0].last_message.as_ref().unwrap().content,
        "async hello"
    );

    list.unmount();
    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_missing_contact_fetch_runs_on_tokio() {
    let test_db = setup_test_db().await;
    let h = Harness::new(test_db.db());
    seed_channel(&h.db).await;

    let mut list = ChatList::mount(
        Vec::new(),
        None,
        Arc::new(h.db.clone()),
        h.feed.clone(),
        Arc::new(TokioTaskSpawner::new()),
    );

    let carla = seed_unread_contact(&h.db, "Carla", "+5491100000003", 1).await;
    store_inbound(&h.db, &carla.id, "hola").await;
    assert!(list.next_event().await);

    for _ in 0..50 {
        if !list.contacts().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(ids(&list.contacts()), vec![carla.id.clone()]);

    drop(list);
    assert_eq!(h.feed.subscriber_count(), 0);
    teardown_test_db(test_db).await;
}
