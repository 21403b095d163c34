use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use recuerda_models::{
    chrono_tz,
    reminder::{Reminder, ReminderId, ReminderStatus},
    user::UserId,
};
use recuerda_storage::{
    InMemoryReminderStorage, InMemoryUserStorage, NewReminder, NewUser, ReminderStorage,
    StorageError, UserStorage,
};
use tokio_util::sync::CancellationToken;

use super::*;
use crate::delivery::{ReminderDeliveryChannel, ReminderMessageType};

type ReceivedMessages = Arc<Mutex<Vec<(ReminderId, ReminderMessageType)>>>;

struct TestDeliveryChannel {
    received_messages: ReceivedMessages,
    fail_dispatch: Arc<AtomicBool>,
}

#[async_trait]
impl ReminderDeliveryChannel for TestDeliveryChannel {
    async fn send_reminder_notification(
        &self,
        reminder: &Reminder,
        message: ReminderMessageType,
    ) -> anyhow::Result<()> {
        if self.fail_dispatch.load(Ordering::SeqCst) {
            anyhow::bail!("delivery unavailable");
        }

        self.received_messages
            .lock()
            .unwrap()
            .push((reminder.id, message));

        Ok(())
    }
}

struct FixedClock(Mutex<NaiveDateTime>);

impl FixedClock {
    fn set(&self, now: NaiveDateTime) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}

/// Storage wrapper that can be told to fail status updates, simulating a
/// store outage between dispatch and persistence.
struct FailingStatusUpdates {
    inner: Arc<InMemoryReminderStorage>,
    fail_update: Arc<AtomicBool>,
}

#[async_trait]
impl ReminderStorage for FailingStatusUpdates {
    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError> {
        self.inner.get(id).await
    }

    async fn get_unfinished(&self) -> Result<Vec<Reminder>, StorageError> {
        self.inner.get_unfinished().await
    }

    async fn get_pending_for_user(&self, user_id: UserId) -> Result<Vec<Reminder>, StorageError> {
        self.inner.get_pending_for_user(user_id).await
    }

    async fn insert(&self, reminder: NewReminder) -> Result<Reminder, StorageError> {
        self.inner.insert(reminder).await
    }

    async fn update_status(
        &self,
        id: ReminderId,
        status: ReminderStatus,
    ) -> Result<Reminder, StorageError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(StorageError::NotFound {
                entity: "reminder",
                id,
            });
        }
        self.inner.update_status(id, status).await
    }
}

struct TestContext {
    reminders: Arc<InMemoryReminderStorage>,
    users: Arc<InMemoryUserStorage>,
    received_messages: ReceivedMessages,
    fail_dispatch: Arc<AtomicBool>,
    fail_update: Arc<AtomicBool>,
    clock: Arc<FixedClock>,
    scanner: ReminderScanner,
}

impl TestContext {
    fn new(now: NaiveDateTime) -> Self {
        let reminders = Arc::new(InMemoryReminderStorage::new());
        let users = Arc::new(InMemoryUserStorage::new());
        let received_messages: ReceivedMessages = Arc::new(Mutex::new(Vec::new()));
        let fail_dispatch = Arc::new(AtomicBool::new(false));
        let fail_update = Arc::new(AtomicBool::new(false));
        let clock = Arc::new(FixedClock(Mutex::new(now)));

        let delivery = Arc::new(TestDeliveryChannel {
            received_messages: received_messages.clone(),
            fail_dispatch: fail_dispatch.clone(),
        });
        let failing_storage = Arc::new(FailingStatusUpdates {
            inner: reminders.clone(),
            fail_update: fail_update.clone(),
        });

        let scanner = ReminderScanner::new(
            failing_storage,
            users.clone(),
            delivery,
            clock.clone(),
        );

        Self {
            reminders,
            users,
            received_messages,
            fail_dispatch,
            fail_update,
            clock,
            scanner,
        }
    }

    async fn create_user(&self, id: UserId) -> recuerda_models::user::User {
        self.users
            .create(NewUser {
                id,
                username: Some("tester".to_string()),
                first_name: Some("Test".to_string()),
                last_name: None,
                time_zone: chrono_tz::Tz::UTC,
                default_reminder_minutes: 60,
            })
            .await
            .unwrap()
    }

    async fn deactivate_user(&self, id: UserId) {
        let mut user = self.users.get(id).await.unwrap().unwrap();
        user.is_active = false;
        self.users.update(user).await.unwrap();
    }

    async fn create_reminder(
        &self,
        user_id: UserId,
        reminder_time: NaiveDateTime,
        date: NaiveDateTime,
    ) -> Reminder {
        self.reminders
            .insert(NewReminder {
                user_id,
                title: "Dentist".to_string(),
                description: None,
                date,
                reminder_time,
            })
            .await
            .unwrap()
    }

    async fn status_of(&self, id: ReminderId) -> ReminderStatus {
        self.reminders.get(id).await.unwrap().unwrap().status
    }

    fn messages(&self) -> Vec<(ReminderId, ReminderMessageType)> {
        self.received_messages.lock().unwrap().clone()
    }
}

fn dt(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[tokio::test]
async fn two_stage_notification_flow() {
    let ctx = TestContext::new(dt(9, 0));
    ctx.create_user(10).await;
    let reminder = ctx.create_reminder(10, dt(10, 0), dt(11, 0)).await;

    ctx.scanner.run_once().await.unwrap();
    assert!(ctx.messages().is_empty());
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Pending);

    ctx.clock.set(dt(10, 5));
    ctx.scanner.run_once().await.unwrap();
    assert_eq!(
        ctx.messages(),
        vec![(reminder.id, ReminderMessageType::Incoming)]
    );
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Incoming);

    ctx.clock.set(dt(11, 10));
    ctx.scanner.run_once().await.unwrap();
    assert_eq!(
        ctx.messages(),
        vec![
            (reminder.id, ReminderMessageType::Incoming),
            (reminder.id, ReminderMessageType::Due)
        ]
    );
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Completed);

    ctx.clock.set(dt(12, 0));
    ctx.scanner.run_once().await.unwrap();
    assert_eq!(ctx.messages().len(), 2);
}

#[tokio::test]
async fn overdue_reminder_completes_in_one_step() {
    let ctx = TestContext::new(dt(12, 0));
    ctx.create_user(10).await;
    let reminder = ctx.create_reminder(10, dt(10, 0), dt(11, 0)).await;

    ctx.scanner.run_once().await.unwrap();

    assert_eq!(ctx.messages(), vec![(reminder.id, ReminderMessageType::Due)]);
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Completed);
}

#[tokio::test]
async fn inactive_user_gets_no_notifications() {
    let ctx = TestContext::new(dt(12, 0));
    ctx.create_user(10).await;
    ctx.deactivate_user(10).await;
    let reminder = ctx.create_reminder(10, dt(10, 0), dt(11, 0)).await;

    ctx.scanner.run_once().await.unwrap();

    assert!(ctx.messages().is_empty());
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Pending);
}

#[tokio::test]
async fn reactivated_user_is_picked_up_on_the_next_tick() {
    let ctx = TestContext::new(dt(10, 5));
    ctx.create_user(10).await;
    ctx.deactivate_user(10).await;
    let reminder = ctx.create_reminder(10, dt(10, 0), dt(11, 0)).await;

    ctx.scanner.run_once().await.unwrap();
    assert!(ctx.messages().is_empty());

    let mut user = ctx.users.get(10).await.unwrap().unwrap();
    user.is_active = true;
    ctx.users.update(user).await.unwrap();

    ctx.scanner.run_once().await.unwrap();
    assert_eq!(
        ctx.messages(),
        vec![(reminder.id, ReminderMessageType::Incoming)]
    );
}

#[tokio::test]
async fn reminder_of_unknown_user_is_skipped() {
    let ctx = TestContext::new(dt(10, 5));
    ctx.create_user(10).await;
    let orphan = ctx.create_reminder(99, dt(10, 0), dt(11, 0)).await;
    let owned = ctx.create_reminder(10, dt(10, 0), dt(11, 0)).await;

    ctx.scanner.run_once().await.unwrap();

    // The orphan row does not stop the pass.
    assert_eq!(
        ctx.messages(),
        vec![(owned.id, ReminderMessageType::Incoming)]
    );
    assert_eq!(ctx.status_of(orphan.id).await, ReminderStatus::Pending);
}

#[tokio::test]
async fn failed_dispatch_is_retried_on_the_next_tick() {
    let ctx = TestContext::new(dt(10, 5));
    ctx.create_user(10).await;
    let reminder = ctx.create_reminder(10, dt(10, 0), dt(11, 0)).await;

    ctx.fail_dispatch.store(true, Ordering::SeqCst);
    ctx.scanner.run_once().await.unwrap();
    assert!(ctx.messages().is_empty());
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Pending);

    ctx.fail_dispatch.store(false, Ordering::SeqCst);
    ctx.scanner.run_once().await.unwrap();
    assert_eq!(
        ctx.messages(),
        vec![(reminder.id, ReminderMessageType::Incoming)]
    );
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Incoming);
}

#[tokio::test]
async fn persistence_failure_leads_to_redelivery() {
    let ctx = TestContext::new(dt(10, 5));
    ctx.create_user(10).await;
    let reminder = ctx.create_reminder(10, dt(10, 0), dt(11, 0)).await;

    ctx.fail_update.store(true, Ordering::SeqCst);
    ctx.scanner.run_once().await.unwrap();

    // Delivered, but the transition was lost.
    assert_eq!(ctx.messages().len(), 1);
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Pending);

    ctx.fail_update.store(false, Ordering::SeqCst);
    ctx.scanner.run_once().await.unwrap();

    // At-least-once: the same pre-alert goes out a second time.
    assert_eq!(
        ctx.messages(),
        vec![
            (reminder.id, ReminderMessageType::Incoming),
            (reminder.id, ReminderMessageType::Incoming)
        ]
    );
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Incoming);
}

#[tokio::test]
async fn completed_reminders_are_left_alone() {
    let ctx = TestContext::new(dt(23, 0));
    ctx.create_user(10).await;
    let reminder = ctx.create_reminder(10, dt(10, 0), dt(11, 0)).await;
    ctx.reminders
        .update_status(reminder.id, ReminderStatus::Completed)
        .await
        .unwrap();

    ctx.scanner.run_once().await.unwrap();

    assert!(ctx.messages().is_empty());
    assert_eq!(ctx.status_of(reminder.id).await, ReminderStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn run_loop_scans_until_cancelled() {
    let ctx = TestContext::new(dt(12, 0));
    ctx.create_user(10).await;
    let reminder = ctx.create_reminder(10, dt(10, 0), dt(11, 0)).await;

    let cancellation = CancellationToken::new();
    let scanner = ctx.scanner.clone();
    let token = cancellation.child_token();
    let handle = tokio::spawn(async move {
        scanner.run(Duration::from_secs(60), token).await;
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancellation.cancel();
    handle.await.unwrap();

    assert_eq!(ctx.messages(), vec![(reminder.id, ReminderMessageType::Due)]);
}
