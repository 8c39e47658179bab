//! The application facade screens talk to.
//!
//! [`Recall`] wires the store, study sessions and reminders together and
//! applies the rules that sit at the UI boundary: starred sets are listed
//! first, blank names and blank cards are rejected before they reach the
//! store, and a reminder is scheduled whenever a session starts.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use recall_config::Config;
use recall_reminder::{Reminder, SchedulerHandle};
use recall_session::{FeedbackTiming, Mode, Session, SwipeDirection};
use recall_store::{Card, CardId, Database, Repository, Set, SetId};
use std::collections::HashSet;

/// A set as shown in a list, with its starred flag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SetEntry {
    pub set: Set,
    pub starred: bool,
}

/// Order sets with starred ones first, otherwise keeping the store's order.
pub fn sort_starred_first(sets: Vec<Set>, starred: &HashSet<SetId>) -> Vec<SetEntry> {
    let mut entries = sets
        .into_iter()
        .map(|set| SetEntry { starred: starred.contains(&set.id), set })
        .collect::<Vec<_>>();
    // Stable sort: ties keep their relative order.
    entries.sort_by_key(|entry| !entry.starred);
    entries
}

fn require(value: &str, message: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        exn::bail!(ErrorKind::Validation(message));
    }
    Ok(())
}

pub struct Recall {
    db: Database,
    repo: Repository,
    reminders: SchedulerHandle,
    config: Config,
}

impl Recall {
    /// Open (creating if needed) the database at the configured path.
    pub async fn open(config: Config, reminders: SchedulerHandle) -> Result<Self> {
        if let Some(parent) = config.database.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Store)?;
        }
        let db = Database::connect(&config.database.path).await.map_err(ErrorKind::store)?;
        Ok(Self::with_database(db, config, reminders))
    }

    /// Open a throwaway in-memory database.
    pub async fn open_in_memory(config: Config, reminders: SchedulerHandle) -> Result<Self> {
        let db = Database::connect_in_memory().await.map_err(ErrorKind::store)?;
        Ok(Self::with_database(db, config, reminders))
    }

    fn with_database(db: Database, config: Config, reminders: SchedulerHandle) -> Self {
        tracing::info!(path = ?db.path(), scheduler = reminders.name(), "Recall ready");
        Self { repo: Repository::from(&db), db, reminders, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A fresh session using the configured feedback timing.
    pub fn new_session(&self) -> Session {
        let feedback = &self.config.study.feedback;
        Session::new(FeedbackTiming::new(feedback.fade(), feedback.hold()))
    }

    /// Classify a released card drag using the configured threshold.
    pub fn classify_swipe(&self, dx: f32) -> Option<SwipeDirection> {
        SwipeDirection::classify(dx, self.config.study.swipe_threshold)
    }

    // =========================================================================
    // Sets
    // =========================================================================

    /// All sets, starred first.
    pub async fn sets(&self) -> Result<Vec<SetEntry>> {
        let starred = self.repo.get_starred_sets().await.map_err(ErrorKind::store)?;
        let sets = self.repo.list_sets().await.map_err(ErrorKind::store)?;
        Ok(sort_starred_first(sets, &starred))
    }

    pub async fn set(&self, set_id: SetId) -> Result<Option<Set>> {
        self.repo.get_set(set_id).await.map_err(ErrorKind::store)
    }

    /// Create a set; fails with [`ErrorKind::DuplicateName`] if the name is taken.
    pub async fn create_set(&self, name: &str, category: &str) -> Result<SetId> {
        require(name, "please enter a name for the set")?;
        let (set_id, _) = self.repo.create_set(name, category).await.map_err(ErrorKind::store)?;
        tracing::info!(%set_id, name, "Set created");
        Ok(set_id)
    }

    /// Rename a set; fails with [`ErrorKind::DuplicateName`] if the name is taken.
    pub async fn rename_set(&self, set_id: SetId, name: &str, category: &str) -> Result<()> {
        require(name, "please enter a name for the set")?;
        self.repo.update_set(set_id, name, category).await.map_err(ErrorKind::store)?;
        Ok(())
    }

    /// Delete a set with its cards. Confirmation is the caller's job.
    pub async fn delete_set(&self, set_id: SetId) -> Result<()> {
        self.repo.delete_set(set_id).await.map_err(ErrorKind::store)?;
        tracing::info!(%set_id, "Set deleted");
        Ok(())
    }

    /// Flip the starred state of a set, returning the new state.
    pub async fn toggle_star(&self, set_id: SetId) -> Result<bool> {
        let starred = !self.repo.get_starred_sets().await.map_err(ErrorKind::store)?.contains(&set_id);
        self.repo.toggle_starred(set_id, starred).await.map_err(ErrorKind::store)?;
        Ok(starred)
    }

    // =========================================================================
    // Cards
    // =========================================================================

    pub async fn cards(&self, set_id: SetId) -> Result<Vec<Card>> {
        self.repo.list_cards(set_id).await.map_err(ErrorKind::store)
    }

    pub async fn card(&self, card_id: CardId) -> Result<Option<Card>> {
        let cards = self.repo.get_card_by_id(card_id).await.map_err(ErrorKind::store)?;
        Ok(cards.into_iter().next())
    }

    /// Save a new card into `set_id`, or update the card being edited.
    ///
    /// Both question and answer must be non-blank. Editing a card that no
    /// longer exists is silently ignored.
    pub async fn save_card(&self, set_id: SetId, editing: Option<CardId>, question: &str, answer: &str) -> Result<()> {
        require(question, "please enter a question and answer")?;
        require(answer, "please enter a question and answer")?;
        match editing {
            Some(card_id) => {
                let updated = self.repo.update_card(card_id, question, answer).await.map_err(ErrorKind::store)?;
                if !updated {
                    tracing::debug!(%card_id, "Edited card no longer exists");
                }
            },
            None => {
                self.repo.create_card(question, answer, set_id).await.map_err(ErrorKind::store)?;
            },
        }
        Ok(())
    }

    pub async fn delete_card(&self, card_id: CardId) -> Result<bool> {
        self.repo.delete_card(card_id).await.map_err(ErrorKind::store)
    }

    // =========================================================================
    // Study
    // =========================================================================

    /// Load the cards of `set_id` into `session` in the chosen mode, and
    /// schedule a reminder to come back.
    ///
    /// Only loading the cards can fail. Reminder failures are logged and
    /// otherwise ignored; they are never retried.
    pub async fn start_session(&self, session: &mut Session, set_id: SetId, mode: Mode) -> Result<()> {
        let cards = self.cards(set_id).await?;
        session.choose(mode, cards);
        self.schedule_reminder().await;
        Ok(())
    }

    async fn schedule_reminder(&self) {
        let config = &self.config.reminder;
        if !config.enabled {
            return;
        }
        let reminder = Reminder::new(&config.title, &config.body, config.delay());
        match self.reminders.schedule(&reminder).await {
            Ok(scheduled) => tracing::debug!(due_at = ?scheduled.due_at, "Study reminder scheduled"),
            Err(err) => tracing::warn!(error = ?err, "Could not schedule study reminder"),
        }
    }

    /// Whether notification permission has been granted.
    pub async fn notifications_enabled(&self) -> Result<bool> {
        let permission = self.reminders.permission().await.or_raise(|| ErrorKind::Reminder)?;
        Ok(permission.is_granted())
    }

    /// Ask for notification permission; returns whether it was granted.
    pub async fn enable_notifications(&self) -> Result<bool> {
        let permission = self.reminders.request_permission().await.or_raise(|| ErrorKind::Reminder)?;
        tracing::info!(%permission, "Notification permission requested");
        Ok(permission.is_granted())
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_reminder::{MockScheduler, Permission};
    use recall_session::{Phase, Verdict};
    use rstest::rstest;
    use std::sync::Arc;
    use std::time::Duration;

    async fn app_with(scheduler: Arc<MockScheduler>, config: Config) -> Recall {
        Recall::open_in_memory(config, scheduler).await.unwrap()
    }

    async fn app() -> (Recall, Arc<MockScheduler>) {
        let scheduler = Arc::new(MockScheduler::default());
        (app_with(scheduler.clone(), Config::default()).await, scheduler)
    }

    fn set(id: i64, name: &str) -> Set {
        Set { id: SetId::from(id), name: name.to_string(), category: String::new() }
    }

    #[test]
    fn test_sort_starred_first_is_stable() {
        let sets = vec![set(1, "a"), set(2, "b"), set(3, "c"), set(4, "d")];
        let starred = HashSet::from([SetId::from(3), SetId::from(2)]);
        let names = sort_starred_first(sets, &starred).into_iter().map(|e| e.set.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["b", "c", "a", "d"]);
    }

    #[tokio::test]
    async fn test_sets_are_listed_starred_first() {
        let (app, _) = app().await;
        app.create_set("Biology", "Science").await.unwrap();
        let history = app.create_set("History", "Humanities").await.unwrap();
        assert!(app.toggle_star(history).await.unwrap());
        let entries = app.sets().await.unwrap();
        assert_eq!(entries[0].set.name, "History");
        assert!(entries[0].starred);
        assert!(!entries[1].starred);

        assert!(!app.toggle_star(history).await.unwrap());
        assert_eq!(app.sets().await.unwrap()[0].set.name, "Biology");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn test_blank_set_name_is_rejected(#[case] name: &str) {
        let (app, _) = app().await;
        let err = app.create_set(name, "Science").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
        assert!(app.sets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_set_name() {
        let (app, _) = app().await;
        app.create_set("Biology", "Science").await.unwrap();
        let err = app.create_set("Biology", "Science").await.unwrap_err();
        assert_eq!(*err, ErrorKind::DuplicateName);

        let other = app.create_set("History", "Humanities").await.unwrap();
        let err = app.rename_set(other, "Biology", "Science").await.unwrap_err();
        assert_eq!(*err, ErrorKind::DuplicateName);
        assert_eq!(app.set(other).await.unwrap().unwrap().name, "History");
    }

    #[tokio::test]
    async fn test_save_card_creates_then_edits() {
        let (app, _) = app().await;
        let set_id = app.create_set("Biology", "Science").await.unwrap();
        app.save_card(set_id, None, "What is DNA?", "Deoxyribonucleic acid").await.unwrap();
        let card = app.cards(set_id).await.unwrap().remove(0);

        app.save_card(set_id, Some(card.id), "What is DNA?", "A nucleic acid").await.unwrap();
        let edited = app.card(card.id).await.unwrap().unwrap();
        assert_eq!(edited.answer, "A nucleic acid");
        assert_eq!(app.cards(set_id).await.unwrap().len(), 1);

        assert!(app.delete_card(card.id).await.unwrap());
        assert!(app.card(card.id).await.unwrap().is_none());
    }

    #[rstest]
    #[case("", "answer")]
    #[case("question", " ")]
    #[tokio::test]
    async fn test_blank_card_is_rejected(#[case] question: &str, #[case] answer: &str) {
        let (app, _) = app().await;
        let set_id = app.create_set("Biology", "Science").await.unwrap();
        let err = app.save_card(set_id, None, question, answer).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
        assert!(app.cards(set_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_study_session_schedules_reminder() {
        let (app, scheduler) = app().await;
        let set_id = app.create_set("Biology", "Science").await.unwrap();
        app.save_card(set_id, None, "What is DNA?", "Deoxyribonucleic Acid").await.unwrap();

        let mut session = app.new_session();
        app.start_session(&mut session, set_id, Mode::QuestionAnswer).await.unwrap();
        assert_eq!(session.phase(), Phase::Studying);
        let verdict = session.submit_answer("deoxyribonucleic acid").unwrap();
        assert_eq!(verdict, Verdict::Correct { advance_after: Duration::from_millis(2000) });
        assert_eq!(session.tally().question_answer, 1);

        let scheduled = scheduler.scheduled().await;
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].reminder.delay, Duration::from_secs(7200));
        assert_eq!(scheduled[0].reminder.body, "Do you want to continue learning?");
    }

    #[tokio::test]
    async fn test_reminder_failure_does_not_stop_the_session() {
        let scheduler = Arc::new(MockScheduler::unavailable());
        let app = app_with(scheduler, Config::default()).await;
        let set_id = app.create_set("Biology", "Science").await.unwrap();
        let mut session = app.new_session();
        app.start_session(&mut session, set_id, Mode::Cards).await.unwrap();
        assert_eq!(session.phase(), Phase::NoCards);
    }

    #[tokio::test]
    async fn test_disabled_reminders() {
        let scheduler = Arc::new(MockScheduler::default());
        let mut config = Config::default();
        config.reminder.enabled = false;
        let app = app_with(scheduler.clone(), config).await;
        let set_id = app.create_set("Biology", "Science").await.unwrap();
        app.start_session(&mut app.new_session(), set_id, Mode::Cards).await.unwrap();
        assert!(scheduler.scheduled().await.is_empty());
    }

    #[tokio::test]
    async fn test_notification_permission() {
        let scheduler = Arc::new(MockScheduler::with_permission(Permission::Undetermined));
        let app = app_with(scheduler, Config::default()).await;
        assert!(!app.notifications_enabled().await.unwrap());
        assert!(app.enable_notifications().await.unwrap());
        assert!(app.notifications_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_new_session_uses_configured_timing() {
        let mut config = Config::default();
        config.study.feedback.fade_ms = 100;
        config.study.feedback.hold_ms = 300;
        let app = app_with(Arc::new(MockScheduler::default()), config).await;
        let session = app.new_session();
        assert_eq!(session.timing().total(), Duration::from_millis(500));
        assert_eq!(session.phase(), Phase::ModeSelection);
    }

    #[tokio::test]
    async fn test_swipe_threshold_from_config() {
        let mut config = Config::default();
        config.study.swipe_threshold = 40.0;
        let app = app_with(Arc::new(MockScheduler::default()), config).await;
        assert_eq!(app.classify_swipe(50.0), Some(SwipeDirection::Right));
        assert_eq!(app.classify_swipe(-30.0), None);
    }

    #[tokio::test]
    async fn test_delete_set_removes_cards() {
        let (app, _) = app().await;
        let set_id = app.create_set("Biology", "Science").await.unwrap();
        app.save_card(set_id, None, "What is DNA?", "Deoxyribonucleic acid").await.unwrap();
        app.toggle_star(set_id).await.unwrap();
        app.delete_set(set_id).await.unwrap();
        assert!(app.cards(set_id).await.unwrap().is_empty());
        assert!(app.sets().await.unwrap().is_empty());
        // Deleting again is fine.
        app.delete_set(set_id).await.unwrap();
        app.close().await;
    }
}
