//! Integration tests for Habitual
//!
//! These tests verify end-to-end functionality against a file-backed
//! database, including:
//! - Habit check-ins and streaks
//! - Goal progress and rewards
//! - Daily goal logs
//! - Reminder delivery and missed-day notices

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveTime};
use habitual::database::{
    create_pool, CreateDailyGoalRequest, CreateGoalRequest, CreateHabitRequest, GoalType,
    Repository,
};
use habitual::error::Result;
use habitual::services::daily_goals::LogDayRequest;
use habitual::services::{
    AccountabilityService, DailyGoalsService, GoalsService, HabitsService, Notification,
    Notifier, RemindersService,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Helper to create a test database with schema
async fn create_test_db() -> (Repository, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let pool = create_pool(&db_path).await.unwrap();
    let repo = Repository::new(pool);

    (repo, temp_dir)
}

#[derive(Default, Clone)]
struct CollectingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

#[async_trait]
impl Notifier for CollectingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn habit_request(title: &str) -> CreateHabitRequest {
    CreateHabitRequest {
        title: title.to_string(),
        description: String::new(),
        category: None,
        color: None,
        preferred_time: None,
    }
}

#[tokio::test]
async fn test_read_20_pages_check_in() {
    let (repo, _temp) = create_test_db().await;
    let habits = HabitsService::new(repo);

    let habit = habits.add_habit(habit_request("Read 20 pages")).await.unwrap();
    assert_eq!(habit.streak, 0);

    let checked = habits.toggle_habit(&habit.id, false).await.unwrap();
    assert!(checked.completed_today);
    assert_eq!(checked.habit.streak, 1);

    let unchecked = habits.toggle_habit(&habit.id, true).await.unwrap();
    assert!(!unchecked.completed_today);
    assert_eq!(unchecked.habit.streak, 0);

    assert!(habits.completion_history(&habit.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_streak_never_negative() {
    let (repo, _temp) = create_test_db().await;
    let habits = HabitsService::new(repo);
    let habit = habits.add_habit(habit_request("Floss")).await.unwrap();

    for _ in 0..3 {
        let result = habits.toggle_habit(&habit.id, true).await.unwrap();
        assert!(!result.completed_today);
        assert_eq!(result.habit.streak, 0);
    }

    // A stale "not completed" after a real check-in does not double count
    habits.toggle_habit(&habit.id, false).await.unwrap();
    let again = habits.toggle_habit(&habit.id, false).await.unwrap();
    assert!(again.completed_today);
    assert_eq!(again.habit.streak, 1);
    assert_eq!(habits.completion_history(&habit.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_habit_removes_history_and_reminder() {
    let (repo, _temp) = create_test_db().await;
    let habits = HabitsService::new(repo.clone());
    let habit = habits.add_habit(habit_request("Journal")).await.unwrap();

    habits.toggle_habit(&habit.id, false).await.unwrap();
    habits
        .update_reminder(&habit.id, true, Some("20:00".to_string()))
        .await
        .unwrap();
    assert_eq!(repo.list_reminders().await.unwrap().len(), 1);

    habits.delete_habit(&habit.id).await.unwrap();

    assert!(repo.list_completions(&habit.id).await.unwrap().is_empty());
    assert!(repo.list_reminders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_goal_reward_awarded_once() {
    let (repo, _temp) = create_test_db().await;
    let goals = GoalsService::new(repo);

    let goal = goals
        .add_goal(CreateGoalRequest {
            title: "Run 5 times".to_string(),
            description: String::new(),
            goal_type: GoalType::Weekly,
            target_count: 5,
            reward_points: 600,
            category: Some("fitness".to_string()),
            start_date: None,
        })
        .await
        .unwrap();
    assert_eq!(goal.current_count, 0);
    assert!(goal.end_date > goal.start_date);

    for _ in 0..4 {
        let progress = goals.update_goal_progress(&goal.id, 1).await.unwrap();
        assert!(!progress.goal.is_completed);
    }

    let done = goals.update_goal_progress(&goal.id, 1).await.unwrap();
    assert!(done.newly_completed);
    assert!(done.goal.completed_at.is_some());
    assert_eq!(done.profile.total_points, 600);
    assert_eq!(done.profile.level, 1);

    let more = goals.update_goal_progress(&goal.id, 2).await.unwrap();
    assert!(!more.newly_completed);
    assert_eq!(more.profile.total_points, 600);

    // Completion is sticky
    let back = goals.update_goal_progress(&goal.id, -10).await.unwrap();
    assert!(back.goal.is_completed);
    assert_eq!(back.goal.current_count, 0);
    assert_eq!(goals.get_profile().await.unwrap().total_points, 600);
}

#[tokio::test]
async fn test_points_raise_level() {
    let (repo, _temp) = create_test_db().await;
    let goals = GoalsService::new(repo);

    for title in ["A", "B"] {
        let goal = goals
            .add_goal(CreateGoalRequest {
                title: title.to_string(),
                description: String::new(),
                goal_type: GoalType::Monthly,
                target_count: 1,
                reward_points: 700,
                category: None,
                start_date: None,
            })
            .await
            .unwrap();
        goals.update_goal_progress(&goal.id, 1).await.unwrap();
    }

    let profile = goals.get_profile().await.unwrap();
    assert_eq!(profile.total_points, 1400);
    assert_eq!(profile.level, 2);
}

#[tokio::test]
async fn test_daily_goal_log_flow() {
    let (repo, _temp) = create_test_db().await;
    let daily = DailyGoalsService::new(repo);
    let today = Local::now().date_naive();

    let goal = daily
        .create_daily_goal(CreateDailyGoalRequest {
            title: "Drink water".to_string(),
            description: String::new(),
            target_value: Some(2.0),
            unit: Some("l".to_string()),
        })
        .await
        .unwrap();

    for (back, succeeded) in [(4, true), (3, false), (2, true), (1, true)] {
        daily
            .log_day(
                &goal.id,
                LogDayRequest {
                    log_date: Some(today - Duration::days(back)),
                    succeeded,
                    notes: None,
                    actual_value: None,
                },
            )
            .await
            .unwrap();
    }

    let goal = daily.get_daily_goal(&goal.id).await.unwrap();
    assert_eq!(goal.current_streak, 2);
    assert_eq!(goal.longest_streak, 2);
    assert_eq!(daily.list_logs(&goal.id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_habit_reminder_delivery() {
    let (repo, _temp) = create_test_db().await;
    let habits = HabitsService::new(repo.clone());
    let notifier = CollectingNotifier::default();
    let reminders = RemindersService::new(repo, Arc::new(notifier.clone()));

    let habit = habits.add_habit(habit_request("Meditate")).await.unwrap();
    habits
        .update_reminder(&habit.id, true, Some("06:30".to_string()))
        .await
        .unwrap();

    let now = Local::now()
        .date_naive()
        .and_time(NaiveTime::from_hms_opt(7, 0, 0).unwrap());

    assert_eq!(reminders.fire_due(now).await.unwrap(), 1);
    assert_eq!(reminders.fire_due(now).await.unwrap(), 0);

    let sent = notifier.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "Meditate");
    assert_eq!(sent[0].body, "Time for Meditate");
}

#[tokio::test]
async fn test_missed_day_notice_once_per_day() {
    let temp_dir = TempDir::new().unwrap();
    let pool = create_pool(&temp_dir.path().join("test.db")).await.unwrap();
    let repo = Repository::new(pool.clone());
    let habits = HabitsService::new(repo.clone());
    let notifier = CollectingNotifier::default();
    let accountability = AccountabilityService::new(repo, Arc::new(notifier.clone()));

    let habit = habits.add_habit(habit_request("Walk")).await.unwrap();
    let today = Local::now().date_naive();

    // Last check-in two days ago
    sqlx::query(
        "INSERT INTO habit_completions (id, habit_id, completed_on, completed_at) \
         VALUES ('walk-1', ?, ?, ?)",
    )
    .bind(&habit.id)
    .bind(today - Duration::days(2))
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await
    .unwrap();

    let morning = today.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(accountability.check_missed_days(morning).await.unwrap(), 1);

    let evening = today.and_time(NaiveTime::from_hms_opt(21, 0, 0).unwrap());
    assert_eq!(accountability.check_missed_days(evening).await.unwrap(), 0);

    let sent = notifier.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "You've missed 2 days of Walk");
}
