//! Resource and task scheduling page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use uidai_portal_metrics::Priority;

/// Number of tasks in the upcoming list.
pub const UPCOMING_LIMIT: usize = 3;

const ID_PREFIX: &str = "SCH-";

/// Lifecycle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum TaskStatus {
    /// Awaiting approval.
    Pending,
    /// Approved.
    Confirmed,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Confirmed, Self::Completed];

    /// The next status, or `None` once completed.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Completed),
            Self::Completed => None,
        }
    }
}

/// A maintenance or infrastructure task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// `SCH-NNN` identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// What the task involves.
    pub description: String,
    /// Scheduled day.
    pub date: NaiveDate,
    /// Priority.
    pub priority: Priority,
    /// Lifecycle status.
    pub status: TaskStatus,
}

/// Priority filter of the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    /// Every task.
    #[default]
    All,
    /// Only tasks of this priority.
    Only(Priority),
}

impl PriorityFilter {
    fn admits(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => task.priority == priority,
        }
    }
}

/// Errors raised by task edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// No task has this id.
    #[error("no task with id '{0}'")]
    UnknownTask(String),

    /// The task is already completed.
    #[error("task '{0}' is already completed")]
    AlreadyCompleted(String),

    /// A new task needs a title.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// Every `SCH-NNN` number is taken.
    #[error("no task ids left")]
    IdsExhausted,
}

fn sample_task(
    id: &str,
    title: &str,
    description: &str,
    (year, month, day): (i32, u32, u32),
    priority: Priority,
    status: TaskStatus,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        priority,
        status,
    }
}

/// Sample schedule the page starts with.
#[must_use]
pub fn initial_tasks() -> Vec<Task> {
    use Priority::{High, Low, Medium};
    use TaskStatus::{Confirmed, Pending};

    vec![
        sample_task(
            "SCH-001",
            "Database Maintenance Window",
            "Perform routine maintenance on primary database cluster including index optimization and log cleanup.",
            (2023, 10, 24),
            High,
            Pending,
        ),
        sample_task(
            "SCH-002",
            "Security Audit - North Region",
            "Quarterly security audit for all North Zone data centers and enrollment facilities.",
            (2023, 10, 26),
            High,
            Confirmed,
        ),
        sample_task(
            "SCH-003",
            "ML Model Retraining",
            "Retrain forecasting models with updated Q3 data for improved prediction accuracy.",
            (2023, 10, 28),
            Medium,
            Pending,
        ),
        sample_task(
            "SCH-004",
            "Server Migration - Phase 2",
            "Migrate legacy authentication servers to new cloud infrastructure.",
            (2023, 10, 30),
            High,
            Pending,
        ),
        sample_task(
            "SCH-005",
            "Backup Verification",
            "Verify integrity of all backup systems and perform test restore procedures.",
            (2023, 11, 1),
            Medium,
            Confirmed,
        ),
        sample_task(
            "SCH-006",
            "API Gateway Update",
            "Deploy new API gateway version with enhanced rate limiting and monitoring.",
            (2023, 11, 3),
            Low,
            Pending,
        ),
    ]
}

/// View-model for the Scheduling page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingView {
    tasks: Vec<Task>,
    filter: PriorityFilter,
}

impl Default for SchedulingView {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulingView {
    /// Starts from the sample schedule with no filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: initial_tasks(),
            filter: PriorityFilter::All,
        }
    }

    /// Every task.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Changes the priority filter.
    pub const fn set_filter(&mut self, filter: PriorityFilter) {
        self.filter = filter;
    }

    /// The active priority filter.
    #[must_use]
    pub const fn filter(&self) -> PriorityFilter {
        self.filter
    }

    /// Tasks admitted by the filter, in schedule order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.filter.admits(t))
            .collect()
    }

    /// The first few filtered tasks that are not completed.
    #[must_use]
    pub fn upcoming(&self) -> Vec<&Task> {
        self.filtered()
            .into_iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .take(UPCOMING_LIMIT)
            .collect()
    }

    /// Number of tasks per status, over all tasks.
    #[must_use]
    pub fn status_counts(&self) -> Vec<(TaskStatus, usize)> {
        TaskStatus::ALL
            .iter()
            .map(|&status| {
                (
                    status,
                    self.tasks.iter().filter(|t| t.status == status).count(),
                )
            })
            .collect()
    }

    /// Tasks scheduled in the seven days starting at `today`. Near the end
    /// of the calendar the window is cut at the last representable day.
    #[must_use]
    pub fn due_within_week(&self, today: NaiveDate) -> usize {
        let end = today.checked_add_days(chrono::Days::new(7));
        self.tasks
            .iter()
            .filter(|t| t.date >= today && end.is_none_or(|end| t.date < end))
            .count()
    }

    fn next_id(&self) -> Result<String, ScheduleError> {
        let next = self
            .tasks
            .iter()
            .filter_map(|t| t.id.strip_prefix(ID_PREFIX)?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(ScheduleError::IdsExhausted)?;
        Ok(format!("{ID_PREFIX}{next:03}"))
    }

    /// Adds a pending task and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::EmptyTitle`] if `title` is blank, or
    /// [`ScheduleError::IdsExhausted`] if no id is left.
    pub fn add_task(
        &mut self,
        title: &str,
        description: &str,
        date: NaiveDate,
        priority: Priority,
    ) -> Result<String, ScheduleError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ScheduleError::EmptyTitle);
        }
        let id = self.next_id()?;
        log::info!("Scheduled {id} '{title}' for {date}");
        self.tasks.push(Task {
            id: id.clone(),
            title: title.to_string(),
            description: description.trim().to_string(),
            date,
            priority,
            status: TaskStatus::Pending,
        });
        Ok(id)
    }

    /// Moves a task one step along Pending, Confirmed, Completed and returns
    /// its new status.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the task does not exist or is already
    /// completed.
    pub fn advance(&mut self, id: &str) -> Result<TaskStatus, ScheduleError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ScheduleError::UnknownTask(id.to_string()))?;
        let next = task
            .status
            .next()
            .ok_or_else(|| ScheduleError::AlreadyCompleted(id.to_string()))?;
        log::debug!("{id}: {} -> {next}", task.status);
        task.status = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sample_schedule() {
        let view = SchedulingView::new();
        assert_eq!(view.tasks().len(), 6);
        assert_eq!(view.tasks()[4].date, date(2023, 11, 1));
        assert_eq!(
            view.status_counts(),
            vec![
                (TaskStatus::Pending, 4),
                (TaskStatus::Confirmed, 2),
                (TaskStatus::Completed, 0),
            ]
        );
    }

    #[test]
    fn filter_and_upcoming() {
        let mut view = SchedulingView::default();
        assert_eq!(ids(&view.upcoming()), vec!["SCH-001", "SCH-002", "SCH-003"]);

        view.set_filter(PriorityFilter::Only(Priority::High));
        assert_eq!(ids(&view.filtered()), vec!["SCH-001", "SCH-002", "SCH-004"]);

        view.advance("SCH-002").unwrap();
        assert_eq!(ids(&view.upcoming()), vec!["SCH-001", "SCH-004"]);

        view.set_filter(PriorityFilter::Only(Priority::Low));
        assert_eq!(ids(&view.upcoming()), vec!["SCH-006"]);
        assert_eq!(view.filter(), PriorityFilter::Only(Priority::Low));
    }

    #[test]
    fn status_advances_to_completed() {
        let mut view = SchedulingView::new();
        assert_eq!(view.advance("SCH-001"), Ok(TaskStatus::Confirmed));
        assert_eq!(view.advance("SCH-001"), Ok(TaskStatus::Completed));
        assert_eq!(
            view.advance("SCH-001"),
            Err(ScheduleError::AlreadyCompleted("SCH-001".to_string()))
        );
        assert_eq!(
            view.advance("SCH-999"),
            Err(ScheduleError::UnknownTask("SCH-999".to_string()))
        );
    }

    #[test]
    fn new_task_gets_next_id() {
        let mut view = SchedulingView::new();
        let id = view
            .add_task("  Load test  ", "Stress the auth tier", date(2023, 11, 5), Priority::Medium)
            .unwrap();
        assert_eq!(id, "SCH-007");
        let task = view.tasks().last().unwrap();
        assert_eq!(task.title, "Load test");
        assert_eq!(task.status, TaskStatus::Pending);

        assert_eq!(
            view.add_task(" ", "", date(2023, 11, 6), Priority::Low),
            Err(ScheduleError::EmptyTitle)
        );
    }

    #[test]
    fn week_window() {
        let view = SchedulingView::new();
        assert_eq!(view.due_within_week(date(2023, 10, 24)), 4);
        assert_eq!(view.due_within_week(date(2023, 12, 1)), 0);
    }

    #[test]
    fn week_window_at_end_of_calendar() {
        let mut view = SchedulingView::new();
        view.add_task("Last day", "", NaiveDate::MAX, Priority::Low)
            .unwrap();
        assert_eq!(view.due_within_week(NaiveDate::MAX), 1);
    }

    #[test]
    fn id_overflow_is_an_error() {
        let mut view = SchedulingView::new();
        view.tasks[0].id = format!("SCH-{}", u32::MAX);
        assert_eq!(
            view.add_task("One more", "", date(2023, 11, 5), Priority::Low),
            Err(ScheduleError::IdsExhausted)
        );
        assert_eq!(view.tasks().len(), 6);
    }
}
