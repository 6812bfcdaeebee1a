//! Task DTOs.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Baixa",
            TaskPriority::Medium => "Média",
            TaskPriority::High => "Alta",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contract_id: Option<i64>,
    #[serde(default)]
    pub assignee_id: Option<i64>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Open task whose due date is before `today`.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|d| d < today)
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Local::now().date_naive())
    }
}

/// DTO for creating or replacing a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub contract_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(due: Option<NaiveDate>, completed: bool) -> Task {
        Task {
            id: 1,
            title: "Vistoria".to_string(),
            description: None,
            contract_id: None,
            assignee_id: None,
            assignee_name: None,
            due_date: due,
            priority: TaskPriority::High,
            completed,
            completed_at: None,
        }
    }

    #[test]
    fn test_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();

        assert!(task(Some(yesterday), false).is_overdue_on(today));
        assert!(!task(Some(yesterday), true).is_overdue_on(today));
        assert!(!task(Some(today), false).is_overdue_on(today));
        assert!(!task(None, false).is_overdue_on(today));
    }
}
