//! Task endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::task::{Task, TaskInput};

/// List all tasks, open ones first, then by due date.
pub async fn list_all(client: &ApiClient) -> Result<Vec<Task>> {
    let mut tasks: Vec<Task> = client.get("tasks").await?;
    sort_tasks(&mut tasks);
    Ok(tasks)
}

pub async fn create(client: &ApiClient, data: &TaskInput) -> Result<Task> {
    client.post("tasks", data).await
}

pub async fn update(client: &ApiClient, id: i64, data: &TaskInput) -> Result<Task> {
    client.put(&format!("tasks/{id}"), data).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("tasks/{id}")).await
}

/// Mark a task as done.
pub async fn complete(client: &ApiClient, id: i64) -> Result<Task> {
    client.patch(&format!("tasks/{id}/complete")).await
}

/// Open tasks first; within each group, earliest due date first, undated last.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskPriority;
    use chrono::NaiveDate;

    fn task(id: i64, due: Option<(i32, u32, u32)>, completed: bool) -> Task {
        Task {
            id,
            title: format!("Tarefa {id}"),
            description: None,
            contract_id: None,
            assignee_id: None,
            assignee_name: None,
            due_date: due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            priority: TaskPriority::Medium,
            completed,
            completed_at: None,
        }
    }

    #[test]
    fn test_sort_tasks() {
        let mut tasks = vec![
            task(1, None, false),
            task(2, Some((2024, 5, 1)), true),
            task(3, Some((2024, 7, 1)), false),
            task(4, Some((2024, 6, 1)), false),
        ];
        sort_tasks(&mut tasks);
        let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 3, 1, 2]);
    }
}
