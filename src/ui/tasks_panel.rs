//! Task list with due dates, assignees and completion.

use chrono::{Local, NaiveDate};
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHECK, PENCIL, PLUS, TRASH};

use super::app::{App, Resource, UiMessage, action_message};
use super::components::{
    action_button, back_button, colors, confirm_buttons, danger_action_button, modal_window, non_empty,
    optional_date, panel_header, primary_button_with_icon, styled_button, styled_button_with_icon,
};
use super::screen_state::{ScreenState, Submission};
use crate::api;
use crate::models::task::{Task, TaskInput, TaskPriority};
use crate::permissions::Permission;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub contract_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
}

impl TaskForm {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            contract_id: task.contract_id,
            assignee_id: task.assignee_id,
            due_date: task.due_date,
            priority: task.priority,
        }
    }

    pub fn to_input(&self) -> Result<TaskInput, String> {
        if self.title.trim().is_empty() {
            return Err("Título da tarefa é obrigatório".to_string());
        }
        Ok(TaskInput {
            title: self.title.trim().to_string(),
            description: non_empty(&self.description),
            contract_id: self.contract_id,
            assignee_id: self.assignee_id,
            due_date: self.due_date,
            priority: self.priority,
        })
    }
}

#[derive(Default)]
pub struct PanelState {
    pub screen: ScreenState<TaskForm>,
    pub show_completed: bool,
    pub only_mine: bool,
}

impl PanelState {
    pub fn matches(&self, task: &Task, user_id: Option<i64>) -> bool {
        if task.completed && !self.show_completed {
            return false;
        }
        !self.only_mine || (user_id.is_some() && task.assignee_id == user_id)
    }
}

/// Open tasks of the signed-in user, used by the dashboard.
pub fn pending_count(tasks: &[Task], user_id: Option<i64>) -> usize {
    tasks
        .iter()
        .filter(|t| !t.completed && (user_id.is_none() || t.assignee_id.is_none() || t.assignee_id == user_id))
        .count()
}

/// Show the tasks panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Tarefas");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Nova tarefa").clicked() {
            app.tasks_ui.screen.create(TaskForm::default());
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Atualizar").clicked() {
            app.reload(Resource::Tasks);
        }

        ui.add_space(20.0);

        ui.checkbox(&mut app.tasks_ui.show_completed, "Exibir concluídas");
        ui.checkbox(&mut app.tasks_ui.only_mine, "Somente minhas");
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if !app.tasks_ui.screen.is_idle() {
        show_modal(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let user_id = app.session.as_ref().map(|s| s.id);
    let can_manage = app.can(Permission::TasksManage);
    let today = Local::now().date_naive();

    let filtered: Vec<&Task> = app
        .tasks
        .iter()
        .filter(|t| app.tasks_ui.matches(t, user_id))
        .collect();

    ui.label(format!("Exibindo {} de {} tarefas", filtered.len(), app.tasks.len()));
    ui.add_space(10.0);

    let mut next_state = None;
    let mut complete_id = None;

    ScrollArea::vertical().id_salt("tasks_scroll").show(ui, |ui| {
        egui::Grid::new("tasks_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Tarefa");
                ui.strong("Contrato");
                ui.strong("Responsável");
                ui.strong("Prazo");
                ui.strong("Prioridade");
                ui.strong("Ações");
                ui.end_row();

                for task in filtered {
                    let title = RichText::new(&task.title);
                    ui.label(if task.completed { title.strikethrough().weak() } else { title });

                    ui.label(
                        task.contract_id
                            .and_then(|id| app.contracts.iter().find(|c| c.id == id))
                            .map(|c| c.number.as_str())
                            .unwrap_or("-"),
                    );
                    ui.label(task.assignee_name.as_deref().unwrap_or("-"));

                    let due = task.due_date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or("-".to_string());
                    if task.is_overdue_on(today) {
                        ui.colored_label(colors::ERROR, format!("{due} (atrasada)"));
                    } else {
                        ui.label(due);
                    }

                    let priority_color = match task.priority {
                        TaskPriority::High => colors::ERROR,
                        TaskPriority::Medium => colors::WARNING,
                        TaskPriority::Low => colors::NEUTRAL,
                    };
                    ui.colored_label(priority_color, task.priority.label());

                    ui.horizontal(|ui| {
                        if !task.completed && action_button(ui, CHECK, "Concluir").clicked() {
                            complete_id = Some(task.id);
                        }
                        if can_manage {
                            ui.add_space(4.0);
                            if action_button(ui, PENCIL, "Editar").clicked() {
                                next_state = Some(ScreenState::Editing {
                                    id: task.id,
                                    form: TaskForm::from_task(task),
                                });
                            }
                            ui.add_space(4.0);
                            if danger_action_button(ui, TRASH, "Excluir").clicked() {
                                next_state = Some(ScreenState::ConfirmingDelete {
                                    id: task.id,
                                    label: task.title.clone(),
                                });
                            }
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(state) = next_state {
        app.tasks_ui.screen = state;
    }
    if let Some(id) = complete_id {
        let client = app.client.clone();
        app.spawn(async move {
            action_message(api::tasks::complete(&client, id).await, |t| UiMessage::Saved {
                resource: Resource::Tasks,
                message: format!("Tarefa '{}' concluída", t.title),
            })
        });
    }
}

fn show_modal(app: &mut App, ctx: &egui::Context) {
    if let ScreenState::ConfirmingDelete { label, .. } = &app.tasks_ui.screen {
        let label = label.clone();
        modal_window("Excluir tarefa").show(ctx, |ui| {
            ui.label(format!("Excluir a tarefa '{label}'?"));
            ui.add_space(10.0);
            match confirm_buttons(ui, "Excluir") {
                Some(true) => submit(app),
                Some(false) => app.tasks_ui.screen.close(),
                None => {}
            }
        });
        return;
    }

    let title = if app.tasks_ui.screen.is_editing() {
        "Editar tarefa"
    } else {
        "Nova tarefa"
    };

    modal_window(title).default_width(460.0).show(ctx, |ui| {
        let contracts = &app.contracts;
        let users = &app.users;
        let Some(form) = app.tasks_ui.screen.form_mut() else {
            return;
        };

        ui.add_space(10.0);
        egui::Grid::new("task_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Título:");
                ui.add(egui::TextEdit::singleline(&mut form.title).desired_width(280.0));
                ui.end_row();

                ui.label("Descrição:");
                ui.add(
                    egui::TextEdit::multiline(&mut form.description)
                        .desired_width(280.0)
                        .desired_rows(3),
                );
                ui.end_row();

                ui.label("Contrato:");
                egui::ComboBox::from_id_salt("task_form_contract")
                    .width(280.0)
                    .selected_text(
                        form.contract_id
                            .and_then(|id| contracts.iter().find(|c| c.id == id))
                            .map(|c| format!("{} - {}", c.number, c.title))
                            .unwrap_or("Nenhum".to_string()),
                    )
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(form.contract_id.is_none(), "Nenhum").clicked() {
                            form.contract_id = None;
                        }
                        for contract in contracts {
                            let label = format!("{} - {}", contract.number, contract.title);
                            if ui
                                .selectable_label(form.contract_id == Some(contract.id), label)
                                .clicked()
                            {
                                form.contract_id = Some(contract.id);
                            }
                        }
                    });
                ui.end_row();

                ui.label("Responsável:");
                egui::ComboBox::from_id_salt("task_form_assignee")
                    .width(280.0)
                    .selected_text(
                        form.assignee_id
                            .and_then(|id| users.iter().find(|u| u.id == id))
                            .map(|u| u.name.as_str())
                            .unwrap_or("Ninguém"),
                    )
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(form.assignee_id.is_none(), "Ninguém").clicked() {
                            form.assignee_id = None;
                        }
                        for user in users.iter().filter(|u| u.active) {
                            if ui
                                .selectable_label(form.assignee_id == Some(user.id), &user.name)
                                .clicked()
                            {
                                form.assignee_id = Some(user.id);
                            }
                        }
                    });
                ui.end_row();

                ui.label("Prazo:");
                optional_date(ui, "task_due_date", &mut form.due_date);
                ui.end_row();

                ui.label("Prioridade:");
                ui.horizontal(|ui| {
                    for priority in TaskPriority::ALL {
                        ui.selectable_value(&mut form.priority, priority, priority.label());
                    }
                });
                ui.end_row();
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if styled_button(ui, "Cancelar").clicked() {
                app.tasks_ui.screen.close();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if primary_button_with_icon(ui, "", "Salvar").clicked() {
                    submit(app);
                }
            });
        });
    });
}

fn submit(app: &mut App) {
    let Some(submission) = app.tasks_ui.screen.submission() else {
        return;
    };

    let client = app.client.clone();
    match submission {
        Submission::Create(form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::tasks::create(&client, &data).await, |t| UiMessage::Saved {
                    resource: Resource::Tasks,
                    message: format!("Tarefa '{}' criada", t.title),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Update(id, form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::tasks::update(&client, id, &data).await, |t| UiMessage::Saved {
                    resource: Resource::Tasks,
                    message: format!("Tarefa '{}' atualizada", t.title),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Delete(id) => app.spawn(async move {
            action_message(api::tasks::delete(&client, id).await, |_| UiMessage::Deleted {
                resource: Resource::Tasks,
                message: "Tarefa excluída".to_string(),
            })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, assignee: Option<i64>, completed: bool) -> Task {
        Task {
            id,
            title: format!("Tarefa {id}"),
            description: None,
            contract_id: None,
            assignee_id: assignee,
            assignee_name: None,
            due_date: None,
            priority: TaskPriority::Medium,
            completed,
            completed_at: None,
        }
    }

    #[test]
    fn test_filters() {
        let mut state = PanelState::default();
        let open = task(1, Some(7), false);
        let done = task(2, Some(7), true);
        let other = task(3, Some(8), false);

        assert!(state.matches(&open, Some(7)));
        assert!(!state.matches(&done, Some(7)));

        state.show_completed = true;
        assert!(state.matches(&done, Some(7)));

        state.only_mine = true;
        assert!(!state.matches(&other, Some(7)));
        assert!(!state.matches(&open, None));
    }

    #[test]
    fn test_pending_count_includes_unassigned() {
        let tasks = vec![
            task(1, Some(7), false),
            task(2, None, false),
            task(3, Some(8), false),
            task(4, Some(7), true),
        ];
        assert_eq!(pending_count(&tasks, Some(7)), 2);
        assert_eq!(pending_count(&tasks, None), 3);
    }

    #[test]
    fn test_form_requires_title() {
        assert!(TaskForm::default().to_input().is_err());
        let form = TaskForm {
            title: "Vistoria".to_string(),
            priority: TaskPriority::High,
            ..Default::default()
        };
        assert_eq!(form.to_input().unwrap().priority, TaskPriority::High);
    }
}
