//! Audit log viewer with server-side filters and paging.

use chrono::Local;
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CARET_LEFT, CARET_RIGHT, FILE_XLS, FUNNEL};

use super::app::{App, Resource};
use super::components::{back_button, non_empty, panel_header, styled_button, styled_button_with_icon};
use crate::export::{export_audit_logs_to_excel, generate_export_filename, show_save_dialog};
use crate::models::audit::AuditQuery;
use crate::permissions::Permission;

/// Common action values offered as shortcuts in the filter.
const ACTIONS: [&str; 4] = ["create", "update", "delete", "login"];

pub struct PanelState {
    pub entity: String,
    pub action: String,
    pub page: u32,
    pub page_size: u32,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::with_page_size(AuditQuery::default().page_size)
    }
}

impl PanelState {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            entity: String::new(),
            action: String::new(),
            page: 1,
            page_size,
        }
    }

    /// Query for the current filters and page.
    pub fn query(&self) -> AuditQuery {
        AuditQuery {
            entity: non_empty(&self.entity),
            action: non_empty(&self.action),
            page: self.page.max(1),
            page_size: self.page_size,
        }
    }

    /// Move to `page`, clamped to `1..=total_pages`. Returns whether it changed.
    pub fn go_to(&mut self, page: u32, total_pages: u32) -> bool {
        let target = page.clamp(1, total_pages.max(1));
        let changed = target != self.page;
        self.page = target;
        changed
    }
}

/// Show the audit panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Auditoria");

    if !app.can(Permission::AuditLogsView) {
        ui.label("Você não tem permissão para consultar a auditoria.");
        return go_back;
    }

    let mut reload = false;

    ui.horizontal(|ui| {
        ui.label("Entidade:");
        ui.add(
            egui::TextEdit::singleline(&mut app.audit_ui.entity)
                .desired_width(140.0)
                .hint_text("contract, user..."),
        );

        ui.add_space(10.0);

        ui.label("Ação:");
        egui::ComboBox::from_id_salt("audit_action_filter")
            .width(120.0)
            .selected_text(if app.audit_ui.action.is_empty() {
                "Todas"
            } else {
                app.audit_ui.action.as_str()
            })
            .show_ui(ui, |ui| {
                if ui.selectable_label(app.audit_ui.action.is_empty(), "Todas").clicked() {
                    app.audit_ui.action.clear();
                }
                for action in ACTIONS {
                    if ui.selectable_label(app.audit_ui.action == action, action).clicked() {
                        app.audit_ui.action = action.to_string();
                    }
                }
            });

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FUNNEL, "Filtrar").clicked() {
            app.audit_ui.page = 1;
            reload = true;
        }
        if styled_button(ui, "Limpar").clicked() {
            app.audit_ui.entity.clear();
            app.audit_ui.action.clear();
            app.audit_ui.page = 1;
            reload = true;
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Atualizar").clicked() {
            reload = true;
        }
        if styled_button_with_icon(ui, FILE_XLS, "Exportar página").clicked() {
            export(app);
        }
    });

    ui.add_space(10.0);

    let total_pages = app.audit.total_pages();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(app.audit_ui.page > 1, egui::Button::new(CARET_LEFT))
            .clicked()
            && app.audit_ui.go_to(app.audit_ui.page - 1, total_pages)
        {
            reload = true;
        }
        ui.label(format!(
            "Página {} de {} ({} registros)",
            app.audit_ui.page, total_pages, app.audit.total
        ));
        if ui
            .add_enabled(app.audit_ui.page < total_pages, egui::Button::new(CARET_RIGHT))
            .clicked()
            && app.audit_ui.go_to(app.audit_ui.page + 1, total_pages)
        {
            reload = true;
        }
    });

    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("audit_scroll").show(ui, |ui| {
        egui::Grid::new("audit_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.strong("Data/Hora");
                ui.strong("Usuário");
                ui.strong("Ação");
                ui.strong("Entidade");
                ui.strong("Detalhes");
                ui.strong("IP");
                ui.end_row();

                for log in &app.audit.items {
                    ui.label(
                        log.created_at
                            .with_timezone(&Local)
                            .format("%d/%m/%Y %H:%M:%S")
                            .to_string(),
                    );
                    ui.label(log.user_name.as_deref().unwrap_or("Sistema"));
                    ui.label(&log.action);
                    match log.entity_id {
                        Some(id) => ui.label(format!("{} #{id}", log.entity)),
                        None => ui.label(&log.entity),
                    };
                    ui.label(RichText::new(log.details_summary()).small());
                    ui.label(log.ip_address.as_deref().unwrap_or("-"));
                    ui.end_row();
                }
            });

        if app.audit.items.is_empty() {
            ui.add_space(10.0);
            ui.label(RichText::new("Nenhum registro encontrado").weak());
        }
    });

    if reload {
        app.reload(Resource::AuditLogs);
    }

    go_back
}

fn export(app: &mut App) {
    if app.audit.items.is_empty() {
        app.error_message = Some("Nenhum registro para exportar".to_string());
        return;
    }

    let Some(path) = show_save_dialog(&generate_export_filename("auditoria")) else {
        return;
    };

    match export_audit_logs_to_excel(&app.audit.items, &path) {
        Ok(()) => {
            tracing::info!("Exported {} audit entries to {}", app.audit.items.len(), path.display());
            let message = format!("Auditoria exportada para {}", path.display());
            app.log_success(message.clone());
            app.success_message = Some(message);
        }
        Err(e) => {
            tracing::error!("Audit export failed: {}", e);
            app.log_error(format!("Falha na exportação: {e}"));
            app.error_message = Some("Falha ao exportar auditoria".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_skips_blank_filters() {
        let mut state = PanelState::with_page_size(25);
        state.entity = "  ".to_string();
        state.action = "delete".to_string();

        let query = state.query();
        assert_eq!(query.entity, None);
        assert_eq!(query.action.as_deref(), Some("delete"));
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 25);
    }

    #[test]
    fn test_go_to_clamps() {
        let mut state = PanelState::default();
        assert!(state.go_to(3, 5));
        assert_eq!(state.page, 3);
        assert!(state.go_to(9, 5));
        assert_eq!(state.page, 5);
        assert!(!state.go_to(5, 5));
        assert!(state.go_to(0, 5));
        assert_eq!(state.page, 1);
        assert!(!state.go_to(2, 0));
    }
}
