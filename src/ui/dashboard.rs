//! Dashboard panel with stats, module cards, quick actions, and activity log.

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{
    BUILDINGS, CHECK_SQUARE, CLIPBOARD_TEXT, CLOCK_COUNTER_CLOCKWISE, FILE_ARROW_UP, FOLDERS, RULER, SHIELD_CHECK,
    STACK, USERS,
};

use super::app::{App, LogLevel, Panel};
use super::catalog_panel::CatalogTab;
use super::components::dashboard_card;
use super::tasks_panel::{self, TaskForm};
use crate::models::contract::ContractStatus;
use crate::permissions::AdminModule;

const CARDS_PER_ROW: usize = 4;

fn module_icon(module: AdminModule) -> &'static str {
    match module {
        AdminModule::Contracts => CLIPBOARD_TEXT,
        AdminModule::Companies => BUILDINGS,
        AdminModule::Users => USERS,
        AdminModule::Roles => SHIELD_CHECK,
        AdminModule::MeasurementUnits => RULER,
        AdminModule::ApprovalLevels => STACK,
        AdminModule::DocumentCategories => FOLDERS,
        AdminModule::Tasks => CHECK_SQUARE,
        AdminModule::AuditLogs => CLOCK_COUNTER_CLOCKWISE,
        AdminModule::Import => FILE_ARROW_UP,
    }
}

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;
    let modules = app.session.as_ref().map(AdminModule::visible_for).unwrap_or_default();
    let user_id = app.session.as_ref().map(|u| u.id);

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        // Header
        ui.label(RichText::new("ConstruSys").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Gestão de Contratos de Obras").size(14.0).weak());

        ui.add_space(30.0);

        // Stat cards row
        ui.horizontal(|ui| {
            let available = ui.available_width();
            let start_offset = ((available - 680.0) / 2.0).max(0.0);
            ui.add_space(start_offset);

            stat_card(ui, "Contratos", &app.contracts.len().to_string(), "Cadastrados");
            stat_card(
                ui,
                "Em execução",
                &app.contracts
                    .iter()
                    .filter(|c| c.status == ContractStatus::Active)
                    .count()
                    .to_string(),
                "Contratos ativos",
            );
            stat_card(
                ui,
                "Minhas tarefas",
                &tasks_panel::pending_count(&app.tasks, user_id).to_string(),
                "Pendentes",
            );
            stat_card(
                ui,
                "Atrasadas",
                &app.tasks.iter().filter(|t| t.is_overdue()).count().to_string(),
                "Tarefas vencidas",
            );
        });

        ui.add_space(30.0);

        // Module cards, wrapped into rows
        let available = ui.available_width();
        let num_cards = CARDS_PER_ROW as f32;
        let spacing = 30.0;
        let total_spacing = spacing * (num_cards - 1.0);
        let card_width = ((available - total_spacing) / num_cards).clamp(150.0, 250.0);
        let card_size = egui::vec2(card_width, card_width * 0.6);

        for row in modules.chunks(CARDS_PER_ROW) {
            let row_width = card_width * row.len() as f32 + spacing * (row.len() as f32 - 1.0);
            let start_offset = ((available - row_width) / 2.0).max(0.0);

            ui.horizontal(|ui| {
                ui.add_space(start_offset);
                for (i, module) in row.iter().enumerate() {
                    if i > 0 {
                        ui.add_space(spacing);
                    }
                    if dashboard_card(ui, module.title(), module.description(), module_icon(*module), card_size)
                        .clicked()
                    {
                        if let Some(tab) = CatalogTab::from_module(*module) {
                            app.catalog_ui.tab = tab;
                        }
                        next_panel = Some(Panel::from(*module));
                    }
                }
            });
            ui.add_space(20.0);
        }

        if modules.is_empty() {
            ui.label(RichText::new("Nenhum módulo liberado para o seu perfil.").weak());
        }

        ui.add_space(10.0);
    });

    // Two-column layout: Quick Actions | Recent Activity
    let available_width = ui.available_width();
    let column_width = (available_width - 40.0) / 2.0;

    ui.horizontal(|ui| {
        ui.add_space(10.0);

        // Left column - Quick Actions
        ui.vertical(|ui| {
            ui.set_width(column_width);

            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(Margin::same(15))
                .corner_radius(CornerRadius::same(8))
                .show(ui, |ui| {
                    ui.set_min_width(column_width - 30.0);

                    ui.label(RichText::new("Ações rápidas").strong());
                    ui.add_space(10.0);

                    if modules.contains(&AdminModule::Import) && ui.button("Importar planilha").clicked() {
                        next_panel = Some(Panel::Import);
                    }

                    ui.add_space(5.0);

                    if ui.button("Nova tarefa").clicked() {
                        app.tasks_ui.screen.create(TaskForm {
                            assignee_id: user_id,
                            ..Default::default()
                        });
                        next_panel = Some(Panel::Tasks);
                    }
                });
        });

        ui.add_space(20.0);

        // Right column - Recent Activity
        ui.vertical(|ui| {
            ui.set_width(column_width);

            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(Margin::same(15))
                .corner_radius(CornerRadius::same(8))
                .show(ui, |ui| {
                    ui.set_min_width(column_width - 30.0);

                    ui.label(RichText::new("Atividade recente").strong());
                    ui.add_space(10.0);

                    ScrollArea::vertical().max_height(150.0).show(ui, |ui| {
                        if app.log_messages.is_empty() {
                            ui.label(RichText::new("Nenhuma atividade recente").weak());
                        } else {
                            for entry in app.log_messages.iter().rev().take(10) {
                                let color = match entry.level {
                                    LogLevel::Info => Color32::GRAY,
                                    LogLevel::Success => Color32::from_rgb(100, 200, 100),
                                    LogLevel::Warning => Color32::from_rgb(230, 180, 50),
                                    LogLevel::Error => Color32::from_rgb(230, 100, 100),
                                };

                                ui.horizontal(|ui| {
                                    ui.label(
                                        RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                            .small()
                                            .color(Color32::DARK_GRAY),
                                    );
                                    ui.label(RichText::new(&entry.message).color(color));
                                });
                            }
                        }
                    });
                });
        });
    });

    next_panel
}

/// Render a stat card with title, value, and subtitle.
fn stat_card(ui: &mut Ui, title: &str, value: &str, subtitle: &str) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(150.0);

            ui.vertical(|ui| {
                ui.label(RichText::new(title).small());
                ui.label(RichText::new(value).heading().strong());
                ui.label(RichText::new(subtitle).small().weak());
            });
        });
}
