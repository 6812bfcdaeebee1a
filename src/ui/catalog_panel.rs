//! Reference data: approval levels, measurement units, document categories.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, Resource, UiMessage, action_message};
use super::components::{
    action_button, back_button, confirm_buttons, danger_action_button, modal_window, non_empty, panel_header,
    parse_decimal, primary_button_with_icon, styled_button, styled_button_with_icon,
};
use super::screen_state::{ScreenState, Submission};
use crate::api;
use crate::models::catalog::{ApprovalLevel, ApprovalLevelInput, DocumentCategoryInput, MeasurementUnitInput};
use crate::models::contract::format_brl;
use crate::permissions::{AdminModule, Permission};

const MAX_SYMBOL_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogTab {
    #[default]
    ApprovalLevels,
    MeasurementUnits,
    DocumentCategories,
}

impl CatalogTab {
    const ALL: [CatalogTab; 3] = [
        CatalogTab::ApprovalLevels,
        CatalogTab::MeasurementUnits,
        CatalogTab::DocumentCategories,
    ];

    fn module(&self) -> AdminModule {
        match self {
            CatalogTab::ApprovalLevels => AdminModule::ApprovalLevels,
            CatalogTab::MeasurementUnits => AdminModule::MeasurementUnits,
            CatalogTab::DocumentCategories => AdminModule::DocumentCategories,
        }
    }

    fn permission(&self) -> Permission {
        match self {
            CatalogTab::ApprovalLevels => Permission::ApprovalLevelsManage,
            CatalogTab::MeasurementUnits => Permission::MeasurementUnitsManage,
            CatalogTab::DocumentCategories => Permission::DocumentCategoriesManage,
        }
    }

    pub fn from_module(module: AdminModule) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.module() == module)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApprovalLevelForm {
    pub name: String,
    pub order: String,
    pub min_value: String,
    pub role_id: Option<i64>,
    pub description: String,
}

impl ApprovalLevelForm {
    /// Empty form numbered after the last existing level.
    pub fn next_after(levels: &[ApprovalLevel]) -> Self {
        let next = levels.iter().map(|l| l.order).max().unwrap_or(0) + 1;
        Self {
            order: next.to_string(),
            ..Default::default()
        }
    }

    pub fn from_level(level: &ApprovalLevel) -> Self {
        Self {
            name: level.name.clone(),
            order: level.order.to_string(),
            min_value: level
                .min_value
                .map(|v| format!("{v:.2}").replace('.', ","))
                .unwrap_or_default(),
            role_id: level.role_id,
            description: level.description.clone().unwrap_or_default(),
        }
    }

    pub fn to_input(&self) -> Result<ApprovalLevelInput, String> {
        if self.name.trim().is_empty() {
            return Err("Nome do nível é obrigatório".to_string());
        }
        let order = match self.order.trim().parse::<i32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err("Ordem deve ser um número inteiro positivo".to_string()),
        };
        let min_value = if self.min_value.trim().is_empty() {
            None
        } else {
            match parse_decimal(&self.min_value) {
                Some(v) if v >= 0.0 => Some(v),
                _ => return Err("Valor mínimo inválido".to_string()),
            }
        };

        Ok(ApprovalLevelInput {
            name: self.name.trim().to_string(),
            order,
            min_value,
            role_id: self.role_id,
            description: non_empty(&self.description),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitForm {
    pub symbol: String,
    pub name: String,
}

impl UnitForm {
    pub fn to_input(&self) -> Result<MeasurementUnitInput, String> {
        let symbol = self.symbol.trim();
        if symbol.is_empty() || self.name.trim().is_empty() {
            return Err("Sigla e nome são obrigatórios".to_string());
        }
        if symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(format!("A sigla deve ter no máximo {MAX_SYMBOL_LEN} caracteres"));
        }
        Ok(MeasurementUnitInput {
            symbol: symbol.to_string(),
            name: self.name.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

impl CategoryForm {
    pub fn to_input(&self) -> Result<DocumentCategoryInput, String> {
        if self.name.trim().is_empty() {
            return Err("Nome da categoria é obrigatório".to_string());
        }
        Ok(DocumentCategoryInput {
            name: self.name.trim().to_string(),
            description: non_empty(&self.description),
        })
    }
}

#[derive(Default)]
pub struct PanelState {
    pub tab: CatalogTab,
    pub approval_levels: ScreenState<ApprovalLevelForm>,
    pub units: ScreenState<UnitForm>,
    pub categories: ScreenState<CategoryForm>,
}

/// Show the catalog panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Cadastros");

    let allowed: Vec<CatalogTab> = CatalogTab::ALL.into_iter().filter(|t| app.can(t.permission())).collect();
    if allowed.is_empty() {
        ui.label("Você não tem permissão para gerenciar cadastros.");
        return go_back;
    }
    if !allowed.contains(&app.catalog_ui.tab) {
        app.catalog_ui.tab = allowed[0];
    }

    ui.horizontal(|ui| {
        for tab in &allowed {
            ui.selectable_value(&mut app.catalog_ui.tab, *tab, tab.module().title());
        }
    });
    ui.add_space(10.0);

    match app.catalog_ui.tab {
        CatalogTab::ApprovalLevels => show_approval_levels(app, ui),
        CatalogTab::MeasurementUnits => show_units(app, ui),
        CatalogTab::DocumentCategories => show_categories(app, ui),
    }

    go_back
}

/// Toolbar shared by the three tabs. Returns (add clicked, refresh clicked).
fn toolbar(ui: &mut Ui, add_label: &str) -> (bool, bool) {
    let mut add = false;
    let mut refresh = false;
    ui.horizontal(|ui| {
        add = primary_button_with_icon(ui, PLUS, add_label).clicked();
        ui.add_space(10.0);
        refresh = styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Atualizar").clicked();
    });
    ui.add_space(15.0);
    (add, refresh)
}

/// Edit and delete buttons of a table row.
fn row_actions<F: Clone>(ui: &mut Ui, id: i64, label: &str, form: impl FnOnce() -> F) -> Option<ScreenState<F>> {
    let mut next = None;
    ui.horizontal(|ui| {
        if action_button(ui, PENCIL, "Editar").clicked() {
            next = Some(ScreenState::Editing { id, form: form() });
        }
        ui.add_space(4.0);
        if danger_action_button(ui, TRASH, "Excluir").clicked() {
            next = Some(ScreenState::ConfirmingDelete {
                id,
                label: label.to_string(),
            });
        }
    });
    next
}

/// Delete confirmation for any tab. Returns the user's choice.
fn delete_dialog(ctx: &egui::Context, title: &str, label: &str) -> Option<bool> {
    let mut outcome = None;
    modal_window(title).show(ctx, |ui| {
        ui.label(format!("Excluir '{label}'?"));
        ui.add_space(10.0);
        outcome = confirm_buttons(ui, "Excluir");
    });
    outcome
}

/// Save/cancel footer. Returns `Some(true)` on save.
fn form_footer(ui: &mut Ui) -> Option<bool> {
    let mut outcome = None;
    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);
    ui.horizontal(|ui| {
        if styled_button(ui, "Cancelar").clicked() {
            outcome = Some(false);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if primary_button_with_icon(ui, "", "Salvar").clicked() {
                outcome = Some(true);
            }
        });
    });
    outcome
}

// ----------------------------------------------------------------------------
// Approval levels
// ----------------------------------------------------------------------------

fn show_approval_levels(app: &mut App, ui: &mut Ui) {
    let (add, refresh) = toolbar(ui, "Novo nível");
    if add {
        app.catalog_ui
            .approval_levels
            .create(ApprovalLevelForm::next_after(&app.approval_levels));
    }
    if refresh {
        app.reload(Resource::ApprovalLevels);
    }

    let mut levels: Vec<&ApprovalLevel> = app.approval_levels.iter().collect();
    levels.sort_by_key(|l| l.order);
    let mut next_state = None;

    ScrollArea::vertical().id_salt("approval_levels_scroll").show(ui, |ui| {
        egui::Grid::new("approval_levels_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Ordem");
                ui.strong("Nome");
                ui.strong("Valor mínimo");
                ui.strong("Perfil aprovador");
                ui.strong("Ações");
                ui.end_row();

                for level in levels {
                    ui.label(level.order.to_string());
                    ui.label(&level.name);
                    ui.label(level.min_value.map(format_brl).unwrap_or("-".to_string()));
                    ui.label(
                        level
                            .role_id
                            .and_then(|id| app.roles.iter().find(|r| r.id == id))
                            .map(|r| r.name.as_str())
                            .unwrap_or("-"),
                    );
                    if let Some(state) = row_actions(ui, level.id, &level.name, || ApprovalLevelForm::from_level(level)) {
                        next_state = Some(state);
                    }
                    ui.end_row();
                }
            });
    });

    if let Some(state) = next_state {
        app.catalog_ui.approval_levels = state;
    }

    let ctx = ui.ctx().clone();
    match &mut app.catalog_ui.approval_levels {
        ScreenState::Idle => {}
        ScreenState::ConfirmingDelete { label, .. } => match delete_dialog(&ctx, "Excluir nível", label) {
            Some(true) => submit_approval_level(app),
            Some(false) => app.catalog_ui.approval_levels.close(),
            None => {}
        },
        ScreenState::Creating(form) | ScreenState::Editing { form, .. } => {
            let roles = &app.roles;
            let mut outcome = None;
            modal_window("Nível de aprovação").default_width(420.0).show(&ctx, |ui| {
                egui::Grid::new("approval_level_form_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Nome:");
                        ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(240.0));
                        ui.end_row();

                        ui.label("Ordem:");
                        ui.add(egui::TextEdit::singleline(&mut form.order).desired_width(60.0));
                        ui.end_row();

                        ui.label("Valor mínimo (R$):");
                        ui.add(
                            egui::TextEdit::singleline(&mut form.min_value)
                                .desired_width(140.0)
                                .hint_text("Opcional"),
                        );
                        ui.end_row();

                        ui.label("Perfil aprovador:");
                        egui::ComboBox::from_id_salt("approval_level_role")
                            .width(240.0)
                            .selected_text(
                                form.role_id
                                    .and_then(|id| roles.iter().find(|r| r.id == id))
                                    .map(|r| r.name.as_str())
                                    .unwrap_or("Qualquer"),
                            )
                            .show_ui(ui, |ui| {
                                if ui.selectable_label(form.role_id.is_none(), "Qualquer").clicked() {
                                    form.role_id = None;
                                }
                                for role in roles {
                                    if ui.selectable_label(form.role_id == Some(role.id), &role.name).clicked() {
                                        form.role_id = Some(role.id);
                                    }
                                }
                            });
                        ui.end_row();

                        ui.label("Descrição:");
                        ui.add(egui::TextEdit::singleline(&mut form.description).desired_width(240.0));
                        ui.end_row();
                    });
                outcome = form_footer(ui);
            });
            match outcome {
                Some(true) => submit_approval_level(app),
                Some(false) => app.catalog_ui.approval_levels.close(),
                None => {}
            }
        }
    }
}

fn submit_approval_level(app: &mut App) {
    let Some(submission) = app.catalog_ui.approval_levels.submission() else {
        return;
    };

    let client = app.client.clone();
    match submission {
        Submission::Create(form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::catalog::create_approval_level(&client, &data).await, |l| {
                    UiMessage::Saved {
                        resource: Resource::ApprovalLevels,
                        message: format!("Nível '{}' criado", l.name),
                    }
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Update(id, form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::catalog::update_approval_level(&client, id, &data).await, |l| {
                    UiMessage::Saved {
                        resource: Resource::ApprovalLevels,
                        message: format!("Nível '{}' atualizado", l.name),
                    }
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Delete(id) => app.spawn(async move {
            action_message(api::catalog::delete_approval_level(&client, id).await, |_| {
                UiMessage::Deleted {
                    resource: Resource::ApprovalLevels,
                    message: "Nível de aprovação excluído".to_string(),
                }
            })
        }),
    }
}

// ----------------------------------------------------------------------------
// Measurement units
// ----------------------------------------------------------------------------

fn show_units(app: &mut App, ui: &mut Ui) {
    let (add, refresh) = toolbar(ui, "Nova unidade");
    if add {
        app.catalog_ui.units.create(UnitForm::default());
    }
    if refresh {
        app.reload(Resource::MeasurementUnits);
    }

    let mut next_state = None;

    ScrollArea::vertical().id_salt("units_scroll").show(ui, |ui| {
        egui::Grid::new("units_grid")
            .num_columns(3)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Sigla");
                ui.strong("Nome");
                ui.strong("Ações");
                ui.end_row();

                for unit in &app.measurement_units {
                    ui.label(&unit.symbol);
                    ui.label(&unit.name);
                    let form = || UnitForm {
                        symbol: unit.symbol.clone(),
                        name: unit.name.clone(),
                    };
                    if let Some(state) = row_actions(ui, unit.id, &unit.symbol, form) {
                        next_state = Some(state);
                    }
                    ui.end_row();
                }
            });
    });

    if let Some(state) = next_state {
        app.catalog_ui.units = state;
    }

    let ctx = ui.ctx().clone();
    match &mut app.catalog_ui.units {
        ScreenState::Idle => {}
        ScreenState::ConfirmingDelete { label, .. } => match delete_dialog(&ctx, "Excluir unidade", label) {
            Some(true) => submit_unit(app),
            Some(false) => app.catalog_ui.units.close(),
            None => {}
        },
        ScreenState::Creating(form) | ScreenState::Editing { form, .. } => {
            let mut outcome = None;
            modal_window("Unidade de medida").default_width(360.0).show(&ctx, |ui| {
                egui::Grid::new("unit_form_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Sigla:");
                        ui.add(
                            egui::TextEdit::singleline(&mut form.symbol)
                                .desired_width(80.0)
                                .char_limit(MAX_SYMBOL_LEN),
                        );
                        ui.end_row();

                        ui.label("Nome:");
                        ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(220.0));
                        ui.end_row();
                    });
                outcome = form_footer(ui);
            });
            match outcome {
                Some(true) => submit_unit(app),
                Some(false) => app.catalog_ui.units.close(),
                None => {}
            }
        }
    }
}

fn submit_unit(app: &mut App) {
    let Some(submission) = app.catalog_ui.units.submission() else {
        return;
    };

    let client = app.client.clone();
    match submission {
        Submission::Create(form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::catalog::create_measurement_unit(&client, &data).await, |u| {
                    UiMessage::Saved {
                        resource: Resource::MeasurementUnits,
                        message: format!("Unidade '{}' criada", u.symbol),
                    }
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Update(id, form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::catalog::update_measurement_unit(&client, id, &data).await, |u| {
                    UiMessage::Saved {
                        resource: Resource::MeasurementUnits,
                        message: format!("Unidade '{}' atualizada", u.symbol),
                    }
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Delete(id) => app.spawn(async move {
            action_message(api::catalog::delete_measurement_unit(&client, id).await, |_| {
                UiMessage::Deleted {
                    resource: Resource::MeasurementUnits,
                    message: "Unidade de medida excluída".to_string(),
                }
            })
        }),
    }
}

// ----------------------------------------------------------------------------
// Document categories
// ----------------------------------------------------------------------------

fn show_categories(app: &mut App, ui: &mut Ui) {
    let (add, refresh) = toolbar(ui, "Nova categoria");
    if add {
        app.catalog_ui.categories.create(CategoryForm::default());
    }
    if refresh {
        app.reload(Resource::DocumentCategories);
    }

    let mut next_state = None;

    ScrollArea::vertical().id_salt("categories_scroll").show(ui, |ui| {
        egui::Grid::new("categories_grid")
            .num_columns(3)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Nome");
                ui.strong("Descrição");
                ui.strong("Ações");
                ui.end_row();

                for category in &app.document_categories {
                    ui.label(&category.name);
                    ui.label(category.description.as_deref().unwrap_or("-"));
                    let form = || CategoryForm {
                        name: category.name.clone(),
                        description: category.description.clone().unwrap_or_default(),
                    };
                    if let Some(state) = row_actions(ui, category.id, &category.name, form) {
                        next_state = Some(state);
                    }
                    ui.end_row();
                }
            });
    });

    if let Some(state) = next_state {
        app.catalog_ui.categories = state;
    }

    let ctx = ui.ctx().clone();
    match &mut app.catalog_ui.categories {
        ScreenState::Idle => {}
        ScreenState::ConfirmingDelete { label, .. } => match delete_dialog(&ctx, "Excluir categoria", label) {
            Some(true) => submit_category(app),
            Some(false) => app.catalog_ui.categories.close(),
            None => {}
        },
        ScreenState::Creating(form) | ScreenState::Editing { form, .. } => {
            let mut outcome = None;
            modal_window("Categoria de documento").default_width(400.0).show(&ctx, |ui| {
                egui::Grid::new("category_form_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Nome:");
                        ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(240.0));
                        ui.end_row();

                        ui.label("Descrição:");
                        ui.add(egui::TextEdit::singleline(&mut form.description).desired_width(240.0));
                        ui.end_row();
                    });
                outcome = form_footer(ui);
            });
            match outcome {
                Some(true) => submit_category(app),
                Some(false) => app.catalog_ui.categories.close(),
                None => {}
            }
        }
    }
}

fn submit_category(app: &mut App) {
    let Some(submission) = app.catalog_ui.categories.submission() else {
        return;
    };

    let client = app.client.clone();
    match submission {
        Submission::Create(form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::catalog::create_document_category(&client, &data).await, |c| {
                    UiMessage::Saved {
                        resource: Resource::DocumentCategories,
                        message: format!("Categoria '{}' criada", c.name),
                    }
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Update(id, form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::catalog::update_document_category(&client, id, &data).await, |c| {
                    UiMessage::Saved {
                        resource: Resource::DocumentCategories,
                        message: format!("Categoria '{}' atualizada", c.name),
                    }
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Delete(id) => app.spawn(async move {
            action_message(api::catalog::delete_document_category(&client, id).await, |_| {
                UiMessage::Deleted {
                    resource: Resource::DocumentCategories,
                    message: "Categoria excluída".to_string(),
                }
            })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: i64, order: i32) -> ApprovalLevel {
        ApprovalLevel {
            id,
            name: format!("Nível {order}"),
            order,
            min_value: None,
            role_id: None,
            description: None,
        }
    }

    #[test]
    fn test_next_level_order() {
        assert_eq!(ApprovalLevelForm::next_after(&[]).order, "1");
        assert_eq!(ApprovalLevelForm::next_after(&[level(1, 1), level(2, 3)]).order, "4");
    }

    #[test]
    fn test_approval_level_validation() {
        let mut form = ApprovalLevelForm {
            name: "Diretoria".to_string(),
            order: "0".to_string(),
            ..Default::default()
        };
        assert!(form.to_input().is_err());

        form.order = "2".to_string();
        form.min_value = "100.000,00".to_string();
        let input = form.to_input().unwrap();
        assert_eq!(input.order, 2);
        assert_eq!(input.min_value, Some(100_000.0));

        form.min_value = "muito".to_string();
        assert_eq!(form.to_input().unwrap_err(), "Valor mínimo inválido");
    }

    #[test]
    fn test_unit_validation() {
        let form = UnitForm {
            symbol: " m² ".to_string(),
            name: "Metro quadrado".to_string(),
        };
        assert_eq!(form.to_input().unwrap().symbol, "m²");

        let form = UnitForm {
            symbol: "metroquadrado".to_string(),
            name: "x".to_string(),
        };
        assert!(form.to_input().is_err());

        assert!(UnitForm::default().to_input().is_err());
    }

    #[test]
    fn test_category_validation() {
        assert!(CategoryForm::default().to_input().is_err());
        let form = CategoryForm {
            name: "Medições".to_string(),
            description: " ".to_string(),
        };
        assert_eq!(form.to_input().unwrap().description, None);
    }

    #[test]
    fn test_tab_from_module() {
        assert_eq!(
            CatalogTab::from_module(AdminModule::MeasurementUnits),
            Some(CatalogTab::MeasurementUnits)
        );
        assert_eq!(CatalogTab::from_module(AdminModule::Users), None);
    }
}
