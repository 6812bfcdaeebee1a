//! Shared UI components.

use chrono::{Local, NaiveDate};
use eframe::egui::{self, Color32, Response, RichText, Sense, StrokeKind, Ui};
use egui_extras::DatePickerButton;

/// Render a clickable dashboard card with dynamic size.
///
/// Returns the response which can be checked for `.clicked()`.
pub fn dashboard_card(ui: &mut Ui, title: &str, description: &str, icon: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);

        // Scale factor based on width (200 is the reference size)
        let scale = size.x / 200.0;

        ui.painter().rect_filled(rect, 8.0, visuals.bg_fill);
        ui.painter()
            .rect_stroke(rect, 8.0, visuals.bg_stroke, StrokeKind::Outside);

        let icon_pos = egui::pos2(rect.center().x, rect.top() + size.y * 0.25);
        ui.painter().text(
            icon_pos,
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(32.0 * scale),
            visuals.text_color(),
        );

        let title_pos = egui::pos2(rect.center().x, rect.center().y + size.y * 0.07);
        ui.painter().text(
            title_pos,
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(16.0 * scale),
            visuals.text_color(),
        );

        let desc_pos = egui::pos2(rect.center().x, rect.bottom() - size.y * 0.17);
        ui.painter().text(
            desc_pos,
            egui::Align2::CENTER_CENTER,
            description,
            egui::FontId::proportional(11.0 * scale),
            ui.visuals().weak_text_color(),
        );
    }

    response
}

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(68, 114, 196);
    pub const FAVORITE: Color32 = Color32::from_rgb(240, 190, 40);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Voltar ao painel").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Plain toolbar button.
pub fn styled_button(ui: &mut Ui, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(text).size(14.0)).min_size(egui::vec2(80.0, 28.0)))
}

/// Toolbar button with a leading icon.
pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(format!("{icon} {text}")).size(14.0)).min_size(egui::vec2(80.0, 28.0)))
}

/// Filled primary button with a leading icon.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    let label = if icon.is_empty() {
        text.to_string()
    } else {
        format!("{icon} {text}")
    };
    ui.add(
        egui::Button::new(RichText::new(label).size(14.0).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(80.0, 28.0)),
    )
}

/// Small icon button for table rows.
pub fn action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(14.0)).frame(false))
        .on_hover_text(tooltip)
}

/// Small red icon button for destructive table actions.
pub fn danger_action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(14.0).color(colors::ERROR)).frame(false))
        .on_hover_text(tooltip)
}

/// Optional text field bound to a `String`; empty means `None` when saving.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Dim the whole window with a spinner while requests are in flight.
///
/// Drawn on a foreground layer without capturing input.
pub fn loading_overlay(ctx: &egui::Context, message: &str) {
    let screen = ctx.content_rect();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("loading_overlay"),
    ));
    painter.rect_filled(screen, 0.0, Color32::from_black_alpha(60));

    egui::Area::new(egui::Id::new("loading_overlay_label"))
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(message);
                });
            });
        });
}

/// Centered modal window with the given title.
pub fn modal_window(title: &str) -> egui::Window<'static> {
    egui::Window::new(title.to_string())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

/// Render the two-button footer of a delete confirmation.
///
/// Returns `Some(true)` on confirm, `Some(false)` on cancel.
pub fn confirm_buttons(ui: &mut Ui, confirm_label: &str) -> Option<bool> {
    let mut outcome = None;
    ui.horizontal(|ui| {
        if styled_button(ui, "Cancelar").clicked() {
            outcome = Some(false);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add(egui::Button::new(RichText::new(confirm_label).color(Color32::WHITE)).fill(colors::ERROR))
                .clicked()
            {
                outcome = Some(true);
            }
        });
    });
    outcome
}

/// Parse a decimal typed the Brazilian way ("1.234,56") or plainly ("1234.56").
pub fn parse_decimal(input: &str) -> Option<f64> {
    let input = input.trim().trim_start_matches("R$").trim();
    if input.is_empty() {
        return None;
    }

    let normalized = if input.contains(',') {
        input.replace('.', "").replace(',', ".")
    } else {
        input.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Date picker behind a checkbox, for optional dates.
pub fn optional_date(ui: &mut Ui, id_salt: &str, value: &mut Option<NaiveDate>) {
    ui.horizontal(|ui| {
        let mut enabled = value.is_some();
        if ui.checkbox(&mut enabled, "").changed() {
            *value = enabled.then(|| Local::now().date_naive());
        }
        match value {
            Some(date) => {
                ui.add(DatePickerButton::new(date).id_salt(id_salt).format("%d/%m/%Y"));
            }
            None => {
                ui.weak("Não definida");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" abc ").as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("1234.56"), Some(1234.56));
        assert_eq!(parse_decimal("R$ 10,5"), Some(10.5));
        assert_eq!(parse_decimal("750"), Some(750.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
    }
}
