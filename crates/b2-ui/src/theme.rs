use egui::{Color32, Context, Rounding, Stroke, Style, Visuals};

/// Theme configuration
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "B2 Dark".to_string(),
            dark_mode: true,
        }
    }
}

/// Apply the application theme (dark, high-contrast for dense grids)
pub fn apply_theme(ctx: &Context, _theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    let bg_color = Color32::from_rgb(22, 24, 27);
    let panel_bg = Color32::from_rgb(30, 32, 36);
    let widget_bg = Color32::from_rgb(40, 43, 48);
    let hover_color = Color32::from_rgb(52, 56, 62);
    let active_color = Color32::from_rgb(62, 67, 74);
    let accent_color = Color32::from_rgb(235, 110, 60); // Carrier orange
    let text_color = Color32::from_rgb(222, 222, 222);

    visuals.window_fill = panel_bg;
    visuals.panel_fill = panel_bg;
    visuals.extreme_bg_color = bg_color;
    visuals.faint_bg_color = widget_bg;

    visuals.widgets.noninteractive.bg_fill = widget_bg;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(58, 62, 68));
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.noninteractive.rounding = Rounding::same(3.0);

    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(70, 74, 80));
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.inactive.rounding = Rounding::same(3.0);

    visuals.widgets.hovered.bg_fill = hover_color;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, Color32::from_rgb(84, 88, 94));
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.hovered.rounding = Rounding::same(3.0);

    visuals.widgets.active.bg_fill = active_color;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color);
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.active.rounding = Rounding::same(3.0);

    visuals.selection.bg_fill = accent_color.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent_color);
    visuals.hyperlink_color = accent_color;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);

    style.visuals = visuals;
    ctx.set_style(style);
}
