use crate::grid::style::GridTheme;
use crate::models::settings::ThemePreference;

/// Resolve the configured preference to a concrete theme. "System" asks the
/// OS once; an undetermined answer falls back to light.
pub fn resolve_theme(preference: ThemePreference) -> GridTheme {
    match preference {
        ThemePreference::Light => GridTheme::light(),
        ThemePreference::Dark => GridTheme::dark(),
        ThemePreference::System => match dark_light::detect() {
            dark_light::Mode::Dark => GridTheme::dark(),
            dark_light::Mode::Light | dark_light::Mode::Default => GridTheme::light(),
        },
    }
}

/// Apply theme colors to egui's visuals
pub fn apply_to_context(theme: &GridTheme, ctx: &egui::Context) {
    let mut visuals = if theme.is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    visuals.window_fill = theme.background;
    visuals.panel_fill = theme.background;

    visuals.widgets.noninteractive.bg_fill = theme.day_background;
    visuals.widgets.inactive.bg_fill = theme.day_background;
    visuals.widgets.hovered.bg_fill = theme.today_background;
    visuals.widgets.active.bg_fill = theme.today_background;

    visuals.override_text_color = Some(theme.header_text);

    ctx.set_visuals(visuals);
}
