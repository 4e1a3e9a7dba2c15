use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::egui_app::state::StatusTone;

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub rating_bar: Color32,
    pub warning: Color32,
    pub success: Color32,
    pub error: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(14, 17, 23),
        bg_secondary: Color32::from_rgb(24, 28, 36),
        bg_tertiary: Color32::from_rgb(38, 43, 54),
        panel_outline: Color32::from_rgb(48, 54, 66),
        grid_soft: Color32::from_rgb(34, 38, 48),
        text_primary: Color32::from_rgb(214, 220, 228),
        text_muted: Color32::from_rgb(146, 154, 166),
        accent: Color32::from_rgb(108, 162, 255),
        rating_bar: Color32::from_rgb(42, 240, 31),
        warning: Color32::from_rgb(222, 170, 72),
        success: Color32::from_rgb(96, 186, 128),
        error: Color32::from_rgb(214, 88, 76),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.grid_soft;
    visuals.error_fg_color = palette.error;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.bg_tertiary;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    for widgets in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        set_widget(widgets, palette);
    }
    visuals.window_corner_radius = CornerRadius::same(4);
    visuals.menu_corner_radius = CornerRadius::same(4);
    visuals.popup_shadow = Shadow::NONE;
    visuals.button_frame = true;
}

fn set_widget(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::same(3);
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.grid_soft;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn section_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}

pub fn chart_border() -> Stroke {
    Stroke::new(1.0, palette().grid_soft)
}

/// Badge label and color for a status tone.
pub fn status_badge(tone: StatusTone) -> (String, Color32) {
    let palette = palette();
    match tone {
        StatusTone::Idle => ("Idle".into(), palette.bg_tertiary),
        StatusTone::Busy => ("Working".into(), palette.accent),
        StatusTone::Info => ("Info".into(), palette.success),
        StatusTone::Warning => ("Warning".into(), palette.warning),
        StatusTone::Error => ("Error".into(), palette.error),
    }
}
