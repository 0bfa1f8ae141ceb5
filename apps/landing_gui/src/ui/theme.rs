use eframe::egui;

#[derive(Debug, Clone, Copy)]
pub struct LandingPalette {
    pub page_background: egui::Color32,
    pub alt_section_background: egui::Color32,
    pub card_background: egui::Color32,
    pub card_border: egui::Color32,
    pub text: egui::Color32,
    pub quote_text: egui::Color32,
    pub muted_text: egui::Color32,
    pub faint_text: egui::Color32,
    pub footer_text: egui::Color32,
    pub accent: egui::Color32,
    pub accent_soft: egui::Color32,
    pub badge_text: egui::Color32,
    pub success: egui::Color32,
}

impl LandingPalette {
    pub fn dark() -> Self {
        Self {
            page_background: egui::Color32::from_rgb(0x0a, 0x0a, 0x0a),
            alt_section_background: egui::Color32::from_rgb(0x0f, 0x0f, 0x0f),
            card_background: egui::Color32::from_rgb(0x18, 0x18, 0x1b),
            card_border: egui::Color32::from_rgb(0x27, 0x27, 0x2a),
            text: egui::Color32::WHITE,
            quote_text: egui::Color32::from_rgb(0xe4, 0xe4, 0xe7),
            muted_text: egui::Color32::from_rgb(0xa1, 0xa1, 0xaa),
            faint_text: egui::Color32::from_rgb(0x71, 0x71, 0x7a),
            footer_text: egui::Color32::from_rgb(0x52, 0x52, 0x5b),
            accent: egui::Color32::from_rgb(0xa8, 0x55, 0xf7),
            accent_soft: egui::Color32::from_rgba_unmultiplied(0xa8, 0x55, 0xf7, 38),
            badge_text: egui::Color32::from_rgb(0xc0, 0x84, 0xfc),
            success: egui::Color32::from_rgb(0x22, 0xc5, 0x5e),
        }
    }
}

pub fn apply_landing_style(ctx: &egui::Context, palette: &LandingPalette) {
    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::dark();
    style.visuals.panel_fill = palette.page_background;
    style.visuals.window_fill = palette.card_background;
    style.visuals.override_text_color = Some(palette.text);
    style.visuals.extreme_bg_color = palette.card_background;
    style.visuals.selection.bg_fill = palette.accent;

    style.visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, palette.card_border);
    style.visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, palette.accent_soft);
    style.visuals.widgets.active.bg_stroke = egui::Stroke::new(1.2, palette.accent);

    style.spacing.item_spacing = egui::vec2(12.0, 12.0);
    style.spacing.button_padding = egui::vec2(24.0, 14.0);
    style.spacing.interact_size = egui::vec2(40.0, 44.0);
    ctx.set_style(style);
}
