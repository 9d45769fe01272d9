use crate::session::Role;
use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color32,
    pub surface: Color32,
    pub border: Color32,
    pub accent: Color32,
    pub accent_hover: Color32,
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,
    pub danger: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub spacing_8: f32,
    pub spacing_16: f32,
    pub accent_bar_width: f32,
    pub radius: u8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            surface: Color32::from_rgb(0xF8, 0xF9, 0xFA),
            border: Color32::from_rgb(0xE9, 0xEC, 0xEF),
            accent: Color32::from_rgb(0x1E, 0x49, 0x99),
            accent_hover: Color32::from_rgb(0x16, 0x3A, 0x7A),
            user_bubble: Color32::from_rgb(0xF0, 0xF2, 0xF6),
            assistant_bubble: Color32::from_rgb(0xE8, 0xF0, 0xFF),
            danger: Color32::from_rgb(0xC6, 0x28, 0x28),
            text_primary: Color32::from_rgb(0x33, 0x33, 0x33),
            text_muted: Color32::from_rgb(0x66, 0x66, 0x66),
            text_on_accent: Color32::WHITE,
            spacing_8: 8.0,
            spacing_16: 16.0,
            accent_bar_width: 5.0,
            radius: 8,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = self.background;
        visuals.window_fill = self.background;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.bg_fill = self.accent;
        visuals.widgets.inactive.weak_bg_fill = self.accent;
        visuals.widgets.inactive.fg_stroke.color = self.text_on_accent;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_fill = self.accent_hover;
        visuals.widgets.hovered.weak_bg_fill = self.accent_hover;
        visuals.widgets.hovered.fg_stroke.color = self.text_on_accent;
        visuals.widgets.hovered.bg_stroke = Stroke::NONE;
        visuals.widgets.active.bg_fill = self.accent_hover;
        visuals.widgets.active.weak_bg_fill = self.accent_hover;
        visuals.widgets.active.fg_stroke.color = self.text_on_accent;
        visuals.selection.bg_fill = self.assistant_bubble;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.accent;
        visuals.window_corner_radius = CornerRadius::same(self.radius);

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        style.spacing.button_padding = egui::vec2(12.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(22.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(15.0));
        style.text_styles.insert(TextStyle::Button, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(12.0));
        ctx.set_style(style);
    }

    pub fn bubble_fill(&self, role: Role) -> Color32 {
        match role {
            Role::User => self.user_bubble,
            Role::Assistant => self.assistant_bubble,
        }
    }

    pub fn bubble_frame(&self, role: Role) -> Frame {
        let left = match role {
            Role::User => self.spacing_16,
            Role::Assistant => self.spacing_16 + self.accent_bar_width,
        };
        Frame::new()
            .fill(self.bubble_fill(role))
            .inner_margin(Margin {
                left: left as i8,
                right: self.spacing_16 as i8,
                top: self.spacing_16 as i8,
                bottom: self.spacing_16 as i8,
            })
            .corner_radius(CornerRadius::same(self.radius))
            .stroke(Stroke::NONE)
    }

    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface)
            .inner_margin(Margin::same(self.spacing_16 as i8))
            .corner_radius(CornerRadius::same(self.radius))
            .stroke(Stroke::new(1.0, self.border))
    }

    pub fn composer_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface)
            .inner_margin(Margin::symmetric(self.spacing_16 as i8, self.spacing_8 as i8))
            .corner_radius(CornerRadius::same(self.radius))
            .stroke(Stroke::new(1.0, self.border))
    }
}
