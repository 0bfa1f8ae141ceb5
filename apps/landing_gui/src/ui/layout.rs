//! Viewport-driven layout selection. Width is the only input; everything here is pure.

pub const TABLET_MIN_WIDTH: f32 = 640.0;
pub const DESKTOP_MIN_WIDTH: f32 = 1024.0;
/// Used before the first frame reports a real width.
pub const FALLBACK_VIEWPORT_WIDTH: f32 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVariant {
    Mobile,
    Tablet,
    Desktop,
}

impl LayoutVariant {
    pub fn for_width(width: f32) -> Self {
        if width < TABLET_MIN_WIDTH {
            Self::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }

    pub fn metrics(self) -> LayoutMetrics {
        match self {
            Self::Mobile => LayoutMetrics {
                hero_title_size: 32.0,
                hero_subtitle_size: 15.2,
                section_title_size: 24.0,
                final_title_size: 24.0,
                body_size: 14.4,
                caption_size: 14.0,
                button_text_size: 15.0,
                stack_columns: true,
                content_max_width: f32::INFINITY,
                card_max_width: f32::INFINITY,
                section_padding: 48.0,
            },
            Self::Tablet => LayoutMetrics {
                hero_title_size: 48.0,
                hero_subtitle_size: 18.0,
                section_title_size: 32.0,
                final_title_size: 36.0,
                body_size: 20.0,
                caption_size: 18.0,
                button_text_size: 16.0,
                stack_columns: false,
                content_max_width: 900.0,
                card_max_width: 480.0,
                section_padding: 64.0,
            },
            Self::Desktop => LayoutMetrics {
                hero_title_size: 64.0,
                hero_subtitle_size: 22.0,
                section_title_size: 48.0,
                final_title_size: 56.0,
                body_size: 20.0,
                caption_size: 18.0,
                button_text_size: 16.0,
                stack_columns: false,
                content_max_width: 1200.0,
                card_max_width: 480.0,
                section_padding: 96.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub hero_title_size: f32,
    pub hero_subtitle_size: f32,
    pub section_title_size: f32,
    pub final_title_size: f32,
    pub body_size: f32,
    pub caption_size: f32,
    pub button_text_size: f32,
    /// Hero and vibe columns stack vertically instead of sitting side by side.
    pub stack_columns: bool,
    pub content_max_width: f32,
    pub card_max_width: f32,
    pub section_padding: f32,
}

/// Latest viewport width plus the variant derived from it. `observe` reports
/// only variant changes, so per-frame width jitter stays silent.
#[derive(Debug, Clone, Copy)]
pub struct ViewportSignal {
    width: f32,
    variant: LayoutVariant,
}

impl Default for ViewportSignal {
    fn default() -> Self {
        Self::new(FALLBACK_VIEWPORT_WIDTH)
    }
}

impl ViewportSignal {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            variant: LayoutVariant::for_width(width),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn variant(&self) -> LayoutVariant {
        self.variant
    }

    pub fn observe(&mut self, width: f32) -> Option<LayoutVariant> {
        if !width.is_finite() || width <= 0.0 {
            return None;
        }
        self.width = width;
        let variant = LayoutVariant::for_width(width);
        if variant == self.variant {
            return None;
        }
        self.variant = variant;
        Some(variant)
    }
}

/// Multi-line copy: explicit line breaks on wide layouts, one flowing line on mobile.
pub fn break_lines(lines: &[&str], variant: LayoutVariant) -> String {
    lines.join(if variant.is_mobile() { " " } else { "\n" })
}
