use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface_bright: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub positive: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(10, 14, 18),
            surface_bright: Color::Rgb(22, 28, 34),
            text: Color::Rgb(222, 222, 218),
            text_muted: Color::Rgb(150, 154, 158),
            dim: Color::Rgb(110, 114, 118),
            accent: Color::Rgb(232, 150, 72),
            border: Color::Rgb(58, 66, 74),
            border_focused: Color::Rgb(232, 150, 72),
            positive: Color::Rgb(96, 180, 120),
            warning: Color::Rgb(220, 190, 90),
            error: Color::Rgb(210, 86, 80),
        }
    }
}
