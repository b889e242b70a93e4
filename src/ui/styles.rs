use ratatui::style::{Color, Modifier, Style};

pub struct ViewerStyles {
    pub unseen: Style,
    pub seen: Style,
    pub selected: Style,
    pub header: Style,
    pub caption: Style,
    pub meta: Style,
    pub liked: Style,
    pub paused: Style,
    pub gauge: Style,
}

impl Default for ViewerStyles {
    fn default() -> Self {
        Self {
            unseen: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            seen: Style::default().add_modifier(Modifier::DIM),
            selected: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            header: Style::default().add_modifier(Modifier::BOLD),
            caption: Style::default(),
            meta: Style::default().add_modifier(Modifier::DIM),
            liked: Style::default().fg(Color::Red),
            paused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            gauge: Style::default().fg(Color::Magenta),
        }
    }
}
