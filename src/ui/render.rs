// render.rs: Widget construction for the gallery and card views.

use crate::model::MediaKind;
use crate::state::{CardView, Update};
use crate::ui::styles::ViewerStyles;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

/// Top-level draw: the card while a session is open, the gallery otherwise.
pub fn draw(frame: &mut Frame, update: &Option<Update>, selected: usize, styles: &ViewerStyles) {
    let Some(update) = update else {
        let waiting = Paragraph::new("loading feed...").alignment(Alignment::Center);
        frame.render_widget(waiting, frame.area());
        return;
    };
    match &update.card {
        Some(card) => draw_card(frame, card, styles),
        None => draw_gallery(frame, update, selected, styles),
    }
}

fn draw_gallery(frame: &mut Frame, update: &Update, selected: usize, styles: &ViewerStyles) {
    let mut lines = vec![
        Line::from(Span::styled("bites", styles.header)),
        Line::default(),
    ];
    for (i, author) in update.authors.iter().enumerate() {
        let ring = if author.seen { "○" } else { "●" };
        let ring_style = if author.seen { styles.seen } else { styles.unseen };
        let name_style = if i == selected {
            styles.selected
        } else if author.seen {
            styles.seen
        } else {
            styles.caption
        };
        let marker = if i == selected { "▸ " } else { "  " };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{ring} "), ring_style),
            Span::styled(author.display_name.clone(), name_style),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "↑/↓ select · enter open · q quit",
        styles.meta,
    )));

    let area = centered(frame.area(), lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_card(frame: &mut Frame, card: &CardView, styles: &ViewerStyles) {
    let [header_area, gauge_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    let mut header = vec![Span::styled(
        format!(
            "{}  ·  {}/{}",
            card.author_name,
            card.item_index + 1,
            card.item_count
        ),
        styles.header,
    )];
    if card.paused {
        header.push(Span::styled("  ⏸ paused", styles.paused));
    }
    frame.render_widget(
        Paragraph::new(Line::from(header)).alignment(Alignment::Center),
        header_area,
    );

    let gauge = Gauge::default()
        .gauge_style(styles.gauge)
        .ratio((card.progress / 100.0).clamp(0.0, 1.0))
        .label("");
    frame.render_widget(gauge, gauge_area);

    let width = body_area.width.saturating_sub(4).max(16) as usize;
    let mut body: Vec<Line> = Vec::new();
    body.push(Line::from(Span::styled(
        format!("[{}] {}", media_label(card), card.media.url),
        styles.meta,
    )));
    body.push(Line::default());
    for wrapped in textwrap::wrap(&card.caption, width) {
        body.push(Line::from(Span::styled(
            wrapped.into_owned(),
            styles.caption,
        )));
    }
    if !card.tags.is_empty() {
        body.push(Line::default());
        let tags = card
            .tags
            .iter()
            .map(|t| format!("#{t}"))
            .collect::<Vec<_>>()
            .join(" ");
        body.push(Line::from(Span::styled(tags, styles.meta)));
    }
    let body_rect = centered(body_area, body.len() as u16);
    frame.render_widget(Paragraph::new(body).alignment(Alignment::Center), body_rect);

    let heart_style = if card.liked_by_viewer {
        styles.liked
    } else {
        styles.meta
    };
    let footer = vec![
        Line::from(vec![
            Span::styled(
                format!("{} {}", if card.liked_by_viewer { "♥" } else { "♡" }, card.like_count),
                heart_style,
            ),
            Span::styled(format!("   {} views", card.view_count), styles.meta),
        ]),
        Line::from(Span::styled(
            "←/→ navigate · space hold · l like · esc back · q quit",
            styles.meta,
        )),
    ];
    frame.render_widget(
        Paragraph::new(footer).alignment(Alignment::Center),
        footer_area,
    );
}

fn media_label(card: &CardView) -> &'static str {
    match card.media.kind {
        MediaKind::Image => "image",
        MediaKind::Video => "video",
    }
}

/// Vertically center `height` rows inside `area`.
fn centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let top = (area.height - height) / 2;
    Rect {
        x: area.x,
        y: area.y + top,
        width: area.width,
        height,
    }
}
