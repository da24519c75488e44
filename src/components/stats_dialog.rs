//! Gallery statistics overlay

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::storage::GenerationStats;
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Statistics overlay, computed fresh from the repository when opened
#[derive(Default)]
pub struct StatsDialog;

impl StatsDialog {
    pub fn draw_with_stats(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        stats: &GenerationStats,
    ) -> Result<()> {
        let height = (10 + stats.style_counts.len() as u16).min(area.height);
        let popup_area = centered_popup(area, 48, height);

        frame.render_widget(Clear, popup_area);

        let label = |text: &str| {
            Span::styled(
                format!("  {:14}", text),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        };
        let date = |ts: Option<chrono::DateTime<chrono::Utc>>| match ts {
            Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            None => "-".to_string(),
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![label("Total"), Span::raw(stats.total_images.to_string())]),
            Line::from(vec![
                label("Favorites"),
                Span::raw(stats.favorite_count.to_string()),
            ]),
            Line::from(vec![
                label("Last 7 days"),
                Span::raw(stats.recent_images.to_string()),
            ]),
            Line::from(vec![label("Oldest"), Span::raw(date(stats.oldest_image))]),
            Line::from(vec![label("Newest"), Span::raw(date(stats.newest_image))]),
        ];

        if !stats.style_counts.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  By style",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            // Sorted for a stable display order
            let mut styles: Vec<_> = stats.style_counts.iter().collect();
            styles.sort_by(|a, b| a.0.cmp(b.0));
            for (style, count) in styles {
                lines.push(Line::from(vec![
                    label(style),
                    Span::raw(count.to_string()),
                ]));
            }
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Statistics ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        );

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for StatsDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('s') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_stats(frame, area, &GenerationStats::default())
    }
}
