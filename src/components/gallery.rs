//! Gallery screen - browse, favorite, and manage generated images

use crate::action::Action;
use crate::component::Component;
use crate::model::GeneratedImage;
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Gallery screen component
pub struct GalleryComponent {
    pub selected_index: usize,
    /// Show only favorited images
    pub favorites_only: bool,
}

impl GalleryComponent {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            favorites_only: false,
        }
    }

    /// Images visible under the current filter, newest first
    pub fn visible<'a>(&self, images: &'a [GeneratedImage]) -> Vec<&'a GeneratedImage> {
        images
            .iter()
            .filter(|img| !self.favorites_only || img.favorite)
            .collect()
    }

    /// Id of the currently selected image, if any
    pub fn selected_id(&self, images: &[GeneratedImage]) -> Option<String> {
        self.visible(images)
            .get(self.selected_index)
            .map(|img| img.id.clone())
    }

    pub fn next(&mut self, visible_count: usize) {
        if visible_count > 0 && self.selected_index + 1 < visible_count {
            self.selected_index += 1;
        }
    }

    pub fn previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self, visible_count: usize) {
        self.selected_index = visible_count.saturating_sub(1);
    }

    /// Keep the selection in range after deletions or filter changes
    pub fn clamp_selection(&mut self, visible_count: usize) {
        if self.selected_index >= visible_count {
            self.selected_index = visible_count.saturating_sub(1);
        }
    }

    pub fn toggle_filter(&mut self) {
        self.favorites_only = !self.favorites_only;
        self.selected_index = 0;
    }

    /// Render the list and the detail panel for the selected image
    pub fn draw_with_images(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        images: &[GeneratedImage],
    ) -> Result<()> {
        let visible = self.visible(images);
        self.clamp_selection(visible.len());

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        self.draw_list(frame, chunks[0], &visible);
        self.draw_detail(frame, chunks[1], visible.get(self.selected_index).copied());
        Ok(())
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect, visible: &[&GeneratedImage]) {
        let title = if self.favorites_only {
            format!(" Favorites ({}) ", visible.len())
        } else {
            format!(" Gallery ({}) ", visible.len())
        };

        let items: Vec<ListItem> = visible
            .iter()
            .map(|img| {
                let marker = if img.favorite { "★ " } else { "  " };
                let mut prompt = img.prompt.clone();
                let max = area.width.saturating_sub(6) as usize;
                if prompt.chars().count() > max {
                    prompt = prompt.chars().take(max.saturating_sub(1)).collect();
                    prompt.push('…');
                }
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Yellow)),
                    Span::raw(prompt),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(title),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        if !visible.is_empty() {
            list_state.select(Some(self.selected_index));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, image: Option<&GeneratedImage>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Details ");

        let Some(img) = image else {
            let empty = if self.favorites_only {
                "No favorites yet. Press f on an image to favorite it."
            } else {
                "No images yet. Generate one from the Generate tab."
            };
            let paragraph = Paragraph::new(empty)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let label = |text: &str| {
            Span::styled(
                format!("{:10}", text),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        };

        let mut lines = vec![
            Line::from(Span::styled(
                img.prompt.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![label("Created"), Span::raw(
                img.timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            )]),
            Line::from(vec![label("Ratio"), Span::raw(img.settings.aspect_ratio.label())]),
            Line::from(vec![label("Style"), Span::raw(
                img.settings
                    .style
                    .map(|s| s.label())
                    .unwrap_or("none"),
            )]),
        ];

        if let Some(steps) = img.settings.steps {
            lines.push(Line::from(vec![label("Steps"), Span::raw(steps.to_string())]));
        }
        if img.favorite {
            lines.push(Line::from(Span::styled(
                "★ Favorite",
                Style::default().fg(Color::Yellow),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            img.image_url.clone(),
            Style::default().fg(Color::Blue),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
        frame.render_widget(paragraph, area);
    }
}

impl Default for GalleryComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for GalleryComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') => Some(Action::FirstItem),
            KeyCode::Char('G') => Some(Action::LastItem),
            KeyCode::Char('f') => Some(Action::ToggleFavorite),
            KeyCode::Char('d') => Some(Action::DeleteImage),
            KeyCode::Char('F') => Some(Action::ToggleFavoritesFilter),
            KeyCode::Char('x') => Some(Action::ExportGallery),
            KeyCode::Char('i') => Some(Action::ImportGallery),
            KeyCode::Char('C') => Some(Action::OpenClearAllDialog),
            KeyCode::Char('s') => Some(Action::OpenStats),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_images(frame, area, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GenerationSettings;

    fn image(prompt: &str, favorite: bool) -> GeneratedImage {
        let mut img = GeneratedImage::new(
            prompt.to_string(),
            format!("http://x/{}.png", prompt),
            GenerationSettings::default(),
        );
        img.favorite = favorite;
        img
    }

    #[test]
    fn test_visible_honors_favorites_filter() {
        let images = vec![image("a", false), image("b", true), image("c", false)];
        let mut gallery = GalleryComponent::new();

        assert_eq!(gallery.visible(&images).len(), 3);

        gallery.toggle_filter();
        let favorites = gallery.visible(&images);
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].prompt, "b");
    }

    #[test]
    fn test_navigation_clamps_at_bounds() {
        let mut gallery = GalleryComponent::new();
        gallery.previous();
        assert_eq!(gallery.selected_index, 0);

        gallery.next(3);
        gallery.next(3);
        gallery.next(3);
        assert_eq!(gallery.selected_index, 2);

        gallery.select_last(3);
        assert_eq!(gallery.selected_index, 2);
        gallery.select_first();
        assert_eq!(gallery.selected_index, 0);
    }

    #[test]
    fn test_clamp_after_deletion() {
        let mut gallery = GalleryComponent::new();
        gallery.select_last(3);
        gallery.clamp_selection(2);
        assert_eq!(gallery.selected_index, 1);

        gallery.clamp_selection(0);
        assert_eq!(gallery.selected_index, 0);
    }

    #[test]
    fn test_selected_id_follows_filter() {
        let images = vec![image("a", false), image("b", true)];
        let mut gallery = GalleryComponent::new();

        assert_eq!(gallery.selected_id(&images), Some(images[0].id.clone()));

        gallery.toggle_filter();
        assert_eq!(gallery.selected_id(&images), Some(images[1].id.clone()));
    }
}
