use crate::rating::Rating;
use crate::record::BreedRecord;
use crate::tui::app::App;
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SEARCH_PREFIX: &str = " / ";
const LABEL_WIDTH: usize = 18;
/// Borders, origin, three rating rows and the toggle line
const COLLAPSED_CARD_HEIGHT: u16 = 7;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Cards
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_search_bar(frame, app, chunks[0]);
    draw_cards(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.search.focused {
        let cursor_x = search_cursor_x(chunks[0], app.search.cursor_column());
        frame.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }
}

/// Column of the search cursor, kept inside the search bar's border
fn search_cursor_x(area: Rect, column: usize) -> u16 {
    // Border (1) + prefix
    let offset = (1 + SEARCH_PREFIX.len()).saturating_add(column);
    let x = area.x.saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
    x.min(area.right().saturating_sub(2))
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.focused {
        Style::default().fg(colors::ACCENT)
    } else {
        Style::default().fg(colors::MUTED)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(colors::HEADER_BG))
        .title(" Search ");

    let line = if app.search.query.is_empty() {
        Line::from(vec![
            Span::raw(SEARCH_PREFIX),
            Span::styled("Search...", Style::default().fg(colors::MUTED)),
        ])
    } else {
        Line::from(vec![
            Span::raw(SEARCH_PREFIX),
            Span::styled(app.search.query.clone(), Style::default().fg(colors::TEXT)),
        ])
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_cards(frame: &mut Frame, app: &mut App, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let visible = app.catalog.visible();

    if visible.is_empty() {
        let text = if app.catalog.is_loading() {
            "Loading breeds..."
        } else {
            "No breeds loaded"
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(colors::MUTED))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut y = area.y;
    let mut fitted = 0;
    for (index, record) in visible.iter().enumerate().skip(app.cards.scroll_offset) {
        let remaining = area.bottom().saturating_sub(y);
        if remaining == 0 {
            break;
        }

        let expanded = app.catalog.is_expanded(&record.id);
        let is_selected = !app.search.focused && app.cards.selected == Some(index);
        let height = card_height(record, expanded, inner_width);
        let card_area = Rect::new(area.x, y, area.width, height.min(remaining));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::card_border(is_selected)))
            .title(Span::styled(
                format!(" {} ", record.name),
                Style::default()
                    .fg(colors::TEXT)
                    .add_modifier(Modifier::BOLD),
            ));
        let block = if is_selected {
            block.style(Style::default().bg(colors::SELECTED_BG))
        } else {
            block
        };

        let lines = card_lines(record, expanded, inner_width);
        frame.render_widget(Paragraph::new(lines).block(block), card_area);

        if height <= remaining {
            fitted += 1;
        }
        y += card_area.height;
    }

    app.cards.visible_rows = fitted.max(1);
}

/// Rows a card occupies, borders included
pub fn card_height(record: &BreedRecord, expanded: bool, inner_width: usize) -> u16 {
    if expanded {
        let description_rows = description_lines(record, inner_width).len() as u16;
        COLLAPSED_CARD_HEIGHT + 1 + description_rows
    } else {
        COLLAPSED_CARD_HEIGHT
    }
}

fn card_lines(record: &BreedRecord, expanded: bool, inner_width: usize) -> Vec<Line<'static>> {
    let origin = if record.origin.is_empty() {
        "Unknown origin".to_string()
    } else {
        record.origin.to_uppercase()
    };

    let mut lines = vec![
        Line::from(Span::styled(origin, Style::default().fg(colors::MUTED))),
    ];
    lines.extend(
        record
            .scores()
            .into_iter()
            .map(|(label, value)| rating_line(label, value)),
    );

    if expanded {
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().fg(colors::LABEL),
        )));
        lines.extend(
            description_lines(record, inner_width)
                .into_iter()
                .map(|text| Line::from(Span::styled(text, Style::default().fg(colors::TEXT)))),
        );
    }

    let toggle = if expanded { "Read Less \u{2190}" } else { "Read More \u{2192}" };
    lines.push(Line::from(Span::styled(
        toggle,
        Style::default().fg(colors::ACCENT),
    )));
    lines
}

fn description_lines(record: &BreedRecord, inner_width: usize) -> Vec<String> {
    if record.description.is_empty() {
        vec!["(no description)".to_string()]
    } else {
        wrap_text(&record.description, inner_width.max(1))
    }
}

/// Label, stars and raw score. Invalid scores were logged at ingestion.
fn rating_line(label: &str, value: f64) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<width$}", label, width = LABEL_WIDTH),
        Style::default().fg(colors::LABEL),
    )];

    match Rating::new(value) {
        Ok(rating) => {
            spans.push(Span::styled(
                rating.stars(),
                Style::default().fg(colors::score_color(value)),
            ));
            spans.push(Span::styled(
                format!(" {}", rating.label()),
                Style::default().fg(colors::LABEL),
            ));
        }
        Err(_) => {
            spans.push(Span::styled("n/a", Style::default().fg(colors::MUTED)));
        }
    }

    Line::from(spans)
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if current_width > 0 && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
            continue;
        }

        if current_width > 0 {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for c in word.chars() {
            let w = c.width().unwrap_or(0);
            if current_width + w > width && current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let catalog = &app.catalog;
    let limits = catalog.limits();

    let left_text = if catalog.is_loading() {
        format!(" \u{23F3} Loading page {}...", catalog.next_page())
    } else {
        let mut text = format!(
            " {} shown | {} loaded | page {}/{}",
            app.visible_len(),
            catalog.records().len(),
            catalog.next_page().saturating_sub(1).min(limits.page_ceiling),
            limits.page_ceiling
        );
        if catalog.is_unmatched_query() {
            text.push_str(&format!(" | no matches for '{}'", catalog.query()));
        } else if !catalog.query().is_empty() {
            text.push_str(&format!(" | {} matches", catalog.filtered_len()));
        }
        if let Some(at) = app.last_loaded {
            text.push_str(&format!(" | updated {}", at.format("%H:%M:%S")));
        }
        text
    };

    let right_text = " /:Search  \u{2191}\u{2193}:Move  Enter:Details  Esc:Back  Ctrl+Q:Quit ";

    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(colors::TEXT).bg(colors::HEADER_BG));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BreedSource;
    use crate::catalog::CatalogLimits;
    use ratatui::backend::TestBackend;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct NoopSource;

    impl BreedSource for NoopSource {
        fn fetch_page(&self, _page: u32, _limit: u32) -> crate::Result<Vec<Value>> {
            Ok(Vec::new())
        }
    }

    fn app_with(items: &[Value]) -> App {
        let mut app = App::new(Arc::new(NoopSource), CatalogLimits::default());
        app.catalog.load_next_page();
        app.catalog.apply_page(1, items);
        app.cards.reset(app.visible_len());
        app
    }

    fn abyssinian() -> Value {
        json!({
            "name": "Abyssinian",
            "child_friendly": 3,
            "dog_friendly": 4,
            "stranger_friendly": 5,
            "origin": "Egypt",
            "description": "The Abyssinian is easy to care for."
        })
    }

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_card_with_ratings() {
        let mut app = app_with(&[abyssinian()]);
        let screen = render(&mut app, 60, 16);
        assert!(screen.contains("Abyssinian"));
        assert!(screen.contains("EGYPT"));
        assert!(screen.contains("★★★☆☆ 3"));
        assert!(screen.contains("★★★★☆ 4"));
        assert!(screen.contains("★★★★★ 5"));
        assert!(screen.contains("Read More"));
        assert!(!screen.contains("easy to care"));
    }

    #[test]
    fn expanded_card_shows_description() {
        let mut app = app_with(&[abyssinian()]);
        let id = app.catalog.records()[0].id.clone();
        app.catalog.toggle_detail(&id);
        let screen = render(&mut app, 60, 16);
        assert!(screen.contains("Description"));
        assert!(screen.contains("The Abyssinian is easy to care for."));
        assert!(screen.contains("Read Less"));
    }

    #[test]
    fn unmatched_query_still_lists_records() {
        let mut app = app_with(&[abyssinian()]);
        app.catalog.on_query_change("xyz");
        let screen = render(&mut app, 100, 16);
        assert!(screen.contains("Abyssinian"));
        assert!(screen.contains("no matches for 'xyz'"));
    }

    #[test]
    fn draw_records_how_many_cards_fit() {
        let items: Vec<Value> = (0..10).map(|i| json!({ "name": format!("Breed {i}") })).collect();
        let mut app = app_with(&items);
        // 3 search + 1 status leaves 21 rows: three 7-row cards
        render(&mut app, 60, 25);
        assert_eq!(app.cards.visible_rows, 3);
    }

    #[test]
    fn empty_catalog_shows_placeholder() {
        let mut app = App::new(Arc::new(NoopSource), CatalogLimits::default());
        app.catalog.load_next_page();
        let screen = render(&mut app, 60, 10);
        assert!(screen.contains("Loading breeds..."));
        assert!(screen.contains("Loading page 1"));
    }

    #[test]
    fn search_cursor_stays_inside_bar() {
        let area = Rect::new(0, 0, 40, 3);
        assert_eq!(search_cursor_x(area, 0), 1 + SEARCH_PREFIX.len() as u16);
        assert_eq!(search_cursor_x(area, 5), 6 + SEARCH_PREFIX.len() as u16);
        assert_eq!(search_cursor_x(area, 1_000), 38);
        assert_eq!(search_cursor_x(area, usize::MAX - 10), 38);
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("The quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["The quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(lines.iter().all(|l| l.width() <= 10));
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
