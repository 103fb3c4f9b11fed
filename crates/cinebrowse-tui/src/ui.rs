//! Terminal rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use cinebrowse_api::catalog::{CatalogItem, MediaType, Page};

use crate::app::{App, Focus, Screen};
use crate::details::{DetailsAggregator, DetailsView, VideoState, cast_with_profiles};
use crate::format;
use crate::home::HomeRowKind;
use crate::loadable::Loadable;
use crate::paging::PagedQuery;
use crate::sentinel::ScrollCursor;

const HIGHLIGHT: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const HEADING: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const DIM: Style = Style::new().fg(Color::DarkGray);

/// Draws the whole UI. Returns the inner height of the scrolling list.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, app: &App) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search + route
            Constraint::Min(5),    // body
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);

    let body = chunks[1];
    match app.screen() {
        Screen::Home => draw_home(frame, body, app),
        Screen::Explore(loader) => {
            let title = match loader.media_type() {
                Some(MediaType::Tv) => "TV Shows",
                _ => "Movies",
            };
            draw_paged_list(frame, body, title, loader.query(), loader.cursor());
        }
        Screen::Search => {
            let query = app.search().results().key().map_or("", String::as_str);
            let title = format!("Results for \"{query}\"");
            draw_paged_list(
                frame,
                body,
                &title,
                app.search().results(),
                app.search().results_cursor(),
            );
        }
        Screen::Details(aggregator) => draw_details(frame, body, app, aggregator),
        Screen::Invalid { address, error } => {
            let text = vec![
                Line::styled("Page not found", HEADING),
                Line::from(""),
                Line::from(format!("{address}: {error}")),
            ];
            frame.render_widget(
                Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Invalid ")),
                body,
            );
        }
    }

    draw_footer(frame, chunks[2], app);

    if app.search().is_dropdown_open() {
        draw_suggestions(frame, chunks[0], body, app);
    }

    body.height.saturating_sub(2)
}

#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let style = if app.focus() == Focus::SearchInput {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(app.search().input())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, parts[0]);

    let location = app
        .status()
        .map(String::from)
        .or_else(|| app.route().map(ToString::to_string))
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(location).block(Block::default().borders(Borders::ALL).title(" cinebrowse ")),
        parts[1],
    );
}

fn draw_suggestions(frame: &mut Frame, header: Rect, body: Rect, app: &App) {
    let search = app.search();
    let rows = u16::try_from(search.suggestions().len()).unwrap_or(u16::MAX);
    let area = Rect {
        x: header.x,
        y: body.y,
        width: header.width.saturating_mul(3) / 5,
        height: rows.saturating_add(2).min(body.height),
    };
    let items: Vec<ListItem> = if search.suggestions().is_empty() {
        vec![ListItem::new(Line::styled("No results", DIM))]
    } else {
        search
            .suggestions()
            .iter()
            .map(|item| {
                ListItem::new(format!(
                    "{} [{}] {}",
                    item.title,
                    item.media_type,
                    format::release_date(item.release_date.as_deref())
                ))
            })
            .collect()
    };
    let mut state = ListState::default().with_selected(search.highlighted());
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(
        List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Suggestions "))
            .highlight_style(HIGHLIGHT),
        area,
        &mut state,
    );
}

// --- Home ---

#[allow(clippy::indexing_slicing)]
fn draw_home(frame: &mut Frame, area: Rect, app: &App) {
    let rows = app.home().rows();
    let has_banner = !app.carousel().items().is_empty();
    let mut constraints = Vec::with_capacity(rows.len().saturating_add(1));
    if has_banner {
        constraints.push(Constraint::Length(9));
    }
    constraints.extend(rows.iter().map(|_| Constraint::Length(3)));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let cursor = app.home_cursor();
    let offset = usize::from(has_banner);
    if has_banner {
        draw_banner(frame, chunks[0], app, cursor.row == 0);
    }

    for (i, row) in rows.iter().enumerate() {
        let Some(&chunk) = chunks.get(i.saturating_add(offset)) else {
            break;
        };
        let selected_row = cursor.row == i.saturating_add(1);
        let line = match (row.items, row.pending) {
            (_, true) => Line::styled("Loading...", DIM),
            (None, false) => Line::styled("Could not load this row", DIM),
            (Some([]), false) => Line::styled("Nothing here", DIM),
            (Some(items), false) => {
                let ranked = row.kind == HomeRowKind::Trending;
                let spans: Vec<Span> = items
                    .iter()
                    .enumerate()
                    .flat_map(|(col, item)| {
                        let label = if ranked {
                            format!(" {} {} ", format::rank_label(col), item.title)
                        } else {
                            format!(" {} ", item.title)
                        };
                        let style = if selected_row && col == cursor.col {
                            HIGHLIGHT.add_modifier(Modifier::REVERSED)
                        } else {
                            Style::default()
                        };
                        [Span::styled(label, style), Span::raw("|")]
                    })
                    .collect();
                Line::from(spans)
            }
        };
        let border = if selected_row { HIGHLIGHT } else { Style::default() };
        frame.render_widget(
            Paragraph::new(line).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!(" {} ", row.kind.label())),
            ),
            chunk,
        );
    }
}

fn draw_banner(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let carousel = app.carousel();
    let Some(active) = carousel.active_item() else {
        return;
    };
    let border = if focused { HIGHLIGHT } else { Style::default() };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Featured ");

    let mut lines = vec![
        Line::styled(active.title.clone(), HEADING),
        Line::from(format!(
            "{}  ★ {}  {}",
            format::release_date(active.release_date.as_deref()),
            format::rating(active.vote_average),
            format::views(active.popularity)
        )),
        Line::from(active.overview.clone().unwrap_or_default()),
        Line::styled(
            app.context().image_url(active.backdrop_path.as_deref()),
            DIM,
        ),
    ];

    let neighbours: Vec<Span> = carousel
        .materialized()
        .into_iter()
        .filter(|(i, _)| *i != carousel.active_index())
        .map(|(_, item)| Span::styled(format!(" {} ", item.title), DIM))
        .collect();
    lines.push(Line::from(neighbours));

    let indicators: String = (0..carousel.items().len())
        .map(|i| if i == carousel.active_index() { '●' } else { '○' })
        .collect();
    lines.push(Line::from(indicators));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

// --- Lists ---

fn draw_paged_list<K>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    query: &PagedQuery<K>,
    cursor: &ScrollCursor,
) where
    K: Clone + PartialEq + std::fmt::Debug,
{
    let height = usize::from(area.height.saturating_sub(2));
    let mut items: Vec<ListItem> = query
        .items()
        .iter()
        .skip(cursor.offset())
        .take(height)
        .map(|item| ListItem::new(format::card_line(item)))
        .collect();

    if query.is_loading() && items.len() < height {
        items.push(ListItem::new(Line::styled("Loading...", DIM)));
    } else if query.is_failed() && items.len() < height {
        items.push(ListItem::new(Line::styled(
            "Loading stopped after an error",
            DIM,
        )));
    } else if query.is_empty_result() {
        items.push(ListItem::new(Line::styled("No results", DIM)));
    }

    let page_info = match query.total_pages() {
        Some(total) => format!(
            " {title} (page {} of {total}, {} results) ",
            query.current_page(),
            query.total_results().unwrap_or(0)
        ),
        None => format!(" {title} "),
    };

    let selected = cursor.selected().checked_sub(cursor.offset());
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(
        List::new(items)
            .block(Block::default().borders(Borders::ALL).title(page_info))
            .highlight_style(HIGHLIGHT),
        area,
        &mut state,
    );
}

// --- Details ---

#[allow(clippy::indexing_slicing)]
fn draw_details(frame: &mut Frame, area: Rect, app: &App, aggregator: &DetailsAggregator) {
    let details = match aggregator.view() {
        DetailsView::Loading => {
            frame.render_widget(
                Paragraph::new("Loading...").block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }
        DetailsView::Unavailable => {
            frame.render_widget(
                Paragraph::new("No details available")
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }
        DetailsView::Ready(details) => details,
    };

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let crew = aggregator.crew();
    let mut lines = vec![Line::styled(details.title.clone(), HEADING)];
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::styled(String::from(tagline), DIM));
    }
    lines.push(Line::from(format!(
        "{}  ★ {} ({} votes)",
        format::release_date(details.release_date.as_deref()),
        format::rating(details.vote_average),
        format::thousands(details.vote_count)
    )));
    let mut facts = Vec::new();
    if let Some(runtime) = format::runtime(details.runtime) {
        facts.push(runtime);
    }
    if let Some(status) = &details.status {
        facts.push(status.clone());
    }
    if let Some(revenue) = format::revenue(details.revenue) {
        facts.push(revenue);
    }
    if !details.genres.is_empty() {
        facts.push(
            details
                .genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        );
    }
    lines.push(Line::from(facts.join("  |  ")));
    if let Some(director) = &crew.director {
        lines.push(Line::from(format!("Director: {director}")));
    }
    if let Some(writers) = crew.writers_label() {
        lines.push(Line::from(format!("Writers: {writers}")));
    }
    lines.push(Line::styled(
        app.context().image_url(details.poster_path.as_deref()),
        DIM,
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(details.overview.clone().unwrap_or_default()));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(format!(
                " {} ",
                aggregator.media_type()
            ))),
        panes[0],
    );

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(panes[1]);

    let cast: Vec<ListItem> = match aggregator.credits() {
        Loadable::Ready(credits) => cast_with_profiles(credits)
            .into_iter()
            .map(|member| {
                ListItem::new(format!(
                    "{} as {}",
                    member.name,
                    member.character.as_deref().unwrap_or("?")
                ))
            })
            .collect(),
        Loadable::Pending | Loadable::Failed => Vec::new(),
    };
    frame.render_widget(
        List::new(cast).block(Block::default().borders(Borders::ALL).title(" Cast ")),
        side[0],
    );
    draw_related(frame, side[1], " Similar ", aggregator.similar());
    draw_related(frame, side[2], " Recommendations ", aggregator.recommendations());

    if aggregator.is_video_open() {
        draw_video_modal(frame, area, aggregator.video());
    }
}

fn draw_related(frame: &mut Frame, area: Rect, title: &str, state: &Loadable<Page>) {
    let items: Vec<ListItem> = match state {
        Loadable::Pending => vec![ListItem::new(Line::styled("Loading...", DIM))],
        Loadable::Failed => Vec::new(),
        Loadable::Ready(page) => page.items.iter().map(related_line).collect(),
    };
    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn related_line(item: &CatalogItem) -> ListItem<'static> {
    ListItem::new(format!(
        "{} ★ {}",
        item.title,
        format::rating(item.vote_average)
    ))
}

fn draw_video_modal(frame: &mut Frame, area: Rect, state: VideoState<'_>) {
    let width = area.width.saturating_mul(3) / 5;
    let height = 5_u16.min(area.height);
    let popup = Rect {
        x: area.x.saturating_add(area.width.saturating_sub(width) / 2),
        y: area.y.saturating_add(area.height.saturating_sub(height) / 2),
        width,
        height,
    };
    let text = match state {
        VideoState::Closed => return,
        VideoState::Pending => Line::from("Loading video..."),
        VideoState::NoVideo => Line::from("No video available"),
        VideoState::Failed => Line::from("Could not load video"),
        VideoState::Playable(video) => Line::from(format!(
            "{} ({} {})  o: open in browser",
            video.name, video.site, video.key
        )),
    };
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Trailer ")),
        popup,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = match (app.focus(), app.screen()) {
        (Focus::SearchInput, _) => {
            "Type to search | \u{2191}\u{2193}: suggestion | Enter: submit | Esc: close"
        }
        (Focus::Content, Screen::Home) => {
            "\u{2191}\u{2193}: row  \u{2190}\u{2192}: item/slide  1-9: slide  Enter: open  m/t: browse  /: search  q: quit"
        }
        (Focus::Content, Screen::Explore(_) | Screen::Search) => {
            "\u{2191}\u{2193}/j/k: move  PgUp/PgDn: page  Enter: open  Esc: back  /: search  q: quit"
        }
        (Focus::Content, Screen::Details(_)) => {
            "p: play trailer  o: open trailer  Esc: close/back  h: home  q: quit"
        }
        (Focus::Content, Screen::Invalid { .. }) => "Esc: back  h: home  q: quit",
    };
    frame.render_widget(
        Paragraph::new(Line::from(help)).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Instant;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use cinebrowse_api::catalog::TimeWindow;

    use super::*;
    use crate::app::AppSettings;
    use crate::dispatch::{Delivery, Payload, Request};
    use crate::paging::tests::item;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| {
                draw(frame, app);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_home_renders_loading_rows() {
        // Arrange
        let (app, _) = App::new(AppSettings::default(), Instant::now());

        // Act
        let screen = render(&app);

        // Assert
        assert!(!screen.contains("Featured"));
        assert!(screen.contains("Now Playing"));
        assert!(screen.contains("Loading..."));
    }

    #[test]
    fn test_banner_appears_once_trending_arrives() {
        // Arrange
        let now = Instant::now();
        let (mut app, _) = App::new(AppSettings::default(), now);

        // Act
        app.apply(
            Delivery {
                request: Request::Trending(TimeWindow::Week),
                outcome: Ok(Payload::Items(vec![item(1)])),
            },
            now,
        );
        let screen = render(&app);

        // Assert
        assert!(screen.contains("Featured"));
        assert!(screen.contains("Item 1"));
    }

    #[test]
    fn test_invalid_screen_shows_error() {
        // Arrange
        let (mut app, _) = App::new(AppSettings::default(), Instant::now());
        app.open_address("/person/1");

        // Act
        let screen = render(&app);

        // Assert
        assert!(screen.contains("unsupported media type: person"));
    }
}
