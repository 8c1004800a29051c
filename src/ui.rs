use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, Focus};
use crate::storage::KeyValueStore;
use crate::units::temperature;
use crate::view::{Display, RecentSection, SearchButton};
use crate::weather::{icon_glyph, ForecastDay, WeatherSnapshot};

const HELP: &str = " Enter search · Tab recent searches · Ctrl+D clear history · Esc quit";
const CONFIRM_CLEAR: &str = " Clear search history? (y/n)";

fn panel<'a>(title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, Style::default().fg(Color::Yellow)))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

fn display_input<'a>(input: &'a str, focused: bool) -> Paragraph<'a> {
    let border = if focused { Color::Yellow } else { Color::Cyan };
    Paragraph::new(Line::from(vec![Span::raw(" "), Span::raw(input)]))
        .block(panel(" City ").border_style(Style::default().fg(border)))
}

fn display_search_button(button: &SearchButton) -> Paragraph<'static> {
    let style = if button.enabled {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(Span::styled(format!("[ {} ]", button.label), style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .border_type(BorderType::Rounded),
        )
}

fn display_welcome() -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "🌤 Welcome to SkyFetch",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Search a city to get weather"),
        Line::from(Span::styled(
            "Try: London, Tokyo, Delhi",
            Style::default().fg(Color::Green),
        )),
    ])
    .alignment(Alignment::Center)
    .block(panel(" SkyFetch "))
}

fn display_loading() -> Paragraph<'static> {
    Paragraph::new(vec![Line::from(""), Line::from("Fetching weather data...")])
        .alignment(Alignment::Center)
        .block(panel(" SkyFetch "))
}

fn display_error(message: &str) -> Paragraph<'_> {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "❌ Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
    ])
    .alignment(Alignment::Center)
    .block(panel(" SkyFetch "))
}

fn display_current_conditions(snapshot: &WeatherSnapshot) -> Table<'_> {
    let value = Style::default().fg(Color::Green);
    let rows = vec![
        Row::new(vec![Cell::from("")]),
        Row::new(vec![
            Cell::from(" City"),
            Cell::from(snapshot.city.as_str()).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Row::new(vec![
            Cell::from(" Temperature"),
            Cell::from(temperature::display(snapshot.temperature)).style(value),
        ]),
        Row::new(vec![
            Cell::from(" Conditions"),
            Cell::from(snapshot.description.as_str()).style(value),
        ]),
        Row::new(vec![
            Cell::from(" Icon"),
            Cell::from(format!("{} {}", icon_glyph(&snapshot.icon), snapshot.icon)).style(value),
        ]),
    ];

    Table::new(rows, [Constraint::Length(13), Constraint::Min(10)])
        .block(panel(" Current Conditions "))
}

fn display_day_card(day: &ForecastDay) -> Paragraph<'_> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            day.label.as_str(),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(format!("{} {}", icon_glyph(&day.icon), day.icon)),
        Line::from(Span::styled(
            temperature::display(day.temperature),
            Style::default().fg(Color::Green),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .border_type(BorderType::Rounded),
    )
}

fn draw_forecast(f: &mut Frame, days: &[ForecastDay], area: Rect) {
    let block = panel(" 5-Day Forecast ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if days.is_empty() {
        return;
    }

    let n = days.len() as u32;
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, n); days.len()])
        .split(inner);
    for (day, card) in days.iter().zip(cards.iter()) {
        f.render_widget(display_day_card(day), *card);
    }
}

fn draw_recent(f: &mut Frame, recent: &RecentSection, focus: Focus, selected: usize, area: Rect) {
    let items: Vec<ListItem> = recent
        .entries
        .iter()
        .map(|city| ListItem::new(format!(" {city}")))
        .collect();

    let mut block = panel(" Recent Searches ");
    if focus == Focus::Recent {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">");

    let mut state = ListState::default();
    if focus == Focus::Recent {
        state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let view = app.view();

    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(f.area());

    let search_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(18)])
        .split(vert_layout[0]);

    let input_focused = app.focus() == Focus::Input && !app.confirming_clear();
    f.render_widget(display_input(app.input(), input_focused), search_row[0]);
    f.render_widget(display_search_button(&view.search_button), search_row[1]);
    if input_focused {
        let typed = u16::try_from(Span::raw(app.input()).width()).unwrap_or(u16::MAX);
        let x = search_row[0].x.saturating_add(2).saturating_add(typed);
        let max_x = search_row[0].right().saturating_sub(2);
        f.set_cursor_position((x.min(max_x), search_row[0].y + 1));
    }

    let body = if view.recent.visible {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(vert_layout[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(vert_layout[1])
    };

    match &view.display {
        Display::Welcome => f.render_widget(display_welcome(), body[0]),
        Display::Loading => f.render_widget(display_loading(), body[0]),
        Display::Error(message) => f.render_widget(display_error(message), body[0]),
        Display::Weather(snapshot) => {
            f.render_widget(display_current_conditions(snapshot), body[0])
        }
    }

    if view.recent.visible {
        draw_recent(f, &view.recent, app.focus(), app.selected(), body[1]);
    }

    draw_forecast(f, &view.forecast, vert_layout[2]);

    let footer = if app.confirming_clear() {
        Paragraph::new(Span::styled(
            CONFIRM_CLEAR,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Paragraph::new(Span::styled(HELP, Style::default().fg(Color::DarkGray)))
    };
    f.render_widget(footer, vert_layout[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FetchOutcome;
    use crate::openweather::{current, forecast, WeatherReport};
    use crate::storage::MemoryStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen<S: KeyValueStore>(app: &App<S>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_welcome() {
        let mut app = App::new(MemoryStore::new());
        app.startup(None);
        let text = screen(&app);
        assert!(text.contains("Welcome to SkyFetch"));
        assert!(text.contains("[ Search ]"));
        assert!(!text.contains("Recent Searches"));
    }

    #[test]
    fn test_draw_weather_and_forecast() {
        let mut app = App::new(MemoryStore::new());
        app.set_input("London");
        let request = app.submit().unwrap();
        assert!(screen(&app).contains("[ Searching... ]"));

        let list = (15..18)
            .map(|day| forecast::Sample {
                dt_txt: format!("2024-01-{day} 12:00:00"),
                main: forecast::Main { temp: 7.5 },
                weather: vec![forecast::Icon {
                    icon: "10d".to_string(),
                }],
            })
            .collect();
        app.complete_search(FetchOutcome {
            token: request.token,
            result: Ok(WeatherReport {
                current: current::Conditions {
                    name: "London".to_string(),
                    main: current::Main { temp: 15.6 },
                    weather: vec![current::Summary {
                        description: "clear sky".to_string(),
                        icon: "01d".to_string(),
                    }],
                },
                forecast: forecast::Forecast { list },
            }),
        });

        let text = screen(&app);
        assert!(text.contains("16°C"));
        assert!(text.contains("clear sky"));
        assert!(text.contains("Mon Jan 15"));
        assert!(text.contains("Wed Jan 17"));
        assert!(text.contains("8°C"));
        assert!(text.contains("Recent Searches"));
    }

    fn cursor_after(input: &str) -> u16 {
        let mut app = App::new(MemoryStore::new());
        app.set_input(input);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        terminal.get_cursor_position().unwrap().x
    }

    #[test]
    fn test_cursor_tracks_display_width() {
        // margin 1, border 1, leading space 1
        assert_eq!(cursor_after(""), 3);
        assert_eq!(cursor_after("Rome"), 7);
        assert_eq!(cursor_after("東京"), 7);
    }

    #[test]
    fn test_cursor_clamped_for_long_input() {
        let long = "a".repeat(70_000);
        let x = cursor_after(&long);
        assert!(x < 100);
    }

    #[test]
    fn test_draw_error_and_confirm_prompt() {
        let mut app = App::new(MemoryStore::new());
        app.set_input("x");
        app.submit();
        app.request_clear_history();
        let text = screen(&app);
        assert!(text.contains("City name too short"));
        assert!(text.contains("Clear search history? (y/n)"));
    }
}
