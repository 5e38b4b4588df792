use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use assist_chords::config::AppConfig;
use assist_chords::data_mapper::DataMapper;
use assist_chords::goal_record::load_goal_records;
use assist_chords::palette::{ArcColor, arc_colors_seeded};
use assist_chords::viewer::{Focus, ViewerState};

struct App {
    mapper: DataMapper,
    state: ViewerState,
    should_quit: bool,
}

impl App {
    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Tab => self.state.toggle_focus(),
            KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char(' ') => {
                if self.state.focus == Focus::Players {
                    self.state.toggle_highlight();
                }
            }
            KeyCode::Esc => {
                if self.state.highlighted.is_some() {
                    self.state.highlighted = None;
                    self.state.push_log("[INFO] Highlight cleared");
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_click(&mut self, screen: Rect, column: u16, row: u16) {
        let list = player_list_area(screen);
        let inside_x = column >= list.x && column < list.x + list.width;
        let inside_y = row >= list.y && row < list.y + list.height;
        if !inside_x || !inside_y {
            return;
        }
        let (start, end) = visible_range(
            self.state.selected_player,
            self.state.players.len(),
            list.height as usize,
        );
        let idx = start + (row - list.y) as usize;
        if idx < end {
            self.state.click_player(idx);
        }
    }
}

fn main() -> Result<()> {
    sensible_env_logger::init!();

    let mut cfg = AppConfig::from_env();
    if let Some(path) = parse_csv_arg() {
        cfg.goals_csv = path;
    }

    let records = load_goal_records(&cfg.goals_csv)?;
    let mut mapper = DataMapper::with_mode(cfg.connection_mode);
    mapper.set_source(records);
    let players = mapper.player_count()?;
    let colors = arc_colors_seeded(players, cfg.palette_seed);
    let state = ViewerState::from_mapper(&mapper, colors)?;

    let mut app = App {
        mapper,
        state,
        should_quit: false,
    };

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn parse_csv_arg() -> Option<PathBuf> {
    std::env::args()
        .skip(1)
        .find(|arg| !arg.trim().is_empty() && !arg.starts_with('-'))
        .map(PathBuf::from)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let screen = terminal.size()?;
                    app.on_click(screen, mouse.column, mouse.row);
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn screen_rows(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area)
}

fn body_columns(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(34),
            Constraint::Percentage(38),
        ])
        .split(area)
}

/// Rows of the player list inside its border, as drawn by `ui`.
fn player_list_area(screen: Rect) -> Rect {
    let columns = body_columns(screen_rows(screen)[1]);
    Block::default().borders(Borders::ALL).inner(columns[0])
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = screen_rows(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = body_columns(chunks[1]);

    render_players(frame, columns[0], &app.state);
    render_chords(frame, columns[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(4),
            Constraint::Length(6),
        ])
        .split(columns[2]);
    render_info(frame, right[0], app);
    render_partners(frame, right[1], app);
    render_console(frame, right[2], &app.state);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &ViewerState) -> String {
    let last = state.last_update.as_deref().unwrap_or("-");
    format!(
        "  ASSIST CHORDS | {} goals | last update: {last}",
        state.total_goals
    )
}

fn footer_text(state: &ViewerState) -> String {
    match state.focus {
        Focus::Players => {
            "j/k/↑/↓ Move | Enter/h/Click Highlight | Esc Clear | Tab Chords | ? Help | q Quit"
                .to_string()
        }
        Focus::Chords => "j/k/↑/↓ Move | Esc Clear | Tab Players | ? Help | q Quit".to_string(),
    }
}

fn arc_color(color: Option<ArcColor>) -> Color {
    color
        .map(|c| Color::Rgb(c.r, c.g, c.b))
        .unwrap_or(Color::Gray)
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}

fn render_players(frame: &mut Frame, area: Rect, state: &ViewerState) {
    let block = focus_block("Players", state.focus == Focus::Players);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.players.is_empty() {
        let empty = Paragraph::new("No players on the score sheet")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.selected_player, state.players.len(), visible);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let mut name_style = Style::default();
            if idx == state.selected_player {
                name_style = name_style.fg(Color::White).bg(Color::DarkGray);
            }
            if state.highlighted == Some(idx) {
                name_style = name_style.add_modifier(Modifier::BOLD);
            }
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(arc_color(state.player_color(idx)))),
                Span::styled(state.players[idx].clone(), name_style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_chords(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let block = focus_block("Chords", state.focus == Focus::Chords);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chords = state.visible_chords();
    if chords.is_empty() {
        let empty =
            Paragraph::new("No connections").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.selected_chord, chords.len(), visible);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let chord = chords[idx];
            let source = name_at(state, chord.source);
            let label = if chord.is_self() {
                format!("{source} (unassisted)")
            } else {
                format!("{source} - {}", name_at(state, chord.target))
            };
            let style = if state.focus == Focus::Chords && idx == state.selected_chord {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(
                    format!("{:>3} ", chord.value),
                    Style::default().fg(arc_color(state.player_color(chord.target))),
                ),
                Span::styled(label, style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn name_at(state: &ViewerState, index: usize) -> &str {
    state.players.get(index).map(String::as_str).unwrap_or("?")
}

fn render_info(frame: &mut Frame, area: Rect, app: &App) {
    let text = match app.state.focus {
        Focus::Players => {
            let name = name_at(&app.state, app.state.selected_player);
            match app.mapper.player_info(app.state.selected_player) {
                Ok(info) => format!("{name}\n\n{info}"),
                Err(err) => format!("{err}"),
            }
        }
        Focus::Chords => match app.state.selected_chord() {
            Some(chord) => app
                .mapper
                .chord_info(&chord)
                .unwrap_or_else(|err| err.to_string()),
            None => "No chord selected".to_string(),
        },
    };
    let info = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Info").borders(Borders::ALL));
    frame.render_widget(info, area);
}

fn render_partners(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Connections").borders(Borders::ALL);
    let idx = app.state.selected_player;
    let partners = app.mapper.partners(idx).unwrap_or_default();
    if partners.is_empty() {
        let empty = Paragraph::new("No shared goals")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let max = partners.first().map(|(_, count)| u64::from(*count)).unwrap_or(1);
    let bars: Vec<Bar> = partners
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|(other, count)| {
            Bar::default()
                .value(u64::from(*count))
                .label(Line::from(name_at(&app.state, *other).to_string()))
                .text_value(count.to_string())
                .style(Style::default().fg(arc_color(app.state.player_color(*other))))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(max);
    frame.render_widget(chart, area);
}

fn render_console(frame: &mut Frame, area: Rect, state: &ViewerState) {
    let visible = area.height.saturating_sub(2) as usize;
    let text = state
        .logs
        .iter()
        .rev()
        .take(visible)
        .rev()
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    let console = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Assist Chords - Help",
        "",
        "Players:",
        "  j/k or ↑/↓   Move",
        "  Enter / h    Highlight player's chords (again to clear)",
        "  Click        Same as Enter on the clicked player",
        "  Esc          Clear highlight",
        "",
        "Global:",
        "  Tab          Switch players / chords",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
