use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use nfl_dashboard::config::DashboardConfig;
use nfl_dashboard::dashboard::{Dashboard, FetchBatch, SectionReport, fetch_all};
use nfl_dashboard::feed::{Endpoint, Feed, feed_from_config};
use nfl_dashboard::leaders::{LeaderCategory, TopPlayer};
use nfl_dashboard::news::MAX_ARTICLES;
use nfl_dashboard::sections::{Section, SectionState, SectionStatus, StandingsSection};
use nfl_dashboard::view::Node;

const MAX_LOGS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Games,
    Standings,
    Leaders,
    News,
}

struct App {
    dashboard: Dashboard,
    feed: Arc<dyn Feed>,
    parallelism: usize,
    screen: Screen,
    selected_division: usize,
    loading: bool,
    logs: VecDeque<String>,
    help_overlay: bool,
    should_quit: bool,
    batch_tx: mpsc::Sender<FetchBatch>,
}

impl App {
    fn new(config: &DashboardConfig, batch_tx: mpsc::Sender<FetchBatch>) -> Self {
        Self {
            dashboard: Dashboard::new(config.standings_source),
            feed: feed_from_config(config),
            parallelism: config.fetch_parallelism,
            screen: Screen::Games,
            selected_division: 0,
            loading: false,
            logs: VecDeque::new(),
            help_overlay: false,
            should_quit: false,
            batch_tx,
        }
    }

    fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push_back(line.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.screen = Screen::Games,
            KeyCode::Char('2') => self.screen = Screen::Standings,
            KeyCode::Char('3') => self.screen = Screen::Leaders,
            KeyCode::Char('4') => self.screen = Screen::News,
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_refresh(),
            KeyCode::Char('j') | KeyCode::Down => self.move_division(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_division(-1),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected_division(),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                if self.screen == Screen::Leaders {
                    self.dashboard.leaders.next_tab();
                }
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                if self.screen == Screen::Leaders {
                    self.dashboard.leaders.prev_tab();
                }
            }
            KeyCode::Char('?') => self.help_overlay = !self.help_overlay,
            _ => {}
        }
    }

    fn move_division(&mut self, step: isize) {
        if self.screen != Screen::Standings {
            return;
        }
        let total = self.dashboard.standings.division_keys().len();
        if total == 0 {
            return;
        }
        let next = (self.selected_division as isize + step).rem_euclid(total as isize);
        self.selected_division = next as usize;
    }

    fn toggle_selected_division(&mut self) {
        if self.screen != Screen::Standings {
            return;
        }
        let keys = self.dashboard.standings.division_keys();
        let Some(key) = keys.get(self.selected_division) else {
            return;
        };
        if self.dashboard.standings.toggle_division(key).is_none() {
            self.push_log("[INFO] Live standings have no accordions");
        }
    }

    fn request_refresh(&mut self) {
        if self.loading {
            self.push_log("[INFO] Refresh already in flight");
            return;
        }
        self.loading = true;
        self.push_log("[INFO] Refresh requested");
        spawn_loader(
            Arc::clone(&self.feed),
            self.dashboard.endpoints(),
            self.parallelism,
            self.batch_tx.clone(),
        );
    }

    fn on_batch(&mut self, batch: FetchBatch) {
        self.loading = false;
        let reports = self.dashboard.apply(batch, Local::now().naive_local());
        for report in reports {
            self.push_log(report_line(&report));
        }
    }
}

fn report_line(report: &SectionReport) -> String {
    match &report.status {
        SectionStatus::Loaded => format!("[INFO] {} loaded", report.section),
        SectionStatus::Empty => format!("[INFO] {}: no data", report.section),
        SectionStatus::Pending => format!("[INFO] {} pending", report.section),
        SectionStatus::Failed(err) => format!("[WARN] {} failed: {err}", report.section),
    }
}

fn spawn_loader(
    feed: Arc<dyn Feed>,
    endpoints: Vec<Endpoint>,
    parallelism: usize,
    tx: mpsc::Sender<FetchBatch>,
) {
    thread::spawn(move || {
        let batch = fetch_all(feed.as_ref(), &endpoints, parallelism);
        let _ = tx.send(batch);
    });
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = DashboardConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let mut app = App::new(&config, tx);
    app.request_refresh();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<FetchBatch>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(batch) = rx.try_recv() {
            app.on_batch(batch);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
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

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.screen {
        Screen::Games => render_games(frame, chunks[1], app),
        Screen::Standings => render_standings(frame, chunks[1], app),
        Screen::Leaders => render_leaders(frame, chunks[1], app),
        Screen::News => render_news(frame, chunks[1], app),
    }

    let console = Paragraph::new(console_text(app))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(app.screen)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let tabs = [
        (Screen::Games, "1 Games"),
        (Screen::Standings, "2 Standings"),
        (Screen::Leaders, "3 Leaders"),
        (Screen::News, "4 News"),
    ]
    .iter()
    .map(|(screen, label)| {
        if *screen == app.screen {
            format!("[{label}]")
        } else {
            format!(" {label} ")
        }
    })
    .collect::<Vec<_>>()
    .join(" ");
    let stamp = if app.loading {
        "Loading...".to_string()
    } else {
        app.dashboard
            .last_updated()
            .unwrap_or("Not loaded yet")
            .to_string()
    };
    format!("NFL STATS DASHBOARD | {stamp}\n{tabs}")
}

fn footer_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Standings => "j/k Move | Enter Toggle division | r Refresh | ? Help | q Quit",
        Screen::Leaders => "←/→ Tab category | r Refresh | ? Help | q Quit",
        Screen::Games | Screen::News => "1-4 Sections | r Refresh | ? Help | q Quit",
    }
}

/// Text of one of a section's containers, used while it has no data.
fn section_message(section: &dyn Section, container: usize) -> String {
    section
        .containers()
        .into_iter()
        .nth(container)
        .map(|(_, nodes)| {
            nodes
                .iter()
                .map(Node::text_content)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

fn message_paragraph(text: String) -> Paragraph<'static> {
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

fn render_games(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Recent Games").borders(Borders::ALL);
    let SectionState::Loaded(games) = &app.dashboard.games.state else {
        frame.render_widget(
            message_paragraph(section_message(&app.dashboard.games, 0)).block(block),
            area,
        );
        return;
    };

    let mut lines = Vec::new();
    for game in games {
        let status_style = if game.status.is_live {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(
            game.status.description.clone(),
            status_style,
        )));
        for (side, winner) in [
            (game.away.as_ref(), game.away_winner),
            (game.home.as_ref(), game.home_winner),
        ] {
            let (abbr, score) = match side {
                Some(c) => (
                    c.abbreviation.clone(),
                    c.score.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| "-".to_string()),
                ),
                None => ("TBD".to_string(), "-".to_string()),
            };
            let style = if winner {
                Style::default().add_modifier(Modifier::BOLD).fg(Color::Green)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(format!("  {abbr:<5} {score:>3}"), style)));
        }
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_standings(frame: &mut Frame, area: Rect, app: &App) {
    let standings = &app.dashboard.standings;
    let block = Block::default().title("Standings").borders(Borders::ALL);
    if let StandingsSection::Live { state } = standings {
        if state.loaded().is_none() {
            frame.render_widget(
                message_paragraph(section_message(standings, 0)).block(block),
                area,
            );
            return;
        }
    }

    let selected_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    let mut lines = Vec::new();
    let mut idx = 0usize;
    for conference in standings.conferences() {
        lines.push(Line::from(Span::styled(
            conference.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for division in &conference.divisions {
            let key = nfl_dashboard::accordion::division_key(&conference.name, &division.name);
            let is_static = matches!(standings, StandingsSection::Static { .. });
            let open = !is_static || standings.is_division_open(&key);
            let arrow = if open { "▼" } else { "▶" };
            let style = if is_static && idx == app.selected_division {
                selected_style
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!(" {arrow} {}", division.name),
                style,
            )));
            idx += 1;
            if !open {
                continue;
            }
            for (rank, entry) in division.entries.iter().enumerate() {
                let badge = entry.playoff.map(|tag| tag.badge()).unwrap_or("");
                let line = if is_static {
                    format!(
                        "    {} {:<4} {:<7} {:<4} {}",
                        rank + 1,
                        entry.abbr,
                        entry.record(),
                        entry.div_record,
                        badge
                    )
                } else {
                    format!(
                        "    {:<4} {:>2} {:>2} {:>2} {}",
                        entry.abbr, entry.wins, entry.losses, entry.ties, entry.win_percent
                    )
                };
                lines.push(Line::from(line));
            }
        }
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_leaders(frame: &mut Frame, area: Rect, app: &App) {
    let leaders = &app.dashboard.leaders;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let players_block = Block::default()
        .title("Top Players of the Week")
        .borders(Borders::ALL);
    let players = leaders
        .state
        .loaded()
        .map(|data| data.top_players.as_slice())
        .unwrap_or_default();
    let players_widget = if players.is_empty() {
        message_paragraph(section_message(leaders, 0))
    } else {
        Paragraph::new(top_player_lines(players).join("\n"))
    };
    frame.render_widget(players_widget.block(players_block), rows[0]);

    let tabs: Vec<Span> = LeaderCategory::ALL
        .iter()
        .map(|category| {
            let label = format!(" {} ", category.label());
            if *category == leaders.active_tab() {
                Span::styled(label, Style::default().fg(Color::White).bg(Color::Blue))
            } else {
                Span::raw(label)
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(tabs)), rows[1]);

    let Some(data) = leaders.state.loaded() else {
        let block = Block::default().title("Leaders").borders(Borders::ALL);
        frame.render_widget(message_paragraph(section_message(leaders, 1)).block(block), rows[2]);
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    let category = leaders.active_tab();
    let chart_block = Block::default()
        .title(format!("{} Yards", category.label()))
        .borders(Borders::ALL);
    match leaders.chart(category) {
        Some(chart) => {
            let bars: Vec<Bar> = chart
                .spec
                .bars
                .iter()
                .map(|bar| {
                    Bar::default()
                        .label(Line::from(short_name(&bar.label)))
                        .value(bar.value.max(0.0).round() as u64)
                })
                .collect();
            let widget = BarChart::default()
                .block(chart_block)
                .data(BarGroup::default().bars(&bars))
                .direction(Direction::Horizontal)
                .bar_width(1)
                .bar_gap(0)
                .bar_style(Style::default().fg(Color::Blue));
            frame.render_widget(widget, cols[0]);
        }
        None => frame.render_widget(Paragraph::new("").block(chart_block), cols[0]),
    }

    let records = data.records(category);
    let lines: Vec<Line> = if records.is_empty() {
        vec![Line::from(nfl_dashboard::render::NO_DATA)]
    } else {
        records
            .iter()
            .enumerate()
            .map(|(idx, r)| {
                Line::from(format!(
                    "{:>2} {:<22} {:<4} {}",
                    idx + 1,
                    r.name,
                    r.team,
                    r.display
                ))
            })
            .collect()
    };
    let table = Paragraph::new(lines).block(Block::default().title("Top 10").borders(Borders::ALL));
    frame.render_widget(table, cols[1]);
}

/// One line per category leader: banner, name, team, and stat.
fn top_player_lines(players: &[TopPlayer]) -> Vec<String> {
    players
        .iter()
        .map(|p| {
            format!(
                "{} Leader | {} ({}) | {} {}",
                p.category.label(),
                p.name,
                p.team,
                p.stat,
                p.stat_label
            )
        })
        .collect()
}

fn short_name(full: &str) -> String {
    full.rsplit(' ').next().unwrap_or(full).to_string()
}

fn render_news(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("NFL News").borders(Borders::ALL);
    let SectionState::Loaded(articles) = &app.dashboard.news.state else {
        frame.render_widget(
            message_paragraph(section_message(&app.dashboard.news, 0)).block(block),
            area,
        );
        return;
    };
    let mut lines = Vec::new();
    for article in articles.iter().take(MAX_ARTICLES) {
        lines.push(Line::from(Span::styled(
            article.headline.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(article.description.clone()));
        lines.push(Line::from(Span::styled(
            article.link.clone(),
            Style::default().fg(Color::Blue),
        )));
        lines.push(Line::from(""));
    }
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn console_text(app: &App) -> String {
    if app.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = app.logs.len().saturating_sub(3);
    app.logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "NFL Stats Dashboard - Help",
        "",
        "Global:",
        "  1-4          Games / Standings / Leaders / News",
        "  r            Refresh all sections",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Standings:",
        "  j/k or ↑/↓   Select division",
        "  Enter/Space  Open or close division",
        "",
        "Leaders:",
        "  ←/→ or Tab   Switch category",
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
