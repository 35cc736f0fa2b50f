use std::fs::{self, File};
use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use env_logger::Env;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table,
};

use fpl_analyzer::analysis::TeamReport;
use fpl_analyzer::config::AnalyzerConfig;
use fpl_analyzer::http_cache::app_cache_dir;
use fpl_analyzer::render::format_cost;
use fpl_analyzer::squad_ranker::SquadRow;
use fpl_analyzer::state::{AnalysisStatus, AppState, Delta, ProviderCommand, apply_delta};
use fpl_analyzer::worker::spawn_analysis_worker;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char(c) if c.is_ascii_digit() => self.state.push_input(c),
            KeyCode::Backspace => self.state.pop_input(),
            KeyCode::Enter => self.request_analysis(),
            _ => {}
        }
    }

    fn request_analysis(&mut self) {
        let Some(team_id) = self.state.team_id() else {
            self.state.push_log("[INFO] Enter a numeric FPL team id first");
            return;
        };
        if self.state.is_loading() {
            self.state.push_log("[INFO] Analysis already running");
            return;
        }
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Analysis unavailable");
            return;
        };
        if tx.send(ProviderCommand::Analyze { team_id }).is_err() {
            self.state.push_log("[WARN] Analysis request failed");
        } else {
            self.state.status = AnalysisStatus::Loading { team_id };
        }
    }
}

fn main() -> io::Result<()> {
    let config = AnalyzerConfig::from_env();
    init_file_logger();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_analysis_worker(tx, cmd_rx, config);

    let mut app = App::new(Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

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

// stderr belongs to the terminal UI, so log lines go to a file in the cache dir.
fn init_file_logger() {
    let Some(dir) = app_cache_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("fpl_analyzer.log")) else {
        return;
    };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
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
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(header, chunks[0]);

    let input = Paragraph::new(format!("{}_", app.state.team_input))
        .block(Block::default().title("FPL Team ID").borders(Borders::ALL));
    frame.render_widget(input, chunks[1]);

    match &app.state.status {
        AnalysisStatus::Idle => {
            render_message(frame, chunks[2], "Type a team id and press Enter")
        }
        AnalysisStatus::Loading { team_id } => {
            render_message(frame, chunks[2], &format!("Analysing team {team_id}..."))
        }
        AnalysisStatus::Failed { message, .. } => {
            let text = Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red));
            frame.render_widget(text, chunks[2]);
        }
        AnalysisStatus::Ready(report) => render_report(frame, chunks[2], report),
    }

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    match state.report() {
        Some(report) => format!(
            "FPL TEAM ANALYZER | Team {} | Current Gameweek: {}",
            report.team_id, report.current_period
        ),
        None => "FPL TEAM ANALYZER".to_string(),
    }
}

fn footer_text(state: &AppState) -> String {
    let last = state.logs.back().map(String::as_str).unwrap_or("");
    format!("0-9 Team id | Enter Analyse | Backspace Edit | ? Help | q Quit   {last}")
}

fn render_message(frame: &mut Frame, area: Rect, text: &str) {
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_report(frame: &mut Frame, area: Rect, report: &TeamReport) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(1)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    frame.render_widget(trend_chart(report), top[0]);
    frame.render_widget(candidate_table(report), top[1]);
    frame.render_widget(
        squad_table("Best Performing Players", &report.best.rows()),
        bottom[0],
    );
    frame.render_widget(
        squad_table("Worst Performing Players", &report.worst.rows()),
        bottom[1],
    );
}

fn trend_chart(report: &TeamReport) -> BarChart<'static> {
    let bars: Vec<Bar> = report
        .trend
        .iter()
        .map(|rec| {
            Bar::default()
                .value(rec.points.max(0) as u64)
                .label(Line::from(format!("GW{}", rec.period)))
                .style(Style::default().fg(Color::Blue))
        })
        .collect();

    BarChart::default()
        .block(
            Block::default()
                .title(format!("Points Trend (Last {} Gameweeks)", report.trend.len()))
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1)
}

fn squad_table(title: &str, rows: &[SquadRow]) -> Table<'static> {
    let body: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.name.clone()),
                Cell::from(format!("{:.1}", r.form)),
                Cell::from(format_cost(u64::from(r.cost))),
            ])
        })
        .collect();
    Table::new(
        body,
        [Constraint::Min(14), Constraint::Length(6), Constraint::Length(7)],
    )
    .header(header_row(&["Player", "Form", "Cost"]))
    .block(Block::default().title(title.to_string()).borders(Borders::ALL))
}

fn candidate_table(report: &TeamReport) -> Table<'static> {
    let t = report.recommendation.thresholds;
    let title = format!(
        "Recommended Transfers (Differentials) | budget {} | form > {:.2} | owned < {:.0}%",
        format_cost(t.budget),
        t.form_floor,
        t.ownership_ceiling
    );
    let body: Vec<Row> = report
        .recommendation
        .rows()
        .into_iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.name),
                Cell::from(format!("{:.1}", r.form)),
                Cell::from(format_cost(u64::from(r.cost))),
                Cell::from(format!("{:.1}", r.ownership)),
            ])
        })
        .collect();
    Table::new(
        body,
        [
            Constraint::Min(14),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header_row(&["Player", "Form", "Cost", "Owned%"]))
    .block(Block::default().title(title).borders(Borders::ALL))
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    Row::new(titles.iter().map(|t| Cell::from(*t)))
        .style(Style::default().add_modifier(Modifier::BOLD))
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FPL Team Analyzer - Help",
        "",
        "  0-9          Type team id",
        "  Backspace    Delete digit",
        "  Enter        Run analysis",
        "  ?            Toggle help",
        "  q / Esc      Quit",
        "",
        "Recommendations fit the combined cost of your worst players,",
        "beat their average form and stay under the ownership ceiling.",
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
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
