use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tictactoe_core::{AppConfig, Cell, Coord, GameEngine, GameResult, Mark, MoveOutcome, Phase};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    blink::{BlinkStep, BlinkTimer},
    block_font,
    theme::Theme,
};

const TICK_RATE: Duration = Duration::from_millis(250);
const SIDE_PANEL_WIDTH: u16 = 34;
const NEW_GAME_BUTTON_WIDTH: u16 = 14;
const TITLE: &str = "TIC TAC TOE";

#[derive(Debug)]
enum AppEvent {
    Input(Event),
    Tick,
    Blink(BlinkStep),
}

/// Terminal frontend for a [`GameEngine`].
pub struct TicTacToeApp {
    engine: GameEngine,
    config: AppConfig,
    theme: Theme,
    state: UiState,
    blink: BlinkTimer,
    event_tx: Option<mpsc::Sender<AppEvent>>,
}

impl TicTacToeApp {
    pub fn new(config: AppConfig) -> Self {
        let (theme, notes) = Theme::from_config(&config.theme);
        let mut state = UiState::default();
        if notes.is_empty() {
            state.set_status(format!("{:?} theme. X moves first.", theme.name));
        } else {
            state.set_status(notes.join(" • "));
        }
        Self {
            engine: GameEngine::with_history_limit(config.history.limit),
            config,
            theme,
            state,
            blink: BlinkTimer::default(),
            event_tx: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);
        info!("event loop started");

        let result = self.event_loop(&mut terminal, &mut event_rx).await;
        if let Err(err) = &result {
            error!(?err, "event loop failed");
        }

        self.blink.cancel();
        self.event_tx = None;
        restore_terminal(&mut terminal)?;
        info!(score = ?self.engine.score(), "exiting");
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        event_rx: &mut mpsc::Receiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }
        }
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                self.handle_input(event);
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::Blink(step)) => {
                self.handle_blink(step);
                true
            }
            None => false,
        }
    }

    fn handle_input(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(_, _) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.state.should_quit = true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('r') | KeyCode::Char('R') => {
                self.new_game();
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.state.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.state.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.place(self.state.cursor),
            KeyCode::Char(digit) => {
                if let Some(coord) = Coord::from_digit(digit) {
                    self.state.cursor = coord;
                    self.place(coord);
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let target = self.state.cell_at(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.state.on_new_game_button(mouse.column, mouse.row) {
                    self.new_game();
                } else if let Some(coord) = target {
                    self.state.cursor = coord;
                    self.place(coord);
                }
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.state.hover = target;
            }
            _ => {}
        }
    }

    fn place(&mut self, coord: Coord) {
        let mover = self.engine.current_player();
        match self.engine.apply_coord(coord) {
            MoveOutcome::Continue { next } => {
                self.state.set_status(format!("{mover} took {coord}. {next} to play."));
            }
            MoveOutcome::Win { winner, line } => {
                info!(%winner, ?line, "win");
                self.state
                    .set_status(format!("{winner} wins! Press n for a new game."));
                self.start_blink();
            }
            MoveOutcome::Tie => {
                info!("tie");
                self.state
                    .set_status("Board full. Press n for a new game.".to_string());
            }
            MoveOutcome::Rejected(reason) => {
                debug!(%coord, %reason, "ignoring rejected move");
            }
        }
    }

    fn new_game(&mut self) {
        self.blink.cancel();
        self.state.highlight_lit = true;
        self.engine.reset();
        self.state.cursor = Coord::default();
        let score = self.engine.score();
        self.state.set_status(format!(
            "New game after {} played. X moves first.",
            score.games_played()
        ));
    }

    fn start_blink(&mut self) {
        self.state.highlight_lit = true;
        if !self.config.blink.enabled {
            return;
        }
        let Some(sender) = self.event_tx.clone() else {
            return;
        };
        self.blink.start(
            self.config.blink.steps,
            self.config.blink.interval(),
            sender,
            AppEvent::Blink,
        );
    }

    fn handle_blink(&mut self, step: BlinkStep) {
        if !self.blink.is_current(&step) {
            return;
        }
        self.state.highlight_lit = step.lit();
        self.blink.finish(&step);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.background)),
            area,
        );

        let banner_height = block_font::dimensions(TITLE, block_font::STYLES[2]).1 as u16 + 2;
        let show_banner = area.height >= 40 && area.width >= 72;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(if show_banner { banner_height } else { 0 }),
                Constraint::Length(4),
                Constraint::Min(9),
                Constraint::Length(4),
            ])
            .split(area);

        if show_banner {
            self.render_banner(frame, layout[0]);
        }
        self.render_header(frame, layout[1]);

        let body = if area.width >= 70 {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(30), Constraint::Length(SIDE_PANEL_WIDTH)])
                .split(layout[2])
        } else {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(0)])
                .split(layout[2])
        };
        self.render_board(frame, body[0]);
        if body[1].width > 0 {
            self.render_history(frame, body[1]);
        }
        self.render_status(frame, layout[3]);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect) {
        let content: Vec<Line> = block_font::render(TITLE, block_font::STYLES[2])
            .into_iter()
            .map(|line| {
                Line::from(Span::styled(
                    line,
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        let paragraph = Paragraph::new(content)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_header(&mut self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(NEW_GAME_BUTTON_WIDTH)])
            .split(area);
        let area = columns[0];
        self.render_new_game_button(frame, columns[1]);

        let (label, color) = turn_label(&self.engine, &self.theme);
        let score = self.engine.score();
        let score_line = format!(
            "X: {} | O: {} | Ties: {}",
            score.x_wins, score.o_wins, score.ties
        );
        let lines = vec![
            Line::from(Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                score_line,
                Style::default().fg(self.theme.text),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Tic-Tac-Toe"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_new_game_button(&mut self, frame: &mut Frame, area: Rect) {
        self.state.new_game_area = (area.width > 0).then_some(area);
        let style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let button = Paragraph::new(Line::from(Span::styled("New Game", style)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.accent)),
            )
            .alignment(Alignment::Center);
        frame.render_widget(button, area);
    }

    fn render_board(&mut self, frame: &mut Frame, area: Rect) {
        let areas = board_cells(area);
        self.state.cell_areas = Some(areas);

        let winning = self.engine.winning_line();
        let last_move = self.engine.last_move();
        let phase = self.engine.phase();

        for coord in Coord::all() {
            let rect = areas[coord.index()];
            let cell = self.engine.cell(coord);
            let in_line = winning.is_some_and(|line| line.contains(&coord));
            let hovered = self.state.hover == Some(coord);

            let (background, mark_color) = match (phase, cell.mark()) {
                (Phase::Tied, _) => (self.theme.tie_bg, Some(self.theme.tie_fg)),
                _ if in_line && self.state.highlight_lit => {
                    (self.theme.win_bg, Some(self.theme.win_fg))
                }
                (Phase::InProgress, None) if hovered => (
                    self.theme.hover_bg.unwrap_or(self.theme.cell_bg),
                    None,
                ),
                (_, mark) => (
                    self.theme.cell_bg,
                    mark.map(|mark| self.theme.mark_color(mark)),
                ),
            };

            let border_style = if coord == self.state.cursor {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            };
            let mut block = Block::default()
                .borders(Borders::ALL)
                .border_type(if coord == self.state.cursor {
                    BorderType::Thick
                } else {
                    BorderType::Plain
                })
                .border_style(border_style)
                .style(Style::default().bg(background));
            if last_move == Some(coord) && !phase.is_terminal() {
                block = block.title("•");
            }

            let (glyph, glyph_color) = match cell {
                Cell::Marked(mark) => (Some(mark), mark_color.unwrap_or(self.theme.text)),
                Cell::Empty
                    if hovered
                        && self.theme.hover_preview
                        && phase == Phase::InProgress =>
                {
                    (Some(self.engine.current_player()), self.theme.muted)
                }
                Cell::Empty => (None, self.theme.text),
            };

            let inner = block.inner(rect);
            let content = glyph
                .map(|mark| mark_lines(mark, inner, glyph_color))
                .unwrap_or_default();
            let paragraph = Paragraph::new(content)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, rect);
        }
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let history = self.engine.history();
        let items: Vec<ListItem> = if history.is_empty() {
            vec![ListItem::new(Span::styled(
                "No finished games yet",
                Style::default().fg(self.theme.muted),
            ))]
        } else {
            history
                .iter()
                .map(|record| {
                    let color = match record.result {
                        GameResult::Won(mark) => self.theme.mark_color(mark),
                        GameResult::Tied => self.theme.tie_bg,
                    };
                    ListItem::new(Span::styled(record.summary(), Style::default().fg(color)))
                })
                .collect()
        };
        let title = format!("Recent games ({})", self.engine.score().games_played());
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(list, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let help = "arrows/hjkl move · enter place · 1-9 quick place · n or New Game resets · q quit";
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                self.state.status.clone(),
                Style::default().fg(self.theme.text),
            )),
            Line::from(Span::styled(help, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn turn_label(engine: &GameEngine, theme: &Theme) -> (String, Color) {
    match engine.phase() {
        Phase::InProgress => {
            let mark = engine.current_player();
            (format!("{mark}'s Turn"), theme.mark_color(mark))
        }
        Phase::WonByX => ("X Wins!".to_string(), theme.win_bg),
        Phase::WonByO => ("O Wins!".to_string(), theme.win_bg),
        Phase::Tied => ("It's a Tie!".to_string(), theme.tie_bg),
    }
}

/// Split `area` into nine roughly square cells centred in it, row-major.
fn board_cells(area: Rect) -> [Rect; 9] {
    let cell_width = (area.width / 3).min((area.height / 3).saturating_mul(2));
    let cell_height = (area.height / 3).min(cell_width / 2 + 1);
    let board_width = cell_width * 3;
    let board_height = cell_height * 3;
    let origin_x = area.x + area.width.saturating_sub(board_width) / 2;
    let origin_y = area.y + area.height.saturating_sub(board_height) / 2;

    let mut cells = [Rect::default(); 9];
    for coord in Coord::all() {
        cells[coord.index()] = Rect::new(
            origin_x + coord.col() as u16 * cell_width,
            origin_y + coord.row() as u16 * cell_height,
            cell_width,
            cell_height,
        );
    }
    cells
}

/// Lines drawing `mark` as large as fits in `inner`, vertically centred.
fn mark_lines(mark: Mark, inner: Rect, color: Color) -> Vec<Line<'static>> {
    let text = mark.symbol().to_string();
    let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    let glyph_lines = match block_font::fitting_style(&text, inner.width.into(), inner.height.into())
    {
        Some(font_style) => block_font::render(&text, font_style),
        None => vec![text],
    };

    let padding = (inner.height as usize).saturating_sub(glyph_lines.len()) / 2;
    let mut lines: Vec<Line<'static>> = (0..padding).map(|_| Line::from(String::new())).collect();
    lines.extend(
        glyph_lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, style))),
    );
    lines
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    cursor: Coord,
    hover: Option<Coord>,
    cell_areas: Option<[Rect; 9]>,
    new_game_area: Option<Rect>,
    highlight_lit: bool,
    status: String,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: Coord::default(),
            hover: None,
            cell_areas: None,
            new_game_area: None,
            highlight_lit: true,
            status: "Ready".to_string(),
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn move_cursor(&mut self, delta_row: isize, delta_col: isize) {
        self.cursor = self.cursor.offset(delta_row, delta_col);
    }

    /// Board cell under the terminal position, using the last drawn layout.
    fn cell_at(&self, column: u16, row: u16) -> Option<Coord> {
        let areas = self.cell_areas.as_ref()?;
        Coord::all().find(|coord| contains(areas[coord.index()], column, row))
    }

    fn on_new_game_button(&self, column: u16, row: u16) -> bool {
        self.new_game_area
            .is_some_and(|area| contains(area, column, row))
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer};
    use tictactoe_core::{config::ThemeName, MoveRejection};

    fn app() -> TicTacToeApp {
        TicTacToeApp::new(AppConfig::default())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn draw_buffer(app: &mut TicTacToeApp, width: u16, height: u16) -> Result<Buffer> {
        let mut terminal = Terminal::new(TestBackend::new(width, height))?;
        terminal.draw(|frame| app.draw(frame))?;
        Ok(terminal.backend().buffer().clone())
    }

    fn render(app: &mut TicTacToeApp, width: u16, height: u16) -> Result<String> {
        let buffer = draw_buffer(app, width, height)?;
        let mut text = String::new();
        for y in 0..height {
            for x in 0..width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        Ok(text)
    }

    fn center(rect: Rect) -> (u16, u16) {
        (rect.x + rect.width / 2, rect.y + rect.height / 2)
    }

    fn cell_rect(app: &TicTacToeApp, coord: Coord) -> Rect {
        app.state.cell_areas.expect("layout recorded")[coord.index()]
    }

    /// Background just inside the cell border.
    fn cell_background(app: &TicTacToeApp, buffer: &Buffer, coord: Coord) -> Color {
        let rect = cell_rect(app, coord);
        buffer.get(rect.x + 1, rect.y + 1).bg
    }

    fn block_pixels(app: &TicTacToeApp, buffer: &Buffer, coord: Coord) -> Vec<Color> {
        let rect = cell_rect(app, coord);
        let mut colors = Vec::new();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let cell = buffer.get(x, y);
                if cell.symbol() == "█" {
                    colors.push(cell.fg);
                }
            }
        }
        colors
    }

    #[test]
    fn digits_place_marks_and_reach_a_win() {
        let mut app = app();
        for digit in ['1', '4', '2', '5', '3'] {
            app.handle_input(key(KeyCode::Char(digit)));
        }
        assert_eq!(app.engine.phase(), Phase::WonByX);
        assert_eq!(app.engine.score().x_wins, 1);
        assert!(app.state.highlight_lit);
        assert!(app.state.status.starts_with("X wins!"));
    }

    #[test]
    fn cursor_keys_then_enter_place_at_cursor() {
        let mut app = app();
        app.handle_input(key(KeyCode::Up));
        app.handle_input(key(KeyCode::Char('h')));
        app.handle_input(key(KeyCode::Left));
        app.handle_input(key(KeyCode::Enter));
        assert_eq!(app.engine.last_move(), Coord::new(0, 0).ok());
        assert_eq!(app.engine.current_player(), Mark::O);

        // Same cell again is ignored.
        app.handle_input(key(KeyCode::Char(' ')));
        assert_eq!(app.engine.turn(), 1);
        assert_eq!(
            app.engine.clone().apply_move(0, 0),
            MoveOutcome::Rejected(MoveRejection::Occupied)
        );
    }

    #[test]
    fn new_game_keeps_score() {
        let mut app = app();
        for digit in ['1', '4', '2', '5', '3'] {
            app.handle_input(key(KeyCode::Char(digit)));
        }
        app.handle_input(key(KeyCode::Char('n')));
        assert_eq!(app.engine.turn(), 0);
        assert_eq!(app.engine.phase(), Phase::InProgress);
        assert_eq!(app.engine.score().x_wins, 1);
        assert_eq!(app.state.cursor, Coord::default());
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut app = app();
        app.handle_input(key(KeyCode::Char('q')));
        assert!(app.state.should_quit);
        assert!(!app.process_app_event(None));
    }

    #[test]
    fn stale_blink_steps_are_ignored() {
        let mut app = app();
        app.state.highlight_lit = true;
        app.handle_blink(BlinkStep {
            generation: 42,
            step: 0,
            last: false,
        });
        assert!(app.state.highlight_lit);
    }

    #[test]
    fn renders_turn_label_and_score() -> Result<()> {
        let mut app = app();
        let screen = render(&mut app, 100, 36)?;
        assert!(screen.contains("X's Turn"));
        assert!(screen.contains("X: 0 | O: 0 | Ties: 0"));
        assert!(screen.contains("No finished games yet"));
        Ok(())
    }

    #[test]
    fn renders_tie_label() -> Result<()> {
        let mut app = app();
        for digit in ['1', '2', '3', '5', '4', '6', '8', '7', '9'] {
            app.handle_input(key(KeyCode::Char(digit)));
        }
        assert_eq!(app.engine.phase(), Phase::Tied);
        let screen = render(&mut app, 100, 36)?;
        assert!(screen.contains("It's a Tie!"));
        assert!(screen.contains("Ties: 1"));
        assert!(screen.contains("Tie in 9 moves"));
        Ok(())
    }

    #[test]
    fn mouse_click_places_on_the_clicked_cell() -> Result<()> {
        let mut app = app();
        render(&mut app, 100, 36)?;
        let areas = app.state.cell_areas.expect("layout recorded");
        let (column, row) = center(areas[Coord::new(2, 1)?.index()]);

        app.handle_input(mouse(MouseEventKind::Moved, column, row));
        assert_eq!(app.state.hover, Coord::new(2, 1).ok());

        app.handle_input(mouse(MouseEventKind::Down(MouseButton::Left), column, row));
        assert_eq!(app.engine.last_move(), Coord::new(2, 1).ok());
        assert_eq!(app.state.cursor, Coord::new(2, 1)?);

        // Clicks outside the board do nothing.
        app.handle_input(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
        assert_eq!(app.engine.turn(), 1);
        Ok(())
    }

    #[test]
    fn board_cells_fit_inside_area() {
        let area = Rect::new(0, 4, 66, 20);
        let cells = board_cells(area);
        for rect in cells {
            assert!(rect.x >= area.x && rect.x + rect.width <= area.x + area.width);
            assert!(rect.y >= area.y && rect.y + rect.height <= area.y + area.height);
            assert!(rect.width > 0 && rect.height > 0);
        }
        assert_eq!(cells[1].x, cells[0].x + cells[0].width);
        assert_eq!(cells[3].y, cells[0].y + cells[0].height);
    }

    #[test]
    fn classic_theme_has_no_hover_preview() {
        let mut config = AppConfig::default();
        config.theme.name = ThemeName::Classic;
        let app = TicTacToeApp::new(config);
        assert!(!app.theme.hover_preview);
        assert!(app.state.status.starts_with("Classic theme"));
    }

    #[test]
    fn winning_line_is_highlighted_while_lit() -> Result<()> {
        let mut app = app();
        for digit in ['1', '4', '2', '5', '3'] {
            app.handle_input(key(KeyCode::Char(digit)));
        }
        let line = app.engine.winning_line().expect("winning line");

        let buffer = draw_buffer(&mut app, 100, 36)?;
        for coord in Coord::all() {
            let expected = if line.contains(&coord) {
                app.theme.win_bg
            } else {
                app.theme.cell_bg
            };
            assert_eq!(cell_background(&app, &buffer, coord), expected, "{coord}");
        }

        // The dark half of a blink shows the plain board.
        app.state.highlight_lit = false;
        let buffer = draw_buffer(&mut app, 100, 36)?;
        for coord in line {
            assert_eq!(cell_background(&app, &buffer, coord), app.theme.cell_bg);
        }
        Ok(())
    }

    #[test]
    fn tie_fills_every_cell() -> Result<()> {
        let mut app = app();
        for digit in ['1', '2', '3', '5', '4', '6', '8', '7', '9'] {
            app.handle_input(key(KeyCode::Char(digit)));
        }
        let buffer = draw_buffer(&mut app, 100, 36)?;
        for coord in Coord::all() {
            assert_eq!(cell_background(&app, &buffer, coord), app.theme.tie_bg);
        }
        Ok(())
    }

    #[test]
    fn enhanced_hover_highlights_and_previews() -> Result<()> {
        let mut app = app();
        draw_buffer(&mut app, 100, 36)?;
        let hovered = Coord::new(0, 2)?;
        let (column, row) = center(cell_rect(&app, hovered));
        app.handle_input(mouse(MouseEventKind::Moved, column, row));

        let buffer = draw_buffer(&mut app, 100, 36)?;
        let hover_bg = app.theme.hover_bg.expect("enhanced hover colour");
        assert_eq!(cell_background(&app, &buffer, hovered), hover_bg);
        let ghost = block_pixels(&app, &buffer, hovered);
        assert!(!ghost.is_empty());
        assert!(ghost.iter().all(|color| *color == app.theme.muted));

        let other = Coord::new(2, 0)?;
        assert_eq!(cell_background(&app, &buffer, other), app.theme.cell_bg);
        assert!(block_pixels(&app, &buffer, other).is_empty());
        Ok(())
    }

    #[test]
    fn classic_hover_changes_nothing() -> Result<()> {
        let mut config = AppConfig::default();
        config.theme.name = ThemeName::Classic;
        let mut app = TicTacToeApp::new(config);
        draw_buffer(&mut app, 100, 36)?;
        let hovered = Coord::new(0, 2)?;
        let (column, row) = center(cell_rect(&app, hovered));
        app.handle_input(mouse(MouseEventKind::Moved, column, row));
        assert_eq!(app.state.hover, Some(hovered));

        let buffer = draw_buffer(&mut app, 100, 36)?;
        assert_eq!(cell_background(&app, &buffer, hovered), app.theme.cell_bg);
        assert!(block_pixels(&app, &buffer, hovered).is_empty());
        Ok(())
    }

    #[test]
    fn new_game_button_resets_on_click() -> Result<()> {
        let mut app = app();
        for digit in ['1', '4', '2', '5', '3'] {
            app.handle_input(key(KeyCode::Char(digit)));
        }
        let screen = render(&mut app, 100, 36)?;
        assert!(screen.contains("New Game"));

        let button = app.state.new_game_area.expect("button drawn");
        let (column, row) = center(button);
        assert_eq!(app.state.cell_at(column, row), None);
        app.handle_input(mouse(MouseEventKind::Down(MouseButton::Left), column, row));

        assert_eq!(app.engine.turn(), 0);
        assert_eq!(app.engine.phase(), Phase::InProgress);
        assert_eq!(app.engine.score().x_wins, 1);
        assert!(app.state.status.starts_with("New game"));
        Ok(())
    }
}
