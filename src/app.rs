use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use selgrid::keymap;
use selgrid::model::config::AppConfig;
use selgrid::msg::Msg;
use selgrid::{
    ColumnId, ColumnSet, Granularity, Position, SelectionEngine, SelectionMode, SelectionModel,
};

const LOG_LINES: usize = 6;

/// One row of the demo table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: u32,
    pub name: String,
    pub values: Vec<u32>,
}

impl Record {
    fn generate(id: u32, columns: usize) -> Self {
        const NAMES: [&str; 8] = [
            "alder", "birch", "cedar", "elm", "fir", "hazel", "larch", "maple",
        ];
        let name = format!("{}-{id}", NAMES[id as usize % NAMES.len()]);
        let values = (1..columns as u32)
            .map(|c| (id.wrapping_mul(2654435761).rotate_left(c * 5)) % 1000)
            .collect();
        Self { id, name, values }
    }

    fn cell_text(&self, column: usize) -> String {
        match column {
            0 => self.name.clone(),
            c => self
                .values
                .get(c - 1)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }
}

pub struct App {
    pub engine: SelectionEngine<Record>,
    pub config: AppConfig,
    pub should_quit: bool,
    /// Change records pushed by the engine's listeners, newest last.
    log: Rc<RefCell<VecDeque<String>>>,
    next_id: u32,
    top: usize,
    viewport_height: usize,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let columns = config.demo.columns;
        let rows: Vec<Record> = (0..config.demo.rows as u32)
            .map(|id| Record::generate(id, columns))
            .collect();
        let titles = std::iter::once("name".to_string())
            .chain((1..columns).map(|c| format!("v{c}")));
        let options = config.engine.options()?;
        let mut engine =
            SelectionEngine::with_options(rows, ColumnSet::from_titles(titles), options);

        let log = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&log);
        engine.on_selection_change(move |change, view| {
            let line = format!(
                "selection +{} -{} => {} selected",
                change.added.len(),
                change.removed.len(),
                view.selected_cells().len()
            );
            push_log(&sink, line);
        });
        let sink = Rc::clone(&log);
        engine.on_focus_change(move |change, _view| {
            let fmt = |p: Option<Position>| p.map_or("-".to_string(), |p| p.to_string());
            push_log(
                &sink,
                format!("focus {} -> {}", fmt(change.previous), fmt(change.current)),
            );
        });
        engine.clear_and_select(Position::row(0))?;

        tracing::info!(
            rows = engine.len(),
            mode = engine.mode().label(),
            granularity = engine.granularity().label(),
            "demo table ready"
        );

        Ok(Self {
            engine,
            next_id: config.demo.rows as u32,
            config,
            should_quit: false,
            log,
            top: 0,
            viewport_height: 20,
        })
    }

    // ── MVU: Update ──────────────────────────────────────────────

    pub fn update(&mut self, msg: Msg) -> Result<()> {
        match msg {
            Msg::Key(key) => self.handle_key(key)?,
            Msg::Resize(_w, h) => {
                // header + table header + log + status bar
                self.viewport_height = (h as usize).saturating_sub(LOG_LINES + 6).max(1);
            }
            Msg::Command(command, modifiers) => {
                let outcome = self.engine.apply(command, modifiers);
                tracing::debug!(?command, ?outcome, "key command");
            }
            Msg::InsertRow => {
                let at = self.engine.focused_index().map_or(0, |row| row + 1);
                let record = Record::generate(self.next_id, self.config.demo.columns);
                self.next_id += 1;
                self.engine.mutate_items(|items| items.insert(at, record));
            }
            Msg::DeleteFocusedRow => {
                if let Some(row) = self.engine.focused_index() {
                    self.engine.mutate_items(|items| items.remove(row));
                }
            }
            Msg::SortRows => {
                self.engine
                    .mutate_items(|items| items.sort_by(|a, b| a.name.cmp(&b.name)));
            }
            Msg::ToggleColumn(index) => {
                let id = ColumnId(index as u32);
                let visible = self.engine.columns().is_visible(id);
                if let Err(err) = self.engine.set_column_visible(id, !visible) {
                    push_log(&self.log, err.to_string());
                }
            }
            Msg::CycleMode => {
                let next = match self.engine.mode() {
                    SelectionMode::Single => SelectionMode::Multiple,
                    SelectionMode::Multiple => SelectionMode::Single,
                };
                self.engine.set_mode(next);
            }
            Msg::CycleGranularity => {
                let next = match self.engine.granularity() {
                    Granularity::Row => Granularity::Cell,
                    Granularity::Cell => Granularity::Row,
                };
                self.engine.set_granularity(next);
            }
            Msg::Quit => self.should_quit = true,
        }
        self.scroll_to_focus();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }
        let plain = !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let msg = match key.code {
            KeyCode::Char('q') if plain => Msg::Quit,
            KeyCode::Char('m') if plain => Msg::CycleMode,
            KeyCode::Char('g') if plain => Msg::CycleGranularity,
            KeyCode::Char('i') if plain => Msg::InsertRow,
            KeyCode::Char('d') if plain => Msg::DeleteFocusedRow,
            KeyCode::Char('s') if plain => Msg::SortRows,
            KeyCode::Char(c @ '1'..='9') if plain => Msg::ToggleColumn(c as usize - '1' as usize),
            _ => match keymap::classify(key, self.config.keys.primary, self.page_size()) {
                Some((command, modifiers)) => Msg::Command(command, modifiers),
                None => return Ok(()),
            },
        };
        self.update(msg)
    }

    fn page_size(&self) -> usize {
        match self.config.demo.page_size {
            0 => self.viewport_height.saturating_sub(1).max(1),
            n => n,
        }
    }

    fn scroll_to_focus(&mut self) {
        let Some(row) = self.engine.focused_index() else {
            self.top = 0;
            return;
        };
        if row < self.top {
            self.top = row;
        } else if row >= self.top + self.viewport_height {
            self.top = row + 1 - self.viewport_height;
        }
    }

    // ── MVU: View ────────────────────────────────────────────────

    pub fn view(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),                    // key help
                Constraint::Min(3),                       // table
                Constraint::Length(LOG_LINES as u16 + 2), // change log
                Constraint::Length(1),                    // status bar
            ])
            .split(frame.area());

        self.render_help(frame, chunks[0]);
        self.viewport_height = (chunks[1].height as usize).saturating_sub(3).max(1);
        self.scroll_to_focus();
        self.render_table(frame, chunks[1]);
        self.render_log(frame, chunks[2]);
        self.render_status_bar(frame, chunks[3]);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help = Span::styled(
            " Arrows/Home/End/PgUp/PgDn: Move  Shift: Extend  Ctrl: Focus only  Space: Toggle  Ctrl+A: All  Esc: Clear  m: Mode  g: Granularity  i/d: Insert/Delete  s: Sort  1-9: Columns  q: Quit ",
            Style::default()
                .bg(Color::Rgb(20, 20, 30))
                .fg(Color::DarkGray),
        );
        frame.render_widget(
            Paragraph::new(Line::from(help)).style(Style::default().bg(Color::Rgb(20, 20, 30))),
            area,
        );
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let engine = &self.engine;
        let visible: Vec<ColumnId> = engine.columns().visible();
        let anchor = engine.anchor();
        let focus = engine.focused();
        let cells_mode = engine.granularity() == Granularity::Cell;

        let header = Row::new(
            std::iter::once(Cell::from(" "))
                .chain(visible.iter().map(|id| {
                    let title = engine
                        .columns()
                        .get(*id)
                        .map(|c| c.title.clone())
                        .unwrap_or_default();
                    Cell::from(title)
                })),
        )
        .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));

        let bottom = (self.top + self.viewport_height).min(engine.len());
        let rows = (self.top..bottom).map(|row| {
            let record = &engine.items()[row];
            let marker = if anchor.is_some_and(|a| a.row == row) {
                "»"
            } else {
                " "
            };
            let cells = visible.iter().map(|&id| {
                let pos = if cells_mode {
                    Position::cell(row, id)
                } else {
                    Position::row(row)
                };
                let mut style = Style::default();
                if engine.selection().is_selected(pos) {
                    style = style.bg(Color::Rgb(40, 60, 110)).fg(Color::White);
                }
                let focused = focus.is_some_and(|f| {
                    f.row == row && (!cells_mode || f.column.is_none() || f.column == Some(id))
                });
                if focused {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Cell::from(record.cell_text(id.0 as usize)).style(style)
            });
            Row::new(std::iter::once(Cell::from(marker)).chain(cells))
        });

        let widths = std::iter::once(Constraint::Length(1))
            .chain(visible.iter().map(|id| match id.0 {
                0 => Constraint::Length(12),
                _ => Constraint::Length(6),
            }))
            .collect::<Vec<_>>();

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} rows ", engine.len())),
        );
        frame.render_widget(table, area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect) {
        let log = self.log.borrow();
        let lines: Vec<Line> = log
            .iter()
            .map(|entry| Line::from(Span::styled(entry.clone(), Style::default().fg(Color::Gray))))
            .collect();
        let panel = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" changes "),
        );
        frame.render_widget(panel, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let engine = &self.engine;
        let mode_style = match engine.mode() {
            SelectionMode::Single => Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            SelectionMode::Multiple => Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        };
        let mode_span = Span::styled(format!(" {} ", engine.mode().label()), mode_style);

        let fmt = |p: Option<Position>| p.map_or("-".to_string(), |p| p.to_string());
        let info = Span::styled(
            format!(
                " {}  focus {}  anchor {}  selected rows {:?} ",
                engine.granularity().label(),
                fmt(engine.focused()),
                fmt(engine.anchor()),
                engine.selected_indices(),
            ),
            Style::default().fg(Color::Gray).bg(Color::DarkGray),
        );

        let bar = Line::from(vec![mode_span, info]);
        let status = Paragraph::new(bar).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status, area);
    }
}

fn push_log(log: &Rc<RefCell<VecDeque<String>>>, line: String) {
    let mut log = log.borrow_mut();
    log.push_back(line);
    while log.len() > LOG_LINES {
        log.pop_front();
    }
}
