use std::{io, time::Duration};

use color_eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Terminal,
};
use ticklist_core::{
    storage::SlotStore,
    store::TodoStore,
    tasks::{Filter, Task},
};
use uuid::Uuid;

/// What the footer and the key handler are currently doing. The store's edit
/// marker is the source of truth for *which* task is being edited; the buffer
/// here is only the uncommitted text.
enum Mode {
    Browse,
    Edit { buffer: String },
    ConfirmDelete { id: Uuid, title: String },
}

/// Interactive task list. Space toggles, `e` edits the title in place,
/// `x` deletes after confirmation, `1`/`2`/`3` switch filter, `q` or Esc
/// exits. All state lives in the store; the view re-reads it every frame.
pub fn launch<S: SlotStore>(store: &mut TodoStore<S>) -> Result<()> {
    // Guard restores the terminal even if we early-return.
    let _guard = TerminalGuard::enter()?;
    let mut terminal = _guard.terminal()?;

    let mut selected: usize = 0;
    let mut mode = Mode::Browse;

    loop {
        // Owned snapshot so key handling below can mutate the store freely.
        let visible: Vec<Task> = store.visible().into_iter().cloned().collect();
        selected = selected.min(visible.len().saturating_sub(1));

        let counts = store.counts();
        let filter = store.filter();

        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ])
                .split(frame.area());

            let header = Paragraph::new(Line::from(vec![
                filter_tab("All", counts.total, filter == Filter::All),
                Span::raw("  "),
                filter_tab("Active", counts.active, filter == Filter::Active),
                Span::raw("  "),
                filter_tab("Completed", counts.completed, filter == Filter::Completed),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(Span::styled(
                        "Ticklist",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )),
            );
            frame.render_widget(header, chunks[0]);

            let items: Vec<ListItem> = visible
                .iter()
                .enumerate()
                .map(|(i, task)| {
                    let mut line = vec![
                        Span::styled(
                            if task.completed { "[x]" } else { "[ ]" },
                            Style::default().fg(if task.completed {
                                Color::Green
                            } else {
                                Color::Yellow
                            }),
                        ),
                        Span::raw(" "),
                        Span::styled(&task.title, Style::default().add_modifier(Modifier::BOLD)),
                    ];
                    if let Some(desc) = &task.description {
                        line.push(Span::styled(
                            format!("  {desc}"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    let mut item = ListItem::new(Line::from(line));
                    if i == selected {
                        item = item.style(Style::default().add_modifier(Modifier::REVERSED));
                    }
                    item
                })
                .collect();

            let body = List::new(items).block(Block::default().borders(Borders::ALL).title("Tasks"));
            frame.render_widget(body, chunks[1]);

            let footer_line = match &mode {
                Mode::Browse => Line::from(vec![
                    Span::raw("space toggle  "),
                    Span::raw("e edit  "),
                    Span::raw("x delete  "),
                    Span::raw("1/2/3 filter  "),
                    Span::styled("q", Style::default().fg(Color::Cyan)),
                    Span::raw(" quit"),
                ]),
                Mode::Edit { buffer } => Line::from(vec![
                    Span::raw("Title: "),
                    Span::styled(buffer.clone(), Style::default().fg(Color::Cyan)),
                    Span::raw("_  (Enter saves, Esc cancels)"),
                ]),
                Mode::ConfirmDelete { title, .. } => Line::from(vec![
                    Span::raw(format!("Delete \"{title}\"? ")),
                    Span::styled("y", Style::default().fg(Color::Red)),
                    Span::raw(" confirms, any other key cancels"),
                ]),
            };
            let footer =
                Paragraph::new(footer_line).block(Block::default().borders(Borders::ALL).title("Controls"));
            frame.render_widget(footer, chunks[2]);
        })?;

        if !event::poll(Duration::from_millis(150))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match &mut mode {
            Mode::Browse => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => {
                    if selected + 1 < visible.len() {
                        selected += 1;
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    selected = selected.saturating_sub(1);
                }
                KeyCode::Char(' ') => {
                    if let Some(task) = visible.get(selected) {
                        store.toggle(task.id);
                    }
                }
                KeyCode::Char('1') => store.set_filter(Filter::All),
                KeyCode::Char('2') => store.set_filter(Filter::Active),
                KeyCode::Char('3') => store.set_filter(Filter::Completed),
                KeyCode::Char('e') => {
                    if let Some(task) = visible.get(selected) {
                        store.start_editing(task.id);
                        mode = Mode::Edit {
                            buffer: task.title.clone(),
                        };
                    }
                }
                KeyCode::Char('x') => {
                    if let Some(task) = visible.get(selected) {
                        mode = Mode::ConfirmDelete {
                            id: task.id,
                            title: task.title.clone(),
                        };
                    }
                }
                _ => {}
            },
            Mode::Edit { buffer } => match key.code {
                KeyCode::Esc => {
                    store.cancel_editing();
                    mode = Mode::Browse;
                }
                KeyCode::Enter => {
                    if let Some(id) = store.editing() {
                        // A blank buffer keeps the old title; update also
                        // closes the edit session.
                        store.update(id, Some(buffer.as_str()), None);
                    }
                    mode = Mode::Browse;
                }
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            },
            Mode::ConfirmDelete { id, .. } => {
                if key.code == KeyCode::Char('y') {
                    store.delete(*id);
                }
                mode = Mode::Browse;
            }
        }
    }

    Ok(())
}

fn filter_tab(label: &str, count: usize, active: bool) -> Span<'static> {
    let style = if active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(format!("{label} ({count})"), style)
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // Enter alternate screen to avoid polluting the shell buffer.
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }

    fn terminal(&self) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
        let backend = CrosstermBackend::new(io::stdout());
        Ok(Terminal::new(backend)?)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort cleanup; errors are logged but not propagated from Drop.
        if let Err(err) = disable_raw_mode() {
            eprintln!("failed to disable raw mode: {err}");
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture) {
            eprintln!("failed to restore terminal: {err}");
        }
    }
}
