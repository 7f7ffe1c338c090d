use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;

use menupro::{format_cents, AllergyTag, CatalogStore, Category, Session, SessionState};

/// Demo prices by category. The catalog carries no prices; in a real
/// deployment these come from the ordering backend.
fn demo_price_cents(category: Category) -> i64 {
    match category {
        Category::RiceBowl => 1095,
        Category::SaladBowl => 1195,
        Category::FriesBowl => 895,
        Category::Naanarito => 1250,
        Category::PitaWrap => 995,
        Category::Naanadilla => 1150,
        Category::HummusBowl => 1045,
    }
}

fn next_category(current: Category) -> Category {
    let pos = Category::ALL.iter().position(|c| *c == current).unwrap_or(0);
    Category::ALL[(pos + 1) % Category::ALL.len()]
}

fn previous_category(current: Category) -> Category {
    let pos = Category::ALL.iter().position(|c| *c == current).unwrap_or(0);
    Category::ALL[(pos + Category::ALL.len() - 1) % Category::ALL.len()]
}

pub struct App {
    pub session: Session,
    pub menu_state: TableState,
}

impl App {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self {
            session: Session::new(store),
            menu_state: TableState::default(),
        }
    }

    /// Clamp the menu cursor after the visible list changed
    fn reset_menu_cursor(&mut self) {
        if self.session.visible_items().is_empty() {
            self.menu_state.select(None);
        } else {
            self.menu_state.select(Some(0));
        }
    }

    fn selected_visible_id(&self) -> Option<String> {
        self.menu_state
            .selected()
            .and_then(|i| self.session.visible_items().get(i))
            .map(|item| item.id.clone())
    }

    pub fn next(&mut self) {
        let len = self.session.visible_items().len();
        if len == 0 {
            return;
        }
        let i = match self.menu_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.menu_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.session.visible_items().len();
        if len == 0 {
            return;
        }
        let i = match self.menu_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.menu_state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.code == KeyCode::Char('q') {
                return Ok(());
            }

            match app.session.session_state() {
                SessionState::Scanning => {
                    if key.code == KeyCode::Enter {
                        app.session.continue_from_scan();
                        app.reset_menu_cursor();
                    }
                }
                SessionState::Browsing => match key.code {
                    KeyCode::Tab | KeyCode::Right => {
                        let next = if key.modifiers.contains(KeyModifiers::SHIFT) {
                            previous_category(app.session.selection().category)
                        } else {
                            next_category(app.session.selection().category)
                        };
                        app.session.select_category(next);
                        app.reset_menu_cursor();
                    }
                    KeyCode::Left => {
                        let prev = previous_category(app.session.selection().category);
                        app.session.select_category(prev);
                        app.reset_menu_cursor();
                    }
                    KeyCode::Char(c @ '1'..='6') => {
                        let idx = c as usize - '1' as usize;
                        app.session.toggle_allergy(AllergyTag::ALL[idx]);
                        app.reset_menu_cursor();
                    }
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Enter => {
                        if let Some(id) = app.selected_visible_id() {
                            app.session.select_item(&id);
                        }
                    }
                    KeyCode::Char('v') => app.session.view_cart(),
                    _ => {}
                },
                SessionState::ItemDetail => match key.code {
                    KeyCode::Char('a') | KeyCode::Char('+') => {
                        let price = app
                            .session
                            .selected_item()
                            .map(|item| demo_price_cents(item.category))
                            .unwrap_or(0);
                        app.session.add_to_cart(1, price);
                    }
                    KeyCode::Char('v') => app.session.view_cart(),
                    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                        app.session.back();
                        app.reset_menu_cursor();
                    }
                    _ => {}
                },
                SessionState::CartView => match key.code {
                    KeyCode::Char('c') => app.session.clear_cart(),
                    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                        app.session.back();
                    }
                    _ => {}
                },
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.session.session_state() {
        SessionState::Scanning => render_scan(f, chunks[1]),
        SessionState::Browsing => render_menu(f, chunks[1], app),
        SessionState::ItemDetail => render_detail(f, chunks[1], app),
        SessionState::CartView => render_cart(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.session.cart_summary();

    let mut spans = vec![
        Span::styled(
            "MenuPro",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            app.session.session_state().title(),
            Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED),
        ),
    ];

    if !summary.is_empty() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            format!("🛒 {} · {}", summary.count, format_cents(summary.total_cents)),
            Style::default().fg(Color::Green),
        ));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_scan(f: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "▄▄▄▄▄▄▄   ▄▄▄▄▄▄▄",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            "█ ▄▄▄ █   █ ▄▄▄ █",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            "█ ███ █ ▄ █ ███ █",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            "▀▀▀▀▀▀▀ ▀ ▀▀▀▀▀▀▀",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Scan to Discover Deliciousness",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from("No app needed — scan, browse, and order instantly."),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" to scan"),
        ]),
    ];

    let scan = Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(scan, area);
}

fn render_menu(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category tabs
            Constraint::Length(3), // Allergy toggles
            Constraint::Min(0),    // Item table
        ])
        .split(area);

    render_category_tabs(f, chunks[0], app);
    render_allergy_toggles(f, chunks[1], app);
    render_item_table(f, chunks[2], app);
}

fn render_category_tabs(f: &mut Frame, area: Rect, app: &App) {
    let current = app.session.selection().category;

    let mut spans = vec![];
    for (i, category) in Category::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }

        let style = if *category == current {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        spans.push(Span::styled(category.as_str(), style));
    }

    let tabs = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).title(" Categories "));

    f.render_widget(tabs, area);
}

fn render_allergy_toggles(f: &mut Frame, area: Rect, app: &App) {
    let selection = app.session.selection();

    let mut spans = vec![];
    for (i, tag) in AllergyTag::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }

        let (marker, style) = if selection.has_tag(*tag) {
            ("■", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            ("□", Style::default().fg(Color::DarkGray))
        };

        spans.push(Span::styled(
            format!("{} {} {}", i + 1, marker, tag.as_str()),
            style,
        ));
    }

    let toggles = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).title(" Dietary Filters "));

    f.render_widget(toggles, area);
}

fn render_item_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Item", "Category", "Tags", "Price"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.session.visible_items().iter().map(|item| {
        let tags = item
            .allergy_tags
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let cells = vec![
            Cell::from(item.name.clone()),
            Cell::from(item.category.as_str()),
            Cell::from(truncate(&tags, 40)),
            Cell::from(format_cents(demo_price_cents(item.category)))
                .style(Style::default().fg(Color::Green)),
        ];

        Row::new(cells).height(1)
    });

    let count = app.session.visible_items().len();
    let title = if count == 0 {
        " Menu - no items match the current filters ".to_string()
    } else {
        format!(" Menu - {} items ", count)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(14),
            Constraint::Length(44),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.menu_state);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(item) = app.session.selected_item() else {
        // Unreachable while the session honors its own invariants
        f.render_widget(Paragraph::new("No item selected"), area);
        return;
    };

    let tags = if item.allergy_tags.is_empty() {
        "none".to_string()
    } else {
        item.allergy_tags
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            item.name.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Category: {}", item.category.as_str())),
        Line::from(format!("Dietary:  {}", tags)),
        Line::from(format!(
            "Price:    {}",
            format_cents(demo_price_cents(item.category))
        )),
        Line::from(""),
        Line::from(format!("Image: {}", truncate(&item.image, 60))),
        Line::from(""),
        Line::from(vec![
            Span::styled("a", Style::default().fg(Color::Yellow)),
            Span::raw(" Add to cart | "),
            Span::styled("v", Style::default().fg(Color::Yellow)),
            Span::raw(" View cart | "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" Back to menu"),
        ]),
    ];

    let detail = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", item.name)),
    );

    f.render_widget(detail, area);
}

fn render_cart(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["Item", "Qty", "Unit", "Line Total"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.session.cart_lines().iter().map(|line| {
        let cells = vec![
            Cell::from(line.item_id.clone()),
            Cell::from(format!("{}", line.quantity)),
            Cell::from(format_cents(line.unit_price_cents)),
            Cell::from(format_cents(line.line_total_cents()))
                .style(Style::default().fg(Color::Green)),
        ];

        Row::new(cells).height(1)
    });

    let summary = app.session.cart_summary();
    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(
                " Your Cart - {} items · {} ",
                summary.count,
                format_cents(summary.total_cents)
            )),
    );

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    match app.session.session_state() {
        SessionState::Scanning => {
            spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Scan"));
        }
        SessionState::Browsing => {
            spans.push(Span::styled("Tab/←→", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Category | "));
            spans.push(Span::styled("1-6", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Dietary | "));
            spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Nav | "));
            spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" View item | "));
            spans.push(Span::styled("v", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Cart"));
        }
        SessionState::ItemDetail => {
            spans.push(Span::styled("a", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Add | "));
            spans.push(Span::styled("v", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Cart | "));
            spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Back"));
        }
        SessionState::CartView => {
            spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Clear | "));
            spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Back"));
        }
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
