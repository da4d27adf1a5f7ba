use crate::app::{App, InputMode, Route};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use shelf_engine::DetailState;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    match app.route {
        Route::Listing => draw_listing(f, app, chunks[1]),
        Route::Detail(_) => draw_detail(f, app, chunks[1]),
    }
    draw_footer(f, app, chunks[2]);

    if app.input_mode == InputMode::ShowingHelp {
        draw_help(f, app);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let crumbs = match app.route {
        Route::Listing => "Home > Products".to_string(),
        Route::Detail(id) => format!("Home > Products > #{}", id),
    };
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "shelf",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(crumbs, Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn draw_listing(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(32), // Filters
            Constraint::Percentage(68), // Products
        ])
        .split(area);

    draw_filters(f, app, chunks[0]);
    draw_products(f, app, chunks[1]);
}

fn draw_filters(f: &mut Frame, app: &App, area: Rect) {
    let filters = app.engine.filters();
    let editing = |mode: InputMode| app.input_mode == mode;

    let search = if editing(InputMode::EditingSearch) {
        format!("{}_", app.input_buffer)
    } else {
        filters.search.clone()
    };
    let price = if editing(InputMode::EditingPrice) {
        format!("{}_", app.input_buffer)
    } else {
        format!("${:.2}", f64::from(filters.max_price))
    };

    let label = Style::default().fg(Color::Yellow);
    let lines = vec![
        Line::from(vec![Span::styled("Search    ", label), Span::raw(search)]),
        Line::from(vec![
            Span::styled("Category  ", label),
            Span::raw(filters.category.as_deref().unwrap_or("All").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Company   ", label),
            Span::raw(filters.company.as_deref().unwrap_or("All").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Sort By   ", label),
            Span::raw(filters.order.label()),
        ]),
        Line::from(vec![Span::styled("Price <=  ", label), Span::raw(price)]),
        Line::from(""),
        Line::from(Span::styled(
            "s: search   r: reset",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Filters "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_products(f: &mut Frame, app: &App, area: Rect) {
    let pagination = app.engine.pagination();
    let title = format!(
        " Products: page {} of {} ({} total) ",
        pagination.page, pagination.page_count, pagination.total
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.engine.is_loading() {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Cyan))
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    if app.engine.entries().is_empty() {
        let empty = Paragraph::new("No products found.").block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .engine
        .entries()
        .iter()
        .map(|entry| {
            let company = entry.attributes.company.as_deref().unwrap_or("");
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<32}", entry.title())),
                Span::styled(
                    format!("${:<10}", entry.price()),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(company.to_string(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Product ");

    let Some(detail) = app.detail.as_ref() else {
        f.render_widget(Paragraph::new("Product not found.").block(block), area);
        return;
    };

    let entry = match detail.state() {
        DetailState::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::Cyan))
                .block(block);
            f.render_widget(loading, area);
            return;
        }
        DetailState::Absent => {
            let text = match detail.last_error() {
                Some(cause) => format!("Could not load product: {}", cause),
                None => "Product not found.".to_string(),
            };
            f.render_widget(Paragraph::new(text).block(block), area);
            return;
        }
        DetailState::Loaded(entry) => entry,
    };

    let attrs = &entry.attributes;
    let mut lines = vec![
        Line::from(Span::styled(
            attrs.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(attrs.company.clone().unwrap_or_default()),
        Line::from(vec![
            Span::styled(format!("${}", attrs.price), Style::default().fg(Color::Magenta)),
            Span::styled(
                if attrs.shipping == Some(true) { "  free shipping" } else { "" },
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(""),
        Line::from(attrs.description.clone().unwrap_or_default()),
        Line::from(""),
        Line::from(Span::styled("Colors", Style::default().fg(Color::Yellow))),
    ];

    let colors: Vec<Span> = attrs
        .colors
        .iter()
        .map(|color| {
            if detail.selected_color() == Some(color.as_str()) {
                Span::styled(
                    format!("[{}] ", color),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
                )
            } else {
                Span::raw(format!(" {}  ", color))
            }
        })
        .collect();
    lines.push(Line::from(colors));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Amount  ", Style::default().fg(Color::Yellow)),
        Span::raw(detail.amount().to_string()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "a: add to bag   c: color   +/-: amount   esc: back",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        attrs.image.clone(),
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let status = app
        .status_message
        .clone()
        .unwrap_or_else(|| "Ready".to_string());

    let key = Style::default().fg(Color::Yellow);
    let mut spans = vec![Span::raw(status), Span::raw(" | ")];
    match app.route {
        Route::Listing => {
            let pagination = app.engine.pagination();
            spans.extend([
                Span::styled("j/k", key),
                Span::raw(":move "),
                Span::styled("enter", key),
                Span::raw(":open "),
            ]);
            if pagination.has_prev() {
                spans.extend([Span::styled("p", key), Span::raw(":prev ")]);
            }
            if pagination.has_next() {
                spans.extend([Span::styled("n", key), Span::raw(":next ")]);
            }
        }
        Route::Detail(_) => {
            spans.extend([Span::styled("esc", key), Span::raw(":back ")]);
        }
    }
    spans.extend([
        Span::styled("?", key),
        Span::raw(":help "),
        Span::styled("q", key),
        Span::raw(":quit"),
    ]);

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_help(f: &mut Frame, app: &App) {
    let text = match app.route {
        Route::Listing => {
            "Listing\n\n  j/k        move selection\n  enter      open product\n  n/p        next/previous page\n  /          edit search text\n  c          cycle category\n  m          cycle company\n  o          cycle sort order\n  +/-        raise/lower max price\n  $          type max price\n  s          search with filters\n  r          reset filters\n  q          quit"
        }
        Route::Detail(_) => {
            "Product\n\n  c/tab      next color\n  +/-        change amount (1-20)\n  a/enter    add to bag\n  esc/h      back to products\n  q          quit"
        }
    };

    let area = centered(f.area(), 50, 60);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help ")),
        area,
    );
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
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
