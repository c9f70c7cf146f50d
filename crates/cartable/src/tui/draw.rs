//! Frame rendering for the browser.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use super::{Browser, Focus};
use crate::car::{Car, COLUMNS};
use crate::modal::{EditForm, FormField, ModalState};
use crate::render;
use crate::store::SnapshotStore;

/// Per-row action selector.
const ROW_ACTIONS: &str = "edit/delete";

/// Draw the whole browser into `frame`.
pub fn draw<S: SnapshotStore>(frame: &mut Frame, browser: &Browser<S>) {
    let [search_area, table_area, pages_area, help_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_search(frame, browser, search_area);
    draw_table(frame, browser, table_area);
    draw_pages(frame, browser, pages_area);
    draw_help(frame, browser, help_area);

    let modal = browser.table().modal();
    if modal.is_open() {
        draw_modal(frame, browser, modal);
    }
}

fn draw_search<S: SnapshotStore>(frame: &mut Frame, browser: &Browser<S>, area: Rect) {
    let style = if browser.focus() == Focus::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let search = Paragraph::new(browser.table().search_term()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(" Search "),
    );
    frame.render_widget(search, area);
}

fn draw_table<S: SnapshotStore>(frame: &mut Frame, browser: &Browser<S>, area: Rect) {
    let visible = browser.table().visible();
    let rows = visible.iter().map(|car| {
        let mut cells: Vec<Cell> = car.columns().into_iter().map(Cell::from).collect();
        cells.push(Cell::from(ROW_ACTIONS).style(Style::default().fg(Color::DarkGray)));
        Row::new(cells)
    });

    let widths = [
        Constraint::Percentage(13),
        Constraint::Percentage(13),
        Constraint::Percentage(18),
        Constraint::Percentage(10),
        Constraint::Percentage(7),
        Constraint::Percentage(12),
        Constraint::Percentage(12),
        Constraint::Percentage(15),
    ];
    let header = COLUMNS.iter().copied().chain(["Action"]);
    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().bold()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Cars ({}) ", browser.table().cars().len())),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    let selected = (!visible.is_empty()).then_some(browser.selected());
    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_pages<S: SnapshotStore>(frame: &mut Frame, browser: &Browser<S>, area: Rect) {
    let table = browser.table();
    let footer = render::footer(
        table.page(),
        table.page_count(),
        table.filtered().len(),
        table.cars().len(),
    );
    frame.render_widget(Paragraph::new(footer), area);
}

fn draw_help<S: SnapshotStore>(frame: &mut Frame, browser: &Browser<S>, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let add = if browser.table().can_add() {
        Span::styled("a Add Car", Style::default().fg(Color::Green))
    } else {
        Span::styled("a Add Car", dim.add_modifier(Modifier::CROSSED_OUT))
    };

    let mut spans = vec![
        add,
        Span::styled(
            " | / search | ←/→ page | e edit | d delete | x clear | q quit",
            dim,
        ),
    ];
    if let Some(status) = browser.status() {
        spans.push(Span::styled(
            format!("  {status}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_modal<S: SnapshotStore>(frame: &mut Frame, browser: &Browser<S>, modal: &ModalState) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", modal.title().unwrap_or_default()))
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [body, hint] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

    let (lines, hint_text) = match modal {
        ModalState::Deleting(car) => (delete_lines(car), "Enter Delete | Esc Cancel"),
        ModalState::Editing(_) | ModalState::Adding(_) => {
            (form_lines(browser, modal), "Tab Next field | Enter Save | Esc Cancel")
        }
        ModalState::None => return,
    };

    frame.render_widget(Paragraph::new(lines), body);
    frame.render_widget(
        Paragraph::new(hint_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        hint,
    );
}

fn delete_lines(car: &Car) -> Vec<Line<'static>> {
    vec![
        Line::from("Delete this car?"),
        Line::from(""),
        Line::from(format!("{} {} {}", car.model_year, car.company, car.model)),
        Line::from(format!("VIN {}", car.vin)),
    ]
}

fn form_lines<S: SnapshotStore>(browser: &Browser<S>, modal: &ModalState) -> Vec<Line<'static>> {
    let current = browser.current_field();
    let read_only = matches!(modal, ModalState::Editing(_));

    FormField::ALL
        .iter()
        .map(|&field| {
            let value = modal.value(field).unwrap_or_default();
            let label = format!("{:>13}: ", field.label());
            if read_only && !EditForm::is_editable(field) {
                Line::from(vec![
                    Span::raw(label),
                    Span::styled(value, Style::default().fg(Color::DarkGray)),
                ])
            } else if current == Some(field) {
                Line::from(vec![
                    Span::styled(label, Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{value}_"), Style::default().fg(Color::Yellow)),
                ])
            } else {
                Line::from(vec![Span::raw(label), Span::raw(value)])
            }
        })
        .collect()
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [v_area] = vertical.areas(area);
    let [h_area] = horizontal.areas(v_area);
    h_area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::FieldValue;
    use crate::pagination::Pager;
    use crate::store::MemoryStore;
    use crate::table::CarTable;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(browser: &Browser<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, browser)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn browser() -> Browser<MemoryStore> {
        let car = Car {
            company: "Subaru".to_string(),
            model: "Outback".to_string(),
            vin: "4S4BP".to_string(),
            color: "Green".to_string(),
            model_year: FieldValue::from(2011),
            price: FieldValue::from("$1200.50"),
            availability: FieldValue::from(true),
            ..Car::default()
        };
        Browser::new(CarTable::new(MemoryStore::new(), vec![car], Pager::new(10)))
    }

    fn press(browser: &mut Browser<MemoryStore>, code: KeyCode) {
        browser.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_draw_table() {
        let out = screen(&browser());
        assert!(out.contains("Search"));
        assert!(out.contains("Availability"));
        assert!(out.contains("Subaru"));
        assert!(out.contains("edit/delete"));
        assert!(out.contains("Page 1 of 1: [1]"));
        assert!(out.contains("Add Car"));
    }

    #[test]
    fn test_draw_edit_modal_shows_read_only_fields() {
        let mut browser = browser();
        press(&mut browser, KeyCode::Char('e'));

        let out = screen(&browser);
        assert!(out.contains("Edit Car"));
        assert!(out.contains("4S4BP"));
        assert!(out.contains("Green_"));
    }

    #[test]
    fn test_draw_delete_modal() {
        let mut browser = browser();
        press(&mut browser, KeyCode::Char('d'));

        let out = screen(&browser);
        assert!(out.contains("Delete Car"));
        assert!(out.contains("2011 Subaru Outback"));
    }

    #[test]
    fn test_draw_empty_results() {
        let mut browser = browser();
        press(&mut browser, KeyCode::Char('/'));
        press(&mut browser, KeyCode::Char('z'));

        let out = screen(&browser);
        assert!(out.contains("No cars match (1 total)"));
    }

    #[test]
    fn test_centered_rect_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }
}
