//! Interactive terminal browser for the car table.
//!
//! [`Browser`] wraps a [`CarTable`] with the cursor, focus and status line
//! the terminal needs. Key handling is kept separate from terminal I/O so it
//! can be driven directly in tests.

mod draw;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::execute;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tracing::debug;

use crate::modal::{FormField, ModalState, RowAction};
use crate::store::SnapshotStore;
use crate::table::{CarTable, Mutation};

pub use draw::draw;

/// Which part of the screen receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Keys navigate the table.
    #[default]
    Table,
    /// Keys edit the search term.
    Search,
}

/// State of the interactive browser.
#[derive(Debug)]
pub struct Browser<S> {
    table: CarTable<S>,
    selected: usize,
    focus: Focus,
    field: usize,
    status: Option<String>,
}

impl<S: SnapshotStore> Browser<S> {
    /// Browse `table`.
    #[must_use]
    pub fn new(table: CarTable<S>) -> Self {
        Self {
            table,
            selected: 0,
            focus: Focus::Table,
            field: 0,
            status: None,
        }
    }

    /// The underlying table.
    #[must_use]
    pub fn table(&self) -> &CarTable<S> {
        &self.table
    }

    /// Give back the table.
    #[must_use]
    pub fn into_table(self) -> CarTable<S> {
        self.table
    }

    /// Index of the highlighted row on the current page.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Where typed characters go.
    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// The form field with the cursor, if a form is open.
    #[must_use]
    pub fn current_field(&self) -> Option<FormField> {
        self.table.modal().editable_fields().get(self.field).copied()
    }

    /// Last message for the status line.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Handle one key press.
    ///
    /// Returns `true` when the browser should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match self.table.modal() {
            ModalState::Editing(_) | ModalState::Adding(_) => {
                self.handle_form_key(key);
                false
            }
            ModalState::Deleting(_) => match key.code {
                KeyCode::Enter => {
                    self.save();
                    false
                }
                KeyCode::Esc => {
                    self.table.cancel();
                    false
                }
                // The pending row stays under the cursor until confirmed
                KeyCode::Up
                | KeyCode::Down
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Char('/' | '1'..='9') => false,
                _ => self.handle_table_key(key),
            },
            ModalState::None => match self.focus {
                Focus::Search => {
                    self.handle_search_key(key);
                    false
                }
                Focus::Table => self.handle_table_key(key),
            },
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.table.visible().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left => self.go_to_page(self.table.page().saturating_sub(1)),
            KeyCode::Right => self.go_to_page(self.table.page() + 1),
            KeyCode::Char(c @ '1'..='9') => {
                if let Some(page) = c.to_digit(10).and_then(|d| usize::try_from(d).ok()) {
                    self.go_to_page(page);
                }
            }
            KeyCode::Char('e') => self.row_action(RowAction::Edit),
            KeyCode::Char('d') => self.row_action(RowAction::Delete),
            KeyCode::Char('x') => self.row_action(RowAction::None),
            KeyCode::Char('a') => {
                if self.table.open_add() {
                    self.field = 0;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let mut term = self.table.search_term().to_string();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.focus = Focus::Table;
                return;
            }
            KeyCode::Backspace => {
                term.pop();
            }
            KeyCode::Char(c) => term.push(c),
            _ => return,
        }
        self.table.set_search(term);
        self.selected = 0;
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let count = self.table.modal().editable_fields().len();
        match key.code {
            KeyCode::Esc => self.table.cancel(),
            KeyCode::Enter => self.save(),
            KeyCode::Tab if count > 0 => self.field = (self.field + 1) % count,
            KeyCode::BackTab if count > 0 => self.field = (self.field + count - 1) % count,
            KeyCode::Backspace => self.edit_field(|value| {
                value.pop();
            }),
            KeyCode::Char(c) => self.edit_field(|value| value.push(c)),
            _ => {}
        }
    }

    fn edit_field(&mut self, change: impl FnOnce(&mut String)) {
        let Some(field) = self.current_field() else {
            return;
        };
        let mut value = self.table.modal().value(field).unwrap_or_default();
        change(&mut value);
        if let Err(e) = self.table.set_field(field, value) {
            self.status = Some(e.to_string());
        }
    }

    fn go_to_page(&mut self, page: usize) {
        if self.table.go_to_page(page) {
            self.selected = 0;
        }
    }

    fn row_action(&mut self, action: RowAction) {
        let Some(vin) = self
            .table
            .visible()
            .get(self.selected)
            .map(|car| car.vin.clone())
        else {
            return;
        };
        match self.table.select_row_action(&vin, action) {
            Ok(()) => self.field = 0,
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn save(&mut self) {
        match self.table.save() {
            Ok(mutation) => {
                self.status = Some(match mutation {
                    Mutation::Added(car) => format!("Added {}", car.vin),
                    Mutation::Edited(car) => format!("Saved {}", car.vin),
                    Mutation::Deleted(car) => format!("Deleted {}", car.vin),
                });
                self.clamp_selection();
            }
            Err(e) => self.status = Some(format!("Save failed: {e}")),
        }
    }

    fn clamp_selection(&mut self) {
        let rows = self.table.visible().len();
        self.selected = self.selected.min(rows.saturating_sub(1));
    }
}

/// Run the browser until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn to, or read.
pub fn run<S: SnapshotStore>(browser: &mut Browser<S>) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let result = event_loop(&mut terminal, browser);

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    result
}

fn event_loop<B: Backend, S: SnapshotStore>(
    terminal: &mut Terminal<B>,
    browser: &mut Browser<S>,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| draw(frame, browser))
            .context("draw frame")?;

        if !event::poll(Duration::from_millis(200)).context("poll event")? {
            continue;
        }

        if let Event::Key(key) = event::read().context("read event")? {
            // Only presses; some terminals also report releases
            if key.kind == KeyEventKind::Press && browser.handle_key(key) {
                debug!("Leaving browser");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::{Car, FieldValue};
    use crate::pagination::Pager;
    use crate::store::MemoryStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(browser: &mut Browser<MemoryStore>, text: &str) {
        for c in text.chars() {
            browser.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn browser(n: usize) -> Browser<MemoryStore> {
        let cars = (0..n)
            .map(|i| Car {
                company: if i % 2 == 0 { "Ford" } else { "Mazda" }.to_string(),
                model: "Model".to_string(),
                vin: format!("VIN{i:03}"),
                color: "Gray".to_string(),
                model_year: FieldValue::from(2001),
                price: FieldValue::from("$10.00"),
                availability: FieldValue::from(true),
                ..Car::default()
            })
            .collect();
        Browser::new(CarTable::new(MemoryStore::new(), cars, Pager::new(10)))
    }

    #[test]
    fn test_quit_keys() {
        let mut browser = browser(1);
        assert!(browser.handle_key(key(KeyCode::Char('q'))));
        assert!(browser.handle_key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
    }

    #[test]
    fn test_search_typing_filters_and_resets_page() {
        let mut browser = browser(25);
        browser.handle_key(key(KeyCode::Right));
        assert_eq!(browser.table().page(), 2);

        browser.handle_key(key(KeyCode::Char('/')));
        assert_eq!(browser.focus(), Focus::Search);
        type_text(&mut browser, "MAZ");

        assert_eq!(browser.table().search_term(), "MAZ");
        assert_eq!(browser.table().page(), 1);
        assert_eq!(browser.table().filtered().len(), 12);

        // 'q' is text while searching
        assert!(!browser.handle_key(key(KeyCode::Char('q'))));
        browser.handle_key(key(KeyCode::Backspace));
        browser.handle_key(key(KeyCode::Enter));
        assert_eq!(browser.focus(), Focus::Table);
        assert_eq!(browser.table().search_term(), "MAZ");
    }

    #[test]
    fn test_row_navigation_and_paging() {
        let mut browser = browser(15);
        browser.handle_key(key(KeyCode::Up));
        assert_eq!(browser.selected(), 0);

        for _ in 0..20 {
            browser.handle_key(key(KeyCode::Down));
        }
        assert_eq!(browser.selected(), 9);

        browser.handle_key(key(KeyCode::Char('2')));
        assert_eq!(browser.table().page(), 2);
        assert_eq!(browser.selected(), 0);

        browser.handle_key(key(KeyCode::Char('9')));
        assert_eq!(browser.table().page(), 2);

        browser.handle_key(key(KeyCode::Left));
        assert_eq!(browser.table().page(), 1);
        browser.handle_key(key(KeyCode::Left));
        assert_eq!(browser.table().page(), 1);
    }

    #[test]
    fn test_edit_selected_row() {
        let mut browser = browser(3);
        browser.handle_key(key(KeyCode::Down));
        browser.handle_key(key(KeyCode::Char('e')));

        assert_eq!(browser.current_field(), Some(FormField::Color));
        for _ in 0..4 {
            browser.handle_key(key(KeyCode::Backspace));
        }
        type_text(&mut browser, "Blue");
        browser.handle_key(key(KeyCode::Enter));

        assert!(!browser.table().modal().is_open());
        assert_eq!(browser.table().cars()[1].color, "Blue");
        assert_eq!(browser.status(), Some("Saved VIN001"));
        assert_eq!(browser.table().store().load().unwrap().unwrap()[1].color, "Blue");
    }

    #[test]
    fn test_form_tab_cycles_editable_fields() {
        let mut browser = browser(1);
        browser.handle_key(key(KeyCode::Char('e')));

        browser.handle_key(key(KeyCode::Tab));
        assert_eq!(browser.current_field(), Some(FormField::Price));
        browser.handle_key(key(KeyCode::Tab));
        browser.handle_key(key(KeyCode::Tab));
        assert_eq!(browser.current_field(), Some(FormField::Color));
        browser.handle_key(key(KeyCode::BackTab));
        assert_eq!(browser.current_field(), Some(FormField::Availability));
    }

    #[test]
    fn test_escape_cancels_edit() {
        let mut browser = browser(1);
        browser.handle_key(key(KeyCode::Char('e')));
        type_text(&mut browser, "ish");
        browser.handle_key(key(KeyCode::Esc));

        assert!(!browser.table().modal().is_open());
        assert_eq!(browser.table().cars()[0].color, "Gray");
        assert!(browser.table().store().raw().is_none());
    }

    #[test]
    fn test_add_car() {
        let mut browser = browser(2);
        browser.handle_key(key(KeyCode::Char('a')));
        assert!(!browser.table().can_add());

        type_text(&mut browser, "Kia");
        browser.handle_key(key(KeyCode::Tab));
        browser.handle_key(key(KeyCode::Tab));
        type_text(&mut browser, "KNA");
        browser.handle_key(key(KeyCode::Enter));

        let first = &browser.table().cars()[0];
        assert_eq!(first.company, "Kia");
        assert_eq!(first.vin, "KNA");
        assert_eq!(browser.table().cars().len(), 3);
        assert!(browser.table().can_add());
    }

    #[test]
    fn test_delete_confirm_and_switch() {
        let mut browser = browser(2);
        browser.handle_key(key(KeyCode::Char('d')));
        assert!(matches!(browser.table().modal(), ModalState::Deleting(_)));

        // Choosing another action replaces the confirmation
        browser.handle_key(key(KeyCode::Char('x')));
        assert!(!browser.table().modal().is_open());

        browser.handle_key(key(KeyCode::Char('d')));
        browser.handle_key(key(KeyCode::Enter));
        assert_eq!(browser.table().cars().len(), 1);
        assert_eq!(browser.status(), Some("Deleted VIN000"));
    }

    #[test]
    fn test_navigation_ignored_while_delete_pending() {
        let mut browser = browser(15);
        browser.handle_key(key(KeyCode::Down));
        browser.handle_key(key(KeyCode::Char('d')));

        for code in [
            KeyCode::Down,
            KeyCode::Up,
            KeyCode::Right,
            KeyCode::Char('2'),
            KeyCode::Char('/'),
        ] {
            browser.handle_key(key(code));
        }
        assert_eq!(browser.selected(), 1);
        assert_eq!(browser.table().page(), 1);
        assert_eq!(browser.focus(), Focus::Table);
        assert!(matches!(browser.table().modal(), ModalState::Deleting(_)));

        browser.handle_key(key(KeyCode::Enter));
        assert_eq!(browser.status(), Some("Deleted VIN001"));
        assert!(browser.table().cars().iter().all(|c| c.vin != "VIN001"));
    }

    #[test]
    fn test_actions_on_empty_page_do_nothing() {
        let mut browser = browser(0);
        browser.handle_key(key(KeyCode::Char('e')));
        browser.handle_key(key(KeyCode::Char('d')));
        assert!(!browser.table().modal().is_open());
        assert!(browser.status().is_none());
    }

    #[test]
    fn test_delete_last_row_moves_selection_up() {
        let mut browser = browser(3);
        browser.handle_key(key(KeyCode::Down));
        browser.handle_key(key(KeyCode::Down));
        browser.handle_key(key(KeyCode::Char('d')));
        browser.handle_key(key(KeyCode::Enter));

        assert_eq!(browser.selected(), 1);
    }
}
