//! The car table view-model.
//!
//! [`CarTable`] owns the collection and the view state around it: the search
//! term, the current page and the open modal. Every mutation builds the new
//! collection, writes it to the snapshot store as a whole, and only then
//! replaces the in-memory copy.

use tracing::{debug, error, info, warn};

use crate::car::Car;
use crate::error::{Error, Result};
use crate::inventory::Inventory;
use crate::modal::{CarForm, EditForm, FormField, ModalState, RowAction};
use crate::pagination::Pager;
use crate::search;
use crate::seed::SeedSource;
use crate::store::SnapshotStore;

/// Where the initial collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Loaded from a saved snapshot.
    Snapshot,
    /// Fetched from the seed source.
    Seed,
    /// The seed fetch failed; the table started empty.
    Empty,
}

/// A committed change to the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// A car was prepended.
    Added(Car),
    /// A car's color, price or availability changed.
    Edited(Car),
    /// A car was removed.
    Deleted(Car),
}

/// Searchable, paginated car table backed by a snapshot store.
#[derive(Debug)]
pub struct CarTable<S> {
    store: S,
    inventory: Inventory,
    origin: Origin,
    pager: Pager,
    search: String,
    page: usize,
    modal: ModalState,
}

impl<S: SnapshotStore> CarTable<S> {
    /// Load the table from `store`, seeding it if nothing was saved yet.
    ///
    /// The seed is fetched at most once. A failed fetch is logged and the
    /// table starts empty; a failed write of the fetched cars is logged and
    /// the cars are still used.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved snapshot exists but cannot be read.
    pub async fn initialize(store: S, seed: &dyn SeedSource, pager: Pager) -> Result<Self> {
        if let Some(cars) = store.load()? {
            info!("Loaded {} cars from snapshot", cars.len());
            return Ok(Self::with_origin(store, cars, pager, Origin::Snapshot));
        }

        debug!("No snapshot found, seeding from {}", seed.describe());
        match seed.fetch().await {
            Ok(cars) => {
                if let Err(e) = store.save(&cars) {
                    warn!("Failed to save seeded cars: {}", e);
                }
                Ok(Self::with_origin(store, cars, pager, Origin::Seed))
            }
            Err(e) => {
                error!("Failed to fetch seed data from {}: {}", seed.describe(), e);
                Ok(Self::with_origin(store, Vec::new(), pager, Origin::Empty))
            }
        }
    }

    /// Create a table over `cars` without touching the store.
    #[must_use]
    pub fn new(store: S, cars: Vec<Car>, pager: Pager) -> Self {
        Self::with_origin(store, cars, pager, Origin::Snapshot)
    }

    fn with_origin(store: S, cars: Vec<Car>, pager: Pager, origin: Origin) -> Self {
        Self {
            store,
            inventory: Inventory::new(cars),
            origin,
            pager,
            search: String::new(),
            page: 1,
            modal: ModalState::None,
        }
    }

    /// The snapshot store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Where the initial collection came from.
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The whole collection, in order.
    #[must_use]
    pub fn cars(&self) -> &[Car] {
        self.inventory.cars()
    }

    // === Search ===

    /// The current search term.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search
    }

    /// Change the search term and go back to the first page.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Cars matching the search term, in collection order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Car> {
        search::filter(self.inventory.cars(), &self.search)
    }

    // === Pagination ===

    /// Rows per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    /// The current page number, starting at 1.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages of filtered results.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.filtered().len())
    }

    /// One entry per page button.
    #[must_use]
    pub fn page_numbers(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.page_count()
    }

    /// Jump to a page.
    ///
    /// Returns `false` and stays put if the page is outside the results.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if !self.pager.contains(page, self.filtered().len()) {
            debug!("Ignoring out-of-range page {}", page);
            return false;
        }
        self.page = page;
        true
    }

    /// Filtered cars on the current page.
    #[must_use]
    pub fn visible(&self) -> Vec<&Car> {
        let filtered = self.filtered();
        self.pager.slice(&filtered, self.page).to_vec()
    }

    fn clamp_page(&mut self) {
        self.page = self.pager.clamp(self.page, self.filtered().len());
    }

    // === Modals ===

    /// The open modal.
    #[must_use]
    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    /// Whether the "Add Car" trigger is enabled.
    #[must_use]
    pub fn can_add(&self) -> bool {
        !self.modal.is_adding()
    }

    /// Open the edit modal for the first car with `vin`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CarNotFound`] if no car has the VIN.
    pub fn open_edit(&mut self, vin: &str) -> Result<()> {
        let car = self
            .inventory
            .find(vin)
            .ok_or_else(|| Error::car_not_found(vin))?;
        self.modal = ModalState::Editing(EditForm::new(car));
        Ok(())
    }

    /// Open the delete confirmation for the first car with `vin`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CarNotFound`] if no car has the VIN.
    pub fn open_delete(&mut self, vin: &str) -> Result<()> {
        let car = self
            .inventory
            .find(vin)
            .ok_or_else(|| Error::car_not_found(vin))?;
        self.modal = ModalState::Deleting(car.clone());
        Ok(())
    }

    /// Open an empty add form.
    ///
    /// Returns `false` without resetting the form if it is already open.
    pub fn open_add(&mut self) -> bool {
        if !self.can_add() {
            return false;
        }
        self.modal = ModalState::Adding(CarForm::default());
        true
    }

    /// Apply a row's action selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CarNotFound`] if an edit or delete targets a VIN that
    /// is not in the collection.
    pub fn select_row_action(&mut self, vin: &str, action: RowAction) -> Result<()> {
        match action {
            RowAction::None => {
                self.cancel();
                Ok(())
            }
            RowAction::Edit => self.open_edit(vin),
            RowAction::Delete => self.open_delete(vin),
        }
    }

    /// Type into a field of the open form.
    ///
    /// Returns `false` if the field is read-only in this form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveModal`] if no form is open.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<bool> {
        self.modal.set(field, value)
    }

    /// Close the open modal without changing anything.
    pub fn cancel(&mut self) {
        self.modal = ModalState::None;
    }

    /// Commit the open modal: save the edit, confirm the delete, or add the
    /// new car. The modal closes on success.
    ///
    /// On error the collection and the modal are left as they were.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveModal`] if no modal is open,
    /// [`Error::CarNotFound`] if the edited or deleted car is gone, or a
    /// storage error if the snapshot cannot be written.
    pub fn save(&mut self) -> Result<Mutation> {
        let mut next = self.inventory.clone();
        let mutation = match &self.modal {
            ModalState::None => return Err(Error::NoActiveModal),
            ModalState::Adding(form) => {
                let car = form.to_car();
                next.add(car.clone());
                Mutation::Added(car)
            }
            ModalState::Editing(form) => {
                let car = next.update(form.vin(), form.to_update())?.clone();
                Mutation::Edited(car)
            }
            ModalState::Deleting(car) => Mutation::Deleted(next.remove(&car.vin)?),
        };

        self.store.save(next.cars())?;
        self.inventory = next;
        self.modal = ModalState::None;
        self.clamp_page();
        info!("Saved {}", describe(&mutation));
        Ok(mutation)
    }
}

fn describe(mutation: &Mutation) -> String {
    match mutation {
        Mutation::Added(car) => format!("new car '{}'", car.vin),
        Mutation::Edited(car) => format!("changes to car '{}'", car.vin),
        Mutation::Deleted(car) => format!("deletion of car '{}'", car.vin),
    }
}
