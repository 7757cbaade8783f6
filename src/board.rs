//! Interactive session state for the gig table: the loaded list, the active
//! query, column toggles, the detail view and the interest/name flow.

use chrono::NaiveDate;
use thiserror::Error;

use crate::api::{ApiError, GigService};
use crate::config::{ConfigError, ConfigStore};
use crate::filter::{self, GigQuery};
use crate::models::{Gig, GigId, NewGig, Person};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Failed to fetch gigs data.")]
    Fetch(#[source] ApiError),
    #[error("Failed to add event.")]
    Add(#[source] ApiError),
    #[error("no gig with id {0}")]
    UnknownGig(GigId),
    #[error("a name is required")]
    BlankName,
    #[error("no gig is waiting for a name")]
    NothingPending,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Day,
    Date,
    Artist,
    Type,
    Venue,
    Location,
    Added,
    Interested,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Day,
        Column::Date,
        Column::Artist,
        Column::Type,
        Column::Venue,
        Column::Location,
        Column::Added,
        Column::Interested,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Column::Day => "day",
            Column::Date => "date",
            Column::Artist => "artist",
            Column::Type => "type",
            Column::Venue => "venue",
            Column::Location => "location",
            Column::Added => "added",
            Column::Interested => "interested",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Day => "Day",
            Column::Date => "Date",
            Column::Artist => "Artist",
            Column::Type => "Type",
            Column::Venue => "Venue",
            Column::Location => "Location",
            Column::Added => "Added",
            Column::Interested => "Interested",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.key().eq_ignore_ascii_case(key))
    }
}

/// Which table columns are shown. Every column starts visible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: Vec<Column>,
}

impl ColumnVisibility {
    pub fn is_visible(&self, column: Column) -> bool {
        !self.hidden.contains(&column)
    }

    pub fn toggle(&mut self, column: Column) {
        if let Some(pos) = self.hidden.iter().position(|c| *c == column) {
            self.hidden.remove(pos);
        } else {
            self.hidden.push(column);
        }
    }

    pub fn hide(&mut self, column: Column) {
        if self.is_visible(column) {
            self.hidden.push(column);
        }
    }

    pub fn visible(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum InterestOutcome {
    Added,
    NameRequired,
}

#[derive(Default)]
pub struct GigBoard {
    gigs: Vec<Gig>,
    pub query: GigQuery,
    pub columns: ColumnVisibility,
    selected: Option<GigId>,
    user_name: Option<String>,
    pending_interest: Option<GigId>,
}

impl GigBoard {
    pub fn new(user_name: Option<String>) -> Self {
        Self {
            user_name: user_name.filter(|name| !name.trim().is_empty()),
            ..Self::default()
        }
    }

    pub fn gigs(&self) -> &[Gig] {
        &self.gigs
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Replaces the list with the service's. A failure keeps the old list.
    pub fn load(&mut self, service: &dyn GigService) -> Result<usize, BoardError> {
        match service.fetch_gigs() {
            Ok(gigs) => {
                self.gigs = gigs;
                Ok(self.gigs.len())
            }
            Err(err) => {
                log::error!("Error fetching data: {err}");
                Err(BoardError::Fetch(err))
            }
        }
    }

    pub fn visible(&self, today: NaiveDate) -> Vec<&Gig> {
        filter::filter_gigs(&self.gigs, &self.query, today)
    }

    pub fn find(&self, id: &GigId) -> Option<&Gig> {
        self.gigs.iter().find(|gig| &gig.id == id)
    }

    pub fn add_event(
        &mut self,
        service: &dyn GigService,
        new_gig: &NewGig,
    ) -> Result<&Gig, BoardError> {
        let created = service.create_gig(new_gig).map_err(|err| {
            log::error!("Error adding event: {err}");
            BoardError::Add(err)
        })?;
        let id = created.id.clone();
        self.gigs.push(created);
        self.gigs.last().ok_or(BoardError::UnknownGig(id))
    }

    /// Adds the remembered name to the gig's interested list, or parks the gig
    /// until [`GigBoard::submit_name`] supplies one.
    pub fn request_interest(&mut self, id: &GigId) -> Result<InterestOutcome, BoardError> {
        if self.find(id).is_none() {
            return Err(BoardError::UnknownGig(id.clone()));
        }
        match self.user_name.clone() {
            Some(name) => {
                self.append_interest(id, &name)?;
                Ok(InterestOutcome::Added)
            }
            None => {
                self.pending_interest = Some(id.clone());
                Ok(InterestOutcome::NameRequired)
            }
        }
    }

    pub fn pending_interest(&self) -> Option<&GigId> {
        self.pending_interest.as_ref()
    }

    pub fn cancel_name_prompt(&mut self) {
        self.pending_interest = None;
    }

    /// Remembers the name locally and applies the parked interest.
    pub fn submit_name(&mut self, store: &ConfigStore, name: &str) -> Result<GigId, BoardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BoardError::BlankName);
        }
        let id = self
            .pending_interest
            .clone()
            .ok_or(BoardError::NothingPending)?;
        store.remember_name(name)?;
        self.pending_interest = None;
        self.user_name = Some(name.to_string());
        self.append_interest(&id, name)?;
        Ok(id)
    }

    // Local only; the service is not told.
    fn append_interest(&mut self, id: &GigId, name: &str) -> Result<(), BoardError> {
        let gig = self
            .gigs
            .iter_mut()
            .find(|gig| &gig.id == id)
            .ok_or_else(|| BoardError::UnknownGig(id.clone()))?;
        gig.interested.get_or_insert_with(Vec::new).push(Person {
            name: name.to_string(),
        });
        log::info!("{name} is interested in gig {id}");
        Ok(())
    }

    pub fn select(&mut self, id: &GigId) -> Result<&Gig, BoardError> {
        let gig = self
            .gigs
            .iter()
            .find(|gig| &gig.id == id)
            .ok_or_else(|| BoardError::UnknownGig(id.clone()))?;
        self.selected = Some(id.clone());
        Ok(gig)
    }

    pub fn selected(&self) -> Option<&Gig> {
        self.selected.as_ref().and_then(|id| self.find(id))
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }
}
