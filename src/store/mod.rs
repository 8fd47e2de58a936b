//! Event state store
//!
//! A client-side mirror of server state: event lists, the currently
//! viewed event, registrations, taxonomy, and per-operation-family
//! loading/error flags. Every async operation follows the same
//! three-step pattern: mark the family pending (set loading, clear its
//! error), then on success store the normalized payload or on failure
//! store the extracted message. Mutations merge the returned entity into
//! every list that contains it; nothing is computed optimistically.
//!
//! Registration failures land in `registration_error`, kept separate
//! from `error` so a failed payment never clobbers an unrelated
//! list-fetch error and vice versa.

use tracing::debug;

use crate::models::{
    Category, Event, EventFilters, Pagination, Registration, RegistrationFilters,
    RegistrationRequest, Tag,
};
use crate::services::{EventService, RegistrationService};
use crate::utils::errors::{EventDeskError, Result};

/// Loading indicators keyed by operation family
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingFlags {
    pub events: bool,
    pub event_detail: bool,
    pub event_mutation: bool,
    pub registrations: bool,
    pub registration_mutation: bool,
    pub taxonomy: bool,
}

/// The mirrored server state
#[derive(Debug, Clone, Default)]
pub struct EventState {
    pub events: Vec<Event>,
    pub my_events: Vec<Event>,
    pub featured_events: Vec<Event>,
    pub upcoming_events: Vec<Event>,
    pub ongoing_events: Vec<Event>,
    pub current_event: Option<Event>,
    pub registrations: Vec<Registration>,
    pub registrations_total: i64,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub pagination: Pagination,
    pub loading: LoadingFlags,
    pub error: Option<String>,
    pub registration_error: Option<String>,
}

impl EventState {
    /// Merge a mutated event into every list that already contains it,
    /// and into the current-event slot when it is the one being viewed
    pub fn merge_event(&mut self, event: &Event) {
        for list in [
            &mut self.events,
            &mut self.my_events,
            &mut self.featured_events,
            &mut self.upcoming_events,
            &mut self.ongoing_events,
        ] {
            if let Some(slot) = list.iter_mut().find(|e| e.id == event.id) {
                *slot = event.clone();
            }
        }
        if self.current_event.as_ref().map(|e| e.id) == Some(event.id) {
            self.current_event = Some(event.clone());
        }
    }

    /// Drop a deleted event from every list
    pub fn remove_event(&mut self, event_id: i64) {
        for list in [
            &mut self.events,
            &mut self.my_events,
            &mut self.featured_events,
            &mut self.upcoming_events,
            &mut self.ongoing_events,
        ] {
            list.retain(|e| e.id != event_id);
        }
        if self.current_event.as_ref().map(|e| e.id) == Some(event_id) {
            self.current_event = None;
        }
    }

    /// Clear the registration-specific error; called when the user edits
    /// the implicated field
    pub fn clear_registration_error(&mut self) {
        self.registration_error = None;
    }
}

/// Store orchestrating the event/registration services and applying the
/// three-state operation pattern to [`EventState`]
#[derive(Debug)]
pub struct EventStore {
    events: EventService,
    registrations: RegistrationService,
    pub state: EventState,
}

impl EventStore {
    /// Create a new EventStore instance
    pub fn new(events: EventService, registrations: RegistrationService) -> Self {
        Self {
            events,
            registrations,
            state: EventState::default(),
        }
    }

    /// Fetch the main event list
    pub async fn fetch_events(&mut self, filters: &EventFilters) -> Result<()> {
        self.state.loading.events = true;
        self.state.error = None;

        let outcome = self.events.list_events(filters).await;
        self.state.loading.events = false;

        match outcome {
            Ok(page) => {
                self.state.pagination = Pagination::from_page(
                    &page,
                    filters.page.unwrap_or(1),
                    filters.page_size.unwrap_or(page.results.len() as u32),
                );
                self.state.events = page.results;
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch the current user's events
    pub async fn fetch_my_events(&mut self, filters: &EventFilters) -> Result<()> {
        self.state.loading.events = true;
        self.state.error = None;

        let outcome = self.events.my_events(filters).await;
        self.state.loading.events = false;

        match outcome {
            Ok(page) => {
                self.state.my_events = page.results;
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch the featured/upcoming/ongoing dashboard lists
    pub async fn fetch_dashboard_lists(&mut self) -> Result<()> {
        self.state.loading.events = true;
        self.state.error = None;

        let outcome = futures::future::try_join3(
            self.events.featured_events(),
            self.events.upcoming_events(),
            self.events.ongoing_events(),
        )
        .await;
        self.state.loading.events = false;

        match outcome {
            Ok((featured, upcoming, ongoing)) => {
                self.state.featured_events = featured.results;
                self.state.upcoming_events = upcoming.results;
                self.state.ongoing_events = ongoing.results;
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch one event into the current-event slot
    pub async fn fetch_event(&mut self, event_id: i64) -> Result<()> {
        self.state.loading.event_detail = true;
        self.state.error = None;

        let outcome = self.events.get_event(event_id).await;
        self.state.loading.event_detail = false;

        match outcome {
            Ok(event) => {
                debug!(event_id = event.id, "Current event loaded");
                self.state.merge_event(&event);
                self.state.current_event = Some(event);
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Run an event mutation and merge the returned entity everywhere
    async fn apply_event_mutation<F>(&mut self, op: F) -> Result<()>
    where
        F: std::future::Future<Output = Result<Event>>,
    {
        self.state.loading.event_mutation = true;
        self.state.error = None;

        let outcome = op.await;
        self.state.loading.event_mutation = false;

        match outcome {
            Ok(event) => {
                self.state.merge_event(&event);
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn create_event(&mut self, request: &crate::models::CreateEventRequest) -> Result<()> {
        self.state.loading.event_mutation = true;
        self.state.error = None;
        let outcome = self.events.create_event(request).await;
        self.state.loading.event_mutation = false;

        match outcome {
            // A created event is new everywhere; merge only refreshes
            // existing entries, so push it onto the main list as well.
            Ok(event) => {
                self.state.merge_event(&event);
                self.state.events.insert(0, event);
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn update_event(
        &mut self,
        event_id: i64,
        request: &crate::models::UpdateEventRequest,
    ) -> Result<()> {
        let events = self.events.clone();
        self.apply_event_mutation(events.update_event(event_id, request)).await
    }

    pub async fn publish_event(&mut self, event_id: i64) -> Result<()> {
        let events = self.events.clone();
        self.apply_event_mutation(events.publish_event(event_id)).await
    }

    pub async fn cancel_event(&mut self, event_id: i64) -> Result<()> {
        let events = self.events.clone();
        self.apply_event_mutation(events.cancel_event(event_id)).await
    }

    pub async fn delete_event(&mut self, event_id: i64) -> Result<()> {
        self.state.loading.event_mutation = true;
        self.state.error = None;

        let outcome = self.events.delete_event(event_id).await;
        self.state.loading.event_mutation = false;

        match outcome {
            Ok(()) => {
                self.state.remove_event(event_id);
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch a registration list
    pub async fn fetch_registrations(&mut self, filters: &RegistrationFilters) -> Result<()> {
        self.state.loading.registrations = true;
        self.state.error = None;

        let outcome = self.registrations.list(filters).await;
        self.state.loading.registrations = false;

        match outcome {
            Ok(page) => {
                self.state.registrations_total = page.count;
                self.state.registrations = page.results;
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Create a registration directly (the free/simple path). Paid
    /// registrations go through the workflow instead. On success the
    /// parent event is refetched so counts come from the server.
    pub async fn register(&mut self, request: &RegistrationRequest) -> Result<Registration> {
        self.state.loading.registration_mutation = true;
        self.state.registration_error = None;

        let outcome = self.registrations.register(request).await;
        self.state.loading.registration_mutation = false;

        match outcome {
            Ok(registration) => {
                self.state.registrations.insert(0, registration.clone());
                if let Ok(event) = self.events.get_event(registration.event_id).await {
                    self.state.merge_event(&event);
                }
                Ok(registration)
            }
            Err(e) => {
                self.state.registration_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Cancel a registration, then refetch the parent event
    pub async fn cancel_registration(&mut self, registration_id: i64) -> Result<()> {
        self.state.loading.registration_mutation = true;
        self.state.registration_error = None;

        let outcome = self.registrations.cancel(registration_id).await;
        self.state.loading.registration_mutation = false;

        match outcome {
            Ok(registration) => {
                if let Some(slot) = self
                    .state
                    .registrations
                    .iter_mut()
                    .find(|r| r.id == registration.id)
                {
                    *slot = registration.clone();
                }
                if let Ok(event) = self.events.get_event(registration.event_id).await {
                    self.state.merge_event(&event);
                }
                Ok(())
            }
            Err(e) => {
                self.state.registration_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Compensating cancel for a registration's payment
    pub async fn cancel_payment(&mut self, registration_id: i64) -> Result<()> {
        self.state.loading.registration_mutation = true;
        self.state.registration_error = None;

        let outcome = self.registrations.cancel_payment(registration_id).await;
        self.state.loading.registration_mutation = false;

        if let Err(e) = outcome {
            self.state.registration_error = Some(e.user_message());
            return Err(e);
        }
        Ok(())
    }

    /// Fetch categories and tags together
    pub async fn fetch_taxonomy(&mut self) -> Result<()> {
        self.state.loading.taxonomy = true;
        self.state.error = None;

        let outcome =
            futures::future::try_join(self.events.categories(), self.events.tags()).await;
        self.state.loading.taxonomy = false;

        match outcome {
            Ok((categories, tags)) => {
                self.state.categories = categories;
                self.state.tags = tags;
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Clear the registration-specific error; called when the user edits
    /// the implicated field
    pub fn clear_registration_error(&mut self) {
        self.state.clear_registration_error();
    }

    /// Record a registration failure message without issuing a call.
    /// Used by the workflow so its failures land in the same slot.
    pub fn note_registration_error(&mut self, error: &EventDeskError) {
        self.state.registration_error = Some(error.user_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventStatus, PlaceType};
    use chrono::{Duration, Utc};

    fn event(id: i64, registrations: i32) -> Event {
        let now = Utc::now();
        Event {
            id,
            title: format!("Event {}", id),
            description: None,
            start_time: now + Duration::days(7),
            end_time: now + Duration::days(7) + Duration::hours(2),
            location: None,
            place_type: PlaceType::Unlimited,
            max_capacity: None,
            waitlist_enabled: false,
            price_cents: 0,
            currency: "USD".to_string(),
            status: EventStatus::Published,
            organizer_id: 1,
            current_registrations: registrations,
            ticket_types: Vec::new(),
            session_types: Vec::new(),
            category: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_merge_updates_every_containing_list() {
        let mut state = EventState::default();
        state.events = vec![event(1, 0), event(2, 0)];
        state.my_events = vec![event(1, 0)];
        state.featured_events = vec![event(3, 0)];
        state.current_event = Some(event(1, 0));

        state.merge_event(&event(1, 5));

        assert_eq!(state.events[0].current_registrations, 5);
        assert_eq!(state.my_events[0].current_registrations, 5);
        assert_eq!(state.current_event.as_ref().unwrap().current_registrations, 5);
        // Untouched entries stay as they were
        assert_eq!(state.events[1].current_registrations, 0);
        assert_eq!(state.featured_events[0].current_registrations, 0);
    }

    #[test]
    fn test_merge_does_not_insert_into_lists_missing_the_entity() {
        let mut state = EventState::default();
        state.events = vec![event(1, 0)];

        state.merge_event(&event(9, 3));

        assert_eq!(state.events.len(), 1);
        assert!(state.my_events.is_empty());
    }

    #[test]
    fn test_remove_event_clears_current() {
        let mut state = EventState::default();
        state.events = vec![event(1, 0), event(2, 0)];
        state.current_event = Some(event(2, 0));

        state.remove_event(2);

        assert_eq!(state.events.len(), 1);
        assert!(state.current_event.is_none());
    }

    #[test]
    fn test_registration_error_is_separate_and_clearable() {
        let mut state = EventState::default();
        state.error = Some("list fetch failed".to_string());
        state.registration_error = Some("duplicate email".to_string());

        state.clear_registration_error();

        assert!(state.registration_error.is_none());
        assert_eq!(state.error.as_deref(), Some("list fetch failed"));
    }
}
