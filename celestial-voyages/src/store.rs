//! Volatile in-memory store for every entity type.
//!
//! One `BTreeMap` per entity keyed by id, so listings come back in id order.
//! Ids are assigned from per-entity counters starting at 1. Everything is lost
//! on restart.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{
    Accommodation, Destination, Experience, Id, NewAccommodation, NewDestination, NewExperience,
    NewTravelClass, NewTrip, NewUser, TravelClass, Trip, User,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Username already exists")]
    DuplicateUsername,
}

#[derive(Debug, Clone)]
struct Table<T> {
    rows: BTreeMap<Id, T>,
    next_id: Id,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(Id) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: Id) -> Option<&T> {
        self.rows.get(&id)
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect::<Vec<_>>()
    }

    fn filtered(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .values()
            .filter(|row| keep(row))
            .cloned()
            .collect::<Vec<_>>()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemStore {
    users: Table<User>,
    destinations: Table<Destination>,
    travel_classes: Table<TravelClass>,
    accommodations: Table<Accommodation>,
    experiences: Table<Experience>,
    trips: Table<Trip>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, id: Id) -> Option<&User> {
        self.users.get(id)
    }

    /// Case-insensitive username lookup.
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        let wanted = username.trim().to_lowercase();
        self.users
            .rows
            .values()
            .find(|user| user.username.to_lowercase() == wanted)
    }

    pub fn create_user(&mut self, new: NewUser) -> Result<User, StoreError> {
        if self.user_by_username(&new.username).is_some() {
            return Err(StoreError::DuplicateUsername);
        }
        Ok(self.users.insert_with(|id| User {
            id,
            username: new.username.trim().to_string(),
            email: new.email.trim().to_string(),
            full_name: new.full_name.trim().to_string(),
            preferences: new.preferences,
            password: new.password,
        }))
    }

    pub fn destinations(&self) -> Vec<Destination> {
        self.destinations.all()
    }

    pub fn destination(&self, id: Id) -> Option<&Destination> {
        self.destinations.get(id)
    }

    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    pub fn create_destination(&mut self, new: NewDestination) -> Destination {
        self.destinations.insert_with(|id| Destination {
            id,
            name: new.name,
            description: new.description,
            kind: new.kind,
            image_url: new.image_url,
            distance: new.distance,
            duration: new.duration,
            base_price: new.base_price,
        })
    }

    pub fn travel_classes(&self) -> Vec<TravelClass> {
        self.travel_classes.all()
    }

    pub fn travel_class(&self, id: Id) -> Option<&TravelClass> {
        self.travel_classes.get(id)
    }

    pub fn create_travel_class(&mut self, new: NewTravelClass) -> TravelClass {
        self.travel_classes.insert_with(|id| TravelClass {
            id,
            name: new.name,
            description: new.description,
            price_multiplier: new.price_multiplier,
            features: new.features,
        })
    }

    pub fn accommodations(&self) -> Vec<Accommodation> {
        self.accommodations.all()
    }

    pub fn accommodations_for(&self, destination_id: Id) -> Vec<Accommodation> {
        self.accommodations
            .filtered(|row| row.destination_id == destination_id)
    }

    pub fn accommodation(&self, id: Id) -> Option<&Accommodation> {
        self.accommodations.get(id)
    }

    pub fn create_accommodation(&mut self, new: NewAccommodation) -> Accommodation {
        self.accommodations.insert_with(|id| Accommodation {
            id,
            name: new.name,
            description: new.description,
            destination_id: new.destination_id,
            image_url: new.image_url,
            capacity: new.capacity,
            size: new.size,
            price_per_night: new.price_per_night,
            amenities: new.amenities,
        })
    }

    pub fn experiences(&self) -> Vec<Experience> {
        self.experiences.all()
    }

    pub fn experiences_for(&self, destination_id: Id) -> Vec<Experience> {
        self.experiences
            .filtered(|row| row.destination_id == destination_id)
    }

    pub fn experience(&self, id: Id) -> Option<&Experience> {
        self.experiences.get(id)
    }

    pub fn create_experience(&mut self, new: NewExperience) -> Experience {
        self.experiences.insert_with(|id| Experience {
            id,
            name: new.name,
            description: new.description,
            destination_id: new.destination_id,
            image_url: new.image_url,
            duration: new.duration,
            price: new.price,
        })
    }

    pub fn trips_for_user(&self, user_id: Id) -> Vec<Trip> {
        self.trips.filtered(|row| row.user_id == user_id)
    }

    pub fn trip(&self, id: Id) -> Option<&Trip> {
        self.trips.get(id)
    }

    pub fn create_trip(&mut self, new: NewTrip) -> Trip {
        self.trips.insert_with(|id| Trip {
            id,
            user_id: new.user_id,
            destination_id: new.destination_id,
            travel_class_id: new.travel_class_id,
            accommodation_id: new.accommodation_id,
            departure_date: new.departure_date,
            return_date: new.return_date,
            total_price: new.total_price,
            status: new.status,
            booked_experiences: new.booked_experiences,
        })
    }
}
