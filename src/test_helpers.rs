use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::adapters::memory_store::MemoryStore;
use crate::domain::catalog::{
    BookingInfo, BookingReservation, HotelRoom, HotelRoomType, Listing, ListingId, ListingKind,
    NewListing, NewReservation, ReservationId, RoomTypeId, UnitId, UnitRecord, UnitTarget,
};
use crate::domain::overlap::{DateRange, OverlapPolicy};
use crate::error::{BookingError, Result};
use crate::ports::catalog_store::CatalogStore;
use crate::service::BookingService;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
}

pub fn range(start: u32, end: u32) -> DateRange {
    DateRange::new(day(start), day(end)).unwrap()
}

pub fn price(raw: &str) -> BigDecimal {
    BigDecimal::from_str(raw).unwrap()
}

pub fn reservation(id: ReservationId, unit: UnitId, start: u32, end: u32) -> BookingReservation {
    BookingReservation {
        id,
        booking_info_id: unit,
        start_date: day(start),
        end_date: day(end),
    }
}

pub fn new_listing(kind: ListingKind, title: &str) -> NewListing {
    NewListing {
        kind,
        title: title.into(),
        country: "Portugal".into(),
        city: "Lisbon".into(),
    }
}

pub fn apartment_record(id: UnitId, title: &str, unit_price: &str) -> UnitRecord {
    UnitRecord {
        info: BookingInfo {
            id,
            price: price(unit_price),
            target: UnitTarget::Apartment(id),
        },
        listing: Listing {
            id,
            kind: ListingKind::Apartment,
            title: title.into(),
            country: "Portugal".into(),
            city: "Lisbon".into(),
        },
        room_type: None,
        room_count: 0,
    }
}

pub fn hotel_record(
    id: UnitId,
    hotel: &str,
    room_type: &str,
    rooms: u32,
    unit_price: &str,
) -> UnitRecord {
    UnitRecord {
        info: BookingInfo {
            id,
            price: price(unit_price),
            target: UnitTarget::HotelRoomType(id),
        },
        listing: Listing {
            id: 100,
            kind: ListingKind::Hotel,
            title: hotel.into(),
            country: "Portugal".into(),
            city: "Porto".into(),
        },
        room_type: Some(HotelRoomType {
            id,
            hotel_id: 100,
            title: room_type.into(),
        }),
        room_count: rooms,
    }
}

/// Builds a catalog in a fresh [`MemoryStore`], one row family at a time.
pub struct CatalogBuilder {
    store: Arc<MemoryStore>,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn store(&self) -> Arc<dyn CatalogStore> {
        self.store.clone()
    }

    pub fn service(&self) -> BookingService {
        BookingService::new(self.store(), OverlapPolicy::Inclusive)
    }

    /// A priced apartment; returns its unit id.
    pub async fn apartment(&self, unit_price: &str) -> UnitId {
        let listing = self
            .store
            .insert_listing(new_listing(ListingKind::Apartment, "Apartment"))
            .await
            .unwrap();
        self.store
            .insert_unit(UnitTarget::Apartment(listing.id), price(unit_price))
            .await
            .unwrap()
            .id
    }

    pub async fn hotel(&self, title: &str) -> ListingId {
        self.store
            .insert_listing(new_listing(ListingKind::Hotel, title))
            .await
            .unwrap()
            .id
    }

    /// A priced room type with `rooms` rooms; returns its unit id.
    pub async fn room_type(
        &self,
        hotel: ListingId,
        title: &str,
        rooms: u32,
        unit_price: &str,
    ) -> UnitId {
        let room_type = self
            .store
            .insert_room_type(hotel, title.into())
            .await
            .unwrap();
        for n in 0..rooms {
            self.store
                .insert_room(room_type.id, format!("{}", 100 + n))
                .await
                .unwrap();
        }
        self.store
            .insert_unit(UnitTarget::HotelRoomType(room_type.id), price(unit_price))
            .await
            .unwrap()
            .id
    }

    /// Record a reservation directly, bypassing admission.
    pub async fn reserve(&self, unit: UnitId, start: u32, end: u32) -> BookingReservation {
        self.store
            .append_reservation(NewReservation {
                booking_info_id: unit,
                start_date: day(start),
                end_date: day(end),
            })
            .await
            .unwrap()
    }
}

/// A store whose every call fails the way an unreachable database would.
pub struct FailingStore;

fn down<T>() -> Result<T> {
    Err(BookingError::Storage("database unavailable".into()))
}

#[async_trait]
impl CatalogStore for FailingStore {
    async fn insert_listing(&self, _listing: NewListing) -> Result<Listing> {
        down()
    }
    async fn insert_room_type(
        &self,
        _hotel_id: ListingId,
        _title: String,
    ) -> Result<HotelRoomType> {
        down()
    }
    async fn insert_room(
        &self,
        _room_type_id: RoomTypeId,
        _room_number: String,
    ) -> Result<HotelRoom> {
        down()
    }
    async fn insert_unit(&self, _target: UnitTarget, _price: BigDecimal) -> Result<BookingInfo> {
        down()
    }
    async fn list_units(&self) -> Result<Vec<UnitRecord>> {
        down()
    }
    async fn get_unit(&self, _id: UnitId) -> Result<UnitRecord> {
        down()
    }
    async fn reservations_for(&self, _unit_id: UnitId) -> Result<Vec<BookingReservation>> {
        down()
    }
    async fn list_reservations(&self) -> Result<Vec<BookingReservation>> {
        down()
    }
    async fn get_reservation(&self, _id: ReservationId) -> Result<BookingReservation> {
        down()
    }
    async fn append_reservation(&self, _reservation: NewReservation) -> Result<BookingReservation> {
        down()
    }
}
