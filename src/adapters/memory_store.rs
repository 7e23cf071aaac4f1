use std::collections::BTreeMap;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use tokio::sync::RwLock;

use crate::domain::catalog::{
    BookingInfo, BookingReservation, HotelRoom, HotelRoomType, Listing, ListingId, ListingKind,
    NewListing, NewReservation, ReservationId, RoomId, RoomTypeId, UnitId, UnitRecord, UnitTarget,
};
use crate::error::{BookingError, Result};
use crate::ports::catalog_store::CatalogStore;

#[derive(Default)]
struct Tables {
    listings: BTreeMap<ListingId, Listing>,
    room_types: BTreeMap<RoomTypeId, HotelRoomType>,
    rooms: BTreeMap<RoomId, HotelRoom>,
    units: BTreeMap<UnitId, BookingInfo>,
    reservations: BTreeMap<ReservationId, BookingReservation>,
}

// Ids start at 1 and are never reused within a table.
fn next_id<V>(table: &BTreeMap<u64, V>) -> u64 {
    table.last_key_value().map_or(1, |(id, _)| id + 1)
}

impl Tables {
    fn listing(&self, id: ListingId) -> Result<&Listing> {
        self.listings.get(&id).ok_or(BookingError::NotFound {
            entity: "Listing",
            id,
        })
    }

    fn room_type(&self, id: RoomTypeId) -> Result<&HotelRoomType> {
        self.room_types.get(&id).ok_or(BookingError::NotFound {
            entity: "Hotel room type",
            id,
        })
    }

    fn join(&self, info: &BookingInfo) -> Result<UnitRecord> {
        let dangling = |e: BookingError| {
            BookingError::Storage(format!("unit {} has a dangling target: {e}", info.id))
        };
        match info.target {
            UnitTarget::Apartment(listing_id) => Ok(UnitRecord {
                info: info.clone(),
                listing: self.listing(listing_id).map_err(dangling)?.clone(),
                room_type: None,
                room_count: 0,
            }),
            UnitTarget::HotelRoomType(room_type_id) => {
                let room_type = self.room_type(room_type_id).map_err(dangling)?;
                let hotel = self.listing(room_type.hotel_id).map_err(dangling)?;
                let rooms = self
                    .rooms
                    .values()
                    .filter(|room| room.room_type_id == room_type_id)
                    .count();
                Ok(UnitRecord {
                    info: info.clone(),
                    listing: hotel.clone(),
                    room_type: Some(room_type.clone()),
                    room_count: u32::try_from(rooms).unwrap_or(u32::MAX),
                })
            }
        }
    }
}

/// Catalog and reservation tables held in process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_listing(&self, listing: NewListing) -> Result<Listing> {
        if listing.title.trim().is_empty() {
            return Err(BookingError::InvalidParams {
                reason: "listing title is required".into(),
            });
        }
        let mut tables = self.inner.write().await;
        let row = Listing {
            id: next_id(&tables.listings),
            kind: listing.kind,
            title: listing.title,
            country: listing.country,
            city: listing.city,
        };
        tables.listings.insert(row.id, row.clone());
        tracing::debug!(listing_id = row.id, kind = %row.kind, "inserted listing");
        Ok(row)
    }

    async fn insert_room_type(&self, hotel_id: ListingId, title: String) -> Result<HotelRoomType> {
        let mut tables = self.inner.write().await;
        let hotel = tables.listing(hotel_id)?;
        if hotel.kind != ListingKind::Hotel {
            return Err(BookingError::InvalidParams {
                reason: format!("listing {hotel_id} is not a hotel"),
            });
        }
        let row = HotelRoomType {
            id: next_id(&tables.room_types),
            hotel_id,
            title,
        };
        tables.room_types.insert(row.id, row.clone());
        tracing::debug!(room_type_id = row.id, hotel_id, "inserted hotel room type");
        Ok(row)
    }

    async fn insert_room(
        &self,
        room_type_id: RoomTypeId,
        room_number: String,
    ) -> Result<HotelRoom> {
        let mut tables = self.inner.write().await;
        tables.room_type(room_type_id)?;
        let row = HotelRoom {
            id: next_id(&tables.rooms),
            room_type_id,
            room_number,
        };
        tables.rooms.insert(row.id, row.clone());
        Ok(row)
    }

    async fn insert_unit(&self, target: UnitTarget, price: BigDecimal) -> Result<BookingInfo> {
        if price < BigDecimal::from(0) {
            return Err(BookingError::InvalidParams {
                reason: format!("price must not be negative, got {price}"),
            });
        }
        let mut tables = self.inner.write().await;
        match target {
            UnitTarget::Apartment(listing_id) => {
                if tables.listing(listing_id)?.kind != ListingKind::Apartment {
                    return Err(BookingError::InvalidParams {
                        reason: format!(
                            "listing {listing_id} is a hotel; price its room types instead"
                        ),
                    });
                }
            }
            UnitTarget::HotelRoomType(room_type_id) => {
                tables.room_type(room_type_id)?;
            }
        }
        if tables.units.values().any(|unit| unit.target == target) {
            return Err(BookingError::InvalidParams {
                reason: format!("{target:?} already has booking info"),
            });
        }
        let row = BookingInfo {
            id: next_id(&tables.units),
            price,
            target,
        };
        tables.units.insert(row.id, row.clone());
        tracing::debug!(unit_id = row.id, price = %row.price, "inserted booking info");
        Ok(row)
    }

    async fn list_units(&self) -> Result<Vec<UnitRecord>> {
        let tables = self.inner.read().await;
        tables.units.values().map(|info| tables.join(info)).collect()
    }

    async fn get_unit(&self, id: UnitId) -> Result<UnitRecord> {
        let tables = self.inner.read().await;
        let info = tables
            .units
            .get(&id)
            .ok_or(BookingError::NotFound { entity: "Unit", id })?;
        tables.join(info)
    }

    async fn reservations_for(&self, unit_id: UnitId) -> Result<Vec<BookingReservation>> {
        let tables = self.inner.read().await;
        Ok(tables
            .reservations
            .values()
            .filter(|r| r.booking_info_id == unit_id)
            .cloned()
            .collect())
    }

    async fn list_reservations(&self) -> Result<Vec<BookingReservation>> {
        let tables = self.inner.read().await;
        let mut rows: Vec<BookingReservation> = tables.reservations.values().cloned().collect();
        rows.sort_by_key(|r| (r.end_date, r.start_date, r.id));
        Ok(rows)
    }

    async fn get_reservation(&self, id: ReservationId) -> Result<BookingReservation> {
        let tables = self.inner.read().await;
        tables
            .reservations
            .get(&id)
            .cloned()
            .ok_or(BookingError::NotFound {
                entity: "Reservation",
                id,
            })
    }

    async fn append_reservation(&self, reservation: NewReservation) -> Result<BookingReservation> {
        if reservation.start_date > reservation.end_date {
            return Err(BookingError::InvalidDateRange {
                start: reservation.start_date,
                end: reservation.end_date,
            });
        }
        let mut tables = self.inner.write().await;
        if !tables.units.contains_key(&reservation.booking_info_id) {
            return Err(BookingError::NotFound {
                entity: "Unit",
                id: reservation.booking_info_id,
            });
        }
        let row = BookingReservation {
            id: next_id(&tables.reservations),
            booking_info_id: reservation.booking_info_id,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
        };
        tables.reservations.insert(row.id, row.clone());
        Ok(row)
    }
}
