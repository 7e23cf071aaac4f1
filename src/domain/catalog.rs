use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type ListingId = u64;
pub type RoomTypeId = u64;
pub type RoomId = u64;
pub type UnitId = u64;
pub type ReservationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Apartment,
    Hotel,
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apartment => write!(f, "apartment"),
            Self::Hotel => write!(f, "hotel"),
        }
    }
}

/// An apartment (itself bookable) or a hotel (a container for room types).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub kind: ListingKind,
    pub title: String,
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub kind: ListingKind,
    pub title: String,
    pub country: String,
    pub city: String,
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// A class of interchangeable rooms owned by one hotel listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelRoomType {
    pub id: RoomTypeId,
    pub hotel_id: ListingId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelRoom {
    pub id: RoomId,
    pub room_type_id: RoomTypeId,
    pub room_number: String,
}

impl std::fmt::Display for HotelRoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.room_number)
    }
}

/// What a priced unit books: a whole apartment, or one room out of a room type's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum UnitTarget {
    Apartment(ListingId),
    HotelRoomType(RoomTypeId),
}

/// The priced, reservable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInfo {
    pub id: UnitId,
    pub price: BigDecimal,
    pub target: UnitTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReservation {
    pub id: ReservationId,
    pub booking_info_id: UnitId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub booking_info_id: UnitId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A unit joined with the rows needed to describe it and derive its capacity.
///
/// `listing` is the apartment itself, or the hotel owning `room_type`.
/// `room_count` is the number of `HotelRoom` rows under the room type and is
/// always 0 for apartment units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    pub info: BookingInfo,
    pub listing: Listing,
    pub room_type: Option<HotelRoomType>,
    pub room_count: u32,
}

impl UnitRecord {
    pub fn id(&self) -> UnitId {
        self.info.id
    }

    pub fn price(&self) -> &BigDecimal {
        &self.info.price
    }

    pub fn title(&self) -> String {
        match &self.room_type {
            Some(room_type) => format!("{} - {}", self.listing.title, room_type.title),
            None => self.listing.title.clone(),
        }
    }

    pub fn summary(&self) -> UnitSummary {
        UnitSummary {
            id: self.info.id,
            price: self.info.price.clone(),
            title: self.title(),
            kind: self.listing.kind,
            country: self.listing.country.clone(),
            city: self.listing.city.clone(),
        }
    }
}

impl std::fmt::Display for UnitRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.title(), self.info.price)
    }
}

/// Flat wire form of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub id: UnitId,
    pub price: BigDecimal,
    pub title: String,
    pub kind: ListingKind,
    pub country: String,
    pub city: String,
}
