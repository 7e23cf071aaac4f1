use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::domain::catalog::{
    BookingInfo, BookingReservation, HotelRoom, HotelRoomType, Listing, ListingId, NewListing,
    NewReservation, ReservationId, RoomTypeId, UnitId, UnitRecord, UnitTarget,
};
use crate::error::Result;

/// Persistence collaborator for the catalog and its reservations.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_listing(&self, listing: NewListing) -> Result<Listing>;
    async fn insert_room_type(&self, hotel_id: ListingId, title: String) -> Result<HotelRoomType>;
    async fn insert_room(
        &self,
        room_type_id: RoomTypeId,
        room_number: String,
    ) -> Result<HotelRoom>;
    async fn insert_unit(&self, target: UnitTarget, price: BigDecimal) -> Result<BookingInfo>;

    /// All units in identifier order.
    async fn list_units(&self) -> Result<Vec<UnitRecord>>;
    async fn get_unit(&self, id: UnitId) -> Result<UnitRecord>;
    async fn reservations_for(&self, unit_id: UnitId) -> Result<Vec<BookingReservation>>;

    /// All reservations ordered by end date, then start date.
    async fn list_reservations(&self) -> Result<Vec<BookingReservation>>;
    async fn get_reservation(&self, id: ReservationId) -> Result<BookingReservation>;
    async fn append_reservation(&self, reservation: NewReservation) -> Result<BookingReservation>;
}
