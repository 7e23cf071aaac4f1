use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::admission::validate_reservation;
use crate::domain::availability::UnitAvailability;
use crate::domain::catalog::{
    BookingReservation, NewReservation, ReservationId, UnitId, UnitRecord,
};
use crate::domain::overlap::{DateRange, OverlapPolicy};
use crate::domain::unit_query::{UnitQuery, filter_units};
use crate::error::Result;
use crate::ports::catalog_store::CatalogStore;

/// Answers unit and reservation requests against a store.
///
/// Every call reads the store afresh; nothing is cached between requests. The
/// availability check and the append in [`BookingService::create_reservation`] are
/// two separate store calls, so concurrent requests for the last free room of a unit
/// can both be admitted.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn CatalogStore>,
    policy: OverlapPolicy,
}

impl BookingService {
    pub fn new(store: Arc<dyn CatalogStore>, policy: OverlapPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Units matching `query`, cheapest first.
    pub async fn list_units(&self, query: &UnitQuery) -> Result<Vec<UnitRecord>> {
        let stay = query.validate()?;
        let units = self.store.list_units().await.inspect_err(log_storage)?;
        let mut reservations = Vec::new();
        if stay.is_some() {
            for unit in units.iter().filter(|unit| query.within_price(unit)) {
                reservations.extend(
                    self.store
                        .reservations_for(unit.id())
                        .await
                        .inspect_err(log_storage)?,
                );
            }
        }
        filter_units(units, &reservations, query, self.policy)
    }

    pub async fn get_unit(&self, id: UnitId) -> Result<UnitRecord> {
        self.store.get_unit(id).await
    }

    pub async fn unit_availability(
        &self,
        id: UnitId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<UnitAvailability> {
        let range = DateRange::new(check_in, check_out)?;
        let unit = self.store.get_unit(id).await?;
        let reservations = self.store.reservations_for(id).await?;
        Ok(UnitAvailability::compute(
            &unit,
            &reservations,
            &range,
            self.policy,
        ))
    }

    pub async fn list_reservations(&self) -> Result<Vec<BookingReservation>> {
        self.store.list_reservations().await
    }

    pub async fn get_reservation(&self, id: ReservationId) -> Result<BookingReservation> {
        self.store.get_reservation(id).await
    }

    /// Admit and persist a reservation, or say why it cannot be admitted.
    pub async fn create_reservation(&self, request: NewReservation) -> Result<BookingReservation> {
        // A crossed range is rejected before the unit is even looked up.
        DateRange::new(request.start_date, request.end_date)?;
        let unit = self.store.get_unit(request.booking_info_id).await?;
        let existing = self
            .store
            .reservations_for(unit.id())
            .await
            .inspect_err(log_storage)?;
        if let Err(e) = validate_reservation(
            &unit,
            request.start_date,
            request.end_date,
            &existing,
            self.policy,
        ) {
            info!(
                unit_id = unit.id(),
                start_date = %request.start_date,
                end_date = %request.end_date,
                reason = e.code(),
                "reservation rejected"
            );
            return Err(e);
        }
        let created = self
            .store
            .append_reservation(request)
            .await
            .inspect_err(log_storage)?;
        info!(
            reservation_id = created.id,
            unit_id = created.booking_info_id,
            "reservation created"
        );
        Ok(created)
    }
}

fn log_storage(e: &crate::error::BookingError) {
    if !e.is_client_error() {
        warn!(error = %e, "storage call failed");
    }
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookingError;
    use crate::test_helpers::{CatalogBuilder, FailingStore, day, price};
    use pretty_assertions::assert_eq;

    fn ids(units: &[UnitRecord]) -> Vec<u64> {
        units.iter().map(UnitRecord::id).collect()
    }

    #[tokio::test]
    async fn list_units_without_filters_returns_everything_by_price() {
        let builder = CatalogBuilder::new();
        let expensive = builder.apartment("200").await;
        let cheap = builder.apartment("50").await;
        let hotel = builder.hotel("Harbour").await;
        let double = builder.room_type(hotel, "Double", 2, "60").await;

        let units = builder
            .service()
            .list_units(&UnitQuery::default())
            .await
            .unwrap();
        assert_eq!(ids(&units), vec![cheap, double, expensive]);
    }

    #[tokio::test]
    async fn availability_filter_skips_booked_apartment() {
        let builder = CatalogBuilder::new();
        let booked = builder.apartment("80").await;
        let free = builder.apartment("90").await;
        builder.reserve(booked, 2, 8).await;

        let query = UnitQuery {
            check_in: Some(day(3)),
            check_out: Some(day(5)),
            ..Default::default()
        };
        let units = builder.service().list_units(&query).await.unwrap();
        assert_eq!(ids(&units), vec![free]);
    }

    #[tokio::test]
    async fn list_units_rejects_half_a_stay() {
        let builder = CatalogBuilder::new();
        builder.apartment("80").await;
        let query = UnitQuery {
            check_out: Some(day(5)),
            ..Default::default()
        };
        let err = builder.service().list_units(&query).await.unwrap_err();
        assert_eq!(err.code(), "MissingDateParameter");
    }

    #[tokio::test]
    async fn create_reservation_admits_then_rejects() {
        let builder = CatalogBuilder::new();
        let loft = builder.apartment("80").await;
        let service = builder.service();

        let created = service
            .create_reservation(NewReservation {
                booking_info_id: loft,
                start_date: day(2),
                end_date: day(5),
            })
            .await
            .unwrap();
        assert_eq!(created.booking_info_id, loft);

        let err = service
            .create_reservation(NewReservation {
                booking_info_id: loft,
                start_date: day(4),
                end_date: day(6),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InsufficientCapacity { .. }));
        assert_eq!(service.list_reservations().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_reservation_for_unknown_unit_is_not_found() {
        let builder = CatalogBuilder::new();
        let err = builder
            .service()
            .create_reservation(NewReservation {
                booking_info_id: 12,
                start_date: day(2),
                end_date: day(5),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotFound { id: 12, .. }));
    }

    #[tokio::test]
    async fn crossed_dates_rejected_even_for_unknown_unit() {
        let builder = CatalogBuilder::new();
        let err = builder
            .service()
            .create_reservation(NewReservation {
                booking_info_id: 12,
                start_date: day(5),
                end_date: day(3),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "InvalidDateRange");
    }

    #[tokio::test]
    async fn unit_availability_reports_counts() {
        let builder = CatalogBuilder::new();
        let hotel = builder.hotel("Harbour").await;
        let double = builder.room_type(hotel, "Double", 2, "60").await;
        builder.reserve(double, 1, 3).await;

        let availability = builder
            .service()
            .unit_availability(double, day(1), day(2))
            .await
            .unwrap();
        assert_eq!(availability.total_rooms, 2);
        assert_eq!(availability.reserved, 1);
        assert_eq!(availability.available, 1);
    }

    #[tokio::test]
    async fn exclusive_checkout_policy_allows_back_to_back() {
        let builder = CatalogBuilder::new();
        let loft = builder.apartment("80").await;
        builder.reserve(loft, 2, 5).await;
        let service = BookingService::new(builder.store(), OverlapPolicy::ExclusiveCheckout);
        let created = service
            .create_reservation(NewReservation {
                booking_info_id: loft,
                start_date: day(5),
                end_date: day(7),
            })
            .await;
        assert!(created.is_ok());
    }

    #[tokio::test]
    async fn storage_failure_propagates_unchanged() {
        let service = BookingService::new(Arc::new(FailingStore), OverlapPolicy::Inclusive);
        let err = service
            .list_units(&UnitQuery {
                max_price: Some(price("10")),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Storage(_)));
        assert!(!err.is_client_error());
    }
}
