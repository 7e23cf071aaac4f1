use std::path::Path;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::catalog::{ListingKind, NewListing, NewReservation, UnitId, UnitTarget};
use crate::error::{BookingError, Result};
use crate::ports::catalog_store::CatalogStore;

/// A catalog description loaded at startup. Prices are decimal strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub listings: Vec<ListingSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingSeed {
    pub kind: ListingKind,
    pub title: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    /// Apartments only.
    #[serde(default)]
    pub price: Option<BigDecimal>,
    /// Apartments only.
    #[serde(default)]
    pub reservations: Vec<ReservationSeed>,
    /// Hotels only.
    #[serde(default)]
    pub room_types: Vec<RoomTypeSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomTypeSeed {
    pub title: String,
    /// A room type without a price is stored but cannot be booked.
    #[serde(default)]
    pub price: Option<BigDecimal>,
    #[serde(default)]
    pub rooms: Vec<String>,
    #[serde(default)]
    pub reservations: Vec<ReservationSeed>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReservationSeed {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub listings: usize,
    pub units: usize,
    pub rooms: usize,
    pub reservations: usize,
}

impl std::fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} listings, {} units, {} hotel rooms, {} reservations",
            self.listings, self.units, self.rooms, self.reservations
        )
    }
}

/// Parse and check a YAML catalog seed.
pub fn parse_catalog(text: &str) -> Result<CatalogSeed> {
    let seed: CatalogSeed = if text.trim().is_empty() {
        CatalogSeed::default()
    } else {
        serde_yml::from_str(text)?
    };
    for listing in &seed.listings {
        check_listing(listing)?;
    }
    Ok(seed)
}

fn check_listing(listing: &ListingSeed) -> Result<()> {
    let invalid = |reason: String| Err(BookingError::InvalidParams { reason });
    match listing.kind {
        ListingKind::Apartment => {
            if listing.price.is_none() {
                return invalid(format!("apartment '{}' has no price", listing.title));
            }
            if !listing.room_types.is_empty() {
                return invalid(format!("apartment '{}' cannot have room types", listing.title));
            }
        }
        ListingKind::Hotel => {
            if listing.price.is_some() || !listing.reservations.is_empty() {
                return invalid(format!(
                    "hotel '{}' is priced and reserved per room type",
                    listing.title
                ));
            }
            for room_type in &listing.room_types {
                if room_type.price.is_none() && !room_type.reservations.is_empty() {
                    return invalid(format!(
                        "room type '{}' has reservations but no price",
                        room_type.title
                    ));
                }
            }
        }
    }
    let all_reservations = listing
        .reservations
        .iter()
        .chain(listing.room_types.iter().flat_map(|rt| rt.reservations.iter()));
    for reservation in all_reservations {
        if reservation.start_date > reservation.end_date {
            return Err(BookingError::InvalidDateRange {
                start: reservation.start_date,
                end: reservation.end_date,
            });
        }
    }
    Ok(())
}

/// Insert every row described by `seed`. Seeded reservations are recorded as-is,
/// without an admission check.
pub async fn apply_catalog(store: &dyn CatalogStore, seed: &CatalogSeed) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();
    for listing_seed in &seed.listings {
        let listing = store
            .insert_listing(NewListing {
                kind: listing_seed.kind,
                title: listing_seed.title.clone(),
                country: listing_seed.country.clone(),
                city: listing_seed.city.clone(),
            })
            .await?;
        summary.listings += 1;

        if let Some(price) = &listing_seed.price {
            let unit = store
                .insert_unit(UnitTarget::Apartment(listing.id), price.clone())
                .await?;
            summary.units += 1;
            summary.reservations +=
                insert_reservations(store, unit.id, &listing_seed.reservations).await?;
        }

        for room_type_seed in &listing_seed.room_types {
            let room_type = store
                .insert_room_type(listing.id, room_type_seed.title.clone())
                .await?;
            for number in &room_type_seed.rooms {
                store.insert_room(room_type.id, number.clone()).await?;
                summary.rooms += 1;
            }
            if let Some(price) = &room_type_seed.price {
                let unit = store
                    .insert_unit(UnitTarget::HotelRoomType(room_type.id), price.clone())
                    .await?;
                summary.units += 1;
                summary.reservations +=
                    insert_reservations(store, unit.id, &room_type_seed.reservations).await?;
            }
        }
    }
    Ok(summary)
}

async fn insert_reservations(
    store: &dyn CatalogStore,
    unit_id: UnitId,
    reservations: &[ReservationSeed],
) -> Result<usize> {
    for reservation in reservations {
        store
            .append_reservation(NewReservation {
                booking_info_id: unit_id,
                start_date: reservation.start_date,
                end_date: reservation.end_date,
            })
            .await?;
    }
    Ok(reservations.len())
}

pub async fn load_catalog(store: &dyn CatalogStore, path: &Path) -> Result<SeedSummary> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BookingError::Config(format!(
            "failed to read catalog seed {}: {e}",
            path.display()
        ))
    })?;
    let seed = parse_catalog(&content)?;
    let summary = apply_catalog(store, &seed).await?;
    tracing::info!(path = %path.display(), %summary, "catalog seeded");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_store::MemoryStore;
    use std::io::Write as _;

    const SAMPLE: &str = r#"
listings:
  - kind: apartment
    title: Old Town Loft
    country: Portugal
    city: Lisbon
    price: "80.00"
    reservations:
      - { start_date: 2026-07-02, end_date: 2026-07-05 }
  - kind: hotel
    title: Harbour Hotel
    country: Portugal
    city: Porto
    room_types:
      - title: Double
        price: "60.00"
        rooms: ["201", "202"]
        reservations:
          - { start_date: 2026-07-01, end_date: 2026-07-03 }
      - title: Staff
        rooms: ["001"]
"#;

    #[test]
    fn parse_sample_catalog() {
        let seed = parse_catalog(SAMPLE).unwrap();
        assert_eq!(seed.listings.len(), 2);
        assert_eq!(seed.listings[1].room_types[0].rooms, vec!["201", "202"]);
        assert!(seed.listings[1].room_types[1].price.is_none());
    }

    #[test]
    fn bundled_catalog_parses() {
        let seed = parse_catalog(include_str!("../../catalog.yaml")).unwrap();
        assert_eq!(seed.listings.len(), 3);
        assert_eq!(seed.listings[2].room_types.len(), 3);
    }

    #[test]
    fn empty_document_is_empty_catalog() {
        assert!(parse_catalog("").unwrap().listings.is_empty());
    }

    #[test]
    fn apartment_without_price_rejected() {
        let err = parse_catalog("listings:\n  - kind: apartment\n    title: Loft\n").unwrap_err();
        assert!(err.to_string().contains("has no price"));
    }

    #[test]
    fn priced_hotel_rejected() {
        let err = parse_catalog("listings:\n  - kind: hotel\n    title: H\n    price: \"10\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("per room type"));
    }

    #[test]
    fn crossed_seed_reservation_rejected() {
        let text = "listings:\n  - kind: apartment\n    title: Loft\n    price: \"10\"\n    reservations:\n      - { start_date: 2026-07-05, end_date: 2026-07-01 }\n";
        let err = parse_catalog(text).unwrap_err();
        assert!(matches!(err, BookingError::InvalidDateRange { .. }));
    }

    #[test]
    fn invalid_yaml_rejected() {
        assert!(matches!(
            parse_catalog("listings: [[[").unwrap_err(),
            BookingError::Yaml(_)
        ));
    }

    #[tokio::test]
    async fn apply_sample_catalog() {
        let store = MemoryStore::new();
        let seed = parse_catalog(SAMPLE).unwrap();
        let summary = apply_catalog(&store, &seed).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                listings: 2,
                units: 2,
                rooms: 3,
                reservations: 2,
            }
        );
        assert_eq!(
            summary.to_string(),
            "2 listings, 2 units, 3 hotel rooms, 2 reservations"
        );

        let units = store.list_units().await.unwrap();
        assert_eq!(units[1].title(), "Harbour Hotel - Double");
        assert_eq!(units[1].room_count, 2);
    }

    #[tokio::test]
    async fn load_catalog_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{SAMPLE}").unwrap();
        let store = MemoryStore::new();
        let summary = load_catalog(&store, tmp.path()).await.unwrap();
        assert_eq!(summary.units, 2);
    }

    #[tokio::test]
    async fn load_catalog_missing_file_is_config_error() {
        let store = MemoryStore::new();
        let err = load_catalog(&store, Path::new("/tmp/nonexistent_catalog_seed_98765.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Config(_)));
    }
}
