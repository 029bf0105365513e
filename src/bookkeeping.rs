use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::TripData;

const SHIPPERS: &[&str] = &[
    "Acme Logistics",
    "Pinnacle Freight",
    "Midwest Distribution",
    "Coastal Supply Co.",
    "Summit Carriers",
];
const COMMODITIES: &[&str] = &[
    "General Merchandise",
    "Packaged Foods",
    "Electronics",
    "Building Materials",
    "Consumer Goods",
];
const PLATE_STATES: &[&str] = &["CA", "TX", "NY", "FL"];

/// Reproducible presentation fields attached to every daily log sheet for
/// one trip. Seeded from the request itself so identical requests produce
/// byte-identical output (no two sheets in the same trip share a plate or
/// BOL number, but re-planning the same trip reproduces the same ones).
pub struct Bookkeeping {
    rng: StdRng,
}

#[derive(Debug, Clone)]
pub struct TripIdentity {
    pub driver_name: String,
    pub driver_id: String,
    pub truck_number: String,
    pub trailer_number: String,
    pub carrier: String,
    pub home_terminal: String,
    pub shipping_doc_number: String,
    pub office_address: String,
    pub home_address: String,
    pub starting_odometer: f64,
}

#[derive(Debug, Clone)]
pub struct DailyIdentity {
    pub license_plate: String,
    pub shipper_commodity: String,
}

impl Bookkeeping {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Derives a seed from a trip's own content so the same request always
    /// plans to the same reproducible identifiers.
    pub fn seed_from_request(trip: &TripData, start_epoch_seconds: i64) -> u64 {
        let mut acc: u64 = 0xcbf29ce484222325; // FNV offset basis
        let mix = |acc: &mut u64, v: f64| {
            *acc ^= v.to_bits();
            *acc = acc.wrapping_mul(0x100000001b3);
        };
        mix(&mut acc, trip.current_location.coordinates.latitude);
        mix(&mut acc, trip.current_location.coordinates.longitude);
        mix(&mut acc, trip.pickup_location.coordinates.latitude);
        mix(&mut acc, trip.pickup_location.coordinates.longitude);
        mix(&mut acc, trip.dropoff_location.coordinates.latitude);
        mix(&mut acc, trip.dropoff_location.coordinates.longitude);
        mix(&mut acc, trip.current_cycle_used);
        acc ^= start_epoch_seconds as u64;
        acc
    }

    pub fn trip_identity(&mut self) -> TripIdentity {
        TripIdentity {
            driver_name: "John Doe".to_string(),
            driver_id: format!("DL{:07}", self.rng.gen_range(1_000_000..9_999_999)),
            truck_number: format!("TRK-{:04}", self.rng.gen_range(1000..9999)),
            trailer_number: format!("TRL-{:04}", self.rng.gen_range(1000..9999)),
            carrier: "Interstate Freight Carriers Inc.".to_string(),
            home_terminal: "Los Angeles, CA".to_string(),
            shipping_doc_number: format!("BOL-{:08}", self.rng.gen_range(10_000_000..99_999_999)),
            office_address: "1200 Commerce Blvd, Los Angeles, CA 90001".to_string(),
            home_address: "1200 Commerce Blvd, Los Angeles, CA 90001".to_string(),
            starting_odometer: self.rng.gen_range(100_000.0..500_000.0),
        }
    }

    pub fn daily_identity(&mut self) -> DailyIdentity {
        let state = PLATE_STATES[self.rng.gen_range(0..PLATE_STATES.len())];
        let plate_number: u32 = self.rng.gen_range(1000..9999);
        let plate_letters: String = (0..3)
            .map(|_| (b'A' + self.rng.gen_range(0u8..26)) as char)
            .collect();
        let shipper = SHIPPERS[self.rng.gen_range(0..SHIPPERS.len())];
        let commodity = COMMODITIES[self.rng.gen_range(0..COMMODITIES.len())];
        DailyIdentity {
            license_plate: format!("{plate_letters}-{plate_number} ({state})"),
            shipper_commodity: format!("{shipper} / {commodity}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_identical_identity() {
        let mut a = Bookkeeping::new(42);
        let mut b = Bookkeeping::new(42);
        let ia = a.trip_identity();
        let ib = b.trip_identity();
        assert_eq!(ia.driver_id, ib.driver_id);
        assert_eq!(ia.truck_number, ib.truck_number);
        assert_eq!(ia.starting_odometer, ib.starting_odometer);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let mut a = Bookkeeping::new(1);
        let mut b = Bookkeeping::new(2);
        assert_ne!(a.trip_identity().driver_id, b.trip_identity().driver_id);
    }

    #[test]
    fn license_plate_matches_expected_shape() {
        let mut b = Bookkeeping::new(7);
        let identity = b.daily_identity();
        assert!(identity.license_plate.contains('-'));
        assert!(identity.license_plate.contains('('));
    }
}
