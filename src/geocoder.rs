use crate::track::GeoPoint;
use anyhow::Result;
use std::collections::HashMap;

/// Resolves a human readable location to a coordinate.
pub trait Geocoder {
    fn geocode(&self, query: &str) -> Result<GeoPoint>;
}

/// Understands literal `"lat,lng"` queries, e.g. `"51.5074, -0.1278"`.
pub struct CoordinateGeocoder;

impl Geocoder for CoordinateGeocoder {
    fn geocode(&self, query: &str) -> Result<GeoPoint> {
        let parse = || -> Option<GeoPoint> {
            let (lat, lng) = query.split_once(',')?;
            let lat: f64 = lat.trim().parse().ok()?;
            let lng: f64 = lng.trim().parse().ok()?;
            let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng);
            in_range.then_some(GeoPoint::new(lng, lat))
        };
        parse().ok_or_else(|| anyhow!("unable to find coordinates for center {query:?}"))
    }
}

/// A fixed table of named places.
#[derive(Default)]
pub struct StaticGeocoder {
    places: HashMap<String, GeoPoint>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, name: &str, location: GeoPoint) -> Self {
        self.places.insert(name.to_owned(), location);
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, query: &str) -> Result<GeoPoint> {
        match self.places.get(query) {
            Some(location) => Ok(*location),
            None => CoordinateGeocoder.geocode(query),
        }
    }
}
