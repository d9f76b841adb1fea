use serde::Serialize;

/// A completed track point, as delivered once per `<trkpt>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    latitude: f64,
    longitude: f64,
    altitude: f64,
    timestamp: String,
    #[serde(skip)]
    has_altitude: bool,
}

impl Point {
    /// Altitude reported when the track point carries no `<ele>`.
    pub const ALTITUDE_UNSET: f64 = 0.0;

    /// A point at the given coordinates with no altitude and no timestamp.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: Self::ALTITUDE_UNSET,
            timestamp: String::new(),
            has_altitude: false,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.set_altitude(altitude);
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.set_timestamp(timestamp.into());
        self
    }

    pub(crate) fn set_altitude(&mut self, altitude: f64) {
        self.altitude = altitude;
        self.has_altitude = true;
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: String) {
        self.timestamp = timestamp;
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Meters, or [`Point::ALTITUDE_UNSET`] when no `<ele>` was present.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Whether an `<ele>` element supplied the altitude.
    pub fn has_altitude(&self) -> bool {
        self.has_altitude
    }

    /// Verbatim `<time>` text; empty when absent.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
