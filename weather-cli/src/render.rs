//! Marker rendering: console lines and a GeoJSON document for map viewers.

use serde_json::{Value, json};
use weather_core::{ColorBucket, Coordinate, WeatherRecord, classify_temperature};

/// One map marker: where, what, and which color.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub record: WeatherRecord,
    pub bucket: ColorBucket,
}

impl Marker {
    pub fn from_record(record: WeatherRecord) -> Self {
        Self {
            coordinate: record.coordinate(),
            bucket: classify_temperature(record.temperature),
            record,
        }
    }

    pub fn popup(&self) -> String {
        let r = &self.record;
        format!(
            "{} ||| Humidity: {}  Pressure: {}  Temp: {}°C  Max Temp: {}°C  Min Temp: {}°C",
            r.name, r.humidity, r.pressure, r.temperature, r.max_temperature, r.min_temperature
        )
    }

    fn feature(&self) -> Value {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [self.coordinate.longitude, self.coordinate.latitude],
            },
            "properties": {
                "marker-color": self.bucket,
                "popup": self.popup(),
                "weather": self.record,
            },
        })
    }
}

pub fn feature_collection(markers: &[Marker]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": markers.iter().map(Marker::feature).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(temperature: f64) -> WeatherRecord {
        WeatherRecord {
            name: "Berlin".into(),
            latitude: 52.5,
            longitude: 13.4,
            humidity: 60.0,
            pressure: 1012.0,
            temperature,
            max_temperature: 24.0,
            min_temperature: 20.0,
        }
    }

    #[test]
    fn marker_is_classified_by_current_temperature() {
        let marker = Marker::from_record(record(22.5));
        assert_eq!(marker.bucket.hex(), "#e5b91b");
        assert_eq!(marker.coordinate, Coordinate::new(52.5, 13.4).unwrap());

        let marker = Marker::from_record(record(-20.0));
        assert_eq!(marker.bucket, ColorBucket::Frigid);
    }

    #[test]
    fn popup_lists_every_field() {
        let popup = Marker::from_record(record(22.5)).popup();
        assert_eq!(
            popup,
            "Berlin ||| Humidity: 60  Pressure: 1012  Temp: 22.5°C  Max Temp: 24°C  Min Temp: 20°C"
        );
    }

    #[test]
    fn geojson_puts_longitude_first() {
        let doc = feature_collection(&[Marker::from_record(record(31.0))]);

        assert_eq!(doc["type"], "FeatureCollection");
        let feature = &doc["features"][0];
        assert_eq!(feature["geometry"]["coordinates"], json!([13.4, 52.5]));
        assert_eq!(feature["properties"]["marker-color"], "#e51b1b");
        assert_eq!(feature["properties"]["weather"]["lat"], 52.5);
        assert_eq!(feature["properties"]["weather"]["name"], "Berlin");
    }

    #[test]
    fn empty_collection_is_valid() {
        let doc = feature_collection(&[]);
        assert_eq!(doc["features"], json!([]));
    }
}
