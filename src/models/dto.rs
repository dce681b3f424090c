use std::collections::BTreeMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{City, CompactOfferRecord, Feature, LocationRecord, OfferDetails, OfferRecord, OfferType};

/// Field limits shared by offer payloads and imported records
pub mod constraints {
    pub const TITLE_MIN_LENGTH: usize = 10;
    pub const TITLE_MAX_LENGTH: usize = 100;
    pub const DESCRIPTION_MIN_LENGTH: usize = 20;
    pub const DESCRIPTION_MAX_LENGTH: usize = 1024;
    pub const PREVIEW_IMAGE_MAX_LENGTH: usize = 256;
    pub const DETAIL_IMAGES_COUNT: usize = 6;
    pub const DETAIL_IMAGE_MAX_LENGTH: usize = 256;
    pub const RATING_MIN: i64 = 1;
    pub const RATING_MAX: i64 = 5;
    pub const ROOMS_NUMBER_MIN: i64 = 1;
    pub const ROOMS_NUMBER_MAX: i64 = 8;
    pub const GUESTS_NUMBER_MIN: i64 = 1;
    pub const GUESTS_NUMBER_MAX: i64 = 10;
    pub const PRICE_MIN: i64 = 100;
    pub const PRICE_MAX: i64 = 100_000;
    pub const COMMENTS_NUMBER_MIN: i64 = 0;
    pub const COMMENTS_NUMBER_MAX: i64 = 500;
}

use constraints::*;

/// A single failed field with every constraint it broke, keyed by constraint name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub property: String,
    pub value: Value,
    pub constraints: BTreeMap<String, String>,
}

/// Types that can report their own constraint violations
pub trait Validate {
    fn validate(&self) -> Vec<ValidationError>;
}

/// Partial offer update; absent fields are not checked.
///
/// Fields whose JSON type or vocabulary can be wrong stay raw so a bad value
/// becomes a validation error instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOffer {
    pub title: Option<String>,
    pub description: Option<String>,
    pub post_date: Option<Value>,
    pub city: Option<Value>,
    pub preview_image: Option<String>,
    pub detail_images: Option<Value>,
    pub is_premium: Option<Value>,
    pub offer_type: Option<Value>,
    pub rooms_number: Option<Value>,
    pub guests_number: Option<Value>,
    pub price: Option<Value>,
    pub features: Option<Value>,
    pub location: Option<Value>,
}

impl Validate for UpdateOffer {
    fn validate(&self) -> Vec<ValidationError> {
        let mut checks = Checks::default();

        if let Some(title) = &self.title {
            checks.length("title", title, TITLE_MIN_LENGTH, TITLE_MAX_LENGTH);
        }
        if let Some(description) = &self.description {
            checks.length("description", description, DESCRIPTION_MIN_LENGTH, DESCRIPTION_MAX_LENGTH);
        }
        if let Some(post_date) = &self.post_date {
            checks.date_string("postDate", post_date);
        }
        if let Some(city) = &self.city {
            checks.member(
                "city",
                city,
                |name| City::from_name(name).is_some(),
                "city must be a value from the city list",
            );
        }
        if let Some(preview_image) = &self.preview_image {
            checks.max_length("previewImage", preview_image, PREVIEW_IMAGE_MAX_LENGTH);
        }
        if let Some(detail_images) = &self.detail_images {
            checks.detail_image_values(detail_images);
        }
        if let Some(is_premium) = &self.is_premium {
            checks.boolean("isPremium", is_premium);
        }
        if let Some(offer_type) = &self.offer_type {
            checks.member(
                "offerType",
                offer_type,
                |name| OfferType::from_name(name).is_some(),
                "offerType must be a value from the offer type list",
            );
        }
        if let Some(rooms) = &self.rooms_number {
            checks.integer("roomsNumber", rooms, ROOMS_NUMBER_MIN, ROOMS_NUMBER_MAX);
        }
        if let Some(guests) = &self.guests_number {
            checks.integer("guestsNumber", guests, GUESTS_NUMBER_MIN, GUESTS_NUMBER_MAX);
        }
        if let Some(price) = &self.price {
            checks.integer("price", price, PRICE_MIN, PRICE_MAX);
        }
        if let Some(features) = &self.features {
            checks.feature_values(features);
        }
        if let Some(location) = &self.location {
            match serde_json::from_value::<LocationRecord>(location.clone()) {
                Ok(record) => checks.location(&record),
                Err(_) => checks.fail(
                    "location",
                    location.clone(),
                    "isNotEmptyObject",
                    "\"location\" field must hold a latitude and a longitude",
                ),
            }
        }

        checks.into_errors()
    }
}

impl Validate for OfferDetails {
    fn validate(&self) -> Vec<ValidationError> {
        let mut checks = Checks::default();

        checks.length("title", &self.title, TITLE_MIN_LENGTH, TITLE_MAX_LENGTH);
        checks.length("description", &self.description, DESCRIPTION_MIN_LENGTH, DESCRIPTION_MAX_LENGTH);
        checks.present("postDate", self.post_date, "postDate must be valid ISO date");
        checks.present("city", self.city, "city must be a value from the city list");
        checks.max_length("previewImage", &self.preview_image, PREVIEW_IMAGE_MAX_LENGTH);
        checks.detail_images(&self.detail_images);
        checks.present("isPremium", self.is_premium, "isPremium must be \"true\" or \"false\"");
        checks.optional_range("rating", self.rating, RATING_MIN, RATING_MAX);
        checks.present("offerType", self.offer_type, "offerType must be a value from the offer type list");
        checks.optional_range("roomsNumber", self.rooms_number, ROOMS_NUMBER_MIN, ROOMS_NUMBER_MAX);
        checks.optional_range("guestsNumber", self.guests_number, GUESTS_NUMBER_MIN, GUESTS_NUMBER_MAX);
        checks.optional_range("price", self.price, PRICE_MIN, PRICE_MAX);
        if self.features.iter().any(Option::is_none) {
            checks.fail(
                "features",
                json!(self.features),
                "isEnum",
                "features must be values from the feature list",
            );
        }
        checks.location(&self.location);

        checks.into_errors()
    }
}

impl Validate for OfferRecord {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.offer.validate();
        let mut checks = Checks::default();
        checks.present("userType", self.user.user_type, "userType must be \"Pro\" or \"Regular\"");
        checks.optional_range("commentsNumber", self.comments_number, COMMENTS_NUMBER_MIN, COMMENTS_NUMBER_MAX);
        errors.extend(checks.into_errors());
        errors
    }
}

impl Validate for CompactOfferRecord {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.offer.validate();
        let mut checks = Checks::default();
        if self.user_id.trim().is_empty() {
            checks.fail("userId", json!(self.user_id), "isNotEmpty", "userId must not be empty");
        }
        checks.optional_range("commentsNumber", self.comments_number, COMMENTS_NUMBER_MIN, COMMENTS_NUMBER_MAX);
        errors.extend(checks.into_errors());
        errors
    }
}

/// Accumulates violations, merging constraints that hit the same property
#[derive(Default)]
struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    fn fail(&mut self, property: &str, value: Value, constraint: &str, message: impl Into<String>) {
        let message = message.into();
        if let Some(existing) = self.errors.iter_mut().find(|e| e.property == property) {
            existing.constraints.insert(constraint.to_string(), message);
            return;
        }

        self.errors.push(ValidationError {
            property: property.to_string(),
            value,
            constraints: BTreeMap::from([(constraint.to_string(), message)]),
        });
    }

    fn length(&mut self, property: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            self.fail(
                property,
                json!(value),
                "length",
                format!("Min {property} length is {min}, max is {max}"),
            );
        }
    }

    fn max_length(&mut self, property: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.fail(
                property,
                json!(value),
                "maxLength",
                format!("Too long for field \"{property}\""),
            );
        }
    }

    fn range(&mut self, property: &str, value: i64, min: i64, max: i64) {
        if value < min {
            self.fail(property, json!(value), "min", format!("Minimum {property} is {min}"));
        }
        if value > max {
            self.fail(property, json!(value), "max", format!("Maximum {property} is {max}"));
        }
    }

    fn optional_range(&mut self, property: &str, value: Option<u32>, min: i64, max: i64) {
        match value {
            Some(value) => self.range(property, i64::from(value), min, max),
            None => self.fail(
                property,
                Value::Null,
                "isInt",
                format!("{property} must be an integer"),
            ),
        }
    }

    fn integer(&mut self, property: &str, value: &Value, min: i64, max: i64) {
        match value.as_i64() {
            Some(number) => self.range(property, number, min, max),
            None => self.fail(
                property,
                value.clone(),
                "isInt",
                format!("{property} must be an integer"),
            ),
        }
    }

    /// `value` must be a string naming one entry of a vocabulary
    fn member(&mut self, property: &str, value: &Value, known: impl Fn(&str) -> bool, message: &str) {
        if !value.as_str().is_some_and(known) {
            self.fail(property, value.clone(), "isEnum", message);
        }
    }

    fn date_string(&mut self, property: &str, value: &Value) {
        let parsed = value
            .as_str()
            .map(|text| DateTime::parse_from_rfc3339(text).is_ok());
        if parsed != Some(true) {
            self.fail(
                property,
                value.clone(),
                "isDateString",
                format!("{property} must be valid ISO date"),
            );
        }
    }

    fn boolean(&mut self, property: &str, value: &Value) {
        if !value.is_boolean() {
            self.fail(
                property,
                value.clone(),
                "isBoolean",
                format!("{property} must be \"true\" or \"false\""),
            );
        }
    }

    fn detail_image_values(&mut self, value: &Value) {
        let images: Option<Vec<String>> = value
            .as_array()
            .and_then(|items| items.iter().map(|item| item.as_str().map(str::to_string)).collect());
        match images {
            Some(images) => self.detail_images(&images),
            None => self.fail(
                "detailImages",
                value.clone(),
                "isArray",
                "detailImages must be an array of strings",
            ),
        }
    }

    fn feature_values(&mut self, value: &Value) {
        let Some(items) = value.as_array() else {
            self.fail("features", value.clone(), "isArray", "features must be an array");
            return;
        };
        let all_known = items
            .iter()
            .all(|item| item.as_str().and_then(Feature::from_name).is_some());
        if !all_known {
            self.fail(
                "features",
                value.clone(),
                "isEnum",
                "features must be values from the feature list",
            );
        }
    }

    fn present<T>(&mut self, property: &str, value: Option<T>, message: &str) {
        if value.is_none() {
            self.fail(property, Value::Null, "isDefined", message);
        }
    }

    fn detail_images(&mut self, images: &[String]) {
        if images.len() != DETAIL_IMAGES_COUNT {
            self.fail(
                "detailImages",
                json!(images),
                "arraySize",
                format!("detailImages should only contain {DETAIL_IMAGES_COUNT} values"),
            );
        }
        if images.iter().any(|image| image.chars().count() > DETAIL_IMAGE_MAX_LENGTH) {
            self.fail(
                "detailImages",
                json!(images),
                "maxLength",
                "Too long for field \"detailImages\"",
            );
        }
    }

    fn location(&mut self, location: &LocationRecord) {
        if location.latitude.is_none() || location.longitude.is_none() {
            self.fail(
                "location",
                json!(location),
                "isNotEmptyObject",
                "\"location\" field must hold a latitude and a longitude",
            );
        }
    }

    fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn valid_details() -> OfferDetails {
        OfferDetails {
            title: "Canal view apartment".to_string(),
            description: "Bright two room flat with a balcony over the canal.".to_string(),
            post_date: Some(Utc::now()),
            city: Some(City::Amsterdam),
            preview_image: "apartment-01.jpg".to_string(),
            detail_images: (1..=6).map(|i| format!("photo-{i}.jpg")).collect(),
            is_premium: Some(false),
            rating: Some(4),
            offer_type: Some(OfferType::Apartment),
            rooms_number: Some(2),
            guests_number: Some(3),
            price: Some(1200),
            features: vec![Some(Feature::Washer), Some(Feature::Fridge)],
            location: LocationRecord {
                latitude: Some(52.370216),
                longitude: Some(4.895168),
            },
        }
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateOffer::default().validate().is_empty());
    }

    #[test]
    fn test_update_reports_each_broken_field() {
        let update = UpdateOffer {
            title: Some("Short".to_string()),
            rooms_number: Some(json!(9)),
            price: Some(json!(50)),
            detail_images: Some(json!(["one.jpg"])),
            ..Default::default()
        };

        let errors = update.validate();
        let properties: Vec<&str> = errors.iter().map(|e| e.property.as_str()).collect();
        assert_eq!(properties, vec!["title", "detailImages", "roomsNumber", "price"]);
        assert_eq!(errors[2].constraints["max"], "Maximum roomsNumber is 8");
        assert_eq!(errors[3].constraints["min"], "Minimum price is 100");
    }

    #[test]
    fn test_update_deserializes_from_camel_case() {
        let update: UpdateOffer =
            serde_json::from_str(r#"{"guestsNumber": 0, "city": "Cologne"}"#).unwrap();
        assert_eq!(update.city, Some(json!("Cologne")));
        assert_eq!(update.validate()[0].property, "guestsNumber");
    }

    #[test]
    fn test_update_with_unknown_city_reports_every_field() {
        let update: UpdateOffer = serde_json::from_str(r#"{"city": "Berlin", "price": 50}"#).unwrap();

        let errors = update.validate();
        let properties: Vec<&str> = errors.iter().map(|e| e.property.as_str()).collect();
        assert_eq!(properties, vec!["city", "price"]);
        assert!(errors[0].constraints.contains_key("isEnum"));
        assert_eq!(errors[0].value, json!("Berlin"));
    }

    #[test]
    fn test_update_type_and_vocabulary_checks() {
        let update: UpdateOffer = serde_json::from_str(
            r#"{
                "postDate": "yesterday",
                "isPremium": "yes",
                "offerType": "Bungalow",
                "roomsNumber": "two",
                "features": ["Washer", "Sauna"],
                "location": "canal"
            }"#,
        )
        .unwrap();

        let errors = update.validate();
        let constraints: Vec<(&str, &str)> = errors
            .iter()
            .map(|e| (e.property.as_str(), e.constraints.keys().next().map(String::as_str).unwrap_or("")))
            .collect();
        assert_eq!(
            constraints,
            vec![
                ("postDate", "isDateString"),
                ("isPremium", "isBoolean"),
                ("offerType", "isEnum"),
                ("roomsNumber", "isInt"),
                ("features", "isEnum"),
                ("location", "isNotEmptyObject"),
            ]
        );
    }

    #[test]
    fn test_update_accepts_known_values() {
        let update: UpdateOffer = serde_json::from_str(
            r#"{
                "postDate": "2024-03-01T10:00:00.000Z",
                "city": "Hamburg",
                "isPremium": true,
                "offerType": "House",
                "features": ["Breakfast", "Towels"],
                "location": {"latitude": 53.550341, "longitude": 10.000654}
            }"#,
        )
        .unwrap();

        assert!(update.validate().is_empty());
    }

    #[test]
    fn test_valid_details_pass() {
        assert!(valid_details().validate().is_empty());
    }

    #[test]
    fn test_details_flag_unknown_tokens() {
        let mut details = valid_details();
        details.offer_type = None;
        details.features.push(None);
        details.price = None;

        let errors = details.validate();
        let properties: Vec<&str> = errors.iter().map(|e| e.property.as_str()).collect();
        assert_eq!(properties, vec!["offerType", "price", "features"]);
        assert!(errors[1].constraints.contains_key("isInt"));
    }

    #[test]
    fn test_compact_record_requires_user_id() {
        let record = CompactOfferRecord {
            offer: valid_details(),
            user_id: " ".to_string(),
            comments_number: Some(12),
        };

        let errors = record.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].property, "userId");
    }

    #[test]
    fn test_constraints_on_same_property_merge() {
        let mut details = valid_details();
        details.detail_images = vec!["x".repeat(300)];

        let errors = details.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].constraints.len(), 2);
    }
}
