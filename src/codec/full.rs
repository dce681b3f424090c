use super::tokenizer::{format_timestamp, join_fields, join_list, RecordTokens};
use super::{check_field_count, RecordParser};
use crate::models::{
    City, Feature, LocationRecord, MockOffer, OfferDetails, OfferRecord, OfferType, SeedUserRecord,
    UserType,
};

/// Full layout: offer, embedded seed user, comment seed, location (22 fields)
pub struct FullRecordParser;

impl FullRecordParser {
    /// Encode a generated offer. Field order must match `parse`.
    pub fn encode(offer: &MockOffer) -> String {
        join_fields(&[
            offer.title.clone(),
            offer.description.clone(),
            format_timestamp(&offer.post_date),
            offer.city.clone(),
            offer.preview_image.clone(),
            join_list(&offer.detail_images),
            offer.is_premium.to_string(),
            offer.rating.to_string(),
            offer.offer_type.to_string(),
            offer.rooms_number.to_string(),
            offer.guests_number.to_string(),
            offer.price.to_string(),
            join_list(&offer.features),
            offer.user.name.clone(),
            offer.user.email.clone(),
            offer.user.avatar_path.clone(),
            offer.user.password.clone(),
            offer.user.user_type.to_string(),
            offer.comments_number.to_string(),
            offer.comment_text.clone(),
            offer.location.latitude.to_string(),
            offer.location.longitude.to_string(),
        ])
    }
}

impl RecordParser for FullRecordParser {
    type Record = OfferRecord;

    const FIELD_COUNT: usize = 22;
    const NAME: &'static str = "full";

    fn parse(line: &str) -> OfferRecord {
        let tokens = RecordTokens::split(line);
        check_field_count(Self::NAME, Self::FIELD_COUNT, tokens.len());

        OfferRecord {
            offer: OfferDetails {
                title: tokens.text(0),
                description: tokens.text(1),
                post_date: tokens.timestamp(2),
                city: tokens.token(3).and_then(City::from_name),
                preview_image: tokens.text(4),
                detail_images: tokens.list(5),
                is_premium: tokens.boolean(6),
                rating: tokens.int(7),
                offer_type: tokens.token(8).and_then(OfferType::from_name),
                rooms_number: tokens.int(9),
                guests_number: tokens.int(10),
                price: tokens.int(11),
                features: tokens
                    .list(12)
                    .iter()
                    .map(|name| Feature::from_name(name))
                    .collect(),
                location: LocationRecord {
                    latitude: tokens.float(20),
                    longitude: tokens.float(21),
                },
            },
            user: SeedUserRecord {
                name: tokens.text(13),
                email: tokens.text(14),
                avatar_path: tokens.text(15),
                password: tokens.text(16),
                user_type: tokens.token(17).and_then(UserType::from_name),
            },
            comments_number: tokens.int(18),
            comment_text: tokens.text(19),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TsvOfferGenerator;
    use crate::models::{Location, MockData, SeedUser};
    use chrono::{TimeZone, Utc};

    fn sample_offer() -> MockOffer {
        MockOffer {
            title: "Nice, cozy, warm big bed apartment".to_string(),
            description: "Bright loft close to the central station.".to_string(),
            post_date: Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap(),
            city: "Hamburg".to_string(),
            preview_image: "apartment-01.jpg".to_string(),
            detail_images: (1..=6).map(|i| format!("photo-{i}.jpg")).collect(),
            is_premium: true,
            rating: 4,
            offer_type: OfferType::House,
            rooms_number: 3,
            guests_number: 5,
            price: 2500,
            features: vec!["Breakfast".to_string(), "Towels".to_string()],
            user: SeedUser {
                name: "Oliver".to_string(),
                email: "oliver@example.com".to_string(),
                avatar_path: "avatar-max.jpg".to_string(),
                password: "testpassword".to_string(),
                user_type: UserType::Pro,
            },
            comments_number: 17,
            comment_text: "Great location, would stay again.".to_string(),
            location: Location {
                latitude: 53.550341,
                longitude: 10.000654,
            },
        }
    }

    /// What decoding `offer` should give back
    fn expected_record(offer: &MockOffer) -> OfferRecord {
        OfferRecord {
            offer: OfferDetails {
                title: offer.title.clone(),
                description: offer.description.clone(),
                post_date: Some(offer.post_date),
                city: City::from_name(&offer.city),
                preview_image: offer.preview_image.clone(),
                detail_images: offer.detail_images.clone(),
                is_premium: Some(offer.is_premium),
                rating: Some(offer.rating),
                offer_type: Some(offer.offer_type),
                rooms_number: Some(offer.rooms_number),
                guests_number: Some(offer.guests_number),
                price: Some(offer.price),
                features: offer.features.iter().map(|f| Feature::from_name(f)).collect(),
                location: offer.location.into(),
            },
            user: SeedUserRecord {
                name: offer.user.name.clone(),
                email: offer.user.email.clone(),
                avatar_path: offer.user.avatar_path.clone(),
                password: offer.user.password.clone(),
                user_type: Some(offer.user.user_type),
            },
            comments_number: Some(offer.comments_number),
            comment_text: offer.comment_text.clone(),
        }
    }

    #[test]
    fn test_encode_field_layout() {
        let line = FullRecordParser::encode(&sample_offer());
        let fields: Vec<&str> = line.split('\t').collect();

        assert_eq!(fields.len(), FullRecordParser::FIELD_COUNT);
        assert_eq!(fields[2], "2024-05-02T08:30:00.000Z");
        assert_eq!(fields[6], "true");
        assert_eq!(fields[8], "House");
        assert_eq!(fields[12], "Breakfast;Towels");
        assert_eq!(fields[17], "Pro");
        assert_eq!(fields[20], "53.550341");
    }

    #[test]
    fn test_decode_with_trailing_newline() {
        let offer = sample_offer();
        let line = format!("{}\n", FullRecordParser::encode(&offer));
        assert_eq!(FullRecordParser::parse(&line), expected_record(&offer));
    }

    #[test]
    fn test_generated_offers_round_trip() {
        let mut generator = TsvOfferGenerator::seeded(MockData::sample(), 2024);

        for _ in 0..50 {
            let offer = generator.generate_offer().unwrap();
            let record = FullRecordParser::parse(&FullRecordParser::encode(&offer));
            assert_eq!(record, expected_record(&offer));
        }
    }

    #[test]
    fn test_generated_offers_respect_ranges() {
        let mut generator = TsvOfferGenerator::seeded(MockData::sample(), 99);

        for _ in 0..50 {
            let line = FullRecordParser::encode(&generator.generate_offer().unwrap());
            let record = FullRecordParser::parse(&line);
            let offer = &record.offer;

            assert_eq!(offer.detail_images.len(), 6);
            assert!(!offer.features.is_empty());
            assert!(offer.features.len() <= Feature::ALL.len());
            let mut seen: Vec<Feature> = offer.features.iter().flatten().copied().collect();
            assert_eq!(seen.len(), offer.features.len());
            seen.dedup();
            assert_eq!(seen.len(), offer.features.len());

            assert!((1..=5).contains(&offer.rating.unwrap()));
            assert!((1..=8).contains(&offer.rooms_number.unwrap()));
            assert!((1..=10).contains(&offer.guests_number.unwrap()));
            assert!((100..=100_000).contains(&offer.price.unwrap()));
            assert!((0..=500).contains(&record.comments_number.unwrap()));
            let latitude = offer.location.latitude.unwrap();
            let longitude = offer.location.longitude.unwrap();
            assert!((0.0..=90.0).contains(&latitude));
            assert!((0.0..=90.0).contains(&longitude));
        }
    }

    #[test]
    fn test_unknown_offer_type_is_none() {
        let line = FullRecordParser::encode(&sample_offer()).replace("\tHouse\t", "\tBungalow\t");
        let record = FullRecordParser::parse(&line);

        assert_eq!(record.offer.offer_type, None);
        assert_eq!(record.offer.city, Some(City::Hamburg));
        assert_eq!(record.offer.rooms_number, Some(3));
    }

    #[test]
    fn test_unknown_city_and_features_are_none() {
        let mut offer = sample_offer();
        offer.city = "Berlin".to_string();
        offer.features = vec!["Sauna".to_string(), "Washer".to_string()];

        let record = FullRecordParser::parse(&FullRecordParser::encode(&offer));
        assert_eq!(record.offer.city, None);
        assert_eq!(record.offer.features, vec![None, Some(Feature::Washer)]);
    }

    #[test]
    fn test_short_line_decodes_best_effort() {
        let record = FullRecordParser::parse("Studio\tTiny\tyesterday\tParis\tpreview.jpg");

        assert_eq!(record.offer.title, "Studio");
        assert_eq!(record.offer.post_date, None);
        assert_eq!(record.offer.city, Some(City::Paris));
        assert!(record.offer.detail_images.is_empty());
        assert_eq!(record.offer.price, None);
        assert_eq!(record.user.user_type, None);
        assert_eq!(record.offer.location, LocationRecord::default());
    }
}
