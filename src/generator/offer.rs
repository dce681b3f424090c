use crate::codec::FullRecordParser;
use crate::error::GeneratorError;
use crate::generator::random::{
    generate_random_float, generate_random_value, get_random_item, get_random_items,
};
use crate::generator::traits::OfferGenerator;
use crate::generator::types::GeneratorConfig;
use crate::models::{Location, MockData, MockOffer, OfferType, SeedUser, UserType};
use chrono::{Days, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// Draws synthetic offers from a set of mock pools and encodes them in the full layout
pub struct TsvOfferGenerator<R: Rng = StdRng> {
    mock_data: MockData,
    config: GeneratorConfig,
    rng: R,
}

#[cfg(test)]
impl TsvOfferGenerator<StdRng> {
    /// Create a reproducible generator
    pub fn seeded(mock_data: MockData, seed: u64) -> Self {
        Self::with_rng(mock_data, GeneratorConfig::default(), rand::SeedableRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TsvOfferGenerator<R> {
    pub fn with_rng(mock_data: MockData, config: GeneratorConfig, rng: R) -> Self {
        Self {
            mock_data,
            config,
            rng,
        }
    }

    /// Draw one offer
    pub fn generate_offer(&mut self) -> Result<MockOffer, GeneratorError> {
        let Self {
            mock_data: data,
            config,
            rng,
        } = self;
        config.validate()?;

        let title = get_random_item(rng, &data.titles, "titles")?.clone();
        let description = get_random_item(rng, &data.descriptions, "descriptions")?.clone();
        let days_ago = generate_random_value(rng, config.min_days_ago, config.max_days_ago);
        // The line carries milliseconds only
        let post_date = Utc::now()
            .checked_sub_days(Days::new(u64::from(days_ago)))
            .ok_or_else(|| {
                GeneratorError::InvalidConfig(format!("post date {days_ago} days ago is out of range"))
            })?
            .trunc_subsecs(3);
        let city = get_random_item(rng, &data.cities, "cities")?.clone();
        let preview_image = get_random_item(rng, &data.preview_images, "previewImages")?.clone();
        let detail_images = leading_detail_images(&data.detail_images, config.detail_images_number)?;
        let is_premium = rng.gen_bool(0.5);
        let rating = generate_random_value(rng, config.min_rating, config.max_rating);
        let offer_type = *get_random_item(rng, OfferType::ALL, "offerType")?;
        let rooms_number = generate_random_value(rng, config.min_rooms, config.max_rooms);
        let guests_number = generate_random_value(rng, config.min_guests, config.max_guests);
        let price = generate_random_value(rng, config.min_price, config.max_price);
        let features = get_random_items(rng, &data.features, "features")?;
        let user = SeedUser {
            name: get_random_item(rng, &data.names, "names")?.clone(),
            email: get_random_item(rng, &data.emails, "emails")?.clone(),
            avatar_path: get_random_item(rng, &data.avatar_paths, "avatarPaths")?.clone(),
            password: config.password_sample.clone(),
            user_type: *get_random_item(rng, UserType::ALL, "userType")?,
        };
        let comments_number = generate_random_value(rng, config.min_comments, config.max_comments);
        let comment_text = get_random_item(rng, &data.comments_text, "commentsText")?.clone();
        let location = Location {
            latitude: generate_random_float(
                rng,
                config.min_degrees,
                config.max_degrees,
                config.location_precision,
            ),
            longitude: generate_random_float(
                rng,
                config.min_degrees,
                config.max_degrees,
                config.location_precision,
            ),
        };

        debug!("Generated offer {:?} in {}", title, city);

        Ok(MockOffer {
            title,
            description,
            post_date,
            city,
            preview_image,
            detail_images,
            is_premium,
            rating,
            offer_type,
            rooms_number,
            guests_number,
            price,
            features,
            user,
            comments_number,
            comment_text,
            location,
        })
    }
}

impl<R: Rng> OfferGenerator for TsvOfferGenerator<R> {
    fn generate(&mut self) -> Result<String, GeneratorError> {
        let offer = self.generate_offer()?;
        Ok(FullRecordParser::encode(&offer))
    }
}

fn leading_detail_images(pool: &[String], count: usize) -> Result<Vec<String>, GeneratorError> {
    if pool.is_empty() {
        return Err(GeneratorError::InvalidPool {
            pool: "detailImages",
        });
    }
    if pool.len() < count {
        return Err(GeneratorError::PoolTooSmall {
            pool: "detailImages",
            required: count,
            actual: pool.len(),
        });
    }
    Ok(pool[..count].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::SeedableRng;

    #[test]
    fn test_generate_emits_full_layout_line() {
        let mut generator = TsvOfferGenerator::seeded(MockData::sample(), 1);
        let line = generator.generate().unwrap();

        assert!(!line.ends_with('\n'));
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 22);
        assert_eq!(fields[16], "testpassword");
        assert_eq!(fields[5], MockData::sample().detail_images.join(";"));
    }

    #[test]
    fn test_same_seed_same_offers() {
        let mut first = TsvOfferGenerator::seeded(MockData::sample(), 77);
        let mut second = TsvOfferGenerator::seeded(MockData::sample(), 77);

        for _ in 0..5 {
            let a = first.generate_offer().unwrap();
            let b = second.generate_offer().unwrap();
            assert_eq!(a.title, b.title);
            assert_eq!(a.features, b.features);
            assert_eq!(a.location, b.location);
        }
    }

    #[test]
    fn test_post_date_within_a_month() {
        let mut generator = TsvOfferGenerator::seeded(MockData::sample(), 4);
        let offer = generator.generate_offer().unwrap();

        let age = Utc::now() - offer.post_date;
        assert!(age >= Duration::days(1) - Duration::seconds(1));
        assert!(age <= Duration::days(31) + Duration::seconds(1));
    }

    #[test]
    fn test_empty_titles_fail_fast() {
        let data = MockData {
            titles: Vec::new(),
            ..MockData::sample()
        };
        let mut generator = TsvOfferGenerator::seeded(data, 1);

        let err = generator.generate().unwrap_err();
        assert_eq!(err, GeneratorError::InvalidPool { pool: "titles" });
    }

    #[test]
    fn test_short_detail_image_pool_is_rejected() {
        let data = MockData {
            detail_images: vec!["one.jpg".to_string()],
            ..MockData::sample()
        };
        let mut generator = TsvOfferGenerator::seeded(data, 1);

        assert!(matches!(
            generator.generate_offer(),
            Err(GeneratorError::PoolTooSmall { required: 6, actual: 1, .. })
        ));
    }

    #[test]
    fn test_post_date_beyond_calendar_is_an_error() {
        let config = GeneratorConfig {
            min_days_ago: 100_000_000,
            max_days_ago: 100_000_000,
            ..Default::default()
        };
        let mut generator =
            TsvOfferGenerator::with_rng(MockData::sample(), config, StdRng::seed_from_u64(3));

        assert!(matches!(
            generator.generate(),
            Err(GeneratorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_oversized_precision_is_an_error() {
        let config = GeneratorConfig {
            location_precision: 400,
            ..Default::default()
        };
        let mut generator =
            TsvOfferGenerator::with_rng(MockData::sample(), config, StdRng::seed_from_u64(3));

        assert!(matches!(
            generator.generate_offer(),
            Err(GeneratorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_custom_ranges_are_used() {
        let config = GeneratorConfig {
            min_price: 500,
            max_price: 500,
            password_sample: "secret".to_string(),
            ..Default::default()
        };
        let mut generator =
            TsvOfferGenerator::with_rng(MockData::sample(), config, StdRng::seed_from_u64(9));

        let offer = generator.generate_offer().unwrap();
        assert_eq!(offer.price, 500);
        assert_eq!(offer.user.password, "secret");
    }
}
