use showroom_core::models::{Condition, FuelType, NewListing, PLACEHOLDER_IMAGE, Transmission};
use showroom_db::ListingRepository;
use uuid::Uuid;

use crate::integration::common::setup_test_db;

fn new_listing(title: &str) -> NewListing {
    NewListing {
        title: title.into(),
        price: 18500.0,
        currency: "USD".into(),
        location: Some("Austin, TX".into()),
        condition: Some(Condition::CertifiedPreOwned),
        transmission: Some(Transmission::Automatic),
        year: 2020,
        make: "Honda".into(),
        model: "Civic".into(),
        color: Some("Blue".into()),
        engine_size: Some("2.0L".into()),
        registered_state: Some("TX".into()),
        selling_condition: None,
        bought_condition: None,
        fuel_type: Some(FuelType::Petrol),
        mileage: 32000.0,
        images: vec!["https://cdn.example.com/civic.jpg".into()],
        features: vec!["Backup camera".into(), "Apple CarPlay".into()],
        description: "One owner.".into(),
        down_payment: 2000.0,
        owner_id: None,
    }
}

#[tokio::test]
async fn create_and_get_listing() {
    let (pool, _container) = setup_test_db().await;
    let repo = ListingRepository::new(pool);

    let created = repo.create(&new_listing("2020 Honda Civic")).await.unwrap();
    assert!(!created.id.is_nil());
    assert_eq!(created.created_at, created.updated_at);

    let fetched = repo
        .get(created.id)
        .await
        .unwrap()
        .expect("Should find the listing");

    assert_eq!(fetched, created);
    assert_eq!(fetched.condition, Some(Condition::CertifiedPreOwned));
    assert_eq!(fetched.transmission, Some(Transmission::Automatic));
    assert_eq!(fetched.fuel_type, Some(FuelType::Petrol));
    assert_eq!(fetched.features, vec!["Backup camera", "Apple CarPlay"]);
    assert_eq!(fetched.price, 18500.0);
}

#[tokio::test]
async fn get_unknown_id_returns_none() {
    let (pool, _container) = setup_test_db().await;
    let repo = ListingRepository::new(pool);

    assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_is_newest_first() {
    let (pool, _container) = setup_test_db().await;
    let repo = ListingRepository::new(pool);

    for title in ["first", "second", "third"] {
        repo.create(&new_listing(title)).await.unwrap();
        // Distinct timestamps
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let listings = repo.list_newest_first().await.unwrap();
    let titles: Vec<&str> = listings.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    for pair in listings.windows(2) {
        assert!(pair[0].created_at > pair[1].created_at);
    }
}

#[tokio::test]
async fn list_empty_table() {
    let (pool, _container) = setup_test_db().await;
    let repo = ListingRepository::new(pool);

    assert!(repo.list_newest_first().await.unwrap().is_empty());
}

#[tokio::test]
async fn optional_fields_round_trip_as_none() {
    let (pool, _container) = setup_test_db().await;
    let repo = ListingRepository::new(pool);

    let mut listing = new_listing("bare");
    listing.location = None;
    listing.condition = None;
    listing.transmission = None;
    listing.fuel_type = None;
    listing.features = vec![];
    listing.images = vec![PLACEHOLDER_IMAGE.into()];
    let owner = Uuid::new_v4();
    listing.owner_id = Some(owner);

    let created = repo.create(&listing).await.unwrap();

    assert!(created.location.is_none());
    assert!(created.condition.is_none());
    assert!(created.features.is_empty());
    assert_eq!(created.images, vec![PLACEHOLDER_IMAGE.to_string()]);
    assert_eq!(created.owner_id, Some(owner));
}

#[tokio::test]
async fn schema_rejects_empty_image_list() {
    let (pool, _container) = setup_test_db().await;
    let repo = ListingRepository::new(pool);

    let mut listing = new_listing("no images");
    listing.images = vec![];

    let err = repo.create(&listing).await.unwrap_err();
    assert!(matches!(err, showroom_core::AppError::DatabaseError(_)));
}

#[tokio::test]
async fn schema_rejects_unknown_condition() {
    let (pool, _container) = setup_test_db().await;

    let result = sqlx::query(
        r#"INSERT INTO car_listings (title, price, year, make, model, images, condition)
           VALUES ('x', 1, 2020, 'a', 'b', ARRAY['https://x'], 'Salvage')"#,
    )
    .execute(&pool)
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn schema_rejects_negative_mileage() {
    let (pool, _container) = setup_test_db().await;
    let repo = ListingRepository::new(pool);

    let mut listing = new_listing("rolled back odometer");
    listing.mileage = -1.0;

    assert!(repo.create(&listing).await.is_err());
}

#[tokio::test]
async fn health_check_succeeds() {
    let (pool, _container) = setup_test_db().await;
    let repo = ListingRepository::new(pool);

    repo.health_check().await.unwrap();
}
