// Integration tests for Anketa Match
//
// Drive the full create -> like -> match flow through the service and the
// in-memory store.

use anketa_match::core::Matcher;
use anketa_match::models::{
    CreateProfileRequest, LikeOutcome, PreferredGender, Profile, Tag, ValidationError,
};
use anketa_match::services::{AnketaService, InMemoryProfileStore, ServiceError};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

fn create_service() -> AnketaService {
    AnketaService::new(Arc::new(InMemoryProfileStore::new()), Matcher::default())
}

fn create_request(
    username: &str,
    age: i64,
    gender: &str,
    preferred_gender: &str,
    tags: &[&str],
) -> CreateProfileRequest {
    CreateProfileRequest {
        username: username.to_string(),
        age,
        gender: gender.to_string(),
        preferred_gender: preferred_gender.to_string(),
        description: format!("Profile of {}", username),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        photos: vec![],
    }
}

async fn create_viewer(service: &AnketaService) -> Profile {
    service
        .create(create_request("viewer", 30, "Man", "Women", &["Sport", "Music"]))
        .await
        .unwrap()
}

fn ids(profiles: &[Profile]) -> Vec<Uuid> {
    profiles.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn test_integration_end_to_end_matching() {
    let service = create_service();
    let viewer = create_viewer(&service).await;

    let c = service
        .create(create_request("candidate_c", 29, "Woman", "Men", &[]))
        .await
        .unwrap();
    let b = service
        .create(create_request("candidate_b", 31, "Woman", "Men", &["Sport"]))
        .await
        .unwrap();
    let a = service
        .create(create_request("candidate_a", 30, "Woman", "Men", &["Sport", "Music"]))
        .await
        .unwrap();

    let matches = service
        .find_candidates(viewer.id, PreferredGender::Women)
        .await
        .unwrap();

    // Zero-overlap candidate C is kept, ranked last
    assert_eq!(ids(&matches), vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn test_integration_self_never_returned() {
    let service = create_service();
    let viewer = create_viewer(&service).await;
    service
        .create(create_request("someone", 30, "Man", "Both", &[]))
        .await
        .unwrap();

    let matches = service
        .find_candidates(viewer.id, PreferredGender::Both)
        .await
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert!(matches.iter().all(|p| p.id != viewer.id));
}

#[tokio::test]
async fn test_integration_age_gate() {
    let service = create_service();
    let viewer = create_viewer(&service).await;

    let mut created = Vec::new();
    for (name, age) in [("age_27", 27), ("age_28", 28), ("age_32", 32), ("age_33", 33)] {
        let profile = service
            .create(create_request(name, age, "Woman", "Men", &["Sport"]))
            .await
            .unwrap();
        created.push(profile);
    }

    let matches = service
        .find_candidates(viewer.id, PreferredGender::Women)
        .await
        .unwrap();

    let ages: Vec<u8> = matches.iter().map(|p| p.age.years()).collect();
    assert_eq!(ages, vec![28, 32]);
}

#[tokio::test]
async fn test_integration_like_is_idempotent() {
    let service = create_service();
    let viewer = create_viewer(&service).await;
    let target = service
        .create(create_request("target", 30, "Woman", "Men", &[]))
        .await
        .unwrap();

    assert_eq!(service.like(target.id, viewer.id).await.unwrap(), LikeOutcome::Added);
    assert_eq!(
        service.like(target.id, viewer.id).await.unwrap(),
        LikeOutcome::AlreadyLiked
    );

    let stored = service.get(target.id).await.unwrap();
    assert_eq!(stored.liked_by.len(), 1);
    assert!(stored.is_liked_by(viewer.id));
}

#[tokio::test]
async fn test_integration_like_requires_existing_profiles() {
    let service = create_service();
    let viewer = create_viewer(&service).await;
    let missing = Uuid::new_v4();

    let err = service.like(missing, viewer.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == missing));

    let err = service.like(viewer.id, missing).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == missing));
}

#[tokio::test]
async fn test_integration_liked_profiles_excluded_both_ways() {
    let service = create_service();
    let viewer = create_viewer(&service).await;

    let liked_by_viewer = service
        .create(create_request("liked_one", 30, "Woman", "Men", &["Sport"]))
        .await
        .unwrap();
    let likes_viewer = service
        .create(create_request("admirer", 30, "Woman", "Men", &["Sport"]))
        .await
        .unwrap();
    let unrelated = service
        .create(create_request("unrelated", 30, "Woman", "Men", &["Sport"]))
        .await
        .unwrap();

    service.like(liked_by_viewer.id, viewer.id).await.unwrap();
    service.like(viewer.id, likes_viewer.id).await.unwrap();

    let matches = service
        .find_candidates(viewer.id, PreferredGender::Women)
        .await
        .unwrap();

    assert_eq!(ids(&matches), vec![unrelated.id]);
}

#[tokio::test]
async fn test_integration_empty_pool() {
    let service = create_service();
    let viewer = create_viewer(&service).await;

    let matches = service
        .find_candidates(viewer.id, PreferredGender::Women)
        .await
        .unwrap();

    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_integration_pool_respects_candidate_preference() {
    let service = create_service();
    let viewer = create_viewer(&service).await;

    service
        .create(create_request("not_into_men", 30, "Woman", "Women", &["Sport"]))
        .await
        .unwrap();
    let open = service
        .create(create_request("open_minded", 30, "Woman", "Both", &["Sport"]))
        .await
        .unwrap();

    let matches = service
        .find_candidates(viewer.id, PreferredGender::Women)
        .await
        .unwrap();

    assert_eq!(ids(&matches), vec![open.id]);
}

#[tokio::test]
async fn test_integration_create_fetch_round_trip() {
    let service = create_service();
    let mut request = create_request("round_trip", 25, "Woman", "Both", &["Books", "Anime", "Books"]);
    request.photos = vec![
        "https://cdn.example.com/1.jpg".to_string(),
        "https://cdn.example.com/2.jpg".to_string(),
    ];

    let created = service.create(request).await.unwrap();
    let fetched = service.get(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.username.as_str(), "@round_trip");
    assert_eq!(
        fetched.tags.iter().copied().collect::<Vec<_>>(),
        vec![Tag::Anime, Tag::Books]
    );
    let photos: Vec<&str> = fetched.photos.iter().map(|p| p.url()).collect();
    assert_eq!(
        photos,
        vec!["https://cdn.example.com/1.jpg", "https://cdn.example.com/2.jpg"]
    );
}

#[tokio::test]
async fn test_integration_create_rejects_invalid_values() {
    let service = create_service();

    let cases = [
        create_request("ab", 25, "Man", "Women", &[]),
        create_request("@alice", 25, "Man", "Women", &[]),
        create_request("valid_name", 0, "Man", "Women", &[]),
        create_request("valid_name", 25, "Men", "Women", &[]),
        create_request("valid_name", 25, "Man", "Woman", &[]),
        create_request("valid_name", 25, "Man", "Women", &["Knitting"]),
    ];

    for request in cases {
        let err = service.create(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "unexpected error: {}", err);
    }

    let mut insecure = create_request("valid_name", 25, "Man", "Women", &[]);
    insecure.photos = vec!["http://cdn.example.com/a.jpg".to_string()];
    let err = service.create(insecure).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ValidationError::Photo(_))));
}

#[tokio::test]
async fn test_integration_partial_update() {
    let service = create_service();
    let viewer = create_viewer(&service).await;

    let fields = json!({
        "description": "updated",
        "tags": ["Travel"],
        "preferredGender": "Both",
    });
    service
        .update(viewer.id, fields.as_object().unwrap())
        .await
        .unwrap();

    let updated = service.get(viewer.id).await.unwrap();
    assert_eq!(updated.description, "updated");
    assert_eq!(updated.preferred_gender, PreferredGender::Both);
    assert_eq!(updated.tags.iter().copied().collect::<Vec<_>>(), vec![Tag::Travel]);
    assert_eq!(updated.age, viewer.age);

    let prefixed = json!({"username": "@alice"});
    let err = service
        .update(viewer.id, prefixed.as_object().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ValidationError::Username(_))));
    assert_eq!(service.get(viewer.id).await.unwrap().username.as_str(), "@viewer");

    let bad = json!({"age": 99});
    let err = service
        .update(viewer.id, bad.as_object().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ValidationError::UnknownField(_))));
}

#[tokio::test]
async fn test_integration_delete() {
    let service = create_service();
    let viewer = create_viewer(&service).await;

    service.delete(viewer.id).await.unwrap();

    assert!(matches!(
        service.get(viewer.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(viewer.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_integration_custom_age_gap() {
    let service = AnketaService::new(Arc::new(InMemoryProfileStore::new()), Matcher::new(5));
    let viewer = create_viewer(&service).await;
    let older = service
        .create(create_request("older_one", 35, "Woman", "Men", &[]))
        .await
        .unwrap();

    let matches = service
        .find_candidates(viewer.id, PreferredGender::Women)
        .await
        .unwrap();

    assert_eq!(ids(&matches), vec![older.id]);
}
