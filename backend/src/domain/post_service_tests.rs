//! Tests for the post service.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockPostRepository;
use crate::domain::{ErrorCode, Gazetteer, LocationName, PostContent, UserId, campus_seed};

#[fixture]
fn campus_resolver() -> NearestLocationResolver {
    let gazetteer = Gazetteer::from_seeds(&campus_seed()).expect("valid seed");
    NearestLocationResolver::new(Arc::new(gazetteer))
}

fn make_service(
    resolver: NearestLocationResolver,
    repo: MockPostRepository,
) -> PostService<MockPostRepository> {
    PostService::new(resolver, Arc::new(repo))
}

fn stored(new_post: &NewPost, id: i64) -> Post {
    Post {
        id: PostId::new(id).expect("positive id"),
        user_id: new_post.user_id,
        location_name: new_post.location_name.clone(),
        content: new_post.content.clone(),
        likes: 0,
        created_at: new_post.created_at,
    }
}

fn sample_post(id: i64, likes: u64) -> Post {
    Post {
        id: PostId::new(id).expect("positive id"),
        user_id: UserId::random(),
        location_name: LocationName::new("Slope").expect("valid name"),
        content: PostContent::new("sunset").expect("valid content"),
        likes,
        created_at: Utc::now(),
    }
}

fn create_request(latitude: f64, longitude: f64) -> CreatePostRequest {
    CreatePostRequest {
        user_id: UserId::random(),
        coordinate: Coordinate::new(latitude, longitude),
        content: PostContent::new("hello from campus").expect("valid content"),
    }
}

#[rstest]
#[tokio::test]
async fn create_tags_post_with_nearest_location(campus_resolver: NearestLocationResolver) {
    let mut repo = MockPostRepository::new();
    repo.expect_create()
        .withf(|post: &NewPost| post.location_name.as_ref() == "Olin Library")
        .times(1)
        .returning(|post| Ok(stored(post, 1)));

    let service = make_service(campus_resolver, repo);
    let post = service
        .create_post(create_request(42.12346, -76.54322))
        .await
        .expect("post created");

    assert_eq!(post.location_name.as_ref(), "Olin Library");
    assert_eq!(post.likes, 0);
}

#[tokio::test]
async fn create_with_empty_gazetteer_stores_nothing() {
    let mut repo = MockPostRepository::new();
    repo.expect_create().never();

    let resolver = NearestLocationResolver::new(Arc::new(Gazetteer::empty()));
    let service = make_service(resolver, repo);
    let error = service
        .create_post(create_request(0.0, 0.0))
        .await
        .expect_err("no location");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(PostRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(PostRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[case(PostRepositoryError::unknown_user("nobody"), ErrorCode::InvalidRequest)]
#[tokio::test]
async fn create_maps_repository_errors(
    campus_resolver: NearestLocationResolver,
    #[case] failure: PostRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockPostRepository::new();
    repo.expect_create()
        .times(1)
        .return_once(move |_| Err(failure));

    let service = make_service(campus_resolver, repo);
    let error = service
        .create_post(create_request(42.12350, -76.54330))
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn like_returns_updated_post(campus_resolver: NearestLocationResolver) {
    let mut repo = MockPostRepository::new();
    repo.expect_increment_likes()
        .withf(|id: &PostId| id.get() == 7)
        .times(1)
        .return_once(|_| Ok(Some(sample_post(7, 3))));

    let service = make_service(campus_resolver, repo);
    let post = service
        .like_post(PostId::new(7).expect("valid id"))
        .await
        .expect("liked");

    assert_eq!(post.likes, 3);
}

#[rstest]
#[tokio::test]
async fn like_missing_post_is_not_found(campus_resolver: NearestLocationResolver) {
    let mut repo = MockPostRepository::new();
    repo.expect_increment_likes()
        .times(1)
        .return_once(|_| Ok(None));

    let service = make_service(campus_resolver, repo);
    let error = service
        .like_post(PostId::new(99).expect("valid id"))
        .await
        .expect_err("missing post");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.details(), Some(&serde_json::json!({ "postId": 99 })));
}

#[rstest]
#[tokio::test]
async fn delete_returns_removed_post(campus_resolver: NearestLocationResolver) {
    let mut repo = MockPostRepository::new();
    repo.expect_delete()
        .times(1)
        .return_once(|_| Ok(Some(sample_post(4, 2))));

    let service = make_service(campus_resolver, repo);
    let post = service
        .delete_post(PostId::new(4).expect("valid id"))
        .await
        .expect("deleted");

    assert_eq!(post.id.get(), 4);
}

#[rstest]
#[tokio::test]
async fn delete_missing_post_is_not_found(campus_resolver: NearestLocationResolver) {
    let mut repo = MockPostRepository::new();
    repo.expect_delete().times(1).return_once(|_| Ok(None));

    let service = make_service(campus_resolver, repo);
    let error = service
        .delete_post(PostId::new(4).expect("valid id"))
        .await
        .expect_err("missing post");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn posts_near_filters_by_resolved_location(campus_resolver: NearestLocationResolver) {
    let mut repo = MockPostRepository::new();
    repo.expect_list_by_location()
        .withf(|name: &LocationName| name.as_ref() == "Slope")
        .times(1)
        .return_once(|_| Ok(vec![sample_post(1, 0)]));

    let service = make_service(campus_resolver, repo);
    let nearby = service
        .posts_near(Coordinate::new(42.12351, -76.54331))
        .await
        .expect("posts listed");

    assert_eq!(nearby.location.name().as_ref(), "Slope");
    assert_eq!(nearby.posts.len(), 1);
}

#[tokio::test]
async fn posts_near_with_empty_gazetteer_is_not_found() {
    let mut repo = MockPostRepository::new();
    repo.expect_list_by_location().never();

    let resolver = NearestLocationResolver::new(Arc::new(Gazetteer::empty()));
    let service = make_service(resolver, repo);
    let error = service
        .posts_near(Coordinate::new(0.0, 0.0))
        .await
        .expect_err("no location");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_locations_preserves_gazetteer_order(campus_resolver: NearestLocationResolver) {
    let service = make_service(campus_resolver, MockPostRepository::new());
    let locations = service.list_locations().await.expect("locations listed");

    assert_eq!(locations.len(), 7);
    assert_eq!(locations[0].name().as_ref(), "Cocktail Lounge");
    assert_eq!(locations[6].name().as_ref(), "Kennedy Hall");
}
