//! Macro-generated test suite for `DataService<TestNote>` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use portal::storage::InMemoryDataService;
//!
//! data_service_tests!(InMemoryDataService::<TestNote>::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get`: create then retrieve, verify all fields
//! - `test_get_nonexistent`: unknown id returns None
//! - `test_list_empty` / `test_list_newest_first`
//! - `test_list_newest_first_within_one_second`: sub-second ordering
//! - `test_update_existing` / `test_update_nonexistent`
//! - `test_delete_existing` / `test_delete_nonexistent`
//!
//! ## Lookup
//! - `test_find_by_string_field`, `test_find_by_boolean_field`,
//!   `test_find_by_no_results`
//!
//! ## Uniqueness
//! - `test_duplicate_unique_field_on_create` / `..._on_update`
//!
//! ## Concurrency
//! - `test_concurrent_access`: parallel creates from spawned tasks

/// Generate a full `DataService<TestNote>` conformance test suite.
///
/// `$factory` is re-evaluated for each test. For the concurrent access test
/// the returned service must also be `Clone + 'static`.
#[macro_export]
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use portal::core::entity::Entity;
            use portal::core::error::StorageError;
            use portal::core::service::DataService;
            use uuid::Uuid;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory;
                let note = create_test_note("Alpha", "alpha@test.org", "draft", true);
                let id = note.id;

                let created = service.create(note.clone()).await.unwrap();
                assert_eq!(created.id(), id);

                let fetched = service.get(&id).await.unwrap().expect("note should exist");
                assert_eq!(fetched.title, "Alpha");
                assert_eq!(fetched.email, "alpha@test.org");
                assert_eq!(fetched.status, "draft");
                assert!(fetched.pinned);
                assert_eq!(
                    fetched.created_at.timestamp_millis(),
                    note.created_at.timestamp_millis()
                );
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                assert!(service.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let service = $factory;
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_newest_first() {
                let service = $factory;
                service.create(create_aged_note("Oldest", 30)).await.unwrap();
                service.create(create_aged_note("Newest", 1)).await.unwrap();
                service.create(create_aged_note("Middle", 10)).await.unwrap();

                let titles: Vec<String> = service
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|n| n.title)
                    .collect();
                assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
            }

            #[tokio::test]
            async fn test_list_newest_first_within_one_second() {
                let service = $factory;
                let second = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();

                let mut on_the_second = create_test_note("Even", "even@test.org", "draft", false);
                on_the_second.created_at = second;
                let mut half_past = create_test_note("Half", "half@test.org", "draft", false);
                half_past.created_at = second + chrono::Duration::milliseconds(500);

                service.create(on_the_second).await.unwrap();
                service.create(half_past).await.unwrap();

                let titles: Vec<String> = service
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|n| n.title)
                    .collect();
                assert_eq!(titles, vec!["Half", "Even"]);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let mut note = service
                    .create(create_test_note("Draft", "draft@test.org", "draft", false))
                    .await
                    .unwrap();

                note.status = "published".to_string();
                note.touch();
                service.update(&note.id, note.clone()).await.unwrap();

                let fetched = service.get(&note.id).await.unwrap().unwrap();
                assert_eq!(fetched.status, "published");
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let note = create_test_note("Ghost", "ghost@test.org", "draft", false);
                let err = service.update(&note.id, note.clone()).await.unwrap_err();
                assert!(matches!(
                    err.downcast_ref::<StorageError>(),
                    Some(StorageError::NotFound { .. })
                ));
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory;
                let note = service
                    .create(create_test_note("Bye", "bye@test.org", "draft", false))
                    .await
                    .unwrap();

                service.delete(&note.id).await.unwrap();
                assert!(service.get(&note.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let service = $factory;
                let err = service.delete(&Uuid::new_v4()).await.unwrap_err();
                assert!(matches!(
                    err.downcast_ref::<StorageError>(),
                    Some(StorageError::NotFound { .. })
                ));
            }

            // ==================================================================
            // Lookup
            // ==================================================================

            #[tokio::test]
            async fn test_find_by_string_field() {
                let service = $factory;
                service
                    .create(create_test_note("A", "a@test.org", "published", false))
                    .await
                    .unwrap();
                service
                    .create(create_test_note("B", "b@test.org", "draft", false))
                    .await
                    .unwrap();
                service
                    .create(create_test_note("C", "c@test.org", "published", false))
                    .await
                    .unwrap();

                let published = service.find_by("status", "published").await.unwrap();
                assert_eq!(published.len(), 2);
                assert!(published.iter().all(|n| n.status == "published"));

                let by_email = service.find_by("email", "b@test.org").await.unwrap();
                assert_eq!(by_email.len(), 1);
                assert_eq!(by_email[0].title, "B");
            }

            #[tokio::test]
            async fn test_find_by_boolean_field() {
                let service = $factory;
                service
                    .create(create_test_note("Pinned", "p@test.org", "draft", true))
                    .await
                    .unwrap();
                service
                    .create(create_test_note("Loose", "l@test.org", "draft", false))
                    .await
                    .unwrap();

                let pinned = service.find_by("pinned", "true").await.unwrap();
                assert_eq!(pinned.len(), 1);
                assert_eq!(pinned[0].title, "Pinned");
            }

            #[tokio::test]
            async fn test_find_by_no_results() {
                let service = $factory;
                service
                    .create(create_test_note("A", "a@test.org", "draft", false))
                    .await
                    .unwrap();
                assert!(service.find_by("status", "archived").await.unwrap().is_empty());
            }

            // ==================================================================
            // Uniqueness
            // ==================================================================

            #[tokio::test]
            async fn test_duplicate_unique_field_on_create() {
                let service = $factory;
                service
                    .create(create_test_note("First", "same@test.org", "draft", false))
                    .await
                    .unwrap();

                let err = service
                    .create(create_test_note("Second", "same@test.org", "draft", false))
                    .await
                    .unwrap_err();
                assert!(matches!(
                    err.downcast_ref::<StorageError>(),
                    Some(StorageError::Duplicate { .. })
                ));
                assert_eq!(service.list().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_duplicate_unique_field_on_update() {
                let service = $factory;
                service
                    .create(create_test_note("First", "first@test.org", "draft", false))
                    .await
                    .unwrap();
                let mut second = service
                    .create(create_test_note("Second", "second@test.org", "draft", false))
                    .await
                    .unwrap();

                second.email = "first@test.org".to_string();
                let err = service.update(&second.id, second.clone()).await.unwrap_err();
                assert!(matches!(
                    err.downcast_ref::<StorageError>(),
                    Some(StorageError::Duplicate { .. })
                ));
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_access() {
                let service = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let service = service.clone();
                    handles.push(tokio::spawn(async move {
                        let note = create_test_note(
                            &format!("Note {}", i),
                            &format!("note{}@test.org", i),
                            "draft",
                            false,
                        );
                        service.create(note).await.unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }
                assert_eq!(service.list().await.unwrap().len(), 10);
            }
        }
    };
}
