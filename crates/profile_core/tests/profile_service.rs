use profile_core::{
    InMemoryProfileRepository, NewProfile, ProfileListItem, ProfilePatch, ProfileRepository,
    ProfileService, ProfileStore, RepoError, SqliteProfileRepository,
};

fn exercise_lifecycle<R: ProfileRepository>(service: ProfileService<R>) {
    let ana = service
        .create(NewProfile::new("Ana Silva", "ana@test.com").with_age(30))
        .unwrap();
    let bea = service
        .create(NewProfile::new("Bea Costa", "bea@test.com"))
        .unwrap();
    let ana_id = ana.id.unwrap();
    let bea_id = bea.id.unwrap();

    assert_eq!(service.get(ana_id).unwrap(), Some(ana.clone()));

    let listing = service.list().unwrap();
    assert_eq!(listing.count, 2);
    assert_eq!(
        listing.items[0],
        ProfileListItem {
            name: "Ana Silva".to_string(),
            email: "ana@test.com".to_string(),
            age: Some(30),
        }
    );

    let err = service
        .update(ana_id, &ProfilePatch::default().email("bea@test.com"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict { .. }));
    assert_eq!(service.get(ana_id).unwrap().unwrap().email, "ana@test.com");

    let updated = service
        .update(ana_id, &ProfilePatch::default().name("Ana S."))
        .unwrap();
    assert_eq!(updated.name, "Ana S.");

    assert!(service.delete(bea_id).unwrap());
    assert!(!service.delete(bea_id).unwrap());
    assert_eq!(service.get(bea_id).unwrap(), None);
    assert_eq!(service.count().unwrap(), 1);
    assert_eq!(service.list().unwrap().items.len(), 1);

    // A deleted profile's email stays reserved for updates too.
    let err = service
        .update(ana_id, &ProfilePatch::default().email("BEA@test.com"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict { .. }));
    assert_eq!(service.get(ana_id).unwrap().unwrap().email, "ana@test.com");
}

#[test]
fn sqlite_backed_service_lifecycle() {
    let store = ProfileStore::open_in_memory().unwrap();
    exercise_lifecycle(ProfileService::new(SqliteProfileRepository::new(store)));
}

#[test]
fn in_memory_service_lifecycle() {
    exercise_lifecycle(ProfileService::new(InMemoryProfileRepository::new()));
}

#[test]
fn create_returns_public_view_without_secret() {
    let service = ProfileService::new(InMemoryProfileRepository::new());

    let created = service
        .create(NewProfile::new("Ana", "ana@test.com").with_secret("pw"))
        .unwrap();
    let json = serde_json::to_string(&created).unwrap();
    assert!(!json.contains("pw\""));
    assert!(!json.contains("secret"));
    assert!(created.active);
}
