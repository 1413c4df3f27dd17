use ums_core::db::open_db_in_memory;
use ums_core::{
    DateAdapter, FormMode, JalaliDateAdapter, KeyValueStore, KvUserRepository, MemoryKvStore,
    SqliteKvStore, UserDraft, UserForm, UserRepository, UserService, UserServiceError,
    UserValidationError, USERS_STORAGE_KEY,
};

fn draft(national_id: &str) -> UserDraft {
    UserDraft {
        first_name: "مریم".to_string(),
        last_name: "کریمی".to_string(),
        age: 34,
        education: "کارشناسی ارشد".to_string(),
        national_id: national_id.to_string(),
        birth_date: "1369/04/12".to_string(),
        profile_photo: None,
    }
}

#[test]
fn add_then_get_roundtrip_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(KvUserRepository::new(SqliteKvStore::new(&conn)));

    let created = service.add_user(draft("1234567890")).unwrap();
    assert!(!created.id.is_empty());

    let users = service.get_users().unwrap();
    assert_eq!(users, vec![created]);
}

#[test]
fn stored_value_is_a_flat_camel_case_json_list() {
    let store = MemoryKvStore::new();
    let service = UserService::new(KvUserRepository::new(&store));
    let created = service.add_user(draft("1234567890")).unwrap();

    let raw = store.get_item(USERS_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let list = json.as_array().expect("users are stored as a list");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], created.id);
    assert_eq!(list[0]["firstName"], "مریم");
    assert_eq!(list[0]["nationalId"], "1234567890");
    assert_eq!(list[0]["birthDate"], "1369/04/12");
    assert!(list[0].get("profilePhoto").is_none());
}

#[test]
fn update_replaces_record_and_keeps_id() {
    let store = MemoryKvStore::new();
    let service = UserService::new(KvUserRepository::new(&store));
    let created = service.add_user(draft("1234567890")).unwrap();

    let mut changed = created.clone();
    changed.id = "ignored".to_string();
    changed.age = 35;
    assert!(service.update_user(&created.id, changed).unwrap());

    let users = service.get_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, created.id);
    assert_eq!(users[0].age, 35);
}

#[test]
fn update_of_unknown_id_is_a_no_op() {
    let store = MemoryKvStore::new();
    let service = UserService::new(KvUserRepository::new(&store));
    let created = service.add_user(draft("1234567890")).unwrap();

    assert!(!service.update_user("missing", created.clone()).unwrap());
    assert_eq!(service.get_users().unwrap(), vec![created]);
}

#[test]
fn delete_removes_only_matching_user() {
    let store = MemoryKvStore::new();
    let service = UserService::new(KvUserRepository::new(&store));
    let first = service.add_user(draft("1111111111")).unwrap();
    let second = service.add_user(draft("2222222222")).unwrap();

    service.delete_user(&first.id).unwrap();
    service.delete_user("missing").unwrap();

    assert_eq!(service.get_users().unwrap(), vec![second]);
}

#[test]
fn national_id_lookup_can_exclude_the_edited_user() {
    let store = MemoryKvStore::new();
    let service = UserService::new(KvUserRepository::new(&store));
    let created = service.add_user(draft("1234567890")).unwrap();

    assert!(service.national_id_exists("1234567890", None).unwrap());
    assert!(!service
        .national_id_exists("1234567890", Some(created.id.as_str()))
        .unwrap());
    assert!(!service.national_id_exists("0000000000", None).unwrap());
}

#[test]
fn add_rejects_invalid_drafts() {
    let store = MemoryKvStore::new();
    let service = UserService::new(KvUserRepository::new(&store));

    let err = service.add_user(draft("12345")).unwrap_err();
    assert!(matches!(
        err,
        UserServiceError::Validation(UserValidationError::InvalidNationalId(_))
    ));
    assert!(service.get_users().unwrap().is_empty());
}

#[test]
fn corrupt_storage_reads_as_empty_list() {
    let store = MemoryKvStore::new();
    store.set_item(USERS_STORAGE_KEY, "{not json").unwrap();
    let repo = KvUserRepository::new(&store);

    assert!(repo.load_users().unwrap().is_empty());
}

#[test]
fn filter_matches_names_and_national_id_case_insensitively() {
    let store = MemoryKvStore::new();
    let service = UserService::new(KvUserRepository::new(&store));
    let mut latin = draft("1111111111");
    latin.first_name = "Reza".to_string();
    service.add_user(latin).unwrap();
    service.add_user(draft("2222222222")).unwrap();

    assert_eq!(service.filter_users("reza").unwrap().len(), 1);
    assert_eq!(service.filter_users("2222").unwrap().len(), 1);
    assert_eq!(service.filter_users("کریمی").unwrap().len(), 2);
    assert_eq!(service.filter_users("  ").unwrap().len(), 2);
    assert!(service.filter_users("nobody").unwrap().is_empty());
}

#[test]
fn submit_creates_then_edits_and_enforces_unique_national_id() {
    let adapter: JalaliDateAdapter = JalaliDateAdapter::new();
    let store = MemoryKvStore::new();
    let service = UserService::new(KvUserRepository::new(&store));

    let mut form = UserForm::create(&adapter);
    form.first_name = " نگار ".to_string();
    form.last_name = "موسوی".to_string();
    form.education = "دیپلم".to_string();
    form.national_id = "3333333333".to_string();
    form.birth_date = Some(adapter.create_date(1380, 2, 15).unwrap());
    let created = service.submit(&form, &adapter).unwrap();
    assert_eq!(created.first_name, "نگار");
    assert_eq!(created.birth_date, "1380/03/15");

    let duplicate = service.submit(&form, &adapter).unwrap_err();
    assert!(matches!(
        duplicate,
        UserServiceError::NationalIdNotUnique(ref id) if id == "3333333333"
    ));

    let mut edit = UserForm::edit(created.clone(), &adapter);
    assert_eq!(edit.mode, FormMode::Edit(created.clone()));
    assert_eq!(edit.title(), "ویرایش کاربر");
    edit.age = 40;
    let updated = service.submit(&edit, &adapter).unwrap();
    assert_eq!(updated.id, created.id);

    let users = service.get_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].age, 40);
    assert_eq!(users[0].birth_date, "1380/03/15");
}
