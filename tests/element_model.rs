use fsmeta_core::{Element, ElementKind, ElementValidationError, OwnedEntity};

#[test]
fn file_constructor_sets_expected_shape() {
    let element = Element::file("report.pdf", 2048);

    assert_eq!(element.id, None);
    assert_eq!(element.kind, ElementKind::File);
    assert_eq!(element.name, "report.pdf");
    assert_eq!(element.size_bytes, Some(2048));
    assert_eq!(element.parent_id, None);
    assert!(!element.is_persisted());
}

#[test]
fn folder_constructor_carries_no_size() {
    let element = Element::folder("archive");

    assert_eq!(element.kind, ElementKind::Folder);
    assert_eq!(element.size_bytes, None);
    assert!(element.validate().is_ok());
}

#[test]
fn validate_rejects_empty_name() {
    let element = Element::folder("   ");
    assert_eq!(
        element.validate().unwrap_err(),
        ElementValidationError::EmptyName
    );
}

#[test]
fn validate_rejects_path_separators() {
    let forward = Element::file("a/b.txt", 1);
    assert!(matches!(
        forward.validate().unwrap_err(),
        ElementValidationError::NameContainsSeparator { .. }
    ));

    let backward = Element::file("a\\b.txt", 1);
    assert!(matches!(
        backward.validate().unwrap_err(),
        ElementValidationError::NameContainsSeparator { .. }
    ));
}

#[test]
fn validate_rejects_folder_with_size() {
    let mut element = Element::folder("docs");
    element.size_bytes = Some(10);

    assert_eq!(
        element.validate().unwrap_err(),
        ElementValidationError::FolderWithSize { size_bytes: 10 }
    );
}

#[test]
fn validate_rejects_negative_file_size() {
    let element = Element::file("broken.bin", -1);

    assert_eq!(
        element.validate().unwrap_err(),
        ElementValidationError::NegativeSize { size_bytes: -1 }
    );
}

#[test]
fn assign_owner_overwrites_any_prior_value() {
    let mut element = Element::file("claimed.txt", 5);
    element.owner_id = 42;

    element.assign_owner(7);
    assert_eq!(element.owner_id(), 7);
}

#[test]
fn element_serialization_uses_expected_wire_fields() {
    let mut element = Element::file("notes.txt", 64);
    element.id = Some(3);
    element.owner_id = 1;
    element.parent_id = Some(2);
    element.created_at = 1_700_000_000_000;
    element.updated_at = 1_700_000_360_000;

    let json = serde_json::to_value(&element).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["owner_id"], 1);
    assert_eq!(json["kind"], "file");
    assert_eq!(json["name"], "notes.txt");
    assert_eq!(json["parent_id"], 2);
    assert_eq!(json["size_bytes"], 64);

    let decoded: Element = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, element);
}
