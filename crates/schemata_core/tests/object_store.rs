use schemata_core::db::open_db_in_memory;
use schemata_core::repo::object_repo::ObjectRepository;
use schemata_core::{
    ClassDraft, ClassRegistry, DataObject, DataProperty, DataValue, EntityRef, ObjectService,
    PropertyDraft, PropertyRegistry, PropertyValue, RepoError, SchemaError, SqliteRepositories,
    STRING_PRIMITIVE_CLASS_ID,
};

fn draft_for(class_id: i64, name: &DataProperty, text: &str) -> DataObject {
    DataObject {
        object_id: None,
        data_class_id: class_id,
        properties: vec![name.clone()],
        values: vec![DataValue::new(name.id, PropertyValue::text(text))],
    }
}

#[test]
fn create_assigns_ids_and_get_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let person = ClassRegistry::new(repos.classes)
        .create(&ClassDraft::new("Person"))
        .unwrap();
    let name = PropertyRegistry::new(repos.properties, repos.classes)
        .create(&PropertyDraft::new("Name", STRING_PRIMITIVE_CLASS_ID))
        .unwrap();
    let store = ObjectService::new(repos.objects, repos.classes);

    let saved = store
        .create_object(&draft_for(person.id, &name, "Alice"))
        .unwrap();
    assert!(saved.object_id.is_some());
    assert!(saved.values.iter().all(|value| value.id.is_some()));

    let loaded = store.get_object(saved.object_id.unwrap()).unwrap();
    assert_eq!(loaded, Some(saved));
    assert_eq!(store.get_object(9999).unwrap(), None);
}

#[test]
fn reference_values_keep_target_and_text() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let classes = ClassRegistry::new(repos.classes);
    let person = classes.create(&ClassDraft::new("Person")).unwrap();
    let company = classes.create(&ClassDraft::new("Company")).unwrap();
    let employer = PropertyRegistry::new(repos.properties, repos.classes)
        .create(&PropertyDraft::new("Employer", company.id))
        .unwrap();
    let store = ObjectService::new(repos.objects, repos.classes);

    let draft = DataObject {
        object_id: None,
        data_class_id: person.id,
        properties: vec![employer.clone()],
        values: vec![
            DataValue::new(
                employer.id,
                PropertyValue::Reference {
                    target_id: Some(company.id),
                    display_text: "Company".to_string(),
                },
            ),
            DataValue::new(
                employer.id,
                PropertyValue::Reference {
                    target_id: None,
                    display_text: "Initech".to_string(),
                },
            ),
        ],
    };
    let saved = store.create_object(&draft).unwrap();
    let loaded = store.get_object(saved.object_id.unwrap()).unwrap().unwrap();

    assert_eq!(loaded.values[0].value, draft.values[0].value);
    assert_eq!(loaded.values[1].value, draft.values[1].value);
}

#[test]
fn draft_of_missing_class_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let name = PropertyRegistry::new(repos.properties, repos.classes)
        .create(&PropertyDraft::new("Name", STRING_PRIMITIVE_CLASS_ID))
        .unwrap();
    let store = ObjectService::new(repos.objects, repos.classes);

    let err = store
        .create_object(&draft_for(88, &name, "Nobody"))
        .unwrap_err();
    assert!(matches!(err, SchemaError::NotFound(EntityRef::Class(88))));
    assert!(store.list_objects().unwrap().is_empty());
}

#[test]
fn listing_filters_by_class_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let classes = ClassRegistry::new(repos.classes);
    let person = classes.create(&ClassDraft::new("Person")).unwrap();
    let company = classes.create(&ClassDraft::new("Company")).unwrap();
    let name = PropertyRegistry::new(repos.properties, repos.classes)
        .create(&PropertyDraft::new("Name", STRING_PRIMITIVE_CLASS_ID))
        .unwrap();
    let store = ObjectService::new(repos.objects, repos.classes);

    let alice = store
        .create_object(&draft_for(person.id, &name, "Alice"))
        .unwrap();
    let acme = store
        .create_object(&draft_for(company.id, &name, "Acme"))
        .unwrap();
    let bob = store
        .create_object(&draft_for(person.id, &name, "Bob"))
        .unwrap();

    assert_eq!(
        store.list_objects().unwrap(),
        vec![alice.clone(), acme.clone(), bob.clone()]
    );
    assert_eq!(
        store.list_objects_for_class(person.id).unwrap(),
        vec![alice, bob]
    );
    assert_eq!(store.list_objects_for_class(company.id).unwrap(), vec![acme]);
}

#[test]
fn corrupted_value_kind_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let person = ClassRegistry::new(repos.classes)
        .create(&ClassDraft::new("Person"))
        .unwrap();
    let name = PropertyRegistry::new(repos.properties, repos.classes)
        .create(&PropertyDraft::new("Name", STRING_PRIMITIVE_CLASS_ID))
        .unwrap();
    let saved = repos
        .objects
        .create_object(&draft_for(person.id, &name, "Alice"))
        .unwrap();

    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         UPDATE data_values SET kind = 'blob';
         PRAGMA ignore_check_constraints = OFF;",
    )
    .unwrap();

    let err = repos
        .objects
        .get_object(saved.object_id.unwrap())
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn wire_shape_uses_camel_case_names() {
    let object = DataObject {
        object_id: Some(7),
        data_class_id: 2,
        properties: vec![DataProperty {
            id: 5,
            name: "Name".to_string(),
            type_class_id: STRING_PRIMITIVE_CLASS_ID,
        }],
        values: vec![DataValue {
            id: Some(11),
            property_id: 5,
            value: PropertyValue::text("Alice"),
            saved_at: 1_700_000_000_000,
        }],
    };

    let json = serde_json::to_value(&object).unwrap();
    assert_eq!(json["objectId"], 7);
    assert_eq!(json["dataClassId"], 2);
    assert_eq!(json["properties"][0]["typeClassId"], 0);
    assert_eq!(json["values"][0]["propertyId"], 5);
    assert_eq!(json["values"][0]["savedAt"], 1_700_000_000_000_i64);
    assert_eq!(json["values"][0]["value"]["kind"], "primitive");
    assert_eq!(json["values"][0]["value"]["text"], "Alice");

    let back: DataObject = serde_json::from_value(json).unwrap();
    assert_eq!(back, object);
}
