use schemata_core::db::open_db_in_memory;
use schemata_core::{
    ClassDraft, ClassRegistry, EditSession, EntityRef, MaterializerConfig, ObjectMaterializer,
    ObjectService, PropertyDraft, PropertyRegistry, PropertyValue, RelationGraph, SchemaError,
    SqliteRepositories, STRING_PRIMITIVE_CLASS_ID,
};

#[test]
fn new_object_flow_commits_and_closes() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let classes = ClassRegistry::new(repos.classes);
    let properties = PropertyRegistry::new(repos.properties, repos.classes);
    let graph = RelationGraph::new(repos.relations, repos.classes, repos.properties);

    let person = classes.create(&ClassDraft::new("Person")).unwrap();
    let name = properties
        .create(&PropertyDraft::new("Name", STRING_PRIMITIVE_CLASS_ID))
        .unwrap();
    graph.add_relation(person.id, name.id).unwrap();

    let materializer = ObjectMaterializer::new(graph, MaterializerConfig::default());
    let store = ObjectService::new(repos.objects, repos.classes);

    let mut session = EditSession::for_new_object(person.id);
    assert_eq!(session.load(&materializer).unwrap().fields.len(), 1);
    assert_eq!(session.edits().get(&name.id).map(String::as_str), Some(""));

    session.set_value(name.id, "Alice").unwrap();
    let saved = session.commit(&materializer, &store).unwrap();

    assert!(saved.is_persisted());
    assert_eq!(saved.values[0].value, PropertyValue::text("Alice"));
    assert!(session.is_closed());
    assert!(session.edits().is_empty());
    assert_eq!(store.list_objects().unwrap(), vec![saved]);
}

#[test]
fn editing_existing_object_starts_from_stored_values() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let classes = ClassRegistry::new(repos.classes);
    let properties = PropertyRegistry::new(repos.properties, repos.classes);
    let graph = RelationGraph::new(repos.relations, repos.classes, repos.properties);

    let person = classes.create(&ClassDraft::new("Person")).unwrap();
    let name = properties
        .create(&PropertyDraft::new("Name", STRING_PRIMITIVE_CLASS_ID))
        .unwrap();
    graph.add_relation(person.id, name.id).unwrap();
    let materializer = ObjectMaterializer::new(graph, MaterializerConfig::default());
    let store = ObjectService::new(repos.objects, repos.classes);

    let mut first = EditSession::for_new_object(person.id);
    first.load(&materializer).unwrap();
    first.set_value(name.id, "Alice").unwrap();
    let saved = first.commit(&materializer, &store).unwrap();

    let mut session = EditSession::for_existing_object(&saved);
    session.load(&materializer).unwrap();
    assert_eq!(session.context().object_id, saved.object_id);
    assert_eq!(
        session.edits().get(&name.id).map(String::as_str),
        Some("Alice")
    );

    session.set_value(name.id, "Alicia").unwrap();
    let draft = session.build_draft(&materializer).unwrap();
    assert_eq!(draft.object_id, None);
    assert_eq!(draft.values[0].content(), "Alicia");
}

#[test]
fn result_for_previous_selection_is_discarded() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let classes = ClassRegistry::new(repos.classes);
    let person = classes.create(&ClassDraft::new("Person")).unwrap();
    let company = classes.create(&ClassDraft::new("Company")).unwrap();
    let graph = RelationGraph::new(repos.relations, repos.classes, repos.properties);
    let materializer = ObjectMaterializer::new(graph, MaterializerConfig::default());

    let mut session = EditSession::for_new_object(person.id);
    let in_flight = session.request(&materializer).unwrap();

    session.select_class(company.id);
    assert!(!session.accept(in_flight));
    assert!(session.field_set().is_none());

    let current = session.request(&materializer).unwrap();
    assert!(session.accept(current));
    assert_eq!(session.field_set().unwrap().context.class_id, company.id);
}

#[test]
fn set_value_rejects_properties_without_a_field() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let person = ClassRegistry::new(repos.classes)
        .create(&ClassDraft::new("Person"))
        .unwrap();
    let graph = RelationGraph::new(repos.relations, repos.classes, repos.properties);
    let materializer = ObjectMaterializer::new(graph, MaterializerConfig::default());

    let mut session = EditSession::for_new_object(person.id);
    assert!(matches!(
        session.set_value(1, "too early"),
        Err(SchemaError::InvalidSession(_))
    ));

    session.load(&materializer).unwrap();
    assert!(matches!(
        session.set_value(1, "stray"),
        Err(SchemaError::NotFound(EntityRef::Property(1)))
    ));
}

#[test]
fn failed_commit_keeps_the_draft() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let classes = ClassRegistry::new(repos.classes);
    let properties = PropertyRegistry::new(repos.properties, repos.classes);
    let graph = RelationGraph::new(repos.relations, repos.classes, repos.properties);

    let person = classes.create(&ClassDraft::new("Person")).unwrap();
    let company = classes.create(&ClassDraft::new("Company")).unwrap();
    let employer = properties
        .create(&PropertyDraft::new("Employer", company.id))
        .unwrap();
    graph.add_relation(person.id, employer.id).unwrap();
    let materializer = ObjectMaterializer::new(graph, MaterializerConfig::default());
    let store = ObjectService::new(repos.objects, repos.classes);

    let mut session = EditSession::for_new_object(person.id);
    session.load(&materializer).unwrap();
    session.set_value(employer.id, "Initech").unwrap();

    let err = session.commit(&materializer, &store).unwrap_err();
    assert!(matches!(err, SchemaError::NotFound(EntityRef::ClassName(_))));
    assert!(!session.is_closed());
    assert_eq!(
        session.edits().get(&employer.id).map(String::as_str),
        Some("Initech")
    );
    assert!(store.list_objects().unwrap().is_empty());
}

#[test]
fn missing_class_fails_to_load() {
    let conn = open_db_in_memory().unwrap();
    let repos = SqliteRepositories::try_new(&conn).unwrap();
    let graph = RelationGraph::new(repos.relations, repos.classes, repos.properties);
    let materializer = ObjectMaterializer::new(graph, MaterializerConfig::default());

    let mut session = EditSession::for_new_object(31337);
    let err = session.load(&materializer).unwrap_err();
    assert!(matches!(err, SchemaError::NotFound(EntityRef::Class(31337))));
    assert!(session.field_set().is_none());
}
