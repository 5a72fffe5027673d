//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `schemata_core` linkage against the configured store.
//! - Walk one class/property/object round trip and print the result.
//!
//! Output is deterministic for an empty in-memory store.

use schemata_core::{
    ClassDraft, ClassRegistry, CoreConfig, EditSession, MaterializerConfig, ObjectMaterializer,
    ObjectService, PropertyDraft, PropertyRegistry, RelationGraph, SqliteRepositories,
    STRING_PRIMITIVE_CLASS_ID,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("schemata_core ping={}", schemata_core::ping());
    println!("schemata_core version={}", schemata_core::core_version());

    match run_probe() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_probe() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env();
    if config.init_logging()? {
        log::info!("event=cli_probe module=cli status=start");
    }

    let conn = config.open_store()?;
    let repos = SqliteRepositories::try_new(&conn)?;

    let classes = ClassRegistry::new(repos.classes);
    let properties = PropertyRegistry::new(repos.properties, repos.classes);
    let graph = RelationGraph::new(repos.relations, repos.classes, repos.properties);

    let person = classes.create(&ClassDraft::new("Probe Person"))?;
    let name = properties.create(&PropertyDraft::new("Name", STRING_PRIMITIVE_CLASS_ID))?;
    graph.add_relation(person.id, name.id)?;

    for property in graph.owned_properties(person.id)? {
        println!("class={} owns property={}", person.name, property.name);
    }

    let materializer = ObjectMaterializer::new(graph, MaterializerConfig::default());
    let store = ObjectService::new(repos.objects, repos.classes);

    let mut session = EditSession::for_new_object(person.id);
    session.load(&materializer)?;
    session.set_value(name.id, "Alice")?;
    let saved = session.commit(&materializer, &store)?;

    let fields = materializer.to_editable_fields(saved.data_class_id, Some(&saved))?;
    for field in &fields.fields {
        println!("field {}={}", field.label, field.initial_value);
    }
    Ok(())
}
