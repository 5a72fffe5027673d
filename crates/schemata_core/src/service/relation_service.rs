//! Class–property relation graph service.
//!
//! # Responsibility
//! - Add ownership edges between existing classes and properties.
//! - Resolve the ordered list of properties a class owns.
//! - Expose edges whose property no longer resolves, for diagnostics.
//!
//! # Invariants
//! - `owned_properties` never fails because of a dangling edge; such edges
//!   are dropped from the result and reported by `dangling_relations`.
//! - Owned-property order follows edge creation order.
//! - One call resolves edges and properties from a single read of each.

use crate::model::data_class::ClassId;
use crate::model::data_property::{DataProperty, PropertyId};
use crate::model::relation::ClassPropertyRelation;
use crate::repo::class_repo::ClassRepository;
use crate::repo::property_repo::PropertyRepository;
use crate::repo::relation_repo::RelationRepository;
use crate::repo::EntityRef;
use crate::service::{SchemaError, SchemaResult};
use log::{debug, info};
use std::collections::HashMap;

/// Ownership edges of one class, split by whether the property resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedProperties {
    /// Resolved properties, in edge order.
    pub properties: Vec<DataProperty>,
    /// Edges whose property id no longer resolves.
    pub dangling: Vec<ClassPropertyRelation>,
}

/// Many-to-many class/property ownership graph.
pub struct RelationGraph<R: RelationRepository, C: ClassRepository, P: PropertyRepository> {
    relations: R,
    classes: C,
    properties: P,
}

impl<R, C, P> RelationGraph<R, C, P>
where
    R: RelationRepository,
    C: ClassRepository,
    P: PropertyRepository,
{
    pub fn new(relations: R, classes: C, properties: P) -> Self {
        Self {
            relations,
            classes,
            properties,
        }
    }

    /// Class repository used for endpoint checks.
    pub fn classes(&self) -> &C {
        &self.classes
    }

    /// Attaches `property_id` to `class_id`.
    ///
    /// Duplicate edges are not rejected.
    ///
    /// # Errors
    /// - `NotFound(Class)` / `NotFound(Property)` when an endpoint is missing.
    pub fn add_relation(
        &self,
        class_id: ClassId,
        property_id: PropertyId,
    ) -> SchemaResult<ClassPropertyRelation> {
        if self.classes.get_class(class_id)?.is_none() {
            return Err(SchemaError::NotFound(EntityRef::Class(class_id)));
        }
        if self.properties.get_property(property_id)?.is_none() {
            return Err(SchemaError::NotFound(EntityRef::Property(property_id)));
        }

        let relation = self.relations.create_relation(class_id, property_id)?;
        info!(
            "event=relation_create module=relation_graph status=ok relation_id={} class_id={class_id} property_id={property_id}",
            relation.id
        );
        Ok(relation)
    }

    /// Raw edges stored for `class_id`.
    pub fn relations_for_class(&self, class_id: ClassId) -> SchemaResult<Vec<ClassPropertyRelation>> {
        Ok(self.relations.list_relations_for_class(class_id)?)
    }

    /// Properties owned by `class_id`, in edge order.
    ///
    /// Unknown classes own nothing.
    pub fn owned_properties(&self, class_id: ClassId) -> SchemaResult<Vec<DataProperty>> {
        Ok(self.resolve(class_id)?.properties)
    }

    /// Edges of `class_id` whose property no longer resolves.
    pub fn dangling_relations(&self, class_id: ClassId) -> SchemaResult<Vec<ClassPropertyRelation>> {
        Ok(self.resolve(class_id)?.dangling)
    }

    /// Resolves edges of `class_id` into owned and dangling parts.
    pub fn resolve(&self, class_id: ClassId) -> SchemaResult<OwnedProperties> {
        let edges = self.relations.list_relations_for_class(class_id)?;
        if edges.is_empty() {
            return Ok(OwnedProperties::default());
        }

        let catalog: HashMap<PropertyId, DataProperty> = self
            .properties
            .list_properties()?
            .into_iter()
            .map(|property| (property.id, property))
            .collect();

        let mut owned = OwnedProperties::default();
        for edge in edges {
            match catalog.get(&edge.data_property_id) {
                Some(property) => owned.properties.push(property.clone()),
                None => {
                    debug!(
                        "event=relation_dangling module=relation_graph status=skipped relation_id={} class_id={class_id} property_id={}",
                        edge.id, edge.data_property_id
                    );
                    owned.dangling.push(edge);
                }
            }
        }
        Ok(owned)
    }
}
