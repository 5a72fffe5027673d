//! Class–property ownership edge.

use crate::model::data_class::ClassId;
use crate::model::data_property::PropertyId;
use serde::{Deserialize, Serialize};

/// Store-assigned relation identifier.
pub type RelationId = i64;

/// Edge of the bipartite class/property ownership graph.
///
/// Duplicate `(data_class_id, data_property_id)` pairs are legal here;
/// callers that want uniqueness check before adding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPropertyRelation {
    pub id: RelationId,
    pub data_class_id: ClassId,
    pub data_property_id: PropertyId,
}
