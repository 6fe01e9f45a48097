use std::collections::BTreeSet;

use crate::{
    naming::{self, PivotIdentity},
    Column, ConjunctRelation, Entity, EntityWriter, FieldDef, ModelStructure, Relation,
    RelationType,
};

pub struct EntityTransformer;

impl EntityTransformer {
    /// Turns the declared models and relations into renderable entities,
    /// one per model plus one per unique many to many pair.
    pub fn transform(structure: &ModelStructure) -> EntityWriter {
        let entities = structure
            .models
            .iter()
            .map(|(model, fields)| Self::transform_model(model, fields, structure))
            .collect();
        let pivots = Self::transform_pivots(structure);
        EntityWriter { entities, pivots }
    }

    fn transform_model(model: &str, fields: &[FieldDef], structure: &ModelStructure) -> Entity {
        let mut columns = vec![Column::id()];
        columns.extend(fields.iter().map(Column::from));
        columns.extend(Column::timestamps());

        // Duplicate targets would collide on the relation enum variant, so
        // the first declaration wins.
        let mut seen = BTreeSet::new();
        let mut relations = Vec::new();
        for child in structure.relations.children_of(model) {
            let ref_table = naming::table_name(child);
            if seen.insert(ref_table.clone()) {
                relations.push(Relation {
                    ref_table,
                    rel_type: RelationType::HasMany,
                    from_column: None,
                    on_delete_cascade: false,
                });
            }
        }
        for parent in structure.relations.parents_of(model) {
            let ref_table = naming::table_name(parent);
            if seen.insert(ref_table.clone()) {
                relations.push(Relation {
                    ref_table,
                    rel_type: RelationType::BelongsTo,
                    from_column: Some(format!("{}_id", naming::singular_snake(parent))),
                    on_delete_cascade: false,
                });
            }
        }

        let mut seen_partners = BTreeSet::new();
        let mut conjunct_relations = Vec::new();
        for partner in structure.relations.partners_of(model) {
            if !seen_partners.insert(partner) {
                continue;
            }
            let pivot = PivotIdentity::new(model, partner);
            let via = pivot.table();
            if seen.insert(via.clone()) {
                relations.push(Relation {
                    ref_table: via.clone(),
                    rel_type: RelationType::HasMany,
                    from_column: None,
                    on_delete_cascade: false,
                });
            }
            conjunct_relations.push(ConjunctRelation {
                via,
                to: naming::table_name(partner),
            });
        }

        Entity {
            table_name: naming::table_name(model),
            columns,
            relations,
            conjunct_relations,
        }
    }

    fn transform_pivots(structure: &ModelStructure) -> Vec<Entity> {
        let mut seen = BTreeSet::new();
        let mut pivots = Vec::new();
        for pair in &structure.relations.belongs_to_many {
            let pivot = PivotIdentity::new(&pair.model, &pair.related);
            if !seen.insert(pivot.table()) {
                continue;
            }
            let belongs_to = |table: String, column: String| Relation {
                ref_table: table,
                rel_type: RelationType::BelongsTo,
                from_column: Some(column),
                on_delete_cascade: true,
            };
            pivots.push(Entity {
                table_name: pivot.table(),
                columns: vec![
                    Column::id(),
                    Column::foreign_key(&pivot.left_column()),
                    Column::foreign_key(&pivot.right_column()),
                ],
                relations: vec![
                    belongs_to(pivot.left_table(), pivot.left_column()),
                    belongs_to(pivot.right_table(), pivot.right_column()),
                ],
                conjunct_relations: vec![],
            });
        }
        pivots
    }
}
