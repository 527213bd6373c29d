//! Turns records and their relationships into plain JSON values.
//!
//! Relationships are resolved through a [`RelationSource`] while the tree is
//! built. Two mechanisms keep the output finite:
//!
//! - explicit [`Rules`] passed by the caller, dropping back-references such as
//!   a planet's missions' `planet`;
//! - a chain of the entity kinds currently being expanded. A relation that
//!   points back at a kind already on the chain is omitted.
//!
//! `created_at` and `updated_at` are dropped at every depth.

mod rules;

pub use rules::Rules;

use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::models::{EntityKind, Mission, Planet, Record, Scientist};

const TIMESTAMP_FIELDS: &[&str] = &["created_at", "updated_at"];

/// Read access to related records. Implemented by the database and by
/// in-memory fixtures.
pub trait RelationSource {
    fn planet(&self, id: i64) -> StoreResult<Option<Planet>>;
    fn scientist(&self, id: i64) -> StoreResult<Option<Scientist>>;
    fn missions_for_planet(&self, planet_id: i64) -> StoreResult<Vec<Mission>>;
    fn missions_for_scientist(&self, scientist_id: i64) -> StoreResult<Vec<Mission>>;
    /// Derived: distinct scientists with a mission to this planet.
    fn scientists_for_planet(&self, planet_id: i64) -> StoreResult<Vec<Scientist>>;
    /// Derived: distinct planets this scientist has a mission to.
    fn planets_for_scientist(&self, scientist_id: i64) -> StoreResult<Vec<Planet>>;
}

#[derive(Debug, Clone, Copy)]
enum Cardinality {
    One,
    Many,
}

/// A named relationship from one entity kind to another.
#[derive(Debug, Clone, Copy)]
struct Relation {
    name: &'static str,
    target: EntityKind,
    cardinality: Cardinality,
    /// The relation this one is projected through, for derived views.
    through: Option<&'static str>,
}

const PLANET_RELATIONS: &[Relation] = &[
    Relation {
        name: "missions",
        target: EntityKind::Mission,
        cardinality: Cardinality::Many,
        through: None,
    },
    Relation {
        name: "scientists",
        target: EntityKind::Scientist,
        cardinality: Cardinality::Many,
        through: Some("missions"),
    },
];

const SCIENTIST_RELATIONS: &[Relation] = &[
    Relation {
        name: "missions",
        target: EntityKind::Mission,
        cardinality: Cardinality::Many,
        through: None,
    },
    Relation {
        name: "planets",
        target: EntityKind::Planet,
        cardinality: Cardinality::Many,
        through: Some("missions"),
    },
];

const MISSION_RELATIONS: &[Relation] = &[
    Relation {
        name: "planet",
        target: EntityKind::Planet,
        cardinality: Cardinality::One,
        through: None,
    },
    Relation {
        name: "scientist",
        target: EntityKind::Scientist,
        cardinality: Cardinality::One,
        through: None,
    },
];

fn relations_of(kind: EntityKind) -> &'static [Relation] {
    match kind {
        EntityKind::Planet => PLANET_RELATIONS,
        EntityKind::Scientist => SCIENTIST_RELATIONS,
        EntityKind::Mission => MISSION_RELATIONS,
    }
}

/// Serializes a record and its related records under `rules`.
pub fn to_value<S>(source: &S, record: &Record, rules: &Rules) -> StoreResult<Value>
where
    S: RelationSource + ?Sized,
{
    Serializer {
        source,
        chain: Vec::new(),
    }
    .record(record, rules)
}

/// Serializes each record under the same rules.
pub fn to_values<S, R>(source: &S, records: impl IntoIterator<Item = R>, rules: &Rules) -> StoreResult<Vec<Value>>
where
    S: RelationSource + ?Sized,
    R: Into<Record>,
{
    records
        .into_iter()
        .map(|r| to_value(source, &r.into(), rules))
        .collect()
}

struct Serializer<'a, S: ?Sized> {
    source: &'a S,
    chain: Vec<EntityKind>,
}

impl<S> Serializer<'_, S>
where
    S: RelationSource + ?Sized,
{
    fn record(&mut self, record: &Record, rules: &Rules) -> StoreResult<Value> {
        let mut map = columns(record, rules)?;

        let kind = record.kind();
        self.chain.push(kind);
        for relation in relations_of(kind) {
            if !self.includes(relation, rules) {
                continue;
            }
            let nested_rules = rules.descend(relation.name);
            let value = match relation.cardinality {
                Cardinality::One => match self.resolve_one(record, relation)? {
                    Some(related) => self.record(&related, &nested_rules)?,
                    None => Value::Null,
                },
                Cardinality::Many => {
                    let related = self.resolve_many(record, relation)?;
                    let mut items = Vec::with_capacity(related.len());
                    for r in &related {
                        items.push(self.record(r, &nested_rules)?);
                    }
                    Value::Array(items)
                }
            };
            map.insert(relation.name.to_string(), value);
        }
        self.chain.pop();

        Ok(Value::Object(map))
    }

    fn includes(&self, relation: &Relation, rules: &Rules) -> bool {
        if rules.excludes(relation.name) || self.chain.contains(&relation.target) {
            return false;
        }
        match relation.through {
            Some(through) => !rules.excludes(through),
            None => true,
        }
    }

    fn resolve_one(&self, record: &Record, relation: &Relation) -> StoreResult<Option<Record>> {
        let Record::Mission(mission) = record else {
            return Err(unknown_relation(record, relation));
        };
        Ok(match relation.target {
            EntityKind::Planet => self.source.planet(mission.planet_id)?.map(Record::from),
            EntityKind::Scientist => self
                .source
                .scientist(mission.scientist_id)?
                .map(Record::from),
            EntityKind::Mission => return Err(unknown_relation(record, relation)),
        })
    }

    fn resolve_many(&self, record: &Record, relation: &Relation) -> StoreResult<Vec<Record>> {
        let records = match (record, relation.target) {
            (Record::Planet(p), EntityKind::Mission) => into_records(self.source.missions_for_planet(p.id)?),
            (Record::Planet(p), EntityKind::Scientist) => {
                into_records(self.source.scientists_for_planet(p.id)?)
            }
            (Record::Scientist(s), EntityKind::Mission) => {
                into_records(self.source.missions_for_scientist(s.id)?)
            }
            (Record::Scientist(s), EntityKind::Planet) => {
                into_records(self.source.planets_for_scientist(s.id)?)
            }
            _ => return Err(unknown_relation(record, relation)),
        };
        Ok(records)
    }
}

/// Column values of the record, minus timestamps and excluded columns.
fn columns(record: &Record, rules: &Rules) -> StoreResult<Map<String, Value>> {
    let value = match record {
        Record::Planet(p) => serde_json::to_value(p)?,
        Record::Scientist(s) => serde_json::to_value(s)?,
        Record::Mission(m) => serde_json::to_value(m)?,
    };
    let Value::Object(mut map) = value else {
        return Err(StoreError::Internal(format!(
            "{} did not serialize to an object",
            record.kind()
        )));
    };
    map.retain(|key, _| !TIMESTAMP_FIELDS.contains(&key.as_str()) && !rules.excludes(key));
    Ok(map)
}

fn into_records<T: Into<Record>>(items: Vec<T>) -> Vec<Record> {
    items.into_iter().map(Into::into).collect()
}

fn unknown_relation(record: &Record, relation: &Relation) -> StoreError {
    StoreError::Internal(format!(
        "{} has no relation {}",
        record.kind(),
        relation.name
    ))
}
