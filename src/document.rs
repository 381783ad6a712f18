//! Flat, serializable snapshot of a [`Genogram`].
//!
//! The document is the only persistence the editor has:
//!
//! ```json
//! { "people": [ { "id": "p_1", "firstName": "Ada", "position": { "x": 0, "y": 0 }, ... } ],
//!   "relationships": [ { "id": "r_1", "type": "married", "people": ["p_1", "p_2"], "meta": { "drop": 40 } } ] }
//! ```
//!
//! Every record owns its data, so a snapshot never aliases the live model.

use serde::{Deserialize, Serialize};

use crate::error::{GenogramError, Result};
use crate::model::{
    DateParts, Gender, Genogram, Person, PersonId, Point, Relationship, RelationshipId,
    RelationshipMeta, RelationshipType, SexualOrientation,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub people: Vec<PersonRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    #[serde(default = "PersonId::generate")]
    pub id: PersonId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub hyphenated_last_name: String,
    #[serde(default)]
    pub former_last_names: Vec<String>,
    #[serde(default)]
    pub birth_date: Option<DateParts>,
    #[serde(default = "alive_default")]
    pub alive: bool,
    #[serde(default)]
    pub death_date: Option<DateParts>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub sexual_orientation: SexualOrientation,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub position: Point,
}

fn alive_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    #[serde(default = "RelationshipId::generate")]
    pub id: RelationshipId,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub people: [PersonId; 2],
    #[serde(default)]
    pub meta: MetaRecord,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop: Option<f32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// Parse a JSON document. Shape errors are reported as
    /// [`GenogramError::MalformedDocument`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(GenogramError::MalformedDocument(
                "top level must be an object with `people` and `relationships`".into(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&Person> for PersonRecord {
    fn from(p: &Person) -> Self {
        Self {
            id: p.id().clone(),
            first_name: p.first_name.clone(),
            middle_name: p.middle_name.clone(),
            last_name: p.last_name.clone(),
            hyphenated_last_name: p.hyphenated_last_name.clone(),
            former_last_names: p.former_last_names.clone(),
            birth_date: p.birth_date,
            alive: p.alive,
            death_date: p.death_date,
            gender: p.gender,
            sexual_orientation: p.sexual_orientation,
            notes: p.notes.clone(),
            position: p.position,
        }
    }
}

impl From<&PersonRecord> for Person {
    fn from(r: &PersonRecord) -> Self {
        let mut p = Person::with_id(r.id.clone(), r.gender, r.position);
        p.first_name = r.first_name.clone();
        p.middle_name = r.middle_name.clone();
        p.last_name = r.last_name.clone();
        p.hyphenated_last_name = r.hyphenated_last_name.clone();
        p.former_last_names = r.former_last_names.clone();
        p.birth_date = r.birth_date;
        p.alive = r.alive;
        p.death_date = r.death_date;
        p.sexual_orientation = r.sexual_orientation;
        p.notes = r.notes.clone();
        p
    }
}

impl From<&Relationship> for RelationshipRecord {
    fn from(r: &Relationship) -> Self {
        Self {
            id: r.id().clone(),
            kind: r.kind,
            people: r.people().clone(),
            meta: MetaRecord {
                drop: Some(r.meta.drop),
                extra: r.meta.extra.clone(),
            },
        }
    }
}

impl RelationshipRecord {
    fn to_relationship(&self, default_drop: f32) -> Relationship {
        Relationship::with_id(
            self.id.clone(),
            self.kind,
            self.people.clone(),
            RelationshipMeta {
                drop: self.meta.drop.unwrap_or(default_drop),
                extra: self.meta.extra.clone(),
            },
        )
    }
}

impl Genogram {
    /// Deep-copy the container into a document.
    pub fn to_snapshot(&self) -> Document {
        Document {
            people: self.people().map(PersonRecord::from).collect(),
            relationships: self.relationships().map(RelationshipRecord::from).collect(),
        }
    }

    /// Build a fresh container from a document.
    ///
    /// Duplicate ids fail the whole import. Relationships whose endpoints
    /// are missing are kept as-is and logged; they are skipped later by the
    /// renderer and hit-testing.
    pub fn from_snapshot(doc: &Document, default_drop: f32) -> Result<Genogram> {
        let mut g = Genogram::new();
        for record in &doc.people {
            g.add_person(Person::from(record))?;
        }
        for record in &doc.relationships {
            let rel = record.to_relationship(default_drop);
            if let Err(err) = g.endpoints(&rel) {
                tracing::warn!(%err, "imported relationship has a dangling endpoint");
            }
            g.insert_relationship(rel)?;
        }
        Ok(g)
    }

    pub fn to_json_string(&self) -> Result<String> {
        self.to_snapshot().to_json_string()
    }

    pub fn from_json_str(json: &str, default_drop: f32) -> Result<Genogram> {
        Self::from_snapshot(&Document::from_json_str(json)?, default_drop)
    }
}
