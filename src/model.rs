//! Entity model: people, relationships, and the [`Genogram`] container that
//! owns both and keeps references between them consistent.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GenogramError, Result};

/// A point in model space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A calendar triple. Values are stored verbatim; nothing checks that the
/// day exists in the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    pub day: i32,
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    #[default]
    Female,
    NonBinary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SexualOrientation {
    #[default]
    Straight,
    Gay,
    Lesbian,
    Bisexual,
    Other,
}

/// The three disjoint partitions of the relationship catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Couple,
    ParentChild,
    Twin,
}

/// Every relationship code the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Married,
    LegalSeparation,
    Divorced,
    DivorcedRemarried,
    SeparationInFact,
    Engagement,
    ShortTerm,
    Temporary,
    OtherUnknown,
    BiologicalChild,
    FosterChild,
    AdoptedChild,
    FraternalTwins,
    IdenticalTwins,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 14] = [
        Self::Married,
        Self::LegalSeparation,
        Self::Divorced,
        Self::DivorcedRemarried,
        Self::SeparationInFact,
        Self::Engagement,
        Self::ShortTerm,
        Self::Temporary,
        Self::OtherUnknown,
        Self::BiologicalChild,
        Self::FosterChild,
        Self::AdoptedChild,
        Self::FraternalTwins,
        Self::IdenticalTwins,
    ];

    pub fn family(self) -> Family {
        match self {
            Self::Married
            | Self::LegalSeparation
            | Self::Divorced
            | Self::DivorcedRemarried
            | Self::SeparationInFact
            | Self::Engagement
            | Self::ShortTerm
            | Self::Temporary
            | Self::OtherUnknown => Family::Couple,
            Self::BiologicalChild | Self::FosterChild | Self::AdoptedChild => Family::ParentChild,
            Self::FraternalTwins | Self::IdenticalTwins => Family::Twin,
        }
    }

    /// All types belonging to `family`, in catalog order.
    pub fn of_family(family: Family) -> impl Iterator<Item = RelationshipType> {
        Self::ALL.into_iter().filter(move |t| t.family() == family)
    }

    /// The wire code used in documents.
    pub fn code(self) -> &'static str {
        match self {
            Self::Married => "married",
            Self::LegalSeparation => "legal_separation",
            Self::Divorced => "divorced",
            Self::DivorcedRemarried => "divorced_remarried",
            Self::SeparationInFact => "separation_in_fact",
            Self::Engagement => "engagement",
            Self::ShortTerm => "short_term",
            Self::Temporary => "temporary",
            Self::OtherUnknown => "other_unknown",
            Self::BiologicalChild => "biological_child",
            Self::FosterChild => "foster_child",
            Self::AdoptedChild => "adopted_child",
            Self::FraternalTwins => "fraternal_twins",
            Self::IdenticalTwins => "identical_twins",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Married => "Married",
            Self::LegalSeparation => "Legal Separation",
            Self::Divorced => "Divorced",
            Self::DivorcedRemarried => "Divorced then Remarried",
            Self::SeparationInFact => "Separation in Fact",
            Self::Engagement => "Engagement / Long-Term",
            Self::ShortTerm => "Short-Term Relationship",
            Self::Temporary => "Temporary / One-Night Stand",
            Self::OtherUnknown => "Other / Unknown",
            Self::BiologicalChild => "Biological Child",
            Self::FosterChild => "Foster Child",
            Self::AdoptedChild => "Adopted Child",
            Self::FraternalTwins => "Fraternal Twins",
            Self::IdenticalTwins => "Identical Twins",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Family::Couple => "couple",
            Family::ParentChild => "parent-child",
            Family::Twin => "twin",
        })
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh, globally unique id.
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "_{}"), Uuid::new_v4().simple()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_id!(
    /// Opaque, immutable identity of a [`Person`].
    PersonId,
    "p"
);
string_id!(
    /// Opaque, immutable identity of a [`Relationship`].
    RelationshipId,
    "r"
);

/// An individual on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    id: PersonId,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub hyphenated_last_name: String,
    /// User-ordered; the order is only used for display.
    pub former_last_names: Vec<String>,
    pub birth_date: Option<DateParts>,
    pub death_date: Option<DateParts>,
    pub alive: bool,
    pub gender: Gender,
    pub sexual_orientation: SexualOrientation,
    pub notes: String,
    pub position: Point,
}

impl Person {
    /// A blank person with a generated id.
    pub fn new(gender: Gender, position: Point) -> Self {
        Self::with_id(PersonId::generate(), gender, position)
    }

    pub fn with_id(id: PersonId, gender: Gender, position: Point) -> Self {
        Self {
            id,
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            hyphenated_last_name: String::new(),
            former_last_names: Vec::new(),
            birth_date: None,
            death_date: None,
            alive: true,
            gender,
            sexual_orientation: SexualOrientation::Straight,
            notes: String::new(),
            position,
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    /// Given names and surname joined by spaces, blanks skipped. The
    /// hyphenated surname stands in for the last name when one is set.
    pub fn display_name(&self) -> String {
        let last = if self.hyphenated_last_name.trim().is_empty() {
            &self.last_name
        } else {
            &self.hyphenated_last_name
        };
        [&self.first_name, &self.middle_name, last]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Metadata carried by a relationship. `drop` is the only key the editor
/// interprets; anything else is kept so documents round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipMeta {
    pub drop: f32,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RelationshipMeta {
    pub fn with_drop(drop: f32) -> Self {
        Self {
            drop,
            extra: serde_json::Map::new(),
        }
    }
}

/// A typed connection between exactly two people.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    id: RelationshipId,
    pub kind: RelationshipType,
    people: [PersonId; 2],
    pub meta: RelationshipMeta,
}

impl Relationship {
    pub fn new(kind: RelationshipType, a: PersonId, b: PersonId, drop: f32) -> Self {
        Self::with_id(RelationshipId::generate(), kind, [a, b], RelationshipMeta::with_drop(drop))
    }

    pub fn with_id(
        id: RelationshipId,
        kind: RelationshipType,
        people: [PersonId; 2],
        meta: RelationshipMeta,
    ) -> Self {
        Self { id, kind, people, meta }
    }

    pub fn id(&self) -> &RelationshipId {
        &self.id
    }

    /// The ordered endpoint pair.
    pub fn people(&self) -> &[PersonId; 2] {
        &self.people
    }

    pub fn involves(&self, person: &PersonId) -> bool {
        self.people.contains(person)
    }

    /// The endpoint that is not `person`, if `person` is one of them.
    pub fn other(&self, person: &PersonId) -> Option<&PersonId> {
        match &self.people {
            [a, b] if a == person => Some(b),
            [a, b] if b == person => Some(a),
            _ => None,
        }
    }

    pub fn family(&self) -> Family {
        self.kind.family()
    }
}

/// Owner of every person and relationship on the chart.
///
/// Relationships are cascade-deleted with either endpoint, and
/// [`add_relationship`](Self::add_relationship) refuses endpoints that do
/// not exist. Only an imported document can introduce a dangling
/// reference; such relationships stay in the model and are skipped by
/// [`endpoints`](Self::endpoints) consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Genogram {
    people: IndexMap<PersonId, Person>,
    relationships: IndexMap<RelationshipId, Relationship>,
}

impl Genogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, person: Person) -> Result<()> {
        if self.people.contains_key(person.id()) {
            return Err(GenogramError::DuplicateId(person.id().to_string()));
        }
        self.people.insert(person.id().clone(), person);
        Ok(())
    }

    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<()> {
        for person in relationship.people() {
            if !self.people.contains_key(person) {
                return Err(GenogramError::DanglingReference {
                    relationship: relationship.id().to_string(),
                    person: person.to_string(),
                });
            }
        }
        self.insert_relationship(relationship)
    }

    /// Insert without checking endpoints. Used when hydrating documents,
    /// which may legitimately carry dangling references.
    pub(crate) fn insert_relationship(&mut self, relationship: Relationship) -> Result<()> {
        if self.relationships.contains_key(relationship.id()) {
            return Err(GenogramError::DuplicateId(relationship.id().to_string()));
        }
        self.relationships
            .insert(relationship.id().clone(), relationship);
        Ok(())
    }

    /// Remove a person together with every relationship that references it.
    pub fn remove_person(&mut self, id: &PersonId) -> Option<Person> {
        let person = self.people.shift_remove(id)?;
        let before = self.relationships.len();
        self.relationships.retain(|_, rel| !rel.involves(id));
        tracing::debug!(
            person = %id,
            cascaded = before - self.relationships.len(),
            "removed person"
        );
        Some(person)
    }

    pub fn remove_relationship(&mut self, id: &RelationshipId) -> Option<Relationship> {
        self.relationships.shift_remove(id)
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.get(id)
    }

    pub fn person_mut(&mut self, id: &PersonId) -> Option<&mut Person> {
        self.people.get_mut(id)
    }

    pub fn relationship(&self, id: &RelationshipId) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    pub fn relationship_mut(&mut self, id: &RelationshipId) -> Option<&mut Relationship> {
        self.relationships.get_mut(id)
    }

    /// People in insertion order, which is also drawing order.
    pub fn people(&self) -> impl DoubleEndedIterator<Item = &Person> {
        self.people.values()
    }

    pub fn relationships(&self) -> impl DoubleEndedIterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.relationships.is_empty()
    }

    /// Every relationship that references `person`.
    pub fn relationships_of<'a>(
        &'a self,
        person: &'a PersonId,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships.values().filter(move |rel| rel.involves(person))
    }

    /// Resolve both endpoints of a relationship, in stored order.
    pub fn endpoints(&self, relationship: &Relationship) -> Result<(&Person, &Person)> {
        let [a, b] = relationship.people();
        let resolve = |id: &PersonId| {
            self.people.get(id).ok_or_else(|| GenogramError::DanglingReference {
                relationship: relationship.id().to_string(),
                person: id.to_string(),
            })
        };
        Ok((resolve(a)?, resolve(b)?))
    }

    /// The couple-family relationship linking exactly `a` and `b`, if any.
    pub fn couple_between(&self, a: &PersonId, b: &PersonId) -> Option<&Relationship> {
        self.relationships.values().find(|rel| {
            rel.family() == Family::Couple && rel.involves(a) && rel.involves(b) && a != b
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, x: f32, y: f32) -> Person {
        Person::with_id(PersonId::from(id), Gender::Female, Point::new(x, y))
    }

    fn rel(id: &str, a: &str, b: &str) -> Relationship {
        Relationship::with_id(
            RelationshipId::from(id),
            RelationshipType::Married,
            [PersonId::from(a), PersonId::from(b)],
            RelationshipMeta::with_drop(40.0),
        )
    }

    fn abc() -> Genogram {
        let mut g = Genogram::new();
        g.add_person(person("A", 0.0, 0.0)).unwrap();
        g.add_person(person("B", 100.0, 0.0)).unwrap();
        g.add_person(person("C", 200.0, 0.0)).unwrap();
        g.add_relationship(rel("AB", "A", "B")).unwrap();
        g.add_relationship(rel("BC", "B", "C")).unwrap();
        g
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    #[test]
    fn test_catalog_partitions() {
        assert_eq!(RelationshipType::of_family(Family::Couple).count(), 9);
        assert_eq!(RelationshipType::of_family(Family::ParentChild).count(), 3);
        assert_eq!(RelationshipType::of_family(Family::Twin).count(), 2);
    }

    #[test]
    fn test_codes_match_serde_names() {
        for kind in RelationshipType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }

    #[test]
    fn test_generated_ids_are_unique_and_prefixed() {
        let a = PersonId::generate();
        let b = PersonId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("p_"));
        assert!(RelationshipId::generate().as_str().starts_with("r_"));
    }

    // ========================================================================
    // Container
    // ========================================================================

    #[test]
    fn test_duplicate_person_rejected() {
        let mut g = Genogram::new();
        g.add_person(person("A", 0.0, 0.0)).unwrap();
        let err = g.add_person(person("A", 5.0, 5.0)).unwrap_err();
        assert_eq!(err, GenogramError::DuplicateId("A".into()));
        assert_eq!(g.person(&"A".into()).unwrap().position, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_duplicate_relationship_rejected() {
        let mut g = abc();
        let err = g.add_relationship(rel("AB", "A", "C")).unwrap_err();
        assert_eq!(err, GenogramError::DuplicateId("AB".into()));
    }

    #[test]
    fn test_relationship_to_missing_person_rejected() {
        let mut g = abc();
        let err = g.add_relationship(rel("AZ", "A", "Z")).unwrap_err();
        assert!(matches!(err, GenogramError::DanglingReference { .. }));
        assert_eq!(g.relationship_count(), 2);
    }

    #[test]
    fn test_remove_middle_person_cascades_all() {
        let mut g = abc();
        assert!(g.remove_person(&"B".into()).is_some());
        assert_eq!(g.relationship_count(), 0);
        assert_eq!(g.person_count(), 2);
    }

    #[test]
    fn test_remove_end_person_keeps_unrelated() {
        let mut g = abc();
        g.remove_person(&"A".into());
        let remaining: Vec<_> = g.relationships().map(|r| r.id().as_str()).collect();
        assert_eq!(remaining, vec!["BC"]);
    }

    #[test]
    fn test_remove_missing_person_is_none() {
        let mut g = abc();
        assert!(g.remove_person(&"Z".into()).is_none());
        assert_eq!(g.relationship_count(), 2);
    }

    #[test]
    fn test_remove_relationship_only_touches_that_one() {
        let mut g = abc();
        g.remove_relationship(&"AB".into());
        assert_eq!(g.person_count(), 3);
        assert_eq!(g.relationship_count(), 1);
    }

    #[test]
    fn test_endpoints_and_dangling() {
        let mut g = abc();
        let (a, b) = g.endpoints(g.relationship(&"AB".into()).unwrap()).unwrap();
        assert_eq!(a.id().as_str(), "A");
        assert_eq!(b.id().as_str(), "B");

        g.insert_relationship(rel("AZ", "A", "Z")).unwrap();
        let err = g.endpoints(g.relationship(&"AZ".into()).unwrap()).unwrap_err();
        assert_eq!(
            err,
            GenogramError::DanglingReference {
                relationship: "AZ".into(),
                person: "Z".into()
            }
        );
    }

    #[test]
    fn test_relationships_of_and_couple_between() {
        let g = abc();
        let b = PersonId::from("B");
        assert_eq!(g.relationships_of(&b).count(), 2);
        assert_eq!(
            g.couple_between(&"C".into(), &"B".into()).map(|r| r.id().as_str()),
            Some("BC")
        );
        assert!(g.couple_between(&"A".into(), &"C".into()).is_none());
    }

    #[test]
    fn test_other_endpoint() {
        let r = rel("AB", "A", "B");
        assert_eq!(r.other(&"A".into()).map(|p| p.as_str()), Some("B"));
        assert_eq!(r.other(&"B".into()).map(|p| p.as_str()), Some("A"));
        assert!(r.other(&"C".into()).is_none());
    }

    #[test]
    fn test_display_name() {
        let mut p = person("A", 0.0, 0.0);
        p.first_name = "Ada".into();
        p.last_name = "Byron".into();
        assert_eq!(p.display_name(), "Ada Byron");
        p.middle_name = " ".into();
        p.hyphenated_last_name = "King-Noel".into();
        assert_eq!(p.display_name(), "Ada King-Noel");
    }
}
