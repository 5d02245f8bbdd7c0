use std::collections::HashMap;

/// Relation of a member to the family anchor, parsed once from the free-text
/// label supplied at creation time. The raw label is kept for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationKind {
    Grandfather,
    Grandmother,
    Father,
    Mother,
    Husband,
    Wife,
    Spouse,
    Brother,
    Sister,
    Son,
    Daughter,
    Uncle,
    Aunt,
    Cousin,
    Grandson,
    Granddaughter,
    Nephew,
    Niece,
    Other,
}

// Checked in order; the grand* patterns must come before the substrings
// they contain ("grandmother" contains "mother", "grandson" contains "son").
const LABEL_PATTERNS: [(&str, RelationKind); 18] = [
    ("grandfather", RelationKind::Grandfather),
    ("grandmother", RelationKind::Grandmother),
    ("grandson", RelationKind::Grandson),
    ("granddaughter", RelationKind::Granddaughter),
    ("father", RelationKind::Father),
    ("mother", RelationKind::Mother),
    ("husband", RelationKind::Husband),
    ("wife", RelationKind::Wife),
    ("spouse", RelationKind::Spouse),
    ("brother", RelationKind::Brother),
    ("sister", RelationKind::Sister),
    ("uncle", RelationKind::Uncle),
    ("aunt", RelationKind::Aunt),
    ("cousin", RelationKind::Cousin),
    ("nephew", RelationKind::Nephew),
    ("niece", RelationKind::Niece),
    ("son", RelationKind::Son),
    ("daughter", RelationKind::Daughter),
];

impl RelationKind {
    pub const ALL: [RelationKind; 19] = [
        Self::Grandfather,
        Self::Grandmother,
        Self::Father,
        Self::Mother,
        Self::Husband,
        Self::Wife,
        Self::Spouse,
        Self::Brother,
        Self::Sister,
        Self::Son,
        Self::Daughter,
        Self::Uncle,
        Self::Aunt,
        Self::Cousin,
        Self::Grandson,
        Self::Granddaughter,
        Self::Nephew,
        Self::Niece,
        Self::Other,
    ];

    pub fn from_label(label: &str) -> Self {
        let lowered = label.trim().to_lowercase();
        LABEL_PATTERNS
            .iter()
            .find(|(pattern, _)| lowered.contains(pattern))
            .map(|&(_, kind)| kind)
            .unwrap_or(Self::Other)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Grandfather => "Grandfather",
            Self::Grandmother => "Grandmother",
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Husband => "Husband",
            Self::Wife => "Wife",
            Self::Spouse => "Spouse",
            Self::Brother => "Brother",
            Self::Sister => "Sister",
            Self::Son => "Son",
            Self::Daughter => "Daughter",
            Self::Uncle => "Uncle",
            Self::Aunt => "Aunt",
            Self::Cousin => "Cousin",
            Self::Grandson => "Grandson",
            Self::Granddaughter => "Granddaughter",
            Self::Nephew => "Nephew",
            Self::Niece => "Niece",
            Self::Other => "Other",
        }
    }

    /// Generation rank used when a member has no stored generation and no
    /// resolvable parent chain. Grandparents anchor the tree at 0.
    pub fn fallback_generation(self) -> i32 {
        match self {
            Self::Grandfather | Self::Grandmother => 0,
            Self::Father | Self::Mother | Self::Husband | Self::Wife | Self::Spouse => 1,
            Self::Brother
            | Self::Sister
            | Self::Son
            | Self::Daughter
            | Self::Uncle
            | Self::Aunt
            | Self::Cousin => 2,
            Self::Grandson | Self::Granddaughter | Self::Nephew | Self::Niece => 3,
            Self::Other => 1,
        }
    }

    /// The label a spouse of this member would carry, for the fixed pair set
    /// {Husband/Wife, Spouse/Spouse}. Everything else never pairs.
    pub fn spouse_complement(self) -> Option<RelationKind> {
        match self {
            Self::Husband => Some(Self::Wife),
            Self::Wife => Some(Self::Husband),
            Self::Spouse => Some(Self::Spouse),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
    Guest,
}

impl Role {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            "guest" => Some(Self::Guest),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Guest => "guest",
        }
    }
}

/// One person in the family tree, as cached from the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub relation: String,
    pub relation_kind: RelationKind,
    pub email: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub generation: Option<i32>,
    pub parent_id: Option<String>,
    pub spouse_id: Option<String>,
    pub children: Vec<String>,
    pub position: Option<Position>,
    pub role: Option<Role>,
}

impl FamilyMember {
    /// Resolved generation. `infer::populate` guarantees this is set on every
    /// member of a snapshot; the default only covers records that bypassed it.
    pub fn generation_rank(&self) -> i32 {
        self.generation
            .unwrap_or_else(|| self.relation_kind.fallback_generation())
    }
}

/// Immutable snapshot of the member list with id-indexed lookups. Rebuilt
/// wholesale from every fetch; never mutated in place.
#[derive(Clone, Debug, Default)]
pub struct FamilyTree {
    members: Vec<FamilyMember>,
    index: HashMap<String, usize>,
}

impl FamilyTree {
    pub fn from_members(raw: Vec<FamilyMember>) -> Self {
        let members = super::infer::populate(raw);
        let index = members
            .iter()
            .enumerate()
            .map(|(position, member)| (member.id.clone(), position))
            .collect();
        Self { members, index }
    }

    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn get(&self, id: &str) -> Option<&FamilyMember> {
        self.index.get(id).map(|&position| &self.members[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parsing_is_case_insensitive_and_tolerant() {
        assert_eq!(RelationKind::from_label("Grandmother"), RelationKind::Grandmother);
        assert_eq!(RelationKind::from_label("  wife "), RelationKind::Wife);
        assert_eq!(
            RelationKind::from_label("Grandfather (paternal)"),
            RelationKind::Grandfather
        );
        assert_eq!(RelationKind::from_label("GRANDSON"), RelationKind::Grandson);
        assert_eq!(RelationKind::from_label("Astronaut"), RelationKind::Other);
    }

    #[test]
    fn grand_labels_do_not_collapse_into_their_substrings() {
        assert_ne!(RelationKind::from_label("Grandmother"), RelationKind::Mother);
        assert_ne!(RelationKind::from_label("Granddaughter"), RelationKind::Daughter);
    }

    #[test]
    fn spouse_complement_pairs() {
        assert_eq!(
            RelationKind::Husband.spouse_complement(),
            Some(RelationKind::Wife)
        );
        assert_eq!(
            RelationKind::Spouse.spouse_complement(),
            Some(RelationKind::Spouse)
        );
        assert_eq!(RelationKind::Brother.spouse_complement(), None);
    }
}
