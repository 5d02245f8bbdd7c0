use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::util::display_name;

use super::member::{FamilyMember, Position, RelationKind, Role};

/// A member record as the hosted store serves it. Everything except `id` is
/// tolerated as missing; conversion into the domain type fills the gaps.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberRecord {
    // Empty on inserts: the store assigns ids.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<WirePosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WirePosition {
    pub x: f32,
    pub y: f32,
}

impl MemberRecord {
    /// Records without an id cannot be addressed for updates and are dropped.
    pub fn into_member(self) -> Option<FamilyMember> {
        if self.id.is_empty() {
            return None;
        }

        let first_name = self.first_name.unwrap_or_default();
        let last_name = self.last_name.unwrap_or_default();
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| display_name(&first_name, &last_name));
        let name = if name.is_empty() {
            self.id.clone()
        } else {
            name
        };

        let relation = self.relation.unwrap_or_default();
        Some(FamilyMember {
            relation_kind: RelationKind::from_label(&relation),
            id: self.id,
            name,
            first_name,
            last_name,
            relation,
            email: self.email.unwrap_or_default(),
            phone: self.phone.filter(|phone| !phone.is_empty()),
            photo_url: self.photo_url.filter(|url| !url.is_empty()),
            generation: self.generation,
            parent_id: self.parent_id.filter(|id| !id.is_empty()),
            spouse_id: self.spouse_id.filter(|id| !id.is_empty()),
            children: self.children.unwrap_or_default(),
            position: self.position.map(|p| Position { x: p.x, y: p.y }),
            role: self.role.as_deref().and_then(Role::from_str),
        })
    }

    /// Full-record form of a domain member, for edit overwrites.
    pub fn from_member(member: &FamilyMember) -> Self {
        Self {
            id: member.id.clone(),
            name: Some(member.name.clone()),
            first_name: Some(member.first_name.clone()),
            last_name: Some(member.last_name.clone()),
            relation: Some(member.relation.clone()),
            email: Some(member.email.clone()),
            phone: member.phone.clone(),
            photo_url: member.photo_url.clone(),
            generation: member.generation,
            parent_id: member.parent_id.clone(),
            spouse_id: member.spouse_id.clone(),
            children: Some(member.children.clone()),
            position: member.position.map(|p| WirePosition { x: p.x, y: p.y }),
            role: member.role.map(|role| role.as_str().to_owned()),
        }
    }
}

pub fn position_patch(position: Position) -> Value {
    json!({ "position": { "x": position.x, "y": position.y } })
}

pub fn parent_patch(parent_id: &str) -> Value {
    json!({ "parentId": parent_id })
}

pub fn spouse_patch(spouse_id: &str) -> Value {
    json!({ "spouseId": spouse_id })
}

pub fn children_patch(children: &[String]) -> Value {
    json!({ "children": children })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_full_backend_record() {
        let raw = r#"{
            "id": "m1",
            "firstName": "Ada",
            "lastName": "Quist",
            "relation": "Grandmother",
            "email": "ada@example.com",
            "generation": 0,
            "spouseId": "m2",
            "children": ["m3"],
            "position": { "x": 40.0, "y": 12.5 },
            "role": "admin"
        }"#;

        let member = serde_json::from_str::<MemberRecord>(raw)
            .unwrap()
            .into_member()
            .unwrap();

        assert_eq!(member.name, "Ada Quist");
        assert_eq!(member.relation_kind, RelationKind::Grandmother);
        assert_eq!(member.spouse_id.as_deref(), Some("m2"));
        assert_eq!(member.position, Some(Position { x: 40.0, y: 12.5 }));
        assert_eq!(member.role, Some(Role::Admin));
    }

    #[test]
    fn sparse_records_decode_with_derived_identity() {
        let member = serde_json::from_str::<MemberRecord>(r#"{ "id": "m9" }"#)
            .unwrap()
            .into_member()
            .unwrap();

        assert_eq!(member.name, "m9");
        assert_eq!(member.relation_kind, RelationKind::Other);
        assert_eq!(member.generation, None);
        assert!(member.children.is_empty());
    }

    #[test]
    fn records_without_an_id_are_dropped() {
        let record = serde_json::from_str::<MemberRecord>(r#"{ "name": "ghost" }"#).unwrap();
        assert!(record.into_member().is_none());
    }

    #[test]
    fn patches_target_single_wire_fields() {
        assert_eq!(
            position_patch(Position { x: 150.0, y: 80.0 }),
            json!({ "position": { "x": 150.0, "y": 80.0 } })
        );
        assert_eq!(parent_patch("a"), json!({ "parentId": "a" }));
        assert_eq!(spouse_patch("b"), json!({ "spouseId": "b" }));
        assert_eq!(
            children_patch(&["x".to_owned(), "y".to_owned()]),
            json!({ "children": ["x", "y"] })
        );
    }
}
