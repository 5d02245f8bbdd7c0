use std::collections::{HashMap, HashSet, VecDeque};

use super::member::FamilyMember;

/// Fills in `generation`, `spouse_id`, and `children` on every member of a
/// snapshot. Stored values always win over inferred ones.
///
/// Generation is walked breadth-first down the `parent_id` edges, starting
/// from members with no resolvable parent; a chain root without a stored
/// generation is anchored at its relation label's rank. Members that cannot
/// be reached that way (unknown parents, cycles) get the label rank directly.
pub fn populate(mut members: Vec<FamilyMember>) -> Vec<FamilyMember> {
    let index = members
        .iter()
        .enumerate()
        .map(|(position, member)| (member.id.clone(), position))
        .collect::<HashMap<_, _>>();

    merge_children(&mut members, &index);
    resolve_generations(&mut members, &index);
    pair_spouses(&mut members);

    members
}

fn merge_children(members: &mut [FamilyMember], index: &HashMap<String, usize>) {
    let mut derived: Vec<Vec<String>> = vec![Vec::new(); members.len()];
    for member in members.iter() {
        if let Some(parent_id) = &member.parent_id
            && let Some(&parent) = index.get(parent_id)
            && members[parent].id != member.id
        {
            derived[parent].push(member.id.clone());
        }
    }

    for (position, scanned) in derived.into_iter().enumerate() {
        let member = &mut members[position];
        let mut merged = Vec::with_capacity(member.children.len() + scanned.len());
        let mut seen = HashSet::new();
        for child_id in member.children.drain(..).chain(scanned) {
            if child_id != member.id && seen.insert(child_id.clone()) {
                merged.push(child_id);
            }
        }
        member.children = merged;
    }
}

fn resolve_generations(members: &mut [FamilyMember], index: &HashMap<String, usize>) {
    let mut resolved: Vec<Option<i32>> = members.iter().map(|member| member.generation).collect();
    let mut visited = vec![false; members.len()];
    let mut queue = VecDeque::new();

    for (position, member) in members.iter().enumerate() {
        let has_parent = member
            .parent_id
            .as_deref()
            .is_some_and(|parent_id| parent_id != member.id && index.contains_key(parent_id));

        if !has_parent {
            if resolved[position].is_none() {
                resolved[position] = Some(member.relation_kind.fallback_generation());
            }
            visited[position] = true;
            queue.push_back(position);
        } else if resolved[position].is_some() {
            visited[position] = true;
            queue.push_back(position);
        }
    }

    while let Some(position) = queue.pop_front() {
        let Some(rank) = resolved[position] else {
            continue;
        };

        for child_id in &members[position].children {
            let Some(&child) = index.get(child_id) else {
                continue;
            };
            // Only actual parent edges advance the walk; stored-only children
            // whose parentId points elsewhere are ranked via their own chain.
            if visited[child]
                || members[child].parent_id.as_deref() != Some(members[position].id.as_str())
            {
                continue;
            }

            if resolved[child].is_none() {
                resolved[child] = Some(rank + 1);
            }
            visited[child] = true;
            queue.push_back(child);
        }
    }

    for (position, member) in members.iter_mut().enumerate() {
        member.generation = resolved[position]
            .or_else(|| Some(member.relation_kind.fallback_generation()));
    }
}

fn pair_spouses(members: &mut [FamilyMember]) {
    for position in 0..members.len() {
        if members[position].spouse_id.is_some() {
            continue;
        }
        let Some(wanted) = members[position].relation_kind.spouse_complement() else {
            continue;
        };

        // First match wins; array order decides ties between candidates.
        let found = members
            .iter()
            .enumerate()
            .find(|(other, candidate)| *other != position && candidate.relation_kind == wanted)
            .map(|(_, candidate)| candidate.id.clone());
        members[position].spouse_id = found;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::member::RelationKind;

    fn member(id: &str, relation: &str) -> FamilyMember {
        FamilyMember {
            id: id.to_owned(),
            name: id.to_owned(),
            first_name: id.to_owned(),
            last_name: String::new(),
            relation: relation.to_owned(),
            relation_kind: RelationKind::from_label(relation),
            email: format!("{id}@example.com"),
            phone: None,
            photo_url: None,
            generation: None,
            parent_id: None,
            spouse_id: None,
            children: Vec::new(),
            position: None,
            role: None,
        }
    }

    #[test]
    fn label_fallback_generations_are_deterministic() {
        let members = populate(vec![
            member("a", "Grandmother"),
            member("b", "Son"),
            member("c", "Quantum Plumber"),
        ]);

        assert_eq!(members[0].generation, Some(0));
        assert_eq!(members[1].generation, Some(2));
        assert_eq!(members[2].generation, Some(1));
    }

    #[test]
    fn parent_chain_outranks_the_label_table() {
        let mut root = member("root", "Grandfather");
        root.children = vec!["kid".to_owned()];
        let mut kid = member("kid", "Uncle");
        kid.parent_id = Some("root".to_owned());
        let mut grandkid = member("grandkid", "Uncle");
        grandkid.parent_id = Some("kid".to_owned());

        let members = populate(vec![root, kid, grandkid]);

        assert_eq!(members[0].generation, Some(0));
        // "Uncle" alone would be rank 2; the resolvable chain wins.
        assert_eq!(members[1].generation, Some(1));
        assert_eq!(members[2].generation, Some(2));
    }

    #[test]
    fn stored_generation_is_never_overwritten() {
        let mut kid = member("kid", "Son");
        kid.parent_id = Some("root".to_owned());
        kid.generation = Some(7);
        let members = populate(vec![member("root", "Father"), kid]);

        assert_eq!(members[1].generation, Some(7));
    }

    #[test]
    fn parent_cycles_fall_back_to_labels_without_hanging() {
        let mut a = member("a", "Brother");
        a.parent_id = Some("b".to_owned());
        let mut b = member("b", "Sister");
        b.parent_id = Some("a".to_owned());

        let members = populate(vec![a, b]);

        assert_eq!(members[0].generation, Some(2));
        assert_eq!(members[1].generation, Some(2));
    }

    #[test]
    fn children_union_deduplicates_stored_and_derived() {
        let mut parent = member("p", "Father");
        parent.children = vec!["c1".to_owned(), "c2".to_owned()];
        let mut c1 = member("c1", "Son");
        c1.parent_id = Some("p".to_owned());
        let mut c3 = member("c3", "Daughter");
        c3.parent_id = Some("p".to_owned());

        let members = populate(vec![parent, c1, member("c2", "Son"), c3]);

        assert_eq!(members[0].children, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn complementary_labels_pair_spouses_in_array_order() {
        let members = populate(vec![
            member("h", "Husband"),
            member("w1", "Wife"),
            member("w2", "Wife"),
        ]);

        assert_eq!(members[0].spouse_id.as_deref(), Some("w1"));
        assert_eq!(members[1].spouse_id.as_deref(), Some("h"));
        // The ambiguity on >2 candidates is resolved by array order only.
        assert_eq!(members[2].spouse_id.as_deref(), Some("h"));
    }

    #[test]
    fn stored_spouse_links_are_kept_and_non_pair_labels_stay_unlinked() {
        let mut wife = member("w", "Wife");
        wife.spouse_id = Some("elsewhere".to_owned());
        let members = populate(vec![wife, member("h", "Husband"), member("c", "Cousin")]);

        assert_eq!(members[0].spouse_id.as_deref(), Some("elsewhere"));
        assert_eq!(members[1].spouse_id.as_deref(), Some("w"));
        assert_eq!(members[2].spouse_id, None);
    }
}
