use crate::family::FamilyTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    ParentChild,
    Spouse,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Pure function of the member snapshot. One parent->child edge per entry in
/// the flat `children` lists (one level only, so parent cycles render without
/// recursing), and one spouse edge per pair, emitted only from the
/// lexicographically smaller id so symmetric links draw once.
pub fn collect_edges(tree: &FamilyTree) -> Vec<Edge> {
    let mut edges = Vec::new();

    for member in tree.members() {
        for child_id in &member.children {
            if child_id != &member.id && tree.contains(child_id) {
                edges.push(Edge {
                    from: member.id.clone(),
                    to: child_id.clone(),
                    kind: EdgeKind::ParentChild,
                });
            }
        }

        if let Some(spouse_id) = &member.spouse_id
            && member.id.as_str() < spouse_id.as_str()
            && tree.contains(spouse_id)
        {
            edges.push(Edge {
                from: member.id.clone(),
                to: spouse_id.clone(),
                kind: EdgeKind::Spouse,
            });
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::{FamilyMember, RelationKind};

    fn member(id: &str) -> FamilyMember {
        FamilyMember {
            id: id.to_owned(),
            name: id.to_owned(),
            first_name: id.to_owned(),
            last_name: String::new(),
            relation: String::new(),
            relation_kind: RelationKind::Other,
            email: format!("{id}@example.com"),
            phone: None,
            photo_url: None,
            generation: Some(1),
            parent_id: None,
            spouse_id: None,
            children: Vec::new(),
            position: None,
            role: None,
        }
    }

    fn spouse_edges(edges: &[Edge]) -> Vec<&Edge> {
        edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::Spouse)
            .collect()
    }

    #[test]
    fn symmetric_spouse_links_draw_exactly_one_edge() {
        let mut a = member("a");
        a.spouse_id = Some("b".to_owned());
        let mut b = member("b");
        b.spouse_id = Some("a".to_owned());

        let edges = collect_edges(&FamilyTree::from_members(vec![b, a]));
        let spouses = spouse_edges(&edges);

        assert_eq!(spouses.len(), 1);
        assert_eq!(spouses[0].from, "a");
        assert_eq!(spouses[0].to, "b");
    }

    #[test]
    fn parent_child_edges_follow_the_flat_children_list() {
        let mut parent = member("p");
        parent.children = vec!["c1".to_owned(), "c2".to_owned()];
        let edges = collect_edges(&FamilyTree::from_members(vec![
            parent,
            member("c1"),
            member("c2"),
        ]));

        let child_edges: Vec<_> = edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::ParentChild)
            .collect();
        assert_eq!(child_edges.len(), 2);
        assert!(child_edges.iter().all(|edge| edge.from == "p"));
    }

    #[test]
    fn dangling_targets_are_skipped() {
        let mut parent = member("p");
        parent.children = vec!["ghost".to_owned()];
        parent.spouse_id = Some("vanished".to_owned());

        let edges = collect_edges(&FamilyTree::from_members(vec![parent]));
        assert!(edges.is_empty());
    }

    #[test]
    fn parent_cycles_do_not_recurse() {
        let mut a = member("a");
        a.parent_id = Some("b".to_owned());
        let mut b = member("b");
        b.parent_id = Some("a".to_owned());

        // Derived children make a <-> b mutual parents; each contributes one
        // flat edge and collection terminates.
        let edges = collect_edges(&FamilyTree::from_members(vec![a, b]));
        let kinds: Vec<_> = edges.iter().filter(|e| e.kind == EdgeKind::ParentChild).collect();
        assert_eq!(kinds.len(), 2);
    }
}
