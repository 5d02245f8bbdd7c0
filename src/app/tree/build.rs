use eframe::egui::Vec2;

use crate::family::{FamilyMember, FamilyTree};
use crate::layout::{self, LayoutMode};

use super::super::edges::collect_edges;
use super::super::{Card, ViewModel};

impl ViewModel {
    /// Replace the cached snapshot wholesale and rebuild the card model.
    /// A poll landing mid-drag overwrites the dragged card's position too;
    /// the next pointer move re-derives it from the pointer.
    pub(in crate::app) fn apply_snapshot(&mut self, members: Vec<FamilyMember>) {
        self.tree = FamilyTree::from_members(members);

        if self
            .selected
            .as_deref()
            .is_some_and(|id| !self.tree.contains(id))
        {
            self.selected = None;
        }
        if self
            .connect
            .source()
            .is_some_and(|id| !self.tree.contains(id))
        {
            self.connect.cancel();
        }
        if self
            .member_drag
            .as_ref()
            .is_some_and(|drag| !self.tree.contains(&drag.id))
        {
            self.member_drag = None;
        }
        if self
            .confirm_delete
            .as_deref()
            .is_some_and(|id| !self.tree.contains(id))
        {
            self.confirm_delete = None;
        }

        self.rebuild_cards();
    }

    pub(in crate::app) fn rebuild_cards(&mut self) {
        let positions = match self.layout_mode {
            LayoutMode::Auto => layout::grid_layout(self.tree.members()),
            LayoutMode::Freestyle => {
                layout::freestyle_layout(self.tree.members(), self.session_seed)
            }
        };

        self.cards = self
            .tree
            .members()
            .iter()
            .map(|member| Card {
                id: member.id.clone(),
                world_pos: positions
                    .get(&member.id)
                    .copied()
                    .unwrap_or(Vec2::ZERO),
            })
            .collect();
        self.card_index = self
            .cards
            .iter()
            .enumerate()
            .map(|(index, card)| (card.id.clone(), index))
            .collect();
        self.edges = collect_edges(&self.tree);
    }

    /// Mode switches relayout in memory only; nothing is persisted until a
    /// Freestyle drag ends.
    pub(in crate::app) fn switch_layout_mode(&mut self) {
        self.member_drag = None;
        self.rebuild_cards();
    }

    pub(in crate::app) fn select_and_focus(&mut self, id: &str) {
        self.selected = Some(id.to_owned());
        if let Some(&index) = self.card_index.get(id) {
            self.camera.focus_on(self.cards[index].world_pos);
        }
    }
}
