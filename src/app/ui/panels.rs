use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use eframe::egui::{self, Align, Context, Layout};

use crate::family::{FamilyMember, FamilyTree};
use crate::layout::LayoutMode;

use super::super::camera::{Camera, Inertia};
use super::super::connect::ConnectMode;
use super::super::{ViewModel, WriteOp};

fn session_seed() -> u64 {
    let mut hasher = DefaultHasher::new();
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or(0x5eed)
        .hash(&mut hasher);
    hasher.finish()
}

impl ViewModel {
    pub(in crate::app) fn new(family: String, members: Vec<FamilyMember>) -> Self {
        let mut model = Self {
            family,
            tree: FamilyTree::default(),
            cards: Vec::new(),
            card_index: HashMap::new(),
            edges: Vec::new(),
            layout_mode: LayoutMode::Auto,
            session_seed: session_seed(),
            camera: Camera::default(),
            inertia: Inertia::default(),
            panning: false,
            member_drag: None,
            connect: ConnectMode::Idle,
            selected: None,
            search: String::new(),
            form: None,
            confirm_delete: None,
            notice: None,
        };
        model.apply_snapshot(members);
        model
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        ops: &mut Vec<WriteOp>,
        refresh_requested: &mut bool,
    ) {
        let now = ctx.input(|input| input.time);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("kintree");
                    ui.separator();
                    ui.label(format!("family: {}", self.family));
                    ui.label(format!("members: {}", self.tree.len()));
                    ui.label(format!("links: {}", self.edges.len()));
                    ui.label(format!("layout: {}", self.layout_mode.label()));
                    let refresh_button = ui
                        .button("Refresh")
                        .on_hover_text("Fetch the member list now instead of waiting for the poll.");
                    if refresh_button.clicked() {
                        *refresh_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(notice) = self.active_notice(now) {
                            ui.label(notice.to_owned());
                        }
                    });
                });
            });

        egui::SidePanel::left("members")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_member_panel(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui, ops));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_tree(ui, ops));

        self.draw_member_form(ctx, ops);
    }
}
