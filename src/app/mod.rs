use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context, Vec2};

use crate::family::{BackendCall, BackendClient, FamilyMember, FamilyTree, Position, RelationKind, wire};
use crate::layout::LayoutMode;
use crate::util::display_name;

mod camera;
mod connect;
mod edges;
mod tree;
mod ui;

use camera::{Camera, Inertia};
use connect::{ConnectMode, LinkKind, LinkRequest};
use edges::Edge;
use ui::forms::MemberForm;

type FetchResult = Result<Vec<FamilyMember>, String>;

pub struct AppConfig {
    pub backend_url: String,
    pub family: String,
    pub poll_interval: Duration,
}

pub struct KinTreeApp {
    client: BackendClient,
    family: String,
    state: AppState,
    poll_rx: Receiver<FetchResult>,
    refresh_rx: Option<Receiver<FetchResult>>,
    write_tx: Sender<WriteOutcome>,
    write_rx: Receiver<WriteOutcome>,
}

enum AppState {
    Loading,
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    family: String,
    tree: FamilyTree,
    cards: Vec<Card>,
    card_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    layout_mode: LayoutMode,
    session_seed: u64,
    camera: Camera,
    inertia: Inertia,
    panning: bool,
    member_drag: Option<MemberDrag>,
    connect: ConnectMode,
    selected: Option<String>,
    search: String,
    form: Option<MemberForm>,
    confirm_delete: Option<String>,
    notice: Option<Notice>,
}

struct Card {
    id: String,
    world_pos: Vec2,
}

struct MemberDrag {
    id: String,
    grab_offset: Vec2,
}

struct Notice {
    text: String,
    expires_at: f64,
}

/// A user-initiated mutation, executed call-by-call on a worker thread.
/// Calls run sequentially with no transaction; a trailing-call failure
/// leaves the backend partially updated and is reconciled by the next
/// refresh.
struct WriteOp {
    description: String,
    calls: Vec<BackendCall>,
    notice_on_success: Option<String>,
    notice_on_failure: bool,
}

struct WriteOutcome {
    description: String,
    result: Result<(), String>,
    notice_on_success: Option<String>,
    notice_on_failure: bool,
}

/// Identity fields collected by the add/edit form. Relationship links and
/// positions are never edited here; those flow through connect mode and
/// drags.
struct MemberDraft {
    first_name: String,
    last_name: String,
    relation_kind: RelationKind,
    email: String,
    phone: Option<String>,
    photo_url: Option<String>,
    position: Option<Position>,
}

impl KinTreeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> anyhow::Result<Self> {
        let client = BackendClient::new(&config.backend_url, &config.family)?;
        let poll_rx = Self::spawn_poll(client.clone(), config.poll_interval);
        let (write_tx, write_rx) = mpsc::channel();

        Ok(Self {
            client,
            family: config.family,
            state: AppState::Loading,
            poll_rx,
            refresh_rx: None,
            write_tx,
            write_rx,
        })
    }

    /// Full-list refresh on a fixed timer for as long as the app runs. The
    /// loop ends once the receiver is dropped with the app.
    fn spawn_poll(client: BackendClient, interval: Duration) -> Receiver<FetchResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let result = client.list_members().map_err(|error| format!("{error:#}"));
                if tx.send(result).is_err() {
                    break;
                }
                thread::sleep(interval);
            }
        });

        rx
    }

    fn spawn_fetch(client: BackendClient) -> Receiver<FetchResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = client.list_members().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    /// Runs the op's calls in order on a worker thread. In-flight requests
    /// are never cancelled; a completion after the app has moved on just
    /// lands in the channel and is absorbed on a later frame.
    fn spawn_write(&self, op: WriteOp) {
        let client = self.client.clone();
        let tx = self.write_tx.clone();

        thread::spawn(move || {
            let mut result = Ok(());
            for call in &op.calls {
                if let Err(error) = client.execute(call) {
                    result = Err(format!("{error:#}"));
                    break;
                }
            }

            let _ = tx.send(WriteOutcome {
                description: op.description,
                result,
                notice_on_success: op.notice_on_success,
                notice_on_failure: op.notice_on_failure,
            });
        });
    }

    fn request_refresh(&mut self) {
        if self.refresh_rx.is_none() {
            self.refresh_rx = Some(Self::spawn_fetch(self.client.clone()));
        }
    }

    fn drain_write_outcomes(&mut self, now: f64) {
        let mut refresh = false;

        while let Ok(outcome) = self.write_rx.try_recv() {
            match outcome.result {
                Ok(()) => {
                    log::debug!("{} succeeded", outcome.description);
                    refresh = true;
                    if let (AppState::Ready(model), Some(text)) =
                        (&mut self.state, outcome.notice_on_success)
                    {
                        model.set_notice(text, now);
                    }
                }
                Err(error) => {
                    log::error!("{} failed: {error}", outcome.description);
                    if outcome.notice_on_failure
                        && let AppState::Ready(model) = &mut self.state
                    {
                        model.set_notice(format!("{} failed", outcome.description), now);
                    }
                }
            }
        }

        if refresh {
            self.request_refresh();
        }
    }

    fn apply_fetch(&mut self, result: FetchResult) {
        match result {
            Ok(members) => {
                if let AppState::Ready(model) = &mut self.state {
                    model.apply_snapshot(members);
                } else {
                    self.state =
                        AppState::Ready(Box::new(ViewModel::new(self.family.clone(), members)));
                }
            }
            Err(error) => {
                match &mut self.state {
                    // Background poll failures keep the last snapshot on
                    // screen; only the initial load surfaces an error page.
                    AppState::Ready(_) => {
                        log::warn!("background refresh failed: {error}");
                        return;
                    }
                    AppState::Error(previous) => {
                        *previous = error;
                        return;
                    }
                    AppState::Loading => {}
                }
                self.state = AppState::Error(error);
            }
        }
    }

    fn drain_fetches(&mut self) {
        if let Some(rx) = &self.refresh_rx {
            match rx.try_recv() {
                Ok(result) => {
                    self.refresh_rx = None;
                    self.apply_fetch(result);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.refresh_rx = None;
                    log::warn!("refresh worker disconnected");
                }
            }
        }

        while let Ok(result) = self.poll_rx.try_recv() {
            self.apply_fetch(result);
        }
    }
}

impl eframe::App for KinTreeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|input| input.time);
        self.drain_write_outcomes(now);
        self.drain_fetches();

        let mut ops = Vec::new();
        let mut refresh_requested = false;

        match &mut self.state {
            AppState::Loading => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading family tree...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the family tree");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        retry = true;
                    }
                });
                refresh_requested |= retry;
            }
            AppState::Ready(model) => {
                model.show(ctx, &mut ops, &mut refresh_requested);
            }
        }

        for op in ops {
            self.spawn_write(op);
        }
        if refresh_requested {
            self.request_refresh();
        }

        // Poll snapshots arrive while the app is idle; keep frames coming so
        // they are picked up without user input.
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl ViewModel {
    fn set_notice(&mut self, text: String, now: f64) {
        self.notice = Some(Notice {
            text,
            expires_at: now + 4.0,
        });
    }

    fn active_notice(&mut self, now: f64) -> Option<&str> {
        if let Some(notice) = &self.notice
            && notice.expires_at < now
        {
            self.notice = None;
        }
        self.notice.as_ref().map(|notice| notice.text.as_str())
    }

    fn persist_position_op(&self, id: &str, position: Position) -> WriteOp {
        WriteOp {
            description: format!("position update for {id}"),
            calls: vec![BackendCall::Patch {
                id: id.to_owned(),
                patch: wire::position_patch(position),
            }],
            notice_on_success: None,
            notice_on_failure: false,
        }
    }

    /// Child links are two partial updates (merge into `children`, then set
    /// `parentId`); spouse links set `spouseId` on both records so the edge
    /// is symmetric without relying on complementary relation labels.
    fn link_op(&self, request: &LinkRequest) -> Option<WriteOp> {
        let source = self.tree.get(&request.source)?;
        if !self.tree.contains(&request.target) {
            return None;
        }

        let (calls, success) = match request.kind {
            LinkKind::Child => {
                let mut children = source.children.clone();
                if !children.contains(&request.target) {
                    children.push(request.target.clone());
                }
                (
                    vec![
                        BackendCall::Patch {
                            id: request.source.clone(),
                            patch: wire::children_patch(&children),
                        },
                        BackendCall::Patch {
                            id: request.target.clone(),
                            patch: wire::parent_patch(&request.source),
                        },
                    ],
                    "Parent link saved",
                )
            }
            LinkKind::Spouse => (
                vec![
                    BackendCall::Patch {
                        id: request.source.clone(),
                        patch: wire::spouse_patch(&request.target),
                    },
                    BackendCall::Patch {
                        id: request.target.clone(),
                        patch: wire::spouse_patch(&request.source),
                    },
                ],
                "Spouse link saved",
            ),
        };

        Some(WriteOp {
            description: format!(
                "{} link {} -> {}",
                request.kind.verb(),
                request.source,
                request.target
            ),
            calls,
            notice_on_success: Some(success.to_owned()),
            notice_on_failure: false,
        })
    }

    fn insert_op(&self, draft: MemberDraft) -> WriteOp {
        let record = wire::MemberRecord {
            id: String::new(),
            name: Some(display_name(&draft.first_name, &draft.last_name)),
            first_name: Some(draft.first_name),
            last_name: Some(draft.last_name),
            relation: Some(draft.relation_kind.label().to_owned()),
            email: Some(draft.email),
            phone: draft.phone,
            photo_url: draft.photo_url,
            position: draft
                .position
                .map(|p| wire::WirePosition { x: p.x, y: p.y }),
            ..Default::default()
        };

        WriteOp {
            description: "add member".to_owned(),
            calls: vec![BackendCall::Insert(record)],
            notice_on_success: Some("Member added".to_owned()),
            notice_on_failure: true,
        }
    }

    /// Edit is a full-record overwrite: the current record with the form's
    /// identity fields replaced. Links and position ride along unchanged.
    fn update_op(&self, id: &str, draft: MemberDraft) -> Option<WriteOp> {
        let mut member = self.tree.get(id)?.clone();
        member.name = display_name(&draft.first_name, &draft.last_name);
        member.first_name = draft.first_name;
        member.last_name = draft.last_name;
        member.relation = draft.relation_kind.label().to_owned();
        member.relation_kind = draft.relation_kind;
        member.email = draft.email;
        member.phone = draft.phone;
        member.photo_url = draft.photo_url;

        Some(WriteOp {
            description: format!("update member {id}"),
            calls: vec![BackendCall::Update {
                id: id.to_owned(),
                record: wire::MemberRecord::from_member(&member),
            }],
            notice_on_success: Some("Member updated".to_owned()),
            notice_on_failure: true,
        })
    }

    fn delete_op(&self, id: &str) -> WriteOp {
        WriteOp {
            description: format!("delete member {id}"),
            calls: vec![BackendCall::Delete { id: id.to_owned() }],
            notice_on_success: Some("Member removed".to_owned()),
            notice_on_failure: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

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

    fn model(members: Vec<FamilyMember>) -> ViewModel {
        ViewModel::new("test-family".to_owned(), members)
    }

    fn request(source: &str, target: &str, kind: LinkKind) -> LinkRequest {
        LinkRequest {
            source: source.to_owned(),
            target: target.to_owned(),
            kind,
        }
    }

    fn patch(call: &BackendCall) -> (&str, &serde_json::Value) {
        match call {
            BackendCall::Patch { id, patch } => (id.as_str(), patch),
            other => panic!("expected a patch call, got {other:?}"),
        }
    }

    #[test]
    fn child_link_merges_children_and_sets_parent() {
        let model = model(vec![member("a"), member("b")]);
        let op = model
            .link_op(&request("a", "b", LinkKind::Child))
            .expect("link op");

        assert_eq!(op.calls.len(), 2);
        assert_eq!(patch(&op.calls[0]), ("a", &json!({ "children": ["b"] })));
        assert_eq!(patch(&op.calls[1]), ("b", &json!({ "parentId": "a" })));
    }

    #[test]
    fn child_link_does_not_duplicate_an_existing_child() {
        let mut a = member("a");
        a.children = vec!["b".to_owned()];
        let model = model(vec![a, member("b")]);

        let op = model
            .link_op(&request("a", "b", LinkKind::Child))
            .expect("link op");
        assert_eq!(patch(&op.calls[0]), ("a", &json!({ "children": ["b"] })));
    }

    #[test]
    fn spouse_link_writes_both_directions() {
        let model = model(vec![member("a"), member("b")]);
        let op = model
            .link_op(&request("a", "b", LinkKind::Spouse))
            .expect("link op");

        assert_eq!(op.calls.len(), 2);
        assert_eq!(patch(&op.calls[0]), ("a", &json!({ "spouseId": "b" })));
        assert_eq!(patch(&op.calls[1]), ("b", &json!({ "spouseId": "a" })));
    }

    #[test]
    fn links_to_unknown_members_are_dropped() {
        let model = model(vec![member("a")]);
        assert!(model.link_op(&request("a", "ghost", LinkKind::Child)).is_none());
        assert!(model.link_op(&request("ghost", "a", LinkKind::Spouse)).is_none());
    }

    #[test]
    fn position_persistence_patches_only_that_member() {
        let model = model(vec![member("a")]);
        let op = model.persist_position_op("a", Position { x: 150.0, y: 80.0 });

        assert_eq!(op.calls.len(), 1);
        assert_eq!(
            patch(&op.calls[0]),
            ("a", &json!({ "position": { "x": 150.0, "y": 80.0 } }))
        );
    }
}
