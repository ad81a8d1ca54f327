use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use navedit_core::dragdrop::{DragPhase, DropPosition};
use navedit_core::navigation::{
    FooterData, FooterLink, FooterLinkGroup, HeaderData, HeaderLink, LayoutConfig, LayoutType,
    NavigationNode, NodeDraft,
};
use navedit_core::storage::{NavigationStorageData, STORAGE_KEY};
use navedit_core::store::{FooterKey, NavigationState, NodeUpdate};
use navedit_events::{event_types, EditorEvent, EventBus};
use navedit_persistence::{LocalStore, MemoryStore, RemoteError, RemoteStore};
use navedit_session::{EditingSession, SessionStores};
use tokio::sync::broadcast;

const DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Default)]
struct MockRemote {
    stored: Mutex<Option<NavigationStorageData>>,
}

#[async_trait]
impl RemoteStore for MockRemote {
    fn name(&self) -> &str {
        "mock"
    }

    async fn load(&self) -> Result<Option<NavigationStorageData>, RemoteError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, data: &NavigationStorageData) -> Result<(), RemoteError> {
        *self.stored.lock().unwrap() = Some(data.clone());
        Ok(())
    }
}

fn initial_state() -> NavigationState {
    let header = HeaderData {
        links: vec![
            HeaderLink::new("Home", "/"),
            HeaderLink::group(
                "Services",
                vec![
                    HeaderLink::new("Pricing", "/pricing"),
                    HeaderLink::new("Projects", "/projects"),
                ],
            ),
            HeaderLink::new("About", "/about"),
        ],
        actions: vec![],
    };
    let footer = FooterData {
        links: vec![FooterLinkGroup {
            title: "Product".into(),
            links: vec![FooterLink::new("Features", "#")],
        }],
        ..Default::default()
    };
    NavigationState::new(&header, footer, LayoutConfig::default())
}

struct Harness {
    session: EditingSession,
    local: Arc<MemoryStore>,
    remote: Arc<MockRemote>,
    events: broadcast::Receiver<EditorEvent>,
}

fn harness() -> Harness {
    let local = Arc::new(MemoryStore::new());
    let remote = Arc::new(MockRemote::default());
    let bus = Arc::new(EventBus::default());
    let events = bus.subscribe();
    let stores = SessionStores {
        local: local.clone(),
        remote: Some(remote.clone()),
        debounce: DEBOUNCE,
    };
    Harness {
        session: EditingSession::new(initial_state(), stores, bus),
        local,
        remote,
        events,
    }
}

fn id_of(session: &EditingSession, text: &str) -> String {
    fn walk(nodes: &[NavigationNode], text: &str) -> Option<String> {
        nodes.iter().find_map(|n| {
            if n.text == text {
                Some(n.id.clone())
            } else {
                walk(n.child_nodes(), text)
            }
        })
    }
    walk(session.header_tree(), text).unwrap()
}

fn root_texts(session: &EditingSession) -> Vec<String> {
    session.header_tree().iter().map(|n| n.text.clone()).collect()
}

fn drain(events: &mut broadcast::Receiver<EditorEvent>) -> Vec<String> {
    let mut types = Vec::new();
    while let Ok(event) = events.try_recv() {
        types.push(event.event_type);
    }
    types
}

#[tokio::test(start_paused = true)]
async fn drag_and_drop_moves_header_link() {
    let mut h = harness();
    let home = id_of(&h.session, "Home");
    let about = id_of(&h.session, "About");

    assert!(h.session.start_drag(&home));
    assert!(h.session.state().drag_state.is_dragging);
    assert!(h.session.update_drop_target(&about, DropPosition::After));
    assert_eq!(h.session.drag_phase(), DragPhase::DraggingWithTarget);
    assert_eq!(h.session.state().drag_state.drop_target_id.as_deref(), Some(about.as_str()));

    let result = h.session.complete_drop();
    assert!(result.success);
    assert_eq!(root_texts(&h.session), ["Services", "About", "Home"]);
    assert!(h.session.state().is_dirty);
    assert!(!h.session.state().drag_state.is_dragging);
    assert_eq!(h.session.drag_phase(), DragPhase::Idle);

    assert_eq!(
        drain(&mut h.events),
        [
            event_types::DRAG_STARTED,
            event_types::DRAG_TARGET_CHANGED,
            event_types::DRAG_COMPLETED
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn invalid_target_does_not_stick() {
    let mut h = harness();
    let services = id_of(&h.session, "Services");
    let pricing = id_of(&h.session, "Pricing");

    assert!(h.session.start_drag(&services));
    assert!(!h.session.update_drop_target(&pricing, DropPosition::Child));
    assert!(h.session.state().drag_state.drop_target_id.is_none());
    assert_eq!(h.session.drag_phase(), DragPhase::Dragging);

    let result = h.session.complete_drop();
    assert!(!result.success);
    assert_eq!(root_texts(&h.session), ["Home", "Services", "About"]);
    assert!(!h.session.state().is_dirty);
}

#[tokio::test(start_paused = true)]
async fn second_drag_is_rejected_and_cancel_restores() {
    let mut h = harness();
    let home = id_of(&h.session, "Home");
    let about = id_of(&h.session, "About");
    let before = h.session.header_tree().to_vec();

    assert!(h.session.start_drag(&home));
    assert!(!h.session.start_drag(&about));
    h.session.update_drop_target(&about, DropPosition::After);
    h.session.cancel_drag();

    assert_eq!(h.session.header_tree(), before.as_slice());
    assert!(!h.session.state().drag_state.is_dragging);
    assert!(drain(&mut h.events).contains(&event_types::DRAG_CANCELLED.to_string()));
}

#[tokio::test(start_paused = true)]
async fn header_edits_respect_depth_limit() {
    let mut h = harness();
    let services = id_of(&h.session, "Services");
    let pricing = id_of(&h.session, "Pricing");

    let id = h
        .session
        .add_header_node(Some(&services), NavigationNode::new("", "Docs", "/docs"))
        .unwrap();
    assert!(!id.is_empty());
    assert_eq!(h.session.header_tree()[1].child_nodes().len(), 3);

    assert!(!h.session.can_add_child(&pricing));
    assert!(h
        .session
        .add_header_node(Some(&pricing), NavigationNode::new("", "Deep", "/deep"))
        .is_none());

    assert!(h.session.update_header_node(&id, NodeUpdate::text("Documentation")));
    assert!(h.session.delete_header_node(&services));
    assert_eq!(root_texts(&h.session), ["Home", "About"]);
    assert!(!h.session.delete_header_node("missing"));
    assert!(h.session.validate_tree().valid);
}

#[tokio::test(start_paused = true)]
async fn footer_edits_use_positional_keys() {
    let mut h = harness();

    assert!(h.session.add_footer_group("Company"));
    assert!(h.session.add_footer_link(1, FooterLink::new("About", "/about")));
    assert!(!h.session.add_footer_link(7, FooterLink::new("Nope", "/")));
    assert!(h
        .session
        .update_footer_entry(FooterKey::Link { group: 1, link: 0 }, NodeUpdate::href("/company")));
    assert!(h.session.delete_footer_entry(FooterKey::Group(0)));

    let footer = &h.session.state().footer_data;
    assert_eq!(footer.links.len(), 1);
    assert_eq!(footer.links[0].title, "Company");
    assert_eq!(footer.links[0].links[0].href, "/company");
}

#[tokio::test(start_paused = true)]
async fn edits_auto_save_once_after_debounce() {
    let mut h = harness();
    let home = id_of(&h.session, "Home");

    for text in ["H", "Ho", "Hom", "Home page"] {
        h.session.update_header_node(&home, NodeUpdate::text(text));
    }
    assert!(h.session.has_pending_save());
    assert!(h.local.get(STORAGE_KEY).unwrap().is_none());

    tokio::time::sleep(DEBOUNCE + Duration::from_millis(1)).await;
    let stored: NavigationStorageData =
        serde_json::from_str(&h.local.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.header_data.links[0].text, "Home page");
    assert_eq!(drain(&mut h.events), [event_types::NAVIGATION_SAVED]);

    assert!(h.session.state().is_dirty);
    assert!(h.session.acknowledge_saves());
    assert!(!h.session.state().is_dirty);
}

#[tokio::test(start_paused = true)]
async fn drag_projection_does_not_trigger_auto_save() {
    let mut h = harness();
    let home = id_of(&h.session, "Home");
    h.session.start_drag(&home);
    h.session.cancel_drag();
    assert!(!h.session.has_pending_save());
}

#[tokio::test]
async fn save_to_server_writes_both_and_clears_dirty() {
    let mut h = harness();
    h.session.set_layout(LayoutConfig {
        layout_type: LayoutType::Docs,
        ..Default::default()
    });
    assert!(h.session.state().is_dirty);

    let result = h.session.save_to_server().await;
    assert!(result.success && result.local && result.remote);
    assert!(!h.session.state().is_dirty);
    assert!(h.session.state().last_saved.is_some());
    assert!(!h.session.has_pending_save());

    let remote = h.remote.stored.lock().unwrap().clone().unwrap();
    assert_eq!(remote.layout.layout_type, LayoutType::Docs);
}

#[tokio::test]
async fn save_immediately_skips_remote() {
    let mut h = harness();
    h.session.set_footer_data(FooterData::default());

    let result = h.session.save_immediately();
    assert!(result.success);
    assert!(!result.remote);
    assert!(h.remote.stored.lock().unwrap().is_none());
    assert!(h.local.get(STORAGE_KEY).unwrap().is_some());
}

#[tokio::test]
async fn load_hydrates_clean_state() {
    let mut h = harness();
    let stored = {
        let header = HeaderData {
            links: vec![HeaderLink::new("Blog", "/blog")],
            actions: vec![],
        };
        let state = NavigationState::new(&header, FooterData::default(), LayoutConfig::default());
        NavigationStorageData::from_state(&state)
    };
    *h.remote.stored.lock().unwrap() = Some(stored.clone());

    assert!(h.session.load().await);
    assert_eq!(root_texts(&h.session), ["Blog"]);
    assert!(!h.session.state().is_dirty);
    assert_eq!(h.session.state().last_saved, Some(stored.last_updated));
    assert!(!h.session.has_pending_save());
    assert_eq!(drain(&mut h.events), [event_types::NAVIGATION_LOADED]);

    // the drag manager follows the loaded tree
    let blog = id_of(&h.session, "Blog");
    assert!(h.session.start_drag(&blog));
}

#[tokio::test(start_paused = true)]
async fn load_drops_auto_save_of_replaced_content() {
    let mut h = harness();
    h.session.set_layout(LayoutConfig {
        layout_type: LayoutType::Blog,
        ..Default::default()
    });
    assert!(h.session.has_pending_save());

    let header = HeaderData {
        links: vec![HeaderLink::new("Blog", "/blog")],
        actions: vec![],
    };
    let state = NavigationState::new(&header, FooterData::default(), LayoutConfig::default());
    *h.remote.stored.lock().unwrap() = Some(NavigationStorageData::from_state(&state));

    assert!(h.session.load().await);
    assert!(!h.session.has_pending_save());

    tokio::time::sleep(DEBOUNCE * 2).await;
    let stored: NavigationStorageData =
        serde_json::from_str(&h.local.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.header_data, header);
    assert_eq!(stored.layout, LayoutConfig::default());
    assert!(!h.session.state().is_dirty);
}

#[tokio::test]
async fn load_with_nothing_stored_keeps_state() {
    let mut h = harness();
    assert!(!h.session.load().await);
    assert_eq!(root_texts(&h.session), ["Home", "Services", "About"]);
}

#[tokio::test]
async fn exports_reflect_current_state() {
    let mut h = harness();
    let home = id_of(&h.session, "Home");
    h.session.update_header_node(&home, NodeUpdate::href("/blog"));

    let ts = h.session.export_to_typescript();
    assert!(ts.contains("href: getBlogPermalink(),"));
    assert!(ts.contains("href: getPermalink('/pricing'),"));

    let json: serde_json::Value = serde_json::from_str(&h.session.export_to_json()).unwrap();
    assert_eq!(json["headerData"]["links"][0]["href"], "/blog");
    assert!(json["headerData"]["links"][0].get("id").is_none());
    assert_eq!(json["footerData"]["links"][0]["title"], "Product");
}

#[tokio::test]
async fn header_tree_with_group_is_valid() {
    let mut h = harness();
    assert!(h.session.header_tree()[1].href.is_empty());
    assert!(h.session.validate_tree().valid);

    let about = id_of(&h.session, "About");
    h.session.update_header_node(&about, NodeUpdate::href(""));
    let report = h.session.validate_tree();
    let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, ["2.href"]);
}

#[tokio::test]
async fn validation_helpers_report_fields() {
    let h = harness();
    let report = h.session.validate_node(&NodeDraft::new("", "/"));
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].field, "text");

    let group = NodeDraft {
        has_nested_links: true,
        ..NodeDraft::new("Pages", "")
    };
    assert!(h.session.validate_header_link(&group).valid);
    assert!(!h.session.validate_node(&group).valid);
}

#[tokio::test(start_paused = true)]
async fn close_drops_pending_auto_save() {
    let mut h = harness();
    h.session.set_layout(LayoutConfig {
        header_visible: false,
        ..Default::default()
    });
    let Harness { session, local, .. } = h;
    session.close();

    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_matches!(local.get(STORAGE_KEY), Ok(None));
}
