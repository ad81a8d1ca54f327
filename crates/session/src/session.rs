use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use navedit_core::dragdrop::{tree, DragDropManager, DragPhase, DropPosition, TreeUpdateResult};
use navedit_core::navigation::{
    FooterData, FooterLink, HeaderData, LayoutConfig, NavigationNode, NodeDraft,
};
use navedit_core::store::{
    reduce, FooterKey, NavTarget, NavigationAction, NavigationState, NodeUpdate,
};
use navedit_core::types::{new_node_id, NodeId, Timestamp};
use navedit_core::validation::{self, ValidationReport, DEFAULT_MAX_DEPTH};
use navedit_core::{codegen, serializer};
use navedit_events::{event_types, EditorEvent, EventBus};
use navedit_persistence::{
    remote_from_config, FileStore, LocalStore, NavigationPersistence, PersistenceCallbacks,
    PersistenceConfig, RemoteStore, SaveResult,
};
use tokio::sync::broadcast;

/// Where a session persists to.
pub struct SessionStores {
    pub local: Arc<dyn LocalStore>,
    pub remote: Option<Arc<dyn RemoteStore>>,
    pub debounce: Duration,
}

impl SessionStores {
    /// File-backed local store plus the configured remote.
    pub fn from_config(config: &PersistenceConfig) -> Self {
        Self {
            local: Arc::new(FileStore::new(&config.storage_dir)),
            remote: remote_from_config(config),
            debounce: config.debounce,
        }
    }
}

/// One editor's view of the navigation.
///
/// All state changes go through [`reduce`]; content edits schedule a
/// debounced auto-save. The drag manager owns drag state and the store's
/// `drag_state` mirrors it.
pub struct EditingSession {
    state: Arc<NavigationState>,
    drag: DragDropManager,
    persistence: NavigationPersistence,
    events: Arc<EventBus>,
    max_depth: usize,
    /// Time of the last content edit.
    last_edit_at: Option<Timestamp>,
    /// `lastUpdated` of the most recent completed local save, set from the
    /// persistence callback.
    last_saved_stamp: Arc<Mutex<Option<Timestamp>>>,
}

impl EditingSession {
    pub fn new(initial: NavigationState, stores: SessionStores, events: Arc<EventBus>) -> Self {
        let last_saved_stamp: Arc<Mutex<Option<Timestamp>>> = Arc::default();

        let callbacks = {
            let saved_events = Arc::clone(&events);
            let failed_events = Arc::clone(&events);
            let stamp = Arc::clone(&last_saved_stamp);
            PersistenceCallbacks::default()
                .on_save(move |data| {
                    *stamp.lock().unwrap_or_else(PoisonError::into_inner) = Some(data.last_updated);
                    saved_events.publish(
                        EditorEvent::new(event_types::NAVIGATION_SAVED)
                            .with_payload(serde_json::json!({ "lastUpdated": data.last_updated })),
                    );
                })
                .on_error(move |e| failed_events.publish(EditorEvent::save_failed(&e.to_string())))
        };
        let persistence =
            NavigationPersistence::new(stores.local, stores.remote, stores.debounce, callbacks);

        Self {
            drag: DragDropManager::new(initial.header.links.clone(), DEFAULT_MAX_DEPTH),
            state: Arc::new(initial),
            persistence,
            events,
            max_depth: DEFAULT_MAX_DEPTH,
            last_edit_at: None,
            last_saved_stamp,
        }
    }

    pub fn from_config(
        config: &PersistenceConfig,
        initial: NavigationState,
        events: Arc<EventBus>,
    ) -> Self {
        Self::new(initial, SessionStores::from_config(config), events)
    }

    /// Use a depth limit other than [`DEFAULT_MAX_DEPTH`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self.drag = DragDropManager::new(self.state.header.links.clone(), max_depth);
        self
    }

    // ---- accessors ----

    pub fn state(&self) -> &Arc<NavigationState> {
        &self.state
    }

    pub fn header_tree(&self) -> &[NavigationNode] {
        &self.state.header.links
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.events.subscribe()
    }

    pub fn has_pending_save(&self) -> bool {
        self.persistence.has_pending()
    }

    /// Apply `action`. Returns whether the state changed.
    fn dispatch(&mut self, action: NavigationAction) -> bool {
        let is_edit = action.is_edit();
        let next = reduce(&self.state, action);
        if Arc::ptr_eq(&next, &self.state) {
            return false;
        }
        self.state = next;
        if is_edit {
            self.last_edit_at = Some(Utc::now());
            self.persistence.auto_save(&self.state);
        }
        true
    }

    // ---- content edits ----

    pub fn set_header_data(&mut self, data: HeaderData) {
        self.dispatch(NavigationAction::SetHeaderData(data));
    }

    pub fn set_footer_data(&mut self, data: FooterData) {
        self.dispatch(NavigationAction::SetFooterData(data));
    }

    pub fn set_layout(&mut self, layout: LayoutConfig) {
        self.dispatch(NavigationAction::SetLayout(layout));
    }

    /// Add a header link under `parent_id` (root when `None`).
    ///
    /// Returns the new node's id, or `None` when the parent is unknown or
    /// already at the depth limit.
    pub fn add_header_node(
        &mut self,
        parent_id: Option<&str>,
        mut node: NavigationNode,
    ) -> Option<NodeId> {
        if let Some(parent) = parent_id {
            if !self.can_add_child(parent) {
                tracing::debug!(parent, "Header parent is at the depth limit");
                return None;
            }
        }
        if node.id.trim().is_empty() {
            node.id = new_node_id();
        }
        let id = node.id.clone();
        let added = self.dispatch(NavigationAction::AddNode {
            parent_id: parent_id.map(str::to_string),
            node,
            target: NavTarget::Header,
        });
        added.then_some(id)
    }

    pub fn update_header_node(&mut self, node_id: &str, updates: NodeUpdate) -> bool {
        self.dispatch(NavigationAction::UpdateNode {
            node_id: node_id.to_string(),
            updates,
            target: NavTarget::Header,
        })
    }

    /// Delete a header link and its nested links.
    pub fn delete_header_node(&mut self, node_id: &str) -> bool {
        self.dispatch(NavigationAction::DeleteNode {
            node_id: node_id.to_string(),
            target: NavTarget::Header,
        })
    }

    pub fn add_footer_group(&mut self, title: &str) -> bool {
        self.dispatch(NavigationAction::AddNode {
            parent_id: None,
            node: NavigationNode::new("", title, ""),
            target: NavTarget::Footer,
        })
    }

    pub fn add_footer_link(&mut self, group: usize, link: FooterLink) -> bool {
        self.dispatch(NavigationAction::AddNode {
            parent_id: Some(group.to_string()),
            node: NavigationNode::new("", link.text, link.href),
            target: NavTarget::Footer,
        })
    }

    /// Rename a group (`FooterKey::Group`) or edit a link.
    pub fn update_footer_entry(&mut self, key: FooterKey, updates: NodeUpdate) -> bool {
        self.dispatch(NavigationAction::UpdateNode {
            node_id: key.to_string(),
            updates,
            target: NavTarget::Footer,
        })
    }

    pub fn delete_footer_entry(&mut self, key: FooterKey) -> bool {
        self.dispatch(NavigationAction::DeleteNode {
            node_id: key.to_string(),
            target: NavTarget::Footer,
        })
    }

    // ---- drag and drop ----

    /// Begin dragging a header link. Rejected for unknown ids and while
    /// another drag is active.
    pub fn start_drag(&mut self, node_id: &str) -> bool {
        if !self.drag.is_dragging() {
            self.drag.replace_tree(self.state.header.links.clone());
        }
        if !self.drag.start_drag(node_id) {
            return false;
        }
        self.dispatch(NavigationAction::StartDrag {
            node_id: node_id.to_string(),
        });
        self.events
            .publish(EditorEvent::new(event_types::DRAG_STARTED).with_node(node_id));
        true
    }

    /// Hover over `target_id`. An invalid target clears the current target.
    pub fn update_drop_target(&mut self, target_id: &str, position: DropPosition) -> bool {
        if !self.drag.is_dragging() {
            return false;
        }
        let accepted = self.drag.update_drop_target(target_id, position);
        self.project_drag_target();
        accepted
    }

    pub fn clear_drop_target(&mut self) {
        if self.drag.is_dragging() {
            self.drag.clear_drop_target();
            self.project_drag_target();
        }
    }

    fn project_drag_target(&mut self) {
        let drag = self.drag.drag_state().clone();
        let changed = self.dispatch(NavigationAction::UpdateDropTarget {
            target_id: drag.drop_target_id.clone(),
            position: drag.drop_position,
        });
        if changed {
            if let Some(node_id) = drag.dragged_node_id.as_deref() {
                self.events.publish(EditorEvent::drag_target_changed(
                    node_id,
                    drag.drop_target_id.as_deref(),
                    drag.drop_position,
                ));
            }
        }
    }

    /// Commit the drag. Without a valid target this cancels and reports
    /// `success: false`.
    pub fn complete_drop(&mut self) -> TreeUpdateResult {
        let dragged = self.drag.drag_state().dragged_node_id.clone();
        let result = self.drag.complete_drop();
        self.dispatch(NavigationAction::EndDrag);

        if result.success {
            self.dispatch(NavigationAction::MoveNode(result.clone()));
            self.events.publish(
                EditorEvent::new(event_types::DRAG_COMPLETED)
                    .with_node(result.moved_node_id.clone().unwrap_or_default())
                    .with_payload(serde_json::json!({
                        "newParentId": result.new_parent_id,
                        "newIndex": result.new_index,
                    })),
            );
        } else if let Some(node_id) = dragged {
            self.events
                .publish(EditorEvent::new(event_types::DRAG_CANCELLED).with_node(node_id));
        }
        result
    }

    /// Abandon the drag, restoring the tree as it was at `start_drag`.
    pub fn cancel_drag(&mut self) {
        let Some(node_id) = self.drag.drag_state().dragged_node_id.clone() else {
            return;
        };
        self.drag.cancel_drag();
        self.dispatch(NavigationAction::EndDrag);
        self.events
            .publish(EditorEvent::new(event_types::DRAG_CANCELLED).with_node(node_id));
    }

    pub fn is_valid_drop(&self, source_id: &str, target_id: &str, position: DropPosition) -> bool {
        tree::is_valid_drop(
            &self.state.header.links,
            source_id,
            target_id,
            position,
            self.max_depth,
        )
    }

    // ---- validation ----

    pub fn validate_node(&self, draft: &NodeDraft) -> ValidationReport {
        validation::validate_node(draft)
    }

    /// Like [`validate_node`](Self::validate_node), but a link with nested
    /// links may omit its href.
    pub fn validate_header_link(&self, draft: &NodeDraft) -> ValidationReport {
        validation::validate_header_link(draft)
    }

    pub fn can_add_child(&self, parent_id: &str) -> bool {
        validation::can_add_child(&self.state.header.links, parent_id, self.max_depth)
    }

    pub fn validate_tree(&self) -> ValidationReport {
        validation::validate_header_tree(&self.state.header.links, self.max_depth)
    }

    // ---- persistence ----

    /// Flush pending edits, then save locally and remotely. Clears the dirty
    /// flag when the local copy was written.
    pub async fn save_to_server(&mut self) -> SaveResult {
        let result = self.persistence.save_to_server(&self.state).await;
        if result.success {
            self.dispatch(NavigationAction::mark_saved_now());
        }
        result
    }

    /// Save locally now, skipping the remote.
    pub fn save_immediately(&mut self) -> SaveResult {
        let result = self.persistence.save_immediately(&self.state);
        if result.success {
            self.dispatch(NavigationAction::mark_saved_now());
        }
        result
    }

    /// Clear the dirty flag if a completed auto-save covers the latest edit.
    ///
    /// Auto-saves finish on the timer, outside any session call, so the UI
    /// calls this when it receives a `navigation.saved` event.
    pub fn acknowledge_saves(&mut self) -> bool {
        let stamp = self
            .last_saved_stamp
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match (stamp, self.last_edit_at) {
            (Some(saved_at), Some(edited_at)) if self.state.is_dirty && saved_at >= edited_at => {
                self.dispatch(NavigationAction::MarkSaved { saved_at })
            }
            _ => false,
        }
    }

    /// Replace the session content with the newest stored copy.
    ///
    /// Returns whether anything was found. An active drag is cancelled and
    /// a pending auto-save of the replaced content is dropped.
    pub async fn load(&mut self) -> bool {
        let Some(data) = self.persistence.load().await else {
            tracing::debug!("No stored navigation found");
            return false;
        };
        self.cancel_drag();
        if self.persistence.cancel_pending() {
            tracing::debug!("Dropped pending auto-save superseded by load");
        }

        let last_updated = data.last_updated;
        self.dispatch(NavigationAction::Hydrate(data));
        self.last_edit_at = None;
        self.drag.replace_tree(self.state.header.links.clone());
        self.events.publish(
            EditorEvent::new(event_types::NAVIGATION_LOADED)
                .with_payload(serde_json::json!({ "lastUpdated": last_updated })),
        );
        true
    }

    // ---- export ----

    pub fn export_to_typescript(&self) -> String {
        codegen::to_typescript(&self.state.header_data(), &self.state.footer_data)
    }

    pub fn export_to_json(&self) -> String {
        serializer::serialize_export(
            &self.state.header_data(),
            &self.state.footer_data,
            &self.state.layout,
        )
    }

    /// End the session, dropping any pending auto-save.
    pub fn close(mut self) {
        self.cancel_drag();
        if self.persistence.cancel_pending() {
            tracing::debug!("Dropped pending auto-save on close");
        }
    }
}
