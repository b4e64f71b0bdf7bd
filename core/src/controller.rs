//! Stateful synchronization core for the todo list.
//!
//! # Design
//! `TodoListController` owns the local view of one user's collection and
//! drives it through optimistic mutations. Like `TodoClient`, it never
//! touches the network: every mutation returns the `HttpCall`s the host must
//! execute, and the host reports each outcome through
//! [`TodoListController::complete`]. The host may run calls concurrently and
//! report them in any order; operation tokens tie outcomes back to the
//! bookkeeping they belong to.
//!
//! Time is passed in rather than read from a clock, so every behavior down
//! to the error banner's expiry is deterministic under test.
//!
//! Mutations fall into two optimism patterns. Creates insert a placeholder
//! row immediately and replace it with the server's record (or drop it on
//! failure). Toggles and deletes keep the record visibly pending and apply
//! nothing until the server acknowledges, so a failure needs no rollback.

use std::collections::HashMap;
use std::time::Instant;

use uuid::Uuid;

use crate::banner::ErrorBanner;
use crate::client::TodoClient;
use crate::error::{ApiError, UiError};
use crate::http::{HttpRequest, HttpResponse, TransportError};
use crate::types::{EntryId, Filter, NewTodo, Todo, TodoPatch};

/// Token identifying one outstanding remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpId(u64);

/// A request the host must execute, tagged with the operation it settles.
///
/// The host runs the HTTP round-trip and reports the outcome via
/// [`TodoListController::complete`] with the same token.
#[derive(Debug, Clone)]
pub struct HttpCall {
    pub op: OpId,
    pub request: HttpRequest,
}

/// Edge-triggered UI actions produced by a completion.
///
/// Level-based state (busy flag, banner, counts) is read from the snapshot;
/// these fire once, at the transition that causes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    /// The input field should regain focus: the busy flag just cleared, or a
    /// delete succeeded.
    pub focus_input: bool,
    /// The input text should be cleared: a create was acknowledged.
    pub clear_input: bool,
}

/// One record in the local collection.
#[derive(Debug, Clone)]
pub struct TodoEntry {
    pub id: EntryId,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
    in_flight: Option<OpId>,
}

impl TodoEntry {
    fn persisted(todo: Todo) -> Self {
        Self {
            id: EntryId::Persisted(todo.id),
            user_id: todo.user_id,
            title: todo.title,
            completed: todo.completed,
            in_flight: None,
        }
    }

    /// True while an operation for this record is outstanding. Pending
    /// records show a loading overlay, reject further mutations, and do not
    /// count as remaining work.
    pub fn pending(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// One visible row, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    pub id: EntryId,
    pub title: String,
    pub completed: bool,
    pub pending: bool,
}

/// Owned snapshot of everything a view needs to draw the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Entries admitted by the current filter, in collection order.
    pub todos: Vec<TodoView>,
    /// Records neither completed nor pending.
    pub remaining: usize,
    /// Size of the whole collection, filter ignored.
    pub total: usize,
    pub filter: Filter,
    /// The input field is disabled while this is set.
    pub busy: bool,
    pub all_completed: bool,
    pub has_completed: bool,
    /// Banner text, if an error is within its visibility window.
    pub error: Option<String>,
}

/// What to do when an operation settles.
#[derive(Debug)]
enum OpKind {
    Load,
    Create { placeholder: EntryId },
    Toggle,
    Delete { batch: Option<BatchId> },
}

impl OpKind {
    /// Whether this operation disables the input field while outstanding.
    /// Single deletes do not; everything else does.
    fn holds_busy(&self) -> bool {
        !matches!(self, OpKind::Delete { batch: None })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BatchId(u64);

/// Settlement bookkeeping for one clear-completed batch.
#[derive(Debug)]
struct Batch {
    outstanding: usize,
    members: Vec<OpId>,
    deleted: Vec<i64>,
    failed: bool,
}

/// Optimistic client-side mirror of one user's todo collection.
#[derive(Debug)]
pub struct TodoListController {
    client: TodoClient,
    user_id: i64,
    entries: Vec<TodoEntry>,
    filter: Filter,
    /// Value the next `toggle_all` applies; alternates on each call.
    toggle_all_target: bool,
    banner: ErrorBanner,
    busy_holders: usize,
    ops: HashMap<OpId, OpKind>,
    batches: HashMap<BatchId, Batch>,
    next_op: u64,
    next_batch: u64,
}

impl TodoListController {
    pub fn new(client: TodoClient, user_id: i64) -> Self {
        Self {
            client,
            user_id,
            entries: Vec::new(),
            filter: Filter::All,
            toggle_all_target: true,
            banner: ErrorBanner::new(),
            busy_holders: 0,
            ops: HashMap::new(),
            batches: HashMap::new(),
            next_op: 0,
            next_batch: 0,
        }
    }

    // --- mutations -------------------------------------------------------

    /// Fetch the whole collection for this user.
    ///
    /// Holds the busy flag until the response settles. On success the local
    /// collection is replaced wholesale; on failure the banner reports the
    /// load error and existing entries are left as they were.
    pub fn load(&mut self) -> HttpCall {
        tracing::debug!(user_id = self.user_id, "loading todos");
        let request = self.client.build_list_todos(self.user_id);
        self.issue(OpKind::Load, request)
    }

    /// Validate `title` and begin an optimistic create.
    ///
    /// An empty trimmed title surfaces the title error without touching the
    /// network, busy or not. A non-empty title while busy returns `None`
    /// silently: the input is disabled, so at most one create is in flight.
    pub fn create(&mut self, title: &str, now: Instant) -> Option<HttpCall> {
        let title = title.trim();
        if title.is_empty() {
            self.banner.show(UiError::EmptyTitle, now);
            return None;
        }
        if self.is_busy() {
            return None;
        }

        let input = NewTodo {
            user_id: self.user_id,
            title: title.to_string(),
            completed: false,
        };
        let request = match self.client.build_create_todo(&input) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(%error, "create request could not be built");
                self.banner.show(UiError::AddFailed, now);
                return None;
            }
        };

        let placeholder = EntryId::Local(Uuid::new_v4());
        tracing::debug!(title = %input.title, "creating todo");
        let call = self.issue(OpKind::Create { placeholder }, request);
        self.entries.push(TodoEntry {
            id: placeholder,
            user_id: self.user_id,
            title: input.title,
            completed: false,
            in_flight: Some(call.op),
        });
        Some(call)
    }

    /// Begin storing `completed` for one record.
    ///
    /// The local value changes only when the server acknowledges; until then
    /// the record is pending. Returns `None` when the record is unknown, not
    /// yet persisted, or already has an operation in flight (re-entrant
    /// toggles are rejected, not queued).
    pub fn toggle_one(&mut self, id: EntryId, completed: bool) -> Option<HttpCall> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        if self.entries[index].pending() {
            return None;
        }
        let server_id = id.persisted()?;

        let patch = TodoPatch {
            completed: Some(completed),
            ..TodoPatch::default()
        };
        let request = match self.client.build_patch_todo(server_id, &patch) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(%error, id = server_id, "patch request could not be built");
                return None;
            }
        };

        tracing::debug!(id = server_id, completed, "toggling todo");
        let call = self.issue(OpKind::Toggle, request);
        self.entries[index].in_flight = Some(call.op);
        Some(call)
    }

    /// Flip every record to the alternating target, then patch the records
    /// whose stored value actually changes.
    ///
    /// The local flip applies to the whole collection immediately and is not
    /// reverted if a patch later fails; a failure only surfaces the update
    /// error. Records already in flight keep their outstanding operation and
    /// get no new request.
    pub fn toggle_all(&mut self) -> Vec<HttpCall> {
        let target = self.toggle_all_target;
        self.toggle_all_target = !target;
        tracing::debug!(target, "toggling all todos");

        let mut wanted: Vec<(usize, i64)> = Vec::new();
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let changed = entry.completed != target;
            entry.completed = target;
            if !changed || entry.pending() {
                continue;
            }
            if let Some(server_id) = entry.id.persisted() {
                wanted.push((index, server_id));
            }
        }

        let mut calls = Vec::with_capacity(wanted.len());
        for (index, server_id) in wanted {
            let patch = TodoPatch {
                completed: Some(target),
                ..TodoPatch::default()
            };
            let request = match self.client.build_patch_todo(server_id, &patch) {
                Ok(request) => request,
                Err(error) => {
                    tracing::warn!(%error, id = server_id, "patch request could not be built");
                    continue;
                }
            };
            let call = self.issue(OpKind::Toggle, request);
            self.entries[index].in_flight = Some(call.op);
            calls.push(call);
        }
        calls
    }

    /// Begin deleting one record.
    ///
    /// The record stays in the collection, marked pending, until the server
    /// echoes the deletion. Single deletes do not hold the busy flag, so
    /// typing continues while one is outstanding. Returns `None` when the
    /// record is unknown, not yet persisted, or already in flight.
    pub fn remove_one(&mut self, id: EntryId) -> Option<HttpCall> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        if self.entries[index].pending() {
            return None;
        }
        let server_id = id.persisted()?;

        tracing::debug!(id = server_id, "deleting todo");
        let request = self.client.build_delete_todo(server_id);
        let call = self.issue(OpKind::Delete { batch: None }, request);
        self.entries[index].in_flight = Some(call.op);
        Some(call)
    }

    /// Begin deleting every completed record as one batch.
    ///
    /// The host may run the requests concurrently; the controller reconciles
    /// once, after the last member settles. If every delete succeeded,
    /// exactly the echoed ids are removed. One failure keeps the whole batch
    /// in place and surfaces the delete error once.
    pub fn clear_completed(&mut self) -> Vec<HttpCall> {
        let targets: Vec<(usize, i64)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.completed && !e.pending())
            .filter_map(|(index, e)| e.id.persisted().map(|id| (index, id)))
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }

        let batch_id = BatchId(self.next_batch);
        self.next_batch += 1;
        tracing::debug!(count = targets.len(), "clearing completed todos");

        let mut members = Vec::with_capacity(targets.len());
        let mut calls = Vec::with_capacity(targets.len());
        for (index, server_id) in targets {
            let request = self.client.build_delete_todo(server_id);
            let call = self.issue(
                OpKind::Delete {
                    batch: Some(batch_id),
                },
                request,
            );
            self.entries[index].in_flight = Some(call.op);
            members.push(call.op);
            calls.push(call);
        }
        self.batches.insert(
            batch_id,
            Batch {
                outstanding: calls.len(),
                members,
                deleted: Vec::new(),
                failed: false,
            },
        );
        calls
    }

    /// Change the display filter. Pure: no request, no data mutation.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Hide the error banner now instead of waiting out its window.
    pub fn dismiss_error(&mut self) {
        self.banner.dismiss();
    }

    // --- completion ------------------------------------------------------

    /// Report the outcome of the operation behind `op`.
    ///
    /// Transport failures, unexpected statuses, and unparseable bodies all
    /// collapse into the failed operation's fixed user-facing message; the
    /// detail goes to the log. Completions for tokens the controller does
    /// not know are ignored.
    pub fn complete(
        &mut self,
        op: OpId,
        outcome: Result<HttpResponse, TransportError>,
        now: Instant,
    ) -> Effects {
        let Some(kind) = self.ops.remove(&op) else {
            tracing::warn!(?op, "completion for unknown operation");
            return Effects::default();
        };
        let was_busy = self.is_busy();
        if kind.holds_busy() {
            self.busy_holders -= 1;
        }

        let mut effects = Effects::default();
        match kind {
            OpKind::Load => self.finish_load(outcome, now),
            OpKind::Create { placeholder } => {
                self.finish_create(placeholder, outcome, now, &mut effects)
            }
            OpKind::Toggle => self.finish_toggle(op, outcome, now),
            OpKind::Delete { batch } => self.finish_delete(op, batch, outcome, now, &mut effects),
        }

        if was_busy && !self.is_busy() {
            effects.focus_input = true;
        }
        effects
    }

    fn finish_load(&mut self, outcome: Result<HttpResponse, TransportError>, now: Instant) {
        match self.settle(outcome, TodoClient::parse_list_todos) {
            Ok(todos) => {
                tracing::debug!(count = todos.len(), "todos loaded");
                self.entries = todos.into_iter().map(TodoEntry::persisted).collect();
            }
            Err(error) => {
                tracing::warn!(%error, "load failed");
                self.banner.show(UiError::LoadFailed, now);
            }
        }
    }

    fn finish_create(
        &mut self,
        placeholder: EntryId,
        outcome: Result<HttpResponse, TransportError>,
        now: Instant,
        effects: &mut Effects,
    ) {
        match self.settle(outcome, TodoClient::parse_create_todo) {
            Ok(todo) => {
                tracing::debug!(id = todo.id, "todo created");
                self.entries.retain(|e| e.id != placeholder);
                self.entries.push(TodoEntry::persisted(todo));
                effects.clear_input = true;
            }
            Err(error) => {
                tracing::warn!(%error, "create failed");
                self.entries.retain(|e| e.id != placeholder);
                self.banner.show(UiError::AddFailed, now);
            }
        }
    }

    fn finish_toggle(
        &mut self,
        op: OpId,
        outcome: Result<HttpResponse, TransportError>,
        now: Instant,
    ) {
        let result = self.settle(outcome, TodoClient::parse_patch_todo);
        // The record may have vanished under the patch (a reload settled in
        // between); the banner still reports a failure either way.
        if let Some(entry) = self.entries.iter_mut().find(|e| e.in_flight == Some(op)) {
            entry.in_flight = None;
            if let Ok(todo) = &result {
                entry.completed = todo.completed;
            }
        }
        if let Err(error) = result {
            tracing::warn!(%error, "update failed");
            self.banner.show(UiError::UpdateFailed, now);
        }
    }

    fn finish_delete(
        &mut self,
        op: OpId,
        batch: Option<BatchId>,
        outcome: Result<HttpResponse, TransportError>,
        now: Instant,
        effects: &mut Effects,
    ) {
        let result = self.settle(outcome, TodoClient::parse_delete_todo);
        let Some(batch_id) = batch else {
            match result {
                Ok(deleted_id) => {
                    tracing::debug!(id = deleted_id, "todo deleted");
                    self.entries.retain(|e| e.id != EntryId::Persisted(deleted_id));
                    self.release(op);
                    effects.focus_input = true;
                }
                Err(error) => {
                    tracing::warn!(%error, "delete failed");
                    self.release(op);
                    self.banner.show(UiError::DeleteFailed, now);
                }
            }
            return;
        };

        let finished = match self.batches.get_mut(&batch_id) {
            Some(batch) => {
                batch.outstanding -= 1;
                match result {
                    Ok(deleted_id) => batch.deleted.push(deleted_id),
                    Err(error) => {
                        tracing::warn!(%error, "batched delete failed");
                        batch.failed = true;
                    }
                }
                batch.outstanding == 0
            }
            None => false,
        };
        if finished {
            if let Some(batch) = self.batches.remove(&batch_id) {
                self.reconcile_batch(batch, now);
            }
        }
    }

    /// Apply a settled clear-completed batch: all-or-nothing removal.
    fn reconcile_batch(&mut self, batch: Batch, now: Instant) {
        if batch.failed {
            self.banner.show(UiError::DeleteFailed, now);
        } else {
            tracing::debug!(count = batch.deleted.len(), "completed todos cleared");
            self.entries.retain(|e| match e.id {
                EntryId::Persisted(id) => !batch.deleted.contains(&id),
                EntryId::Local(_) => true,
            });
        }
        // Whatever survived must not stay stuck behind the batch's marks.
        for entry in self.entries.iter_mut() {
            if entry.in_flight.is_some_and(|op| batch.members.contains(&op)) {
                entry.in_flight = None;
            }
        }
    }

    /// Clear the pending mark left by `op`, if its record still exists.
    fn release(&mut self, op: OpId) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.in_flight == Some(op)) {
            entry.in_flight = None;
        }
    }

    /// Run a parse step over a host outcome; transport failures convert into
    /// `ApiError` on the way through.
    fn settle<T>(
        &self,
        outcome: Result<HttpResponse, TransportError>,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let response = outcome?;
        parse(&self.client, response)
    }

    fn issue(&mut self, kind: OpKind, request: HttpRequest) -> HttpCall {
        let op = OpId(self.next_op);
        self.next_op += 1;
        if kind.holds_busy() {
            self.busy_holders += 1;
        }
        self.ops.insert(op, kind);
        HttpCall { op, request }
    }

    // --- views -----------------------------------------------------------

    /// Entries admitted by the current filter, in collection order.
    pub fn visible_todos(&self) -> Vec<&TodoEntry> {
        self.entries
            .iter()
            .filter(|e| self.filter.admits(e.completed))
            .collect()
    }

    /// Count of records neither completed nor pending. Placeholders are
    /// pending by definition, so unacknowledged creates never inflate this.
    pub fn remaining_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.pending() && !e.completed)
            .count()
    }

    /// True while any load, create, toggle, or batched delete is
    /// outstanding. The input field is disabled while busy.
    pub fn is_busy(&self) -> bool {
        self.busy_holders > 0
    }

    /// The banner error, if still within its visibility window.
    pub fn current_error(&self, now: Instant) -> Option<UiError> {
        self.banner.current(now)
    }

    /// The active display filter.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn entries(&self) -> &[TodoEntry] {
        &self.entries
    }

    /// Owned, render-ready view of the whole screen.
    pub fn snapshot(&self, now: Instant) -> ViewState {
        ViewState {
            todos: self
                .visible_todos()
                .into_iter()
                .map(|e| TodoView {
                    id: e.id,
                    title: e.title.clone(),
                    completed: e.completed,
                    pending: e.pending(),
                })
                .collect(),
            remaining: self.remaining_count(),
            total: self.entries.len(),
            filter: self.filter,
            busy: self.is_busy(),
            all_completed: !self.entries.is_empty() && self.entries.iter().all(|e| e.completed),
            has_completed: self.entries.iter().any(|e| e.completed),
            error: self.current_error(now).map(|e| e.to_string()),
        }
    }
}
