//! Sync controller state machine.

use crate::aggregate;
use crate::model::expense::{Expense, ExpenseDraft};
use crate::model::person::Person;
use crate::persist::snapshot::{self, Collection};
use crate::persist::{DurableStore, ShareLink};
use crate::store::{LedgerStore, Revision, RosterStore, StoreResult};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Bootstrapping,
    Steady,
}

/// Where one collection's initial state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Link,
    Durable,
    Empty,
}

impl SnapshotSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Durable => "durable",
            Self::Empty => "empty",
        }
    }
}

/// Bootstrap result for one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionLoad {
    pub source: SnapshotSource,
    /// The chosen snapshot failed to decode and the collection starts empty.
    pub parse_failed: bool,
    pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub roster: CollectionLoad,
    pub ledger: CollectionLoad,
}

/// What the commit reaction did with one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Commit happened before bootstrap finished; nothing written.
    Bootstrapping,
    /// Collection is empty; persisted state left untouched.
    SkippedEmpty,
    /// Both channels were attempted; `false` marks a dropped failure.
    Written { durable_ok: bool, link_ok: bool },
    /// Explicit clear erased storage and reset the link parameter.
    Cleared,
}

/// Notification sent to subscribers after every commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitEvent {
    pub collection: Collection,
    pub revision: Revision,
    pub outcome: WriteOutcome,
}

type CommitObserver = Box<dyn FnMut(&CommitEvent)>;

/// Owned application state plus its persistence reactions.
///
/// Construct with [`SyncController::new`], then call
/// [`SyncController::bootstrap`] once before handing it to the UI layer.
pub struct SyncController<D: DurableStore, L: ShareLink> {
    roster: RosterStore,
    ledger: LedgerStore,
    durable: D,
    link: L,
    phase: SyncPhase,
    report: Option<BootstrapReport>,
    observers: Vec<CommitObserver>,
}

impl<D: DurableStore, L: ShareLink> SyncController<D, L> {
    pub fn new(durable: D, link: L) -> Self {
        Self {
            roster: RosterStore::new(),
            ledger: LedgerStore::new(),
            durable,
            link,
            phase: SyncPhase::Bootstrapping,
            report: None,
            observers: Vec::new(),
        }
    }

    /// Resolves initial state from the link, then storage, then empty, and
    /// enters `Steady`.
    ///
    /// Runs once; later calls return the first report without reading either
    /// channel again.
    pub fn bootstrap(&mut self) -> BootstrapReport {
        if let Some(report) = self.report {
            debug!("event=bootstrap module=sync status=skip reason=already_steady");
            return report;
        }

        let (mut roster_load, people) =
            self.load_collection(Collection::Roster, snapshot::decode_roster);
        if let Some(people) = people {
            let dropped = self.mutate_roster(|roster| roster.replace_all(people));
            if dropped > 0 {
                warn!(
                    "event=bootstrap_decode module=sync status=degraded collection=people dropped={dropped}"
                );
                roster_load.len -= dropped;
            }
        }

        let (ledger_load, expenses) =
            self.load_collection(Collection::Ledger, snapshot::decode_ledger);
        if let Some(expenses) = expenses {
            self.mutate_ledger(|ledger| ledger.replace_all(expenses));
        }

        let report = BootstrapReport {
            roster: roster_load,
            ledger: ledger_load,
        };
        self.report = Some(report);
        self.phase = SyncPhase::Steady;

        info!(
            "event=bootstrap module=sync status=ok people_source={} people_len={} expenses_source={} expenses_len={}",
            roster_load.source.as_str(),
            roster_load.len,
            ledger_load.source.as_str(),
            ledger_load.len
        );
        report
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn bootstrap_report(&self) -> Option<BootstrapReport> {
        self.report
    }

    pub fn people(&self) -> &[Person] {
        self.roster.people()
    }

    pub fn expenses(&self) -> &[Expense] {
        self.ledger.expenses()
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn durable(&self) -> &D {
        &self.durable
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn into_parts(self) -> (D, L) {
        (self.durable, self.link)
    }

    /// Registers an observer called after every commit.
    pub fn subscribe(&mut self, observer: impl FnMut(&CommitEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Adds a person; rejected names leave every channel untouched.
    pub fn add_person(&mut self, name: &str) -> StoreResult<()> {
        self.mutate_roster(|roster| roster.add_person(name))
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        self.mutate_roster(|roster| roster.set_checked(name, checked))
    }

    pub fn reset_all_checked(&mut self) {
        self.mutate_roster(RosterStore::reset_all_checked)
    }

    pub fn add_expense(&mut self, expense: Expense) -> StoreResult<()> {
        self.mutate_ledger(|ledger| ledger.add_expense(expense))
    }

    pub fn replace_expense_at(&mut self, index: usize, expense: Expense) -> StoreResult<()> {
        self.mutate_ledger(|ledger| ledger.replace_expense_at(index, expense))
    }

    /// Empties the roster through the ordinary commit path.
    ///
    /// Persisted state is left as it was; use `clear_data` to erase it.
    pub fn clear_roster(&mut self) {
        self.mutate_roster(RosterStore::clear_all)
    }

    /// Empties the ledger through the ordinary commit path.
    pub fn clear_ledger(&mut self) {
        self.mutate_ledger(LedgerStore::clear_all)
    }

    /// Commits a form draft as a new record, or over `editing` when set.
    ///
    /// The saved record covers exactly the current roster.
    pub fn save_draft(&mut self, draft: &ExpenseDraft, editing: Option<usize>) -> StoreResult<()> {
        let expense = Expense::from_draft(draft, self.roster.people())?;
        match editing {
            Some(index) => self.replace_expense_at(index, expense),
            None => self.add_expense(expense),
        }
    }

    /// Draft for editing the record at `index`, limited to present people.
    pub fn draft_for_edit(&self, index: usize) -> Option<ExpenseDraft> {
        self.ledger
            .get(index)
            .map(|expense| aggregate::edit_draft(expense, self.roster.people()))
    }

    pub fn column_total(&self, person: &str) -> f64 {
        aggregate::column_total(self.ledger.expenses(), person)
    }

    pub fn column_totals(&self) -> Vec<(String, f64)> {
        aggregate::column_totals(self.roster.people(), self.ledger.expenses())
    }

    /// Equal split of `total` across the currently checked people.
    pub fn split_selected(&self, total: f64) -> Option<BTreeMap<String, f64>> {
        aggregate::equal_split(total, &self.roster.selected())
    }

    /// Empties both stores and erases both channels unconditionally.
    pub fn clear_data(&mut self) {
        self.mutate_roster(RosterStore::clear_all);
        self.mutate_ledger(LedgerStore::clear_all);

        for collection in [Collection::Roster, Collection::Ledger] {
            let key = collection.key();
            if let Err(err) = self.durable.remove(key) {
                warn!(
                    "event=clear_data module=sync status=error channel=durable collection={key} error={err}"
                );
            }
            if let Err(err) = self.link.write_param(key, snapshot::empty_snapshot()) {
                warn!(
                    "event=clear_data module=sync status=error channel=link collection={key} error={err}"
                );
            }
        }
        info!("event=clear_data module=sync status=ok");

        self.notify(CommitEvent {
            collection: Collection::Roster,
            revision: self.roster.revision(),
            outcome: WriteOutcome::Cleared,
        });
        self.notify(CommitEvent {
            collection: Collection::Ledger,
            revision: self.ledger.revision(),
            outcome: WriteOutcome::Cleared,
        });
    }

    fn load_collection<T>(
        &self,
        collection: Collection,
        decode: fn(&str) -> snapshot::SnapshotResult<Vec<T>>,
    ) -> (CollectionLoad, Option<Vec<T>>) {
        let key = collection.key();
        let (raw, source) = self.resolve_snapshot(key);
        let Some(raw) = raw else {
            let load = CollectionLoad {
                source,
                parse_failed: false,
                len: 0,
            };
            return (load, None);
        };

        match decode(&raw) {
            Ok(items) => {
                let load = CollectionLoad {
                    source,
                    parse_failed: false,
                    len: items.len(),
                };
                (load, Some(items))
            }
            Err(err) => {
                warn!(
                    "event=bootstrap_decode module=sync status=error collection={key} source={} error={err}",
                    source.as_str()
                );
                let load = CollectionLoad {
                    source,
                    parse_failed: true,
                    len: 0,
                };
                (load, None)
            }
        }
    }

    fn resolve_snapshot(&self, key: &str) -> (Option<String>, SnapshotSource) {
        if let Some(raw) = self.link.read_param(key).filter(|raw| !raw.is_empty()) {
            return (Some(raw), SnapshotSource::Link);
        }

        match self.durable.load(key) {
            Ok(Some(raw)) if !raw.is_empty() => (Some(raw), SnapshotSource::Durable),
            Ok(_) => (None, SnapshotSource::Empty),
            Err(err) => {
                warn!("event=bootstrap_load module=sync status=error collection={key} error={err}");
                (None, SnapshotSource::Empty)
            }
        }
    }

    fn mutate_roster<T>(&mut self, apply: impl FnOnce(&mut RosterStore) -> T) -> T {
        let before = self.roster.snapshot();
        let result = apply(&mut self.roster);
        if !Arc::ptr_eq(&before, &self.roster.snapshot()) {
            self.on_commit(Collection::Roster);
        }
        result
    }

    fn mutate_ledger<T>(&mut self, apply: impl FnOnce(&mut LedgerStore) -> T) -> T {
        let before = self.ledger.snapshot();
        let result = apply(&mut self.ledger);
        if !Arc::ptr_eq(&before, &self.ledger.snapshot()) {
            self.on_commit(Collection::Ledger);
        }
        result
    }

    fn on_commit(&mut self, collection: Collection) {
        let outcome = match self.phase {
            SyncPhase::Bootstrapping => WriteOutcome::Bootstrapping,
            SyncPhase::Steady => self.persist(collection),
        };
        let revision = match collection {
            Collection::Roster => self.roster.revision(),
            Collection::Ledger => self.ledger.revision(),
        };

        debug!(
            "event=commit module=sync collection={} revision={revision} outcome={outcome:?}",
            collection.key()
        );
        self.notify(CommitEvent {
            collection,
            revision,
            outcome,
        });
    }

    fn persist(&mut self, collection: Collection) -> WriteOutcome {
        let encoded = match collection {
            Collection::Roster if self.roster.is_empty() => return WriteOutcome::SkippedEmpty,
            Collection::Ledger if self.ledger.is_empty() => return WriteOutcome::SkippedEmpty,
            Collection::Roster => snapshot::encode_roster(self.roster.people()),
            Collection::Ledger => snapshot::encode_ledger(self.ledger.expenses()),
        };

        let key = collection.key();
        let encoded = match encoded {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("event=sync_write module=sync status=error collection={key} error={err}");
                return WriteOutcome::Written {
                    durable_ok: false,
                    link_ok: false,
                };
            }
        };

        let durable_ok = match self.durable.save(key, &encoded) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=sync_write module=sync status=error channel=durable collection={key} error={err}"
                );
                false
            }
        };
        let link_ok = match self.link.write_param(key, &encoded) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=sync_write module=sync status=error channel=link collection={key} error={err}"
                );
                false
            }
        };

        debug!(
            "event=sync_write module=sync status=ok collection={key} bytes={} durable_ok={durable_ok} link_ok={link_ok}",
            encoded.len()
        );
        WriteOutcome::Written {
            durable_ok,
            link_ok,
        }
    }

    fn notify(&mut self, event: CommitEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}
