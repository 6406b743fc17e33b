//! In-memory employee collection that keeps derived fields consistent.
//!
//! Every write builds its records with [`EmployeeRecord::derive`] before the
//! write lock is taken. Inserts then only mint ids and append (a batch in one
//! `extend`), and updates replace the stored record wholesale. All state sits
//! behind one [`RwLock`], so readers either see a write completely or not at
//! all.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::StoreError;
use super::filter::EmployeeFilter;
use crate::calculations::{TaxTable, WithholdingCalculator};
use crate::import::ImportAdapter;
use crate::models::{EmployeeId, EmployeeRecord, NewEmployee};

/// Placeholder carried by derived records until they are committed. Minted
/// ids start at 1.
const UNASSIGNED_ID: EmployeeId = EmployeeId::new(0);

#[derive(Debug)]
struct StoreState {
    records: Vec<EmployeeRecord>,
    filter: EmployeeFilter,
    next_id: u64,
}

impl StoreState {
    fn mint_id(&mut self) -> EmployeeId {
        let id = EmployeeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(
        &self,
        id: EmployeeId,
    ) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }
}

/// Owned collection of [`EmployeeRecord`]s plus the active query filter.
///
/// The store is `Send + Sync`; share it behind an `Arc` when several
/// components need it.
#[derive(Debug)]
pub struct EmployeeStore {
    table: TaxTable,
    state: RwLock<StoreState>,
}

impl EmployeeStore {
    /// An empty store using the built-in withholding table.
    pub fn new() -> Self {
        Self::with_table(TaxTable::irrf())
    }

    /// An empty store using a custom withholding table.
    pub fn with_table(table: TaxTable) -> Self {
        Self {
            table,
            state: RwLock::new(StoreState {
                records: Vec::new(),
                filter: EmployeeFilter::default(),
                next_id: 1,
            }),
        }
    }

    pub fn table(&self) -> &TaxTable {
        &self.table
    }

    // Records are fully derived before the write lock is taken and each
    // mutation is a single extend or assignment, so a poisoned lock never
    // guards a half-written record or a half-applied batch.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn calculator(&self) -> WithholdingCalculator<'_> {
        WithholdingCalculator::new(&self.table)
    }

    /// Derives a record with a placeholder id; called before the lock is
    /// taken.
    fn derive_pending(
        &self,
        input: NewEmployee,
    ) -> EmployeeRecord {
        EmployeeRecord::derive(UNASSIGNED_ID, input, &self.calculator())
    }

    /// Mints the id of a pending record. The caller then appends it.
    fn stamp(
        state: &mut StoreState,
        record: &mut EmployeeRecord,
    ) {
        record.assign_id(state.mint_id());
        debug!(
            employee_id = %record.id(),
            taxable_base = %record.taxable_base(),
            tax_withheld = %record.tax_withheld(),
            "employee committed"
        );
    }

    /// Adds one employee under a freshly minted id.
    pub fn add(
        &self,
        input: NewEmployee,
    ) -> EmployeeRecord {
        let mut record = self.derive_pending(input);

        let mut state = self.write();
        Self::stamp(&mut state, &mut record);
        state.records.push(record.clone());
        record
    }

    /// Replaces every non-id field of `id`, re-deriving withholding. The
    /// record keeps its id and its position in insertion order.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if no record has `id`; nothing changes.
    pub fn update(
        &self,
        id: EmployeeId,
        input: NewEmployee,
    ) -> Result<EmployeeRecord, StoreError> {
        let record = EmployeeRecord::derive(id, input, &self.calculator());

        let mut state = self.write();
        let Some(index) = state.position(id) else {
            warn!(employee_id = %id, "update of unknown employee");
            return Err(StoreError::NotFound(id));
        };
        state.records[index] = record.clone();
        debug!(employee_id = %id, tax_withheld = %record.tax_withheld(), "employee updated");

        Ok(record)
    }

    /// Removes `id`. Returns whether a record was removed; a missing id is
    /// not an error.
    pub fn delete(
        &self,
        id: EmployeeId,
    ) -> bool {
        let mut state = self.write();
        match state.position(id) {
            Some(index) => {
                state.records.remove(index);
                debug!(employee_id = %id, "employee deleted");
                true
            }
            None => false,
        }
    }

    /// Appends a batch in order, each record under its own fresh id.
    ///
    /// Existing records are left alone and nothing is deduplicated: importing
    /// the same batch twice yields two copies.
    pub fn import_batch(
        &self,
        inputs: impl IntoIterator<Item = NewEmployee>,
    ) -> Vec<EmployeeRecord> {
        let mut imported: Vec<EmployeeRecord> = inputs
            .into_iter()
            .map(|input| self.derive_pending(input))
            .collect();

        let mut state = self.write();
        for record in &mut imported {
            Self::stamp(&mut state, record);
        }
        state.records.extend(imported.iter().cloned());
        info!(
            imported = imported.len(),
            total = state.records.len(),
            "employee batch imported"
        );
        imported
    }

    /// Translates one raw record with `adapter` and adds it.
    ///
    /// # Errors
    /// [`StoreError::MalformedInput`] if the record cannot be translated;
    /// the store is left unchanged.
    pub fn add_raw(
        &self,
        raw: &Value,
        adapter: &ImportAdapter,
    ) -> Result<EmployeeRecord, StoreError> {
        let input = adapter.translate(0, raw).inspect_err(|error| {
            warn!(%error, "rejected raw employee record");
        })?;
        Ok(self.add(input))
    }

    /// Translates every raw record with `adapter`, then imports them all.
    ///
    /// # Errors
    /// [`StoreError::MalformedInput`] for the first bad record; no record of
    /// the batch is imported.
    pub fn import_raw(
        &self,
        raws: &[Value],
        adapter: &ImportAdapter,
    ) -> Result<Vec<EmployeeRecord>, StoreError> {
        let inputs = adapter.translate_batch(raws).inspect_err(|error| {
            warn!(%error, batch_len = raws.len(), "rejected employee batch");
        })?;
        Ok(self.import_batch(inputs))
    }

    /// Replaces the active filter. Records are not touched.
    pub fn set_filter(
        &self,
        name_pattern: impl Into<String>,
        taxpayer_id_pattern: impl Into<String>,
    ) {
        self.write().filter = EmployeeFilter::new(name_pattern, taxpayer_id_pattern);
    }

    pub fn clear_filter(&self) {
        self.write().filter = EmployeeFilter::default();
    }

    pub fn filter(&self) -> EmployeeFilter {
        self.read().filter.clone()
    }

    /// Records matching the active filter, in insertion order.
    ///
    /// Computed from the live collection on every call.
    pub fn query(&self) -> Vec<EmployeeRecord> {
        let state = self.read();
        let matcher = state.filter.matcher();
        state
            .records
            .iter()
            .filter(|record| matcher.matches(record))
            .cloned()
            .collect()
    }

    /// All records in insertion order, ignoring the filter.
    pub fn records(&self) -> Vec<EmployeeRecord> {
        self.read().records.clone()
    }

    pub fn get(
        &self,
        id: EmployeeId,
    ) -> Option<EmployeeRecord> {
        let state = self.read();
        state.position(id).map(|index| state.records[index].clone())
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }
}

impl Default for EmployeeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::calculations::{compute_taxable_base, compute_withholding};
    use crate::import::InputField;
    use crate::store::InputProblem;

    fn employee(
        name: &str,
        taxpayer_id: &str,
        gross_salary: Decimal,
        social_security_discount: Decimal,
        dependents: i64,
    ) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            taxpayer_id: taxpayer_id.to_string(),
            gross_salary,
            social_security_discount,
            dependents,
        }
    }

    fn joao() -> NewEmployee {
        employee("João Silva", "123.456.789-00", dec!(5000), dec!(550), 2)
    }

    fn ana() -> NewEmployee {
        employee("Ana Costa", "789.123.456-00", dec!(2500), dec!(275), 0)
    }

    fn seeded() -> EmployeeStore {
        let store = EmployeeStore::new();
        store.import_batch([
            joao(),
            employee("Maria Santos", "987.654.321-00", dec!(3000), dec!(330), 1),
            employee("Pedro Oliveira", "456.789.123-00", dec!(8000), dec!(880), 3),
            ana(),
            employee("Carlos Souza", "321.654.987-00", dec!(6000), dec!(660), 2),
        ]);
        store
    }

    fn assert_consistent(record: &EmployeeRecord) {
        let base = compute_taxable_base(
            record.gross_salary(),
            record.social_security_discount(),
            record.dependents(),
        );
        assert_eq!(record.taxable_base(), base);
        assert_eq!(record.tax_withheld(), compute_withholding(base));
    }

    // =========================================================================
    // add
    // =========================================================================

    #[test]
    fn add_then_query_returns_the_derived_record() {
        let store = EmployeeStore::new();

        let added = store.add(joao());
        let visible = store.query();

        assert_eq!(visible, vec![added.clone()]);
        assert_eq!(added.taxable_base(), dec!(4070.82));
        assert_eq!(added.tax_withheld(), dec!(253.1645));
        assert_consistent(&added);
    }

    #[test]
    fn add_below_exempt_threshold_withholds_nothing() {
        let store = EmployeeStore::new();

        let added = store.add(ana());

        assert_eq!(added.taxable_base(), dec!(2225));
        assert_eq!(added.tax_withheld(), Decimal::ZERO);
    }

    #[test]
    fn add_accepts_out_of_range_numbers() {
        let store = EmployeeStore::new();

        let added = store.add(employee("Edge Case", "000", dec!(-100), dec!(500), -2));

        assert_eq!(added.taxable_base(), dec!(-220.82));
        assert_eq!(added.tax_withheld(), Decimal::ZERO);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_saturates_at_decimal_range() {
        let store = EmployeeStore::new();

        let added = store.add(employee("Overflow", "000", Decimal::MAX, dec!(-1), 0));

        assert_eq!(added.taxable_base(), Decimal::MAX);
        assert!(added.tax_withheld() > Decimal::ZERO);
        assert_consistent(&added);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_mints_increasing_ids() {
        let store = EmployeeStore::new();

        let first = store.add(joao());
        let second = store.add(ana());

        assert!(second.id() > first.id());
    }

    // =========================================================================
    // update
    // =========================================================================

    #[test]
    fn update_rederives_only_the_target() {
        let store = seeded();
        let before = store.records();
        let target = before[1].id();

        let updated = store
            .update(target, employee("Maria Santos", "987.654.321-00", dec!(5000), dec!(550), 2))
            .expect("record exists");

        let after = store.records();
        assert_eq!(updated.id(), target);
        assert_eq!(updated.tax_withheld(), dec!(253.1645));
        assert_eq!(after[1], updated);
        for (index, (old, new)) in before.iter().zip(&after).enumerate() {
            if index != 1 {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn update_preserves_position() {
        let store = seeded();
        let target = store.records()[2].id();

        store.update(target, ana()).expect("record exists");

        let ids: Vec<_> = store.records().iter().map(EmployeeRecord::id).collect();
        assert_eq!(ids[2], target);
        assert_eq!(store.records()[2].name(), "Ana Costa");
    }

    #[test]
    fn update_unknown_id_is_not_found_and_changes_nothing() {
        let store = seeded();
        let before = store.records();

        let result = store.update(EmployeeId::new(999), joao());

        assert_eq!(result, Err(StoreError::NotFound(EmployeeId::new(999))));
        assert_eq!(store.records(), before);
    }

    // =========================================================================
    // delete
    // =========================================================================

    #[test]
    fn delete_removes_exactly_one_record() {
        let store = seeded();
        let target = store.records()[0].id();

        assert!(store.delete(target));
        assert_eq!(store.len(), 4);
        assert!(store.get(target).is_none());

        assert!(!store.delete(target));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let store = EmployeeStore::new();
        let first = store.add(joao());
        store.delete(first.id());

        let second = store.add(joao());

        assert_ne!(second.id(), first.id());
    }

    // =========================================================================
    // import
    // =========================================================================

    #[test]
    fn import_batch_appends_with_distinct_ids() {
        let store = EmployeeStore::new();
        let existing = store.add(ana());

        let imported = store.import_batch([joao(), joao(), ana()]);

        assert_eq!(imported.len(), 3);
        let ids: HashSet<_> = imported.iter().map(EmployeeRecord::id).collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&existing.id()));

        let all = store.records();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], existing);
        assert_eq!(&all[1..], imported.as_slice());
        imported.iter().for_each(assert_consistent);
    }

    #[test]
    fn import_batch_with_extreme_values_commits_every_record() {
        let store = EmployeeStore::new();

        let imported = store.import_batch([
            joao(),
            employee("Overflow", "000", Decimal::MAX, dec!(-1), 0),
            employee("Underflow", "001", Decimal::MIN, Decimal::MAX, i64::MAX),
            ana(),
        ]);

        assert_eq!(imported.len(), 4);
        assert_eq!(store.records(), imported);
        assert_eq!(imported[1].taxable_base(), Decimal::MAX);
        assert_eq!(imported[2].taxable_base(), Decimal::MIN);
        assert_eq!(imported[2].tax_withheld(), Decimal::ZERO);
        imported.iter().for_each(assert_consistent);
    }

    #[test]
    fn import_raw_accepts_amount_at_decimal_max() {
        let store = EmployeeStore::new();
        let raws = vec![
            json!({"name": "Nova", "cpf": "1", "grossSalary": 4000, "socialSecurityDiscount": 440, "dependents": 0}),
            json!({"name": "Teto", "cpf": "2", "grossSalary": "79228162514264337593543950335", "socialSecurityDiscount": "-1", "dependents": 0}),
        ];

        let imported = store
            .import_raw(&raws, &ImportAdapter::canonical())
            .expect("both records are well formed");

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[1].gross_salary(), Decimal::MAX);
        assert_eq!(imported[1].taxable_base(), Decimal::MAX);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn import_batch_twice_keeps_duplicates() {
        let store = EmployeeStore::new();

        store.import_batch([joao(), ana()]);
        store.import_batch([joao(), ana()]);

        assert_eq!(store.len(), 4);
    }

    #[test]
    fn import_raw_rejects_whole_batch_on_malformed_record() {
        let store = seeded();
        let before = store.records();
        let raws = vec![
            json!({"name": "Nova", "cpf": "1", "grossSalary": 4000, "socialSecurityDiscount": 440, "dependents": 0}),
            json!({"name": "Quebrada", "cpf": "2", "grossSalary": "n/a", "socialSecurityDiscount": 0, "dependents": 0}),
        ];

        let result = store.import_raw(&raws, &ImportAdapter::canonical());

        assert_eq!(
            result,
            Err(StoreError::MalformedInput {
                index: 1,
                problem: InputProblem::WrongType {
                    field: InputField::GrossSalary,
                    expected: "decimal number",
                    found: "string",
                },
            })
        );
        assert_eq!(store.records(), before);
    }

    #[test]
    fn import_raw_translates_localized_records() {
        let store = EmployeeStore::new();
        let raws = vec![json!({
            "nome": "Fátima Elza Tereza Castro",
            "cpf": "701.118.872-08",
            "salario": 5500,
            "desconto": 628.95,
            "dependentes": 0
        })];

        let imported = store
            .import_raw(&raws, &ImportAdapter::localized())
            .expect("valid batch");

        assert_eq!(imported[0].taxable_base(), dec!(4871.05));
        assert_consistent(&imported[0]);
    }

    #[test]
    fn add_raw_rejects_missing_field() {
        let store = EmployeeStore::new();

        let result = store.add_raw(&json!({"name": "Sem CPF"}), &ImportAdapter::canonical());

        assert_eq!(
            result,
            Err(StoreError::MalformedInput {
                index: 0,
                problem: InputProblem::MissingField(InputField::TaxpayerId),
            })
        );
        assert!(store.is_empty());
    }

    // =========================================================================
    // filter / query
    // =========================================================================

    #[test]
    fn name_filter_keeps_insertion_order() {
        let store = seeded();

        store.set_filter("an", "");
        let names: Vec<String> = store.query().iter().map(|r| r.name().to_string()).collect();

        assert_eq!(names, vec!["Maria Santos", "Ana Costa"]);
    }

    #[test]
    fn taxpayer_id_filter_is_substring() {
        let store = seeded();

        store.set_filter("", "789");
        let names: Vec<String> = store.query().iter().map(|r| r.name().to_string()).collect();

        assert_eq!(names, vec!["João Silva", "Pedro Oliveira", "Ana Costa"]);
    }

    #[test]
    fn set_filter_does_not_mutate_records() {
        let store = seeded();
        let before = store.records();

        store.set_filter("zzz", "");

        assert!(store.query().is_empty());
        assert_eq!(store.records(), before);

        store.clear_filter();
        assert_eq!(store.query(), before);
    }

    #[test]
    fn query_reflects_writes_after_filter_is_set() {
        let store = seeded();
        store.set_filter("costa", "");
        assert_eq!(store.query().len(), 1);

        store.add(employee("Beatriz Costa", "555", dec!(1000), dec!(0), 0));

        assert_eq!(store.query().len(), 2);
        assert_eq!(store.filter(), EmployeeFilter::new("costa", ""));
    }

    // =========================================================================
    // concurrency
    // =========================================================================

    #[test]
    fn concurrent_writers_get_unique_ids_and_consistent_records() {
        let store = Arc::new(EmployeeStore::new());

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for n in 0..25i64 {
                        let salary = Decimal::from(1000 + worker * 1000 + n);
                        store.add(employee("Worker", "0", salary, dec!(0), n % 3));
                        for record in store.query() {
                            assert_consistent(&record);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker panicked");
        }

        let records = store.records();
        let ids: HashSet<_> = records.iter().map(EmployeeRecord::id).collect();
        assert_eq!(records.len(), 100);
        assert_eq!(ids.len(), 100);
    }
}
