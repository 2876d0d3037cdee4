use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ledger_traits::LedgerServiceTrait;
use crate::errors::{Result, ValidationError};
use crate::fees::OperationCalculator;
use crate::fx::FxRateResolver;
use crate::journal::{
    fixed_term_symbol, next_fixed_term_number, Currency, DerivedAmounts, InstrumentType,
    JournalEntry, JournalRepositoryTrait, NewJournalEntry, OperationKind,
};
use crate::market_data::MarketPriceLookupTrait;
use crate::portfolio::{
    self, CashByBroker, FinishedOperationsReport, HoldingsByBroker, Position,
    PositionRepositoryTrait, ValuationReport, ValuationView,
};
use crate::settings::LedgerSettings;

/// Service that commits journal entries and keeps the position cache in sync.
pub struct LedgerService {
    journal_repository: Arc<dyn JournalRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
    fx_resolver: FxRateResolver,
    calculator: OperationCalculator,
    default_view: ValuationView,
    // Serializes mutations: validation reads a snapshot that must still hold at insert time
    write_lock: Mutex<()>,
}

impl LedgerService {
    pub fn new(
        journal_repository: Arc<dyn JournalRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
        fx_resolver: FxRateResolver,
        settings: &LedgerSettings,
    ) -> Self {
        Self {
            journal_repository,
            position_repository,
            fx_resolver,
            calculator: OperationCalculator::new(settings),
            default_view: ValuationView::from_include_liquidity(
                settings.include_liquidity_in_totals,
            ),
            write_lock: Mutex::new(()),
        }
    }
}

impl LedgerService {
    /// Fills the fields a draft may leave to the ledger: the certificate
    /// symbol of a new fixed-term deposit and the entry FX rate.
    fn complete_draft(
        &self,
        mut draft: NewJournalEntry,
        journal: &[JournalEntry],
    ) -> Result<NewJournalEntry> {
        if draft.instrument_type == InstrumentType::FixedTermDeposit
            && draft.operation_kind == OperationKind::Buy
            && draft.resolved_symbol().is_none()
        {
            let symbol = fixed_term_symbol(next_fixed_term_number(journal));
            debug!("Assigning certificate symbol {}", symbol);
            draft.symbol = Some(symbol);
        }

        if draft.fx_rate.is_none() {
            let resolved = self
                .fx_resolver
                .resolve_or_default(draft.date, draft.instrument_type)?;
            draft.fx_rate = Some(resolved.value);
        }
        Ok(draft)
    }

    async fn refresh_positions(&self) -> Result<Vec<Position>> {
        let journal = self.journal_repository.list_entries()?;
        let (positions, warnings) = portfolio::recompute_positions_with_warnings(&journal);
        if !warnings.is_empty() {
            warn!(
                "Position recompute finished with {} data quality warnings",
                warnings.len()
            );
        }
        let stored = self
            .position_repository
            .replace_all(positions.clone())
            .await?;
        debug!("Stored {} positions", stored);
        Ok(positions)
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    fn list_entries(&self) -> Result<Vec<JournalEntry>> {
        self.journal_repository.list_entries()
    }

    fn preview_entry(&self, draft: &NewJournalEntry) -> Result<DerivedAmounts> {
        let journal = self.journal_repository.list_entries()?;
        let draft = self.complete_draft(draft.clone(), &journal)?;
        self.calculator.compute(&draft, &journal)
    }

    async fn record_entry(&self, draft: NewJournalEntry) -> Result<JournalEntry> {
        let _guard = self.write_lock.lock().await;

        let journal = self.journal_repository.list_entries()?;
        let draft = self.complete_draft(draft, &journal)?;
        let amounts = self.calculator.compute(&draft, &journal)?;

        let id = match draft.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                if journal.iter().any(|entry| entry.id == id) {
                    return Err(ValidationError::InvalidInput(format!(
                        "Journal entry {} already exists",
                        id
                    ))
                    .into());
                }
                id.to_string()
            }
            _ => Uuid::new_v4().to_string(),
        };
        let sequence = journal
            .iter()
            .map(|entry| entry.sequence)
            .max()
            .unwrap_or(0)
            + 1;

        let entry = draft.into_entry(id, sequence, amounts, Utc::now());
        let inserted = self.journal_repository.insert_entry(entry).await?;
        debug!(
            "Recorded entry {} ({} {})",
            inserted.id, inserted.operation_kind, inserted.instrument_type
        );

        self.refresh_positions().await?;
        Ok(inserted)
    }

    async fn delete_entry(&self, entry_id: &str) -> Result<JournalEntry> {
        let _guard = self.write_lock.lock().await;

        let deleted = self.journal_repository.delete_entry(entry_id).await?;
        debug!("Deleted entry {}", deleted.id);

        self.refresh_positions().await?;
        Ok(deleted)
    }

    async fn recompute_positions(&self) -> Result<Vec<Position>> {
        let _guard = self.write_lock.lock().await;
        self.refresh_positions().await
    }

    fn positions(&self) -> Result<Vec<Position>> {
        self.position_repository.list_positions()
    }

    fn cash_by_broker(&self, currency: Currency) -> Result<CashByBroker> {
        let journal = self.journal_repository.list_entries()?;
        Ok(portfolio::cash_by_broker(&journal, currency))
    }

    fn holdings_by_broker(&self) -> Result<HoldingsByBroker> {
        let journal = self.journal_repository.list_entries()?;
        Ok(portfolio::holdings_by_broker(&journal))
    }

    fn finished_operations(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<FinishedOperationsReport> {
        let journal = self.journal_repository.list_entries()?;
        Ok(portfolio::finished_operations(&journal, from, to))
    }

    fn valuate(
        &self,
        prices: &dyn MarketPriceLookupTrait,
        valuation_date: NaiveDate,
        view: Option<ValuationView>,
    ) -> Result<ValuationReport> {
        let journal = self.journal_repository.list_entries()?;
        let positions = self.position_repository.list_positions()?;
        let cash_local = portfolio::cash_by_broker(&journal, Currency::Local);
        let cash_hard = portfolio::cash_by_broker(&journal, Currency::Hard);

        portfolio::valuate(
            &positions,
            &cash_local,
            &cash_hard,
            prices,
            &self.fx_resolver,
            valuation_date,
            view.unwrap_or(self.default_view),
        )
    }
}
