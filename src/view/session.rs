//! Dashboard session
//!
//! Owns the date cursor, the only mutable application state, and the view
//! last committed for it. Every cursor change computes a complete new view
//! before anything is committed, then notifies subscribers over a tokio
//! broadcast channel.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::snapshot::DashboardView;
use super::{ViewError, ViewResult};
use crate::charts::ChartStyle;
use crate::cursor::{CursorError, DateCursor, Direction};
use crate::dataset::{parse_date, Dataset, DatasetError};

/// Default capacity of the update channel
pub const DEFAULT_UPDATE_CAPACITY: usize = 64;

/// Notification sent on every commit
#[derive(Debug, Clone)]
pub struct ViewUpdate {
    /// Increases by one per commit
    pub sequence: u64,
    pub view: Arc<DashboardView>,
}

/// Open/closed state of the map's info popover
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoPopover {
    is_open: bool,
}

impl InfoPopover {
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flip and return the new state
    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }
}

/// Cursor plus its committed view
pub struct DashboardSession {
    dataset: Arc<Dataset>,
    style: Arc<ChartStyle>,
    cursor: DateCursor,
    view: Arc<DashboardView>,
    sequence: u64,
    popover: InfoPopover,
    updates: broadcast::Sender<ViewUpdate>,
}

impl DashboardSession {
    /// Session positioned on the most recent date
    pub fn new(dataset: Arc<Dataset>, style: Arc<ChartStyle>) -> ViewResult<Self> {
        Self::with_capacity(dataset, style, DEFAULT_UPDATE_CAPACITY)
    }

    pub fn with_capacity(
        dataset: Arc<Dataset>,
        style: Arc<ChartStyle>,
        capacity: usize,
    ) -> ViewResult<Self> {
        let cursor = DateCursor::new(dataset.shared_dates()).ok_or(DatasetError::Empty)?;
        let view = Arc::new(DashboardView::compute(&dataset, &style, cursor.current())?);
        let (updates, _) = broadcast::channel(capacity.max(1));

        Ok(Self {
            dataset,
            style,
            cursor,
            view,
            sequence: 0,
            popover: InfoPopover::default(),
            updates,
        })
    }

    pub fn current_date(&self) -> NaiveDate {
        self.cursor.current()
    }

    pub fn cursor(&self) -> &DateCursor {
        &self.cursor
    }

    /// Last committed view
    pub fn view(&self) -> Arc<DashboardView> {
        Arc::clone(&self.view)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn style(&self) -> &Arc<ChartStyle> {
        &self.style
    }

    /// Receive one `ViewUpdate` per future commit
    pub fn subscribe(&self) -> broadcast::Receiver<ViewUpdate> {
        self.updates.subscribe()
    }

    /// Jump to a date and commit its view
    ///
    /// An unknown date fails with `InvalidDate` and changes nothing.
    pub fn set(&mut self, date: NaiveDate) -> ViewResult<Arc<DashboardView>> {
        let mut next = self.cursor.clone();
        next.set(date)?;
        self.commit(next)
    }

    /// Jump to a date given as text
    pub fn set_str(&mut self, date: &str) -> ViewResult<Arc<DashboardView>> {
        let parsed = parse_date(date).map_err(|_| CursorError::InvalidDate(date.to_string()))?;
        self.set(parsed)
    }

    /// Move one day and commit; at either end nothing is committed
    pub fn step(&mut self, direction: Direction) -> ViewResult<Arc<DashboardView>> {
        let mut next = self.cursor.clone();
        if !next.step(direction) {
            tracing::debug!(date = %self.cursor.current(), ?direction, "Cursor at boundary");
            return Ok(self.view());
        }
        self.commit(next)
    }

    pub fn popover_open(&self) -> bool {
        self.popover.is_open()
    }

    pub fn toggle_popover(&mut self) -> bool {
        self.popover.toggle()
    }

    fn commit(&mut self, next: DateCursor) -> ViewResult<Arc<DashboardView>> {
        let view = Arc::new(DashboardView::compute(
            &self.dataset,
            &self.style,
            next.current(),
        )?);

        self.cursor = next;
        self.view = Arc::clone(&view);
        self.sequence += 1;

        tracing::debug!(date = %view.date, sequence = self.sequence, "View committed");

        // no subscribers is fine
        let _ = self.updates.send(ViewUpdate {
            sequence: self.sequence,
            view: Arc::clone(&view),
        });

        Ok(view)
    }
}

impl std::fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSession")
            .field("date", &self.cursor.current())
            .field("sequence", &self.sequence)
            .field("popover", &self.popover)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{dataset, day};

    fn session() -> DashboardSession {
        DashboardSession::new(dataset(), Arc::new(ChartStyle::default())).unwrap()
    }

    #[test]
    fn test_starts_at_last_date() {
        let s = session();
        assert_eq!(s.current_date(), day(24));
        assert_eq!(s.view().date, day(24));
        assert_eq!(s.sequence(), 0);
    }

    #[test]
    fn test_set_commits_new_view() {
        let mut s = session();
        let view = s.set(day(23)).unwrap();

        assert_eq!(view.date, day(23));
        assert_eq!(view.totals.confirmed, 654);
        assert_eq!(s.current_date(), day(23));
        assert_eq!(s.view().date, day(23));
        assert_eq!(s.sequence(), 1);
    }

    #[test]
    fn test_set_invalid_leaves_state() {
        let mut s = session();
        s.set(day(23)).unwrap();

        let err = s.set_str("not-a-real-date").unwrap_err();
        assert!(matches!(err, ViewError::Cursor(CursorError::InvalidDate(_))));
        assert!(s.set(day(30)).is_err());

        assert_eq!(s.current_date(), day(23));
        assert_eq!(s.view().date, day(23));
        assert_eq!(s.sequence(), 1);
    }

    #[test]
    fn test_step_at_boundary_does_not_commit() {
        let mut s = session();
        let view = s.step(Direction::Next).unwrap();
        assert_eq!(view.date, day(24));
        assert_eq!(s.sequence(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_notified_per_commit() {
        let mut s = session();
        let mut rx = s.subscribe();

        s.step(Direction::Previous).unwrap();
        s.step(Direction::Previous).unwrap();
        // clamped, no notification
        s.step(Direction::Previous).unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(first.view.date, day(23));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.sequence, 2);
        assert_eq!(second.view.date, day(22));
        assert!(second.view.cards.iter().all(|c| c.change == "+0"));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_set_current_date_republishes() {
        let mut s = session();
        let mut rx = s.subscribe();

        s.set(day(24)).unwrap();
        assert_eq!(s.sequence(), 1);
        assert_eq!(rx.try_recv().unwrap().view.date, day(24));
    }

    #[test]
    fn test_popover_toggle() {
        let mut s = session();
        assert!(!s.popover_open());
        assert!(s.toggle_popover());
        assert!(!s.toggle_popover());
    }
}
