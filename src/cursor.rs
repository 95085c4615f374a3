//! Date Cursor
//!
//! The single selected date driving every displayed number and chart.
//! Always a member of the dataset's date axis: `set` rejects anything else,
//! `step` clamps at both ends.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::dataset::parse_date;

/// Direction of a one-day step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "previous" | "prev" | "back" => Ok(Direction::Previous),
            "next" | "forward" => Ok(Direction::Next),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// Errors raised by cursor operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    /// Date is not one of the known dates
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Selected date over an immutable, ordered date axis
#[derive(Debug, Clone)]
pub struct DateCursor {
    ordered_dates: Arc<[NaiveDate]>,
    index: usize,
}

impl DateCursor {
    /// Cursor positioned on the last date
    ///
    /// Returns `None` for an empty date axis.
    pub fn new(ordered_dates: Arc<[NaiveDate]>) -> Option<Self> {
        let index = ordered_dates.len().checked_sub(1)?;
        Some(Self {
            ordered_dates,
            index,
        })
    }

    /// Cursor positioned on a given date
    pub fn at(ordered_dates: Arc<[NaiveDate]>, date: NaiveDate) -> Result<Self, CursorError> {
        let mut cursor = Self::new(ordered_dates)
            .ok_or_else(|| CursorError::InvalidDate(date.to_string()))?;
        cursor.set(date)?;
        Ok(cursor)
    }

    pub fn current(&self) -> NaiveDate {
        self.ordered_dates[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn first(&self) -> NaiveDate {
        self.ordered_dates[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.ordered_dates[self.ordered_dates.len() - 1]
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.ordered_dates
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.ordered_dates.len()
    }

    /// Jump to a date
    ///
    /// Fails without moving if the date is not on the axis.
    pub fn set(&mut self, date: NaiveDate) -> Result<(), CursorError> {
        let index = self
            .ordered_dates
            .iter()
            .position(|d| *d == date)
            .ok_or_else(|| CursorError::InvalidDate(date.to_string()))?;
        self.index = index;
        Ok(())
    }

    /// Jump to a date given as text (`YYYY-MM-DD`, optional `T...` suffix)
    pub fn set_str(&mut self, date: &str) -> Result<(), CursorError> {
        let parsed = parse_date(date).map_err(|_| CursorError::InvalidDate(date.to_string()))?;
        self.set(parsed)
    }

    /// Move one day; a step past either end is a no-op
    ///
    /// Returns whether the cursor moved.
    pub fn step(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Previous if self.index > 0 => {
                self.index -= 1;
                true
            }
            Direction::Next if self.index + 1 < self.ordered_dates.len() => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }
}
