//! Calendar-driven reading plan: one chapter per day, walking the canon in order.
//!
//! Day 0 of the plan reads the first chapter of the first book. Once the last chapter of the
//! canon has been read the plan starts over, so the mapping is periodic with a period of
//! [`Canon::total_chapters`] days. Days before the start preview the first chapter.

use chrono::{Local, NaiveDate};
use log::trace;

use super::canon::Canon;
use super::types::models::ChapterReference;

/// Maps a day index (days since the plan started) onto a chapter, wrapping around the canon.
pub fn chapter_at_offset(canon: &Canon, day_index: u64) -> ChapterReference {
    let mut remaining = day_index % canon.total_chapters();
    for (book, chapters) in canon.books() {
        let chapters = u64::from(*chapters);
        if remaining < chapters {
            return ChapterReference::new(*book, remaining as u32 + 1);
        }
        remaining -= chapters;
    }
    // `remaining < total_chapters` guarantees the loop returns.
    unreachable!("day index wrapped past the end of the canon")
}

/// Chapter assigned to `date` by a plan that began on `start`.
///
/// Dates are calendar days, so there is no time-of-day component to drift across a timezone
/// boundary. Any `date` before `start` yields the first chapter of the canon.
pub fn get_chapter_for_date(date: NaiveDate, start: NaiveDate, canon: &Canon) -> ChapterReference {
    let days = date.signed_duration_since(start).num_days();
    if days < 0 {
        trace!("{} precedes plan start {}; previewing first chapter", date, start);
        return ChapterReference::new(canon.first_book(), 1);
    }
    chapter_at_offset(canon, days as u64)
}

/// A reading plan anchored at a start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingPlan {
    canon: Canon,
    start: NaiveDate,
}

impl ReadingPlan {
    pub fn new(canon: Canon, start: NaiveDate) -> Self {
        Self { canon, start }
    }

    pub fn canon(&self) -> &Canon {
        &self.canon
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Whole days between the plan start and `date`; negative before the start.
    pub fn days_elapsed(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.start).num_days()
    }

    /// One-based day of the plan. Dates before the start count as day 1, matching
    /// the chapter [`chapter_for`](Self::chapter_for) previews for them.
    pub fn day_number(&self, date: NaiveDate) -> i64 {
        self.days_elapsed(date).max(0) + 1
    }

    pub fn chapter_for(&self, date: NaiveDate) -> ChapterReference {
        get_chapter_for_date(date, self.start, &self.canon)
    }

    /// Chapter for the current local calendar day.
    pub fn today(&self) -> ChapterReference {
        self.chapter_for(Local::now().date_naive())
    }
}
