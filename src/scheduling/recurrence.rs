use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, Utc};

use super::{Minutes, ScheduleError};
use crate::models::{JobInstanceDraft, ScheduleDayTemplate};

/// Input for one generation call. Built per request and thrown away after.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub contract_id: i32,
    pub weeks_ahead: i64,
    pub schedule_days: Vec<ScheduleDayTemplate>,
    /// Rotation order for the assigner
    pub employee_ids: Vec<i32>,
    pub default_start_time: NaiveTime,
    pub default_duration: Minutes,
}

/// Expand a contract's weekly template into dated job drafts.
///
/// The horizon is `weeks_ahead` whole weeks starting on the Monday of the
/// week containing `now`. Occurrences that start before `now`, fall before
/// `contract_start`, or fall on or after `contract_end` are left out, so the
/// first week only yields the days that are still ahead.
///
/// The returned iterator is lazy and pure: cloning it restarts the
/// sequence, and the same arguments always produce the same drafts in
/// ascending `scheduled_for` order.
pub fn expand(
    request: &GenerationRequest,
    contract_start: NaiveDate,
    contract_end: Option<NaiveDate>,
    now: DateTime<FixedOffset>,
) -> Result<Occurrences<'_>, ScheduleError> {
    if request.schedule_days.is_empty() {
        return Err(ScheduleError::EmptySchedule);
    }
    if request.weeks_ahead <= 0 {
        return Err(ScheduleError::NonPositiveHorizon(request.weeks_ahead));
    }

    let mut templates: [Option<&ScheduleDayTemplate>; 7] = [None; 7];
    for template in &request.schedule_days {
        let slot = &mut templates[template.day.index()];
        if slot.is_some() {
            return Err(ScheduleError::DuplicateDay(template.day));
        }
        *slot = Some(template);
    }

    let today = now.date_naive();
    let week_start = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
    let horizon_days = (request.weeks_ahead as u64).saturating_mul(7);
    let horizon_end = week_start
        .checked_add_days(Days::new(horizon_days))
        .unwrap_or(NaiveDate::MAX);

    Ok(Occurrences {
        request,
        templates,
        offset: *now.offset(),
        not_before: now.with_timezone(&Utc),
        cursor: week_start,
        horizon_end,
        contract_start,
        contract_end,
    })
}

#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    request: &'a GenerationRequest,
    templates: [Option<&'a ScheduleDayTemplate>; 7],
    offset: FixedOffset,
    not_before: DateTime<Utc>,
    cursor: NaiveDate,
    horizon_end: NaiveDate,
    contract_start: NaiveDate,
    contract_end: Option<NaiveDate>,
}

impl Occurrences<'_> {
    fn draft_for(&self, date: NaiveDate, template: &ScheduleDayTemplate) -> Option<JobInstanceDraft> {
        let start_time = template.start_time.unwrap_or(self.request.default_start_time);
        let duration = template.duration_minutes.unwrap_or(self.request.default_duration);

        let scheduled_for = date
            .and_time(start_time)
            .and_local_timezone(self.offset)
            .single()?
            .with_timezone(&Utc);

        Some(JobInstanceDraft {
            scheduled_for,
            scheduled_end: scheduled_for + duration.as_duration(),
            tasks: template.tasks.clone(),
            assigned_employee_id: None,
            source_contract_id: self.request.contract_id,
        })
    }
}

impl Iterator for Occurrences<'_> {
    type Item = JobInstanceDraft;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.horizon_end {
            let date = self.cursor;
            self.cursor = date.succ_opt().unwrap_or(self.horizon_end);

            if self.contract_end.is_some_and(|end| date >= end) {
                self.cursor = self.horizon_end;
                return None;
            }
            if date < self.contract_start {
                continue;
            }

            let Some(template) = self.templates[date.weekday().num_days_from_monday() as usize] else {
                continue;
            };

            match self.draft_for(date, template) {
                Some(draft) if draft.scheduled_for >= self.not_before => return Some(draft),
                _ => continue,
            }
        }
        None
    }
}
