use crate::models::JobInstanceDraft;

/// Hand out employees to drafts in strict rotation.
///
/// Drafts are put in `scheduled_for` order first; draft `i` then gets
/// `employee_ids[i % employee_ids.len()]`. Every call starts the rotation at
/// the first employee. An empty roster leaves every draft unassigned.
/// Availability is not consulted here.
pub fn assign(mut drafts: Vec<JobInstanceDraft>, employee_ids: &[i32]) -> Vec<JobInstanceDraft> {
    drafts.sort_by_key(|draft| draft.scheduled_for);

    if employee_ids.is_empty() {
        for draft in &mut drafts {
            draft.assigned_employee_id = None;
        }
        return drafts;
    }

    for (draft, employee_id) in drafts.iter_mut().zip(employee_ids.iter().cycle()) {
        draft.assigned_employee_id = Some(*employee_id);
    }
    drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashMap;

    fn drafts(count: i64) -> Vec<JobInstanceDraft> {
        let base = Utc.with_ymd_and_hms(2026, 11, 2, 9, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let start = base + Duration::days(i);
                JobInstanceDraft {
                    scheduled_for: start,
                    scheduled_end: start + Duration::hours(2),
                    tasks: vec![],
                    assigned_employee_id: None,
                    source_contract_id: 1,
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_roster_leaves_drafts_unassigned() {
        let assigned = assign(drafts(5), &[]);
        assert_eq!(assigned.len(), 5);
        assert!(assigned.iter().all(|d| d.assigned_employee_id.is_none()));
    }

    #[test]
    fn test_rotation_follows_roster_order() {
        let assigned = assign(drafts(5), &[30, 10, 20]);
        let ids: Vec<_> = assigned.iter().map(|d| d.assigned_employee_id).collect();
        assert_eq!(ids, vec![Some(30), Some(10), Some(20), Some(30), Some(10)]);
    }

    #[test]
    fn test_rotation_uses_chronological_position() {
        let mut shuffled = drafts(4);
        shuffled.reverse();

        let assigned = assign(shuffled, &[1, 2]);
        for pair in assigned.windows(2) {
            assert!(pair[0].scheduled_for < pair[1].scheduled_for);
        }
        let ids: Vec<_> = assigned.iter().map(|d| d.assigned_employee_id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(1), Some(2)]);
    }

    #[test]
    fn test_load_is_balanced() {
        for (n, roster) in [(12, vec![1, 2, 3]), (13, vec![1, 2, 3, 4, 5]), (24, vec![7, 8, 9, 10, 11, 12, 13])] {
            let assigned = assign(drafts(n), &roster);

            let mut counts: HashMap<i32, i64> = HashMap::new();
            for draft in &assigned {
                *counts.entry(draft.assigned_employee_id.unwrap()).or_default() += 1;
            }

            let k = roster.len() as i64;
            let (floor, ceil) = (n / k, (n + k - 1) / k);
            assert_eq!(counts.len(), roster.len());
            for count in counts.values() {
                assert!(*count == floor || *count == ceil, "{count} not in [{floor}, {ceil}]");
            }
        }
    }
}
