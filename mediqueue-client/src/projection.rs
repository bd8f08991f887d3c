//! Queue projection
//!
//! Pure transformation from the flat active-turn list into one display
//! row per area. No I/O, no input mutation; recomputed from scratch on
//! every poll tick (the snapshot is a rebuild, not an incremental patch).

use shared::{Area, Turn, TurnStatus};

/// Display row for one area
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRow {
    pub area: Area,
    /// The turn shown front and center, if any
    pub current: Option<Turn>,
    /// Active turns behind the current one
    pub waiting_count: usize,
    /// Remaining active turns excluding `current`, ascending by number
    pub queue: Vec<Turn>,
}

impl QueueRow {
    /// Prefixed label for the current turn, e.g. "C5"
    pub fn current_label(&self) -> Option<String> {
        self.current
            .as_ref()
            .map(|t| self.area.ticket_label(t.number))
    }
}

/// Project the active-turn list onto every area, preserving area order
pub fn project(areas: &[Area], turns: &[Turn]) -> Vec<QueueRow> {
    areas.iter().map(|area| project_area(area, turns)).collect()
}

/// Project one area's row from the flat turn list
///
/// A turn actively being called always outranks a merely-waiting turn,
/// regardless of number; within each status, lowest number first. An
/// area with no active turns yields an empty row, never an error.
pub fn project_area(area: &Area, turns: &[Turn]) -> QueueRow {
    let mut calling: Vec<Turn> = Vec::new();
    let mut waiting: Vec<Turn> = Vec::new();

    for turn in turns.iter().filter(|t| t.area_id == area.id) {
        match turn.status {
            TurnStatus::Calling => calling.push(turn.clone()),
            TurnStatus::Waiting => waiting.push(turn.clone()),
            _ => {}
        }
    }

    calling.sort_by_key(|t| t.number);
    waiting.sort_by_key(|t| t.number);

    let total_active = calling.len() + waiting.len();

    let current = if !calling.is_empty() {
        Some(calling.remove(0))
    } else if !waiting.is_empty() {
        Some(waiting.remove(0))
    } else {
        None
    };

    let mut queue: Vec<Turn> = calling;
    queue.append(&mut waiting);
    queue.sort_by_key(|t| t.number);

    QueueRow {
        area: area.clone(),
        waiting_count: total_active - usize::from(current.is_some()),
        current,
        queue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(id: &str, letter: &str) -> Area {
        Area {
            id: id.to_string(),
            name: format!("Area {}", id),
            letter_code: letter.to_string(),
            color: None,
            icon: None,
        }
    }

    fn turn(id: &str, number: i64, status: TurnStatus, area_id: &str) -> Turn {
        Turn {
            id: id.to_string(),
            number,
            status,
            area_id: area_id.to_string(),
            office_id: None,
            created_at: None,
        }
    }

    #[test]
    fn test_calling_outranks_lower_waiting_number() {
        let a = area("a1", "C");
        let turns = vec![
            turn("t1", 7, TurnStatus::Calling, "a1"),
            turn("t2", 3, TurnStatus::Waiting, "a1"),
        ];

        let row = project_area(&a, &turns);
        assert_eq!(row.current.as_ref().map(|t| t.number), Some(7));
        assert_eq!(row.waiting_count, 1);
        assert_eq!(row.queue.iter().map(|t| t.number).collect::<Vec<_>>(), [3]);
    }

    #[test]
    fn test_lowest_number_within_status() {
        let a = area("a1", "C");
        let turns = vec![
            turn("t1", 9, TurnStatus::Waiting, "a1"),
            turn("t2", 4, TurnStatus::Waiting, "a1"),
            turn("t3", 6, TurnStatus::Waiting, "a1"),
        ];

        let row = project_area(&a, &turns);
        assert_eq!(row.current.as_ref().map(|t| t.number), Some(4));
        assert_eq!(
            row.queue.iter().map(|t| t.number).collect::<Vec<_>>(),
            [6, 9]
        );
    }

    #[test]
    fn test_waiting_count_invariant() {
        let a = area("a1", "C");
        let turns = vec![
            turn("t1", 1, TurnStatus::Calling, "a1"),
            turn("t2", 2, TurnStatus::Waiting, "a1"),
            turn("t3", 3, TurnStatus::Waiting, "a1"),
            turn("t4", 4, TurnStatus::Attended, "a1"),
        ];

        let row = project_area(&a, &turns);
        let active = 3;
        assert_eq!(row.waiting_count, active - 1);
    }

    #[test]
    fn test_empty_area() {
        let a = area("a1", "C");
        let row = project_area(&a, &[]);
        assert_eq!(row.current, None);
        assert_eq!(row.waiting_count, 0);
        assert!(row.queue.is_empty());
    }

    #[test]
    fn test_inactive_statuses_ignored() {
        let a = area("a1", "C");
        let turns = vec![
            turn("t1", 1, TurnStatus::Attended, "a1"),
            turn("t2", 2, TurnStatus::Cancelled, "a1"),
            turn("t3", 3, TurnStatus::NoShow, "a1"),
        ];

        let row = project_area(&a, &turns);
        assert_eq!(row.current, None);
        assert_eq!(row.waiting_count, 0);
    }

    #[test]
    fn test_projection_is_pure() {
        let areas = vec![area("a1", "C"), area("a2", "R")];
        let turns = vec![
            turn("t1", 2, TurnStatus::Waiting, "a1"),
            turn("t2", 1, TurnStatus::Waiting, "a2"),
        ];
        let before = turns.clone();

        let first = project(&areas, &turns);
        let second = project(&areas, &turns);

        assert_eq!(first, second);
        assert_eq!(turns, before);
    }

    #[test]
    fn test_turns_from_other_areas_excluded() {
        let a = area("a1", "C");
        let turns = vec![
            turn("t1", 1, TurnStatus::Waiting, "a2"),
            turn("t2", 5, TurnStatus::Waiting, "a1"),
        ];

        let row = project_area(&a, &turns);
        assert_eq!(row.current.as_ref().map(|t| t.number), Some(5));
        assert_eq!(row.waiting_count, 0);
    }

    #[test]
    fn test_current_label() {
        let a = area("a1", "C");
        let turns = vec![turn("t1", 5, TurnStatus::Calling, "a1")];
        let row = project_area(&a, &turns);
        assert_eq!(row.current_label().as_deref(), Some("C5"));
    }
}
