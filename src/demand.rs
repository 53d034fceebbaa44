//! Per-stop demand: how many participating students wait at each node.

use crate::model::{PickupPoint, Student};
use std::collections::HashMap;

/// Demand for every node, depot first.
///
/// `demand[0]` is always zero; `demand[i]` counts the participating students
/// assigned to `pickup_points[i - 1]`.
pub fn node_demands(pickup_points: &[PickupPoint], students: &[Student]) -> Vec<i64> {
    let mut per_point: HashMap<u64, i64> = HashMap::new();
    for student in students.iter().filter(|s| s.participates()) {
        if let Some(point_id) = student.pickup_point_id {
            *per_point.entry(point_id).or_insert(0) += 1;
        }
    }

    let mut demands = Vec::with_capacity(pickup_points.len() + 1);
    demands.push(0);
    demands.extend(
        pickup_points
            .iter()
            .map(|point| per_point.get(&point.id).copied().unwrap_or(0)),
    );
    demands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    #[test]
    fn counts_only_participating_students() {
        let points = vec![
            PickupPoint::new(10, 0.0, 0.01, "a"),
            PickupPoint::new(20, 0.0, 0.02, "b"),
        ];
        let mut inactive = Student::new(3, 10);
        inactive.status = Status::Inactive;
        let students = vec![Student::new(1, 10), Student::new(2, 10), inactive];

        assert_eq!(node_demands(&points, &students), vec![0, 2, 0]);
    }
}
