//! Target observations and robot offset-point bookkeeping.
//!
//! Advanced pipelines can store one or two reference points taken from a
//! live target; downstream pose estimation reads them back to correct
//! target-relative measurements. The calculator here is pure: it maps the
//! current mode, stored points, requested operation, and latest observation
//! (if any) to the next stored points.

use serde::{Deserialize, Serialize};

use crate::types::{Point, ordinal_enum};

ordinal_enum! {
    /// How many offset reference points the pipeline tracks.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum RobotOffsetMode {
        #[default]
        Off,
        Single,
        Dual,
    }
}

ordinal_enum! {
    /// Offset bookkeeping request carried by the `robotOffsetPoint` command.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum OffsetPointOperation {
        Clear,
        TakeSingle,
        TakeFirstDual,
        TakeSecondDual,
    }
}

/// The most recent detected target, reduced to what offset bookkeeping needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObservedTarget {
    pub offset_point: Point,
    pub area: f64,
}

/// Stored offset reference points for one advanced pipeline.
///
/// Dual mode keeps the observed area alongside each point so downstream
/// logic can weight the two points against each other.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OffsetPoints {
    pub single: Point,
    pub dual_a: Point,
    pub dual_a_area: f64,
    pub dual_b: Point,
    pub dual_b_area: f64,
}

/// Compute the next stored offset points.
///
/// Clearing applies whether or not a target is visible. Take operations
/// require a visible target and are otherwise a no-op, as is any operation
/// that does not match the configured mode.
pub fn next_offset_points(
    mode: RobotOffsetMode,
    current: OffsetPoints,
    op: OffsetPointOperation,
    target: Option<&ObservedTarget>,
) -> OffsetPoints {
    let mut next = current;
    match (mode, op) {
        (RobotOffsetMode::Single, OffsetPointOperation::Clear) => {
            next.single = Point::ZERO;
        }
        (RobotOffsetMode::Single, OffsetPointOperation::TakeSingle) => {
            if let Some(target) = target {
                next.single = target.offset_point;
            }
        }
        (RobotOffsetMode::Dual, OffsetPointOperation::Clear) => {
            next.dual_a = Point::ZERO;
            next.dual_a_area = 0.0;
            next.dual_b = Point::ZERO;
            next.dual_b_area = 0.0;
        }
        (RobotOffsetMode::Dual, OffsetPointOperation::TakeFirstDual) => {
            if let Some(target) = target {
                next.dual_a = target.offset_point;
                next.dual_a_area = target.area;
            }
        }
        (RobotOffsetMode::Dual, OffsetPointOperation::TakeSecondDual) => {
            if let Some(target) = target {
                next.dual_b = target.offset_point;
                next.dual_b_area = target.area;
            }
        }
        _ => {}
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_at(x: f64, y: f64, area: f64) -> ObservedTarget {
        ObservedTarget {
            offset_point: Point::new(x, y),
            area,
        }
    }

    #[test]
    fn clear_single_without_target() {
        let current = OffsetPoints {
            single: Point::new(12.0, 34.0),
            ..OffsetPoints::default()
        };
        let next = next_offset_points(
            RobotOffsetMode::Single,
            current,
            OffsetPointOperation::Clear,
            None,
        );
        assert_eq!(next.single, Point::ZERO);
    }

    #[test]
    fn take_single_without_target_is_noop() {
        let current = OffsetPoints {
            single: Point::new(12.0, 34.0),
            ..OffsetPoints::default()
        };
        let next = next_offset_points(
            RobotOffsetMode::Single,
            current,
            OffsetPointOperation::TakeSingle,
            None,
        );
        assert_eq!(next, current);
    }

    #[test]
    fn take_single_stores_target_point() {
        let next = next_offset_points(
            RobotOffsetMode::Single,
            OffsetPoints::default(),
            OffsetPointOperation::TakeSingle,
            Some(&target_at(100.0, 50.0, 4.2)),
        );
        assert_eq!(next.single, Point::new(100.0, 50.0));
    }

    #[test]
    fn dual_takes_store_point_and_area() {
        let first = next_offset_points(
            RobotOffsetMode::Dual,
            OffsetPoints::default(),
            OffsetPointOperation::TakeFirstDual,
            Some(&target_at(10.0, 20.0, 1.5)),
        );
        assert_eq!(first.dual_a, Point::new(10.0, 20.0));
        assert_eq!(first.dual_a_area, 1.5);

        let second = next_offset_points(
            RobotOffsetMode::Dual,
            first,
            OffsetPointOperation::TakeSecondDual,
            Some(&target_at(30.0, 40.0, 2.5)),
        );
        assert_eq!(second.dual_a, Point::new(10.0, 20.0));
        assert_eq!(second.dual_b, Point::new(30.0, 40.0));
        assert_eq!(second.dual_b_area, 2.5);
    }

    #[test]
    fn clear_dual_resets_points_and_areas() {
        let populated = OffsetPoints {
            dual_a: Point::new(1.0, 2.0),
            dual_a_area: 3.0,
            dual_b: Point::new(4.0, 5.0),
            dual_b_area: 6.0,
            ..OffsetPoints::default()
        };
        let next = next_offset_points(
            RobotOffsetMode::Dual,
            populated,
            OffsetPointOperation::Clear,
            None,
        );
        assert_eq!(next, OffsetPoints::default());
    }

    #[test]
    fn off_mode_ignores_everything() {
        let current = OffsetPoints {
            single: Point::new(7.0, 7.0),
            ..OffsetPoints::default()
        };
        let next = next_offset_points(
            RobotOffsetMode::Off,
            current,
            OffsetPointOperation::TakeSingle,
            Some(&target_at(1.0, 1.0, 1.0)),
        );
        assert_eq!(next, current);
    }

    #[test]
    fn mismatched_mode_and_operation_is_noop() {
        let current = OffsetPoints::default();
        let next = next_offset_points(
            RobotOffsetMode::Single,
            current,
            OffsetPointOperation::TakeFirstDual,
            Some(&target_at(1.0, 1.0, 1.0)),
        );
        assert_eq!(next, current);
    }
}
