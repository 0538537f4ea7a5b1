use crate::model::{FULL_CIRCLE, Item};

/// Wraps any angle in degrees into `0..360`.
pub fn normalize(degrees: i32) -> i32 {
    degrees.rem_euclid(FULL_CIRCLE)
}

/// The angle on the unrotated wheel that currently sits under the pointer.
pub fn effective_angle(rotation: i32, pointer_angle: i32) -> i32 {
    normalize(pointer_angle + rotation)
}

/// Finds the slice under the pointer.
///
/// Spans are inclusive on both ends, so an angle on a shared boundary resolves to the
/// lower-indexed slice. Returns `None` when there are no items.
pub fn resolve_current_item(rotation: i32, pointer_angle: i32, items: &[Item]) -> Option<usize> {
    let angle = effective_angle(rotation, pointer_angle);
    items.iter().position(|it| it.contains_angle(angle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SliceModel;
    use palette::Srgba;

    fn model(count: usize) -> SliceModel {
        let mut model = SliceModel::default();
        let color = Srgba::new(10, 20, 30, 255);
        for i in 0..count {
            model.add_item(format!("item {}", i), 1.0, color, color).unwrap();
        }
        model
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(0), 0);
        assert_eq!(normalize(360), 0);
        assert_eq!(normalize(725), 5);
        assert_eq!(normalize(-1), 359);
        assert_eq!(normalize(-721), 359);
    }

    #[test]
    fn test_pointer_at_135_selects_middle_of_three() {
        let model = model(3);
        assert_eq!(resolve_current_item(0, 135, model.items()), Some(1));
        assert_eq!(resolve_current_item(120, 135, model.items()), Some(2));
        assert_eq!(resolve_current_item(-135, 135, model.items()), Some(0));
    }

    #[test]
    fn test_shared_boundary_goes_to_lower_index() {
        let model = model(3);
        assert_eq!(resolve_current_item(0, 120, model.items()), Some(0));
        assert_eq!(resolve_current_item(0, 240, model.items()), Some(1));
        assert_eq!(resolve_current_item(0, 0, model.items()), Some(0));
    }

    #[test]
    fn test_resolution_is_pure_and_periodic() {
        let model = model(7);
        for rotation in -400..400 {
            let first = resolve_current_item(rotation, 45, model.items());
            assert_eq!(first, resolve_current_item(rotation, 45, model.items()));
            assert_eq!(first, resolve_current_item(rotation + 360, 45, model.items()));
            assert!(first.is_some());
        }
    }

    #[test]
    fn test_empty_items_have_no_selection() {
        assert_eq!(resolve_current_item(10, 135, &[]), None);
    }
}
