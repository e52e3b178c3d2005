//! Distribution of ring items around a full circle.
//!
//! Angles are in degrees, clockwise, with 0 pointing up.

/// Resolves one angle per item. `Some` pins an item, modulo a full turn; `None`
/// leaves it free.
///
/// Each pinned item opens an arc that ends at the next pinned angle going
/// clockwise. The free items following a pinned one (in input order, wrapping
/// around) share that arc with equal spacing. Without any pins the first item
/// is placed at 0°.
pub fn compute_item_angles(fixed: &[Option<f64>]) -> Vec<f64> {
    let count = fixed.len();
    if count == 0 {
        return Vec::new();
    }

    let mut pins: Vec<(usize, f64)> = fixed
        .iter()
        .enumerate()
        .filter_map(|(i, angle)| angle.map(|a| (i, a.rem_euclid(360.0))))
        .collect();

    if pins.is_empty() {
        pins.push((0, 0.0));
    }

    let next_clockwise = clockwise_successors(&pins);
    let mut angles = vec![0.0; count];

    for (k, &(index, begin)) in pins.iter().enumerate() {
        angles[index] = begin;

        let next_index = pins[(k + 1) % pins.len()].0;
        let gap = (next_index + count - index - 1) % count;
        if gap == 0 {
            continue;
        }

        let successor = next_clockwise[k];
        let span = if successor == k {
            360.0
        } else {
            (pins[successor].1 - begin).rem_euclid(360.0)
        };

        let step = span / (gap + 1) as f64;
        for j in 1..=gap {
            angles[(index + j) % count] = (begin + step * j as f64).rem_euclid(360.0);
        }
    }

    angles
}

/// For every pin, the position (in `pins`) of the pin that follows it clockwise.
fn clockwise_successors(pins: &[(usize, f64)]) -> Vec<usize> {
    let mut by_angle: Vec<usize> = (0..pins.len()).collect();
    by_angle.sort_by(|&a, &b| pins[a].1.total_cmp(&pins[b].1));

    let mut successors = vec![0; pins.len()];
    for (k, &pin) in by_angle.iter().enumerate() {
        successors[pin] = by_angle[(k + 1) % by_angle.len()];
    }
    successors
}
