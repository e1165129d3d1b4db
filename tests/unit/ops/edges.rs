use super::*;

fn vertical_step(w: u32, h: u32, split: u32) -> Plane {
    let mut data = Vec::with_capacity((w * h) as usize);
    for _ in 0..h {
        for x in 0..w {
            data.push(if x < split { 0 } else { 255 });
        }
    }
    Plane::new(w, h, data).unwrap()
}

#[test]
fn flat_plane_has_no_edges() {
    let plane = Plane::filled(16, 16, 90).unwrap();
    let edges = canny(&plane, 50.0, 150.0).unwrap();
    assert!(edges.data().iter().all(|&v| v == 0));
}

#[test]
fn vertical_step_yields_a_thin_vertical_edge() {
    let plane = vertical_step(16, 12, 8);
    let edges = canny(&plane, 100.0, 200.0).unwrap();

    assert!(edges.data().iter().all(|&v| v == 0 || v == 255));
    for y in 0..12 {
        let on: Vec<u32> = (0..16).filter(|&x| edges.get(x, y) == 255).collect();
        assert_eq!(on.len(), 1, "row {y}: {on:?}");
        assert!(on[0] == 7 || on[0] == 8);
    }
}

#[test]
fn high_threshold_above_gradient_suppresses_everything() {
    let plane = vertical_step(8, 8, 4);
    let edges = canny(&plane, 10.0, 5000.0).unwrap();
    assert!(edges.data().iter().all(|&v| v == 0));
}

#[test]
fn reversed_thresholds_are_swapped() {
    let plane = vertical_step(10, 6, 5);
    let a = canny(&plane, 100.0, 200.0).unwrap();
    let b = canny(&plane, 200.0, 100.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn negative_thresholds_are_rejected() {
    let plane = Plane::filled(4, 4, 0).unwrap();
    assert!(canny(&plane, -1.0, 10.0).is_err());
}
