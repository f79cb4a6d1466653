use super::*;

const ALL: [Ease; 4] = [
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InQuint,
    Ease::OutQuint,
];

#[test]
fn endpoints_are_fixed() {
    for e in ALL {
        assert_eq!(e.apply(0.0), 0.0, "{e:?}");
        assert_eq!(e.apply(1.0), 1.0, "{e:?}");
    }
}

#[test]
fn input_is_clamped() {
    for e in ALL {
        assert_eq!(e.apply(-0.5), 0.0);
        assert_eq!(e.apply(1.5), 1.0);
    }
}

#[test]
fn known_values() {
    assert!((Ease::InQuad.apply(0.5) - 0.25).abs() < 1e-12);
    assert!((Ease::OutQuad.apply(0.5) - 0.75).abs() < 1e-12);
    assert!((Ease::InQuint.apply(0.5) - 0.03125).abs() < 1e-12);
    assert!((Ease::OutQuint.apply(0.5) - 0.96875).abs() < 1e-12);
}

#[test]
fn mirrored_reflects_through_center() {
    for e in ALL {
        let m = e.mirrored();
        for i in 0..=20 {
            let t = f64::from(i) / 20.0;
            assert!(
                (m.apply(t) - (1.0 - e.apply(1.0 - t))).abs() < 1e-12,
                "{e:?} at {t}"
            );
        }
        assert_eq!(m.mirrored(), e);
    }
}

#[test]
fn easing_is_monotonic() {
    for e in ALL {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = e.apply(f64::from(i) / 100.0);
            assert!(v >= prev, "{e:?}");
            prev = v;
        }
    }
}
