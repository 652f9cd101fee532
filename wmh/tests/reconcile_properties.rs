use approx::assert_abs_diff_eq;
use ndarray::Array3;
use wmh::prelude::*;

fn wave(shape: (usize, usize, usize), phase: f64, bias: f64) -> IntensityVolume {
    Array3::from_shape_fn(shape, |(i, j, k)| {
        let x = 0.9 * i as f64 + 0.4 * j as f64 + 0.7 * k as f64 + phase;
        3.0 + 2.0 * x.sin() + 0.5 * (1.3 * x).cos() + bias
    })
}

fn pairs() -> Vec<(IntensityVolume, IntensityVolume)> {
    vec![
        (wave((6, 7, 5), 0.0, 0.0), wave((6, 7, 5), 0.35, 0.1)),
        (wave((6, 7, 5), 0.2, 0.3), wave((6, 7, 5), 0.0, -0.2)),
        (wave((9, 4, 3), 1.1, 0.0), wave((9, 4, 3), 0.9, 0.45)),
    ]
}

fn all_params() -> Vec<ReconcileParams> {
    [Connectivity::Face, Connectivity::Edge, Connectivity::Vertex]
        .into_iter()
        .map(|connectivity| ReconcileParams {
            connectivity,
            ..Default::default()
        })
        .collect()
}

#[test]
fn reconcile_never_removes_voxels() {
    for (map1, map2) in pairs() {
        for thr in [2.5, 3.0, 3.5] {
            let mask1 = threshold(&map1, thr).unwrap();
            let mask2 = threshold(&map2, thr).unwrap();
            for params in all_params() {
                let r = Reconciler::new(params)
                    .unwrap()
                    .reconcile(thr, (&map1, &map2), (&mask1, &mask2))
                    .unwrap();
                assert!(mask1.difference(&r.masks.0).unwrap().is_empty());
                assert!(mask2.difference(&r.masks.1).unwrap().is_empty());
                assert_eq!(r.masks.0.count(), mask1.count() + r.added.0);
                assert_eq!(r.masks.1.count(), mask2.count() + r.added.1);
            }
        }
    }
}

#[test]
fn reconcile_is_order_symmetric() {
    for (map1, map2) in pairs() {
        for thr in [2.5, 3.0] {
            let mask1 = threshold(&map1, thr).unwrap();
            let mask2 = threshold(&map2, thr).unwrap();
            for params in all_params() {
                let reconciler = Reconciler::new(params).unwrap();
                let forward = reconciler
                    .reconcile(thr, (&map1, &map2), (&mask1, &mask2))
                    .unwrap();
                let backward = reconciler
                    .reconcile(thr, (&map2, &map1), (&mask2, &mask1))
                    .unwrap();
                let r = forward.recalibration;
                assert_ne!(r.mean_first, r.mean_second);
                assert_eq!(forward.masks.0, backward.masks.1);
                assert_eq!(forward.masks.1, backward.masks.0);
                assert_eq!(forward.better, backward.better.other());
                assert_abs_diff_eq!(
                    forward.recalibration.threshold,
                    backward.recalibration.threshold,
                    epsilon = 1e-12
                );
            }
        }
    }
}

#[test]
fn recalibrated_threshold_stays_in_bounds() {
    for (map1, map2) in pairs() {
        for thr in [1.0, 2.0, 2.5, 3.0] {
            let mask1 = threshold(&map1, thr).unwrap();
            let mask2 = threshold(&map2, thr).unwrap();
            let r = Reconciler::default()
                .reconcile(thr, (&map1, &map2), (&mask1, &mask2))
                .unwrap();
            let new_thr = r.recalibration.threshold;
            assert!(new_thr >= MIN_BASE_THRESHOLD, "{new_thr}");
            assert!(new_thr <= f64::max(MAX_BASE_THRESHOLD, thr), "{new_thr}");
        }
    }
}

#[test]
fn reconcile_improves_or_keeps_agreement() {
    for (map1, map2) in pairs() {
        let mask1 = threshold(&map1, DEFAULT_THRESHOLD).unwrap();
        let mask2 = threshold(&map2, DEFAULT_THRESHOLD).unwrap();
        let before = PairStats::measure("before", &mask1, &mask2).unwrap();
        let (out1, out2) = reconcile(DEFAULT_THRESHOLD, (&map1, &map2), (&mask1, &mask2)).unwrap();
        let after = PairStats::measure("after", &out1, &out2).unwrap();
        assert!(after.common >= before.common);
        assert!(after.wmh_1 >= before.wmh_1);
        assert!(after.wmh_2 >= before.wmh_2);
    }
}

#[test]
fn identical_squares_are_unchanged() {
    let map = Array3::from_shape_fn((5, 5, 1), |(i, j, _)| {
        if (1..4).contains(&i) && (1..4).contains(&j) {
            4.0
        } else {
            0.0
        }
    });
    let mask1 = threshold(&map, 3.0).unwrap();
    let mask2 = threshold(&map, 3.0).unwrap();
    assert_eq!(mask1.count(), 9);
    assert_abs_diff_eq!(dice(&mask1, &mask2).unwrap(), 1.0);

    let (out1, out2) = reconcile(3.0, (&map, &map), (&mask1, &mask2)).unwrap();
    assert_eq!(out1, mask1);
    assert_eq!(out2, mask2);
    assert_abs_diff_eq!(dice(&out1, &out2).unwrap(), 1.0);
}

#[test]
fn worse_mask_recovers_voxel_above_recalibrated_threshold() {
    // 重叠体素: map1 = 4.5, map2 = 3.5 -> base = 1.8, diff = 1.0, new_thr = 2.0
    let mut map1 = Array3::<f64>::zeros((1, 3, 1));
    let mut map2 = Array3::<f64>::zeros((1, 3, 1));
    map1[(0, 0, 0)] = 4.5;
    map2[(0, 0, 0)] = 3.5;
    // 体素A: 只在mask1中
    map1[(0, 1, 0)] = 4.2;
    map2[(0, 1, 0)] = 3.5;

    let mask1 = BinaryMask::from_array(Array3::from_shape_vec((1, 3, 1), vec![1, 1, 0]).unwrap())
        .unwrap();
    let mask2 = BinaryMask::from_array(Array3::from_shape_vec((1, 3, 1), vec![1, 0, 0]).unwrap())
        .unwrap();

    let r = Reconciler::default()
        .reconcile(3.0, (&map1, &map2), (&mask1, &mask2))
        .unwrap();
    assert_abs_diff_eq!(r.recalibration.threshold, 2.0, epsilon = 1e-12);
    assert_eq!(r.better, Visit::First);
    assert_eq!(r.masks.1.get((0, 1, 0)), Some(true));
    assert_eq!(r.masks.1.get((0, 2, 0)), Some(false));
    assert_eq!(r.masks.0, mask1);
}

#[test]
fn disjoint_masks_report_empty_overlap() {
    let map = Array3::from_elem((4, 4, 2), 4.0);
    let mask1 = BinaryMask::from_array(Array3::from_shape_fn((4, 4, 2), |(i, _, _)| {
        u8::from(i < 2)
    }))
    .unwrap();
    let mask2 = BinaryMask::from_array(Array3::from_shape_fn((4, 4, 2), |(i, _, _)| {
        u8::from(i >= 2)
    }))
    .unwrap();
    assert_eq!(
        reconcile(3.0, (&map, &map), (&mask1, &mask2)).unwrap_err(),
        WmhError::EmptyOverlap
    );
}

#[test]
fn dice_properties() {
    for (map1, map2) in pairs() {
        let a = threshold(&map1, 3.0).unwrap();
        let b = threshold(&map2, 3.0).unwrap();
        assert_abs_diff_eq!(dice(&a, &a).unwrap(), 1.0);
        assert_abs_diff_eq!(dice(&a, &b).unwrap(), dice(&b, &a).unwrap());
        let d = dice(&a, &b).unwrap();
        assert!((0.0..=1.0).contains(&d));
    }
    let empty = BinaryMask::zeros((3, 3, 3));
    assert_eq!(dice(&empty, &empty).unwrap_err(), WmhError::DegenerateDice);
}
