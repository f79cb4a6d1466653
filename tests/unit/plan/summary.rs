use super::*;
use crate::config::MosaicConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn summary_reports_exact_numbers() {
    let cfg = MosaicConfig {
        scale: crate::config::ScaleConfig {
            giant_fraction: 0.0,
            featured_fraction: 0.0,
            ..Default::default()
        },
        ..MosaicConfig::default()
    };
    let plan = MosaicPlan::build(&cfg, 700, &mut StdRng::seed_from_u64(1)).unwrap();
    let s = PlanSummary::of(&plan);

    assert_eq!((s.cell_size, s.columns, s.rows), (56, 30, 21));
    assert!(s.exact_fit);
    assert_eq!(s.slots, 630);
    assert_eq!(s.truncated, 70);
    assert_eq!(s.duplicated, 0);
    assert_eq!(
        s.categories,
        CategoryCounts {
            normal: 630,
            featured: 0,
            giant: 0
        }
    );
    assert_eq!(s.overlap_frames, 60);
    assert_eq!(s.waves.iter().map(|w| w.size).sum::<usize>(), 630);

    let phases: Vec<TimelinePhase> = s.phases.iter().map(|p| p.phase).collect();
    assert_eq!(phases, TimelinePhase::PLAYBACK.to_vec());
    assert_eq!(s.phases[1].frames, 90);
    assert!((s.phases[1].secs - 3.0).abs() < 1e-9);
    assert_eq!(s.phases[2].start, s.phases[0].frames + 90);
    assert_eq!(s.total_frames, 2 * s.phases[0].frames + 90);
    assert!((s.total_secs - s.total_frames as f64 / 30.0).abs() < 1e-9);
}

#[test]
fn summary_serializes_to_json() {
    let plan = MosaicPlan::build(
        &MosaicConfig::default(),
        10,
        &mut StdRng::seed_from_u64(2),
    )
    .unwrap();
    let json = PlanSummary::of(&plan).to_json_pretty().unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["cell_size"], 56);
    assert_eq!(v["phases"][0]["phase"], "entrance");
    assert_eq!(v["duplicated"], 620);
}
