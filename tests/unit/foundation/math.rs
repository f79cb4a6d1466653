use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 128), 128);
}

#[test]
fn unit_weight_clamps_and_quantizes() {
    assert_eq!(unit_to_u8_weight(-1.0), 0);
    assert_eq!(unit_to_u8_weight(0.0), 0);
    assert_eq!(unit_to_u8_weight(0.5), 128);
    assert_eq!(unit_to_u8_weight(1.0), 255);
    assert_eq!(unit_to_u8_weight(7.0), 255);
}

#[test]
fn mix_endpoints_pick_either_side() {
    assert_eq!(mix_u8(10, 200, 0), 10);
    assert_eq!(mix_u8(10, 200, 255), 200);
    let mid = mix_u8(0, 255, 128);
    assert!((127..=129).contains(&mid));
}

#[test]
fn lerp_hits_both_ends() {
    assert_eq!(lerp(-56.0, 112.0, 0.0), -56.0);
    assert_eq!(lerp(-56.0, 112.0, 1.0), 112.0);
    assert_eq!(lerp(18.0, 1.0, 0.5), 9.5);
}
