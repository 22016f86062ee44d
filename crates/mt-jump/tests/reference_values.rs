use mt_jump::{LinearEngine, Mt19937, Mt19937_64, MicroMt, Tt800};
use rand::RngCore;

#[test]
fn mt19937_ten_thousandth_output() {
    let mut engine = Mt19937::default();
    for _ in 0..9999 {
        engine.next_word();
    }
    assert_eq!(engine.next_word(), 4_123_659_995);
}

#[test]
fn mt19937_64_ten_thousandth_output() {
    let mut engine = Mt19937_64::default();
    for _ in 0..9999 {
        engine.next_word();
    }
    assert_eq!(engine.next_word(), 9_981_545_732_273_789_042);
}

#[test]
fn mt19937_init_by_array() {
    let mut engine = Mt19937::from_seed_sequence([0x123, 0x234, 0x345, 0x456]);
    assert_eq!(engine.next_word(), 1_067_595_299);
}

#[test]
fn mt19937_64_init_by_array() {
    let mut engine = Mt19937_64::from_seed_sequence([0x12345, 0x23456, 0x34567, 0x45678]);
    assert_eq!(engine.next_word(), 7_266_447_313_870_364_031);
}

#[test]
fn mt19937_first_output_of_default_seed() {
    let mut engine = Mt19937::new(5489);
    assert_eq!(engine.next_word(), 3_499_211_612);
}

#[test]
fn reseeding_reproduces_the_stream() {
    let mut a = Tt800::from_seed_sequence([9, 8, 7]);
    let mut b = Tt800::from_seed_sequence([9, 8, 7]);
    for _ in 0..100 {
        assert_eq!(a.next_word(), b.next_word());
    }
}

#[test]
fn micro_mt_is_untempered() {
    let mut engine = MicroMt::new(3);
    let state = engine.state();
    assert_eq!(engine.next_word(), state[0]);
}

#[test]
fn rng_core_exposes_engine_words() {
    let mut engine = Mt19937::new(1);
    let mut reference = engine.clone();
    assert_eq!(engine.next_u32(), reference.next_word());
    let lo = u64::from(reference.next_word());
    let hi = u64::from(reference.next_word());
    assert_eq!(engine.next_u64(), lo | (hi << 32));

    let mut wide = Mt19937_64::new(1);
    let mut wide_ref = wide.clone();
    assert_eq!(wide.next_u64(), wide_ref.next_word());
}
