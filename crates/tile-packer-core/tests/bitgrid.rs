use rand::{Rng, SeedableRng};
use tile_packer_core::grid::BitGrid;

#[test]
fn runs_cross_word_boundaries() {
    let mut g = BitGrid::new(200, 2);
    for x in 60..140 {
        g.set(x, 1);
    }
    assert_eq!(g.run_from(60, 1), 80);
    assert_eq!(g.run_from(64, 1), 76);
    assert_eq!(g.run_from(139, 1), 1);
    assert_eq!(g.run_from(140, 1), 0);
    assert_eq!(g.run_from(0, 0), 0);
}

#[test]
fn runs_stop_at_the_row_end() {
    let g = BitGrid::filled(70, 3);
    assert_eq!(g.run_from(0, 2), 70);
    assert_eq!(g.run_from(65, 0), 5);
    assert!(g.is_full());
    assert_eq!(g.count_ones(), 210);
}

#[test]
fn resize_keeps_every_set_cell() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    let mut g = BitGrid::new(37, 21);
    let mut set = Vec::new();
    for _ in 0..150 {
        let (x, y) = (rng.gen_range(0..37), rng.gen_range(0..21));
        g.set(x, y);
        set.push((x, y));
    }
    let before: Vec<(u32, u32)> = g.iter_ones().collect();

    g.resize(74, 21);
    g.resize(74, 42);
    assert_eq!((g.width(), g.height()), (74, 42));
    let after: Vec<(u32, u32)> = g.iter_ones().collect();
    assert_eq!(before, after);
    for (x, y) in set {
        assert!(g.get(x, y));
    }
    assert!(!g.get(73, 41));
}

#[test]
fn resize_never_shrinks() {
    let mut g = BitGrid::filled(8, 8);
    g.resize(4, 16);
    assert_eq!((g.width(), g.height()), (8, 16));
    assert_eq!(g.count_ones(), 64);
}
