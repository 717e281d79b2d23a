use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 1_000;

fn keys() -> Vec<u32> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS).map(|_| rng.next_u32()).collect()
}

fn bench_btreeset_insert(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("bench btreeset insert", move |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for key in &keys {
                set.insert(*key);
            }
            set
        })
    });
}

fn bench_btreeset_contains(c: &mut Criterion) {
    let keys = keys();
    let set = keys.iter().cloned().collect::<BTreeSet<u32>>();
    c.bench_function("bench btreeset contains", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(set.contains(key));
            }
        })
    });
}

fn bench_btreeset_remove(c: &mut Criterion) {
    let keys = keys();
    let set = keys.iter().cloned().collect::<BTreeSet<u32>>();
    c.bench_function("bench btreeset remove", move |b| {
        b.iter(|| {
            let mut set = set.clone();
            for key in &keys {
                black_box(set.remove(key));
            }
        })
    });
}

macro_rules! ordered_set_benches {
    ($($module_name:ident: $type_name:ident,)*) => {
        $(
            mod $module_name {
                use balanced_sets::$type_name;
                use criterion::{black_box, Criterion};

                pub fn bench_insert(c: &mut Criterion) {
                    let keys = super::keys();
                    c.bench_function(&format!("bench {} insert", stringify!($module_name)), move |b| b.iter(|| {
                        let mut set = $type_name::new();
                        for key in &keys {
                            set.insert(*key);
                        }
                        set
                    }));
                }

                pub fn bench_contains(c: &mut Criterion) {
                    let keys = super::keys();
                    let set = keys.iter().cloned().collect::<$type_name<u32>>();
                    c.bench_function(&format!("bench {} contains", stringify!($module_name)), move |b| b.iter(|| {
                        for key in &keys {
                            black_box(set.contains(key));
                        }
                    }));
                }

                pub fn bench_remove(c: &mut Criterion) {
                    let keys = super::keys();
                    let set = keys.iter().cloned().collect::<$type_name<u32>>();
                    c.bench_function(&format!("bench {} remove", stringify!($module_name)), move |b| b.iter(|| {
                        let mut set = set.clone();
                        for key in &keys {
                            black_box(set.remove(key));
                        }
                    }));
                }
            }
        )*

        criterion_group!(
            benches,
            bench_btreeset_insert,
            bench_btreeset_contains,
            bench_btreeset_remove,
            $(
                $module_name::bench_insert,
                $module_name::bench_contains,
                $module_name::bench_remove,
            )*
        );
    }
}

ordered_set_benches!(
    avl_tree: AvlSet,
    red_black_tree: RedBlackSet,
);

criterion_main!(benches);
