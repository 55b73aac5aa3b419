use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sporegrid_core::{EnergyField, OccupancySource, OrganismConfig, Position};
use sporegrid_world::distribution::{distribute_row, DistributionContext, TRANSIT_DAMPING};
use sporegrid_world::{ConstantDna, DnaInput, Grid, Organism};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,sporegrid_world=info".into()),
        )
        .with_test_writer()
        .try_init();
}

fn field(entries: &[((i32, i32), f64)]) -> EnergyField {
    entries
        .iter()
        .map(|&(pos, energy)| (Position::from(pos), energy))
        .collect()
}

fn random_field(rng: &mut ChaCha8Rng, radius: i32) -> EnergyField {
    let mut f = EnergyField::new();
    for x in -radius..=radius {
        for y in -radius..=radius {
            if rng.gen_bool(0.6) {
                f.set(Position::new(x, y), rng.gen_range(0.0..2.0));
            }
        }
    }
    f
}

/// DNA that forwards half its flow north-east only when the cell itself is
/// energetic.
fn seed_dna(input: &DnaInput) -> [f64; 4] {
    if input.own_energy() > 0.9 {
        [0.5, 0.0, 0.0, 0.0]
    } else {
        [0.0; 4]
    }
}

#[test]
fn test_two_tick_scenario() {
    init_tracing();
    let mut org = Organism::with_dna(
        Position::new(0, 0),
        seed_dna,
        OrganismConfig::new(10, 0.05, 0.5),
    )
    .unwrap();

    let tick0 = field(&[((0, 0), 1.0)]);
    org.tick(0, &tick0);
    assert_eq!(org.previous_field(), &tick0);
    // preset NE flag with zero replication energy spawns immediately
    assert_eq!(org.members(), 2);
    assert!(org.cell_at(Position::new(1, 1)).is_some());

    org.tick(1, &field(&[((0, 0), 1.0), ((1, 1), 0.0)]));

    let seed = org.cell_at(Position::new(0, 0)).unwrap();
    assert_eq!(seed.replication_energy, [0.45, 0.0, 0.0, 0.0]);
    // (1,1) is a key of the new field, so north-east is no longer free
    assert_eq!(seed.able_to_replicate, [false, true, true, true]);
    assert!((seed.energy - 0.95).abs() < 1e-12);
    assert!(!seed.is_dead());

    let north_east = org.cell_at(Position::new(1, 1)).unwrap();
    assert!((north_east.energy - 0.4).abs() < 1e-12);
    assert!((org.sum_energies() - 1.45).abs() < 1e-12);

    for pos in [(1, -1), (-1, 1), (-1, -1)] {
        assert!(org.cell_at(Position::from(pos)).is_some());
    }
    assert_eq!(org.members(), 5);
}

#[test]
fn test_forwarding_seed_spawns_north_east_only() {
    init_tracing();
    let mut org = Organism::with_dna(
        Position::new(0, 0),
        ConstantDna([0.5, 0.0, 0.0, 0.0]),
        OrganismConfig::new(10, 0.05, 0.5),
    )
    .unwrap();

    org.tick(0, &field(&[((0, 0), 0.5)]));
    assert_eq!(org.members(), 1);

    // only north-east is absent from the field
    let food = field(&[
        ((0, 0), 1.0),
        ((1, -1), 0.0),
        ((-1, 1), 0.0),
        ((-1, -1), 0.0),
    ]);
    org.tick(1, &food);

    let seed = org.cell_at(Position::new(0, 0)).unwrap();
    assert_eq!(seed.able_to_replicate, [true, false, false, false]);
    assert!((seed.energy - 0.95 * (1.0 - 0.45)).abs() < 1e-12);
    assert!(!seed.is_dead());
    assert!(org.cell_at(Position::new(1, 1)).is_some());
    assert_eq!(org.members(), 2);
}

#[test]
fn test_starving_seed_dies() {
    let mut org = Organism::with_dna(
        Position::new(3, 3),
        ConstantDna([0.0; 4]),
        OrganismConfig::new(10, 0.05, 0.5),
    )
    .unwrap();

    org.tick(0, &field(&[((3, 3), 0.04)]));
    assert_eq!(org.members(), 0);
    assert!(org.grid().is_empty());
}

#[test]
fn test_colony_grows_and_stays_consistent() {
    init_tracing();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut org = Organism::with_dna(
        Position::new(0, 0),
        ConstantDna([0.5, 0.5, 0.0, 0.0]),
        OrganismConfig::new(50, 0.05, 0.5),
    )
    .unwrap();

    for tick in 0..20 {
        let mut food = random_field(&mut rng, 6);
        food.set(Position::new(0, 0), 1.5);
        org.tick(tick, &food);

        assert!(org.members() <= 50);
        assert_eq!(org.members(), org.grid().len());
        assert!(org.cells().all(|c| !c.is_dead()));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_members_never_exceed_limit(
        seed in any::<u64>(),
        cell_limit in 1usize..25,
        split in prop::array::uniform4(0.0f64..1.0),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut org = Organism::with_dna(
            Position::new(0, 0),
            ConstantDna(split),
            OrganismConfig::new(cell_limit, 0.05, 0.5),
        )
        .unwrap();

        for tick in 0..12u64 {
            let mut food = random_field(&mut rng, 5);
            food.set(Position::new(0, 0), 1.9);
            org.tick(tick, &food);

            prop_assert!(org.members() <= cell_limit);
            prop_assert_eq!(org.members(), org.grid().len());
        }
    }

    #[test]
    fn prop_flow_bounded_by_damped_source(
        source in 0.0f64..10.0,
        split in prop::array::uniform4(0.0f64..=1.0),
    ) {
        let previous = field(&[((0, 0), source)]);
        let new_field = field(&[
            ((0, 0), 0.0),
            ((1, 1), 0.0),
            ((1, -1), 0.0),
            ((-1, 1), 0.0),
            ((-1, -1), 0.0),
        ]);
        let mut grid = Grid::new();
        grid.insert(sporegrid_world::Cell::new(Position::new(0, 0))).unwrap();
        let dna = ConstantDna(split);

        let ctx = DistributionContext {
            previous: &previous,
            new_field: &new_field,
            grid: &grid,
            dna: &dna,
            occupancy: OccupancySource::EnergyField,
        };
        let flow = distribute_row(0, &ctx);

        prop_assert_eq!(flow.contributions.len(), 4);
        for (_, amount) in &flow.contributions {
            prop_assert!(*amount <= TRANSIT_DAMPING * source + 1e-12);
        }
        prop_assert!(flow.total() <= 4.0 * TRANSIT_DAMPING * source + 1e-9);
    }

    #[test]
    fn prop_surrounded_cell_never_replicates(
        split in prop::array::uniform4(0.0f64..=1.0),
        food in 1.0f64..5.0,
    ) {
        let mut org = Organism::with_dna(
            Position::new(0, 0),
            ConstantDna(split),
            OrganismConfig::new(100, 0.05, 0.5),
        )
        .unwrap();
        org.tick(0, &field(&[((0, 0), 0.5)]));

        let surrounded = field(&[
            ((0, 0), food),
            ((1, 1), 0.0),
            ((1, -1), 0.0),
            ((-1, 1), 0.0),
            ((-1, -1), 0.0),
        ]);
        org.tick(1, &surrounded);

        prop_assert_eq!(org.members(), 1);
        let seed = org.cell_at(Position::new(0, 0)).unwrap();
        prop_assert_eq!(seed.able_to_replicate, [false; 4]);
    }
}
