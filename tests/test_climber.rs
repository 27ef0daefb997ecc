use twoopt::{
    city::{Cities, City},
    restart::{GlobalBest, LogLevel},
    search::{move_change, Climber},
    tour::Tour,
};

fn square(side: f32) -> Cities {
    Cities::new(vec![
        City::new(0.0, 0.0),
        City::new(side, 0.0),
        City::new(side, side),
        City::new(0.0, side),
    ])
    .unwrap()
}

#[test]
fn test_every_pass_keeps_a_permutation_and_shortens_the_tour() {
    let cities = Cities::grid(10).unwrap();
    let climber = Climber::new(&cities, 0, 5, 4).unwrap();
    assert!(climber.tour().is_permutation());

    let mut length = climber.tour().length();
    let mut moves = 0;
    while let Some(applied) = climber.pass().unwrap() {
        moves += 1;
        assert!(applied.change < 0);
        assert!(applied.first >= 1 && applied.first < applied.last && applied.last < 100);
        assert!(climber.tour().is_permutation());

        let after = climber.tour().length();
        assert_eq!(after, length + applied.change);
        assert!(after < length);
        length = after;
    }
    assert!(moves > 0);
}

#[test]
fn test_converged_tour_stays_converged() {
    let cities = Cities::grid(10).unwrap();
    let climber = Climber::new(&cities, 0, 8, 3).unwrap();
    while climber.pass().unwrap().is_some() {}

    let order = climber.tour().order();
    for _ in 0..3 {
        assert_eq!(climber.pass().unwrap(), None);
        assert_eq!(climber.tour().order(), order);
    }
}

#[test]
fn test_team_sizes_all_reach_a_local_optimum() {
    let cities = Cities::grid(10).unwrap();
    for team_size in [1, 2, 3, 5, 6, 8, 13] {
        let best = GlobalBest::new();
        let climber = Climber::new(&cities, 0, 42, team_size).unwrap();
        let outcome = climber.climb(&best).unwrap();

        let tour = climber.tour();
        assert!(tour.is_permutation());
        assert_eq!(outcome.length, tour.length());
        assert_eq!(best.climbs(), outcome.climbs);
        for i in 0..tour.len() - 2 {
            for j in i + 2..tour.len() {
                assert!(
                    move_change(tour, i, j) >= 0,
                    "team of {} stopped with an improving move ({}, {})",
                    team_size,
                    i,
                    j
                );
            }
        }
    }
}

#[test]
fn test_crossed_square_is_uncrossed_in_one_pass() {
    let tour = Tour::from_order(&square(10.0), &[0, 2, 1, 3]).unwrap();
    let climber = Climber::from_tour(tour, 0, 2).unwrap();
    assert_eq!(climber.tour().length(), 48);

    let applied = climber.pass().unwrap().unwrap();
    assert_eq!(applied.gain(), 8);
    assert_eq!(climber.tour().length(), 40);
    assert_eq!(climber.pass().unwrap(), None);
}

#[test]
fn test_crossed_unit_square_already_has_perimeter_length() {
    // Diagonals of a unit square truncate to 1, so crossing costs nothing.
    let tour = Tour::from_order(&square(1.0), &[0, 2, 1, 3]).unwrap();
    let climber = Climber::from_tour(tour, 0, 1).unwrap();
    assert_eq!(climber.tour().length(), 4);

    let outcome = climber.climb(&GlobalBest::new()).unwrap();
    assert_eq!(outcome.length, 4);
    assert_eq!(outcome.climbs, 1);
}

#[test]
fn test_unit_grid_seed_zero_single_worker() {
    let cities = Cities::grid(10).unwrap();
    let climber = Climber::new(&cities, 0, 0, 1).unwrap();
    assert_eq!(
        &climber.tour().order()[..12],
        &[0, 9, 2, 73, 67, 23, 25, 3, 74, 8, 92, 53]
    );

    let best = GlobalBest::new();
    let outcome = climber.climb(&best).unwrap();
    assert_eq!(outcome.length, 100);
    assert_eq!(outcome.climbs, 72);
    assert_eq!(best.best_length(), Some(100));
}

#[test]
fn test_verbose_climb_with_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let cities = Cities::grid(10).unwrap();
    let climber = Climber::new(&cities, 7, 7, 2)
        .unwrap()
        .with_log_level(LogLevel::Verbose);
    let outcome = climber.climb(&GlobalBest::new()).unwrap();
    assert_eq!(outcome.restart, 7);
    assert!(outcome.length >= 100);
}
