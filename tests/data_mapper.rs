use std::collections::HashSet;
use std::path::PathBuf;

use assist_chords::data_mapper::{ChordEdge, ConnectionMode, DataMapper};
use assist_chords::error::MapperError;
use assist_chords::goal_record::{GoalRecord, load_goal_records};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn fixture_mapper(mode: ConnectionMode) -> DataMapper {
    let records = load_goal_records(&fixture_path("goals.csv")).expect("fixture should load");
    let mut mapper = DataMapper::with_mode(mode);
    mapper.set_source(records);
    mapper
}

fn datasets() -> Vec<Vec<GoalRecord>> {
    vec![
        Vec::new(),
        vec![GoalRecord::new("Solo", None, None)],
        vec![
            GoalRecord::new("A", None, None),
            GoalRecord::new("B", Some("A"), None),
            GoalRecord::new("A", Some("B"), Some("C")),
        ],
        vec![
            GoalRecord::new("A", Some("B"), Some("C")),
            GoalRecord::new("C", Some("D"), None),
            GoalRecord::new("D", None, Some("E")),
            GoalRecord::new("", Some("F"), None),
            GoalRecord::new("E", Some("A"), Some("D")),
            GoalRecord::new("B", None, None),
        ],
    ]
}

fn distinct_names(records: &[GoalRecord]) -> usize {
    records
        .iter()
        .flat_map(|r| r.point_getters())
        .collect::<HashSet<_>>()
        .len()
}

#[test]
fn matrix_is_square_and_symmetric_in_both_modes() {
    for mode in [ConnectionMode::AllCredited, ConnectionMode::ScorerAssist] {
        for records in datasets() {
            let expected = distinct_names(&records);
            let mut mapper = DataMapper::with_mode(mode);
            mapper.set_source(records);
            let matrix = mapper.player_matrix().expect("source set");
            assert_eq!(matrix.len(), expected);
            for (i, row) in matrix.iter().enumerate() {
                assert_eq!(row.len(), expected);
                for (j, value) in row.iter().enumerate() {
                    assert_eq!(*value, matrix[j][i], "asymmetric at ({i},{j}) in {mode}");
                }
            }
        }
    }
}

#[test]
fn each_goal_contributes_by_credit_count() {
    let cases = [
        (GoalRecord::new("A", None, None), 1),
        (GoalRecord::new("A", Some("B"), None), 1),
        (GoalRecord::new("A", Some("B"), Some("C")), 3),
    ];
    for (record, pairs) in cases {
        let mut mapper = DataMapper::new();
        mapper.set_source(vec![record]);
        let matrix = mapper.player_matrix().expect("source set");
        let diagonal: u32 = (0..matrix.len()).map(|i| matrix[i][i]).sum();
        let off_diagonal: u32 = matrix.iter().flatten().sum::<u32>() - diagonal;
        assert_eq!(diagonal + off_diagonal / 2, pairs);
    }
}

#[test]
fn total_goal_count_matches_records() {
    for records in datasets() {
        let len = records.len();
        let mut mapper = DataMapper::new();
        mapper.set_source(records);
        assert_eq!(mapper.total_goal_count(), len);
    }
}

#[test]
fn fixture_builds_expected_network() {
    let mapper = fixture_mapper(ConnectionMode::AllCredited);
    let names: Vec<&str> = mapper
        .players()
        .expect("source set")
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Crosby", "Guentzel", "Letang", "Malkin", "Kessel", "Dumoulin", "Rust"]
    );

    let matrix = mapper.player_matrix().expect("source set");
    assert_eq!(matrix[0][0], 1);
    assert_eq!(matrix[0][1], 3);
    assert_eq!(matrix[1][2], 1);
    assert_eq!(matrix[0][5], 1);
    assert_eq!(matrix[2][3], 1);
    assert_eq!(matrix[6][6], 1);
    assert_eq!(matrix.iter().flatten().sum::<u32>(), 20);

    let crosby = mapper.player(0).expect("crosby");
    assert_eq!((crosby.goals, crosby.points), (3, 4));
    assert_eq!(mapper.total_goal_count(), 7);
    assert_eq!(
        mapper.last_update().as_deref(),
        Ok("10/21 against Canucks")
    );
}

#[test]
fn fixture_scorer_assist_mode_drops_assister_pairs() {
    let mapper = fixture_mapper(ConnectionMode::ScorerAssist);
    let matrix = mapper.player_matrix().expect("source set");
    assert_eq!(matrix[0][1], 3);
    assert_eq!(matrix[1][2], 0);
    assert_eq!(matrix[0][5], 0);
    assert_eq!(mapper.shared_goals(1, 2), Ok(1));
}

#[test]
fn fixture_chord_and_player_text() {
    let mapper = fixture_mapper(ConnectionMode::AllCredited);
    let chords = mapper.chords().expect("source set");
    assert_eq!(chords.len(), 9);
    assert_eq!(
        chords[0],
        ChordEdge {
            source: 0,
            target: 1,
            value: 3
        }
    );
    assert_eq!(
        mapper.chord_info(&chords[0]).expect("valid edge"),
        "Crosby scored 75.00% of their points with Guentzel\n\
         Guentzel scored 100.00% of their points with Crosby"
    );

    let rust = mapper.index_of("Rust").expect("source set").expect("rust");
    assert_eq!(
        mapper.player_info(rust).expect("valid index"),
        "1 goal (scored 14.29% of goals)\n1 point (involved in 14.29% of goals)"
    );
    assert_eq!(
        mapper
            .chord_info(&ChordEdge {
                source: rust,
                target: rust,
                value: 1
            })
            .expect("valid edge"),
        "Rust scored 100.00% of their points without assistance."
    );
}

#[test]
fn queries_before_source_fail() {
    let mapper = DataMapper::new();
    assert_eq!(mapper.player_matrix(), Err(MapperError::SourceNotSet));
    assert_eq!(mapper.chords(), Err(MapperError::SourceNotSet));
    assert_eq!(mapper.player_info(0), Err(MapperError::SourceNotSet));
    assert_eq!(
        mapper.chord_info(&ChordEdge {
            source: 0,
            target: 0,
            value: 0
        }),
        Err(MapperError::SourceNotSet)
    );
}
