//! End-to-end searches on small vertex counts

use h_good_search::config::Config;
use h_good_search::conflict::{CachedMatrix, ConflictGraphBuilder};
use h_good_search::graph::enumerate::all_graphs;
use h_good_search::graph::EdgeBits;
use h_good_search::ip::formulate::Mode;
use h_good_search::ip::BranchAndBound;
use h_good_search::pattern::PatternFamily;
use h_good_search::{pipeline, storage, OracleError};

fn triangles() -> PatternFamily {
    PatternFamily::parse(&["111"]).unwrap()
}

#[test]
fn independent_set_on_three_vertices_is_four() {
    let config = Config::new(3, Mode::IndependentSet, 10, true);
    let mut oracle = BranchAndBound::new();
    let (matrix, report) = pipeline::run(&config, &triangles(), None, &mut oracle).unwrap();

    assert_eq!(matrix.size(), 8);
    assert_eq!(report.candidates, 8);
    assert_eq!(report.optimum, 4);
    assert_eq!(report.solutions.len(), 1);
    assert_eq!(report.solutions[0].len(), 4);

    // no two chosen graphs are complements of each other
    let chosen = &report.solution_graphs[0];
    for a in chosen {
        for b in chosen {
            let diff = a.parse::<EdgeBits>().unwrap()
                .symmetric_difference(&b.parse().unwrap())
                .unwrap();
            assert_ne!(diff.to_string(), "111");
        }
    }
}

#[test]
fn max_clique_on_three_vertices_pools_every_complement_pair() {
    let config = Config::new(3, Mode::MaxClique, 10, false);
    let mut oracle = BranchAndBound::new();
    let (_, report) = pipeline::run(&config, &triangles(), None, &mut oracle).unwrap();

    assert_eq!(report.optimum, 2);
    assert_eq!(report.solutions.len(), 4);
    for pair in &report.solution_graphs {
        let a: EdgeBits = pair[0].parse().unwrap();
        let b: EdgeBits = pair[1].parse().unwrap();
        assert_eq!(a.symmetric_difference(&b).unwrap().to_string(), "111");
    }
}

#[test]
fn pool_size_caps_clique_solutions() {
    let config = Config::new(3, Mode::MaxClique, 2, true);
    let mut oracle = BranchAndBound::new();
    let (_, report) = pipeline::run(&config, &triangles(), None, &mut oracle).unwrap();
    assert_eq!(report.optimum, 2);
    assert_eq!(report.solutions.len(), 2);
}

#[test]
fn four_vertex_triangle_free_differences() {
    // sequential so that every distinct difference is searched exactly once
    let config = Config::new(4, Mode::IndependentSet, 10, false);
    let mut oracle = BranchAndBound::new();
    let (matrix, report) = pipeline::run(&config, &triangles(), None, &mut oracle).unwrap();

    assert_eq!(report.candidates, 64);
    assert_eq!(report.searches, 63);
    assert_eq!(report.conflicts.conflicting_pairs, matrix.conflict_count());

    let graphs = all_graphs(4).unwrap();
    let chosen = &report.solutions[0];
    assert_eq!(chosen.len() as i64, report.optimum);
    for (x, &i) in chosen.iter().enumerate() {
        for &j in &chosen[..x] {
            assert!(!matrix.conflicts(i, j));
            let diff = graphs[i].symmetric_difference(&graphs[j]).unwrap();
            assert!(!h_good_search::graph::matcher::contains_subgraph(&diff, &triangles().patterns()[0]).unwrap());
        }
    }
}

#[test]
fn cached_matrix_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = dir.path().join("cache").join("n3.bin");

    let graphs = all_graphs(3).unwrap();
    let matrix = ConflictGraphBuilder::new(true).build(&graphs, &triangles()).unwrap();
    let cached = CachedMatrix::new(matrix, 3, &triangles());
    storage::save_matrix(&cached, &cache).unwrap();
    let loaded = storage::load_matrix(&cache).unwrap();
    assert_eq!(loaded, cached);

    let config = Config::new(3, Mode::IndependentSet, 10, true);
    let mut oracle = BranchAndBound::new();
    let (_, report) = pipeline::run(&config, &triangles(), Some(loaded), &mut oracle).unwrap();
    assert!(report.matrix_cached);
    assert_eq!(report.searches, 0);
    assert_eq!(report.optimum, 4);

    let summary = storage::save_report(&report, dir.path()).unwrap();
    let text = std::fs::read_to_string(summary).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["optimum"], 4);
    assert_eq!(json["mode"], "independent_set");
    assert_eq!(json["patterns"][0], "111");
}

#[test]
fn cached_matrix_of_wrong_size_is_rejected() {
    let graphs = all_graphs(3).unwrap();
    let matrix = ConflictGraphBuilder::new(false).build(&graphs, &triangles()).unwrap();
    // header claims four vertices, the matrix only covers eight graphs
    let cached = CachedMatrix::new(matrix, 4, &triangles());

    let config = Config::new(4, Mode::IndependentSet, 10, true);
    let mut oracle = BranchAndBound::new();
    let err = pipeline::run(&config, &triangles(), Some(cached), &mut oracle).unwrap_err();
    assert!(err.to_string().contains("expected 64"));
}

#[test]
fn cached_matrix_for_other_patterns_is_rejected() {
    let graphs = all_graphs(3).unwrap();
    let matrix = ConflictGraphBuilder::new(false).build(&graphs, &triangles()).unwrap();
    let cached = CachedMatrix::new(matrix, 3, &triangles());
    let paths = PatternFamily::parse(&["110"]).unwrap();

    let config = Config::new(3, Mode::IndependentSet, 10, false);
    let mut oracle = BranchAndBound::new();
    let err = pipeline::run(&config, &paths, Some(cached.clone()), &mut oracle).unwrap_err();
    assert!(err.to_string().contains("patterns"));

    let other_size = Config::new(4, Mode::IndependentSet, 10, false);
    assert!(pipeline::run(&other_size, &triangles(), Some(cached), &mut oracle).is_err());

    // a fresh run for the path family gives its own optimum
    let (_, report) = pipeline::run(&config, &paths, None, &mut oracle).unwrap();
    assert_eq!(report.optimum, 2);
}

#[test]
fn truncated_cache_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = dir.path().join("n3.bin");
    // valid header, eight candidates, no matrix words
    let bytes = bincode::serialize(&(3usize, vec!["111".to_string()], (8usize, Vec::<u64>::new()))).unwrap();
    std::fs::write(&cache, bytes).unwrap();

    let err = storage::load_matrix(&cache).unwrap_err();
    assert!(format!("{err:#}").contains("needs 1 words, found 0"));
}

#[test]
fn solver_limits_surface_as_errors() {
    let config = Config::new(4, Mode::IndependentSet, 10, true);
    let mut oracle = BranchAndBound::new().with_node_limit(Some(2));
    let err = pipeline::run(&config, &triangles(), None, &mut oracle).unwrap_err();
    assert_eq!(
        err.downcast_ref::<OracleError>(),
        Some(&OracleError::NodeLimit(2))
    );
}

#[test]
fn explicit_candidates_and_patterns() {
    // candidates in the 5-vertex layout, forbidden: a path on three vertices
    let candidates: Vec<EdgeBits> = ["0000000000", "1100000000", "1000000001", "0000000111"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let family = PatternFamily::parse(&["110"]).unwrap();

    let config = Config::new(5, Mode::IndependentSet, 10, false);
    let mut oracle = BranchAndBound::new();
    let (matrix, report) =
        pipeline::run_with_candidates(&config, &candidates, &family, None, &mut oracle).unwrap();

    // {12,13} is a path; {12,45} is not; {34,35,45} is a triangle
    assert!(matrix.conflicts(0, 1));
    assert!(!matrix.conflicts(0, 2));
    assert!(matrix.conflicts(0, 3));
    assert_eq!(report.vertices, 5);
    assert_eq!(report.pattern_vertices, 3);
    assert_eq!(report.optimum, 2);
}
