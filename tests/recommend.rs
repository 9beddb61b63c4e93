use recipe_recommender::{
    assign_clusters, build_features, match_peers, ClusterSeed, RecipeRecord, RecommendError,
    Recommender, RecommenderConfig, TextNormalizer,
};

const CHICKEN: [&str; 5] = [
    "chicken rice",
    "chicken rice",
    "chicken rice garlic",
    "chicken rice onion",
    "chicken rice ginger",
];

const DESSERT: [&str; 5] = [
    "chocolate cake sugar",
    "chocolate cake flour",
    "chocolate cake butter",
    "chocolate cake egg",
    "chocolate cake cream",
];

fn corpus() -> Vec<RecipeRecord> {
    CHICKEN
        .iter()
        .chain(DESSERT.iter())
        .enumerate()
        .map(|(i, ingredients)| {
            RecipeRecord::new(
                format!("https://recipes.test/{}", i),
                format!("Recipe {}", i),
                *ingredients,
            )
        })
        .collect()
}

fn links(records: &[RecipeRecord]) -> Vec<String> {
    records.iter().map(|r| r.link.clone()).collect()
}

#[test]
fn chicken_and_dessert_split_into_two_clusters() {
    let records = corpus();
    let normalizer = TextNormalizer::new();
    let texts: Vec<&str> = records.iter().map(|r| r.all_ingredients.as_str()).collect();
    let normalized = normalizer.normalize_all(&texts);
    let (matrix, _) = build_features(&normalized).unwrap();
    let assignment = assign_clusters(&matrix).unwrap();

    assert_eq!(assignment.len(), 10);
    assert_eq!(assignment.n_clusters(), 2);
    let chicken = assignment.label(0).unwrap();
    let dessert = assignment.label(5).unwrap();
    assert_ne!(chicken, dessert);
    assert!((0..5).all(|i| assignment.label(i) == Some(chicken)));
    assert!((5..10).all(|i| assignment.label(i) == Some(dessert)));

    for target in 0..5 {
        let peers = match_peers(&records, &assignment, target).unwrap();
        let expected: Vec<String> = (0..5)
            .filter(|&i| i != target)
            .map(|i| records[i].link.clone())
            .collect();
        assert_eq!(links(&peers), expected);
    }
}

#[test]
fn peer_relation_is_symmetric() {
    let records = corpus();
    let recommender = Recommender::default();
    let peers: Vec<Vec<String>> = records
        .iter()
        .map(|target| links(&recommender.recommend(&records, target).unwrap().peers))
        .collect();

    for (a, a_peers) in peers.iter().enumerate() {
        assert!(!a_peers.contains(&records[a].link), "target listed as its own peer");
        for (b, b_peers) in peers.iter().enumerate() {
            assert_eq!(
                a_peers.contains(&records[b].link),
                b_peers.contains(&records[a].link),
                "asymmetric peers between {} and {}",
                a,
                b
            );
        }
    }
}

#[test]
fn recommender_matches_pipeline() {
    let records = corpus();
    let rec = Recommender::default().recommend(&records, &records[2]).unwrap();
    assert_eq!(rec.cluster_count, 2);
    assert_eq!(
        links(&rec.peers),
        vec![
            "https://recipes.test/0",
            "https://recipes.test/1",
            "https://recipes.test/3",
            "https://recipes.test/4",
        ]
    );
}

#[test]
fn same_name_different_link_is_still_a_peer() {
    let mut records = corpus();
    records[1].name = records[0].name.clone();
    let rec = Recommender::default().recommend(&records, &records[0]).unwrap();
    assert!(links(&rec.peers).contains(&records[1].link));
}

#[test]
fn fixed_seed_is_stable_across_instances() {
    let records = corpus();
    let config = RecommenderConfig { seed: ClusterSeed::Fixed(1234), ..Default::default() };
    let a = Recommender::new(config.clone()).recommend(&records, &records[7]).unwrap();
    let b = Recommender::new(config).recommend(&records, &records[7]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn boundary_errors() {
    let empty: Vec<String> = Vec::new();
    assert!(matches!(build_features(&empty), Err(RecommendError::EmptyCorpus)));

    let normalizer = TextNormalizer::new();
    let blank = normalizer.normalize_all(&["", "the of and", "123 !!"]);
    assert!(matches!(build_features(&blank), Err(RecommendError::DegenerateCorpus)));

    let (one, _) = build_features(&["chicken"]).unwrap();
    assert!(matches!(assign_clusters(&one), Err(RecommendError::InsufficientData { rows: 1 })));
}

#[test]
fn empty_ingredients_still_participate() {
    let mut records = corpus();
    records.push(RecipeRecord::new("https://recipes.test/blank", "Blank", ""));
    let target = records.last().cloned().unwrap();
    let rec = Recommender::default().recommend(&records, &target).unwrap();
    assert_eq!(rec.cluster_count, 2);
    assert!(rec.target_cluster < 2);
}
