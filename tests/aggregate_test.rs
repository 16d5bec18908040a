mod common;

use std::collections::HashMap;

use tastegraph::{
    aggregate::*,
    types::{ArtistRecord, Feature, TrackRecord},
};

use common::features;

// Helper function to create a test track row
fn create_test_track(id: &str, song: &str, popularity: u32) -> TrackRecord {
    TrackRecord {
        song: song.to_string(),
        album: format!("{song} album"),
        artists: vec!["Artist".to_string()],
        id: id.to_string(),
        popularity,
        img: None,
    }
}

// Helper function to create a test artist row
fn create_test_artist(name: &str, genres: &[&str]) -> ArtistRecord {
    ArtistRecord {
        artist: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        id: format!("{name}-id"),
        popularity: 50,
        image: None,
    }
}

#[test]
fn test_join_tracks_with_features() {
    let tracks = vec![
        create_test_track("a", "A", 10),
        create_test_track("b", "B", 20),
        create_test_track("c", "C", 30),
    ];
    // Out of order, one track without features and one stray feature vector
    let feats = vec![
        features("c", 130.0, -5.0, 2),
        features("x", 90.0, -9.0, 7),
        features("a", 110.0, -7.0, 0),
    ];

    let joined = join_tracks_with_features(&tracks, &feats);

    let ids: Vec<_> = joined.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["a", "c"]);
    assert_eq!(joined[0].song, "A");
    assert_eq!(joined[0].tempo, 110.0);
    assert_eq!(joined[1].popularity, 30);
    assert_eq!(joined[1].key, 2);
    assert_eq!(joined[1].loudness, -5.0);
}

#[test]
fn test_join_is_bounded_by_both_inputs() {
    let tracks: Vec<_> = (0..5)
        .map(|i| create_test_track(&format!("t{i}"), "S", i))
        .collect();
    let feats: Vec<_> = (3..8)
        .map(|i| features(&format!("t{i}"), 100.0, -6.0, 0))
        .collect();

    let joined = join_tracks_with_features(&tracks, &feats);
    assert!(joined.len() <= tracks.len().min(feats.len()));
    assert_eq!(joined.len(), 2);

    assert!(join_tracks_with_features(&tracks, &[]).is_empty());
    assert!(join_tracks_with_features(&[], &feats).is_empty());
}

#[test]
fn test_join_uses_first_feature_vector_once() {
    let tracks = vec![create_test_track("a", "A", 1), create_test_track("a", "A again", 2)];
    let feats = vec![features("a", 100.0, -6.0, 1), features("a", 200.0, -3.0, 2)];

    let joined = join_tracks_with_features(&tracks, &feats);
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].tempo, 100.0);
}

#[test]
fn test_feature_column() {
    let tracks = vec![create_test_track("a", "A", 10), create_test_track("b", "B", 20)];
    let feats = vec![features("a", 100.0, -6.0, 4), features("b", 120.0, -8.5, 9)];
    let joined = join_tracks_with_features(&tracks, &feats);

    assert_eq!(feature_column(&joined, Feature::Popularity), vec![10.0, 20.0]);
    assert_eq!(feature_column(&joined, Feature::Key), vec![4.0, 9.0]);
    assert_eq!(feature_column(&joined, Feature::Loudness), vec![-6.0, -8.5]);
    assert_eq!(feature_column(&joined, Feature::Tempo), vec![100.0, 120.0]);
    assert!(feature_column(&[], Feature::Tempo).is_empty());
}

#[test]
fn test_count_genre_words() {
    let artists = vec![
        create_test_artist("A", &["indie pop", "k-pop"]),
        create_test_artist("B", &["pop", "Indie rock"]),
        create_test_artist("C", &[]),
    ];

    let counts = count_genre_words(&artists);

    assert_eq!(counts.get("pop"), Some(&2));
    assert_eq!(counts.get("k-pop"), Some(&1));
    assert_eq!(counts.get("indie"), Some(&1));
    // Case-sensitive
    assert_eq!(counts.get("Indie"), Some(&1));
    assert_eq!(counts.get("rock"), Some(&1));
    assert_eq!(counts.values().sum::<usize>(), 6);
}

#[test]
fn test_count_genre_words_empty() {
    assert!(count_genre_words(&[]).is_empty());
    assert!(count_genre_words(&[create_test_artist("A", &[])]).is_empty());
}

#[test]
fn test_top_n_genre_words() {
    let counts: HashMap<String, usize> = [("pop", 5), ("rock", 2), ("indie", 5), ("jazz", 1)]
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .collect();

    let top = top_n_genre_words(&counts, 3);
    assert_eq!(
        top,
        vec![
            ("indie".to_string(), 5),
            ("pop".to_string(), 5),
            ("rock".to_string(), 2),
        ]
    );

    // Asking for more than there is returns everything
    assert_eq!(top_n_genre_words(&counts, 10).len(), 4);
    assert!(top_n_genre_words(&counts, 0).is_empty());
    assert!(top_n_genre_words(&HashMap::new(), 5).is_empty());
}

#[test]
fn test_count_genre_words_ignores_artist_order() {
    let artists = vec![
        create_test_artist("A", &["indie pop", "k-pop"]),
        create_test_artist("B", &["pop", "indie rock"]),
        create_test_artist("C", &["dream pop"]),
        create_test_artist("D", &["shoegaze", "indie"]),
    ];
    let expected = count_genre_words(&artists);

    let mut reversed = artists.clone();
    reversed.reverse();
    assert_eq!(count_genre_words(&reversed), expected);

    for shift in 1..artists.len() {
        let mut rotated = artists.clone();
        rotated.rotate_left(shift);
        assert_eq!(count_genre_words(&rotated), expected);
    }
}

#[test]
fn test_top_n_genre_words_never_drops_a_larger_count() {
    // Ties at 4 straddle the cut-off for n = 2 and n = 3
    let counts: HashMap<String, usize> = [
        ("pop", 5),
        ("rock", 4),
        ("indie", 4),
        ("jazz", 4),
        ("folk", 2),
        ("metal", 1),
    ]
    .into_iter()
    .map(|(w, c)| (w.to_string(), c))
    .collect();

    for n in 0..=counts.len() + 1 {
        let top = top_n_genre_words(&counts, n);
        assert_eq!(top.len(), n.min(counts.len()));

        let kept: Vec<&str> = top.iter().map(|(w, _)| w.as_str()).collect();
        let min_kept = top.iter().map(|(_, c)| *c).min();
        let max_excluded = counts
            .iter()
            .filter(|(w, _)| !kept.contains(&w.as_str()))
            .map(|(_, c)| *c)
            .max();
        if let (Some(min_kept), Some(max_excluded)) = (min_kept, max_excluded) {
            assert!(min_kept >= max_excluded, "n = {n}: {top:?}");
        }
    }
}
