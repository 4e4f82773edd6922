use crate::entities::movie;

#[derive(Clone, Debug, PartialEq)]
pub struct RankedMovie {
    pub ranking: i32,
    pub movie: movie::Model,
}

/// `(id, ranking)` pairs for an ascending listing.
pub fn assignments(movies: &[movie::Model]) -> Vec<(i32, i32)> {
    let n = movies.len() as i32;
    movies.iter().enumerate().map(|(i, m)| (m.id, n - i as i32)).collect()
}

/// Attaches a ranking to each movie without reordering.
pub fn rank(movies: Vec<movie::Model>) -> Vec<RankedMovie> {
    let n = movies.len() as i32;
    movies
        .into_iter()
        .enumerate()
        .map(|(i, movie)| RankedMovie { ranking: n - i as i32, movie })
        .collect()
}
