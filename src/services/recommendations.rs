use std::cmp::Ordering;

use crate::{
    dataset::Snapshot,
    error::{AppError, AppResult},
    models::RecommendedMovie,
};

/// Maximum number of movies returned per recommendation
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Recommends the movies most similar to `title`
///
/// Looks up the first movie whose title matches exactly (case-sensitive) and ranks
/// every other row of its similarity row by score, highest first. Ties keep column
/// order. The queried movie is excluded by row identity, together with any other
/// row carrying the same title, rather than by dropping the top-ranked entry, so a
/// diagonal that is not the row maximum cannot push out a genuine neighbour.
pub fn recommend(snapshot: &Snapshot, title: &str) -> AppResult<Vec<RecommendedMovie>> {
    let row_index = snapshot
        .row_of(title)
        .ok_or_else(|| AppError::NotFound(title.to_string()))?;

    let row = snapshot.similarity().row(row_index).ok_or_else(|| {
        AppError::Internal(format!(
            "similarity matrix has no row {} for '{}'",
            row_index, title
        ))
    })?;

    let movies = snapshot.movies();
    let mut candidates: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|&(index, _)| index != row_index && movies[index].title != title)
        .collect();

    // sort_by is stable: equal scores (including -0.0 and 0.0) stay in column order.
    // Scores are finite, so partial_cmp always answers.
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    Ok(candidates
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(index, score)| RecommendedMovie::new(&movies[index], score))
        .collect())
}
